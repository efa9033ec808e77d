//! Deterministic exporters for a computed relay plan
//!
//! All three formats are pure functions of the engine, so identical settings
//! always produce byte-identical output.

mod csv;
mod text;
mod xml;

pub use csv::write_csv;
pub use text::write_team_table;
pub use xml::write_xml;
