//! Tab-separated team table

use crate::relay::RelayVariations;

/// One line per team, one variation code per leg
pub fn write_team_table(relay: &RelayVariations) -> String {
    let mut out = String::new();
    for team in relay.first_team_number()..=relay.last_team_number() {
        out.push_str(&format!("Team {}: ", team));
        for leg in 0..relay.number_of_legs() {
            out.push('\t');
            out.push_str(relay.variation(team, leg).code_string);
        }
        out.push('\n');
    }
    out
}
