//! Relay Variations - deterministic relay path assignment for forked courses
//!
//! This library parses a small course notation, builds the fork graph of a
//! relay course, and assigns every team and leg a balanced, reproducible
//! variation through the forks and loops, honoring user pins on branches.
//!
//! # Example
//!
//! ```rust
//! use relay_variations::{plan, RelaySettings};
//!
//! let source = "course sprint { start 31 fork { 32 33 | 34 } 36 finish }";
//! let relay = plan(source, None, &RelaySettings::new(1, 4, 2)).unwrap();
//!
//! assert_eq!(relay.total_possible_paths(), 2);
//! assert_eq!(relay.variation(1, 0).code_string, "A");
//! ```

pub mod course;
pub mod error;
pub mod export;
pub mod parser;
pub mod relay;
pub mod settings;

pub use course::{BranchWarning, Course, CourseError, CourseSet, VariationPath};
pub use error::ParseError;
pub use parser::parse;
pub use relay::{validate_fixed_branches, RelayVariations, VariationInfo};
pub use settings::{FixedBranchAssignments, RelaySettings, SettingsError};

use thiserror::Error;

/// Errors that can occur turning notation into a relay plan
#[derive(Debug, Error)]
pub enum RelayError {
    /// Error during parsing
    #[error("parse errors: {}", format_parse_errors(.0))]
    Parse(Vec<ParseError>),

    /// Error resolving the requested course
    #[error("course error: {0}")]
    Course(#[from] CourseError),
}

impl From<Vec<ParseError>> for RelayError {
    fn from(errors: Vec<ParseError>) -> Self {
        RelayError::Parse(errors)
    }
}

fn format_parse_errors(errors: &[ParseError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Parse notation source into a set of resolved courses
pub fn parse_courses(source: &str) -> Result<CourseSet, RelayError> {
    let file = parser::parse(source)?;
    Ok(CourseSet::from_ast(&file)?)
}

/// Parse the source, pick a course and compute the full relay plan
///
/// With `course_name` of `None` the first declared course is used.
///
/// # Example
///
/// ```rust
/// use relay_variations::{plan, RelaySettings};
///
/// let source = r#"
///     course short { start 31 fork { 32 | 33 } 36 finish }
///     course long  { start 31 loop { 40 | 41 | 42 } 36 finish }
/// "#;
///
/// let relay = plan(source, Some("long"), &RelaySettings::new(1, 6, 3)).unwrap();
/// assert_eq!(relay.total_possible_paths(), 6);
/// ```
pub fn plan(
    source: &str,
    course_name: Option<&str>,
    settings: &RelaySettings,
) -> Result<RelayVariations, RelayError> {
    let courses = parse_courses(source)?;
    let course = match course_name {
        Some(name) => courses
            .course(name)
            .ok_or_else(|| CourseError::unknown(name, courses.names()))?,
        None => courses.first().ok_or(CourseError::NoCourses)?,
    };
    Ok(RelayVariations::new(course, settings))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_first_course_by_default() {
        let relay = plan(
            "course a { 31 fork { 32 | 33 } 36 } course b { 31 loop { 32 | 33 } 36 }",
            None,
            &RelaySettings::new(1, 2, 2),
        )
        .unwrap();
        assert_eq!(relay.total_possible_paths(), 2);
    }

    #[test]
    fn test_plan_named_course() {
        let relay = plan(
            "course a { 31 fork { 32 | 33 } 36 } course b { 31 loop { 32 | 33 } 36 }",
            Some("b"),
            &RelaySettings::new(1, 2, 2),
        )
        .unwrap();
        assert_eq!(relay.total_possible_paths(), 2);
        // Loops run every branch, so code strings are two letters long
        assert_eq!(relay.variation(1, 0).code_string.len(), 2);
    }

    #[test]
    fn test_plan_unknown_course_error() {
        let result = plan(
            "course a { 31 }",
            Some("missing"),
            &RelaySettings::new(1, 2, 2),
        );
        let err = result.unwrap_err();
        assert!(matches!(
            err,
            RelayError::Course(CourseError::UnknownCourse { .. })
        ));
        assert!(err.to_string().contains("available: a"));
    }

    #[test]
    fn test_plan_parse_error() {
        let result = plan("course broken {", None, &RelaySettings::new(1, 2, 2));
        assert!(matches!(result, Err(RelayError::Parse(_))));
    }
}
