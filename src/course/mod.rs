//! Course model: named courses and their fork topologies

pub mod paths;
pub mod topology;

pub use paths::{enumerate_variations, VariationPath};
pub use topology::{BranchWarning, Fork, ForkId, Node, ScanInfo, Topology};

use thiserror::Error;

use crate::parser::ast::CourseFile;

/// Errors that can occur resolving a course from a parsed file
#[derive(Debug, Error)]
pub enum CourseError {
    /// Requested course name does not exist in the file
    #[error("unknown course '{name}' (available: {})", available.join(", "))]
    UnknownCourse {
        name: String,
        available: Vec<String>,
    },

    /// Two courses in one file share a name
    #[error("duplicate course name '{0}'")]
    DuplicateCourse(String),

    /// The file declares no courses at all
    #[error("no courses declared")]
    NoCourses,
}

impl CourseError {
    /// Create an unknown course error listing what is available
    pub fn unknown(name: impl Into<String>, available: Vec<String>) -> Self {
        Self::UnknownCourse {
            name: name.into(),
            available,
        }
    }
}

/// One named course with its resolved fork graph
#[derive(Debug, Clone)]
pub struct Course {
    pub name: String,
    pub topology: Topology,
}

/// All courses declared in one file
#[derive(Debug, Clone)]
pub struct CourseSet {
    courses: Vec<Course>,
}

impl CourseSet {
    /// Resolve every declaration in a parsed file into a topology
    pub fn from_ast(file: &CourseFile) -> Result<Self, CourseError> {
        let mut courses: Vec<Course> = Vec::with_capacity(file.courses.len());
        for decl in &file.courses {
            let name = decl.node.name.node.to_string();
            if courses.iter().any(|c| c.name == name) {
                return Err(CourseError::DuplicateCourse(name));
            }
            courses.push(Course {
                name,
                topology: Topology::build(&decl.node),
            });
        }
        Ok(Self { courses })
    }

    pub fn course(&self, name: &str) -> Option<&Course> {
        self.courses.iter().find(|c| c.name == name)
    }

    pub fn first(&self) -> Option<&Course> {
        self.courses.first()
    }

    pub fn names(&self) -> Vec<String> {
        self.courses.iter().map(|c| c.name.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.courses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }
}
