//! Relay settings and fixed branch assignments
//!
//! Settings can be built in code or loaded from a TOML file:
//!
//! ```toml
//! first-team = 1
//! teams = 20
//! legs = 6
//!
//! [fixed-branches]
//! A = [1, 3]
//! ```
//!
//! Leg numbers are 1-based in the file and in all user-facing text; the API
//! uses 0-based legs.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur loading settings from a file
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse settings TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid settings: {0}")]
    Invalid(String),
}

/// User pins forcing a leg onto a branch wherever that branch's fork is run
///
/// Legs are 0-based and stored as `i32` so out-of-range input (including
/// negatives) survives long enough for the validator to report it. Mutated
/// only through `add_branch_assignment`; the validator returns a fresh
/// normalized instance instead of editing its input.
#[derive(Debug, Clone, Default)]
pub struct FixedBranchAssignments {
    legs_by_branch: BTreeMap<char, Vec<i32>>,
}

impl FixedBranchAssignments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pin `leg` to `branch`, preserving declaration order within the branch
    pub fn add_branch_assignment(&mut self, branch: char, leg: i32) {
        self.legs_by_branch.entry(branch).or_default().push(leg);
    }

    pub fn branch_is_fixed(&self, branch: char) -> bool {
        self.legs_by_branch.contains_key(&branch)
    }

    /// Legs pinned to `branch`, in declaration order
    pub fn fixed_legs_for_branch(&self, branch: char) -> &[i32] {
        self.legs_by_branch
            .get(&branch)
            .map(|legs| legs.as_slice())
            .unwrap_or(&[])
    }

    pub fn branches(&self) -> impl Iterator<Item = char> + '_ {
        self.legs_by_branch.keys().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.legs_by_branch.is_empty()
    }
}

impl PartialEq for FixedBranchAssignments {
    fn eq(&self, other: &Self) -> bool {
        // Value equality: insertion order of legs is irrelevant
        if self.legs_by_branch.len() != other.legs_by_branch.len() {
            return false;
        }
        self.legs_by_branch.iter().all(|(branch, legs)| {
            match other.legs_by_branch.get(branch) {
                Some(other_legs) => {
                    let mut lhs = legs.clone();
                    let mut rhs = other_legs.clone();
                    lhs.sort_unstable();
                    rhs.sort_unstable();
                    lhs == rhs
                }
                None => false,
            }
        })
    }
}

impl Eq for FixedBranchAssignments {}

/// Input configuration for one relay
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelaySettings {
    pub first_team_number: u32,
    pub number_of_teams: u32,
    pub number_of_legs: usize,
    pub fixed_branches: FixedBranchAssignments,
}

impl RelaySettings {
    pub fn new(first_team_number: u32, number_of_teams: u32, number_of_legs: usize) -> Self {
        Self {
            first_team_number,
            number_of_teams,
            number_of_legs,
            fixed_branches: FixedBranchAssignments::new(),
        }
    }

    /// Set the fixed branch assignments
    pub fn with_fixed_branches(mut self, fixed: FixedBranchAssignments) -> Self {
        self.fixed_branches = fixed;
        self
    }

    pub fn last_team_number(&self) -> u32 {
        self.first_team_number + self.number_of_teams - 1
    }

    /// Load settings from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Load settings from TOML text
    pub fn from_toml(content: &str) -> Result<Self, SettingsError> {
        let parsed: TomlSettings = toml::from_str(content)?;
        if parsed.teams == 0 {
            return Err(SettingsError::Invalid("teams must be at least 1".into()));
        }
        if parsed.legs == 0 {
            return Err(SettingsError::Invalid("legs must be at least 1".into()));
        }

        let mut fixed = FixedBranchAssignments::new();
        if let Some(branches) = parsed.fixed_branches {
            for (branch, legs) in branches {
                let mut chars = branch.chars();
                let (Some(letter), None) = (chars.next(), chars.next()) else {
                    return Err(SettingsError::Invalid(format!(
                        "branch key '{}' must be a single letter",
                        branch
                    )));
                };
                for leg in legs {
                    // 1-based in the file; invalid values are kept for the
                    // validator to report
                    fixed.add_branch_assignment(letter, leg - 1);
                }
            }
        }

        Ok(RelaySettings {
            first_team_number: parsed.first_team,
            number_of_teams: parsed.teams,
            number_of_legs: parsed.legs,
            fixed_branches: fixed,
        })
    }
}

#[derive(Deserialize)]
struct TomlSettings {
    #[serde(rename = "first-team", default = "default_first_team")]
    first_team: u32,
    teams: u32,
    legs: usize,
    #[serde(rename = "fixed-branches")]
    fixed_branches: Option<BTreeMap<String, Vec<i32>>>,
}

fn default_first_team() -> u32 {
    1
}
