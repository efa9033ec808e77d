//! The relay variation engine

mod assign;
mod validate;

pub use assign::LegPlan;
pub use validate::validate_fixed_branches;

use crate::course::paths::enumerate_variations;
use crate::course::topology::BranchWarning;
use crate::course::Course;
use crate::parser::ast::Identifier;
use crate::settings::{FixedBranchAssignments, RelaySettings};

/// One computed relay plan: every (team, leg) cell resolved to a variation.
///
/// Everything is computed at construction; the engine is immutable
/// afterwards, so identical inputs always reproduce identical plans.
#[derive(Debug)]
pub struct RelayVariations {
    first_team_number: u32,
    number_of_teams: u32,
    number_of_legs: usize,
    fixed_branches: FixedBranchAssignments,
    validation_errors: Vec<String>,
    warnings: Vec<BranchWarning>,
    total_paths: u64,
    possible_fixed: Vec<Vec<char>>,
    plans: Vec<Vec<LegPlan>>,
}

/// The resolved variation for one (team, leg) cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariationInfo<'a> {
    pub team: u32,
    /// 0-based leg index
    pub leg: usize,
    pub code_string: &'a str,
    pub controls: &'a [Identifier],
}

impl RelayVariations {
    /// Compute the full plan for one course and settings combination.
    ///
    /// Illegal fixed branch assignments never fail construction: they are
    /// dropped and reported through `validation_errors()`, and the plan is
    /// built from the normalized remainder.
    pub fn new(course: &Course, settings: &RelaySettings) -> Self {
        let topology = &course.topology;

        let (fixed, validation_errors) = if settings.fixed_branches.is_empty() {
            (FixedBranchAssignments::new(), Vec::new())
        } else {
            validate_fixed_branches(topology, settings.number_of_legs, &settings.fixed_branches)
        };

        let scan = topology.scan(settings.number_of_legs, &fixed);
        debug_assert_eq!(
            enumerate_variations(topology).len() as u64,
            scan.total_paths
        );

        let plans = assign::generate_teams(topology, &scan, settings);

        let possible_fixed = topology
            .forks
            .iter()
            .enumerate()
            .filter(|(id, f)| !f.is_loop && scan.legs_here[*id] == settings.number_of_legs)
            .map(|(_, f)| f.codes.clone())
            .collect();

        Self {
            first_team_number: settings.first_team_number,
            number_of_teams: settings.number_of_teams,
            number_of_legs: settings.number_of_legs,
            fixed_branches: fixed,
            validation_errors,
            warnings: scan.warnings,
            total_paths: scan.total_paths,
            possible_fixed,
            plans,
        }
    }

    /// The variation assigned to one team and 0-based leg.
    ///
    /// Panics if the team or leg is out of range; that is a caller bug.
    pub fn variation(&self, team: u32, leg: usize) -> VariationInfo<'_> {
        assert!(
            team >= self.first_team_number && team <= self.last_team_number(),
            "team numbers are from {} to {}",
            self.first_team_number,
            self.last_team_number()
        );
        assert!(
            leg < self.number_of_legs,
            "leg numbers are from 0 to {}",
            self.number_of_legs - 1
        );
        let plan = &self.plans[(team - self.first_team_number) as usize][leg];
        VariationInfo {
            team,
            leg,
            code_string: &plan.code_string,
            controls: &plan.controls,
        }
    }

    pub fn first_team_number(&self) -> u32 {
        self.first_team_number
    }

    pub fn last_team_number(&self) -> u32 {
        self.first_team_number + self.number_of_teams - 1
    }

    pub fn number_of_teams(&self) -> u32 {
        self.number_of_teams
    }

    pub fn number_of_legs(&self) -> usize {
        self.number_of_legs
    }

    /// Count of distinct start-to-finish traversals of the course
    pub fn total_possible_paths(&self) -> u64 {
        self.total_paths
    }

    /// Forks whose legs cannot split evenly across sibling branches
    pub fn branch_warnings(&self) -> &[BranchWarning] {
        &self.warnings
    }

    /// Problems found in the fixed branch assignments, if any
    pub fn validation_errors(&self) -> &[String] {
        &self.validation_errors
    }

    /// The normalized fixed set the plan was actually built from
    pub fn fixed_branches(&self) -> &FixedBranchAssignments {
        &self.fixed_branches
    }

    /// Letter sets of the forks that may legally carry fixed assignments
    pub fn possible_fixed_branches(&self) -> &[Vec<char>] {
        &self.possible_fixed
    }
}
