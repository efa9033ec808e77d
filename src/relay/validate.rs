//! Legality checks for fixed branch assignments
//!
//! The validator never fails outright: problems accumulate as user-facing
//! strings, offending entries are dropped, and everything else passes through
//! into a fresh normalized set. Leg numbers are 1-based in messages.

use crate::course::topology::{ForkId, Topology};
use crate::settings::FixedBranchAssignments;

/// Check raw fixed branch assignments against one course and leg count.
///
/// Returns the normalized set actually usable by the engine plus any problem
/// messages. The input is never mutated.
pub fn validate_fixed_branches(
    topology: &Topology,
    number_of_legs: usize,
    assignments: &FixedBranchAssignments,
) -> (FixedBranchAssignments, Vec<String>) {
    let mut result = FixedBranchAssignments::new();
    let mut errors = Vec::new();

    let scan = topology.scan(number_of_legs, &FixedBranchAssignments::new());

    // Only non-loop forks that every leg passes through may carry pins
    let eligible: Vec<bool> = topology
        .forks
        .iter()
        .enumerate()
        .map(|(id, f)| !f.is_loop && scan.legs_here[id] == number_of_legs)
        .collect();

    // What each leg provably does at each eligible fork, where known
    let mut resolved: Vec<Vec<Option<usize>>> = topology
        .forks
        .iter()
        .map(|_| vec![None; number_of_legs])
        .collect();

    for (id, fork) in topology.forks.iter().enumerate() {
        if !eligible[id] {
            continue;
        }

        // Letters in fork order, legs in declaration order; the first valid
        // assignment for a leg wins
        let mut code_for_leg: Vec<Option<char>> = vec![None; number_of_legs];
        for &code in &fork.codes {
            if !assignments.branch_is_fixed(code) {
                continue;
            }
            for &leg in assignments.fixed_legs_for_branch(code) {
                if leg < 0 || leg as usize >= number_of_legs {
                    errors.push(format!(
                        "'{}' is not a valid leg number for branch '{}'",
                        leg + 1,
                        code
                    ));
                } else if let Some(previous) = code_for_leg[leg as usize] {
                    errors.push(format!(
                        "Leg {} is assigned to both branch '{}' and branch '{}'",
                        leg + 1,
                        previous,
                        code
                    ));
                } else {
                    code_for_leg[leg as usize] = Some(code);
                }
            }
        }

        let all_legs_assigned = code_for_leg.iter().all(|c| c.is_some());
        let any_branch_fixed = fork.codes.iter().any(|&c| assignments.branch_is_fixed(c));
        let unfixed: Vec<char> = fork
            .codes
            .iter()
            .copied()
            .filter(|&c| !assignments.branch_is_fixed(c))
            .collect();

        if any_branch_fixed && !all_legs_assigned && unfixed.len() != 1 {
            // With every branch restricted the remaining legs have nowhere to
            // go; with two or more open branches no single destination can be
            // inferred. Drop the whole fork either way.
            let open = if unfixed.is_empty() {
                &fork.codes
            } else {
                &unfixed
            };
            let open = open
                .iter()
                .map(|c| c.to_string())
                .collect::<Vec<_>>()
                .join(", ");
            for (leg, code) in code_for_leg.iter().enumerate() {
                if code.is_none() {
                    errors.push(format!(
                        "Leg {} should be assigned to one of branches {}",
                        leg + 1,
                        open
                    ));
                }
            }
        } else {
            for (leg, code) in code_for_leg.iter().enumerate() {
                if let Some(code) = code {
                    result.add_branch_assignment(*code, leg as i32);
                }
            }
            // A single unfixed branch absorbs every unpinned leg, which makes
            // those legs provable too
            for leg in 0..number_of_legs {
                resolved[id][leg] = match code_for_leg[leg] {
                    Some(code) => fork.codes.iter().position(|&c| c == code),
                    None if unfixed.len() == 1 => {
                        fork.codes.iter().position(|&c| c == unfixed[0])
                    }
                    None => None,
                };
            }
        }
    }

    // A pin on a nested fork is reported only when a containing fork provably
    // routes that leg elsewhere; otherwise it is quietly unsupported
    for (id, fork) in topology.forks.iter().enumerate() {
        if eligible[id] {
            continue;
        }
        for &code in &fork.codes {
            if !assignments.branch_is_fixed(code) {
                continue;
            }
            for &leg in assignments.fixed_legs_for_branch(code) {
                if leg < 0 || leg as usize >= number_of_legs {
                    continue;
                }
                if never_reaches(topology, id, leg as usize, &resolved, &eligible) {
                    errors.push(format!(
                        "Leg {} never reaches branch '{}': it was assigned to go a different way in a containing fork.",
                        leg + 1,
                        code
                    ));
                }
            }
        }
    }

    (result, errors)
}

/// True when some containing fork pins `leg` away from the branch chain
/// leading to `target`
fn never_reaches(
    topology: &Topology,
    target: ForkId,
    leg: usize,
    resolved: &[Vec<Option<usize>>],
    eligible: &[bool],
) -> bool {
    let mut current = topology.forks[target].parent;
    while let Some((parent, branch)) = current {
        let parent_fork = &topology.forks[parent];
        if eligible[parent] && !parent_fork.is_loop {
            if let Some(assigned) = resolved[parent][leg] {
                if assigned != branch {
                    return true;
                }
            }
        }
        current = parent_fork.parent;
    }
    false
}
