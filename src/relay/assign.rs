//! Deterministic team assignment over the fork graph
//!
//! No randomness anywhere: free legs take the least-used branch for that
//! (fork, leg) cell, tie-broken by the team's own usage of each branch and
//! then by branch order, so sibling branch counts never drift apart by more
//! than one. Loop orders come from a fixed permutation table indexed by
//! team + leg.

use crate::course::paths::lex_permutations;
use crate::course::topology::{Node, ScanInfo, Topology};
use crate::parser::ast::Identifier;
use crate::settings::RelaySettings;

/// The resolved route for one (team, leg) cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegPlan {
    pub code_string: String,
    pub controls: Vec<Identifier>,
}

/// Assign every (team, leg) cell. Indexed `[team][leg]` with teams relative
/// to the first team number.
pub(crate) fn generate_teams(
    topology: &Topology,
    scan: &ScanInfo,
    settings: &RelaySettings,
) -> Vec<Vec<LegPlan>> {
    let legs = settings.number_of_legs;
    let teams = settings.number_of_teams as usize;
    let mut state = AssignState::new(topology, legs);
    let mut plans = Vec::with_capacity(teams);

    for team in 0..teams {
        // Resets per team: each team cycles branches across its own legs
        let mut usage: Vec<Vec<u32>> = topology
            .forks
            .iter()
            .map(|f| vec![0; f.codes.len()])
            .collect();
        let mut team_plans = Vec::with_capacity(legs);
        for leg in 0..legs {
            let mut plan = LegPlan {
                code_string: String::new(),
                controls: Vec::new(),
            };
            walk(
                topology,
                scan,
                &mut state,
                &mut usage,
                team,
                leg,
                &topology.sequence,
                &mut plan,
            );
            team_plans.push(plan);
        }
        plans.push(team_plans);
    }
    plans
}

struct AssignState {
    /// Per fork and leg: how many free choices landed on each branch so far
    leg_counts: Vec<Vec<Vec<u32>>>,
    /// Per loop fork: all n! branch orders, entry i starting with branch i % n
    orders: Vec<Vec<Vec<usize>>>,
}

impl AssignState {
    fn new(topology: &Topology, legs: usize) -> Self {
        let leg_counts = topology
            .forks
            .iter()
            .map(|f| vec![vec![0; f.codes.len()]; legs])
            .collect();
        let orders = topology
            .forks
            .iter()
            .map(|f| {
                if f.is_loop {
                    loop_orders(f.branches.len())
                } else {
                    Vec::new()
                }
            })
            .collect();
        Self { leg_counts, orders }
    }
}

/// All n! branch orders arranged so that entry i starts with branch i % n.
/// Stepping through consecutive entries changes the opening branch every step
/// and exhausts every order after n! steps.
fn loop_orders(n: usize) -> Vec<Vec<usize>> {
    let rest = lex_permutations(n - 1);
    let mut orders = Vec::with_capacity(n * rest.len());
    for i in 0..n * rest.len() {
        let first = i % n;
        let remaining: Vec<usize> = (0..n).filter(|&b| b != first).collect();
        let mut order = Vec::with_capacity(n);
        order.push(first);
        order.extend(rest[i / n].iter().map(|&p| remaining[p]));
        orders.push(order);
    }
    orders
}

#[allow(clippy::too_many_arguments)]
fn walk(
    topology: &Topology,
    scan: &ScanInfo,
    state: &mut AssignState,
    usage: &mut [Vec<u32>],
    team: usize,
    leg: usize,
    nodes: &[Node],
    plan: &mut LegPlan,
) {
    for node in nodes {
        match node {
            Node::Control(id) => plan.controls.push(id.clone()),
            Node::Fork(fid) => {
                let fork = &topology.forks[*fid];
                if fork.is_loop {
                    let orders = &state.orders[*fid];
                    let order = orders[(team + leg) % orders.len()].clone();
                    for b in order {
                        plan.code_string.push(fork.codes[b]);
                        walk(topology, scan, state, usage, team, leg, &fork.branches[b], plan);
                        // Each loop branch returns to the anchor control
                        if let Some(anchor) = &fork.anchor {
                            plan.controls.push(anchor.clone());
                        }
                    }
                } else {
                    let choice = match scan.fixed_legs[*fid][leg] {
                        Some(b) => b,
                        None => {
                            let counts = &state.leg_counts[*fid][leg];
                            let mut best: Option<usize> = None;
                            for b in 0..fork.codes.len() {
                                if scan.fixed_branches[*fid][b] {
                                    continue;
                                }
                                let better = match best {
                                    None => true,
                                    Some(current) => {
                                        (counts[b], usage[*fid][b])
                                            < (counts[current], usage[*fid][current])
                                    }
                                };
                                if better {
                                    best = Some(b);
                                }
                            }
                            let b = best.unwrap_or(0);
                            state.leg_counts[*fid][leg][b] += 1;
                            b
                        }
                    };
                    usage[*fid][choice] += 1;
                    plan.code_string.push(fork.codes[choice]);
                    walk(
                        topology,
                        scan,
                        state,
                        usage,
                        team,
                        leg,
                        &fork.branches[choice],
                        plan,
                    );
                }
            }
        }
    }
}
