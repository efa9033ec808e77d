//! Fork graph for one course
//!
//! Built once from the parsed notation and read-only afterwards. Forks live in
//! an arena in discovery order; branch letters are handed out during the same
//! traversal, so they are stable for the life of the topology.

use crate::parser::ast::{CourseDecl, Element, Identifier, Spanned};
use crate::settings::FixedBranchAssignments;

/// Index into the fork arena
pub type ForkId = usize;

/// One element of a resolved course sequence
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Control(Identifier),
    Fork(ForkId),
}

/// A fork or loop in the course graph
#[derive(Debug, Clone)]
pub struct Fork {
    /// Control the fork hangs off; loops return here after each branch
    pub anchor: Option<Identifier>,
    pub is_loop: bool,
    /// Branch letters, one per branch
    pub codes: Vec<char>,
    /// Resolved sub-sequence of each branch
    pub branches: Vec<Vec<Node>>,
    /// Next fork after the rejoin point, at the same nesting level
    pub next: Option<ForkId>,
    /// First fork inside each branch, if any
    pub branch_first: Vec<Option<ForkId>>,
    /// Containing fork and branch index, for nested forks
    pub parent: Option<(ForkId, usize)>,
}

/// Immutable fork graph for one course
#[derive(Debug, Clone)]
pub struct Topology {
    pub sequence: Vec<Node>,
    pub forks: Vec<Fork>,
    pub first_fork: Option<ForkId>,
}

impl Topology {
    /// Build the fork graph from a parsed course declaration
    pub fn build(course: &CourseDecl) -> Self {
        let mut builder = Builder {
            forks: Vec::new(),
            next_code: b'A',
        };
        let (sequence, first_fork) = builder.build_sequence(&course.elements, None);
        Topology {
            sequence,
            forks: builder.forks,
            first_fork,
        }
    }

    /// Compute per-fork leg counts, fixed-leg bookkeeping, branch warnings and
    /// the total number of distinct paths, for one leg count and fixed set.
    ///
    /// The fixed set must already be validated; raw user input goes through
    /// `validate_fixed_branches` first.
    pub fn scan(&self, number_of_legs: usize, fixed: &FixedBranchAssignments) -> ScanInfo {
        let mut info = ScanInfo {
            legs_here: vec![0; self.forks.len()],
            fixed_legs: self
                .forks
                .iter()
                .map(|_| vec![None; number_of_legs])
                .collect(),
            fixed_branches: self
                .forks
                .iter()
                .map(|f| vec![false; f.codes.len()])
                .collect(),
            non_fixed_codes: self.forks.iter().map(|f| f.codes.clone()).collect(),
            warnings: Vec::new(),
            total_paths: 0,
        };
        info.total_paths =
            self.scan_fork(self.first_fork, number_of_legs, 1, number_of_legs, fixed, &mut info);
        info
    }

    fn scan_fork(
        &self,
        fork: Option<ForkId>,
        num_legs_here: usize,
        total_to_here: u64,
        number_of_legs: usize,
        fixed: &FixedBranchAssignments,
        info: &mut ScanInfo,
    ) -> u64 {
        let Some(id) = fork else {
            return total_to_here;
        };
        let f = &self.forks[id];
        info.legs_here[id] = num_legs_here;

        if f.is_loop {
            // Every branch is run once; orderings multiply the path count
            let mut ways = total_to_here;
            for b in 0..f.branches.len() {
                ways *= self.scan_fork(f.branch_first[b], num_legs_here, 1, number_of_legs, fixed, info);
            }
            ways *= factorial(f.branches.len());
            return self.scan_fork(f.next, num_legs_here, ways, number_of_legs, fixed, info);
        }

        let mut num_unfixed_legs = num_legs_here;
        let mut num_non_fixed = f.codes.len();

        // Fixed assignments only apply to forks that every leg passes through
        if !fixed.is_empty() && num_legs_here == number_of_legs {
            for (b, &code) in f.codes.iter().enumerate() {
                if fixed.branch_is_fixed(code) {
                    info.non_fixed_codes[id].retain(|&c| c != code);
                    info.fixed_branches[id][b] = true;
                    for &leg in fixed.fixed_legs_for_branch(code) {
                        if leg >= 0 && (leg as usize) < number_of_legs {
                            info.fixed_legs[id][leg as usize] = Some(b);
                            num_unfixed_legs -= 1;
                        }
                    }
                    num_non_fixed -= 1;
                }
            }
        }

        let (legs_per_branch, extra) = if num_non_fixed != 0 {
            (num_unfixed_legs / num_non_fixed, num_unfixed_legs % num_non_fixed)
        } else {
            (0, 0)
        };

        if extra != 0 {
            // Legs cannot split evenly; earlier letters absorb the remainder
            let codes = info.non_fixed_codes[id].clone();
            info.warnings.push(BranchWarning {
                control: f
                    .anchor
                    .as_ref()
                    .map(|c| c.to_string())
                    .unwrap_or_else(|| "-".to_string()),
                num_more: legs_per_branch + 1,
                code_more: codes[..extra].to_vec(),
                num_less: legs_per_branch,
                code_less: codes[extra..].to_vec(),
            });
        }

        let mut ways = 0;
        for (b, &code) in f.codes.iter().enumerate() {
            let legs_this_branch = if info.fixed_branches[id][b] {
                info.fixed_legs[id].iter().filter(|l| **l == Some(b)).count()
            } else {
                let pos = info.non_fixed_codes[id]
                    .iter()
                    .position(|&c| c == code)
                    .unwrap_or(usize::MAX);
                legs_per_branch + usize::from(pos < extra)
            };
            ways += self.scan_fork(
                f.branch_first[b],
                legs_this_branch,
                total_to_here,
                number_of_legs,
                fixed,
                info,
            );
        }
        self.scan_fork(f.next, num_legs_here, ways, number_of_legs, fixed, info)
    }
}

struct Builder {
    forks: Vec<Fork>,
    next_code: u8,
}

impl Builder {
    fn build_sequence(
        &mut self,
        elements: &[Spanned<Element>],
        parent: Option<(ForkId, usize)>,
    ) -> (Vec<Node>, Option<ForkId>) {
        let mut nodes = Vec::new();
        let mut first_fork = None;
        let mut last_fork: Option<ForkId> = None;
        let mut last_control: Option<Identifier> = None;

        for element in elements {
            let (is_loop, branches) = match &element.node {
                Element::Control(id) => {
                    last_control = Some(id.clone());
                    nodes.push(Node::Control(id.clone()));
                    continue;
                }
                Element::Fork(branches) => (false, branches),
                Element::Loop(branches) => (true, branches),
            };

            let id = self.forks.len();
            // Letter every sibling branch before descending so letters of one
            // fork stay contiguous
            let codes: Vec<char> = branches.iter().map(|_| self.take_code()).collect();
            self.forks.push(Fork {
                anchor: last_control.clone(),
                is_loop,
                codes,
                branches: Vec::new(),
                next: None,
                branch_first: Vec::new(),
                parent,
            });

            let mut built = Vec::with_capacity(branches.len());
            let mut firsts = Vec::with_capacity(branches.len());
            for (b, branch) in branches.iter().enumerate() {
                let (branch_nodes, branch_fork) = self.build_sequence(branch, Some((id, b)));
                built.push(branch_nodes);
                firsts.push(branch_fork);
            }
            self.forks[id].branches = built;
            self.forks[id].branch_first = firsts;

            match last_fork {
                Some(prev) => self.forks[prev].next = Some(id),
                None => first_fork = Some(id),
            }
            last_fork = Some(id);
            nodes.push(Node::Fork(id));
        }

        (nodes, first_fork)
    }

    fn take_code(&mut self) -> char {
        let code = self.next_code as char;
        self.next_code += 1;
        code
    }
}

/// Per-fork statistics for one (leg count, fixed set) combination
#[derive(Debug, Clone)]
pub struct ScanInfo {
    /// Number of legs that reach each fork
    pub legs_here: Vec<usize>,
    /// Per fork and leg: the branch this leg is pinned to, if any
    pub fixed_legs: Vec<Vec<Option<usize>>>,
    /// Per fork and branch: whether the branch carries fixed legs
    pub fixed_branches: Vec<Vec<bool>>,
    /// Per fork: letters of the branches still open to free legs
    pub non_fixed_codes: Vec<Vec<char>>,
    pub warnings: Vec<BranchWarning>,
    pub total_paths: u64,
}

/// Uneven leg split across one fork's sibling branches
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchWarning {
    /// Control code the fork hangs off
    pub control: String,
    pub num_more: usize,
    pub code_more: Vec<char>,
    pub num_less: usize,
    pub code_less: Vec<char>,
}

impl std::fmt::Display for BranchWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let join = |codes: &[char]| {
            codes
                .iter()
                .map(|c| c.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        };
        write!(
            f,
            "Control {}: branch(es) {} have {} legs but branch(es) {} have {}",
            self.control,
            join(&self.code_more),
            self.num_more,
            join(&self.code_less),
            self.num_less
        )
    }
}

pub(crate) fn factorial(n: usize) -> u64 {
    (1..=n as u64).product()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;
    use crate::settings::FixedBranchAssignments;

    fn topology(source: &str) -> Topology {
        let file = parse(source).unwrap();
        Topology::build(&file.courses[0].node)
    }

    #[test]
    fn test_letters_assigned_in_discovery_order() {
        let topo = topology(
            "course c { start 31 fork { 32 | 33 } 35 fork { 36 37 | 38 | 39 } 40 finish }",
        );
        assert_eq!(topo.forks.len(), 2);
        assert_eq!(topo.forks[0].codes, vec!['A', 'B']);
        assert_eq!(topo.forks[1].codes, vec!['C', 'D', 'E']);
    }

    #[test]
    fn test_nested_fork_letters_follow_siblings() {
        let topo = topology("course c { start 31 fork { 40 fork { 41 | 42 } | 50 } finish }");
        assert_eq!(topo.forks[0].codes, vec!['A', 'B']);
        assert_eq!(topo.forks[1].codes, vec!['C', 'D']);
        assert_eq!(topo.forks[1].parent, Some((0, 0)));
    }

    #[test]
    fn test_fork_chain_links() {
        let topo = topology("course c { 31 fork { 32 | 33 } 35 fork { 36 | 37 } 38 }");
        assert_eq!(topo.first_fork, Some(0));
        assert_eq!(topo.forks[0].next, Some(1));
        assert_eq!(topo.forks[1].next, None);
    }

    #[test]
    fn test_loop_anchor_is_preceding_control() {
        let topo = topology("course c { start 31 loop { 32 | 33 } 36 finish }");
        assert!(topo.forks[0].is_loop);
        assert_eq!(topo.forks[0].anchor, Some(Identifier::new("31")));
    }

    #[test]
    fn test_scan_splits_legs_to_nested_forks() {
        let topo = topology("course c { 31 fork { 40 fork { 41 | 42 } | 50 } 36 }");
        let info = topo.scan(6, &FixedBranchAssignments::new());
        assert_eq!(info.legs_here[0], 6);
        // Branch A takes half of the 6 legs
        assert_eq!(info.legs_here[1], 3);
    }

    #[test]
    fn test_scan_counts_loop_paths_with_factorial() {
        let topo = topology("course c { start 31 loop { 32 | 33 | 34 } 36 finish }");
        let info = topo.scan(3, &FixedBranchAssignments::new());
        assert_eq!(info.total_paths, 6);
    }

    #[test]
    fn test_uneven_split_produces_warning() {
        let topo = topology("course c { start 31 fork { 32 33 | 34 } 36 finish }");
        let info = topo.scan(5, &FixedBranchAssignments::new());
        assert_eq!(info.warnings.len(), 1);
        let warning = &info.warnings[0];
        assert_eq!(warning.control, "31");
        assert_eq!(warning.num_more, 3);
        assert_eq!(warning.code_more, vec!['A']);
        assert_eq!(warning.num_less, 2);
        assert_eq!(warning.code_less, vec!['B']);
    }

    #[test]
    fn test_even_split_produces_no_warning() {
        let topo = topology("course c { start 31 fork { 32 33 | 34 } 36 finish }");
        let info = topo.scan(6, &FixedBranchAssignments::new());
        assert!(info.warnings.is_empty());
    }

    #[test]
    fn test_fixed_branch_removed_from_free_split() {
        let topo = topology("course c { start 31 fork { 32 33 | 34 } 36 finish }");
        let mut fixed = FixedBranchAssignments::new();
        fixed.add_branch_assignment('A', 0);
        fixed.add_branch_assignment('A', 2);
        let info = topo.scan(4, &fixed);
        assert_eq!(info.fixed_legs[0], vec![Some(0), None, Some(0), None]);
        assert_eq!(info.fixed_branches[0], vec![true, false]);
        assert_eq!(info.non_fixed_codes[0], vec!['B']);
        // Two free legs over one free branch divide evenly
        assert!(info.warnings.is_empty());
    }
}
