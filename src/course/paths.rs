//! Enumeration of every distinct traversal of a course

use crate::parser::ast::Identifier;

use super::topology::{Node, Topology};

/// One concrete start-to-finish traversal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariationPath {
    /// Ordered concatenation of the chosen branch letters
    pub code_string: String,
    /// Ordered control sequence
    pub controls: Vec<Identifier>,
}

/// All distinct traversals, in lexicographic-by-choice order
pub fn enumerate_variations(topology: &Topology) -> Vec<VariationPath> {
    expand(topology, &topology.sequence)
        .into_iter()
        .map(|(code_string, controls)| VariationPath {
            code_string,
            controls,
        })
        .collect()
}

fn expand(topology: &Topology, nodes: &[Node]) -> Vec<(String, Vec<Identifier>)> {
    let mut results = vec![(String::new(), Vec::new())];
    for node in nodes {
        match node {
            Node::Control(id) => {
                for (_, controls) in &mut results {
                    controls.push(id.clone());
                }
            }
            Node::Fork(fid) => {
                let fork = &topology.forks[*fid];
                let mut alternatives: Vec<(String, Vec<Identifier>)> = Vec::new();
                if fork.is_loop {
                    for order in lex_permutations(fork.branches.len()) {
                        let mut combos = vec![(String::new(), Vec::new())];
                        for &b in &order {
                            combos = cross(&combos, &branch_alternatives(topology, fork, b));
                            // Each loop branch returns to the anchor control
                            if let Some(anchor) = &fork.anchor {
                                for (_, controls) in &mut combos {
                                    controls.push(anchor.clone());
                                }
                            }
                        }
                        alternatives.extend(combos);
                    }
                } else {
                    for b in 0..fork.branches.len() {
                        alternatives.extend(branch_alternatives(topology, fork, b));
                    }
                }
                results = cross(&results, &alternatives);
            }
        }
    }
    results
}

fn branch_alternatives(
    topology: &Topology,
    fork: &super::topology::Fork,
    branch: usize,
) -> Vec<(String, Vec<Identifier>)> {
    expand(topology, &fork.branches[branch])
        .into_iter()
        .map(|(codes, controls)| (format!("{}{}", fork.codes[branch], codes), controls))
        .collect()
}

fn cross(
    lhs: &[(String, Vec<Identifier>)],
    rhs: &[(String, Vec<Identifier>)],
) -> Vec<(String, Vec<Identifier>)> {
    let mut out = Vec::with_capacity(lhs.len() * rhs.len());
    for (left_codes, left_controls) in lhs {
        for (right_codes, right_controls) in rhs {
            let mut codes = left_codes.clone();
            codes.push_str(right_codes);
            let mut controls = left_controls.clone();
            controls.extend(right_controls.iter().cloned());
            out.push((codes, controls));
        }
    }
    out
}

/// Permutations of `0..n` in lexicographic order
pub(crate) fn lex_permutations(n: usize) -> Vec<Vec<usize>> {
    fn go(remaining: &mut Vec<usize>, current: &mut Vec<usize>, out: &mut Vec<Vec<usize>>) {
        if remaining.is_empty() {
            out.push(current.clone());
            return;
        }
        for i in 0..remaining.len() {
            let value = remaining.remove(i);
            current.push(value);
            go(remaining, current, out);
            current.pop();
            remaining.insert(i, value);
        }
    }
    let mut out = Vec::new();
    go(&mut (0..n).collect(), &mut Vec::new(), &mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::course::topology::Topology;
    use crate::parser::parse;

    fn topology(source: &str) -> Topology {
        let file = parse(source).unwrap();
        Topology::build(&file.courses[0].node)
    }

    fn code_strings(topo: &Topology) -> Vec<String> {
        enumerate_variations(topo)
            .into_iter()
            .map(|v| v.code_string)
            .collect()
    }

    #[test]
    fn test_two_way_fork() {
        let topo = topology("course c { start 31 fork { 32 33 | 34 } 36 finish }");
        assert_eq!(code_strings(&topo), vec!["A", "B"]);
    }

    #[test]
    fn test_sequential_forks_multiply() {
        let topo = topology("course c { 31 fork { 32 | 33 } 35 fork { 36 | 37 | 38 } 40 }");
        assert_eq!(
            code_strings(&topo),
            vec!["AC", "AD", "AE", "BC", "BD", "BE"]
        );
    }

    #[test]
    fn test_loop_orders() {
        let topo = topology("course c { start 31 loop { 32 | 33 | 34 } 36 finish }");
        assert_eq!(
            code_strings(&topo),
            vec!["ABC", "ACB", "BAC", "BCA", "CAB", "CBA"]
        );
    }

    #[test]
    fn test_loop_controls_return_to_anchor() {
        let topo = topology("course c { 31 loop { 32 | 33 } 36 }");
        let variations = enumerate_variations(&topo);
        let first = &variations[0];
        assert_eq!(first.code_string, "AB");
        let controls: Vec<_> = first.controls.iter().map(|c| c.as_str()).collect();
        assert_eq!(controls, vec!["31", "32", "31", "33", "31", "36"]);
    }

    #[test]
    fn test_nested_fork_codes_follow_branch_letter() {
        let topo = topology("course c { 31 fork { 40 fork { 41 | 42 } | 50 } 36 }");
        assert_eq!(code_strings(&topo), vec!["AC", "AD", "B"]);
    }

    #[test]
    fn test_lex_permutations() {
        assert_eq!(
            lex_permutations(3),
            vec![
                vec![0, 1, 2],
                vec![0, 2, 1],
                vec![1, 0, 2],
                vec![1, 2, 0],
                vec![2, 0, 1],
                vec![2, 1, 0]
            ]
        );
    }
}
