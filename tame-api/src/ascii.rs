//! ASCII rendering of a [`Dag`] laid out by rank.
//!
//! Each non-terminal rank lists its nodes, indented by rank, followed by one
//! arrow line per descendant pointing at the descendant's own column:
//!
//! ```text
//! a─┐
//!   ├─b
//!   └───▶ c
//!
//!     b─┐
//!       └─c
//! ```
use std::{fmt::Display, hash::Hash};

use indexmap::IndexMap;
use tame::{dag::Dag, types::TypeRegistry};

/// Render `dag` using each key's [`Display`] output as its label.
pub fn to_ascii<K, T>(dag: &Dag<K, T>) -> String
where
    K: Clone + Eq + Hash + Display,
{
    to_ascii_with(dag, |key| key.to_string())
}

/// Render the "is-a" graph of a type registry, labelling types by derivation key.
pub fn registry_to_ascii(types: &TypeRegistry) -> String {
    let graph = types.graph();
    to_ascii_with(&*graph, |ty| {
        graph
            .node(ty)
            .map(|ty| ty.key().to_string())
            .unwrap_or_else(|| ty.to_string())
    })
}

/// Render `dag` with custom node labels.
pub fn to_ascii_with<K, T>(dag: &Dag<K, T>, label: impl Fn(&K) -> String) -> String
where
    K: Clone + Eq + Hash,
{
    let ranks = dag.ranks();
    let Some(depth) = ranks.values().copied().max() else {
        return String::new();
    };
    let successors = dag.successors(Some(ranks));

    let labels: IndexMap<&K, String> = ranks.keys().map(|key| (key, label(key))).collect();
    let length = labels.values().map(|label| label.chars().count()).max().unwrap_or(0) + 3;
    let padded = |key: &K| format!("{:<length$}", labels.get(key).map(String::as_str).unwrap_or(""));

    let mut lines = Vec::new();
    let mut previous_rank = 0;
    for (node, following) in &successors {
        let rank = ranks.get(node).copied().unwrap_or(0);
        if rank == depth {
            break;
        }
        if rank != previous_rank {
            lines.push(String::new());
            previous_rank = rank;
        }

        let name = labels.get(node).map(String::as_str).unwrap_or("");
        lines.push(root(length, rank, name));

        let indent = length * (rank + 1);
        for (i, other) in following.iter().enumerate() {
            let other_rank = ranks.get(other).copied().unwrap_or(0);
            let target: String = arrow(length * other_rank)
                .chars()
                .chain(padded(other).chars())
                .skip(indent)
                .collect();
            let line = stem(indent, i + 1 == following.len()) + &target;
            lines.push(line.trim_end().to_string());
        }
    }

    lines.join("\n")
}

fn root(length: usize, rank: usize, name: &str) -> String {
    let fill = length.saturating_sub(name.chars().count() + 3);
    format!("{}{}{}─┐", " ".repeat(length * rank), name, "─".repeat(fill))
}

fn stem(width: usize, last: bool) -> String {
    let corner = if last { "└─" } else { "├─" };
    format!("{}{}", " ".repeat(width.saturating_sub(2)), corner)
}

fn arrow(width: usize) -> String {
    format!("{}▶ ", "─".repeat(width.saturating_sub(2)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_graph_renders_nothing() {
        let dag: Dag<&str, ()> = Dag::new();
        assert_eq!(to_ascii(&dag), "");
    }

    #[test]
    fn chain_points_at_each_rank() {
        let mut dag: Dag<&str, ()> = Dag::new();
        dag.add_input("b", "a");
        dag.add_input("c", "b");

        let expected = [
            "a─┐",
            "  ├─b",
            "  └───▶ c",
            "",
            "    b─┐",
            "      └─c",
        ]
        .join("\n");
        assert_eq!(to_ascii(&dag), expected);
    }

    #[test]
    fn siblings_use_branch_stems() {
        let mut dag: Dag<&str, ()> = Dag::new();
        dag.add_input("left", "root");
        dag.add_input("right", "root");

        let expected = ["root──┐", "      ├─left", "      └─right"].join("\n");
        assert_eq!(to_ascii(&dag), expected);
    }
}
