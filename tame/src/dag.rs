//! Directed acyclic graph over opaque keys.
//!
//! A [`Dag`] stores, for every registered key, an optional payload plus the
//! ordered list of its input and output keys. It knows nothing about what the
//! keys mean: the type registry uses it for "is-a" edges, renderers use it to lay
//! out nodes by rank.
//!
//! Ordering is always insertion order (nodes and edges alike), so every query
//! below is deterministic across runs.
//!
//! # Acyclicity
//! No cycle check is performed when edges are inserted; keeping the graph acyclic
//! is the caller's obligation. Traversals stay finite on cyclic input, but ranks
//! are then meaningless.
use std::{
    collections::{HashSet, VecDeque},
    hash::Hash,
    iter::FusedIterator,
    sync::OnceLock,
};

use indexmap::IndexMap;
use log::{debug, trace};

/// Which edge list a traversal follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Follow input edges (towards ancestors).
    Inputs,
    /// Follow output edges (towards descendants).
    Outputs,
}

/// Generic node/edge store.
///
/// ```
/// use tame::dag::Dag;
///
/// let mut dag: Dag<&str, ()> = Dag::new();
/// dag.add_input("b", "a").add_input("c", "b");
///
/// assert_eq!(dag.ancestors(&"c").collect::<Vec<_>>(), vec!["b", "a"]);
/// assert_eq!(dag.descendants(&"a").collect::<Vec<_>>(), vec!["b", "c"]);
/// assert_eq!(dag.ranks().get(&"c"), Some(&2));
/// ```
#[derive(Debug, Clone)]
pub struct Dag<K, T> {
    nodes: IndexMap<K, Option<T>>,
    inputs: IndexMap<K, Vec<K>>,
    outputs: IndexMap<K, Vec<K>>,
    ranks: OnceLock<IndexMap<K, usize>>,
}

impl<K, T> Default for Dag<K, T> {
    fn default() -> Self {
        Self {
            nodes: IndexMap::new(),
            inputs: IndexMap::new(),
            outputs: IndexMap::new(),
            ranks: OnceLock::new(),
        }
    }
}

impl<K: Clone + Eq + Hash, T> Dag<K, T> {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    fn invalidate(&mut self) {
        self.ranks.take();
    }

    /// Number of registered nodes.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[inline]
    pub fn contains(&self, key: &K) -> bool {
        self.nodes.contains_key(key)
    }

    /// Registered keys, in registration order.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.nodes.keys()
    }

    /// Payload associated with `key`, if the node exists and carries one.
    pub fn node(&self, key: &K) -> Option<&T> {
        self.nodes.get(key).and_then(Option::as_ref)
    }

    pub fn node_mut(&mut self, key: &K) -> Option<&mut T> {
        self.nodes.get_mut(key).and_then(Option::as_mut)
    }

    /// Registers `key` if absent. When `value` is `Some`, the payload is
    /// (over)written even if the node already existed.
    pub fn set_node(&mut self, key: K, value: Option<T>) -> &mut Self {
        if self.nodes.contains_key(&key) {
            if value.is_some() {
                self.nodes.insert(key, value);
            }
        } else {
            self.inputs.insert(key.clone(), Vec::new());
            self.outputs.insert(key.clone(), Vec::new());
            self.nodes.insert(key, value);
            self.invalidate();
        }
        self
    }

    /// Keys feeding into `key` (empty for unknown keys).
    pub fn inputs(&self, key: &K) -> &[K] {
        self.inputs.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Keys fed by `key` (empty for unknown keys).
    pub fn outputs(&self, key: &K) -> &[K] {
        self.outputs.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    #[inline]
    pub fn edges(&self, key: &K, direction: Direction) -> &[K] {
        match direction {
            Direction::Inputs => self.inputs(key),
            Direction::Outputs => self.outputs(key),
        }
    }

    /// Adds `input` as an input of `node`, registering both keys when needed.
    ///
    /// Duplicate calls create duplicate edges.
    pub fn add_input(&mut self, node: K, input: K) -> &mut Self {
        self.set_node(node.clone(), None);
        self.set_node(input.clone(), None);
        self.inputs
            .entry(node.clone())
            .or_default()
            .push(input.clone());
        self.outputs.entry(input).or_default().push(node);
        self.invalidate();
        self
    }

    pub fn add_inputs(&mut self, node: K, inputs: impl IntoIterator<Item = K>) -> &mut Self {
        for input in inputs {
            self.add_input(node.clone(), input);
        }
        self
    }

    /// Adds `output` as an output of `node`; same as `add_input(output, node)`.
    pub fn add_output(&mut self, node: K, output: K) -> &mut Self {
        self.add_input(output, node)
    }

    pub fn add_outputs(&mut self, node: K, outputs: impl IntoIterator<Item = K>) -> &mut Self {
        for output in outputs {
            self.add_output(node.clone(), output);
        }
        self
    }

    /// Removes every input edge of `node`, keeping the mirrored output lists
    /// consistent.
    pub fn clear_inputs(&mut self, node: &K) -> &mut Self {
        let previous = self
            .inputs
            .get_mut(node)
            .map(std::mem::take)
            .unwrap_or_default();

        for input in previous {
            if let Some(outputs) = self.outputs.get_mut(&input) {
                if let Some(position) = outputs.iter().position(|key| key == node) {
                    outputs.remove(position);
                }
            }
        }

        self.invalidate();
        self
    }

    /// Replaces the inputs of `node` by `inputs`.
    pub fn set_inputs(&mut self, node: K, inputs: impl IntoIterator<Item = K>) -> &mut Self {
        self.set_node(node.clone(), None);
        self.clear_inputs(&node);
        self.add_inputs(node, inputs)
    }

    /// Drops every node and edge.
    pub fn reset(&mut self) -> &mut Self {
        self.nodes.clear();
        self.inputs.clear();
        self.outputs.clear();
        self.invalidate();
        self
    }

    /// Lazily iterate over every node reachable from `key` through input edges.
    ///
    /// Direct inputs come first, then the ancestors of each input, depth-first.
    /// Each node is yielded once.
    pub fn ancestors(&self, key: &K) -> Traversal<'_, K, T> {
        Traversal::new(self, key.clone(), Direction::Inputs)
    }

    /// Lazily iterate over every node reachable from `key` through output edges,
    /// in the same order as [`Self::ancestors`]. Each node is yielded once, even
    /// across diamond-shaped subgraphs.
    pub fn descendants(&self, key: &K) -> Traversal<'_, K, T> {
        Traversal::new(self, key.clone(), Direction::Outputs)
    }

    /// Shortest number of input edges from `key` to each of its ancestors.
    ///
    /// `key` itself is included at distance 0. The map is ordered by
    /// breadth-first discovery.
    pub fn distances(&self, key: &K) -> IndexMap<K, usize> {
        let mut distances = IndexMap::new();
        if !self.contains(key) {
            return distances;
        }

        let mut queue = VecDeque::from([(key.clone(), 0usize)]);
        distances.insert(key.clone(), 0);
        while let Some((current, distance)) = queue.pop_front() {
            for input in self.inputs(&current) {
                if !distances.contains_key(input) {
                    distances.insert(input.clone(), distance + 1);
                    queue.push_back((input.clone(), distance + 1));
                }
            }
        }

        distances
    }

    fn compute_ranks(&self) -> IndexMap<K, usize> {
        let mut ranks: IndexMap<K, usize> = self.nodes.keys().map(|key| (key.clone(), 0)).collect();

        // Longest input chain is bounded by the node count on acyclic graphs.
        let mut rounds = 0;
        loop {
            let mut changed = false;
            for (index, key) in self.nodes.keys().enumerate() {
                let rank = self
                    .inputs(key)
                    .iter()
                    .filter_map(|input| ranks.get(input))
                    .max()
                    .map_or(0, |rank| rank + 1);

                if let Some((_, slot)) = ranks.get_index_mut(index) {
                    if *slot != rank {
                        *slot = rank;
                        changed = true;
                    }
                }
            }

            rounds += 1;
            if !changed {
                break;
            }
            if rounds > self.nodes.len() {
                debug!("Rank computation did not converge after {rounds} rounds, graph has a cycle");
                break;
            }
        }

        trace!("Ranks converged after {rounds} rounds over {} nodes", self.nodes.len());
        ranks.sort_by(|_, a, _, b| a.cmp(b));
        ranks
    }

    /// Rank of every node: the length of the longest input chain reaching it.
    ///
    /// Nodes are ordered by ascending rank, ties keep registration order. The
    /// result is memoized until the graph is next mutated.
    pub fn ranks(&self) -> &IndexMap<K, usize> {
        self.ranks.get_or_init(|| self.compute_ranks())
    }

    /// Every node's full descendant set, each ordered by ascending rank.
    ///
    /// Uses [`Self::ranks`] when `ranks` is `None`. The result is quadratic in
    /// the node count on dense graphs.
    pub fn successors(&self, ranks: Option<&IndexMap<K, usize>>) -> IndexMap<K, Vec<K>> {
        let ranks = ranks.unwrap_or_else(|| self.ranks());
        ranks
            .keys()
            .map(|node| {
                let mut descendants: Vec<K> = self.descendants(node).collect();
                descendants.sort_by_key(|key| ranks.get(key).copied().unwrap_or_default());
                (node.clone(), descendants)
            })
            .collect()
    }
}

struct Frame<K> {
    node: K,
    emit: usize,
    descend: usize,
}

impl<K> Frame<K> {
    fn new(node: K) -> Self {
        Self {
            node,
            emit: 0,
            descend: 0,
        }
    }
}

/// Lazy depth-first walk over one edge direction of a [`Dag`].
///
/// For each visited node, its direct neighbours are yielded first, then the walk
/// descends into each neighbour in edge order. Calling [`Dag::ancestors`] or
/// [`Dag::descendants`] again restarts from the root.
pub struct Traversal<'a, K, T> {
    dag: &'a Dag<K, T>,
    direction: Direction,
    stack: Vec<Frame<K>>,
    seen: HashSet<K>,
    expanded: HashSet<K>,
}

impl<'a, K: Clone + Eq + Hash, T> Traversal<'a, K, T> {
    fn new(dag: &'a Dag<K, T>, root: K, direction: Direction) -> Self {
        let mut expanded = HashSet::new();
        expanded.insert(root.clone());
        Self {
            dag,
            direction,
            stack: vec![Frame::new(root)],
            seen: HashSet::new(),
            expanded,
        }
    }
}

impl<K: Clone + Eq + Hash, T> Iterator for Traversal<'_, K, T> {
    type Item = K;

    fn next(&mut self) -> Option<K> {
        let dag = self.dag;
        loop {
            let frame = self.stack.last_mut()?;
            let edges = dag.edges(&frame.node, self.direction);

            if let Some(next) = edges.get(frame.emit) {
                frame.emit += 1;
                if self.seen.insert(next.clone()) {
                    return Some(next.clone());
                }
                continue;
            }

            if let Some(next) = edges.get(frame.descend) {
                frame.descend += 1;
                if self.expanded.insert(next.clone()) {
                    self.stack.push(Frame::new(next.clone()));
                }
                continue;
            }

            self.stack.pop();
        }
    }
}

impl<K: Clone + Eq + Hash, T> FusedIterator for Traversal<'_, K, T> {}

#[cfg(test)]
mod tests {
    use super::*;

    /// a -> b -> d, a -> c -> d (inputs point upwards: d has inputs b and c).
    fn diamond() -> Dag<&'static str, u32> {
        let mut dag = Dag::new();
        dag.set_node("a", Some(1));
        dag.add_input("b", "a");
        dag.add_input("c", "a");
        dag.add_inputs("d", ["b", "c"]);
        dag
    }

    #[test]
    fn set_node_registers_once_and_overwrites_payload() {
        let mut dag: Dag<u32, &str> = Dag::new();
        dag.set_node(1, Some("one"));
        dag.set_node(1, None);
        assert_eq!(dag.node(&1), Some(&"one"));

        dag.set_node(1, Some("uno"));
        assert_eq!(dag.node(&1), Some(&"uno"));
        assert_eq!(dag.len(), 1);
    }

    #[test]
    fn add_input_auto_registers_and_mirrors_edges() {
        let mut dag: Dag<u32, ()> = Dag::new();
        dag.add_input(2, 1);
        assert!(dag.contains(&1) && dag.contains(&2));
        assert_eq!(dag.inputs(&2), &[1]);
        assert_eq!(dag.outputs(&1), &[2]);

        dag.add_output(2, 3);
        assert_eq!(dag.inputs(&3), &[2]);
        assert_eq!(dag.keys().copied().collect::<Vec<_>>(), vec![2, 1, 3]);
    }

    #[test]
    fn duplicate_edges_are_kept() {
        let mut dag: Dag<u32, ()> = Dag::new();
        dag.add_input(2, 1).add_input(2, 1);
        assert_eq!(dag.inputs(&2), &[1, 1]);
        // Traversals still yield each node once.
        assert_eq!(dag.ancestors(&2).collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn ancestors_yield_parents_first_without_duplicates() {
        let dag = diamond();
        assert_eq!(dag.ancestors(&"d").collect::<Vec<_>>(), vec!["b", "c", "a"]);
        assert_eq!(dag.ancestors(&"a").count(), 0);
        assert_eq!(dag.ancestors(&"missing").count(), 0);
    }

    #[test]
    fn descendants_are_deduplicated_on_diamonds() {
        let dag = diamond();
        assert_eq!(dag.descendants(&"a").collect::<Vec<_>>(), vec!["b", "c", "d"]);
    }

    #[test]
    fn traversal_can_be_partially_consumed_and_restarted() {
        let dag = diamond();
        let mut walk = dag.ancestors(&"d");
        assert_eq!(walk.next(), Some("b"));
        drop(walk);
        assert_eq!(dag.ancestors(&"d").next(), Some("b"));
    }

    #[test]
    fn traversal_terminates_on_cycles() {
        let mut dag: Dag<u32, ()> = Dag::new();
        dag.add_input(1, 2).add_input(2, 1);
        assert_eq!(dag.ancestors(&1).collect::<Vec<_>>(), vec![2, 1]);
    }

    #[test]
    fn ranks_follow_longest_chain_and_keep_ties_stable() {
        let mut dag = diamond();
        dag.add_input("e", "a");
        dag.add_input("e", "d");
        dag.set_node("z", None);

        let ranks = dag.ranks();
        assert_eq!(
            ranks.iter().map(|(k, r)| (*k, *r)).collect::<Vec<_>>(),
            vec![("a", 0), ("z", 0), ("b", 1), ("c", 1), ("d", 2), ("e", 3)]
        );
    }

    #[test]
    fn ranks_are_recomputed_after_mutation() {
        let mut dag: Dag<u32, ()> = Dag::new();
        dag.add_input(2, 1);
        assert_eq!(dag.ranks().get(&2), Some(&1));
        dag.add_input(1, 0);
        assert_eq!(dag.ranks().get(&2), Some(&2));
    }

    #[test]
    fn successors_are_ordered_by_rank() {
        let mut dag: Dag<u32, ()> = Dag::new();
        // 0 -> 3 directly and 0 -> 1 -> 2 -> 3
        dag.add_input(3, 0);
        dag.add_input(1, 0);
        dag.add_input(2, 1);
        dag.add_input(3, 2);

        let successors = dag.successors(None);
        assert_eq!(successors.get(&0), Some(&vec![1, 2, 3]));
        assert_eq!(successors.get(&3), Some(&vec![]));
        assert_eq!(successors.keys().copied().collect::<Vec<_>>(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn distances_are_shortest_paths() {
        let mut dag = diamond();
        dag.add_input("d", "a");
        let distances = dag.distances(&"d");
        assert_eq!(distances.get(&"d"), Some(&0));
        assert_eq!(distances.get(&"a"), Some(&1));
        assert_eq!(distances.get(&"b"), Some(&1));
    }

    #[test]
    fn clear_and_set_inputs_keep_outputs_consistent() {
        let mut dag = diamond();
        dag.clear_inputs(&"d");
        assert!(dag.inputs(&"d").is_empty());
        assert!(dag.outputs(&"b").is_empty());
        assert!(dag.outputs(&"c").is_empty());

        dag.set_inputs("d", ["a"]);
        assert_eq!(dag.inputs(&"d"), &["a"]);
        assert_eq!(dag.outputs(&"a"), &["b", "c", "d"]);

        dag.reset();
        assert!(dag.is_empty());
        assert!(dag.ranks().is_empty());
    }
}
