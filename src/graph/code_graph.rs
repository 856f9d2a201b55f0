//! In-memory adjacency-list implementation of [`GraphHandle`].
//!
//! This is the reference concrete backend shipped with the crate so the
//! binary runs end-to-end without a third-party graph database. Any other
//! backend (a real code-graph store, a test mock) just implements the same
//! trait.

use petgraph::graph::DiGraph;
use rustc_hash::FxHashMap;

use super::{GraphHandle, NodeId};

pub struct CodeGraph {
    graph: DiGraph<(), ()>,
    index: FxHashMap<(String, u32), NodeId>,
}

impl CodeGraph {
    pub fn builder() -> CodeGraphBuilder {
        CodeGraphBuilder::default()
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }
}

impl GraphHandle for CodeGraph {
    fn locate(&self, file: &str, line: u32) -> Option<NodeId> {
        self.index.get(&(file.to_string(), line)).copied()
    }

    fn neighbors(&self, node: NodeId) -> Vec<NodeId> {
        let idx = petgraph::graph::NodeIndex::new(node.0 as usize);
        let mut out: Vec<NodeId> = self
            .graph
            .neighbors(idx)
            .map(|n| NodeId(n.index() as u32))
            .collect();
        // `neighbors()` must be deterministic; petgraph returns insertion
        // order reversed, so sort by the underlying node index for a stable,
        // reproducible order across runs.
        out.sort_unstable();
        out
    }
}

/// Builds a [`CodeGraph`] one node/edge at a time.
#[derive(Default)]
pub struct CodeGraphBuilder {
    graph: DiGraph<(), ()>,
    index: FxHashMap<(String, u32), NodeId>,
}

impl CodeGraphBuilder {
    /// Insert a node at `(file, line)`, returning its id (idempotent: a
    /// second call with the same key returns the existing id).
    pub fn node(&mut self, file: &str, line: u32) -> NodeId {
        if let Some(id) = self.index.get(&(file.to_string(), line)) {
            return *id;
        }
        let idx = self.graph.add_node(());
        let id = NodeId(idx.index() as u32);
        self.index.insert((file.to_string(), line), id);
        id
    }

    pub fn edge(&mut self, from: NodeId, to: NodeId) {
        let from = petgraph::graph::NodeIndex::new(from.0 as usize);
        let to = petgraph::graph::NodeIndex::new(to.0 as usize);
        if self.graph.find_edge(from, to).is_none() {
            self.graph.add_edge(from, to, ());
        }
    }

    pub fn build(self) -> CodeGraph {
        CodeGraph {
            graph: self.graph,
            index: self.index,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locate_resolves_by_file_and_line() {
        let mut b = CodeGraph::builder();
        let a = b.node("a.rs", 10);
        let other = b.node("b.rs", 10);
        let graph = b.build();

        assert_eq!(graph.locate("a.rs", 10), Some(a));
        assert_eq!(graph.locate("b.rs", 10), Some(other));
        assert_ne!(a, other);
        assert_eq!(graph.locate("a.rs", 99), None);
    }

    #[test]
    fn neighbors_are_deterministic() {
        let mut b = CodeGraph::builder();
        let n10 = b.node("a.rs", 10);
        let n20 = b.node("a.rs", 20);
        let n50 = b.node("a.rs", 50);
        b.edge(n10, n50);
        b.edge(n10, n20);
        let graph = b.build();

        let first = graph.neighbors(n10);
        let second = graph.neighbors(n10);
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
    }

    #[test]
    fn duplicate_node_insert_is_idempotent() {
        let mut b = CodeGraph::builder();
        let a = b.node("a.rs", 10);
        let a2 = b.node("a.rs", 10);
        assert_eq!(a, a2);
        assert_eq!(b.build().node_count(), 1);
    }
}
