use itertools::Itertools;
use petgraph::graph::{EdgeIndex, NodeIndex};

/// Walk through a street graph: the visited nodes in order and the edge
/// taken for each hop, so parallel edges stay distinguishable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path {
    nodes: Vec<NodeIndex>,
    edges: Vec<EdgeIndex>,
}

/// One traversed edge of a [`Path`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hop {
    pub from: NodeIndex,
    pub to: NodeIndex,
    pub edge: EdgeIndex,
}

impl Path {
    pub(crate) fn new(nodes: Vec<NodeIndex>, edges: Vec<EdgeIndex>) -> Self {
        debug_assert_eq!(nodes.len(), edges.len() + 1);
        Self { nodes, edges }
    }

    /// Path that starts and ends at `node` without moving
    pub fn trivial(node: NodeIndex) -> Self {
        Self {
            nodes: vec![node],
            edges: Vec::new(),
        }
    }

    pub fn nodes(&self) -> &[NodeIndex] {
        &self.nodes
    }

    pub fn edges(&self) -> &[EdgeIndex] {
        &self.edges
    }

    pub fn start(&self) -> NodeIndex {
        self.nodes[0]
    }

    pub fn end(&self) -> NodeIndex {
        self.nodes[self.nodes.len() - 1]
    }

    /// True when start and end coincide and no edge is traversed
    pub fn is_trivial(&self) -> bool {
        self.edges.is_empty()
    }

    /// Traversed edges with their endpoints, in path order
    pub fn hops(&self) -> impl Iterator<Item = Hop> + '_ {
        self.nodes
            .iter()
            .copied()
            .tuple_windows()
            .zip(self.edges.iter().copied())
            .map(|((from, to), edge)| Hop { from, to, edge })
    }
}
