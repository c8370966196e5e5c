//! Street graph with a spatial index over its nodes

use std::fmt;

use geo::Point;
use hashbrown::HashMap;
use petgraph::{
    Direction,
    graph::{DiGraph, EdgeIndex, EdgeReference, Edges, NodeIndex},
};
use rstar::{RTree, primitives::GeomWithData};
use serde::{Deserialize, Serialize};

use super::components::{StreetEdge, StreetNode};
use crate::Error;

/// Node position in the R-tree, carrying its graph index
pub type IndexedPoint = GeomWithData<[f64; 2], NodeIndex>;

/// Travel mode a street graph was built for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkKind {
    Walk,
    Drive,
}

impl fmt::Display for NetworkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            NetworkKind::Walk => "walk",
            NetworkKind::Drive => "drive",
        })
    }
}

/// Directed street graph. Edges are never removed, so edge and node
/// indices stay valid for the lifetime of the graph and can key overlays.
#[derive(Clone)]
pub struct StreetGraph {
    pub kind: NetworkKind,
    pub graph: DiGraph<StreetNode, StreetEdge>,
    rtree: RTree<IndexedPoint>,
    node_ids: HashMap<i64, NodeIndex>,
}

impl fmt::Debug for StreetGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreetGraph")
            .field("kind", &self.kind)
            .field("nodes", &self.graph.node_count())
            .field("edges", &self.graph.edge_count())
            .finish_non_exhaustive()
    }
}

impl StreetGraph {
    pub fn new(kind: NetworkKind) -> Self {
        Self {
            kind,
            graph: DiGraph::new(),
            rtree: RTree::new(),
            node_ids: HashMap::new(),
        }
    }

    /// Adds a node, or returns the existing index if the id is already known
    pub fn add_node(&mut self, id: i64, geometry: Point<f64>) -> NodeIndex {
        if let Some(&index) = self.node_ids.get(&id) {
            return index;
        }
        let index = self.graph.add_node(StreetNode { id, geometry });
        self.rtree
            .insert(IndexedPoint::new([geometry.x(), geometry.y()], index));
        self.node_ids.insert(id, index);
        index
    }

    pub fn add_edge(&mut self, from: NodeIndex, to: NodeIndex, edge: StreetEdge) -> EdgeIndex {
        self.graph.add_edge(from, to, edge)
    }

    /// Outgoing edges of a node
    pub fn edges(&self, node: NodeIndex) -> Edges<'_, StreetEdge, petgraph::Directed> {
        self.graph.edges_directed(node, Direction::Outgoing)
    }

    pub fn edge_references(&self) -> impl Iterator<Item = EdgeReference<'_, StreetEdge>> {
        self.graph.edge_references()
    }

    pub fn node(&self, index: NodeIndex) -> Option<&StreetNode> {
        self.graph.node_weight(index)
    }

    pub fn edge(&self, index: EdgeIndex) -> Option<&StreetEdge> {
        self.graph.edge_weight(index)
    }

    pub fn node_by_id(&self, id: i64) -> Option<NodeIndex> {
        self.node_ids.get(&id).copied()
    }

    /// Fails with [`Error::UnknownNode`] if `index` is not a node of this graph
    pub fn check_node(&self, index: NodeIndex) -> Result<(), Error> {
        if index.index() < self.graph.node_count() {
            Ok(())
        } else {
            Err(Error::UnknownNode {
                network: self.kind,
                node: index.index(),
            })
        }
    }

    /// Nearest node by planar distance in lon/lat space
    pub fn nearest_node(&self, point: &Point<f64>) -> Option<NodeIndex> {
        self.rtree
            .nearest_neighbor(&[point.x(), point.y()])
            .map(|indexed| indexed.data)
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }
}
