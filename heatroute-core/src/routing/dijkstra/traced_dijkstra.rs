use std::{collections::BinaryHeap, time::Instant};

use fixedbitset::FixedBitSet;
use hashbrown::HashMap;
use petgraph::{
    graph::{EdgeIndex, EdgeReference, NodeIndex},
    visit::EdgeRef,
};

use super::state::State;
use crate::routing::Path;
use crate::model::{StreetEdge, StreetGraph};

/// Number of settled nodes between two deadline checks
const DEADLINE_CHECK_INTERVAL: usize = 1024;

#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    Found(Path),
    Unreachable,
    DeadlineExceeded,
}

/// Dijkstra's algorithm from `start` to `target` under an arbitrary
/// non-negative edge weight. Returns the traversed nodes together with
/// the edge chosen for every hop.
///
/// Among equal tentative costs the lowest node index is settled first and
/// a node keeps its first predecessor unless a strictly cheaper one is
/// found, so repeated searches on the same input yield the same path.
pub(crate) fn dijkstra_path<F>(
    graph: &StreetGraph,
    start: NodeIndex,
    target: NodeIndex,
    weight: F,
    deadline: Option<Instant>,
) -> SearchOutcome
where
    F: Fn(EdgeReference<'_, StreetEdge>) -> f64,
{
    // Estimate capacity based on graph size (adjust as needed)
    let estimated_nodes = graph.node_count().min(1000);
    let mut distances: HashMap<NodeIndex, f64> = HashMap::with_capacity(estimated_nodes);
    let mut predecessors: HashMap<NodeIndex, (NodeIndex, EdgeIndex)> =
        HashMap::with_capacity(estimated_nodes);
    let mut settled = FixedBitSet::with_capacity(graph.node_count());
    let mut heap = BinaryHeap::with_capacity(estimated_nodes / 4);

    // Start node has distance 0
    heap.push(State {
        cost: 0.0,
        node: start,
    });
    distances.insert(start, 0.0);

    let mut settled_count = 0usize;
    let mut reached = false;

    while let Some(State { cost, node }) = heap.pop() {
        if settled.put(node.index()) {
            // Stale heap entry, node already settled with a better cost
            continue;
        }

        if node == target {
            reached = true;
            break;
        }

        settled_count += 1;
        if settled_count % DEADLINE_CHECK_INTERVAL == 0
            && let Some(deadline) = deadline
            && Instant::now() >= deadline
        {
            return SearchOutcome::DeadlineExceeded;
        }

        // Examine neighbors
        for edge in graph.edges(node) {
            let next = edge.target();
            if settled.contains(next.index()) {
                continue;
            }
            let next_cost = cost + weight(edge);

            // Add or update distance if better using Entry API
            match distances.entry(next) {
                hashbrown::hash_map::Entry::Vacant(entry) => {
                    entry.insert(next_cost);
                    heap.push(State {
                        cost: next_cost,
                        node: next,
                    });
                    predecessors.insert(next, (node, edge.id()));
                }
                hashbrown::hash_map::Entry::Occupied(mut entry) => {
                    if next_cost < *entry.get() {
                        *entry.get_mut() = next_cost;
                        heap.push(State {
                            cost: next_cost,
                            node: next,
                        });
                        predecessors.insert(next, (node, edge.id()));
                    }
                }
            }
        }
    }

    if !reached {
        return SearchOutcome::Unreachable;
    }

    // Follow predecessors backward from target to start
    let mut nodes = vec![target];
    let mut edges = Vec::new();
    let mut current = target;
    while current != start {
        match predecessors.get(&current) {
            Some(&(prev, edge)) => {
                nodes.push(prev);
                edges.push(edge);
                current = prev;
            }
            None => return SearchOutcome::Unreachable,
        }
    }
    nodes.reverse();
    edges.reverse();

    SearchOutcome::Found(Path::new(nodes, edges))
}
