//! Criterion benchmarks for cost assignment and the evacuation searches
//! on a synthetic grid of two-way streets with park blocks.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use geo::Point;
use heatroute_core::{
    cost::CostOverlay,
    model::{
        EdgeGeometry, NetworkKind, ParkOverlay, Scenario, StreetEdge, StreetGraph,
        VulnerabilityOverlay,
    },
    routing::{RoutingInputs, SearchOptions, compute_evacuation_routes},
};
use petgraph::graph::NodeIndex;

const SPACING_DEG: f64 = 0.001;
const BLOCK_M: f64 = 100.0;

/// `side` x `side` grid. Every fifth row of streets runs through a park.
fn grid(side: usize) -> (StreetGraph, ParkOverlay) {
    let mut graph = StreetGraph::new(NetworkKind::Walk);
    let mut parks = ParkOverlay::new();
    let mut nodes = Vec::with_capacity(side * side);
    for row in 0..side {
        for col in 0..side {
            #[allow(clippy::cast_precision_loss)]
            let point = Point::new(col as f64 * SPACING_DEG, row as f64 * SPACING_DEG);
            #[allow(clippy::cast_possible_wrap)]
            nodes.push(graph.add_node((row * side + col) as i64, point));
        }
    }

    let mut connect = |from: NodeIndex, to: NodeIndex, in_park: bool| {
        let a = graph.node(from).map(|n| n.geometry).unwrap();
        let b = graph.node(to).map(|n| n.geometry).unwrap();
        for (u, v, p, q) in [(from, to, a, b), (to, from, b, a)] {
            let edge = graph.add_edge(u, v, StreetEdge::new(BLOCK_M, EdgeGeometry::straight(p, q)));
            if in_park {
                parks.insert(edge);
            }
        }
    };
    for row in 0..side {
        for col in 0..side {
            let here = nodes[row * side + col];
            if col + 1 < side {
                connect(here, nodes[row * side + col + 1], row % 5 == 2);
            }
            if row + 1 < side {
                connect(here, nodes[(row + 1) * side + col], false);
            }
        }
    }
    (graph, parks)
}

fn bench_cost_assignment(c: &mut Criterion) {
    let (graph, parks) = grid(100);
    c.bench_function("cost_assignment_100x100", |b| {
        b.iter(|| CostOverlay::assign(black_box(&graph), Scenario::High, &parks));
    });
}

fn bench_evacuation_routes(c: &mut Criterion) {
    let mut group = c.benchmark_group("evacuation_routes");
    let vulnerability = VulnerabilityOverlay::new();

    for side in [20, 50, 100] {
        let (graph, parks) = grid(side);
        let start = NodeIndex::new(0);
        let end = NodeIndex::new(side * side - 1);
        let inputs = RoutingInputs {
            scenario: Scenario::High,
            walk_graph: &graph,
            drive_graph: &graph,
            walk_start: start,
            walk_end: end,
            drive_start: start,
            drive_end: end,
            parks: &parks,
            vulnerability: &vulnerability,
        };
        group.bench_with_input(BenchmarkId::from_parameter(side), &inputs, |b, inputs| {
            b.iter(|| compute_evacuation_routes(black_box(inputs), &SearchOptions::default()));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_cost_assignment, bench_evacuation_routes);
criterion_main!(benches);
