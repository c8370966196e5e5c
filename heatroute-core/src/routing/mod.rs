//! Path searches over street graphs and the aggregation of their results

mod dijkstra;
pub mod evacuation;
mod path;
pub mod planner;
pub mod rounding;
pub mod search;
pub mod segments;
pub mod statistics;

pub use dijkstra::SearchOutcome;
pub use evacuation::{EvacuationPaths, RouteOutcome, RoutingInputs, compute_evacuation_routes};
pub use path::{Hop, Path};
pub use planner::{EvacuationRoute, RouteRequest, nearest_shelters, plan_evacuation_route};
pub use search::{RouteKind, SearchOptions, drive_path, walk_distance_path, walk_heat_path};
pub use segments::{DriveSegment, RouteSegments, WalkSegment, drive_segments, walk_segments};
pub use statistics::{DRIVING_SPEED_KMH, LevelSummary, RouteStatistics};
