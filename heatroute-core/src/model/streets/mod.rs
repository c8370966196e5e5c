//! Street network model shared by the pedestrian and vehicle graphs

pub mod components;
pub mod network;

pub use components::{EdgeGeometry, StreetEdge, StreetNode};
pub use network::{IndexedPoint, NetworkKind, StreetGraph};
