//! Data model of the road network
//!
//! Contains the node and edge records and the immutable graph built from them.

pub mod network;

pub use network::components::{EdgeRecord, RoadEdge, RoadNode};
pub use network::graph::{IndexedPoint, RoadGraph};
