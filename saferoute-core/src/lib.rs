//! Safety-aware alternative routing over a static road network.
//!
//! The crate builds an immutable [`RoadGraph`] from an edge dataset, snaps
//! input coordinates to graph nodes and searches up to `k` diverse, loop-free
//! routes ranked by a composite length/safety cost.

pub mod error;
pub mod loading;
pub mod model;
pub mod prelude;
pub mod routing;

pub use error::Error;
pub use loading::{NetworkConfig, create_road_graph};
pub use model::{EdgeRecord, RoadEdge, RoadGraph, RoadNode};
pub use routing::{
    CostModel, Path, RouteRequest, RouteResult, RouterConfig, SafetyPenalty, SameEndpointPolicy,
    find_routes, find_routes_between, find_routes_many,
};

/// External, unique identifier of a directed edge
pub type EdgeId = u64;

/// Identifier of the dataset feature (row) an edge was created from.
/// Both directions of a two-way segment share it.
pub type FeatureId = i64;

/// Default maximum fraction of edges two returned routes may share
pub const DEFAULT_MAX_OVERLAP: f64 = 0.4;

/// Smallest weight an edge can have, keeps every edge weight strictly positive
pub const MIN_EDGE_WEIGHT: f64 = 1e-9;
