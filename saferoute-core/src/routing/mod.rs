pub mod assemble;
mod budget;
pub mod cost;
pub(crate) mod dijkstra;
pub mod k_paths;
pub mod path;
pub mod router;
pub mod to_geojson;

pub use assemble::{RouteResult, assemble, assemble_routes};
pub use cost::{CostModel, SafetyPenalty};
pub use k_paths::{PathSearchOptions, find_k_paths};
pub use path::Path;
pub use router::{
    RouteRequest, RouterConfig, SameEndpointPolicy, find_routes, find_routes_between,
    find_routes_many,
};
pub use to_geojson::routes_to_feature_collection;
