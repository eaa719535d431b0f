pub use crate::DEFAULT_MAX_OVERLAP;
pub use crate::Error;

// Graph model and loading
pub use crate::loading::{NetworkConfig, create_road_graph};
pub use crate::model::{EdgeRecord, RoadEdge, RoadGraph, RoadNode};

// Search and assembly
pub use crate::routing::{
    CostModel, Path, PathSearchOptions, RouteRequest, RouteResult, RouterConfig, SafetyPenalty,
    SameEndpointPolicy, assemble_routes, find_k_paths, find_routes, find_routes_between,
    find_routes_many, routes_to_feature_collection,
};

// Core identifier types
pub use crate::EdgeId;
pub use crate::FeatureId;
