//! This module is responsible for loading the edge dataset
//! and building the road graph from it.

mod builder;
mod config;
pub mod de;

pub use builder::{Segment, create_road_graph, graph_from_reader, graph_from_segments};
pub use config::NetworkConfig;
