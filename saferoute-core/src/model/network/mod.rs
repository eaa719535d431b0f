//! Road network model

pub mod components;
pub mod graph;
