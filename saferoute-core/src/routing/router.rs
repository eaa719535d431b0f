//! Request boundary: validation, snapping, search and assembly

use std::time::Duration;

use geo::Point;
use log::debug;
use petgraph::graph::NodeIndex;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::assemble::{RouteResult, assemble_routes};
use super::k_paths::{PathSearchOptions, find_k_paths};
use crate::{CostModel, DEFAULT_MAX_OVERLAP, Error, Path, RoadGraph};

/// What to do when start and end snap to the same node
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SameEndpointPolicy {
    /// Fail with [`Error::NoRoute`]
    #[default]
    Reject,
    /// Return a single zero-length route
    Trivial,
}

/// Router settings shared by all requests
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
    pub cost: CostModel,
    /// Maximum fraction of edges two returned routes may share
    pub max_overlap: f64,
    /// Requests for more routes are clamped to this value
    pub max_alternatives: usize,
    /// Maximum distance in meters between an input point and its node
    pub max_snap_distance: f64,
    pub same_endpoint: SameEndpointPolicy,
    /// Wall-clock budget of one search in milliseconds
    pub time_limit_ms: Option<u64>,
    /// Settled-node budget of one search
    pub max_expansions: Option<usize>,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            cost: CostModel::default(),
            max_overlap: DEFAULT_MAX_OVERLAP,
            max_alternatives: 10,
            max_snap_distance: 250.0,
            same_endpoint: SameEndpointPolicy::Reject,
            time_limit_ms: Some(10_000),
            max_expansions: None,
        }
    }
}

impl RouterConfig {
    pub fn validate(&self) -> Result<(), Error> {
        self.cost.validate()?;
        if !(0.0..=1.0).contains(&self.max_overlap) {
            return Err(Error::InvalidParameter(format!(
                "max_overlap must be within [0, 1], got {}",
                self.max_overlap
            )));
        }
        if self.max_alternatives == 0 {
            return Err(Error::InvalidParameter("max_alternatives must be at least 1".to_string()));
        }
        if self.max_snap_distance.is_nan() || self.max_snap_distance < 0.0 {
            return Err(Error::InvalidParameter(format!(
                "max_snap_distance must be non-negative, got {}",
                self.max_snap_distance
            )));
        }
        Ok(())
    }

    fn search_options(&self) -> PathSearchOptions {
        PathSearchOptions {
            max_overlap: self.max_overlap,
            time_limit: self.time_limit_ms.map(Duration::from_millis),
            max_expansions: self.max_expansions,
        }
    }
}

/// Route request in the projected coordinates of the network
#[derive(Debug, Clone, PartialEq)]
pub struct RouteRequest {
    pub start: Point<f64>,
    pub end: Point<f64>,
    pub k: usize,
}

impl RouteRequest {
    pub fn new(start: Point<f64>, end: Point<f64>, k: usize) -> Self {
        Self { start, end, k }
    }
}

/// Finds up to `request.k` diverse routes between two coordinates.
///
/// Both points are snapped to their nearest nodes first. A `k` above
/// `config.max_alternatives` is clamped.
///
/// # Errors
///
/// [`Error::InvalidParameter`], [`Error::OutOfRange`], [`Error::NoRoute`] or
/// [`Error::Timeout`], see [`find_routes_between`].
pub fn find_routes(
    graph: &RoadGraph,
    config: &RouterConfig,
    request: &RouteRequest,
) -> Result<Vec<RouteResult>, Error> {
    config.validate()?;
    if request.k == 0 {
        return Err(Error::InvalidParameter("k must be at least 1".to_string()));
    }

    let start = graph.nearest_node(&request.start, config.max_snap_distance)?;
    let end = graph.nearest_node(&request.end, config.max_snap_distance)?;
    debug!(
        "Snapped request to nodes {} -> {}",
        start.index(),
        end.index()
    );

    find_routes_between(graph, config, start, end, request.k)
}

/// Finds up to `k` diverse routes between two graph nodes.
///
/// # Errors
///
/// - [`Error::InvalidParameter`] if `k == 0` or the configuration is invalid
/// - [`Error::NoRoute`] if the nodes are disconnected, or identical under
///   [`SameEndpointPolicy::Reject`]
/// - [`Error::Timeout`] if the search budget is exceeded
pub fn find_routes_between(
    graph: &RoadGraph,
    config: &RouterConfig,
    start: NodeIndex,
    end: NodeIndex,
    k: usize,
) -> Result<Vec<RouteResult>, Error> {
    config.validate()?;
    if k == 0 {
        return Err(Error::InvalidParameter("k must be at least 1".to_string()));
    }
    let k = if k > config.max_alternatives {
        debug!(
            "Clamping requested alternatives from {k} to {}",
            config.max_alternatives
        );
        config.max_alternatives
    } else {
        k
    };

    if start == end {
        return match config.same_endpoint {
            SameEndpointPolicy::Reject => Err(Error::NoRoute(
                "start and end snap to the same node".to_string(),
            )),
            SameEndpointPolicy::Trivial => assemble_routes(graph, &[Path::trivial(start)]),
        };
    }

    let paths = find_k_paths(graph, &config.cost, start, end, k, &config.search_options())?;
    assemble_routes(graph, &paths)
}

/// Evaluates independent requests in parallel
pub fn find_routes_many(
    graph: &RoadGraph,
    config: &RouterConfig,
    requests: &[RouteRequest],
) -> Vec<Result<Vec<RouteResult>, Error>> {
    requests
        .par_iter()
        .map(|request| find_routes(graph, config, request))
        .collect()
}
