use rayon::prelude::*;

use crate::{EdgeId, Error, FeatureId, Path, RoadEdge, RoadGraph};

/// Reported metrics of a single route
#[derive(Debug, Clone, PartialEq)]
pub struct RouteResult {
    /// 0-based position in the cost-ordered result list
    pub alt_rank: usize,
    pub edge_ids: Vec<EdgeId>,
    pub total_length_m: f64,
    pub total_cost: f64,
    /// Length-weighted mean safety, `None` for a zero-length route
    pub safety_mean: Option<f64>,
    pub safety_min: Option<f64>,
    /// Edge attaining `safety_min`, the earliest one on ties
    pub worst_edge_id: Option<EdgeId>,
    pub worst_edge_fid: Option<FeatureId>,
    pub path: Path,
}

/// Computes the metrics of `path`.
///
/// # Errors
///
/// Returns [`Error::InvalidPath`] if the path has no edges but starts and ends
/// at different nodes, or references an edge missing from the graph.
pub fn assemble(graph: &RoadGraph, path: &Path, alt_rank: usize) -> Result<RouteResult, Error> {
    let (Some(&start), Some(&end)) = (path.nodes.first(), path.nodes.last()) else {
        return Err(Error::InvalidPath("path has no nodes".to_string()));
    };
    if path.is_empty() && start != end {
        return Err(Error::InvalidPath(format!(
            "empty edge sequence between distinct nodes {} and {}",
            start.index(),
            end.index()
        )));
    }

    let edges = path
        .edges
        .iter()
        .map(|&idx| {
            graph
                .edge_at(idx)
                .ok_or_else(|| Error::InvalidPath(format!("unknown edge index {}", idx.index())))
        })
        .collect::<Result<Vec<&RoadEdge>, Error>>()?;

    debug_assert!(
        edges.windows(2).all(|pair| pair[0].target == pair[1].source),
        "path edges must be contiguous"
    );

    let mut total_length_m = 0.0;
    let mut weighted_safety = 0.0;
    let mut worst: Option<&RoadEdge> = None;
    for edge in &edges {
        total_length_m += edge.length_m;
        weighted_safety += edge.safety_score * edge.length_m;
        // Strict comparison keeps the earliest edge on ties
        if worst.is_none_or(|current| edge.safety_score < current.safety_score) {
            worst = Some(edge);
        }
    }

    let safety_mean = (!edges.is_empty()).then(|| weighted_safety / total_length_m);

    Ok(RouteResult {
        alt_rank,
        edge_ids: edges.iter().map(|edge| edge.id).collect(),
        total_length_m,
        total_cost: path.cost,
        safety_mean,
        safety_min: worst.map(|edge| edge.safety_score),
        worst_edge_id: worst.map(|edge| edge.id),
        worst_edge_fid: worst.map(|edge| edge.fid),
        path: path.clone(),
    })
}

/// Assembles a cost-ordered list of paths in parallel, ranks follow input order
pub fn assemble_routes(graph: &RoadGraph, paths: &[Path]) -> Result<Vec<RouteResult>, Error> {
    paths
        .par_iter()
        .enumerate()
        .map(|(rank, path)| assemble(graph, path, rank))
        .collect()
}
