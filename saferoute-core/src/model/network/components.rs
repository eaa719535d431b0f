//! Road network components - nodes, edges and the raw records they are built from

use geo::{LineString, Point};
use petgraph::graph::NodeIndex;

use crate::{EdgeId, FeatureId};

/// Road graph node
#[derive(Debug, Clone)]
pub struct RoadNode {
    /// Projected node coordinates
    pub geometry: Point<f64>,
}

/// Directed road graph edge (street segment in one travel direction)
#[derive(Debug, Clone)]
pub struct RoadEdge {
    /// Unique edge id
    pub id: EdgeId,
    /// Dataset feature the edge was created from
    pub fid: FeatureId,
    pub source: NodeIndex,
    pub target: NodeIndex,
    /// Segment length in meters, always positive
    pub length_m: f64,
    /// Safety score, higher is safer
    pub safety_score: f64,
    /// Optional geometry oriented in travel direction
    pub geometry: Option<LineString<f64>>,
}

/// Raw edge as handed to [`RoadGraph::build`](crate::RoadGraph::build).
///
/// `source` and `target` are 0-based positions in the node list.
#[derive(Debug, Clone)]
pub struct EdgeRecord {
    pub id: EdgeId,
    pub fid: FeatureId,
    pub source: usize,
    pub target: usize,
    pub length_m: f64,
    pub safety_score: f64,
    pub geometry: Option<LineString<f64>>,
}

impl EdgeRecord {
    /// Edge record without geometry, `fid` mirrors the edge id
    pub fn new(id: EdgeId, source: usize, target: usize, length_m: f64, safety_score: f64) -> Self {
        Self {
            id,
            fid: FeatureId::try_from(id).unwrap_or(FeatureId::MAX),
            source,
            target,
            length_m,
            safety_score,
            geometry: None,
        }
    }

    #[must_use]
    pub fn with_fid(mut self, fid: FeatureId) -> Self {
        self.fid = fid;
        self
    }

    #[must_use]
    pub fn with_geometry(mut self, geometry: LineString<f64>) -> Self {
        self.geometry = Some(geometry);
        self
    }
}
