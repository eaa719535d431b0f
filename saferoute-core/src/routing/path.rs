use petgraph::graph::{EdgeIndex, NodeIndex};

use crate::{CostModel, RoadGraph};

/// Simple path through the road graph.
///
/// `nodes` always holds one more element than `edges`; a path from a node to
/// itself has a single node and no edges.
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    pub nodes: Vec<NodeIndex>,
    pub edges: Vec<EdgeIndex>,
    /// Composite cost, summed in edge order
    pub cost: f64,
}

impl Path {
    /// Zero-length path that starts and ends at `node`
    pub fn trivial(node: NodeIndex) -> Self {
        Self {
            nodes: vec![node],
            edges: Vec::new(),
            cost: 0.0,
        }
    }

    /// Builds a path from its edge sequence and prices it with `cost`.
    ///
    /// Returns `None` if an edge index is unknown or the edges are not contiguous.
    pub fn from_edges(
        graph: &RoadGraph,
        cost: &CostModel,
        start: NodeIndex,
        edges: Vec<EdgeIndex>,
    ) -> Option<Self> {
        let mut nodes = Vec::with_capacity(edges.len() + 1);
        nodes.push(start);
        let mut total = 0.0;
        for &edge in &edges {
            let road_edge = graph.edge_at(edge)?;
            if Some(&road_edge.source) != nodes.last() {
                return None;
            }
            total += cost.weight(road_edge);
            nodes.push(road_edge.target);
        }
        Some(Self {
            nodes,
            edges,
            cost: total,
        })
    }

    pub fn start(&self) -> NodeIndex {
        self.nodes[0]
    }

    pub fn end(&self) -> NodeIndex {
        self.nodes[self.nodes.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}
