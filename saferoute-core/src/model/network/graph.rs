use geo::Point;
use hashbrown::HashMap;
use log::info;
use petgraph::{
    Direction,
    graph::{DiGraph, EdgeIndex, NodeIndex},
    visit::EdgeRef,
};
use rstar::{RTree, primitives::GeomWithData};

use super::components::{EdgeRecord, RoadEdge, RoadNode};
use crate::{EdgeId, Error};

/// Node coordinate stored in the spatial index
pub type IndexedPoint = GeomWithData<[f64; 2], NodeIndex>;

/// Immutable road network.
///
/// Nodes and edges live in the flat arrays of a `petgraph` arena, so node ids
/// are dense and 0-based. The graph is never mutated after [`RoadGraph::build`]
/// and can be shared between threads without locking.
#[derive(Debug, Clone)]
pub struct RoadGraph {
    pub(crate) graph: DiGraph<RoadNode, RoadEdge>,
    rtree: RTree<IndexedPoint>,
    edge_lookup: HashMap<EdgeId, EdgeIndex>,
}

impl RoadGraph {
    /// Builds the graph from node coordinates and edge records.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedData`] if an edge references an unknown node,
    /// has a non-positive length, a non-finite safety score, or reuses an edge id.
    pub fn build(nodes: Vec<Point<f64>>, edges: Vec<EdgeRecord>) -> Result<Self, Error> {
        let node_count = nodes.len();
        let mut graph = DiGraph::with_capacity(node_count, edges.len());

        for geometry in nodes {
            if !geometry.x().is_finite() || !geometry.y().is_finite() {
                return Err(Error::MalformedData(format!(
                    "Node {} has non-finite coordinates",
                    graph.node_count()
                )));
            }
            graph.add_node(RoadNode { geometry });
        }

        let mut edge_lookup = HashMap::with_capacity(edges.len());
        for record in edges {
            if record.source >= node_count || record.target >= node_count {
                return Err(Error::MalformedData(format!(
                    "Edge {} references unknown node ({} -> {}, {node_count} nodes)",
                    record.id, record.source, record.target
                )));
            }
            if !(record.length_m.is_finite() && record.length_m > 0.0) {
                return Err(Error::MalformedData(format!(
                    "Edge {} has non-positive length {}",
                    record.id, record.length_m
                )));
            }
            if !record.safety_score.is_finite() {
                return Err(Error::MalformedData(format!(
                    "Edge {} has non-finite safety score",
                    record.id
                )));
            }
            if edge_lookup.contains_key(&record.id) {
                return Err(Error::MalformedData(format!(
                    "Duplicate edge id {}",
                    record.id
                )));
            }

            let source = NodeIndex::new(record.source);
            let target = NodeIndex::new(record.target);
            let edge = graph.add_edge(
                source,
                target,
                RoadEdge {
                    id: record.id,
                    fid: record.fid,
                    source,
                    target,
                    length_m: record.length_m,
                    safety_score: record.safety_score,
                    geometry: record.geometry,
                },
            );
            edge_lookup.insert(record.id, edge);
        }

        let points = graph
            .node_indices()
            .map(|idx| {
                let point = graph[idx].geometry;
                IndexedPoint::new([point.x(), point.y()], idx)
            })
            .collect();
        let rtree = RTree::bulk_load(points);

        info!(
            "Road graph built: {} nodes, {} edges",
            graph.node_count(),
            graph.edge_count()
        );

        Ok(Self {
            graph,
            rtree,
            edge_lookup,
        })
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn node(&self, node: NodeIndex) -> Option<&RoadNode> {
        self.graph.node_weight(node)
    }

    /// Edge by its external id
    pub fn edge(&self, id: EdgeId) -> Option<&RoadEdge> {
        self.edge_lookup
            .get(&id)
            .and_then(|&idx| self.graph.edge_weight(idx))
    }

    /// Arena index of the edge with the given external id
    pub fn edge_index(&self, id: EdgeId) -> Option<EdgeIndex> {
        self.edge_lookup.get(&id).copied()
    }

    /// Edge by its arena index
    pub fn edge_at(&self, edge: EdgeIndex) -> Option<&RoadEdge> {
        self.graph.edge_weight(edge)
    }

    /// Outgoing edges of `node` as `(edge index, edge, target node)`
    pub fn neighbors(
        &self,
        node: NodeIndex,
    ) -> impl Iterator<Item = (EdgeIndex, &RoadEdge, NodeIndex)> + '_ {
        self.graph
            .edges_directed(node, Direction::Outgoing)
            .map(|edge| (edge.id(), edge.weight(), edge.target()))
    }

    /// Snaps a coordinate to the nearest graph node.
    ///
    /// Equidistant nodes resolve to the lowest node id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfRange`] if the nearest node is farther than
    /// `max_snap_distance`, or the graph has no nodes at all.
    pub fn nearest_node(
        &self,
        point: &Point<f64>,
        max_snap_distance: f64,
    ) -> Result<NodeIndex, Error> {
        let mut candidates = self
            .rtree
            .nearest_neighbor_iter_with_distance_2(&[point.x(), point.y()]);

        let Some((first, best_distance_2)) = candidates.next() else {
            return Err(Error::OutOfRange {
                x: point.x(),
                y: point.y(),
                distance: f64::INFINITY,
                max_distance: max_snap_distance,
            });
        };

        let mut best = first.data;
        for (candidate, distance_2) in candidates {
            if distance_2 > best_distance_2 {
                break;
            }
            best = best.min(candidate.data);
        }

        let distance = best_distance_2.sqrt();
        if distance > max_snap_distance {
            log::trace!(
                "Point {point:?} is {distance:.1} m from node {} (max: {max_snap_distance} m)",
                best.index()
            );
            return Err(Error::OutOfRange {
                x: point.x(),
                y: point.y(),
                distance,
                max_distance: max_snap_distance,
            });
        }

        Ok(best)
    }
}
