use geo::{Coord, LineString, Point};
use geojson::{Feature, FeatureCollection, Geometry, GeometryValue};
use petgraph::graph::NodeIndex;
use serde_json::json;

use super::assemble::RouteResult;
use crate::{Error, RoadGraph};

impl RouteResult {
    /// Merged route geometry.
    ///
    /// Edge geometries are chained in travel order, edges without geometry
    /// contribute their end node coordinates. Returns `None` for a
    /// zero-length route.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidPath`] if the path references an edge or node that
    /// is not part of `graph`
    pub fn line_string(&self, graph: &RoadGraph) -> Result<Option<LineString<f64>>, Error> {
        if self.path.is_empty() {
            return Ok(None);
        }

        let mut coords: Vec<Coord<f64>> = Vec::new();
        for &idx in &self.path.edges {
            let edge = graph
                .edge_at(idx)
                .ok_or_else(|| Error::InvalidPath(format!("unknown edge {}", idx.index())))?;
            let edge_coords: Vec<Coord<f64>> = match &edge.geometry {
                Some(geometry) if geometry.0.len() >= 2 => geometry.0.clone(),
                _ => vec![
                    node_point(graph, edge.source)?.into(),
                    node_point(graph, edge.target)?.into(),
                ],
            };
            for coord in edge_coords {
                // Shared vertex between consecutive edges
                if coords.last() != Some(&coord) {
                    coords.push(coord);
                }
            }
        }

        Ok(Some(LineString::new(coords)))
    }

    /// Converts the route to a `GeoJSON` Feature
    pub fn to_feature(&self, graph: &RoadGraph) -> Result<Feature, Error> {
        let geometry = match self.line_string(graph)? {
            Some(line) => Geometry::new(GeometryValue::from(&line)),
            None => {
                let point = node_point(graph, self.path.start())?;
                Geometry::new(GeometryValue::from(&point))
            }
        };

        let value = json!({
            "type": "Feature",
            "geometry": geometry,
            "properties": {
                "alt": self.alt_rank + 1,
                "alt_rank": self.alt_rank,
                "total_length_m": self.total_length_m,
                "total_cost": self.total_cost,
                "safety_mean": self.safety_mean,
                "safety_min": self.safety_min,
                "worst_edge_id": self.worst_edge_id,
                "worst_edge_fid": self.worst_edge_fid,
                "edge_ids": self.edge_ids,
            }
        });

        serde_json::from_value::<Feature>(value).map_err(|e| Error::GeoJsonError(e.to_string()))
    }
}

/// Converts cost-ordered routes to a `GeoJSON` `FeatureCollection`
pub fn routes_to_feature_collection(
    graph: &RoadGraph,
    routes: &[RouteResult],
) -> Result<FeatureCollection, Error> {
    let features = routes
        .iter()
        .map(|route| route.to_feature(graph))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(FeatureCollection {
        features,
        bbox: None,
        foreign_members: None,
    })
}

fn node_point(graph: &RoadGraph, node: NodeIndex) -> Result<Point<f64>, Error> {
    graph
        .node(node)
        .map(|node| node.geometry)
        .ok_or_else(|| Error::InvalidPath(format!("unknown node {}", node.index())))
}
