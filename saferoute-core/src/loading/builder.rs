use std::fs::File;
use std::io::Read;

use geo::{Coord, LineString, Point};
use hashbrown::HashMap;
use itertools::Itertools;
use log::{info, warn};

use super::config::NetworkConfig;
use super::de::{REQUIRED_COLUMNS, RawEdgeRow, parse_line_string};
use crate::{EdgeId, EdgeRecord, Error, FeatureId, RoadGraph};

/// Road segment with parsed geometry, one dataset row
#[derive(Debug, Clone)]
pub struct Segment {
    pub fid: FeatureId,
    pub geometry: LineString<f64>,
    pub length_m: f64,
    pub safety_score: f64,
    /// Travel only along the digitized direction
    pub oneway: bool,
}

/// Creates the road graph from the dataset referenced by the configuration
///
/// # Errors
///
/// Returns an error if the file cannot be read, a required column is missing,
/// or the data violates graph invariants
pub fn create_road_graph(config: &NetworkConfig) -> Result<RoadGraph, Error> {
    info!(
        "Processing edge dataset: {}",
        config.dataset_path.display()
    );

    let file = File::open(&config.dataset_path).map_err(|e| {
        std::io::Error::new(
            e.kind(),
            format!(
                "Failed to open file '{}': {}",
                config.dataset_path.display(),
                e
            ),
        )
    })?;

    graph_from_reader(file, config.coordinate_precision)
}

/// Reads CSV edge rows and builds the graph
pub fn graph_from_reader<R: Read>(
    reader: R,
    coordinate_precision: u32,
) -> Result<RoadGraph, Error> {
    let mut csv_reader = csv::Reader::from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let missing = REQUIRED_COLUMNS
        .iter()
        .filter(|column| !headers.iter().any(|header| header.trim() == **column))
        .collect_vec();
    if !missing.is_empty() {
        return Err(Error::MalformedData(format!(
            "Missing columns for routing: {}",
            missing.iter().join(", ")
        )));
    }

    let mut segments = Vec::new();
    for row in csv_reader.deserialize::<RawEdgeRow>() {
        let row = row?;
        match parse_line_string(&row.geometry) {
            Ok(Some(geometry)) => segments.push(Segment {
                fid: row.fid,
                geometry,
                length_m: row.length_m,
                safety_score: row.safety_score,
                oneway: row.oneway,
            }),
            Ok(None) => warn!("Skipping feature {}: not a usable LINESTRING", row.fid),
            Err(e) => {
                return Err(Error::MalformedData(format!(
                    "Feature {} has invalid geometry: {e}",
                    row.fid
                )));
            }
        }
    }

    graph_from_segments(segments, coordinate_precision)
}

/// Builds the graph from segments.
///
/// Segment endpoints are matched into nodes after rounding to
/// `coordinate_precision` decimals. Two-way segments become two directed
/// edges with the reversed geometry on the backward edge.
pub fn graph_from_segments(
    segments: Vec<Segment>,
    coordinate_precision: u32,
) -> Result<RoadGraph, Error> {
    let scale = 10f64.powi(i32::try_from(coordinate_precision).unwrap_or(i32::MAX));
    let mut node_lookup: HashMap<(i64, i64), usize> = HashMap::new();
    let mut nodes: Vec<Point<f64>> = Vec::new();
    let mut records: Vec<EdgeRecord> = Vec::with_capacity(segments.len() * 2);
    let mut skipped = 0usize;

    #[allow(clippy::cast_possible_truncation)]
    let node_key = |coord: &Coord<f64>| {
        (
            (coord.x * scale).round() as i64,
            (coord.y * scale).round() as i64,
        )
    };

    for segment in segments {
        let (Some(first), Some(last)) = (segment.geometry.0.first(), segment.geometry.0.last())
        else {
            skipped += 1;
            continue;
        };
        let (source_key, target_key) = (node_key(first), node_key(last));
        if source_key == target_key {
            warn!(
                "Skipping feature {}: both endpoints snap to the same node",
                segment.fid
            );
            skipped += 1;
            continue;
        }

        let mut node_for = |key: (i64, i64)| {
            *node_lookup.entry(key).or_insert_with(|| {
                #[allow(clippy::cast_precision_loss)]
                nodes.push(Point::new(key.0 as f64 / scale, key.1 as f64 / scale));
                nodes.len() - 1
            })
        };
        let source = node_for(source_key);
        let target = node_for(target_key);

        let backward = (!segment.oneway).then(|| {
            let mut reversed = segment.geometry.clone();
            reversed.0.reverse();
            reversed
        });

        records.push(EdgeRecord {
            id: records.len() as EdgeId,
            fid: segment.fid,
            source,
            target,
            length_m: segment.length_m,
            safety_score: segment.safety_score,
            geometry: Some(segment.geometry),
        });
        if let Some(geometry) = backward {
            records.push(EdgeRecord {
                id: records.len() as EdgeId,
                fid: segment.fid,
                source: target,
                target: source,
                length_m: segment.length_m,
                safety_score: segment.safety_score,
                geometry: Some(geometry),
            });
        }
    }

    info!(
        "Matched {} nodes from {} directed edges ({skipped} segments skipped)",
        nodes.len(),
        records.len()
    );

    RoadGraph::build(nodes, records)
}
