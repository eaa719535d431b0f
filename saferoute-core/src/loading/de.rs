use geo::{Geometry, LineString};
use serde::Deserialize;
use wkt::TryFromWkt;

use crate::FeatureId;

/// Columns every edge dataset must provide
pub const REQUIRED_COLUMNS: [&str; 4] = ["fid", "geometry", "length_m", "safety_score"];

/// One row of the edge dataset
#[derive(Debug, Deserialize)]
pub struct RawEdgeRow {
    pub fid: FeatureId,
    /// WKT `LINESTRING` in projected meters
    pub geometry: String,
    pub length_m: f64,
    pub safety_score: f64,
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub oneway: bool,
}

/// Lenient boolean column: accepts `true/false`, `1/0`, `yes/no`, empty is false
pub(super) fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let flag = String::deserialize(deserializer)?;
    match flag.trim().to_ascii_lowercase().as_str() {
        "" | "0" | "false" | "f" | "no" | "n" => Ok(false),
        "1" | "true" | "t" | "yes" | "y" => Ok(true),
        other => Err(serde::de::Error::custom(format!(
            "invalid boolean flag '{other}'"
        ))),
    }
}

/// Parses a WKT geometry into a line.
///
/// Returns `Ok(None)` for blank cells and for geometries that are not a
/// `LINESTRING` or have fewer than two vertices.
pub fn parse_line_string(wkt_str: &str) -> Result<Option<LineString<f64>>, String> {
    let wkt_str = wkt_str.trim();
    if wkt_str.is_empty() {
        return Ok(None);
    }
    let geometry = Geometry::<f64>::try_from_wkt_str(wkt_str).map_err(|e| e.to_string())?;
    match geometry {
        Geometry::LineString(line) if line.0.len() >= 2 => Ok(Some(line)),
        _ => Ok(None),
    }
}
