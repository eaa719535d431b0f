use std::path::PathBuf;

/// Decimal places endpoint coordinates are rounded to when matching nodes
pub const DEFAULT_COORDINATE_PRECISION: u32 = 6;

/// Configuration for building a road graph from an edge dataset
#[derive(Debug, Clone)]
pub struct NetworkConfig {
    /// CSV file with `fid`, `geometry` (WKT), `length_m`, `safety_score`
    /// and an optional `oneway` column
    pub dataset_path: PathBuf,
    pub coordinate_precision: u32,
}

impl NetworkConfig {
    pub fn new(dataset_path: impl Into<PathBuf>) -> Self {
        Self {
            dataset_path: dataset_path.into(),
            coordinate_precision: DEFAULT_COORDINATE_PRECISION,
        }
    }
}
