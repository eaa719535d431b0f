use thiserror::Error;

use crate::routing::Path;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Malformed network data: {0}")]
    MalformedData(String),
    #[error(
        "Point ({x:.2}, {y:.2}) is {distance:.1} m from the nearest network node (max {max_distance:.1} m)"
    )]
    OutOfRange {
        x: f64,
        y: f64,
        distance: f64,
        max_distance: f64,
    },
    #[error("No route found: {0}")]
    NoRoute(String),
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
    #[error("Search budget exceeded after accepting {} route(s)", .partial.len())]
    Timeout { partial: Vec<Path> },
    #[error("Invalid path: {0}")]
    InvalidPath(String),
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("GeoJSON error: {0}")]
    GeoJsonError(String),
}
