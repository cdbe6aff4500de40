//! Error types for the geo crate

use thiserror::Error;

/// Errors that can occur converting coordinates and bounds
#[derive(Debug, Error)]
pub enum GeoError {
    /// A coordinate string did not have the expected shape
    #[error("invalid coordinate string \"{0}\": expected \"lng,lat\"")]
    InvalidCoordinateString(String),

    /// A coordinate component failed to parse as a number
    #[error("invalid coordinate number: {0}")]
    InvalidNumber(#[from] std::num::ParseFloatError),

    /// A bounds array had south above north
    #[error("inverted latitude range: south {south} is above north {north}")]
    InvertedLatitude {
        /// Southern latitude supplied
        south: f64,
        /// Northern latitude supplied
        north: f64,
    },
}
