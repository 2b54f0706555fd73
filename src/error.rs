//! Error types for linematch.
//!
//! Geometric failures that the matcher recovers from locally (a candidate
//! line that cannot be measured, a line that contributes no geometry) are
//! values of [`MatchError`] consumed by the selection loop. Anything raised
//! while reading or writing datasets is fatal and surfaces as `anyhow::Error`.

use thiserror::Error;

use crate::types::LineId;

/// Errors produced by the matching library.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MatchError {
    /// A nearest-segment query needs two vertices on the line.
    #[error("line {line} has {count} vertices, at least 2 are required")]
    InsufficientVertices { line: LineId, count: usize },

    #[error("line {0} is not in the index")]
    UnknownLine(LineId),

    #[error("unsupported geometry type '{0}', expected LineString or MultiLineString")]
    UnsupportedGeometry(String),

    #[error("feature {index} is missing attribute '{field}'")]
    MissingAttribute { index: usize, field: String },

    #[error("feature {index} has an invalid line identifier: {value}")]
    InvalidLineId { index: usize, value: String },

    #[error("duplicate line identifier {0} in reference dataset")]
    DuplicateLineId(LineId),

    #[error("coordinate reference systems differ: red is '{red}', blue is '{blue}'")]
    CrsMismatch { red: String, blue: String },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
