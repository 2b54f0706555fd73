//! linematch - Line network conflation library.
//!
//! This library matches an attributed "red" line network against a "blue"
//! reference network and produces a "green" network in which every red
//! feature keeps its attributes but takes the geometry of the blue lines
//! that best represent it.
//!
//! # Features
//!
//! - Read GeoJSON line datasets (with gzip support)
//! - Index blue vertices globally (sorted by latitude) and per line (R-tree)
//! - Find candidate lines with an expanding windowed search bounded by `eps` meters
//! - Vote each red vertex onto its nearest candidate segment
//! - Assemble the geometry of every line reaching the vote share
//!
//! # Example
//!
//! ```ignore
//! use linematch::config::Config;
//! use linematch::index::{LineIndexSet, VertexIndex};
//! use linematch::matcher::match_features;
//! use linematch::parser::{read_blue_lines, read_red_features};
//! use std::path::Path;
//!
//! let config = Config::default();
//! let blue = read_blue_lines(Path::new("blue.geojson"), &config)?;
//! let red = read_red_features(Path::new("red.geojson"), &config)?;
//!
//! let vertices = VertexIndex::build(&blue.lines);
//! let lines = LineIndexSet::build(&blue.lines);
//! let green = match_features(&red.features, &vertices, &lines, &config);
//! ```

pub mod config;
pub mod error;
pub mod geom;
pub mod index;
pub mod matcher;
pub mod output;
pub mod parser;
pub mod types;

pub use config::Config;
pub use error::MatchError;
pub use types::{BlueLine, GeoPoint, LineId, LineRef, OutputFeature, RedFeature, SearchPolicy};
