//! Core data structures for linematch.
//!
//! This module contains the fundamental types used throughout the
//! red-to-blue line matching process.

use std::fmt;
use std::ops::Sub;
use std::str::FromStr;

use geo::{CoordsIter, MultiLineString};
use serde_json::{Map, Value};

/// A coordinate pair in degrees.
///
/// The same type doubles as a displacement vector for the planar segment
/// tests: `lat` plays the role of `x` and `lon` the role of `y`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        GeoPoint { lat, lon }
    }

    /// Dot product of two displacement vectors.
    pub fn dot(&self, other: &GeoPoint) -> f64 {
        self.lat * other.lat + self.lon * other.lon
    }

    /// 2-D cross product (signed parallelogram area).
    pub fn cross(&self, other: &GeoPoint) -> f64 {
        self.lat * other.lon - self.lon * other.lat
    }

    /// Euclidean length of a displacement vector.
    pub fn length(&self) -> f64 {
        self.dot(self).sqrt()
    }
}

impl Sub for GeoPoint {
    type Output = GeoPoint;

    fn sub(self, rhs: GeoPoint) -> GeoPoint {
        GeoPoint::new(self.lat - rhs.lat, self.lon - rhs.lon)
    }
}

/// Identifier of a blue (reference) line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LineId(pub i64);

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where a red vertex ended up after voting.
///
/// `Unmatched` never overlaps a real identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineRef {
    Line(LineId),
    Unmatched,
}

/// One vertex of a blue line, tagged with its owner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VertexRecord {
    pub point: GeoPoint,
    pub line: LineId,
}

/// Extract the vertices of a multi-line geometry, in order.
///
/// GeoJSON coordinates are `[lon, lat]`, so `x` maps to `lon`.
pub fn extract_vertices(geometry: &MultiLineString<f64>) -> Vec<GeoPoint> {
    geometry
        .coords_iter()
        .map(|c| GeoPoint::new(c.y, c.x))
        .collect()
}

/// A line of the blue reference network.
#[derive(Debug, Clone)]
pub struct BlueLine {
    pub id: LineId,
    pub geometry: MultiLineString<f64>,
}

impl BlueLine {
    pub fn new(id: LineId, geometry: MultiLineString<f64>) -> Self {
        BlueLine { id, geometry }
    }

    pub fn vertices(&self) -> Vec<GeoPoint> {
        extract_vertices(&self.geometry)
    }
}

/// A feature of the red (attributed) network.
#[derive(Debug, Clone)]
pub struct RedFeature {
    pub properties: Map<String, Value>,
    pub geometry: MultiLineString<f64>,
}

impl RedFeature {
    pub fn new(properties: Map<String, Value>, geometry: MultiLineString<f64>) -> Self {
        RedFeature {
            properties,
            geometry,
        }
    }

    pub fn vertices(&self) -> Vec<GeoPoint> {
        extract_vertices(&self.geometry)
    }
}

/// Per-feature account of how the vertices were resolved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureReport {
    /// Vertices assigned through the windowed candidate search.
    pub direct: usize,
    /// Vertices assigned against lines already matched by the feature.
    pub fallback: usize,
    /// Vertices with no line at all.
    pub unmatched: usize,
    /// Candidate lines dropped because their distance could not be computed.
    pub candidate_errors: usize,
    /// Lines reaching the vote share.
    pub accepted: Vec<LineId>,
    /// Accepted lines that contributed no geometry.
    pub union_skipped: usize,
}

/// A green feature: red attributes with the assembled blue geometry.
#[derive(Debug, Clone)]
pub struct OutputFeature {
    pub properties: Map<String, Value>,
    pub geometry: MultiLineString<f64>,
    pub report: FeatureReport,
}

/// How far the windowed candidate search scans.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchPolicy {
    /// Stop at the first radius that yields any candidate.
    FirstNonEmpty,
    /// Always scan every radius up to `eps`.
    FullRadius,
}

/// Error type for parsing a search policy from string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseSearchPolicyError;

impl fmt::Display for ParseSearchPolicyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid search policy: expected 'first-nonempty' or 'full-radius'"
        )
    }
}

impl std::error::Error for ParseSearchPolicyError {}

impl FromStr for SearchPolicy {
    type Err = ParseSearchPolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "first-nonempty" => Ok(SearchPolicy::FirstNonEmpty),
            "full-radius" => Ok(SearchPolicy::FullRadius),
            _ => Err(ParseSearchPolicyError),
        }
    }
}

impl SearchPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchPolicy::FirstNonEmpty => "first-nonempty",
            SearchPolicy::FullRadius => "full-radius",
        }
    }
}

impl fmt::Display for SearchPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
