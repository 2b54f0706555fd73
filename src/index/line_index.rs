//! Per-line nearest-neighbor indexes.
//!
//! Each blue line owns its vertex list and an R-tree over the same points.
//! The two vertices nearest to a query point define the segment it is
//! measured against.

use ahash::AHashMap;
use geo::MultiLineString;
use rstar::{PointDistance, RTree, RTreeObject, AABB};

use crate::error::MatchError;
use crate::geom::compare::Tolerance;
use crate::geom::distance::point_to_segment;
use crate::types::{BlueLine, GeoPoint, LineId};

/// A line vertex with its position in the line, for R-tree queries.
#[derive(Debug, Clone, Copy)]
pub struct IndexedVertex {
    pub idx: usize,
    pub lat: f64,
    pub lon: f64,
}

impl RTreeObject for IndexedVertex {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point([self.lat, self.lon])
    }
}

impl PointDistance for IndexedVertex {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dlat = self.lat - point[0];
        let dlon = self.lon - point[1];
        dlat * dlat + dlon * dlon
    }
}

/// Vertices of one blue line plus a nearest-neighbor structure over them.
#[derive(Debug)]
pub struct LineIndex {
    pub id: LineId,
    geometry: MultiLineString<f64>,
    vertices: Vec<GeoPoint>,
    tree: RTree<IndexedVertex>,
}

impl LineIndex {
    pub fn build(line: &BlueLine) -> Self {
        let vertices = line.vertices();
        let indexed: Vec<IndexedVertex> = vertices
            .iter()
            .enumerate()
            .map(|(idx, p)| IndexedVertex {
                idx,
                lat: p.lat,
                lon: p.lon,
            })
            .collect();

        LineIndex {
            id: line.id,
            geometry: line.geometry.clone(),
            vertices,
            tree: RTree::bulk_load(indexed),
        }
    }

    pub fn vertices(&self) -> &[GeoPoint] {
        &self.vertices
    }

    /// The full source geometry of the line.
    pub fn geometry(&self) -> &MultiLineString<f64> {
        &self.geometry
    }

    /// The two vertices nearest to `point`, nearest first.
    pub fn nearest_pair(&self, point: &GeoPoint) -> Result<(GeoPoint, GeoPoint), MatchError> {
        let mut nearest = self
            .tree
            .nearest_neighbor_iter(&[point.lat, point.lon])
            .map(|v| self.vertices[v.idx]);

        match (nearest.next(), nearest.next()) {
            (Some(c), Some(d)) => Ok((c, d)),
            _ => Err(MatchError::InsufficientVertices {
                line: self.id,
                count: self.vertices.len(),
            }),
        }
    }

    /// Distance from `point` to the segment spanned by its two nearest vertices.
    pub fn nearest_segment_distance(
        &self,
        point: &GeoPoint,
        tol: &Tolerance,
    ) -> Result<f64, MatchError> {
        let (c, d) = self.nearest_pair(point)?;
        Ok(point_to_segment(&c, &d, point, tol))
    }
}

/// One [`LineIndex`] per blue line.
#[derive(Debug, Default)]
pub struct LineIndexSet {
    lines: AHashMap<LineId, LineIndex>,
}

impl LineIndexSet {
    pub fn build(lines: &[BlueLine]) -> Self {
        let lines = lines
            .iter()
            .map(|line| (line.id, LineIndex::build(line)))
            .collect();
        LineIndexSet { lines }
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn get(&self, id: LineId) -> Option<&LineIndex> {
        self.lines.get(&id)
    }

    /// Distance from `point` to the nearest segment of line `id`.
    pub fn nearest_segment_distance(
        &self,
        point: &GeoPoint,
        id: LineId,
        tol: &Tolerance,
    ) -> Result<f64, MatchError> {
        self.get(id)
            .ok_or(MatchError::UnknownLine(id))?
            .nearest_segment_distance(point, tol)
    }
}
