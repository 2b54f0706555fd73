//! Vertex-to-line voting.
//!
//! Each red vertex votes for the candidate line whose nearest segment is
//! closest. Votes are collected in a [`GroupMap`] that lives for exactly one
//! red feature.

use indexmap::IndexMap;
use log::debug;

use crate::geom::compare::Tolerance;
use crate::index::LineIndexSet;
use crate::types::{GeoPoint, LineId, LineRef};

/// Red vertices grouped by the blue line they voted for.
///
/// Vertices that could not be placed on any line are kept apart and do not
/// count as votes.
#[derive(Debug, Clone, Default)]
pub struct GroupMap {
    lines: IndexMap<LineId, Vec<GeoPoint>>,
    unmatched: Vec<GeoPoint>,
}

impl GroupMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, target: LineRef, point: GeoPoint) {
        match target {
            LineRef::Line(id) => self.lines.entry(id).or_default().push(point),
            LineRef::Unmatched => self.unmatched.push(point),
        }
    }

    /// Lines that received at least one vote, in first-vote order.
    pub fn line_ids(&self) -> Vec<LineId> {
        self.lines.keys().copied().collect()
    }

    pub fn votes(&self, id: LineId) -> usize {
        self.lines.get(&id).map_or(0, Vec::len)
    }

    pub fn points(&self, id: LineId) -> Option<&[GeoPoint]> {
        self.lines.get(&id).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (LineId, &[GeoPoint])> {
        self.lines.iter().map(|(id, pts)| (*id, pts.as_slice()))
    }

    /// Number of vertices assigned to real lines.
    pub fn total_votes(&self) -> usize {
        self.lines.values().map(Vec::len).sum()
    }

    pub fn unmatched(&self) -> &[GeoPoint] {
        &self.unmatched
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty() && self.unmatched.is_empty()
    }
}

/// Outcome of voting a single vertex.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Assignment {
    pub target: LineRef,
    /// Candidates skipped because no distance could be computed.
    pub errors: usize,
}

/// Pick the candidate line closest to `point`.
///
/// Candidates whose distance cannot be computed are skipped. Ties keep the
/// first candidate seen. With no measurable candidate the vertex is
/// [`LineRef::Unmatched`].
pub fn nearest_line<I>(point: &GeoPoint, candidates: I, lines: &LineIndexSet, tol: &Tolerance) -> Assignment
where
    I: IntoIterator<Item = LineId>,
{
    let mut best = LineRef::Unmatched;
    let mut min_dist = f64::INFINITY;
    let mut errors = 0;

    for id in candidates {
        match lines.nearest_segment_distance(point, id, tol) {
            Ok(dist) if dist < min_dist => {
                min_dist = dist;
                best = LineRef::Line(id);
            }
            Ok(_) => {}
            Err(e) => {
                debug!("skipping candidate: {}", e);
                errors += 1;
            }
        }
    }

    Assignment {
        target: best,
        errors,
    }
}

/// Vote `point` onto the nearest of `candidates` and record it in `groups`.
pub fn assign_vertex<I>(
    point: &GeoPoint,
    candidates: I,
    lines: &LineIndexSet,
    tol: &Tolerance,
    groups: &mut GroupMap,
) -> Assignment
where
    I: IntoIterator<Item = LineId>,
{
    let assignment = nearest_line(point, candidates, lines, tol);
    groups.push(assignment.target, *point);
    assignment
}

/// Vote `point` onto the lines the feature has already matched.
///
/// No distance bound applies; the closest already-matched line wins.
pub fn assign_fallback(
    point: &GeoPoint,
    lines: &LineIndexSet,
    tol: &Tolerance,
    groups: &mut GroupMap,
) -> Assignment {
    let matched = groups.line_ids();
    assign_vertex(point, matched, lines, tol, groups)
}
