//! Per-feature matching and geometry assembly.
//!
//! A red feature is matched by a pure function over the read-only indexes:
//! every vertex votes, vertices without candidates fall back to the lines
//! already voted for, and the full geometry of every line reaching the vote
//! share is merged into the output geometry.

use geo::{LineString, MultiLineString};
use log::{debug, info};
use rayon::prelude::*;
use serde_json::Map;

use crate::config::Config;
use crate::index::{LineIndexSet, VertexIndex};
use crate::matcher::candidates::candidate_lines;
use crate::matcher::voting::{assign_fallback, assign_vertex, Assignment, GroupMap};
use crate::types::{FeatureReport, GeoPoint, LineId, LineRef, OutputFeature, RedFeature};

/// Lines holding at least `vote_share` of the feature's votes, in group order.
pub fn accepted_lines(groups: &GroupMap, vote_share: f64) -> Vec<LineId> {
    let threshold = vote_share * groups.total_votes() as f64;
    groups
        .iter()
        .filter(|(_, points)| points.len() as f64 >= threshold)
        .map(|(id, _)| id)
        .collect()
}

/// Geometry a line contributes to the union, if any.
pub fn line_contribution(lines: &LineIndexSet, id: LineId) -> Option<&MultiLineString<f64>> {
    let geometry = lines.get(id)?.geometry();
    if geometry.0.iter().all(|ls| ls.0.is_empty()) {
        return None;
    }
    Some(geometry)
}

/// Add the line strings of `part` that `target` does not hold yet.
pub fn union_into(target: &mut MultiLineString<f64>, part: &MultiLineString<f64>) {
    for ls in &part.0 {
        if ls.0.is_empty() || target.0.contains(ls) {
            continue;
        }
        target.0.push(ls.clone());
    }
}

/// Merge the full geometries of `accepted` lines.
///
/// Returns the geometry and the number of lines that contributed nothing.
pub fn assemble_geometry(accepted: &[LineId], lines: &LineIndexSet) -> (MultiLineString<f64>, usize) {
    let mut geometry = MultiLineString::<f64>::new(Vec::<LineString<f64>>::new());
    let mut skipped = 0;

    for &id in accepted {
        match line_contribution(lines, id) {
            Some(part) => union_into(&mut geometry, part),
            None => {
                debug!("line {} contributes no geometry", id);
                skipped += 1;
            }
        }
    }

    (geometry, skipped)
}

fn record(report: &mut FeatureReport, assignment: Assignment, fallback: bool) {
    report.candidate_errors += assignment.errors;
    match assignment.target {
        LineRef::Line(_) if fallback => report.fallback += 1,
        LineRef::Line(_) => report.direct += 1,
        LineRef::Unmatched => report.unmatched += 1,
    }
}

/// Vote every vertex of `points` and return the resulting groups.
pub fn group_vertices(
    points: &[GeoPoint],
    vertices: &VertexIndex,
    lines: &LineIndexSet,
    config: &Config,
    report: &mut FeatureReport,
) -> GroupMap {
    let tol = &config.tolerance;
    let mut groups = GroupMap::new();
    let mut pending = Vec::new();

    for point in points {
        let candidates = candidate_lines(point, vertices, config);
        if candidates.is_empty() {
            pending.push(*point);
            continue;
        }
        let assignment = assign_vertex(point, candidates, lines, tol, &mut groups);
        record(report, assignment, false);
    }

    for point in &pending {
        let assignment = assign_fallback(point, lines, tol, &mut groups);
        record(report, assignment, true);
    }

    groups
}

/// Match one red feature against the blue indexes.
pub fn match_feature(
    feature: &RedFeature,
    vertices: &VertexIndex,
    lines: &LineIndexSet,
    config: &Config,
) -> OutputFeature {
    let mut report = FeatureReport::default();
    let points = feature.vertices();

    let groups = group_vertices(&points, vertices, lines, config, &mut report);
    report.accepted = accepted_lines(&groups, config.vote_share);

    let (geometry, skipped) = assemble_geometry(&report.accepted, lines);
    report.union_skipped = skipped;

    if report.unmatched > 0 {
        debug!(
            "{} of {} vertices unmatched in feature {:?}",
            report.unmatched,
            points.len(),
            feature.properties.get("id")
        );
    }

    let properties: Map<_, _> = feature
        .properties
        .iter()
        .filter(|(k, _)| **k != config.blue_id_field)
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();

    OutputFeature {
        properties,
        geometry,
        report,
    }
}

/// Match all red features sequentially, in input order.
pub fn match_features(
    features: &[RedFeature],
    vertices: &VertexIndex,
    lines: &LineIndexSet,
    config: &Config,
) -> Vec<OutputFeature> {
    features
        .iter()
        .map(|f| match_feature(f, vertices, lines, config))
        .collect()
}

/// Match all red features on the current rayon pool, preserving input order.
pub fn match_features_parallel(
    features: &[RedFeature],
    vertices: &VertexIndex,
    lines: &LineIndexSet,
    config: &Config,
) -> Vec<OutputFeature> {
    features
        .par_iter()
        .map(|f| match_feature(f, vertices, lines, config))
        .collect()
}

/// Totals over a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunStats {
    pub features: usize,
    pub empty_geometries: usize,
    pub direct: usize,
    pub fallback: usize,
    pub unmatched: usize,
    pub candidate_errors: usize,
    pub union_skipped: usize,
}

impl RunStats {
    pub fn from_outputs(outputs: &[OutputFeature]) -> Self {
        let mut stats = RunStats::default();
        for out in outputs {
            stats.features += 1;
            if out.geometry.0.is_empty() {
                stats.empty_geometries += 1;
            }
            stats.direct += out.report.direct;
            stats.fallback += out.report.fallback;
            stats.unmatched += out.report.unmatched;
            stats.candidate_errors += out.report.candidate_errors;
            stats.union_skipped += out.report.union_skipped;
        }
        stats
    }

    pub fn log_summary(&self) {
        info!("Features matched: {}", self.features);
        info!("  with empty geometry: {}", self.empty_geometries);
        info!(
            "Vertices: {} direct, {} fallback, {} unmatched",
            self.direct, self.fallback, self.unmatched
        );
        if self.candidate_errors > 0 || self.union_skipped > 0 {
            info!(
                "Skipped: {} candidate distance errors, {} empty line geometries",
                self.candidate_errors, self.union_skipped
            );
        }
    }
}
