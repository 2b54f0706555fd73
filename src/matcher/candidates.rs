//! Windowed candidate search.
//!
//! For a red vertex, scan latitude bands of growing radius over the global
//! vertex index and collect every blue line with a vertex within `eps`
//! meters. Radii grow by `search_step` up to `eps`.

use indexmap::IndexSet;

use crate::config::Config;
use crate::geom::distance::{degrees_per_meter, geodesic_distance};
use crate::index::VertexIndex;
use crate::types::{GeoPoint, LineId, SearchPolicy};

/// Blue lines with at least one vertex within `config.eps` of `point`.
///
/// Lines come out in the order their vertices were scanned, which makes the
/// result deterministic for identical inputs.
///
/// With [`SearchPolicy::FirstNonEmpty`] the scan stops at the first radius
/// that finds anything. A line found there is accepted even if a closer line
/// would only have shown up at a larger radius, and a larger `eps` does not
/// change a result that was already non-empty at a smaller radius.
pub fn candidate_lines(point: &GeoPoint, index: &VertexIndex, config: &Config) -> IndexSet<LineId> {
    let mut found = IndexSet::new();

    for radius in config.search_radii() {
        let offset = degrees_per_meter(radius, config.meters_per_degree);

        for record in index.window(point.lat - offset, point.lat + offset) {
            if geodesic_distance(point, &record.point) <= config.eps {
                found.insert(record.line);
            }
        }

        if config.search_policy == SearchPolicy::FirstNonEmpty && !found.is_empty() {
            break;
        }
    }

    found
}
