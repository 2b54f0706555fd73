//! Distance primitives.
//!
//! `geodesic_distance` is the only metric used to accept or reject a match.
//! Planar distances in degree space are used to rank segments of candidate
//! lines against each other.

use crate::geom::compare::Tolerance;
use crate::types::GeoPoint;

/// Mean Earth radius used by the haversine formula, in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Linear meters-per-degree-of-latitude approximation.
pub const METERS_PER_DEGREE: f64 = 111_000.0;

/// Euclidean distance between two points treated as planar coordinates.
pub fn planar_distance(p: &GeoPoint, q: &GeoPoint) -> f64 {
    (*p - *q).length()
}

/// Great-circle distance in meters between two points given in degrees.
pub fn geodesic_distance(p: &GeoPoint, q: &GeoPoint) -> f64 {
    let lat1 = p.lat.to_radians();
    let lat2 = q.lat.to_radians();
    let dlat = lat2 - lat1;
    let dlon = q.lon.to_radians() - p.lon.to_radians();

    let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_M * c
}

/// Convert meters to degrees of latitude with a constant scale.
///
/// Only used to size search windows, never to accept a match.
pub fn degrees_per_meter(meters: f64, meters_per_degree: f64) -> f64 {
    meters / meters_per_degree
}

/// Distance from `a` to the segment `(c, d)`.
///
/// Starts from the nearest endpoint. When the projection of `a` falls
/// between `c` and `d` (both dot products tolerant-non-negative) the
/// perpendicular distance to the line through `c` and `d` replaces it.
/// A degenerate segment keeps the endpoint distance.
pub fn point_to_segment(c: &GeoPoint, d: &GeoPoint, a: &GeoPoint, tol: &Tolerance) -> f64 {
    let mut res = planar_distance(a, c).min(planar_distance(a, d));

    let cd = *d - *c;
    let ca = *a - *c;
    let dc = *c - *d;
    let da = *a - *d;

    let cd_len = cd.length();
    if tol.eq(cd_len, 0.0) {
        return res;
    }

    if tol.gteq(cd.dot(&ca), 0.0) && tol.gteq(dc.dot(&da), 0.0) {
        res = cd.cross(&ca).abs() / cd_len;
    }

    res
}
