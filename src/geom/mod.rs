//! Geometric primitives: tolerant comparison and distances.

pub mod compare;
pub mod distance;

pub use compare::Tolerance;
pub use distance::{
    degrees_per_meter, geodesic_distance, planar_distance, point_to_segment, EARTH_RADIUS_M,
    METERS_PER_DEGREE,
};
