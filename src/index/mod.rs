//! Spatial indexes over the blue network, built once and read-only afterwards.

pub mod line_index;
pub mod vertex_index;

pub use line_index::{LineIndex, LineIndexSet};
pub use vertex_index::VertexIndex;
