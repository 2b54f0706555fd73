//! Readers for the red and blue line datasets.

pub mod geojson;
pub mod util;

pub use geojson::{check_crs, read_blue_lines, read_red_features, BlueDataset, RedDataset};
pub use util::open_dataset;
