//! Matching of red features onto the blue network.

pub mod assemble;
pub mod candidates;
pub mod voting;

pub use assemble::{match_feature, match_features, match_features_parallel, RunStats};
pub use candidates::candidate_lines;
pub use voting::{assign_fallback, assign_vertex, GroupMap};
