//! Configuration and defaults for linematch.
//!
//! This module contains the configuration structure and default values
//! that control the red-to-blue line matching behavior.

use crate::error::MatchError;
use crate::geom::compare::Tolerance;
use crate::geom::distance::METERS_PER_DEGREE;
use crate::types::SearchPolicy;

/// Attributes every red feature must carry.
pub const DEFAULT_RED_FIELDS: [&str; 6] = [
    "id",
    "road_id",
    "road_part_id",
    "start_m",
    "finish_m",
    "road_name",
];

/// Configuration for the matching process.
#[derive(Debug, Clone)]
pub struct Config {
    /// Match tolerance in meters.
    pub eps: f64,
    /// Comparator used by the segment tests.
    pub tolerance: Tolerance,
    /// Whether the windowed search stops at the first non-empty radius.
    pub search_policy: SearchPolicy,
    /// Radius increment of the windowed search, in meters.
    pub search_step: f64,
    /// Fraction of a feature's votes a line needs to contribute geometry.
    pub vote_share: f64,
    /// Scale used to turn search radii into degrees.
    pub meters_per_degree: f64,
    /// Attributes every red feature must carry.
    pub required_red_fields: Vec<String>,
    /// Identifier attribute of blue features (dropped from the output).
    pub blue_id_field: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            eps: 30.0,
            tolerance: Tolerance::default(),
            search_policy: SearchPolicy::FirstNonEmpty,
            search_step: 10.0,
            vote_share: 0.1,
            meters_per_degree: METERS_PER_DEGREE,
            required_red_fields: DEFAULT_RED_FIELDS.iter().map(|s| s.to_string()).collect(),
            blue_id_field: "link_id".to_string(),
        }
    }
}

impl Config {
    /// Create a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the match tolerance in meters.
    ///
    /// Values below the search step are accepted but make every search empty.
    pub fn set_eps(&mut self, eps: f64) -> Result<(), MatchError> {
        if !eps.is_finite() || eps <= 0.0 {
            return Err(MatchError::InvalidConfig(format!(
                "eps must be a positive number of meters, got {}",
                eps
            )));
        }
        self.eps = eps;
        Ok(())
    }

    /// Set the acceptance fraction, in (0, 1].
    pub fn set_vote_share(&mut self, share: f64) -> Result<(), MatchError> {
        if !(share > 0.0 && share <= 1.0) {
            return Err(MatchError::InvalidConfig(format!(
                "vote share must lie in (0, 1], got {}",
                share
            )));
        }
        self.vote_share = share;
        Ok(())
    }

    /// Set the comparator tolerance.
    pub fn set_tolerance(&mut self, epsilon: f64) -> Result<(), MatchError> {
        if !epsilon.is_finite() || epsilon < 0.0 {
            return Err(MatchError::InvalidConfig(format!(
                "tolerance must be a non-negative number, got {}",
                epsilon
            )));
        }
        self.tolerance = Tolerance::new(epsilon);
        Ok(())
    }

    /// Search radii in meters: `step, 2*step, ...` up to and including `eps`.
    pub fn search_radii(&self) -> impl Iterator<Item = f64> + '_ {
        let steps = (self.eps / self.search_step).floor().max(0.0) as usize;
        (1..=steps).map(move |k| k as f64 * self.search_step)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.eps, 30.0);
        assert_eq!(config.tolerance.epsilon, 1e-8);
        assert_eq!(config.search_policy, SearchPolicy::FirstNonEmpty);
        assert_eq!(config.search_step, 10.0);
        assert_eq!(config.vote_share, 0.1);
        assert_eq!(config.meters_per_degree, 111_000.0);
        assert_eq!(config.required_red_fields.len(), 6);
        assert_eq!(config.blue_id_field, "link_id");
    }

    #[test]
    fn test_set_eps() {
        let mut config = Config::new();
        assert!(config.set_eps(25.0).is_ok());
        assert_eq!(config.eps, 25.0);

        assert!(config.set_eps(0.0).is_err());
        assert!(config.set_eps(-5.0).is_err());
        assert!(config.set_eps(f64::NAN).is_err());
        assert_eq!(config.eps, 25.0);
    }

    #[test]
    fn test_set_vote_share() {
        let mut config = Config::new();
        assert!(config.set_vote_share(1.0).is_ok());
        assert!(config.set_vote_share(0.0).is_err());
        assert!(config.set_vote_share(1.5).is_err());
        assert_eq!(config.vote_share, 1.0);
    }

    #[test]
    fn test_search_radii() {
        let mut config = Config::new();
        config.eps = 35.0;
        assert_eq!(config.search_radii().collect::<Vec<_>>(), vec![10.0, 20.0, 30.0]);

        config.eps = 30.0;
        assert_eq!(config.search_radii().collect::<Vec<_>>(), vec![10.0, 20.0, 30.0]);

        config.eps = 10.0;
        assert_eq!(config.search_radii().collect::<Vec<_>>(), vec![10.0]);
    }

    #[test]
    fn test_search_radii_below_step() {
        let mut config = Config::new();
        config.eps = 5.0;
        assert_eq!(config.search_radii().count(), 0);

        config.eps = 9.99;
        assert_eq!(config.search_radii().count(), 0);
    }
}
