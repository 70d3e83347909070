// Distributed under the GNU Affero General Public License v3.0 or later.
// See accompanying file LICENSE or https://www.gnu.org/licenses/agpl-3.0.html for details.

use serde::{Deserialize, Serialize};

use crate::error::CollisionError;

pub const DEFAULT_GJK_MAX_ITERATIONS: usize = 64;
pub const DEFAULT_EPA_MAX_ITERATIONS: usize = 100_000;
pub const DEFAULT_EPA_TOLERANCE: f32 = 1e-3;

/// Tunables for a GJK/EPA query.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct QueryConfig {
    /// Upper bound on GJK support queries before the input is declared degenerate.
    pub gjk_max_iterations: usize,
    /// Non-convergence guard for the polytope expansion.
    pub epa_max_iterations: usize,
    /// How close the new support distance must come to the closest face before EPA stops.
    pub epa_tolerance: f32,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            gjk_max_iterations: DEFAULT_GJK_MAX_ITERATIONS,
            epa_max_iterations: DEFAULT_EPA_MAX_ITERATIONS,
            epa_tolerance: DEFAULT_EPA_TOLERANCE,
        }
    }
}

impl QueryConfig {
    pub fn validate(&self) -> Result<(), CollisionError> {
        if self.gjk_max_iterations == 0 {
            return Err(CollisionError::invalid("gjk_max_iterations must be at least 1"));
        }
        if self.epa_max_iterations == 0 {
            return Err(CollisionError::invalid("epa_max_iterations must be at least 1"));
        }
        if !self.epa_tolerance.is_finite() || self.epa_tolerance <= 0.0 {
            return Err(CollisionError::invalid("epa_tolerance must be a positive number"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = QueryConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.epa_max_iterations, 100_000);
        assert_eq!(config.epa_tolerance, 1e-3);
    }

    #[test]
    fn rejects_zero_caps_and_bad_tolerance() {
        let mut config = QueryConfig {
            gjk_max_iterations: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(CollisionError::InvalidInput { .. })
        ));

        config.gjk_max_iterations = 8;
        config.epa_max_iterations = 0;
        assert!(config.validate().is_err());

        config.epa_max_iterations = 8;
        config.epa_tolerance = f32::NAN;
        assert!(config.validate().is_err());

        config.epa_tolerance = -1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn partial_toml_falls_back_to_defaults() {
        let config: QueryConfig = toml::from_str("epa_tolerance = 0.01").unwrap();
        assert_eq!(config.epa_tolerance, 0.01);
        assert_eq!(config.gjk_max_iterations, DEFAULT_GJK_MAX_ITERATIONS);
        assert_eq!(config.epa_max_iterations, DEFAULT_EPA_MAX_ITERATIONS);
    }
}
