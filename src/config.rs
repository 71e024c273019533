//! Analysis configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ClusterError, Result};

/// Parameters for a full fuzzy clustering analysis.
///
/// Every field has a default, so a JSON document only needs the fields it
/// wants to override.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Smallest candidate cluster count (>= 2).
    pub k_min: usize,
    /// Largest candidate cluster count (>= k_min, <= number of entities).
    pub k_max: usize,
    /// Fuzziness exponent m (> 1.0).
    pub fuzziness: f64,
    /// Stop when the largest membership change falls below this value.
    pub tolerance: f64,
    /// Iteration cap for every fuzzy c-means fit.
    pub max_iterations: usize,
    /// Seed for membership initialization.
    pub random_seed: u64,
    /// Membership above which an entity counts toward a cluster summary.
    pub membership_threshold: f64,
    /// Fit candidate cluster counts concurrently.
    pub parallel_sweep: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            k_min: 2,
            k_max: 10,
            fuzziness: 2.0,
            tolerance: 1e-5,
            max_iterations: 150,
            random_seed: 42,
            membership_threshold: 0.5,
            parallel_sweep: true,
        }
    }
}

impl AnalysisConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Checks the parameters that do not depend on the data.
    pub fn validate_params(&self) -> Result<()> {
        validate_fuzziness(self.fuzziness)?;
        validate_tolerance(self.tolerance)?;
        validate_max_iterations(self.max_iterations)?;
        validate_k_range(self.k_min, self.k_max)?;
        validate_membership_threshold(self.membership_threshold)?;

        Ok(())
    }

    /// Checks every parameter against a population of `n_entities`.
    pub fn validate(&self, n_entities: usize) -> Result<()> {
        self.validate_params()?;

        if n_entities < self.k_max {
            return Err(ClusterError::InvalidConfig(format!(
                "n_entities={} should be >= k_max={}",
                n_entities, self.k_max
            )));
        }

        Ok(())
    }

    /// Copy of this config with `k_max` lowered so the sweep fits
    /// `n_entities`. A partition into N clusters of N entities has no
    /// defined silhouette, so the cap is N - 1.
    pub fn clamped_to(&self, n_entities: usize) -> Self {
        let mut config = self.clone();
        let cap = n_entities.saturating_sub(1).max(config.k_min);
        config.k_max = config.k_max.min(cap);
        config
    }
}

pub(crate) fn validate_fuzziness(fuzziness: f64) -> Result<()> {
    if !(fuzziness > 1.0) || !fuzziness.is_finite() {
        return Err(ClusterError::InvalidConfig(format!(
            "fuzziness must be a finite value > 1.0, got {}",
            fuzziness
        )));
    }
    Ok(())
}

pub(crate) fn validate_membership_threshold(threshold: f64) -> Result<()> {
    if !(threshold > 0.0 && threshold < 1.0) {
        return Err(ClusterError::InvalidConfig(format!(
            "membership_threshold must be in (0, 1), got {}",
            threshold
        )));
    }
    Ok(())
}

pub(crate) fn validate_tolerance(tolerance: f64) -> Result<()> {
    if !(tolerance > 0.0) {
        return Err(ClusterError::InvalidConfig(format!(
            "tolerance must be > 0, got {}",
            tolerance
        )));
    }
    Ok(())
}

pub(crate) fn validate_max_iterations(max_iterations: usize) -> Result<()> {
    if max_iterations < 1 {
        return Err(ClusterError::InvalidConfig(
            "max_iterations must be >= 1".to_string(),
        ));
    }
    Ok(())
}

pub(crate) fn validate_k_range(k_min: usize, k_max: usize) -> Result<()> {
    if k_min < 2 {
        return Err(ClusterError::InvalidConfig(format!(
            "k_min must be >= 2, got {}",
            k_min
        )));
    }
    if k_max < k_min {
        return Err(ClusterError::InvalidConfig(format!(
            "k_max={} must be >= k_min={}",
            k_max, k_min
        )));
    }
    Ok(())
}
