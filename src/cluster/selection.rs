use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info};

use crate::cluster::FuzzyCMeans;
use crate::config::{validate_k_range, AnalysisConfig};
use crate::error::{ClusterError, Result};
use crate::metrics;
use crate::Matrix;

/// Silhouette score of one candidate cluster count.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CandidateScore {
    pub k: usize,
    pub silhouette: f64,
    pub converged: bool,
}

/// Scores of every candidate in ascending k order, plus the winner.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SilhouetteSweep {
    pub best_k: usize,
    pub scores: Vec<CandidateScore>,
}

impl SilhouetteSweep {
    pub fn best_score(&self) -> Option<f64> {
        self.scores
            .iter()
            .find(|c| c.k == self.best_k)
            .map(|c| c.silhouette)
    }
}

/// Picks the cluster count whose fuzzy c-means fit gives the best silhouette
/// score on the crisp (arg-max) partition.
#[derive(Clone, Debug)]
pub struct SilhouetteSelector {
    k_min: usize,
    k_max: usize,
    fuzziness: f64,
    tolerance: f64,
    max_iter: usize,
    random_state: u64,
    parallel: bool,
}

impl SilhouetteSelector {
    pub fn new(k_min: usize, k_max: usize) -> Self {
        Self {
            k_min,
            k_max,
            fuzziness: 2.0,
            tolerance: 1e-5,
            max_iter: 150,
            random_state: 42,
            parallel: true,
        }
    }

    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self::new(config.k_min, config.k_max)
            .fuzziness(config.fuzziness)
            .tolerance(config.tolerance)
            .max_iter(config.max_iterations)
            .random_state(config.random_seed)
            .parallel(config.parallel_sweep)
    }

    pub fn fuzziness(mut self, fuzziness: f64) -> Self {
        self.fuzziness = fuzziness;
        self
    }

    pub fn tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    pub fn random_state(mut self, random_state: u64) -> Self {
        self.random_state = random_state;
        self
    }

    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Fuzzy c-means configured like this selector's candidates.
    pub fn estimator(&self, k: usize) -> FuzzyCMeans {
        FuzzyCMeans::new(k)
            .fuzziness(self.fuzziness)
            .tolerance(self.tolerance)
            .max_iter(self.max_iter)
            .random_state(self.random_state)
    }

    pub fn select_k(&self, x: &Matrix) -> Result<usize> {
        Ok(self.sweep(x)?.best_k)
    }

    /// Fits and scores every k in `[k_min, k_max]`.
    ///
    /// Ties go to the smallest k whether or not the fits ran in parallel.
    pub fn sweep(&self, x: &Matrix) -> Result<SilhouetteSweep> {
        validate_k_range(self.k_min, self.k_max)?;
        if x.nrows() < self.k_max {
            return Err(ClusterError::InvalidConfig(format!(
                "n_samples={} should be >= k_max={}",
                x.nrows(),
                self.k_max
            )));
        }

        let candidates: Vec<usize> = (self.k_min..=self.k_max).collect();
        let scores: Vec<CandidateScore> = if self.parallel {
            candidates
                .into_par_iter()
                .map(|k| self.score_candidate(x, k))
                .collect::<Result<_>>()?
        } else {
            candidates
                .into_iter()
                .map(|k| self.score_candidate(x, k))
                .collect::<Result<_>>()?
        };

        let best = scores
            .iter()
            .fold(None::<&CandidateScore>, |best, candidate| match best {
                Some(b) if b.silhouette >= candidate.silhouette => Some(b),
                _ => Some(candidate),
            })
            .ok_or_else(|| ClusterError::InvalidConfig("empty candidate range".to_string()))?;

        info!(best_k = best.k, silhouette = best.silhouette, "selected cluster count");

        Ok(SilhouetteSweep {
            best_k: best.k,
            scores,
        })
    }

    fn score_candidate(&self, x: &Matrix, k: usize) -> Result<CandidateScore> {
        let mut fcm = self.estimator(k);
        let labels = fcm.fit_predict(x)?;
        let silhouette = metrics::silhouette_score(x, &labels)?;

        debug!(k, silhouette, "scored candidate cluster count");

        Ok(CandidateScore {
            k,
            silhouette,
            converged: fcm.converged.unwrap_or(false),
        })
    }
}
