use ndarray::Axis;
use serde::Serialize;
use tracing::warn;

use crate::config::validate_membership_threshold;
use crate::dataset::FeatureMatrix;
use crate::error::{ClusterError, Degeneracy, Result};
use crate::{Matrix, Vector};

/// Statistical profile of the entities that belong to one cluster.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ClusterSummary {
    pub cluster: usize,
    /// Entities whose membership exceeds the threshold.
    pub size: usize,
    /// Feature means over the members; `None` when the cluster is empty.
    pub mean: Option<Vector>,
    /// Sample standard deviation (ddof = 1); `None` with fewer than two members.
    pub std: Option<Vector>,
    pub members: Vec<String>,
    /// Center in original feature units.
    pub center: Vector,
}

/// Builds per-cluster summaries from a fitted membership matrix.
///
/// An entity belongs to cluster k when `U[i][k] > threshold`, so it can
/// count toward several clusters or toward none.
#[derive(Clone, Debug)]
pub struct ClusterCharacterizer {
    threshold: f64,
}

impl Default for ClusterCharacterizer {
    fn default() -> Self {
        Self { threshold: 0.5 }
    }
}

impl ClusterCharacterizer {
    /// Fails unless `threshold` lies in (0, 1); NaN is rejected.
    pub fn new(threshold: f64) -> Result<Self> {
        validate_membership_threshold(threshold)?;
        Ok(Self { threshold })
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn summarize(
        &self,
        features: &FeatureMatrix,
        membership: &Matrix,
        centers: &Matrix,
    ) -> Result<Vec<ClusterSummary>> {
        let n_clusters = membership.ncols();
        if membership.nrows() != features.n_entities() {
            return Err(ClusterError::InvalidInput(format!(
                "membership has {} rows for {} entities",
                membership.nrows(),
                features.n_entities()
            )));
        }
        if centers.nrows() != n_clusters {
            return Err(ClusterError::InvalidInput(format!(
                "{} centers for {} clusters",
                centers.nrows(),
                n_clusters
            )));
        }
        if centers.ncols() != features.n_features() {
            return Err(ClusterError::DimensionMismatch {
                expected: features.n_features(),
                found: centers.ncols(),
            });
        }

        let summaries = (0..n_clusters)
            .map(|k| {
                let selected: Vec<usize> = membership
                    .column(k)
                    .iter()
                    .enumerate()
                    .filter(|&(_, &u)| u > self.threshold)
                    .map(|(i, _)| i)
                    .collect();

                let subset = features.values.select(Axis(0), &selected);
                let mean = subset.mean_axis(Axis(0));
                let std = if selected.len() >= 2 {
                    Some(subset.std_axis(Axis(0), 1.0))
                } else {
                    None
                };

                ClusterSummary {
                    cluster: k,
                    size: selected.len(),
                    mean,
                    std,
                    members: selected.iter().map(|&i| features.entities[i].clone()).collect(),
                    center: centers.row(k).to_owned(),
                }
            })
            .collect();

        Ok(summaries)
    }

    /// Entities that fall under the threshold for every cluster and so appear
    /// in no summary.
    pub fn unassigned(&self, membership: &Matrix) -> Vec<Degeneracy> {
        membership
            .axis_iter(Axis(0))
            .enumerate()
            .filter(|(_, row)| row.iter().all(|&u| u <= self.threshold))
            .map(|(entity, _)| {
                warn!(entity, threshold = self.threshold, "entity has no majority membership");
                Degeneracy::NoMajorityMembership { entity }
            })
            .collect()
    }
}
