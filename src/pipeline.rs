//! End-to-end fuzzy profile analysis.
//!
//! Standardize, choose k by silhouette sweep, fit the final fuzzy c-means,
//! project to two dimensions and summarize clusters. The same routine serves
//! every entity kind (model, persona, text) and every metric group; labels,
//! chart styling and file output are the caller's business.

use ndarray::Axis;
use serde::Serialize;
use tracing::info;

use crate::cluster::{ClusterCharacterizer, ClusterSummary, SilhouetteSelector, SilhouetteSweep};
use crate::config::AnalysisConfig;
use crate::dataset::FeatureMatrix;
use crate::decomposition::{self, Projection2D};
use crate::error::{ClusterError, Degeneracy, Result};
use crate::metrics::{self, DescriptiveStats};
use crate::preprocessing::StandardScaler;
use crate::Matrix;

/// Strongest cluster of one entity.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DominantCluster {
    pub cluster: usize,
    pub membership: f64,
}

/// Everything one analysis run produces, ready for a reporting sink.
#[derive(Clone, Debug, Serialize)]
pub struct AnalysisReport {
    pub entities: Vec<String>,
    pub features: Vec<String>,
    pub n_clusters: usize,
    pub sweep: SilhouetteSweep,
    /// N x K fuzzy memberships, rows sum to 1.
    pub membership: Matrix,
    /// K x D centers in original feature units.
    pub centers: Matrix,
    pub dominant: Vec<DominantCluster>,
    pub converged: bool,
    pub n_iter: usize,
    pub partition_coefficient: f64,
    pub partition_entropy: f64,
    pub projection: Projection2D,
    pub summaries: Vec<ClusterSummary>,
    /// N x N Pearson correlation between raw entity profiles.
    pub correlation: Matrix,
    pub feature_statistics: Vec<DescriptiveStats>,
    pub degeneracies: Vec<Degeneracy>,
}

impl AnalysisReport {
    pub fn crisp_labels(&self) -> Vec<usize> {
        self.dominant.iter().map(|d| d.cluster).collect()
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[derive(Clone, Debug, Default)]
pub struct FuzzyProfileAnalysis {
    config: AnalysisConfig,
}

impl FuzzyProfileAnalysis {
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn run(&self, features: &FeatureMatrix) -> Result<AnalysisReport> {
        self.config.validate(features.n_entities())?;

        info!(
            entities = features.n_entities(),
            features = features.n_features(),
            k_min = self.config.k_min,
            k_max = self.config.k_max,
            "starting fuzzy profile analysis"
        );

        let mut scaler = StandardScaler::new();
        let standardized = scaler.fit_transform(&features.values)?;
        let mut degeneracies = scaler.degeneracies.clone();

        let selector = SilhouetteSelector::from_config(&self.config);
        let sweep = selector.sweep(&standardized)?;

        let mut fcm = selector.estimator(sweep.best_k);
        fcm.fit(&standardized)?;
        let membership = fcm
            .membership
            .clone()
            .ok_or(ClusterError::NotFitted("FuzzyCMeans"))?;
        let centers = fcm.original_centers(&scaler)?;

        let standardized_centers = scaler.transform(&centers)?;
        let (projection, projection_degeneracies) =
            decomposition::project(&standardized, &standardized_centers)?;
        degeneracies.extend(projection_degeneracies);

        let characterizer = ClusterCharacterizer::new(self.config.membership_threshold)?;
        let summaries = characterizer.summarize(features, &membership, &centers)?;
        degeneracies.extend(characterizer.unassigned(&membership));

        let dominant = membership
            .axis_iter(Axis(0))
            .zip(metrics::crisp_labels(&membership))
            .map(|(row, cluster)| DominantCluster {
                cluster,
                membership: row[cluster],
            })
            .collect();

        let report = AnalysisReport {
            entities: features.entities.clone(),
            features: features.features.clone(),
            n_clusters: sweep.best_k,
            partition_coefficient: metrics::partition_coefficient(&membership),
            partition_entropy: metrics::partition_entropy(&membership),
            converged: fcm.converged.unwrap_or(false),
            n_iter: fcm.n_iter.unwrap_or(0),
            sweep,
            membership,
            centers,
            dominant,
            projection,
            summaries,
            correlation: metrics::entity_correlation(&features.values),
            feature_statistics: metrics::describe_columns(&features.values)?,
            degeneracies,
        };

        info!(
            n_clusters = report.n_clusters,
            converged = report.converged,
            degeneracies = report.degeneracies.len(),
            "fuzzy profile analysis finished"
        );

        Ok(report)
    }
}
