//! Fuzzy clustering and projection of entity feature profiles.
//!
//! One feature vector per entity goes in; out come a cluster count chosen by
//! silhouette score, soft memberships from fuzzy c-means, a two-dimensional
//! PCA projection and per-cluster summaries. See [`FuzzyProfileAnalysis`] for
//! the end-to-end entry point.

pub use ndarray::{Array1, Array2, ArrayView1, ArrayView2};

pub mod cluster;
pub mod config;
pub mod dataset;
pub mod decomposition;
pub mod error;
pub mod metrics;
pub mod pipeline;
pub mod preprocessing;

pub type Vector = Array1<f64>;
pub type Matrix = Array2<f64>;

pub use cluster::{ClusterSummary, FuzzyCMeans, SilhouetteSelector, SilhouetteSweep};
pub use config::AnalysisConfig;
pub use dataset::FeatureMatrix;
pub use decomposition::{PCA, Projection2D};
pub use error::{ClusterError, Degeneracy, Result};
pub use pipeline::{AnalysisReport, FuzzyProfileAnalysis};
pub use preprocessing::StandardScaler;
