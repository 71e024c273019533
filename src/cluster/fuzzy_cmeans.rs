use ndarray::{ArrayView1, Axis, Zip};
use ndarray_rand::rand_distr::Uniform;
use ndarray_rand::RandomExt;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, warn};

use crate::config::{validate_fuzziness, validate_max_iterations, validate_tolerance};
use crate::error::{ClusterError, Result};
use crate::metrics;
use crate::preprocessing::StandardScaler;
use crate::Matrix;

/// Fuzzy c-means clustering.
///
/// After `fit`, `membership` holds an N x K matrix whose rows sum to 1 and
/// `cluster_centers` holds the K x D centers in the space of the fitted input
/// (standardized space when fed a [`StandardScaler`] output). Use
/// [`FuzzyCMeans::original_centers`] to report centers in raw units.
#[derive(Clone, Debug)]
pub struct FuzzyCMeans {
    pub membership: Option<Matrix>,
    pub cluster_centers: Option<Matrix>,
    pub n_iter: Option<usize>,
    /// `false` when the iteration cap was hit before the tolerance was met.
    pub converged: Option<bool>,
    n_clusters: usize,
    fuzziness: f64,
    tolerance: f64,
    max_iter: usize,
    random_state: u64,
}

impl FuzzyCMeans {
    pub fn new(n_clusters: usize) -> Self {
        Self {
            membership: None,
            cluster_centers: None,
            n_iter: None,
            converged: None,
            n_clusters,
            fuzziness: 2.0,
            tolerance: 1e-5,
            max_iter: 150,
            random_state: 42,
        }
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

    pub fn n_clusters(&self) -> usize {
        self.n_clusters
    }

    pub fn fit(&mut self, x: &Matrix) -> Result<()> {
        self.validate(x)?;

        let mut rng = StdRng::seed_from_u64(self.random_state);
        let mut membership = Matrix::random_using(
            (x.nrows(), self.n_clusters),
            Uniform::new(0.0, 1.0),
            &mut rng,
        );
        normalize_rows(&mut membership);

        let mut centers: Option<Matrix> = None;
        let mut converged = false;
        let mut n_iter = 0;

        for iteration in 1..=self.max_iter {
            n_iter = iteration;

            let next_centers = self.compute_centers(x, &membership, centers.as_ref());
            let next_membership = self.compute_membership(x, &next_centers);

            let max_change = Zip::from(&membership)
                .and(&next_membership)
                .fold(0.0_f64, |acc, &old, &new| acc.max((old - new).abs()));

            membership = next_membership;
            centers = Some(next_centers);

            if max_change < self.tolerance {
                converged = true;
                break;
            }
        }

        if converged {
            debug!(n_clusters = self.n_clusters, n_iter, "fuzzy c-means converged");
        } else {
            warn!(
                n_clusters = self.n_clusters,
                max_iter = self.max_iter,
                "fuzzy c-means hit the iteration cap, keeping last iterate"
            );
        }

        self.membership = Some(membership);
        self.cluster_centers = centers;
        self.n_iter = Some(n_iter);
        self.converged = Some(converged);

        Ok(())
    }

    /// Memberships of new points against the fitted centers.
    pub fn soft_predict(&self, x: &Matrix) -> Result<Matrix> {
        let centers = self.fitted_centers()?;

        if x.ncols() != centers.ncols() {
            return Err(ClusterError::DimensionMismatch {
                expected: centers.ncols(),
                found: x.ncols(),
            });
        }

        Ok(self.compute_membership(x, centers))
    }

    /// Crisp label (index of the largest membership) for each point.
    pub fn predict(&self, x: &Matrix) -> Result<Vec<usize>> {
        let membership = self.soft_predict(x)?;
        Ok(metrics::crisp_labels(&membership))
    }

    pub fn fit_predict(&mut self, x: &Matrix) -> Result<Vec<usize>> {
        self.fit(x)?;
        Ok(metrics::crisp_labels(self.fitted_membership()?))
    }

    /// Fitted centers mapped back through the scaler that produced the input.
    pub fn original_centers(&self, scaler: &StandardScaler) -> Result<Matrix> {
        scaler.inverse_transform(self.fitted_centers()?)
    }

    pub fn partition_coefficient(&self) -> Result<f64> {
        Ok(metrics::partition_coefficient(self.fitted_membership()?))
    }

    pub fn partition_entropy(&self) -> Result<f64> {
        Ok(metrics::partition_entropy(self.fitted_membership()?))
    }

    fn validate(&self, x: &Matrix) -> Result<()> {
        if x.nrows() == 0 || x.ncols() == 0 {
            return Err(ClusterError::InvalidInput(
                "input matrix must have at least one sample and one feature".to_string(),
            ));
        }
        if self.n_clusters < 2 {
            return Err(ClusterError::InvalidConfig(format!(
                "n_clusters must be >= 2, got {}",
                self.n_clusters
            )));
        }
        if x.nrows() < self.n_clusters {
            return Err(ClusterError::InvalidConfig(format!(
                "n_samples={} should be >= n_clusters={}",
                x.nrows(),
                self.n_clusters
            )));
        }
        validate_fuzziness(self.fuzziness)?;
        validate_tolerance(self.tolerance)?;
        validate_max_iterations(self.max_iter)?;
        Ok(())
    }

    fn fitted_centers(&self) -> Result<&Matrix> {
        self.cluster_centers
            .as_ref()
            .ok_or(ClusterError::NotFitted("FuzzyCMeans"))
    }

    fn fitted_membership(&self) -> Result<&Matrix> {
        self.membership
            .as_ref()
            .ok_or(ClusterError::NotFitted("FuzzyCMeans"))
    }

    /// `C[k] = sum_i(U[i][k]^m * x[i]) / sum_i(U[i][k]^m)`.
    ///
    /// A cluster whose weights are all zero keeps its previous center, or the
    /// data mean on the first iteration.
    fn compute_centers(&self, x: &Matrix, membership: &Matrix, previous: Option<&Matrix>) -> Matrix {
        let weights = membership.mapv(|u| u.powf(self.fuzziness));
        let mut centers = weights.t().dot(x);

        for (k, mut center) in centers.axis_iter_mut(Axis(0)).enumerate() {
            let total = weights.column(k).sum();
            if total > f64::EPSILON {
                center /= total;
            } else if let Some(previous) = previous {
                center.assign(&previous.row(k));
            } else if let Some(mean) = x.mean_axis(Axis(0)) {
                center.assign(&mean);
            }
        }

        centers
    }

    fn compute_membership(&self, x: &Matrix, centers: &Matrix) -> Matrix {
        let mut membership = Matrix::zeros((x.nrows(), centers.nrows()));
        let exponent = 1.0 / (self.fuzziness - 1.0);

        for (point, mut row) in x.axis_iter(Axis(0)).zip(membership.axis_iter_mut(Axis(0))) {
            let distances: Vec<f64> = centers
                .axis_iter(Axis(0))
                .map(|center| squared_distance(&point, &center))
                .collect();

            // A point sitting exactly on a center belongs to it alone.
            if let Some(k) = distances.iter().position(|&d| d == 0.0) {
                row[k] = 1.0;
                continue;
            }

            // Equivalent to 1 / sum_j (d_k / d_j)^(1 / (m - 1)) on squared
            // distances, scaled by the nearest distance to stay within (0, 1].
            let nearest = distances.iter().copied().fold(f64::INFINITY, f64::min);
            for (u, &d) in row.iter_mut().zip(distances.iter()) {
                *u = (nearest / d).powf(exponent);
            }
            let total = row.sum();
            row /= total;
        }

        membership
    }
}

fn squared_distance(a: &ArrayView1<f64>, b: &ArrayView1<f64>) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y) * (x - y))
        .sum()
}

fn normalize_rows(matrix: &mut Matrix) {
    let width = matrix.ncols() as f64;
    for mut row in matrix.axis_iter_mut(Axis(0)) {
        let total = row.sum();
        if total > 0.0 {
            row /= total;
        } else {
            row.fill(1.0 / width);
        }
    }
}
