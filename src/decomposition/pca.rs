use ndarray::Axis;
use serde::Serialize;
use tracing::warn;

use crate::error::{ClusterError, Degeneracy, Result};
use crate::{Matrix, Vector};

/// Eigenvalues at or below this fraction of the total variance carry no
/// information.
const INFORMATIVE_EPS: f64 = 1e-10;

/// Principal component analysis by power iteration with deflation.
///
/// Axes whose eigenvalue is numerically zero are returned as zero rows of
/// `components`, so a rank-deficient input still yields `n_components` axes
/// with only `informative_components` of them meaningful. The sign of each
/// axis is arbitrary.
#[derive(Clone, Debug)]
pub struct PCA {
    pub components: Option<Matrix>,
    pub explained_variance: Option<Vector>,
    pub explained_variance_ratio: Option<Vector>,
    pub mean: Option<Vector>,
    pub informative_components: Option<usize>,
    pub degeneracies: Vec<Degeneracy>,
    n_components: usize,
    max_iter: usize,
    tolerance: f64,
}

impl PCA {
    pub fn new() -> Self {
        Self {
            components: None,
            explained_variance: None,
            explained_variance_ratio: None,
            mean: None,
            informative_components: None,
            degeneracies: Vec::new(),
            n_components: 2,
            max_iter: 1000,
            tolerance: 1e-12,
        }
    }

    pub fn n_components(mut self, n_components: usize) -> Self {
        self.n_components = n_components;
        self
    }

    pub fn max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    pub fn fit(&mut self, x: &Matrix) -> Result<()> {
        if x.nrows() < 2 || x.ncols() == 0 {
            return Err(ClusterError::InvalidInput(
                "PCA needs at least two samples and one feature".to_string(),
            ));
        }
        if self.n_components == 0 {
            return Err(ClusterError::InvalidConfig(
                "n_components must be > 0".to_string(),
            ));
        }

        let n_samples = x.nrows() as f64;
        let n_features = x.ncols();

        let mean = x
            .mean_axis(Axis(0))
            .ok_or_else(|| ClusterError::InvalidInput("failed to compute mean".to_string()))?;
        let x_centered = x - &mean.view().insert_axis(Axis(0));

        let cov = x_centered.t().dot(&x_centered) / (n_samples - 1.0);
        let total_variance = cov.diag().sum();

        let (eigenvalues, eigenvectors) = self.eigen_decomposition(&cov);

        let mut components = Matrix::zeros((self.n_components, n_features));
        let mut explained_variance = Vector::zeros(self.n_components);
        let mut informative = 0;
        for (i, (value, vector)) in eigenvalues.iter().zip(eigenvectors.iter()).enumerate() {
            if *value > INFORMATIVE_EPS * total_variance && total_variance > 0.0 {
                components.row_mut(i).assign(vector);
                explained_variance[i] = *value;
                informative += 1;
            }
        }

        let explained_variance_ratio = if total_variance > 0.0 {
            &explained_variance / total_variance
        } else {
            Vector::zeros(self.n_components)
        };

        self.degeneracies.clear();
        if informative < self.n_components {
            warn!(
                informative_axes = informative,
                requested = self.n_components,
                "rank-deficient covariance, fewer informative principal axes"
            );
            self.degeneracies.push(Degeneracy::RankDeficient {
                informative_axes: informative,
            });
        }

        self.components = Some(components);
        self.explained_variance = Some(explained_variance);
        self.explained_variance_ratio = Some(explained_variance_ratio);
        self.mean = Some(mean);
        self.informative_components = Some(informative);

        Ok(())
    }

    pub fn transform(&self, x: &Matrix) -> Result<Matrix> {
        let components = self.components.as_ref().ok_or(ClusterError::NotFitted("PCA"))?;
        let mean = self.mean.as_ref().ok_or(ClusterError::NotFitted("PCA"))?;

        if x.ncols() != mean.len() {
            return Err(ClusterError::DimensionMismatch {
                expected: mean.len(),
                found: x.ncols(),
            });
        }

        let x_centered = x - &mean.view().insert_axis(Axis(0));
        Ok(x_centered.dot(&components.t()))
    }

    pub fn fit_transform(&mut self, x: &Matrix) -> Result<Matrix> {
        self.fit(x)?;
        self.transform(x)
    }

    /// Leading eigenpairs of a symmetric positive semi-definite matrix, in
    /// descending eigenvalue order. At most `n_components` pairs are returned.
    ///
    /// Deflation does not visit eigenpairs in eigenvalue order, so every pair
    /// is extracted before sorting.
    fn eigen_decomposition(&self, matrix: &Matrix) -> (Vec<f64>, Vec<Vector>) {
        let n = matrix.nrows();

        let mut eigen_pairs: Vec<(f64, Vector)> = Vec::with_capacity(n);
        let mut a = matrix.clone();

        for _ in 0..n {
            let start = a
                .axis_iter(Axis(1))
                .max_by(|p, q| p.dot(p).total_cmp(&q.dot(q)))
                .map(|column| column.to_owned());
            let Some(mut v) = start else { break };

            let norm = v.dot(&v).sqrt();
            if norm <= f64::MIN_POSITIVE {
                break;
            }
            v /= norm;

            for _ in 0..self.max_iter {
                let av = a.dot(&v);
                let norm = av.dot(&av).sqrt();
                if norm <= f64::MIN_POSITIVE {
                    break;
                }
                let next = av / norm;
                let shift = (&next - &v).mapv(f64::abs).fold(0.0_f64, |m, &d| m.max(d));
                v = next;
                if shift < self.tolerance {
                    break;
                }
            }

            let lambda = v.dot(&a.dot(&v)).max(0.0);

            // Deflation: remove the found eigenvalue/eigenvector
            let vv = v
                .view()
                .insert_axis(Axis(1))
                .dot(&v.view().insert_axis(Axis(0)));
            a = &a - &(vv * lambda);

            eigen_pairs.push((lambda, v));
        }

        eigen_pairs.sort_by(|p, q| q.0.total_cmp(&p.0));
        eigen_pairs.truncate(self.n_components);

        eigen_pairs.into_iter().unzip()
    }
}

impl Default for PCA {
    fn default() -> Self {
        Self::new()
    }
}

/// Entities and cluster centers in one two-dimensional principal frame.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Projection2D {
    /// 2 x D principal axes; uninformative axes are zero rows.
    pub axes: Matrix,
    /// N x 2 entity coordinates.
    pub entities: Matrix,
    /// K x 2 center coordinates.
    pub centers: Matrix,
    pub explained_variance_ratio: Vector,
    pub informative_axes: usize,
}

/// Fits two principal axes on the standardized entity matrix and projects both
/// the entities and the (standardized) cluster centers onto them.
pub fn project(
    standardized: &Matrix,
    standardized_centers: &Matrix,
) -> Result<(Projection2D, Vec<Degeneracy>)> {
    let mut pca = PCA::new().n_components(2);
    let entities = pca.fit_transform(standardized)?;
    let centers = pca.transform(standardized_centers)?;

    let projection = Projection2D {
        axes: pca.components.take().unwrap_or_default(),
        entities,
        centers,
        explained_variance_ratio: pca.explained_variance_ratio.take().unwrap_or_default(),
        informative_axes: pca.informative_components.unwrap_or(0),
    };

    Ok((projection, pca.degeneracies))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn test_pca_basic() {
        let x = array![
            [1.0, 2.0, 3.0],
            [4.0, 5.0, 7.0],
            [7.0, 8.0, 8.0],
            [10.0, 11.0, 12.0]
        ];

        let mut pca = PCA::new();
        let transformed = pca.fit_transform(&x).unwrap();

        assert_eq!(transformed.shape(), &[4, 2]);
        assert_eq!(pca.components.as_ref().unwrap().shape(), &[2, 3]);
        assert!(pca.explained_variance.is_some());
        assert!(pca.mean.is_some());
        assert_eq!(pca.informative_components, Some(2));
    }

    #[test]
    fn test_axes_are_orthonormal() {
        let x = array![
            [2.5, 2.4, 0.5],
            [0.5, 0.7, 1.5],
            [2.2, 2.9, 0.2],
            [1.9, 2.2, 0.9],
            [3.1, 3.0, 0.1],
            [2.3, 2.7, 1.1]
        ];

        let mut pca = PCA::new();
        pca.fit(&x).unwrap();
        let axes = pca.components.as_ref().unwrap();

        assert_abs_diff_eq!(axes.row(0).dot(&axes.row(0)), 1.0, epsilon = 1e-8);
        assert_abs_diff_eq!(axes.row(1).dot(&axes.row(1)), 1.0, epsilon = 1e-8);
        assert_abs_diff_eq!(axes.row(0).dot(&axes.row(1)), 0.0, epsilon = 1e-6);

        let variance = pca.explained_variance.as_ref().unwrap();
        assert!(variance[0] >= variance[1]);
    }

    #[test]
    fn test_dominant_axis_direction() {
        let x = array![[1.0, 1.0], [2.0, 2.0], [3.0, 3.0], [4.0, 4.0]];

        let mut pca = PCA::new();
        pca.fit(&x).unwrap();

        let axis = pca.components.as_ref().unwrap().row(0).to_owned();
        let expected = 1.0 / 2.0_f64.sqrt();
        assert_abs_diff_eq!(axis[0].abs(), expected, epsilon = 1e-8);
        assert_abs_diff_eq!(axis[1].abs(), expected, epsilon = 1e-8);

        // Perfectly collinear data has one informative axis
        assert_eq!(pca.informative_components, Some(1));
        assert_eq!(
            pca.degeneracies,
            vec![Degeneracy::RankDeficient { informative_axes: 1 }]
        );
        let ratio = pca.explained_variance_ratio.as_ref().unwrap();
        assert_abs_diff_eq!(ratio[0], 1.0, epsilon = 1e-10);
        assert_eq!(ratio[1], 0.0);
    }

    /// Correlation matrix with one correlated pair (eigenvalue 1.3) and a
    /// five-feature block whose columns are larger but whose eigenvalue is
    /// only 1.25.
    fn block_correlation() -> Matrix {
        let mut c = Matrix::eye(7);
        c[[0, 1]] = 0.3;
        c[[1, 0]] = 0.3;
        for i in 2..7 {
            for j in 2..7 {
                if i != j {
                    c[[i, j]] = -0.25;
                }
            }
        }
        c
    }

    #[test]
    fn test_eigenpairs_sorted_when_largest_column_is_not_dominant() {
        let pca = PCA::new().n_components(3);
        let (values, vectors) = pca.eigen_decomposition(&block_correlation());

        assert_eq!(values.len(), 3);
        assert_abs_diff_eq!(values[0], 1.3, epsilon = 1e-8);
        assert_abs_diff_eq!(values[1], 1.25, epsilon = 1e-8);
        assert_abs_diff_eq!(values[2], 1.25, epsilon = 1e-8);

        let expected = 1.0 / 2.0_f64.sqrt();
        assert_abs_diff_eq!(vectors[0][0].abs(), expected, epsilon = 1e-6);
        assert_abs_diff_eq!(vectors[0][1].abs(), expected, epsilon = 1e-6);
        assert_abs_diff_eq!(vectors[0][0], vectors[0][1], epsilon = 1e-6);
        for j in 2..7 {
            assert_abs_diff_eq!(vectors[0][j], 0.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_fit_finds_dominant_axis_of_block_correlated_data() {
        // Rows +w and -w for vectors w whose outer products sum to the block
        // correlation matrix; scaling by sqrt(13 / 2) makes the sample
        // covariance of the 14 rows equal to it exactly.
        let scale = (13.0_f64 / 2.0).sqrt();
        let half = 1.0 / 2.0_f64.sqrt();
        let mut generators: Vec<Vector> = Vec::new();

        let mut pair = Vector::zeros(7);
        pair[0] = half;
        pair[1] = half;
        generators.push(pair * 1.3_f64.sqrt());

        let mut contrast = Vector::zeros(7);
        contrast[0] = half;
        contrast[1] = -half;
        generators.push(contrast * 0.7_f64.sqrt());

        for i in 2..7 {
            let mut w = Vector::zeros(7);
            for j in 2..7 {
                w[j] = if i == j { 0.8 } else { -0.2 };
            }
            generators.push(w * 1.25_f64.sqrt());
        }

        let mut x = Matrix::zeros((2 * generators.len(), 7));
        for (r, w) in generators.iter().enumerate() {
            x.row_mut(2 * r).assign(&(w * scale));
            x.row_mut(2 * r + 1).assign(&(w * -scale));
        }

        let mut pca = PCA::new();
        pca.fit(&x).unwrap();

        let variance = pca.explained_variance.as_ref().unwrap();
        assert_abs_diff_eq!(variance[0], 1.3, epsilon = 1e-8);
        assert_abs_diff_eq!(variance[1], 1.25, epsilon = 1e-8);

        let axis = pca.components.as_ref().unwrap().row(0).to_owned();
        assert_abs_diff_eq!(axis[0].abs(), half, epsilon = 1e-6);
        assert_abs_diff_eq!(axis[0], axis[1], epsilon = 1e-6);
        for j in 2..7 {
            assert_abs_diff_eq!(axis[j], 0.0, epsilon = 1e-6);
        }

        let ratio = pca.explained_variance_ratio.as_ref().unwrap();
        assert_abs_diff_eq!(ratio[0], 1.3 / 7.0, epsilon = 1e-8);
    }

    #[test]
    fn test_single_feature_projection() {
        let x = array![[-1.0], [0.0], [1.0]];
        let mut pca = PCA::new();
        let transformed = pca.fit_transform(&x).unwrap();

        assert_eq!(transformed.shape(), &[3, 2]);
        assert_eq!(pca.informative_components, Some(1));
        for v in transformed.column(1) {
            assert_eq!(*v, 0.0);
        }
    }

    #[test]
    fn test_constant_data_has_no_informative_axes() {
        let x = array![[0.0, 0.0], [0.0, 0.0], [0.0, 0.0]];
        let mut pca = PCA::new();
        let transformed = pca.fit_transform(&x).unwrap();

        assert_eq!(pca.informative_components, Some(0));
        assert!(transformed.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_project_shares_frame_with_centers() {
        let x = array![[-1.0, -1.0], [-1.0, 1.0], [1.0, -1.0], [1.0, 1.2]];
        let centers = x.slice(ndarray::s![0..2, ..]).to_owned();

        let (projection, _) = project(&x, &centers).unwrap();
        assert_eq!(projection.entities.shape(), &[4, 2]);
        assert_eq!(projection.centers.shape(), &[2, 2]);

        // A center equal to an entity lands on that entity's coordinates
        for j in 0..2 {
            assert_abs_diff_eq!(projection.centers[[0, j]], projection.entities[[0, j]], epsilon = 1e-12);
            assert_abs_diff_eq!(projection.centers[[1, j]], projection.entities[[1, j]], epsilon = 1e-12);
        }
    }

    #[test]
    fn test_transform_without_fit() {
        let pca = PCA::new();
        assert!(matches!(
            pca.transform(&array![[1.0, 2.0]]),
            Err(ClusterError::NotFitted(_))
        ));
    }

    #[test]
    fn test_dimension_mismatch() {
        let mut pca = PCA::new();
        pca.fit(&array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.5], [0.0, 1.0, 1.0]]).unwrap();
        assert!(pca.transform(&array![[1.0, 2.0]]).is_err());
    }
}
