use ndarray::{ArrayView1, Axis};
use serde::Serialize;

use crate::error::{ClusterError, Result};
use crate::{Matrix, Vector};

/// Index of the largest membership in each row; ties go to the lower index.
pub fn crisp_labels(membership: &Matrix) -> Vec<usize> {
    membership
        .axis_iter(Axis(0))
        .map(|row| {
            row.iter()
                .enumerate()
                .fold((0, f64::NEG_INFINITY), |best, (k, &u)| if u > best.1 { (k, u) } else { best })
                .0
        })
        .collect()
}

/// Silhouette coefficient of every sample under a crisp partition, using
/// Euclidean distance.
///
/// Samples alone in their cluster score 0. When fewer than two clusters are
/// populated every sample scores 0.
pub fn silhouette_samples(x: &Matrix, labels: &[usize]) -> Result<Vector> {
    let n = x.nrows();
    if labels.len() != n {
        return Err(ClusterError::InvalidInput(format!(
            "{} labels for {} samples",
            labels.len(),
            n
        )));
    }

    let n_labels = labels.iter().max().map_or(0, |&k| k + 1);
    let mut cluster_sizes = vec![0usize; n_labels];
    for &label in labels {
        cluster_sizes[label] += 1;
    }

    let mut scores = Vector::zeros(n);
    if cluster_sizes.iter().filter(|&&size| size > 0).count() < 2 {
        return Ok(scores);
    }

    for i in 0..n {
        let own = labels[i];
        if cluster_sizes[own] < 2 {
            continue;
        }

        let mut sums = vec![0.0; n_labels];
        for j in 0..n {
            if i != j {
                sums[labels[j]] += euclidean_distance(&x.row(i), &x.row(j));
            }
        }

        let a = sums[own] / (cluster_sizes[own] - 1) as f64;
        let b = (0..n_labels)
            .filter(|&k| k != own && cluster_sizes[k] > 0)
            .map(|k| sums[k] / cluster_sizes[k] as f64)
            .fold(f64::INFINITY, f64::min);

        let denom = a.max(b);
        scores[i] = if denom > 0.0 { (b - a) / denom } else { 0.0 };
    }

    Ok(scores)
}

/// Mean silhouette coefficient over all samples.
pub fn silhouette_score(x: &Matrix, labels: &[usize]) -> Result<f64> {
    let samples = silhouette_samples(x, labels)?;
    samples
        .mean()
        .ok_or_else(|| ClusterError::InvalidInput("silhouette of an empty matrix".to_string()))
}

/// Fuzzy partition coefficient, `(1/N) sum U^2`. 1 for a crisp partition,
/// 1/K for a uniform one.
pub fn partition_coefficient(membership: &Matrix) -> f64 {
    membership.mapv(|u| u * u).sum() / membership.nrows() as f64
}

/// Fuzzy partition entropy, `-(1/N) sum U ln U` with `0 ln 0 = 0`.
pub fn partition_entropy(membership: &Matrix) -> f64 {
    let total: f64 = membership
        .iter()
        .filter(|&&u| u > 0.0)
        .map(|&u| u * u.ln())
        .sum();
    -total / membership.nrows() as f64
}

/// Pearson correlation between every pair of rows.
///
/// Each row is one entity's profile across the feature columns. Pairs that
/// involve a constant row are NaN.
pub fn entity_correlation(values: &Matrix) -> Matrix {
    let n = values.nrows();
    let width = values.ncols() as f64;

    let mut centered = values.clone();
    let mut norms = Vector::zeros(n);
    for (mut row, norm) in centered.axis_iter_mut(Axis(0)).zip(norms.iter_mut()) {
        let mean = row.sum() / width;
        row -= mean;
        *norm = row.dot(&row).sqrt();
    }

    let mut corr = Matrix::from_elem((n, n), f64::NAN);
    for i in 0..n {
        if norms[i] <= f64::EPSILON {
            continue;
        }
        corr[[i, i]] = 1.0;
        for j in (i + 1)..n {
            if norms[j] <= f64::EPSILON {
                continue;
            }
            let r = (centered.row(i).dot(&centered.row(j)) / (norms[i] * norms[j])).clamp(-1.0, 1.0);
            corr[[i, j]] = r;
            corr[[j, i]] = r;
        }
    }

    corr
}

/// Distribution summary of one metric.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DescriptiveStats {
    pub maximum: f64,
    pub minimum: f64,
    pub mean: f64,
    /// Population standard deviation.
    pub std_dev: f64,
    pub median: f64,
    /// Biased Fisher-Pearson skewness; NaN for constant data.
    pub skewness: f64,
    /// Biased excess kurtosis; NaN for constant data.
    pub kurtosis: f64,
}

pub fn describe(values: ArrayView1<f64>) -> Result<DescriptiveStats> {
    if values.is_empty() {
        return Err(ClusterError::InvalidInput(
            "cannot describe an empty sample".to_string(),
        ));
    }

    let n = values.len() as f64;
    let mean = values.sum() / n;
    let moment = |p: i32| values.iter().map(|v| (v - mean).powi(p)).sum::<f64>() / n;
    let m2 = moment(2);
    let m3 = moment(3);
    let m4 = moment(4);

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    let median = if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    };

    let (skewness, kurtosis) = if m2 > f64::EPSILON * mean.abs().max(1.0) {
        (m3 / m2.powf(1.5), m4 / (m2 * m2) - 3.0)
    } else {
        (f64::NAN, f64::NAN)
    };

    Ok(DescriptiveStats {
        maximum: sorted[sorted.len() - 1],
        minimum: sorted[0],
        mean,
        std_dev: m2.sqrt(),
        median,
        skewness,
        kurtosis,
    })
}

/// [`describe`] applied to every column.
pub fn describe_columns(values: &Matrix) -> Result<Vec<DescriptiveStats>> {
    values.axis_iter(Axis(1)).map(describe).collect()
}

pub(crate) fn euclidean_distance(a: &ArrayView1<f64>, b: &ArrayView1<f64>) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
}
