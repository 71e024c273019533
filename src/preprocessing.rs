use ndarray::Axis;
use tracing::warn;

use crate::error::{ClusterError, Degeneracy, Result};
use crate::{Matrix, Vector};

/// Relative threshold under which a column's standard deviation counts as zero.
const ZERO_STD_EPS: f64 = 1e-12;

/// Zero-mean, unit-variance column scaling with population standard deviation.
///
/// Columns with zero variance keep a standard deviation of 1 so that scaling
/// never divides by zero; each such column is recorded in `degeneracies`.
#[derive(Clone, Debug, Default)]
pub struct StandardScaler {
    mean: Option<Vector>,
    std: Option<Vector>,
    pub degeneracies: Vec<Degeneracy>,
}

impl StandardScaler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fit(&mut self, data: &Matrix) -> Result<()> {
        if data.nrows() == 0 || data.ncols() == 0 {
            return Err(ClusterError::InvalidInput(
                "input matrix must have at least one sample and one feature".to_string(),
            ));
        }

        let mean = data
            .mean_axis(Axis(0))
            .ok_or_else(|| ClusterError::InvalidInput("failed to compute mean".to_string()))?;
        let mut std = data.std_axis(Axis(0), 0.0);

        let mut degeneracies = Vec::new();
        for (column, (s, m)) in std.iter_mut().zip(mean.iter()).enumerate() {
            if *s <= ZERO_STD_EPS * m.abs().max(1.0) {
                warn!(column, "zero-variance column, using unit standard deviation");
                *s = 1.0;
                degeneracies.push(Degeneracy::ZeroVariance { column });
            }
        }

        self.mean = Some(mean);
        self.std = Some(std);
        self.degeneracies = degeneracies;
        Ok(())
    }

    pub fn transform(&self, data: &Matrix) -> Result<Matrix> {
        let (mean, std) = self.fitted()?;
        check_width(data, mean.len())?;

        let mut result = data.clone();
        for mut row in result.axis_iter_mut(Axis(0)) {
            row -= mean;
            row /= std;
        }

        Ok(result)
    }

    pub fn fit_transform(&mut self, data: &Matrix) -> Result<Matrix> {
        self.fit(data)?;
        self.transform(data)
    }

    /// Maps standardized rows back to original units.
    pub fn inverse_transform(&self, data: &Matrix) -> Result<Matrix> {
        let (mean, std) = self.fitted()?;
        check_width(data, mean.len())?;

        let mut result = data.clone();
        for mut row in result.axis_iter_mut(Axis(0)) {
            row *= std;
            row += mean;
        }

        Ok(result)
    }

    pub fn mean(&self) -> Option<&Vector> {
        self.mean.as_ref()
    }

    /// Per-column standard deviation, with zero-variance columns set to 1.
    pub fn std(&self) -> Option<&Vector> {
        self.std.as_ref()
    }

    fn fitted(&self) -> Result<(&Vector, &Vector)> {
        match (self.mean.as_ref(), self.std.as_ref()) {
            (Some(mean), Some(std)) => Ok((mean, std)),
            _ => Err(ClusterError::NotFitted("StandardScaler")),
        }
    }
}

fn check_width(data: &Matrix, expected: usize) -> Result<()> {
    if data.ncols() != expected {
        return Err(ClusterError::DimensionMismatch {
            expected,
            found: data.ncols(),
        });
    }
    Ok(())
}
