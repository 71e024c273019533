use std::collections::HashSet;

use serde::Serialize;

use crate::error::{ClusterError, Result};
use crate::Matrix;

/// One row of mean feature values per named entity.
///
/// Column order is fixed by `features`; every value is finite.
#[derive(Clone, Debug, Serialize)]
pub struct FeatureMatrix {
    pub entities: Vec<String>,
    pub features: Vec<String>,
    pub values: Matrix,
}

impl FeatureMatrix {
    pub fn new(entities: Vec<String>, features: Vec<String>, values: Matrix) -> Result<Self> {
        if values.nrows() < 2 {
            return Err(ClusterError::InvalidInput(format!(
                "at least 2 entities are required, got {}",
                values.nrows()
            )));
        }
        if values.ncols() < 1 {
            return Err(ClusterError::InvalidInput(
                "at least 1 feature is required".to_string(),
            ));
        }
        if entities.len() != values.nrows() {
            return Err(ClusterError::InvalidInput(format!(
                "{} entity names for {} rows",
                entities.len(),
                values.nrows()
            )));
        }
        if features.len() != values.ncols() {
            return Err(ClusterError::InvalidInput(format!(
                "{} feature names for {} columns",
                features.len(),
                values.ncols()
            )));
        }

        let mut seen = HashSet::new();
        for name in &entities {
            if !seen.insert(name.as_str()) {
                return Err(ClusterError::InvalidInput(format!(
                    "duplicate entity name: {}",
                    name
                )));
            }
        }

        if let Some(((i, j), v)) = values.indexed_iter().find(|(_, v)| !v.is_finite()) {
            return Err(ClusterError::InvalidInput(format!(
                "non-finite value {} for entity '{}', feature '{}'",
                v, entities[i], features[j]
            )));
        }

        Ok(Self {
            entities,
            features,
            values,
        })
    }

    /// Builds a matrix from `(entity, row)` pairs.
    pub fn from_rows<S, T>(features: Vec<S>, rows: Vec<(T, Vec<f64>)>) -> Result<Self>
    where
        S: Into<String>,
        T: Into<String>,
    {
        let features: Vec<String> = features.into_iter().map(Into::into).collect();
        let n_features = features.len();

        let mut entities = Vec::with_capacity(rows.len());
        let mut flat = Vec::with_capacity(rows.len() * n_features);
        for (name, row) in rows {
            let name = name.into();
            if row.len() != n_features {
                return Err(ClusterError::InvalidInput(format!(
                    "entity '{}' has {} values, expected {}",
                    name,
                    row.len(),
                    n_features
                )));
            }
            entities.push(name);
            flat.extend(row);
        }

        let values = Matrix::from_shape_vec((entities.len(), n_features), flat)
            .map_err(|e| ClusterError::InvalidInput(e.to_string()))?;
        Self::new(entities, features, values)
    }

    /// Builds a matrix with generated names (`entity_0`, `feature_0`, ...).
    pub fn from_values(values: Matrix) -> Result<Self> {
        let entities = (0..values.nrows()).map(|i| format!("entity_{}", i)).collect();
        let features = (0..values.ncols()).map(|j| format!("feature_{}", j)).collect();
        Self::new(entities, features, values)
    }

    pub fn n_entities(&self) -> usize {
        self.values.nrows()
    }

    pub fn n_features(&self) -> usize {
        self.values.ncols()
    }
}
