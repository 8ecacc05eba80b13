// Numeric track descriptors

use ndarray::{Array2, ArrayView1};

use crate::similarity::SimilarityError;

/// N x F matrix of finite audio-track descriptors
#[derive(Debug, Clone)]
pub struct NumericDataset {
    features: Vec<String>,
    values: Array2<f64>,
}

impl NumericDataset {
    pub fn from_rows(features: Vec<String>, rows: Vec<Vec<f64>>) -> Result<Self, SimilarityError> {
        let n_features = features.len();
        let mut flat = Vec::with_capacity(rows.len() * n_features);
        for (i, row) in rows.iter().enumerate() {
            if row.len() != n_features {
                return Err(SimilarityError::InconsistentSchema(format!(
                    "record {} has {} values, expected {}",
                    i,
                    row.len(),
                    n_features
                )));
            }
            flat.extend_from_slice(row);
        }

        let values = Array2::from_shape_vec((rows.len(), n_features), flat)
            .map_err(|e| SimilarityError::InconsistentSchema(e.to_string()))?;
        Self::from_array(features, values)
    }

    pub fn from_array(features: Vec<String>, values: Array2<f64>) -> Result<Self, SimilarityError> {
        if values.ncols() != features.len() {
            return Err(SimilarityError::InconsistentSchema(format!(
                "{} feature names for {} columns",
                features.len(),
                values.ncols()
            )));
        }

        if let Some(((row, column), _)) = values.indexed_iter().find(|(_, v)| !v.is_finite()) {
            return Err(SimilarityError::NonFiniteValue { row, column });
        }

        Ok(Self { features, values })
    }

    pub fn n_records(&self) -> usize {
        self.values.nrows()
    }

    pub fn n_features(&self) -> usize {
        self.values.ncols()
    }

    pub fn features(&self) -> &[String] {
        &self.features
    }

    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    pub fn row(&self, record: usize) -> ArrayView1<'_, f64> {
        self.values.row(record)
    }
}
