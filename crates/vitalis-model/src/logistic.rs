//! Linear classifier: arg-max of `coef · x + intercept`.

use vitalis_common::{FeatureVector, FEATURE_COUNT};

use crate::error::{ModelError, Result};
use crate::predictor::{argmax, finite_input, ClassId, Predictor};

#[derive(Debug, Clone)]
pub struct LogisticRegression {
    classes: Vec<ClassId>,
    coef: Vec<Vec<f64>>,
    intercept: Vec<f64>,
}

impl LogisticRegression {
    /// `coef` has one row per class, or a single row for a binary model
    /// (positive score selects `classes[1]`).
    pub fn new(classes: Vec<ClassId>, coef: Vec<Vec<f64>>, intercept: Vec<f64>) -> Result<Self> {
        let binary = coef.len() == 1;
        if binary && classes.len() != 2 {
            return Err(ModelError::InvalidArtifact(format!(
                "single coefficient row requires 2 classes, got {}",
                classes.len()
            )));
        }
        if !binary && (coef.len() != classes.len() || classes.len() < 2) {
            return Err(ModelError::InvalidArtifact(format!(
                "{} coefficient rows for {} classes",
                coef.len(),
                classes.len()
            )));
        }
        if intercept.len() != coef.len() {
            return Err(ModelError::InvalidArtifact(format!(
                "{} intercepts for {} coefficient rows",
                intercept.len(),
                coef.len()
            )));
        }
        if let Some(row) = coef.iter().find(|row| row.len() != FEATURE_COUNT) {
            return Err(ModelError::InvalidArtifact(format!(
                "coefficient row has {} weights, expected {FEATURE_COUNT}",
                row.len()
            )));
        }
        Ok(Self { classes, coef, intercept })
    }

    /// Raw per-row scores.
    pub fn decision_function(&self, features: &FeatureVector) -> Result<Vec<f64>> {
        let x = finite_input(features)?;
        Ok(self
            .coef
            .iter()
            .zip(&self.intercept)
            .map(|(row, b)| row.iter().zip(&x).map(|(w, v)| w * v).sum::<f64>() + b)
            .collect())
    }
}

impl Predictor for LogisticRegression {
    fn predict(&self, features: &FeatureVector) -> Result<ClassId> {
        let scores = self.decision_function(features)?;
        let idx = if self.coef.len() == 1 {
            usize::from(scores[0] > 0.0)
        } else {
            argmax(&scores)
        };
        Ok(self.classes[idx])
    }

    fn describe(&self) -> String {
        format!("logistic_regression ({} classes)", self.classes.len())
    }
}
