//! Predictor and label decoder traits.
//!
//! Handlers only ever see these two traits, so a new model back-end is a new
//! impl plus a new artifact kind, nothing more.

use std::fmt;

use serde::Deserialize;
use vitalis_common::{FeatureVector, FEATURE_COUNT};

use crate::error::{ModelError, Result};

/// Class identifier emitted by a predictor (the encoded training label).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(transparent)]
pub struct ClassId(pub i64);

impl fmt::Display for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Final result shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Prediction {
    /// No decoder loaded; the predictor's class id, unmodified.
    Raw(ClassId),
    /// Decoded category name.
    Label(String),
}

impl fmt::Display for Prediction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Prediction::Raw(class) => write!(f, "{class}"),
            Prediction::Label(label) => f.write_str(label),
        }
    }
}

/// A trained classifier with a single inference operation.
pub trait Predictor: Send + Sync {
    fn predict(&self, features: &FeatureVector) -> Result<ClassId>;
    /// Short human-readable summary, e.g. `random_forest (100 trees, 4 classes)`.
    fn describe(&self) -> String;
}

/// Maps a class id to a category name.
pub trait LabelDecoder: Send + Sync {
    fn decode(&self, class: ClassId) -> Result<String>;
    fn num_classes(&self) -> usize;
}

/// Widen the vector and reject values no trained model can score.
pub(crate) fn finite_input(features: &FeatureVector) -> Result<[f64; FEATURE_COUNT]> {
    let x = features.to_f64_array();
    if x.iter().any(|v| v.is_nan()) {
        return Err(ModelError::Inference("Input X contains NaN.".to_string()));
    }
    if x.iter().any(|v| v.is_infinite()) {
        return Err(ModelError::Inference(
            "Input X contains infinity or a value too large for dtype('float64').".to_string(),
        ));
    }
    Ok(x)
}

/// Index of the largest score; the first one wins on ties.
pub(crate) fn argmax(scores: &[f64]) -> usize {
    let mut best = 0;
    for (i, &s) in scores.iter().enumerate() {
        if s > scores[best] {
            best = i;
        }
    }
    best
}
