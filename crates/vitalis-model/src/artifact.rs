//! JSON model artifacts exported by the training pipeline.
//!
//! Predictor artifact (`kind` selects the back-end):
//!
//! ```json
//! { "kind": "random_forest", "n_features": 15, "classes": [0, 1, 2],
//!   "trees": [ { "children_left": [...], "children_right": [...],
//!                "feature": [...], "threshold": [...], "value": [[...], ...] } ] }
//! ```
//!
//! Label decoder artifact: `{ "classes": ["Bronchitis", "Cold", ...] }`.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::debug;
use vitalis_common::FEATURE_COUNT;

use crate::error::{ModelError, Result};
use crate::forest::{Tree, TreeEnsemble};
use crate::label::LabelEncoder;
use crate::logistic::LogisticRegression;
use crate::predictor::{ClassId, LabelDecoder, Predictor};

/// Where an artifact came from and what exactly was loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactInfo {
    pub path: PathBuf,
    /// Lowercase hex SHA-256 of the file contents.
    pub sha256: String,
    pub size_bytes: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PredictorArtifact {
    DecisionTree {
        n_features: usize,
        classes: Vec<ClassId>,
        tree: Tree,
    },
    RandomForest {
        n_features: usize,
        classes: Vec<ClassId>,
        trees: Vec<Tree>,
    },
    LogisticRegression {
        n_features: usize,
        classes: Vec<ClassId>,
        coef: Vec<Vec<f64>>,
        intercept: Vec<f64>,
    },
}

impl PredictorArtifact {
    fn n_features(&self) -> usize {
        match self {
            PredictorArtifact::DecisionTree { n_features, .. }
            | PredictorArtifact::RandomForest { n_features, .. }
            | PredictorArtifact::LogisticRegression { n_features, .. } => *n_features,
        }
    }

    /// Validate and build the back-end this artifact describes.
    pub fn into_predictor(self) -> Result<Box<dyn Predictor>> {
        if self.n_features() != FEATURE_COUNT {
            return Err(ModelError::InvalidArtifact(format!(
                "model expects {} features, this build supplies {FEATURE_COUNT}",
                self.n_features()
            )));
        }
        Ok(match self {
            PredictorArtifact::DecisionTree { classes, tree, .. } => {
                Box::new(TreeEnsemble::decision_tree(classes, tree)?)
            }
            PredictorArtifact::RandomForest { classes, trees, .. } => {
                Box::new(TreeEnsemble::random_forest(classes, trees)?)
            }
            PredictorArtifact::LogisticRegression { classes, coef, intercept, .. } => {
                Box::new(LogisticRegression::new(classes, coef, intercept)?)
            }
        })
    }
}

#[derive(Debug, Deserialize)]
struct LabelEncoderArtifact {
    classes: Vec<String>,
}

/// Read, fingerprint and deserialize a JSON artifact.
fn read_artifact<T: DeserializeOwned>(path: &Path) -> Result<(T, ArtifactInfo)> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(ModelError::NotFound(path.to_path_buf()))
        }
        Err(source) => {
            return Err(ModelError::Io { path: path.to_path_buf(), source })
        }
    };

    let info = ArtifactInfo {
        path: path.to_path_buf(),
        sha256: format!("{:x}", Sha256::digest(&bytes)),
        size_bytes: bytes.len() as u64,
    };
    debug!(path = %path.display(), sha256 = %info.sha256, "read model artifact");

    let parsed = serde_json::from_slice(&bytes)
        .map_err(|source| ModelError::Json { path: path.to_path_buf(), source })?;
    Ok((parsed, info))
}

/// Load the mandatory predictor artifact.
pub fn load_predictor(path: &Path) -> Result<(Box<dyn Predictor>, ArtifactInfo)> {
    let (artifact, info) = read_artifact::<PredictorArtifact>(path)?;
    Ok((artifact.into_predictor()?, info))
}

/// Load a label decoder artifact. A missing file is `ModelError::NotFound`;
/// the caller decides whether that is fatal.
pub fn load_label_decoder(path: &Path) -> Result<(Box<dyn LabelDecoder>, ArtifactInfo)> {
    let (artifact, info) = read_artifact::<LabelEncoderArtifact>(path)?;
    Ok((Box::new(LabelEncoder::new(artifact.classes)?), info))
}
