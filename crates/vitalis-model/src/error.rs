//! Error types for model loading and inference.

use std::path::PathBuf;

use thiserror::Error;

use crate::predictor::ClassId;

pub type Result<T> = std::result::Result<T, ModelError>;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("{} not found!", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("invalid model artifact: {0}")]
    InvalidArtifact(String),

    #[error("{0}")]
    Inference(String),

    #[error("y contains previously unseen labels: [{0}]")]
    UnseenLabel(ClassId),
}
