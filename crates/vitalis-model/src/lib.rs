//! vitalis-model — Inference back-ends behind the `Predictor` and
//! `LabelDecoder` traits, plus the process-wide `ModelState`.
//!
//! Back-ends:
//!   TreeEnsemble        — decision tree / random forest (soft voting)
//!   LogisticRegression  — one-vs-rest or binary linear model
//!   LabelEncoder        — class id → category name
//!
//! All three are read from JSON artifacts exported by the training pipeline.

pub mod artifact;
pub mod error;
pub mod forest;
pub mod label;
pub mod logistic;
pub mod predictor;
pub mod state;

pub use artifact::{load_label_decoder, load_predictor, ArtifactInfo, PredictorArtifact};
pub use error::{ModelError, Result};
pub use forest::{Tree, TreeEnsemble};
pub use label::LabelEncoder;
pub use logistic::LogisticRegression;
pub use predictor::{ClassId, LabelDecoder, Prediction, Predictor};
pub use state::ModelState;
