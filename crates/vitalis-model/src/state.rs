//! Process-wide model state, loaded once at start-up and read-only afterwards.

use std::fmt;
use std::path::Path;

use tracing::{info, warn};
use vitalis_common::FeatureVector;

use crate::artifact::{load_label_decoder, load_predictor, ArtifactInfo};
use crate::error::{ModelError, Result};
use crate::predictor::{LabelDecoder, Prediction, Predictor};

/// The loaded predictor plus an optional label decoder.
///
/// Holds no interior mutability; share it behind an `Arc`.
pub struct ModelState {
    predictor: Box<dyn Predictor>,
    decoder: Option<Box<dyn LabelDecoder>>,
    artifacts: Vec<ArtifactInfo>,
}

impl fmt::Debug for ModelState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelState")
            .field("predictor", &self.predictor.describe())
            .field("decoder", &self.decoder.as_ref().map(|d| d.num_classes()))
            .field("artifacts", &self.artifacts)
            .finish()
    }
}

impl ModelState {
    /// Assemble state from already-built back-ends.
    pub fn new(predictor: Box<dyn Predictor>, decoder: Option<Box<dyn LabelDecoder>>) -> Self {
        Self { predictor, decoder, artifacts: Vec::new() }
    }

    /// Load both artifacts from disk.
    ///
    /// The predictor is mandatory: any failure is returned. A missing label
    /// decoder only degrades output to raw class ids; a present but broken one
    /// is still an error.
    pub fn load(predictor_path: &Path, decoder_path: &Path) -> Result<Self> {
        let (predictor, predictor_info) = load_predictor(predictor_path)?;
        info!(
            path = %predictor_info.path.display(),
            sha256 = %predictor_info.sha256,
            model = %predictor.describe(),
            "Predictor loaded"
        );
        let mut artifacts = vec![predictor_info];

        let decoder = match load_label_decoder(decoder_path) {
            Ok((decoder, decoder_info)) => {
                info!(
                    path = %decoder_info.path.display(),
                    sha256 = %decoder_info.sha256,
                    classes = decoder.num_classes(),
                    "Label decoder loaded"
                );
                artifacts.push(decoder_info);
                Some(decoder)
            }
            Err(ModelError::NotFound(path)) => {
                warn!(
                    "⚠ label encoder {} not found — predictions will be numeric",
                    path.display()
                );
                None
            }
            Err(e) => return Err(e),
        };

        Ok(Self { predictor, decoder, artifacts })
    }

    /// `decode(predict(features))`, or the raw class id without a decoder.
    pub fn predict(&self, features: &FeatureVector) -> Result<Prediction> {
        let class = self.predictor.predict(features)?;
        match &self.decoder {
            Some(decoder) => Ok(Prediction::Label(decoder.decode(class)?)),
            None => Ok(Prediction::Raw(class)),
        }
    }

    pub fn has_decoder(&self) -> bool {
        self.decoder.is_some()
    }

    pub fn describe(&self) -> String {
        self.predictor.describe()
    }

    /// Artifacts read from disk, predictor first. Empty for [`ModelState::new`].
    pub fn artifacts(&self) -> &[ArtifactInfo] {
        &self.artifacts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::label::LabelEncoder;
    use crate::predictor::ClassId;
    use vitalis_common::RawSubmission;

    struct Fixed(i64);

    impl Predictor for Fixed {
        fn predict(&self, _: &FeatureVector) -> Result<ClassId> {
            Ok(ClassId(self.0))
        }
        fn describe(&self) -> String {
            "fixed".into()
        }
    }

    fn empty() -> FeatureVector {
        FeatureVector::assemble(&RawSubmission::default())
    }

    #[test]
    fn test_raw_class_without_decoder() {
        let state = ModelState::new(Box::new(Fixed(2)), None);
        assert!(!state.has_decoder());
        assert_eq!(state.predict(&empty()).unwrap(), Prediction::Raw(ClassId(2)));
    }

    #[test]
    fn test_decoded_with_decoder() {
        let decoder = LabelEncoder::new(vec!["Cold".into(), "Flu".into(), "Healthy".into()]).unwrap();
        let state = ModelState::new(Box::new(Fixed(2)), Some(Box::new(decoder)));
        assert_eq!(state.predict(&empty()).unwrap(), Prediction::Label("Healthy".into()));
    }

    #[test]
    fn test_decoder_failure_propagates() {
        let decoder = LabelEncoder::new(vec!["Cold".into()]).unwrap();
        let state = ModelState::new(Box::new(Fixed(5)), Some(Box::new(decoder)));
        assert!(matches!(state.predict(&empty()), Err(ModelError::UnseenLabel(ClassId(5)))));
    }

    const STUMP: &str = r#"{"kind": "decision_tree", "n_features": 15, "classes": [0, 1],
        "tree": {"children_left": [1, -1, -1], "children_right": [2, -1, -1],
                 "feature": [0, -2, -2], "threshold": [60.0, -2.0, -2.0],
                 "value": [[1.0, 1.0], [1.0, 0.0], [0.0, 1.0]]}}"#;

    #[test]
    fn test_load_without_decoder_degrades() {
        let dir = tempfile::tempdir().unwrap();
        let model = dir.path().join("my_model.json");
        std::fs::write(&model, STUMP).unwrap();

        let state = ModelState::load(&model, &dir.path().join("label_encoder.json")).unwrap();
        assert!(!state.has_decoder());
        assert_eq!(state.artifacts().len(), 1);
        assert_eq!(state.predict(&empty()).unwrap(), Prediction::Raw(ClassId(0)));
    }

    #[test]
    fn test_load_with_decoder() {
        let dir = tempfile::tempdir().unwrap();
        let model = dir.path().join("my_model.json");
        let labels = dir.path().join("label_encoder.json");
        std::fs::write(&model, STUMP).unwrap();
        std::fs::write(&labels, r#"{"classes": ["Healthy", "Hypertension"]}"#).unwrap();

        let state = ModelState::load(&model, &labels).unwrap();
        assert!(state.has_decoder());
        assert_eq!(state.artifacts().len(), 2);
        let senior: RawSubmission = [("Age", "75")].into_iter().collect();
        assert_eq!(
            state.predict(&FeatureVector::assemble(&senior)).unwrap(),
            Prediction::Label("Hypertension".into())
        );
    }

    #[test]
    fn test_missing_predictor_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let err = ModelState::load(&dir.path().join("my_model.json"), &dir.path().join("l.json"))
            .unwrap_err();
        assert!(matches!(err, ModelError::NotFound(_)));
    }

    #[test]
    fn test_broken_decoder_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let model = dir.path().join("my_model.json");
        let labels = dir.path().join("label_encoder.json");
        std::fs::write(&model, STUMP).unwrap();
        std::fs::write(&labels, "not json").unwrap();

        let err = ModelState::load(&model, &labels).unwrap_err();
        assert!(matches!(err, ModelError::Json { .. }));
    }
}
