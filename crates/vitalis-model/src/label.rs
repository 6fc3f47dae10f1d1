//! Class id → category name decoding.

use crate::error::{ModelError, Result};
use crate::predictor::{ClassId, LabelDecoder};

/// Ordered category names; class id `i` decodes to `classes[i]`.
#[derive(Debug, Clone)]
pub struct LabelEncoder {
    classes: Vec<String>,
}

impl LabelEncoder {
    pub fn new(classes: Vec<String>) -> Result<Self> {
        if classes.is_empty() {
            return Err(ModelError::InvalidArtifact("label encoder has no classes".to_string()));
        }
        Ok(Self { classes })
    }
}

impl LabelDecoder for LabelEncoder {
    fn decode(&self, class: ClassId) -> Result<String> {
        usize::try_from(class.0)
            .ok()
            .and_then(|i| self.classes.get(i))
            .cloned()
            .ok_or(ModelError::UnseenLabel(class))
    }

    fn num_classes(&self) -> usize {
        self.classes.len()
    }
}
