//! vitalis-common — Feature schema, form coercion and feature vector assembly
//! shared by the model and web crates.

pub mod features;
pub mod normalise;

// Re-export commonly used types
pub use features::{
    FeatureKind, FeatureSpec, FeatureValue, FeatureVector, RawSubmission, FEATURE_COUNT,
    FEATURE_ORDER,
};
