//! Feature schema and the fixed-order feature vector consumed by predictors.
//!
//! The slot order below is the column order the model was trained on.
//! Reordering it silently corrupts every prediction.

use std::fmt;

use serde::Serialize;

use crate::normalise::normalise_field;

/// Number of slots in a [`FeatureVector`].
pub const FEATURE_COUNT: usize = 15;

/// How a raw form value is coerced into its slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureKind {
    /// Measurement stored as `f64`.
    Continuous,
    /// Gender or symptom indicator stored as an integer (normally 0/1).
    Flag,
}

/// One named slot of the feature vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureSpec {
    pub name: &'static str,
    pub kind: FeatureKind,
}

impl FeatureSpec {
    const fn continuous(name: &'static str) -> Self {
        Self { name, kind: FeatureKind::Continuous }
    }

    const fn flag(name: &'static str) -> Self {
        Self { name, kind: FeatureKind::Flag }
    }
}

/// Training column order. Form field names match these exactly.
pub const FEATURE_ORDER: [FeatureSpec; FEATURE_COUNT] = [
    FeatureSpec::continuous("Age"),
    FeatureSpec::continuous("Heart_Rate_bpm"),
    FeatureSpec::continuous("Body_Temperature_C"),
    FeatureSpec::continuous("Oxygen_Saturation_%"),
    FeatureSpec::flag("Gender_Male"),
    FeatureSpec::continuous("Systolic"),
    FeatureSpec::continuous("Diastolic"),
    FeatureSpec::flag("Body ache"),
    FeatureSpec::flag("Cough"),
    FeatureSpec::flag("Fatigue"),
    FeatureSpec::flag("Fever"),
    FeatureSpec::flag("Headache"),
    FeatureSpec::flag("Runny nose"),
    FeatureSpec::flag("Shortness of breath"),
    FeatureSpec::flag("Sore throat"),
];

/// A coerced slot value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FeatureValue {
    Continuous(f64),
    Flag(i64),
}

impl FeatureValue {
    /// Numeric value as seen by a predictor.
    pub fn as_f64(&self) -> f64 {
        match *self {
            FeatureValue::Continuous(v) => v,
            FeatureValue::Flag(v) => v as f64,
        }
    }
}

impl fmt::Display for FeatureValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // `{:?}` keeps the trailing `.0` on whole numbers
            FeatureValue::Continuous(v) => write!(f, "{v:?}"),
            FeatureValue::Flag(v) => write!(f, "{v}"),
        }
    }
}

/// Raw, untyped form fields as submitted by the client.
///
/// Field order is preserved; when a name repeats, the first value wins.
#[derive(Debug, Clone, Default)]
pub struct RawSubmission {
    fields: Vec<(String, String)>,
}

impl RawSubmission {
    pub fn new(fields: Vec<(String, String)>) -> Self {
        Self { fields }
    }

    /// First submitted value for `name`, if any.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl From<Vec<(String, String)>> for RawSubmission {
    fn from(fields: Vec<(String, String)>) -> Self {
        Self::new(fields)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RawSubmission {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Exactly [`FEATURE_COUNT`] coerced values in [`FEATURE_ORDER`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector([FeatureValue; FEATURE_COUNT]);

impl FeatureVector {
    /// Build the vector from a submission, coercing each declared field.
    /// Missing fields take the slot's zero default; this never fails.
    pub fn assemble(submission: &RawSubmission) -> Self {
        Self(FEATURE_ORDER.map(|spec| normalise_field(spec.kind, submission.get(spec.name))))
    }

    pub fn values(&self) -> &[FeatureValue; FEATURE_COUNT] {
        &self.0
    }

    /// Values widened to `f64`, the representation predictors consume.
    pub fn to_f64_array(&self) -> [f64; FEATURE_COUNT] {
        self.0.map(|v| v.as_f64())
    }

    /// `(name, value)` pairs in feature order.
    pub fn named(&self) -> impl Iterator<Item = (&'static str, FeatureValue)> + '_ {
        FEATURE_ORDER.iter().zip(self.0.iter()).map(|(spec, v)| (spec.name, *v))
    }
}

impl From<[FeatureValue; FEATURE_COUNT]> for FeatureVector {
    fn from(values: [FeatureValue; FEATURE_COUNT]) -> Self {
        Self(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn scenario_one() -> RawSubmission {
        [
            ("Age", "45"),
            ("Heart_Rate_bpm", "80"),
            ("Body_Temperature_C", "37.0"),
            ("Oxygen_Saturation_%", "98"),
            ("Gender_Male", "male"),
            ("Systolic", "120"),
            ("Diastolic", "80"),
            ("Body ache", "yes"),
            ("Cough", "no"),
            ("Fatigue", "0"),
            ("Fever", "1"),
            ("Headache", ""),
            ("Runny nose", "n"),
            ("Shortness of breath", "false"),
            ("Sore throat", "1"),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_schema_shape() {
        let flags = FEATURE_ORDER.iter().filter(|s| s.kind == FeatureKind::Flag).count();
        let continuous = FEATURE_ORDER.iter().filter(|s| s.kind == FeatureKind::Continuous).count();
        assert_eq!(flags, 9);
        assert_eq!(continuous, 6);
        assert_eq!(FEATURE_ORDER[0].name, "Age");
        assert_eq!(FEATURE_ORDER[4].name, "Gender_Male");
        assert_eq!(FEATURE_ORDER[14].name, "Sore throat");
    }

    #[test]
    fn test_assemble_full_submission() {
        let v = FeatureVector::assemble(&scenario_one());
        assert_eq!(
            v.to_f64_array(),
            [45.0, 80.0, 37.0, 98.0, 1.0, 120.0, 80.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0]
        );
        assert_eq!(v.values()[4], FeatureValue::Flag(1));
        assert_eq!(v.values()[0], FeatureValue::Continuous(45.0));
    }

    #[test]
    fn test_missing_age_defaults_to_zero() {
        let sub: RawSubmission = scenario_one()
            .fields
            .into_iter()
            .filter(|(k, _)| k != "Age")
            .collect();
        let v = FeatureVector::assemble(&sub);
        assert_eq!(v.values()[0], FeatureValue::Continuous(0.0));
        assert_eq!(v.values()[1], FeatureValue::Continuous(80.0));
    }

    #[test]
    fn test_empty_submission_is_all_defaults() {
        let v = FeatureVector::assemble(&RawSubmission::default());
        for (spec, value) in FEATURE_ORDER.iter().zip(v.values()) {
            let expected = match spec.kind {
                FeatureKind::Flag => FeatureValue::Flag(0),
                FeatureKind::Continuous => FeatureValue::Continuous(0.0),
            };
            assert_eq!(*value, expected, "slot {}", spec.name);
        }
    }

    #[test]
    fn test_first_repeated_field_wins() {
        let sub: RawSubmission = [("Age", "30"), ("Age", "99")].into_iter().collect();
        assert_eq!(sub.get("Age"), Some("30"));
        assert_eq!(sub.get("Cough"), None);
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let sub: RawSubmission = [("Age", "30"), ("Weight", "80")].into_iter().collect();
        let v = FeatureVector::assemble(&sub);
        assert_eq!(v.to_f64_array().iter().sum::<f64>(), 30.0);
    }

    #[test]
    fn test_display_keeps_kind() {
        assert_eq!(FeatureValue::Continuous(45.0).to_string(), "45.0");
        assert_eq!(FeatureValue::Continuous(37.5).to_string(), "37.5");
        assert_eq!(FeatureValue::Flag(1).to_string(), "1");
    }

    #[test]
    fn test_named_follows_feature_order() {
        let v = FeatureVector::assemble(&scenario_one());
        let names: Vec<&str> = v.named().map(|(n, _)| n).collect();
        let expected: Vec<&str> = FEATURE_ORDER.iter().map(|s| s.name).collect();
        assert_eq!(names, expected);
    }
}
