//! The classifier's input contract.
//!
//! The classifier was fitted against columns in exactly the order given by
//! [`FEATURE_NAMES`]; a silently reordered payload would produce wrong
//! predictions without any error signal. The contract therefore lives in code
//! rather than in documentation: positional payloads are checked for arity,
//! named payloads are resolved through this table, and the model loader
//! rejects artifacts whose declared column count disagrees with it.

use std::collections::BTreeMap;

use crate::error::FeatureError;

/// Wire order of the classifier's input features.
pub const FEATURE_NAMES: [&str; 8] = [
    "math_score",
    "physics_score",
    "chemistry_score",
    "biology_score",
    "english_score",
    "geography_score",
    "weekly_self_study_hours",
    "absence_days",
];

/// Number of input columns the classifier consumes.
pub const FEATURE_COUNT: usize = FEATURE_NAMES.len();

/// A validated, fixed-order row of classifier inputs.
///
/// Construction is the only validation point; once a `FeatureVector` exists,
/// its length and finiteness are guaranteed.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector(Vec<f64>);

impl FeatureVector {
    /// Builds a vector from values already in [`FEATURE_NAMES`] order.
    pub fn from_ordered(values: Vec<f64>) -> Result<Self, FeatureError> {
        if values.len() != FEATURE_COUNT {
            return Err(FeatureError::LengthMismatch {
                expected: FEATURE_COUNT,
                got: values.len(),
            });
        }
        for (name, value) in FEATURE_NAMES.iter().zip(&values) {
            if !value.is_finite() {
                return Err(FeatureError::NonFinite((*name).to_string()));
            }
        }
        Ok(Self(values))
    }

    /// Builds a vector from a named map.
    ///
    /// The key set must match [`FEATURE_NAMES`] exactly; unknown and missing
    /// names are both rejected so a misspelled field can never be silently
    /// dropped or defaulted.
    pub fn from_named(values: &BTreeMap<String, f64>) -> Result<Self, FeatureError> {
        for key in values.keys() {
            if !FEATURE_NAMES.contains(&key.as_str()) {
                return Err(FeatureError::UnknownName(key.clone()));
            }
        }
        let mut ordered = Vec::with_capacity(FEATURE_COUNT);
        for name in FEATURE_NAMES {
            match values.get(name) {
                Some(value) => ordered.push(*value),
                None => return Err(FeatureError::MissingName(name.to_string())),
            }
        }
        Self::from_ordered(ordered)
    }

    /// The values in wire order.
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }
}
