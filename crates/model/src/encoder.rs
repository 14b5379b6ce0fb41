//! Bidirectional mapping between internal class codes and label strings.

use orient_types::error::{ArtifactError, PredictError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// The fitted label encoder: class code `i` decodes to `classes[i]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelEncoder {
    /// Labels in class-code order.
    pub classes: Vec<String>,
}

impl LabelEncoder {
    /// Structural validation, run once when the artifact loads.
    pub fn validate(&self) -> Result<(), ArtifactError> {
        if self.classes.is_empty() {
            return Err(ArtifactError::Invalid(
                "label encoder has no classes".to_string(),
            ));
        }
        let unique: BTreeSet<&str> = self.classes.iter().map(String::as_str).collect();
        if unique.len() != self.classes.len() {
            return Err(ArtifactError::Invalid(
                "label encoder contains duplicate labels".to_string(),
            ));
        }
        Ok(())
    }

    /// Decodes a class code into its human-readable label.
    pub fn inverse_transform(&self, code: usize) -> Result<&str, PredictError> {
        self.classes
            .get(code)
            .map(String::as_str)
            .ok_or(PredictError::UnknownClassCode {
                code,
                classes: self.classes.len(),
            })
    }

    /// Looks up the class code for a label.
    pub fn transform(&self, label: &str) -> Option<usize> {
        self.classes.iter().position(|class| class == label)
    }

    /// Number of decodable classes.
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Whether the encoder has no classes.
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture_encoder() -> LabelEncoder {
        LabelEncoder {
            classes: vec![
                "Arts".to_string(),
                "Commerce".to_string(),
                "Science".to_string(),
            ],
        }
    }

    #[test]
    fn codes_and_labels_roundtrip() {
        let encoder = fixture_encoder();
        encoder.validate().unwrap();
        assert_eq!(encoder.inverse_transform(2).unwrap(), "Science");
        assert_eq!(encoder.transform("Science"), Some(2));
        assert_eq!(encoder.transform("Astronomy"), None);
    }

    #[test]
    fn out_of_range_code_is_typed() {
        let err = fixture_encoder().inverse_transform(7).unwrap_err();
        assert_eq!(
            err,
            PredictError::UnknownClassCode {
                code: 7,
                classes: 3
            }
        );
    }

    #[test]
    fn duplicate_labels_fail_validation() {
        let encoder = LabelEncoder {
            classes: vec!["Arts".to_string(), "Arts".to_string()],
        };
        assert!(encoder.validate().is_err());
    }

    #[test]
    fn empty_encoder_fails_validation() {
        let encoder = LabelEncoder { classes: vec![] };
        assert!(encoder.validate().is_err());
    }
}
