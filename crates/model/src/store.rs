//! Loading and cross-validation of the on-disk model artifacts.
//!
//! Both artifacts are read exactly once, at process start. There is no retry
//! and no partial degradation: either the pair loads and validates, or the
//! process must not serve traffic.

use crate::encoder::LabelEncoder;
use crate::forest::Forest;
use orient_types::error::{ArtifactError, PredictError};
use orient_types::features::{FeatureVector, FEATURE_COUNT};
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};

/// File name of the serialized classifier.
pub const CLASSIFIER_FILE: &str = "orientation_model.json";
/// File name of the serialized label encoder.
pub const ENCODER_FILE: &str = "label_encoder.json";

/// The classifier and label encoder, loaded once and shared read-only for the
/// life of the process.
#[derive(Debug, Clone)]
pub struct ModelBundle {
    /// The fitted decision forest.
    pub classifier: Forest,
    /// The fitted label encoder.
    pub encoder: LabelEncoder,
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ArtifactError> {
    if !path.exists() {
        return Err(ArtifactError::Missing {
            path: path.to_path_buf(),
        });
    }
    let raw = fs::read_to_string(path).map_err(|source| ArtifactError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|err| ArtifactError::Decode {
        path: path.to_path_buf(),
        reason: err.to_string(),
    })
}

impl ModelBundle {
    /// Loads both artifacts from `dir` and validates them against each other.
    ///
    /// Cross-validation pins down the two drift failure modes that would
    /// otherwise only surface per request: a classifier fitted on a different
    /// column count than the service contract, and leaf class codes the
    /// encoder cannot decode.
    pub fn load(dir: &Path) -> Result<Self, ArtifactError> {
        let classifier: Forest = read_json(&dir.join(CLASSIFIER_FILE))?;
        let encoder: LabelEncoder = read_json(&dir.join(ENCODER_FILE))?;

        classifier.validate()?;
        encoder.validate()?;

        if classifier.n_features != FEATURE_COUNT {
            return Err(ArtifactError::Invalid(format!(
                "classifier was fitted on {} features, but the service contract has {}",
                classifier.n_features, FEATURE_COUNT
            )));
        }
        let max_class = classifier.max_class();
        if max_class >= encoder.len() {
            return Err(ArtifactError::Invalid(format!(
                "classifier votes for class code {max_class}, \
                 but the label encoder only has {} classes",
                encoder.len()
            )));
        }

        tracing::debug!(
            target: "model",
            trees = classifier.trees.len(),
            classes = encoder.len(),
            "model artifacts validated"
        );
        Ok(Self {
            classifier,
            encoder,
        })
    }

    /// Runs the full prediction pipeline for one validated feature vector.
    pub fn predict_label(&self, features: &FeatureVector) -> Result<&str, PredictError> {
        let code = self.classifier.predict(features.as_slice())?;
        self.encoder.inverse_transform(code)
    }
}

/// The artifact directory used when none is configured: the directory of the
/// running executable.
pub fn default_artifact_dir() -> std::io::Result<PathBuf> {
    let exe = std::env::current_exe()?;
    Ok(exe
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(".")))
}
