//! Core error types for the orientation service.

use std::path::PathBuf;
use thiserror::Error;

/// A trait for assigning a stable, machine-readable string code to an error.
pub trait ErrorCode {
    /// Returns the unique, stable string identifier for this error variant.
    fn code(&self) -> &'static str;
}

/// Errors raised while loading the on-disk model artifacts.
///
/// Every variant is fatal at startup: the process must exit with a non-zero
/// code before the listening socket is opened.
#[derive(Error, Debug)]
pub enum ArtifactError {
    /// The artifact file does not exist.
    #[error("Artifact file not found: {}", .path.display())]
    Missing {
        /// Path that was probed.
        path: PathBuf,
    },
    /// The artifact file exists but could not be read.
    #[error("Failed to read artifact {}: {source}", .path.display())]
    Io {
        /// Path that was read.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The artifact file is not a valid serialized model.
    #[error("Failed to decode artifact {}: {reason}", .path.display())]
    Decode {
        /// Path that was decoded.
        path: PathBuf,
        /// Decoder diagnostic.
        reason: String,
    },
    /// The artifacts are individually readable but structurally invalid or
    /// mutually inconsistent.
    #[error("Artifact validation failed: {0}")]
    Invalid(String),
}

impl ErrorCode for ArtifactError {
    fn code(&self) -> &'static str {
        match self {
            Self::Missing { .. } => "ARTIFACT_MISSING",
            Self::Io { .. } => "ARTIFACT_IO_ERROR",
            Self::Decode { .. } => "ARTIFACT_DECODE_ERROR",
            Self::Invalid(_) => "ARTIFACT_INVALID",
        }
    }
}

/// Client-input errors raised while validating a feature payload.
///
/// These map to HTTP 400 responses; the caller can correct and resubmit.
#[derive(Error, Debug, PartialEq)]
pub enum FeatureError {
    /// The request body carried no `features` key.
    #[error("No features provided")]
    Missing,
    /// The `features` value is neither an ordered array nor a named map.
    #[error("Features must be an array of numbers or a map of feature names to numbers")]
    InvalidShape,
    /// The ordered payload has the wrong number of values.
    #[error("Expected {expected} features, got {got}")]
    LengthMismatch {
        /// Arity of the classifier's input contract.
        expected: usize,
        /// Arity the caller supplied.
        got: usize,
    },
    /// The named payload contains a key outside the feature contract.
    #[error("Unknown feature name: {0}")]
    UnknownName(String),
    /// The named payload is missing a required feature.
    #[error("Missing feature: {0}")]
    MissingName(String),
    /// A feature value is NaN or infinite.
    #[error("Feature '{0}' is not a finite number")]
    NonFinite(String),
}

impl ErrorCode for FeatureError {
    fn code(&self) -> &'static str {
        match self {
            Self::Missing => "FEATURES_MISSING",
            Self::InvalidShape => "FEATURES_INVALID_SHAPE",
            Self::LengthMismatch { .. } => "FEATURES_LENGTH_MISMATCH",
            Self::UnknownName(_) => "FEATURES_UNKNOWN_NAME",
            Self::MissingName(_) => "FEATURES_MISSING_NAME",
            Self::NonFinite(_) => "FEATURES_NON_FINITE",
        }
    }
}

/// Internal inference failures.
///
/// Load-time validation makes these unreachable through the HTTP surface of a
/// correctly started process; they remain typed for library callers that
/// assemble models by hand.
#[derive(Error, Debug, PartialEq)]
pub enum PredictError {
    /// The classifier voted for a class code outside the encoder's range.
    #[error("Classifier voted for class code {code}, but the label encoder only has {classes} classes")]
    UnknownClassCode {
        /// The winning class code.
        code: usize,
        /// Number of classes the encoder can decode.
        classes: usize,
    },
    /// A decision tree's node structure is inconsistent.
    #[error("Decision tree is malformed: {0}")]
    MalformedTree(String),
}

impl ErrorCode for PredictError {
    fn code(&self) -> &'static str {
        match self {
            Self::UnknownClassCode { .. } => "PREDICT_UNKNOWN_CLASS",
            Self::MalformedTree(_) => "PREDICT_MALFORMED_TREE",
        }
    }
}
