#![forbid(unsafe_code)]

//! # Orientation Model
//!
//! Inference-only representations of the two on-disk artifacts the service
//! depends on: a decision-forest classifier and a label encoder. Training
//! happens offline; this crate only deserializes, validates, and predicts.

/// Bidirectional mapping between class codes and human-readable labels.
pub mod encoder;
/// The decision-forest classifier.
pub mod forest;
/// Loading and cross-validation of the on-disk artifacts.
pub mod store;

pub use encoder::LabelEncoder;
pub use forest::{DecisionTree, Forest, Node};
pub use store::ModelBundle;
