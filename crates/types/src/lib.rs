#![forbid(unsafe_code)]
#![deny(missing_docs)]

//! # Orientation Service Types
//!
//! This crate is the foundational library for the orientation prediction
//! service, containing the feature-vector contract, configuration objects,
//! and error types.
//!
//! ## Architectural Role
//!
//! As the base crate, `orient-types` has minimal dependencies and is itself a
//! dependency for every other crate in the workspace. This structure prevents
//! circular dependencies and provides a single canonical definition for the
//! classifier's input contract (`FEATURE_NAMES`, `FeatureVector`) and the
//! error taxonomy.

/// Shared configuration structures (`NodeConfig`, `GatewayConfig`).
pub mod config;
/// A unified set of all error types used across the workspace.
pub mod error;
/// The classifier's input contract: feature ordering and validated vectors.
pub mod features;
