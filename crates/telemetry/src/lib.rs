#![forbid(unsafe_code)]

//! Observability for the orientation service: structured logging and
//! Prometheus metric collectors.

/// Global `tracing` subscriber setup.
pub mod init;
/// Prometheus collectors for the HTTP gateway.
pub mod metrics;
