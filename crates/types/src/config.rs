//! Shared configuration structures for the orientation service.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for the HTTP gateway.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GatewayConfig {
    /// Address the gateway listens on.
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
    /// Maximum accepted request body size, in KiB.
    #[serde(default = "default_body_limit_kb")]
    pub body_limit_kb: usize,
    /// Maximum number of requests processed concurrently.
    #[serde(default = "default_concurrency_limit")]
    pub concurrency_limit: usize,
    /// Per-request timeout, in milliseconds.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

fn default_listen_addr() -> String {
    // The port the original deployment's callers are wired to.
    "127.0.0.1:5000".to_string()
}
fn default_body_limit_kb() -> usize {
    64
}
fn default_concurrency_limit() -> usize {
    128
}
fn default_request_timeout_ms() -> u64 {
    2_000
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            body_limit_kb: default_body_limit_kb(),
            concurrency_limit: default_concurrency_limit(),
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

/// Top-level configuration for the node binary.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct NodeConfig {
    /// Directory holding the model artifacts. When absent, the directory of
    /// the running executable is used.
    #[serde(default)]
    pub artifact_dir: Option<PathBuf>,
    /// HTTP gateway settings.
    #[serde(default)]
    pub gateway: GatewayConfig,
}
