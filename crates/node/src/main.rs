#![forbid(unsafe_code)]

//! Process entry point for the orientation prediction service.
//!
//! Startup order is load-bearing: artifacts are loaded and cross-validated
//! before the listener binds, so a process that cannot predict never accepts
//! traffic.

use anyhow::{Context, Result};
use clap::Parser;
use http_predict_gateway::{run_server, GatewayState};
use orient_model::store::default_artifact_dir;
use orient_model::ModelBundle;
use orient_types::config::NodeConfig;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::watch;

#[derive(Parser, Debug)]
#[clap(name = "orient-node", about = "Orientation prediction service")]
struct Opts {
    /// Optional TOML configuration file.
    #[clap(long)]
    config: Option<PathBuf>,
    /// Directory holding the model artifacts; overrides the config file.
    #[clap(long)]
    data_dir: Option<PathBuf>,
    /// Listen address; overrides the config file.
    #[clap(long)]
    listen: Option<String>,
}

fn load_config(opts: &Opts) -> Result<NodeConfig> {
    let mut config = match &opts.config {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("failed to read config file {}", path.display()))?;
            toml::from_str(&raw)
                .with_context(|| format!("failed to parse config file {}", path.display()))?
        }
        None => NodeConfig::default(),
    };
    // CLI flags win over the file.
    if let Some(dir) = &opts.data_dir {
        config.artifact_dir = Some(dir.clone());
    }
    if let Some(listen) = &opts.listen {
        config.gateway.listen_addr = listen.clone();
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    orient_telemetry::init::init_tracing()?;

    let opts = Opts::parse();
    let config = load_config(&opts)?;

    let artifact_dir = match &config.artifact_dir {
        Some(dir) => dir.clone(),
        None => default_artifact_dir().context("failed to resolve the executable's directory")?,
    };

    tracing::info!(target: "node", dir = %artifact_dir.display(), "loading model artifacts");
    let bundle = ModelBundle::load(&artifact_dir).with_context(|| {
        format!(
            "could not load model artifacts from {}",
            artifact_dir.display()
        )
    })?;
    tracing::info!(
        target: "node",
        trees = bundle.classifier.trees.len(),
        classes = bundle.encoder.len(),
        "model artifacts loaded"
    );

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(target: "node", error = %err, "failed to install CTRL+C handler");
            return;
        }
        let _ = shutdown_tx.send(true);
    });

    let state = Arc::new(GatewayState {
        model: Arc::new(bundle),
    });
    run_server(&config.gateway, state, shutdown_rx).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts(config: Option<PathBuf>, data_dir: Option<PathBuf>, listen: Option<String>) -> Opts {
        Opts {
            config,
            data_dir,
            listen,
        }
    }

    #[test]
    fn defaults_without_config_file() {
        let config = load_config(&opts(None, None, None)).unwrap();
        assert_eq!(config.artifact_dir, None);
        assert_eq!(config.gateway.listen_addr, "127.0.0.1:5000");
    }

    #[test]
    fn cli_flags_override_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("node.toml");
        fs::write(
            &path,
            r#"
            artifact_dir = "/srv/from-file"

            [gateway]
            listen_addr = "0.0.0.0:9000"
            "#,
        )
        .unwrap();

        let config = load_config(&opts(
            Some(path),
            Some(PathBuf::from("/srv/from-flag")),
            Some("127.0.0.1:7070".to_string()),
        ))
        .unwrap();
        assert_eq!(
            config.artifact_dir.as_deref(),
            Some(std::path::Path::new("/srv/from-flag"))
        );
        assert_eq!(config.gateway.listen_addr, "127.0.0.1:7070");
    }

    #[test]
    fn unreadable_config_file_is_an_error() {
        let err = load_config(&opts(Some(PathBuf::from("/nonexistent/node.toml")), None, None))
            .unwrap_err();
        assert!(err.to_string().contains("/nonexistent/node.toml"));
    }
}
