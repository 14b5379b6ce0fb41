#![forbid(unsafe_code)]

//! HTTP JSON gateway for the orientation classifier.
//!
//! One POST route runs the prediction pipeline against the process-wide
//! model bundle; the remaining routes expose the model contract, liveness,
//! and Prometheus metrics. All failures render the same structured error
//! envelope: `{"error": {"code": ..., "message": ...}}`.

use anyhow::Result;
use axum::{
    body::Bytes,
    error_handling::HandleErrorLayer,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use orient_model::ModelBundle;
use orient_telemetry::metrics;
use orient_types::config::GatewayConfig;
use orient_types::error::{ErrorCode, FeatureError, PredictError};
use orient_types::features::{FeatureVector, FEATURE_NAMES};
use prometheus::Encoder;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::watch;
use tower::{
    limit::ConcurrencyLimitLayer, load_shed::LoadShedLayer, timeout::TimeoutLayer, BoxError,
    ServiceBuilder,
};
use tower_http::{catch_panic::CatchPanicLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};

/// Error code for a request body that does not parse as JSON.
const MALFORMED_JSON: &str = "MALFORMED_JSON";

const ROUTE_PREDICT: &str = "/predict";

// --- Error Handling ---

/// Gateway-level error, mapped onto an HTTP status and the structured error
/// envelope.
pub enum AppError {
    /// The caller sent a request the service refuses to process; carries a
    /// stable machine-readable code.
    BadRequest {
        /// Stable error code for the envelope.
        code: &'static str,
        /// Human-readable message.
        message: String,
    },
    /// An internal failure. Logged in full, surfaced generically.
    Internal(anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AppError::BadRequest { code, message } => (StatusCode::BAD_REQUEST, code, message),
            AppError::Internal(err) => {
                tracing::error!(target: "http-gateway", "Internal error: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "Internal server error".to_string(),
                )
            }
        };
        (
            status,
            Json(serde_json::json!({ "error": {"code": code, "message": message} })),
        )
            .into_response()
    }
}

impl From<FeatureError> for AppError {
    fn from(err: FeatureError) -> Self {
        AppError::BadRequest {
            code: err.code(),
            message: err.to_string(),
        }
    }
}

impl From<PredictError> for AppError {
    fn from(err: PredictError) -> Self {
        AppError::Internal(err.into())
    }
}

// --- Shared State ---

/// Read-only state injected into every handler.
#[derive(Clone)]
pub struct GatewayState {
    /// The classifier and encoder, loaded once at startup.
    pub model: Arc<ModelBundle>,
}

// --- Request/Response Types ---

/// The `features` value, in either of its accepted forms.
#[derive(Deserialize)]
#[serde(untagged)]
enum FeaturesPayload {
    /// Values in `FEATURE_NAMES` order.
    Ordered(Vec<f64>),
    /// Values keyed by feature name.
    Named(BTreeMap<String, f64>),
}

impl FeaturesPayload {
    fn into_vector(self) -> Result<FeatureVector, FeatureError> {
        match self {
            FeaturesPayload::Ordered(values) => FeatureVector::from_ordered(values),
            FeaturesPayload::Named(values) => FeatureVector::from_named(&values),
        }
    }
}

#[derive(Serialize)]
struct PredictResponse {
    prediction: String,
}

#[derive(Serialize)]
struct ModelInfoResponse {
    feature_names: Vec<&'static str>,
    classes: Vec<String>,
    trees: usize,
}

// --- Handlers ---

fn run_predict(state: &GatewayState, body: &[u8]) -> Result<String, AppError> {
    let payload: serde_json::Value =
        serde_json::from_slice(body).map_err(|err| AppError::BadRequest {
            code: MALFORMED_JSON,
            message: format!("Request body is not valid JSON: {err}"),
        })?;

    let raw = match payload.get("features") {
        Some(value) if !value.is_null() => value.clone(),
        _ => return Err(FeatureError::Missing.into()),
    };
    let features: FeaturesPayload =
        serde_json::from_value(raw).map_err(|_| FeatureError::InvalidShape)?;
    let vector = features.into_vector()?;

    let label = state.model.predict_label(&vector)?;
    Ok(label.to_string())
}

async fn predict_handler(State(state): State<Arc<GatewayState>>, body: Bytes) -> Response {
    let started = Instant::now();
    match run_predict(&state, &body) {
        Ok(label) => {
            metrics::observe_request(ROUTE_PREDICT, "ok", started.elapsed());
            metrics::observe_prediction(&label);
            Json(PredictResponse { prediction: label }).into_response()
        }
        Err(err) => {
            let result = match &err {
                AppError::BadRequest { .. } => "client_error",
                AppError::Internal(_) => "error",
            };
            metrics::observe_request(ROUTE_PREDICT, result, started.elapsed());
            err.into_response()
        }
    }
}

/// Exposes the wire contract so callers can verify feature ordering at
/// runtime instead of trusting documentation.
async fn model_handler(State(state): State<Arc<GatewayState>>) -> Json<ModelInfoResponse> {
    Json(ModelInfoResponse {
        feature_names: FEATURE_NAMES.to_vec(),
        classes: state.model.encoder.classes.clone(),
        trees: state.model.classifier.trees.len(),
    })
}

async fn healthz_handler() -> &'static str {
    "OK"
}

async fn metrics_handler() -> ([(axum::http::HeaderName, String); 1], axum::body::Bytes) {
    let encoder = prometheus::TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buf = Vec::with_capacity(1 << 16);
    if let Err(err) = encoder.encode(&metric_families, &mut buf) {
        tracing::error!(error = %err, "Failed to encode prometheus metrics");
    }
    (
        [(
            axum::http::header::CONTENT_TYPE,
            encoder.format_type().to_string(),
        )],
        buf.into(),
    )
}

// Small helper used by HandleErrorLayer to produce structured responses.
async fn map_middleware_error(err: BoxError) -> impl IntoResponse {
    if err.is::<tower::timeout::error::Elapsed>() {
        (
            StatusCode::REQUEST_TIMEOUT,
            Json(serde_json::json!({
                "error": { "code": "TIMEOUT", "message": "request timed out" }
            })),
        )
    } else {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({
                "error": { "code": "OVERLOADED", "message": err.to_string() }
            })),
        )
    }
}

// --- Server ---

/// Builds the route table. Kept separate from [`run_server`] so tests can
/// drive the router directly.
pub fn router(state: Arc<GatewayState>) -> Router {
    Router::new()
        .route(ROUTE_PREDICT, post(predict_handler))
        .route("/model", get(model_handler))
        .route("/healthz", get(healthz_handler))
        .route("/metrics", get(metrics_handler))
        .with_state(state)
}

/// Binds the listener and serves until the shutdown channel fires.
pub async fn run_server(
    config: &GatewayConfig,
    state: Arc<GatewayState>,
    mut shutdown_rx: watch::Receiver<bool>,
) -> Result<()> {
    let app = router(state)
        // Apply layers. `HandleErrorLayer` must wrap the fallible layers to
        // make the service infallible.
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(map_middleware_error))
                .layer(LoadShedLayer::new())
                .layer(ConcurrencyLimitLayer::new(config.concurrency_limit))
                .layer(TimeoutLayer::new(Duration::from_millis(
                    config.request_timeout_ms,
                ))),
        )
        // These layers are infallible and can be applied outside the
        // error-handling wrapper.
        .layer(CatchPanicLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(RequestBodyLimitLayer::new(config.body_limit_kb * 1024));

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(target: "http-gateway", "Orientation gateway listening on {}", addr);

    let server = axum::serve(listener, app.into_make_service()).with_graceful_shutdown(
        async move {
            shutdown_rx.changed().await.ok();
            tracing::info!(target: "http-gateway", "shutting down gracefully");
        },
    );

    if let Err(err) = server.await {
        tracing::error!(target: "http-gateway", error = %err, "server error");
    }

    Ok(())
}
