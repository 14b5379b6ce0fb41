//! End-to-end: artifacts on disk → loaded bundle → HTTP prediction.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use http_predict_gateway::{router, GatewayState};
use orient_model::encoder::LabelEncoder;
use orient_model::forest::{DecisionTree, Forest, Node};
use orient_model::store::{CLASSIFIER_FILE, ENCODER_FILE};
use orient_model::ModelBundle;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tower::ServiceExt;

fn write_artifacts(dir: &Path) {
    let forest = Forest {
        n_features: 8,
        trees: vec![
            DecisionTree {
                nodes: vec![
                    Node::Split {
                        feature: 0,
                        threshold: 50.0,
                        left: 1,
                        right: 2,
                    },
                    Node::Leaf { class: 0 },
                    Node::Leaf { class: 1 },
                ],
            },
            DecisionTree {
                nodes: vec![Node::Leaf { class: 1 }],
            },
        ],
    };
    let encoder = LabelEncoder {
        classes: vec!["Arts".to_string(), "Science".to_string()],
    };
    fs::write(
        dir.join(CLASSIFIER_FILE),
        serde_json::to_string_pretty(&forest).unwrap(),
    )
    .unwrap();
    fs::write(
        dir.join(ENCODER_FILE),
        serde_json::to_string_pretty(&encoder).unwrap(),
    )
    .unwrap();
}

#[tokio::test]
async fn disk_artifacts_serve_predictions() {
    let dir = tempfile::tempdir().unwrap();
    write_artifacts(dir.path());

    let bundle = ModelBundle::load(dir.path()).unwrap();
    let app = router(Arc::new(GatewayState {
        model: Arc::new(bundle),
    }));

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/predict")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    r#"{"features": [92.0, 88.0, 85.0, 70.0, 64.0, 59.0, 14.0, 0.0]}"#,
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(value, serde_json::json!({"prediction": "Science"}));
}

#[tokio::test]
async fn startup_fails_before_serving_when_an_artifact_is_absent() {
    let dir = tempfile::tempdir().unwrap();
    // Only the encoder is present; the load that gates server startup must
    // fail, so no router is ever built.
    fs::write(
        dir.path().join(ENCODER_FILE),
        r#"{"classes": ["Arts", "Science"]}"#,
    )
    .unwrap();

    let err = ModelBundle::load(dir.path()).unwrap_err();
    assert!(err.to_string().contains(CLASSIFIER_FILE));
}
