// ABOUTME: HTTP route tests driving the axum router with tower oneshot requests
// ABOUTME: Status codes and JSON bodies for generation, validation, and health probes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Spotter Fitness Safety
#![allow(clippy::unwrap_used)]

mod common;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use common::{envelope, seeded_store, Script, TestLlmProvider, SAFE_CANDIDATE};
use serde_json::{json, Value};
use spotter_server::config::ServerConfig;
use spotter_server::llm::LlmProvider;
use spotter_server::resources::ServerResources;
use spotter_server::routes;
use spotter_server::stores::Stores;
use tower::ServiceExt;

fn app_with_provider(provider: Option<Arc<dyn LlmProvider>>) -> Router {
    let config = ServerConfig::default();
    let resources = Arc::new(ServerResources::new(
        &config,
        envelope(),
        Stores::from_backend(seeded_store()),
        provider,
        None,
    ));
    routes::router(resources, Duration::from_secs(10))
}

fn app() -> Router {
    app_with_provider(None)
}

async fn get_json(app: Router, uri: &str) -> Result<(StatusCode, Value)> {
    let response = app.oneshot(Request::builder().uri(uri).body(Body::empty())?).await?;
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    Ok((status, serde_json::from_slice(&bytes)?))
}

async fn post_json(app: Router, uri: &str, body: &Value) -> Result<(StatusCode, Value)> {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(body)?))?;
    let response = app.oneshot(request).await?;
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    Ok((status, serde_json::from_slice(&bytes)?))
}

#[tokio::test]
async fn test_health_and_ready() -> Result<()> {
    let response = app()
        .oneshot(Request::builder().uri("/health").body(Body::empty())?)
        .await?;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app()
        .oneshot(Request::builder().uri("/ready").body(Body::empty())?)
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    let body: Value = serde_json::from_slice(&bytes)?;
    assert_eq!(body["status"], "ready");
    assert_eq!(body["generation"], "template_only");
    assert_eq!(body["provider"], "disabled");
    Ok(())
}

#[tokio::test]
async fn test_ready_reports_provider_reachability() -> Result<()> {
    let healthy: Arc<dyn LlmProvider> = TestLlmProvider::responding(SAFE_CANDIDATE);
    let (status, body) = get_json(app_with_provider(Some(healthy)), "/ready").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["generation"], "llm");
    assert_eq!(body["provider"], "reachable");

    let failing: Arc<dyn LlmProvider> = TestLlmProvider::new(Script::Fail("offline".to_owned()));
    let (status, body) = get_json(app_with_provider(Some(failing)), "/ready").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ready");
    assert_eq!(body["provider"], "unreachable");
    Ok(())
}

#[tokio::test]
async fn test_generate_returns_plan() -> Result<()> {
    let body = json!({
        "user_id": uuid::Uuid::new_v4(),
        "constraints": {
            "duration_minutes": 45,
            "difficulty_level": 3,
            "equipment_available": ["bodyweight"]
        }
    });

    let (status, plan) = post_json(app(), "/api/workouts/generate", &body).await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(plan["generated_by"], "template");
    assert_eq!(plan["duration_minutes"], 45);
    assert!(!plan["exercises"].as_array().unwrap().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_generate_rejects_disallowed_equipment() -> Result<()> {
    let body = json!({
        "user_id": uuid::Uuid::new_v4(),
        "constraints": {
            "duration_minutes": 45,
            "difficulty_level": 3,
            "equipment_available": ["olympic_rings"]
        }
    });

    let (status, error) = post_json(app(), "/api/workouts/generate", &body).await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["error"]["code"], "INVALID_INPUT");
    assert_eq!(error["error"]["details"]["field"], "equipment_available");
    assert_eq!(error["error"]["details"]["offending"], json!(["olympic_rings"]));
    Ok(())
}

#[tokio::test]
async fn test_generate_without_matching_exercises_is_unprocessable() -> Result<()> {
    let body = json!({
        "user_id": uuid::Uuid::new_v4(),
        "constraints": {
            "duration_minutes": 30,
            "difficulty_level": 2,
            "equipment_available": ["rowing_machine"]
        }
    });

    let (status, error) = post_json(app(), "/api/workouts/generate", &body).await?;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(error["error"]["code"], "NO_ELIGIBLE_EXERCISES");
    Ok(())
}

#[tokio::test]
async fn test_validate_unknown_exercise() -> Result<()> {
    let body = json!({
        "validation_type": "exercise",
        "exercise_suggestion": {"exercise_id": "dragon-flag-deluxe"}
    });

    let (status, report) = post_json(app(), "/api/safety/validate", &body).await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["is_safe"], false);
    assert_eq!(report["risk_level"], "very_high");
    assert_eq!(report["safety_score"], 0);
    assert_eq!(report["violations"][0]["type"], "exercise");
    assert_eq!(report["violations"][0]["severity"], "critical");
    Ok(())
}

#[tokio::test]
async fn test_validate_missing_payload_is_bad_request() -> Result<()> {
    let body = json!({"validation_type": "workout"});

    let (status, error) = post_json(app(), "/api/safety/validate", &body).await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["error"]["details"]["field"], "workout_plan");
    Ok(())
}
