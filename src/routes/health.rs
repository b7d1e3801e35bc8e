// ABOUTME: Health check route handlers for liveness and readiness probes
// ABOUTME: Readiness pings the database and reports generative provider reachability
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Spotter Fitness Safety

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use tracing::warn;

use crate::llm::LlmProvider;
use crate::resources::ServerResources;

/// Health routes implementation
pub struct HealthRoutes;

impl HealthRoutes {
    /// Create all health check routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/health", get(Self::handle_health))
            .route("/ready", get(Self::handle_ready))
            .with_state(resources)
    }

    async fn handle_health() -> Json<serde_json::Value> {
        Json(json!({
            "status": "healthy",
            "timestamp": chrono::Utc::now().to_rfc3339()
        }))
    }

    async fn handle_ready(State(resources): State<Arc<ServerResources>>) -> Response {
        let database_ok = match &resources.database {
            Some(db) => match db.ping().await {
                Ok(()) => true,
                Err(e) => {
                    warn!(error = %e, "Readiness check failed");
                    false
                }
            },
            None => true,
        };

        // Provider outages degrade to fallback plans, so they never fail readiness
        let provider = match &resources.provider {
            None => "disabled",
            Some(provider) => match provider.health_check().await {
                Ok(true) => "reachable",
                Ok(false) => "unreachable",
                Err(e) => {
                    warn!(provider = provider.name(), error = %e, "Provider health check failed");
                    "unreachable"
                }
            },
        };

        let status = if database_ok {
            StatusCode::OK
        } else {
            StatusCode::SERVICE_UNAVAILABLE
        };
        let body = json!({
            "status": if database_ok { "ready" } else { "unavailable" },
            "database": database_ok,
            "generation": if resources.generator.has_provider() { "llm" } else { "template_only" },
            "provider": provider,
            "timestamp": chrono::Utc::now().to_rfc3339()
        });
        (status, Json(body)).into_response()
    }
}
