// ABOUTME: Direct safety validation route handler
// ABOUTME: POST /api/safety/validate returns a SafetyReport for workout, exercise, or progression
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Spotter Fitness Safety

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use spotter_core::models::ValidationRequest;

use crate::errors::AppError;
use crate::resources::ServerResources;

/// Safety validation routes
pub struct SafetyRoutes;

impl SafetyRoutes {
    /// Create safety routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/safety/validate", post(Self::handle_validate))
            .with_state(resources)
    }

    /// Handle POST /api/safety/validate
    async fn handle_validate(
        State(resources): State<Arc<ServerResources>>,
        Json(request): Json<ValidationRequest>,
    ) -> Result<Response, AppError> {
        let report = resources.safety.validate(&request).await?;
        Ok((StatusCode::OK, Json(report)).into_response())
    }
}
