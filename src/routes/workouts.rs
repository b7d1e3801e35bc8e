// ABOUTME: Workout generation route handler
// ABOUTME: POST /api/workouts/generate returns a validated WorkoutPlan
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Spotter Fitness Safety

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use spotter_core::models::GenerationRequest;

use crate::errors::AppError;
use crate::resources::ServerResources;

/// Workout generation routes
pub struct WorkoutRoutes;

impl WorkoutRoutes {
    /// Create workout routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/workouts/generate", post(Self::handle_generate))
            .with_state(resources)
    }

    /// Handle POST /api/workouts/generate
    async fn handle_generate(
        State(resources): State<Arc<ServerResources>>,
        Json(request): Json<GenerationRequest>,
    ) -> Result<Response, AppError> {
        let plan = resources.generator.generate(&request).await?;
        Ok((StatusCode::OK, Json(plan)).into_response())
    }
}
