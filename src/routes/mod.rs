// ABOUTME: HTTP route assembly for workout generation, safety validation, and health
// ABOUTME: Applies tracing, timeout, and body-size layers to the combined router
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Spotter Fitness Safety

//! HTTP routes
//!
//! Each domain module holds route definitions and thin handlers that delegate
//! to the generation pipeline or the safety service.

/// Health and readiness probes
pub mod health;
/// Direct safety validation
pub mod safety;
/// Workout generation
pub mod workouts;

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

pub use health::HealthRoutes;
pub use safety::SafetyRoutes;
pub use workouts::WorkoutRoutes;

use crate::resources::ServerResources;

/// Largest accepted request body
const MAX_BODY_BYTES: usize = 256 * 1024;

/// Build the full application router
pub fn router(resources: Arc<ServerResources>, request_timeout: Duration) -> Router {
    Router::new()
        .merge(HealthRoutes::routes(resources.clone()))
        .merge(WorkoutRoutes::routes(resources.clone()))
        .merge(SafetyRoutes::routes(resources))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(TimeoutLayer::new(request_timeout))
        .layer(TraceLayer::new_for_http())
}
