// ABOUTME: validate subcommand - runs workout-mode validation on a plan file
// ABOUTME: Exits 0 when the plan is safe and 1 when it is not
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Spotter Fitness Safety

use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use spotter_core::models::{UserSafetyContext, ValidationRequest, ValidationType, WorkoutPlan};
use spotter_safety::SafetyEnvelope;
use spotter_server::services::SafetyService;
use spotter_server::stores::{load_library_file, InMemoryStore, Stores};

use crate::helpers::{print_json, read_json};

pub async fn run(plan: &Path, library: &Path, context: Option<&Path>) -> Result<ExitCode> {
    let envelope = Arc::new(SafetyEnvelope::load()?);
    let plan: WorkoutPlan = read_json(plan)?;
    let user_context = context
        .map(read_json::<UserSafetyContext>)
        .transpose()?;

    let store = Arc::new(InMemoryStore::with_library(load_library_file(library)?));
    let service = SafetyService::new(envelope, Stores::from_backend(store));

    let request = ValidationRequest {
        validation_type: ValidationType::Workout,
        user_id: None,
        workout_plan: Some(plan),
        exercise_suggestion: None,
        user_context,
    };
    let report = service.validate(&request).await?;
    print_json(&report)?;

    Ok(if report.is_safe {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
