// ABOUTME: generate subcommand - builds a validated fallback plan offline
// ABOUTME: Runs the full generation pipeline with no generative provider
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Spotter Fitness Safety

use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use spotter_core::constants::generation;
use spotter_core::models::{GenerationRequest, UserSafetyContext, WorkoutConstraints};
use spotter_safety::SafetyEnvelope;
use spotter_server::generation::WorkoutGenerator;
use spotter_server::stores::{load_library_file, InMemoryStore, Stores, UserProfileStore};
use uuid::Uuid;

use crate::helpers::{print_json, read_json};

pub async fn run(constraints: &Path, library: &Path, context: Option<&Path>) -> Result<ExitCode> {
    let envelope = Arc::new(SafetyEnvelope::load()?);
    let constraints: WorkoutConstraints = read_json(constraints)?;
    let store = Arc::new(InMemoryStore::with_library(load_library_file(library)?));

    let user_id = Uuid::new_v4();
    if let Some(path) = context {
        let user_context: UserSafetyContext = read_json(path)?;
        store.upsert_safety_context(user_id, &user_context).await?;
    }

    let generator = WorkoutGenerator::new(
        envelope,
        Stores::from_backend(store),
        None,
        Duration::from_secs(generation::DEFAULT_TIMEOUT_SECS),
    );
    let request = GenerationRequest {
        user_id,
        constraints,
        preferences: None,
    };
    let plan = generator.generate(&request).await?;
    print_json(&plan)?;
    Ok(ExitCode::SUCCESS)
}
