// ABOUTME: Workout generation: prompt, candidate parsing, and the orchestrating pipeline
// ABOUTME: Re-exports the orchestrator and candidate generator entry points
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Spotter Fitness Safety

/// One-shot candidate generation with strict parsing and clamps
pub mod candidate;
/// Pipeline from request to validated plan
pub mod orchestrator;
/// Prompt construction
pub mod prompt;

pub use candidate::{extract_json, plan_from_response, CandidateGenerator, CandidateRequest};
pub use orchestrator::{GenerationOutcome, WorkoutGenerator};
