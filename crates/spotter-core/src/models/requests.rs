// ABOUTME: Request bodies for workout generation and direct safety validation
// ABOUTME: Shared by the HTTP routes, the CLI, and the service layer
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Spotter Fitness Safety

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{UserSafetyContext, WorkoutConstraints, WorkoutPlan, WorkoutPreferences};

/// Generate a workout for a user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// User the workout is for
    pub user_id: Uuid,
    /// Caller constraints
    pub constraints: WorkoutConstraints,
    /// Optional preferences merged with the stored profile
    #[serde(default)]
    pub preferences: Option<WorkoutPreferences>,
}

/// Which validator mode to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationType {
    /// Whole-plan validation
    Workout,
    /// Single-exercise validation
    Exercise,
    /// Progression over recent history
    Progression,
}

/// A single exercise proposed for validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExerciseSuggestion {
    /// Library exercise id
    pub exercise_id: String,
    /// Proposed sets
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sets: Option<u32>,
    /// Proposed reps per set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reps: Option<u32>,
    /// Proposed intensity on a 1-10 RPE scale
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intensity: Option<u8>,
    /// Proposed rest between sets
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rest_seconds: Option<u32>,
}

/// Direct validation request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationRequest {
    /// Validator mode
    pub validation_type: ValidationType,
    /// User whose stored profile and history apply
    #[serde(default)]
    pub user_id: Option<Uuid>,
    /// Plan to validate (workout mode)
    #[serde(default)]
    pub workout_plan: Option<WorkoutPlan>,
    /// Exercise to validate (exercise mode)
    #[serde(default)]
    pub exercise_suggestion: Option<ExerciseSuggestion>,
    /// Context merged with the stored profile
    #[serde(default)]
    pub user_context: Option<UserSafetyContext>,
}
