// ABOUTME: Workout plan produced by the candidate or fallback generator
// ABOUTME: The only artifact returned to callers, and only after validation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Spotter Fitness Safety

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Which generator produced a plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeneratedBy {
    /// External generative text service
    Llm,
    /// Deterministic fallback template
    Template,
}

impl GeneratedBy {
    /// Convert to wire/database string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Llm => "llm",
            Self::Template => "template",
        }
    }

    /// Parse from database string representation
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "llm" => Some(Self::Llm),
            "template" => Some(Self::Template),
            _ => None,
        }
    }
}

/// One exercise prescription inside a plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedExercise {
    /// Library exercise id
    pub id: String,
    /// Library exercise name
    pub name: String,
    /// Number of sets
    pub sets: u32,
    /// Repetitions per set
    pub reps: u32,
    /// Work duration for timed exercises
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<u32>,
    /// Rest between sets
    pub rest_seconds: u32,
    /// Effort on a 1-10 RPE scale
    pub intensity: u8,
    /// Equipment used for this exercise
    #[serde(default)]
    pub equipment: Vec<String>,
}

/// A complete workout session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkoutPlan {
    /// Plan identifier
    pub id: Uuid,
    /// Short title
    pub title: String,
    /// Session length in minutes
    pub duration_minutes: u32,
    /// Difficulty on a 1-5 scale
    pub difficulty_level: u8,
    /// Ordered exercise prescriptions
    pub exercises: Vec<PlannedExercise>,
    /// Union of equipment across exercises
    #[serde(default)]
    pub equipment_needed: Vec<String>,
    /// Producing generator
    pub generated_by: GeneratedBy,
}

impl WorkoutPlan {
    /// Total sets across all exercises
    #[must_use]
    pub fn total_sets(&self) -> u32 {
        self.exercises.iter().map(|e| e.sets).sum()
    }
}
