// ABOUTME: Domain models for workout generation and safety validation
// ABOUTME: Re-exports constraint, exercise, plan, report, session, and request types
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Spotter Fitness Safety

//! # Domain Models
//!
//! Plain data types shared by the safety crate and the server. Everything is
//! `serde`-serializable with `snake_case` wire names so the same types back the
//! HTTP API, the SQLite store, and the generator prompt.

mod audit;
mod constraints;
mod context;
mod exercise;
mod plan;
mod report;
mod requests;
mod session;

pub use audit::{AuditEvent, AuditRecord};
pub use constraints::{ExperienceLevel, WorkoutConstraints, WorkoutPreferences};
pub use context::UserSafetyContext;
pub use exercise::{ExerciseCategory, ExerciseLibrary, LibraryExercise};
pub use plan::{GeneratedBy, PlannedExercise, WorkoutPlan};
pub use report::{
    ModificationType, RiskLevel, SafetyModification, SafetyReport, SafetyViolation, Severity,
    ViolationType,
};
pub use requests::{ExerciseSuggestion, GenerationRequest, ValidationRequest, ValidationType};
pub use session::{CompletedSession, SessionExercise};

/// Normalize a free-text label for comparisons (trimmed, lower-case)
#[must_use]
pub fn normalize_label(value: &str) -> String {
    value.trim().to_lowercase()
}
