// ABOUTME: Configuration module for the spotter-safety crate
// ABOUTME: Re-exports the safety envelope, rule tables, and configuration errors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Spotter Fitness Safety

/// Numeric ceilings and per-level tables
pub mod envelope;
/// Configuration error types
pub mod error;
/// Keyed rule tables
pub mod rules;

pub use envelope::{SafetyEnvelope, VolumeLimits, HARD_MAX_REPS_PER_SET, HARD_MAX_SETS_PER_EXERCISE};
pub use error::ConfigError;
pub use rules::{text_matches, HighRiskExercise, InjuryRestriction, SafetyRules};
