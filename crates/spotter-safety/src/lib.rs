// ABOUTME: Safety rule engine for workout generation and direct validation
// ABOUTME: Envelope, normalizer, library filter, validator, and fallback generator
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Spotter Fitness Safety

#![deny(unsafe_code)]

//! # Spotter Safety
//!
//! Pure safety logic with no network or database access. Every component takes
//! an `Arc<SafetyEnvelope>` at construction, so tests can run the whole engine
//! against tightened or relaxed thresholds without touching global state.
//!
//! ```text
//! constraints -> ConstraintNormalizer -> LibraryFilter -> (generator) -> SafetyValidator
//!                                                              \-> FallbackGenerator
//! ```

/// Safety envelope, rule tables, and configuration errors
pub mod config;
/// Deterministic bodyweight fallback plans
pub mod fallback;
/// Eligible-exercise selection
pub mod library_filter;
/// Request constraint validation
pub mod normalizer;
/// Workout, exercise, and progression validation
pub mod validator;

pub use config::{ConfigError, SafetyEnvelope, SafetyRules};
pub use fallback::FallbackGenerator;
pub use library_filter::LibraryFilter;
pub use normalizer::{assess_injury_risk, ConstraintNormalizer, InjuryRisk, NormalizedConstraints};
pub use validator::SafetyValidator;
