// ABOUTME: Error taxonomy for the workout generation and safety validation pipeline
// ABOUTME: Separates caller-visible failures from generator failures recovered by fallback
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Spotter Fitness Safety

//! # Safety Pipeline Errors
//!
//! - [`SafetyError`] is what a caller of the generation pipeline can observe:
//!   malformed requests, an empty eligible library, unreadable stores.
//! - [`GenerationError`] describes a failed or unusable generator round trip.
//!   The orchestrator always recovers from it by substituting the fallback plan,
//!   so it never reaches the caller.

use serde_json::json;
use thiserror::Error;

use super::{AppError, ErrorCode};

/// Caller-visible errors from normalization, filtering, and store access
#[derive(Debug, Clone, Error)]
pub enum SafetyError {
    /// Request is malformed or outside the safety envelope
    #[error("Invalid value for '{field}': {reason}")]
    Validation {
        /// Request field that failed validation
        field: String,
        /// Why the value was rejected
        reason: String,
        /// Offending items, when the field is a collection
        offending: Vec<String>,
    },

    /// No library exercise satisfies the constraints
    #[error("No eligible exercises: {reason}")]
    NoEligibleExercises {
        /// Which filter emptied the candidate set
        reason: String,
    },

    /// A backing store could not be read
    #[error("{store} store unavailable: {message}")]
    Store {
        /// Store name (library, profile, history)
        store: &'static str,
        /// Underlying failure
        message: String,
    },

    /// A plan about to be returned failed validation
    #[error("Safety invariant violated: {0}")]
    Invariant(String),
}

impl SafetyError {
    /// Create a validation error for a scalar field
    #[must_use]
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
            offending: Vec::new(),
        }
    }

    /// Create a validation error naming offending collection items
    #[must_use]
    pub fn validation_items(
        field: impl Into<String>,
        reason: impl Into<String>,
        offending: Vec<String>,
    ) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
            offending,
        }
    }

    /// Create a "no eligible exercises" error
    #[must_use]
    pub fn no_eligible(reason: impl Into<String>) -> Self {
        Self::NoEligibleExercises {
            reason: reason.into(),
        }
    }

    /// Create a store failure
    #[must_use]
    pub fn store(store: &'static str, message: impl Into<String>) -> Self {
        Self::Store {
            store,
            message: message.into(),
        }
    }
}

impl From<SafetyError> for AppError {
    fn from(error: SafetyError) -> Self {
        let message = error.to_string();
        match error {
            SafetyError::Validation {
                field, offending, ..
            } => Self::new(ErrorCode::InvalidInput, message)
                .with_details(json!({ "field": field, "offending": offending })),
            SafetyError::NoEligibleExercises { .. } => {
                Self::new(ErrorCode::NoEligibleExercises, message)
            }
            SafetyError::Store { store, .. } => {
                Self::new(ErrorCode::StoreUnavailable, message).with_details(json!({ "store": store }))
            }
            SafetyError::Invariant(_) => Self::new(ErrorCode::SafetyInvariantViolated, message),
        }
    }
}

/// Failures of a single generator round trip
#[derive(Debug, Clone, Error)]
pub enum GenerationError {
    /// The generative service call itself failed
    #[error("Generator call failed: {0}")]
    Provider(String),

    /// The generative call exceeded its hard timeout
    #[error("Generator timed out after {0} seconds")]
    Timeout(u64),

    /// Output was not parseable JSON
    #[error("Generator returned malformed JSON: {0}")]
    MalformedJson(String),

    /// Output parsed but violates the plan schema
    #[error("Generator output violates schema at '{field}': {reason}")]
    Schema {
        /// Offending schema path
        field: String,
        /// Why it was rejected
        reason: String,
    },

    /// Output referenced an exercise outside the eligible list
    #[error("Generator invented exercise '{0}'")]
    UnknownExercise(String),

    /// Output contained no exercises
    #[error("Generator returned an empty plan")]
    EmptyPlan,
}

impl GenerationError {
    /// Create a schema violation
    #[must_use]
    pub fn schema(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Schema {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Short machine-readable label used in audit records
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Provider(_) => "provider",
            Self::Timeout(_) => "timeout",
            Self::MalformedJson(_) => "malformed_json",
            Self::Schema { .. } => "schema",
            Self::UnknownExercise(_) => "unknown_exercise",
            Self::EmptyPlan => "empty_plan",
        }
    }
}

impl From<GenerationError> for AppError {
    fn from(error: GenerationError) -> Self {
        Self::external_service("generator", error.to_string())
    }
}
