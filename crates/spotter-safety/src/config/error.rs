// ABOUTME: Configuration error types for safety envelope loading and validation
// ABOUTME: Defines error variants for invalid ranges, missing entries, and rule file failures
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Spotter Fitness Safety

//! Configuration error types for safety envelope validation.

use std::env;
use thiserror::Error;

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Ordered thresholds are not in order
    #[error("Invalid range: {0}")]
    InvalidRange(&'static str),

    /// Required table entry is missing
    #[error("Missing required entry: {0}")]
    MissingField(&'static str),

    /// Environment variable access error
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] env::VarError),

    /// Failed to parse configuration value
    #[error("Parse error: {0}")]
    Parse(String),

    /// Numeric value outside valid range for parameter
    #[error("Value out of range: {0}")]
    ValueOutOfRange(&'static str),

    /// Rule table file could not be read or parsed
    #[error("Rules file '{path}': {message}")]
    RulesFile {
        /// Path that was read
        path: String,
        /// Underlying failure
        message: String,
    },
}
