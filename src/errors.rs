// ABOUTME: Error types re-exported from spotter-core for use across the server crate
// ABOUTME: AppError is the edge error; SafetyError and GenerationError are engine errors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Spotter Fitness Safety

//! Error handling
//!
//! The types live in `spotter-core` so the safety crate can share them; this
//! module re-exports them under the server's `crate::errors` path.

pub use spotter_core::errors::{
    AppError, AppResult, ErrorCode, ErrorResponse, ErrorResponseDetails, GenerationError,
    SafetyError,
};
