// ABOUTME: Core types and errors for the Spotter workout safety engine
// ABOUTME: Foundation crate with error handling, domain models, and constants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Spotter Fitness Safety

#![deny(unsafe_code)]

//! # Spotter Core
//!
//! Foundation crate providing shared types for the Spotter workout safety
//! engine. It is kept free of I/O so the safety crate and the server crate can
//! both depend on it without pulling in HTTP or database stacks.
//!
//! ## Modules
//!
//! - **errors**: `AppError`, `ErrorCode`, and the engine taxonomy (`SafetyError`, `GenerationError`)
//! - **models**: constraints, library exercises, user context, plans, and safety reports
//! - **constants**: fixed thresholds shared by the validator and the generator

/// Unified error handling with standard error codes and HTTP mapping
pub mod errors;

/// Domain models for constraints, exercises, plans, and reports
pub mod models;

/// Engine-wide constants organized by domain
pub mod constants;
