// ABOUTME: Main library entry point for the Spotter workout safety server
// ABOUTME: Wires generation, validation, persistence, and HTTP routes around the safety engine
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Spotter Fitness Safety

#![deny(unsafe_code)]

//! # Spotter Server
//!
//! Safety-constrained workout generation and validation. A generative text
//! service proposes candidate plans; nothing it produces reaches a user until
//! it has passed the rule engine in `spotter-safety`. When a candidate is
//! malformed, late, or unsafe, a deterministic bodyweight plan is served instead.
//!
//! ## Architecture
//!
//! - **Generation**: prompt construction, candidate parsing, and the orchestrator
//! - **Services**: direct workout, exercise, and progression validation
//! - **Stores**: exercise library, user profiles, workout history, audit log
//! - **Database**: `SQLite` implementations of the stores
//! - **Routes**: `axum` HTTP surface
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use spotter_server::config::ServerConfig;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::from_env()?;
//!     println!("Spotter configured: {}", config.summary());
//!     Ok(())
//! }
//! ```

/// Environment configuration
pub mod config;

/// `SQLite` store implementations
pub mod database;

/// Error types shared with the safety engine
pub mod errors;

/// Candidate generation and the generation orchestrator
pub mod generation;

/// Generative text provider abstraction
pub mod llm;

/// Structured logging
pub mod logging;

/// Shared handler state
pub mod resources;

/// HTTP routes
pub mod routes;

/// Direct safety validation
pub mod services;

/// Store traits and the in-memory backend
pub mod stores;
