// ABOUTME: Configuration module for server settings loaded from the environment
// ABOUTME: Re-exports ServerConfig and the enum types used to parse env strings
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Spotter Fitness Safety

//! Server configuration
//!
//! Safety limits live in [`spotter_safety::SafetyEnvelope`]; this module only
//! covers how the server runs (binding, storage, provider, timeouts).

/// Environment-driven server configuration
pub mod environment;
/// Enum types parsed from environment strings
pub mod types;

pub use environment::{env_keys, ServerConfig};
pub use types::{Environment, LlmProviderType, LogLevel};
