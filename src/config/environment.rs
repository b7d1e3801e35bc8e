// ABOUTME: Server configuration loaded from environment variables
// ABOUTME: Network binding, database location, generation timeout, and provider selection
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Spotter Fitness Safety

use std::env;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use spotter_core::constants::generation;
use spotter_safety::ConfigError;
use tracing::info;

use super::types::{Environment, LlmProviderType, LogLevel};

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8081;
const DEFAULT_DATABASE_URL: &str = "sqlite:./data/spotter.db";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

/// Environment variable names read by [`ServerConfig::from_env`]
pub mod env_keys {
    /// Bind address
    pub const HOST: &str = "SPOTTER_HOST";
    /// Bind port
    pub const PORT: &str = "SPOTTER_PORT";
    /// `SQLite` database URL
    pub const DATABASE_URL: &str = "DATABASE_URL";
    /// Hard timeout for the generative call
    pub const GENERATION_TIMEOUT_SECS: &str = "SPOTTER_GENERATION_TIMEOUT_SECS";
    /// Whole-request timeout applied by the HTTP layer
    pub const REQUEST_TIMEOUT_SECS: &str = "SPOTTER_REQUEST_TIMEOUT_SECS";
    /// Deployment environment
    pub const ENVIRONMENT: &str = "ENVIRONMENT";
    /// Log level
    pub const LOG_LEVEL: &str = "RUST_LOG";
    /// JSON exercise library imported at startup
    pub const LIBRARY_PATH: &str = "SPOTTER_LIBRARY_PATH";
}

/// Top-level server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address the HTTP server binds to
    pub host: String,
    /// Port the HTTP server binds to
    pub port: u16,
    /// `SQLite` database URL
    pub database_url: String,
    /// Hard timeout for the single generative call
    pub generation_timeout_secs: u64,
    /// Whole-request timeout; must exceed the generation timeout
    pub request_timeout_secs: u64,
    /// Generative text provider
    pub llm_provider: LlmProviderType,
    /// Log level
    pub log_level: LogLevel,
    /// Deployment environment
    pub environment: Environment,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_owned(),
            port: DEFAULT_PORT,
            database_url: DEFAULT_DATABASE_URL.to_owned(),
            generation_timeout_secs: generation::DEFAULT_TIMEOUT_SECS,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            llm_provider: LlmProviderType::default(),
            log_level: LogLevel::default(),
            environment: Environment::default(),
        }
    }
}

fn parse_env<T: FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Parse(format!("{key} has invalid value '{raw}'"))),
        _ => Ok(default),
    }
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric variable cannot be parsed or the resulting
    /// configuration is inconsistent
    pub fn from_env() -> Result<Self, ConfigError> {
        info!("Loading server configuration from environment variables");

        let config = Self {
            host: env::var(env_keys::HOST).unwrap_or_else(|_| DEFAULT_HOST.to_owned()),
            port: parse_env(env_keys::PORT, DEFAULT_PORT)?,
            database_url: env::var(env_keys::DATABASE_URL)
                .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_owned()),
            generation_timeout_secs: parse_env(
                env_keys::GENERATION_TIMEOUT_SECS,
                generation::DEFAULT_TIMEOUT_SECS,
            )?,
            request_timeout_secs: parse_env(
                env_keys::REQUEST_TIMEOUT_SECS,
                DEFAULT_REQUEST_TIMEOUT_SECS,
            )?,
            llm_provider: LlmProviderType::from_env(),
            log_level: env::var(env_keys::LOG_LEVEL)
                .map(|s| LogLevel::from_str_or_default(&s))
                .unwrap_or_default(),
            environment: env::var(env_keys::ENVIRONMENT)
                .map(|s| Environment::from_str_or_default(&s))
                .unwrap_or_default(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Check cross-field consistency
    ///
    /// # Errors
    ///
    /// Returns an error for a zero timeout or a request timeout that would cut
    /// off the generation call before fallback can run
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.generation_timeout_secs == 0 {
            return Err(ConfigError::ValueOutOfRange(env_keys::GENERATION_TIMEOUT_SECS));
        }
        if self.request_timeout_secs <= self.generation_timeout_secs {
            return Err(ConfigError::InvalidRange(
                "request timeout must exceed the generation timeout",
            ));
        }
        Ok(())
    }

    /// Generation timeout as a `Duration`
    #[must_use]
    pub const fn generation_timeout(&self) -> Duration {
        Duration::from_secs(self.generation_timeout_secs)
    }

    /// Request timeout as a `Duration`
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Socket address string for binding
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// One-line summary for startup logs
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "bind={} database={} provider={} generation_timeout={}s environment={}",
            self.bind_address(),
            self.database_url,
            self.llm_provider,
            self.generation_timeout_secs,
            self.environment
        )
    }
}
