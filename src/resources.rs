// ABOUTME: Shared server resources handed to every HTTP handler
// ABOUTME: Built once at startup from configuration, stores, and the optional provider
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Spotter Fitness Safety

use std::sync::Arc;

use spotter_safety::SafetyEnvelope;

use crate::config::ServerConfig;
use crate::database::Database;
use crate::generation::WorkoutGenerator;
use crate::llm::LlmProvider;
use crate::services::SafetyService;
use crate::stores::Stores;

/// Everything a request handler may need
pub struct ServerResources {
    /// Immutable safety limits
    pub envelope: Arc<SafetyEnvelope>,
    /// Generation pipeline
    pub generator: WorkoutGenerator,
    /// Direct validation service
    pub safety: SafetyService,
    /// Database, when the stores are `SQLite`-backed; used by the readiness probe
    pub database: Option<Database>,
    /// Generative provider, probed by the readiness check
    pub provider: Option<Arc<dyn LlmProvider>>,
}

impl ServerResources {
    /// Assemble resources from already-constructed parts
    #[must_use]
    pub fn new(
        config: &ServerConfig,
        envelope: Arc<SafetyEnvelope>,
        stores: Stores,
        provider: Option<Arc<dyn LlmProvider>>,
        database: Option<Database>,
    ) -> Self {
        Self {
            generator: WorkoutGenerator::new(
                envelope.clone(),
                stores.clone(),
                provider.clone(),
                config.generation_timeout(),
            ),
            safety: SafetyService::new(envelope.clone(), stores),
            envelope,
            database,
            provider,
        }
    }
}
