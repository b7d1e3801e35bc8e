// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Fixture library, scripted generative provider, failing audit log, and resource builders
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Spotter Fitness Safety
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::unwrap_used,
    clippy::expect_used
)]
//! Shared test utilities for `spotter_server`
//!
//! This module provides common test setup functions to reduce duplication
//! across integration tests.

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Once};
use std::time::Duration;

use async_trait::async_trait;
use spotter_core::errors::{AppError, SafetyError};
use spotter_core::models::{
    AuditRecord, CompletedSession, SessionExercise, UserSafetyContext, WorkoutConstraints,
};
use spotter_safety::SafetyEnvelope;
use spotter_server::generation::WorkoutGenerator;
use spotter_server::llm::{ChatRequest, ChatResponse, LlmCapabilities, LlmProvider};
use spotter_server::stores::{load_library_file, AuditLogStore, InMemoryStore, Stores};
use uuid::Uuid;

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            Ok("WARN" | "ERROR") | _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// Path to the demo exercise library shipped in `data/`
pub fn library_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data/exercise_library.json")
}

/// Default envelope shared by a test
pub fn envelope() -> Arc<SafetyEnvelope> {
    Arc::new(SafetyEnvelope::default())
}

/// In-memory store seeded with the demo library
pub fn seeded_store() -> Arc<InMemoryStore> {
    init_test_logging();
    let exercises = load_library_file(&library_path()).expect("demo library loads");
    Arc::new(InMemoryStore::with_library(exercises))
}

/// Constraints for a bodyweight session
pub fn bodyweight_constraints(difficulty_level: u8) -> WorkoutConstraints {
    WorkoutConstraints {
        duration_minutes: 45,
        difficulty_level,
        equipment_available: vec!["bodyweight".to_owned()],
        muscle_groups_focus: None,
        limitations: None,
        goals: None,
    }
}

/// Context with the given injuries and no other data
pub fn injured_context(injuries: &[&str]) -> UserSafetyContext {
    UserSafetyContext {
        injury_history: injuries.iter().map(|&i| i.to_owned()).collect(),
        ..UserSafetyContext::default()
    }
}

/// A session whose volume is `sets * reps` of one exercise
pub fn session_at(completed_at: chrono::DateTime<chrono::Utc>, sets: u32, reps: u32, intensity: u8) -> CompletedSession {
    CompletedSession {
        id: Uuid::new_v4(),
        completed_at,
        exercises: vec![SessionExercise {
            exercise_id: "bodyweight-squat".to_owned(),
            name: "Bodyweight Squat".to_owned(),
            sets,
            reps,
            intensity,
        }],
    }
}

/// Scripted behavior for [`TestLlmProvider`]
#[derive(Debug, Clone)]
pub enum Script {
    /// Return this text as the completion
    Respond(String),
    /// Fail the call
    Fail(String),
    /// Sleep before responding
    Delay(Duration, String),
}

/// Generative provider returning a scripted response
pub struct TestLlmProvider {
    script: Script,
    calls: AtomicUsize,
}

impl TestLlmProvider {
    pub fn new(script: Script) -> Arc<Self> {
        Arc::new(Self {
            script,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn responding(content: &str) -> Arc<Self> {
        Self::new(Script::Respond(content.to_owned()))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LlmProvider for TestLlmProvider {
    fn name(&self) -> &str {
        "test"
    }

    fn display_name(&self) -> &str {
        "Test Provider"
    }

    fn capabilities(&self) -> LlmCapabilities {
        LlmCapabilities::SYSTEM_MESSAGES | LlmCapabilities::JSON_MODE
    }

    fn default_model(&self) -> &str {
        "test-model"
    }

    async fn complete(&self, _request: &ChatRequest) -> Result<ChatResponse, AppError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let content = match &self.script {
            Script::Respond(content) => content.clone(),
            Script::Fail(message) => return Err(AppError::external_service("Test Provider", message.clone())),
            Script::Delay(delay, content) => {
                tokio::time::sleep(*delay).await;
                content.clone()
            }
        };
        Ok(ChatResponse {
            content,
            model: "test-model".to_owned(),
            usage: None,
            finish_reason: Some("stop".to_owned()),
        })
    }

    async fn health_check(&self) -> Result<bool, AppError> {
        Ok(!matches!(self.script, Script::Fail(_)))
    }
}

/// Audit log that rejects every write
pub struct FailingAuditLog;

#[async_trait]
impl AuditLogStore for FailingAuditLog {
    async fn append(&self, _record: &AuditRecord) -> Result<(), SafetyError> {
        Err(SafetyError::store("audit", "disk full"))
    }

    async fn recent(&self, _limit: usize) -> Result<Vec<AuditRecord>, SafetyError> {
        Err(SafetyError::store("audit", "disk full"))
    }
}

/// Generator over a store with an optional provider and a short timeout
pub fn generator_with(
    store: &Arc<InMemoryStore>,
    provider: Option<Arc<dyn LlmProvider>>,
    timeout: Duration,
) -> WorkoutGenerator {
    WorkoutGenerator::new(envelope(), Stores::from_backend(store.clone()), provider, timeout)
}

/// A valid candidate response using exercises from the demo library
pub const SAFE_CANDIDATE: &str = r#"{
    "title": "Bodyweight Basics",
    "exercises": [
        {"name": "Bodyweight Squat", "sets": 3, "reps": 12, "rest_seconds": 90, "intensity": 5},
        {"name": "glute bridge", "sets": 3, "reps": 15, "rest_seconds": 60, "intensity": 4},
        {"name": "Plank", "sets": 3, "reps": 1, "duration_seconds": 30, "rest_seconds": 45, "intensity": 5}
    ]
}"#;
