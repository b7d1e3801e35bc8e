// ABOUTME: Collaborator store traits read and written by the generation pipeline
// ABOUTME: Exercise library, user profile, workout history, and audit log contracts
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Spotter Fitness Safety

//! # Stores
//!
//! The pipeline talks to its data through four narrow traits. Reads of the
//! library, profile and history are fatal when they fail; audit appends are
//! best-effort and their failures are swallowed by callers.
//!
//! Two implementations ship with the crate: [`memory`] for tests and the CLI,
//! and [`crate::database::Database`] backed by `SQLite`.

pub mod memory;

use std::fs;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use spotter_core::errors::SafetyError;
use spotter_core::models::{
    AuditRecord, CompletedSession, ExerciseLibrary, LibraryExercise, UserSafetyContext,
};
use uuid::Uuid;

pub use memory::InMemoryStore;

/// Read access to the curated exercise library
#[async_trait]
pub trait ExerciseLibraryStore: Send + Sync {
    /// Point-in-time snapshot of every exercise
    async fn snapshot(&self) -> Result<ExerciseLibrary, SafetyError>;

    /// Keyed lookup by exercise id
    async fn get(&self, id: &str) -> Result<Option<LibraryExercise>, SafetyError>;

    /// Exercises at or above a safety rating and at or below a difficulty, in id order
    async fn query_eligible(
        &self,
        min_safety_rating: u8,
        max_difficulty: u8,
    ) -> Result<Vec<LibraryExercise>, SafetyError>;
}

/// Stored safety context per user
#[async_trait]
pub trait UserProfileStore: Send + Sync {
    /// Stored context, or an empty context for users without a profile
    async fn safety_context(&self, user_id: Uuid) -> Result<UserSafetyContext, SafetyError>;

    /// Create or replace a user's stored context
    async fn upsert_safety_context(
        &self,
        user_id: Uuid,
        context: &UserSafetyContext,
    ) -> Result<(), SafetyError>;
}

/// Completed session history per user
#[async_trait]
pub trait WorkoutHistoryStore: Send + Sync {
    /// Sessions completed at or after `since`, oldest first
    async fn sessions_since(
        &self,
        user_id: Uuid,
        since: DateTime<Utc>,
    ) -> Result<Vec<CompletedSession>, SafetyError>;

    /// Record a completed session
    async fn record_session(
        &self,
        user_id: Uuid,
        session: &CompletedSession,
    ) -> Result<(), SafetyError>;
}

/// Append-only audit log
#[async_trait]
pub trait AuditLogStore: Send + Sync {
    /// Append one record
    async fn append(&self, record: &AuditRecord) -> Result<(), SafetyError>;

    /// Most recent records, newest first
    async fn recent(&self, limit: usize) -> Result<Vec<AuditRecord>, SafetyError>;
}

/// Shared handles to every store the pipeline uses
#[derive(Clone)]
pub struct Stores {
    /// Exercise library
    pub library: Arc<dyn ExerciseLibraryStore>,
    /// User profiles
    pub profiles: Arc<dyn UserProfileStore>,
    /// Completed sessions
    pub history: Arc<dyn WorkoutHistoryStore>,
    /// Audit log
    pub audit: Arc<dyn AuditLogStore>,
}

impl Stores {
    /// Use one backend for every store
    #[must_use]
    pub fn from_backend<B>(backend: Arc<B>) -> Self
    where
        B: ExerciseLibraryStore + UserProfileStore + WorkoutHistoryStore + AuditLogStore + 'static,
    {
        Self {
            library: backend.clone(),
            profiles: backend.clone(),
            history: backend.clone(),
            audit: backend,
        }
    }

    /// Replace the audit log
    #[must_use]
    pub fn with_audit(mut self, audit: Arc<dyn AuditLogStore>) -> Self {
        self.audit = audit;
        self
    }
}

/// Read a JSON array of library exercises from disk
///
/// Used to seed a store at startup and by the CLI.
///
/// # Errors
///
/// Returns `SafetyError::Store` when the file cannot be read or parsed, or
/// holds an exercise with an out-of-range rating or difficulty
pub fn load_library_file(path: &Path) -> Result<Vec<LibraryExercise>, SafetyError> {
    let raw = fs::read_to_string(path)
        .map_err(|e| SafetyError::store("library", format!("{}: {e}", path.display())))?;
    let exercises: Vec<LibraryExercise> = serde_json::from_str(&raw)
        .map_err(|e| SafetyError::store("library", format!("{}: {e}", path.display())))?;

    if let Some(bad) = exercises.iter().find(|e| {
        !(1..=5).contains(&e.safety_rating) || !(1..=5).contains(&e.difficulty_level)
    }) {
        return Err(SafetyError::store(
            "library",
            format!("exercise '{}' has rating or difficulty outside 1-5", bad.id),
        ));
    }
    Ok(exercises)
}
