// ABOUTME: In-memory implementation of every collaborator store
// ABOUTME: Used by tests, benchmarks, and the offline CLI
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Spotter Fitness Safety

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use spotter_core::errors::SafetyError;
use spotter_core::models::{
    AuditRecord, CompletedSession, ExerciseLibrary, LibraryExercise, UserSafetyContext,
};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{AuditLogStore, ExerciseLibraryStore, UserProfileStore, WorkoutHistoryStore};

/// All four stores held in process memory
#[derive(Debug, Default)]
pub struct InMemoryStore {
    exercises: RwLock<BTreeMap<String, LibraryExercise>>,
    profiles: RwLock<HashMap<Uuid, UserSafetyContext>>,
    sessions: RwLock<HashMap<Uuid, Vec<CompletedSession>>>,
    audit: RwLock<Vec<AuditRecord>>,
}

impl InMemoryStore {
    /// Empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with a library
    #[must_use]
    pub fn with_library(exercises: impl IntoIterator<Item = LibraryExercise>) -> Self {
        Self {
            exercises: RwLock::new(exercises.into_iter().map(|e| (e.id.clone(), e)).collect()),
            ..Self::default()
        }
    }

    /// Add or replace a library exercise
    pub async fn insert_exercise(&self, exercise: LibraryExercise) {
        self.exercises.write().await.insert(exercise.id.clone(), exercise);
    }

    /// Number of audit records written so far
    pub async fn audit_len(&self) -> usize {
        self.audit.read().await.len()
    }
}

#[async_trait]
impl ExerciseLibraryStore for InMemoryStore {
    async fn snapshot(&self) -> Result<ExerciseLibrary, SafetyError> {
        Ok(self.exercises.read().await.values().cloned().collect())
    }

    async fn get(&self, id: &str) -> Result<Option<LibraryExercise>, SafetyError> {
        Ok(self.exercises.read().await.get(id).cloned())
    }

    async fn query_eligible(
        &self,
        min_safety_rating: u8,
        max_difficulty: u8,
    ) -> Result<Vec<LibraryExercise>, SafetyError> {
        Ok(self
            .exercises
            .read()
            .await
            .values()
            .filter(|e| e.safety_rating >= min_safety_rating && e.difficulty_level <= max_difficulty)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl UserProfileStore for InMemoryStore {
    async fn safety_context(&self, user_id: Uuid) -> Result<UserSafetyContext, SafetyError> {
        Ok(self
            .profiles
            .read()
            .await
            .get(&user_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn upsert_safety_context(
        &self,
        user_id: Uuid,
        context: &UserSafetyContext,
    ) -> Result<(), SafetyError> {
        self.profiles.write().await.insert(user_id, context.clone());
        Ok(())
    }
}

#[async_trait]
impl WorkoutHistoryStore for InMemoryStore {
    async fn sessions_since(
        &self,
        user_id: Uuid,
        since: DateTime<Utc>,
    ) -> Result<Vec<CompletedSession>, SafetyError> {
        let mut sessions: Vec<CompletedSession> = self
            .sessions
            .read()
            .await
            .get(&user_id)
            .map(|all| all.iter().filter(|s| s.completed_at >= since).cloned().collect())
            .unwrap_or_default();
        sessions.sort_by_key(|s| s.completed_at);
        Ok(sessions)
    }

    async fn record_session(
        &self,
        user_id: Uuid,
        session: &CompletedSession,
    ) -> Result<(), SafetyError> {
        self.sessions
            .write()
            .await
            .entry(user_id)
            .or_default()
            .push(session.clone());
        Ok(())
    }
}

#[async_trait]
impl AuditLogStore for InMemoryStore {
    async fn append(&self, record: &AuditRecord) -> Result<(), SafetyError> {
        self.audit.write().await.push(record.clone());
        Ok(())
    }

    async fn recent(&self, limit: usize) -> Result<Vec<AuditRecord>, SafetyError> {
        Ok(self.audit.read().await.iter().rev().take(limit).cloned().collect())
    }
}
