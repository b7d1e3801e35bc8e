// ABOUTME: Completed workout session table and the WorkoutHistoryStore implementation
// ABOUTME: Session exercises are stored as a JSON document per session
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Spotter Fitness Safety

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use spotter_core::errors::SafetyError;
use spotter_core::models::{CompletedSession, SessionExercise};
use sqlx::Row;
use uuid::Uuid;

use super::{store_error, Database};
use crate::stores::WorkoutHistoryStore;

const STORE: &str = "history";

impl Database {
    pub(super) async fn migrate_sessions(&self) -> Result<(), SafetyError> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS workout_sessions (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                completed_at INTEGER NOT NULL,
                exercises TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await
        .map_err(store_error(STORE))?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_workout_sessions_user_time ON workout_sessions(user_id, completed_at)",
        )
        .execute(&self.pool)
        .await
        .map_err(store_error(STORE))?;
        Ok(())
    }
}

#[async_trait]
impl WorkoutHistoryStore for Database {
    async fn sessions_since(
        &self,
        user_id: Uuid,
        since: DateTime<Utc>,
    ) -> Result<Vec<CompletedSession>, SafetyError> {
        let rows = sqlx::query(
            r"
            SELECT id, completed_at, exercises FROM workout_sessions
            WHERE user_id = $1 AND completed_at >= $2
            ORDER BY completed_at ASC
            ",
        )
        .bind(user_id.to_string())
        .bind(since.timestamp_millis())
        .fetch_all(&self.pool)
        .await
        .map_err(store_error(STORE))?;

        rows.iter()
            .map(|row| {
                let id: String = row.try_get("id").map_err(store_error(STORE))?;
                let completed_at: i64 = row.try_get("completed_at").map_err(store_error(STORE))?;
                let exercises: String = row.try_get("exercises").map_err(store_error(STORE))?;
                Ok(CompletedSession {
                    id: Uuid::parse_str(&id)
                        .map_err(|e| SafetyError::store(STORE, format!("invalid session id: {e}")))?,
                    completed_at: DateTime::from_timestamp_millis(completed_at).ok_or_else(|| {
                        SafetyError::store(STORE, format!("invalid timestamp {completed_at}"))
                    })?,
                    exercises: serde_json::from_str::<Vec<SessionExercise>>(&exercises)
                        .map_err(|e| SafetyError::store(STORE, format!("corrupt session: {e}")))?,
                })
            })
            .collect()
    }

    async fn record_session(
        &self,
        user_id: Uuid,
        session: &CompletedSession,
    ) -> Result<(), SafetyError> {
        let exercises = serde_json::to_string(&session.exercises)
            .map_err(|e| SafetyError::store(STORE, e.to_string()))?;
        sqlx::query(
            "INSERT OR REPLACE INTO workout_sessions (id, user_id, completed_at, exercises) VALUES ($1, $2, $3, $4)",
        )
        .bind(session.id.to_string())
        .bind(user_id.to_string())
        .bind(session.completed_at.timestamp_millis())
        .bind(exercises)
        .execute(&self.pool)
        .await
        .map_err(store_error(STORE))?;
        Ok(())
    }
}
