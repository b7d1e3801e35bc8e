// ABOUTME: User safety profile table and the UserProfileStore implementation
// ABOUTME: Injuries, limitations, and medical conditions are JSON list columns
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Spotter Fitness Safety

use async_trait::async_trait;
use chrono::Utc;
use spotter_core::errors::SafetyError;
use spotter_core::models::{ExperienceLevel, UserSafetyContext};
use sqlx::Row;
use uuid::Uuid;

use super::{from_json_list, store_error, to_json_list, Database};
use crate::stores::UserProfileStore;

const STORE: &str = "profile";

impl Database {
    pub(super) async fn migrate_profiles(&self) -> Result<(), SafetyError> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS user_safety_profiles (
                user_id TEXT PRIMARY KEY,
                injury_history TEXT NOT NULL DEFAULT '[]',
                limitations TEXT NOT NULL DEFAULT '[]',
                experience_level TEXT CHECK (experience_level IN ('beginner', 'intermediate', 'advanced')),
                medical_conditions TEXT NOT NULL DEFAULT '[]',
                age INTEGER,
                updated_at INTEGER NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await
        .map_err(store_error(STORE))?;
        Ok(())
    }
}

#[async_trait]
impl UserProfileStore for Database {
    async fn safety_context(&self, user_id: Uuid) -> Result<UserSafetyContext, SafetyError> {
        let row = sqlx::query(
            r"
            SELECT injury_history, limitations, experience_level, medical_conditions, age
            FROM user_safety_profiles WHERE user_id = $1
            ",
        )
        .bind(user_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(store_error(STORE))?;

        let Some(row) = row else {
            return Ok(UserSafetyContext::default());
        };

        let text = |column: &str| -> Result<String, SafetyError> {
            row.try_get::<String, _>(column).map_err(store_error(STORE))
        };
        let experience: Option<String> = row.try_get("experience_level").map_err(store_error(STORE))?;
        let age: Option<i64> = row.try_get("age").map_err(store_error(STORE))?;

        Ok(UserSafetyContext {
            injury_history: from_json_list(STORE, &text("injury_history")?)?,
            limitations: from_json_list(STORE, &text("limitations")?)?,
            experience_level: experience.as_deref().and_then(ExperienceLevel::parse),
            medical_conditions: from_json_list(STORE, &text("medical_conditions")?)?,
            age: age.and_then(|a| u32::try_from(a).ok()),
        })
    }

    async fn upsert_safety_context(
        &self,
        user_id: Uuid,
        context: &UserSafetyContext,
    ) -> Result<(), SafetyError> {
        sqlx::query(
            r"
            INSERT INTO user_safety_profiles (
                user_id, injury_history, limitations, experience_level, medical_conditions, age, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT(user_id) DO UPDATE SET
                injury_history = excluded.injury_history,
                limitations = excluded.limitations,
                experience_level = excluded.experience_level,
                medical_conditions = excluded.medical_conditions,
                age = excluded.age,
                updated_at = excluded.updated_at
            ",
        )
        .bind(user_id.to_string())
        .bind(to_json_list(STORE, &context.injury_history)?)
        .bind(to_json_list(STORE, &context.limitations)?)
        .bind(context.experience_level.map(|l| l.as_str()))
        .bind(to_json_list(STORE, &context.medical_conditions)?)
        .bind(context.age.map(i64::from))
        .bind(Utc::now().timestamp_millis())
        .execute(&self.pool)
        .await
        .map_err(store_error(STORE))?;
        Ok(())
    }
}
