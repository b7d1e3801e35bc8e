// ABOUTME: Exercise library table and the ExerciseLibraryStore implementation
// ABOUTME: Supports snapshot reads, keyed lookup, and bulk import from JSON fixtures
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Spotter Fitness Safety

use async_trait::async_trait;
use spotter_core::errors::SafetyError;
use spotter_core::models::{ExerciseCategory, ExerciseLibrary, LibraryExercise};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use tracing::info;

use super::{from_json_list, store_error, to_json_list, Database};
use crate::stores::ExerciseLibraryStore;

const STORE: &str = "library";

const SELECT_COLUMNS: &str = "SELECT id, name, category, movement_pattern, muscle_groups, equipment, \
     safety_rating, difficulty_level, contraindications, is_compound FROM exercises";

impl Database {
    pub(super) async fn migrate_exercises(&self) -> Result<(), SafetyError> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS exercises (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                category TEXT NOT NULL,
                movement_pattern TEXT NOT NULL,
                muscle_groups TEXT NOT NULL DEFAULT '[]',
                equipment TEXT NOT NULL DEFAULT '[]',
                safety_rating INTEGER NOT NULL CHECK (safety_rating BETWEEN 1 AND 5),
                difficulty_level INTEGER NOT NULL CHECK (difficulty_level BETWEEN 1 AND 5),
                contraindications TEXT NOT NULL DEFAULT '[]',
                is_compound INTEGER NOT NULL DEFAULT 0
            )
            ",
        )
        .execute(&self.pool)
        .await
        .map_err(store_error(STORE))?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_exercises_rating ON exercises(safety_rating, difficulty_level)")
            .execute(&self.pool)
            .await
            .map_err(store_error(STORE))?;
        Ok(())
    }

    /// Insert or replace library exercises
    ///
    /// # Errors
    ///
    /// Returns an error if any write fails; the import is transactional
    pub async fn import_exercises(&self, exercises: &[LibraryExercise]) -> Result<usize, SafetyError> {
        let mut tx = self.pool.begin().await.map_err(store_error(STORE))?;
        for exercise in exercises {
            sqlx::query(
                r"
                INSERT OR REPLACE INTO exercises (
                    id, name, category, movement_pattern, muscle_groups, equipment,
                    safety_rating, difficulty_level, contraindications, is_compound
                ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
                ",
            )
            .bind(&exercise.id)
            .bind(&exercise.name)
            .bind(exercise.category.as_str())
            .bind(&exercise.movement_pattern)
            .bind(to_json_list(STORE, &exercise.muscle_groups)?)
            .bind(to_json_list(STORE, &exercise.equipment)?)
            .bind(i64::from(exercise.safety_rating))
            .bind(i64::from(exercise.difficulty_level))
            .bind(to_json_list(STORE, &exercise.contraindications)?)
            .bind(exercise.is_compound)
            .execute(&mut *tx)
            .await
            .map_err(store_error(STORE))?;
        }
        tx.commit().await.map_err(store_error(STORE))?;
        info!(count = exercises.len(), "Imported library exercises");
        Ok(exercises.len())
    }

    async fn fetch_exercises(&self, sql: &str, binds: &[i64]) -> Result<Vec<LibraryExercise>, SafetyError> {
        let mut query = sqlx::query(sql);
        for value in binds {
            query = query.bind(*value);
        }
        let rows = query.fetch_all(&self.pool).await.map_err(store_error(STORE))?;
        rows.iter().map(row_to_exercise).collect()
    }
}

fn small_int(row: &SqliteRow, column: &str) -> Result<u8, SafetyError> {
    let value: i64 = row.try_get(column).map_err(store_error(STORE))?;
    u8::try_from(value).map_err(|_| SafetyError::store(STORE, format!("{column} out of range: {value}")))
}

fn row_to_exercise(row: &SqliteRow) -> Result<LibraryExercise, SafetyError> {
    let text = |column: &str| -> Result<String, SafetyError> {
        row.try_get::<String, _>(column).map_err(store_error(STORE))
    };
    Ok(LibraryExercise {
        id: text("id")?,
        name: text("name")?,
        category: ExerciseCategory::parse(&text("category")?),
        movement_pattern: text("movement_pattern")?,
        muscle_groups: from_json_list(STORE, &text("muscle_groups")?)?,
        equipment: from_json_list(STORE, &text("equipment")?)?,
        safety_rating: small_int(row, "safety_rating")?,
        difficulty_level: small_int(row, "difficulty_level")?,
        contraindications: from_json_list(STORE, &text("contraindications")?)?,
        is_compound: row.try_get("is_compound").map_err(store_error(STORE))?,
    })
}

#[async_trait]
impl ExerciseLibraryStore for Database {
    async fn snapshot(&self) -> Result<ExerciseLibrary, SafetyError> {
        let exercises = self.fetch_exercises(&format!("{SELECT_COLUMNS} ORDER BY id"), &[]).await?;
        Ok(ExerciseLibrary::new(exercises))
    }

    async fn get(&self, id: &str) -> Result<Option<LibraryExercise>, SafetyError> {
        let row = sqlx::query(&format!("{SELECT_COLUMNS} WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(store_error(STORE))?;
        row.as_ref().map(row_to_exercise).transpose()
    }

    async fn query_eligible(
        &self,
        min_safety_rating: u8,
        max_difficulty: u8,
    ) -> Result<Vec<LibraryExercise>, SafetyError> {
        self.fetch_exercises(
            &format!("{SELECT_COLUMNS} WHERE safety_rating >= $1 AND difficulty_level <= $2 ORDER BY id"),
            &[i64::from(min_safety_rating), i64::from(max_difficulty)],
        )
        .await
    }
}
