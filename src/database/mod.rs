// ABOUTME: SQLite persistence for the exercise library, profiles, history, and audit log
// ABOUTME: Owns the connection pool and bootstraps the schema on startup
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Spotter Fitness Safety

//! # Database
//!
//! One `SQLite` pool implements every store trait. List-valued columns are
//! stored as JSON text; timestamps are stored as Unix milliseconds so range
//! queries compare integers.

mod audit;
mod exercises;
mod profiles;
mod sessions;

use std::str::FromStr;

use spotter_core::errors::{AppError, SafetyError};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use tracing::info;

/// Database manager backing every store
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Connect and run schema migrations
    ///
    /// In-memory URLs get a single connection so every query sees the same database.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid, the database cannot be opened, or
    /// a migration fails
    pub async fn new(database_url: &str) -> Result<Self, AppError> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| AppError::config(format!("Invalid database URL '{database_url}': {e}")))?
            .create_if_missing(true);
        let max_connections = if database_url.contains(":memory:") { 1 } else { 5 };

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await
            .map_err(|e| AppError::store("database", e.to_string()))?;

        let db = Self { pool };
        db.migrate().await?;
        info!(url = database_url, "Database ready");
        Ok(db)
    }

    /// Get a reference to the pool
    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Create every table and index if missing
    ///
    /// # Errors
    ///
    /// Returns an error if a DDL statement fails
    pub async fn migrate(&self) -> Result<(), AppError> {
        self.migrate_exercises().await.map_err(AppError::from)?;
        self.migrate_profiles().await.map_err(AppError::from)?;
        self.migrate_sessions().await.map_err(AppError::from)?;
        self.migrate_audit().await.map_err(AppError::from)?;
        Ok(())
    }

    /// Cheap liveness query used by the readiness probe
    ///
    /// # Errors
    ///
    /// Returns an error if the database does not answer
    pub async fn ping(&self) -> Result<(), SafetyError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(store_error("database"))?;
        Ok(())
    }
}

/// Map a sqlx failure to a store error for the named store
fn store_error(store: &'static str) -> impl Fn(sqlx::Error) -> SafetyError {
    move |e| SafetyError::store(store, e.to_string())
}

fn to_json_list(store: &'static str, values: &[String]) -> Result<String, SafetyError> {
    serde_json::to_string(values).map_err(|e| SafetyError::store(store, e.to_string()))
}

fn from_json_list(store: &'static str, raw: &str) -> Result<Vec<String>, SafetyError> {
    serde_json::from_str(raw).map_err(|e| SafetyError::store(store, format!("corrupt list column: {e}")))
}
