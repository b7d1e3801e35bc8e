// ABOUTME: Safety audit log table and the AuditLogStore implementation
// ABOUTME: Append-only; rows are never updated or deleted by the server
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Spotter Fitness Safety

use async_trait::async_trait;
use chrono::DateTime;
use spotter_core::errors::SafetyError;
use spotter_core::models::{AuditEvent, AuditRecord, GeneratedBy, RiskLevel};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use uuid::Uuid;

use super::{store_error, Database};
use crate::stores::AuditLogStore;

const STORE: &str = "audit";

impl Database {
    pub(super) async fn migrate_audit(&self) -> Result<(), SafetyError> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS safety_audit_log (
                id TEXT PRIMARY KEY,
                user_id TEXT,
                event TEXT NOT NULL CHECK (event IN ('generation', 'validation')),
                generated_by TEXT CHECK (generated_by IN ('llm', 'template')),
                is_safe INTEGER NOT NULL,
                risk_level TEXT NOT NULL,
                safety_score INTEGER NOT NULL,
                violation_count INTEGER NOT NULL,
                fallback_reason TEXT,
                created_at INTEGER NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await
        .map_err(store_error(STORE))?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_safety_audit_created ON safety_audit_log(created_at)")
            .execute(&self.pool)
            .await
            .map_err(store_error(STORE))?;
        Ok(())
    }
}

fn corrupt(column: &str, value: &str) -> SafetyError {
    SafetyError::store(STORE, format!("invalid {column} '{value}'"))
}

fn row_to_record(row: &SqliteRow) -> Result<AuditRecord, SafetyError> {
    let id: String = row.try_get("id").map_err(store_error(STORE))?;
    let user_id: Option<String> = row.try_get("user_id").map_err(store_error(STORE))?;
    let event: String = row.try_get("event").map_err(store_error(STORE))?;
    let generated_by: Option<String> = row.try_get("generated_by").map_err(store_error(STORE))?;
    let risk_level: String = row.try_get("risk_level").map_err(store_error(STORE))?;
    let safety_score: i64 = row.try_get("safety_score").map_err(store_error(STORE))?;
    let violation_count: i64 = row.try_get("violation_count").map_err(store_error(STORE))?;
    let created_at: i64 = row.try_get("created_at").map_err(store_error(STORE))?;

    Ok(AuditRecord {
        id: Uuid::parse_str(&id).map_err(|_| corrupt("id", &id))?,
        user_id: user_id
            .map(|u| Uuid::parse_str(&u).map_err(|_| corrupt("user_id", &u)))
            .transpose()?,
        event: AuditEvent::parse(&event).ok_or_else(|| corrupt("event", &event))?,
        generated_by: generated_by
            .map(|g| GeneratedBy::parse(&g).ok_or_else(|| corrupt("generated_by", &g)))
            .transpose()?,
        is_safe: row.try_get("is_safe").map_err(store_error(STORE))?,
        risk_level: RiskLevel::parse(&risk_level).ok_or_else(|| corrupt("risk_level", &risk_level))?,
        safety_score: u8::try_from(safety_score).map_err(|_| corrupt("safety_score", &safety_score.to_string()))?,
        violation_count: usize::try_from(violation_count)
            .map_err(|_| corrupt("violation_count", &violation_count.to_string()))?,
        fallback_reason: row.try_get("fallback_reason").map_err(store_error(STORE))?,
        created_at: DateTime::from_timestamp_millis(created_at)
            .ok_or_else(|| corrupt("created_at", &created_at.to_string()))?,
    })
}

#[async_trait]
impl AuditLogStore for Database {
    async fn append(&self, record: &AuditRecord) -> Result<(), SafetyError> {
        sqlx::query(
            r"
            INSERT INTO safety_audit_log (
                id, user_id, event, generated_by, is_safe, risk_level,
                safety_score, violation_count, fallback_reason, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ",
        )
        .bind(record.id.to_string())
        .bind(record.user_id.map(|u| u.to_string()))
        .bind(record.event.as_str())
        .bind(record.generated_by.map(|g| g.as_str()))
        .bind(record.is_safe)
        .bind(record.risk_level.as_str())
        .bind(i64::from(record.safety_score))
        .bind(i64::try_from(record.violation_count).unwrap_or(i64::MAX))
        .bind(&record.fallback_reason)
        .bind(record.created_at.timestamp_millis())
        .execute(&self.pool)
        .await
        .map_err(store_error(STORE))?;
        Ok(())
    }

    async fn recent(&self, limit: usize) -> Result<Vec<AuditRecord>, SafetyError> {
        let rows = sqlx::query(
            r"
            SELECT id, user_id, event, generated_by, is_safe, risk_level,
                   safety_score, violation_count, fallback_reason, created_at
            FROM safety_audit_log ORDER BY created_at DESC, rowid DESC LIMIT $1
            ",
        )
        .bind(i64::try_from(limit).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await
        .map_err(store_error(STORE))?;
        rows.iter().map(row_to_record).collect()
    }
}
