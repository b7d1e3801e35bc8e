// ABOUTME: Integration tests for the SQLite store implementations
// ABOUTME: Library import, profile upsert, windowed history, and audit ordering
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Spotter Fitness Safety
#![allow(clippy::unwrap_used)]

mod common;

use std::sync::Arc;

use anyhow::Result;
use chrono::{Duration, Utc};
use common::{bodyweight_constraints, init_test_logging, injured_context, library_path, session_at};
use spotter_core::models::{
    AuditEvent, AuditRecord, ExperienceLevel, GeneratedBy, GenerationRequest, RiskLevel,
    UserSafetyContext,
};
use spotter_safety::SafetyEnvelope;
use spotter_server::database::Database;
use spotter_server::generation::WorkoutGenerator;
use spotter_server::stores::{
    load_library_file, AuditLogStore, ExerciseLibraryStore, Stores, UserProfileStore,
    WorkoutHistoryStore,
};
use uuid::Uuid;

async fn create_test_database() -> Result<Database> {
    init_test_logging();
    Ok(Database::new("sqlite::memory:").await?)
}

async fn seeded_database() -> Result<Database> {
    let database = create_test_database().await?;
    let exercises = load_library_file(&library_path())?;
    database.import_exercises(&exercises).await?;
    Ok(database)
}

#[tokio::test]
async fn test_import_and_snapshot_round_trip() -> Result<()> {
    let database = create_test_database().await?;
    let exercises = load_library_file(&library_path())?;

    let imported = database.import_exercises(&exercises).await?;
    let snapshot = database.snapshot().await?;

    assert_eq!(imported, exercises.len());
    assert_eq!(snapshot.len(), exercises.len());
    let push_up = snapshot.get("push-up").unwrap();
    assert_eq!(push_up.contraindications, vec!["wrist"]);
    assert!(push_up.is_compound);
    Ok(())
}

#[tokio::test]
async fn test_import_replaces_existing_rows() -> Result<()> {
    let database = seeded_database().await?;
    let mut plank = database.get("plank").await?.unwrap();
    plank.safety_rating = 3;

    database.import_exercises(&[plank]).await?;

    assert_eq!(database.get("plank").await?.unwrap().safety_rating, 3);
    assert!(database.get("no-such-exercise").await?.is_none());
    Ok(())
}

#[tokio::test]
async fn test_query_eligible_filters_by_rating_and_difficulty() -> Result<()> {
    let database = seeded_database().await?;

    let eligible = database.query_eligible(5, 1).await?;

    assert!(!eligible.is_empty());
    assert!(eligible
        .iter()
        .all(|e| e.safety_rating >= 5 && e.difficulty_level <= 1));
    let ids: Vec<&str> = eligible.iter().map(|e| e.id.as_str()).collect();
    let mut sorted = ids.clone();
    sorted.sort_unstable();
    assert_eq!(ids, sorted);
    Ok(())
}

#[tokio::test]
async fn test_profile_upsert_and_default() -> Result<()> {
    let database = create_test_database().await?;
    let user_id = Uuid::new_v4();

    assert_eq!(database.safety_context(user_id).await?, UserSafetyContext::default());

    let mut context = injured_context(&["knee"]);
    context.experience_level = Some(ExperienceLevel::Intermediate);
    context.age = Some(52);
    database.upsert_safety_context(user_id, &context).await?;
    assert_eq!(database.safety_context(user_id).await?, context);

    context.injury_history.push("shoulder".to_owned());
    database.upsert_safety_context(user_id, &context).await?;
    assert_eq!(
        database.safety_context(user_id).await?.injury_history,
        vec!["knee", "shoulder"]
    );
    Ok(())
}

#[tokio::test]
async fn test_sessions_since_is_windowed_and_oldest_first() -> Result<()> {
    let database = create_test_database().await?;
    let user_id = Uuid::new_v4();
    let now = Utc::now();
    let old = session_at(now - Duration::days(45), 3, 10, 5);
    let newer = session_at(now - Duration::days(2), 3, 10, 6);
    let older = session_at(now - Duration::days(9), 3, 10, 5);
    for session in [&old, &newer, &older] {
        database.record_session(user_id, session).await?;
    }
    database
        .record_session(Uuid::new_v4(), &session_at(now, 3, 10, 5))
        .await?;

    let sessions = database.sessions_since(user_id, now - Duration::days(30)).await?;

    let ids: Vec<Uuid> = sessions.iter().map(|s| s.id).collect();
    assert_eq!(ids, vec![older.id, newer.id]);
    assert_eq!(sessions[1].exercises, newer.exercises);
    Ok(())
}

#[tokio::test]
async fn test_audit_recent_is_newest_first() -> Result<()> {
    let database = create_test_database().await?;
    let base = Utc::now();
    for offset in 0..3 {
        let record = AuditRecord {
            id: Uuid::new_v4(),
            user_id: Some(Uuid::new_v4()),
            event: AuditEvent::Generation,
            generated_by: Some(GeneratedBy::Template),
            is_safe: true,
            risk_level: RiskLevel::Low,
            safety_score: 100,
            violation_count: 0,
            fallback_reason: Some(format!("reason {offset}")),
            created_at: base + Duration::seconds(offset),
        };
        database.append(&record).await?;
    }

    let recent = database.recent(2).await?;

    assert_eq!(recent.len(), 2);
    assert_eq!(recent[0].fallback_reason.as_deref(), Some("reason 2"));
    assert_eq!(recent[1].fallback_reason.as_deref(), Some("reason 1"));
    assert_eq!(recent[0].event, AuditEvent::Generation);
    Ok(())
}

#[tokio::test]
async fn test_generation_over_sqlite_stores() -> Result<()> {
    let database = seeded_database().await?;
    let generator = WorkoutGenerator::new(
        Arc::new(SafetyEnvelope::default()),
        Stores::from_backend(Arc::new(database.clone())),
        None,
        std::time::Duration::from_secs(1),
    );
    let request = GenerationRequest {
        user_id: Uuid::new_v4(),
        constraints: bodyweight_constraints(2),
        preferences: None,
    };

    let plan = generator.generate(&request).await?;

    assert_eq!(plan.generated_by, GeneratedBy::Template);
    let audit = database.recent(5).await?;
    assert_eq!(audit.len(), 1);
    assert_eq!(audit[0].user_id, Some(request.user_id));
    Ok(())
}

#[tokio::test]
async fn test_ping() -> Result<()> {
    let database = create_test_database().await?;
    database.ping().await?;
    Ok(())
}
