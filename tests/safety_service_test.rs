// ABOUTME: Integration tests for direct safety validation through the service layer
// ABOUTME: Exercise, workout, and progression modes with stored profiles and history
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Spotter Fitness Safety
#![allow(clippy::unwrap_used, clippy::panic)]

mod common;

use chrono::{TimeZone, Utc};
use common::{envelope, injured_context, seeded_store, session_at};
use spotter_core::errors::SafetyError;
use spotter_core::models::{
    ExerciseSuggestion, GeneratedBy, PlannedExercise, RiskLevel, Severity, ValidationRequest,
    ValidationType, ViolationType, WorkoutPlan,
};
use spotter_server::services::SafetyService;
use spotter_server::stores::{AuditLogStore, Stores, UserProfileStore, WorkoutHistoryStore};
use uuid::Uuid;

fn request(validation_type: ValidationType) -> ValidationRequest {
    ValidationRequest {
        validation_type,
        user_id: None,
        workout_plan: None,
        exercise_suggestion: None,
        user_context: None,
    }
}

fn planned(id: &str, name: &str) -> PlannedExercise {
    PlannedExercise {
        id: id.to_owned(),
        name: name.to_owned(),
        sets: 3,
        reps: 12,
        duration_seconds: None,
        rest_seconds: 90,
        intensity: 4,
        equipment: vec!["bodyweight".to_owned()],
    }
}

fn plan(exercises: Vec<PlannedExercise>) -> WorkoutPlan {
    WorkoutPlan {
        id: Uuid::new_v4(),
        title: "Test".to_owned(),
        duration_minutes: 30,
        difficulty_level: 2,
        exercises,
        equipment_needed: vec!["bodyweight".to_owned()],
        generated_by: GeneratedBy::Llm,
    }
}

#[tokio::test]
async fn test_unknown_exercise_id_is_critical() {
    let store = seeded_store();
    let service = SafetyService::new(envelope(), Stores::from_backend(store));
    let mut req = request(ValidationType::Exercise);
    req.exercise_suggestion = Some(ExerciseSuggestion {
        exercise_id: "moon-walk".to_owned(),
        sets: Some(3),
        reps: Some(10),
        intensity: None,
        rest_seconds: None,
    });

    let report = service.validate(&req).await.unwrap();

    assert!(!report.is_safe);
    assert_eq!(report.risk_level, RiskLevel::VeryHigh);
    assert_eq!(report.safety_score, 0);
    assert_eq!(report.violations.len(), 1);
    assert!(report.has_violation(ViolationType::Exercise, Severity::Critical));
}

#[tokio::test]
async fn test_known_exercise_is_safe() {
    let store = seeded_store();
    let service = SafetyService::new(envelope(), Stores::from_backend(store));
    let mut req = request(ValidationType::Exercise);
    req.exercise_suggestion = Some(ExerciseSuggestion {
        exercise_id: "glute-bridge".to_owned(),
        sets: Some(3),
        reps: Some(12),
        intensity: Some(4),
        rest_seconds: Some(90),
    });

    let report = service.validate(&req).await.unwrap();

    assert!(report.is_safe);
    assert_eq!(report.safety_score, 100);
    assert_eq!(report.risk_level, RiskLevel::Low);
}

#[tokio::test]
async fn test_stored_injury_is_merged_into_workout_validation() {
    let store = seeded_store();
    let user_id = Uuid::new_v4();
    store
        .upsert_safety_context(user_id, &injured_context(&["lower_back"]))
        .await
        .unwrap();
    let service = SafetyService::new(envelope(), Stores::from_backend(store));
    let mut req = request(ValidationType::Workout);
    req.user_id = Some(user_id);
    req.workout_plan = Some(plan(vec![planned("plank", "Plank"), planned("sit-up", "Sit-Up")]));

    let report = service.validate(&req).await.unwrap();

    assert!(!report.is_safe);
    assert!(report.has_violation(ViolationType::Medical, Severity::Critical));
    assert_eq!(report.risk_level, RiskLevel::VeryHigh);
}

#[tokio::test]
async fn test_request_context_adds_to_empty_profile() {
    let store = seeded_store();
    let service = SafetyService::new(envelope(), Stores::from_backend(store));
    let mut req = request(ValidationType::Workout);
    req.workout_plan = Some(plan(vec![planned("reverse-lunge", "Reverse Lunge")]));
    req.user_context = Some(injured_context(&["left knee"]));

    let report = service.validate(&req).await.unwrap();

    assert!(!report.is_safe);
    assert!(report
        .violations
        .iter()
        .any(|v| v.affected_exercise.as_deref() == Some("reverse-lunge")));
}

#[tokio::test]
async fn test_weekly_volume_jump_is_progression_error() {
    let store = seeded_store();
    let user_id = Uuid::new_v4();
    // Saturday, so both sessions fall in distinct Sunday-based weeks
    let now = Utc.with_ymd_and_hms(2025, 3, 15, 12, 0, 0).unwrap();
    let last_week = Utc.with_ymd_and_hms(2025, 3, 4, 12, 0, 0).unwrap();
    let this_week = Utc.with_ymd_and_hms(2025, 3, 11, 12, 0, 0).unwrap();
    store
        .record_session(user_id, &session_at(last_week, 10, 100, 5))
        .await
        .unwrap();
    store
        .record_session(user_id, &session_at(this_week, 12, 100, 5))
        .await
        .unwrap();
    let service = SafetyService::new(envelope(), Stores::from_backend(store));
    let mut req = request(ValidationType::Progression);
    req.user_id = Some(user_id);

    let report = service.validate_at(&req, now).await.unwrap();

    assert!(!report.is_safe);
    assert!(report.has_violation(ViolationType::Progression, Severity::Error));
}

#[tokio::test]
async fn test_steady_volume_passes_progression() {
    let store = seeded_store();
    let user_id = Uuid::new_v4();
    let now = Utc.with_ymd_and_hms(2025, 3, 15, 12, 0, 0).unwrap();
    for (day, sets) in [(4, 10), (11, 10)] {
        let at = Utc.with_ymd_and_hms(2025, 3, day, 12, 0, 0).unwrap();
        store
            .record_session(user_id, &session_at(at, sets, 100, 5))
            .await
            .unwrap();
    }
    let service = SafetyService::new(envelope(), Stores::from_backend(store));
    let mut req = request(ValidationType::Progression);
    req.user_id = Some(user_id);

    let report = service.validate_at(&req, now).await.unwrap();

    assert!(report.is_safe);
    assert!(report.violations.is_empty());
}

#[tokio::test]
async fn test_missing_payload_names_the_field() {
    let store = seeded_store();
    let service = SafetyService::new(envelope(), Stores::from_backend(store.clone()));

    let cases = [
        (ValidationType::Workout, "workout_plan"),
        (ValidationType::Exercise, "exercise_suggestion"),
        (ValidationType::Progression, "user_id"),
    ];
    for (mode, expected) in cases {
        match service.validate(&request(mode)).await {
            Err(SafetyError::Validation { field, .. }) => assert_eq!(field, expected),
            other => panic!("expected validation error for {mode:?}, got {other:?}"),
        }
    }
    assert!(store.recent(10).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_validation_is_audited() {
    let store = seeded_store();
    let service = SafetyService::new(envelope(), Stores::from_backend(store.clone()));
    let mut req = request(ValidationType::Workout);
    req.workout_plan = Some(plan(vec![planned("plank", "Plank")]));

    service.validate(&req).await.unwrap();

    let records = store.recent(10).await.unwrap();
    assert_eq!(records.len(), 1);
    assert!(records[0].is_safe);
    assert!(records[0].user_id.is_none());
}
