// ABOUTME: Safety validator entry points for workout, exercise, and progression modes
// ABOUTME: Pure functions over a library snapshot, the envelope, and user context
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Spotter Fitness Safety

//! # Safety Validator
//!
//! Every plan the server returns passes through [`SafetyValidator::validate_workout`].
//! The same validator answers direct validation requests in all three modes.
//!
//! Scoring is `100 - 30 * critical - 15 * error - 5 * warning`, floored at zero.
//! A report is safe exactly when it has no `error` or `critical` violation.
//! Recommendations are advisory and never change the score.

mod exercise;
mod progression;
mod scoring;
mod workout;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use spotter_core::models::{
    CompletedSession, ExerciseLibrary, ExerciseSuggestion, RiskLevel, SafetyReport,
    UserSafetyContext, WorkoutPlan,
};
use tracing::debug;

pub use scoring::{risk_level, safety_score};

use crate::config::SafetyEnvelope;
use exercise::Prescription;
use scoring::Findings;

/// Validates plans, single exercises, and training progression
#[derive(Debug, Clone)]
pub struct SafetyValidator {
    envelope: Arc<SafetyEnvelope>,
}

impl SafetyValidator {
    /// Create a validator over the shared envelope
    #[must_use]
    pub const fn new(envelope: Arc<SafetyEnvelope>) -> Self {
        Self { envelope }
    }

    /// Envelope this validator enforces
    #[must_use]
    pub fn envelope(&self) -> &SafetyEnvelope {
        &self.envelope
    }

    /// Validate a whole plan
    ///
    /// Exercises missing from the library are reported as critical and skipped;
    /// validation of the remaining exercises continues.
    #[must_use]
    pub fn validate_workout(
        &self,
        plan: &WorkoutPlan,
        context: &UserSafetyContext,
        library: &ExerciseLibrary,
    ) -> SafetyReport {
        let mut findings = Findings::default();
        workout::check_workout(&self.envelope, plan, context, library, &mut findings);
        let report = findings.into_report(context);
        debug!(
            plan_id = %plan.id,
            is_safe = report.is_safe,
            score = report.safety_score,
            violations = report.violations.len(),
            "Validated workout"
        );
        report
    }

    /// Validate one exercise suggestion
    ///
    /// An id that is not in the library is terminal: the report is unsafe with
    /// `very_high` risk and a score of zero.
    #[must_use]
    pub fn validate_exercise(
        &self,
        suggestion: &ExerciseSuggestion,
        context: &UserSafetyContext,
        library: &ExerciseLibrary,
    ) -> SafetyReport {
        let Some(exercise) = library.get(&suggestion.exercise_id) else {
            let violation = exercise::unknown_exercise(&suggestion.exercise_id);
            return SafetyReport {
                is_safe: false,
                risk_level: RiskLevel::VeryHigh,
                safety_score: 0,
                recommendations: vec![violation.recommendation.clone()],
                violations: vec![violation],
                modifications: Vec::new(),
                contraindications: Vec::new(),
            };
        };

        let mut findings = Findings::default();
        exercise::check_exercise(
            &self.envelope,
            exercise,
            Prescription::from(suggestion),
            context,
            &mut findings,
        );
        findings.into_report(context)
    }

    /// Validate recent training progression as of `now`
    #[must_use]
    pub fn validate_progression(
        &self,
        sessions: &[CompletedSession],
        context: &UserSafetyContext,
        now: DateTime<Utc>,
    ) -> SafetyReport {
        let mut findings = Findings::default();
        progression::check_progression(sessions, now, &mut findings);
        findings.into_report(context)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use spotter_core::models::{
        ExerciseCategory, ExperienceLevel, GeneratedBy, LibraryExercise, ModificationType,
        PlannedExercise, SessionExercise, Severity, ViolationType,
    };
    use uuid::Uuid;

    fn library_exercise(id: &str, name: &str, category: ExerciseCategory) -> LibraryExercise {
        LibraryExercise {
            id: id.to_owned(),
            name: name.to_owned(),
            category,
            movement_pattern: "hinge".to_owned(),
            muscle_groups: vec!["legs".to_owned()],
            equipment: vec!["bodyweight".to_owned()],
            safety_rating: 5,
            difficulty_level: 2,
            contraindications: Vec::new(),
            is_compound: true,
        }
    }

    fn library() -> ExerciseLibrary {
        let mut deadlift = library_exercise("deadlift", "Deadlift", ExerciseCategory::Strength);
        deadlift.equipment = vec!["barbell".to_owned()];
        deadlift.difficulty_level = 3;
        ExerciseLibrary::new([
            library_exercise("glute-bridge", "Glute Bridge", ExerciseCategory::Strength),
            library_exercise("plank", "Plank", ExerciseCategory::Core),
            library_exercise("sit-up", "Sit-Up", ExerciseCategory::Core),
            deadlift,
        ])
    }

    fn planned(id: &str, name: &str, sets: u32, reps: u32) -> PlannedExercise {
        PlannedExercise {
            id: id.to_owned(),
            name: name.to_owned(),
            sets,
            reps,
            duration_seconds: None,
            rest_seconds: 90,
            intensity: 5,
            equipment: vec!["bodyweight".to_owned()],
        }
    }

    fn plan(exercises: Vec<PlannedExercise>) -> WorkoutPlan {
        WorkoutPlan {
            id: Uuid::new_v4(),
            title: "Test".to_owned(),
            duration_minutes: 45,
            difficulty_level: 3,
            exercises,
            equipment_needed: vec!["bodyweight".to_owned()],
            generated_by: GeneratedBy::Llm,
        }
    }

    fn validator() -> SafetyValidator {
        SafetyValidator::new(Arc::new(SafetyEnvelope::default()))
    }

    #[test]
    fn test_unknown_exercise_is_terminal() {
        let suggestion = ExerciseSuggestion {
            exercise_id: "made-up".to_owned(),
            sets: Some(3),
            reps: Some(10),
            intensity: None,
            rest_seconds: None,
        };
        let report = validator().validate_exercise(&suggestion, &UserSafetyContext::default(), &library());
        assert!(!report.is_safe);
        assert_eq!(report.risk_level, RiskLevel::VeryHigh);
        assert_eq!(report.safety_score, 0);
        assert_eq!(report.violations.len(), 1);
        assert!(report.has_violation(ViolationType::Exercise, Severity::Critical));
    }

    #[test]
    fn test_clean_plan_is_safe() {
        let report = validator().validate_workout(
            &plan(vec![planned("glute-bridge", "Glute Bridge", 3, 12)]),
            &UserSafetyContext::default(),
            &library(),
        );
        assert!(report.is_safe);
        assert_eq!(report.safety_score, 100);
        assert_eq!(report.risk_level, RiskLevel::Low);
    }

    #[test]
    fn test_lower_back_avoid_list_is_critical() {
        let context = UserSafetyContext {
            injury_history: vec!["lower_back".to_owned()],
            experience_level: Some(ExperienceLevel::Advanced),
            ..UserSafetyContext::default()
        };
        // Sit-Up carries no contraindications of its own, so only the restriction table can flag it
        let report = validator().validate_workout(
            &plan(vec![planned("sit-up", "Sit-Up", 3, 12)]),
            &context,
            &library(),
        );
        assert!(!report.is_safe);
        assert!(report.has_violation(ViolationType::Medical, Severity::Critical));
        assert_eq!(report.risk_level, RiskLevel::VeryHigh);
        assert_eq!(report.safety_score, 70);
    }

    #[test]
    fn test_avoid_list_uses_library_name_not_plan_name() {
        let context = UserSafetyContext {
            injury_history: vec!["lower_back".to_owned()],
            ..UserSafetyContext::default()
        };
        let report = validator().validate_workout(
            &plan(vec![planned("sit-up", "Crunch", 3, 12)]),
            &context,
            &library(),
        );
        assert!(!report.is_safe);
        assert!(report
            .violations
            .iter()
            .any(|v| v.violation_type == ViolationType::Medical
                && v.severity == Severity::Critical
                && v.affected_exercise.as_deref() == Some("sit-up")));
    }

    #[test]
    fn test_unknown_exercise_in_plan_continues() {
        let report = validator().validate_workout(
            &plan(vec![
                planned("unknown", "Mystery Move", 3, 10),
                planned("glute-bridge", "Glute Bridge", 8, 12),
            ]),
            &UserSafetyContext::default(),
            &library(),
        );
        assert!(!report.is_safe);
        assert!(report.has_violation(ViolationType::Exercise, Severity::Critical));
        assert!(report
            .modifications
            .iter()
            .any(|m| m.exercise_id == "glute-bridge" && m.modification_type == ModificationType::ReduceSets));
    }

    #[test]
    fn test_session_volume_limit_by_experience() {
        let exercises = (0..4).map(|_| planned("glute-bridge", "Glute Bridge", 6, 10)).collect();
        let report = validator().validate_workout(&plan(exercises), &UserSafetyContext::default(), &library());
        assert!(report.has_violation(ViolationType::Volume, Severity::Error));
        assert!(!report.is_safe);
    }

    #[test]
    fn test_high_risk_intensity_capped_by_experience() {
        let suggestion = ExerciseSuggestion {
            exercise_id: "deadlift".to_owned(),
            sets: Some(3),
            reps: Some(5),
            intensity: Some(7),
            rest_seconds: Some(120),
        };
        let beginner = UserSafetyContext::default();
        let report = validator().validate_exercise(&suggestion, &beginner, &library());
        assert!(report.has_violation(ViolationType::Intensity, Severity::Error));
        assert!(report
            .modifications
            .iter()
            .any(|m| m.modification_type == ModificationType::ReduceWeight && m.suggested_value == 6));

        let advanced = UserSafetyContext {
            experience_level: Some(ExperienceLevel::Advanced),
            ..UserSafetyContext::default()
        };
        let report = validator().validate_exercise(&suggestion, &advanced, &library());
        assert!(report.is_safe);
    }

    #[test]
    fn test_contraindications_deduplicated_per_injury() {
        let mut lib = library();
        let mut deadlift = lib.get("deadlift").cloned().unwrap();
        deadlift.contraindications = vec!["lower_back".to_owned()];
        lib = ExerciseLibrary::new(lib.iter().cloned().chain([deadlift]));

        let context = UserSafetyContext {
            injury_history: vec!["lower_back".to_owned()],
            ..UserSafetyContext::default()
        };
        let suggestion = ExerciseSuggestion {
            exercise_id: "deadlift".to_owned(),
            sets: None,
            reps: None,
            intensity: None,
            rest_seconds: None,
        };
        let report = validator().validate_exercise(&suggestion, &context, &lib);
        assert_eq!(report.count(Severity::Critical), 1);
    }

    #[test]
    fn test_short_rest_warns() {
        let mut short_rest = planned("plank", "Plank", 3, 1);
        short_rest.rest_seconds = 20;
        let report = validator().validate_workout(&plan(vec![short_rest]), &UserSafetyContext::default(), &library());
        assert!(report.is_safe);
        assert!(report
            .modifications
            .iter()
            .any(|m| m.modification_type == ModificationType::AddRest && m.suggested_value == 45));
    }

    #[test]
    fn test_medical_conditions_add_contraindications_only() {
        let context = UserSafetyContext {
            medical_conditions: vec!["Hypertension".to_owned()],
            ..UserSafetyContext::default()
        };
        let report = validator().validate_workout(
            &plan(vec![planned("glute-bridge", "Glute Bridge", 3, 12)]),
            &context,
            &library(),
        );
        assert!(report.is_safe);
        assert!(!report.contraindications.is_empty());
        assert!(report.violations.is_empty());
    }

    fn session(at: DateTime<Utc>, sets: u32, reps: u32, intensity: u8) -> CompletedSession {
        CompletedSession {
            id: Uuid::new_v4(),
            completed_at: at,
            exercises: vec![SessionExercise {
                exercise_id: "glute-bridge".to_owned(),
                name: "Glute Bridge".to_owned(),
                sets,
                reps,
                intensity,
            }],
        }
    }

    #[test]
    fn test_weekly_volume_jump_is_error() {
        // Monday 2025-03-10 and Monday 2025-03-17 fall in consecutive Sunday-start weeks
        let previous_week = Utc.with_ymd_and_hms(2025, 3, 10, 9, 0, 0).unwrap();
        let latest_week = Utc.with_ymd_and_hms(2025, 3, 17, 9, 0, 0).unwrap();
        let now = latest_week + Duration::days(1);
        let sessions = vec![
            session(previous_week, 10, 100, 5),
            session(latest_week, 12, 100, 5),
        ];

        let report = validator().validate_progression(&sessions, &UserSafetyContext::default(), now);
        assert!(!report.is_safe);
        assert!(report.has_violation(ViolationType::Progression, Severity::Error));
        assert!(report.violations[0].description.contains("20%"));
    }

    #[test]
    fn test_small_volume_increase_and_old_sessions_ignored() {
        let now = Utc.with_ymd_and_hms(2025, 3, 19, 9, 0, 0).unwrap();
        let sessions = vec![
            session(now - Duration::days(60), 1, 1, 5),
            session(now - Duration::days(9), 10, 100, 5),
            session(now - Duration::days(2), 10, 105, 5),
        ];
        let report = validator().validate_progression(&sessions, &UserSafetyContext::default(), now);
        assert!(report.is_safe);
        assert!(report.violations.is_empty());
    }

    #[test]
    fn test_rising_intensity_warns() {
        // Saturday; all four sessions land in the same week so volume is not compared
        let now = Utc.with_ymd_and_hms(2025, 3, 22, 9, 0, 0).unwrap();
        let sessions: Vec<CompletedSession> = (0..4u8)
            .map(|i| session(now - Duration::days(4 - i64::from(i)), 3, 10, 4 + i))
            .collect();
        let report = validator().validate_progression(&sessions, &UserSafetyContext::default(), now);
        assert!(report.is_safe);
        assert!(report.has_violation(ViolationType::Progression, Severity::Warning));
    }

    #[test]
    fn test_three_rising_sessions_do_not_warn() {
        let now = Utc.with_ymd_and_hms(2025, 3, 22, 9, 0, 0).unwrap();
        let sessions: Vec<CompletedSession> = (0..3u8)
            .map(|i| session(now - Duration::days(3 - i64::from(i)), 3, 10, 4 + i))
            .collect();
        let report = validator().validate_progression(&sessions, &UserSafetyContext::default(), now);
        assert!(report.violations.is_empty());
    }
}
