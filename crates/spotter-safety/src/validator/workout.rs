// ABOUTME: Whole-plan validation: session volume, duration, per-exercise rules, injury restrictions
// ABOUTME: Unknown exercises are recorded as critical and skipped rather than aborting
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Spotter Fitness Safety

use std::collections::BTreeSet;

use serde_json::{json, Value};
use spotter_core::constants::validation;
use spotter_core::models::{
    normalize_label, ExerciseLibrary, ModificationType, SafetyModification, SafetyViolation,
    Severity, UserSafetyContext, ViolationType, WorkoutPlan,
};

use super::exercise::{check_exercise, unknown_exercise, Prescription};
use super::scoring::Findings;
use crate::config::SafetyEnvelope;

pub(crate) fn check_workout(
    envelope: &SafetyEnvelope,
    plan: &WorkoutPlan,
    context: &UserSafetyContext,
    library: &ExerciseLibrary,
    findings: &mut Findings,
) {
    let experience = context.experience();
    let total_sets = plan.total_sets();
    let max_sets = envelope.max_sets_per_session(experience);
    if total_sets > max_sets {
        findings.push(SafetyViolation::new(
            ViolationType::Volume,
            Severity::Error,
            format!("{total_sets} total sets exceeds the {max_sets}-set limit for {experience} users"),
            format!("Reduce the session to at most {max_sets} sets"),
        ));
    }

    if plan.duration_minutes > validation::LONG_SESSION_MINUTES {
        findings.push(SafetyViolation::new(
            ViolationType::Volume,
            Severity::Warning,
            format!("{}-minute session is unusually long", plan.duration_minutes),
            "Split long sessions or add extended rest breaks",
        ));
    }

    for planned in &plan.exercises {
        match library.get(&planned.id) {
            Some(exercise) => {
                check_exercise(envelope, exercise, Prescription::from(planned), context, findings);
            }
            None => {
                findings.push(unknown_exercise(&planned.id));
                findings.modify(SafetyModification {
                    exercise_id: planned.id.clone(),
                    modification_type: ModificationType::Replace,
                    original_value: json!(planned.name),
                    suggested_value: Value::Null,
                    reason: "Exercise is not in the approved library".to_owned(),
                });
            }
        }
    }

    let mut flagged: BTreeSet<(String, String)> = BTreeSet::new();
    for injury in &context.injury_history {
        for (key, restriction) in envelope.rules.restrictions_for(injury) {
            for note in &restriction.notes {
                findings.note(note);
            }
            for planned in &plan.exercises {
                // The library entry is authoritative; unknown ids were already flagged
                let Some(exercise) = library.get(&planned.id) else {
                    continue;
                };
                let name = normalize_label(&exercise.name);
                if !restriction.avoid_exercises.iter().any(|a| normalize_label(a) == name) {
                    continue;
                }
                if !flagged.insert((planned.id.clone(), key.to_owned())) {
                    continue;
                }
                findings.push(
                    SafetyViolation::new(
                        ViolationType::Medical,
                        Severity::Critical,
                        format!("{} must be avoided with a {key} injury", exercise.name),
                        format!("Replace {} with a {key}-friendly alternative", exercise.name),
                    )
                    .for_exercise(&planned.id),
                );
                findings.modify(SafetyModification {
                    exercise_id: planned.id.clone(),
                    modification_type: ModificationType::Replace,
                    original_value: json!(exercise.name),
                    suggested_value: Value::Null,
                    reason: format!("Restricted for {key} injuries"),
                });
            }
        }
    }

    for condition in &context.medical_conditions {
        for note in envelope.rules.contraindications_for(condition) {
            findings.contraindication(note);
        }
    }
}
