// ABOUTME: Per-exercise safety checks shared by exercise mode and workout mode
// ABOUTME: Rating, contraindication, difficulty, volume, high-risk intensity, and rest rules
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Spotter Fitness Safety

use std::collections::BTreeSet;

use serde_json::{json, Value};
use spotter_core::constants::validation;
use spotter_core::models::{
    ExerciseSuggestion, LibraryExercise, ModificationType, PlannedExercise, SafetyModification,
    SafetyViolation, Severity, UserSafetyContext, ViolationType,
};

use super::scoring::Findings;
use crate::config::{text_matches, SafetyEnvelope};

/// Prescribed load for one exercise; suggestions may leave fields unset
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Prescription {
    pub sets: Option<u32>,
    pub reps: Option<u32>,
    pub intensity: Option<u8>,
    pub rest_seconds: Option<u32>,
}

impl From<&PlannedExercise> for Prescription {
    fn from(planned: &PlannedExercise) -> Self {
        Self {
            sets: Some(planned.sets),
            reps: Some(planned.reps),
            intensity: Some(planned.intensity),
            rest_seconds: Some(planned.rest_seconds),
        }
    }
}

impl From<&ExerciseSuggestion> for Prescription {
    fn from(suggestion: &ExerciseSuggestion) -> Self {
        Self {
            sets: suggestion.sets,
            reps: suggestion.reps,
            intensity: suggestion.intensity,
            rest_seconds: suggestion.rest_seconds,
        }
    }
}

fn modification(
    exercise_id: &str,
    modification_type: ModificationType,
    original_value: Value,
    suggested_value: Value,
    reason: impl Into<String>,
) -> SafetyModification {
    SafetyModification {
        exercise_id: exercise_id.to_owned(),
        modification_type,
        original_value,
        suggested_value,
        reason: reason.into(),
    }
}

/// Violation for an exercise id that is not in the approved library
pub(crate) fn unknown_exercise(exercise_id: &str) -> SafetyViolation {
    SafetyViolation::new(
        ViolationType::Exercise,
        Severity::Critical,
        format!("Exercise '{exercise_id}' is not in the approved exercise library"),
        "Choose an exercise from the approved library",
    )
    .for_exercise(exercise_id)
}

/// Run every per-exercise rule against one library exercise
pub(crate) fn check_exercise(
    envelope: &SafetyEnvelope,
    exercise: &LibraryExercise,
    prescription: Prescription,
    context: &UserSafetyContext,
    findings: &mut Findings,
) {
    let id = exercise.id.as_str();
    let experience = context.experience();
    let high_risk = envelope.rules.high_risk_for(&exercise.name);

    if exercise.safety_rating < validation::MIN_SAFETY_RATING {
        findings.push(
            SafetyViolation::new(
                ViolationType::Exercise,
                Severity::Error,
                format!(
                    "{} has safety rating {} (minimum {})",
                    exercise.name,
                    exercise.safety_rating,
                    validation::MIN_SAFETY_RATING
                ),
                "Replace with a higher-rated exercise",
            )
            .for_exercise(id),
        );
        findings.modify(modification(
            id,
            ModificationType::Replace,
            json!(id),
            Value::Null,
            "Safety rating below the approved minimum",
        ));
    }

    // One critical per injury, whether it came from the library entry or the high-risk table
    let mut contraindicated: BTreeSet<&str> = BTreeSet::new();
    let high_risk_contraindications = high_risk
        .map(|(_, entry)| entry.contraindications.as_slice())
        .unwrap_or_default();
    for contraindication in exercise.contraindications.iter().chain(high_risk_contraindications) {
        for injury in &context.injury_history {
            if text_matches(injury, contraindication) {
                contraindicated.insert(injury.as_str());
            }
        }
    }
    for injury in contraindicated {
        findings.push(
            SafetyViolation::new(
                ViolationType::Medical,
                Severity::Critical,
                format!("{} is contraindicated for injury '{injury}'", exercise.name),
                "Replace with an exercise that does not load the injured area",
            )
            .for_exercise(id),
        );
        findings.modify(modification(
            id,
            ModificationType::Replace,
            json!(id),
            Value::Null,
            format!("Contraindicated for {injury}"),
        ));
    }

    let difficulty_cap = envelope.difficulty_cap(experience);
    if exercise.difficulty_level > difficulty_cap {
        findings.push(
            SafetyViolation::new(
                ViolationType::Exercise,
                Severity::Warning,
                format!(
                    "{} difficulty {} is above the {difficulty_cap} cap for {experience} users",
                    exercise.name, exercise.difficulty_level
                ),
                "Choose an easier progression of this movement",
            )
            .for_exercise(id),
        );
    }

    if let Some(sets) = prescription.sets.filter(|&s| s > validation::WARN_SETS_ABOVE) {
        let suggested = validation::SUGGESTED_MAX_SETS.min(sets);
        findings.push(
            SafetyViolation::new(
                ViolationType::Volume,
                Severity::Warning,
                format!("{} prescribes {sets} sets", exercise.name),
                format!("Limit to {suggested} sets"),
            )
            .for_exercise(id),
        );
        findings.modify(modification(
            id,
            ModificationType::ReduceSets,
            json!(sets),
            json!(suggested),
            "Too many sets for one exercise",
        ));
    }

    if let Some(reps) = prescription.reps.filter(|&r| r > validation::WARN_REPS_ABOVE) {
        findings.push(
            SafetyViolation::new(
                ViolationType::Volume,
                Severity::Warning,
                format!("{} prescribes {reps} reps per set", exercise.name),
                format!("Limit to {} reps per set", validation::WARN_REPS_ABOVE),
            )
            .for_exercise(id),
        );
        findings.modify(modification(
            id,
            ModificationType::ReduceReps,
            json!(reps),
            json!(validation::WARN_REPS_ABOVE),
            "Too many reps per set",
        ));
    }

    if let (Some((key, entry)), Some(intensity)) = (high_risk, prescription.intensity) {
        let cap = entry.max_rpe.min(envelope.rpe_cap(experience));
        if intensity > cap {
            findings.push(
                SafetyViolation::new(
                    ViolationType::Intensity,
                    Severity::Error,
                    format!(
                        "{} at intensity {intensity} exceeds the {cap} cap for {key} movements",
                        exercise.name
                    ),
                    format!("Keep {key} movements at or below RPE {cap}"),
                )
                .for_exercise(id),
            );
            findings.modify(modification(
                id,
                ModificationType::ReduceWeight,
                json!(intensity),
                json!(cap),
                "Intensity above the high-risk movement cap",
            ));
        }
    }

    if let Some(rest) = prescription.rest_seconds {
        let required = envelope.rest_for(exercise.category);
        if rest < required {
            findings.push(
                SafetyViolation::new(
                    ViolationType::Volume,
                    Severity::Warning,
                    format!(
                        "{} rests {rest}s between sets; {} work needs {required}s",
                        exercise.name, exercise.category
                    ),
                    format!("Rest at least {required}s between sets"),
                )
                .for_exercise(id),
            );
            findings.modify(modification(
                id,
                ModificationType::AddRest,
                json!(rest),
                json!(required),
                "Rest shorter than the category requirement",
            ));
        }
    }
}
