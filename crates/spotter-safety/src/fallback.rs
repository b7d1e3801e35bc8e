// ABOUTME: Deterministic bodyweight fallback plan used when a generated candidate is rejected
// ABOUTME: Selects only top-rated, uncontraindicated, low-difficulty movements
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Spotter Fitness Safety

//! Fallback Template Generator
//!
//! Builds a conservative plan from the library alone. The selection rules are
//! strict enough that the result always validates as safe for the same
//! context; the orchestrator still validates it before returning it.

use std::cmp::Reverse;
use std::sync::Arc;

use spotter_core::constants::fallback;
use spotter_core::errors::SafetyError;
use spotter_core::models::{
    normalize_label, ExerciseCategory, ExerciseLibrary, GeneratedBy, LibraryExercise,
    PlannedExercise, UserSafetyContext, WorkoutPlan,
};
use tracing::info;
use uuid::Uuid;

use crate::config::{text_matches, SafetyEnvelope};
use crate::normalizer::NormalizedConstraints;

/// Builds template plans without external calls
#[derive(Debug, Clone)]
pub struct FallbackGenerator {
    envelope: Arc<SafetyEnvelope>,
}

impl FallbackGenerator {
    /// Create a fallback generator over the shared envelope
    #[must_use]
    pub const fn new(envelope: Arc<SafetyEnvelope>) -> Self {
        Self { envelope }
    }

    fn is_candidate(
        &self,
        exercise: &LibraryExercise,
        constraints: &NormalizedConstraints,
        context: &UserSafetyContext,
    ) -> bool {
        let rules = &self.envelope.rules;
        let injuries = &context.injury_history;

        exercise.uses_equipment(fallback::REQUIRED_EQUIPMENT)
            && exercise.safety_rating >= fallback::MIN_SAFETY_RATING
            && exercise.difficulty_level <= self.envelope.difficulty_cap(context.experience())
            && !rules.is_blacklisted(&exercise.name)
            && rules.high_risk_for(&exercise.name).is_none()
            && !rules.is_restricted_for(&exercise.name, injuries)
            && !constraints
                .avoid_exercises
                .contains(&normalize_label(&exercise.name))
            && !exercise
                .contraindications
                .iter()
                .any(|c| injuries.iter().any(|injury| text_matches(injury, c)))
    }

    /// Build a fallback plan
    ///
    /// # Errors
    ///
    /// Returns `SafetyError::NoEligibleExercises` when no library exercise
    /// satisfies the fallback rules
    pub fn generate(
        &self,
        constraints: &NormalizedConstraints,
        context: &UserSafetyContext,
        library: &ExerciseLibrary,
    ) -> Result<WorkoutPlan, SafetyError> {
        let mut candidates: Vec<&LibraryExercise> = library
            .iter()
            .filter(|e| self.is_candidate(e, constraints, context))
            .collect();

        if candidates.is_empty() {
            return Err(SafetyError::no_eligible(
                "no top-rated bodyweight exercise is safe for this user",
            ));
        }

        let focus = constraints.muscle_groups_focus.as_deref().unwrap_or_default();
        candidates.sort_by_key(|e| {
            let off_focus = !focus.is_empty()
                && !e.muscle_groups.iter().any(|g| focus.contains(&normalize_label(g)));
            (off_focus, Reverse(e.safety_rating), e.difficulty_level, e.id.clone())
        });

        let sets = fallback::SETS.min(self.envelope.max_sets_per_exercise);
        let reps = fallback::REPS.min(self.envelope.max_reps_per_set);
        let session_limit = self.envelope.max_sets_per_session(context.experience());
        let count = fallback::MAX_EXERCISES.min((session_limit / sets.max(1)) as usize).max(1);
        let rest_seconds = self.envelope.rest_for(ExerciseCategory::Strength);
        let intensity = constraints.difficulty_level.min(fallback::MAX_INTENSITY);

        let exercises: Vec<PlannedExercise> = candidates
            .into_iter()
            .take(count)
            .map(|e| PlannedExercise {
                id: e.id.clone(),
                name: e.name.clone(),
                sets,
                reps,
                duration_seconds: None,
                rest_seconds,
                intensity,
                equipment: vec![fallback::REQUIRED_EQUIPMENT.to_owned()],
            })
            .collect();

        info!(
            exercises = exercises.len(),
            "Built fallback bodyweight plan"
        );

        Ok(WorkoutPlan {
            id: Uuid::new_v4(),
            title: "Safe Bodyweight Session".to_owned(),
            duration_minutes: constraints.duration_minutes,
            difficulty_level: constraints.difficulty_level.min(fallback::MAX_INTENSITY),
            exercises,
            equipment_needed: vec![fallback::REQUIRED_EQUIPMENT.to_owned()],
            generated_by: GeneratedBy::Template,
        })
    }
}
