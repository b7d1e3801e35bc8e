// ABOUTME: Exercise library filter selecting the candidates a generator may use
// ABOUTME: Applies rating, blacklist, equipment, difficulty, focus, and avoid-list rules
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Spotter Fitness Safety

use std::sync::Arc;

use spotter_core::constants::validation;
use spotter_core::errors::SafetyError;
use spotter_core::models::{normalize_label, ExerciseLibrary, LibraryExercise};
use tracing::debug;

use crate::config::SafetyEnvelope;
use crate::normalizer::NormalizedConstraints;

/// Selects eligible exercises from a library snapshot
#[derive(Debug, Clone)]
pub struct LibraryFilter {
    envelope: Arc<SafetyEnvelope>,
}

impl LibraryFilter {
    /// Create a filter over the shared envelope
    #[must_use]
    pub const fn new(envelope: Arc<SafetyEnvelope>) -> Self {
        Self { envelope }
    }

    /// Whether one exercise passes every eligibility rule
    #[must_use]
    pub fn is_eligible(&self, exercise: &LibraryExercise, constraints: &NormalizedConstraints) -> bool {
        if exercise.safety_rating < validation::MIN_SAFETY_RATING {
            return false;
        }
        if self.envelope.rules.is_blacklisted(&exercise.name) {
            return false;
        }
        if !constraints
            .equipment_available
            .iter()
            .any(|item| exercise.uses_equipment(item))
        {
            return false;
        }
        if exercise.difficulty_level > constraints.difficulty_level {
            return false;
        }
        if let Some(focus) = &constraints.muscle_groups_focus {
            let hits = exercise
                .muscle_groups
                .iter()
                .any(|group| focus.contains(&normalize_label(group)));
            if !hits {
                return false;
            }
        }
        let name = normalize_label(&exercise.name);
        !constraints.avoid_exercises.contains(&name)
    }

    /// Eligible exercises sorted by id
    ///
    /// # Errors
    ///
    /// Returns `SafetyError::NoEligibleExercises` when nothing passes
    pub fn eligible(
        &self,
        library: &ExerciseLibrary,
        constraints: &NormalizedConstraints,
    ) -> Result<Vec<LibraryExercise>, SafetyError> {
        // ExerciseLibrary iterates in id order
        let eligible: Vec<LibraryExercise> = library
            .iter()
            .filter(|exercise| self.is_eligible(exercise, constraints))
            .cloned()
            .collect();

        debug!(
            library_size = library.len(),
            eligible = eligible.len(),
            "Filtered exercise library"
        );

        if eligible.is_empty() {
            return Err(SafetyError::no_eligible(format!(
                "no rated exercise matches equipment [{}] at difficulty <= {}",
                constraints.equipment_available.join(", "),
                constraints.difficulty_level
            )));
        }
        Ok(eligible)
    }
}
