// ABOUTME: Curated exercise library entries and the per-request library snapshot
// ABOUTME: Exercise categories drive required rest periods in the safety envelope
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Spotter Fitness Safety

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::normalize_label;

/// Training category of a library exercise
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ExerciseCategory {
    /// Resistance training
    #[default]
    Strength,
    /// Conditioning and steady-state work
    Cardio,
    /// Mobility and stretching
    Flexibility,
    /// Trunk stability
    Core,
    /// Jumping and explosive work
    Plyometric,
}

impl ExerciseCategory {
    /// Convert to wire/database string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Strength => "strength",
            Self::Cardio => "cardio",
            Self::Flexibility => "flexibility",
            Self::Core => "core",
            Self::Plyometric => "plyometric",
        }
    }

    /// Parse from database string representation
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "cardio" => Self::Cardio,
            "flexibility" | "mobility" => Self::Flexibility,
            "core" => Self::Core,
            "plyometric" | "plyometrics" => Self::Plyometric,
            // Default to Strength for unrecognized values
            _ => Self::Strength,
        }
    }
}

impl fmt::Display for ExerciseCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A pre-approved, safety-rated movement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibraryExercise {
    /// Stable identifier
    pub id: String,
    /// Display name (also the key used by blacklists and restriction tables)
    pub name: String,
    /// Training category
    pub category: ExerciseCategory,
    /// Movement pattern (squat, hinge, push, pull, carry, ...)
    pub movement_pattern: String,
    /// Muscle groups trained
    #[serde(default)]
    pub muscle_groups: Vec<String>,
    /// Equipment the exercise can be performed with
    #[serde(default)]
    pub equipment: Vec<String>,
    /// Curated safety rating, 1 (risky) to 5 (very safe)
    pub safety_rating: u8,
    /// Technical difficulty, 1 to 5
    pub difficulty_level: u8,
    /// Conditions or injuries for which the exercise should be avoided
    #[serde(default)]
    pub contraindications: Vec<String>,
    /// Multi-joint movement
    #[serde(default)]
    pub is_compound: bool,
}

impl LibraryExercise {
    /// Whether the exercise can be performed with the given equipment item
    #[must_use]
    pub fn uses_equipment(&self, item: &str) -> bool {
        let item = normalize_label(item);
        self.equipment.iter().any(|e| normalize_label(e) == item)
    }
}

/// Read-only point-in-time snapshot of the exercise library keyed by id
#[derive(Debug, Clone, Default)]
pub struct ExerciseLibrary {
    exercises: BTreeMap<String, LibraryExercise>,
}

impl ExerciseLibrary {
    /// Build a snapshot from a list of exercises (later duplicates win)
    #[must_use]
    pub fn new(exercises: impl IntoIterator<Item = LibraryExercise>) -> Self {
        Self {
            exercises: exercises.into_iter().map(|e| (e.id.clone(), e)).collect(),
        }
    }

    /// Keyed existence lookup
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&LibraryExercise> {
        self.exercises.get(id)
    }

    /// Case-insensitive lookup by display name
    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Option<&LibraryExercise> {
        let wanted = normalize_label(name);
        self.exercises
            .values()
            .find(|e| normalize_label(&e.name) == wanted)
    }

    /// Iterate exercises in id order
    pub fn iter(&self) -> impl Iterator<Item = &LibraryExercise> {
        self.exercises.values()
    }

    /// Number of exercises in the snapshot
    #[must_use]
    pub fn len(&self) -> usize {
        self.exercises.len()
    }

    /// Whether the snapshot is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.exercises.is_empty()
    }
}

impl FromIterator<LibraryExercise> for ExerciseLibrary {
    fn from_iter<T: IntoIterator<Item = LibraryExercise>>(iter: T) -> Self {
        Self::new(iter)
    }
}
