// ABOUTME: User medical and injury context consumed by the safety validator
// ABOUTME: Merges stored profile data with request overrides using set union
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Spotter Fitness Safety

use serde::{Deserialize, Serialize};

use super::{normalize_label, ExperienceLevel, WorkoutPreferences};

/// Injury, limitation, and medical context for one user
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSafetyContext {
    /// Past or current injuries as free text (e.g. `lower_back`, `left knee`)
    #[serde(default)]
    pub injury_history: Vec<String>,
    /// Free-text movement limitations
    #[serde(default)]
    pub limitations: Vec<String>,
    /// Training experience; `None` is treated as beginner
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experience_level: Option<ExperienceLevel>,
    /// Diagnosed medical conditions
    #[serde(default)]
    pub medical_conditions: Vec<String>,
    /// Age in years, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
}

impl UserSafetyContext {
    /// Effective experience level (beginner when unknown)
    #[must_use]
    pub fn experience(&self) -> ExperienceLevel {
        self.experience_level.unwrap_or_default()
    }

    /// Whether any injury is recorded
    #[must_use]
    pub fn has_injuries(&self) -> bool {
        !self.injury_history.is_empty()
    }

    /// Merge a request override into this (stored) context.
    ///
    /// List fields are unioned (normalized, order preserved, stored entries
    /// first). The override's experience level and age win when present.
    #[must_use]
    pub fn merged_with(&self, other: &Self) -> Self {
        Self {
            injury_history: union(&self.injury_history, &other.injury_history),
            limitations: union(&self.limitations, &other.limitations),
            experience_level: other.experience_level.or(self.experience_level),
            medical_conditions: union(&self.medical_conditions, &other.medical_conditions),
            age: other.age.or(self.age),
        }
    }

    /// Merge generation preferences into this context with the same union rule
    #[must_use]
    pub fn merged_with_preferences(&self, preferences: &WorkoutPreferences) -> Self {
        self.merged_with(&Self {
            injury_history: preferences.injury_history.clone(),
            experience_level: preferences.experience_level,
            ..Self::default()
        })
    }
}

fn union(first: &[String], second: &[String]) -> Vec<String> {
    let mut merged: Vec<String> = Vec::with_capacity(first.len() + second.len());
    for value in first.iter().chain(second) {
        let label = normalize_label(value);
        if !label.is_empty() && !merged.contains(&label) {
            merged.push(label);
        }
    }
    merged
}
