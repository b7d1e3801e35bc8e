// ABOUTME: Workout request constraints, user preferences, and experience levels
// ABOUTME: Caller-supplied inputs to the generation pipeline before normalization
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Spotter Fitness Safety

use serde::{Deserialize, Serialize};
use std::fmt;

/// Training experience used to select intensity and volume caps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ExperienceLevel {
    /// New to structured training
    #[default]
    Beginner,
    /// Trains regularly with good technique
    Intermediate,
    /// Years of consistent loaded training
    Advanced,
}

impl ExperienceLevel {
    /// All levels in ascending order
    pub const ALL: [Self; 3] = [Self::Beginner, Self::Intermediate, Self::Advanced];

    /// Convert to wire/database string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
        }
    }

    /// Parse from string representation
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "beginner" => Some(Self::Beginner),
            "intermediate" => Some(Self::Intermediate),
            "advanced" => Some(Self::Advanced),
            _ => None,
        }
    }
}

impl fmt::Display for ExperienceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Constraints a caller places on a generated workout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkoutConstraints {
    /// Target session length in minutes
    pub duration_minutes: u32,
    /// Requested difficulty on a 1-5 scale
    pub difficulty_level: u8,
    /// Equipment the user has access to
    #[serde(default)]
    pub equipment_available: Vec<String>,
    /// Muscle groups the session should emphasize
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub muscle_groups_focus: Option<Vec<String>>,
    /// Free-text limitations (passed to the generator as context)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limitations: Option<Vec<String>>,
    /// Free-text training goals
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goals: Option<Vec<String>>,
}

/// Optional per-request preferences that refine the stored profile
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkoutPreferences {
    /// Experience level override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experience_level: Option<ExperienceLevel>,
    /// Injuries to consider in addition to the stored profile
    #[serde(default)]
    pub injury_history: Vec<String>,
    /// Exercise names the user does not want in the plan
    #[serde(default)]
    pub avoid_exercises: Vec<String>,
    /// Areas the user wants to emphasize
    #[serde(default)]
    pub focus_areas: Vec<String>,
}
