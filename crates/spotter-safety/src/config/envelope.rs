// ABOUTME: Safety envelope holding the numeric ceilings no returned plan may exceed
// ABOUTME: Loaded once from defaults plus environment overrides, validated, then shared immutably
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Spotter Fitness Safety

//! Safety Envelope
//!
//! Per-exercise ceilings, per-session volume limits, category rest periods and
//! experience caps. Components receive it as `Arc<SafetyEnvelope>`; tests build
//! their own instance to override thresholds.

use std::collections::{BTreeMap, BTreeSet};
use std::env;
use std::path::Path;

use serde::{Deserialize, Serialize};
use spotter_core::constants::{equipment, generation, validation};
use spotter_core::models::{normalize_label, ExerciseCategory, ExperienceLevel};
use tracing::info;

use super::{ConfigError, SafetyRules};

/// Hard ceiling on sets per exercise; the envelope may lower it but never raise it
pub const HARD_MAX_SETS_PER_EXERCISE: u32 = validation::WARN_SETS_ABOVE;
/// Hard ceiling on reps per set
pub const HARD_MAX_REPS_PER_SET: u32 = validation::WARN_REPS_ABOVE;

/// Session volume limits for one experience level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeLimits {
    /// Total sets across all exercises in one session
    pub max_sets_per_session: u32,
}

/// Immutable numeric safety limits
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafetyEnvelope {
    /// Shortest session that can be requested
    pub min_duration_minutes: u32,
    /// Longest session that can be requested
    pub max_duration_minutes: u32,
    /// Sets ceiling applied to every exercise after generation
    pub max_sets_per_exercise: u32,
    /// Reps ceiling applied to every exercise after generation
    pub max_reps_per_set: u32,
    /// Equipment a request may list
    pub allowed_equipment: BTreeSet<String>,
    /// Minimum rest between sets per category
    pub required_rest_periods: BTreeMap<ExerciseCategory, u32>,
    /// Highest requestable difficulty per experience level
    pub intensity_limits: BTreeMap<ExperienceLevel, u8>,
    /// Session volume per experience level
    pub volume_limits: BTreeMap<ExperienceLevel, VolumeLimits>,
    /// Highest exercise difficulty per experience level
    pub experience_difficulty_caps: BTreeMap<ExperienceLevel, u8>,
    /// Highest RPE per experience level
    pub experience_rpe_caps: BTreeMap<ExperienceLevel, u8>,
    /// Keyed rule tables
    pub rules: SafetyRules,
}

impl Default for SafetyEnvelope {
    fn default() -> Self {
        let allowed_equipment = [
            equipment::BODYWEIGHT,
            "dumbbells",
            "kettlebell",
            "resistance_bands",
            "pull_up_bar",
            "bench",
            "barbell",
            "heavy_weights",
            "cable_machine",
            "yoga_mat",
            "jump_rope",
            "medicine_ball",
            "stability_ball",
            "treadmill",
            "stationary_bike",
            "rowing_machine",
        ]
        .into_iter()
        .map(str::to_owned)
        .collect();

        Self {
            min_duration_minutes: 5,
            max_duration_minutes: 180,
            max_sets_per_exercise: HARD_MAX_SETS_PER_EXERCISE,
            max_reps_per_set: HARD_MAX_REPS_PER_SET,
            allowed_equipment,
            required_rest_periods: BTreeMap::from([
                (ExerciseCategory::Strength, 90),
                (ExerciseCategory::Cardio, 30),
                (ExerciseCategory::Flexibility, 15),
                (ExerciseCategory::Core, 45),
                (ExerciseCategory::Plyometric, 120),
            ]),
            intensity_limits: per_level(3, 4, 5),
            volume_limits: BTreeMap::from([
                (ExperienceLevel::Beginner, VolumeLimits { max_sets_per_session: 20 }),
                (ExperienceLevel::Intermediate, VolumeLimits { max_sets_per_session: 30 }),
                (ExperienceLevel::Advanced, VolumeLimits { max_sets_per_session: 40 }),
            ]),
            experience_difficulty_caps: per_level(3, 4, 5),
            experience_rpe_caps: per_level(6, 8, 9),
            rules: SafetyRules::default(),
        }
    }
}

fn per_level(beginner: u8, intermediate: u8, advanced: u8) -> BTreeMap<ExperienceLevel, u8> {
    BTreeMap::from([
        (ExperienceLevel::Beginner, beginner),
        (ExperienceLevel::Intermediate, intermediate),
        (ExperienceLevel::Advanced, advanced),
    ])
}

fn env_u32(name: &str) -> Result<Option<u32>, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| ConfigError::Parse(format!("{name}={raw}: {e}"))),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(e) => Err(ConfigError::EnvVar(e)),
    }
}

impl SafetyEnvelope {
    /// Load the envelope from defaults plus environment overrides
    ///
    /// Reads `SPOTTER_MAX_DURATION_MINUTES`, `SPOTTER_MAX_SETS_PER_EXERCISE`,
    /// `SPOTTER_MAX_REPS_PER_SET` and `SPOTTER_SAFETY_RULES_PATH`.
    ///
    /// # Errors
    ///
    /// Returns an error if an override cannot be parsed, the rules file cannot be
    /// loaded, or the resulting envelope fails validation
    pub fn load() -> Result<Self, ConfigError> {
        let mut envelope = Self::default();

        if let Some(minutes) = env_u32("SPOTTER_MAX_DURATION_MINUTES")? {
            envelope.max_duration_minutes = minutes;
        }
        if let Some(sets) = env_u32("SPOTTER_MAX_SETS_PER_EXERCISE")? {
            envelope.max_sets_per_exercise = sets;
        }
        if let Some(reps) = env_u32("SPOTTER_MAX_REPS_PER_SET")? {
            envelope.max_reps_per_set = reps;
        }
        if let Ok(path) = env::var("SPOTTER_SAFETY_RULES_PATH") {
            envelope.rules = SafetyRules::from_json_file(Path::new(&path))?;
            info!(path = %path, "Loaded safety rule tables from file");
        }

        envelope.validate()?;
        Ok(envelope)
    }

    /// Validate internal consistency of the envelope
    ///
    /// # Errors
    ///
    /// Returns an error if any limit is zero, exceeds its hard ceiling, or a
    /// per-level table is incomplete or out of order
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_duration_minutes == 0 || self.max_duration_minutes < self.min_duration_minutes {
            return Err(ConfigError::InvalidRange(
                "max_duration_minutes must be at least min_duration_minutes (> 0)",
            ));
        }
        if self.max_sets_per_exercise == 0 || self.max_sets_per_exercise > HARD_MAX_SETS_PER_EXERCISE {
            return Err(ConfigError::ValueOutOfRange("max_sets_per_exercise must be in 1..=6"));
        }
        if self.max_reps_per_set == 0 || self.max_reps_per_set > HARD_MAX_REPS_PER_SET {
            return Err(ConfigError::ValueOutOfRange("max_reps_per_set must be in 1..=30"));
        }
        if self.allowed_equipment.is_empty() {
            return Err(ConfigError::MissingField("allowed_equipment"));
        }
        if !self.required_rest_periods.contains_key(&ExerciseCategory::Strength) {
            return Err(ConfigError::MissingField("required_rest_periods.strength"));
        }

        let mut previous_volume = 0;
        for level in ExperienceLevel::ALL {
            let difficulty = self
                .experience_difficulty_caps
                .get(&level)
                .ok_or(ConfigError::MissingField("experience_difficulty_caps"))?;
            let intensity = self
                .intensity_limits
                .get(&level)
                .ok_or(ConfigError::MissingField("intensity_limits"))?;
            if !(1..=5).contains(difficulty) || !(1..=5).contains(intensity) {
                return Err(ConfigError::ValueOutOfRange("difficulty caps must be in 1..=5"));
            }
            let rpe = self
                .experience_rpe_caps
                .get(&level)
                .ok_or(ConfigError::MissingField("experience_rpe_caps"))?;
            if !(validation::MIN_INTENSITY..=validation::MAX_INTENSITY).contains(rpe) {
                return Err(ConfigError::ValueOutOfRange("experience_rpe_caps must be in 1..=10"));
            }
            let volume = self
                .volume_limits
                .get(&level)
                .ok_or(ConfigError::MissingField("volume_limits"))?
                .max_sets_per_session;
            if volume == 0 || volume < previous_volume {
                return Err(ConfigError::InvalidRange(
                    "volume_limits must be positive and non-decreasing by experience",
                ));
            }
            previous_volume = volume;
        }

        Ok(())
    }

    /// Whether a normalized equipment label is allowed
    #[must_use]
    pub fn allows_equipment(&self, item: &str) -> bool {
        self.allowed_equipment.contains(&normalize_label(item))
    }

    /// Required rest for a category, falling back to the generic default
    #[must_use]
    pub fn rest_for(&self, category: ExerciseCategory) -> u32 {
        self.required_rest_periods
            .get(&category)
            .copied()
            .unwrap_or(generation::DEFAULT_REST_SECONDS)
    }

    /// Highest requestable difficulty for an experience level
    #[must_use]
    pub fn intensity_limit(&self, level: ExperienceLevel) -> u8 {
        lookup(&self.intensity_limits, level)
    }

    /// Highest exercise difficulty for an experience level
    #[must_use]
    pub fn difficulty_cap(&self, level: ExperienceLevel) -> u8 {
        lookup(&self.experience_difficulty_caps, level)
    }

    /// Highest RPE for an experience level
    #[must_use]
    pub fn rpe_cap(&self, level: ExperienceLevel) -> u8 {
        lookup(&self.experience_rpe_caps, level)
    }

    /// Session volume limit for an experience level
    #[must_use]
    pub fn max_sets_per_session(&self, level: ExperienceLevel) -> u32 {
        self.volume_limits
            .get(&level)
            .or_else(|| self.volume_limits.get(&ExperienceLevel::Beginner))
            .map_or(0, |v| v.max_sets_per_session)
    }
}

// A validated envelope has every level; the beginner entry is the conservative fallback.
fn lookup(table: &BTreeMap<ExperienceLevel, u8>, level: ExperienceLevel) -> u8 {
    table
        .get(&level)
        .or_else(|| table.get(&ExperienceLevel::Beginner))
        .copied()
        .unwrap_or(1)
}
