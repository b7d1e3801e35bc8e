// ABOUTME: Constraint normalizer validating requests against the safety envelope
// ABOUTME: Rejects out-of-range, disallowed-equipment, and high injury-risk requests
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Spotter Fitness Safety

//! Constraint Normalization
//!
//! First stage of the generation pipeline. Nothing downstream runs unless the
//! request passes these checks, so disallowed equipment is rejected before any
//! library read or generator call.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use spotter_core::constants::{equipment, injury};
use spotter_core::errors::SafetyError;
use spotter_core::models::{normalize_label, ExperienceLevel, WorkoutConstraints, WorkoutPreferences};
use tracing::debug;

use crate::config::SafetyEnvelope;

/// Injury risk assessed for a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InjuryRisk {
    /// No sensitive region involved
    Low,
    /// A sensitive region is involved; proceed with restrictions
    Medium,
    /// Request rejected
    High,
}

/// Validated request constraints with labels normalized
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedConstraints {
    /// Session length
    pub duration_minutes: u32,
    /// Requested difficulty 1-5
    pub difficulty_level: u8,
    /// Available equipment, defaulting to bodyweight
    pub equipment_available: Vec<String>,
    /// Muscle groups to target, if any
    pub muscle_groups_focus: Option<Vec<String>>,
    /// Free-text limitations
    pub limitations: Vec<String>,
    /// Free-text goals
    pub goals: Vec<String>,
    /// Requested experience level, if given
    pub experience_level: Option<ExperienceLevel>,
    /// Injuries from the request preferences
    pub injury_history: Vec<String>,
    /// Exercise names the user asked to avoid
    pub avoid_exercises: Vec<String>,
    /// Assessed injury risk
    pub injury_risk: InjuryRisk,
}

fn normalize_all(values: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(values.len());
    for value in values {
        let label = normalize_label(value);
        if !label.is_empty() && !out.contains(&label) {
            out.push(label);
        }
    }
    out
}

/// Assess injury risk from the injury list and the requested constraints
///
/// Medium when any injury mentions a sensitive region. High when difficulty is 4
/// or more with any injury, or heavy-load equipment is requested with more than
/// one injury.
#[must_use]
pub fn assess_injury_risk(
    injuries: &[String],
    difficulty_level: u8,
    equipment_available: &[String],
) -> InjuryRisk {
    if injuries.is_empty() {
        return InjuryRisk::Low;
    }

    let mut risk = InjuryRisk::Low;
    let sensitive = injuries.iter().any(|i| {
        let i = normalize_label(i);
        injury::SENSITIVE_REGIONS.iter().any(|region| i.contains(region))
    });
    if sensitive {
        risk = InjuryRisk::Medium;
    }

    let heavy_load = equipment_available
        .iter()
        .any(|e| equipment::HEAVY_LOAD.contains(&normalize_label(e).as_str()));

    if difficulty_level >= injury::HIGH_RISK_DIFFICULTY
        || (heavy_load && injuries.len() > injury::HEAVY_LOAD_INJURY_COUNT)
    {
        risk = InjuryRisk::High;
    }
    risk
}

/// Validates and normalizes workout constraints
#[derive(Debug, Clone)]
pub struct ConstraintNormalizer {
    envelope: Arc<SafetyEnvelope>,
}

impl ConstraintNormalizer {
    /// Create a normalizer over the shared envelope
    #[must_use]
    pub const fn new(envelope: Arc<SafetyEnvelope>) -> Self {
        Self { envelope }
    }

    /// Validate constraints and preferences
    ///
    /// # Errors
    ///
    /// Returns `SafetyError::Validation` naming the failing field when duration or
    /// difficulty is out of range, equipment is not allowed, difficulty exceeds the
    /// experience limit, or injury risk is high
    pub fn normalize(
        &self,
        constraints: &WorkoutConstraints,
        preferences: Option<&WorkoutPreferences>,
    ) -> Result<NormalizedConstraints, SafetyError> {
        let envelope = &self.envelope;

        if !(envelope.min_duration_minutes..=envelope.max_duration_minutes)
            .contains(&constraints.duration_minutes)
        {
            return Err(SafetyError::validation(
                "duration_minutes",
                format!(
                    "{} is outside {}..={}",
                    constraints.duration_minutes,
                    envelope.min_duration_minutes,
                    envelope.max_duration_minutes
                ),
            ));
        }
        if !(1..=5).contains(&constraints.difficulty_level) {
            return Err(SafetyError::validation(
                "difficulty_level",
                format!("{} is outside 1..=5", constraints.difficulty_level),
            ));
        }

        let mut equipment_available = normalize_all(&constraints.equipment_available);
        let offending: Vec<String> = equipment_available
            .iter()
            .filter(|e| !envelope.allows_equipment(e))
            .cloned()
            .collect();
        if !offending.is_empty() {
            return Err(SafetyError::validation_items(
                "equipment_available",
                format!("Equipment not allowed: {}", offending.join(", ")),
                offending,
            ));
        }
        if equipment_available.is_empty() {
            equipment_available.push(equipment::BODYWEIGHT.to_owned());
        }

        let preferences = preferences.cloned().unwrap_or_default();
        if let Some(level) = preferences.experience_level {
            let limit = envelope.intensity_limit(level);
            if constraints.difficulty_level > limit {
                return Err(SafetyError::validation(
                    "difficulty_level",
                    format!(
                        "difficulty {} exceeds the {limit} limit for {level} users",
                        constraints.difficulty_level
                    ),
                ));
            }
        }

        let injury_history = normalize_all(&preferences.injury_history);
        let injury_risk =
            assess_injury_risk(&injury_history, constraints.difficulty_level, &equipment_available);
        if injury_risk == InjuryRisk::High {
            return Err(SafetyError::validation_items(
                "injury_history",
                "Injury risk is too high for the requested difficulty or equipment",
                injury_history,
            ));
        }

        debug!(
            duration = constraints.duration_minutes,
            difficulty = constraints.difficulty_level,
            risk = ?injury_risk,
            "Constraints normalized"
        );

        Ok(NormalizedConstraints {
            duration_minutes: constraints.duration_minutes,
            difficulty_level: constraints.difficulty_level,
            equipment_available,
            muscle_groups_focus: constraints
                .muscle_groups_focus
                .as_deref()
                .map(normalize_all)
                .filter(|groups| !groups.is_empty()),
            limitations: constraints.limitations.as_deref().map(normalize_all).unwrap_or_default(),
            goals: constraints.goals.as_deref().map(normalize_all).unwrap_or_default(),
            experience_level: preferences.experience_level,
            injury_history,
            avoid_exercises: normalize_all(&preferences.avoid_exercises),
            injury_risk,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;

    fn constraints(equipment: &[&str]) -> WorkoutConstraints {
        WorkoutConstraints {
            duration_minutes: 45,
            difficulty_level: 3,
            equipment_available: equipment.iter().map(|&e| e.to_owned()).collect(),
            muscle_groups_focus: None,
            limitations: None,
            goals: None,
        }
    }

    fn normalizer() -> ConstraintNormalizer {
        ConstraintNormalizer::new(Arc::new(SafetyEnvelope::default()))
    }

    #[test]
    fn test_disallowed_equipment_is_named() {
        let err = normalizer()
            .normalize(&constraints(&["bodyweight", "Olympic_Rings"]), None)
            .unwrap_err();
        match err {
            SafetyError::Validation { field, offending, .. } => {
                assert_eq!(field, "equipment_available");
                assert_eq!(offending, vec!["olympic_rings"]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_empty_equipment_defaults_to_bodyweight() {
        let normalized = normalizer().normalize(&constraints(&[]), None).unwrap();
        assert_eq!(normalized.equipment_available, vec!["bodyweight"]);
        assert_eq!(normalized.injury_risk, InjuryRisk::Low);
    }

    #[test]
    fn test_difficulty_above_experience_limit_rejected() {
        let mut request = constraints(&["bodyweight"]);
        request.difficulty_level = 4;
        let preferences = WorkoutPreferences {
            experience_level: Some(ExperienceLevel::Beginner),
            ..WorkoutPreferences::default()
        };
        let err = normalizer().normalize(&request, Some(&preferences)).unwrap_err();
        assert!(matches!(err, SafetyError::Validation { ref field, .. } if field == "difficulty_level"));
    }

    #[test]
    fn test_duration_out_of_range_rejected() {
        let mut request = constraints(&["bodyweight"]);
        request.duration_minutes = 181;
        assert!(normalizer().normalize(&request, None).is_err());
        request.duration_minutes = 4;
        assert!(normalizer().normalize(&request, None).is_err());
    }

    #[test]
    fn test_injury_risk_levels() {
        let knee = vec!["left knee".to_owned()];
        assert_eq!(assess_injury_risk(&knee, 2, &["bodyweight".to_owned()]), InjuryRisk::Medium);
        assert_eq!(assess_injury_risk(&knee, 4, &["bodyweight".to_owned()]), InjuryRisk::High);

        let two = vec!["wrist".to_owned(), "elbow".to_owned()];
        assert_eq!(assess_injury_risk(&two, 2, &["dumbbells".to_owned()]), InjuryRisk::Low);
        assert_eq!(assess_injury_risk(&two, 2, &["barbell".to_owned()]), InjuryRisk::High);
        assert_eq!(assess_injury_risk(&[], 5, &["barbell".to_owned()]), InjuryRisk::Low);
    }

    #[test]
    fn test_high_injury_risk_rejected() {
        let preferences = WorkoutPreferences {
            injury_history: vec!["lower_back".to_owned(), "knee".to_owned()],
            ..WorkoutPreferences::default()
        };
        let err = normalizer()
            .normalize(&constraints(&["barbell"]), Some(&preferences))
            .unwrap_err();
        assert!(matches!(err, SafetyError::Validation { ref field, .. } if field == "injury_history"));
    }
}
