// ABOUTME: Keyed rule tables for blacklisted, injury-restricted, and high-risk exercises
// ABOUTME: Static production defaults with optional JSON file replacement for audits
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Spotter Fitness Safety

//! Safety Rule Tables
//!
//! Four independent lookup tables consulted by the normalizer, the library
//! filter, the validator and the fallback generator. None of them carry scoring
//! logic; they only answer "does this name or condition match".
//!
//! Injury and condition matching is a plain case-insensitive substring check on
//! free text. It over-matches (`"knee"` hits `"no knee pain"`) and under-matches
//! (`"lower back"` misses `"lower_back"`).

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use spotter_core::models::normalize_label;

use super::ConfigError;

/// Exercises to avoid for one injury
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InjuryRestriction {
    /// Exercise names (case-insensitive) that must not appear in a plan
    pub avoid_exercises: Vec<String>,
    /// Coaching notes surfaced as recommendations
    #[serde(default)]
    pub notes: Vec<String>,
}

/// Ceiling for a technically demanding movement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighRiskExercise {
    /// Highest allowed RPE regardless of experience
    pub max_rpe: u8,
    /// Injury regions that rule the movement out entirely
    #[serde(default)]
    pub contraindications: Vec<String>,
}

/// All rule tables
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafetyRules {
    /// Exercise names never allowed in generated plans
    pub exercise_blacklist: BTreeSet<String>,
    /// Restrictions keyed by injury region
    pub injury_restrictions: BTreeMap<String, InjuryRestriction>,
    /// Informational contraindications keyed by medical condition
    pub medical_contraindications: BTreeMap<String, Vec<String>>,
    /// High-risk movements keyed by a lower-case name fragment
    pub high_risk_exercises: BTreeMap<String, HighRiskExercise>,
}

/// Whether free text mentions a rule term, in either direction
#[must_use]
pub fn text_matches(text: &str, term: &str) -> bool {
    let text = normalize_label(text);
    let term = normalize_label(term);
    if text.is_empty() || term.is_empty() {
        return false;
    }
    text.contains(&term) || term.contains(&text)
}

impl SafetyRules {
    /// Load rule tables from a JSON file, replacing the defaults wholesale
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::RulesFile` if the file cannot be read or parsed
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let display = path.display().to_string();
        let raw = fs::read_to_string(path).map_err(|e| ConfigError::RulesFile {
            path: display.clone(),
            message: e.to_string(),
        })?;
        let rules: Self = serde_json::from_str(&raw).map_err(|e| ConfigError::RulesFile {
            path: display,
            message: e.to_string(),
        })?;
        Ok(rules.normalized())
    }

    /// Lower-case every key and name so lookups can compare normalized labels
    #[must_use]
    pub fn normalized(self) -> Self {
        Self {
            exercise_blacklist: self
                .exercise_blacklist
                .iter()
                .map(|n| normalize_label(n))
                .collect(),
            injury_restrictions: self
                .injury_restrictions
                .into_iter()
                .map(|(k, mut r)| {
                    r.avoid_exercises = r.avoid_exercises.iter().map(|n| normalize_label(n)).collect();
                    (normalize_label(&k), r)
                })
                .collect(),
            medical_contraindications: self
                .medical_contraindications
                .into_iter()
                .map(|(k, v)| (normalize_label(&k), v))
                .collect(),
            high_risk_exercises: self
                .high_risk_exercises
                .into_iter()
                .map(|(k, v)| (normalize_label(&k), v))
                .collect(),
        }
    }

    /// Whether an exercise name is blacklisted
    #[must_use]
    pub fn is_blacklisted(&self, name: &str) -> bool {
        self.exercise_blacklist.contains(&normalize_label(name))
    }

    /// Restrictions whose key appears inside the injury text
    pub fn restrictions_for<'a>(
        &'a self,
        injury: &'a str,
    ) -> impl Iterator<Item = (&'a str, &'a InjuryRestriction)> + 'a {
        let injury = normalize_label(injury);
        self.injury_restrictions
            .iter()
            .filter(move |(key, _)| !key.is_empty() && injury.contains(key.as_str()))
            .map(|(key, restriction)| (key.as_str(), restriction))
    }

    /// Whether any of the injuries restricts the named exercise
    #[must_use]
    pub fn is_restricted_for(&self, name: &str, injuries: &[String]) -> bool {
        let name = normalize_label(name);
        injuries.iter().any(|injury| {
            self.restrictions_for(injury)
                .any(|(_, r)| r.avoid_exercises.iter().any(|a| normalize_label(a) == name))
        })
    }

    /// Contraindication notes for a medical condition (substring match on the key)
    pub fn contraindications_for<'a>(&'a self, condition: &'a str) -> impl Iterator<Item = &'a String> + 'a {
        let condition = normalize_label(condition);
        self.medical_contraindications
            .iter()
            .filter(move |(key, _)| !key.is_empty() && condition.contains(key.as_str()))
            .flat_map(|(_, notes)| notes.iter())
    }

    /// High-risk entry whose key appears inside the exercise name
    #[must_use]
    pub fn high_risk_for(&self, name: &str) -> Option<(&str, &HighRiskExercise)> {
        let name = normalize_label(name);
        self.high_risk_exercises
            .iter()
            .find(|(key, _)| !key.is_empty() && name.contains(key.as_str()))
            .map(|(key, entry)| (key.as_str(), entry))
    }
}

fn restriction(avoid: &[&str], notes: &[&str]) -> InjuryRestriction {
    InjuryRestriction {
        avoid_exercises: avoid.iter().map(|n| normalize_label(n)).collect(),
        notes: notes.iter().map(|&n| n.to_owned()).collect(),
    }
}

fn high_risk(max_rpe: u8, contraindications: &[&str]) -> HighRiskExercise {
    HighRiskExercise {
        max_rpe,
        contraindications: contraindications.iter().map(|&c| c.to_owned()).collect(),
    }
}

impl Default for SafetyRules {
    fn default() -> Self {
        let exercise_blacklist = [
            "behind the neck press",
            "behind the neck pulldown",
            "upright row",
            "kipping handstand push-up",
        ]
        .into_iter()
        .map(str::to_owned)
        .collect();

        let injury_restrictions = BTreeMap::from([
            (
                "lower_back".to_owned(),
                restriction(
                    &["Deadlift", "Barbell Back Squat", "Good Morning", "Bent Over Row", "Sit-Up", "Russian Twist"],
                    &["Keep a neutral spine and prefer supported variations"],
                ),
            ),
            (
                "knee".to_owned(),
                restriction(
                    &["Box Jump", "Jump Squat", "Pistol Squat", "Jumping Lunge", "Barbell Back Squat"],
                    &["Limit knee flexion under load and avoid impact"],
                ),
            ),
            (
                "shoulder".to_owned(),
                restriction(
                    &["Overhead Press", "Bench Press", "Dips", "Handstand Push-Up", "Kipping Pull-Up"],
                    &["Keep pressing below shoulder height"],
                ),
            ),
            (
                "neck".to_owned(),
                restriction(&["Headstand", "Shrug", "Behind The Neck Press"], &["Avoid loading the cervical spine"]),
            ),
            (
                "wrist".to_owned(),
                restriction(&["Handstand Push-Up", "Front Squat", "Clean and Jerk"], &["Use neutral grips"]),
            ),
            (
                "ankle".to_owned(),
                restriction(&["Box Jump", "Jump Rope", "Burpee"], &["Avoid landing drills"]),
            ),
        ]);

        let medical_contraindications = BTreeMap::from([
            (
                "hypertension".to_owned(),
                vec![
                    "Avoid breath holding during heavy lifts".to_owned(),
                    "Avoid sustained overhead isometric holds".to_owned(),
                ],
            ),
            (
                "diabetes".to_owned(),
                vec!["Check blood glucose before and after training".to_owned()],
            ),
            (
                "asthma".to_owned(),
                vec!["Keep a rescue inhaler nearby during cardio intervals".to_owned()],
            ),
            (
                "pregnancy".to_owned(),
                vec![
                    "Avoid supine exercises after the first trimester".to_owned(),
                    "Avoid contact and fall-risk movements".to_owned(),
                ],
            ),
            (
                "osteoporosis".to_owned(),
                vec!["Avoid loaded spinal flexion and twisting".to_owned()],
            ),
            (
                "heart".to_owned(),
                vec!["Obtain medical clearance before high-intensity work".to_owned()],
            ),
        ]);

        let high_risk_exercises = BTreeMap::from([
            ("deadlift".to_owned(), high_risk(8, &["lower_back", "hernia"])),
            ("back squat".to_owned(), high_risk(8, &["knee", "lower_back"])),
            ("overhead press".to_owned(), high_risk(8, &["shoulder", "neck"])),
            ("box jump".to_owned(), high_risk(7, &["knee", "ankle"])),
            ("clean and jerk".to_owned(), high_risk(7, &["shoulder", "lower_back", "wrist"])),
            ("snatch".to_owned(), high_risk(7, &["shoulder", "wrist", "lower_back"])),
            ("kipping".to_owned(), high_risk(6, &["shoulder"])),
        ]);

        Self {
            exercise_blacklist,
            injury_restrictions,
            medical_contraindications,
            high_risk_exercises,
        }
    }
}
