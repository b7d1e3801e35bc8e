// ABOUTME: Safety report, violation, and modification types produced by the validator
// ABOUTME: Severity and risk enums with their wire representations
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Spotter Fitness Safety

use serde::{Deserialize, Serialize};
use std::fmt;

/// Rule family a violation belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationType {
    /// Sets, reps, session length, or rest
    Volume,
    /// Effort above a cap
    Intensity,
    /// Exercise selection or rating
    Exercise,
    /// Change in load over time
    Progression,
    /// Injury or medical contraindication
    Medical,
}

impl ViolationType {
    /// Convert to wire string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Volume => "volume",
            Self::Intensity => "intensity",
            Self::Exercise => "exercise",
            Self::Progression => "progression",
            Self::Medical => "medical",
        }
    }
}

/// How serious a violation is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Advisory; does not make a plan unsafe
    Warning,
    /// Makes a plan unsafe
    Error,
    /// Makes a plan unsafe and forces `very_high` risk
    Critical,
}

impl Severity {
    /// Whether this severity makes a plan unsafe
    #[must_use]
    pub const fn is_blocking(&self) -> bool {
        matches!(self, Self::Error | Self::Critical)
    }
}

/// Coarse risk bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    /// No meaningful concerns
    Low,
    /// Some concerns; proceed with care
    Medium,
    /// Significant concerns
    High,
    /// Do not perform as prescribed
    VeryHigh,
}

impl RiskLevel {
    /// Convert to wire/database string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::VeryHigh => "very_high",
        }
    }

    /// Parse from database string representation
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            "very_high" => Some(Self::VeryHigh),
            _ => None,
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single detected rule breach
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafetyViolation {
    /// Rule family
    #[serde(rename = "type")]
    pub violation_type: ViolationType,
    /// Seriousness
    pub severity: Severity,
    /// What was detected
    pub description: String,
    /// Exercise id the violation refers to, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub affected_exercise: Option<String>,
    /// Remediation advice
    pub recommendation: String,
}

impl SafetyViolation {
    /// Create a violation that is not tied to one exercise
    #[must_use]
    pub fn new(
        violation_type: ViolationType,
        severity: Severity,
        description: impl Into<String>,
        recommendation: impl Into<String>,
    ) -> Self {
        Self {
            violation_type,
            severity,
            description: description.into(),
            affected_exercise: None,
            recommendation: recommendation.into(),
        }
    }

    /// Attach the affected exercise id
    #[must_use]
    pub fn for_exercise(mut self, exercise_id: impl Into<String>) -> Self {
        self.affected_exercise = Some(exercise_id.into());
        self
    }
}

/// Kind of remediation suggested for an exercise
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModificationType {
    /// Swap for a different exercise
    Replace,
    /// Fewer sets
    ReduceSets,
    /// Fewer reps per set
    ReduceReps,
    /// Lower load / effort
    ReduceWeight,
    /// Longer rest between sets
    AddRest,
}

/// A concrete suggested change to one exercise
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafetyModification {
    /// Exercise id to modify
    pub exercise_id: String,
    /// Kind of change
    pub modification_type: ModificationType,
    /// Current value
    pub original_value: serde_json::Value,
    /// Suggested value
    pub suggested_value: serde_json::Value,
    /// Why the change is suggested
    pub reason: String,
}

/// Aggregate outcome of one validation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SafetyReport {
    /// True when no violation has `error` or `critical` severity
    pub is_safe: bool,
    /// Coarse risk bucket
    pub risk_level: RiskLevel,
    /// 0-100 aggregate score
    pub safety_score: u8,
    /// All detected violations
    pub violations: Vec<SafetyViolation>,
    /// Advisory recommendations
    pub recommendations: Vec<String>,
    /// Suggested modifications
    pub modifications: Vec<SafetyModification>,
    /// Informational contraindications for the user's medical conditions
    pub contraindications: Vec<String>,
}

impl SafetyReport {
    /// Count violations with the given severity
    #[must_use]
    pub fn count(&self, severity: Severity) -> usize {
        self.violations
            .iter()
            .filter(|v| v.severity == severity)
            .count()
    }

    /// Whether any violation matches the given type and severity
    #[must_use]
    pub fn has_violation(&self, violation_type: ViolationType, severity: Severity) -> bool {
        self.violations
            .iter()
            .any(|v| v.violation_type == violation_type && v.severity == severity)
    }
}
