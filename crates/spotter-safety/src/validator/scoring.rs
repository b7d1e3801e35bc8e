// ABOUTME: Safety score, risk level, and report assembly from collected violations
// ABOUTME: Recommendations are derived here but never influence score or safety
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Spotter Fitness Safety

use spotter_core::constants::scoring;
use spotter_core::models::{
    RiskLevel, SafetyModification, SafetyReport, SafetyViolation, Severity, UserSafetyContext,
};

const SUPERVISION_RECOMMENDATION: &str =
    "Consider performing this workout under the supervision of a qualified trainer";
const CRITICAL_RECOMMENDATION: &str = "Do not perform this workout without modification";
const WARM_UP_RECOMMENDATION: &str = "Warm up thoroughly before loading injured areas";
const STOP_ON_PAIN_RECOMMENDATION: &str = "Stop immediately if any exercise causes pain";

/// Aggregate score: 100 minus severity penalties, floored at 0
#[must_use]
pub fn safety_score(violations: &[SafetyViolation]) -> u8 {
    let penalty: u32 = violations
        .iter()
        .map(|v| match v.severity {
            Severity::Critical => scoring::CRITICAL_PENALTY,
            Severity::Error => scoring::ERROR_PENALTY,
            Severity::Warning => scoring::WARNING_PENALTY,
        })
        .sum();
    u32::from(scoring::MAX_SCORE).saturating_sub(penalty) as u8
}

/// Risk bucket from violation counts and score; any critical forces `VeryHigh`
#[must_use]
pub fn risk_level(violations: &[SafetyViolation], score: u8) -> RiskLevel {
    let critical = violations.iter().filter(|v| v.severity == Severity::Critical).count();
    let errors = violations.iter().filter(|v| v.severity == Severity::Error).count();

    if critical > 0 || score < scoring::VERY_HIGH_RISK_BELOW {
        RiskLevel::VeryHigh
    } else if errors > 1 || score < scoring::HIGH_RISK_BELOW {
        RiskLevel::High
    } else if errors >= 1 || score < scoring::MEDIUM_RISK_BELOW {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

/// Violations, modifications and contraindications gathered during one validation
#[derive(Debug, Default)]
pub(crate) struct Findings {
    pub violations: Vec<SafetyViolation>,
    pub modifications: Vec<SafetyModification>,
    pub contraindications: Vec<String>,
    pub notes: Vec<String>,
}

impl Findings {
    pub fn push(&mut self, violation: SafetyViolation) {
        self.violations.push(violation);
    }

    pub fn modify(&mut self, modification: SafetyModification) {
        self.modifications.push(modification);
    }

    pub fn contraindication(&mut self, note: &str) {
        if !self.contraindications.iter().any(|c| c == note) {
            self.contraindications.push(note.to_owned());
        }
    }

    pub fn note(&mut self, note: &str) {
        if !self.notes.iter().any(|n| n == note) {
            self.notes.push(note.to_owned());
        }
    }

    pub fn into_report(self, context: &UserSafetyContext) -> SafetyReport {
        let score = safety_score(&self.violations);
        let risk = risk_level(&self.violations, score);
        let is_safe = !self.violations.iter().any(|v| v.severity.is_blocking());

        let mut recommendations: Vec<String> = Vec::new();
        let mut recommend = |text: &str| {
            if !recommendations.iter().any(|r| r == text) {
                recommendations.push(text.to_owned());
            }
        };
        if score < scoring::SUPERVISION_RECOMMENDED_BELOW {
            recommend(SUPERVISION_RECOMMENDATION);
        }
        if self.violations.iter().any(|v| v.severity == Severity::Critical) {
            recommend(CRITICAL_RECOMMENDATION);
        }
        if context.has_injuries() {
            recommend(WARM_UP_RECOMMENDATION);
            recommend(STOP_ON_PAIN_RECOMMENDATION);
        }
        for note in &self.notes {
            recommend(note);
        }
        for violation in &self.violations {
            recommend(&violation.recommendation);
        }

        SafetyReport {
            is_safe,
            risk_level: risk,
            safety_score: score,
            violations: self.violations,
            recommendations,
            modifications: self.modifications,
            contraindications: self.contraindications,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spotter_core::models::ViolationType;

    fn violation(severity: Severity) -> SafetyViolation {
        SafetyViolation::new(ViolationType::Volume, severity, "test", "test")
    }

    #[test]
    fn test_one_critical_drops_exactly_thirty() {
        let mut violations = vec![violation(Severity::Warning)];
        let before = safety_score(&violations);
        violations.push(violation(Severity::Critical));
        assert_eq!(before - safety_score(&violations), 30);
    }

    #[test]
    fn test_score_floors_at_zero_and_never_increases() {
        let mut violations = Vec::new();
        let mut previous = safety_score(&violations);
        assert_eq!(previous, 100);
        for severity in [Severity::Warning, Severity::Error, Severity::Critical]
            .into_iter()
            .cycle()
            .take(12)
        {
            violations.push(violation(severity));
            let score = safety_score(&violations);
            assert!(score <= previous);
            previous = score;
        }
        assert_eq!(previous, 0);
    }

    #[test]
    fn test_any_critical_is_very_high() {
        let violations = vec![violation(Severity::Critical)];
        assert_eq!(safety_score(&violations), 70);
        assert_eq!(risk_level(&violations, 70), RiskLevel::VeryHigh);
    }

    #[test]
    fn test_risk_buckets() {
        assert_eq!(risk_level(&[], 100), RiskLevel::Low);
        assert_eq!(risk_level(&[violation(Severity::Warning)], 95), RiskLevel::Low);
        assert_eq!(risk_level(&[violation(Severity::Error)], 85), RiskLevel::Medium);
        let two_errors = vec![violation(Severity::Error), violation(Severity::Error)];
        assert_eq!(risk_level(&two_errors, 70), RiskLevel::High);
        let warnings: Vec<_> = (0..5).map(|_| violation(Severity::Warning)).collect();
        assert_eq!(risk_level(&warnings, 75), RiskLevel::Medium);
    }

    #[test]
    fn test_report_recommendations_do_not_change_safety() {
        let context = UserSafetyContext {
            injury_history: vec!["knee".to_owned()],
            ..UserSafetyContext::default()
        };
        let findings = Findings {
            violations: vec![violation(Severity::Warning)],
            ..Findings::default()
        };
        let report = findings.into_report(&context);
        assert!(report.is_safe);
        assert_eq!(report.safety_score, 95);
        assert!(report.recommendations.iter().any(|r| r == STOP_ON_PAIN_RECOMMENDATION));
    }
}
