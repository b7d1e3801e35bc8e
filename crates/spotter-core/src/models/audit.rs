// ABOUTME: Append-only audit records for generation and validation outcomes
// ABOUTME: Written best-effort; a failed write never affects the response
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Spotter Fitness Safety

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{GeneratedBy, RiskLevel, SafetyReport};

/// What produced an audit record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditEvent {
    /// A plan was generated and returned
    Generation,
    /// A direct validation request was answered
    Validation,
}

impl AuditEvent {
    /// Convert to wire/database string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Generation => "generation",
            Self::Validation => "validation",
        }
    }

    /// Parse from database string representation
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "generation" => Some(Self::Generation),
            "validation" => Some(Self::Validation),
            _ => None,
        }
    }
}

/// One audit log entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditRecord {
    /// Record identifier
    pub id: Uuid,
    /// User the request was made for, if known
    pub user_id: Option<Uuid>,
    /// Event kind
    pub event: AuditEvent,
    /// Generator of the returned plan (generation events only)
    pub generated_by: Option<GeneratedBy>,
    /// Outcome of the final validation
    pub is_safe: bool,
    /// Risk level of the final validation
    pub risk_level: RiskLevel,
    /// Score of the final validation
    pub safety_score: u8,
    /// Number of violations in the final validation
    pub violation_count: usize,
    /// Why the generated candidate was discarded, when it was
    pub fallback_reason: Option<String>,
    /// When the record was created
    pub created_at: DateTime<Utc>,
}

impl AuditRecord {
    /// Build a record from a final report
    #[must_use]
    pub fn from_report(user_id: Option<Uuid>, event: AuditEvent, report: &SafetyReport) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            event,
            generated_by: None,
            is_safe: report.is_safe,
            risk_level: report.risk_level,
            safety_score: report.safety_score,
            violation_count: report.violations.len(),
            fallback_reason: None,
            created_at: Utc::now(),
        }
    }

    /// Record which generator produced the returned plan
    #[must_use]
    pub const fn with_generator(mut self, generated_by: GeneratedBy) -> Self {
        self.generated_by = Some(generated_by);
        self
    }

    /// Record why the candidate was replaced by the fallback
    #[must_use]
    pub fn with_fallback_reason(mut self, reason: Option<String>) -> Self {
        self.fallback_reason = reason;
        self
    }
}
