// ABOUTME: Service layer answering direct safety validation requests
// ABOUTME: Resolves user context from the profile store and audits each validation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Spotter Fitness Safety

//! # Safety Service
//!
//! Front door for `POST /api/safety/validate` and the CLI `validate` command.
//! The context used for validation is the union of the stored profile (when a
//! `user_id` is given) and the request's `user_context`.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use spotter_core::constants::progression;
use spotter_core::errors::SafetyError;
use spotter_core::models::{
    AuditEvent, AuditRecord, SafetyReport, UserSafetyContext, ValidationRequest, ValidationType,
};
use spotter_safety::{SafetyEnvelope, SafetyValidator};
use uuid::Uuid;

use crate::logging::PipelineLogger;
use crate::stores::Stores;

/// Direct validation service
pub struct SafetyService {
    validator: SafetyValidator,
    stores: Stores,
}

impl SafetyService {
    /// Create a service over the shared envelope and stores
    #[must_use]
    pub fn new(envelope: Arc<SafetyEnvelope>, stores: Stores) -> Self {
        Self {
            validator: SafetyValidator::new(envelope),
            stores,
        }
    }

    /// Validate as of now
    ///
    /// # Errors
    ///
    /// See [`Self::validate_at`]
    pub async fn validate(&self, request: &ValidationRequest) -> Result<SafetyReport, SafetyError> {
        self.validate_at(request, Utc::now()).await
    }

    /// Validate with an explicit clock for progression windows
    ///
    /// # Errors
    ///
    /// Returns `SafetyError::Validation` naming the missing field when the
    /// payload for the chosen mode is absent, and `SafetyError::Store` when a
    /// store read fails
    pub async fn validate_at(
        &self,
        request: &ValidationRequest,
        now: DateTime<Utc>,
    ) -> Result<SafetyReport, SafetyError> {
        let context = self.resolve_context(request.user_id, request.user_context.as_ref()).await?;

        let report = match request.validation_type {
            ValidationType::Workout => {
                let plan = request
                    .workout_plan
                    .as_ref()
                    .ok_or_else(|| missing("workout_plan", "workout"))?;
                let library = self.stores.library.snapshot().await?;
                self.validator.validate_workout(plan, &context, &library)
            }
            ValidationType::Exercise => {
                let suggestion = request
                    .exercise_suggestion
                    .as_ref()
                    .ok_or_else(|| missing("exercise_suggestion", "exercise"))?;
                let library = self.stores.library.snapshot().await?;
                self.validator.validate_exercise(suggestion, &context, &library)
            }
            ValidationType::Progression => {
                let user_id = request
                    .user_id
                    .ok_or_else(|| missing("user_id", "progression"))?;
                let since = now - Duration::days(progression::WINDOW_DAYS);
                let sessions = self.stores.history.sessions_since(user_id, since).await?;
                self.validator.validate_progression(&sessions, &context, now)
            }
        };

        let mode = mode_name(request.validation_type);
        PipelineLogger::log_validation_outcome(request.user_id, mode, &report);

        let record = AuditRecord::from_report(request.user_id, AuditEvent::Validation, &report);
        if let Err(e) = self.stores.audit.append(&record).await {
            PipelineLogger::log_audit_failure(request.user_id, AuditEvent::Validation.as_str(), &e);
        }
        Ok(report)
    }

    async fn resolve_context(
        &self,
        user_id: Option<Uuid>,
        override_context: Option<&UserSafetyContext>,
    ) -> Result<UserSafetyContext, SafetyError> {
        let stored = match user_id {
            Some(id) => self.stores.profiles.safety_context(id).await?,
            None => UserSafetyContext::default(),
        };
        Ok(match override_context {
            Some(extra) => stored.merged_with(extra),
            None => stored,
        })
    }
}

const fn mode_name(mode: ValidationType) -> &'static str {
    match mode {
        ValidationType::Workout => "workout",
        ValidationType::Exercise => "exercise",
        ValidationType::Progression => "progression",
    }
}

fn missing(field: &str, mode: &str) -> SafetyError {
    SafetyError::validation(field, format!("required for {mode} validation"))
}
