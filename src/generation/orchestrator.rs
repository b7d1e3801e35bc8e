// ABOUTME: Generation orchestrator sequencing normalize, filter, generate, validate, and fallback
// ABOUTME: Guarantees every returned plan passed workout-mode validation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Spotter Fitness Safety

//! # Generation Orchestrator
//!
//! Pipeline for one request:
//!
//! 1. Normalize constraints (reject before any I/O)
//! 2. Snapshot the library and filter it (empty result is a hard stop)
//! 3. Read the stored profile and recent history, merge the context
//! 4. One generator call under a hard timeout, then workout-mode validation
//! 5. On any generator failure or unsafe candidate, build and validate the fallback
//! 6. Best-effort audit append
//!
//! Store reads are fatal. Generator failures never reach the caller.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{Duration as ChronoDuration, Utc};
use spotter_core::constants::generation;
use spotter_core::errors::{GenerationError, SafetyError};
use spotter_core::models::{
    AuditEvent, AuditRecord, CompletedSession, ExerciseLibrary, GenerationRequest, LibraryExercise,
    SafetyReport, UserSafetyContext, WorkoutPlan,
};
use spotter_safety::{
    assess_injury_risk, ConstraintNormalizer, FallbackGenerator, InjuryRisk, LibraryFilter,
    NormalizedConstraints, SafetyEnvelope, SafetyValidator,
};
use tokio::time::timeout;
use tracing::{error, info, warn};
use uuid::Uuid;

use super::candidate::{CandidateGenerator, CandidateRequest};
use crate::llm::LlmProvider;
use crate::logging::PipelineLogger;
use crate::stores::Stores;

/// Plan returned to the caller plus the report it passed
#[derive(Debug, Clone)]
pub struct GenerationOutcome {
    /// Validated plan
    pub plan: WorkoutPlan,
    /// Workout-mode report for the plan
    pub report: SafetyReport,
    /// Why the generated candidate was replaced, when it was
    pub fallback_reason: Option<String>,
}

/// Workout generation pipeline
pub struct WorkoutGenerator {
    envelope: Arc<SafetyEnvelope>,
    normalizer: ConstraintNormalizer,
    filter: LibraryFilter,
    validator: SafetyValidator,
    fallback: FallbackGenerator,
    candidate: Option<CandidateGenerator>,
    stores: Stores,
    generation_timeout: Duration,
}

/// Distinct exercise names from history, most recent session first
fn recent_exercise_names(history: &[CompletedSession]) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for session in history.iter().rev() {
        for exercise in &session.exercises {
            if names.len() >= generation::RECENT_EXERCISE_LIMIT {
                return names;
            }
            if !names.contains(&exercise.name) {
                names.push(exercise.name.clone());
            }
        }
    }
    names
}

impl WorkoutGenerator {
    /// Build the pipeline; `provider = None` serves fallback plans only
    #[must_use]
    pub fn new(
        envelope: Arc<SafetyEnvelope>,
        stores: Stores,
        provider: Option<Arc<dyn LlmProvider>>,
        generation_timeout: Duration,
    ) -> Self {
        Self {
            normalizer: ConstraintNormalizer::new(envelope.clone()),
            filter: LibraryFilter::new(envelope.clone()),
            validator: SafetyValidator::new(envelope.clone()),
            fallback: FallbackGenerator::new(envelope.clone()),
            candidate: provider.map(|p| CandidateGenerator::new(p, envelope.clone())),
            envelope,
            stores,
            generation_timeout,
        }
    }

    /// Whether a generative provider is configured
    #[must_use]
    pub const fn has_provider(&self) -> bool {
        self.candidate.is_some()
    }

    /// Generate a validated plan
    ///
    /// # Errors
    ///
    /// Returns `SafetyError` for rejected constraints, an empty eligible library,
    /// unreadable stores, or an unsafe fallback
    pub async fn generate(&self, request: &GenerationRequest) -> Result<WorkoutPlan, SafetyError> {
        self.generate_with_report(request).await.map(|outcome| outcome.plan)
    }

    /// Generate a validated plan and return the report it passed
    ///
    /// # Errors
    ///
    /// Same as [`Self::generate`]
    pub async fn generate_with_report(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationOutcome, SafetyError> {
        let started = Instant::now();
        let user_id = request.user_id;
        let preferences = request.preferences.clone().unwrap_or_default();

        let constraints = self
            .normalizer
            .normalize(&request.constraints, Some(&preferences))?;

        let library = self.stores.library.snapshot().await?;
        let eligible = self.filter.eligible(&library, &constraints)?;

        let profile = self.stores.profiles.safety_context(user_id).await?;
        let since = Utc::now() - ChronoDuration::days(generation::RECENT_HISTORY_DAYS);
        let history = self.stores.history.sessions_since(user_id, since).await?;

        let context = profile.merged_with_preferences(&preferences);
        self.check_merged_context(&constraints, &context)?;

        let recent = recent_exercise_names(&history);
        let (plan, report, fallback_reason) = match self
            .try_candidate(&constraints, &eligible, &recent, &context, &library)
            .await
        {
            Ok((plan, report)) => (plan, report, None),
            Err(reason) => {
                warn!(user.id = %user_id, reason = %reason, "Substituting fallback plan");
                let (plan, report) = self.safe_fallback(&constraints, &context, &library)?;
                (plan, report, Some(reason))
            }
        };

        self.audit(user_id, &plan, &report, fallback_reason.clone()).await;
        PipelineLogger::log_generation_outcome(
            user_id,
            plan.generated_by,
            &report,
            fallback_reason.as_deref(),
            u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
        );

        Ok(GenerationOutcome {
            plan,
            report,
            fallback_reason,
        })
    }

    /// Re-apply the request checks that depend on the stored profile
    fn check_merged_context(
        &self,
        constraints: &NormalizedConstraints,
        context: &UserSafetyContext,
    ) -> Result<(), SafetyError> {
        if let Some(level) = context.experience_level {
            let limit = self.envelope.intensity_limit(level);
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

        let risk = assess_injury_risk(
            &context.injury_history,
            constraints.difficulty_level,
            &constraints.equipment_available,
        );
        if risk == InjuryRisk::High {
            return Err(SafetyError::validation_items(
                "injury_history",
                "Injury risk is too high for the requested difficulty or equipment",
                context.injury_history.clone(),
            ));
        }
        Ok(())
    }

    /// One generator attempt; `Err` carries the fallback reason
    async fn try_candidate(
        &self,
        constraints: &NormalizedConstraints,
        eligible: &[LibraryExercise],
        recent: &[String],
        context: &UserSafetyContext,
        library: &ExerciseLibrary,
    ) -> Result<(WorkoutPlan, SafetyReport), String> {
        let Some(candidate) = &self.candidate else {
            return Err("provider_disabled".to_owned());
        };

        let request = CandidateRequest {
            constraints,
            eligible,
            recent_exercises: recent,
            context,
        };
        let plan = match timeout(self.generation_timeout, candidate.generate(&request)).await {
            Ok(Ok(plan)) => plan,
            Ok(Err(e)) => return Err(format!("{}: {e}", e.kind())),
            Err(_) => {
                let e = GenerationError::Timeout(self.generation_timeout.as_secs());
                return Err(format!("{}: {e}", e.kind()));
            }
        };

        let report = self.validator.validate_workout(&plan, context, library);
        if report.is_safe {
            info!(
                plan_id = %plan.id,
                provider = candidate.provider_name(),
                score = report.safety_score,
                "Accepted generated candidate"
            );
            Ok((plan, report))
        } else {
            Err(format!(
                "unsafe_candidate: {} violations, score {}",
                report.violations.len(),
                report.safety_score
            ))
        }
    }

    /// Build the fallback and confirm it validates
    fn safe_fallback(
        &self,
        constraints: &NormalizedConstraints,
        context: &UserSafetyContext,
        library: &ExerciseLibrary,
    ) -> Result<(WorkoutPlan, SafetyReport), SafetyError> {
        let plan = self.fallback.generate(constraints, context, library)?;
        let report = self.validator.validate_workout(&plan, context, library);
        if !report.is_safe {
            error!(
                plan_id = %plan.id,
                violations = report.violations.len(),
                "Fallback plan failed validation"
            );
            return Err(SafetyError::Invariant(format!(
                "fallback plan {} failed validation with {} violations",
                plan.id,
                report.violations.len()
            )));
        }
        Ok((plan, report))
    }

    async fn audit(
        &self,
        user_id: Uuid,
        plan: &WorkoutPlan,
        report: &SafetyReport,
        fallback_reason: Option<String>,
    ) {
        let record = AuditRecord::from_report(Some(user_id), AuditEvent::Generation, report)
            .with_generator(plan.generated_by)
            .with_fallback_reason(fallback_reason);
        if let Err(e) = self.stores.audit.append(&record).await {
            PipelineLogger::log_audit_failure(Some(user_id), AuditEvent::Generation.as_str(), &e);
        }
    }
}
