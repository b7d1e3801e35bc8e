// ABOUTME: Candidate generator turning one untrusted completion into a clamped workout plan
// ABOUTME: Strict JSON parsing, name resolution against the eligible list, and envelope clamps
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Spotter Fitness Safety

//! # Candidate Generator
//!
//! Makes exactly one completion call. The response is treated as untrusted
//! input: it must be a single JSON object in the documented shape, every
//! exercise name must resolve to the eligible list, and numeric fields must be
//! in range. Any failure is a [`GenerationError`] and is never retried.
//!
//! Sets, reps and rest are clamped to the envelope whether or not the
//! generator respected the limits it was given.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::error::Category;
use spotter_core::constants::{generation, validation};
use spotter_core::errors::GenerationError;
use spotter_core::models::{
    normalize_label, GeneratedBy, LibraryExercise, PlannedExercise, UserSafetyContext, WorkoutPlan,
};
use spotter_safety::{NormalizedConstraints, SafetyEnvelope};
use tracing::debug;
use uuid::Uuid;

use super::prompt::{build_messages, PromptInput};
use crate::llm::{ChatRequest, LlmProvider};

const DEFAULT_TITLE: &str = "Generated Workout";
const MAX_TITLE_CHARS: usize = 120;

/// Plan shape the generator must return
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CandidatePlan {
    #[serde(default)]
    title: Option<String>,
    exercises: Vec<CandidateExercise>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CandidateExercise {
    name: String,
    sets: u32,
    reps: u32,
    #[serde(default)]
    duration_seconds: Option<u32>,
    #[serde(default)]
    rest_seconds: Option<u32>,
    intensity: u8,
}

/// Inputs for one candidate
pub struct CandidateRequest<'a> {
    /// Normalized request constraints
    pub constraints: &'a NormalizedConstraints,
    /// Eligible exercises, in id order
    pub eligible: &'a [LibraryExercise],
    /// Recently performed exercise names, most recent first
    pub recent_exercises: &'a [String],
    /// Merged user context
    pub context: &'a UserSafetyContext,
}

/// Pull a JSON object out of a completion
///
/// Accepts a bare object, an object inside a fenced code block, or the span
/// between the first `{` and the last `}`.
#[must_use]
pub fn extract_json(response: &str) -> Option<&str> {
    let trimmed = response.trim();
    if trimmed.starts_with('{') && trimmed.ends_with('}') {
        return Some(trimmed);
    }

    if let Some(fence) = trimmed.find("```") {
        let after = &trimmed[fence + 3..];
        let body_start = after.find('\n').map_or(0, |i| i + 1);
        let body = &after[body_start..];
        if let Some(end) = body.find("```") {
            let block = body[..end].trim();
            if block.starts_with('{') {
                return Some(block);
            }
        }
    }

    let start = trimmed.find('{')?;
    let end = trimmed.rfind('}')?;
    (start < end).then(|| &trimmed[start..=end])
}

fn parse_candidate(response: &str) -> Result<CandidatePlan, GenerationError> {
    let json = extract_json(response)
        .ok_or_else(|| GenerationError::MalformedJson("no JSON object in response".into()))?;
    serde_json::from_str(json).map_err(|e| match e.classify() {
        Category::Data => GenerationError::schema("plan", e.to_string()),
        Category::Syntax | Category::Eof | Category::Io => GenerationError::MalformedJson(e.to_string()),
    })
}

fn check_ranges(index: usize, exercise: &CandidateExercise) -> Result<(), GenerationError> {
    if exercise.sets == 0 {
        return Err(GenerationError::schema(format!("exercises[{index}].sets"), "must be at least 1"));
    }
    if exercise.reps == 0 {
        return Err(GenerationError::schema(format!("exercises[{index}].reps"), "must be at least 1"));
    }
    if !(validation::MIN_INTENSITY..=validation::MAX_INTENSITY).contains(&exercise.intensity) {
        return Err(GenerationError::schema(
            format!("exercises[{index}].intensity"),
            format!("{} is outside 1..=10", exercise.intensity),
        ));
    }
    Ok(())
}

fn clean_title(title: Option<String>) -> String {
    title
        .map(|t| t.trim().chars().take(MAX_TITLE_CHARS).collect::<String>())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| DEFAULT_TITLE.to_owned())
}

/// Turn a raw completion into a clamped plan
///
/// # Errors
///
/// Returns a `GenerationError` when the response is not JSON, violates the
/// schema, is empty, or names an exercise outside the eligible list
pub fn plan_from_response(
    response: &str,
    request: &CandidateRequest<'_>,
    envelope: &SafetyEnvelope,
) -> Result<WorkoutPlan, GenerationError> {
    let candidate = parse_candidate(response)?;
    if candidate.exercises.is_empty() {
        return Err(GenerationError::EmptyPlan);
    }

    let available = &request.constraints.equipment_available;
    let mut equipment_needed: Vec<String> = Vec::new();
    let mut exercises = Vec::with_capacity(candidate.exercises.len());

    for (index, proposed) in candidate.exercises.into_iter().enumerate() {
        check_ranges(index, &proposed)?;

        let wanted = normalize_label(&proposed.name);
        let resolved = request
            .eligible
            .iter()
            .find(|e| normalize_label(&e.name) == wanted)
            .ok_or_else(|| GenerationError::UnknownExercise(proposed.name.clone()))?;

        let sets = proposed.sets.min(envelope.max_sets_per_exercise);
        let reps = proposed.reps.min(envelope.max_reps_per_set);
        let required_rest = envelope.rest_for(resolved.category);
        let rest_seconds = proposed.rest_seconds.unwrap_or(0).max(required_rest);
        if sets != proposed.sets || reps != proposed.reps || Some(rest_seconds) != proposed.rest_seconds {
            debug!(
                exercise = %resolved.id,
                proposed_sets = proposed.sets,
                sets,
                proposed_reps = proposed.reps,
                reps,
                proposed_rest = ?proposed.rest_seconds,
                rest_seconds,
                "Clamped generated prescription"
            );
        }

        let equipment: Vec<String> = resolved
            .equipment
            .iter()
            .map(|e| normalize_label(e))
            .filter(|e| available.contains(e))
            .collect();
        for item in &equipment {
            if !equipment_needed.contains(item) {
                equipment_needed.push(item.clone());
            }
        }

        exercises.push(PlannedExercise {
            id: resolved.id.clone(),
            name: resolved.name.clone(),
            sets,
            reps,
            duration_seconds: proposed.duration_seconds.filter(|d| *d > 0),
            rest_seconds,
            intensity: proposed.intensity,
            equipment,
        });
    }

    Ok(WorkoutPlan {
        id: Uuid::new_v4(),
        title: clean_title(candidate.title),
        duration_minutes: request.constraints.duration_minutes,
        difficulty_level: request.constraints.difficulty_level,
        exercises,
        equipment_needed,
        generated_by: GeneratedBy::Llm,
    })
}

/// Candidate generator over one provider
#[derive(Clone)]
pub struct CandidateGenerator {
    provider: Arc<dyn LlmProvider>,
    envelope: Arc<SafetyEnvelope>,
}

impl CandidateGenerator {
    /// Create a generator
    #[must_use]
    pub fn new(provider: Arc<dyn LlmProvider>, envelope: Arc<SafetyEnvelope>) -> Self {
        Self { provider, envelope }
    }

    /// Provider name for logs and audit records
    #[must_use]
    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Make one generation round trip
    ///
    /// # Errors
    ///
    /// Returns a `GenerationError` when the provider fails or its output is unusable
    pub async fn generate(&self, request: &CandidateRequest<'_>) -> Result<WorkoutPlan, GenerationError> {
        let capabilities = self.provider.capabilities();
        let messages = build_messages(
            &PromptInput {
                constraints: request.constraints,
                eligible: request.eligible,
                recent_exercises: request.recent_exercises,
                context: request.context,
                envelope: &self.envelope,
            },
            capabilities.supports_system_messages(),
        );

        let mut chat = ChatRequest::new(messages)
            .with_temperature(generation::TEMPERATURE)
            .with_max_tokens(generation::MAX_TOKENS);
        if capabilities.supports_json_mode() {
            chat = chat.with_json_mode();
        }

        let response = self
            .provider
            .complete(&chat)
            .await
            .map_err(|e| GenerationError::Provider(e.to_string()))?;

        plan_from_response(&response.content, request, &self.envelope)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::generation::prompt::WORKOUT_SYSTEM_PROMPT;
    use crate::llm::MessageRole;
    use spotter_core::models::ExerciseCategory;
    use spotter_safety::InjuryRisk;

    fn exercise(id: &str, name: &str, category: ExerciseCategory) -> LibraryExercise {
        LibraryExercise {
            id: id.to_owned(),
            name: name.to_owned(),
            category,
            movement_pattern: "squat".to_owned(),
            muscle_groups: vec!["legs".to_owned()],
            equipment: vec!["bodyweight".to_owned(), "dumbbells".to_owned()],
            safety_rating: 5,
            difficulty_level: 1,
            contraindications: vec![],
            is_compound: true,
        }
    }

    fn constraints() -> NormalizedConstraints {
        NormalizedConstraints {
            duration_minutes: 30,
            difficulty_level: 2,
            equipment_available: vec!["bodyweight".to_owned()],
            muscle_groups_focus: None,
            limitations: vec![],
            goals: vec![],
            experience_level: None,
            injury_history: vec![],
            avoid_exercises: vec![],
            injury_risk: InjuryRisk::Low,
        }
    }

    fn run(response: &str) -> Result<WorkoutPlan, GenerationError> {
        let eligible = vec![
            exercise("squat", "Bodyweight Squat", ExerciseCategory::Strength),
            exercise("plank", "Plank", ExerciseCategory::Core),
        ];
        let constraints = constraints();
        let context = UserSafetyContext::default();
        let request = CandidateRequest {
            constraints: &constraints,
            eligible: &eligible,
            recent_exercises: &[],
            context: &context,
        };
        plan_from_response(response, &request, &SafetyEnvelope::default())
    }

    #[test]
    fn test_prompt_folds_system_message_when_unsupported() {
        let eligible = vec![exercise("plank", "Plank", ExerciseCategory::Core)];
        let constraints = constraints();
        let context = UserSafetyContext::default();
        let envelope = SafetyEnvelope::default();
        let input = PromptInput {
            constraints: &constraints,
            eligible: &eligible,
            recent_exercises: &[],
            context: &context,
            envelope: &envelope,
        };

        let split = build_messages(&input, true);
        assert_eq!(split.len(), 2);
        assert_eq!(split[0].role, MessageRole::System);

        let folded = build_messages(&input, false);
        assert_eq!(folded.len(), 1);
        assert_eq!(folded[0].role, MessageRole::User);
        assert!(folded[0].content.starts_with(WORKOUT_SYSTEM_PROMPT));
        assert!(folded[0].content.contains("Plank"));
    }

    #[test]
    fn test_extract_json_variants() {
        assert_eq!(extract_json(r#"{"a":1}"#), Some(r#"{"a":1}"#));
        assert_eq!(extract_json("```json\n{\"a\":1}\n```"), Some("{\"a\":1}"));
        assert_eq!(extract_json("Here you go: {\"a\":1} enjoy"), Some("{\"a\":1}"));
        assert_eq!(extract_json("no json here"), None);
    }

    #[test]
    fn test_clamps_and_recomputes_equipment() {
        let plan = run(
            r#"{"title":"Legs","exercises":[
                {"name":"bodyweight squat","sets":12,"reps":80,"rest_seconds":10,"intensity":5}
            ]}"#,
        )
        .unwrap();
        let squat = &plan.exercises[0];
        assert_eq!(squat.id, "squat");
        assert_eq!(squat.sets, 6);
        assert_eq!(squat.reps, 30);
        assert_eq!(squat.rest_seconds, 90);
        assert_eq!(squat.equipment, vec!["bodyweight"]);
        assert_eq!(plan.equipment_needed, vec!["bodyweight"]);
        assert_eq!(plan.generated_by, GeneratedBy::Llm);
    }

    #[test]
    fn test_invented_name_rejected() {
        let err = run(r#"{"exercises":[{"name":"Dragon Flag","sets":3,"reps":5,"intensity":5}]}"#).unwrap_err();
        assert!(matches!(err, GenerationError::UnknownExercise(ref n) if n == "Dragon Flag"));
    }

    #[test]
    fn test_unknown_field_is_schema_error() {
        let err = run(r#"{"exercises":[],"warmup":"jog"}"#).unwrap_err();
        assert_eq!(err.kind(), "schema");
    }

    #[test]
    fn test_malformed_and_empty() {
        assert_eq!(run("{not json}").unwrap_err().kind(), "malformed_json");
        assert_eq!(run("I cannot help with that").unwrap_err().kind(), "malformed_json");
        assert!(matches!(run(r#"{"exercises":[]}"#).unwrap_err(), GenerationError::EmptyPlan));
    }

    #[test]
    fn test_out_of_range_intensity_rejected() {
        let err = run(r#"{"exercises":[{"name":"Plank","sets":3,"reps":1,"intensity":11}]}"#).unwrap_err();
        match err {
            GenerationError::Schema { field, .. } => assert_eq!(field, "exercises[0].intensity"),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
