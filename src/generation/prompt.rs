// ABOUTME: Prompt construction for the workout candidate generator
// ABOUTME: Bounded system and user messages listing limits, allowed names, and recent history
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Spotter Fitness Safety

use std::fmt::Write as _;

use spotter_core::constants::generation;
use spotter_core::models::{LibraryExercise, UserSafetyContext};
use spotter_safety::{NormalizedConstraints, SafetyEnvelope};

use crate::llm::ChatMessage;

/// System prompt for workout generation, loaded at compile time
pub const WORKOUT_SYSTEM_PROMPT: &str = include_str!("workout_system.md");

/// Everything the prompt is built from
pub struct PromptInput<'a> {
    /// Normalized request constraints
    pub constraints: &'a NormalizedConstraints,
    /// Exercises the generator may choose from
    pub eligible: &'a [LibraryExercise],
    /// Recently performed exercise names, most recent first
    pub recent_exercises: &'a [String],
    /// Merged user context
    pub context: &'a UserSafetyContext,
    /// Safety limits
    pub envelope: &'a SafetyEnvelope,
}

fn join_or(values: &[String], empty: &str) -> String {
    if values.is_empty() {
        empty.to_owned()
    } else {
        values.join(", ")
    }
}

/// Build the user message
#[must_use]
pub fn user_prompt(input: &PromptInput<'_>) -> String {
    let c = input.constraints;
    let envelope = input.envelope;
    let experience = input.context.experience();
    let mut out = String::new();

    // Writing to a String cannot fail
    let _ = writeln!(out, "Session request:");
    let _ = writeln!(out, "- Duration: {} minutes", c.duration_minutes);
    let _ = writeln!(out, "- Difficulty: {} of 5", c.difficulty_level);
    let _ = writeln!(out, "- Experience: {experience}");
    let _ = writeln!(out, "- Equipment: {}", c.equipment_available.join(", "));
    if let Some(focus) = &c.muscle_groups_focus {
        let _ = writeln!(out, "- Focus: {}", focus.join(", "));
    }
    let _ = writeln!(out, "- Goals: {}", join_or(&c.goals, "general fitness"));
    let _ = writeln!(out, "- Limitations: {}", join_or(&c.limitations, "none"));
    let _ = writeln!(out, "- Injuries: {}", join_or(&input.context.injury_history, "none"));

    let _ = writeln!(out, "\nLimits:");
    let _ = writeln!(out, "- At most {} sets per exercise", envelope.max_sets_per_exercise);
    let _ = writeln!(out, "- At most {} reps per set", envelope.max_reps_per_set);
    let _ = writeln!(
        out,
        "- At most {} sets in the whole session",
        envelope.max_sets_per_session(experience)
    );
    let _ = writeln!(out, "- Intensity at most {} (RPE)", envelope.rpe_cap(experience));

    let _ = writeln!(out, "\nAllowed exercises:");
    for exercise in input.eligible {
        let _ = writeln!(
            out,
            "- {} ({}, difficulty {}, min rest {}s)",
            exercise.name,
            exercise.category,
            exercise.difficulty_level,
            envelope.rest_for(exercise.category)
        );
    }

    let recent: Vec<String> = input
        .recent_exercises
        .iter()
        .take(generation::RECENT_EXERCISE_LIMIT)
        .cloned()
        .collect();
    let _ = writeln!(out, "\nRecently performed: {}", join_or(&recent, "none"));
    out
}

/// Build the full message list for one generation call
///
/// Providers without system-message support get the instructions prepended to
/// the single user message.
#[must_use]
pub fn build_messages(input: &PromptInput<'_>, system_messages: bool) -> Vec<ChatMessage> {
    if system_messages {
        vec![
            ChatMessage::system(WORKOUT_SYSTEM_PROMPT),
            ChatMessage::user(user_prompt(input)),
        ]
    } else {
        vec![ChatMessage::user(format!(
            "{WORKOUT_SYSTEM_PROMPT}\n\n{}",
            user_prompt(input)
        ))]
    }
}
