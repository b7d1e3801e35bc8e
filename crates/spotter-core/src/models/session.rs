// ABOUTME: Completed workout sessions read from the history store
// ABOUTME: Input to progression analysis and the generator's anti-repetition list
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Spotter Fitness Safety

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One exercise as performed in a completed session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionExercise {
    /// Library exercise id
    pub exercise_id: String,
    /// Exercise name at the time of the session
    pub name: String,
    /// Sets performed
    pub sets: u32,
    /// Reps per set
    pub reps: u32,
    /// Effort on a 1-10 RPE scale
    pub intensity: u8,
}

/// A completed workout session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletedSession {
    /// Session identifier
    pub id: Uuid,
    /// Completion timestamp
    pub completed_at: DateTime<Utc>,
    /// Exercises performed
    pub exercises: Vec<SessionExercise>,
}

impl CompletedSession {
    /// Training volume (sum of sets x reps)
    #[must_use]
    pub fn volume(&self) -> u64 {
        self.exercises
            .iter()
            .map(|e| u64::from(e.sets) * u64::from(e.reps))
            .sum()
    }

    /// Mean exercise intensity, `None` for an empty session
    #[must_use]
    pub fn mean_intensity(&self) -> Option<f64> {
        if self.exercises.is_empty() {
            return None;
        }
        let total: f64 = self.exercises.iter().map(|e| f64::from(e.intensity)).sum();
        Some(total / self.exercises.len() as f64)
    }
}
