// ABOUTME: Constants module with domain-separated organization
// ABOUTME: Scoring weights, validator thresholds, and generation limits
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Spotter Fitness Safety

//! Constants module
//!
//! Fixed thresholds used by the safety validator, the candidate generator, and
//! the fallback generator. Anything a deployment may want to tune lives in the
//! safety envelope instead.

/// Safety score arithmetic
pub mod scoring {
    /// Starting score before deductions
    pub const MAX_SCORE: u8 = 100;
    /// Deduction per critical violation
    pub const CRITICAL_PENALTY: u32 = 30;
    /// Deduction per error violation
    pub const ERROR_PENALTY: u32 = 15;
    /// Deduction per warning violation
    pub const WARNING_PENALTY: u32 = 5;
    /// Below this score the risk level is `very_high`
    pub const VERY_HIGH_RISK_BELOW: u8 = 40;
    /// Below this score the risk level is at least `high`
    pub const HIGH_RISK_BELOW: u8 = 60;
    /// Below this score the risk level is at least `medium`
    pub const MEDIUM_RISK_BELOW: u8 = 80;
    /// Below this score supervision is recommended
    pub const SUPERVISION_RECOMMENDED_BELOW: u8 = 80;
}

/// Thresholds applied by exercise and workout validation
pub mod validation {
    /// Minimum library safety rating for an exercise to be considered safe
    pub const MIN_SAFETY_RATING: u8 = 3;
    /// Sets above this count trigger a volume warning
    pub const WARN_SETS_ABOVE: u32 = 6;
    /// Suggested set count when reducing sets
    pub const SUGGESTED_MAX_SETS: u32 = 5;
    /// Reps above this count trigger a volume warning
    pub const WARN_REPS_ABOVE: u32 = 30;
    /// Sessions longer than this trigger a duration warning
    pub const LONG_SESSION_MINUTES: u32 = 120;
    /// Lowest accepted intensity on the RPE scale
    pub const MIN_INTENSITY: u8 = 1;
    /// Highest accepted intensity on the RPE scale
    pub const MAX_INTENSITY: u8 = 10;
}

/// Progression analysis windows and limits
pub mod progression {
    /// Days of completed sessions considered
    pub const WINDOW_DAYS: i64 = 30;
    /// Largest tolerated week-over-week volume increase (fraction)
    pub const MAX_WEEKLY_INCREASE: f64 = 0.10;
    /// Number of most recent sessions inspected for intensity trends
    pub const INTENSITY_TREND_SESSIONS: usize = 5;
    /// Consecutive strict intensity increases that trigger a warning
    ///
    /// Counted as increases between sessions, so the warning needs four sessions
    /// of rising intensity. Three sessions (two increases) is ordinary
    /// progressive overload within a week and is not flagged.
    pub const CONSECUTIVE_INCREASES_WARNING: usize = 3;
}

/// Candidate generation limits
pub mod generation {
    /// Recently used exercise names passed to the generator
    pub const RECENT_EXERCISE_LIMIT: usize = 20;
    /// Days of history used for the anti-repetition list
    pub const RECENT_HISTORY_DAYS: i64 = 30;
    /// Rest used when a category has no configured requirement
    pub const DEFAULT_REST_SECONDS: u32 = 60;
    /// Default hard timeout for the generative call
    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
    /// Sampling temperature for workout generation
    pub const TEMPERATURE: f32 = 0.4;
    /// Completion budget for workout generation
    pub const MAX_TOKENS: u32 = 1500;
}

/// Fallback template parameters
pub mod fallback {
    /// Maximum exercises in a fallback plan
    pub const MAX_EXERCISES: usize = 5;
    /// Minimum library safety rating for fallback exercises
    pub const MIN_SAFETY_RATING: u8 = 4;
    /// Sets assigned before envelope clamping
    pub const SETS: u32 = 3;
    /// Reps assigned before envelope clamping
    pub const REPS: u32 = 15;
    /// Intensity ceiling for fallback exercises
    pub const MAX_INTENSITY: u8 = 3;
    /// Equipment every fallback exercise must support
    pub const REQUIRED_EQUIPMENT: &str = "bodyweight";
}

/// Equipment identifiers with special meaning
pub mod equipment {
    /// Equipment assumed when the caller supplies none
    pub const BODYWEIGHT: &str = "bodyweight";
    /// Loaded equipment that raises injury risk for users with several injuries
    pub const HEAVY_LOAD: &[&str] = &["barbell", "heavy_weights"];
}

/// Injury heuristics
pub mod injury {
    /// Body regions whose presence in an injury string raises risk to medium
    pub const SENSITIVE_REGIONS: &[&str] = &["lower_back", "knee", "shoulder", "neck"];
    /// Requested difficulty at which any injury escalates risk to high
    pub const HIGH_RISK_DIFFICULTY: u8 = 4;
    /// Injury count above which heavy equipment escalates risk to high
    pub const HEAVY_LOAD_INJURY_COUNT: usize = 1;
}
