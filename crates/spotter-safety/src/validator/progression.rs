// ABOUTME: Progression analysis over recent session history
// ABOUTME: Week-over-week volume growth and consecutive intensity increases
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Spotter Fitness Safety

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use spotter_core::constants::progression;
use spotter_core::models::{CompletedSession, SafetyViolation, Severity, ViolationType};

use super::scoring::Findings;

/// Sunday that starts the UTC week containing `at`
fn week_start(at: DateTime<Utc>) -> NaiveDate {
    let date = at.date_naive();
    date - Duration::days(i64::from(date.weekday().num_days_from_sunday()))
}

/// Total volume per week, oldest first
fn weekly_volumes(sessions: &[&CompletedSession]) -> BTreeMap<NaiveDate, u64> {
    let mut weeks: BTreeMap<NaiveDate, u64> = BTreeMap::new();
    for session in sessions {
        *weeks.entry(week_start(session.completed_at)).or_default() += session.volume();
    }
    weeks
}

/// Longest run of strictly increasing values
fn longest_increasing_run(values: &[f64]) -> usize {
    let mut longest = 0;
    let mut current = 0;
    for pair in values.windows(2) {
        if pair[1] > pair[0] {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 0;
        }
    }
    longest
}

pub(crate) fn check_progression(sessions: &[CompletedSession], now: DateTime<Utc>, findings: &mut Findings) {
    let since = now - Duration::days(progression::WINDOW_DAYS);
    let mut recent: Vec<&CompletedSession> = sessions
        .iter()
        .filter(|s| s.completed_at >= since && s.completed_at <= now)
        .collect();
    recent.sort_by_key(|s| s.completed_at);

    let weeks = weekly_volumes(&recent);
    if let Some((&latest_start, &latest)) = weeks.last_key_value() {
        // A week with no sessions counts as zero volume, which is never compared
        let previous = weeks
            .get(&(latest_start - Duration::days(7)))
            .copied()
            .unwrap_or_default();
        if previous > 0 {
            let increase = ((latest as f64 - previous as f64) / previous as f64).max(0.0);
            if increase > progression::MAX_WEEKLY_INCREASE {
                findings.push(SafetyViolation::new(
                    ViolationType::Progression,
                    Severity::Error,
                    format!(
                        "Weekly volume increased by {:.0}% ({previous} -> {latest})",
                        increase * 100.0
                    ),
                    format!(
                        "Limit week-over-week volume increases to {:.0}%",
                        progression::MAX_WEEKLY_INCREASE * 100.0
                    ),
                ));
            }
        }
    }

    let start = recent.len().saturating_sub(progression::INTENSITY_TREND_SESSIONS);
    let intensities: Vec<f64> = recent[start..]
        .iter()
        .filter_map(|s| s.mean_intensity())
        .collect();
    let run = longest_increasing_run(&intensities);
    if run >= progression::CONSECUTIVE_INCREASES_WARNING {
        findings.push(SafetyViolation::new(
            ViolationType::Progression,
            Severity::Warning,
            format!("Session intensity rose {run} times in a row"),
            "Schedule a lower-intensity recovery session",
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_week_starts_on_sunday() {
        // 2025-03-12 is a Wednesday
        let wednesday = Utc.with_ymd_and_hms(2025, 3, 12, 18, 0, 0).single();
        let sunday = NaiveDate::from_ymd_opt(2025, 3, 9);
        assert_eq!(wednesday.map(week_start), sunday);
    }

    #[test]
    fn test_gap_week_is_not_compared() {
        let now = Utc.with_ymd_and_hms(2025, 3, 27, 9, 0, 0).single().unwrap_or_default();
        let session = |days_ago: i64, reps: u32| CompletedSession {
            id: uuid::Uuid::nil(),
            completed_at: now - Duration::days(days_ago),
            exercises: vec![spotter_core::models::SessionExercise {
                exercise_id: "glute-bridge".to_owned(),
                name: "Glute Bridge".to_owned(),
                sets: 10,
                reps,
                intensity: 5,
            }],
        };

        // Three empty weeks separate the two sessions
        let mut findings = Findings::default();
        check_progression(&[session(24, 100), session(1, 200)], now, &mut findings);
        let report = findings.into_report(&spotter_core::models::UserSafetyContext::default());
        assert!(report.violations.is_empty());

        let mut findings = Findings::default();
        check_progression(&[session(8, 100), session(1, 200)], now, &mut findings);
        let report = findings.into_report(&spotter_core::models::UserSafetyContext::default());
        assert!(report.has_violation(ViolationType::Progression, Severity::Error));
    }

    #[test]
    fn test_increasing_run() {
        assert_eq!(longest_increasing_run(&[1.0, 2.0, 3.0, 4.0]), 3);
        assert_eq!(longest_increasing_run(&[1.0, 2.0, 2.0, 3.0]), 1);
        assert_eq!(longest_increasing_run(&[5.0]), 0);
    }
}
