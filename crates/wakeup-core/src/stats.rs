//! Challenge statistics.
//!
//! The backend serves these from `/challenges/stats`; [`local_stats`]
//! derives the same numbers from whatever snapshot is loaded.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::challenge::ChallengeRecord;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeStats {
    pub total_challenges: u64,
    pub successful_challenges: u64,
    pub failed_challenges: u64,
    pub current_streak: u64,
    pub longest_streak: u64,
    /// Percent, 0.0 ..= 100.0.
    pub success_rate: f64,
}

/// Stats over resolved records dated on or before `today`.
///
/// A calendar day counts as a success when every resolved challenge that day
/// succeeded. Streaks are runs of consecutive successful days; the current
/// streak ends at the most recent resolved day.
pub fn local_stats(records: &[ChallengeRecord], today: NaiveDate) -> ChallengeStats {
    let resolved: Vec<&ChallengeRecord> = records
        .iter()
        .filter(|r| r.status.is_resolved() && r.challenge_date <= today)
        .collect();

    let total = resolved.len() as u64;
    let successful = resolved.iter().filter(|r| r.is_successful).count() as u64;

    let mut days: BTreeMap<NaiveDate, bool> = BTreeMap::new();
    for r in &resolved {
        let day_ok = days.entry(r.challenge_date).or_insert(true);
        *day_ok &= r.is_successful;
    }

    let mut longest = 0u64;
    let mut run = 0u64;
    let mut prev: Option<NaiveDate> = None;
    for (&date, &ok) in &days {
        let consecutive = prev.and_then(|p| p.succ_opt()) == Some(date);
        run = match (ok, consecutive) {
            (false, _) => 0,
            (true, true) => run + 1,
            (true, false) => 1,
        };
        longest = longest.max(run);
        prev = Some(date);
    }

    ChallengeStats {
        total_challenges: total,
        successful_challenges: successful,
        failed_challenges: total - successful,
        current_streak: run,
        longest_streak: longest,
        success_rate: if total == 0 {
            0.0
        } else {
            successful as f64 / total as f64 * 100.0
        },
    }
}
