//! Today's active challenge.
//!
//! A user can end up with several records dated today (cancel-and-recreate,
//! test challenges). Exactly one of them is "the" challenge to act on:
//!
//! 1. a pending record whose check-in window is open, earliest wake time first;
//! 2. otherwise the pending record with the earliest wake time;
//! 3. otherwise the resolved record with the latest wake time;
//! 4. otherwise nothing.
//!
//! Ties on wake time go to the lower id (higher id for resolved records).
//! Records whose wake time does not parse sort after all valid ones and are
//! never considered in-window.

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::Serialize;

use crate::challenge::{ChallengeId, ChallengeRecord};
use crate::window::{WindowPolicy, WindowState};

/// Which rule picked the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionRule {
    InWindow,
    Upcoming,
    Resolved,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TodaySelection<'a> {
    InWindow(&'a ChallengeRecord),
    Upcoming(&'a ChallengeRecord),
    Resolved(&'a ChallengeRecord),
    /// No challenge today. A normal outcome, not an error.
    None,
}

impl<'a> TodaySelection<'a> {
    pub fn record(&self) -> Option<&'a ChallengeRecord> {
        match *self {
            TodaySelection::InWindow(r) | TodaySelection::Upcoming(r) | TodaySelection::Resolved(r) => {
                Some(r)
            }
            TodaySelection::None => None,
        }
    }

    pub fn rule(&self) -> Option<SelectionRule> {
        match self {
            TodaySelection::InWindow(_) => Some(SelectionRule::InWindow),
            TodaySelection::Upcoming(_) => Some(SelectionRule::Upcoming),
            TodaySelection::Resolved(_) => Some(SelectionRule::Resolved),
            TodaySelection::None => None,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, TodaySelection::None)
    }
}

/// Sort key: valid times first, then minute of day, then id.
fn wake_key(record: &ChallengeRecord) -> (bool, u32, ChallengeId) {
    match record.wake_time() {
        Ok(t) => (false, t.minute_of_day(), record.id),
        Err(_) => (true, u32::MAX, record.id),
    }
}

/// Whether a pending record's window is open at `now`.
///
/// Server hints win when present; otherwise the window is computed locally
/// against the record's own date.
pub fn is_in_window(record: &ChallengeRecord, now: DateTime<FixedOffset>, policy: &WindowPolicy) -> bool {
    if let Some(hint) = record.server_window_hint() {
        return hint;
    }
    match policy.evaluate_record(record, now) {
        Ok(info) => info.state == WindowState::Within,
        Err(e) => {
            tracing::warn!(id = %record.id, error = %e, "treating challenge as not actionable");
            false
        }
    }
}

/// Pick today's challenge from `records`.
pub fn select_today<'a, I>(
    records: I,
    today: NaiveDate,
    now: DateTime<FixedOffset>,
    policy: &WindowPolicy,
) -> TodaySelection<'a>
where
    I: IntoIterator<Item = &'a ChallengeRecord>,
{
    let todays: Vec<&ChallengeRecord> = records
        .into_iter()
        .filter(|r| r.challenge_date == today)
        .collect();
    if todays.is_empty() {
        return TodaySelection::None;
    }

    let pending: Vec<&ChallengeRecord> = todays.iter().copied().filter(|r| r.status.is_pending()).collect();

    let selection = if let Some(r) = pending
        .iter()
        .copied()
        .filter(|r| is_in_window(r, now, policy))
        .min_by_key(|r| wake_key(r))
    {
        TodaySelection::InWindow(r)
    } else if let Some(r) = pending.iter().copied().min_by_key(|r| wake_key(r)) {
        TodaySelection::Upcoming(r)
    } else if let Some(r) = todays
        .iter()
        .copied()
        .filter(|r| r.status.is_resolved())
        .max_by_key(|r| {
            let (invalid, minute, id) = wake_key(r);
            (!invalid, if invalid { 0 } else { minute }, id)
        })
    {
        TodaySelection::Resolved(r)
    } else {
        TodaySelection::None
    };

    tracing::debug!(
        %today,
        candidates = todays.len(),
        pending = pending.len(),
        rule = ?selection.rule(),
        id = ?selection.record().map(|r| r.id),
        "selected today's challenge"
    );
    selection
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::challenge::ChallengeStatus;
    use chrono::{Days, TimeZone};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 8, 9).unwrap()
    }

    fn at(h: u32, m: u32) -> DateTime<FixedOffset> {
        FixedOffset::east_opt(19800)
            .unwrap()
            .with_ymd_and_hms(2025, 8, 9, h, m, 0)
            .unwrap()
    }

    fn pending(id: i64, wake: &str) -> ChallengeRecord {
        ChallengeRecord::new(id, today(), wake, 100.0, ChallengeStatus::Pending)
    }

    fn resolved(id: i64, wake: &str, status: ChallengeStatus, ok: bool) -> ChallengeRecord {
        ChallengeRecord::new(id, today(), wake, 100.0, status).with_success(ok)
    }

    fn select(records: &[ChallengeRecord], now: DateTime<FixedOffset>) -> TodaySelection<'_> {
        select_today(records, today(), now, &WindowPolicy::default())
    }

    #[test]
    fn empty_list_selects_nothing() {
        assert!(select(&[], at(6, 0)).is_none());
    }

    #[test]
    fn other_days_are_ignored() {
        let mut tomorrow = pending(1, "06:00");
        tomorrow.challenge_date = today() + Days::new(1);
        assert_eq!(select(&[tomorrow], at(6, 0)), TodaySelection::None);
    }

    #[test]
    fn in_window_beats_earlier_rules() {
        let records = vec![pending(2, "07:00"), pending(1, "06:00")];
        let sel = select(&records, at(6, 0));
        assert_eq!(sel.rule(), Some(SelectionRule::InWindow));
        assert_eq!(sel.record().unwrap().id, ChallengeId(1));
    }

    #[test]
    fn in_window_record_wins_over_earlier_pending_one() {
        // 05:00 window closed, 07:00 window open.
        let records = vec![pending(1, "05:00"), pending(2, "07:00")];
        let sel = select(&records, at(6, 50));
        assert_eq!(sel, TodaySelection::InWindow(&records[1]));
    }

    #[test]
    fn falls_back_to_earliest_pending() {
        let records = vec![pending(1, "09:00"), pending(2, "08:00")];
        let sel = select(&records, at(6, 0));
        assert_eq!(sel, TodaySelection::Upcoming(&records[1]));
    }

    #[test]
    fn falls_back_to_latest_resolved() {
        let records = vec![
            resolved(1, "06:00", ChallengeStatus::Completed, false),
            resolved(2, "07:30", ChallengeStatus::Processed, true),
        ];
        let sel = select(&records, at(12, 0));
        assert_eq!(sel, TodaySelection::Resolved(&records[1]));
    }

    #[test]
    fn server_hint_overrides_local_clock() {
        // Locally 06:00 is in-window at 06:00, but the server says no.
        let records = vec![
            pending(1, "06:00").with_hints(Some(false), Some(false)),
            pending(2, "09:00").with_hints(Some(true), None),
        ];
        let sel = select(&records, at(6, 0));
        assert_eq!(sel, TodaySelection::InWindow(&records[1]));
    }

    #[test]
    fn legacy_active_counts_as_pending() {
        let records = vec![
            ChallengeRecord::new(1, today(), "06:00", 10.0, ChallengeStatus::Active),
            resolved(2, "05:00", ChallengeStatus::Completed, true),
        ];
        let sel = select(&records, at(6, 5));
        assert_eq!(sel, TodaySelection::InWindow(&records[0]));
    }

    #[test]
    fn ties_break_on_id() {
        let records = vec![pending(9, "06:00"), pending(3, "06:00")];
        assert_eq!(select(&records, at(6, 0)).record().unwrap().id, ChallengeId(3));

        let done = vec![
            resolved(4, "06:00", ChallengeStatus::Completed, true),
            resolved(8, "06:00", ChallengeStatus::Completed, true),
        ];
        assert_eq!(select(&done, at(12, 0)).record().unwrap().id, ChallengeId(8));
    }

    #[test]
    fn malformed_times_sort_last_and_are_never_in_window() {
        let records = vec![pending(1, "25:99"), pending(2, "10:00")];
        let sel = select(&records, at(6, 0));
        assert_eq!(sel, TodaySelection::Upcoming(&records[1]));

        let only_bad = vec![pending(1, "25:99")];
        assert_eq!(select(&only_bad, at(6, 0)), TodaySelection::Upcoming(&only_bad[0]));

        let done = vec![
            resolved(1, "bad", ChallengeStatus::Completed, true),
            resolved(2, "05:00", ChallengeStatus::Completed, true),
        ];
        assert_eq!(select(&done, at(12, 0)), TodaySelection::Resolved(&done[1]));
    }

    #[test]
    fn unknown_status_only_yields_nothing() {
        let records = vec![ChallengeRecord::new(1, today(), "06:00", 1.0, ChallengeStatus::Unknown)];
        assert!(select(&records, at(6, 0)).is_none());
    }

    #[test]
    fn selection_is_stable_across_calls() {
        let records = vec![pending(5, "07:00"), pending(6, "07:00"), pending(7, "06:30")];
        let now = at(6, 50);
        let first = select(&records, now).record().map(|r| r.id);
        let second = select(&records, now).record().map(|r| r.id);
        assert_eq!(first, second);
    }
}
