//! List derivations behind the dashboard: upcoming, pending, history and
//! the month calendar.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::challenge::{ChallengeRecord, WakeTime};
use crate::error::ChallengeError;
use crate::local_date::format_date;

pub const DEFAULT_HISTORY_LIMIT: usize = 5;
pub const FULL_HISTORY_LIMIT: usize = 50;

/// Chronological key; malformed wake times sort after valid ones on the same day.
fn chrono_key(record: &ChallengeRecord) -> (NaiveDate, u32, i64) {
    let minute = record
        .wake_time()
        .map(WakeTime::minute_of_day)
        .unwrap_or(u32::MAX);
    (record.challenge_date, minute, record.id.0)
}

/// Earliest pending challenge dated after `today`.
pub fn next_upcoming(records: &[ChallengeRecord], today: NaiveDate) -> Option<&ChallengeRecord> {
    records
        .iter()
        .filter(|r| r.challenge_date > today && r.status.is_pending())
        .min_by_key(|r| chrono_key(r))
}

/// Pending challenges dated today or later, in chronological order.
pub fn pending_challenges(records: &[ChallengeRecord], today: NaiveDate) -> Vec<&ChallengeRecord> {
    let mut pending: Vec<&ChallengeRecord> = records
        .iter()
        .filter(|r| r.challenge_date >= today && r.status.is_pending())
        .collect();
    pending.sort_by_key(|r| chrono_key(r));
    pending
}

/// Resolved challenges, most recent first, at most `limit`.
pub fn history(records: &[ChallengeRecord], limit: usize) -> Vec<&ChallengeRecord> {
    let mut resolved: Vec<&ChallengeRecord> = records.iter().filter(|r| r.status.is_resolved()).collect();
    resolved.sort_by(|a, b| {
        let key = |r: &ChallengeRecord| {
            let minute = r.wake_time().map(WakeTime::minute_of_day).ok();
            (r.challenge_date, minute, r.id)
        };
        key(b).cmp(&key(a))
    });
    resolved.truncate(limit);
    resolved
}

#[derive(Debug, Clone, Serialize)]
pub struct CalendarDay<'a> {
    pub date: String,
    pub day: u32,
    pub is_today: bool,
    pub challenges: Vec<&'a ChallengeRecord>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CalendarMonth<'a> {
    pub year: i32,
    pub month: u32,
    /// Weekday of the 1st, 0 = Sunday. Number of blank cells before day 1.
    pub leading_blanks: u32,
    pub days: Vec<CalendarDay<'a>>,
}

/// Month grid with each day's challenges.
pub fn calendar_month(
    records: &[ChallengeRecord],
    year: i32,
    month: u32,
    today: NaiveDate,
) -> Result<CalendarMonth<'_>, ChallengeError> {
    let invalid = || ChallengeError::InvalidDateFormat {
        value: format!("{year:04}-{month:02}"),
    };
    let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;

    let days = first
        .iter_days()
        .take_while(|d| d.month() == month)
        .map(|date| {
            let mut challenges: Vec<&ChallengeRecord> =
                records.iter().filter(|r| r.challenge_date == date).collect();
            challenges.sort_by_key(|r| chrono_key(r));
            CalendarDay {
                date: format_date(date),
                day: date.day(),
                is_today: date == today,
                challenges,
            }
        })
        .collect();

    Ok(CalendarMonth {
        year,
        month,
        leading_blanks: first.weekday().num_days_from_sunday(),
        days,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::challenge::{ChallengeId, ChallengeStatus};

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 8, day).unwrap()
    }

    fn rec(id: i64, day: u32, wake: &str, status: ChallengeStatus) -> ChallengeRecord {
        ChallengeRecord::new(id, d(day), wake, 100.0, status)
    }

    fn ids(records: &[&ChallengeRecord]) -> Vec<i64> {
        records.iter().map(|r| r.id.0).collect()
    }

    #[test]
    fn next_upcoming_skips_today_and_resolved() {
        let records = vec![
            rec(1, 9, "06:00", ChallengeStatus::Pending),
            rec(2, 12, "06:00", ChallengeStatus::Pending),
            rec(3, 10, "08:00", ChallengeStatus::Completed),
            rec(4, 11, "07:00", ChallengeStatus::Pending),
            rec(5, 11, "05:00", ChallengeStatus::Pending),
        ];
        assert_eq!(next_upcoming(&records, d(9)).map(|r| r.id), Some(ChallengeId(5)));
        assert!(next_upcoming(&records, d(12)).is_none());
    }

    #[test]
    fn pending_includes_today_in_order() {
        let records = vec![
            rec(1, 10, "06:00", ChallengeStatus::Pending),
            rec(2, 9, "07:00", ChallengeStatus::Pending),
            rec(3, 8, "07:00", ChallengeStatus::Pending),
            rec(4, 9, "06:00", ChallengeStatus::Active),
        ];
        assert_eq!(ids(&pending_challenges(&records, d(9))), vec![4, 2, 1]);
    }

    #[test]
    fn history_is_newest_first_and_limited() {
        let records = vec![
            rec(1, 7, "06:00", ChallengeStatus::Completed),
            rec(2, 8, "06:00", ChallengeStatus::Processed),
            rec(3, 8, "07:30", ChallengeStatus::Completed),
            rec(4, 9, "06:00", ChallengeStatus::Pending),
            rec(5, 6, "06:00", ChallengeStatus::Completed),
        ];
        assert_eq!(ids(&history(&records, 10)), vec![3, 2, 1, 5]);
        assert_eq!(ids(&history(&records, 2)), vec![3, 2]);
    }

    #[test]
    fn calendar_groups_by_day() {
        let records = vec![
            rec(1, 9, "07:00", ChallengeStatus::Pending),
            rec(2, 9, "06:00", ChallengeStatus::Completed),
            rec(3, 20, "06:00", ChallengeStatus::Pending),
        ];
        let month = calendar_month(&records, 2025, 8, d(9)).unwrap();
        assert_eq!(month.days.len(), 31);
        // 2025-08-01 is a Friday.
        assert_eq!(month.leading_blanks, 5);

        let ninth = &month.days[8];
        assert_eq!(ninth.date, "2025-08-09");
        assert!(ninth.is_today);
        assert_eq!(ids(&ninth.challenges), vec![2, 1]);
        assert_eq!(month.days.iter().filter(|day| day.is_today).count(), 1);
        assert!(month.days[0].challenges.is_empty());
    }

    #[test]
    fn calendar_handles_february_and_bad_months() {
        let feb = calendar_month(&[], 2024, 2, d(9)).unwrap();
        assert_eq!(feb.days.len(), 29);
        assert!(calendar_month(&[], 2025, 13, d(9)).is_err());
    }
}
