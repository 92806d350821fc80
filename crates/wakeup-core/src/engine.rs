//! Challenge status engine.
//!
//! Turns a challenge snapshot and one sampled instant into the view model the
//! presentation layer renders. Re-run on every clock tick and every time the
//! snapshot changes; nothing is cached between runs.

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::Serialize;

use crate::api::ChallengeSource;
use crate::cancellation::{cancellation_lock, CancellationLock};
use crate::challenge::ChallengeRecord;
use crate::dashboard::{next_upcoming, pending_challenges};
use crate::local_date::{format_date, local_date};
use crate::selector::{is_in_window, select_today, SelectionRule, TodaySelection};
use crate::status::{display_status, DisplayStatus};
use crate::window::{WindowInfo, WindowPolicy, WindowState};

/// Everything derived for one record at one instant.
#[derive(Debug, Clone, Serialize)]
pub struct ChallengeView<'a> {
    pub challenge: &'a ChallengeRecord,
    /// `None` for resolved records and for records whose wake time is malformed.
    pub window: Option<WindowInfo>,
    /// Set when the wake time could not be parsed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub window_error: Option<String>,
    /// Same decision the selector uses: server hints first, then the window.
    pub can_check_in: bool,
    pub display_status: DisplayStatus,
    pub cancellation: CancellationLock,
}

#[derive(Debug, Clone, Serialize)]
pub struct TodayView<'a> {
    pub rule: SelectionRule,
    #[serde(flatten)]
    pub view: ChallengeView<'a>,
}

/// Dashboard state at one instant.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardView<'a> {
    pub evaluated_at: DateTime<FixedOffset>,
    pub today: String,
    pub today_challenge: Option<TodayView<'a>>,
    pub next_upcoming: Option<&'a ChallengeRecord>,
    pub pending_count: usize,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ChallengeStatusEngine {
    policy: WindowPolicy,
}

impl ChallengeStatusEngine {
    pub fn new(policy: WindowPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &WindowPolicy {
        &self.policy
    }

    /// Derive the view of a single record.
    ///
    /// The window is anchored to the record's own challenge date, so an
    /// unresolved record from yesterday reads as `after`, not as today's
    /// window.
    ///
    /// Display status follows `can_check_in`, so a server hint that opens
    /// (or closes) the window shows as `time-to-act` (or `pending`) even when
    /// the local countdown disagrees.
    pub fn view<'a>(
        &self,
        record: &'a ChallengeRecord,
        today: NaiveDate,
        now: DateTime<FixedOffset>,
    ) -> ChallengeView<'a> {
        let (window, window_error) = if record.status.is_resolved() {
            (None, None)
        } else {
            match self.policy.evaluate_record(record, now) {
                Ok(info) => (Some(info), None),
                Err(e) => {
                    tracing::warn!(id = %record.id, error = %e, "skipping window for malformed challenge");
                    (None, Some(e.to_string()))
                }
            }
        };
        let can_check_in = record.status.is_pending() && is_in_window(record, now, &self.policy);
        let display_state = if can_check_in {
            Some(WindowState::Within)
        } else {
            window.as_ref().map(|w| w.state).filter(|s| *s != WindowState::Within)
        };
        ChallengeView {
            challenge: record,
            window,
            window_error,
            can_check_in,
            display_status: display_status(record, display_state),
            cancellation: cancellation_lock(record.challenge_date, today),
        }
    }

    /// Pick today's challenge and derive its view.
    pub fn today<'a, S>(&self, source: &'a S, now: DateTime<FixedOffset>) -> Option<TodayView<'a>>
    where
        S: ChallengeSource + ?Sized,
    {
        let today = local_date(now);
        let selection: TodaySelection<'a> =
            select_today(source.challenges_for_date(today), today, now, &self.policy);
        let rule = selection.rule()?;
        let record = selection.record()?;
        Some(TodayView {
            rule,
            view: self.view(record, today, now),
        })
    }

    /// Full dashboard at `now`.
    pub fn evaluate<'a, S>(&self, source: &'a S, now: DateTime<FixedOffset>) -> DashboardView<'a>
    where
        S: ChallengeSource + ?Sized,
    {
        let today = local_date(now);
        let records = source.list_challenges();
        DashboardView {
            evaluated_at: now,
            today: format_date(today),
            today_challenge: self.today(source, now),
            next_upcoming: next_upcoming(records, today),
            pending_count: pending_challenges(records, today).len(),
        }
    }
}
