//! Check-in window evaluation.
//!
//! A challenge can be checked in from `lead` minutes before its wake-up time
//! until `grace` minutes after it. Both edges belong to the window.
//!
//! ```text
//!   before        |<------- within ------->|        after
//! ----------------+-----------+------------+----------------
//!            wake - lead     wake     wake + grace
//! ```

use chrono::{DateTime, Duration, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::challenge::{ChallengeRecord, WakeTime};
use crate::error::ChallengeError;

pub const DEFAULT_LEAD_MINUTES: u32 = 15;
pub const DEFAULT_GRACE_MINUTES: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowState {
    Before,
    Within,
    After,
}

/// Window width around the wake-up time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowPolicy {
    pub lead: Duration,
    pub grace: Duration,
}

impl Default for WindowPolicy {
    fn default() -> Self {
        Self::from_minutes(DEFAULT_LEAD_MINUTES, DEFAULT_GRACE_MINUTES)
    }
}

/// Time left until the next window edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Countdown {
    total_seconds: i64,
}

impl Countdown {
    pub fn from_seconds(total_seconds: i64) -> Self {
        Self {
            total_seconds: total_seconds.max(0),
        }
    }

    pub fn total_seconds(self) -> i64 {
        self.total_seconds
    }

    pub fn hours(self) -> i64 {
        self.total_seconds / 3600
    }

    pub fn minutes(self) -> i64 {
        (self.total_seconds % 3600) / 60
    }

    pub fn seconds(self) -> i64 {
        self.total_seconds % 60
    }

    /// `HH:MM:SS`
    pub fn formatted(self) -> String {
        format!("{:02}:{:02}:{:02}", self.hours(), self.minutes(), self.seconds())
    }

    /// `HHh:MMm:SSs`
    pub fn human_readable(self) -> String {
        format!("{:02}h:{:02}m:{:02}s", self.hours(), self.minutes(), self.seconds())
    }
}

/// Concrete window for one wake-up on one date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CheckInWindow {
    pub start: DateTime<FixedOffset>,
    pub wake_up: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
}

/// Where "now" sits relative to a [`CheckInWindow`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WindowInfo {
    pub state: WindowState,
    pub window: CheckInWindow,
    pub remaining_seconds: i64,
    /// `HH:MM:SS`
    pub formatted_time: String,
    /// `HHh:MMm:SSs`
    pub human_readable_time: String,
    pub message: String,
}

impl WindowInfo {
    pub fn countdown(&self) -> Countdown {
        Countdown::from_seconds(self.remaining_seconds)
    }

    pub fn can_check_in(&self) -> bool {
        self.state == WindowState::Within
    }
}

impl CheckInWindow {
    pub fn classify(&self, now: DateTime<FixedOffset>) -> WindowInfo {
        let (state, countdown) = if now < self.start {
            (WindowState::Before, Countdown::from_seconds((self.start - now).num_seconds()))
        } else if now > self.end {
            (WindowState::After, Countdown::default())
        } else {
            (WindowState::Within, Countdown::from_seconds((self.end - now).num_seconds()))
        };

        let message = match state {
            WindowState::Before => format!("Completion window opens in {}", countdown.human_readable()),
            WindowState::Within => format!("{} remaining", countdown.human_readable()),
            WindowState::After => "Completion window has closed".to_string(),
        };

        WindowInfo {
            state,
            window: *self,
            remaining_seconds: countdown.total_seconds(),
            formatted_time: countdown.formatted(),
            human_readable_time: countdown.human_readable(),
            message,
        }
    }
}

impl WindowPolicy {
    pub fn from_minutes(lead: u32, grace: u32) -> Self {
        Self {
            lead: Duration::minutes(lead as i64),
            grace: Duration::minutes(grace as i64),
        }
    }

    /// Window for `wake` on `date`, expressed in `offset`.
    pub fn window_on(&self, date: NaiveDate, wake: WakeTime, offset: FixedOffset) -> CheckInWindow {
        let local = date.and_time(wake.as_naive_time());
        let utc = local - Duration::seconds(offset.local_minus_utc() as i64);
        let wake_up = DateTime::<FixedOffset>::from_naive_utc_and_offset(utc, offset);
        CheckInWindow {
            start: wake_up - self.lead,
            wake_up,
            end: wake_up + self.grace,
        }
    }

    /// Evaluate `wake_up_time` as occurring on the local date of `now`.
    pub fn evaluate(
        &self,
        wake_up_time: &str,
        now: DateTime<FixedOffset>,
    ) -> Result<WindowInfo, ChallengeError> {
        self.evaluate_on(now.date_naive(), wake_up_time, now)
    }

    /// Evaluate `wake_up_time` as occurring on `date` (local to `now`'s offset).
    pub fn evaluate_on(
        &self,
        date: NaiveDate,
        wake_up_time: &str,
        now: DateTime<FixedOffset>,
    ) -> Result<WindowInfo, ChallengeError> {
        let wake = WakeTime::parse(wake_up_time)?;
        let info = self.window_on(date, wake, *now.offset()).classify(now);
        tracing::debug!(
            wake_up_time = %wake,
            %date,
            now = %now,
            state = ?info.state,
            remaining_seconds = info.remaining_seconds,
            "evaluated check-in window"
        );
        Ok(info)
    }

    /// Evaluate a record against its own challenge date.
    pub fn evaluate_record(
        &self,
        record: &ChallengeRecord,
        now: DateTime<FixedOffset>,
    ) -> Result<WindowInfo, ChallengeError> {
        self.evaluate_on(record.challenge_date, &record.wake_up_time, now)
    }
}

/// [`WindowPolicy::evaluate`] with the default 15/10 minute window.
pub fn evaluate_window(
    wake_up_time: &str,
    now: DateTime<FixedOffset>,
) -> Result<WindowInfo, ChallengeError> {
    WindowPolicy::default().evaluate(wake_up_time, now)
}

/// [`WindowPolicy::evaluate_on`] with the default 15/10 minute window.
pub fn evaluate_window_on(
    date: NaiveDate,
    wake_up_time: &str,
    now: DateTime<FixedOffset>,
) -> Result<WindowInfo, ChallengeError> {
    WindowPolicy::default().evaluate_on(date, wake_up_time, now)
}
