//! Challenge records as served by the backend.
//!
//! The engine only reads these. Wake-up times are kept as the raw string the
//! server sent so that one malformed record cannot poison a whole list; use
//! [`ChallengeRecord::wake_time`] to get the validated value.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::wake_time::WakeTime;
use crate::error::ChallengeError;

/// Opaque challenge identifier. Ordered so tie-breaks are deterministic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChallengeId(pub i64);

impl fmt::Display for ChallengeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Server-side lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChallengeStatus {
    Pending,
    /// No longer produced by the backend. Handled exactly like `Pending`.
    Active,
    Completed,
    Processed,
    /// Anything newer than this client knows about.
    #[serde(other)]
    Unknown,
}

impl ChallengeStatus {
    /// Awaiting resolution by the server.
    pub fn is_pending(self) -> bool {
        matches!(self, ChallengeStatus::Pending | ChallengeStatus::Active)
    }

    /// Resolved; `is_successful` is meaningful.
    pub fn is_resolved(self) -> bool {
        matches!(self, ChallengeStatus::Completed | ChallengeStatus::Processed)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ChallengeStatus::Pending => "PENDING",
            ChallengeStatus::Active => "ACTIVE",
            ChallengeStatus::Completed => "COMPLETED",
            ChallengeStatus::Processed => "PROCESSED",
            ChallengeStatus::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for ChallengeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeRecord {
    pub id: ChallengeId,
    pub challenge_date: NaiveDate,
    /// `HH:MM` as sent by the server; see [`ChallengeRecord::wake_time`].
    pub wake_up_time: String,
    pub forfeit_amount: f64,
    pub status: ChallengeStatus,
    #[serde(default)]
    pub is_successful: bool,

    // Server-derived hints.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub can_check_in: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_within_grace_period: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grace_period_start_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grace_period_end_time: Option<String>,

    // Descriptive fields shown by the dashboard.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check_in_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verification_method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winnings_amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_forfeit_amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl ChallengeRecord {
    /// Minimal record; everything optional left empty.
    pub fn new(
        id: i64,
        challenge_date: NaiveDate,
        wake_up_time: impl Into<String>,
        forfeit_amount: f64,
        status: ChallengeStatus,
    ) -> Self {
        Self {
            id: ChallengeId(id),
            challenge_date,
            wake_up_time: wake_up_time.into(),
            forfeit_amount,
            status,
            is_successful: false,
            can_check_in: None,
            is_within_grace_period: None,
            grace_period_start_time: None,
            grace_period_end_time: None,
            status_description: None,
            check_in_time: None,
            verification_method: None,
            winnings_amount: None,
            failure_reason: None,
            actual_forfeit_amount: None,
            created_at: None,
        }
    }

    pub fn with_success(mut self, is_successful: bool) -> Self {
        self.is_successful = is_successful;
        self
    }

    pub fn with_hints(mut self, can_check_in: Option<bool>, within_grace: Option<bool>) -> Self {
        self.can_check_in = can_check_in;
        self.is_within_grace_period = within_grace;
        self
    }

    pub fn wake_time(&self) -> Result<WakeTime, ChallengeError> {
        WakeTime::parse(&self.wake_up_time)
    }

    /// What the server says about the check-in window, if it said anything.
    ///
    /// `Some(true)` when either hint is true, `Some(false)` when hints were
    /// sent but none is true, `None` when neither was sent.
    pub fn server_window_hint(&self) -> Option<bool> {
        match (self.is_within_grace_period, self.can_check_in) {
            (None, None) => None,
            (a, b) => Some(a.unwrap_or(false) || b.unwrap_or(false)),
        }
    }
}
