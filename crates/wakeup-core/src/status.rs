//! User-facing status of a challenge.
//!
//! Purely a presentation derivation. The engine never moves a record between
//! server states; a pending record only becomes completed when the API says
//! so.

use serde::{Deserialize, Serialize};

use crate::challenge::ChallengeRecord;
use crate::window::WindowState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DisplayStatus {
    /// Pending and the check-in window is open.
    TimeToAct,
    /// Pending, window not open (yet or any more).
    Pending,
    CompletedSuccess,
    CompletedFailure,
}

impl DisplayStatus {
    pub fn label(self) -> &'static str {
        match self {
            DisplayStatus::TimeToAct => "Time to wake up!",
            DisplayStatus::Pending => "Pending",
            DisplayStatus::CompletedSuccess => "Completed",
            DisplayStatus::CompletedFailure => "Failed",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, DisplayStatus::CompletedSuccess | DisplayStatus::CompletedFailure)
    }

    pub fn is_actionable(self) -> bool {
        self == DisplayStatus::TimeToAct
    }
}

/// Map a record and its window state to a display status.
///
/// `window` is `None` when the window could not be evaluated (malformed
/// wake time); such records are never actionable.
pub fn display_status(record: &ChallengeRecord, window: Option<WindowState>) -> DisplayStatus {
    if record.status.is_resolved() {
        return if record.is_successful {
            DisplayStatus::CompletedSuccess
        } else {
            DisplayStatus::CompletedFailure
        };
    }
    match window {
        Some(WindowState::Within) if record.status.is_pending() => DisplayStatus::TimeToAct,
        _ => DisplayStatus::Pending,
    }
}
