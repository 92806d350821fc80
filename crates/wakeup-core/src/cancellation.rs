//! Cancellation lock.
//!
//! A challenge can be cancelled up to the end of the day before it. From
//! local midnight of the challenge date it is locked for the whole day,
//! whatever the wake-up time.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CancellationLock {
    /// Challenge date is still in the future.
    Allowed,
    /// Challenge date is today.
    Locked,
    /// Challenge date has passed; cancellation should not be offered at all.
    NotApplicable,
}

pub fn cancellation_lock(challenge_date: NaiveDate, today: NaiveDate) -> CancellationLock {
    match challenge_date.cmp(&today) {
        std::cmp::Ordering::Greater => CancellationLock::Allowed,
        std::cmp::Ordering::Equal => CancellationLock::Locked,
        std::cmp::Ordering::Less => CancellationLock::NotApplicable,
    }
}

/// `true` only for challenges dated after `today`.
pub fn is_cancellation_allowed(challenge_date: NaiveDate, today: NaiveDate) -> bool {
    cancellation_lock(challenge_date, today) == CancellationLock::Allowed
}
