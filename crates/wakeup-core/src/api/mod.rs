//! Boundary with the challenge backend.
//!
//! The engine never talks to the network itself. It reads whatever
//! [`ChallengeSource`] it is handed, usually a [`ChallengeSnapshot`] that the
//! [`ChallengeApiClient`] has filled.

mod client;
mod snapshot;

pub use client::{ChallengeApiClient, VerificationMethod, VerificationRequest, DEFAULT_BASE_URL, MAX_PAGES};
pub use snapshot::ChallengeSnapshot;

use chrono::NaiveDate;

use crate::challenge::ChallengeRecord;

/// Read access to the current challenge list.
pub trait ChallengeSource {
    /// Every record in the current snapshot.
    fn list_challenges(&self) -> &[ChallengeRecord];

    /// Records dated `date`; zero, one or many.
    fn challenges_for_date(&self, date: NaiveDate) -> Vec<&ChallengeRecord> {
        self.list_challenges()
            .iter()
            .filter(|r| r.challenge_date == date)
            .collect()
    }
}

impl ChallengeSource for [ChallengeRecord] {
    fn list_challenges(&self) -> &[ChallengeRecord] {
        self
    }
}

impl ChallengeSource for Vec<ChallengeRecord> {
    fn list_challenges(&self) -> &[ChallengeRecord] {
        self
    }
}
