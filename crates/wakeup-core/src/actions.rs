//! Guarded writes against the challenge backend.
//!
//! The backend has the final say, but the client refuses up front what the
//! dashboard would never offer: cancelling a challenge dated today or
//! earlier, and checking in outside the window. Successful writes are
//! mirrored into the local snapshot so the next evaluation sees them.

use chrono::{DateTime, FixedOffset};

use crate::api::{ChallengeApiClient, ChallengeSnapshot, VerificationRequest};
use crate::cancellation::{cancellation_lock, CancellationLock};
use crate::challenge::{ChallengeId, ChallengeRecord};
use crate::error::{ChallengeError, Result};
use crate::local_date::local_date;
use crate::selector::is_in_window;
use crate::window::WindowPolicy;

pub struct ChallengeActions<'a> {
    client: &'a ChallengeApiClient,
    policy: WindowPolicy,
}

impl<'a> ChallengeActions<'a> {
    pub fn new(client: &'a ChallengeApiClient, policy: WindowPolicy) -> Self {
        Self { client, policy }
    }

    /// The record for `id`, from the snapshot or fetched into it.
    pub async fn lookup(&self, snapshot: &mut ChallengeSnapshot, id: ChallengeId) -> Result<ChallengeRecord> {
        if let Some(record) = snapshot.get(id) {
            return Ok(record.clone());
        }
        let record = self.client.get_challenge(id).await?;
        snapshot.upsert(record.clone());
        Ok(record)
    }

    /// Cancel `id` if its date is still in the future at `now`.
    ///
    /// Returns the record as it was before cancellation.
    pub async fn cancel(
        &self,
        snapshot: &mut ChallengeSnapshot,
        id: ChallengeId,
        now: DateTime<FixedOffset>,
    ) -> Result<ChallengeRecord> {
        let record = self.lookup(snapshot, id).await?;
        let reason = match cancellation_lock(record.challenge_date, local_date(now)) {
            CancellationLock::Allowed => None,
            CancellationLock::Locked => Some("challenges are locked on their own date"),
            CancellationLock::NotApplicable => Some("the challenge date has passed"),
        };
        if let Some(reason) = reason {
            tracing::warn!(%id, date = %record.challenge_date, reason, "refusing to cancel");
            return Err(ChallengeError::CancellationRefused {
                id,
                reason: reason.to_string(),
            }
            .into());
        }

        self.client.cancel_challenge(id).await?;
        snapshot.remove(id);
        Ok(record)
    }

    /// Check in for `request.challenge_id` if it is pending and its window is
    /// open at `now`. Returns the record as updated by the backend.
    pub async fn verify(
        &self,
        snapshot: &mut ChallengeSnapshot,
        request: &VerificationRequest,
        now: DateTime<FixedOffset>,
    ) -> Result<ChallengeRecord> {
        let id = request.challenge_id;
        let record = self.lookup(snapshot, id).await?;
        if !record.status.is_pending() {
            return Err(ChallengeError::CheckInRefused {
                id,
                reason: format!("challenge is already {}", record.status),
            }
            .into());
        }
        if !is_in_window(&record, now, &self.policy) {
            let reason = match self.policy.evaluate_record(&record, now) {
                Ok(info) => info.message,
                Err(e) => e.to_string(),
            };
            tracing::warn!(%id, %reason, "refusing to check in");
            return Err(ChallengeError::CheckInRefused { id, reason }.into());
        }

        let updated = self.client.verify_challenge(request).await?;
        snapshot.upsert(updated.clone());
        Ok(updated)
    }
}
