//! REST client for the challenge backend.
//!
//! Lists, by-date and by-status lookups, stats, plus the three writes the
//! dashboard performs: verify (check-in), cancel and the can-create check.
//! Errors are surfaced once, never retried.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::{Deserialize, Serialize};
use url::Url;

use super::ChallengeSnapshot;
use crate::challenge::{ChallengeId, ChallengeRecord, ChallengeStatus};
use crate::error::ApiError;
use crate::local_date::format_date;
use crate::stats::ChallengeStats;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api/v1";

/// Upper bound on pages fetched by [`ChallengeApiClient::fetch_snapshot`].
pub const MAX_PAGES: u32 = 100;

/// How the user proves they are awake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VerificationMethod {
    Photo,
    Location,
    Manual,
    Alarm,
}

impl VerificationMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            VerificationMethod::Photo => "PHOTO",
            VerificationMethod::Location => "LOCATION",
            VerificationMethod::Manual => "MANUAL",
            VerificationMethod::Alarm => "ALARM",
        }
    }
}

impl fmt::Display for VerificationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VerificationMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "PHOTO" => Ok(VerificationMethod::Photo),
            "LOCATION" => Ok(VerificationMethod::Location),
            "MANUAL" => Ok(VerificationMethod::Manual),
            "ALARM" => Ok(VerificationMethod::Alarm),
            _ => Err(format!("unknown verification method '{s}' (photo, location, manual, alarm)")),
        }
    }
}

/// Body of `POST /challenges/verify`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationRequest {
    pub challenge_id: ChallengeId,
    pub verification_method: VerificationMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub check_in_photo_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub check_in_location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl VerificationRequest {
    pub fn new(challenge_id: ChallengeId, verification_method: VerificationMethod) -> Self {
        Self {
            challenge_id,
            verification_method,
            check_in_photo_url: None,
            check_in_location: None,
            notes: None,
        }
    }

    pub fn with_photo_url(mut self, url: impl Into<String>) -> Self {
        self.check_in_photo_url = Some(url.into());
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.check_in_location = Some(location.into());
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

/// List endpoints answer `{challenges: [...]}`; the by-date endpoint may
/// instead answer `{challenge: {...}}` for a single record.
#[derive(Debug, Default, Deserialize)]
struct ChallengeListBody {
    #[serde(default)]
    challenges: Option<Vec<ChallengeRecord>>,
    #[serde(default)]
    challenge: Option<ChallengeRecord>,
}

impl ChallengeListBody {
    fn into_records(self) -> Vec<ChallengeRecord> {
        match (self.challenges, self.challenge) {
            (Some(list), _) => list,
            (None, Some(one)) => vec![one],
            (None, None) => Vec::new(),
        }
    }
}

/// Single-record endpoints answer `{challenge: {...}}`, `{data: {...}}` or the
/// bare record.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SingleChallengeBody {
    Wrapped { challenge: ChallengeRecord },
    Data { data: ChallengeRecord },
    Bare(ChallengeRecord),
}

impl SingleChallengeBody {
    fn into_record(self) -> ChallengeRecord {
        match self {
            SingleChallengeBody::Wrapped { challenge: record }
            | SingleChallengeBody::Data { data: record }
            | SingleChallengeBody::Bare(record) => record,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CanCreateBody {
    can_create: bool,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// Client for the challenge endpoints.
pub struct ChallengeApiClient {
    base_url: String,
    token: Option<String>,
    http_client: Client,
}

impl ChallengeApiClient {
    /// Create a client against `base_url` (e.g. `http://localhost:8080/api/v1`).
    pub fn new(base_url: &str, token: Option<String>) -> Result<Self, ApiError> {
        Url::parse(base_url)?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
            http_client: Client::new(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET /challenges?page=&size=`
    pub async fn list_challenges(&self, page: u32, size: u32) -> Result<Vec<ChallengeRecord>, ApiError> {
        let mut url = self.endpoint("/challenges")?;
        url.query_pairs_mut()
            .append_pair("page", &page.to_string())
            .append_pair("size", &size.to_string());
        let body: ChallengeListBody = self.get_json(url).await?;
        let records = body.into_records();
        tracing::info!(page, size, count = records.len(), "fetched challenge page");
        Ok(records)
    }

    /// Every page of `GET /challenges`, collected into a fresh snapshot.
    ///
    /// Pages are 0-based; fetching stops at the first short page or after
    /// [`MAX_PAGES`]. Any failure discards the partial result.
    pub async fn fetch_snapshot(&self, page_size: u32) -> Result<ChallengeSnapshot, ApiError> {
        let size = page_size.max(1);
        let mut snapshot = ChallengeSnapshot::new();
        for page in 0..MAX_PAGES {
            let records = self.list_challenges(page, size).await?;
            let last = records.len() < size as usize;
            snapshot.append_page(records);
            if last {
                break;
            }
        }
        Ok(snapshot)
    }

    /// `GET /challenges/{id}`
    pub async fn get_challenge(&self, id: ChallengeId) -> Result<ChallengeRecord, ApiError> {
        let url = self.endpoint(&format!("/challenges/{id}"))?;
        let body: SingleChallengeBody = self.get_json(url).await?;
        Ok(body.into_record())
    }

    /// `GET /challenges/date/{date}`
    pub async fn challenges_for_date(&self, date: NaiveDate) -> Result<Vec<ChallengeRecord>, ApiError> {
        let url = self.endpoint(&format!("/challenges/date/{}", format_date(date)))?;
        let body: ChallengeListBody = self.get_json(url).await?;
        let records = body.into_records();
        tracing::info!(%date, count = records.len(), "fetched challenges for date");
        Ok(records)
    }

    /// `GET /challenges/status/{STATUS}`
    pub async fn challenges_by_status(
        &self,
        status: ChallengeStatus,
    ) -> Result<Vec<ChallengeRecord>, ApiError> {
        let url = self.endpoint(&format!("/challenges/status/{}", status.as_str()))?;
        let body: ChallengeListBody = self.get_json(url).await?;
        Ok(body.into_records())
    }

    /// `GET /challenges/stats`
    pub async fn stats(&self) -> Result<ChallengeStats, ApiError> {
        let url = self.endpoint("/challenges/stats")?;
        self.get_json(url).await
    }

    /// `GET /challenges/can-create?date={date}`
    pub async fn can_create_challenge(&self, date: NaiveDate) -> Result<bool, ApiError> {
        let mut url = self.endpoint("/challenges/can-create")?;
        url.query_pairs_mut().append_pair("date", &format_date(date));
        let body: CanCreateBody = self.get_json(url).await?;
        Ok(body.can_create)
    }

    /// `POST /challenges/verify`; returns the updated record.
    pub async fn verify_challenge(&self, request: &VerificationRequest) -> Result<ChallengeRecord, ApiError> {
        let url = self.endpoint("/challenges/verify")?;
        let text = self.send(self.http_client.post(url.clone()).json(request), &url).await?;
        let body: SingleChallengeBody = parse_body(&text)?;
        let record = body.into_record();
        tracing::info!(
            id = %request.challenge_id,
            method = %request.verification_method,
            status = %record.status,
            successful = record.is_successful,
            "challenge verified"
        );
        Ok(record)
    }

    /// `DELETE /challenges/{id}`. The response body is ignored.
    pub async fn cancel_challenge(&self, id: ChallengeId) -> Result<(), ApiError> {
        let url = self.endpoint(&format!("/challenges/{id}"))?;
        self.send(self.http_client.delete(url.clone()), &url).await?;
        tracing::info!(%id, "challenge cancelled");
        Ok(())
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        Ok(Url::parse(&format!("{}{}", self.base_url, path))?)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: Url) -> Result<T, ApiError> {
        let text = self.send(self.http_client.get(url.clone()), &url).await?;
        parse_body(&text)
    }

    /// Authorize, send, and map non-2xx statuses. Returns the raw body.
    async fn send(&self, mut request: RequestBuilder, url: &Url) -> Result<String, ApiError> {
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let resp = request.send().await?;
        let status = resp.status();
        let text = resp.text().await?;

        if !status.is_success() {
            let message = error_message(status, &text);
            tracing::warn!(%url, status = status.as_u16(), %message, "challenge API request failed");
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }
        Ok(text)
    }
}

fn parse_body<T: serde::de::DeserializeOwned>(text: &str) -> Result<T, ApiError> {
    serde_json::from_str(text).map_err(|e| ApiError::UnexpectedBody(e.to_string()))
}

/// User-facing message for a failed response.
pub(crate) fn error_message(status: StatusCode, body: &str) -> String {
    match status.as_u16() {
        400 => serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.error)
            .unwrap_or_else(|| "Invalid request".to_string()),
        401 => "Please login again".to_string(),
        403 => "Access denied".to_string(),
        404 => "Resource not found".to_string(),
        500 => "Server error. Please try again later".to_string(),
        _ => "An unexpected error occurred".to_string(),
    }
}
