//! Shared command inputs: where records come from and what "now" is.

use std::path::{Path, PathBuf};

use chrono::{DateTime, FixedOffset};
use clap::Args;
use serde::Deserialize;
use wakeup_core::{
    ChallengeApiClient, ChallengeRecord, ChallengeSnapshot, ClockSampler, Config, FixedClock, SystemClock,
};

/// Bearer token for the challenge API.
const TOKEN_ENV: &str = "WAKEUP_API_TOKEN";

#[derive(Args, Debug, Clone, Default)]
pub struct SourceArgs {
    /// Read challenges from a JSON file instead of the API
    #[arg(long, value_name = "PATH")]
    pub file: Option<PathBuf>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct ClockArgs {
    /// Evaluate at this instant (RFC 3339) instead of the system clock
    #[arg(long, value_name = "RFC3339", value_parser = parse_instant)]
    pub at: Option<DateTime<FixedOffset>>,
}

impl ClockArgs {
    /// Sample "now" once for a one-shot command.
    pub fn now(&self) -> DateTime<FixedOffset> {
        match self.at {
            Some(at) => ClockSampler::new(FixedClock(at)).now(),
            None => ClockSampler::new(SystemClock).now(),
        }
    }
}

fn parse_instant(value: &str) -> Result<DateTime<FixedOffset>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(value)
}

/// Accepts a bare array or an API list body.
#[derive(Deserialize)]
#[serde(untagged)]
enum RecordFile {
    List(Vec<ChallengeRecord>),
    Body { challenges: Vec<ChallengeRecord> },
}

impl SourceArgs {
    /// Records come from the API when no file is given.
    pub fn is_remote(&self) -> bool {
        self.file.is_none()
    }

    /// Load a snapshot from `--file`, or from the API when no file is given.
    pub fn load(&self, config: &Config) -> Result<ChallengeSnapshot, Box<dyn std::error::Error>> {
        match &self.file {
            Some(path) => load_file(path),
            None => {
                let client = api_client(config)?;
                let rt = tokio::runtime::Runtime::new()?;
                Ok(rt.block_on(client.fetch_snapshot(config.api.page_size))?)
            }
        }
    }
}

fn load_file(path: &Path) -> Result<ChallengeSnapshot, Box<dyn std::error::Error>> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
    let records = match serde_json::from_str::<RecordFile>(&content)
        .map_err(|e| format!("cannot parse {}: {e}", path.display()))?
    {
        RecordFile::List(records) | RecordFile::Body { challenges: records } => records,
    };
    tracing::info!(path = %path.display(), count = records.len(), "loaded challenges from file");
    Ok(ChallengeSnapshot::from_records(records))
}

pub fn api_client(config: &Config) -> Result<ChallengeApiClient, Box<dyn std::error::Error>> {
    let token = std::env::var(TOKEN_ENV).ok().filter(|t| !t.is_empty());
    if token.is_none() {
        tracing::warn!("{TOKEN_ENV} is not set; requests will be unauthenticated");
    }
    Ok(ChallengeApiClient::new(&config.api.base_url, token)?)
}
