use clap::Subcommand;
use wakeup_core::{
    parse_challenge_date, ChallengeActions, ChallengeId, ChallengeSnapshot, ClockSampler, Config, SystemClock,
    VerificationMethod, VerificationRequest,
};

use crate::source::api_client;

#[derive(Subcommand)]
pub enum ChallengeAction {
    /// Fetch a single challenge
    Show {
        /// Challenge ID
        id: i64,
    },
    /// Cancel a challenge (only before its date)
    Cancel {
        /// Challenge ID
        id: i64,
    },
    /// Check in for a challenge (only while its window is open)
    Verify {
        /// Challenge ID
        id: i64,
        /// photo, location, manual or alarm
        #[arg(long, default_value = "manual")]
        method: VerificationMethod,
        /// Photo evidence URL
        #[arg(long)]
        photo_url: Option<String>,
        /// Where the user checked in from
        #[arg(long)]
        location: Option<String>,
        /// Free-form note
        #[arg(long)]
        notes: Option<String>,
    },
    /// Ask the backend whether a challenge can be created for a date
    CanCreate {
        /// Challenge date (YYYY-MM-DD)
        date: String,
    },
}

pub fn run(action: ChallengeAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let client = api_client(&config)?;
    let actions = ChallengeActions::new(&client, config.window_policy());
    // Guards always use the real clock.
    let now = ClockSampler::new(SystemClock).now();
    let mut snapshot = ChallengeSnapshot::new();
    let rt = tokio::runtime::Runtime::new()?;

    match action {
        ChallengeAction::Show { id } => {
            let record = rt.block_on(client.get_challenge(ChallengeId(id)))?;
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
        ChallengeAction::Cancel { id } => {
            let record = rt.block_on(actions.cancel(&mut snapshot, ChallengeId(id), now))?;
            println!("cancelled challenge {} ({})", record.id, record.challenge_date);
        }
        ChallengeAction::Verify {
            id,
            method,
            photo_url,
            location,
            notes,
        } => {
            let mut request = VerificationRequest::new(ChallengeId(id), method);
            request.check_in_photo_url = photo_url;
            request.check_in_location = location;
            request.notes = notes;
            let record = rt.block_on(actions.verify(&mut snapshot, &request, now))?;
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
        ChallengeAction::CanCreate { date } => {
            let date = parse_challenge_date(&date)?;
            let can_create = rt.block_on(client.can_create_challenge(date))?;
            let out = serde_json::json!({ "date": date, "canCreate": can_create });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
    }
    Ok(())
}
