use chrono::Datelike;
use clap::Args;
use wakeup_core::dashboard::calendar_month;
use wakeup_core::{local_date, parse_challenge_date, ChallengeError, ChallengeSource, Config};

use crate::source::{ClockArgs, SourceArgs};

#[derive(Args)]
pub struct CalendarArgs {
    /// Month to show (YYYY-MM)
    month: String,
    #[command(flatten)]
    source: SourceArgs,
    #[command(flatten)]
    clock: ClockArgs,
}

pub fn run(args: CalendarArgs) -> Result<(), Box<dyn std::error::Error>> {
    let first = parse_challenge_date(&format!("{}-01", args.month)).map_err(|_| {
        ChallengeError::InvalidDateFormat {
            value: args.month.clone(),
        }
    })?;
    let config = Config::load_or_default();
    let snapshot = args.source.load(&config)?;
    let today = local_date(args.clock.now());
    let grid = calendar_month(snapshot.list_challenges(), first.year(), first.month(), today)?;
    println!("{}", serde_json::to_string_pretty(&grid)?);
    Ok(())
}
