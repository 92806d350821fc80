use clap::Args;
use wakeup_core::dashboard::{next_upcoming, pending_challenges};
use wakeup_core::{local_date, ChallengeSource, Config};

use crate::source::{ClockArgs, SourceArgs};

#[derive(Args)]
pub struct UpcomingArgs {
    #[command(flatten)]
    source: SourceArgs,
    #[command(flatten)]
    clock: ClockArgs,
}

pub fn run(args: UpcomingArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let snapshot = args.source.load(&config)?;
    let today = local_date(args.clock.now());
    let records = snapshot.list_challenges();
    let out = serde_json::json!({
        "today": today,
        "next": next_upcoming(records, today),
        "pending": pending_challenges(records, today),
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}
