use clap::Args;
use wakeup_core::{local_date, local_stats, ChallengeSource, Config};

use crate::source::{api_client, ClockArgs, SourceArgs};

#[derive(Args)]
pub struct StatsArgs {
    #[command(flatten)]
    source: SourceArgs,
    /// Ask the backend for its statistics instead of deriving them
    #[arg(long, conflicts_with = "file")]
    remote: bool,
    #[command(flatten)]
    clock: ClockArgs,
}

pub fn run(args: StatsArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let stats = if args.remote {
        let client = api_client(&config)?;
        tokio::runtime::Runtime::new()?.block_on(client.stats())?
    } else {
        let snapshot = args.source.load(&config)?;
        local_stats(snapshot.list_challenges(), local_date(args.clock.now()))
    };
    println!("{}", serde_json::to_string_pretty(&stats)?);
    Ok(())
}
