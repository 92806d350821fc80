use clap::Args;
use wakeup_core::dashboard::{history, FULL_HISTORY_LIMIT};
use wakeup_core::{ChallengeSource, Config};

use crate::source::SourceArgs;

#[derive(Args)]
pub struct HistoryArgs {
    #[command(flatten)]
    source: SourceArgs,
    /// Show the full history instead of the most recent entries
    #[arg(long)]
    all: bool,
}

pub fn run(args: HistoryArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let snapshot = args.source.load(&config)?;
    let limit = if args.all {
        FULL_HISTORY_LIMIT
    } else {
        config.display.history_limit
    };
    let entries = history(snapshot.list_challenges(), limit);
    println!("{}", serde_json::to_string_pretty(&entries)?);
    Ok(())
}
