use clap::Args;
use wakeup_core::{ChallengeStatusEngine, Config};

use crate::source::{ClockArgs, SourceArgs};

#[derive(Args)]
pub struct TodayArgs {
    #[command(flatten)]
    source: SourceArgs,
    #[command(flatten)]
    clock: ClockArgs,
}

pub fn run(args: TodayArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let snapshot = args.source.load(&config)?;
    let engine = ChallengeStatusEngine::new(config.window_policy());
    let view = engine.evaluate(&snapshot, args.clock.now());
    println!("{}", serde_json::to_string_pretty(&view)?);
    Ok(())
}
