use clap::Args;
use wakeup_core::{parse_challenge_date, Config};

use crate::source::ClockArgs;

#[derive(Args)]
pub struct WindowArgs {
    /// Wake-up time (HH:MM)
    wake: String,
    /// Anchor the window to this date (YYYY-MM-DD) instead of today
    #[arg(long)]
    date: Option<String>,
    #[command(flatten)]
    clock: ClockArgs,
}

pub fn run(args: WindowArgs) -> Result<(), Box<dyn std::error::Error>> {
    let policy = Config::load_or_default().window_policy();
    let now = args.clock.now();
    let info = match args.date {
        Some(date) => policy.evaluate_on(parse_challenge_date(&date)?, &args.wake, now)?,
        None => policy.evaluate(&args.wake, now)?,
    };
    println!("{}", serde_json::to_string_pretty(&info)?);
    Ok(())
}
