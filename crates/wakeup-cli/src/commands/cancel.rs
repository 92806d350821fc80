use clap::Args;
use wakeup_core::{cancellation_lock, local_date, parse_challenge_date, CancellationLock};

use crate::source::ClockArgs;

#[derive(Args)]
pub struct CancelArgs {
    /// Challenge date (YYYY-MM-DD)
    date: String,
    /// Treat this date (YYYY-MM-DD) as today instead of the local date
    #[arg(long)]
    today: Option<String>,
    #[command(flatten)]
    clock: ClockArgs,
}

pub fn run(args: CancelArgs) -> Result<(), Box<dyn std::error::Error>> {
    let date = parse_challenge_date(&args.date)?;
    let today = match args.today {
        Some(today) => parse_challenge_date(&today)?,
        None => local_date(args.clock.now()),
    };
    let lock = cancellation_lock(date, today);
    let out = serde_json::json!({
        "date": date,
        "today": today,
        "lock": lock,
        "allowed": lock == CancellationLock::Allowed,
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}
