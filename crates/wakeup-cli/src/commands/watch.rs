use std::time::{Duration, Instant};

use chrono::{DateTime, FixedOffset};
use clap::Args;
use wakeup_core::{ChallengeSnapshot, ChallengeStatusEngine, ClockSampler, Config, SystemClock};

use crate::source::{api_client, SourceArgs};

#[derive(Args)]
pub struct WatchArgs {
    #[command(flatten)]
    source: SourceArgs,
    /// Stop after this many ticks (runs until interrupted by default)
    #[arg(long)]
    ticks: Option<u64>,
}

pub fn run(args: WatchArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let mut snapshot = args.source.load(&config)?;
    let client = if args.source.is_remote() {
        Some(api_client(&config)?)
    } else {
        None
    };
    let engine = ChallengeStatusEngine::new(config.window_policy());
    let period = config.tick_interval();
    let mut refresh = RefreshSchedule::new(config.refresh_interval(), Instant::now());

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async {
        let mut ticker = ClockSampler::new(SystemClock).spawn(period);
        let mut seen = 0u64;
        while let Some(now) = ticker.changed().await {
            if let Some(client) = &client {
                if refresh.due(Instant::now()) {
                    match client.fetch_snapshot(config.api.page_size).await {
                        Ok(fresh) => snapshot = fresh,
                        Err(e) => tracing::warn!(error = %e, "refresh failed; keeping previous challenges"),
                    }
                }
            }
            println!("{}", status_line(&engine, &snapshot, now));
            seen += 1;
            if args.ticks.is_some_and(|limit| seen >= limit) {
                break;
            }
        }
        ticker.stop().await;
    });
    Ok(())
}

/// Fires at most once per `every`.
struct RefreshSchedule {
    every: Duration,
    last: Instant,
}

impl RefreshSchedule {
    fn new(every: Duration, start: Instant) -> Self {
        Self { every, last: start }
    }

    fn due(&mut self, now: Instant) -> bool {
        if now.saturating_duration_since(self.last) >= self.every {
            self.last = now;
            true
        } else {
            false
        }
    }
}

fn status_line(engine: &ChallengeStatusEngine, snapshot: &ChallengeSnapshot, now: DateTime<FixedOffset>) -> String {
    let stamp = now.format("%Y-%m-%d %H:%M:%S");
    let Some(today) = engine.today(snapshot, now) else {
        return format!("{stamp}  no challenge today");
    };
    let view = &today.view;
    let detail = match (&view.window, &view.window_error) {
        (Some(window), _) => window.message.clone(),
        (None, Some(error)) => error.clone(),
        (None, None) => String::new(),
    };
    format!(
        "{stamp}  #{} {}  {}  {detail}",
        view.challenge.id,
        view.challenge.wake_up_time,
        view.display_status.label(),
    )
    .trim_end()
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};
    use wakeup_core::{ChallengeRecord, ChallengeStatus};

    fn at(h: u32, m: u32) -> DateTime<FixedOffset> {
        FixedOffset::east_opt(0).unwrap().with_ymd_and_hms(2025, 8, 9, h, m, 0).unwrap()
    }

    #[test]
    fn line_shows_countdown_message() {
        let date = NaiveDate::from_ymd_opt(2025, 8, 9).unwrap();
        let snapshot = ChallengeSnapshot::from_records(vec![ChallengeRecord::new(
            3,
            date,
            "07:00",
            100.0,
            ChallengeStatus::Pending,
        )]);
        let line = status_line(&ChallengeStatusEngine::default(), &snapshot, at(6, 55));
        assert!(line.starts_with("2025-08-09 06:55:00  #3 07:00"));
        assert!(line.ends_with("00h:15m:00s remaining"));
    }

    #[test]
    fn refresh_fires_once_per_interval() {
        let start = Instant::now();
        let mut refresh = RefreshSchedule::new(Duration::from_secs(60), start);
        assert!(!refresh.due(start + Duration::from_secs(1)));
        assert!(refresh.due(start + Duration::from_secs(60)));
        assert!(!refresh.due(start + Duration::from_secs(61)));
        assert!(!refresh.due(start + Duration::from_secs(119)));
        assert!(refresh.due(start + Duration::from_secs(120)));
    }

    #[test]
    fn line_picks_up_refreshed_snapshot() {
        let date = NaiveDate::from_ymd_opt(2025, 8, 9).unwrap();
        let engine = ChallengeStatusEngine::default();
        let mut snapshot = ChallengeSnapshot::from_records(vec![ChallengeRecord::new(
            3,
            date,
            "07:00",
            100.0,
            ChallengeStatus::Pending,
        )]);
        assert!(status_line(&engine, &snapshot, at(7, 0)).contains("Time to wake up!"));

        snapshot = ChallengeSnapshot::from_records(vec![ChallengeRecord::new(
            3,
            date,
            "07:00",
            100.0,
            ChallengeStatus::Completed,
        )
        .with_success(true)]);
        let line = status_line(&engine, &snapshot, at(7, 0));
        assert!(line.contains("Completed"));
        assert!(!line.contains("Time to wake up!"));
    }

    #[test]
    fn line_without_challenge() {
        let line = status_line(&ChallengeStatusEngine::default(), &ChallengeSnapshot::new(), at(6, 55));
        assert_eq!(line, "2025-08-09 06:55:00  no challenge today");
    }
}
