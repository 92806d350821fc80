//! # Wake-up Challenge Core Library
//!
//! Users stake money on waking up by a chosen time. This library decides,
//! from a challenge's date and wake-up time and the current instant, what
//! state the challenge is in, whether check-in is open, whether it can still
//! be cancelled, and which of the day's challenges is "the" one to act on.
//!
//! ## Architecture
//!
//! - **Clock Sampler**: the single source of "now"; the caller ticks it, or
//!   spawns it to tick every second
//! - **Status Engine**: pure functions over `(records, now)`; nothing is
//!   cached between evaluations
//! - **API**: REST client and the last-write-wins snapshot it fills
//! - **Storage**: TOML-based configuration
//!
//! ## Key Components
//!
//! - [`ClockSampler`]: samples an injected [`Clock`]
//! - [`WindowPolicy`]: check-in window evaluation
//! - [`select_today`]: today's active challenge
//! - [`ChallengeStatusEngine`]: the dashboard view model
//! - [`ChallengeApiClient`]: challenge backend client
//! - [`ChallengeActions`]: cancel and check-in, guarded by the lock and window rules

pub mod actions;
pub mod api;
pub mod cancellation;
pub mod challenge;
pub mod clock;
pub mod dashboard;
pub mod engine;
pub mod error;
pub mod local_date;
pub mod selector;
pub mod stats;
pub mod status;
pub mod storage;
pub mod window;

pub use actions::ChallengeActions;
pub use api::{ChallengeApiClient, ChallengeSnapshot, ChallengeSource, VerificationMethod, VerificationRequest};
pub use cancellation::{cancellation_lock, is_cancellation_allowed, CancellationLock};
pub use challenge::{ChallengeId, ChallengeRecord, ChallengeStatus, WakeTime};
pub use clock::{Clock, ClockSampler, FixedClock, ManualClock, SystemClock, TickerHandle};
pub use engine::{ChallengeStatusEngine, ChallengeView, DashboardView, TodayView};
pub use error::{ApiError, ChallengeError, ConfigError, CoreError};
pub use local_date::{local_date, parse_challenge_date, to_local_date};
pub use selector::{select_today, SelectionRule, TodaySelection};
pub use stats::{local_stats, ChallengeStats};
pub use status::{display_status, DisplayStatus};
pub use storage::Config;
pub use window::{evaluate_window, evaluate_window_on, CheckInWindow, Countdown, WindowInfo, WindowPolicy, WindowState};
