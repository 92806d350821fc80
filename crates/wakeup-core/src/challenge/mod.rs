mod record;
mod wake_time;

pub use record::{ChallengeId, ChallengeRecord, ChallengeStatus};
pub use wake_time::WakeTime;
