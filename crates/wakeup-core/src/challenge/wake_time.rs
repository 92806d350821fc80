use std::fmt;
use std::str::FromStr;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::error::ChallengeError;

/// Target wake-up time of day, minute precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WakeTime {
    hour: u8,
    minute: u8,
}

impl WakeTime {
    pub fn new(hour: u8, minute: u8) -> Result<Self, ChallengeError> {
        if hour > 23 || minute > 59 {
            return Err(ChallengeError::InvalidTimeFormat {
                value: format!("{hour:02}:{minute:02}"),
            });
        }
        Ok(Self { hour, minute })
    }

    /// Parse `HH:MM`. A trailing `:SS` (as some backend responses carry) is
    /// accepted and dropped.
    pub fn parse(value: &str) -> Result<Self, ChallengeError> {
        let invalid = || ChallengeError::InvalidTimeFormat {
            value: value.to_string(),
        };

        let mut parts = value.trim().split(':');
        let hour = parts.next().ok_or_else(invalid)?;
        let minute = parts.next().ok_or_else(invalid)?;
        let second = parts.next();
        if parts.next().is_some() {
            return Err(invalid());
        }

        let hour = parse_field(hour, 1..=2, 23).ok_or_else(invalid)?;
        let minute = parse_field(minute, 2..=2, 59).ok_or_else(invalid)?;
        if let Some(second) = second {
            parse_field(second, 2..=2, 59).ok_or_else(invalid)?;
        }

        Ok(Self { hour, minute })
    }

    pub fn hour(self) -> u8 {
        self.hour
    }

    pub fn minute(self) -> u8 {
        self.minute
    }

    /// Minutes since local midnight; the sort key for same-day challenges.
    pub fn minute_of_day(self) -> u32 {
        self.hour as u32 * 60 + self.minute as u32
    }

    pub fn as_naive_time(self) -> NaiveTime {
        NaiveTime::from_hms_opt(self.hour as u32, self.minute as u32, 0).unwrap_or(NaiveTime::MIN)
    }
}

fn parse_field(raw: &str, width: std::ops::RangeInclusive<usize>, max: u8) -> Option<u8> {
    if !width.contains(&raw.len()) || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let n: u8 = raw.parse().ok()?;
    (n <= max).then_some(n)
}

impl fmt::Display for WakeTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl FromStr for WakeTime {
    type Err = ChallengeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for WakeTime {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for WakeTime {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_valid_times() {
        assert_eq!(WakeTime::parse("06:00").unwrap(), WakeTime::new(6, 0).unwrap());
        assert_eq!(WakeTime::parse("23:59").unwrap().minute_of_day(), 23 * 60 + 59);
        assert_eq!(WakeTime::parse("00:00").unwrap().minute_of_day(), 0);
        assert_eq!(WakeTime::parse("7:30").unwrap().to_string(), "07:30");
    }

    #[test]
    fn accepts_and_drops_seconds() {
        let t = WakeTime::parse("07:30:00").unwrap();
        assert_eq!(t.to_string(), "07:30");
        assert!(WakeTime::parse("07:30:60").is_err());
    }

    #[test]
    fn rejects_out_of_range_and_garbage() {
        for bad in ["25:99", "24:00", "12:60", "", "7", "07:5", "ab:cd", "-1:00", "07:00:00:00", "+7:00"] {
            assert_eq!(
                WakeTime::parse(bad),
                Err(ChallengeError::InvalidTimeFormat {
                    value: bad.to_string()
                }),
                "expected {bad:?} to be rejected"
            );
        }
    }

    #[test]
    fn new_validates_ranges() {
        assert!(WakeTime::new(23, 59).is_ok());
        assert!(WakeTime::new(24, 0).is_err());
        assert!(WakeTime::new(0, 60).is_err());
    }
}
