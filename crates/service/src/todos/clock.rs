use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};

/// `created_at` layout: UTC, seconds precision, no zone suffix.
pub const CREATED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Source of the current time, swapped out in tests.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Always reports the same instant.
#[derive(Clone, Copy, Debug)]
pub struct FixedClock(pub DateTime<Utc>);

impl FixedClock {
    /// Parse a `YYYY-MM-DD HH:MM:SS` UTC timestamp.
    pub fn parse(created_at: &str) -> Result<Self, chrono::ParseError> {
        let naive = NaiveDateTime::parse_from_str(created_at, CREATED_AT_FORMAT)?;
        Ok(Self(Utc.from_utc_datetime(&naive)))
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

pub fn format_created_at(at: DateTime<Utc>) -> String {
    at.format(CREATED_AT_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_clock_formats_back_to_input() {
        let clock = FixedClock::parse("2025-11-01 12:34:56").unwrap();
        assert_eq!(format_created_at(clock.now()), "2025-11-01 12:34:56");
    }

    #[test]
    fn system_clock_matches_layout() {
        let s = format_created_at(SystemClock.now());
        assert_eq!(s.len(), 19);
        assert_eq!(&s[4..5], "-");
        assert_eq!(&s[10..11], " ");
        assert_eq!(&s[13..14], ":");
    }
}
