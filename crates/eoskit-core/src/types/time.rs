use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::codec::{Pack, Reader, Unpack, Writer};
use crate::error::CoreError;

const DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Whole seconds since the Unix epoch, stored as a u32
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct TimePointSec(u32);

impl TimePointSec {
    pub const fn from_secs(secs: u32) -> Self {
        TimePointSec(secs)
    }

    pub fn secs(&self) -> u32 {
        self.0
    }

    /// Convert a UTC datetime, dropping everything below one second
    pub fn from_datetime(dt: DateTime<Utc>) -> Result<Self, CoreError> {
        u32::try_from(dt.timestamp())
            .map(TimePointSec)
            .map_err(|_| CoreError::validation(format!("time {dt} does not fit in 32 bits")))
    }

    pub fn now() -> Result<Self, CoreError> {
        Self::from_datetime(Utc::now())
    }

    pub fn to_datetime(&self) -> DateTime<Utc> {
        // Every u32 is a representable timestamp
        Utc.timestamp_opt(i64::from(self.0), 0)
            .single()
            .unwrap_or_default()
    }

    pub fn checked_add_secs(&self, secs: u32) -> Result<Self, CoreError> {
        self.0
            .checked_add(secs)
            .map(TimePointSec)
            .ok_or_else(|| CoreError::validation("expiration overflows 32-bit time"))
    }
}

impl fmt::Display for TimePointSec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_datetime().format(DATE_TIME_FORMAT))
    }
}

impl fmt::Debug for TimePointSec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TimePointSec({self})")
    }
}

impl FromStr for TimePointSec {
    type Err = CoreError;

    /// Parse `YYYY-MM-DDTHH:MM:SS` in UTC; fractional seconds and a trailing
    /// `Z` are accepted and dropped
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim_end_matches('Z');
        let whole = trimmed.split('.').next().unwrap_or(trimmed);
        let naive = NaiveDateTime::parse_from_str(whole, DATE_TIME_FORMAT)
            .map_err(|e| CoreError::validation(format!("invalid time '{s}': {e}")))?;
        Self::from_datetime(naive.and_utc())
    }
}

impl Pack for TimePointSec {
    fn pack(&self, w: &mut Writer) {
        self.0.pack(w);
    }
}

impl Unpack for TimePointSec {
    fn unpack(r: &mut Reader<'_>) -> Result<Self, CoreError> {
        Ok(TimePointSec(u32::unpack(r)?))
    }
}

impl Serialize for TimePointSec {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TimePointSec {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_roundtrip() {
        let t: TimePointSec = "2018-06-01T12:00:00".parse().unwrap();
        assert_eq!(t.secs(), 1527854400);
        assert_eq!(t.to_string(), "2018-06-01T12:00:00");
    }

    #[test]
    fn test_subsecond_precision_dropped() {
        let t: TimePointSec = "2018-06-01T12:00:00.500".parse().unwrap();
        assert_eq!(t.secs(), 1527854400);

        let dt = Utc.timestamp_opt(1527854400, 999_000_000).unwrap();
        assert_eq!(TimePointSec::from_datetime(dt).unwrap().secs(), 1527854400);
    }

    #[test]
    fn test_wire_form() {
        let t = TimePointSec::from_secs(0x5b11_3640);
        assert_eq!(t.to_packed(), vec![0x40, 0x36, 0x11, 0x5b]);
    }

    #[test]
    fn test_out_of_range() {
        assert!("1960-01-01T00:00:00".parse::<TimePointSec>().is_err());
        assert!(TimePointSec::from_secs(u32::MAX).checked_add_secs(1).is_err());
    }
}
