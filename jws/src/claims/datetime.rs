//! NumericDate claim values

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::ops::Add;

/// Seconds since the Unix epoch, as carried by `exp`, `nbf` and `iat`
///
/// Serializes as an integer. Deserializes from an integer, a float (the
/// fractional part is dropped) or a timezone-aware timestamp string such as
/// `2042-04-02T00:42:42.123456+0000` or RFC 3339.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct JwtDatetime(i64);

impl JwtDatetime {
    /// Current time, truncated to whole seconds
    #[must_use]
    pub fn now() -> Self {
        Self(Utc::now().timestamp())
    }

    /// From epoch seconds
    #[must_use]
    pub const fn from_timestamp(seconds: i64) -> Self {
        Self(seconds)
    }

    /// Epoch seconds
    #[must_use]
    pub const fn timestamp(self) -> i64 {
        self.0
    }

    /// As a UTC datetime; `None` when outside chrono's range
    #[must_use]
    pub fn to_datetime(self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.0, 0).single()
    }

    /// Parse a timezone-aware timestamp string
    ///
    /// Strings without an explicit offset are rejected: a naive time has no
    /// defined epoch value.
    pub fn parse_str(input: &str) -> Result<Self, String> {
        let parsed = DateTime::parse_from_rfc3339(input)
            .or_else(|_| DateTime::parse_from_str(input, "%Y-%m-%dT%H:%M:%S%.f%z"))
            .or_else(|_| DateTime::parse_from_str(input, "%Y-%m-%d %H:%M:%S%.f%z"))
            .map_err(|_| format!("'{input}' is not a timezone-aware datetime"))?;
        Ok(Self(parsed.timestamp()))
    }

    /// Convert a float timestamp, dropping the fractional part
    pub fn from_float(seconds: f64) -> Result<Self, String> {
        if !seconds.is_finite() || seconds < i64::MIN as f64 || seconds >= i64::MAX as f64 {
            return Err(format!("{seconds} is not a valid timestamp"));
        }
        #[allow(clippy::cast_possible_truncation)]
        let whole = seconds.trunc() as i64;
        Ok(Self(whole))
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for JwtDatetime {
    fn from(value: DateTime<Tz>) -> Self {
        Self(value.timestamp())
    }
}

impl Add<Duration> for JwtDatetime {
    type Output = JwtDatetime;

    fn add(self, rhs: Duration) -> Self::Output {
        Self(self.0.saturating_add(rhs.num_seconds()))
    }
}

impl fmt::Display for JwtDatetime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for JwtDatetime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.0)
    }
}

struct JwtDatetimeVisitor;

impl<'de> Visitor<'de> for JwtDatetimeVisitor {
    type Value = JwtDatetime;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("epoch seconds or a timezone-aware datetime string")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(JwtDatetime(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        i64::try_from(v)
            .map(JwtDatetime)
            .map_err(|_| E::custom(format!("{v} is out of range for a timestamp")))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        JwtDatetime::from_float(v).map_err(E::custom)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        JwtDatetime::parse_str(v).map_err(E::custom)
    }
}

impl<'de> Deserialize<'de> for JwtDatetime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(JwtDatetimeVisitor)
    }
}
