//! NumericDate (RFC 7519 Section 2): whole seconds since the UNIX epoch
//!
//! Serialized as a JSON integer. Deserialization also accepts JSON floats,
//! truncating the fractional part.

use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// Seconds since 1970-01-01T00:00:00Z
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NumericDate(i64);

impl NumericDate {
    pub const UNIX_EPOCH: NumericDate = NumericDate(0);

    pub const fn from_seconds(seconds: i64) -> Self {
        Self(seconds)
    }

    /// Current wall-clock time
    pub fn now() -> Self {
        Utc::now().into()
    }

    pub const fn as_seconds(self) -> i64 {
        self.0
    }

    /// Truncate a fractional timestamp toward zero
    ///
    /// Fails for NaN, infinities and values outside the `i64` range.
    pub fn from_f64(seconds: f64) -> Option<Self> {
        let whole = seconds.trunc();
        // i64::MAX as f64 rounds up to 2^63, hence the strict upper bound
        if whole.is_finite() && whole >= i64::MIN as f64 && whole < i64::MAX as f64 {
            Some(Self(whole as i64))
        } else {
            None
        }
    }

    pub fn checked_add(self, seconds: u64) -> Option<Self> {
        let seconds = i64::try_from(seconds).ok()?;
        self.0.checked_add(seconds).map(Self)
    }

    pub fn checked_sub(self, seconds: u64) -> Option<Self> {
        let seconds = i64::try_from(seconds).ok()?;
        self.0.checked_sub(seconds).map(Self)
    }

    /// `None` when outside chrono's representable range
    pub fn to_datetime(self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.0, 0)
    }

    /// Interpret a claim value as a NumericDate
    pub(crate) fn from_claim(claim: &str, value: &Value) -> Result<Self> {
        match value {
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(Self(i))
                } else if let Some(f) = n.as_f64() {
                    Self::from_f64(f).ok_or_else(|| {
                        Error::malformed_claim(claim, format!("timestamp {n} is out of range"))
                    })
                } else {
                    Err(Error::malformed_claim(
                        claim,
                        format!("timestamp {n} is out of range"),
                    ))
                }
            }
            other => Err(Error::malformed_claim(
                claim,
                format!("expected a numeric date, found {}", json_type(other)),
            )),
        }
    }
}

pub(crate) fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

impl fmt::Display for NumericDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for NumericDate {
    fn from(seconds: i64) -> Self {
        Self(seconds)
    }
}

impl From<NumericDate> for i64 {
    fn from(date: NumericDate) -> Self {
        date.0
    }
}

impl From<DateTime<Utc>> for NumericDate {
    /// Floors to the whole second
    fn from(dt: DateTime<Utc>) -> Self {
        Self(dt.timestamp())
    }
}

impl TryFrom<SystemTime> for NumericDate {
    type Error = Error;

    /// Floors to the whole second, also before the epoch
    fn try_from(time: SystemTime) -> Result<Self> {
        let out_of_range = || Error::malformed_claim("numeric date", "system time is out of range");
        match time.duration_since(UNIX_EPOCH) {
            Ok(after) => i64::try_from(after.as_secs())
                .map(Self)
                .map_err(|_| out_of_range()),
            Err(before) => {
                let before = before.duration();
                let secs = i64::try_from(before.as_secs()).map_err(|_| out_of_range())?;
                let floor = if before.subsec_nanos() > 0 {
                    secs.checked_add(1).ok_or_else(out_of_range)?
                } else {
                    secs
                };
                Ok(Self(-floor))
            }
        }
    }
}

impl Serialize for NumericDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.0)
    }
}

impl<'de> Deserialize<'de> for NumericDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_any(NumericDateVisitor)
    }
}

struct NumericDateVisitor;

impl<'de> Visitor<'de> for NumericDateVisitor {
    type Value = NumericDate;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("seconds since the UNIX epoch as a JSON number")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<NumericDate, E> {
        Ok(NumericDate(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<NumericDate, E> {
        i64::try_from(v)
            .map(NumericDate)
            .map_err(|_| E::custom(format!("timestamp {v} is out of range")))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> std::result::Result<NumericDate, E> {
        NumericDate::from_f64(v).ok_or_else(|| E::custom(format!("timestamp {v} is out of range")))
    }
}
