//! Scalar leaf values.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, SecondsFormat, Utc};

/// A leaf value. `Null` is the marker used for absent values and array holes.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Scalar {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    DateTime(DateTime<Utc>),
    Binary(Vec<u8>),
}

impl Scalar {
    pub fn is_null(&self) -> bool {
        matches!(self, Scalar::Null)
    }

    /// Human readable name of the variant, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Scalar::Null => "null",
            Scalar::Bool(_) => "boolean",
            Scalar::Int(_) => "integer",
            Scalar::Float(_) => "float",
            Scalar::String(_) => "string",
            Scalar::DateTime(_) => "date/time",
            Scalar::Binary(_) => "binary",
        }
    }

    /// Display form of the value. `None` for `Null`.
    ///
    /// Date/times are written as RFC 3339 and binary values as base64.
    pub fn to_text(&self) -> Option<String> {
        match self {
            Scalar::Null => None,
            Scalar::Bool(b) => Some(b.to_string()),
            Scalar::Int(i) => Some(i.to_string()),
            Scalar::Float(f) => Some(f.to_string()),
            Scalar::String(s) => Some(s.clone()),
            Scalar::DateTime(dt) => Some(dt.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
            Scalar::Binary(bytes) => Some(STANDARD.encode(bytes)),
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Scalar::Int(i) => Some(*i),
            // i64::MAX as f64 rounds up to 2^63, which is already out of range.
            Scalar::Float(f) if f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64 => {
                Some(*f as i64)
            }
            Scalar::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::Float(f) => Some(*f),
            Scalar::Int(i) => Some(*i as f64),
            Scalar::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Scalar::Bool(b) => Some(*b),
            Scalar::String(s) => {
                let s = s.trim();
                if s.eq_ignore_ascii_case("true") {
                    Some(true)
                } else if s.eq_ignore_ascii_case("false") {
                    Some(false)
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    pub fn as_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            Scalar::DateTime(dt) => Some(*dt),
            Scalar::String(s) => DateTime::parse_from_rfc3339(s.trim())
                .ok()
                .map(|dt| dt.with_timezone(&Utc)),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<Vec<u8>> {
        match self {
            Scalar::Binary(bytes) => Some(bytes.clone()),
            Scalar::String(s) => STANDARD.decode(s.trim()).ok(),
            _ => None,
        }
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Scalar::Bool(value)
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::Int(value)
    }
}

impl From<i32> for Scalar {
    fn from(value: i32) -> Self {
        Scalar::Int(value as i64)
    }
}

impl From<u32> for Scalar {
    fn from(value: u32) -> Self {
        Scalar::Int(value as i64)
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Scalar::Float(value)
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::String(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Scalar::String(value)
    }
}

impl From<DateTime<Utc>> for Scalar {
    fn from(value: DateTime<Utc>) -> Self {
        Scalar::DateTime(value)
    }
}

impl From<Vec<u8>> for Scalar {
    fn from(value: Vec<u8>) -> Self {
        Scalar::Binary(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_to_text() {
        assert_eq!(Scalar::Null.to_text(), None);
        assert_eq!(Scalar::Int(42).to_text().as_deref(), Some("42"));
        assert_eq!(Scalar::Bool(true).to_text().as_deref(), Some("true"));
        assert_eq!(Scalar::Float(1.5).to_text().as_deref(), Some("1.5"));
        assert_eq!(
            Scalar::Binary(b"hello".to_vec()).to_text().as_deref(),
            Some("aGVsbG8=")
        );
        let dt = Utc.with_ymd_and_hms(2020, 1, 2, 3, 4, 5).unwrap();
        assert_eq!(
            Scalar::DateTime(dt).to_text().as_deref(),
            Some("2020-01-02T03:04:05Z")
        );
    }

    #[test]
    fn test_numeric_conversions() {
        assert_eq!(Scalar::from("12").as_i64(), Some(12));
        assert_eq!(Scalar::from(" 12 ").as_i64(), Some(12));
        assert_eq!(Scalar::from("1.5").as_i64(), None);
        assert_eq!(Scalar::Float(3.0).as_i64(), Some(3));
        assert_eq!(Scalar::Float(3.5).as_i64(), None);
        assert_eq!(Scalar::Int(2).as_f64(), Some(2.0));
        assert_eq!(Scalar::Bool(true).as_i64(), None);
    }

    #[test]
    fn test_float_to_integer_bounds() {
        assert_eq!(Scalar::Float(9.223372036854775807e18).as_i64(), None);
        assert_eq!(Scalar::Float(-9.223372036854775808e18).as_i64(), Some(i64::MIN));
        assert_eq!(Scalar::Float(9.007199254740992e15).as_i64(), Some(9_007_199_254_740_992));
        assert_eq!(Scalar::Float(f64::INFINITY).as_i64(), None);
        assert_eq!(Scalar::Float(f64::NAN).as_i64(), None);
    }

    #[test]
    fn test_bool_conversions() {
        assert_eq!(Scalar::from("TRUE").as_bool(), Some(true));
        assert_eq!(Scalar::from("false").as_bool(), Some(false));
        assert_eq!(Scalar::from("yes").as_bool(), None);
        assert_eq!(Scalar::Int(1).as_bool(), None);
    }

    #[test]
    fn test_datetime_from_string() {
        let parsed = Scalar::from("2020-01-02T05:04:05+02:00").as_datetime();
        assert_eq!(parsed, Some(Utc.with_ymd_and_hms(2020, 1, 2, 3, 4, 5).unwrap()));
        assert_eq!(Scalar::from("yesterday").as_datetime(), None);
    }

    #[test]
    fn test_bytes_from_string() {
        assert_eq!(Scalar::from("aGVsbG8=").as_bytes(), Some(b"hello".to_vec()));
        assert_eq!(Scalar::from("@@@").as_bytes(), None);
    }
}
