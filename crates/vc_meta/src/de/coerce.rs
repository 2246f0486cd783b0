//! Loose scalar conversions applied to input values by declared type.
//!
//! Strings are read by their leading numeric part, so `"12px"` is `12` and
//! `"abc"` is `0`. Structured values never convert to scalars: the
//! functions return `None` and the caller reports a type mismatch.

use alloc::format;
use alloc::string::String;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use vc_value::Value;

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
];

pub(super) fn to_string(value: &Value) -> Option<String> {
    Some(match value {
        Value::Null => String::new(),
        Value::Bool(true) => String::from("1"),
        Value::Bool(false) => String::new(),
        Value::Int(v) => format!("{v}"),
        Value::Float(v) => format!("{v}"),
        Value::String(v) => v.clone(),
        Value::Sequence(_) | Value::Mapping(_) => return None,
    })
}

pub(super) fn to_int(value: &Value) -> Option<i64> {
    Some(match value {
        Value::Null => 0,
        Value::Bool(v) => i64::from(*v),
        Value::Int(v) => *v,
        Value::Float(v) => *v as i64,
        Value::String(v) => {
            let number = numeric_prefix(v);
            number
                .parse::<i64>()
                .or_else(|_| number.parse::<f64>().map(|v| v as i64))
                .unwrap_or(0)
        }
        Value::Sequence(_) | Value::Mapping(_) => return None,
    })
}

pub(super) fn to_float(value: &Value) -> Option<f64> {
    Some(match value {
        Value::Null => 0.0,
        Value::Bool(v) => f64::from(u8::from(*v)),
        Value::Int(v) => *v as f64,
        Value::Float(v) => *v,
        Value::String(v) => numeric_prefix(v).parse::<f64>().unwrap_or(0.0),
        Value::Sequence(_) | Value::Mapping(_) => return None,
    })
}

/// Truthiness: only null, `false`, zero, `""`, `"0"` and empty containers
/// are false.
pub(super) fn to_bool(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(v) => *v,
        Value::Int(v) => *v != 0,
        Value::Float(v) => *v != 0.0,
        Value::String(v) => !(v.is_empty() || v == "0"),
        Value::Sequence(v) => !v.is_empty(),
        Value::Mapping(v) => !v.is_empty(),
    }
}

/// Numbers and numeric strings are Unix timestamps, other strings are
/// parsed as RFC 3339 or `YYYY-MM-DD[ HH:MM:SS]` in UTC.
pub(super) fn to_datetime(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::Int(v) => DateTime::from_timestamp(*v, 0),
        Value::Float(v) => from_float_timestamp(*v),
        Value::String(v) if is_numeric(v) => from_float_timestamp(v.trim().parse().ok()?),
        Value::String(v) => parse_datetime(v.trim()),
        _ => None,
    }
}

fn from_float_timestamp(timestamp: f64) -> Option<DateTime<Utc>> {
    if !timestamp.is_finite() {
        return None;
    }
    let secs = timestamp.floor();
    let nanos = ((timestamp - secs) * 1e9).round().min(999_999_999.0) as u32;
    DateTime::from_timestamp(secs as i64, nanos)
}

fn parse_datetime(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(datetime) = DateTime::parse_from_rfc3339(raw) {
        return Some(datetime.with_timezone(&Utc));
    }
    for format in DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Whether the whole string, up to surrounding whitespace, is a number.
fn is_numeric(raw: &str) -> bool {
    let raw = raw.trim();
    !raw.is_empty() && numeric_prefix(raw).len() == raw.len()
}

/// The longest prefix of `raw`, after leading whitespace, that reads as a
/// decimal number with optional sign, fraction and exponent.
fn numeric_prefix(raw: &str) -> &str {
    let raw = raw.trim_start();
    let bytes = raw.as_bytes();
    let digits = |from: usize| {
        bytes[from..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count()
    };

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let int_digits = digits(end);
    end += int_digits;

    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = digits(end + 1);
        if int_digits + frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }
    if int_digits + frac_digits == 0 {
        return "";
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let exp_digits = digits(exp);
        if exp_digits > 0 {
            end = exp + exp_digits;
        }
    }

    &raw[..end]
}

#[cfg(test)]
mod tests {
    use super::{is_numeric, numeric_prefix, to_bool, to_datetime, to_float, to_int, to_string};
    use alloc::vec;
    use chrono::{TimeZone, Utc};
    use vc_value::{Mapping, Value};

    #[test]
    fn numeric_prefixes() {
        assert_eq!(numeric_prefix("12px"), "12");
        assert_eq!(numeric_prefix("  -3.5e2x"), "-3.5e2");
        assert_eq!(numeric_prefix(".5"), ".5");
        assert_eq!(numeric_prefix("1e"), "1");
        assert_eq!(numeric_prefix("abc"), "");
        assert_eq!(numeric_prefix("-"), "");
        assert_eq!(numeric_prefix("."), "");

        assert!(is_numeric(" 42 "));
        assert!(is_numeric("1.5e3"));
        assert!(!is_numeric("42a"));
        assert!(!is_numeric(""));
    }

    #[test]
    fn scalar_casts() {
        assert_eq!(to_string(&Value::Int(1)).as_deref(), Some("1"));
        assert_eq!(to_string(&Value::Float(1.5)).as_deref(), Some("1.5"));
        assert_eq!(to_string(&Value::Bool(true)).as_deref(), Some("1"));
        assert_eq!(to_string(&Value::Bool(false)).as_deref(), Some(""));
        assert_eq!(to_string(&Value::Sequence(vec![])), None);

        assert_eq!(to_int(&Value::from("12px")), Some(12));
        assert_eq!(to_int(&Value::from("1e3")), Some(1000));
        assert_eq!(to_int(&Value::from("abc")), Some(0));
        assert_eq!(to_int(&Value::Float(-2.7)), Some(-2));
        assert_eq!(to_int(&Value::Bool(true)), Some(1));
        assert_eq!(to_int(&Value::Mapping(Mapping::new())), None);

        assert_eq!(to_float(&Value::from("2.5kg")), Some(2.5));
        assert_eq!(to_float(&Value::Int(3)), Some(3.0));
    }

    #[test]
    fn truthiness() {
        for falsy in [
            Value::Null,
            Value::Bool(false),
            Value::Int(0),
            Value::Float(0.0),
            Value::from(""),
            Value::from("0"),
            Value::Sequence(vec![]),
            Value::Mapping(Mapping::new()),
        ] {
            assert!(!to_bool(&falsy), "{falsy:?}");
        }
        for truthy in [
            Value::Int(-1),
            Value::from("false"),
            Value::from("0.0"),
            Value::Sequence(vec![Value::Null]),
        ] {
            assert!(to_bool(&truthy), "{truthy:?}");
        }
    }

    #[test]
    fn datetimes() {
        let noon = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();

        assert_eq!(to_datetime(&Value::Int(1_714_564_800)), Some(noon));
        assert_eq!(to_datetime(&Value::from("1714564800")), Some(noon));
        assert_eq!(to_datetime(&Value::from("2024-05-01T12:00:00Z")), Some(noon));
        assert_eq!(to_datetime(&Value::from("2024-05-01T14:00:00+02:00")), Some(noon));
        assert_eq!(to_datetime(&Value::from("2024-05-01 12:00:00")), Some(noon));
        assert_eq!(
            to_datetime(&Value::from("2024-05-01")),
            Some(Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap())
        );
        assert_eq!(
            to_datetime(&Value::Float(1_714_564_800.5)),
            Some(noon + chrono::Duration::milliseconds(500))
        );

        assert_eq!(to_datetime(&Value::from("yesterday")), None);
        assert_eq!(to_datetime(&Value::Bool(true)), None);
        assert_eq!(to_datetime(&Value::Sequence(vec![])), None);
    }
}
