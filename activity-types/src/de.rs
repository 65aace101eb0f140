//! Lenient decoders for backend fields.
//!
//! The backend is inconsistent about numeric fields: the same key may hold
//! `2`, `"2.00"` or `{ "source": "2.00", "parsedValue": 2 }` depending on the
//! endpoint. These helpers accept all three shapes.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

fn number_of(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        Value::Object(map) => map
            .get("parsedValue")
            .and_then(number_of)
            .or_else(|| map.get("source").and_then(number_of)),
        _ => None,
    }
}

pub(crate) fn opt_f64<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
    let value = Option::<Value>::deserialize(d)?;
    Ok(value.as_ref().and_then(number_of))
}

/// Integral value of `n` if it fits in `[min, max]`.
fn integral(n: f64, min: f64, max: f64) -> Option<f64> {
    (n.fract() == 0.0 && n >= min && n <= max).then_some(n)
}

pub(crate) fn opt_i64<'de, D: Deserializer<'de>>(d: D) -> Result<Option<i64>, D::Error> {
    match opt_f64(d)? {
        None => Ok(None),
        Some(n) => integral(n, i64::MIN as f64, i64::MAX as f64)
            .map(|n| Some(n as i64))
            .ok_or_else(|| D::Error::custom(format!("expected integer, got {n}"))),
    }
}

pub(crate) fn int<'de, D: Deserializer<'de>>(d: D) -> Result<i32, D::Error> {
    let value = Value::deserialize(d)?;
    number_of(&value)
        .and_then(|n| integral(n, i32::MIN as f64, i32::MAX as f64))
        .map(|n| n as i32)
        .ok_or_else(|| D::Error::custom(format!("expected integer, got {value}")))
}

/// Strings that the backend sometimes sends as bare numbers ("0" vs 0).
pub(crate) fn opt_text<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    let value = Option::<Value>::deserialize(d)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Deserialize)]
    struct Fields {
        #[serde(default, deserialize_with = "opt_f64")]
        hours: Option<f64>,
        #[serde(default, deserialize_with = "opt_i64")]
        count: Option<i64>,
        #[serde(default, deserialize_with = "opt_text")]
        flag: Option<String>,
    }

    #[test]
    fn accepts_wrapped_number() {
        let p: Fields =
            serde_json::from_value(json!({ "hours": { "source": "2.00", "parsedValue": 2 } }))
                .unwrap();
        assert_eq!(p.hours, Some(2.0));
    }

    #[test]
    fn accepts_numeric_string_and_plain_number() {
        let p: Fields = serde_json::from_value(json!({ "hours": "1.5", "count": 250 })).unwrap();
        assert_eq!(p.hours, Some(1.5));
        assert_eq!(p.count, Some(250));
    }

    #[test]
    fn missing_and_null_are_none() {
        let p: Fields = serde_json::from_value(json!({ "hours": null })).unwrap();
        assert_eq!(p.hours, None);
        assert_eq!(p.count, None);
        assert_eq!(p.flag, None);
    }

    #[test]
    fn fractional_count_is_rejected() {
        let result = serde_json::from_value::<Fields>(json!({ "count": 2.5 }));
        assert!(result.is_err());

        let p: Fields = serde_json::from_value(json!({ "count": "3.00" })).unwrap();
        assert_eq!(p.count, Some(3));
    }

    #[derive(Debug, Deserialize)]
    struct Code {
        #[serde(deserialize_with = "int")]
        code: i32,
    }

    #[test]
    fn int_rejects_fraction_and_overflow() {
        assert!(serde_json::from_value::<Code>(json!({ "code": 26.9 })).is_err());
        assert!(serde_json::from_value::<Code>(json!({ "code": 3_000_000_000u64 })).is_err());
        let code: Code = serde_json::from_value(json!({ "code": "26" })).unwrap();
        assert_eq!(code.code, 26);
    }

    #[test]
    fn text_accepts_number() {
        let p: Fields = serde_json::from_value(json!({ "flag": 1 })).unwrap();
        assert_eq!(p.flag.as_deref(), Some("1"));
    }
}
