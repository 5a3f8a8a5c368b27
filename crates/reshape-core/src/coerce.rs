//! Best-effort conversion between scalar kinds
//!
//! Copyright (c) 2025 Reshape Team
//! Licensed under the Apache-2.0 license

use crate::types::ScalarKind;
use crate::value::SourceValue;
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Number, Value};

/// Coerce a looked-up value to `kind`
///
/// Node-sets are reduced to the first node's text before conversion.
/// Returns `None` when no conversion applies.
pub fn coerce(value: &SourceValue, kind: ScalarKind) -> Option<Value> {
    match value {
        SourceValue::Json(json) => coerce_json(json, kind),
        SourceValue::Nodes(_) => coerce_json(&Value::String(value.node_text()?), kind),
    }
}

/// Coerce a JSON value to `kind`
///
/// Objects, arrays and `null` never coerce to a scalar.
pub fn coerce_json(value: &Value, kind: ScalarKind) -> Option<Value> {
    match kind {
        ScalarKind::Boolean => to_boolean(value).map(Value::Bool),
        ScalarKind::Number => to_number(value).map(Value::Number),
        ScalarKind::Integer => to_integer(value).map(Value::from),
        ScalarKind::String => to_string(value).map(Value::String),
        ScalarKind::DateTime => to_date_time(value).map(Value::String),
    }
}

fn to_boolean(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_f64().map(|n| n != 0.0),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" => Some(true),
            "false" | "0" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

fn to_number(value: &Value) -> Option<Number> {
    match value {
        Value::Number(n) => Some(n.clone()),
        Value::String(s) => {
            let s = s.trim();
            if let Ok(integer) = s.parse::<i64>() {
                return Some(integer.into());
            }
            s.parse::<f64>().ok().and_then(Number::from_f64)
        }
        _ => None,
    }
}

fn to_integer(value: &Value) -> Option<i64> {
    let number = to_number(value)?;
    if let Some(integer) = number.as_i64() {
        return Some(integer);
    }
    let float = number.as_f64()?;
    (float.fract() == 0.0 && float >= i64::MIN as f64 && float < i64::MAX as f64).then_some(float as i64)
}

fn to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn to_date_time(value: &Value) -> Option<String> {
    let timestamp: DateTime<Utc> = match value {
        Value::String(s) => {
            let parsed = DateTime::parse_from_rfc3339(s.trim()).ok()?;
            return Some(parsed.to_rfc3339_opts(SecondsFormat::AutoSi, true));
        }
        Value::Number(n) => match n.as_i64() {
            Some(seconds) => DateTime::<Utc>::from_timestamp(seconds, 0)?,
            None => {
                let seconds = n.as_f64()?;
                let whole = seconds.floor();
                let nanos = ((seconds - whole) * 1e9).round() as u32;
                DateTime::<Utc>::from_timestamp(whole as i64, nanos.min(999_999_999))?
            }
        },
        _ => return None,
    };
    Some(timestamp.to_rfc3339_opts(SecondsFormat::AutoSi, true))
}
