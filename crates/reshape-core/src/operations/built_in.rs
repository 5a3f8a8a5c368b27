//! Built-in operation implementations
//!
//! Copyright (c) 2025 Reshape Team
//! Licensed under the Apache-2.0 license

use super::{Case, OperationError};
use crate::jsonpath::JSONPath;
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use heck::ToLowerCamelCase;
use regex::Regex;
use serde_json::Value;
use std::fmt::Write;

type OpResult = Result<Value, OperationError>;

fn expect_string(value: Value) -> Result<String, OperationError> {
    match value {
        Value::String(s) => Ok(s),
        other => Err(OperationError::invalid_input("string", &other)),
    }
}

/// Upper- or lower-case a string
pub fn change_case(value: Value, to: Case) -> OpResult {
    let s = expect_string(value)?;
    Ok(Value::String(match to {
        Case::Upper => s.to_uppercase(),
        Case::Lower => s.to_lowercase(),
    }))
}

/// Negate a boolean
pub fn inverse(value: Value) -> OpResult {
    match value {
        Value::Bool(b) => Ok(Value::Bool(!b)),
        other => Err(OperationError::invalid_input("boolean", &other)),
    }
}

/// Convert `HH:MM:SS`, `MM:SS` or `SS` into whole seconds
///
/// A non-negative integer is already a seconds count, which is what a bare
/// `SS` source becomes after coercion to an integer field.
pub fn duration(value: Value) -> OpResult {
    let s = match value {
        Value::Number(n) if n.is_u64() => return Ok(Value::Number(n)),
        Value::Number(n) => match n.as_f64() {
            Some(f) if f >= 0.0 && f.fract() == 0.0 && f < u64::MAX as f64 => {
                return Ok(Value::from(f as u64))
            }
            _ => return Err(OperationError::Failed(format!("'{}' is not a whole number of seconds", n))),
        },
        other => expect_string(other)?,
    };
    let malformed = || OperationError::Failed(format!("malformed duration '{}'", s));

    let groups: Vec<&str> = s.trim().split(':').collect();
    if groups.len() > 3 {
        return Err(malformed());
    }

    let mut seconds: u64 = 0;
    for group in groups {
        if group.is_empty() || !group.bytes().all(|b| b.is_ascii_digit()) {
            return Err(malformed());
        }
        let part: u64 = group.parse().map_err(|_| malformed())?;
        seconds = seconds
            .checked_mul(60)
            .and_then(|total| total.checked_add(part))
            .ok_or_else(malformed)?;
    }

    Ok(Value::from(seconds))
}

/// Pick the array element with the greatest numeric `by` and return its `ret`
///
/// The first element wins ties. An empty array yields `null`.
pub fn max(value: Value, by: &JSONPath, ret: &JSONPath) -> OpResult {
    let elements = match value {
        Value::Array(elements) => elements,
        other => return Err(OperationError::invalid_input("array", &other)),
    };

    let mut best: Option<(f64, &Value)> = None;
    for element in &elements {
        let key = by
            .execute_single(element)
            .and_then(Value::as_f64)
            .ok_or_else(|| OperationError::Failed(format!("'{}' is not numeric on every element", by)))?;
        if best.map_or(true, |(current, _)| key > current) {
            best = Some((key, element));
        }
    }

    match best {
        None => Ok(Value::Null),
        Some((_, winner)) => ret
            .execute_single(winner)
            .cloned()
            .ok_or_else(|| OperationError::Failed(format!("'{}' is missing on the selected element", ret))),
    }
}

/// Replace every match of `regex` with `new`
pub fn replace(value: Value, regex: &Regex, new: &str) -> OpResult {
    let s = expect_string(value)?;
    Ok(Value::String(regex.replace_all(&s, new).into_owned()))
}

/// Split a string on a literal separator
pub fn split(value: Value, on: &str) -> OpResult {
    let s = expect_string(value)?;
    Ok(Value::Array(s.split(on).map(|part| Value::String(part.to_string())).collect()))
}

/// Join an array of strings with a literal separator
pub fn join(value: Value, on: &str) -> OpResult {
    let elements = match value {
        Value::Array(elements) => elements,
        other => return Err(OperationError::invalid_input("array", &other)),
    };

    let parts = elements
        .into_iter()
        .map(expect_string)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Value::String(parts.join(on)))
}

/// Reject strftime layouts chrono cannot interpret
pub fn check_time_layout(layout: &str) -> Result<(), String> {
    if StrftimeItems::new(layout).any(|item| matches!(item, Item::Error)) {
        return Err(format!("invalid strftime layout '{}'", layout));
    }
    Ok(())
}

/// Parse a timestamp with `format` and render it with `layout`
///
/// Zoned timestamps keep their offset. Formats without a zone parse as naive
/// date-times, and date-only formats as midnight.
pub fn time_parse(value: Value, format: &str, layout: &str) -> OpResult {
    let s = expect_string(value)?;
    let input = s.trim();
    let failed = || OperationError::Failed(format!("'{}' does not match format '{}'", input, format));

    let mut rendered = String::new();
    let written = if let Ok(zoned) = DateTime::parse_from_str(input, format) {
        write!(rendered, "{}", zoned.format(layout))
    } else if let Ok(naive) = NaiveDateTime::parse_from_str(input, format) {
        write!(rendered, "{}", naive.format(layout))
    } else if let Some(midnight) = NaiveDate::parse_from_str(input, format)
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
    {
        write!(rendered, "{}", midnight.format(layout))
    } else {
        return Err(failed());
    };

    written.map_err(|_| OperationError::Failed(format!("cannot render '{}' with layout '{}'", input, layout)))?;
    Ok(Value::String(rendered))
}

/// Parse a decimal string into an integer
pub fn string_to_integer(value: Value) -> OpResult {
    match value {
        Value::String(s) => s
            .trim()
            .parse::<i64>()
            .map(Value::from)
            .map_err(|_| OperationError::Failed(format!("'{}' is not a decimal integer", s))),
        Value::Number(n) if n.is_i64() || n.is_u64() => Ok(Value::Number(n)),
        other => Err(OperationError::invalid_input("string", &other)),
    }
}

/// Convert kebab-case or snake_case into camelCase
pub fn to_camel_case(value: Value) -> OpResult {
    let s = expect_string(value)?;
    Ok(Value::String(s.to_lower_camel_case()))
}

/// Strip surrounding whitespace
pub fn trim(value: Value) -> OpResult {
    let s = expect_string(value)?;
    Ok(Value::String(s.trim().to_string()))
}
