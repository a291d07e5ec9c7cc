/// Typed field decoding from a JSON object
///
/// [`FieldReader`] pulls individual fields out of a request body, coercing
/// loosely typed input (`"15"` for an integer, `"true"` for a boolean) and
/// collecting one error per offending field instead of failing on the first.
///
/// In partial mode (PATCH) missing fields are skipped rather than reported as
/// required.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde_json::{Map, Value};
use validator::Validate;

use super::errors::{
    FieldErrors, BLANK, INVALID_BOOLEAN, INVALID_INTEGER, INVALID_NUMBER, INVALID_STRING, NULL,
    REQUIRED,
};

const TRUE_STRINGS: &[&str] = &["t", "T", "y", "Y", "yes", "Yes", "YES", "true", "True", "TRUE", "on", "On", "ON", "1"];
const FALSE_STRINGS: &[&str] = &["f", "F", "n", "N", "no", "No", "NO", "false", "False", "FALSE", "off", "Off", "OFF", "0"];

/// Field-by-field reader over a request body
#[derive(Debug)]
pub struct FieldReader<'a> {
    data: &'a Map<String, Value>,
    partial: bool,
    errors: FieldErrors,
}

impl<'a> FieldReader<'a> {
    pub fn new(data: &'a Map<String, Value>, partial: bool) -> Self {
        Self {
            data,
            partial,
            errors: FieldErrors::new(),
        }
    }

    /// Records an error on `field`
    pub fn reject(&mut self, field: &str, message: impl Into<String>) {
        self.errors.add(field, message);
    }

    fn raw(&mut self, field: &str, required: bool) -> Option<&'a Value> {
        match self.data.get(field) {
            None => {
                if required && !self.partial {
                    self.reject(field, REQUIRED);
                }
                None
            }
            Some(Value::Null) => {
                self.reject(field, NULL);
                None
            }
            Some(value) => Some(value),
        }
    }

    /// Non-blank string, surrounding whitespace trimmed
    pub fn string(&mut self, field: &str, required: bool) -> Option<String> {
        let text = self.text(field, required)?;
        let trimmed = text.trim();

        if trimmed.is_empty() {
            self.reject(field, BLANK);
            return None;
        }
        Some(trimmed.to_string())
    }

    /// Non-blank string kept exactly as sent
    pub fn password(&mut self, field: &str, required: bool) -> Option<String> {
        let text = self.text(field, required)?;

        if text.trim().is_empty() {
            self.reject(field, BLANK);
            return None;
        }
        Some(text)
    }

    fn text(&mut self, field: &str, required: bool) -> Option<String> {
        match self.raw(field, required)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => {
                self.reject(field, INVALID_STRING);
                None
            }
        }
    }

    pub fn boolean(&mut self, field: &str, required: bool) -> Option<bool> {
        let parsed = match self.raw(field, required)? {
            Value::Bool(b) => Some(*b),
            Value::String(s) if TRUE_STRINGS.contains(&s.as_str()) => Some(true),
            Value::String(s) if FALSE_STRINGS.contains(&s.as_str()) => Some(false),
            Value::Number(n) => match n.as_f64() {
                Some(v) if v == 1.0 => Some(true),
                Some(v) if v == 0.0 => Some(false),
                _ => None,
            },
            _ => None,
        };

        if parsed.is_none() {
            self.reject(field, INVALID_BOOLEAN);
        }
        parsed
    }

    /// Integer from a JSON integer, an integral float, or a numeric string
    pub fn integer(&mut self, field: &str, required: bool) -> Option<i64> {
        let parsed = match self.raw(field, required)? {
            Value::Number(n) => n.as_i64().or_else(|| integral_float(n.as_f64()?)),
            Value::String(s) => parse_integer(s.trim()),
            _ => None,
        };

        if parsed.is_none() {
            self.reject(field, INVALID_INTEGER);
        }
        parsed
    }

    /// Decimal from a JSON number or a numeric string, scale preserved
    pub fn decimal(&mut self, field: &str, required: bool) -> Option<Decimal> {
        let parsed = match self.raw(field, required)? {
            Value::Number(n) => parse_decimal(&n.to_string()),
            Value::String(s) => parse_decimal(s.trim()),
            _ => None,
        };

        if parsed.is_none() {
            self.reject(field, INVALID_NUMBER);
        }
        parsed
    }

    /// Errors collected so far
    pub fn into_errors(self) -> FieldErrors {
        self.errors
    }

    /// Runs the `validator` rules of `payload` and returns it if nothing failed
    pub fn finish<T: Validate>(mut self, payload: T) -> Result<T, FieldErrors> {
        if let Err(validation) = payload.validate() {
            self.errors.merge_validation(&validation);
        }

        self.errors.into_result().map(|()| payload)
    }
}

fn integral_float(value: f64) -> Option<i64> {
    (value.is_finite() && value.fract() == 0.0 && value.abs() < i64::MAX as f64)
        .then_some(value as i64)
}

/// Accepts `"15"` and `"15.0"`, rejects `"15.5"`
fn parse_integer(raw: &str) -> Option<i64> {
    let digits = match raw.split_once('.') {
        Some((whole, fraction)) if fraction.chars().all(|c| c == '0') => whole,
        Some(_) => return None,
        None => raw,
    };
    digits.parse().ok()
}

fn parse_decimal(raw: &str) -> Option<Decimal> {
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .ok()
}
