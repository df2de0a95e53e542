// bitcoind-rpc/src/methods/coerce.rs
//
// Copyright (c) 2025 Arcella Team
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE>
// or the MIT license <LICENSE-MIT>, at your option.
// This file may not be copied, modified, or distributed
// except according to those terms.

//! Primitive coercions applied to method arguments before they are sent.

use serde_json::{Number, Value};

/// Target type of a single positional parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coerce {
    /// Sent unchanged.
    Any,
    String,
    Integer,
    Float,
    Bool,
}

impl Coerce {
    /// Converts `value`, or explains why it cannot be converted.
    pub fn apply(self, value: Value) -> Result<Value, String> {
        match self {
            Coerce::Any => Ok(value),
            Coerce::String => to_string(value).map(Value::String),
            Coerce::Integer => to_integer(value).map(Value::from),
            Coerce::Float => {
                let f = to_float(value)?;
                Number::from_f64(f)
                    .map(Value::Number)
                    .ok_or_else(|| format!("{} is not a finite number", f))
            }
            Coerce::Bool => to_bool(value).map(Value::Bool),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Coerce::Any => "any",
            Coerce::String => "string",
            Coerce::Integer => "integer",
            Coerce::Float => "float",
            Coerce::Bool => "bool",
        }
    }
}

fn to_string(value: Value) -> Result<String, String> {
    match value {
        Value::Null => Ok(String::new()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Number(n) => Ok(n.to_string()),
        Value::String(s) => Ok(s),
        other => Err(format!("expected a string, got {}", kind(&other))),
    }
}

fn to_integer(value: Value) -> Result<i64, String> {
    match value {
        Value::Null => Ok(0),
        Value::Bool(b) => Ok(i64::from(b)),
        Value::Number(n) => number_to_i64(&n),
        Value::String(s) => {
            let t = s.trim();
            if let Ok(i) = t.parse::<i64>() {
                return Ok(i);
            }
            match t.parse::<f64>() {
                Ok(f) => float_to_i64(f),
                Err(_) => Err(format!("'{}' is not a number", s)),
            }
        }
        other => Err(format!("expected an integer, got {}", kind(&other))),
    }
}

fn number_to_i64(n: &Number) -> Result<i64, String> {
    if let Some(i) = n.as_i64() {
        return Ok(i);
    }
    match n.as_f64() {
        Some(f) if n.is_f64() => float_to_i64(f),
        _ => Err(format!("{} is out of range", n)),
    }
}

/// Truncates toward zero.
fn float_to_i64(f: f64) -> Result<i64, String> {
    if f.is_finite() && f >= i64::MIN as f64 && f < i64::MAX as f64 {
        Ok(f.trunc() as i64)
    } else {
        Err(format!("{} is out of range", f))
    }
}

fn to_float(value: Value) -> Result<f64, String> {
    match value {
        Value::Null => Ok(0.0),
        Value::Bool(b) => Ok(if b { 1.0 } else { 0.0 }),
        Value::Number(n) => n.as_f64().ok_or_else(|| format!("{} is not representable", n)),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| format!("'{}' is not a number", s)),
        other => Err(format!("expected a number, got {}", kind(&other))),
    }
}

fn to_bool(value: Value) -> Result<bool, String> {
    match value {
        Value::Null => Ok(false),
        Value::Bool(b) => Ok(b),
        Value::Number(n) => Ok(n.as_f64().map_or(true, |f| f != 0.0)),
        Value::String(s) => {
            let t = s.trim();
            Ok(!(t.is_empty() || t == "0" || t.eq_ignore_ascii_case("false")))
        }
        other => Err(format!("expected a boolean, got {}", kind(&other))),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
