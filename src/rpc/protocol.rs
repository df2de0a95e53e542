// bitcoind-rpc/src/rpc/protocol.rs
//
// Copyright (c) 2025 Arcella Team
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE>
// or the MIT license <LICENSE-MIT>, at your option.
// This file may not be copied, modified, or distributed
// except according to those terms.

//! JSON-RPC wire structures shared by the translator and the transports.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::RemoteError;

/// A remote procedure name plus its positional parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    method: String,
    params: Vec<Value>,
}

impl Command {
    pub fn new(method: impl Into<String>, params: Vec<Value>) -> Self {
        Self {
            method: method.into(),
            params,
        }
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn params(&self) -> &[Value] {
        &self.params
    }

    /// Wire form of this command with the given request id.
    pub fn to_request(&self, id: u64) -> RpcRequest<'_> {
        RpcRequest {
            method: &self.method,
            params: &self.params,
            id,
        }
    }
}

/// Request body posted to the daemon: `{"method": .., "params": [..], "id": ..}`.
#[derive(Serialize, Debug)]
pub struct RpcRequest<'a> {
    pub method: &'a str,
    pub params: &'a [Value],
    pub id: u64,
}

/// Raw HTTP answer handed back by a transport.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub status: u16,
    pub body: Vec<u8>,
}

impl Response {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Body as text; invalid UTF-8 is replaced.
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// JSON object wrapping every daemon reply.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct Envelope {
    #[serde(default)]
    pub result: Option<Value>,

    #[serde(default)]
    pub error: Option<Value>,

    #[serde(default)]
    pub id: Option<Value>,
}

impl Envelope {
    /// Decodes a reply body, which must be a JSON object.
    ///
    /// Struct deserialization alone would also fill the fields from a JSON
    /// array by position.
    pub fn from_slice(body: &[u8]) -> Result<Self, serde_json::Error> {
        match serde_json::from_slice::<Value>(body)? {
            object @ Value::Object(_) => serde_json::from_value(object),
            other => Err(serde::de::Error::custom(format!(
                "expected a JSON object, found {}",
                json_kind(&other)
            ))),
        }
    }

    /// The `error` field when it is truthy.
    pub fn into_error(self) -> Option<RemoteError> {
        self.error.filter(is_truthy).map(RemoteError::new)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Loose truthiness of a decoded JSON value.
///
/// `null`, `false`, `0`, `""`, `"0"`, `[]` and `{}` are falsy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !(s.is_empty() || s == "0"),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_wire_format() {
        let command = Command::new("getblockhash", vec![json!(100)]);
        let body = serde_json::to_value(command.to_request(7)).unwrap();
        assert_eq!(body, json!({"method": "getblockhash", "params": [100], "id": 7}));
    }

    #[test]
    fn test_empty_params_serialize_as_array() {
        let command = Command::new("getblockcount", vec![]);
        let body = serde_json::to_string(&command.to_request(1)).unwrap();
        assert_eq!(body, r#"{"method":"getblockcount","params":[],"id":1}"#);
    }

    #[test]
    fn test_truthiness() {
        for falsy in [json!(null), json!(false), json!(0), json!(0.0), json!(""), json!("0"), json!([]), json!({})] {
            assert!(!is_truthy(&falsy), "{} should be falsy", falsy);
        }
        for truthy in [json!(true), json!(-5), json!("x"), json!([0]), json!({"code": 0})] {
            assert!(is_truthy(&truthy), "{} should be truthy", truthy);
        }
    }

    #[test]
    fn test_envelope_missing_fields() {
        let envelope: Envelope = serde_json::from_str(r#"{"id": 3}"#).unwrap();
        assert!(envelope.result.is_none());
        assert!(envelope.into_error().is_none());
    }

    #[test]
    fn test_envelope_rejects_non_objects() {
        for body in ["[1, null, 7]", "[]", "512345", "null", "\"ok\""] {
            assert!(Envelope::from_slice(body.as_bytes()).is_err(), "{} should not decode", body);
        }
        let envelope = Envelope::from_slice(br#"{"result": 1, "error": null, "id": 7}"#).unwrap();
        assert_eq!(envelope.result, Some(json!(1)));
        assert_eq!(envelope.id, Some(json!(7)));
    }
}
