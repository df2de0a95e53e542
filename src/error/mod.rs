// bitcoind-rpc/src/error/mod.rs
//
// Copyright (c) 2025 Arcella Team
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE>
// or the MIT license <LICENSE-MIT>, at your option.
// This file may not be copied, modified, or distributed
// except according to those terms.

//! Centralized error handling for bitcoind-rpc.
//!
//! Uses `thiserror` to define structured errors and `anyhow` for convenient propagation.
//! The RPC translator returns [`RpcError`], which has exactly three kinds:
//! transport, decode and remote. Everything above the translator (method table,
//! configuration, logging) returns `Result<T, BitcoindError>`, and the binary
//! uses `anyhow::Result<T>`.

use std::path::PathBuf;
use serde_json::Value;
use thiserror::Error;

use crate::rpc::protocol::Envelope;

/// Failure to obtain a well-formed HTTP 200 response from the daemon.
#[derive(Error, Debug)]
pub enum TransportError {
    /// The daemon answered with a status other than 200.
    #[error("HTTP {status}: {body}")]
    Status {
        status: u16,
        body: String,
    },

    /// Connection refused, timeout, TLS failure, etc.
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Failure reported by a non-HTTP transport.
    #[error("Transport failure: {0}")]
    Other(String),
}

impl TransportError {
    /// HTTP status code, when the daemon answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::Status { status, .. } => Some(*status),
            TransportError::Request(e) => e.status().map(|s| s.as_u16()),
            TransportError::Other(_) => None,
        }
    }

    /// Raw response body of a non-200 answer.
    pub fn body(&self) -> Option<&str> {
        match self {
            TransportError::Status { body, .. } => Some(body),
            _ => None,
        }
    }

    /// The daemon's `error` object embedded in a non-200 body, if any.
    ///
    /// bitcoind reports most failed calls as HTTP 500 (or 404 for unknown
    /// methods) with a regular envelope in the body. This only helps callers
    /// print a better diagnostic; the error stays a transport error.
    pub fn envelope_error(&self) -> Option<RemoteError> {
        let body = self.body()?;
        let envelope: Envelope = serde_json::from_str(body).ok()?;
        envelope.into_error()
    }
}

/// The daemon's `error` object, kept exactly as received.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteError {
    object: Value,
}

impl RemoteError {
    pub fn new(object: Value) -> Self {
        Self { object }
    }

    /// JSON-RPC error code (e.g. `-5` for "Block not found").
    pub fn code(&self) -> Option<i64> {
        self.object.get("code").and_then(Value::as_i64)
    }

    pub fn message(&self) -> Option<&str> {
        self.object.get("message").and_then(Value::as_str)
    }

    /// The full error value, including any extra fields.
    pub fn object(&self) -> &Value {
        &self.object
    }

    pub fn into_object(self) -> Value {
        self.object
    }
}

impl std::fmt::Display for RemoteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.code(), self.message()) {
            (Some(code), Some(message)) => write!(f, "{} (code {})", message, code),
            (None, Some(message)) => write!(f, "{}", message),
            _ => write!(f, "{}", self.object),
        }
    }
}

impl std::error::Error for RemoteError {}

/// Outcome of a failed `RpcClient::call`. Exactly one kind per call.
#[derive(Error, Debug)]
pub enum RpcError {
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// The 200 response body is not a JSON-RPC envelope.
    #[error("Response body is not valid JSON: {source}")]
    Decode {
        body: String,
        #[source]
        source: serde_json::Error,
    },

    /// The envelope carries a truthy `error` field.
    #[error("Remote error: {0}")]
    Remote(RemoteError),
}

impl RpcError {
    /// Daemon error code, looking into non-200 bodies as well.
    pub fn remote_code(&self) -> Option<i64> {
        match self {
            RpcError::Remote(e) => e.code(),
            RpcError::Transport(e) => e.envelope_error().and_then(|e| e.code()),
            RpcError::Decode { .. } => None,
        }
    }
}

/// The root error type for everything above the RPC translator.
#[derive(Error, Debug)]
pub enum BitcoindError {
    #[error(transparent)]
    Rpc(#[from] RpcError),

    /// The method is not in the method table.
    #[error("Unknown method: {0}")]
    UnknownMethod(String),

    #[error("Missing argument '{param}' for method '{method}'")]
    MissingArgument {
        method: String,
        param: String,
    },

    #[error("Method '{method}' takes at most {max} arguments, got {given}")]
    TooManyArguments {
        method: String,
        max: usize,
        given: usize,
    },

    /// An argument could not be coerced to the type the method expects.
    #[error("Invalid argument '{param}' for method '{method}': {reason}")]
    InvalidArgument {
        method: String,
        param: String,
        reason: String,
    },

    /// The daemon returned a result of an unexpected shape.
    #[error("Unexpected result from '{method}': {reason}")]
    UnexpectedResult {
        method: String,
        reason: String,
    },

    /// Malformed connection descriptor.
    #[error("Invalid DSN: {0}")]
    InvalidDsn(String),

    /// Configuration loading or parsing error.
    #[error("Config error: {0}")]
    Config(String),

    /// Failed to build the HTTP client.
    #[error("HTTP client error: {0}")]
    HttpClient(#[source] reqwest::Error),

    /// I/O error (file not found, permission denied, etc.).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// IO error with associated path for better diagnostics
    #[error("I/O error at {path:?}: {source}")]
    IoWithPath {
        source: std::io::Error,
        path: PathBuf,
    },

    /// General-purpose error for unexpected conditions.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl BitcoindError {
    pub fn io_with_path<E: Into<std::io::Error>>(path: PathBuf, source: E) -> Self {
        Self::IoWithPath {
            source: source.into(),
            path,
        }
    }
}

/// Convenient alias for `Result<T, BitcoindError>`.
pub type Result<T> = std::result::Result<T, BitcoindError>;

pub use anyhow::Result as AnyResult;
