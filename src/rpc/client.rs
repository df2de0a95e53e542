// bitcoind-rpc/src/rpc/client.rs
//
// Copyright (c) 2025 Arcella Team
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE>
// or the MIT license <LICENSE-MIT>, at your option.
// This file may not be copied, modified, or distributed
// except according to those terms.

//! The JSON-RPC envelope translator.
//!
//! [`RpcClient::call`] turns a method name and positional parameters into a
//! [`Command`], hands it to the injected [`Transport`], and reduces the daemon's
//! reply to the `result` value or one of the three [`RpcError`] kinds.

use std::sync::Arc;
use serde_json::Value;

use crate::error::{RpcError, TransportError};
use crate::rpc::protocol::{Command, Envelope, Response};
use crate::rpc::transport::Transport;

/// Stateless translator around a shared transport.
///
/// Cloning is cheap; clones share the transport.
#[derive(Clone)]
pub struct RpcClient {
    transport: Arc<dyn Transport>,
}

impl RpcClient {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Calls `method` with `params` and returns the daemon's `result`.
    ///
    /// One request is sent per call, with no retries. The reply is checked in
    /// this order:
    ///
    /// 1. status other than 200 -> [`RpcError::Transport`] with status and body;
    /// 2. body that is not a JSON object -> [`RpcError::Decode`];
    /// 3. truthy `error` field -> [`RpcError::Remote`], even if `result` is set;
    /// 4. otherwise `result`, or `Value::Null` when it is absent.
    pub async fn call(&self, method: &str, params: Vec<Value>) -> Result<Value, RpcError> {
        let command = Command::new(method, params);
        let response = self.transport.send(&command).await?;
        tracing::trace!(method, status = response.status, "Translating response");
        translate(response)
    }

    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }
}

fn translate(response: Response) -> Result<Value, RpcError> {
    if response.status != 200 {
        return Err(TransportError::Status {
            status: response.status,
            body: response.body_text(),
        }
        .into());
    }

    let mut envelope = Envelope::from_slice(&response.body).map_err(|source| RpcError::Decode {
        body: response.body_text(),
        source,
    })?;

    let result = envelope.result.take();
    if let Some(error) = envelope.into_error() {
        tracing::debug!(code = ?error.code(), "Daemon returned an error");
        return Err(RpcError::Remote(error));
    }

    Ok(result.unwrap_or(Value::Null))
}
