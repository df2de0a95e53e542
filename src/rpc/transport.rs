// bitcoind-rpc/src/rpc/transport.rs
//
// Copyright (c) 2025 Arcella Team
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE>
// or the MIT license <LICENSE-MIT>, at your option.
// This file may not be copied, modified, or distributed
// except according to those terms.

//! Transports deliver one [`Command`] to the daemon and return its raw [`Response`].
//!
//! A transport does not interpret the status code or the body; that is the job of
//! [`RpcClient`](crate::rpc::RpcClient). Non-200 answers are returned as ordinary
//! responses, only failures to get any answer are errors.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderValue, CONTENT_TYPE};
use reqwest::Client;

use crate::config::RpcConfig;
use crate::error::{BitcoindError, Result as BitcoindResult, TransportError};
use crate::rpc::dsn::Dsn;
use crate::rpc::protocol::{Command, Response};

/// Sends a single command and returns the daemon's raw answer.
///
/// Implementations must be safe to share between tasks.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, command: &Command) -> Result<Response, TransportError>;
}

/// Authenticated JSON-RPC over HTTP POST.
#[derive(Debug)]
pub struct HttpTransport {
    client: Client,
    dsn: Dsn,
    next_id: AtomicU64,
}

impl HttpTransport {
    pub fn new(dsn: Dsn, timeout: Option<Duration>) -> BitcoindResult<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(BitcoindError::HttpClient)?;
        Ok(Self::with_client(client, dsn))
    }

    pub fn from_config(config: &RpcConfig) -> BitcoindResult<Self> {
        Self::new(Dsn::parse(&config.dsn)?, config.timeout())
    }

    /// Uses a preconfigured `reqwest` client (proxy, TLS roots, pool size, ...).
    pub fn with_client(client: Client, dsn: Dsn) -> Self {
        Self {
            client,
            dsn,
            next_id: AtomicU64::new(1),
        }
    }

    pub fn dsn(&self) -> &Dsn {
        &self.dsn
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, command: &Command) -> Result<Response, TransportError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(method = command.method(), id, endpoint = %self.dsn, "Sending JSON-RPC request");

        let body = serde_json::to_vec(&command.to_request(id))
            .map_err(|e| TransportError::Other(format!("cannot serialize request: {}", e)))?;

        let mut request = self
            .client
            .post(self.dsn.endpoint().clone())
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .body(body);

        if let Some(user) = self.dsn.user() {
            request = request.basic_auth(user, self.dsn.password());
        }

        let response = request.send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?;
        tracing::trace!(method = command.method(), id, status, bytes = body.len(), "Received response");

        Ok(Response::new(status, body.to_vec()))
    }
}
