// bitcoind-rpc/src/methods/mod.rs
//
// Copyright (c) 2025 Arcella Team
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE>
// or the MIT license <LICENSE-MIT>, at your option.
// This file may not be copied, modified, or distributed
// except according to those terms.

//! Named daemon methods on top of the envelope translator.
//!
//! [`BitcoindRpc::invoke`] is the single entry point for every method in the
//! [`MethodTable`]: it looks the name up, builds the positional params from the
//! caller's arguments and forwards them to [`RpcClient::call`]. A few typed
//! helpers cover the calls the command-line summary needs.

use std::sync::Arc;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::RpcConfig;
use crate::error::{BitcoindError, Result as BitcoindResult};
use crate::rpc::{HttpTransport, RpcClient, Transport};

pub mod coerce;
pub mod table;

pub use coerce::Coerce;
pub use table::{parse_cli_value, MethodSpec, MethodTable, ParamDefault, ParamSpec};

/// Client for a bitcoind-compatible daemon.
#[derive(Clone)]
pub struct BitcoindRpc {
    client: RpcClient,
    table: Arc<MethodTable>,
}

impl BitcoindRpc {
    /// HTTP client for the daemon described by `config`.
    pub fn new(config: &RpcConfig) -> BitcoindResult<Self> {
        let transport = HttpTransport::from_config(config)?;
        Ok(Self::with_transport(Arc::new(transport)))
    }

    pub fn with_transport(transport: Arc<dyn Transport>) -> Self {
        Self {
            client: RpcClient::new(transport),
            table: Arc::new(MethodTable::builtin()),
        }
    }

    /// Replaces the method table.
    pub fn with_table(mut self, table: MethodTable) -> Self {
        self.table = Arc::new(table);
        self
    }

    pub fn table(&self) -> &MethodTable {
        &self.table
    }

    /// The underlying translator.
    pub fn client(&self) -> &RpcClient {
        &self.client
    }

    /// Calls a method from the table with positional arguments.
    pub async fn invoke(&self, method: &str, args: Vec<Value>) -> BitcoindResult<Value> {
        let spec = self
            .table
            .get(method)
            .ok_or_else(|| BitcoindError::UnknownMethod(method.to_string()))?;
        let params = spec.build_params(args)?;
        tracing::debug!(method, params = params.len(), "Invoking");
        Ok(self.client.call(method, params).await?)
    }

    /// Sends `params` unchanged, bypassing the table.
    pub async fn call_raw(&self, method: &str, params: Vec<Value>) -> BitcoindResult<Value> {
        Ok(self.client.call(method, params).await?)
    }

    pub async fn get_info(&self) -> BitcoindResult<Value> {
        self.invoke("getinfo", vec![]).await
    }

    pub async fn get_block_count(&self) -> BitcoindResult<u64> {
        let value = self.invoke("getblockcount", vec![]).await?;
        decode("getblockcount", value)
    }

    pub async fn get_block_hash(&self, height: u64) -> BitcoindResult<String> {
        let value = self.invoke("getblockhash", vec![Value::from(height)]).await?;
        decode("getblockhash", value)
    }

    /// Block as JSON (`verbose`) or as serialized hex.
    pub async fn get_block(&self, hash: &str, verbose: bool) -> BitcoindResult<Value> {
        self.invoke("getblock", vec![Value::from(hash), Value::Bool(verbose)]).await
    }
}

fn decode<T: DeserializeOwned>(method: &str, value: Value) -> BitcoindResult<T> {
    serde_json::from_value(value).map_err(|e| BitcoindError::UnexpectedResult {
        method: method.to_string(),
        reason: e.to_string(),
    })
}
