// bitcoind-rpc/src/rpc/mod.rs
//
// Copyright (c) 2025 Arcella Team
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE>
// or the MIT license <LICENSE-MIT>, at your option.
// This file may not be copied, modified, or distributed
// except according to those terms.

//! JSON-RPC plumbing: wire types, connection descriptor, transports and the
//! envelope translator.

pub mod client;
pub mod dsn;
pub mod protocol;
pub mod transport;

pub use client::RpcClient;
pub use dsn::Dsn;
pub use protocol::{Command, Envelope, Response};
pub use transport::{HttpTransport, Transport};
