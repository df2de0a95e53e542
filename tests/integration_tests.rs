// bitcoind-rpc/tests/integration_tests.rs
//
// Copyright (c) 2025 Arcella Team
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE>
// or the MIT license <LICENSE-MIT>, at your option.
// This file may not be copied, modified, or distributed
// except according to those terms.

//! End-to-end tests against a mock daemon.

use std::sync::Arc;
use std::time::Duration;

use serde_json::{json, Value};
use wiremock::matchers::{basic_auth, body_partial_json, method};
use wiremock::{Mock, MockServer, ResponseTemplate};

use bitcoind_rpc::rpc::HttpTransport;
use bitcoind_rpc::{BitcoindError, BitcoindRpc, Dsn, RpcClient, RpcConfig, RpcError, TransportError};

fn dsn_for(server: &MockServer) -> String {
    server.uri().replacen("http://", "http://rpcuser:rpcpassword@", 1)
}

fn client_for(server: &MockServer) -> RpcClient {
    let transport = HttpTransport::new(Dsn::parse(&dsn_for(server)).unwrap(), Some(Duration::from_secs(5))).unwrap();
    RpcClient::new(Arc::new(transport))
}

async fn daemon_answers(server: &MockServer, rpc_method: &str, status: u16, body: &str) {
    Mock::given(method("POST"))
        .and(basic_auth("rpcuser", "rpcpassword"))
        .and(body_partial_json(json!({"method": rpc_method})))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_block_count_result() {
    let server = MockServer::start().await;
    daemon_answers(&server, "getblockcount", 200, r#"{"result": 512345, "error": null, "id": 1}"#).await;

    let value = client_for(&server).call("getblockcount", vec![]).await.unwrap();
    assert_eq!(value, json!(512345));
}

#[tokio::test]
async fn test_block_not_found_remote_error() {
    let server = MockServer::start().await;
    daemon_answers(
        &server,
        "getblockhash",
        200,
        r#"{"result": null, "error": {"code": -5, "message": "Block not found"}, "id": 2}"#,
    )
    .await;

    let err = client_for(&server)
        .call("getblockhash", vec![json!(999999999)])
        .await
        .unwrap_err();

    match err {
        RpcError::Remote(remote) => {
            assert_eq!(remote.code(), Some(-5));
            assert_eq!(remote.message(), Some("Block not found"));
        }
        other => panic!("expected remote error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_unauthorized_transport_error() {
    let server = MockServer::start().await;
    daemon_answers(&server, "getinfo", 401, "Unauthorized").await;

    let err = client_for(&server).call("getinfo", vec![]).await.unwrap_err();
    match err {
        RpcError::Transport(TransportError::Status { status, body }) => {
            assert_eq!(status, 401);
            assert_eq!(body, "Unauthorized");
        }
        other => panic!("expected transport error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_wrong_credentials_are_rejected() {
    let server = MockServer::start().await;
    daemon_answers(&server, "getinfo", 200, r#"{"result": {}, "error": null, "id": 1}"#).await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized"))
        .mount(&server)
        .await;

    let dsn = server.uri().replacen("http://", "http://rpcuser:wrong@", 1);
    let rpc = BitcoindRpc::new(&RpcConfig::new(dsn)).unwrap();
    let err = rpc.get_info().await.unwrap_err();
    assert!(matches!(
        err,
        BitcoindError::Rpc(RpcError::Transport(TransportError::Status { status: 401, .. }))
    ));
}

#[tokio::test]
async fn test_not_json_decode_error() {
    let server = MockServer::start().await;
    daemon_answers(&server, "help", 200, "not json").await;

    let err = client_for(&server).call("help", vec![]).await.unwrap_err();
    assert!(matches!(err, RpcError::Decode { .. }));
}

#[tokio::test]
async fn test_summary_flow() {
    let server = MockServer::start().await;
    daemon_answers(&server, "getinfo", 200, r#"{"result": {"blocks": 120}, "error": null, "id": 1}"#).await;
    daemon_answers(&server, "getblockcount", 200, r#"{"result": 120, "error": null, "id": 2}"#).await;
    daemon_answers(&server, "getblockhash", 200, r#"{"result": "00aa", "error": null, "id": 3}"#).await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({"method": "getblock", "params": ["00aa", true]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": {"hash": "00aa", "tx": ["t1", "t2", "t3"]},
            "error": null,
            "id": 4
        })))
        .expect(1)
        .mount(&server)
        .await;

    let rpc = BitcoindRpc::new(&RpcConfig::new(dsn_for(&server))).unwrap();
    let info = rpc.get_info().await.unwrap();
    let count = rpc.get_block_count().await.unwrap();
    let hash = rpc.get_block_hash(count).await.unwrap();
    let block = rpc.get_block(&hash, true).await.unwrap();

    assert_eq!(info["blocks"], json!(120));
    assert_eq!(count, 120);
    assert_eq!(block["tx"].as_array().map(Vec::len), Some(3));
}

#[tokio::test]
async fn test_concurrent_calls_share_client() {
    let server = MockServer::start().await;
    daemon_answers(&server, "getconnectioncount", 200, r#"{"result": 8, "error": null, "id": 0}"#).await;

    let rpc = BitcoindRpc::new(&RpcConfig::new(dsn_for(&server))).unwrap();
    let mut tasks = Vec::new();
    for _ in 0..8 {
        let rpc = rpc.clone();
        tasks.push(tokio::spawn(async move { rpc.invoke("getconnectioncount", vec![]).await }));
    }
    for task in tasks {
        assert_eq!(task.await.unwrap().unwrap(), json!(8));
    }

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 8);
    let mut ids: Vec<u64> = requests
        .iter()
        .map(|r| serde_json::from_slice::<Value>(&r.body).unwrap()["id"].as_u64().unwrap())
        .collect();
    ids.sort_unstable();
    assert_eq!(ids, (1..=8).collect::<Vec<_>>());
}
