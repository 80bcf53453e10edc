//! In-process node
//!
//! Answers the node-identity and sync-status methods a UI needs while the
//! node is syncing. Batches are answered element-wise. State lives behind a
//! mutex so concurrent calls interleave safely.
//!
//! The node does not sync a chain itself: `eth_blockNumber`, `net_peerCount`
//! and `eth_syncing` report whatever the host's networking layer last fed to
//! `set_chain_head`, and stay at zero / `false` when nothing does.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use log::{info, warn};
use serde_json::{json, Value};

use super::NodeBackend;
use crate::error::{CallError, Result};
use crate::rpc::{
    batch_to_text, JsonRpcRequest, JsonRpcResponse, INTERNAL_ERROR, INVALID_PARAMS,
    INVALID_REQUEST, METHOD_NOT_FOUND, PARSE_ERROR,
};

#[derive(Debug, Default)]
struct ChainState {
    block_number: u64,
    peer_count: u64,
}

pub struct EmbeddedNode {
    network_id: String,
    client_version: String,
    chain: Mutex<ChainState>,
    started: AtomicBool,
    destroyed: AtomicBool,
}

impl EmbeddedNode {
    pub fn new(network_id: &str, client_version: &str) -> Self {
        Self {
            network_id: network_id.to_string(),
            client_version: client_version.to_string(),
            chain: Mutex::new(ChainState::default()),
            started: AtomicBool::new(false),
            destroyed: AtomicBool::new(false),
        }
    }

    /// Record sync progress reported by the host's networking layer.
    pub fn set_chain_head(&self, block_number: u64, peer_count: u64) {
        if let Ok(mut chain) = self.chain.lock() {
            chain.block_number = block_number;
            chain.peer_count = peer_count;
        }
    }

    /// Drop the node handle. Every later call is a transport failure.
    pub fn destroy(&self) {
        self.destroyed.store(true, Ordering::SeqCst);
    }

    fn handle(&self, request: &str) -> std::result::Result<String, CallError> {
        let value: Value = match serde_json::from_str(request) {
            Ok(v) => v,
            Err(e) => {
                warn!("Failed to parse request: {}", e);
                return Ok(
                    JsonRpcResponse::error(None, Value::Null, PARSE_ERROR, "Parse error").to_text(),
                );
            }
        };

        let chain = self
            .chain
            .lock()
            .map_err(|_| CallError::transport("node state poisoned"))?;

        match value {
            Value::Array(batch) if batch.is_empty() => Ok(JsonRpcResponse::error(
                None,
                Value::Null,
                INVALID_REQUEST,
                "Invalid request: empty batch",
            )
            .to_text()),
            Value::Array(batch) => {
                let responses: Vec<JsonRpcResponse> = batch
                    .into_iter()
                    .map(|request| self.respond(request, &chain))
                    .collect();
                Ok(batch_to_text(&responses))
            }
            request => Ok(self.respond(request, &chain).to_text()),
        }
    }

    fn respond(&self, value: Value, chain: &ChainState) -> JsonRpcResponse {
        let id = value.get("id").cloned().unwrap_or(Value::Null);
        let version = value
            .get("jsonrpc")
            .and_then(Value::as_str)
            .map(str::to_string);
        let request: JsonRpcRequest = match serde_json::from_value(value) {
            Ok(r) => r,
            Err(e) => {
                return JsonRpcResponse::error(
                    version,
                    id,
                    INVALID_REQUEST,
                    format!("Invalid request: {}", e),
                );
            }
        };

        let error = |code, message: String| {
            JsonRpcResponse::error(request.jsonrpc.clone(), request.id.clone(), code, message)
        };

        if !matches!(request.params, Value::Null | Value::Array(_) | Value::Object(_)) {
            return error(INVALID_PARAMS, "params must be an array or an object".to_string());
        }

        let result = match request.method.as_str() {
            "net_version" => json!(self.network_id),
            "eth_chainId" => match self.network_id.parse::<u64>() {
                Ok(id) => json!(format!("0x{:x}", id)),
                Err(_) => {
                    warn!("Network id {} has no numeric chain id", self.network_id);
                    return error(
                        INTERNAL_ERROR,
                        format!("network id {} is not numeric", self.network_id),
                    );
                }
            },
            "web3_clientVersion" => json!(self.client_version),
            "net_listening" => json!(true),
            "net_peerCount" => json!(format!("0x{:x}", chain.peer_count)),
            "eth_blockNumber" => json!(format!("0x{:x}", chain.block_number)),
            "eth_syncing" => {
                if chain.peer_count == 0 {
                    json!(false)
                } else {
                    json!({
                        "startingBlock": "0x0",
                        "currentBlock": format!("0x{:x}", chain.block_number),
                        "highestBlock": format!("0x{:x}", chain.block_number),
                    })
                }
            }
            _ => {
                let error_msg = format!("Unknown method: {}", request.method);
                warn!("{}", error_msg);
                return error(METHOD_NOT_FOUND, error_msg);
            }
        };

        JsonRpcResponse::result(&request, result)
    }
}

#[async_trait]
impl NodeBackend for EmbeddedNode {
    fn name(&self) -> &str {
        "embedded"
    }

    async fn start(&self) -> Result<()> {
        self.started.store(true, Ordering::SeqCst);
        info!("Embedded node started on network {}", self.network_id);
        Ok(())
    }

    async fn execute_rpc(&self, request: String) -> std::result::Result<String, CallError> {
        if self.destroyed.load(Ordering::SeqCst) {
            return Err(CallError::transport("node handle destroyed"));
        }
        if !self.started.load(Ordering::SeqCst) {
            return Err(CallError::transport("node not started"));
        }
        self.handle(&request)
    }

    async fn stop(&self) {
        self.started.store(false, Ordering::SeqCst);
        info!("Embedded node stopped");
    }
}
