use std::sync::Arc;

use async_trait::async_trait;

use super::NodeBackend;
use crate::error::CallError;

type RpcFn = dyn Fn(&str) -> anyhow::Result<String> + Send + Sync;

/// Adapts a synchronous native RPC function into a backend.
///
/// The function runs on the blocking pool, so an endpoint timeout releases
/// the caller even when the native call never returns.
pub struct BlockingNode {
    name: String,
    call: Arc<RpcFn>,
}

impl BlockingNode {
    pub fn new<F>(name: &str, call: F) -> Self
    where
        F: Fn(&str) -> anyhow::Result<String> + Send + Sync + 'static,
    {
        Self {
            name: name.to_string(),
            call: Arc::new(call),
        }
    }
}

#[async_trait]
impl NodeBackend for BlockingNode {
    fn name(&self) -> &str {
        &self.name
    }

    async fn execute_rpc(&self, request: String) -> Result<String, CallError> {
        let call = Arc::clone(&self.call);
        match tokio::task::spawn_blocking(move || call(&request)).await {
            Ok(Ok(response)) => Ok(response),
            Ok(Err(e)) => Err(CallError::transport(e)),
            Err(e) => Err(CallError::transport(format!("native call aborted: {}", e))),
        }
    }
}
