//! Node backends
//!
//! A backend is the outbound black box behind the endpoint: it takes raw RPC
//! request text and produces raw response text. RPC-level failures are part
//! of the returned text; only transport-level failures are `Err`.

mod blocking;
mod embedded;
mod http;

pub use blocking::BlockingNode;
pub use embedded::EmbeddedNode;
pub use http::HttpNode;

use std::sync::Arc;

use async_trait::async_trait;
use log::info;

use crate::config::{BackendKind, BridgeConfig};
use crate::error::{CallError, Result};

#[async_trait]
pub trait NodeBackend: Send + Sync + 'static {
    /// Short backend name used in logs.
    fn name(&self) -> &str;

    /// Bring the node up. Called once, before any RPC is executed.
    async fn start(&self) -> Result<()> {
        Ok(())
    }

    /// Execute one RPC call and return the node's response text.
    async fn execute_rpc(&self, request: String) -> std::result::Result<String, CallError>;

    /// Release node resources. Called once at teardown.
    async fn stop(&self) {}
}

/// Build the backend selected by the configuration.
pub fn build_backend(config: &BridgeConfig) -> Result<Arc<dyn NodeBackend>> {
    let backend: Arc<dyn NodeBackend> = match config.node.backend {
        BackendKind::Embedded => Arc::new(EmbeddedNode::new(
            config.network_id(),
            &config.network.client_version,
        )),
        BackendKind::Http => Arc::new(HttpNode::new(config.node_url())?),
    };
    info!(
        "Selected {} node backend for {}",
        backend.name(),
        config.network_name()
    );
    Ok(backend)
}
