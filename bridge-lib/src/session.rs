//! Application session
//!
//! Owns the one node handle, its endpoint and the call bridge for a single
//! application run. Lifecycle mirrors the host's: `init` binds, `start`
//! brings the node up and activates the bridge, `shutdown` tears both down.

use std::sync::Arc;

use log::{error, info};

use crate::bridge::{CallBridge, ChannelRegistration};
use crate::config::BridgeConfig;
use crate::endpoint::{EndpointOptions, NodeRpcEndpoint, NodeState};
use crate::error::Result;
use crate::node::{self, NodeBackend};

/// Receives lifecycle notifications: `initialized`, `running`, `stopped`.
pub trait StatusListener: Send + Sync {
    fn on_status_change(&self, status: &str, data: &str);
}

impl<F> StatusListener for F
where
    F: Fn(&str, &str) + Send + Sync,
{
    fn on_status_change(&self, status: &str, data: &str) {
        self(status, data)
    }
}

pub struct AppSession {
    config: BridgeConfig,
    bridge: Arc<CallBridge>,
    endpoint: Arc<NodeRpcEndpoint>,
    listener: Option<Box<dyn StatusListener>>,
}

impl AppSession {
    /// Build the backend selected by `config` and bind it to a fresh bridge.
    pub fn init(config: BridgeConfig) -> Result<Self> {
        let node = node::build_backend(&config)?;
        Self::with_node(config, node)
    }

    /// Bind an explicitly provided backend.
    pub fn with_node(config: BridgeConfig, node: Arc<dyn NodeBackend>) -> Result<Self> {
        info!(
            "Initializing session (debug: {}, developer cluster: {})",
            config.debug_mode, config.developer_cluster
        );
        let bridge = Arc::new(CallBridge::new(config.debug_mode, config.developer_cluster));
        let endpoint = Arc::new(NodeRpcEndpoint::new(node, EndpointOptions::from(&config))?);
        bridge.bind(Arc::clone(&endpoint))?;

        Ok(Self {
            config,
            bridge,
            endpoint,
            listener: None,
        })
    }

    pub fn set_status_listener<L: StatusListener + 'static>(&mut self, listener: L) {
        self.listener = Some(Box::new(listener));
        self.notify("initialized");
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    pub fn bridge(&self) -> &Arc<CallBridge> {
        &self.bridge
    }

    pub fn node_state(&self) -> NodeState {
        self.endpoint.state()
    }

    pub fn registration(&self) -> ChannelRegistration {
        self.bridge.registration(self.config.webview_debug)
    }

    /// Start the node and begin serving bridge calls.
    pub fn start(&self) -> Result<()> {
        self.endpoint.start()?;
        if let Err(e) = self.bridge.activate() {
            error!("Failed to activate call bridge: {}", e);
            self.endpoint.stop();
            return Err(e);
        }
        self.notify("running");
        Ok(())
    }

    /// Tear the bridge down before the node so no call races the teardown.
    pub fn shutdown(&self) {
        self.bridge.tear_down();
        if self.endpoint.state() == NodeState::Stopped {
            return;
        }
        self.endpoint.stop();
        self.notify("stopped");
    }

    fn notify(&self, status: &str) {
        if let Some(listener) = &self.listener {
            listener.on_status_change(status, self.config.network_name());
        }
    }
}

impl Drop for AppSession {
    fn drop(&mut self) {
        self.shutdown();
    }
}
