//! Node RPC endpoint
//!
//! Owns the single node handle and executes raw RPC text against it. Calls
//! are synchronous at this boundary; internally each call runs on the
//! endpoint's own runtime, bounded by a timeout and raced against
//! cancellation, so a stuck node cannot hold the caller forever.
//!
//! ## State Machine
//!
//! - 0 (INIT): Constructed, node not started
//! - 1 (RUNNING): Node started, calls are served
//! - 2 (STOPPED): Teardown began, calls are refused

use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::mpsc;
use std::sync::Arc;
use std::time::Duration;

use log::{debug, error, info, warn};
use tokio::runtime::{Builder, Runtime};

use crate::cancel::CancelToken;
use crate::config::{BridgeConfig, DEFAULT_CALL_TIMEOUT_MS};
use crate::error::{CallError, Error, Result};
use crate::node::NodeBackend;

pub const STATE_INIT: u8 = 0;
pub const STATE_RUNNING: u8 = 1;
pub const STATE_STOPPED: u8 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeState {
    Init,
    Running,
    Stopped,
}

impl NodeState {
    fn from_code(code: u8) -> Self {
        match code {
            STATE_INIT => Self::Init,
            STATE_RUNNING => Self::Running,
            _ => Self::Stopped,
        }
    }

    pub fn code(self) -> u8 {
        match self {
            Self::Init => STATE_INIT,
            Self::Running => STATE_RUNNING,
            Self::Stopped => STATE_STOPPED,
        }
    }
}

impl fmt::Display for NodeState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            Self::Init => "initialized",
            Self::Running => "running",
            Self::Stopped => "stopped",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct EndpointOptions {
    pub call_timeout: Duration,
    /// Log request and response payloads at debug level.
    pub debug_mode: bool,
}

impl Default for EndpointOptions {
    fn default() -> Self {
        Self {
            call_timeout: Duration::from_millis(DEFAULT_CALL_TIMEOUT_MS),
            debug_mode: false,
        }
    }
}

impl From<&BridgeConfig> for EndpointOptions {
    fn from(config: &BridgeConfig) -> Self {
        Self {
            call_timeout: config.call_timeout(),
            debug_mode: config.debug_mode,
        }
    }
}

pub struct NodeRpcEndpoint {
    node: Arc<dyn NodeBackend>,
    runtime: Option<Runtime>,
    state: AtomicU8,
    teardown: CancelToken,
    options: EndpointOptions,
}

impl NodeRpcEndpoint {
    pub fn new(node: Arc<dyn NodeBackend>, options: EndpointOptions) -> Result<Self> {
        let runtime = Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("node-rpc")
            .enable_all()
            .build()
            .map_err(Error::runtime)?;

        Ok(Self {
            node,
            runtime: Some(runtime),
            state: AtomicU8::new(STATE_INIT),
            teardown: CancelToken::new(),
            options,
        })
    }

    pub fn state(&self) -> NodeState {
        NodeState::from_code(self.state.load(Ordering::SeqCst))
    }

    pub fn is_running(&self) -> bool {
        self.state() == NodeState::Running
    }

    pub fn node_name(&self) -> &str {
        self.node.name()
    }

    /// Run the node's initialization and start serving calls.
    pub fn start(&self) -> Result<()> {
        if self.state() != NodeState::Init {
            return Err(Error::lifecycle(format!(
                "cannot start node in state {}",
                self.state()
            )));
        }

        info!("Starting {} node...", self.node.name());
        let node = Arc::clone(&self.node);
        self.run_to_completion(async move { node.start().await })
            .map_err(Error::runtime)??;

        if self
            .state
            .compare_exchange(STATE_INIT, STATE_RUNNING, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(Error::lifecycle("node stopped while starting"));
        }
        info!("{} node running", self.node.name());
        Ok(())
    }

    /// Execute one call with the configured timeout.
    pub fn execute(&self, request: &str) -> std::result::Result<String, CallError> {
        self.execute_with(request, &CancelToken::new(), self.options.call_timeout)
    }

    /// Execute one call, bounded by `timeout` and aborted when `cancel` fires.
    pub fn execute_with(
        &self,
        request: &str,
        cancel: &CancelToken,
        timeout: Duration,
    ) -> std::result::Result<String, CallError> {
        if !self.is_running() {
            warn!("Node not running, current state: {}", self.state());
            return Err(CallError::NotReady);
        }
        if self.options.debug_mode {
            debug!("-> {}", request);
        }

        let node = Arc::clone(&self.node);
        let request = request.to_string();
        let teardown = self.teardown.clone();
        let cancel = cancel.clone();
        let outcome = self
            .run_to_completion(async move {
                tokio::select! {
                    _ = teardown.cancelled() => Err(CallError::Cancelled),
                    _ = cancel.cancelled() => Err(CallError::Cancelled),
                    res = tokio::time::timeout(timeout, node.execute_rpc(request)) => {
                        res.unwrap_or(Err(CallError::TimedOut(timeout)))
                    }
                }
            })
            .unwrap_or_else(|e| Err(CallError::transport(e)));

        match &outcome {
            Ok(response) if self.options.debug_mode => debug!("<- {}", response),
            Err(e) => warn!("Node call failed: {}", e),
            _ => {}
        }
        outcome
    }

    /// Stop serving calls, cancel in-flight ones and shut the node down.
    /// Idempotent.
    pub fn stop(&self) {
        let previous = self.state.swap(STATE_STOPPED, Ordering::SeqCst);
        if previous == STATE_STOPPED {
            return;
        }
        info!("Stopping {} node...", self.node.name());
        self.teardown.cancel();

        if previous == STATE_RUNNING {
            let node = Arc::clone(&self.node);
            if let Err(e) = self.run_to_completion(async move { node.stop().await }) {
                error!("Node shutdown failed: {}", e);
            }
        }
        info!("{} node stopped", self.node.name());
    }

    /// Drive `fut` on the endpoint runtime and block the calling thread until
    /// it yields. Safe to call from inside another async runtime.
    fn run_to_completion<F, T>(&self, fut: F) -> std::result::Result<T, String>
    where
        F: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        let runtime = self
            .runtime
            .as_ref()
            .ok_or_else(|| "runtime already shut down".to_string())?;
        let (tx, rx) = mpsc::sync_channel(1);
        runtime.spawn(async move {
            let _ = tx.send(fut.await);
        });
        // A panicking node task drops the sender without sending.
        rx.recv().map_err(|_| "node task aborted".to_string())
    }
}

impl Drop for NodeRpcEndpoint {
    fn drop(&mut self) {
        self.stop();
        if let Some(runtime) = self.runtime.take() {
            runtime.shutdown_background();
        }
    }
}
