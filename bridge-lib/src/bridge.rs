//! Call bridge exposed to the UI messaging channel
//!
//! The bridge fixes the call shape the UI channel expects, a synchronous
//! `text -> text` function, and binds exactly one endpoint for the lifetime
//! of the application session. Payloads pass through untouched.
//!
//! Binding lifecycle: `Unbound -> Bound -> Active -> TornDown`. Only `Active`
//! serves calls; every other state answers `NotReady` immediately.

use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, OnceLock};

use log::{info, warn};

use crate::endpoint::NodeRpcEndpoint;
use crate::error::{CallError, Error, Result};

const UNBOUND: u8 = 0;
const BOUND: u8 = 1;
const ACTIVE: u8 = 2;
const TORN_DOWN: u8 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingState {
    Unbound,
    Bound,
    Active,
    TornDown,
}

impl BindingState {
    fn from_code(code: u8) -> Self {
        match code {
            UNBOUND => Self::Unbound,
            BOUND => Self::Bound,
            ACTIVE => Self::Active,
            _ => Self::TornDown,
        }
    }
}

impl fmt::Display for BindingState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            Self::Unbound => "unbound",
            Self::Bound => "bound",
            Self::Active => "active",
            Self::TornDown => "torn_down",
        };
        f.write_str(s)
    }
}

pub struct CallBridge {
    endpoint: OnceLock<Arc<NodeRpcEndpoint>>,
    state: AtomicU8,
    debug_mode: bool,
    developer_cluster: bool,
}

impl CallBridge {
    pub fn new(debug_mode: bool, developer_cluster: bool) -> Self {
        Self {
            endpoint: OnceLock::new(),
            state: AtomicU8::new(UNBOUND),
            debug_mode,
            developer_cluster,
        }
    }

    pub fn state(&self) -> BindingState {
        BindingState::from_code(self.state.load(Ordering::SeqCst))
    }

    pub fn debug_mode(&self) -> bool {
        self.debug_mode
    }

    pub fn developer_cluster(&self) -> bool {
        self.developer_cluster
    }

    /// Bind the endpoint this bridge serves for the rest of its life.
    pub fn bind(&self, endpoint: Arc<NodeRpcEndpoint>) -> Result<()> {
        if self.state() != BindingState::Unbound {
            return Err(Error::lifecycle(format!(
                "cannot bind bridge in state {}",
                self.state()
            )));
        }
        let node_name = endpoint.node_name().to_string();
        self.endpoint
            .set(endpoint)
            .map_err(|_| Error::lifecycle("bridge already bound to an endpoint"))?;
        self.transition(UNBOUND, BOUND)?;
        info!("Call bridge bound to {} node", node_name);
        Ok(())
    }

    /// Start serving calls. The bound endpoint must already be running.
    pub fn activate(&self) -> Result<()> {
        let endpoint = self
            .endpoint
            .get()
            .ok_or_else(|| Error::lifecycle("cannot activate an unbound bridge"))?;
        if !endpoint.is_running() {
            return Err(Error::lifecycle(format!(
                "endpoint is {}, expected running",
                endpoint.state()
            )));
        }
        self.transition(BOUND, ACTIVE)?;
        info!("Call bridge active");
        Ok(())
    }

    /// The channel function: forward request text, return response text.
    pub fn call(&self, request: &str) -> std::result::Result<String, CallError> {
        if self.state() != BindingState::Active {
            warn!("Call bridge not active, current state: {}", self.state());
            return Err(CallError::NotReady);
        }
        let endpoint = self.endpoint.get().ok_or(CallError::NotReady)?;
        endpoint.execute(request)
    }

    /// Stop serving calls. Terminal and idempotent.
    pub fn tear_down(&self) {
        if self.state.swap(TORN_DOWN, Ordering::SeqCst) != TORN_DOWN {
            info!("Call bridge torn down");
        }
    }

    /// Callable handed to the UI channel at startup. Usable before the bridge
    /// is bound; calls answer `NotReady` until it is active.
    pub fn registration(self: &Arc<Self>, webview_debug: bool) -> ChannelRegistration {
        let bridge = Arc::clone(self);
        ChannelRegistration {
            webview_debug,
            call: Arc::new(move |request: &str| bridge.call(request)),
        }
    }

    fn transition(&self, from: u8, to: u8) -> Result<()> {
        self.state
            .compare_exchange(from, to, Ordering::SeqCst, Ordering::SeqCst)
            .map(|_| ())
            .map_err(|current| {
                Error::lifecycle(format!(
                    "expected bridge state {}, found {}",
                    BindingState::from_code(from),
                    BindingState::from_code(current)
                ))
            })
    }
}

pub type ChannelFn = dyn Fn(&str) -> std::result::Result<String, CallError> + Send + Sync;

/// What the UI channel receives at startup: the call function and whether
/// the web-view should enable its debugging facilities.
#[derive(Clone)]
pub struct ChannelRegistration {
    pub webview_debug: bool,
    call: Arc<ChannelFn>,
}

impl ChannelRegistration {
    pub fn call(&self, request: &str) -> std::result::Result<String, CallError> {
        (self.call)(request)
    }

    pub fn function(&self) -> Arc<ChannelFn> {
        Arc::clone(&self.call)
    }
}

impl fmt::Debug for ChannelRegistration {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("ChannelRegistration")
            .field("webview_debug", &self.webview_debug)
            .finish_non_exhaustive()
    }
}
