//! Synchronous call bridge between a UI messaging channel and an embedded
//! node's RPC endpoint.
//!
//! The UI side sees one function, `text -> text`. Requests flow unmodified
//! through [`CallBridge`] to [`NodeRpcEndpoint`] and on to a [`NodeBackend`].
//! RPC errors come back as ordinary response text; only failures where no
//! response exists surface as [`CallError`].

#[cfg(test)]
#[macro_use]
mod tests;

pub mod bridge;
pub mod cancel;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod node;
pub mod rpc;
pub mod session;

// JNI bridge for Android
#[cfg(all(feature = "jni-bridge", target_os = "android"))]
pub mod jni_bridge;

pub use bridge::{BindingState, CallBridge, ChannelRegistration};
pub use cancel::CancelToken;
pub use config::BridgeConfig;
pub use endpoint::{EndpointOptions, NodeRpcEndpoint, NodeState};
pub use error::{CallError, Error, Result};
pub use node::NodeBackend;
pub use session::{AppSession, StatusListener};
