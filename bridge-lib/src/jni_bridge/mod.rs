//! JNI bridge for Android
//!
//! Exposes the application session to the host application's native module.
//!
//! ## Architecture
//!
//! - `types`: Session handle conversion (no process-wide statics)
//! - `lifecycle`: Init/start/stop/status/destroy
//! - `callbacks`: Status callback into the JVM
//! - `rpc_handler`: The `callRpc` bridge function
//!
//! ## State Machine
//!
//! - 0 (INIT): Initialized but not started
//! - 1 (RUNNING): Running
//! - 2 (STOPPED): Stopped
//!
//! ## Thread Model
//!
//! - JNI calls run on whatever thread the host dispatches them from
//! - Node work runs on the endpoint's own runtime threads
//! - Callbacks attach to the JVM as needed

pub mod callbacks;
pub mod lifecycle;
pub mod rpc_handler;
pub mod types;

// Re-export main entry points
pub use lifecycle::{
    Java_org_nodebridge_NodeBridgeNative_nativeDestroy,
    Java_org_nodebridge_NodeBridgeNative_nativeGetStatus,
    Java_org_nodebridge_NodeBridgeNative_nativeInit,
    Java_org_nodebridge_NodeBridgeNative_nativeStart,
    Java_org_nodebridge_NodeBridgeNative_nativeStop,
};

pub use rpc_handler::Java_org_nodebridge_NodeBridgeNative_callRpc;
