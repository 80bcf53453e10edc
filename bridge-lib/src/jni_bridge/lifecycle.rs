//! Lifecycle management for JNI bridge
//!
//! Implements init/start/stop/status/destroy around an owned session handle.

use super::callbacks::JvmStatusListener;
use super::types::*;
use crate::config::BridgeConfig;
use crate::session::AppSession;
use jni::objects::{JClass, JObject, JString};
use jni::sys::{jboolean, jint, jlong, JNI_FALSE, JNI_TRUE};
use jni::JNIEnv;
use log::{error, info, warn};

/// JNI: Initialize a session
///
/// Loads the TOML config, selects the node backend and binds the call bridge.
/// Returns the session handle, or 0 on failure. The node is not started yet;
/// call nativeStart() for that.
#[no_mangle]
pub extern "C" fn Java_org_nodebridge_NodeBridgeNative_nativeInit(
    mut env: JNIEnv,
    _class: JClass,
    config_path_jstr: JString,
    status_callback: JObject,
) -> jlong {
    // Initialize Android logger
    android_logger::init_once(
        android_logger::Config::default()
            .with_max_level(log::LevelFilter::Debug)
            .with_tag("node-call-bridge"),
    );

    let config_path: String = match env.get_string(&config_path_jstr) {
        Ok(s) => s.into(),
        Err(e) => {
            error!("Failed to get config path: {}", e);
            return NULL_HANDLE;
        }
    };

    info!("Loading config from: {}", config_path);
    let config = match BridgeConfig::load(&config_path) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load config: {}", e);
            return NULL_HANDLE;
        }
    };

    let mut session = match AppSession::init(config) {
        Ok(session) => session,
        Err(e) => {
            error!("Failed to initialize session: {}", e);
            return NULL_HANDLE;
        }
    };

    if !status_callback.is_null() {
        let vm = env.get_java_vm();
        let callback = env.new_global_ref(&status_callback);
        match vm.and_then(|vm| callback.map(|callback| (vm, callback))) {
            Ok((vm, callback)) => session.set_status_listener(JvmStatusListener::new(vm, callback)),
            Err(e) => warn!("Status callback unavailable: {}", e),
        }
    }

    info!("Session initialized successfully!");
    into_handle(session)
}

/// JNI: Start the node and activate the call bridge
#[no_mangle]
pub extern "C" fn Java_org_nodebridge_NodeBridgeNative_nativeStart(
    _env: JNIEnv,
    _class: JClass,
    handle: jlong,
) -> jboolean {
    let Some(session) = (unsafe { session_ref(handle) }) else {
        error!("nativeStart called with a null handle");
        return JNI_FALSE;
    };

    match session.start() {
        Ok(()) => JNI_TRUE,
        Err(e) => {
            error!("Failed to start session: {}", e);
            JNI_FALSE
        }
    }
}

/// JNI: Stop the session
///
/// Tears the bridge down, cancels in-flight calls and stops the node.
#[no_mangle]
pub extern "C" fn Java_org_nodebridge_NodeBridgeNative_nativeStop(
    _env: JNIEnv,
    _class: JClass,
    handle: jlong,
) -> jboolean {
    let Some(session) = (unsafe { session_ref(handle) }) else {
        warn!("nativeStop called with a null handle");
        return JNI_FALSE;
    };

    session.shutdown();
    JNI_TRUE
}

/// JNI: Get current status
///
/// Returns:
/// - 0 (INIT): Initialized but not started
/// - 1 (RUNNING): Running
/// - 2 (STOPPED): Stopped, or no session
#[no_mangle]
pub extern "C" fn Java_org_nodebridge_NodeBridgeNative_nativeGetStatus(
    _env: JNIEnv,
    _class: JClass,
    handle: jlong,
) -> jint {
    match unsafe { session_ref(handle) } {
        Some(session) => session.node_state().code() as jint,
        None => crate::endpoint::STATE_STOPPED as jint,
    }
}

/// JNI: Release the session. The handle must not be used afterwards.
///
/// The Java side owns this ordering: call `nativeStop` first, wait for every
/// `callRpc`, `nativeStart`, `nativeStop` and `nativeGetStatus` using the
/// handle to return, and issue none afterwards. A call still in flight when
/// the session is freed reads freed memory.
#[no_mangle]
pub extern "C" fn Java_org_nodebridge_NodeBridgeNative_nativeDestroy(
    _env: JNIEnv,
    _class: JClass,
    handle: jlong,
) {
    info!("Destroying session");
    unsafe { drop_handle(handle) };
}
