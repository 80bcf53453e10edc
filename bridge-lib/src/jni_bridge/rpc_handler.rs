//! RPC handler for JNI bridge
//!
//! `callRpc` is the function the web-view bridge uses as its transport.
//! Response text, including RPC error payloads, is returned as-is.
//! Failures without a response are thrown as Java exceptions.

use super::types::*;
use crate::error::CallError;
use jni::objects::{JClass, JString};
use jni::sys::{jlong, jstring};
use jni::JNIEnv;
use log::error;
use std::ptr;

const NOT_READY_EXCEPTION: &str = "java/lang/IllegalStateException";
const TRANSPORT_EXCEPTION: &str = "java/io/IOException";

fn throw(env: &mut JNIEnv, class: &str, message: &str) -> jstring {
    if let Err(e) = env.throw_new(class, message) {
        error!("Failed to throw {}: {}", class, e);
    }
    ptr::null_mut()
}

/// JNI: Call RPC
///
/// Forwards the request text to the session's call bridge and returns the
/// node's response text.
#[no_mangle]
pub extern "C" fn Java_org_nodebridge_NodeBridgeNative_callRpc(
    mut env: JNIEnv,
    _class: JClass,
    handle: jlong,
    request_jstr: JString,
) -> jstring {
    let request: String = match env.get_string(&request_jstr) {
        Ok(s) => s.into(),
        Err(e) => {
            error!("Failed to read request: {}", e);
            return throw(&mut env, "java/lang/IllegalArgumentException", "unreadable request");
        }
    };

    let Some(session) = (unsafe { session_ref(handle) }) else {
        return throw(&mut env, NOT_READY_EXCEPTION, "session not initialized");
    };

    match session.bridge().call(&request) {
        Ok(response) => match env.new_string(response) {
            Ok(s) => s.into_raw(),
            Err(e) => {
                error!("Failed to create JString: {}", e);
                ptr::null_mut()
            }
        },
        Err(CallError::NotReady) => throw(&mut env, NOT_READY_EXCEPTION, "node not ready"),
        Err(e) => throw(&mut env, TRANSPORT_EXCEPTION, &e.to_string()),
    }
}
