//! Session handles passed across JNI
//!
//! The Java side holds an opaque `long` that owns one boxed `AppSession`.
//! `0` is never a valid handle.

use crate::session::AppSession;
use jni::sys::jlong;

pub const NULL_HANDLE: jlong = 0;

/// Move the session to the heap and hand ownership to the caller.
pub fn into_handle(session: AppSession) -> jlong {
    Box::into_raw(Box::new(session)) as jlong
}

/// Borrow the session behind `handle`.
///
/// # Safety
///
/// `handle` must come from `into_handle` and not yet be passed to
/// `drop_handle`.
pub unsafe fn session_ref<'a>(handle: jlong) -> Option<&'a AppSession> {
    (handle as *const AppSession).as_ref()
}

/// Reclaim and drop the session behind `handle`.
///
/// # Safety
///
/// Same contract as `session_ref`; the handle is invalid afterwards.
pub unsafe fn drop_handle(handle: jlong) {
    if handle != NULL_HANDLE {
        drop(Box::from_raw(handle as *mut AppSession));
    }
}
