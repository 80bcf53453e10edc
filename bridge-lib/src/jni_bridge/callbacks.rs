//! JVM callback implementations
//!
//! Provides status callbacks for the session.

use crate::session::StatusListener;
use jni::objects::{GlobalRef, JValue};
use jni::JavaVM;
use log::error;

pub struct JvmStatusListener {
    vm: JavaVM,
    callback: GlobalRef,
}

impl JvmStatusListener {
    pub fn new(vm: JavaVM, callback: GlobalRef) -> Self {
        Self { vm, callback }
    }

    fn invoke(&self, status: &str, data: &str) -> anyhow::Result<()> {
        // Attach current thread to JVM
        let mut env = self.vm.attach_current_thread()?;

        let status_str = env.new_string(status)?;
        let data_str = env.new_string(data)?;

        // Call: void onStatusChange(String status, String data)
        env.call_method(
            self.callback.as_obj(),
            "onStatusChange",
            "(Ljava/lang/String;Ljava/lang/String;)V",
            &[JValue::Object(&status_str), JValue::Object(&data_str)],
        )?;

        Ok(())
    }
}

impl StatusListener for JvmStatusListener {
    fn on_status_change(&self, status: &str, data: &str) {
        if let Err(e) = self.invoke(status, data) {
            error!("Status callback failed for {}: {}", status, e);
        }
    }
}
