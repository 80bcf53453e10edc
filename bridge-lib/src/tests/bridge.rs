use std::sync::Arc;
use std::thread;

use super::*;
use crate::bridge::{BindingState, CallBridge};
use crate::node::EmbeddedNode;

fn active_bridge(node: Arc<dyn NodeBackend>) -> Arc<CallBridge> {
    let bridge = Arc::new(CallBridge::new(false, false));
    bridge.bind(running_endpoint(node)).unwrap();
    bridge.activate().unwrap();
    bridge
}

#[test]
fn test_call_before_bind_is_not_ready() {
    let bridge = CallBridge::new(false, false);
    assert_eq!(bridge.state(), BindingState::Unbound);
    assert_call_err!(
        bridge.call(r#"{"id":1,"method":"net_version","params":[]}"#),
        CallError::NotReady
    );
}

#[test]
fn test_call_while_bound_is_not_ready() {
    let node = Arc::new(ScriptedNode::default());
    let bridge = CallBridge::new(false, false);
    bridge.bind(running_endpoint(node.clone())).unwrap();

    assert_eq!(bridge.state(), BindingState::Bound);
    assert_call_err!(bridge.call("ping"), CallError::NotReady);
    assert_eq!(node.calls.load(std::sync::atomic::Ordering::SeqCst), 0);
}

#[test]
fn test_activate_requires_running_endpoint() {
    let unbound = CallBridge::new(false, false);
    assert!(unbound.activate().is_err());

    let bridge = CallBridge::new(false, false);
    bridge.bind(endpoint(Arc::new(ScriptedNode::default()))).unwrap();
    assert!(bridge.activate().is_err());
    assert_eq!(bridge.state(), BindingState::Bound);
}

#[test]
fn test_second_bind_is_rejected() {
    let bridge = active_bridge(Arc::new(ScriptedNode::default()));
    let other = running_endpoint(Arc::new(ScriptedNode::default()));

    assert!(bridge.bind(other).is_err());
    assert_eq!(bridge.state(), BindingState::Active);
    assert_eq!(bridge.call("still").unwrap(), "ok:still");
}

#[test]
fn test_payload_passes_through_unchanged() {
    let bridge = active_bridge(Arc::new(ScriptedNode::default()));
    let request = "{ \"id\" : 1,\n \"method\":\"näive\", \"params\":[\"\u{1F600}\"] }  ";

    assert_eq!(bridge.call(request).unwrap(), format!("ok:{}", request));
}

#[test]
fn test_net_version_round_trip() {
    let bridge = active_bridge(Arc::new(EmbeddedNode::new("1", "test")));
    let response = bridge
        .call(r#"{"id":1,"method":"net_version","params":[]}"#)
        .unwrap();
    assert_eq!(response, r#"{"id":1,"result":"1"}"#);
}

#[test]
fn test_rpc_error_is_returned_as_payload() {
    let bridge = active_bridge(Arc::new(EmbeddedNode::new("1", "test")));
    let response = bridge
        .call(r#"{"jsonrpc":"2.0","id":42,"method":"eth_nope","params":[]}"#)
        .unwrap();
    assert_eq!(
        response,
        r#"{"jsonrpc":"2.0","id":42,"error":{"code":-32601,"message":"Unknown method: eth_nope"}}"#
    );
}

#[test]
fn test_transport_failure_is_out_of_band() {
    let bridge = active_bridge(Arc::new(ScriptedNode::default()));
    let err = bridge.call("fail").unwrap_err();

    assert!(err.is_transport());
    assert_eq!(err, CallError::transport("node handle destroyed"));
}

#[test]
fn test_tear_down_refuses_calls() {
    let bridge = active_bridge(Arc::new(ScriptedNode::default()));
    bridge.tear_down();
    bridge.tear_down();

    assert_eq!(bridge.state(), BindingState::TornDown);
    assert_call_err!(bridge.call("ping"), CallError::NotReady);
    assert!(bridge.activate().is_err());
}

#[test]
fn test_registration_before_binding() {
    let bridge = Arc::new(CallBridge::new(true, false));
    let registration = bridge.registration(true);
    assert!(registration.webview_debug);
    assert_call_err!(registration.call("early"), CallError::NotReady);

    bridge.bind(running_endpoint(Arc::new(ScriptedNode::default()))).unwrap();
    bridge.activate().unwrap();

    let call = registration.function();
    assert_eq!(call("late").unwrap(), "ok:late");
}

#[test]
fn test_concurrent_callers_each_get_one_response() {
    let node = Arc::new(ScriptedNode::default());
    let bridge = active_bridge(node.clone());

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let bridge = Arc::clone(&bridge);
            thread::spawn(move || bridge.call(&format!("req-{}", i)))
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        assert_eq!(handle.join().unwrap().unwrap(), format!("ok:req-{}", i));
    }
    assert_eq!(node.calls.load(std::sync::atomic::Ordering::SeqCst), 8);
}
