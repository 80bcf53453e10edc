use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use super::*;
use crate::cancel::CancelToken;
use crate::endpoint::NodeState;
use crate::node::EmbeddedNode;

#[test]
fn test_execute_before_start_is_not_ready() {
    let node = Arc::new(ScriptedNode::default());
    let endpoint = endpoint(node.clone());

    assert_eq!(endpoint.state(), NodeState::Init);
    assert_call_err!(endpoint.execute("{}"), CallError::NotReady);
    assert_eq!(node.calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_start_then_execute() {
    let endpoint = running_endpoint(Arc::new(ScriptedNode::default()));

    assert_eq!(endpoint.state(), NodeState::Running);
    assert_eq!(endpoint.execute("ping").unwrap(), "ok:ping");
}

#[test]
fn test_start_twice_is_rejected() {
    let endpoint = running_endpoint(Arc::new(ScriptedNode::default()));
    assert!(endpoint.start().is_err());
    assert_eq!(endpoint.state(), NodeState::Running);
}

#[test]
fn test_failed_boot_keeps_endpoint_closed() {
    let node = Arc::new(ScriptedNode {
        fail_start: true,
        ..Default::default()
    });
    let endpoint = endpoint(node);

    assert!(endpoint.start().is_err());
    assert_eq!(endpoint.state(), NodeState::Init);
    assert_call_err!(endpoint.execute("ping"), CallError::NotReady);
}

#[test]
fn test_stalled_node_times_out() {
    let endpoint = running_endpoint(Arc::new(ScriptedNode::default()));

    let started = Instant::now();
    assert_call_err!(endpoint.execute("stall"), CallError::TimedOut(_));
    assert!(started.elapsed() < Duration::from_secs(5));

    // The endpoint keeps serving after a timeout.
    assert_eq!(endpoint.execute("again").unwrap(), "ok:again");
}

#[test]
fn test_timeout_reports_configured_duration() {
    let endpoint = running_endpoint(Arc::new(ScriptedNode::default()));
    let timeout = Duration::from_millis(20);

    let result = endpoint.execute_with("stall", &CancelToken::new(), timeout);
    assert_eq!(result, Err(CallError::TimedOut(timeout)));
}

#[test]
fn test_cancel_token_releases_caller() {
    let endpoint = running_endpoint(Arc::new(ScriptedNode::default()));
    let token = CancelToken::new();

    let canceller = {
        let token = token.clone();
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(30));
            token.cancel();
        })
    };

    let result = endpoint.execute_with("stall", &token, Duration::from_secs(30));
    canceller.join().unwrap();
    assert_call_err!(result, CallError::Cancelled);
}

#[test]
fn test_stop_cancels_in_flight_calls() {
    let endpoint = running_endpoint(Arc::new(ScriptedNode::default()));

    let caller = {
        let endpoint = Arc::clone(&endpoint);
        thread::spawn(move || endpoint.execute_with("stall", &CancelToken::new(), Duration::from_secs(30)))
    };

    thread::sleep(Duration::from_millis(30));
    endpoint.stop();

    assert_call_err!(caller.join().unwrap(), CallError::Cancelled);
    assert_eq!(endpoint.state(), NodeState::Stopped);
    assert_call_err!(endpoint.execute("ping"), CallError::NotReady);
}

#[test]
fn test_stop_is_idempotent() {
    let endpoint = running_endpoint(Arc::new(ScriptedNode::default()));
    endpoint.stop();
    endpoint.stop();
    assert_eq!(endpoint.state(), NodeState::Stopped);
    assert!(endpoint.start().is_err());
}

#[test]
fn test_panicking_node_is_transport_failure() {
    let endpoint = running_endpoint(Arc::new(ScriptedNode::default()));

    assert_call_err!(endpoint.execute("panic"), CallError::TransportFailure(_));
    assert_eq!(endpoint.execute("ping").unwrap(), "ok:ping");
}

#[test]
fn test_node_transport_error_passes_through() {
    let endpoint = running_endpoint(Arc::new(ScriptedNode::default()));
    assert_eq!(
        endpoint.execute("fail"),
        Err(CallError::transport("node handle destroyed"))
    );
}

#[tokio::test]
async fn test_execute_from_async_context() {
    let endpoint = running_endpoint(Arc::new(EmbeddedNode::new("1", "test")));
    let response = endpoint
        .execute(r#"{"id":9,"method":"net_listening"}"#)
        .unwrap();
    assert_eq!(response, r#"{"id":9,"result":true}"#);
}

#[test]
fn test_destroyed_embedded_node_is_transport_failure() {
    let node = Arc::new(EmbeddedNode::new("1", "test"));
    let endpoint = running_endpoint(node.clone());

    node.destroy();
    let result = endpoint.execute(r#"{"id":1,"method":"net_version"}"#);
    assert!(result.unwrap_err().is_transport());
}
