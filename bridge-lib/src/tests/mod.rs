use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::endpoint::{EndpointOptions, NodeRpcEndpoint};
use crate::error::{CallError, Result};
use crate::node::NodeBackend;

/// Assert that a bridge or endpoint call failed with the given `CallError` pattern.
macro_rules! assert_call_err {
    ($result:expr, $pattern:pat) => {
        match $result {
            Err($pattern) => {}
            other => panic!(
                "expected {}, got {:?}",
                stringify!($pattern),
                other
            ),
        }
    };
}

mod bridge;
mod endpoint;

/// Backend whose behavior is picked by the request text:
/// - `stall...`: never answers
/// - `panic...`: panics inside the node task
/// - `fail...`: transport failure
/// - anything else: `ok:` followed by the request
#[derive(Default)]
pub(crate) struct ScriptedNode {
    pub calls: AtomicUsize,
    pub fail_start: bool,
}

#[async_trait]
impl NodeBackend for ScriptedNode {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn start(&self) -> Result<()> {
        if self.fail_start {
            return Err(crate::error::Error::runtime("node failed to boot"));
        }
        Ok(())
    }

    async fn execute_rpc(&self, request: String) -> std::result::Result<String, CallError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if request.starts_with("stall") {
            std::future::pending::<()>().await;
        }
        if request.starts_with("panic") {
            panic!("node crashed on {}", request);
        }
        if request.starts_with("fail") {
            return Err(CallError::transport("node handle destroyed"));
        }
        Ok(format!("ok:{}", request))
    }
}

pub(crate) const SHORT_TIMEOUT: Duration = Duration::from_millis(50);

pub(crate) fn options(call_timeout: Duration) -> EndpointOptions {
    EndpointOptions {
        call_timeout,
        debug_mode: true,
    }
}

pub(crate) fn endpoint(node: Arc<dyn NodeBackend>) -> Arc<NodeRpcEndpoint> {
    let _ = env_logger::builder().is_test(true).try_init();
    Arc::new(NodeRpcEndpoint::new(node, options(SHORT_TIMEOUT)).unwrap())
}

pub(crate) fn running_endpoint(node: Arc<dyn NodeBackend>) -> Arc<NodeRpcEndpoint> {
    let endpoint = endpoint(node);
    endpoint.start().unwrap();
    endpoint
}
