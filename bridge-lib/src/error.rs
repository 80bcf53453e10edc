use std::{fmt, result, time::Duration};

use thiserror::Error;

/// Construction and lifecycle failures.
#[derive(Error, Debug)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),
    #[error("runtime error: {0}")]
    Runtime(String),
    #[error("lifecycle error: {0}")]
    Lifecycle(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),
}

pub type Result<T> = result::Result<T, Error>;

impl Error {
    pub fn config<T: fmt::Display>(inner: T) -> Self {
        Self::Config(inner.to_string())
    }
    pub fn runtime<T: fmt::Display>(inner: T) -> Self {
        Self::Runtime(inner.to_string())
    }
    pub fn lifecycle<T: fmt::Display>(inner: T) -> Self {
        Self::Lifecycle(inner.to_string())
    }
}

/// Out-of-band failure of a single bridge call.
///
/// An RPC error reported by the node is *not* a `CallError`: it comes back as
/// an ordinary response payload. Only failures where no well-formed response
/// exists end up here.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CallError {
    #[error("node not ready")]
    NotReady,
    #[error("transport failure: {0}")]
    TransportFailure(String),
    #[error("node call timed out after {0:?}")]
    TimedOut(Duration),
    #[error("node call cancelled")]
    Cancelled,
}

impl CallError {
    pub fn transport<T: fmt::Display>(inner: T) -> Self {
        Self::TransportFailure(inner.to_string())
    }

    /// True when the call reached (or tried to reach) the node and failed
    /// structurally, as opposed to being refused by the readiness gate.
    pub fn is_transport(&self) -> bool {
        !matches!(self, Self::NotReady)
    }
}
