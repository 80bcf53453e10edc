use std::{fmt, fs, path::Path, result::Result as StdResult, str::FromStr, time::Duration};

use serde::{Deserialize, Serialize};

use crate::error::Result;

pub const DEFAULT_CALL_TIMEOUT_MS: u64 = 30_000;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct BridgeConfig {
    #[serde(default)]
    pub debug_mode: bool,
    #[serde(default)]
    pub developer_cluster: bool,
    #[serde(default)]
    pub webview_debug: bool,
    #[serde(default = "default_call_timeout_ms")]
    pub call_timeout_ms: u64,
    #[serde(default)]
    pub node: NodeConfig,
    #[serde(default)]
    pub network: NetworkConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    Embedded,
    Http,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct NodeConfig {
    #[serde(default = "default_backend")]
    pub backend: BackendKind,
    #[serde(default = "default_mainnet_url")]
    pub mainnet_url: String,
    #[serde(default = "default_dev_cluster_url")]
    pub dev_cluster_url: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct NetworkConfig {
    #[serde(default = "default_mainnet_id")]
    pub mainnet_id: String,
    #[serde(default = "default_dev_cluster_id")]
    pub dev_cluster_id: String,
    #[serde(default = "default_client_version")]
    pub client_version: String,
}

fn default_call_timeout_ms() -> u64 {
    DEFAULT_CALL_TIMEOUT_MS
}

fn default_backend() -> BackendKind {
    BackendKind::Embedded
}

fn default_mainnet_url() -> String {
    "http://127.0.0.1:8545".to_string()
}

fn default_dev_cluster_url() -> String {
    "http://127.0.0.1:8546".to_string()
}

fn default_mainnet_id() -> String {
    "1".to_string()
}

fn default_dev_cluster_id() -> String {
    "3".to_string()
}

fn default_client_version() -> String {
    format!("node-call-bridge/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            mainnet_url: default_mainnet_url(),
            dev_cluster_url: default_dev_cluster_url(),
        }
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            mainnet_id: default_mainnet_id(),
            dev_cluster_id: default_dev_cluster_id(),
            client_version: default_client_version(),
        }
    }
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            debug_mode: false,
            developer_cluster: false,
            webview_debug: false,
            call_timeout_ms: DEFAULT_CALL_TIMEOUT_MS,
            node: NodeConfig::default(),
            network: NetworkConfig::default(),
        }
    }
}

impl BridgeConfig {
    /// Load config from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(content.parse()?)
    }

    pub fn call_timeout(&self) -> Duration {
        Duration::from_millis(self.call_timeout_ms)
    }

    /// RPC url of the node environment selected by the developer-cluster flag.
    pub fn node_url(&self) -> &str {
        if self.developer_cluster {
            &self.node.dev_cluster_url
        } else {
            &self.node.mainnet_url
        }
    }

    /// Network id answered by `net_version` on the selected environment.
    pub fn network_id(&self) -> &str {
        if self.developer_cluster {
            &self.network.dev_cluster_id
        } else {
            &self.network.mainnet_id
        }
    }

    pub fn network_name(&self) -> &'static str {
        if self.developer_cluster {
            "dev-cluster"
        } else {
            "mainnet"
        }
    }
}

impl FromStr for BridgeConfig {
    type Err = toml::de::Error;
    fn from_str(s: &str) -> StdResult<Self, Self::Err> {
        toml::from_str(s)
    }
}

impl fmt::Display for BridgeConfig {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        toml::to_string_pretty(self)
            .map_err(|_| fmt::Error)
            .and_then(|s| write!(f, "{}", s))
    }
}

/// Resolve a build-config style flag: `"1"` and `"true"` enable it.
pub fn parse_flag(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true")
}
