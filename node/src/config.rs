use crate::client::DynNodeClient;
use crate::error::NodeResult;
use crate::rest::RestClient;
use crate::rpc::RpcClient;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Fixed-delay retry policy applied to transient backend failures
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay_ms: u64,
}

impl RetryPolicy {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self { max_attempts: 10, delay_ms: 500 }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RpcAuth {
    #[default]
    None,
    UserPass {
        username: String,
        password: String,
    },
    Cookie {
        file: PathBuf,
    },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RpcConfig {
    pub url: String,
    #[serde(default)]
    pub auth: RpcAuth,
    #[serde(default)]
    pub retry: RetryPolicy,
}

impl RpcConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into(), auth: RpcAuth::default(), retry: RetryPolicy::default() }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestConfig {
    pub base_url: String,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default)]
    pub retry: RetryPolicy,
}

fn default_timeout_ms() -> u64 {
    10_000
}

impl RestConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self { base_url: base_url.into(), timeout_ms: default_timeout_ms(), retry: RetryPolicy::default() }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Backend selection for chain access
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeConfig {
    /// Bitcoin Core JSON-RPC endpoint
    Rpc(RpcConfig),
    /// Esplora-style block explorer REST endpoint
    Rest(RestConfig),
}

impl NodeConfig {
    /// Opens a client for the configured backend
    pub fn connect(&self) -> NodeResult<DynNodeClient> {
        match self {
            NodeConfig::Rpc(config) => Ok(Box::new(RpcClient::new(config)?)),
            NodeConfig::Rest(config) => Ok(Box::new(RestClient::new(config)?)),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            NodeConfig::Rpc(config) => format!("bitcoind rpc at {}", config.url),
            NodeConfig::Rest(config) => format!("esplora rest at {}", config.base_url),
        }
    }
}
