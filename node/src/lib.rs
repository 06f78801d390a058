pub mod client;
pub mod config;
pub mod error;
pub mod model;
pub mod rest;
pub mod rpc;

pub use client::{DynNodeClient, NodeClient};
pub use config::{NodeConfig, RestConfig, RetryPolicy, RpcAuth, RpcConfig};
pub use error::{NodeError, NodeResult};
pub use model::{BlockInfo, TxStatus};
pub use rest::RestClient;
pub use rpc::RpcClient;
