use bitcoin::OutPoint;
use bitcoin::consensus::encode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum NodeError {
    #[error("node unavailable after {attempts} attempts: {last}")]
    Unavailable { attempts: u32, last: String },

    #[error("rpc error: {0}")]
    Rpc(#[from] bitcoincore_rpc::Error),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{0} not found")]
    NotFound(String),

    #[error("malformed transaction bytes: {0}")]
    MalformedTransaction(#[from] encode::Error),

    #[error("malformed node response: {0}")]
    MalformedResponse(String),

    #[error("outpoint {outpoint} points past the {outputs} outputs of its transaction")]
    OutputMissing { outpoint: OutPoint, outputs: usize },
}

pub type NodeResult<T> = std::result::Result<T, NodeError>;
