use bitcoin::OutPoint;
use ordtrace_core::errors::IntervalError;
use ordtrace_node::NodeError;
use thiserror::Error;

/// Structural deviation between observed chain data and the layout
/// provenance tracking relies on
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Inconsistency {
    #[error("null previous outpoint outside a coinbase input configuration")]
    NullPrevoutInRegularTransaction,

    #[error("coinbase transaction has no containing block")]
    CoinbaseNotInChain,

    #[error("transaction is not the first transaction of its block")]
    CoinbaseIndexMismatch,

    #[error("inputs cover only {covered} of the {requested} requested satoshis")]
    UncoveredRange { covered: u64, requested: u64 },

    #[error("resolved segments sum to {resolved} satoshis, expected {target}")]
    LengthMismatch { resolved: u64, target: u64 },
}

#[derive(Error, Debug)]
pub enum TrackError {
    #[error(transparent)]
    Interval(#[from] IntervalError),

    #[error("requested range ends at {requested}, beyond the {available} satoshis of output {outpoint}")]
    RangeOverflow { outpoint: OutPoint, requested: u64, available: u64 },

    #[error("node error: {0}")]
    Node(#[from] NodeError),

    #[error("provenance inconsistency at {outpoint}: {kind}")]
    Inconsistency { outpoint: OutPoint, kind: Inconsistency },

    #[error("tracking cancelled")]
    Cancelled,
}

pub type TrackResult<T> = std::result::Result<T, TrackError>;
