use ordtrace_node::NodeError;
use ordtrace_track::TrackError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Node(#[from] NodeError),

    #[error(transparent)]
    Track(#[from] TrackError),

    #[error("cannot render output: {0}")]
    Render(#[from] serde_json::Error),

    #[error("cannot install signal handler: {0}")]
    Signal(#[from] ctrlc::Error),

    #[error("interrupted")]
    Interrupted,

    #[error("audit found {mismatches} structural mismatches in {blocks} blocks")]
    AuditFailed { blocks: u64, mismatches: u64 },
}

pub type CliResult<T> = std::result::Result<T, CliError>;
