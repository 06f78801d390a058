use crate::interval::Interval;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IntervalError {
    #[error("interval stop {1} precedes start {0}")]
    NegativeLength(u64, u64),

    #[error("interval {0} is not contained in frame {1}")]
    OutOfFrame(Interval, Interval),

    #[error("shifting interval {0} by {1} overflows the ordinal space")]
    Overflow(Interval, u64),
}

pub type IntervalResult<T> = std::result::Result<T, IntervalError>;
