use crate::interval::Interval;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// A contiguous run of satoshis with fully resolved provenance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Segment {
    /// Satoshis traced back to issuance, identified by absolute ordinal numbers
    Ordinals(Interval),
    /// Satoshis that entered circulation as miner fees collected by a coinbase
    Fee(u64),
}

impl Segment {
    pub fn len(&self) -> u64 {
        match self {
            Segment::Ordinals(interval) => interval.len(),
            Segment::Fee(count) => *count,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Display for Segment {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Segment::Ordinals(interval) => write!(f, "ordinals {}", interval),
            Segment::Fee(count) => write!(f, "fee {}", count),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segment_len_test() {
        assert_eq!(Segment::Ordinals(Interval::new(10, 25).unwrap()).len(), 15);
        assert_eq!(Segment::Fee(7).len(), 7);
        assert!(Segment::Fee(0).is_empty());
    }

    #[test]
    fn segment_json_shape() {
        let segment = Segment::Ordinals(Interval::new(10, 20).unwrap());
        assert_eq!(serde_json::to_string(&segment).unwrap(), r#"{"ordinals":{"start":10,"stop":20}}"#);
        assert_eq!(serde_json::to_string(&Segment::Fee(7)).unwrap(), r#"{"fee":7}"#);
    }
}
