use crate::errors::{IntervalError, IntervalResult};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// A half-open range `[start, stop)` of satoshi positions.
///
/// The same type serves all three coordinate frames provenance tracking moves
/// between: absolute ordinal numbers, transaction-relative positions and
/// output-local positions. `stop == start` denotes the empty interval.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Interval {
    start: u64,
    stop: u64,
}

impl Interval {
    pub fn new(start: u64, stop: u64) -> IntervalResult<Self> {
        if stop < start {
            return Err(IntervalError::NegativeLength(start, stop));
        }
        Ok(Self { start, stop })
    }

    pub fn start(&self) -> u64 {
        self.start
    }

    pub fn stop(&self) -> u64 {
        self.stop
    }

    pub fn len(&self) -> u64 {
        self.stop - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.stop == self.start
    }

    /// Intersects two intervals. Returns `None` when they share no positions,
    /// including the case where they merely touch at an endpoint.
    pub fn overlap(&self, other: &Interval) -> Option<Interval> {
        let start = self.start.max(other.start);
        let stop = self.stop.min(other.stop);
        (start < stop).then_some(Interval { start, stop })
    }

    /// Re-bases the interval into the local frame of `frame`, subtracting
    /// `frame.start()` from both ends. The interval must be contained in the frame.
    pub fn translate(&self, frame: &Interval) -> IntervalResult<Interval> {
        if self.start < frame.start || self.stop > frame.stop {
            return Err(IntervalError::OutOfFrame(*self, *frame));
        }
        Ok(Interval { start: self.start - frame.start, stop: self.stop - frame.start })
    }

    /// Moves the interval `offset` positions upward, mapping local positions
    /// into an enclosing frame that begins at `offset`.
    pub fn shift(&self, offset: u64) -> IntervalResult<Interval> {
        let start = self.start.checked_add(offset).ok_or(IntervalError::Overflow(*self, offset))?;
        let stop = self.stop.checked_add(offset).ok_or(IntervalError::Overflow(*self, offset))?;
        Ok(Interval { start, stop })
    }
}

impl Display for Interval {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {})", self.start, self.stop)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn construction_test() {
        assert_eq!(Interval::new(0, 10).unwrap().len(), 10);
        assert!(Interval::new(3, 3).unwrap().is_empty());
        assert_eq!(Interval::new(5, 3), Err(IntervalError::NegativeLength(5, 3)));
    }

    #[test]
    fn overlap_test() {
        struct Test {
            name: &'static str,
            a: (u64, u64),
            b: (u64, u64),
            expected: Option<(u64, u64)>,
        }

        let tests = vec![
            Test { name: "identical", a: (0, 10), b: (0, 10), expected: Some((0, 10)) },
            Test { name: "nested", a: (0, 10), b: (2, 5), expected: Some((2, 5)) },
            Test { name: "partial", a: (0, 10), b: (5, 15), expected: Some((5, 10)) },
            Test { name: "touching endpoints", a: (0, 5), b: (5, 10), expected: None },
            Test { name: "disjoint", a: (0, 5), b: (6, 10), expected: None },
            Test { name: "empty operand", a: (3, 3), b: (0, 10), expected: None },
            Test { name: "both empty", a: (3, 3), b: (3, 3), expected: None },
        ];

        for t in tests {
            let a = Interval::new(t.a.0, t.a.1).unwrap();
            let b = Interval::new(t.b.0, t.b.1).unwrap();
            let expected = t.expected.map(|(start, stop)| Interval::new(start, stop).unwrap());
            assert_eq!(a.overlap(&b), expected, "test '{}' failed", t.name);
            assert_eq!(b.overlap(&a), expected, "test '{}' failed when commuted", t.name);
        }
    }

    #[test]
    fn translate_and_shift_test() {
        let frame = Interval::new(100, 200).unwrap();
        let inner = Interval::new(120, 150).unwrap();
        let local = inner.translate(&frame).unwrap();
        assert_eq!(local, Interval::new(20, 50).unwrap());
        assert_eq!(local.shift(100).unwrap(), inner);

        let straddling = Interval::new(90, 150).unwrap();
        assert_eq!(straddling.translate(&frame), Err(IntervalError::OutOfFrame(straddling, frame)));

        let high = Interval::new(u64::MAX - 5, u64::MAX).unwrap();
        assert_eq!(high.shift(10), Err(IntervalError::Overflow(high, 10)));
    }

    #[test]
    fn display_test() {
        assert_eq!(Interval::new(7, 12).unwrap().to_string(), "[7, 12)");
    }
}
