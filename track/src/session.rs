use bitcoin::{OutPoint, Transaction, Txid};
use ordtrace_core::{Interval, Segment};
use std::collections::HashMap;
use std::sync::Arc;

/// A pending unit of provenance work: resolve `range` of the output at
/// `outpoint` into segments.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorkItem {
    pub outpoint: OutPoint,
    /// Output-local range to resolve; `None` means the whole output
    pub range: Option<Interval>,
    /// Distance from the seed item in spend hops
    pub depth: u32,
}

/// Per-session memo of fetched transactions. Ensures a transaction is
/// fetched from the node at most once per tracking run.
#[derive(Default)]
pub(crate) struct TxCache {
    entries: HashMap<Txid, Arc<Transaction>>,
}

impl TxCache {
    pub(crate) fn get_or_fetch<E>(
        &mut self,
        txid: Txid,
        fetch: impl FnOnce(&Txid) -> Result<Transaction, E>,
    ) -> Result<Arc<Transaction>, E> {
        if let Some(tx) = self.entries.get(&txid) {
            return Ok(tx.clone());
        }
        let tx = Arc::new(fetch(&txid)?);
        self.entries.insert(txid, tx.clone());
        Ok(tx)
    }
}

/// Resolution state snapshot of a session
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Progress {
    /// Satoshis already resolved into segments
    pub resolved: u64,
    /// Total satoshis the session set out to resolve, once known
    pub target: Option<u64>,
    /// Work items still on the roadmap
    pub pending_items: usize,
}

/// State of a single provenance run: the roadmap of pending work items, the
/// segments resolved so far and the per-run transaction cache.
///
/// The roadmap is a stack: expanding an item replaces it with its children,
/// so pending state grows with the depth of the spend graph, not its breadth.
pub struct TrackSession {
    root: OutPoint,
    roadmap: Vec<WorkItem>,
    resolved: Vec<Segment>,
    resolved_len: u64,
    target: Option<u64>,
    max_depth: u32,
    pub(crate) cache: TxCache,
}

impl TrackSession {
    /// Opens a session over a single seed item. The target length is fixed
    /// immediately for an explicit range and deferred to the first resolution
    /// step otherwise, since the output's value is not yet known.
    pub fn seed(outpoint: OutPoint, range: Option<Interval>) -> Self {
        Self {
            root: outpoint,
            roadmap: vec![WorkItem { outpoint, range, depth: 0 }],
            resolved: Vec::new(),
            resolved_len: 0,
            target: range.map(|range| range.len()),
            max_depth: 0,
            cache: TxCache::default(),
        }
    }

    pub fn root(&self) -> OutPoint {
        self.root
    }

    pub fn target(&self) -> Option<u64> {
        self.target
    }

    pub(crate) fn set_target(&mut self, target: u64) {
        self.target = Some(target);
    }

    pub(crate) fn pop(&mut self) -> Option<WorkItem> {
        self.roadmap.pop()
    }

    pub(crate) fn push(&mut self, item: WorkItem) {
        self.max_depth = self.max_depth.max(item.depth);
        self.roadmap.push(item);
    }

    pub(crate) fn push_segment(&mut self, segment: Segment) {
        self.resolved_len += segment.len();
        self.resolved.push(segment);
    }

    pub fn progress(&self) -> Progress {
        Progress { resolved: self.resolved_len, target: self.target, pending_items: self.roadmap.len() }
    }

    /// Deepest spend hop the run has reached
    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    pub fn segments(&self) -> &[Segment] {
        &self.resolved
    }

    pub fn into_segments(self) -> Vec<Segment> {
        self.resolved
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bitcoin::hashes::Hash;

    fn outpoint(byte: u8, vout: u32) -> OutPoint {
        OutPoint { txid: Txid::from_byte_array([byte; 32]), vout }
    }

    #[test]
    fn seed_with_explicit_range_fixes_target() {
        let session = TrackSession::seed(outpoint(1, 0), Some(Interval::new(10, 60).unwrap()));
        assert_eq!(session.target(), Some(50));
        assert_eq!(session.progress(), Progress { resolved: 0, target: Some(50), pending_items: 1 });
    }

    #[test]
    fn seed_without_range_defers_target() {
        let session = TrackSession::seed(outpoint(1, 0), None);
        assert_eq!(session.target(), None);
    }

    #[test]
    fn roadmap_is_lifo() {
        let mut session = TrackSession::seed(outpoint(1, 0), None);
        session.pop();
        session.push(WorkItem { outpoint: outpoint(2, 0), range: None, depth: 1 });
        session.push(WorkItem { outpoint: outpoint(3, 0), range: None, depth: 2 });
        assert_eq!(session.pop().map(|item| item.outpoint), Some(outpoint(3, 0)));
        assert_eq!(session.pop().map(|item| item.outpoint), Some(outpoint(2, 0)));
        assert_eq!(session.pop(), None);
        assert_eq!(session.max_depth(), 2);
    }

    #[test]
    fn cache_fetches_once() {
        let mut cache = TxCache::default();
        let tx = Transaction { version: 2, lock_time: bitcoin::absolute::LockTime::ZERO, input: vec![], output: vec![] };
        let mut fetches = 0;
        for _ in 0..3 {
            let fetched = cache
                .get_or_fetch(Txid::from_byte_array([9; 32]), |_| -> Result<Transaction, ()> {
                    fetches += 1;
                    Ok(tx.clone())
                })
                .unwrap();
            assert_eq!(fetched.version, 2);
        }
        assert_eq!(fetches, 1);
    }
}
