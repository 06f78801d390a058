use crate::error::{Inconsistency, TrackError, TrackResult};
use crate::session::{TrackSession, WorkItem};
use bitcoin::hashes::Hash;
use bitcoin::{OutPoint, Transaction, Txid};
use log::{debug, trace};
use ordtrace_core::{Interval, Params, Segment, SubsidySchedule};
use ordtrace_node::{NodeClient, NodeError};
use std::sync::Arc;
use triggered::Listener;

/// Resolves which satoshis an output holds by walking the transaction graph
/// backwards under first-in-first-out allocation.
///
/// Within a transaction, input satoshis are laid out consecutively in input
/// order and flow into the outputs in output order; a coinbase lays out the
/// block subsidy first and collected fees after it. Tracking a range of an
/// output therefore means re-basing it into the transaction frame, matching
/// it against the input layout and descending into the spent outputs until
/// every satoshi terminates at a coinbase.
pub struct ProvenanceTracker<C: NodeClient> {
    client: C,
    schedule: SubsidySchedule,
    shutdown: Option<Listener>,
}

impl<C: NodeClient> ProvenanceTracker<C> {
    pub fn new(client: C, params: &Params) -> Self {
        Self { client, schedule: SubsidySchedule::new(params), shutdown: None }
    }

    /// Installs a listener polled between steps and before every fetch; once
    /// triggered, the run aborts with [`TrackError::Cancelled`]
    pub fn with_shutdown(mut self, listener: Listener) -> Self {
        self.shutdown = Some(listener);
        self
    }

    /// Resolves `range` of the output at `outpoint` into provenance segments.
    /// An absent range means the whole output.
    pub fn trace(&self, outpoint: OutPoint, range: Option<Interval>) -> TrackResult<Vec<Segment>> {
        let mut session = TrackSession::seed(outpoint, range);
        self.run(&mut session)?;
        Ok(session.into_segments())
    }

    /// Drives a session's roadmap to completion.
    ///
    /// Terminates because every step either resolves the popped item into
    /// segments or replaces it with items strictly further up the spend
    /// graph, which is acyclic and grounded in coinbases. Any error aborts
    /// the run; the session then holds partial progress for diagnostics only.
    pub fn run(&self, session: &mut TrackSession) -> TrackResult<()> {
        while let Some(item) = session.pop() {
            self.check_cancelled()?;
            self.step(item, session)?;
        }
        let progress = session.progress();
        if let Some(target) = progress.target {
            if progress.resolved != target {
                return Err(TrackError::Inconsistency {
                    outpoint: session.root(),
                    kind: Inconsistency::LengthMismatch { resolved: progress.resolved, target },
                });
            }
        }
        debug!(
            "resolved {} satoshis of {} into {} segments, max depth {}",
            progress.resolved,
            session.root(),
            session.segments().len(),
            session.max_depth()
        );
        Ok(())
    }

    fn step(&self, item: WorkItem, session: &mut TrackSession) -> TrackResult<()> {
        let WorkItem { outpoint, range, depth } = item;
        let tx = self.fetch_transaction(&outpoint.txid, session)?;

        let output_value = match tx.output.get(outpoint.vout as usize) {
            Some(output) => output.value,
            None => return Err(NodeError::OutputMissing { outpoint, outputs: tx.output.len() }.into()),
        };

        let range = match range {
            Some(range) => range,
            None => Interval::new(0, output_value)?,
        };
        if range.stop() > output_value {
            return Err(TrackError::RangeOverflow { outpoint, requested: range.stop(), available: output_value });
        }
        if session.target().is_none() {
            session.set_target(range.len());
        }
        if range.is_empty() {
            return Ok(());
        }

        trace!("tracking {} of output {} at depth {}", range, outpoint, depth);

        // Offset of this output's first satoshi within the transaction frame
        let preceding: u64 = tx.output.iter().take(outpoint.vout as usize).map(|output| output.value).sum();
        let tx_range = range.shift(preceding)?;

        if tx.is_coin_base() {
            self.resolve_coinbase(outpoint, tx_range, session)
        } else {
            self.expand_inputs(&tx, outpoint, tx_range, depth, session)
        }
    }

    /// Maps a range of a coinbase onto issued ordinals and collected fees.
    /// The coinbase frame holds the block subsidy at `[0, subsidy)`; anything
    /// past it entered the block as fees.
    fn resolve_coinbase(&self, outpoint: OutPoint, tx_range: Interval, session: &mut TrackSession) -> TrackResult<()> {
        let txid = outpoint.txid;
        self.check_cancelled()?;
        let status = self.client.get_transaction_status(&txid)?;
        let block_hash = match status.block_hash {
            Some(block_hash) => block_hash,
            None => return Err(TrackError::Inconsistency { outpoint, kind: Inconsistency::CoinbaseNotInChain }),
        };
        self.check_cancelled()?;
        let block = self.client.get_block(&block_hash)?;
        if block.coinbase_txid() != Some(&txid) {
            return Err(TrackError::Inconsistency { outpoint, kind: Inconsistency::CoinbaseIndexMismatch });
        }

        let subsidy = self.schedule.subsidy(block.height);
        let first_ordinal = self.schedule.first_ordinal(block.height);

        if let Some(minted) = tx_range.overlap(&Interval::new(0, subsidy)?) {
            let ordinals = minted.shift(first_ordinal)?;
            debug!("coinbase {} at height {} resolves ordinals {}", txid, block.height, ordinals);
            session.push_segment(Segment::Ordinals(ordinals));
        }
        if tx_range.stop() > subsidy {
            let fee = tx_range.stop() - tx_range.start().max(subsidy);
            debug!("coinbase {} at height {} resolves {} fee satoshis", txid, block.height, fee);
            session.push_segment(Segment::Fee(fee));
        }
        Ok(())
    }

    /// Matches a transaction-relative range against the input layout and
    /// queues a child item for every contributing input.
    ///
    /// Children are pushed in reverse input order: the roadmap is a stack,
    /// so the lowest-index input is popped first and segments resolve in
    /// satoshi order.
    fn expand_inputs(
        &self,
        tx: &Transaction,
        outpoint: OutPoint,
        tx_range: Interval,
        depth: u32,
        session: &mut TrackSession,
    ) -> TrackResult<()> {
        let mut children = Vec::new();
        let mut input_cursor = 0u64;
        let mut covered = 0u64;

        for input in tx.input.iter() {
            let prevout = input.previous_output;
            if prevout.txid == Txid::all_zeros() {
                return Err(TrackError::Inconsistency { outpoint, kind: Inconsistency::NullPrevoutInRegularTransaction });
            }

            let prev_tx = self.fetch_transaction(&prevout.txid, session)?;
            let value = match prev_tx.output.get(prevout.vout as usize) {
                Some(output) => output.value,
                None => return Err(NodeError::OutputMissing { outpoint: prevout, outputs: prev_tx.output.len() }.into()),
            };

            let input_frame = Interval::new(input_cursor, input_cursor + value)?;
            input_cursor += value;

            let Some(overlap) = tx_range.overlap(&input_frame) else {
                continue;
            };
            let local = overlap.translate(&input_frame)?;
            covered += local.len();
            children.push(WorkItem { outpoint: prevout, range: Some(local), depth: depth + 1 });

            if covered == tx_range.len() {
                break;
            }
        }

        if covered < tx_range.len() {
            return Err(TrackError::Inconsistency {
                outpoint,
                kind: Inconsistency::UncoveredRange { covered, requested: tx_range.len() },
            });
        }

        for child in children.into_iter().rev() {
            session.push(child);
        }
        Ok(())
    }

    fn fetch_transaction(&self, txid: &Txid, session: &mut TrackSession) -> TrackResult<Arc<Transaction>> {
        self.check_cancelled()?;
        session.cache.get_or_fetch(*txid, |txid| self.client.get_transaction(txid)).map_err(TrackError::from)
    }

    fn check_cancelled(&self) -> TrackResult<()> {
        match &self.shutdown {
            Some(listener) if listener.is_triggered() => Err(TrackError::Cancelled),
            _ => Ok(()),
        }
    }
}
