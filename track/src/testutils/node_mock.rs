use bitcoin::absolute::LockTime;
use bitcoin::hashes::Hash;
use bitcoin::{BlockHash, OutPoint, ScriptBuf, Sequence, Transaction, TxIn, TxOut, Txid, Witness};
use ordtrace_node::{BlockInfo, NodeClient, NodeError, NodeResult, TxStatus};
use std::collections::HashMap;
use std::sync::Mutex;
use triggered::Trigger;

/// A node interaction recorded by [`MockChain`], for asserting on fetch behavior
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Call {
    Transaction(Txid),
    Status(Txid),
    Block(BlockHash),
    BlockHash(u64),
    BlockCount,
}

/// An in-memory transaction graph implementing [`NodeClient`].
///
/// Chains are assembled with [`coinbase`](Self::coinbase) and
/// [`spend`](Self::spend); nothing is validated, so inconsistent histories
/// can be staged deliberately.
#[derive(Default)]
pub(crate) struct MockChain {
    transactions: HashMap<Txid, Transaction>,
    statuses: HashMap<Txid, TxStatus>,
    blocks: HashMap<BlockHash, BlockInfo>,
    by_height: HashMap<u64, BlockHash>,
    tip: u64,
    calls: Mutex<Vec<Call>>,
    interrupt: Option<(usize, Trigger)>,
}

impl MockChain {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Mines a coinbase carrying `outputs` into a synthetic block at `height`
    pub(crate) fn coinbase(&mut self, height: u64, outputs: &[u64]) -> Txid {
        // Height in the script keeps txids of equal reward shapes distinct
        let mut input = tx_in(OutPoint::null());
        input.script_sig = ScriptBuf::from_bytes(height.to_le_bytes().to_vec());
        let tx = raw_tx(vec![input], outputs.iter().copied().map(tx_out).collect());
        let txid = tx.txid();

        let block_hash = block_hash_for(height);
        self.blocks.insert(block_hash, BlockInfo { hash: block_hash, height, txids: vec![txid] });
        self.by_height.insert(height, block_hash);
        self.tip = self.tip.max(height);
        self.statuses.insert(txid, TxStatus { block_hash: Some(block_hash), confirmations: Some(1) });
        self.transactions.insert(txid, tx);
        txid
    }

    /// Adds a transaction spending `inputs` into `outputs`
    pub(crate) fn spend(&mut self, inputs: &[OutPoint], outputs: &[u64]) -> Txid {
        let tx = raw_tx(inputs.iter().copied().map(tx_in).collect(), outputs.iter().copied().map(tx_out).collect());
        let txid = tx.txid();
        self.statuses.insert(txid, TxStatus { block_hash: None, confirmations: None });
        self.transactions.insert(txid, tx);
        txid
    }

    pub(crate) fn insert_transaction(&mut self, tx: Transaction) -> Txid {
        let txid = tx.txid();
        self.transactions.insert(txid, tx);
        txid
    }

    pub(crate) fn set_status(&mut self, txid: Txid, status: TxStatus) {
        self.statuses.insert(txid, status);
    }

    pub(crate) fn set_block(&mut self, block: BlockInfo) {
        self.by_height.insert(block.height, block.hash);
        self.blocks.insert(block.hash, block);
    }

    pub(crate) fn block_hash_at(&self, height: u64) -> BlockHash {
        self.by_height[&height]
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn transaction_fetches(&self, txid: &Txid) -> usize {
        self.calls().iter().filter(|call| matches!(call, Call::Transaction(t) if t == txid)).count()
    }

    /// Fires `trigger` once `count` transactions have been served, to stage
    /// shutdown mid-run
    pub(crate) fn trigger_after_transaction_fetches(&mut self, count: usize, trigger: Trigger) {
        self.interrupt = Some((count, trigger));
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

impl NodeClient for MockChain {
    fn get_transaction(&self, txid: &Txid) -> NodeResult<Transaction> {
        self.record(Call::Transaction(*txid));
        if let Some((count, trigger)) = &self.interrupt {
            let served = self.calls().iter().filter(|call| matches!(call, Call::Transaction(_))).count();
            if served == *count {
                trigger.trigger();
            }
        }
        self.transactions.get(txid).cloned().ok_or_else(|| NodeError::NotFound(format!("transaction {}", txid)))
    }

    fn get_transaction_status(&self, txid: &Txid) -> NodeResult<TxStatus> {
        self.record(Call::Status(*txid));
        self.statuses.get(txid).cloned().ok_or_else(|| NodeError::NotFound(format!("status of {}", txid)))
    }

    fn get_block(&self, hash: &BlockHash) -> NodeResult<BlockInfo> {
        self.record(Call::Block(*hash));
        self.blocks.get(hash).cloned().ok_or_else(|| NodeError::NotFound(format!("block {}", hash)))
    }

    fn get_block_hash(&self, height: u64) -> NodeResult<BlockHash> {
        self.record(Call::BlockHash(height));
        self.by_height.get(&height).copied().ok_or_else(|| NodeError::NotFound(format!("block at height {}", height)))
    }

    fn get_block_count(&self) -> NodeResult<u64> {
        self.record(Call::BlockCount);
        Ok(self.tip)
    }
}

pub(crate) fn tx_in(previous_output: OutPoint) -> TxIn {
    TxIn { previous_output, script_sig: ScriptBuf::new(), sequence: Sequence::MAX, witness: Witness::new() }
}

pub(crate) fn tx_out(value: u64) -> TxOut {
    TxOut { value, script_pubkey: ScriptBuf::new() }
}

pub(crate) fn raw_tx(input: Vec<TxIn>, output: Vec<TxOut>) -> Transaction {
    Transaction { version: 2, lock_time: LockTime::ZERO, input, output }
}

fn block_hash_for(height: u64) -> BlockHash {
    let mut bytes = [0xbb; 32];
    bytes[..8].copy_from_slice(&height.to_le_bytes());
    BlockHash::from_byte_array(bytes)
}
