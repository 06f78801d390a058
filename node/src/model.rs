use bitcoin::{BlockHash, Txid};

/// Chain linkage of a transaction as reported by the backing node
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TxStatus {
    /// Hash of the containing block, `None` while unconfirmed
    pub block_hash: Option<BlockHash>,
    pub confirmations: Option<u64>,
}

impl TxStatus {
    pub fn is_confirmed(&self, limit: u64) -> bool {
        self.confirmations.is_some_and(|confirmations| confirmations >= limit)
    }
}

/// Header-level view of a block: its height and the transactions it contains,
/// coinbase first
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlockInfo {
    pub hash: BlockHash,
    pub height: u64,
    pub txids: Vec<Txid>,
}

impl BlockInfo {
    pub fn coinbase_txid(&self) -> Option<&Txid> {
        self.txids.first()
    }
}
