use crate::error::{NodeError, NodeResult};
use crate::model::{BlockInfo, TxStatus};
use bitcoin::{BlockHash, OutPoint, Transaction, Txid};

/// Read access to the Bitcoin transaction graph.
///
/// Implementations normalize whatever shape their backend responds with into
/// decoded `bitcoin` types, so satoshi amounts stay integers end to end.
pub trait NodeClient: Send + Sync {
    /// Fetches and decodes the transaction with the given id
    fn get_transaction(&self, txid: &Txid) -> NodeResult<Transaction>;

    /// Fetches the chain linkage of the transaction with the given id
    fn get_transaction_status(&self, txid: &Txid) -> NodeResult<TxStatus>;

    /// Fetches height and txid listing of the block with the given hash
    fn get_block(&self, hash: &BlockHash) -> NodeResult<BlockInfo>;

    /// Resolves a height to the hash of the block at that height
    fn get_block_hash(&self, height: u64) -> NodeResult<BlockHash>;

    /// Height of the current chain tip
    fn get_block_count(&self) -> NodeResult<u64>;

    /// Value in satoshis of the output the given outpoint refers to
    fn get_output_value(&self, outpoint: &OutPoint) -> NodeResult<u64> {
        let tx = self.get_transaction(&outpoint.txid)?;
        match tx.output.get(outpoint.vout as usize) {
            Some(output) => Ok(output.value),
            None => Err(NodeError::OutputMissing { outpoint: *outpoint, outputs: tx.output.len() }),
        }
    }
}

pub type DynNodeClient = Box<dyn NodeClient>;

impl<T: NodeClient> NodeClient for &T {
    fn get_transaction(&self, txid: &Txid) -> NodeResult<Transaction> {
        (**self).get_transaction(txid)
    }

    fn get_transaction_status(&self, txid: &Txid) -> NodeResult<TxStatus> {
        (**self).get_transaction_status(txid)
    }

    fn get_block(&self, hash: &BlockHash) -> NodeResult<BlockInfo> {
        (**self).get_block(hash)
    }

    fn get_block_hash(&self, height: u64) -> NodeResult<BlockHash> {
        (**self).get_block_hash(height)
    }

    fn get_block_count(&self) -> NodeResult<u64> {
        (**self).get_block_count()
    }

    fn get_output_value(&self, outpoint: &OutPoint) -> NodeResult<u64> {
        (**self).get_output_value(outpoint)
    }
}

impl NodeClient for Box<dyn NodeClient> {
    fn get_transaction(&self, txid: &Txid) -> NodeResult<Transaction> {
        self.as_ref().get_transaction(txid)
    }

    fn get_transaction_status(&self, txid: &Txid) -> NodeResult<TxStatus> {
        self.as_ref().get_transaction_status(txid)
    }

    fn get_block(&self, hash: &BlockHash) -> NodeResult<BlockInfo> {
        self.as_ref().get_block(hash)
    }

    fn get_block_hash(&self, height: u64) -> NodeResult<BlockHash> {
        self.as_ref().get_block_hash(height)
    }

    fn get_block_count(&self) -> NodeResult<u64> {
        self.as_ref().get_block_count()
    }

    fn get_output_value(&self, outpoint: &OutPoint) -> NodeResult<u64> {
        self.as_ref().get_output_value(outpoint)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bitcoin::absolute::LockTime;
    use bitcoin::hashes::Hash;
    use bitcoin::{ScriptBuf, TxOut};

    struct FixedChain {
        tip: u64,
    }

    impl NodeClient for FixedChain {
        fn get_transaction(&self, _txid: &Txid) -> NodeResult<Transaction> {
            Ok(Transaction {
                version: 2,
                lock_time: LockTime::ZERO,
                input: vec![],
                output: vec![TxOut { value: 31, script_pubkey: ScriptBuf::new() }],
            })
        }

        fn get_transaction_status(&self, txid: &Txid) -> NodeResult<TxStatus> {
            Err(NodeError::NotFound(format!("status of {}", txid)))
        }

        fn get_block(&self, hash: &BlockHash) -> NodeResult<BlockInfo> {
            Err(NodeError::NotFound(format!("block {}", hash)))
        }

        fn get_block_hash(&self, _height: u64) -> NodeResult<BlockHash> {
            Ok(BlockHash::all_zeros())
        }

        fn get_block_count(&self) -> NodeResult<u64> {
            Ok(self.tip)
        }
    }

    #[test]
    fn boxed_client_forwards() {
        let client: DynNodeClient = Box::new(FixedChain { tip: 830_000 });
        assert_eq!(client.get_block_count().unwrap(), 830_000);
        let outpoint = OutPoint { txid: Txid::all_zeros(), vout: 0 };
        assert_eq!(client.get_output_value(&outpoint).unwrap(), 31);
    }

    #[test]
    fn default_output_value_checks_bounds() {
        let chain = FixedChain { tip: 0 };
        let outpoint = OutPoint { txid: Txid::all_zeros(), vout: 5 };
        match chain.get_output_value(&outpoint) {
            Err(NodeError::OutputMissing { outputs, .. }) => assert_eq!(outputs, 1),
            other => panic!("unexpected result {:?}", other),
        }
    }
}
