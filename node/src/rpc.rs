use crate::client::NodeClient;
use crate::config::{RetryPolicy, RpcAuth, RpcConfig};
use crate::error::{NodeError, NodeResult};
use crate::model::{BlockInfo, TxStatus};
use bitcoin::{BlockHash, Transaction, Txid};
use bitcoincore_rpc::{Auth, Client, RpcApi, jsonrpc};
use log::warn;

/// `NodeClient` backed by the JSON-RPC interface of a Bitcoin Core node
pub struct RpcClient {
    inner: Client,
    retry: RetryPolicy,
}

impl RpcClient {
    pub fn new(config: &RpcConfig) -> NodeResult<Self> {
        let inner = Client::new(&config.url, (&config.auth).into())?;
        Ok(Self { inner, retry: config.retry })
    }

    /// Runs `call`, retrying transport-level failures with a fixed delay.
    /// Logical RPC errors are surfaced immediately.
    fn with_retry<T>(&self, what: &str, mut call: impl FnMut() -> Result<T, bitcoincore_rpc::Error>) -> NodeResult<T> {
        let mut attempt = 0;
        loop {
            match call() {
                Ok(value) => return Ok(value),
                Err(err) if is_transient(&err) => {
                    attempt += 1;
                    if attempt >= self.retry.max_attempts {
                        return Err(NodeError::Unavailable { attempts: attempt, last: err.to_string() });
                    }
                    warn!("{} failed on attempt {}/{}, retrying: {}", what, attempt, self.retry.max_attempts, err);
                    std::thread::sleep(self.retry.delay());
                }
                Err(err) => return Err(err.into()),
            }
        }
    }
}

fn is_transient(err: &bitcoincore_rpc::Error) -> bool {
    matches!(err, bitcoincore_rpc::Error::JsonRpc(jsonrpc::Error::Transport(_)))
}

impl From<&RpcAuth> for Auth {
    fn from(auth: &RpcAuth) -> Self {
        match auth {
            RpcAuth::None => Auth::None,
            RpcAuth::UserPass { username, password } => Auth::UserPass(username.clone(), password.clone()),
            RpcAuth::Cookie { file } => Auth::CookieFile(file.clone()),
        }
    }
}

impl NodeClient for RpcClient {
    fn get_transaction(&self, txid: &Txid) -> NodeResult<Transaction> {
        self.with_retry("getrawtransaction", || self.inner.get_raw_transaction(txid, None))
    }

    fn get_transaction_status(&self, txid: &Txid) -> NodeResult<TxStatus> {
        let info = self.with_retry("getrawtransaction (verbose)", || self.inner.get_raw_transaction_info(txid, None))?;
        Ok(TxStatus { block_hash: info.blockhash, confirmations: info.confirmations.map(u64::from) })
    }

    fn get_block(&self, hash: &BlockHash) -> NodeResult<BlockInfo> {
        let info = self.with_retry("getblock", || self.inner.get_block_info(hash))?;
        Ok(BlockInfo { hash: info.hash, height: info.height as u64, txids: info.tx })
    }

    fn get_block_hash(&self, height: u64) -> NodeResult<BlockHash> {
        self.with_retry("getblockhash", || self.inner.get_block_hash(height))
    }

    fn get_block_count(&self) -> NodeResult<u64> {
        self.with_retry("getblockcount", || self.inner.get_block_count())
    }
}
