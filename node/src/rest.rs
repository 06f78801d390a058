use crate::client::NodeClient;
use crate::config::{RestConfig, RetryPolicy};
use crate::error::{NodeError, NodeResult};
use crate::model::{BlockInfo, TxStatus};
use bitcoin::consensus::encode;
use bitcoin::hashes::hex::FromHex;
use bitcoin::{BlockHash, Transaction, Txid};
use log::warn;
use reqwest::StatusCode;
use reqwest::blocking::{Client, Response};
use serde::Deserialize;

/// `NodeClient` backed by an esplora-style block explorer REST API.
///
/// Endpoint shapes are private to this adapter; callers only ever see the
/// normalized `NodeClient` models.
pub struct RestClient {
    http: Client,
    base_url: String,
    retry: RetryPolicy,
}

#[derive(Deserialize)]
struct StatusDto {
    confirmed: bool,
    block_hash: Option<BlockHash>,
    block_height: Option<u64>,
}

#[derive(Deserialize)]
struct BlockDto {
    id: BlockHash,
    height: u64,
}

impl RestClient {
    pub fn new(config: &RestConfig) -> NodeResult<Self> {
        let http = Client::builder().timeout(config.timeout()).build()?;
        Ok(Self { http, base_url: config.base_url.trim_end_matches('/').to_string(), retry: config.retry })
    }

    /// Issues a GET, retrying connect and timeout failures with a fixed delay
    fn get(&self, path: &str) -> NodeResult<Response> {
        let url = format!("{}{}", self.base_url, path);
        let mut attempt = 0;
        loop {
            match self.http.get(&url).send() {
                Ok(response) => {
                    if response.status() == StatusCode::NOT_FOUND {
                        return Err(NodeError::NotFound(path.to_string()));
                    }
                    return Ok(response.error_for_status()?);
                }
                Err(err) if err.is_timeout() || err.is_connect() => {
                    attempt += 1;
                    if attempt >= self.retry.max_attempts {
                        return Err(NodeError::Unavailable { attempts: attempt, last: err.to_string() });
                    }
                    warn!("GET {} failed on attempt {}/{}, retrying: {}", path, attempt, self.retry.max_attempts, err);
                    std::thread::sleep(self.retry.delay());
                }
                Err(err) => return Err(err.into()),
            }
        }
    }

    fn get_text(&self, path: &str) -> NodeResult<String> {
        Ok(self.get(path)?.text()?)
    }
}

impl NodeClient for RestClient {
    fn get_transaction(&self, txid: &Txid) -> NodeResult<Transaction> {
        let hex = self.get_text(&format!("/tx/{}/hex", txid))?;
        let bytes = Vec::<u8>::from_hex(hex.trim())
            .map_err(|_| NodeError::MalformedResponse(format!("transaction hex for {}", txid)))?;
        Ok(encode::deserialize(&bytes)?)
    }

    fn get_transaction_status(&self, txid: &Txid) -> NodeResult<TxStatus> {
        let status: StatusDto = self.get(&format!("/tx/{}/status", txid))?.json()?;
        if !status.confirmed {
            return Ok(TxStatus { block_hash: None, confirmations: None });
        }
        // The explorer reports a height rather than a confirmation count
        let confirmations = match status.block_height {
            Some(height) => Some(self.get_block_count()?.saturating_sub(height) + 1),
            None => None,
        };
        Ok(TxStatus { block_hash: status.block_hash, confirmations })
    }

    fn get_block(&self, hash: &BlockHash) -> NodeResult<BlockInfo> {
        let block: BlockDto = self.get(&format!("/block/{}", hash))?.json()?;
        let txids: Vec<Txid> = self.get(&format!("/block/{}/txids", hash))?.json()?;
        Ok(BlockInfo { hash: block.id, height: block.height, txids })
    }

    fn get_block_hash(&self, height: u64) -> NodeResult<BlockHash> {
        let text = self.get_text(&format!("/block-height/{}", height))?;
        text.trim().parse().map_err(|_| NodeError::MalformedResponse(format!("block hash at height {}: {:?}", height, text)))
    }

    fn get_block_count(&self) -> NodeResult<u64> {
        let text = self.get_text("/blocks/tip/height")?;
        text.trim().parse().map_err(|_| NodeError::MalformedResponse(format!("tip height: {:?}", text)))
    }
}
