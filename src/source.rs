use std::sync::Arc;

use async_trait::async_trait;
use ethers::providers::Middleware;

use crate::{error::FetchError, models::Transaction};

/// Where blocks come from. Implementations report failures as a
/// [`FetchError`]; deciding what to do about a bad block is left to the
/// caller (see [`crate::scanner::fetch_block_or_empty`]).
#[async_trait]
pub trait BlockSource: Send + Sync {
    async fn latest_block_number(&self) -> Result<u64, FetchError>;

    async fn block_transactions(&self, block: u64) -> Result<Vec<Transaction>, FetchError>;
}

/// Reads blocks straight from a JSON-RPC node through an `ethers` provider.
pub struct RpcSource<M> {
    provider: Arc<M>,
}

impl<M> RpcSource<M>
where
    M: Middleware + 'static,
{
    pub fn new(provider: Arc<M>) -> Self {
        RpcSource { provider }
    }
}

#[async_trait]
impl<M> BlockSource for RpcSource<M>
where
    M: Middleware + 'static,
{
    async fn latest_block_number(&self) -> Result<u64, FetchError> {
        let number = self
            .provider
            .get_block_number()
            .await
            .map_err(|e| FetchError::Provider(e.to_string()))?;
        Ok(number.as_u64())
    }

    async fn block_transactions(&self, block: u64) -> Result<Vec<Transaction>, FetchError> {
        let block_with_txs = self
            .provider
            .get_block_with_txs(block)
            .await
            .map_err(|e| FetchError::Provider(e.to_string()))?
            .ok_or(FetchError::MissingTransactions { block })?;

        Ok(block_with_txs
            .transactions
            .iter()
            .map(to_transaction)
            .collect())
    }
}

pub fn to_transaction(tx: &ethers::types::Transaction) -> Transaction {
    Transaction {
        from: format!("{:?}", tx.from),
        to: tx.to.map(|addr| format!("{:?}", addr)),
        value: format!("{:#x}", tx.value),
    }
}
