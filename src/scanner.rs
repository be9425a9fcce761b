use futures::future::join_all;
use log::{info, warn};

use crate::{
    error::FetchError,
    models::{BlockRange, Transaction},
    source::BlockSource,
};

/// Result of fetching one block of a range.
#[derive(Debug)]
pub struct BlockFetch {
    pub block: u64,
    pub outcome: Result<Vec<Transaction>, FetchError>,
}

/// Fetches every block of `range` concurrently and waits for all of them.
/// Outcomes are returned in range order, whatever order they completed in.
pub async fn fetch_blocks<S>(source: &S, range: BlockRange) -> Vec<BlockFetch>
where
    S: BlockSource + ?Sized,
{
    let fetches = range.block_numbers().map(|block| async move {
        BlockFetch {
            block,
            outcome: source.block_transactions(block).await,
        }
    });

    join_all(fetches).await
}

/// Fetches a single block, treating any failure as an empty block.
pub async fn fetch_block_or_empty<S>(source: &S, block: u64) -> Vec<Transaction>
where
    S: BlockSource + ?Sized,
{
    or_empty(BlockFetch {
        block,
        outcome: source.block_transactions(block).await,
    })
}

/// Loads all transactions of `range`. Blocks that fail to load contribute
/// nothing; one bad block never aborts the batch.
pub async fn load_transactions<S>(source: &S, range: BlockRange) -> Vec<Transaction>
where
    S: BlockSource + ?Sized,
{
    let fetches = fetch_blocks(source, range).await;
    let block_count = fetches.len();
    let failed = fetches.iter().filter(|f| f.outcome.is_err()).count();

    let transactions: Vec<Transaction> = fetches.into_iter().flat_map(or_empty).collect();

    info!(
        "Loaded {} transactions from {} blocks starting at {} ({} failed)",
        transactions.len(),
        block_count,
        range.start,
        failed
    );

    transactions
}

fn or_empty(fetch: BlockFetch) -> Vec<Transaction> {
    match fetch.outcome {
        Ok(transactions) => transactions,
        Err(e) => {
            warn!("Error fetching transactions for block {}: {}", fetch.block, e);
            Vec::new()
        }
    }
}
