/// # Modules Overview
///
/// This crate serves the address with the largest balance change over a
/// window of recent Ethereum blocks: it fetches the blocks from a provider,
/// nets every transfer per address and picks the biggest mover.

/// `analize`
///
/// Turns a flat list of transactions into per-address balance changes
/// (`calculate_balance_changes`) and picks the largest one
/// (`largest_balance_change`).
///
/// Example usage:
/// ```rust,ignore
/// let changes = analize::calculate_balance_changes(&transactions);
/// let top = analize::largest_balance_change(&changes);
/// ```
pub mod analize;

/// `api`
///
/// The axum router: `/api/balance-change` and `/api/balance-changes`.
pub mod api;

pub mod config;

/// `csv`
///
/// Writes a sorted balance-change list as CSV (`address,balanceChange`),
/// either into any `io::Write` or into a file.
///
/// Example usage:
/// ```rust,ignore
/// csv::export_balance_changes_csv(&changes, "balance_changes.csv")?;
/// ```
pub mod csv;

pub mod error;

/// `etherscan`
///
/// `BlockSource` backed by the Etherscan proxy API.
pub mod etherscan;

/// `models`
///
/// Core data structures:
/// * `Transaction` – a transfer as reported by the provider (`from`, `to`, hex `value`).
/// * `AddressBalanceChange` – net signed change of one address.
/// * `LargestBalanceChange` – the response body, with a nullable address.
/// * `BlockRange` – a starting block and how many blocks to walk back.
pub mod models;

/// `scanner`
///
/// Loads a `BlockRange` from a `BlockSource`, fetching all blocks
/// concurrently. A block that fails to load is logged and counted as empty.
///
/// Example usage:
/// ```rust,ignore
/// let txs = scanner::load_transactions(&source, BlockRange::new(start, 100)).await;
/// ```
pub mod scanner;

/// `source`
///
/// The `BlockSource` trait and its JSON-RPC implementation on top of an
/// `ethers` provider.
pub mod source;
