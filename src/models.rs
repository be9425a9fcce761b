use serde::{Deserialize, Serialize};

/// A value transfer as reported by the provider. Only the fields the
/// aggregation needs are kept; everything else in the payload is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub from: String,
    #[serde(default)]
    pub to: Option<String>,
    pub value: String,
}

impl Transaction {
    pub fn new(from: &str, to: &str, value: &str) -> Self {
        Transaction {
            from: from.to_string(),
            to: Some(to.to_string()),
            value: value.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressBalanceChange {
    pub address: String,
    pub balance_change: i128,
}

/// Response body of `/api/balance-change`. `address` is `None` when no
/// transaction in the window moved any value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LargestBalanceChange {
    pub address: Option<String>,
    pub balance_change: i128,
}

impl From<AddressBalanceChange> for LargestBalanceChange {
    fn from(change: AddressBalanceChange) -> Self {
        LargestBalanceChange {
            address: Some(change.address),
            balance_change: change.balance_change,
        }
    }
}

/// A window of `count` blocks ending at `start`, walked downwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockRange {
    pub start: u64,
    pub count: u64,
}

impl BlockRange {
    pub fn new(start: u64, count: u64) -> Self {
        BlockRange { start, count }
    }

    /// `start, start - 1, ..., start - count + 1`, never going below genesis.
    pub fn block_numbers(&self) -> impl Iterator<Item = u64> {
        let start = self.start;
        (0..self.count).map_while(move |offset| start.checked_sub(offset))
    }
}
