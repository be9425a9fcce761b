use std::cmp::Reverse;
use std::collections::HashMap;

use crate::models::{AddressBalanceChange, LargestBalanceChange, Transaction};

/// Nets every transfer into per-address balance changes, sorted by
/// descending absolute change. Addresses with equal magnitude keep the
/// order in which they first appeared (sender before receiver).
///
/// Transfers with a zero or unparseable value, or without a receiver, are
/// skipped entirely so the changes always sum to zero. So is a transfer
/// that would push either side past the `i128` range.
pub fn calculate_balance_changes(transactions: &[Transaction]) -> Vec<AddressBalanceChange> {
    let mut changes: Vec<AddressBalanceChange> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for tx in transactions {
        let Some(to) = tx.to.as_deref() else {
            continue;
        };
        let Some(value) = parse_value(&tx.value) else {
            continue;
        };

        let from_balance = balance_of(&changes, &index, &tx.from);
        let to_balance = balance_of(&changes, &index, to);
        let updated = if tx.from == to {
            Some((from_balance, to_balance))
        } else {
            from_balance
                .checked_sub(value)
                .zip(to_balance.checked_add(value))
        };
        let Some((from_balance, to_balance)) = updated else {
            continue;
        };

        set(&mut changes, &mut index, &tx.from, from_balance);
        set(&mut changes, &mut index, to, to_balance);
    }

    changes.sort_by_key(|change| Reverse(change.balance_change.unsigned_abs()));
    changes
}

/// The address that moved the most, or a null address with no change when
/// nothing moved.
pub fn largest_balance_change(changes: &[AddressBalanceChange]) -> LargestBalanceChange {
    match changes.first() {
        Some(change) => change.clone().into(),
        None => LargestBalanceChange {
            address: None,
            balance_change: 0,
        },
    }
}

/// Parses a hex-encoded transfer value. `None` means the transfer does not
/// count: the value is zero, not hex, or too large to net.
pub fn parse_value(value: &str) -> Option<i128> {
    let digits = value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .unwrap_or(value);

    let parsed = u128::from_str_radix(digits, 16).ok()?;
    let parsed = i128::try_from(parsed).ok()?;
    (parsed != 0).then_some(parsed)
}

fn balance_of(changes: &[AddressBalanceChange], index: &HashMap<&str, usize>, address: &str) -> i128 {
    index
        .get(address)
        .map_or(0, |&slot| changes[slot].balance_change)
}

fn set<'a>(
    changes: &mut Vec<AddressBalanceChange>,
    index: &mut HashMap<&'a str, usize>,
    address: &'a str,
    balance_change: i128,
) {
    let slot = *index.entry(address).or_insert_with(|| {
        changes.push(AddressBalanceChange {
            address: address.to_string(),
            balance_change: 0,
        });
        changes.len() - 1
    });

    changes[slot].balance_change = balance_change;
}
