use std::io;

use crate::models::AddressBalanceChange;
use csv::Writer;

pub fn write_balance_changes<W: io::Write>(
    changes: &[AddressBalanceChange],
    writer: W,
) -> csv::Result<()> {
    let mut wtr = Writer::from_writer(writer);
    for change in changes {
        wtr.serialize(change)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn export_balance_changes_csv(changes: &[AddressBalanceChange], path: &str) -> csv::Result<()> {
    let file = std::fs::File::create(path)?;
    write_balance_changes(changes, file)
}
