//! Shared test utilities for the workspace.

use alloy_primitives::{Address, U256};
use mdrop_core::base::{Hash256, Record};

/// Helper macro to create a hash with a specific last byte.
#[macro_export]
macro_rules! h {
    ($v:expr) => {{
        let mut arr = [0_u8; 32];
        arr[31] = $v;
        ::mdrop_core::base::Hash256::new(arr)
    }};
}

/// Number of columns in rows produced by [`allowlist_csv`].
pub const CSV_WIDTH: usize = 8;
/// Column holding the address in rows produced by [`allowlist_csv`].
pub const ADDRESS_COLUMN: usize = 1;
/// Column holding the amount in rows produced by [`allowlist_csv`].
pub const AMOUNT_COLUMN: usize = 7;

/// A deterministic record: address bytes all equal to `n`, amount `n * 1000`.
#[must_use]
pub fn record(n: u8) -> Record {
    Record::new(
        Address::repeat_byte(n),
        U256::from(u64::from(n).saturating_mul(1000)),
    )
}

/// Leaves of `record(1..=count)`.
#[must_use]
pub fn leaves(count: u8) -> Vec<Hash256> {
    (1..=count).map(|n| record(n).leaf()).collect()
}

/// One CSV row in the export layout: address in column 1, amount in column 7.
#[must_use]
pub fn csv_row(index: usize, address: &str, amount: &str) -> String {
    format!("{index},{address},x,x,x,x,x,{amount}")
}

/// A CSV document with a header and one row per `(address, amount)` pair.
#[must_use]
pub fn allowlist_csv(rows: &[(&str, &str)]) -> String {
    let mut csv = String::from("id,address,a,b,c,d,e,amount\n");
    for (index, (address, amount)) in rows.iter().enumerate() {
        csv.push_str(&csv_row(index, address, amount));
        csv.push('\n');
    }
    csv
}

/// `(address, amount)` text pairs for `record(1..=count)`.
#[must_use]
pub fn record_fields(count: u8) -> Vec<(String, String)> {
    (1..=count)
        .map(|n| {
            let record = record(n);
            (
                format!("0x{}", hex::encode(record.address())),
                record.amount().to_string(),
            )
        })
        .collect()
}
