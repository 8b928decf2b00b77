//! Allowlist input: comma-separated rows with the address and amount at fixed columns.

use std::path::Path;

use eyre::Context as _;
use mdrop_core::base::{Hash256, InvalidRecord, Record};
use tracing::{info, instrument, warn};

use crate::common::ColumnLayout;

/// A valid input row together with the record parsed from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllowlistRow {
    /// One-based line number in the input.
    pub line: usize,
    /// Raw row fields, copied through to the proof output.
    pub fields: Vec<String>,
    /// The parsed record.
    pub record: Record,
}

/// Rows loaded from one input, with malformed rows already dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowSet {
    /// Header fields, when the input has a header line.
    pub header: Option<Vec<String>>,
    /// Valid rows in input order.
    pub rows: Vec<AllowlistRow>,
    /// Number of rows skipped as malformed.
    pub skipped: usize,
}

impl RowSet {
    /// Number of valid rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether no valid rows were loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Leaves of the valid rows, in input order.
    #[must_use]
    pub fn leaves(&self) -> Vec<Hash256> {
        self.rows.iter().map(|row| row.record.leaf()).collect()
    }

    /// Raw row fields, index-aligned with [`Self::leaves`].
    #[must_use]
    pub fn into_fields(self) -> Vec<Vec<String>> {
        self.rows.into_iter().map(|row| row.fields).collect()
    }
}

fn split_fields(line: &str) -> Vec<String> {
    line.split(',').map(str::to_owned).collect()
}

/// Lines of the raw input with `\n` or `\r\n` endings removed, not yet decoded.
fn raw_lines(input: &[u8]) -> impl Iterator<Item = &[u8]> {
    let input = input.strip_suffix(b"\n").unwrap_or(input);
    input
        .split(|byte| *byte == b'\n')
        .map(|line| line.strip_suffix(b"\r").unwrap_or(line))
}

/// Extract the record from a row's fields.
///
/// # Errors
/// Returns [`InvalidRecord`] if a column is missing or a field is malformed.
pub(super) fn record_from_fields(
    fields: &[String],
    layout: &ColumnLayout,
) -> Result<Record, InvalidRecord> {
    let field = |column: usize| {
        fields
            .get(column)
            .ok_or(InvalidRecord::MissingField {
                column,
                width: fields.len(),
            })
    };
    Record::parse(field(layout.address_column)?, field(layout.amount_column)?)
}

/// Parse allowlist rows from raw CSV bytes.
///
/// Each line is decoded as UTF-8 on its own. Blank lines are ignored. Rows that are not
/// valid UTF-8, have missing columns or malformed fields are logged and skipped; they never
/// abort the load.
#[must_use]
pub fn parse_rows(input: impl AsRef<[u8]>, layout: &ColumnLayout) -> RowSet {
    let mut lines = raw_lines(input.as_ref()).enumerate();
    let header = if layout.has_header {
        lines
            .next()
            .map(|(_, line)| split_fields(&String::from_utf8_lossy(line)))
    } else {
        None
    };

    let mut rows = Vec::new();
    let mut skipped = 0_usize;
    for (index, line) in lines {
        let line_number = index.saturating_add(1);
        let line = match std::str::from_utf8(line) {
            Ok(line) => line,
            Err(e) => {
                warn!(line = line_number, error = %e, "Skipping row that is not valid UTF-8");
                skipped = skipped.saturating_add(1);
                continue;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        let fields = split_fields(line);
        match record_from_fields(&fields, layout) {
            Ok(record) => rows.push(AllowlistRow {
                line: line_number,
                fields,
                record,
            }),
            Err(e) => {
                warn!(line = line_number, error = %e, "Skipping malformed row");
                skipped = skipped.saturating_add(1);
            }
        }
    }

    RowSet {
        header,
        rows,
        skipped,
    }
}

/// Read allowlist rows from a CSV file.
///
/// # Errors
/// Returns an error if the file cannot be read.
#[instrument(skip_all, fields(input = %input.display()))]
pub async fn read_rows(input: &Path, layout: &ColumnLayout) -> eyre::Result<RowSet> {
    let bytes = tokio::fs::read(input)
        .await
        .with_context(|| format!("Failed to read allowlist {}", input.display()))?;

    let rows = parse_rows(&bytes, layout);
    info!(
        valid = rows.len(),
        skipped = rows.skipped,
        "Loaded allowlist rows"
    );
    Ok(rows)
}
