//! Shared tree error type and helpers.

use mdrop_core::base::Hash256;
use thiserror::Error;

/// Errors that can occur when building or querying the Merkle tree.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum TreeError {
    /// No leaves were supplied.
    #[error("Cannot build a Merkle tree from zero leaves")]
    EmptyInput,

    /// A proof was requested for a position past the last leaf.
    #[error("Leaf index {index} is out of range for a tree with {leaf_count} leaves")]
    IndexOutOfRange {
        /// Requested leaf index.
        index: usize,
        /// Number of leaves in the tree.
        leaf_count: usize,
    },

    /// A proof was requested for a leaf value not present in the tree.
    #[error("Leaf {0} is not part of the tree")]
    LeafNotFound(Hash256),
}

/// Returns true every time `current` crosses another 10% of `total`.
pub const fn should_report_progress(current: usize, total: usize, last_pct: &mut usize) -> bool {
    if total == 0 {
        return false;
    }
    let pct = current.saturating_mul(100).saturating_div(total);
    if pct >= last_pct.saturating_add(10) {
        *last_pct = pct;
        true
    } else {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_reports_every_ten_percent() {
        let mut last = 0;
        let reported: Vec<usize> = (1..=100)
            .filter(|i| should_report_progress(*i, 100, &mut last))
            .collect();
        assert_eq!(reported, vec![10, 20, 30, 40, 50, 60, 70, 80, 90, 100]);
    }

    #[test]
    fn progress_ignores_empty_totals() {
        let mut last = 0;
        assert!(!should_report_progress(0, 0, &mut last));
        assert_eq!(last, 0);
    }
}
