use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    #[error(
        "no table with 'area' and 'occupancy' headers among {candidates} candidate(s); site structure may have changed"
    )]
    NoMatchingTable { candidates: usize },

    #[error(
        "table {table_index} matched the required headers but yielded no rows ({skipped} skipped); site structure may have changed"
    )]
    NoDataRows { table_index: usize, skipped: usize },
}

impl ExtractError {
    /// True for failures that mean the page no longer carries a usable table.
    #[must_use]
    pub fn is_structure_changed(&self) -> bool {
        matches!(self, Self::NoMatchingTable { .. } | Self::NoDataRows { .. })
    }
}
