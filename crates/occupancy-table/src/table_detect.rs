use crate::header::{ColumnMatch, match_columns};
use crate::model::{RenderedDocument, TableElement};

#[derive(Debug, Clone, Copy)]
pub(crate) struct MatchedTable<'doc> {
    pub index: usize,
    pub table: &'doc TableElement,
    pub columns: ColumnMatch,
}

/// Every table-like element in document order, paired with its position.
pub(crate) fn scan_candidates(
    document: &RenderedDocument,
) -> impl Iterator<Item = (usize, &TableElement)> {
    document.tables.iter().enumerate()
}

/// First candidate whose headers carry the required columns. Later tables are
/// never inspected once a match is found.
pub(crate) fn find_data_table(document: &RenderedDocument) -> Option<MatchedTable<'_>> {
    scan_candidates(document).find_map(|(index, table)| {
        match_columns(table).map(|columns| MatchedTable {
            index,
            table,
            columns,
        })
    })
}
