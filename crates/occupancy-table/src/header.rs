use crate::model::{CellKind, ColumnMapping, TableElement};

pub(crate) const AREA_HEADER: &str = "area";
pub(crate) const OCCUPANCY_HEADER: &str = "occupancy";
pub(crate) const STATUS_HEADER: &str = "status";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderStrategy {
    /// Every header cell of the table, in document order.
    HeaderCells,
    /// All cells of the first row, whatever their markup.
    FirstRow,
}

pub(crate) const HEADER_STRATEGIES: [HeaderStrategy; 2] =
    [HeaderStrategy::HeaderCells, HeaderStrategy::FirstRow];

impl HeaderStrategy {
    fn header_texts(self, table: &TableElement) -> Vec<String> {
        match self {
            Self::HeaderCells => table
                .rows
                .iter()
                .flat_map(|row| row.cells.iter())
                .filter(|cell| cell.kind == CellKind::Header)
                .map(|cell| cell.trimmed_text().to_string())
                .collect(),
            Self::FirstRow => table
                .rows
                .first()
                .map(|row| {
                    row.cells
                        .iter()
                        .map(|cell| cell.trimmed_text().to_string())
                        .collect()
                })
                .unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ColumnMatch {
    pub mapping: ColumnMapping,
    pub strategy: HeaderStrategy,
}

/// Header texts of the first strategy that yields any, lowercased for matching.
pub(crate) fn normalized_headers(table: &TableElement) -> Option<(HeaderStrategy, Vec<String>)> {
    HEADER_STRATEGIES.iter().find_map(|strategy| {
        let headers = strategy.header_texts(table);
        if headers.is_empty() {
            return None;
        }
        let lowered = headers.iter().map(|header| header.to_lowercase()).collect();
        Some((*strategy, lowered))
    })
}

fn position(headers: &[String], token: &str) -> Option<usize> {
    headers.iter().position(|header| header == token)
}

pub(crate) fn match_columns(table: &TableElement) -> Option<ColumnMatch> {
    let (strategy, headers) = normalized_headers(table)?;
    let area = position(&headers, AREA_HEADER)?;
    let occupancy = position(&headers, OCCUPANCY_HEADER)?;
    let status = position(&headers, STATUS_HEADER);

    Some(ColumnMatch {
        mapping: ColumnMapping {
            area,
            occupancy,
            status,
        },
        strategy,
    })
}

#[cfg(test)]
mod tests {
    use super::{HeaderStrategy, match_columns, normalized_headers};
    use crate::model::{ColumnMapping, TableCell, TableElement, TableRow};

    #[test]
    fn prefers_header_cells_over_first_row() {
        let table = TableElement::new(vec![
            TableRow::data(&["Updated 12:00"]),
            TableRow::headers(&["Status", "Area", "Occupancy"]),
        ]);

        let matched = match_columns(&table).expect("header cells should match");
        assert_eq!(matched.strategy, HeaderStrategy::HeaderCells);
        assert_eq!(
            matched.mapping,
            ColumnMapping {
                area: 1,
                occupancy: 2,
                status: Some(0),
            }
        );
    }

    #[test]
    fn falls_back_to_mixed_first_row() {
        let table = TableElement::new(vec![
            TableRow::new(vec![TableCell::data(" AREA "), TableCell::data("Occupancy")]),
            TableRow::data(&["North Range", "3"]),
        ]);

        let matched = match_columns(&table).expect("first row should match");
        assert_eq!(matched.strategy, HeaderStrategy::FirstRow);
        assert_eq!(matched.mapping.status, None);
    }

    #[test]
    fn requires_exact_tokens() {
        let table = TableElement::new(vec![TableRow::headers(&["Areas", "Occupancy"])]);
        assert!(match_columns(&table).is_none());

        let table = TableElement::new(vec![TableRow::headers(&["Area name", "Occupancy %"])]);
        assert!(match_columns(&table).is_none());
    }

    #[test]
    fn non_matching_header_cells_do_not_fall_through() {
        let table = TableElement::new(vec![
            TableRow::data(&["Area", "Occupancy"]),
            TableRow::headers(&["Zone"]),
        ]);

        assert!(match_columns(&table).is_none());
    }

    #[test]
    fn empty_table_has_no_headers() {
        assert!(normalized_headers(&TableElement::default()).is_none());
    }

    #[test]
    fn first_occurrence_wins_for_repeated_headers() {
        let table = TableElement::new(vec![TableRow::headers(&[
            "Area",
            "Occupancy",
            "Area",
            "Occupancy",
        ])]);

        let matched = match_columns(&table).expect("should match");
        assert_eq!(matched.mapping.area, 0);
        assert_eq!(matched.mapping.occupancy, 1);
    }
}
