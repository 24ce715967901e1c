use crate::model::{ColumnMapping, RawRow, TableElement, TableRow};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    ShortRow {
        row: usize,
        cell_count: usize,
        required: usize,
    },
    EmptyArea {
        row: usize,
    },
}

impl SkipReason {
    #[must_use]
    pub fn row(&self) -> usize {
        match self {
            Self::ShortRow { row, .. } | Self::EmptyArea { row } => *row,
        }
    }
}

fn extract_row(index: usize, row: &TableRow, mapping: &ColumnMapping) -> Result<RawRow, SkipReason> {
    let cell_count = row.cells.len();
    let max_index = mapping.max_required_index();
    if cell_count <= max_index {
        return Err(SkipReason::ShortRow {
            row: index,
            cell_count,
            required: max_index + 1,
        });
    }

    let area = row.cell_text(mapping.area).unwrap_or_default();
    if area.is_empty() {
        return Err(SkipReason::EmptyArea { row: index });
    }

    let occupancy = row.cell_text(mapping.occupancy).unwrap_or_default();
    let status = mapping
        .status
        .and_then(|status| row.cell_text(status))
        .unwrap_or_default();

    Ok(RawRow::new(area, occupancy, status))
}

/// Data rows of a matched table. Row 0 is always treated as the header row,
/// whichever header strategy matched.
pub(crate) fn extract_rows<'t>(
    table: &'t TableElement,
    mapping: &'t ColumnMapping,
) -> impl Iterator<Item = Result<RawRow, SkipReason>> + 't {
    table
        .rows
        .iter()
        .enumerate()
        .skip(1)
        .map(move |(index, row)| extract_row(index, row, mapping))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::{SkipReason, extract_rows};
    use crate::model::{ColumnMapping, RawRow, TableElement, TableRow};

    const MAPPING: ColumnMapping = ColumnMapping {
        area: 0,
        occupancy: 1,
        status: Some(2),
    };

    #[test]
    fn keeps_row_order_and_skips_empty_area() {
        let table = TableElement::new(vec![
            TableRow::headers(&["Area", "Occupancy", "Status"]),
            TableRow::data(&["North Range", "3", "Open"]),
            TableRow::data(&["", "5", "Open"]),
            TableRow::data(&["South Range", "", "Closed"]),
        ]);

        let results = extract_rows(&table, &MAPPING).collect::<Vec<_>>();
        assert_eq!(
            results,
            vec![
                Ok(RawRow::new("North Range", "3", "Open")),
                Err(SkipReason::EmptyArea { row: 2 }),
                Ok(RawRow::new("South Range", "", "Closed")),
            ]
        );
    }

    #[test]
    fn short_rows_do_not_stop_processing() {
        let table = TableElement::new(vec![
            TableRow::headers(&["Area", "Occupancy", "Status"]),
            TableRow::data(&["Spanning banner"]),
            TableRow::data(&["East Marsh", "0", "Open"]),
        ]);

        let results = extract_rows(&table, &MAPPING).collect::<Vec<_>>();
        assert_eq!(
            results,
            vec![
                Err(SkipReason::ShortRow {
                    row: 1,
                    cell_count: 1,
                    required: 2,
                }),
                Ok(RawRow::new("East Marsh", "0", "Open")),
            ]
        );
    }

    #[test]
    fn missing_status_cell_becomes_empty() {
        let table = TableElement::new(vec![
            TableRow::headers(&["Area", "Occupancy", "Status"]),
            TableRow::data(&["West Field", "2"]),
        ]);

        let rows = extract_rows(&table, &MAPPING)
            .filter_map(Result::ok)
            .collect::<Vec<_>>();
        assert_eq!(rows, vec![RawRow::new("West Field", "2", "")]);
    }

    #[test]
    fn unmapped_status_is_empty() {
        let mapping = ColumnMapping {
            area: 1,
            occupancy: 0,
            status: None,
        };
        let table = TableElement::new(vec![
            TableRow::headers(&["Occupancy", "Area"]),
            TableRow::data(&[" 4 ", " Pond Area "]),
        ]);

        let rows = extract_rows(&table, &mapping)
            .filter_map(Result::ok)
            .collect::<Vec<_>>();
        assert_eq!(rows, vec![RawRow::new("Pond Area", "4", "")]);
    }
}
