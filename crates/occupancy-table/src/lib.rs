mod csv_out;
mod error;
mod header;
mod html_reader;
mod model;
mod normalize;
mod table_detect;
mod table_parse;
mod warning;

use chrono::NaiveDateTime;
use tracing::{debug, warn};

use crate::table_detect::{find_data_table, scan_candidates};
use crate::table_parse::extract_rows;

pub use csv_out::{write_records_csv, write_records_csv_to_string};
pub use error::ExtractError;
pub use header::HeaderStrategy;
pub use html_reader::{read_html_document, read_html_file};
pub use model::{
    CellKind, ColumnMapping, LOG_HEADERS, ObservationRecord, RawRow, RenderedDocument,
    TIMESTAMP_FORMAT, TableCell, TableElement, TableRow, format_occupancy,
};
pub use normalize::{normalize_rows, parse_occupancy};
pub use table_parse::SkipReason;
pub use warning::{ExtractWarning, WarningCode as ExtractWarningCode};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionReport {
    pub candidate_count: usize,
    pub table_index: usize,
    pub mapping: ColumnMapping,
    pub row_count: usize,
    pub skipped_count: usize,
    pub warnings: Vec<ExtractWarning>,
}

/// Locates the occupancy table and pulls its raw rows.
///
/// Fails with a structure-changed error when no table carries both `area`
/// and `occupancy` headers, or when the first one that does yields no rows.
pub fn parse_table(
    document: &RenderedDocument,
) -> Result<(Vec<RawRow>, ExtractionReport), ExtractError> {
    let candidate_count = scan_candidates(document).count();
    let Some(matched) = find_data_table(document) else {
        return Err(ExtractError::NoMatchingTable {
            candidates: candidate_count,
        });
    };

    let mapping = matched.columns.mapping;
    let mut warnings = Vec::new();
    if matched.columns.strategy == HeaderStrategy::FirstRow {
        warnings.push(ExtractWarning::FirstRowHeaderFallback {
            table_index: matched.index,
        });
    }

    let mut rows = Vec::new();
    let mut skipped_count = 0;
    for result in extract_rows(matched.table, &mapping) {
        match result {
            Ok(row) => rows.push(row),
            Err(reason) => {
                debug!(table = matched.index, row = reason.row(), ?reason, "skipping row");
                skipped_count += 1;
                warnings.push(ExtractWarning::RowSkipped {
                    table_index: matched.index,
                    reason,
                });
            }
        }
    }

    if rows.is_empty() {
        return Err(ExtractError::NoDataRows {
            table_index: matched.index,
            skipped: skipped_count,
        });
    }

    if skipped_count > 0 {
        warn!(
            table = matched.index,
            skipped = skipped_count,
            kept = rows.len(),
            "skipped malformed rows in occupancy table"
        );
    }

    let report = ExtractionReport {
        candidate_count,
        table_index: matched.index,
        mapping,
        row_count: rows.len(),
        skipped_count,
        warnings,
    };
    Ok((rows, report))
}

/// Full extraction for one scrape: every record carries `captured_at`.
pub fn extract_observations(
    document: &RenderedDocument,
    captured_at: NaiveDateTime,
) -> Result<(Vec<ObservationRecord>, ExtractionReport), ExtractError> {
    let (rows, mut report) = parse_table(document)?;
    let unparsed = rows
        .iter()
        .filter(|row| {
            !row.occupancy.trim().is_empty() && parse_occupancy(&row.occupancy).is_none()
        })
        .map(|row| ExtractWarning::OccupancyUnparsed {
            table_index: report.table_index,
            area: row.area.clone(),
            raw: row.occupancy.clone(),
        })
        .collect::<Vec<_>>();
    report.warnings.extend(unparsed);

    Ok((normalize_rows(captured_at, rows), report))
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDateTime;
    use pretty_assertions::assert_eq;

    use super::{extract_observations, parse_table};
    use crate::error::ExtractError;
    use crate::model::{RawRow, RenderedDocument, TIMESTAMP_FORMAT, TableElement, TableRow};
    use crate::warning::WarningCode;

    fn occupancy_table(rows: &[&[&str]]) -> TableElement {
        let mut all = vec![TableRow::headers(&["Area", "Occupancy", "Status"])];
        all.extend(rows.iter().map(|row| TableRow::data(row)));
        TableElement::new(all)
    }

    #[test]
    fn end_to_end_rows_and_records() {
        let document = RenderedDocument::new(vec![occupancy_table(&[
            &["North Range", "3", "Open"],
            &["", "5", "Open"],
            &["South Range", "", "Closed"],
        ])]);

        let (rows, report) = parse_table(&document).expect("table should parse");
        assert_eq!(
            rows,
            vec![
                RawRow::new("North Range", "3", "Open"),
                RawRow::new("South Range", "", "Closed"),
            ]
        );
        assert_eq!(report.skipped_count, 1);

        let captured_at = NaiveDateTime::parse_from_str("2025-06-01 12:00:00", TIMESTAMP_FORMAT)
            .expect("valid timestamp");
        let (records, _) = extract_observations(&document, captured_at).expect("records");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].occupancy, Some(3.0));
        assert_eq!(records[1].occupancy, None);
        assert_eq!(records[0].status, "Open");
        assert_eq!(records[1].status, "Closed");
        assert!(records.iter().all(|record| record.captured_at == captured_at));
    }

    #[test]
    fn row_zero_is_skipped_even_when_header_cells_sit_lower() {
        let document = RenderedDocument::new(vec![TableElement::new(vec![
            TableRow::data(&["Updated 12:00"]),
            TableRow::headers(&["Area", "Occupancy", "Status"]),
            TableRow::data(&["North Range", "3", "Open"]),
        ])]);

        let (rows, report) = parse_table(&document).expect("table should parse");
        assert_eq!(
            rows,
            vec![
                RawRow::new("Area", "Occupancy", "Status"),
                RawRow::new("North Range", "3", "Open"),
            ]
        );
        assert_eq!(report.skipped_count, 0);
    }

    #[test]
    fn first_match_wins_even_if_later_tables_match() {
        let document = RenderedDocument::new(vec![
            occupancy_table(&[&["First", "1", "Open"]]),
            occupancy_table(&[&["Second", "2", "Open"]]),
        ]);

        let (rows, report) = parse_table(&document).expect("table should parse");
        assert_eq!(rows, vec![RawRow::new("First", "1", "Open")]);
        assert_eq!(report.table_index, 0);
        assert_eq!(report.candidate_count, 2);
    }

    #[test]
    fn matched_table_without_rows_is_structure_changed() {
        let document = RenderedDocument::new(vec![
            occupancy_table(&[&["", "1", "Open"], &["short"]]),
            occupancy_table(&[&["Later", "2", "Open"]]),
        ]);

        let error = parse_table(&document).expect_err("should fail");
        assert!(error.is_structure_changed());
        assert!(matches!(
            error,
            ExtractError::NoDataRows {
                table_index: 0,
                skipped: 2
            }
        ));
    }

    #[test]
    fn no_matching_table_is_structure_changed() {
        let document = RenderedDocument::new(vec![TableElement::new(vec![
            TableRow::headers(&["Areas", "Occupancy"]),
            TableRow::data(&["North Range", "3"]),
        ])]);

        let error = parse_table(&document).expect_err("should fail");
        assert!(matches!(error, ExtractError::NoMatchingTable { candidates: 1 }));
    }

    #[test]
    fn reports_unparsed_occupancy() {
        let document =
            RenderedDocument::new(vec![occupancy_table(&[&["North Range", "N/A", "Open"]])]);
        let captured_at = NaiveDateTime::parse_from_str("2025-06-01 12:00:00", TIMESTAMP_FORMAT)
            .expect("valid timestamp");

        let (records, report) = extract_observations(&document, captured_at).expect("records");
        assert_eq!(records[0].occupancy, None);
        assert_eq!(records[0].area, "North Range");
        assert!(
            report
                .warnings
                .iter()
                .any(|warning| warning.code() == WarningCode::OccupancyUnparsed)
        );
    }

    #[test]
    fn first_row_fallback_is_reported() {
        let document = RenderedDocument::new(vec![TableElement::new(vec![
            TableRow::data(&["Area", "Occupancy"]),
            TableRow::data(&["North Range", "3"]),
        ])]);

        let (rows, report) = parse_table(&document).expect("table should parse");
        assert_eq!(rows, vec![RawRow::new("North Range", "3", "")]);
        assert_eq!(report.warnings[0].code(), WarningCode::FirstRowHeaderFallback);
    }
}
