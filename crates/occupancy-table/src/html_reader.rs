use std::path::Path;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::error::ExtractError;
use crate::model::{CellKind, RenderedDocument, TableCell, TableElement, TableRow};

struct TableSelectors {
    table: Selector,
    row: Selector,
    cell: Selector,
}

impl TableSelectors {
    fn new() -> Self {
        Self {
            table: Selector::parse("table").expect("hardcoded table selector is valid"),
            row: Selector::parse("tr").expect("hardcoded row selector is valid"),
            cell: Selector::parse("th, td").expect("hardcoded cell selector is valid"),
        }
    }
}

fn whitespace_re() -> Regex {
    Regex::new(r"\s+").expect("hardcoded whitespace regex is valid")
}

fn cell_text(cell: &ElementRef<'_>, whitespace: &Regex) -> String {
    let raw = cell.text().collect::<String>();
    whitespace.replace_all(&raw, " ").trim().to_string()
}

fn read_row(row: &ElementRef<'_>, selectors: &TableSelectors, whitespace: &Regex) -> TableRow {
    let cells = row
        .select(&selectors.cell)
        .map(|cell| {
            let kind = if cell.value().name().eq_ignore_ascii_case("th") {
                CellKind::Header
            } else {
                CellKind::Data
            };
            TableCell {
                kind,
                text: cell_text(&cell, whitespace),
            }
        })
        .collect();
    TableRow::new(cells)
}

/// Parses an HTML snapshot into its table-like elements, in document order.
///
/// Nested tables are reported as their own elements, and their rows also
/// appear in the enclosing table, the same way a descendant `tr` query on a
/// live page would see them.
#[must_use]
pub fn read_html_document(html: &str) -> RenderedDocument {
    let document = Html::parse_document(html);
    let selectors = TableSelectors::new();
    let whitespace = whitespace_re();

    let tables = document
        .select(&selectors.table)
        .map(|table| {
            let rows = table
                .select(&selectors.row)
                .map(|row| read_row(&row, &selectors, &whitespace))
                .collect();
            TableElement::new(rows)
        })
        .collect();

    RenderedDocument::new(tables)
}

pub fn read_html_file(path: &Path) -> Result<RenderedDocument, ExtractError> {
    let html = std::fs::read_to_string(path)?;
    Ok(read_html_document(&html))
}
