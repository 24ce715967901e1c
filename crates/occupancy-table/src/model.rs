use chrono::NaiveDateTime;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
pub const LOG_HEADERS: [&str; 4] = ["Timestamp_ET", "Area", "Occupancy", "Status"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKind {
    Header,
    Data,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableCell {
    pub kind: CellKind,
    pub text: String,
}

impl TableCell {
    #[must_use]
    pub fn header(text: impl Into<String>) -> Self {
        Self {
            kind: CellKind::Header,
            text: text.into(),
        }
    }

    #[must_use]
    pub fn data(text: impl Into<String>) -> Self {
        Self {
            kind: CellKind::Data,
            text: text.into(),
        }
    }

    /// Cell text with surrounding whitespace removed.
    #[must_use]
    pub fn trimmed_text(&self) -> &str {
        self.text.trim()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableRow {
    pub cells: Vec<TableCell>,
}

impl TableRow {
    #[must_use]
    pub fn new(cells: Vec<TableCell>) -> Self {
        Self { cells }
    }

    #[must_use]
    pub fn headers(texts: &[&str]) -> Self {
        Self::new(texts.iter().map(|text| TableCell::header(*text)).collect())
    }

    #[must_use]
    pub fn data(texts: &[&str]) -> Self {
        Self::new(texts.iter().map(|text| TableCell::data(*text)).collect())
    }

    #[must_use]
    pub fn cell_text(&self, index: usize) -> Option<&str> {
        self.cells.get(index).map(TableCell::trimmed_text)
    }
}

/// A table-like element of a rendered page. Rows keep document order and
/// include every row of the element, header rows first if the markup put
/// them first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableElement {
    pub rows: Vec<TableRow>,
}

impl TableElement {
    #[must_use]
    pub fn new(rows: Vec<TableRow>) -> Self {
        Self { rows }
    }
}

/// Snapshot of a rendered page reduced to its table-like elements.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedDocument {
    pub tables: Vec<TableElement>,
}

impl RenderedDocument {
    #[must_use]
    pub fn new(tables: Vec<TableElement>) -> Self {
        Self { tables }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMapping {
    pub area: usize,
    pub occupancy: usize,
    pub status: Option<usize>,
}

impl ColumnMapping {
    /// Largest index a row must reach to carry both required columns.
    #[must_use]
    pub fn max_required_index(&self) -> usize {
        self.area.max(self.occupancy)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    pub area: String,
    pub occupancy: String,
    pub status: String,
}

impl RawRow {
    #[must_use]
    pub fn new(
        area: impl Into<String>,
        occupancy: impl Into<String>,
        status: impl Into<String>,
    ) -> Self {
        Self {
            area: area.into(),
            occupancy: occupancy.into(),
            status: status.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ObservationRecord {
    pub captured_at: NaiveDateTime,
    pub area: String,
    pub occupancy: Option<f64>,
    pub status: String,
}

impl ObservationRecord {
    /// Fields in log column order.
    #[must_use]
    pub fn log_fields(&self) -> [String; 4] {
        [
            self.captured_at.format(TIMESTAMP_FORMAT).to_string(),
            self.area.clone(),
            self.occupancy.map(format_occupancy).unwrap_or_default(),
            self.status.clone(),
        ]
    }
}

#[must_use]
pub fn format_occupancy(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{value:.0}")
    } else {
        value.to_string()
    }
}
