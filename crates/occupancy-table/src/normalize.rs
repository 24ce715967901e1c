use chrono::NaiveDateTime;

use crate::model::{ObservationRecord, RawRow};

/// Parses an occupancy cell. Anything that is not a finite number is `None`.
#[must_use]
pub fn parse_occupancy(text: &str) -> Option<f64> {
    let cleaned = text.trim().replace(',', "");
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|value| value.is_finite())
}

pub(crate) fn normalize_row(captured_at: NaiveDateTime, row: RawRow) -> ObservationRecord {
    ObservationRecord {
        captured_at,
        occupancy: parse_occupancy(&row.occupancy),
        area: row.area.trim().to_string(),
        status: row.status.trim().to_string(),
    }
}

/// Turns one scrape's raw rows into records sharing a single capture time.
#[must_use]
pub fn normalize_rows(captured_at: NaiveDateTime, rows: Vec<RawRow>) -> Vec<ObservationRecord> {
    rows.into_iter()
        .map(|row| normalize_row(captured_at, row))
        .collect()
}
