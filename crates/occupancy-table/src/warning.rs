use std::fmt::{self, Display, Formatter};

use crate::table_parse::SkipReason;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningCode {
    ShortRow,
    EmptyArea,
    OccupancyUnparsed,
    FirstRowHeaderFallback,
}

/// Non-fatal findings from extracting the matched table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractWarning {
    FirstRowHeaderFallback {
        table_index: usize,
    },
    RowSkipped {
        table_index: usize,
        reason: SkipReason,
    },
    OccupancyUnparsed {
        table_index: usize,
        area: String,
        raw: String,
    },
}

impl ExtractWarning {
    #[must_use]
    pub fn code(&self) -> WarningCode {
        match self {
            Self::FirstRowHeaderFallback { .. } => WarningCode::FirstRowHeaderFallback,
            Self::RowSkipped {
                reason: SkipReason::ShortRow { .. },
                ..
            } => WarningCode::ShortRow,
            Self::RowSkipped {
                reason: SkipReason::EmptyArea { .. },
                ..
            } => WarningCode::EmptyArea,
            Self::OccupancyUnparsed { .. } => WarningCode::OccupancyUnparsed,
        }
    }

    #[must_use]
    pub fn table_index(&self) -> usize {
        match self {
            Self::FirstRowHeaderFallback { table_index }
            | Self::RowSkipped { table_index, .. }
            | Self::OccupancyUnparsed { table_index, .. } => *table_index,
        }
    }
}

impl Display for ExtractWarning {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::FirstRowHeaderFallback { .. } => {
                f.write_str("table has no header cells; matched on its first row")
            }
            Self::RowSkipped {
                reason:
                    SkipReason::ShortRow {
                        row,
                        cell_count,
                        required,
                    },
                ..
            } => write!(
                f,
                "row {row} has {cell_count} cell(s); at least {required} required"
            ),
            Self::RowSkipped {
                reason: SkipReason::EmptyArea { row },
                ..
            } => write!(f, "row {row} has an empty area cell"),
            Self::OccupancyUnparsed { area, raw, .. } => write!(
                f,
                "occupancy '{raw}' for '{area}' is not numeric; stored as missing"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ExtractWarning, WarningCode};
    use crate::table_parse::SkipReason;

    #[test]
    fn skipped_rows_take_their_code_from_the_reason() {
        let warning = ExtractWarning::RowSkipped {
            table_index: 2,
            reason: SkipReason::ShortRow {
                row: 4,
                cell_count: 1,
                required: 2,
            },
        };

        assert_eq!(warning.code(), WarningCode::ShortRow);
        assert_eq!(warning.table_index(), 2);
        assert_eq!(
            warning.to_string(),
            "row 4 has 1 cell(s); at least 2 required"
        );
    }
}
