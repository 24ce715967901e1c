use std::fmt::{Display, Formatter};

use occupancy_table::ExtractError;

/// Fatal outcomes of a scrape or report run.
#[derive(Debug)]
pub enum AppError {
    Config(String),
    SourceUnreachable(String),
    StructureChanged(String),
    Log(String),
    Report(String),
    Internal(String),
}

impl AppError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Config(_) => "config_error",
            Self::SourceUnreachable(_) => "source_unreachable",
            Self::StructureChanged(_) => "structure_changed",
            Self::Log(_) => "log_error",
            Self::Report(_) => "report_error",
            Self::Internal(_) => "internal_error",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Config(message)
            | Self::SourceUnreachable(message)
            | Self::StructureChanged(message)
            | Self::Log(message)
            | Self::Report(message)
            | Self::Internal(message) => message,
        }
    }

    /// Process exit code for the scheduler that triggered the run.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::StructureChanged(_) => 2,
            Self::Config(_)
            | Self::SourceUnreachable(_)
            | Self::Log(_)
            | Self::Report(_)
            | Self::Internal(_) => 1,
        }
    }
}

impl Display for AppError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code(), self.message())
    }
}

impl std::error::Error for AppError {}

impl From<ExtractError> for AppError {
    fn from(error: ExtractError) -> Self {
        if error.is_structure_changed() {
            Self::StructureChanged(error.to_string())
        } else {
            Self::Internal(error.to_string())
        }
    }
}

impl From<reqwest::Error> for AppError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::SourceUnreachable(format!("page fetch timed out: {error}"))
        } else {
            Self::SourceUnreachable(error.to_string())
        }
    }
}

impl From<url::ParseError> for AppError {
    fn from(error: url::ParseError) -> Self {
        Self::Config(format!("invalid source URL: {error}"))
    }
}

impl From<csv::Error> for AppError {
    fn from(error: csv::Error) -> Self {
        Self::Log(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::Log(error.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        Self::Report(error.to_string())
    }
}
