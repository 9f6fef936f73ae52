//! Error kinds raised by the exploration pipeline.

use std::fmt;
use std::path::PathBuf;

/// Which selector a rejected token was meant for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectorKind {
    City,
    Month,
    Weekday,
}

impl fmt::Display for SelectorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectorKind::City => write!(f, "city"),
            SelectorKind::Month => write!(f, "month"),
            SelectorKind::Weekday => write!(f, "day"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BikeshareError {
    /// A city/month/day token outside the accepted sets.
    #[error("invalid {kind} selection '{token}'")]
    InvalidSelector { kind: SelectorKind, token: String },

    /// A required column is missing or a field failed to parse. Fatal to the load.
    #[error("data format error in {origin}: {message}")]
    DataFormat { origin: String, message: String },

    /// A statistic that needs at least one record was asked to run on none.
    #[error("no data available for {0}")]
    NoData(&'static str),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl BikeshareError {
    pub fn invalid(kind: SelectorKind, token: &str) -> Self {
        BikeshareError::InvalidSelector {
            kind,
            token: token.to_string(),
        }
    }

    pub fn data_format(origin: &str, message: impl Into<String>) -> Self {
        BikeshareError::DataFormat {
            origin: origin.to_string(),
            message: message.into(),
        }
    }

    /// Returns `true` for the per-group `NoData` condition.
    pub fn is_no_data(&self) -> bool {
        matches!(self, BikeshareError::NoData(_))
    }
}

pub type Result<T> = std::result::Result<T, BikeshareError>;
