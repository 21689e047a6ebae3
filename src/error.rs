//! Error types for rollstock-sql.
//!
//! Every failure is fatal for the workbook being converted and, through the
//! batch driver, for the whole run.

use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("failed to open workbook {}: {source}", path.display())]
    Workbook {
        path: PathBuf,
        #[source]
        source: calamine::Error,
    },

    #[error("{}: {error}", path.display())]
    InWorkbook {
        path: PathBuf,
        error: Box<ConvertError>,
    },

    #[error("sheet '{0}' not found")]
    MissingSheet(String),

    #[error("{sheet}!{cell}: required value is missing")]
    MissingRequiredValue { sheet: String, cell: String },

    #[error("{sheet}!{cell}: '{value}' is not a valid {expected}")]
    InvalidNumericLiteral {
        sheet: String,
        cell: String,
        value: String,
        expected: &'static str,
    },

    #[error("unrecognized {kind}: '{value}'")]
    UnrecognizedEnumCode { kind: &'static str, value: String },

    #[error("{sheet}!{cell}: missing resistance coefficient")]
    MissingCoefficient { sheet: String, cell: String },

    #[error("expected 2 braking blocks (limit, max), found {0}")]
    BrakingBlockCount(usize),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConvertError {
    pub(crate) fn unrecognized(kind: &'static str, value: impl ToString) -> Self {
        Self::UnrecognizedEnumCode {
            kind,
            value: value.to_string(),
        }
    }

    /// Attaches the workbook a parse error came from.
    pub fn in_workbook(self, path: &Path) -> Self {
        Self::InWorkbook {
            path: path.to_path_buf(),
            error: Box::new(self),
        }
    }
}

pub type Result<T> = std::result::Result<T, ConvertError>;
