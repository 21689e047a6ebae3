//! Workbook access and cell coercion.
//!
//! Cells are addressed with the datasheets' 1-based `(row, column)`
//! coordinates, regardless of where the sheet's used range begins.

use std::path::{Path, PathBuf};

use calamine::{open_workbook_auto, Data, Range, Reader};

use crate::error::{ConvertError, Result};

/// File extensions recognised as workbooks.
pub const WORKBOOK_EXTENSIONS: [&str; 4] = ["xlsx", "xlsm", "xls", "ods"];

/// Returns `true` if the path looks like a workbook worth converting.
///
/// Office lock files (`~$name.xlsx`) are rejected.
pub fn is_workbook_path(path: &Path) -> bool {
    let is_lock_file = path
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with("~$"));

    !is_lock_file
        && path.extension().and_then(|e| e.to_str()).is_some_and(|e| {
            WORKBOOK_EXTENSIONS
                .iter()
                .any(|known| known.eq_ignore_ascii_case(e))
        })
}

/// Cell value from a workbook.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Number(f64),
    Text(String),
    Bool(bool),
    Error(String),
}

impl CellValue {
    /// Empty cells and whitespace-only text count as absent.
    pub fn is_absent(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Trimmed string form of the value.
    ///
    /// Integral numbers render without a fractional part, so a numeric
    /// `3000` reads the same as the text `"3000"`.
    pub fn to_text(&self) -> String {
        match self {
            Self::Empty => String::new(),
            Self::Number(n) => format_number(*n),
            Self::Text(s) => s.trim().to_string(),
            Self::Bool(b) => b.to_string(),
            Self::Error(e) => e.clone(),
        }
    }
}

impl From<&Data> for CellValue {
    #[allow(clippy::cast_precision_loss)]
    fn from(dt: &Data) -> Self {
        match dt {
            Data::Empty => Self::Empty,
            Data::Int(i) => Self::Number(*i as f64),
            Data::Float(f) => Self::Number(*f),
            Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => Self::Text(s.clone()),
            Data::Bool(b) => Self::Bool(*b),
            Data::Error(e) => Self::Error(format!("{e:?}")),
            Data::DateTime(dt) => Self::Number(dt.as_f64()),
        }
    }
}

fn is_integral(n: f64) -> bool {
    n.fract().abs() < f64::EPSILON && n.abs() < 9.0e15
}

fn format_number(n: f64) -> String {
    if is_integral(n) {
        format!("{n:.0}")
    } else {
        n.to_string()
    }
}

/// A1-style reference for a 1-based `(row, col)` pair, e.g. `(3, 2)` -> `B3`.
pub fn cell_ref(row: u32, col: u32) -> String {
    let mut letters = Vec::new();
    let mut n = col;
    while n > 0 {
        let rem = (n - 1) % 26;
        #[allow(clippy::cast_possible_truncation)]
        letters.push(char::from(b'A' + rem as u8));
        n = (n - 1) / 26;
    }
    letters.reverse();
    let letters: String = letters.into_iter().collect();
    format!("{letters}{row}")
}

/// One named worksheet.
#[derive(Debug, Clone)]
pub struct Sheet {
    name: String,
    cells: Range<Data>,
}

impl Sheet {
    pub fn new(name: impl Into<String>, cells: Range<Data>) -> Self {
        Self {
            name: name.into(),
            cells,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Raw value at a 1-based position. Out-of-range cells are empty.
    pub fn cell(&self, row: u32, col: u32) -> CellValue {
        match (row.checked_sub(1), col.checked_sub(1)) {
            (Some(r), Some(c)) => self
                .cells
                .get_value((r, c))
                .map_or(CellValue::Empty, CellValue::from),
            _ => CellValue::Empty,
        }
    }

    pub fn opt_string(&self, row: u32, col: u32) -> Option<String> {
        let value = self.cell(row, col);
        if value.is_absent() {
            None
        } else {
            Some(value.to_text())
        }
    }

    pub fn string(&self, row: u32, col: u32) -> Result<String> {
        self.opt_string(row, col)
            .ok_or_else(|| self.missing(row, col))
    }

    #[allow(clippy::cast_possible_truncation)]
    pub fn opt_int(&self, row: u32, col: u32) -> Result<Option<i64>> {
        let value = self.cell(row, col);
        if value.is_absent() {
            return Ok(None);
        }
        if let CellValue::Number(n) = value {
            if is_integral(n) {
                return Ok(Some(n as i64));
            }
        }
        let text = value.to_text();
        text.parse::<i64>()
            .map(Some)
            .map_err(|_| self.invalid(row, col, text, "integer"))
    }

    pub fn int(&self, row: u32, col: u32) -> Result<i64> {
        self.opt_int(row, col)?
            .ok_or_else(|| self.missing(row, col))
    }

    pub fn opt_float(&self, row: u32, col: u32) -> Result<Option<f64>> {
        match self.cell(row, col) {
            value if value.is_absent() => Ok(None),
            CellValue::Number(n) => Ok(Some(n)),
            value => {
                let text = value.to_text();
                text.parse::<f64>()
                    .map(Some)
                    .map_err(|_| self.invalid(row, col, text, "number"))
            }
        }
    }

    pub fn float(&self, row: u32, col: u32) -> Result<f64> {
        self.opt_float(row, col)?
            .ok_or_else(|| self.missing(row, col))
    }

    fn missing(&self, row: u32, col: u32) -> ConvertError {
        ConvertError::MissingRequiredValue {
            sheet: self.name.clone(),
            cell: cell_ref(row, col),
        }
    }

    fn invalid(&self, row: u32, col: u32, value: String, expected: &'static str) -> ConvertError {
        ConvertError::InvalidNumericLiteral {
            sheet: self.name.clone(),
            cell: cell_ref(row, col),
            value,
            expected,
        }
    }

    /// Builds an in-memory sheet from 1-based `(row, col)` cells.
    #[cfg(test)]
    pub(crate) fn from_cells(name: &str, cells: &[((u32, u32), Data)]) -> Self {
        let max_row = cells.iter().map(|((r, _), _)| *r).max().unwrap_or(1);
        let max_col = cells.iter().map(|((_, c), _)| *c).max().unwrap_or(1);
        let mut range = Range::new((0, 0), (max_row - 1, max_col - 1));
        for ((r, c), value) in cells {
            range.set_value((r - 1, c - 1), value.clone());
        }
        Self::new(name, range)
    }
}

/// All sheets of one workbook, read eagerly.
#[derive(Debug, Clone)]
pub struct Workbook {
    path: PathBuf,
    sheets: Vec<Sheet>,
}

impl Workbook {
    /// Opens a workbook and reads every sheet.
    pub fn open(path: &Path) -> Result<Self> {
        let workbook_error = |source| ConvertError::Workbook {
            path: path.to_path_buf(),
            source,
        };

        let mut workbook = open_workbook_auto(path).map_err(workbook_error)?;

        let mut sheets = Vec::new();
        for name in workbook.sheet_names() {
            let range = workbook.worksheet_range(&name).map_err(workbook_error)?;
            sheets.push(Sheet::new(name, range));
        }

        let workbook = Self::from_sheets(path, sheets);
        tracing::debug!(
            path = %workbook.path().display(),
            sheets = workbook.sheets.len(),
            "workbook opened"
        );
        Ok(workbook)
    }

    /// Wraps sheets that are already in memory.
    pub fn from_sheets(path: impl Into<PathBuf>, sheets: Vec<Sheet>) -> Self {
        Self {
            path: path.into(),
            sheets,
        }
    }

    /// Path the workbook was read from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn sheet(&self, name: &str) -> Result<&Sheet> {
        self.sheets
            .iter()
            .find(|s| s.name == name)
            .ok_or_else(|| ConvertError::MissingSheet(name.to_string()))
    }
}
