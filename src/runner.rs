//! Batch driver - converts every workbook in a directory into SQL.
//!
//! Pipeline:
//! 1. Find workbooks under the input directory (recursively)
//! 2. Open and parse each one as a car or a locomotive
//! 3. Render the SQL and write it to the output
//!
//! The first failing workbook aborts the batch.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::car::Car;
use crate::error::Result;
use crate::excel::{is_workbook_path, Workbook};
use crate::locomotive::Locomotive;
use crate::sql::{cars_insert, locomotive_insert};

/// Kind of unit a batch converts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitKind {
    Cars,
    Locomotives,
}

impl UnitKind {
    /// Default input directory.
    pub const fn default_input(self) -> &'static str {
        match self {
            Self::Cars => "cars",
            Self::Locomotives => "loco",
        }
    }

    /// Default output file.
    pub const fn default_output(self) -> &'static str {
        match self {
            Self::Cars => "cars/cars.sql",
            Self::Locomotives => "loco/loco.sql",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Cars => "cars",
            Self::Locomotives => "locomotives",
        }
    }
}

/// A successfully converted workbook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertedUnit {
    /// Display name of the unit, as written to SQL.
    pub name: String,
    /// Source workbook.
    pub path: PathBuf,
}

/// Finds all workbooks in a directory recursively, sorted by path.
pub fn find_workbooks(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    collect_workbooks(dir, &mut files)?;
    files.sort();
    Ok(files)
}

fn collect_workbooks(dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir() {
            collect_workbooks(&path, files)?;
        } else if is_workbook_path(&path) {
            files.push(path);
        } else if path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with("~$"))
        {
            tracing::warn!(path = %path.display(), "skipping lock file");
        }
    }
    Ok(())
}

/// Batch runner for one unit kind.
pub struct BatchRunner {
    kind: UnitKind,
    input_dir: PathBuf,
    workbooks: Vec<PathBuf>,
}

impl BatchRunner {
    /// Creates a runner over all workbooks in `input_dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be read.
    pub fn new(kind: UnitKind, input_dir: PathBuf) -> Result<Self> {
        let workbooks = find_workbooks(&input_dir)?;
        tracing::debug!(
            kind = kind.label(),
            dir = %input_dir.display(),
            count = workbooks.len(),
            "workbooks found"
        );

        Ok(Self {
            kind,
            input_dir,
            workbooks,
        })
    }

    pub const fn kind(&self) -> UnitKind {
        self.kind
    }

    pub const fn input_dir(&self) -> &PathBuf {
        &self.input_dir
    }

    /// Workbooks the batch will convert, in order.
    pub fn workbooks(&self) -> &[PathBuf] {
        &self.workbooks
    }

    /// Converts every workbook, writing SQL to `out`.
    ///
    /// `on_unit` is called after each successful conversion. Returns the
    /// number of converted units. Nothing is written for an empty batch.
    pub fn run<W, F>(&self, out: &mut W, on_unit: F) -> Result<usize>
    where
        W: Write,
        F: FnMut(&ConvertedUnit),
    {
        match self.kind {
            UnitKind::Cars => self.run_cars(out, on_unit),
            UnitKind::Locomotives => self.run_locomotives(out, on_unit),
        }
    }

    fn run_cars<W, F>(&self, out: &mut W, mut on_unit: F) -> Result<usize>
    where
        W: Write,
        F: FnMut(&ConvertedUnit),
    {
        let mut cars = Vec::with_capacity(self.workbooks.len());

        for path in &self.workbooks {
            let workbook = Workbook::open(path)?;
            let car =
                Car::from_workbook(&workbook).map_err(|e| e.in_workbook(workbook.path()))?;
            report(&mut on_unit, &car.name, path);
            cars.push(car);
        }

        if !cars.is_empty() {
            out.write_all(cars_insert(&cars)?.as_bytes())?;
            out.write_all(b"\n")?;
        }
        out.flush()?;

        Ok(cars.len())
    }

    fn run_locomotives<W, F>(&self, out: &mut W, mut on_unit: F) -> Result<usize>
    where
        W: Write,
        F: FnMut(&ConvertedUnit),
    {
        let mut count = 0;

        for path in &self.workbooks {
            let workbook = Workbook::open(path)?;
            let loco = Locomotive::from_workbook(&workbook)
                .map_err(|e| e.in_workbook(workbook.path()))?;
            if count > 0 {
                out.write_all(b"\n")?;
            }
            out.write_all(locomotive_insert(&loco)?.as_bytes())?;
            out.write_all(b"\n")?;
            report(&mut on_unit, loco.name(), path);
            count += 1;
        }
        out.flush()?;

        Ok(count)
    }
}

fn report<F: FnMut(&ConvertedUnit)>(on_unit: &mut F, name: &str, path: &Path) {
    tracing::info!(unit = name, path = %path.display(), "converted");
    on_unit(&ConvertedUnit {
        name: name.to_string(),
        path: path.to_path_buf(),
    });
}
