//! rollstock-sql: converts rolling-stock datasheet workbooks into SQL.
//!
//! Each workbook describes one car or locomotive in fixed sheet and cell
//! positions. Parsed units are rendered as `INSERT` statements with their
//! curves and coefficients embedded as JSON.

pub mod car;
pub mod error;
pub mod excel;
pub mod locomotive;
pub mod logging;
pub mod runner;
pub mod scanner;
pub mod sql;
pub mod types;

#[cfg(test)]
mod fixtures;

pub use error::{ConvertError, Result};
