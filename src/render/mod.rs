//! Flat tabular output for workbooks.
//!
//! This module serializes a sheet of the in-memory model to delimited
//! text (CSV by default).
//!
//! # Example
//!
//! ```no_run
//! use dedupx::render::{sheet_to_csv, CsvOptions};
//! use dedupx::xlsx::XlsxReader;
//!
//! let workbook = XlsxReader::open("data.xlsx")?.parse()?;
//! if let Some(sheet) = workbook.sheet(1) {
//!     let csv = sheet_to_csv(sheet, &CsvOptions::default())?;
//!     print!("{}", csv);
//! }
//! # Ok::<(), dedupx::Error>(())
//! ```

mod csv;
mod options;

pub use self::csv::{sheet_to_csv, write_sheet, write_sheet_file};
pub use options::{CsvOptions, LineEnding};
