//! XLSX workbook loading.
//!
//! This module turns an Office Open XML workbook (.xlsx) into the
//! in-memory [`Workbook`](crate::model::Workbook) model.
//!
//! # Example
//!
//! ```no_run
//! use dedupx::xlsx::XlsxReader;
//!
//! let reader = XlsxReader::open("data.xlsx")?;
//! let workbook = reader.parse()?;
//!
//! for sheet in workbook.sheets() {
//!     println!("Sheet: {} ({} rows)", sheet.name, sheet.row_count());
//! }
//! # Ok::<(), dedupx::Error>(())
//! ```

mod reader;
mod styles;

pub use reader::XlsxReader;
