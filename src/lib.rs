//! # dedupx
//!
//! Remove duplicate values from spreadsheet rows and export to CSV.
//!
//! This library loads an xlsx workbook, deduplicates each row's values
//! after a configurable pivot column (blanking or cutting later
//! duplicates), and writes the result as a flat delimited file.
//!
//! ## Quick Start
//!
//! ```no_run
//! use dedupx::{process_file, DedupConfig};
//!
//! // Blank duplicate values after column 2, skipping one header row
//! let config = DedupConfig::default().with_column(2);
//! process_file("data.xlsx", Some("out.csv"), &config)?;
//! # Ok::<(), dedupx::Error>(())
//! ```
//!
//! ## Pipeline APIs
//!
//! ```no_run
//! use dedupx::dedup::{dedup_workbook, DedupConfig};
//! use dedupx::render::{sheet_to_csv, CsvOptions};
//! use dedupx::xlsx::XlsxReader;
//!
//! let mut workbook = XlsxReader::open("data.xlsx")?.parse()?;
//! dedup_workbook(&mut workbook, &DedupConfig::default().with_cut(true));
//!
//! if let Some(sheet) = workbook.sheet(1) {
//!     let csv = sheet_to_csv(sheet, &CsvOptions::default())?;
//!     print!("{}", csv);
//! }
//! # Ok::<(), dedupx::Error>(())
//! ```
//!
//! ## Features
//!
//! - `async`: Async file I/O with Tokio for the load and write boundaries

pub mod container;
pub mod dedup;
pub mod error;
pub mod model;
pub mod render;
pub mod xlsx;

// Re-exports
pub use container::XlsxPackage;
pub use dedup::{dedup_workbook, DedupConfig};
pub use error::{Error, Result};
pub use model::{CellValue, Row, Sheet, Workbook};
pub use render::CsvOptions;
pub use xlsx::XlsxReader;

use std::path::Path;

/// Load an xlsx workbook into memory.
///
/// # Example
///
/// ```no_run
/// use dedupx::load_workbook;
///
/// let workbook = load_workbook("data.xlsx")?;
/// println!("Sheets: {}", workbook.sheet_count());
/// # Ok::<(), dedupx::Error>(())
/// ```
pub fn load_workbook(path: impl AsRef<Path>) -> Result<Workbook> {
    XlsxReader::open(path)?.parse()
}

/// Load an xlsx workbook from bytes.
pub fn load_workbook_bytes(data: Vec<u8>) -> Result<Workbook> {
    XlsxReader::from_bytes(data)?.parse()
}

/// Run the whole pipeline: load, deduplicate, write CSV.
///
/// With no output path the input file is overwritten, matching the CLI
/// contract. The sheet that lands in the CSV is the configured target
/// sheet, or the first sheet when no target is set (or the target is out
/// of range). A workbook without sheets produces an empty file.
pub fn process_file(
    input: impl AsRef<Path>,
    output: Option<impl AsRef<Path>>,
    config: &DedupConfig,
) -> Result<()> {
    process_file_with_options(input, output, config, &CsvOptions::default())
}

/// Run the whole pipeline with explicit CSV options.
pub fn process_file_with_options(
    input: impl AsRef<Path>,
    output: Option<impl AsRef<Path>>,
    config: &DedupConfig,
    options: &CsvOptions,
) -> Result<()> {
    let mut workbook = load_workbook(input.as_ref())?;
    dedup_workbook(&mut workbook, config);

    let out_path = match output {
        Some(ref path) => path.as_ref().to_path_buf(),
        None => input.as_ref().to_path_buf(),
    };

    match output_sheet(&workbook, config) {
        Some(sheet) => render::write_sheet_file(sheet, &out_path, options),
        None => Ok(std::fs::write(&out_path, "")?),
    }
}

/// Pick the sheet the flat output is written from: the configured target
/// sheet, falling back to the first sheet.
fn output_sheet<'a>(workbook: &'a Workbook, config: &DedupConfig) -> Option<&'a Sheet> {
    config
        .sheet
        .and_then(|index| workbook.sheet(index))
        .or_else(|| workbook.sheet(1))
}

/// Async variant of [`process_file`].
///
/// The coarse load and write are awaited once each; the transformation
/// itself never suspends.
#[cfg(feature = "async")]
pub async fn process_file_async(
    input: impl AsRef<Path>,
    output: Option<impl AsRef<Path>>,
    config: &DedupConfig,
) -> Result<()> {
    let data = tokio::fs::read(input.as_ref()).await?;
    let mut workbook = load_workbook_bytes(data)?;
    dedup_workbook(&mut workbook, config);

    let out_path = match output {
        Some(ref path) => path.as_ref().to_path_buf(),
        None => input.as_ref().to_path_buf(),
    };

    let csv = match output_sheet(&workbook, config) {
        Some(sheet) => render::sheet_to_csv(sheet, &CsvOptions::default())?,
        None => String::new(),
    };

    tokio::fs::write(&out_path, csv).await?;
    Ok(())
}
