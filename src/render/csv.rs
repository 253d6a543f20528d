//! CSV renderer implementation.

use crate::error::{Error, Result};
use crate::model::Sheet;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use super::options::{CsvOptions, LineEnding};

/// Write a sheet to a CSV writer.
///
/// Every row becomes one record; an empty row becomes a single empty
/// field so the record count matches the row count.
pub fn write_sheet<W: Write>(sheet: &Sheet, writer: W, options: &CsvOptions) -> Result<()> {
    let terminator = match options.line_ending {
        LineEnding::Lf => csv::Terminator::Any(b'\n'),
        LineEnding::CrLf => csv::Terminator::CRLF,
        LineEnding::Cr => csv::Terminator::Any(b'\r'),
    };

    let mut csv_writer = csv::WriterBuilder::new()
        .delimiter(options.delimiter)
        .quote(options.quote)
        .terminator(terminator)
        .flexible(true)
        .from_writer(writer);

    for row in sheet.rows() {
        if row.is_empty() {
            csv_writer.write_record([""])?;
            continue;
        }

        let record: Vec<String> = row.values().iter().map(|v| v.to_string()).collect();
        csv_writer.write_record(&record)?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Write a sheet to a CSV file, creating or overwriting it.
pub fn write_sheet_file(
    sheet: &Sheet,
    path: impl AsRef<Path>,
    options: &CsvOptions,
) -> Result<()> {
    let file = File::create(path.as_ref())?;
    write_sheet(sheet, file, options)
}

/// Render a sheet to a CSV string.
pub fn sheet_to_csv(sheet: &Sheet, options: &CsvOptions) -> Result<String> {
    let mut buffer = Vec::new();
    write_sheet(sheet, &mut buffer, options)?;
    String::from_utf8(buffer).map_err(|e| Error::InvalidData(format!("invalid UTF-8: {}", e)))
}
