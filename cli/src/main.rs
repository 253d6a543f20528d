//! dedupx CLI - spreadsheet row deduplication tool
//!
//! Loads an xlsx workbook, removes duplicate values across each row's
//! trailing columns, and writes the result as CSV.

use clap::{Parser, ValueEnum};
use colored::*;
use dedupx::render::CsvOptions;
use dedupx::{process_file_with_options, DedupConfig};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;

/// Remove duplicate values from spreadsheet rows and export to CSV
#[derive(Parser)]
#[command(
    name = "dedupx",
    author = "iyulab",
    version,
    about = "Remove duplicate values from spreadsheet rows",
    long_about = "dedupx - spreadsheet row deduplication tool.\n\n\
                  Reads an xlsx workbook, blanks or cuts duplicate values after a\n\
                  pivot column in every data row, and writes the result as CSV."
)]
struct Cli {
    /// Input workbook file (.xlsx)
    input: PathBuf,

    /// Output CSV file (default: overwrite the input path)
    output: Option<PathBuf>,

    /// Index of the column after which deduplication starts (starts at 1)
    #[arg(long, default_value_t = 1, value_parser = parse_index)]
    column: u32,

    /// Index of the last header row to skip (starts at 1)
    #[arg(long, default_value_t = 1, value_parser = parse_index)]
    row: u32,

    /// Only process the sheet at this index (starts at 1)
    #[arg(long, value_parser = parse_index)]
    sheet: Option<u32>,

    /// Cut duplicate cells out instead of blanking them
    #[arg(long)]
    cut: bool,

    /// Field delimiter for the CSV output
    #[arg(long, default_value = "comma")]
    delimiter: Delimiter,
}

/// CSV field delimiter
#[derive(Clone, Copy, ValueEnum)]
enum Delimiter {
    /// Comma (,)
    Comma,
    /// Semicolon (;)
    Semicolon,
    /// Tab character
    Tab,
    /// Pipe (|)
    Pipe,
}

impl From<Delimiter> for u8 {
    fn from(delimiter: Delimiter) -> Self {
        match delimiter {
            Delimiter::Comma => b',',
            Delimiter::Semicolon => b';',
            Delimiter::Tab => b'\t',
            Delimiter::Pipe => b'|',
        }
    }
}

/// Parse a 1-based index argument, clamping values below 1.
fn parse_index(s: &str) -> Result<u32, String> {
    let value: i64 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid index", s))?;
    Ok(value.clamp(1, u32::MAX as i64) as u32)
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    if !cli.input.exists() {
        return Err(format!("file {} not found", cli.input.display()).into());
    }

    let config = DedupConfig {
        column: cli.column,
        row: cli.row,
        sheet: cli.sheet,
        cut: cli.cut,
    };
    let options = CsvOptions::default().with_delimiter(cli.delimiter.into());

    let pb = create_spinner("Processing workbook...");
    process_file_with_options(&cli.input, cli.output.as_ref(), &config, &options)?;
    pb.finish_and_clear();

    let out = cli.output.as_deref().unwrap_or(&cli.input);
    println!(
        "{} Deduplicated {} -> {}",
        "✓".green().bold(),
        cli.input.display(),
        out.display()
    );

    Ok(())
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
            .template("{spinner:.blue} {msg}")
            .unwrap(),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}
