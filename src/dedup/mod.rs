//! Duplicate removal across a row's trailing columns.
//!
//! This is the transformation at the heart of the crate: every in-scope
//! row has the values after its pivot column deduplicated, either by
//! blanking later duplicates (null-mode) or by dropping them and closing
//! the gap (cut-mode).
//!
//! # Example
//!
//! ```
//! use dedupx::dedup::{dedup_workbook, DedupConfig};
//! use dedupx::model::{CellValue, Row, Sheet, Workbook};
//!
//! let mut sheet = Sheet::new("Data");
//! sheet.add_row(Row::from_cells(vec![CellValue::text("header")]));
//! sheet.add_row(Row::from_cells(vec![
//!     CellValue::text("id"),
//!     CellValue::text("a"),
//!     CellValue::text("a"),
//! ]));
//! let mut workbook = Workbook::new();
//! workbook.add_sheet(sheet);
//!
//! dedup_workbook(&mut workbook, &DedupConfig::default());
//!
//! let row = &workbook.sheets()[0].rows()[1];
//! assert_eq!(row.cell(3), Some(&CellValue::Empty));
//! ```

mod strategy;

pub use strategy::{filter_duplicates, null_duplicates};

use crate::model::{Row, Workbook};

/// Immutable per-run processing configuration.
///
/// All indices are 1-based. The defaults mirror the CLI defaults: pivot
/// at column 1, header threshold at row 1, every sheet in scope, and
/// null-mode deduplication.
#[derive(Debug, Clone)]
pub struct DedupConfig {
    /// Pivot column: deduplication scans cells strictly after it.
    pub column: u32,

    /// Header threshold: rows at or below this index are skipped.
    pub row: u32,

    /// Target sheet index; `None` puts every sheet in scope.
    pub sheet: Option<u32>,

    /// Cut-mode: remove duplicate cells instead of blanking them.
    pub cut: bool,
}

impl Default for DedupConfig {
    fn default() -> Self {
        Self {
            column: 1,
            row: 1,
            sheet: None,
            cut: false,
        }
    }
}

impl DedupConfig {
    /// Create a configuration with the defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the pivot column (1-based, clamped to at least 1).
    pub fn with_column(mut self, column: u32) -> Self {
        self.column = column.max(1);
        self
    }

    /// Set the header row threshold (1-based, clamped to at least 1).
    pub fn with_row(mut self, row: u32) -> Self {
        self.row = row.max(1);
        self
    }

    /// Restrict processing to a single sheet (1-based).
    pub fn with_sheet(mut self, sheet: u32) -> Self {
        self.sheet = Some(sheet.max(1));
        self
    }

    /// Enable or disable cut-mode.
    pub fn with_cut(mut self, cut: bool) -> Self {
        self.cut = cut;
        self
    }
}

/// Whether the sheet at a 1-based index is in scope for processing.
///
/// With no target configured every sheet is in scope. An out-of-range
/// target is not an error; it simply matches nothing.
pub fn sheet_in_scope(sheet_index: u32, config: &DedupConfig) -> bool {
    match config.sheet {
        Some(target) => target == sheet_index,
        None => true,
    }
}

/// Deduplicate the trailing values of one row, in place.
///
/// Rows at or below the header threshold are left untouched, as are rows
/// whose pivot column is at or beyond their last populated cell. Cells at
/// or before the pivot are never inspected or mutated. Each call tracks
/// first occurrences independently; nothing carries over between rows.
pub fn dedup_row(row: &mut Row, row_index: u32, config: &DedupConfig) {
    if row_index <= config.row {
        return;
    }

    let start_col = config.column.saturating_add(1);
    if start_col > row.cell_count() {
        return;
    }

    let values = row.values()[(start_col - 1) as usize..].to_vec();
    let replacement = if config.cut {
        filter_duplicates(&values)
    } else {
        null_duplicates(&values)
    };

    row.splice(start_col, values.len() as u32, replacement);
}

/// Process every in-scope sheet of a workbook, row by row.
///
/// Sheets and rows are visited strictly in order; skipped sheets are not
/// traversed at all.
pub fn dedup_workbook(workbook: &mut Workbook, config: &DedupConfig) {
    for (sheet_idx, sheet) in workbook.sheets_mut().iter_mut().enumerate() {
        if !sheet_in_scope(sheet_idx as u32 + 1, config) {
            continue;
        }

        for (row_idx, row) in sheet.rows_mut().iter_mut().enumerate() {
            dedup_row(row, row_idx as u32 + 1, config);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CellValue, Sheet};
    use pretty_assertions::assert_eq;

    fn text_row(values: &[&str]) -> Row {
        Row::from_cells(values.iter().map(|v| CellValue::text(*v)).collect())
    }

    #[test]
    fn test_sheet_in_scope() {
        let all = DedupConfig::default();
        assert!(sheet_in_scope(1, &all));
        assert!(sheet_in_scope(99, &all));

        let second = DedupConfig::default().with_sheet(2);
        assert!(!sheet_in_scope(1, &second));
        assert!(sheet_in_scope(2, &second));
        assert!(!sheet_in_scope(3, &second));

        // Out-of-range target matches nothing and raises no error
        let far = DedupConfig::default().with_sheet(42);
        assert!(!sheet_in_scope(1, &far));
    }

    #[test]
    fn test_header_rows_are_skipped() {
        let config = DedupConfig::default();
        let mut row = text_row(&["a", "a", "a"]);
        let original = row.clone();

        dedup_row(&mut row, 1, &config);
        assert_eq!(row, original);

        let config = DedupConfig::default().with_row(3);
        dedup_row(&mut row, 3, &config);
        assert_eq!(row, original);

        dedup_row(&mut row, 4, &config);
        assert_ne!(row, original);
    }

    #[test]
    fn test_null_mode_blanks_after_pivot() {
        // Pivot at column 1: the id cell is kept, trailing dupes blank out
        let config = DedupConfig::default();
        let mut row = text_row(&["id", "a", "b", "a"]);

        dedup_row(&mut row, 2, &config);
        assert_eq!(
            row.values(),
            &[
                CellValue::text("id"),
                CellValue::text("a"),
                CellValue::text("b"),
                CellValue::Empty,
            ]
        );
    }

    #[test]
    fn test_cut_mode_shrinks_row() {
        let config = DedupConfig::default().with_cut(true);
        let mut row = text_row(&["id", "a", "b", "a", "b"]);

        dedup_row(&mut row, 2, &config);
        assert_eq!(row.cell_count(), 3);
        assert_eq!(
            row.values(),
            &[CellValue::text("id"), CellValue::text("a"), CellValue::text("b")]
        );
    }

    #[test]
    fn test_cells_at_or_before_pivot_untouched() {
        let config = DedupConfig::default().with_column(3);
        let mut row = text_row(&["x", "x", "x", "y", "y"]);

        dedup_row(&mut row, 2, &config);
        // Columns 1..=3 keep their repeated values
        assert_eq!(
            row.values(),
            &[
                CellValue::text("x"),
                CellValue::text("x"),
                CellValue::text("x"),
                CellValue::text("y"),
                CellValue::Empty,
            ]
        );
    }

    #[test]
    fn test_short_row_is_untouched() {
        // Pivot at or beyond the cell count leaves nothing to scan
        let config = DedupConfig::default().with_column(5);
        let mut row = text_row(&["a", "a", "a"]);
        let original = row.clone();

        dedup_row(&mut row, 2, &config);
        assert_eq!(row, original);
    }

    #[test]
    fn test_empty_row_is_untouched() {
        let config = DedupConfig::default();
        let mut row = Row::new();
        dedup_row(&mut row, 2, &config);
        assert!(row.is_empty());
    }

    #[test]
    fn test_cut_mode_is_idempotent_on_rows() {
        let config = DedupConfig::default().with_cut(true);
        let mut row = text_row(&["id", "a", "b", "a", "c", "b"]);

        dedup_row(&mut row, 2, &config);
        let after_once = row.clone();
        dedup_row(&mut row, 2, &config);
        assert_eq!(row, after_once);
    }

    #[test]
    fn test_workbook_sheet_targeting() {
        let mut workbook = Workbook::new();
        for name in ["One", "Two", "Three"] {
            let mut sheet = Sheet::new(name);
            sheet.add_row(text_row(&["head", "head"]));
            sheet.add_row(text_row(&["id", "v", "v"]));
            workbook.add_sheet(sheet);
        }

        let config = DedupConfig::default().with_sheet(2);
        dedup_workbook(&mut workbook, &config);

        // Sheets 1 and 3 untouched, sheet 2 processed
        let untouched = text_row(&["id", "v", "v"]);
        assert_eq!(workbook.sheets()[0].rows()[1], untouched);
        assert_eq!(workbook.sheets()[2].rows()[1], untouched);
        assert_eq!(
            workbook.sheets()[1].rows()[1].values(),
            &[CellValue::text("id"), CellValue::text("v"), CellValue::Empty]
        );
    }

    #[test]
    fn test_rows_processed_independently() {
        // A value seen in one row does not count as a duplicate in the next
        let mut workbook = Workbook::new();
        let mut sheet = Sheet::new("Data");
        sheet.add_row(text_row(&["head"]));
        sheet.add_row(text_row(&["id", "a", "b"]));
        sheet.add_row(text_row(&["id", "a", "b"]));
        workbook.add_sheet(sheet);

        dedup_workbook(&mut workbook, &DedupConfig::default());

        let expected = text_row(&["id", "a", "b"]);
        assert_eq!(workbook.sheets()[0].rows()[1], expected);
        assert_eq!(workbook.sheets()[0].rows()[2], expected);
    }
}
