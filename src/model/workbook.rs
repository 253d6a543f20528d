//! Workbook model structures.

use super::CellValue;
use serde::{Deserialize, Serialize};

/// A row of cells, contiguous from column 1.
///
/// Column indices are 1-based throughout. The cell sequence may shrink
/// when a sub-range is spliced with a shorter replacement, but it never
/// becomes gappy: positions past the end simply do not exist.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Row {
    /// Cells in this row
    #[serde(default)]
    cells: Vec<CellValue>,
}

impl Row {
    /// Create a new empty row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a row from a list of cell values.
    pub fn from_cells(cells: Vec<CellValue>) -> Self {
        Self { cells }
    }

    /// Get the cell at a 1-based column index.
    pub fn cell(&self, col: u32) -> Option<&CellValue> {
        let idx = col.checked_sub(1)? as usize;
        self.cells.get(idx)
    }

    /// Set the cell at a 1-based column index, padding any gap with
    /// empty cells so the sequence stays contiguous.
    pub fn set_cell(&mut self, col: u32, value: CellValue) {
        let idx = (col.max(1) - 1) as usize;
        if idx >= self.cells.len() {
            self.cells.resize(idx + 1, CellValue::Empty);
        }
        self.cells[idx] = value;
    }

    /// Number of populated cells (the last populated column index).
    pub fn cell_count(&self) -> u32 {
        self.cells.len() as u32
    }

    /// All cell values in column order.
    pub fn values(&self) -> &[CellValue] {
        &self.cells
    }

    /// Check if the row has no cells.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Replace `count` cells starting at the 1-based column `start_col`
    /// with `replacement`, which may be shorter or longer. Trailing cells
    /// shift to close or open the gap.
    pub fn splice(&mut self, start_col: u32, count: u32, replacement: Vec<CellValue>) {
        let start = ((start_col.max(1) - 1) as usize).min(self.cells.len());
        let end = (start + count as usize).min(self.cells.len());
        self.cells.splice(start..end, replacement);
    }
}

/// A worksheet: a name plus an ordered sequence of rows.
///
/// Rows are identified by their 1-based position in the sequence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sheet {
    /// Sheet name from the workbook part
    pub name: String,

    /// Rows in this sheet
    #[serde(default)]
    rows: Vec<Row>,
}

impl Sheet {
    /// Create a new empty sheet with a name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rows: Vec::new(),
        }
    }

    /// Append a row.
    pub fn add_row(&mut self, row: Row) {
        self.rows.push(row);
    }

    /// Set the row at a 1-based index, padding any gap with empty rows.
    pub fn set_row(&mut self, index: u32, row: Row) {
        let idx = (index.max(1) - 1) as usize;
        if idx >= self.rows.len() {
            self.rows.resize(idx + 1, Row::new());
        }
        self.rows[idx] = row;
    }

    /// All rows in order.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Mutable access to all rows.
    pub fn rows_mut(&mut self) -> &mut [Row] {
        &mut self.rows
    }

    /// Number of rows.
    pub fn row_count(&self) -> u32 {
        self.rows.len() as u32
    }

    /// Check if the sheet has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// An in-memory workbook: an ordered sequence of sheets.
///
/// Sheets are identified by their 1-based position. The workbook is owned
/// exclusively for the duration of a single run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Workbook {
    /// Sheets in workbook order
    #[serde(default)]
    sheets: Vec<Sheet>,
}

impl Workbook {
    /// Create a new empty workbook.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a sheet.
    pub fn add_sheet(&mut self, sheet: Sheet) {
        self.sheets.push(sheet);
    }

    /// Get the sheet at a 1-based index.
    pub fn sheet(&self, index: u32) -> Option<&Sheet> {
        let idx = index.checked_sub(1)? as usize;
        self.sheets.get(idx)
    }

    /// All sheets in order.
    pub fn sheets(&self) -> &[Sheet] {
        &self.sheets
    }

    /// Mutable access to all sheets.
    pub fn sheets_mut(&mut self) -> &mut [Sheet] {
        &mut self.sheets
    }

    /// Number of sheets.
    pub fn sheet_count(&self) -> u32 {
        self.sheets.len() as u32
    }

    /// Check if the workbook has no sheets.
    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_row(values: &[&str]) -> Row {
        Row::from_cells(values.iter().map(|v| CellValue::text(*v)).collect())
    }

    #[test]
    fn test_row_one_based_access() {
        let row = text_row(&["a", "b", "c"]);
        assert_eq!(row.cell_count(), 3);
        assert_eq!(row.cell(1), Some(&CellValue::text("a")));
        assert_eq!(row.cell(3), Some(&CellValue::text("c")));
        assert_eq!(row.cell(4), None);
        assert_eq!(row.cell(0), None);
    }

    #[test]
    fn test_set_cell_pads_gaps() {
        let mut row = Row::new();
        row.set_cell(3, CellValue::text("c"));
        assert_eq!(row.cell_count(), 3);
        assert_eq!(row.cell(1), Some(&CellValue::Empty));
        assert_eq!(row.cell(2), Some(&CellValue::Empty));
        assert_eq!(row.cell(3), Some(&CellValue::text("c")));
    }

    #[test]
    fn test_splice_same_length() {
        let mut row = text_row(&["a", "b", "c", "d"]);
        row.splice(
            2,
            2,
            vec![CellValue::text("x"), CellValue::Empty],
        );
        assert_eq!(
            row.values(),
            &[
                CellValue::text("a"),
                CellValue::text("x"),
                CellValue::Empty,
                CellValue::text("d"),
            ]
        );
    }

    #[test]
    fn test_splice_shrinks_row() {
        let mut row = text_row(&["a", "b", "c", "d", "e"]);
        row.splice(2, 3, vec![CellValue::text("x")]);
        assert_eq!(row.cell_count(), 3);
        assert_eq!(
            row.values(),
            &[CellValue::text("a"), CellValue::text("x"), CellValue::text("e")]
        );
    }

    #[test]
    fn test_splice_out_of_range_is_noop() {
        let mut row = text_row(&["a"]);
        row.splice(5, 3, vec![]);
        assert_eq!(row.values(), &[CellValue::text("a")]);
    }

    #[test]
    fn test_sheet_set_row_pads_gaps() {
        let mut sheet = Sheet::new("Data");
        sheet.set_row(3, text_row(&["x"]));
        assert_eq!(sheet.row_count(), 3);
        assert!(sheet.rows()[0].is_empty());
        assert!(sheet.rows()[1].is_empty());
        assert_eq!(sheet.rows()[2].cell(1), Some(&CellValue::text("x")));
    }

    #[test]
    fn test_workbook_one_based_sheet_access() {
        let mut workbook = Workbook::new();
        workbook.add_sheet(Sheet::new("First"));
        workbook.add_sheet(Sheet::new("Second"));

        assert_eq!(workbook.sheet_count(), 2);
        assert_eq!(workbook.sheet(1).map(|s| s.name.as_str()), Some("First"));
        assert_eq!(workbook.sheet(2).map(|s| s.name.as_str()), Some("Second"));
        assert!(workbook.sheet(0).is_none());
        assert!(workbook.sheet(3).is_none());
    }
}
