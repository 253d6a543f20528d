//! XLSX workbook loader implementation.

use crate::container::XlsxPackage;
use crate::error::{Error, Result};
use crate::model::{CellValue, Row, Sheet, Workbook};
use quick_xml::events::{BytesStart, Event};
use std::collections::HashMap;
use std::path::Path;

use super::styles::{serial_to_iso, NumberFormats};

/// Sheet entry from workbook.xml.
#[derive(Debug, Clone)]
struct SheetEntry {
    name: String,
    rel_id: String,
}

/// Loader for xlsx workbooks.
///
/// Reads the workbook part, its relationships, shared strings, and number
/// formats up front, then materializes each worksheet into typed rows.
pub struct XlsxReader {
    package: XlsxPackage,
    shared_strings: Vec<String>,
    number_formats: NumberFormats,
    entries: Vec<SheetEntry>,
    relationships: HashMap<String, String>,
}

impl XlsxReader {
    /// Open an xlsx file for loading.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let package = XlsxPackage::open(path)?;
        Self::from_package(package)
    }

    /// Create a loader from bytes.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let package = XlsxPackage::from_bytes(data)?;
        Self::from_package(package)
    }

    /// Create a loader from an opened package.
    fn from_package(package: XlsxPackage) -> Result<Self> {
        // Shared strings and styles are optional parts
        let shared_strings = match package.read_xml("xl/sharedStrings.xml") {
            Ok(xml) => parse_shared_strings(&xml)?,
            Err(_) => Vec::new(),
        };

        let number_formats = match package.read_xml("xl/styles.xml") {
            Ok(xml) => NumberFormats::parse(&xml),
            Err(_) => NumberFormats::default(),
        };

        let relationships = package.read_relationships("xl/_rels/workbook.xml.rels")?;
        let entries = Self::parse_workbook(&package)?;

        Ok(Self {
            package,
            shared_strings,
            number_formats,
            entries,
            relationships,
        })
    }

    /// Parse xl/workbook.xml for the ordered sheet list.
    fn parse_workbook(package: &XlsxPackage) -> Result<Vec<SheetEntry>> {
        let xml = package.read_xml("xl/workbook.xml")?;
        let mut entries = Vec::new();

        let mut reader = quick_xml::Reader::from_str(&xml);
        reader.config_mut().trim_text(true);

        let mut buf = Vec::new();
        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Empty(e)) | Ok(Event::Start(e)) if e.name().as_ref() == b"sheet" => {
                    let mut name = String::new();
                    let mut rel_id = String::new();

                    for attr in e.attributes().flatten() {
                        match attr.key.as_ref() {
                            b"name" => name = String::from_utf8_lossy(&attr.value).to_string(),
                            b"r:id" => rel_id = String::from_utf8_lossy(&attr.value).to_string(),
                            _ => {}
                        }
                    }

                    if !name.is_empty() {
                        entries.push(SheetEntry { name, rel_id });
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(Error::XmlParse(e.to_string())),
                _ => {}
            }
            buf.clear();
        }

        Ok(entries)
    }

    /// Load the whole workbook into memory.
    ///
    /// Sheets keep their workbook order; a sheet whose part cannot be
    /// located comes back empty rather than failing the load.
    pub fn parse(&self) -> Result<Workbook> {
        let mut workbook = Workbook::new();

        for entry in &self.entries {
            let mut sheet = Sheet::new(entry.name.clone());

            if let Some(target) = self.relationships.get(&entry.rel_id) {
                let sheet_path = match target.strip_prefix('/') {
                    Some(absolute) => absolute.to_string(),
                    None => format!("xl/{}", target),
                };

                if let Ok(xml) = self.package.read_xml(&sheet_path) {
                    self.parse_worksheet(&xml, &mut sheet)?;
                }
            }

            workbook.add_sheet(sheet);
        }

        Ok(workbook)
    }

    /// Parse a worksheet part into the sheet's rows.
    ///
    /// Cell references (`r="C7"`) position cells and rows at their true
    /// 1-based indices; gaps are padded with empty cells so the model
    /// stays contiguous.
    fn parse_worksheet(&self, xml: &str, sheet: &mut Sheet) -> Result<()> {
        let mut reader = quick_xml::Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut buf = Vec::new();
        let mut current_row: Option<Row> = None;
        let mut row_index = 0u32;
        let mut next_col = 1u32;

        let mut cell_col = 1u32;
        let mut cell_type: Option<String> = None;
        let mut cell_style: Option<usize> = None;
        let mut cell_value = String::new();
        let mut in_value = false;

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) => match e.name().as_ref() {
                    b"row" => {
                        row_index = row_number(e, row_index + 1);
                        next_col = 1;
                        current_row = Some(Row::new());
                    }
                    b"c" if current_row.is_some() => {
                        cell_value.clear();
                        (cell_col, cell_type, cell_style) = cell_attrs(e, next_col);
                    }
                    b"v" | b"t" if current_row.is_some() => {
                        in_value = true;
                    }
                    _ => {}
                },
                Ok(Event::Empty(ref e)) => match e.name().as_ref() {
                    b"row" => {
                        // A self-closing row holds no cells
                        row_index = row_number(e, row_index + 1);
                        sheet.set_row(row_index, Row::new());
                    }
                    b"c" => {
                        // A self-closing cell carries style only
                        if let Some(ref mut row) = current_row {
                            let (col, _, _) = cell_attrs(e, next_col);
                            row.set_cell(col, CellValue::Empty);
                            next_col = col + 1;
                        }
                    }
                    _ => {}
                },
                Ok(Event::Text(ref e)) => {
                    if in_value {
                        let text = e.unescape().unwrap_or_default();
                        cell_value.push_str(&text);
                    }
                }
                Ok(Event::End(ref e)) => match e.name().as_ref() {
                    b"row" => {
                        if let Some(row) = current_row.take() {
                            sheet.set_row(row_index, row);
                        }
                    }
                    b"c" => {
                        let value = self.resolve_cell_value(
                            &cell_value,
                            cell_type.as_deref(),
                            cell_style,
                        );
                        if let Some(ref mut row) = current_row {
                            row.set_cell(cell_col, value);
                        }
                        next_col = cell_col + 1;
                    }
                    b"v" | b"t" => {
                        in_value = false;
                    }
                    _ => {}
                },
                Ok(Event::Eof) => break,
                Err(e) => return Err(Error::XmlParse(e.to_string())),
                _ => {}
            }
            buf.clear();
        }

        Ok(())
    }

    /// Resolve a raw cell into a typed value based on its type attribute
    /// and style.
    fn resolve_cell_value(
        &self,
        raw: &str,
        cell_type: Option<&str>,
        style: Option<usize>,
    ) -> CellValue {
        match cell_type {
            Some("s") => {
                // Shared string index
                let resolved = raw
                    .parse::<usize>()
                    .ok()
                    .and_then(|idx| self.shared_strings.get(idx))
                    .map(|s| s.as_str())
                    .unwrap_or(raw);
                CellValue::text(resolved)
            }
            Some("b") => CellValue::Bool(raw == "1"),
            Some("e") => CellValue::Error(raw.to_string()),
            Some("str") | Some("inlineStr") => CellValue::text(raw),
            _ => {
                // Number or general
                if raw.is_empty() {
                    return CellValue::Empty;
                }
                match raw.parse::<f64>() {
                    Ok(n) => {
                        let is_date = style
                            .map(|s| self.number_formats.is_date_style(s))
                            .unwrap_or(false);
                        match is_date.then(|| serial_to_iso(n)).flatten() {
                            Some(iso) => CellValue::DateTime(iso),
                            None => CellValue::Number(n),
                        }
                    }
                    Err(_) => CellValue::text(raw),
                }
            }
        }
    }

    /// Get the number of sheets.
    pub fn sheet_count(&self) -> usize {
        self.entries.len()
    }

    /// Get sheet names in workbook order.
    pub fn sheet_names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.name.as_str()).collect()
    }
}

/// Read a row element's 1-based index from its `r` attribute.
fn row_number(e: &BytesStart, fallback: u32) -> u32 {
    for attr in e.attributes().flatten() {
        if attr.key.as_ref() == b"r" {
            if let Ok(index) = String::from_utf8_lossy(&attr.value).parse() {
                return index;
            }
        }
    }
    fallback
}

/// Read a cell element's column index, type, and style attributes.
fn cell_attrs(e: &BytesStart, fallback_col: u32) -> (u32, Option<String>, Option<usize>) {
    let mut col = fallback_col;
    let mut cell_type = None;
    let mut style = None;

    for attr in e.attributes().flatten() {
        match attr.key.as_ref() {
            b"r" => {
                let cell_ref = String::from_utf8_lossy(&attr.value);
                if let Some(parsed) = column_from_ref(&cell_ref) {
                    col = parsed;
                }
            }
            b"t" => cell_type = Some(String::from_utf8_lossy(&attr.value).to_string()),
            b"s" => style = String::from_utf8_lossy(&attr.value).parse().ok(),
            _ => {}
        }
    }

    (col, cell_type, style)
}

/// Parse xl/sharedStrings.xml into the ordered string table.
///
/// Rich-text runs inside one `<si>` are concatenated.
fn parse_shared_strings(xml: &str) -> Result<Vec<String>> {
    let mut strings = Vec::new();
    let mut reader = quick_xml::Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    let mut in_si = false;
    let mut in_t = false;
    let mut current = String::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"si" => {
                    in_si = true;
                    current.clear();
                }
                b"t" if in_si => {
                    in_t = true;
                }
                _ => {}
            },
            Ok(Event::Text(e)) => {
                if in_t {
                    let text = e.unescape().unwrap_or_default();
                    current.push_str(&text);
                }
            }
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"si" => {
                    strings.push(current.clone());
                    in_si = false;
                }
                b"t" => {
                    in_t = false;
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(Error::XmlParse(e.to_string())),
            _ => {}
        }
        buf.clear();
    }

    Ok(strings)
}

/// Parse the column letters of a cell reference like `C7` into a 1-based
/// column index.
fn column_from_ref(cell_ref: &str) -> Option<u32> {
    let mut col = 0u32;
    let mut seen = false;

    for c in cell_ref.chars() {
        if !c.is_ascii_alphabetic() {
            break;
        }
        col = col * 26 + (c.to_ascii_uppercase() as u32 - 'A' as u32 + 1);
        seen = true;
    }

    seen.then_some(col)
}
