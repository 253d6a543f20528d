//! Number format parsing for date cell detection.
//!
//! Dates in xlsx are plain numbers whose cell style points at a date
//! number format. The loader uses this module to decide whether a numeric
//! cell should surface as a `DateTime` value.

use std::collections::HashMap;

/// Number formats parsed from `xl/styles.xml`.
#[derive(Debug, Default)]
pub struct NumberFormats {
    /// Custom number formats: numFmtId -> formatCode
    custom: HashMap<u32, String>,
    /// Cell style formats: style index -> numFmtId
    cell_xfs: Vec<u32>,
}

impl NumberFormats {
    /// Parse number formats from `xl/styles.xml` content.
    ///
    /// Malformed styles parts degrade to "no date formats" rather than
    /// failing the whole load.
    pub fn parse(xml: &str) -> Self {
        let mut formats = Self::default();
        let mut reader = quick_xml::Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut buf = Vec::new();
        let mut in_num_fmts = false;
        let mut in_cell_xfs = false;

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(quick_xml::events::Event::Start(ref e))
                | Ok(quick_xml::events::Event::Empty(ref e)) => match e.name().as_ref() {
                    b"numFmts" => in_num_fmts = true,
                    b"cellXfs" => in_cell_xfs = true,
                    b"numFmt" if in_num_fmts => {
                        let mut id: Option<u32> = None;
                        let mut code = String::new();
                        for attr in e.attributes().flatten() {
                            match attr.key.as_ref() {
                                b"numFmtId" => {
                                    id = String::from_utf8_lossy(&attr.value).parse().ok();
                                }
                                b"formatCode" => {
                                    code = String::from_utf8_lossy(&attr.value).to_string();
                                }
                                _ => {}
                            }
                        }
                        if let Some(id) = id {
                            formats.custom.insert(id, code);
                        }
                    }
                    b"xf" if in_cell_xfs => {
                        let mut num_fmt_id = 0u32;
                        for attr in e.attributes().flatten() {
                            if attr.key.as_ref() == b"numFmtId" {
                                if let Ok(id) = String::from_utf8_lossy(&attr.value).parse() {
                                    num_fmt_id = id;
                                }
                            }
                        }
                        formats.cell_xfs.push(num_fmt_id);
                    }
                    _ => {}
                },
                Ok(quick_xml::events::Event::End(ref e)) => match e.name().as_ref() {
                    b"numFmts" => in_num_fmts = false,
                    b"cellXfs" => in_cell_xfs = false,
                    _ => {}
                },
                Ok(quick_xml::events::Event::Eof) => break,
                Err(_) => break,
                _ => {}
            }
            buf.clear();
        }

        formats
    }

    /// Whether the cell style at `style_index` formats its value as a date.
    pub fn is_date_style(&self, style_index: usize) -> bool {
        match self.cell_xfs.get(style_index) {
            Some(&id) => self.is_date_format(id),
            None => false,
        }
    }

    /// Whether a numFmtId resolves to a date or time format.
    fn is_date_format(&self, num_fmt_id: u32) -> bool {
        // Built-in ids: 14-22 are dates, 45-47 are times
        if (14..=22).contains(&num_fmt_id) || (45..=47).contains(&num_fmt_id) {
            return true;
        }

        self.custom
            .get(&num_fmt_id)
            .is_some_and(|code| is_date_format_code(code))
    }
}

/// Whether a custom format code contains date placeholders.
///
/// Day and year placeholders (`d`, `y`) only ever mean dates. A lone `m`
/// is ambiguous (month vs. minute) and counts only when the code also has
/// a day or year part. Literal text in quotes and color/locale markers in
/// brackets are ignored.
fn is_date_format_code(code: &str) -> bool {
    let mut stripped = String::with_capacity(code.len());
    let mut in_bracket = false;
    let mut in_quote = false;

    for c in code.chars() {
        match c {
            '[' if !in_quote => in_bracket = true,
            ']' if !in_quote => in_bracket = false,
            '"' if !in_bracket => in_quote = !in_quote,
            _ if !in_bracket && !in_quote => stripped.push(c.to_ascii_lowercase()),
            _ => {}
        }
    }

    stripped.contains('d') || stripped.contains('y')
}

/// Convert an Excel serial date number to an ISO 8601 string.
///
/// The serial counts days since the 1900 epoch, with the fractional part
/// carrying the time of day. Serial 60 is the nonexistent Feb 29, 1900
/// that Excel keeps for Lotus 1-2-3 compatibility; serials past it are
/// shifted down by one day.
pub fn serial_to_iso(serial: f64) -> Option<String> {
    if serial < 0.0 {
        return None;
    }

    let adjusted = if serial > 60.0 { serial - 1.0 } else { serial };
    let days = adjusted.floor() as i64;
    let (year, month, day) = days_to_ymd(days)?;

    let fraction = serial.fract();
    if fraction > 0.0001 {
        let total_seconds = (fraction * 86400.0).round() as u32;
        Some(format!(
            "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}",
            year,
            month,
            day,
            total_seconds / 3600,
            (total_seconds % 3600) / 60,
            total_seconds % 60
        ))
    } else {
        Some(format!("{:04}-{:02}-{:02}", year, month, day))
    }
}

/// Convert a day count (day 1 = 1900-01-01) to (year, month, day).
fn days_to_ymd(days: i64) -> Option<(i32, u32, u32)> {
    if days < 1 {
        return None;
    }

    let mut year = 1900i32;
    let mut remaining = days;

    loop {
        let in_year = if is_leap_year(year) { 366 } else { 365 };
        if remaining <= in_year {
            break;
        }
        remaining -= in_year;
        year += 1;
    }

    const MONTH_DAYS: [i64; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];
    let mut month = 1u32;
    for (i, &base) in MONTH_DAYS.iter().enumerate() {
        let in_month = if i == 1 && is_leap_year(year) { 29 } else { base };
        if remaining <= in_month {
            break;
        }
        remaining -= in_month;
        month += 1;
    }

    Some((year, month, remaining.max(1) as u32))
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}
