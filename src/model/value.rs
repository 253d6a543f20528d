//! Cell value type and equality semantics.

use serde::{Deserialize, Serialize};

/// A single scalar cell value.
///
/// The variant set is closed so that equality is total and deterministic:
/// two values are equal iff they carry the same variant and the same payload.
/// `Empty == Empty` holds, which makes repeated blank cells deduplicate like
/// any other repeated value. Numeric and textual renderings of the same
/// logical value (`1.0` vs `"1"`) stay distinct.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum CellValue {
    /// An empty cell, or a duplicate blanked in null-mode.
    #[default]
    Empty,
    /// A numeric cell. Integers and floats share this variant, as xlsx
    /// stores every number as a double.
    Number(f64),
    /// A string cell (shared, inline, or formula-cached).
    Text(String),
    /// A boolean cell.
    Bool(bool),
    /// A date or datetime cell, rendered as ISO 8601.
    DateTime(String),
    /// An error cell such as `#DIV/0!`.
    Error(String),
}

impl CellValue {
    /// Whether this is the empty marker.
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Create a text value.
    pub fn text(value: impl Into<String>) -> Self {
        CellValue::Text(value.into())
    }

    /// Create a numeric value.
    pub fn number(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl std::fmt::Display for CellValue {
    /// Render the value as a CSV field.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::Text(s) => f.write_str(s),
            CellValue::Bool(true) => f.write_str("TRUE"),
            CellValue::Bool(false) => f.write_str("FALSE"),
            CellValue::DateTime(s) => f.write_str(s),
            CellValue::Error(s) => f.write_str(s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equality_is_structural() {
        assert_eq!(CellValue::Empty, CellValue::Empty);
        assert_eq!(CellValue::number(1.0), CellValue::number(1.0));
        assert_eq!(CellValue::text("a"), CellValue::text("a"));

        // No cross-variant normalization: the number 1 and the string "1" differ
        assert_ne!(CellValue::number(1.0), CellValue::text("1"));
        assert_ne!(CellValue::Bool(true), CellValue::text("TRUE"));
        assert_ne!(CellValue::Empty, CellValue::text(""));
    }

    #[test]
    fn test_display() {
        assert_eq!(CellValue::Empty.to_string(), "");
        assert_eq!(CellValue::number(2.0).to_string(), "2");
        assert_eq!(CellValue::number(2.5).to_string(), "2.5");
        assert_eq!(CellValue::text("hello").to_string(), "hello");
        assert_eq!(CellValue::Bool(true).to_string(), "TRUE");
        assert_eq!(CellValue::Bool(false).to_string(), "FALSE");
        assert_eq!(
            CellValue::DateTime("2021-01-01".to_string()).to_string(),
            "2021-01-01"
        );
        assert_eq!(CellValue::Error("#DIV/0!".to_string()).to_string(), "#DIV/0!");
    }
}
