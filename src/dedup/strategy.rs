//! Duplicate-removal strategies over a sequence of cell values.
//!
//! Both strategies use first-occurrence-wins: a value at position `i` is a
//! duplicate iff an equal value exists at some earlier position. Positions
//! are always judged against the original sequence, not the partially
//! built result, so repeated empty cells flag every blank after the first.

use crate::model::CellValue;

/// Whether `values[index]` is the earliest occurrence of its value.
fn is_first_occurrence(values: &[CellValue], index: usize) -> bool {
    !values[..index].contains(&values[index])
}

/// Blank every duplicate in place of its value.
///
/// The output has the same length as the input; duplicate positions are
/// replaced with [`CellValue::Empty`].
pub fn null_duplicates(values: &[CellValue]) -> Vec<CellValue> {
    values
        .iter()
        .enumerate()
        .map(|(i, value)| {
            if is_first_occurrence(values, i) {
                value.clone()
            } else {
                CellValue::Empty
            }
        })
        .collect()
}

/// Drop every duplicate, keeping first occurrences in their original
/// relative order.
///
/// The output is as long as the number of distinct values in the input.
pub fn filter_duplicates(values: &[CellValue]) -> Vec<CellValue> {
    values
        .iter()
        .enumerate()
        .filter(|(i, _)| is_first_occurrence(values, *i))
        .map(|(_, value)| value.clone())
        .collect()
}
