//! Conversions between numeric cell coordinates and `A1`-style references.

use thiserror::Error;

/// Largest column number a worksheet can address (`XFD`).
pub(crate) const MAX_COLUMN: usize = 16_384;
/// Largest row number a worksheet can address.
pub(crate) const MAX_ROW: usize = 1_048_576;

#[derive(Error, Debug, PartialEq)]
pub(crate) enum ReferenceError {
    #[error("Invalid cell coordinates: column {column}, row {row}")]
    CoordinateError { column: usize, row: usize },
}

/// Converts a 1-based column number to its letters (`1` → `A`, `27` → `AA`).
pub(crate) fn column_to_name(column: usize) -> String {
    let mut column = column;
    let mut name = Vec::<u8>::new();
    while column > 0 {
        column -= 1;
        name.push(b'A' + (column % 26) as u8);
        column /= 26;
    }
    name.reverse();
    String::from_utf8(name).unwrap_or_default()
}

/// Converts 1-based (column, row) coordinates to a cell reference such as `C7`.
pub(crate) fn coordinate_to_reference(column: usize, row: usize) -> Result<String, ReferenceError> {
    if column == 0 || row == 0 || column > MAX_COLUMN || row > MAX_ROW {
        Err(ReferenceError::CoordinateError { column, row })
    } else {
        Ok(format!("{}{}", column_to_name(column), row))
    }
}

/// Parses a cell reference into 0-based (row, col) indexes.
/// `$` anchors are ignored; anything else malformed yields `None`.
pub(crate) fn reference_to_index(reference: &str) -> Option<(usize, usize)> {
    let reference = reference.replace('$', "");
    let split = reference.find(|c: char| c.is_ascii_digit())?;
    let (letters, digits) = reference.split_at(split);
    if letters.is_empty() || !letters.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    let col = letters
        .bytes()
        .map(|b| (b.to_ascii_uppercase() - b'A') as usize + 1)
        .try_fold(0usize, |acc, digit| acc.checked_mul(26)?.checked_add(digit))?;
    let row = digits.parse::<usize>().ok()?;
    if row == 0 || col > MAX_COLUMN || row > MAX_ROW {
        None
    } else {
        Some((row - 1, col - 1))
    }
}
