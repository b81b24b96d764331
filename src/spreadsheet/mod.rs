//! # Spreadsheet Reading Module
//!
//! Turns a workbook file into the plain shape the analysis works on: an ordered list
//! of sheet names, and for each sheet a ragged grid of display strings plus its merged
//! regions. Office Open XML packages (`.xlsx`, `.xlsm`, `.xltx`, `.xltm`, `.xlam`) are
//! read with a streaming parser; [`GridDocument`] serves grids already held in memory.
use crate::error::TemplateSheetError;
use std::ffi::OsStr;
use std::path::Path;
use thiserror::Error;

pub(crate) mod cell;
pub(crate) mod excel;
pub(crate) mod reference;
pub(crate) mod sheet;
pub(crate) mod xlsx;

use crate::spreadsheet::xlsx::XlsxDocument;

#[derive(Error, Debug)]
pub(crate) enum SpreadsheetError {
    #[error("Cannot detect file format for '{0}'")]
    InvalidFileFormatError(String),

    #[error("Part '{0}' not found in spreadsheet")]
    PartNotFoundError(String),

    #[error("Sheet '{0}' not found in spreadsheet")]
    SheetNotFoundError(String),

    #[error("Date serial '{0}' is out of range")]
    DateOutOfRangeError(String),
}

/// Rows of a sheet, top to bottom. Rows have their own lengths.
pub(crate) type Rows = Vec<Vec<String>>;

/// A merged cell range such as `A1:C1`.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct MergedRegion {
    pub(crate) reference: String,
}

impl MergedRegion {
    pub(crate) fn new(reference: &str) -> Self {
        Self { reference: reference.to_owned() }
    }
}

/// A workbook opened for reading.
pub(crate) trait Document {
    /// Name used in messages, normally the file name.
    fn name(&self) -> String;

    /// Sheet names in workbook order.
    fn sheet_names(&self) -> Vec<String>;

    /// Display text of every row of a sheet.
    fn rows(&mut self, sheet_name: &str) -> Result<Rows, TemplateSheetError>;

    /// Merged regions declared on a sheet.
    fn merged_regions(&mut self, sheet_name: &str) -> Result<Vec<MergedRegion>, TemplateSheetError>;
}

/// Opens a workbook, choosing the reader from the file extension.
pub(crate) fn open_document(file_name: &str) -> Result<Box<dyn Document>, TemplateSheetError> {
    let extension = Path::new(file_name)
        .extension()
        .and_then(OsStr::to_str)
        .map(|extension| extension.to_ascii_lowercase());
    match extension.as_deref() {
        Some("xlsx") | Some("xlsm") | Some("xltx") | Some("xltm") | Some("xlam") => {
            Ok(Box::new(XlsxDocument::open(file_name)?))
        }
        _ => Err(SpreadsheetError::InvalidFileFormatError(file_name.to_owned()))?,
    }
}

/// In-memory workbook: named sheets of rows with optional merged regions.
#[cfg(test)]
#[derive(Clone, Debug, Default)]
pub(crate) struct GridDocument {
    name: String,
    sheets: Vec<(String, Rows, Vec<MergedRegion>)>,
}

#[cfg(test)]
impl GridDocument {
    pub(crate) fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            sheets: Vec::new(),
        }
    }

    pub(crate) fn with_sheet(mut self, sheet_name: &str, rows: Rows) -> Self {
        self.sheets.push((sheet_name.to_owned(), rows, Vec::new()));
        self
    }

    /// Declares a merged region on an already added sheet.
    pub(crate) fn with_merged_region(mut self, sheet_name: &str, reference: &str) -> Self {
        if let Some((_, _, regions)) = self.sheets.iter_mut().find(|(name, _, _)| name == sheet_name) {
            regions.push(MergedRegion::new(reference));
        }
        self
    }

    fn sheet(&self, sheet_name: &str) -> Result<&(String, Rows, Vec<MergedRegion>), TemplateSheetError> {
        self.sheets
            .iter()
            .find(|(name, _, _)| name == sheet_name)
            .ok_or_else(|| SpreadsheetError::SheetNotFoundError(sheet_name.to_owned()).into())
    }
}

#[cfg(test)]
impl Document for GridDocument {
    fn name(&self) -> String {
        self.name.to_owned()
    }

    fn sheet_names(&self) -> Vec<String> {
        self.sheets.iter().map(|(name, _, _)| name.to_owned()).collect()
    }

    fn rows(&mut self, sheet_name: &str) -> Result<Rows, TemplateSheetError> {
        Ok(self.sheet(sheet_name)?.1.clone())
    }

    fn merged_regions(&mut self, sheet_name: &str) -> Result<Vec<MergedRegion>, TemplateSheetError> {
        Ok(self.sheet(sheet_name)?.2.clone())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Builds ragged rows from string literals.
    pub(crate) fn rows(grid: &[&[&str]]) -> Rows {
        grid.iter()
            .map(|row| row.iter().map(|cell| cell.to_string()).collect())
            .collect()
    }

    #[test]
    fn grid_document_serves_sheets() {
        let mut document = GridDocument::new("memory")
            .with_sheet("Summary", rows(&[&["Total"]]))
            .with_sheet("Lines", rows(&[&["Item", "Qty"], &["Pen"]]))
            .with_merged_region("Lines", "A1:B1");

        assert_eq!(document.name(), "memory");
        assert_eq!(document.sheet_names(), vec!["Summary", "Lines"]);
        assert_eq!(document.rows("Lines").unwrap(), rows(&[&["Item", "Qty"], &["Pen"]]));
        assert_eq!(document.merged_regions("Lines").unwrap(), vec![MergedRegion::new("A1:B1")]);
        assert!(document.merged_regions("Summary").unwrap().is_empty());
        assert!(document.rows("Missing").is_err());
    }

    #[test]
    fn open_document_rejects_unknown_extensions() {
        let error = open_document("notes.txt").err().unwrap();
        assert_eq!(error.to_string(), "Cannot detect file format for 'notes.txt'");
        assert!(open_document("missing.xlsx").is_err());
    }
}
