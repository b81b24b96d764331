//! Chooses the sheet to analyze.
use crate::analysis::report::SheetSummary;
use crate::analysis::AnalysisError;
use crate::spreadsheet::Document;
use crate::spreadsheet::Rows;
use log::debug;
use log::warn;

/// The chosen sheet with its rows, plus a summary of every readable sheet.
#[derive(Debug)]
pub(crate) struct SheetSelection {
    pub(crate) sheet_name: String,
    pub(crate) rows: Rows,
    pub(crate) summaries: Vec<SheetSummary>,
}

/// Non-blank cells across ragged rows.
pub(crate) fn count_non_empty_cells(rows: &[Vec<String>]) -> usize {
    rows.iter()
        .flatten()
        .filter(|cell| !cell.trim().is_empty())
        .count()
}

fn summarize(sheet_name: &str, rows: &[Vec<String>]) -> SheetSummary {
    SheetSummary {
        sheet_name: sheet_name.to_owned(),
        row_count: rows.len(),
        column_count: rows.iter().map(Vec::len).max().unwrap_or(0),
        non_empty_cell_count: count_non_empty_cells(rows),
    }
}

/// Picks the sheet holding the most non-blank cells; the earliest sheet wins a tie.
///
/// Sheets that fail to read are skipped. When no sheet holds data the first sheet is
/// chosen, with no rows if it could not be read. `sheet_names` must not be empty.
pub(crate) fn select_sheet(document: &mut dyn Document, sheet_names: &[String]) -> SheetSelection {
    let mut summaries = Vec::with_capacity(sheet_names.len());
    let mut best: Option<(usize, Rows)> = None;
    let mut best_count = 0;
    let mut first_rows: Option<Rows> = None;

    for (index, sheet_name) in sheet_names.iter().enumerate() {
        let rows = match document.rows(sheet_name) {
            Ok(rows) => rows,
            Err(error) => {
                let error = AnalysisError::SheetReadError(sheet_name.to_owned(), error.to_string());
                warn!("Skip sheet in '{}': {}", document.name(), error);
                continue;
            }
        };

        let summary = summarize(sheet_name, &rows);
        debug!("Sheet '{}' has {} non-empty cells", sheet_name, summary.non_empty_cell_count);
        if summary.non_empty_cell_count > best_count {
            best_count = summary.non_empty_cell_count;
            best = Some((index, rows));
        } else if index == 0 {
            first_rows = Some(rows);
        }
        summaries.push(summary);
    }

    let (index, rows) = best.unwrap_or_else(|| (0, first_rows.unwrap_or_default()));
    SheetSelection {
        sheet_name: sheet_names.get(index).cloned().unwrap_or_default(),
        rows,
        summaries,
    }
}
