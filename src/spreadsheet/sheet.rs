use crate::spreadsheet::cell::Cell;
use crate::spreadsheet::MergedRegion;
use crate::spreadsheet::Rows;

/// Cells and merge metadata collected from one worksheet part.
#[derive(Debug, Default)]
pub(crate) struct Sheet {
    /// Sheet name
    pub(crate) name: String,
    /// Rendered text by 0-based (row, col), ragged
    rows: Rows,
    /// `<mergeCell>` regions in document order
    pub(crate) merged_regions: Vec<MergedRegion>,
}

impl Sheet {
    pub(crate) fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            ..Self::default()
        }
    }

    /// Adds a cell. Cells rendering to an empty string are dropped, so every row
    /// ends with its last non-empty cell and gaps are padded with `""`.
    pub(crate) fn push(&mut self, cell: Cell) {
        // Malformed serials keep their stored text
        let text = cell.to_text().unwrap_or_else(|_| cell.value.to_owned());
        if text.is_empty() {
            return;
        }
        if self.rows.len() <= cell.row {
            self.rows.resize_with(cell.row + 1, Vec::new);
        }
        let row = &mut self.rows[cell.row];
        if row.len() <= cell.col {
            row.resize(cell.col + 1, String::new());
        }
        row[cell.col] = text;
    }

    pub(crate) fn push_merged_region(&mut self, reference: &str) {
        self.merged_regions.push(MergedRegion::new(reference));
    }

    pub(crate) fn into_rows(self) -> Rows {
        self.rows
    }
}
