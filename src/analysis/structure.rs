//! Layout statistics over the full rows of a sheet.
use crate::analysis::report::TableStructure;
use crate::analysis::report::TemplateSizeClass;
use std::collections::HashMap;

/// Rows searched for the header row.
const HEADER_SEARCH_ROWS: usize = 5;

const LARGE_TEMPLATE_COLUMNS: usize = 10;
const LARGE_TEMPLATE_ROWS: usize = 20;
const MEDIUM_TEMPLATE_COLUMNS: usize = 5;
const MEDIUM_TEMPLATE_ROWS: usize = 10;

impl Default for TableStructure {
    fn default() -> Self {
        Self {
            is_tabular: true,
            has_headers: false,
            uniform_columns: true,
            varying_widths: false,
            data_density: 0.0,
            empty_row_count: 0,
            max_columns: 0,
            common_column_count: 0,
            column_variation_count: 0,
            template_size_class: TemplateSizeClass::SimpleTemplate,
        }
    }
}

impl TemplateSizeClass {
    pub(crate) fn classify(max_columns: usize, row_count: usize) -> Self {
        if max_columns > LARGE_TEMPLATE_COLUMNS && row_count > LARGE_TEMPLATE_ROWS {
            Self::LargeAdminTemplate
        } else if max_columns > MEDIUM_TEMPLATE_COLUMNS && row_count > MEDIUM_TEMPLATE_ROWS {
            Self::MediumTemplate
        } else {
            Self::SimpleTemplate
        }
    }
}

/// Describes how table-like a sheet is. Rows keep their own lengths.
pub(crate) fn analyze_table_structure(rows: &[Vec<String>]) -> TableStructure {
    let mut structure = TableStructure {
        has_headers: !rows.is_empty(),
        ..Default::default()
    };
    if rows.len() < 2 {
        structure.is_tabular = false;
        return structure;
    }

    // Row length -> (occurrences, first row with that length)
    let mut widths: HashMap<usize, (usize, usize)> = HashMap::new();
    let mut total_cells = 0;
    let mut filled_cells = 0;
    for (index, row) in rows.iter().enumerate() {
        widths.entry(row.len()).or_insert((0, index)).0 += 1;
        structure.max_columns = structure.max_columns.max(row.len());

        let filled = row.iter().filter(|cell| !cell.trim().is_empty()).count();
        if filled == 0 {
            structure.empty_row_count += 1;
        }
        total_cells += row.len();
        filled_cells += filled;
    }

    if total_cells > 0 {
        structure.data_density = filled_cells as f64 / total_cells as f64;
    }

    structure.column_variation_count = widths.len();
    structure.uniform_columns = widths.len() == 1;
    structure.varying_widths = !structure.uniform_columns;
    structure.common_column_count = widths
        .iter()
        .max_by(|(_, (count_a, first_a)), (_, (count_b, first_b))| {
            count_a.cmp(count_b).then(first_b.cmp(first_a))
        })
        .map(|(width, _)| *width)
        .unwrap_or(0);
    structure.template_size_class = TemplateSizeClass::classify(structure.max_columns, rows.len());
    structure
}

/// 1-based row with the most non-blank cells among the first five; the earliest wins
/// a tie. 0 when those rows are all blank.
pub(crate) fn find_likely_header_row(rows: &[Vec<String>]) -> usize {
    let mut header_row = 0;
    let mut max_cells = 0;
    for (index, row) in rows.iter().take(HEADER_SEARCH_ROWS).enumerate() {
        let filled = row.iter().filter(|cell| !cell.trim().is_empty()).count();
        if filled > max_cells {
            max_cells = filled;
            header_row = index + 1;
        }
    }
    header_row
}

/// Row right after the likely header row.
pub(crate) fn find_data_start_row(rows: &[Vec<String>]) -> usize {
    find_likely_header_row(rows) + 1
}
