//! Field candidates proposed from header labels and from column data types.
use crate::analysis::report::ClassifiedCell;
use crate::analysis::report::DataType;
use crate::analysis::report::FieldCandidate;
use crate::spreadsheet::reference::coordinate_to_reference;
use std::collections::BTreeMap;

const BASE_CONFIDENCE: f64 = 0.5;
const TOP_ROWS_BONUS: f64 = 0.3;
const EARLY_ROWS_BONUS: f64 = 0.1;
const KEYWORDS_BONUS: f64 = 0.2;
const INFERRED_CONFIDENCE: f64 = 0.6;

/// Turns a label into an identifier: `"Vendor Name:"` becomes `vendor_name`.
///
/// `:#()` are removed before spaces and hyphens become underscores, so `"Invoice #"`
/// gives `invoice`. Other punctuation is dropped and a leading digit gets a `field_`
/// prefix.
pub(crate) fn generate_field_name(display_name: &str) -> String {
    let stripped = display_name.to_lowercase().replace([':', '#', '(', ')'], "");
    let field_name: String = stripped
        .trim()
        .chars()
        .map(|c| if c == ' ' || c == '-' { '_' } else { c })
        .filter(|c| c.is_alphanumeric() || *c == '_')
        .collect();

    if field_name.starts_with(|c: char| c.is_ascii_digit()) {
        format!("field_{}", field_name)
    } else {
        field_name
    }
}

/// Scores a header cell from its 1-based row and whether it has keywords. Always
/// within `0.5..=1.0`.
pub(crate) fn calculate_confidence(header: &ClassifiedCell) -> f64 {
    let mut confidence = BASE_CONFIDENCE;
    if header.cell.row <= 2 {
        confidence += TOP_ROWS_BONUS;
    } else if header.cell.row <= 5 {
        confidence += EARLY_ROWS_BONUS;
    }
    if !header.keywords.is_empty() {
        confidence += KEYWORDS_BONUS;
    }
    confidence
}

fn header_candidate(header: &ClassifiedCell) -> FieldCandidate {
    FieldCandidate {
        field_name: generate_field_name(&header.cell.raw_text),
        display_name: header.cell.raw_text.to_owned(),
        source_cell: header.cell.reference.to_owned(),
        data_type: header.data_type,
        keywords: header.keywords.clone(),
        confidence: calculate_confidence(header),
        inferred: false,
    }
}

/// Most frequent data type; the type seen first wins a tie.
fn dominant_data_type<'a>(cells: impl Iterator<Item = &'a ClassifiedCell>) -> Option<(DataType, usize)> {
    let mut tally: Vec<(DataType, usize)> = Vec::new();
    for cell in cells {
        match tally.iter_mut().find(|(data_type, _)| *data_type == cell.data_type) {
            Some((_, count)) => *count += 1,
            None => tally.push((cell.data_type, 1)),
        }
    }

    let mut dominant: Option<(DataType, usize)> = None;
    for (data_type, count) in tally {
        if dominant.map_or(true, |(_, max_count)| count > max_count) {
            dominant = Some((data_type, count));
        }
    }
    dominant
}

/// Candidate named after a column's dominant type, anchored to row 1 of the column.
fn inferred_candidate(column: usize, data_type: DataType) -> Option<FieldCandidate> {
    let reference = coordinate_to_reference(column, 1).ok()?;
    let lower_reference = reference.to_lowercase();
    Some(FieldCandidate {
        field_name: format!("column_{}_{}", lower_reference, data_type.as_str()),
        display_name: format!("Column {} ({})", reference, data_type.title()),
        source_cell: reference,
        data_type,
        keywords: vec![data_type.as_str().to_owned(), "column".to_owned(), lower_reference],
        confidence: INFERRED_CONFIDENCE,
        inferred: true,
    })
}

/// One candidate per header cell, followed by one inferred candidate for each column
/// whose data cells number more than two and share a type more than once. Columns are
/// visited left to right. The two sources are not merged.
pub(crate) fn generate_field_candidates(
    header_candidates: &[ClassifiedCell],
    data_cells: &[ClassifiedCell],
) -> Vec<FieldCandidate> {
    let mut candidates: Vec<FieldCandidate> = header_candidates.iter().map(header_candidate).collect();

    let mut columns: BTreeMap<usize, Vec<&ClassifiedCell>> = BTreeMap::new();
    for cell in data_cells {
        columns.entry(cell.cell.column).or_default().push(cell);
    }

    for (column, cells) in columns {
        if cells.len() <= 2 {
            continue;
        }
        if let Some((data_type, count)) = dominant_data_type(cells.into_iter()) {
            if count > 1 {
                candidates.extend(inferred_candidate(column, data_type));
            }
        }
    }
    candidates
}

/// Maps field names to source cells in candidate order. A later candidate replaces an
/// earlier one with the same name; empty names are skipped.
pub(crate) fn generate_suggestions(candidates: &[FieldCandidate]) -> BTreeMap<String, String> {
    let mut suggestions = BTreeMap::new();
    for candidate in candidates {
        if !candidate.field_name.is_empty() {
            suggestions.insert(candidate.field_name.to_owned(), candidate.source_cell.to_owned());
        }
    }
    suggestions
}
