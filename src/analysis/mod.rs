//! # Template Analysis Module
//!
//! Reads a spreadsheet template and reports what a form-filling tool needs to know
//! about it: which cells look like labels, which cells carry placeholders, which
//! fields can be proposed, and how table-like the sheet is. Every step is a heuristic;
//! scores in the report are rankings, not probabilities.
//!
//! The analysis runs in a fixed order:
//!
//! 1. [`selector`] picks the sheet with the most data.
//! 2. [`sampler`] bounds the rows and columns looked at on large sheets.
//! 3. [`classifier`] and [`pattern`] describe every non-blank sampled cell.
//! 4. [`structure`] measures the full, unsampled sheet.
//! 5. [`candidates`] and [`inventory`] turn classified cells into fields.
use crate::analysis::candidates::generate_field_candidates;
use crate::analysis::candidates::generate_suggestions;
use crate::analysis::classifier::classify_cell;
use crate::analysis::inventory::extract_fillable_fields;
use crate::analysis::report::AnalysisReport;
use crate::analysis::report::ClassifiedCell;
use crate::analysis::report::DataStructure;
use crate::analysis::sampler::analyzed_columns;
use crate::analysis::sampler::sample_rows;
use crate::analysis::selector::select_sheet;
use crate::analysis::structure::analyze_table_structure;
use crate::analysis::structure::find_data_start_row;
use crate::analysis::structure::find_likely_header_row;
use crate::error::TemplateSheetError;
use crate::spreadsheet::open_document;
use crate::spreadsheet::reference::coordinate_to_reference;
use crate::spreadsheet::Document;
use log::debug;
use log::info;
use std::collections::BTreeMap;
use thiserror::Error;

pub(crate) mod candidates;
pub(crate) mod classifier;
pub(crate) mod inventory;
pub(crate) mod pattern;
pub(crate) mod report;
pub(crate) mod sampler;
pub(crate) mod selector;
pub(crate) mod structure;

#[derive(Error, Debug)]
pub(crate) enum AnalysisError {
    #[error("Cannot open spreadsheet '{0}': {1}")]
    DocumentOpenError(String, String),

    #[error("Spreadsheet '{0}' has no sheets")]
    NoSheetsError(String),

    #[error("Cannot read sheet '{0}': {1}")]
    SheetReadError(String, String),
}

/// Opens and analyzes a spreadsheet file. The file is closed before returning.
pub(crate) fn analyze(file_name: &str) -> Result<AnalysisReport, TemplateSheetError> {
    let mut document = open_document(file_name)
        .map_err(|error| AnalysisError::DocumentOpenError(file_name.to_owned(), error.to_string()))?;
    analyze_document(document.as_mut())
}

/// Analyzes an opened document.
pub(crate) fn analyze_document(document: &mut dyn Document) -> Result<AnalysisReport, TemplateSheetError> {
    let file_name = document.name();
    let sheets = document.sheet_names();
    if sheets.is_empty() {
        return Err(AnalysisError::NoSheetsError(file_name).into());
    }

    let selection = select_sheet(document, &sheets);
    debug!("Analyzing sheet '{}' of '{}'", selection.sheet_name, file_name);

    let sample = sample_rows(&selection.rows);
    let column_count = sample.max_columns();
    let column_limit = analyzed_columns(column_count);

    let mut cell_data = BTreeMap::new();
    let mut header_candidates: Vec<ClassifiedCell> = Vec::new();
    let mut data_cells: Vec<ClassifiedCell> = Vec::new();
    for (row, row_index) in sample.iter() {
        for (column_index, value) in row.iter().take(column_limit).enumerate() {
            let text = value.trim();
            if text.is_empty() {
                continue;
            }
            let reference = match coordinate_to_reference(column_index + 1, row_index + 1) {
                Ok(reference) => reference,
                Err(error) => {
                    debug!("Skip cell: {}", error);
                    continue;
                }
            };

            cell_data.insert(reference.to_owned(), text.to_owned());
            let cell = classify_cell(reference, row_index, column_index, text);
            if cell.fillable.is_none() && cell.is_header {
                header_candidates.push(cell);
            } else {
                data_cells.push(cell);
            }
        }
    }

    let fillable_fields = extract_fillable_fields(&data_cells, &header_candidates);
    let field_candidates = generate_field_candidates(&header_candidates, &data_cells);
    let suggestions = generate_suggestions(&field_candidates);

    let has_merged_cells = match document.merged_regions(&selection.sheet_name) {
        Ok(regions) => !regions.is_empty(),
        Err(error) => {
            debug!("No merged regions for '{}': {}", selection.sheet_name, error);
            false
        }
    };
    let data_structure = DataStructure {
        likely_header_row: find_likely_header_row(&selection.rows),
        data_start_row: find_data_start_row(&selection.rows),
        has_merged_cells,
        table_structure: analyze_table_structure(&selection.rows),
    };

    info!(
        "Analyzed '{}' sheet '{}': {} header candidates, {} data cells, {} field candidates, {} fillable fields",
        file_name,
        selection.sheet_name,
        header_candidates.len(),
        data_cells.len(),
        field_candidates.len(),
        fillable_fields.total_count,
    );

    Ok(AnalysisReport {
        file_name,
        sheets,
        sheet_summaries: selection.summaries,
        active_sheet: selection.sheet_name,
        row_count: selection.rows.len(),
        column_count,
        cell_data,
        header_candidates,
        data_cells,
        field_candidates,
        fillable_fields,
        suggestions,
        data_structure,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::report::DataType;
    use crate::analysis::report::PatternType;
    use crate::analysis::report::TemplateSizeClass;
    use crate::spreadsheet::reference::MAX_ROW;
    use crate::spreadsheet::tests::rows;
    use crate::spreadsheet::xlsx::tests::workbook;
    use crate::spreadsheet::xlsx::tests::worksheet;
    use crate::spreadsheet::xlsx::XlsxDocument;
    use crate::spreadsheet::GridDocument;
    use serde_json::json;

    fn invoice_form() -> GridDocument {
        GridDocument::new("invoice.xlsx").with_sheet("Invoice", rows(&[
            &["Vendor Name:", "[VENDOR_NAME]"],
            &["Invoice Number:", "[INVOICE_NUMBER]"],
        ]))
    }

    #[test]
    fn analyzes_labelled_placeholders() {
        let report = analyze_document(&mut invoice_form()).unwrap();

        assert_eq!(report.active_sheet, "Invoice");
        let header_names: Vec<&str> = report.field_candidates.iter().map(|c| c.field_name.as_str()).collect();
        assert_eq!(header_names, vec!["vendor_name", "invoice_number"]);
        assert_eq!(report.header_candidates.len(), 2);
        assert_eq!(report.data_cells.len(), 2);
        assert!(report.data_cells.iter().all(|cell| {
            cell.fillable.as_ref().map(|f| f.pattern_type) == Some(PatternType::SingleBracketCaps)
        }));
        assert_eq!(report.data_structure.likely_header_row, 1);
        assert_eq!(report.data_structure.data_start_row, 2);
        assert!(!report.data_structure.has_merged_cells);
        assert_eq!(report.data_structure.table_structure.template_size_class, TemplateSizeClass::SimpleTemplate);
        assert_eq!(report.data_structure.table_structure.data_density, 1.0);

        assert_eq!(report.suggestions["vendor_name"], "A1");
        assert_eq!(report.suggestions["invoice_number"], "A2");
        assert_eq!(report.fillable_fields.total_count, 2);
        assert_eq!(report.fillable_fields.field_mapping["vendor_name"], "B1");
        assert_eq!(report.fillable_fields.field_mapping["invoice_number"], "B2");
        assert_eq!(report.cell_data.len(), 4);
        assert_eq!(report.cell_data["B2"], "[INVOICE_NUMBER]");
        assert_eq!(report.row_count, 2);
        assert_eq!(report.column_count, 2);
    }

    #[test]
    fn fillable_header_like_cells_are_data_cells() {
        let mut document = GridDocument::new("form.xlsx")
            .with_sheet("Form", rows(&[&["{{customer name}}", "Date:"]]))
            .with_merged_region("Form", "A1:B1");
        let report = analyze_document(&mut document).unwrap();

        assert_eq!(report.data_cells.len(), 1);
        assert_eq!(report.data_cells[0].cell.reference, "A1");
        assert!(report.data_cells[0].is_header);
        assert_eq!(report.header_candidates.len(), 1);
        assert_eq!(report.header_candidates[0].cell.reference, "B1");
        assert!(report.data_structure.has_merged_cells);
        assert!(!report.data_structure.table_structure.is_tabular);
    }

    #[test]
    fn large_sheets_keep_sheet_coordinates() {
        let mut grid = vec![vec!["Item".to_owned(), "Amount".to_owned()]];
        for index in 1..200 {
            grid.push(vec![format!("Item {}", index), format!("{}.50", index)]);
        }
        let mut document = GridDocument::new("ledger.xlsx").with_sheet("Ledger", grid);
        let report = analyze_document(&mut document).unwrap();

        assert_eq!(report.row_count, 200);
        assert_eq!(report.cell_data["B200"], "199.50");
        assert!(report.cell_data.contains_key("A11"));
        assert!(!report.cell_data.contains_key("A12"));
        assert!(report.data_cells.iter().any(|cell| cell.cell.row == 196));

        let inferred: Vec<_> = report.field_candidates.iter().filter(|c| c.inferred).collect();
        assert_eq!(inferred.len(), 2);
        assert_eq!(inferred[0].field_name, "column_a1_text");
        assert_eq!(inferred[1].field_name, "column_b1_number");
        assert_eq!(inferred[1].data_type, DataType::Number);
    }

    #[test]
    fn wide_sheets_analyze_first_twenty_columns() {
        let header: Vec<String> = (1..=25).map(|index| format!("[FIELD_{}]", index)).collect();
        let mut document = GridDocument::new("wide.xlsx").with_sheet("Wide", vec![header]);
        let report = analyze_document(&mut document).unwrap();

        assert_eq!(report.column_count, 25);
        assert_eq!(report.fillable_fields.total_count, 20);
        assert!(report.cell_data.contains_key("T1"));
        assert!(!report.cell_data.contains_key("U1"));
    }

    #[test]
    fn picks_busiest_sheet_and_summarizes_all() {
        let mut document = GridDocument::new("book.xlsx")
            .with_sheet("Cover", rows(&[&["Title"]]))
            .with_sheet("Form", rows(&[&["Name:", "<NAME>"], &["Phone:", "<PHONE>"]]));
        let report = analyze_document(&mut document).unwrap();

        assert_eq!(report.sheets, vec!["Cover", "Form"]);
        assert_eq!(report.active_sheet, "Form");
        assert_eq!(report.sheet_summaries.len(), 2);
        assert_eq!(report.sheet_summaries[0].non_empty_cell_count, 1);
    }

    #[test]
    fn out_of_range_date_serial_keeps_raw_text() {
        let styles = r#"<styleSheet><cellXfs count="2"><xf numFmtId="0"/><xf numFmtId="14"/></cellXfs></styleSheet>"#;
        let xml = worksheet(concat!(
            "<sheetData>",
            r#"<row r="1"><c r="A1" t="inlineStr"><is><t>Due Date:</t></is></c><c r="B1" s="1"><v>1e300</v></c></row>"#,
            r#"<row r="2"><c r="A2" t="inlineStr"><is><t>Start Date:</t></is></c><c r="B2" s="1"><v>45292</v></c></row>"#,
            "</sheetData>",
        ));
        let bytes = workbook(&[("Dates", &xml)], &[], Some(styles));
        let mut document = XlsxDocument::from_bytes("dates.xlsx", bytes).unwrap();
        let report = analyze_document(&mut document).unwrap();

        assert_eq!(report.cell_data["B1"], "1e300");
        assert_eq!(report.cell_data["B2"], "2024-01-01");
        assert_eq!(report.suggestions["due_date"], "A1");
    }

    #[test]
    fn cells_past_the_last_addressable_row_are_skipped() {
        let mut grid: Vec<Vec<String>> = vec![Vec::new(); MAX_ROW + 1];
        grid[0] = vec!["Name:".to_owned(), "[NAME]".to_owned()];
        grid[MAX_ROW - 1] = vec!["last".to_owned()];
        grid[MAX_ROW] = vec!["overflow".to_owned()];
        let mut document = GridDocument::new("tall.xlsx").with_sheet("Tall", grid);
        let report = analyze_document(&mut document).unwrap();

        assert_eq!(report.row_count, MAX_ROW + 1);
        assert_eq!(report.cell_data.len(), 3);
        assert_eq!(report.cell_data["A1048576"], "last");
        assert!(!report.cell_data.values().any(|text| text == "overflow"));
        assert!(report.data_cells.iter().all(|cell| cell.cell.row < MAX_ROW));
        assert_eq!(report.fillable_fields.field_mapping["name"], "B1");
        assert_eq!(report.suggestions["name"], "A1");
    }

    #[test]
    fn document_without_sheets_fails() {
        let error = analyze_document(&mut GridDocument::new("empty.xlsx")).unwrap_err();
        assert_eq!(error.to_string(), "Spreadsheet 'empty.xlsx' has no sheets");
    }

    #[test]
    fn unopenable_file_fails() {
        let error = analyze("missing-template.xlsx").unwrap_err();
        assert!(error.to_string().starts_with("Cannot open spreadsheet 'missing-template.xlsx': "));
        assert!(analyze("template.csv").is_err());
    }

    #[test]
    fn analyzes_workbook_file() {
        let xml = worksheet(concat!(
            "<sheetData>",
            r#"<row r="1"><c r="A1" t="s"><v>0</v></c><c r="B1" t="inlineStr"><is><t>[[Client Name]]</t></is></c></row>"#,
            r#"<row r="2"><c r="A2" t="s"><v>1</v></c><c r="B2"><v>1200.5</v></c></row>"#,
            "</sheetData>",
            r#"<mergeCells count="1"><mergeCell ref="C1:D1"/></mergeCells>"#,
        ));
        let bytes = workbook(&[("Quote", &xml)], &["Client:", "Total:"], None);
        let path = std::env::temp_dir().join(format!("rusty-template-{}.xlsx", std::process::id()));
        std::fs::write(&path, bytes).unwrap();

        let file_name = path.to_string_lossy().to_string();
        let report = analyze(&file_name);
        std::fs::remove_file(&path).unwrap();
        let report = report.unwrap();

        assert_eq!(report.file_name, file_name);
        assert!(report.data_structure.has_merged_cells);
        assert_eq!(report.cell_data["B2"], "1200.5");
        assert_eq!(report.fillable_fields.field_mapping["client_name"], "B1");
        assert_eq!(report.suggestions["client"], "A1");
        assert_eq!(report.suggestions["total"], "A2");
    }

    #[test]
    fn report_serializes_with_wire_names() {
        let bytes = workbook(
            &[("Form", &worksheet(r#"<sheetData><row r="1"><c r="A1" t="inlineStr"><is><t>Email:</t></is></c><c r="B1" t="inlineStr"><is><t>{EMAIL}</t></is></c></row></sheetData>"#))],
            &[],
            None,
        );
        let mut document = XlsxDocument::from_bytes("form.xlsx", bytes).unwrap();
        let report = analyze_document(&mut document).unwrap();
        let value = serde_json::to_value(&report).unwrap();

        assert_eq!(value["active_sheet"], json!("Form"));
        assert_eq!(value["field_candidates"][0], json!({
            "field_name": "email",
            "display_name": "Email:",
            "source_cell": "A1",
            "data_type": "text",
            "keywords": ["email"],
            "confidence": 1.0,
            "inferred": false,
        }));
        assert_eq!(value["fillable_fields"]["patterns"], json!({ "single_curly_caps": 1 }));
        assert_eq!(value["data_cells"][0]["cell"], json!("B1"));
        assert_eq!(value["data_structure"]["table_structure"]["is_tabular"], json!(false));
        assert_eq!(value["suggestions"], json!({ "email": "A1" }));
    }
}
