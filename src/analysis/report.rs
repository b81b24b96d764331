//! Records making up an [`AnalysisReport`]. Field names are serialized as-is and
//! form the wire format consumed by template tooling.
use serde::Serialize;
use std::collections::BTreeMap;

/// Inferred kind of a cell's text.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum DataType {
    Currency,
    Number,
    Date,
    Email,
    Phone,
    Text,
}

impl DataType {
    pub(crate) const fn as_str(&self) -> &'static str {
        match self {
            Self::Currency => "currency",
            Self::Number => "number",
            Self::Date => "date",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Text => "text",
        }
    }

    /// Capitalized name used in display labels.
    pub(crate) const fn title(&self) -> &'static str {
        match self {
            Self::Currency => "Currency",
            Self::Number => "Number",
            Self::Date => "Date",
            Self::Email => "Email",
            Self::Phone => "Phone",
            Self::Text => "Text",
        }
    }
}

/// Placeholder syntaxes, listed in matching precedence.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum PatternType {
    /// `[[field name]]`
    DoubleBracket,
    /// `[FIELD_NAME]`
    SingleBracketCaps,
    /// `{{field name}}`
    DoubleCurly,
    /// `{FIELD_NAME}`
    SingleCurlyCaps,
    /// `<FIELD_NAME>`
    AngleBrackets,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum TemplateSizeClass {
    #[default]
    SimpleTemplate,
    MediumTemplate,
    LargeAdminTemplate,
}

/// A non-blank cell of the analyzed sheet. `row` and `column` are 1-based and
/// refer to the sheet, not to the sample.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub(crate) struct Cell {
    #[serde(rename = "cell")]
    pub(crate) reference: String,
    pub(crate) row: usize,
    pub(crate) column: usize,
    /// Text with surrounding whitespace trimmed
    pub(crate) raw_text: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub(crate) struct FillableInfo {
    pub(crate) pattern_type: PatternType,
    pub(crate) field_name: String,
    pub(crate) placeholder_text: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub(crate) struct ClassifiedCell {
    #[serde(flatten)]
    pub(crate) cell: Cell,
    pub(crate) data_type: DataType,
    pub(crate) is_header: bool,
    pub(crate) keywords: Vec<String>,
    pub(crate) fillable: Option<FillableInfo>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub(crate) struct FieldCandidate {
    pub(crate) field_name: String,
    pub(crate) display_name: String,
    pub(crate) source_cell: String,
    pub(crate) data_type: DataType,
    pub(crate) keywords: Vec<String>,
    pub(crate) confidence: f64,
    /// Derived from a column's dominant data type instead of a header cell
    pub(crate) inferred: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub(crate) struct SheetSummary {
    pub(crate) sheet_name: String,
    pub(crate) row_count: usize,
    pub(crate) column_count: usize,
    pub(crate) non_empty_cell_count: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub(crate) struct TableStructure {
    pub(crate) is_tabular: bool,
    pub(crate) has_headers: bool,
    pub(crate) uniform_columns: bool,
    pub(crate) varying_widths: bool,
    pub(crate) data_density: f64,
    pub(crate) empty_row_count: usize,
    pub(crate) max_columns: usize,
    pub(crate) common_column_count: usize,
    pub(crate) column_variation_count: usize,
    pub(crate) template_size_class: TemplateSizeClass,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub(crate) struct DataStructure {
    /// 1-based, 0 when none of the first rows holds data
    pub(crate) likely_header_row: usize,
    pub(crate) data_start_row: usize,
    pub(crate) has_merged_cells: bool,
    pub(crate) table_structure: TableStructure,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub(crate) struct FillableField {
    pub(crate) cell: String,
    pub(crate) value: String,
    pub(crate) row: usize,
    pub(crate) column: usize,
    pub(crate) pattern_type: PatternType,
    pub(crate) field_name: String,
    pub(crate) placeholder: String,
    pub(crate) data_type: DataType,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub(crate) struct FillableInventory {
    pub(crate) fields: Vec<FillableField>,
    /// Occurrences per placeholder syntax
    pub(crate) patterns: BTreeMap<PatternType, usize>,
    /// Field name → cell reference; a repeated name keeps its last cell
    pub(crate) field_mapping: BTreeMap<String, String>,
    pub(crate) total_count: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub(crate) struct AnalysisReport {
    pub(crate) file_name: String,
    pub(crate) sheets: Vec<String>,
    pub(crate) sheet_summaries: Vec<SheetSummary>,
    pub(crate) active_sheet: String,
    /// Rows of the active sheet
    pub(crate) row_count: usize,
    /// Widest sampled row, before the analyzed column cap
    pub(crate) column_count: usize,
    pub(crate) cell_data: BTreeMap<String, String>,
    pub(crate) header_candidates: Vec<ClassifiedCell>,
    pub(crate) data_cells: Vec<ClassifiedCell>,
    pub(crate) field_candidates: Vec<FieldCandidate>,
    pub(crate) fillable_fields: FillableInventory,
    /// Field name → cell reference over all candidates, later candidates win
    pub(crate) suggestions: BTreeMap<String, String>,
    pub(crate) data_structure: DataStructure,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn enums_serialize_as_wire_names() {
        assert_eq!(serde_json::to_value(DataType::Currency).unwrap(), json!("currency"));
        assert_eq!(serde_json::to_value(PatternType::SingleBracketCaps).unwrap(), json!("single_bracket_caps"));
        assert_eq!(serde_json::to_value(TemplateSizeClass::LargeAdminTemplate).unwrap(), json!("large_admin_template"));
        assert_eq!(DataType::Phone.as_str(), "phone");
    }

    #[test]
    fn classified_cell_flattens_position() {
        let cell = ClassifiedCell {
            cell: Cell {
                reference: "B2".to_owned(),
                row: 2,
                column: 2,
                raw_text: "{{due date}}".to_owned(),
            },
            data_type: DataType::Text,
            is_header: false,
            keywords: vec!["due".to_owned(), "date".to_owned()],
            fillable: Some(FillableInfo {
                pattern_type: PatternType::DoubleCurly,
                field_name: "due_date".to_owned(),
                placeholder_text: "due date".to_owned(),
            }),
        };
        assert_eq!(serde_json::to_value(&cell).unwrap(), json!({
            "cell": "B2",
            "row": 2,
            "column": 2,
            "raw_text": "{{due date}}",
            "data_type": "text",
            "is_header": false,
            "keywords": ["due", "date"],
            "fillable": {
                "pattern_type": "double_curly",
                "field_name": "due_date",
                "placeholder_text": "due date",
            },
        }));
    }

    #[test]
    fn pattern_counts_use_pattern_names_as_keys() {
        let mut inventory = FillableInventory::default();
        inventory.patterns.insert(PatternType::AngleBrackets, 2);
        let value = serde_json::to_value(&inventory).unwrap();
        assert_eq!(value["patterns"], json!({ "angle_brackets": 2 }));
        assert_eq!(value["total_count"], json!(0));
    }
}
