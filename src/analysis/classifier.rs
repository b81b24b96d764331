//! Per-cell heuristics: data type, header verdict and keywords.
use crate::analysis::pattern::detect_fillable;
use crate::analysis::report::Cell;
use crate::analysis::report::ClassifiedCell;
use crate::analysis::report::DataType;
use regex::Regex;
use std::sync::LazyLock;

/// Rows past this 0-based index are never headers.
const HEADER_ROW_LIMIT: usize = 5;

/// Business terms whose presence marks a header label.
const HEADER_INDICATORS: [&str; 34] = [
    "name", "id", "code", "number", "date", "amount", "total", "price",
    "quantity", "description", "type", "status", "address", "email",
    "phone", "category", "item", "product", "service", "client", "customer",
    "vendor", "supplier", "company", "organization", "department", "location",
    "reference", "order", "invoice", "bill", "receipt", "payment", "tax",
];

const STOP_WORDS: [&str; 14] = [
    "a", "an", "the", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by",
];

static DATE_PATTERNS: LazyLock<[Regex; 3]> = LazyLock::new(|| {
    let pattern = |regex: &str| Regex::new(regex).expect("Hardcode regex pattern");
    [
        pattern(r"[0-9]{1,2}/[0-9]{1,2}/[0-9]{2,4}"),
        pattern(r"[0-9]{1,2}-[0-9]{1,2}-[0-9]{2,4}"),
        pattern(r"[0-9]{4}-[0-9]{1,2}-[0-9]{1,2}"),
    ]
});

/// Infers the data type of a value. Checks run in order and the first hit wins:
/// currency, number, date, email, phone, text.
pub(crate) fn detect_data_type(text: &str) -> DataType {
    let value = text.trim();

    if value.starts_with('$') || value.ends_with('$') {
        DataType::Currency
    } else if value.replace([',', '$'], "").parse::<f64>().is_ok() {
        DataType::Number
    } else if DATE_PATTERNS.iter().any(|pattern| pattern.is_match(value)) {
        DataType::Date
    } else if value.contains('@') && value.contains('.') {
        DataType::Email
    } else if is_phone_like(value) {
        DataType::Phone
    } else {
        DataType::Text
    }
}

/// 8 to 19 bytes long with more than 60% digits.
fn is_phone_like(value: &str) -> bool {
    if value.len() > 7 && value.len() < 20 {
        let digits = value.chars().filter(char::is_ascii_digit).count();
        digits as f64 / value.len() as f64 > 0.6
    } else {
        false
    }
}

/// Decides whether a value looks like a header label. `row` is the 0-based sheet row.
///
/// Biased toward recall: any short single word in the first rows qualifies, so short
/// data values are expected false positives.
pub(crate) fn is_likely_header(text: &str, row: usize, _column: usize) -> bool {
    if row > HEADER_ROW_LIMIT {
        return false;
    }

    let value = text.trim().to_lowercase();
    if HEADER_INDICATORS.iter().any(|indicator| value.contains(indicator)) {
        return true;
    }
    if value.ends_with(':') || value.ends_with('#') {
        return true;
    }
    value.split_whitespace().count() == 1 && value.len() > 2 && value.len() < 20
}

/// Lowercased words of a value longer than two characters, minus stop words.
pub(crate) fn extract_keywords(text: &str) -> Vec<String> {
    text.trim()
        .to_lowercase()
        .replace([':', '#'], "")
        .replace(['-', '_'], " ")
        .split_whitespace()
        .filter(|word| word.len() > 2 && !STOP_WORDS.contains(word))
        .map(str::to_owned)
        .collect()
}

/// Classifies one trimmed, non-blank cell. `row` and `column` are 0-based sheet indexes.
pub(crate) fn classify_cell(reference: String, row: usize, column: usize, text: &str) -> ClassifiedCell {
    ClassifiedCell {
        cell: Cell {
            reference,
            row: row + 1,
            column: column + 1,
            raw_text: text.to_owned(),
        },
        data_type: detect_data_type(text),
        is_header: is_likely_header(text, row, column),
        keywords: extract_keywords(text),
        fillable: detect_fillable(text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::report::PatternType;

    #[test]
    fn data_type_precedence() {
        assert_eq!(detect_data_type("$1,200.50"), DataType::Currency);
        assert_eq!(detect_data_type("1200$"), DataType::Currency);
        assert_eq!(detect_data_type("1,200.50"), DataType::Number);
        assert_eq!(detect_data_type("-42"), DataType::Number);
        assert_eq!(detect_data_type("01/02/2024"), DataType::Date);
        assert_eq!(detect_data_type("1-2-24"), DataType::Date);
        assert_eq!(detect_data_type("2024-01-02"), DataType::Date);
        assert_eq!(detect_data_type("jane@x.com"), DataType::Email);
        assert_eq!(detect_data_type("(555) 123-4567"), DataType::Phone);
        assert_eq!(detect_data_type("Office supplies"), DataType::Text);
        assert_eq!(detect_data_type(""), DataType::Text);
    }

    #[test]
    fn phone_requires_length_and_digit_density() {
        assert!(is_phone_like("555 123 4567"));
        assert!(!is_phone_like("5551234"));
        assert!(!is_phone_like("12345678901234567890"));
        assert!(!is_phone_like("ab 12 cd 34"));
    }

    #[test]
    fn header_heuristic() {
        assert!(is_likely_header("Vendor Name:", 0, 0));
        assert!(is_likely_header("Invoice #", 1, 3));
        assert!(is_likely_header("Remarks:", 4, 0));
        assert!(is_likely_header("Widget", 5, 2));
        assert!(is_likely_header("TOTAL DUE", 2, 0));
        assert!(!is_likely_header("Widget", 6, 2));
        assert!(!is_likely_header("Vendor Name:", 6, 0));
        assert!(!is_likely_header("ok", 0, 0));
        assert!(!is_likely_header("please sign below", 0, 0));
    }

    #[test]
    fn keywords_drop_short_and_stop_words() {
        assert_eq!(extract_keywords("Vendor Name:"), vec!["vendor", "name"]);
        assert_eq!(extract_keywords("Date of the Invoice #"), vec!["date", "invoice"]);
        assert_eq!(extract_keywords("due-date_for payment"), vec!["due", "date", "payment"]);
        assert!(extract_keywords("to be").is_empty());
    }

    #[test]
    fn classify_cell_uses_sheet_coordinates() {
        let cell = classify_cell("B12".to_owned(), 11, 1, "[VENDOR_NAME]");
        assert_eq!(cell.cell.reference, "B12");
        assert_eq!(cell.cell.row, 12);
        assert_eq!(cell.cell.column, 2);
        assert!(!cell.is_header);
        assert_eq!(cell.data_type, DataType::Text);
        assert_eq!(cell.keywords, vec!["[vendor", "name]"]);
        assert_eq!(cell.fillable.unwrap().pattern_type, PatternType::SingleBracketCaps);
    }
}
