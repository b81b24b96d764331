use crate::error::TemplateSheetError;
use crate::spreadsheet::SpreadsheetError;
use chrono::NaiveDate;
use chrono::TimeDelta;

/// How the raw `<v>` text of a worksheet cell has to be rendered.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub(crate) enum CellType {
    #[default]
    Empty,
    /// Boolean stored as `1` / `0`
    Boolean,
    /// Plain number
    Number,
    /// Serial date/time from the 1900 epoch
    NumberDateTime1900,
    /// Serial date from the 1900 epoch
    NumberDate1900,
    /// Serial date/time from the 1904 epoch
    NumberDateTime1904,
    /// Serial date from the 1904 epoch
    NumberDate1904,
    /// Fraction of a day
    NumberTime,
    /// ISO 8601 date/time string (`t="d"`)
    IsoDateTime,
    /// Shared, inline or formula string
    Text,
    /// Error literal such as `#N/A`
    Error,
}

impl CellType {
    /// Maps the built-in number format ids that denote dates or times.
    pub(crate) fn parse_builtin_number_format_id(id: &str, is_1904: bool) -> Option<Self> {
        match id {
            "22" => Some(if is_1904 { Self::NumberDateTime1904 } else { Self::NumberDateTime1900 }),
            "14" | "15" | "16" | "17" => Some(if is_1904 { Self::NumberDate1904 } else { Self::NumberDate1900 }),
            "18" | "19" | "20" | "21" | "45" | "46" | "47" => Some(Self::NumberTime),
            _ => None,
        }
    }

    /// Classifies a custom format code by looking for date (`y`, `d`) and time (`h`, `s`)
    /// tokens outside of quoted literals, escapes and bracketed sections.
    pub(crate) fn parse_custom_number_format(format: &str, is_1904: bool) -> Self {
        let mut is_escaped = false;
        let mut is_literal = false;
        let mut is_bracket = false;
        let mut is_date = false;
        let mut is_time = false;
        for character in format.chars() {
            match character {
                _ if is_escaped => is_escaped = false,
                '_' | '\\' => is_escaped = true,

                '"' if is_literal => is_literal = false,
                '"' if !is_bracket => is_literal = true,

                ']' if is_bracket => is_bracket = false,
                '[' if !is_literal => is_bracket = true,
                _ if is_literal || is_bracket => (),

                'Y' | 'y' | 'D' | 'd' => is_date = true,
                'H' | 'h' | 'S' | 's' => is_time = true,
                _ => (),
            }
        }

        match (is_date, is_time, is_1904) {
            (true, true, false) => Self::NumberDateTime1900,
            (true, true, true) => Self::NumberDateTime1904,
            (true, false, false) => Self::NumberDate1900,
            (true, false, true) => Self::NumberDate1904,
            (false, true, _) => Self::NumberTime,
            (false, false, _) => Self::Number,
        }
    }
}

/// A worksheet cell as stored in the package, before rendering.
#[derive(Clone, Debug)]
pub(crate) struct Cell {
    /// Row index (0-based)
    pub(crate) row: usize,
    /// Column index (0-based)
    pub(crate) col: usize,
    pub(crate) kind: CellType,
    /// Raw value; shared strings are already resolved
    pub(crate) value: String,
}

impl Cell {
    /// Renders the cell the way a spreadsheet application shows it.
    pub(crate) fn to_text(&self) -> Result<String, TemplateSheetError> {
        let text = match self.kind {
            CellType::Empty => String::new(),
            CellType::Boolean => if self.value.trim() == "1" { "TRUE" } else { "FALSE" }.to_owned(),
            CellType::NumberDate1900 => to_date_string(&self.value, false)?,
            CellType::NumberDate1904 => to_date_string(&self.value, true)?,
            CellType::NumberDateTime1900 => to_datetime_string(&self.value, false)?,
            CellType::NumberDateTime1904 => to_datetime_string(&self.value, true)?,
            CellType::NumberTime => to_time_string(&self.value)?,
            CellType::IsoDateTime => self.value.replace('T', " "),
            CellType::Number | CellType::Text | CellType::Error => self.value.to_owned(),
        };
        Ok(text)
    }
}

/// Converts a serial day number to `YYYY-MM-DD`.
/// Serials below 60 are shifted by one day for the fictitious 1900-02-29.
fn to_date_string(value: &str, is_1904: bool) -> Result<String, TemplateSheetError> {
    let days = value.trim().parse::<f64>()?.trunc() as i64;
    let offset = if is_1904 {
        1_462
    } else if days < 60 {
        1
    } else {
        0
    };
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30).expect("NaiveDate literal");
    let date = days
        .checked_add(offset)
        .and_then(TimeDelta::try_days)
        .and_then(|delta| epoch.checked_add_signed(delta))
        .ok_or_else(|| SpreadsheetError::DateOutOfRangeError(value.trim().to_owned()))?;
    Ok(date.format("%Y-%m-%d").to_string())
}

/// Converts the fractional part of a serial value to `HH:MM:SS`.
fn to_time_string(value: &str) -> Result<String, TemplateSheetError> {
    let fraction = value.trim().parse::<f64>()?.fract();
    let mut seconds = (fraction * 86_400f64).round() as i64;
    let hours = seconds / 3_600;
    seconds %= 3_600;
    let minutes = seconds / 60;
    seconds %= 60;
    Ok(format!("{hours:02}:{minutes:02}:{seconds:02}"))
}

fn to_datetime_string(value: &str, is_1904: bool) -> Result<String, TemplateSheetError> {
    let date = to_date_string(value, is_1904)?;
    let time = to_time_string(value)?;
    Ok(format!("{date} {time}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(kind: CellType, value: &str) -> Cell {
        Cell { row: 0, col: 0, kind, value: value.to_owned() }
    }

    #[test]
    fn builtin_formats() {
        assert_eq!(CellType::parse_builtin_number_format_id("14", false), Some(CellType::NumberDate1900));
        assert_eq!(CellType::parse_builtin_number_format_id("14", true), Some(CellType::NumberDate1904));
        assert_eq!(CellType::parse_builtin_number_format_id("21", false), Some(CellType::NumberTime));
        assert_eq!(CellType::parse_builtin_number_format_id("4", false), None);
    }

    #[test]
    fn custom_formats() {
        assert_eq!(CellType::parse_custom_number_format("yyyy-mm-dd", false), CellType::NumberDate1900);
        assert_eq!(CellType::parse_custom_number_format("dd/mm/yyyy hh:mm", true), CellType::NumberDateTime1904);
        assert_eq!(CellType::parse_custom_number_format("h:mm:ss", false), CellType::NumberTime);
        assert_eq!(CellType::parse_custom_number_format("[$$-409]#,##0.00", false), CellType::Number);
        assert_eq!(CellType::parse_custom_number_format("\"Days\" 0", false), CellType::Number);
        assert_eq!(CellType::parse_custom_number_format("[Red]0.00", false), CellType::Number);
    }

    #[test]
    fn renders_dates_and_times() {
        assert_eq!(cell(CellType::NumberDate1900, "45292").to_text().unwrap(), "2024-01-01");
        assert_eq!(cell(CellType::NumberDate1900, "1").to_text().unwrap(), "1900-01-01");
        assert_eq!(cell(CellType::NumberDate1904, "0").to_text().unwrap(), "1904-01-01");
        assert_eq!(cell(CellType::NumberTime, "0.5").to_text().unwrap(), "12:00:00");
        assert_eq!(cell(CellType::NumberDateTime1900, "45292.75").to_text().unwrap(), "2024-01-01 18:00:00");
        assert_eq!(cell(CellType::IsoDateTime, "2024-01-01T08:30:00").to_text().unwrap(), "2024-01-01 08:30:00");
    }

    #[test]
    fn renders_plain_values() {
        assert_eq!(cell(CellType::Boolean, "1").to_text().unwrap(), "TRUE");
        assert_eq!(cell(CellType::Boolean, "0").to_text().unwrap(), "FALSE");
        assert_eq!(cell(CellType::Number, "1200.5").to_text().unwrap(), "1200.5");
        assert_eq!(cell(CellType::Error, "#DIV/0!").to_text().unwrap(), "#DIV/0!");
        assert!(cell(CellType::NumberDate1900, "n/a").to_text().is_err());
    }

    #[test]
    fn out_of_range_serials_are_errors() {
        for serial in ["1e300", "-1e300", "99999999", "inf"] {
            let error = cell(CellType::NumberDate1900, serial).to_text().unwrap_err();
            assert_eq!(error.to_string(), format!("Date serial '{serial}' is out of range"));
        }
        assert!(cell(CellType::NumberDateTime1904, "1e300").to_text().is_err());
        assert_eq!(cell(CellType::NumberDate1900, "2958465").to_text().unwrap(), "9999-12-31");
    }
}
