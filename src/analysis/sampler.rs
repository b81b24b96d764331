//! Row sampling and column capping for large sheets.
use log::info;

/// Sheets with more rows than this are sampled.
const SAMPLE_THRESHOLD: usize = 50;
/// Leading rows always kept.
const HEAD_ROWS: usize = 10;
/// Stride through the middle section.
const STRIDE: usize = 5;
/// The middle section stops adding rows once the sample holds this many.
const STRIDED_LIMIT: usize = 30;
/// Trailing rows always kept.
const TAIL_ROWS: usize = 5;
/// Columns past this count are not analyzed.
const MAX_ANALYZED_COLUMNS: usize = 20;

/// Rows chosen for analysis together with their 0-based index in the sheet.
#[derive(Debug, PartialEq)]
pub(crate) struct RowSample<'a> {
    pub(crate) rows: Vec<&'a [String]>,
    pub(crate) row_mapping: Vec<usize>,
}

impl<'a> RowSample<'a> {
    /// Sampled rows paired with their sheet row index.
    pub(crate) fn iter(&self) -> impl Iterator<Item = (&'a [String], usize)> + '_ {
        self.rows.iter().copied().zip(self.row_mapping.iter().copied())
    }

    /// Length of the widest sampled row.
    pub(crate) fn max_columns(&self) -> usize {
        self.rows.iter().map(|row| row.len()).max().unwrap_or(0)
    }
}

/// Picks the rows to analyze.
///
/// Up to 50 rows are all kept. Larger sheets keep the first 10 rows, every 5th row of
/// the middle section until 30 rows are collected, and the last 5 rows.
pub(crate) fn sample_rows(rows: &[Vec<String>]) -> RowSample<'_> {
    let row_count = rows.len();
    let indexes: Vec<usize> = if row_count > SAMPLE_THRESHOLD {
        let mut indexes: Vec<usize> = (0..HEAD_ROWS).collect();
        for index in (HEAD_ROWS..row_count - TAIL_ROWS).step_by(STRIDE) {
            if indexes.len() >= STRIDED_LIMIT {
                break;
            }
            indexes.push(index);
        }
        indexes.extend((row_count - TAIL_ROWS..row_count).filter(|index| *index > HEAD_ROWS));
        info!("Large sheet detected: {} rows. Analyzing {} sample rows", row_count, indexes.len());
        indexes
    } else {
        (0..row_count).collect()
    };

    RowSample {
        rows: indexes.iter().map(|index| rows[*index].as_slice()).collect(),
        row_mapping: indexes,
    }
}

/// Number of leading columns to analyze for a sheet whose widest row is `max_columns`.
pub(crate) fn analyzed_columns(max_columns: usize) -> usize {
    if max_columns > MAX_ANALYZED_COLUMNS {
        info!("Wide sheet detected: {} columns. Analyzing first {} columns", max_columns, MAX_ANALYZED_COLUMNS);
        MAX_ANALYZED_COLUMNS
    } else {
        max_columns
    }
}
