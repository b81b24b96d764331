//! # DuckDB Template Analysis Extension
//!
//! A DuckDB extension that inspects spreadsheet templates from SQL. Given a workbook it
//! finds the sheet holding the form, recognizes label cells and placeholder cells such
//! as `[VENDOR_NAME]` or `{{due date}}`, and proposes named fields a form-filling tool
//! can map data onto.
//!
//! ## Table Functions
//!
//! - `analyze_template(file)`: one row per proposed field with its source cell, data
//!   type, keywords and confidence
//! - `template_report(file)`: the complete analysis as a JSON document
//!
//! Files are read locally, or through DuckDB's `read_blob` for remote URLs.
extern crate duckdb;
extern crate duckdb_loadable_macros;
extern crate libduckdb_sys;

mod analysis;
mod error;
mod extension;
mod helpers;
mod spreadsheet;

use crate::extension::analyze_template::AnalyzeTemplateTableFunction;
use crate::extension::template_report::TemplateReportTableFunction;
use anyhow::{Context, Result};
use duckdb::Connection;
use duckdb_loadable_macros::duckdb_entrypoint_c_api;
use libduckdb_sys as ffi;

/// Extension entry point for DuckDB.
///
/// Registers `analyze_template` and `template_report`.
///
/// # Errors
///
/// Returns an error if either table function fails to register with DuckDB.
#[duckdb_entrypoint_c_api()]
pub unsafe fn extension_entrypoint(connection: Connection) -> Result<()> {
    connection
        .register_table_function::<AnalyzeTemplateTableFunction>("analyze_template")
        .context("Failed to register analyze_template table function")?;
    connection
        .register_table_function::<TemplateReportTableFunction>("template_report")
        .context("Failed to register template_report table function")?;
    Ok(())
}
