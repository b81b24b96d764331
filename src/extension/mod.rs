//! # Extension Core Module
//!
//! Parameter handling and error types shared by the table functions.
use crate::error::TemplateSheetError;
use duckdb::core::LogicalTypeHandle;
use duckdb::core::LogicalTypeId;
use duckdb::vtab::BindInfo;
use thiserror::Error;

pub(crate) mod analyze_template;
pub(crate) mod template_report;
mod writer;

#[derive(Error, Debug)]
pub(crate) enum ExtensionError {
    #[error("Invalid parameter '{name}': {message}")]
    InvalidParameterError { name: String, message: String },
}

/// Positional parameter of a table function.
pub(crate) trait Param<T> {
    /// Parameter name used in messages.
    fn name() -> &'static str;

    /// DuckDB logical type of the parameter.
    fn kind() -> LogicalTypeHandle;

    /// Reads the parameter at `index` from bind information.
    fn read(bind: &BindInfo, index: u64) -> Result<T, TemplateSheetError>;
}

/// Path or URL of the template file.
pub(crate) struct FileParam;

impl FileParam {
    fn validate(file_name: String) -> Result<String, ExtensionError> {
        if file_name.trim().is_empty() {
            Err(ExtensionError::InvalidParameterError {
                name: Self::name().to_owned(),
                message: "file name is empty".to_owned(),
            })
        } else {
            Ok(file_name)
        }
    }
}

impl Param<String> for FileParam {
    fn name() -> &'static str {
        "file"
    }

    fn kind() -> LogicalTypeHandle {
        LogicalTypeHandle::from(LogicalTypeId::Varchar)
    }

    fn read(bind: &BindInfo, index: u64) -> Result<String, TemplateSheetError> {
        Ok(Self::validate(bind.get_parameter(index).to_string())?)
    }
}
