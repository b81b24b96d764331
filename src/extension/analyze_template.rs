use crate::analysis::analyze;
use crate::analysis::report::FieldCandidate;
use crate::error::ResultMessage;
use crate::error::TemplateSheetError;
use crate::extension::writer::write_candidate;
use crate::extension::FileParam;
use crate::extension::Param;
use duckdb::core::DataChunkHandle;
use duckdb::core::LogicalTypeHandle;
use duckdb::core::LogicalTypeId;
use duckdb::vtab::BindInfo;
use duckdb::vtab::InitInfo;
use duckdb::vtab::TableFunctionInfo;
use duckdb::vtab::VTab;
use std::error::Error;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

/// Rows emitted per output chunk
const CHUNK_SIZE: usize = 2048;

/// Parameters for the analyze_template table function
struct AnalyzeTemplateParameters {
    /// Path or URL of the template file
    file_name: String,
}

impl TryFrom<&BindInfo> for AnalyzeTemplateParameters {
    type Error = TemplateSheetError;

    fn try_from(bind: &BindInfo) -> Result<Self, Self::Error> {
        Ok(AnalyzeTemplateParameters {
            file_name: FileParam::read(bind, 0)?,
        })
    }
}

#[repr(C)]
/// Bind data holding the field candidates of the analyzed template
pub(crate) struct AnalyzeTemplateBindData {
    candidates: Vec<FieldCandidate>,
}

impl TryFrom<&AnalyzeTemplateParameters> for AnalyzeTemplateBindData {
    type Error = TemplateSheetError;

    fn try_from(parameters: &AnalyzeTemplateParameters) -> Result<Self, Self::Error> {
        let report = analyze(parameters.file_name.as_str())?;
        Ok(AnalyzeTemplateBindData {
            candidates: report.field_candidates,
        })
    }
}

#[repr(C)]
/// Init data tracking the next candidate to emit
pub(crate) struct AnalyzeTemplateInitData {
    index: AtomicUsize,
}

/// Table function listing the field candidates found in a template, one row each
pub(crate) struct AnalyzeTemplateTableFunction;

impl VTab for AnalyzeTemplateTableFunction {
    type InitData = AnalyzeTemplateInitData;
    type BindData = AnalyzeTemplateBindData;

    /// Bind phase: analyze the template and define result columns
    fn bind(bind: &BindInfo) -> Result<Self::BindData, Box<dyn Error>> {
        let parameters = AnalyzeTemplateParameters::try_from(bind)?;
        let data = AnalyzeTemplateBindData::try_from(&parameters).with_prefix(parameters.file_name.as_str())?;
        for name in ["field_name", "display_name", "cell", "data_type", "keywords"] {
            bind.add_result_column(name, LogicalTypeHandle::from(LogicalTypeId::Varchar));
        }
        bind.add_result_column("confidence", LogicalTypeHandle::from(LogicalTypeId::Double));
        bind.add_result_column("inferred", LogicalTypeHandle::from(LogicalTypeId::Boolean));
        Ok(data)
    }

    fn init(_: &InitInfo) -> Result<Self::InitData, Box<dyn Error>> {
        Ok(AnalyzeTemplateInitData {
            index: AtomicUsize::new(0),
        })
    }

    /// Function phase: stream candidates to DuckDB in chunks
    fn func(
        func: &TableFunctionInfo<Self>,
        output: &mut DataChunkHandle,
    ) -> Result<(), Box<dyn Error>> {
        let init = func.get_init_data();
        let bind = func.get_bind_data();
        let lower = init.index.fetch_add(CHUNK_SIZE, Ordering::Relaxed);
        let upper = bind.candidates.len().min(lower + CHUNK_SIZE);
        if lower < upper {
            for index in lower..upper {
                write_candidate(output, index - lower, &bind.candidates[index]);
            }
            output.set_len(upper - lower);
        } else {
            output.set_len(0);
        }
        Ok(())
    }

    fn parameters() -> Option<Vec<LogicalTypeHandle>> {
        Some(vec![
            FileParam::kind(),
        ])
    }
}
