use crate::analysis::analyze;
use crate::error::ResultMessage;
use crate::error::TemplateSheetError;
use crate::extension::FileParam;
use crate::extension::Param;
use duckdb::core::DataChunkHandle;
use duckdb::core::Inserter;
use duckdb::core::LogicalTypeHandle;
use duckdb::core::LogicalTypeId;
use duckdb::vtab::BindInfo;
use duckdb::vtab::InitInfo;
use duckdb::vtab::TableFunctionInfo;
use duckdb::vtab::VTab;
use std::error::Error;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;

/// Parameters for the template_report table function
struct TemplateReportParameters {
    /// Path or URL of the template file
    file_name: String,
}

impl TryFrom<&BindInfo> for TemplateReportParameters {
    type Error = TemplateSheetError;

    fn try_from(bind: &BindInfo) -> Result<Self, Self::Error> {
        Ok(TemplateReportParameters {
            file_name: FileParam::read(bind, 0)?,
        })
    }
}

#[repr(C)]
/// Bind data holding the serialized report
pub(crate) struct TemplateReportBindData {
    file_name: String,
    active_sheet: String,
    /// Full analysis report as JSON
    report: String,
}

impl TryFrom<&TemplateReportParameters> for TemplateReportBindData {
    type Error = TemplateSheetError;

    fn try_from(parameters: &TemplateReportParameters) -> Result<Self, Self::Error> {
        let report = analyze(parameters.file_name.as_str())?;
        Ok(TemplateReportBindData {
            file_name: report.file_name.to_owned(),
            active_sheet: report.active_sheet.to_owned(),
            report: serde_json::to_string(&report)?,
        })
    }
}

#[repr(C)]
/// Init data for the single-row template_report table function
pub(crate) struct TemplateReportInitData {
    done: AtomicBool,
}

/// Table function returning the whole analysis of a template as one JSON document
pub(crate) struct TemplateReportTableFunction;

impl VTab for TemplateReportTableFunction {
    type InitData = TemplateReportInitData;
    type BindData = TemplateReportBindData;

    fn bind(bind: &BindInfo) -> Result<Self::BindData, Box<dyn Error>> {
        let parameters = TemplateReportParameters::try_from(bind)?;
        let data = TemplateReportBindData::try_from(&parameters).with_prefix(parameters.file_name.as_str())?;
        bind.add_result_column("file_name", LogicalTypeHandle::from(LogicalTypeId::Varchar));
        bind.add_result_column("active_sheet", LogicalTypeHandle::from(LogicalTypeId::Varchar));
        bind.add_result_column("report", LogicalTypeHandle::from(LogicalTypeId::Varchar));
        Ok(data)
    }

    fn init(_: &InitInfo) -> Result<Self::InitData, Box<dyn Error>> {
        Ok(TemplateReportInitData {
            done: AtomicBool::new(false),
        })
    }

    /// Function phase: emit the report row once
    fn func(
        func: &TableFunctionInfo<Self>,
        output: &mut DataChunkHandle,
    ) -> Result<(), Box<dyn Error>> {
        let init = func.get_init_data();
        let bind = func.get_bind_data();
        if init.done.swap(true, Ordering::Relaxed) {
            output.set_len(0);
        } else {
            output.flat_vector(0).insert(0, bind.file_name.as_str());
            output.flat_vector(1).insert(0, bind.active_sheet.as_str());
            output.flat_vector(2).insert(0, bind.report.as_str());
            output.set_len(1);
        }
        Ok(())
    }

    fn parameters() -> Option<Vec<LogicalTypeHandle>> {
        Some(vec![
            FileParam::kind(),
        ])
    }
}
