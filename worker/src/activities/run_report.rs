use reporting_common::reporting::{ParameterValue, RunOptions, DEFAULT_PORTAL_URL};
use serde::{Deserialize, Serialize};
use serde_json::Number;
use std::collections::BTreeMap;

use super::error::{require, ActivityFailure};
use crate::contracts::{self, ActivityDescriptor};
use crate::ports::ReportingApi;

pub const DESCRIPTOR: ActivityDescriptor = ActivityDescriptor {
    name: contracts::activities::RUN_REPORT,
    display_name: "Run Report",
    category: contracts::CATEGORY,
    description: "Runs a VertiGIS Studio Report and returns the URL to the result file.",
    help_url: contracts::HELP_URL,
    client_only: true,
    supported_apps: contracts::SUPPORTED_APPS,
    default_name: None,
};

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct RunReportInputs {
    #[serde(default)]
    pub item_id: Option<String>,
    #[serde(default)]
    pub portal_url: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
    /// Keys must match parameter names defined by the report.
    #[serde(default)]
    pub parameters: Option<BTreeMap<String, ParameterValue>>,
    #[serde(default)]
    pub result_file_name: Option<String>,
    #[serde(default)]
    pub culture: Option<String>,
    #[serde(default)]
    pub dpi: Option<Number>,
    /// "docx", "pdf", "png", "rtf", "xlsx" or anything else the service accepts.
    #[serde(default)]
    pub format: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RunReportOutputs {
    /// URL of the finished report.
    pub result: String,
}

pub async fn execute(
    api: &dyn ReportingApi,
    inputs: RunReportInputs,
) -> Result<RunReportOutputs, ActivityFailure> {
    let item_id = require(inputs.item_id, "itemId")?;
    let options = RunOptions {
        portal_url: Some(
            inputs
                .portal_url
                .unwrap_or_else(|| DEFAULT_PORTAL_URL.to_string()),
        ),
        token: inputs.token,
        parameters: inputs.parameters,
        result_file_name: inputs.result_file_name,
        culture: inputs.culture,
        dpi: inputs.dpi,
        format: inputs.format,
    };

    tracing::info!(
        %item_id,
        portal_url = options.portal_url.as_deref().unwrap_or_default(),
        format = options.format.as_deref().unwrap_or("<service default>"),
        "Running report"
    );

    let result = api.run(&item_id, &options).await?;
    Ok(RunReportOutputs { result })
}
