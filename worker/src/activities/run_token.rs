use reporting_common::reporting::DEFAULT_PORTAL_URL;
use serde::{Deserialize, Serialize};

use super::error::ActivityFailure;
use crate::contracts::{self, ActivityDescriptor};
use crate::ports::ReportingApi;

pub const DEFAULT_SERVICE_URL: &str = "https://apps.vertigisstudio.com/reporting";

pub const DESCRIPTOR: ActivityDescriptor = ActivityDescriptor {
    name: contracts::activities::GET_REPORT_RUN_TOKEN,
    display_name: "Get Report Run Token",
    category: contracts::CATEGORY,
    description: "Authenticates with a VertiGIS Studio Printing/Reporting service and returns a token that can be used with other Reporting Client activities.",
    help_url: contracts::HELP_URL,
    client_only: true,
    supported_apps: contracts::SUPPORTED_APPS,
    default_name: Some("runToken"),
};

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct GetReportRunTokenInputs {
    #[serde(default)]
    pub portal_url: Option<String>,
    #[serde(default)]
    pub service_url: Option<String>,
    /// ArcGIS token to exchange.
    #[serde(default)]
    pub token: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct GetReportRunTokenOutputs {
    pub result: String,
}

pub async fn execute(
    api: &dyn ReportingApi,
    inputs: GetReportRunTokenInputs,
) -> Result<GetReportRunTokenOutputs, ActivityFailure> {
    let portal_url = inputs
        .portal_url
        .unwrap_or_else(|| DEFAULT_PORTAL_URL.to_string());
    let service_url = inputs
        .service_url
        .unwrap_or_else(|| DEFAULT_SERVICE_URL.to_string());

    tracing::info!(%portal_url, %service_url, "Requesting report run token");

    let result = api
        .get_run_token(&service_url, &portal_url, inputs.token)
        .await?;
    Ok(GetReportRunTokenOutputs { result })
}
