use reporting_common::reporting::{ReportMetadata, DEFAULT_PORTAL_URL};
use serde::{Deserialize, Serialize};

use super::error::{require, ActivityFailure};
use crate::contracts::{self, ActivityDescriptor};
use crate::ports::ReportingApi;

// Trailing slash kept as published for this activity.
pub const DEFAULT_SERVICE_URL: &str = "https://apps.vertigisstudio.com/reporting/";

pub const DESCRIPTOR: ActivityDescriptor = ActivityDescriptor {
    name: contracts::activities::GET_REPORT_METADATA,
    display_name: "Get Report Metadata",
    category: contracts::CATEGORY,
    description: "Fetches metadata about a VertiGIS Studio Report. The metadata includes the list of report parameters.",
    help_url: contracts::HELP_URL,
    client_only: true,
    supported_apps: contracts::SUPPORTED_APPS,
    default_name: Some("reportMetadata"),
};

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct GetReportMetadataInputs {
    #[serde(default)]
    pub item_id: Option<String>,
    #[serde(default)]
    pub portal_url: Option<String>,
    #[serde(default)]
    pub service_url: Option<String>,
    #[serde(default)]
    pub run_token: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct GetReportMetadataOutputs {
    pub result: ReportMetadata,
}

pub async fn execute(
    api: &dyn ReportingApi,
    inputs: GetReportMetadataInputs,
) -> Result<GetReportMetadataOutputs, ActivityFailure> {
    let item_id = require(inputs.item_id, "itemId")?;
    let portal_url = inputs
        .portal_url
        .unwrap_or_else(|| DEFAULT_PORTAL_URL.to_string());
    let service_url = inputs
        .service_url
        .unwrap_or_else(|| DEFAULT_SERVICE_URL.to_string());

    tracing::info!(%item_id, %portal_url, %service_url, "Fetching report metadata");

    let result = api
        .get_metadata(&item_id, &portal_url, &service_url, inputs.run_token)
        .await?;
    Ok(GetReportMetadataOutputs { result })
}
