pub mod error;
pub mod metadata;
pub mod run_report;
pub mod run_token;

pub use error::ActivityFailure;
pub use metadata::{GetReportMetadataInputs, GetReportMetadataOutputs};
pub use run_report::{RunReportInputs, RunReportOutputs};
pub use run_token::{GetReportRunTokenInputs, GetReportRunTokenOutputs};

use crate::contracts;
use crate::ports::ReportingApi;
use anyhow::Result;
use std::sync::Arc;
use temporalio_sdk::ActivityError;

/// The three reporting activities, sharing one delegated client.
pub struct ReportingActivities {
    api: Arc<dyn ReportingApi>,
}

impl ReportingActivities {
    pub fn new(api: Arc<dyn ReportingApi>) -> Self {
        Self { api }
    }

    pub async fn get_report_run_token(
        &self,
        inputs: GetReportRunTokenInputs,
    ) -> Result<GetReportRunTokenOutputs, ActivityError> {
        run_token::execute(self.api.as_ref(), inputs)
            .await
            .map_err(into_activity_error)
    }

    pub async fn get_report_metadata(
        &self,
        inputs: GetReportMetadataInputs,
    ) -> Result<GetReportMetadataOutputs, ActivityError> {
        metadata::execute(self.api.as_ref(), inputs)
            .await
            .map_err(into_activity_error)
    }

    pub async fn run_report(&self, inputs: RunReportInputs) -> Result<RunReportOutputs, ActivityError> {
        run_report::execute(self.api.as_ref(), inputs)
            .await
            .map_err(into_activity_error)
    }

    /// Runs an activity by its registered name against a JSON input record.
    pub async fn dispatch(&self, activity: &str, input: serde_json::Value) -> Result<serde_json::Value> {
        let api = self.api.as_ref();
        let output = match activity {
            contracts::activities::GET_REPORT_RUN_TOKEN => {
                serde_json::to_value(run_token::execute(api, serde_json::from_value(input)?).await?)?
            }
            contracts::activities::GET_REPORT_METADATA => {
                serde_json::to_value(metadata::execute(api, serde_json::from_value(input)?).await?)?
            }
            contracts::activities::RUN_REPORT => {
                serde_json::to_value(run_report::execute(api, serde_json::from_value(input)?).await?)?
            }
            other => return Err(anyhow::anyhow!("Unknown activity: {}", other)),
        };
        Ok(output)
    }
}

// Validation failures will fail the same way on every attempt.
fn into_activity_error(err: ActivityFailure) -> ActivityError {
    match err {
        ActivityFailure::MissingRequiredField(_) => ActivityError::NonRetryable(err.into()),
        ActivityFailure::Delegated(source) => ActivityError::from(source),
    }
}
