use anyhow::Result;
use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use reporting_common::reporting::{ReportMetadata, RunOptions};
use reporting_common::ReportingClient;

/// The delegated calls an activity is allowed to make.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ReportingApi: Send + Sync {
    async fn get_run_token(
        &self,
        service_url: &str,
        portal_url: &str,
        token: Option<String>,
    ) -> Result<String>;

    async fn get_metadata(
        &self,
        item_id: &str,
        portal_url: &str,
        service_url: &str,
        run_token: Option<String>,
    ) -> Result<ReportMetadata>;

    async fn run(&self, item_id: &str, options: &RunOptions) -> Result<String>;
}

#[async_trait]
impl ReportingApi for ReportingClient {
    async fn get_run_token(
        &self,
        service_url: &str,
        portal_url: &str,
        token: Option<String>,
    ) -> Result<String> {
        self.get_run_token(service_url, portal_url, token.as_deref())
            .await
    }

    async fn get_metadata(
        &self,
        item_id: &str,
        portal_url: &str,
        service_url: &str,
        run_token: Option<String>,
    ) -> Result<ReportMetadata> {
        self.get_metadata(item_id, portal_url, service_url, run_token.as_deref())
            .await
    }

    async fn run(&self, item_id: &str, options: &RunOptions) -> Result<String> {
        self.run(item_id, options).await
    }
}
