use crate::activities::ReportingActivities;
use anyhow::Result;
use reporting_common::settings::Settings;
use reporting_common::ReportingClient;
use std::sync::Arc;

pub struct WorkerContext {
    pub reporting: Arc<ReportingClient>,
    pub settings: Arc<Settings>,
}

impl std::fmt::Debug for WorkerContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerContext")
            .field("settings", &self.settings)
            .field("reporting", &"ReportingClient")
            .finish()
    }
}

pub struct WorkerServices {
    pub reporting: Arc<ReportingActivities>,
}

pub fn build_worker_context(settings: Settings) -> Result<Arc<WorkerContext>> {
    let reporting = Arc::new(ReportingClient::new(&settings.reporting)?);

    Ok(Arc::new(WorkerContext {
        reporting,
        settings: Arc::new(settings),
    }))
}

pub fn build_worker_services(ctx: &Arc<WorkerContext>) -> WorkerServices {
    let reporting = Arc::new(ReportingActivities::new(ctx.reporting.clone()));

    WorkerServices { reporting }
}
