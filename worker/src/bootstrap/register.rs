use crate::activities::ReportingActivities;
use crate::contracts;
use std::sync::Arc;
use temporalio_sdk::Worker;

pub fn register_activities(worker: &mut Worker, reporting: Arc<ReportingActivities>) {
    let reporting_clone = Arc::clone(&reporting);
    worker.register_activity(
        contracts::activities::GET_REPORT_RUN_TOKEN,
        move |_ctx, inputs| {
            let reporting = Arc::clone(&reporting_clone);
            async move { reporting.get_report_run_token(inputs).await }
        },
    );

    let reporting_clone = Arc::clone(&reporting);
    worker.register_activity(
        contracts::activities::GET_REPORT_METADATA,
        move |_ctx, inputs| {
            let reporting = Arc::clone(&reporting_clone);
            async move { reporting.get_report_metadata(inputs).await }
        },
    );

    let reporting_clone = Arc::clone(&reporting);
    worker.register_activity(contracts::activities::RUN_REPORT, move |_ctx, inputs| {
        let reporting = Arc::clone(&reporting_clone);
        async move { reporting.run_report(inputs).await }
    });
}
