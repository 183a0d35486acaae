use reporting_common::settings::Settings;
use reporting_worker::bootstrap::{
    build_temporal_worker, build_worker_context, build_worker_services, register_activities,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let settings = Settings::new()?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| settings.default_log_filter().into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service_url = %settings.reporting.service_url,
        temporal = %settings.temporal.server_url,
        namespace = %settings.temporal.namespace,
        "Configuration loaded"
    );

    let ctx = build_worker_context(settings)?;
    let services = build_worker_services(&ctx);

    let mut runtime = build_temporal_worker(&ctx.settings).await?;
    register_activities(&mut runtime.worker, services.reporting);

    tracing::info!(
        "Starting Temporal Worker on queue '{}'...",
        ctx.settings.temporal.task_queue
    );
    runtime.worker.run().await?;

    Ok(())
}
