use anyhow::{anyhow, Result};
use reporting_common::settings::{Settings, TemporalSettings};
use std::str::FromStr;
use std::sync::Arc;
use temporalio_client::ClientOptions;
use temporalio_common::worker::{WorkerConfig, WorkerTaskTypes, WorkerVersioningStrategy};
use temporalio_sdk::Worker;
use temporalio_sdk_core::{init_worker, CoreRuntime, RuntimeOptions, Url};

const CLIENT_NAME: &str = "reporting-worker";

pub struct TemporalWorkerRuntime {
    pub worker: Worker,
    // Dropping the runtime stops the worker.
    _runtime: CoreRuntime,
}

fn host_name() -> String {
    hostname::get()
        .map(|h| h.to_string_lossy().into_owned())
        .unwrap_or_else(|_| "Unknown".to_string())
}

fn worker_identity(temporal: &TemporalSettings) -> String {
    match temporal.identity.as_deref().map(str::trim) {
        Some(identity) if !identity.is_empty() => identity.to_string(),
        _ => format!(
            "{}@{}@{}",
            std::process::id(),
            host_name(),
            temporal.task_queue
        ),
    }
}

fn build_id() -> String {
    format!("{}-{}", CLIENT_NAME, env!("CARGO_PKG_VERSION"))
}

/// Rejects settings the server would only refuse after a connection attempt.
fn check_settings(temporal: &TemporalSettings) -> Result<Url> {
    if temporal.namespace.trim().is_empty() {
        return Err(anyhow!("temporal.namespace must not be empty"));
    }
    if temporal.task_queue.trim().is_empty() {
        return Err(anyhow!("temporal.task_queue must not be empty"));
    }
    Ok(Url::from_str(&temporal.server_url)?)
}

fn worker_config(temporal: &TemporalSettings) -> Result<WorkerConfig> {
    WorkerConfig::builder()
        .namespace(temporal.namespace.as_str())
        .task_queue(temporal.task_queue.as_str())
        .task_types(WorkerTaskTypes::all())
        .versioning_strategy(WorkerVersioningStrategy::None {
            build_id: build_id(),
        })
        .build()
        .map_err(|e| anyhow!(e))
}

pub async fn build_temporal_worker(settings: &Settings) -> Result<TemporalWorkerRuntime> {
    let temporal = &settings.temporal;
    let server_url = check_settings(temporal)?;
    let identity = worker_identity(temporal);

    tracing::info!(
        namespace = %temporal.namespace,
        task_queue = %temporal.task_queue,
        %identity,
        "Connecting to Temporal"
    );

    let client = ClientOptions::builder()
        .target_url(server_url)
        .client_name(CLIENT_NAME)
        .client_version(env!("CARGO_PKG_VERSION"))
        .identity(identity)
        .build()
        .connect(temporal.namespace.as_str(), None)
        .await?;

    let runtime_options = RuntimeOptions::builder().build().map_err(|e| anyhow!(e))?;
    let runtime = CoreRuntime::new_assume_tokio(runtime_options).map_err(|e| anyhow!(e))?;

    let core_worker = init_worker(&runtime, worker_config(temporal)?, client)?;
    let worker = Worker::new_from_core(Arc::new(core_worker), temporal.task_queue.as_str());

    Ok(TemporalWorkerRuntime {
        worker,
        _runtime: runtime,
    })
}
