use anyhow::Result;
use clap::{Parser, Subcommand};
use reporting_common::settings::Settings;
use reporting_worker::bootstrap::{build_worker_context, build_worker_services};
use reporting_worker::contracts;

/// Runs a reporting activity in-process, without a Temporal server.
#[derive(Parser, Debug)]
#[command(name = "invoke")]
struct Cli {
    #[arg(long, env = "REPORTING_CONFIG_PATH")]
    config: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the host metadata of every activity.
    Describe,
    /// Execute one activity and print its output record.
    Run {
        /// Registered activity name, e.g. `run_report`.
        activity: String,
        /// JSON input record.
        #[arg(long, default_value = "{}")]
        input: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Describe => {
            println!(
                "{}",
                serde_json::to_string_pretty(&contracts::descriptors())?
            );
        }
        Command::Run { activity, input } => {
            let settings = Settings::load(cli.config.as_deref())?;
            let ctx = build_worker_context(settings)?;
            let services = build_worker_services(&ctx);

            let input: serde_json::Value = serde_json::from_str(&input)?;
            let output = services.reporting.dispatch(&activity, input).await?;
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}
