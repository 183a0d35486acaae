use dotenvy::dotenv;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Default)]
struct Cli {
    config: Option<String>,
}

fn parse_cli_from_args<I, S>(args: I) -> Cli
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut cli = Cli::default();
    let mut iter = args.into_iter().map(Into::into);

    // Skip binary name
    let _ = iter.next();

    while let Some(arg) = iter.next() {
        if let Some(raw_config) = arg.strip_prefix("--config=") {
            if !raw_config.is_empty() {
                cli.config = Some(raw_config.to_string());
            }
            continue;
        }

        if arg == "--config" {
            if let Some(config) = iter.next() {
                if !config.is_empty() {
                    cli.config = Some(config);
                }
            }
        }
    }

    cli
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Settings {
    pub reporting: ReportingSettings,
    pub temporal: TemporalSettings,
    #[serde(default)]
    pub debug: bool,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ReportingSettings {
    /// Service that `run` submits jobs to.
    pub service_url: String,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    #[serde(default = "default_max_polls")]
    pub max_polls: u32,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_poll_interval_ms() -> u64 {
    1000
}

fn default_max_polls() -> u32 {
    300
}

fn default_user_agent() -> String {
    "ReportingWorker/1.0".to_string()
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct TemporalSettings {
    pub server_url: String,
    #[serde(default = "default_namespace")]
    pub namespace: String,
    pub task_queue: String,
    /// Overrides the `pid@host@queue` worker identity.
    #[serde(default)]
    pub identity: Option<String>,
}

fn default_namespace() -> String {
    "default".to_string()
}

impl Settings {
    /// Loads settings, honouring `--config <path>` from the process arguments.
    #[allow(clippy::result_large_err)]
    pub fn new() -> Result<Self, figment::Error> {
        let cli = parse_cli_from_args(std::env::args());
        Self::load(cli.config.as_deref())
    }

    #[allow(clippy::result_large_err)]
    pub fn load(config_path: Option<&str>) -> Result<Self, figment::Error> {
        dotenv().ok();
        Self::extract(Self::figment(config_path))
    }

    #[allow(clippy::result_large_err)]
    fn extract(figment: Figment) -> Result<Self, figment::Error> {
        let settings: Settings = figment.extract()?;
        if settings.reporting.max_polls == 0 {
            return Err(figment::Error::from(
                "reporting.max_polls must be at least 1".to_string(),
            ));
        }
        Ok(settings)
    }

    /// Log filter used when `RUST_LOG` is unset.
    pub fn default_log_filter(&self) -> &'static str {
        if self.debug {
            "reporting_worker=debug,reporting_common=debug"
        } else {
            "reporting_worker=info,reporting_common=info"
        }
    }

    fn figment(config_path: Option<&str>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Settings::default()));

        figment = figment.merge(Toml::file("/etc/reporting-worker/config.toml"));

        if let Some(config_dir) = dirs::config_dir() {
            figment = figment.merge(Toml::file(config_dir.join("reporting-worker/config.toml")));
        }

        figment = figment.merge(Toml::file("reporting-worker.toml"));

        let config_path = config_path
            .map(str::to_string)
            .or_else(|| std::env::var("REPORTING_CONFIG_PATH").ok());
        if let Some(config_path) = config_path {
            figment = figment.merge(Toml::file(config_path));
        }

        figment.merge(Env::prefixed("REPORTING_").split("__"))
    }
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            debug: false,
            reporting: ReportingSettings {
                service_url: "https://apps.vertigisstudio.com/reporting".to_string(),
                poll_interval_ms: default_poll_interval_ms(),
                max_polls: default_max_polls(),
                user_agent: default_user_agent(),
            },
            temporal: TemporalSettings {
                server_url: "http://localhost:7233".to_string(),
                namespace: default_namespace(),
                task_queue: "reporting-queue".to_string(),
                identity: None,
            },
        }
    }
}
