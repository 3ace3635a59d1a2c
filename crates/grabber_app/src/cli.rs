use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use engine_logging::{engine_debug, engine_info};
use grabber_engine::{
    ensure_output_dir, FetchSettings, LogProgressSink, Pipeline, PipelineOutput, ReqwestTransport,
    SiteEndpoints,
};

use crate::config::AppConfig;

/// Fetch the latest (or a pinned) APK for a configured app.
#[derive(Debug, Parser)]
#[command(name = "apk-grabber", version)]
#[command(about = "Download an Android package from a mirror site or download portal", long_about = None)]
pub struct Cli {
    /// App identifier; selects `<CONFIG_DIR>/<APP>.json`.
    pub app: String,

    /// Version to fetch; overrides the configured pin. Latest when omitted.
    #[arg(id = "pkg_version", value_name = "VERSION")]
    pub version: Option<String>,

    /// Directory holding per-app JSON configuration.
    #[arg(long, default_value = "apps", value_name = "DIR")]
    pub config_dir: PathBuf,

    /// Directory the package is written to.
    #[arg(long, default_value = ".", value_name = "DIR")]
    pub output_dir: PathBuf,

    /// Per-request deadline in seconds.
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// User-Agent header sent with every request.
    #[arg(long, value_name = "UA")]
    pub user_agent: Option<String>,

    /// Also write log output to this file.
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Increase log detail (-v debug, -vv trace).
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Only log warnings and errors.
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Cli {
    pub fn fetch_settings(&self) -> FetchSettings {
        let mut settings = FetchSettings::default();
        if let Some(secs) = self.timeout {
            settings.request_timeout = Duration::from_secs(secs.max(1));
        }
        if let Some(user_agent) = &self.user_agent {
            settings.user_agent = user_agent.clone();
        }
        settings
    }

    /// Explicit CLI version first, then the configured pin.
    pub fn requested_version<'a>(&'a self, config: &'a AppConfig) -> Option<&'a str> {
        self.version
            .as_deref()
            .map(str::trim)
            .filter(|version| !version.is_empty())
            .or_else(|| config.pinned_version())
    }
}

/// Loads configuration, then runs the pipeline once.
///
/// Configuration problems surface as plain `anyhow` errors; pipeline failures
/// keep their `PipelineError` so the caller can tell them apart.
pub async fn run(cli: &Cli) -> Result<PipelineOutput> {
    let config = AppConfig::load(&cli.config_dir, &cli.app)?;
    engine_debug!("loaded config for {}: {:?}", cli.app, config);
    prepare_output_dir(&cli.output_dir)?;

    let target = config.to_target();
    let requested = cli.requested_version(&config);
    match requested {
        Some(version) => engine_info!("Fetching {} {}", target.display_name, version),
        None => engine_info!("Fetching latest {}", target.display_name),
    }

    let settings = cli.fetch_settings();
    let transport = ReqwestTransport::new(settings.clone())
        .map_err(|failure| anyhow::anyhow!("building HTTP client: {failure}"))?;
    let pipeline = Pipeline::new(Arc::new(transport), SiteEndpoints::default(), settings);

    let output = pipeline
        .run(&target, requested, &cli.output_dir, &LogProgressSink)
        .await?;
    Ok(output)
}

fn prepare_output_dir(dir: &Path) -> Result<()> {
    ensure_output_dir(dir).with_context(|| format!("preparing output dir {}", dir.display()))
}
