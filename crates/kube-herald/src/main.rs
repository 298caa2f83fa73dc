//! kube-herald binary entrypoint.

use std::io;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use kube_herald::cli::{Cli, LogFormat};
use kube_herald::{
    AppConfig, Driver, HeraldError, LogSink, RunStats, SinkConfig, SlackSink, WatchSource,
};

const DEFAULT_LOG_DIRECTIVES: &str = "kube_herald=info,herald_core=info";

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_DIRECTIVES));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr);

    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_format);

    let config = AppConfig::from_cli(&cli)?;
    info!(
        reasons = ?config.filter.target_reasons(),
        pod_names = ?config.filter.allowed_name_patterns(),
        max_age_minutes = config.filter.max_age_minutes(),
        namespace = ?config.watch.namespace(),
        view = %config.view,
        "starting kube-herald"
    );

    match run(config).await {
        Ok(stats) => {
            info!(notified = stats.notified, "kube-herald stopped");
            Ok(())
        }
        Err(e) => {
            error!(error = %e, transient = e.is_transient(), "kube-herald failed");
            Err(e.into())
        }
    }
}

async fn run(config: AppConfig) -> Result<RunStats, HeraldError> {
    let client = reqwest::Client::new();
    let source = WatchSource::connect(&client, &config.watch).await?;

    match config.sink {
        SinkConfig::Slack(slack) => {
            info!(channel = %slack.channel(), "delivering to slack");
            Driver::new(source, SlackSink::new(client, slack), config.filter)
                .with_view(config.view)
                .run()
                .await
        }
        SinkConfig::Log => {
            info!("dry run, notifications are logged only");
            Driver::new(source, LogSink::default(), config.filter)
                .with_view(config.view)
                .run()
                .await
        }
    }
}
