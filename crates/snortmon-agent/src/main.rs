mod config;
mod scheduler;
mod sink;

use crate::config::Config;
use crate::sink::JsonlSink;
use anyhow::Result;
use snortmon_collector::ValueSink;
use std::sync::Arc;
use tokio::signal;
use tracing_subscriber::EnvFilter;

fn resolve_host(configured: Option<&str>) -> String {
    if let Some(host) = configured {
        return host.to_string();
    }
    sysinfo::System::host_name().unwrap_or_else(|| "localhost".to_string())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("snortmon_agent=info".parse()?)
                .add_directive("snortmon_collector=info".parse()?),
        )
        .init();

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config/agent.toml".to_string());

    let config = Config::load(&config_path)?;
    if config.instances.is_empty() {
        anyhow::bail!("no usable [[instance]] blocks in `{config_path}`");
    }

    let host = resolve_host(config.settings.host.as_deref());
    let sink: Arc<dyn ValueSink> = match &config.settings.output {
        Some(path) => Arc::new(JsonlSink::to_file(path)?),
        None => Arc::new(JsonlSink::to_stdout()),
    };

    tracing::info!(
        host = %host,
        metrics = config.catalog.len(),
        instances = config.instances.len(),
        "snortmon-agent starting"
    );

    let mut tasks = Vec::new();
    for instance in config.instances {
        tracing::info!(
            instance = %instance.name,
            path = %instance.path.display(),
            interval_secs = instance.interval.as_secs(),
            "scheduling instance"
        );
        tasks.push(scheduler::spawn_poller(
            instance,
            host.clone(),
            Arc::clone(&sink),
        ));
    }

    signal::ctrl_c().await?;
    tracing::info!("shutting down gracefully");
    for task in tasks {
        task.abort();
    }

    Ok(())
}
