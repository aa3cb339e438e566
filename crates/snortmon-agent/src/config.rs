use anyhow::{Context, Result};
use serde::Deserialize;
use snortmon_collector::catalog::MetricCatalog;
use snortmon_collector::instance::InstanceDefinition;
use std::path::PathBuf;

/// Top-level keys the agent understands; anything else is ignored with a
/// warning.
const KNOWN_KEYS: &[&str] = &["host", "output", "metric", "instance"];

/// Agent-level settings (everything except the block tables).
#[derive(Debug, Default, Deserialize)]
pub struct AgentSettings {
    /// Host tag on emitted samples; defaults to the system host name.
    #[serde(default)]
    pub host: Option<String>,
    /// JSONL output path (appended); stdout when unset.
    #[serde(default)]
    pub output: Option<PathBuf>,
}

/// One `[[metric]]` block as written, before validation.
#[derive(Debug, Deserialize)]
struct RawMetric {
    name: String,
    #[serde(default)]
    type_instance: Option<String>,
    #[serde(default)]
    data_source_type: Option<String>,
    #[serde(default)]
    index: Option<i64>,
}

/// One `[[instance]]` block as written, before validation.
#[derive(Debug, Deserialize)]
struct RawInstance {
    name: String,
    #[serde(default)]
    interface: Option<String>,
    #[serde(default)]
    path: Option<String>,
    #[serde(default)]
    collect: Vec<String>,
    #[serde(default)]
    interval_secs: Option<u64>,
}

/// Validated configuration: the metric catalog and the instances to
/// schedule.
pub struct Config {
    pub settings: AgentSettings,
    pub catalog: MetricCatalog,
    pub instances: Vec<InstanceDefinition>,
}

impl Config {
    /// Loads and validates the TOML configuration at `path`.
    ///
    /// A malformed or invalid `[[metric]]`/`[[instance]]` block is logged
    /// and skipped; sibling blocks still load. Unknown top-level keys are
    /// ignored with a warning.
    ///
    /// # Errors
    ///
    /// Returns an error only if the file cannot be read or is not valid
    /// TOML at all.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("unable to read config file `{path}`"))?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let root: toml::Value = toml::from_str(content).context("config is not valid TOML")?;
        let table = root
            .as_table()
            .context("config root must be a table")?
            .clone();

        for key in table.keys() {
            if !KNOWN_KEYS.contains(&key.as_str()) {
                tracing::warn!(key = %key, "ignoring unknown config option");
            }
        }

        let settings = match root.clone().try_into::<AgentSettings>() {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!(error = %e, "invalid agent settings, using defaults");
                AgentSettings::default()
            }
        };

        let mut catalog = MetricCatalog::new();
        for block in blocks(&table, "metric") {
            let raw: RawMetric = match block.clone().try_into() {
                Ok(raw) => raw,
                Err(e) => {
                    tracing::warn!(error = %e, "skipping malformed [[metric]] block");
                    continue;
                }
            };
            if let Err(e) = catalog.define(
                &raw.name,
                raw.type_instance.as_deref(),
                raw.data_source_type.as_deref(),
                raw.index,
            ) {
                tracing::warn!(error = %e, "skipping metric definition");
            }
        }

        let mut instances = Vec::new();
        for block in blocks(&table, "instance") {
            let raw: RawInstance = match block.clone().try_into() {
                Ok(raw) => raw,
                Err(e) => {
                    tracing::warn!(error = %e, "skipping malformed [[instance]] block");
                    continue;
                }
            };
            match InstanceDefinition::define(
                &catalog,
                &raw.name,
                raw.interface.as_deref(),
                raw.path.as_deref(),
                &raw.collect,
                raw.interval_secs,
            ) {
                Ok(instance) => instances.push(instance),
                Err(e) => tracing::warn!(error = %e, "skipping instance definition"),
            }
        }

        Ok(Self {
            settings,
            catalog,
            instances,
        })
    }
}

fn blocks<'a>(table: &'a toml::value::Table, key: &str) -> impl Iterator<Item = &'a toml::Value> {
    table
        .get(key)
        .and_then(toml::Value::as_array)
        .into_iter()
        .flatten()
}

#[cfg(test)]
mod tests {
    use super::*;
    use snortmon_common::types::DataSourceType;
    use std::time::Duration;

    const SAMPLE: &str = r#"
host = "sensor-01"

[[metric]]
name = "alerts"
type_instance = "alerts"
data_source_type = "GAUGE"
index = 1

[[metric]]
name = "dropped"
type_instance = "dropped"
data_source_type = "derive"
index = 2

[[instance]]
name = "eth0"
interface = "eth0"
path = "/var/log/snort/snort.stats"
collect = ["alerts", "dropped"]
interval_secs = 10
"#;

    #[test]
    fn parses_metrics_and_instances() {
        let config = Config::parse(SAMPLE).unwrap();
        assert_eq!(config.settings.host.as_deref(), Some("sensor-01"));
        assert_eq!(config.catalog.len(), 2);
        assert_eq!(config.instances.len(), 1);

        let instance = &config.instances[0];
        assert_eq!(instance.name, "eth0");
        assert_eq!(instance.interface, "eth0");
        assert_eq!(instance.interval, Duration::from_secs(10));
        assert_eq!(instance.metrics.len(), 2);
        assert_eq!(instance.metrics[0].data_source_type, DataSourceType::Gauge);
        assert_eq!(instance.metrics[1].index, 2);
    }

    #[test]
    fn malformed_metric_block_only_loses_that_block() {
        let config = Config::parse(
            r#"
[[metric]]
name = "good"
type_instance = "good"
data_source_type = "gauge"
index = 1

[[metric]]
name = "bad"
type_instance = "bad"
data_source_type = "gauge"
index = "two"
"#,
        )
        .unwrap();
        assert_eq!(config.catalog.len(), 1);
        assert!(config.catalog.lookup("good").is_some());
        assert!(config.catalog.lookup("bad").is_none());
    }

    #[test]
    fn invalid_metric_definition_only_loses_that_block() {
        let config = Config::parse(
            r#"
[[metric]]
name = "good"
type_instance = "good"
data_source_type = "gauge"
index = 1

[[metric]]
name = "bad"
type_instance = "bad"
data_source_type = "rate"
index = 2
"#,
        )
        .unwrap();
        assert_eq!(config.catalog.len(), 1);
    }

    #[test]
    fn instance_with_unresolved_collect_is_not_registered() {
        let config = Config::parse(
            r#"
[[metric]]
name = "alerts"
type_instance = "alerts"
data_source_type = "gauge"
index = 1

[[instance]]
name = "eth0"
interface = "eth0"
path = "/var/log/snort/snort.stats"
collect = ["alerts", "missing"]
interval_secs = 10
"#,
        )
        .unwrap();
        assert!(config.instances.is_empty());
    }

    #[test]
    fn duplicate_metric_name_keeps_first_definition() {
        let config = Config::parse(
            r#"
[[metric]]
name = "alerts"
type_instance = "alerts"
data_source_type = "gauge"
index = 1

[[metric]]
name = "alerts"
type_instance = "shadow"
data_source_type = "derive"
index = 5
"#,
        )
        .unwrap();
        assert_eq!(config.catalog.len(), 1);
        let kept = config.catalog.lookup("alerts").unwrap();
        assert_eq!(kept.type_instance, "alerts");
    }

    #[test]
    fn unknown_top_level_keys_are_tolerated() {
        let config = Config::parse("retention_days = 7\n").unwrap();
        assert!(config.catalog.is_empty());
        assert!(config.instances.is_empty());
        assert!(config.settings.host.is_none());
    }
}
