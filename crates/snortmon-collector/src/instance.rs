use crate::catalog::{MetricCatalog, MetricDefinition};
use crate::error::ConfigError;
use chrono::{DateTime, Utc};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// One configured polling unit: a perfmon file, the metrics to collect
/// from it, and how often to read it.
///
/// Built once from configuration, then owned by its scheduler task for the
/// life of the process. Only `last_timestamp` mutates after construction,
/// and only from the single task polling this instance.
#[derive(Debug)]
pub struct InstanceDefinition {
    /// Plugin-instance tag on emitted samples; also names the scheduler
    /// task.
    pub name: String,
    /// Descriptive label carried through to the configuration surface.
    pub interface: String,
    pub path: PathBuf,
    /// Shared handles into the catalog, in `collect` order.
    pub metrics: Vec<Arc<MetricDefinition>>,
    pub interval: Duration,
    /// Timestamp recovered from the most recently read row; used as the
    /// emission time for that row's samples.
    pub last_timestamp: Option<DateTime<Utc>>,
}

impl InstanceDefinition {
    /// Validates the instance options and resolves `collect` against the
    /// catalog.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if `interface`, `path`, `collect`, or
    /// `interval_secs` is unset (or zero), or if a `collect` entry names an
    /// undefined metric. The instance is not registered in that case.
    pub fn define(
        catalog: &MetricCatalog,
        name: &str,
        interface: Option<&str>,
        path: Option<&str>,
        collect: &[String],
        interval_secs: Option<u64>,
    ) -> Result<Self, ConfigError> {
        let missing = |option| ConfigError::MissingField {
            block: "instance",
            name: name.to_string(),
            option,
        };

        let interface = interface.ok_or_else(|| missing("interface"))?;
        let path = path.ok_or_else(|| missing("path"))?;
        if collect.is_empty() {
            return Err(missing("collect"));
        }
        let interval_secs = interval_secs.ok_or_else(|| missing("interval_secs"))?;
        if interval_secs == 0 {
            return Err(ConfigError::InvalidInterval(name.to_string()));
        }

        let mut metrics = Vec::with_capacity(collect.len());
        for metric_name in collect {
            let metric =
                catalog
                    .lookup(metric_name)
                    .ok_or_else(|| ConfigError::UnknownMetric {
                        instance: name.to_string(),
                        metric: metric_name.clone(),
                    })?;
            metrics.push(metric);
        }

        Ok(Self {
            name: name.to_string(),
            interface: interface.to_string(),
            path: PathBuf::from(path),
            metrics,
            interval: Duration::from_secs(interval_secs),
            last_timestamp: None,
        })
    }
}
