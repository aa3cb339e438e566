use crate::error::ConfigError;
use snortmon_common::types::DataSourceType;
use std::collections::HashMap;
use std::sync::Arc;

/// A named metric definition: which column of a perfmon row to read and how
/// to interpret it. Immutable once defined; shared between the catalog and
/// any number of instances.
#[derive(Debug)]
pub struct MetricDefinition {
    /// Configuration-internal identifier, used only for `collect`
    /// cross-referencing. Never emitted.
    pub name: String,
    /// Type-instance tag attached to every sample from this metric.
    pub type_instance: String,
    pub data_source_type: DataSourceType,
    /// 1-based column position within a data row. Field 0 is the row
    /// timestamp, so the first value column is index 1.
    pub index: usize,
}

/// Registry of named metric definitions, built once from configuration and
/// read-only afterward.
///
/// # Examples
///
/// ```
/// use snortmon_collector::catalog::MetricCatalog;
///
/// let mut catalog = MetricCatalog::new();
/// catalog
///     .define("dropped", Some("dropped"), Some("derive"), Some(2))
///     .unwrap();
/// assert!(catalog.lookup("dropped").is_some());
/// assert!(catalog.lookup("accepted").is_none());
/// ```
#[derive(Debug, Default)]
pub struct MetricCatalog {
    metrics: HashMap<String, Arc<MetricDefinition>>,
}

impl MetricCatalog {
    pub fn new() -> Self {
        Self {
            metrics: HashMap::new(),
        }
    }

    /// Validates and registers one metric definition.
    ///
    /// Multiple metrics may read the same column, but names are unique:
    /// redefining an existing name is rejected rather than silently
    /// shadowed.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if a required option is missing, the
    /// data source type is unrecognized, the index is not positive, or the
    /// name is already taken.
    pub fn define(
        &mut self,
        name: &str,
        type_instance: Option<&str>,
        data_source_type: Option<&str>,
        index: Option<i64>,
    ) -> Result<Arc<MetricDefinition>, ConfigError> {
        let missing = |option| ConfigError::MissingField {
            block: "metric",
            name: name.to_string(),
            option,
        };

        let type_instance = type_instance.ok_or_else(|| missing("type_instance"))?;
        let kind_token = data_source_type.ok_or_else(|| missing("data_source_type"))?;
        let data_source_type =
            kind_token
                .parse::<DataSourceType>()
                .map_err(|_| ConfigError::UnknownDataSourceType {
                    name: name.to_string(),
                    value: kind_token.to_string(),
                })?;
        let index = index.ok_or_else(|| missing("index"))?;
        if index <= 0 {
            return Err(ConfigError::InvalidIndex {
                name: name.to_string(),
                index,
            });
        }

        if self.metrics.contains_key(name) {
            return Err(ConfigError::DuplicateMetric(name.to_string()));
        }

        let definition = Arc::new(MetricDefinition {
            name: name.to_string(),
            type_instance: type_instance.to_string(),
            data_source_type,
            index: index as usize,
        });
        self.metrics
            .insert(name.to_string(), Arc::clone(&definition));
        Ok(definition)
    }

    /// Returns a shared handle to the definition registered under `name`.
    pub fn lookup(&self, name: &str) -> Option<Arc<MetricDefinition>> {
        self.metrics.get(name).map(Arc::clone)
    }

    pub fn len(&self) -> usize {
        self.metrics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }
}
