use chrono::{DateTime, Utc};
use std::time::Duration;

/// Rate semantics of a metric value, telling the downstream sink how to
/// interpret successive samples.
///
/// # Examples
///
/// ```
/// use snortmon_common::types::DataSourceType;
///
/// let kind: DataSourceType = "DERIVE".parse().unwrap();
/// assert_eq!(kind, DataSourceType::Derive);
/// assert_eq!(kind.to_string(), "derive");
/// assert!("rate".parse::<DataSourceType>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSourceType {
    Gauge,
    Counter,
    Derive,
    Absolute,
}

impl std::fmt::Display for DataSourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataSourceType::Gauge => write!(f, "gauge"),
            DataSourceType::Counter => write!(f, "counter"),
            DataSourceType::Derive => write!(f, "derive"),
            DataSourceType::Absolute => write!(f, "absolute"),
        }
    }
}

impl std::str::FromStr for DataSourceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "gauge" => Ok(DataSourceType::Gauge),
            "counter" => Ok(DataSourceType::Counter),
            "derive" => Ok(DataSourceType::Derive),
            "absolute" => Ok(DataSourceType::Absolute),
            _ => Err(format!("unknown data source type: {s}")),
        }
    }
}

/// A typed numeric sample payload. The variant fixes the native
/// representation: gauges are floating point, counters and absolutes are
/// unsigned, derives are signed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    Gauge(f64),
    Counter(u64),
    Derive(i64),
    Absolute(u64),
}

impl Value {
    /// Converts a textual perfmon field into a typed value.
    ///
    /// # Examples
    ///
    /// ```
    /// use snortmon_common::types::{DataSourceType, Value};
    ///
    /// let value = Value::parse("42.5", DataSourceType::Gauge).unwrap();
    /// assert_eq!(value, Value::Gauge(42.5));
    /// assert!(Value::parse("-1", DataSourceType::Counter).is_err());
    /// ```
    pub fn parse(text: &str, kind: DataSourceType) -> Result<Self, String> {
        let text = text.trim();
        let value = match kind {
            DataSourceType::Gauge => text.parse().ok().map(Value::Gauge),
            DataSourceType::Counter => text.parse().ok().map(Value::Counter),
            DataSourceType::Derive => text.parse().ok().map(Value::Derive),
            DataSourceType::Absolute => text.parse().ok().map(Value::Absolute),
        };
        value.ok_or_else(|| format!("invalid {kind} value: '{text}'"))
    }

    pub fn kind(&self) -> DataSourceType {
        match self {
            Value::Gauge(_) => DataSourceType::Gauge,
            Value::Counter(_) => DataSourceType::Counter,
            Value::Derive(_) => DataSourceType::Derive,
            Value::Absolute(_) => DataSourceType::Absolute,
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Gauge(v) => write!(f, "{v}"),
            Value::Counter(v) => write!(f, "{v}"),
            Value::Derive(v) => write!(f, "{v}"),
            Value::Absolute(v) => write!(f, "{v}"),
        }
    }
}

/// One dispatched sample: a typed value with its identity tags, the
/// timestamp of the row it was read from, and the polling interval of the
/// instance that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub host: String,
    pub plugin: String,
    /// Name of the instance that produced this sample.
    pub plugin_instance: String,
    pub type_name: String,
    /// Label distinguishing sibling metrics under the same instance.
    pub type_instance: String,
    pub value: Value,
    pub timestamp: DateTime<Utc>,
    pub interval: Duration,
}
