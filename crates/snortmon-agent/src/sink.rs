use anyhow::{Context, Result};
use serde_json::json;
use snortmon_collector::ValueSink;
use snortmon_common::types::{Sample, Value};
use std::fs::OpenOptions;
use std::io::{self, LineWriter, Write};
use std::path::Path;
use std::sync::Mutex;

/// Writes each dispatched sample as one JSON object per line, appended to
/// a file or streamed to stdout.
pub struct JsonlSink {
    writer: Mutex<Box<dyn Write + Send>>,
}

impl JsonlSink {
    /// Opens `path` for appending.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or opened.
    pub fn to_file(path: &Path) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("unable to open output file `{}`", path.display()))?;
        Ok(Self {
            writer: Mutex::new(Box::new(LineWriter::new(file))),
        })
    }

    pub fn to_stdout() -> Self {
        Self {
            writer: Mutex::new(Box::new(io::stdout())),
        }
    }
}

impl ValueSink for JsonlSink {
    fn submit(&self, sample: &Sample) -> Result<()> {
        let value = match sample.value {
            Value::Gauge(v) => json!(v),
            Value::Counter(v) => json!(v),
            Value::Derive(v) => json!(v),
            Value::Absolute(v) => json!(v),
        };
        let record = json!({
            "host": sample.host,
            "plugin": sample.plugin,
            "plugin_instance": sample.plugin_instance,
            "type": sample.type_name,
            "type_instance": sample.type_instance,
            "ds_type": sample.value.kind().to_string(),
            "value": value,
            "time": sample.timestamp.timestamp(),
            "interval": sample.interval.as_secs(),
        });

        let mut writer = self.writer.lock().unwrap();
        writeln!(writer, "{record}").context("unable to write sample")
    }
}
