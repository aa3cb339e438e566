//! The value-submission engine: one tick of one instance.

use crate::error::PollError;
use crate::instance::InstanceDefinition;
use crate::perfmon;
use crate::ValueSink;
use chrono::{TimeZone, Utc};
use snortmon_common::types::{Sample, Value};

/// Plugin identity attached to every dispatched sample.
pub const PLUGIN: &str = "snort";
/// Fixed type tag attached to every dispatched sample.
pub const TYPE: &str = "snort";

/// Polls `instance` once: extracts the newest perfmon row, converts the
/// configured columns, and submits one sample per metric to `sink`.
///
/// The row's own leading timestamp becomes the emission time for every
/// sample of this tick and is kept on the instance as `last_timestamp`. A
/// metric whose column index falls outside the row, or whose field fails
/// numeric conversion, is skipped with a warning while the remaining
/// metrics still dispatch. There is no rollback: samples submitted before
/// a later metric's failure stay submitted.
///
/// # Errors
///
/// Returns [`PollError`] when the whole tick must be skipped: the file
/// cannot be read, the last line is a comment, or the timestamp field is
/// not a valid Unix time. The instance stays scheduled either way.
pub fn poll(instance: &mut InstanceDefinition, host: &str, sink: &dyn ValueSink) -> Result<(), PollError> {
    let fields = perfmon::read_last_row(&instance.path)?;

    let stamp = fields.first().map(String::as_str).unwrap_or("");
    let seconds: i64 = stamp
        .trim()
        .parse()
        .map_err(|_| PollError::InvalidTimestamp(stamp.to_string()))?;
    let timestamp = Utc
        .timestamp_opt(seconds, 0)
        .single()
        .ok_or_else(|| PollError::InvalidTimestamp(stamp.to_string()))?;
    instance.last_timestamp = Some(timestamp);

    let mut dispatched = 0usize;
    for metric in &instance.metrics {
        let Some(field) = fields.get(metric.index) else {
            tracing::warn!(
                instance = %instance.name,
                metric = %metric.name,
                index = metric.index,
                fields = fields.len(),
                "column index out of range for the current row"
            );
            continue;
        };

        let value = match Value::parse(field, metric.data_source_type) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(
                    instance = %instance.name,
                    metric = %metric.name,
                    error = %e,
                    "value conversion failed"
                );
                continue;
            }
        };

        let sample = Sample {
            host: host.to_string(),
            plugin: PLUGIN.to_string(),
            plugin_instance: instance.name.clone(),
            type_name: TYPE.to_string(),
            type_instance: metric.type_instance.clone(),
            value,
            timestamp,
            interval: instance.interval,
        };

        match sink.submit(&sample) {
            Ok(()) => dispatched += 1,
            Err(e) => {
                tracing::warn!(
                    instance = %instance.name,
                    metric = %metric.name,
                    error = %e,
                    "sample submission failed"
                );
            }
        }
    }

    tracing::debug!(instance = %instance.name, dispatched, "poll complete");
    Ok(())
}
