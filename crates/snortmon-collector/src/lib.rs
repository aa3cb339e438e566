//! Perfmon polling core for the snortmon agent.
//!
//! A [`catalog::MetricCatalog`] holds the named metric definitions built
//! from configuration, an [`instance::InstanceDefinition`] binds a perfmon
//! file to a subset of those metrics, and [`poller::poll`] reads the newest
//! row of the file on each tick and forwards typed samples to a
//! [`ValueSink`].

pub mod catalog;
pub mod error;
pub mod instance;
pub mod perfmon;
pub mod poller;


use anyhow::Result;
use snortmon_common::types::Sample;

/// Destination for dispatched samples.
///
/// Implementations must be `Send + Sync`: instances poll on independent
/// tasks and share a single sink. The sink owns any aggregation or
/// rate computation; the poller only tags each sample with its
/// [`DataSourceType`](snortmon_common::types::DataSourceType).
pub trait ValueSink: Send + Sync {
    /// Accepts one sample for storage or forwarding.
    ///
    /// # Errors
    ///
    /// Returns an error if the sample could not be written; the poller
    /// logs the failure and continues with the next metric.
    fn submit(&self, sample: &Sample) -> Result<()>;
}
