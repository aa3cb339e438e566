use snortmon_collector::instance::InstanceDefinition;
use snortmon_collector::{poller, ValueSink};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio::time;

/// Spawns the periodic read task for one instance.
///
/// The task ticks at the instance interval (first tick immediately) and
/// polls synchronously. A failed tick is logged and the instance stays
/// scheduled; only process shutdown stops the task.
pub fn spawn_poller(
    mut instance: InstanceDefinition,
    host: String,
    sink: Arc<dyn ValueSink>,
) -> JoinHandle<()> {
    let task = format!("snort-{}", instance.name);
    tokio::spawn(async move {
        let mut ticker = time::interval(instance.interval);
        loop {
            ticker.tick().await;
            if let Err(e) = poller::poll(&mut instance, &host, sink.as_ref()) {
                tracing::warn!(task = %task, error = %e, "read failed, tick skipped");
            }
        }
    })
}
