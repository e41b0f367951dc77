use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::worker::Worker;

pub const USAGE_PERIOD: Duration = Duration::from_secs(60);

#[async_trait]
pub trait UsageSink: Send + Sync + 'static {
    /// Called once per full period the light stayed on.
    async fn add_usage(&self);
}

/// Counts whole periods of continuous light-on time. At most one timer runs;
/// starting again restarts the period.
#[derive(Default)]
pub struct UsageTracker {
    worker: Option<Worker>,
}

impl UsageTracker {
    pub fn start<S: UsageSink>(&mut self, period: Duration, sink: Arc<S>) {
        self.stop();
        self.worker = Some(Worker::spawn("usage", move |mut stop| async move {
            let start = tokio::time::Instant::now() + period;
            let mut interval = tokio::time::interval_at(start, period);
            loop {
                tokio::select! {
                    _ = stop.stopped() => break,
                    _ = interval.tick() => sink.add_usage().await,
                }
            }
            debug!("Usage tracker stopped");
        }));
    }

    pub fn stop(&mut self) {
        if let Some(mut worker) = self.worker.take() {
            worker.stop();
        }
    }

    pub fn is_running(&self) -> bool {
        self.worker.as_ref().is_some_and(|w| !w.is_finished())
    }
}
