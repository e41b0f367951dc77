use std::future::Future;
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// Stop side handed to a background loop.
pub struct StopSignal {
    receiver: oneshot::Receiver<()>,
}

impl StopSignal {
    /// Sleeps for `duration`. Returns `false` if a stop was requested before
    /// the sleep completed.
    pub async fn wait(&mut self, duration: Duration) -> bool {
        tokio::select! {
            _ = &mut self.receiver => false,
            _ = tokio::time::sleep(duration) => true,
        }
    }

    /// Resolves once a stop has been requested or the worker handle dropped.
    pub async fn stopped(&mut self) {
        let _ = (&mut self.receiver).await;
    }
}

/// Handle to a background loop. Dropping it requests a stop.
pub struct Worker {
    name: &'static str,
    stop: Option<oneshot::Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl Worker {
    pub fn spawn<F, Fut>(name: &'static str, body: F) -> Self
    where
        F: FnOnce(StopSignal) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let (sender, receiver) = oneshot::channel();
        let handle = tokio::spawn(body(StopSignal { receiver }));
        Self {
            name,
            stop: Some(sender),
            handle: Some(handle),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().is_none_or(|h| h.is_finished())
    }

    pub fn stop(&mut self) {
        if let Some(sender) = self.stop.take() {
            let _ = sender.send(());
        }
    }

    /// Requests a stop and waits for the loop to exit.
    pub async fn shutdown(mut self) {
        self.stop();
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}

impl Drop for Worker {
    fn drop(&mut self) {
        self.stop();
    }
}
