use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Delay between the last search keystroke and the query it triggers.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(500);

/// Emits a pushed value once no newer value has arrived for `delay`.
///
/// Each push cancels the pending emission. Dropping the debouncer cancels
/// it too. Must be used inside a tokio runtime.
pub struct Debouncer<T> {
    delay: Duration,
    tx: mpsc::UnboundedSender<T>,
    pending: Option<JoinHandle<()>>,
}

impl<T: Send + 'static> Debouncer<T> {
    pub fn new(delay: Duration) -> (Self, mpsc::UnboundedReceiver<T>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Debouncer {
                delay,
                tx,
                pending: None,
            },
            rx,
        )
    }

    pub fn push(&mut self, value: T) {
        self.cancel();

        let tx = self.tx.clone();
        let delay = self.delay;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // The receiver may be gone; nothing to deliver to then.
            let _ = tx.send(value);
        }));
    }

    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}
