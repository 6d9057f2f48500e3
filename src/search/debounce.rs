//! Trailing-edge debouncer on the tokio timer.

use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

type Callback<T> = Arc<dyn Fn(T) + Send + Sync>;

/// Collapses a burst of calls into one invocation with the last value,
/// fired once `delay` has passed without a new call.
///
/// Must be used from within a tokio runtime. The pending timer is aborted
/// when the debouncer is dropped.
pub struct Debouncer<T: Send + 'static> {
    delay: Duration,
    callback: Callback<T>,
    /// Pending value tagged with the generation of the call that set it.
    pending: Arc<Mutex<Option<(u64, T)>>>,
    generation: u64,
    timer: Option<JoinHandle<()>>,
}

impl<T: Send + 'static> Debouncer<T> {
    pub fn new(delay: Duration, callback: impl Fn(T) + Send + Sync + 'static) -> Self {
        Self {
            delay,
            callback: Arc::new(callback),
            pending: Arc::new(Mutex::new(None)),
            generation: 0,
            timer: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Schedule `value`, replacing any pending one and restarting the window.
    pub fn call(&mut self, value: T) {
        self.abort_timer();
        self.generation += 1;
        let generation = self.generation;
        *self.pending.lock() = Some((generation, value));

        let pending = Arc::clone(&self.pending);
        let callback = Arc::clone(&self.callback);
        let delay = self.delay;
        self.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let due = {
                let mut slot = pending.lock();
                match slot.as_ref() {
                    Some((g, _)) if *g == generation => slot.take(),
                    _ => None,
                }
            };
            if let Some((_, value)) = due {
                callback(value);
            }
        }));
    }

    /// Drop the pending value without firing.
    pub fn cancel(&mut self) {
        self.abort_timer();
        self.pending.lock().take();
    }

    /// Fire the pending value now, if any. Returns whether it fired.
    pub fn flush(&mut self) -> bool {
        self.abort_timer();
        let due = self.pending.lock().take();
        match due {
            Some((_, value)) => {
                (self.callback)(value);
                true
            }
            None => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.lock().is_some()
    }

    fn abort_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}

impl<T: Send + 'static> Drop for Debouncer<T> {
    fn drop(&mut self) {
        self.abort_timer();
    }
}
