use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Handle to a computation scheduled by a [`Debouncer`]
#[derive(Debug, Clone, Default)]
pub struct ScheduledCall {
    cancelled: Arc<AtomicBool>,
    finished: Arc<AtomicBool>,
}

impl ScheduledCall {
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    pub fn is_finished(&self) -> bool {
        self.finished.load(Ordering::SeqCst)
    }
}

/// Runs a pure function on the latest input once inputs stop changing for `delay`.
///
/// Each [`call`](Debouncer::call) cancels whatever was pending and schedules a
/// fresh computation. Results are published on a watch channel.
pub struct Debouncer<I, O> {
    delay: Duration,
    func: Arc<dyn Fn(I) -> O + Send + Sync>,
    output: Arc<watch::Sender<Option<O>>>,
    pending: Option<(ScheduledCall, JoinHandle<()>)>,
}

impl<I, O> Debouncer<I, O>
where
    I: Send + 'static,
    O: Clone + Send + Sync + 'static,
{
    pub fn new<F>(delay: Duration, func: F) -> Self
    where
        F: Fn(I) -> O + Send + Sync + 'static,
    {
        let (output, _) = watch::channel(None);
        Self {
            delay,
            func: Arc::new(func),
            output: Arc::new(output),
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Schedule `func(input)` after the delay, replacing any pending call.
    /// Must be called inside a tokio runtime.
    pub fn call(&mut self, input: I) -> ScheduledCall {
        self.cancel();

        let call = ScheduledCall::default();
        let state = call.clone();
        let func = self.func.clone();
        let output = self.output.clone();
        let delay = self.delay;

        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if state.is_cancelled() {
                return;
            }
            let value = func(input);
            state.finished.store(true, Ordering::SeqCst);
            output.send_replace(Some(value));
        });

        self.pending = Some((call.clone(), handle));
        call
    }

    /// Drop the pending computation, if any
    pub fn cancel(&mut self) {
        if let Some((call, handle)) = self.pending.take() {
            call.cancel();
            handle.abort();
        }
    }

    /// Most recent completed result
    pub fn latest(&self) -> Option<O> {
        self.output.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<O>> {
        self.output.subscribe()
    }
}

impl<I, O> Drop for Debouncer<I, O> {
    fn drop(&mut self) {
        if let Some((call, handle)) = self.pending.take() {
            call.cancel();
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicU32;

    #[tokio::test(start_paused = true)]
    async fn test_only_last_input_is_computed() {
        let runs = Arc::new(AtomicU32::new(0));
        let counter = runs.clone();
        let mut debouncer = Debouncer::new(Duration::from_millis(400), move |x: u32| {
            counter.fetch_add(1, Ordering::SeqCst);
            x * 2
        });

        let first = debouncer.call(1);
        tokio::time::sleep(Duration::from_millis(100)).await;
        debouncer.call(2);
        tokio::time::sleep(Duration::from_millis(100)).await;
        let last = debouncer.call(3);

        tokio::time::sleep(Duration::from_millis(500)).await;

        assert!(first.is_cancelled());
        assert!(last.is_finished());
        assert_eq!(debouncer.latest(), Some(6));
        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_nothing_runs_before_delay() {
        let mut debouncer = Debouncer::new(Duration::from_millis(400), |x: u32| x + 1);
        let call = debouncer.call(1);

        tokio::time::sleep(Duration::from_millis(399)).await;
        assert!(!call.is_finished());
        assert_eq!(debouncer.latest(), None);

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(debouncer.latest(), Some(2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_drops_pending() {
        let mut debouncer = Debouncer::new(Duration::from_millis(50), |x: u32| x);
        let mut updates = debouncer.subscribe();

        debouncer.call(9);
        debouncer.cancel();
        tokio::time::sleep(Duration::from_millis(100)).await;

        assert_eq!(debouncer.latest(), None);
        assert!(!updates.has_changed().unwrap());
    }
}
