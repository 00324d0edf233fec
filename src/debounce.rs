use log::debug;
use std::future::Future;
use std::sync::Mutex;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::sleep;

/// Cancellable single-slot timer.
///
/// Scheduling replaces whatever is still waiting. Once the delay elapses the
/// action is detached onto its own task, so cancelling afterwards never aborts
/// a call that has already been issued.
#[derive(Debug, Default)]
pub struct Debouncer {
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl Debouncer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `action` after `delay` unless rescheduled or cancelled first.
    ///
    /// Must be called from within a tokio runtime.
    pub fn schedule<F>(&self, action: F, delay: Duration)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let mut pending = self.slot();
        if let Some(handle) = pending.take() {
            if !handle.is_finished() {
                debug!("Rescheduling debounced action");
            }
            handle.abort();
        }

        *pending = Some(tokio::spawn(async move {
            sleep(delay).await;
            tokio::spawn(action);
        }));
    }

    /// Cancel the waiting action, if any. Returns whether one was waiting.
    pub fn cancel_pending(&self) -> bool {
        match self.slot().take() {
            Some(handle) if !handle.is_finished() => {
                handle.abort();
                true
            }
            _ => false,
        }
    }

    /// Whether an action is still waiting for its delay to elapse
    pub fn is_pending(&self) -> bool {
        self.slot()
            .as_ref()
            .map(|handle| !handle.is_finished())
            .unwrap_or(false)
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<JoinHandle<()>>> {
        self.pending.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn counting_action(counter: &Arc<AtomicUsize>) -> impl Future<Output = ()> + Send + 'static {
        let counter = counter.clone();
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_fires_after_delay() {
        let debouncer = Debouncer::new();
        let counter = Arc::new(AtomicUsize::new(0));

        debouncer.schedule(counting_action(&counter), Duration::from_millis(500));
        sleep(Duration::from_millis(499)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 0);
        assert!(debouncer.is_pending());

        sleep(Duration::from_millis(10)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert!(!debouncer.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_reschedule_runs_only_latest() {
        let debouncer = Debouncer::new();
        let counter = Arc::new(AtomicUsize::new(0));

        for _ in 0..5 {
            debouncer.schedule(counting_action(&counter), Duration::from_millis(500));
            sleep(Duration::from_millis(100)).await;
        }
        sleep(Duration::from_millis(600)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_pending() {
        let debouncer = Debouncer::new();
        let counter = Arc::new(AtomicUsize::new(0));

        debouncer.schedule(counting_action(&counter), Duration::from_millis(500));
        assert!(debouncer.cancel_pending());
        assert!(!debouncer.cancel_pending());

        sleep(Duration::from_secs(1)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_does_not_abort_fired_action() {
        let debouncer = Debouncer::new();
        let counter = Arc::new(AtomicUsize::new(0));
        let slow_counter = counter.clone();

        debouncer.schedule(
            async move {
                sleep(Duration::from_millis(300)).await;
                slow_counter.fetch_add(1, Ordering::SeqCst);
            },
            Duration::from_millis(100),
        );

        sleep(Duration::from_millis(150)).await;
        assert!(!debouncer.cancel_pending());

        sleep(Duration::from_millis(400)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels_waiting_action() {
        let counter = Arc::new(AtomicUsize::new(0));
        {
            let debouncer = Debouncer::new();
            debouncer.schedule(counting_action(&counter), Duration::from_millis(500));
        }
        sleep(Duration::from_secs(1)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }
}
