use std::{pin::Pin, time::Duration};

use tokio::sync::mpsc;

/// Input must be quiet this long before the preview is recomputed.
pub const DEBOUNCE_DELAY: Duration = Duration::from_millis(500);

pub type DrainTask = Pin<Box<dyn Future<Output = ()> + Send>>;

/// Restartable single-slot timer.
///
/// Each pushed value replaces the pending one and restarts the delay. Only a
/// value that survives the whole delay reaches the output receiver.
pub struct Debouncer<T> {
    inbox_tx: mpsc::UnboundedSender<T>,
}

impl<T: Send + 'static> Debouncer<T> {
    /// Returns the input handle, the settled-value receiver and the drain task
    /// the caller has to spawn. An `output_buffer` of 0 is raised to 1.
    pub fn new(delay: Duration, output_buffer: usize) -> (Debouncer<T>, mpsc::Receiver<T>, DrainTask) {
        let (inbox_tx, mut inbox_rx) = mpsc::unbounded_channel::<T>();
        let (out_tx, out_rx) = mpsc::channel::<T>(output_buffer.max(1));

        let drain_task = Box::pin(async move {
            while let Some(mut pending) = inbox_rx.recv().await {
                loop {
                    tokio::select! {
                        next = inbox_rx.recv() => match next {
                            Some(value) => pending = value,
                            // Input closed before the value settled.
                            None => return,
                        },
                        _ = tokio::time::sleep(delay) => {
                            if out_tx.send(pending).await.is_err() {
                                return;
                            }
                            break;
                        }
                    }
                }
            }
        });

        (Debouncer { inbox_tx }, out_rx, drain_task)
    }

    /// Returns the value back if the drain task is gone.
    pub fn push(&self, value: T) -> Result<(), T> {
        self.inbox_tx.send(value).map_err(|e| e.0)
    }
}

impl<T> Clone for Debouncer<T> {
    fn clone(&self) -> Self {
        Self {
            inbox_tx: self.inbox_tx.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use tokio::time::{Instant, sleep};

    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[tokio::test(start_paused = true)]
    async fn emits_only_after_quiet_period() {
        let (debouncer, mut out, task) = Debouncer::new(DEBOUNCE_DELAY, 4);
        tokio::spawn(task);

        let start = Instant::now();
        debouncer.push("h").unwrap();
        sleep(ms(100)).await;
        debouncer.push("ht").unwrap();
        sleep(ms(100)).await;
        debouncer.push("https://youtu.be/abc").unwrap();

        assert_eq!(out.recv().await, Some("https://youtu.be/abc"));
        let elapsed = start.elapsed();
        assert!(elapsed >= ms(700) && elapsed < ms(750), "settled after {elapsed:?}");
    }

    #[tokio::test(start_paused = true)]
    async fn separate_bursts_emit_separately() {
        let (debouncer, mut out, task) = Debouncer::new(DEBOUNCE_DELAY, 4);
        tokio::spawn(task);

        debouncer.push(1).unwrap();
        assert_eq!(out.recv().await, Some(1));

        debouncer.push(2).unwrap();
        sleep(ms(499)).await;
        debouncer.push(3).unwrap();
        assert_eq!(out.recv().await, Some(3));
    }

    #[tokio::test(start_paused = true)]
    async fn zero_output_buffer_still_delivers() {
        let (debouncer, mut out, task) = Debouncer::new(DEBOUNCE_DELAY, 0);
        tokio::spawn(task);

        debouncer.push("abc").unwrap();
        assert_eq!(out.recv().await, Some("abc"));
    }

    #[tokio::test(start_paused = true)]
    async fn closing_input_drops_pending_value() {
        let (debouncer, mut out, task) = Debouncer::new(DEBOUNCE_DELAY, 4);
        tokio::spawn(task);

        debouncer.push("pending").unwrap();
        drop(debouncer);
        assert_eq!(out.recv().await, None);
    }
}
