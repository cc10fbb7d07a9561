//! Background execution of scans, cleans and diagnostic runs.
//!
//! One dedicated thread per invoked operation; nothing here limits
//! concurrency or offers cancellation. A caller that loses interest just
//! drops the handle and the eventual result goes nowhere.

use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

/// Run `work` off the caller's thread and hand the result to `on_complete`
/// (invoked on the worker thread) when it finishes.
pub fn run_in_background<R, W, C>(work: W, on_complete: C)
where
    R: Send + 'static,
    W: FnOnce() -> R + Send + 'static,
    C: FnOnce(R) + Send + 'static,
{
    let _ = thread::spawn(move || on_complete(work()));
}

/// A background operation whose result the caller polls or waits for.
///
/// Used by the CLI to keep a spinner alive while a scan or clean runs.
pub struct BackgroundTask<R> {
    rx: Receiver<R>,
}

impl<R: Send + 'static> BackgroundTask<R> {
    /// Start `work` on its own thread immediately.
    pub fn spawn<W>(work: W) -> Self
    where
        W: FnOnce() -> R + Send + 'static,
    {
        let (tx, rx) = mpsc::channel();
        let _ = thread::spawn(move || {
            // The caller may have abandoned the task; a dead receiver is fine.
            let _ = tx.send(work());
        });
        Self { rx }
    }

    /// Non-blocking poll. `None` while the work is still running.
    pub fn try_take(&self) -> Option<R> {
        match self.rx.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }

    /// Block until the work finishes.
    pub fn wait(self) -> anyhow::Result<R> {
        self.rx
            .recv()
            .map_err(|_| anyhow::anyhow!("background worker exited without a result"))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use std::time::Duration;

    #[test]
    fn test_run_in_background_delivers_result() {
        let (tx, rx) = mpsc::channel();
        run_in_background(
            || 2 + 2,
            move |result| {
                tx.send(result).unwrap();
            },
        );
        assert_eq!(rx.recv_timeout(Duration::from_secs(5)).unwrap(), 4);
    }

    #[test]
    fn test_caller_thread_is_not_blocked() {
        let (tx, rx) = mpsc::channel();
        let (release_tx, release_rx) = mpsc::channel::<()>();

        run_in_background(
            move || {
                release_rx.recv().unwrap();
                "done"
            },
            move |result| {
                tx.send(result).unwrap();
            },
        );

        // We got here while the work is still parked, so the spawn itself
        // didn't block. Release it and observe completion.
        release_tx.send(()).unwrap();
        assert_eq!(rx.recv_timeout(Duration::from_secs(5)).unwrap(), "done");
    }

    #[test]
    fn test_background_task_wait() {
        let task = BackgroundTask::spawn(|| String::from("report"));
        assert_eq!(task.wait().unwrap(), "report");
    }

    #[test]
    fn test_background_task_try_take_eventually_yields() {
        let task = BackgroundTask::spawn(|| 7u64);
        let mut result = None;
        for _ in 0..500 {
            if let Some(r) = task.try_take() {
                result = Some(r);
                break;
            }
            std::thread::sleep(Duration::from_millis(10));
        }
        assert_eq!(result, Some(7));
    }
}
