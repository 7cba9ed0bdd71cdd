//! Render Deadlines
//!
//! A render gets one time budget from launch to PDF. The async side stops
//! waiting when it runs out; the blocking side stops working, so Chrome is
//! torn down at the same point instead of after its own per-call waits.

use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use inkforge_core::ConvertError;
use tracing::warn;

/// A fixed point in time that every render step must finish before.
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    budget: Duration,
    expires: Instant,
}

impl Deadline {
    pub fn after(budget: Duration) -> Self {
        Self { budget, expires: Instant::now() + budget }
    }

    pub fn budget(&self) -> Duration {
        self.budget
    }

    /// Time left, or [`ConvertError::Timeout`] once the budget is spent.
    pub fn remaining(&self) -> Result<Duration, ConvertError> {
        match self.expires.checked_duration_since(Instant::now()) {
            Some(left) if !left.is_zero() => Ok(left),
            _ => Err(ConvertError::Timeout(self.budget)),
        }
    }

    /// Runs `work` on its own thread and waits for it until the deadline.
    ///
    /// On expiry the worker is abandoned and the caller gets
    /// [`ConvertError::Timeout`] straight away. Whatever the worker borrows
    /// from the caller must be owned (`'static`), so the caller can release
    /// its resources, and the worker's blocked calls fail once they are gone.
    pub fn run<T, F>(&self, work: F) -> Result<T, ConvertError>
    where
        T: Send + 'static,
        F: FnOnce() -> Result<T, ConvertError> + Send + 'static,
    {
        let wait = self.remaining()?;
        let (tx, rx) = mpsc::sync_channel(1);
        thread::Builder::new()
            .name("inkforge-render".into())
            .spawn(move || {
                let _ = tx.send(work());
            })?;

        match rx.recv_timeout(wait) {
            Ok(result) => result,
            Err(mpsc::RecvTimeoutError::Timeout) => {
                warn!(budget = ?self.budget, "Render step abandoned at deadline");
                Err(ConvertError::Timeout(self.budget))
            }
            Err(mpsc::RecvTimeoutError::Disconnected) => {
                Err(ConvertError::Render("render worker exited without a result".into()))
            }
        }
    }
}

/// Runs blocking `work` on the blocking pool and gives up after `limit`.
pub async fn run_blocking<T, F>(limit: Duration, work: F) -> Result<T, ConvertError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, ConvertError> + Send + 'static,
{
    let job = tokio::task::spawn_blocking(work);
    match tokio::time::timeout(limit, job).await {
        Ok(Ok(result)) => result,
        Ok(Err(join_error)) => Err(ConvertError::Render(format!("render task failed: {join_error}"))),
        Err(_) => {
            warn!(?limit, "Render exceeded its time budget");
            Err(ConvertError::Timeout(limit))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[test]
    fn spent_deadline_reports_timeout() {
        let deadline = Deadline::after(Duration::ZERO);
        let err = deadline.remaining().unwrap_err();
        assert!(matches!(err, ConvertError::Timeout(d) if d.is_zero()));
    }

    #[test]
    fn remaining_never_exceeds_budget() {
        let deadline = Deadline::after(Duration::from_secs(5));
        assert!(deadline.remaining().unwrap() <= Duration::from_secs(5));
        assert_eq!(deadline.budget(), Duration::from_secs(5));
    }

    #[test]
    fn run_returns_work_result_in_time() {
        let deadline = Deadline::after(Duration::from_secs(5));
        assert_eq!(deadline.run(|| Ok(42)).unwrap(), 42);
        let err = deadline
            .run(|| Err::<(), _>(ConvertError::Render("boom".into())))
            .unwrap_err();
        assert!(matches!(err, ConvertError::Render(_)));
    }

    #[test]
    fn run_gives_up_on_stuck_work() {
        let deadline = Deadline::after(Duration::from_millis(50));
        let started = Instant::now();
        let err = deadline
            .run(|| {
                thread::sleep(Duration::from_secs(2));
                Ok(())
            })
            .unwrap_err();
        assert!(matches!(err, ConvertError::Timeout(_)));
        assert!(started.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn resources_are_released_at_the_deadline() {
        // Stands in for the render context: dropped by the caller as soon
        // as the deadline passes, while the worker is still blocked.
        struct Held(Arc<AtomicBool>);
        impl Drop for Held {
            fn drop(&mut self) {
                self.0.store(true, Ordering::SeqCst);
            }
        }

        let released = Arc::new(AtomicBool::new(false));
        let started = Instant::now();
        let result = {
            let _held = Held(released.clone());
            Deadline::after(Duration::from_millis(50)).run(|| {
                thread::sleep(Duration::from_secs(2));
                Ok(())
            })
        };
        assert!(result.is_err());
        assert!(released.load(Ordering::SeqCst));
        assert!(started.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test]
    async fn blocking_work_past_the_limit_times_out() {
        let started = Instant::now();
        let err = run_blocking(Duration::from_millis(50), || {
            thread::sleep(Duration::from_millis(500));
            Ok(())
        })
        .await
        .unwrap_err();
        assert!(matches!(err, ConvertError::Timeout(d) if d == Duration::from_millis(50)));
        assert!(started.elapsed() < Duration::from_millis(400));
    }

    #[tokio::test]
    async fn blocking_work_within_the_limit_completes() {
        let bytes = run_blocking(Duration::from_secs(5), || Ok(b"%PDF".to_vec())).await.unwrap();
        assert_eq!(bytes, b"%PDF");
    }

    #[tokio::test]
    async fn panicking_work_is_a_render_error() {
        let err = run_blocking(Duration::from_secs(5), || -> Result<(), ConvertError> {
            panic!("worker died")
        })
        .await
        .unwrap_err();
        assert!(matches!(err, ConvertError::Render(_)));
    }
}
