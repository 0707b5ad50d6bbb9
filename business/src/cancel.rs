//! Cancellable operations and a two-way race.
//!
//! A [`CancellableOperation`] wraps a future together with a `CancellationToken`
//! from `tokio_util`. The matching [`OperationHandle`] can cancel it from
//! anywhere; the operation then stops at its next poll and drops the wrapped
//! future, releasing whatever it held (an open connection, for instance).
//!
//! [`first_of`] polls two futures and resolves with whichever finishes first,
//! dropping the other. [`with_deadline`] composes the two: the operation races
//! a timer which cancels it when it fires.
//!
//! ```ignore
//! let outcome = with_deadline(fetcher.get(url), Duration::from_secs(8)).await;
//! match outcome {
//!     Ok(response) => { /* network won, timer dropped */ }
//!     Err(DeadlineExceeded) => { /* timer won, request dropped */ }
//! }
//! ```

use std::future::Future;
use std::time::Duration;

use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// The operation was cancelled before it completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("operation cancelled")]
pub struct Cancelled;

/// The deadline fired before the operation completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("deadline exceeded")]
pub struct DeadlineExceeded;

/// Handle used to cancel a [`CancellableOperation`] and observe its cancellation.
#[derive(Debug, Clone)]
pub struct OperationHandle {
    token: CancellationToken,
}

impl OperationHandle {
    /// Requests cancellation. Idempotent.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Resolves once [`cancel`](Self::cancel) has been called.
    pub async fn cancelled(&self) {
        self.token.cancelled().await;
    }
}

/// A future that can be cancelled through its [`OperationHandle`].
#[derive(Debug)]
pub struct CancellableOperation<F> {
    future: F,
    token: CancellationToken,
}

impl<F: Future> CancellableOperation<F> {
    pub fn new(future: F) -> (Self, OperationHandle) {
        let token = CancellationToken::new();
        let handle = OperationHandle {
            token: token.clone(),
        };
        (Self { future, token }, handle)
    }

    /// Drives the operation to completion, or stops as soon as it is cancelled.
    ///
    /// A cancellation requested before the first poll wins even if the wrapped
    /// future would be immediately ready.
    pub async fn run(self) -> Result<F::Output, Cancelled> {
        let Self { future, token } = self;
        tokio::select! {
            biased;
            () = token.cancelled() => Err(Cancelled),
            output = future => Ok(output),
        }
    }
}

/// Outcome of [`first_of`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Race<A, B> {
    First(A),
    Second(B),
}

/// Resolves with the first of two futures to complete; the loser is dropped.
///
/// When both are ready on the same poll, `first` wins.
pub async fn first_of<A, B>(first: A, second: B) -> Race<A::Output, B::Output>
where
    A: Future,
    B: Future,
{
    tokio::select! {
        biased;
        output = first => Race::First(output),
        output = second => Race::Second(output),
    }
}

/// Runs `future` with a deadline.
///
/// The operation races a timer; if the timer fires first it cancels the
/// operation, whose wrapped future is then dropped. If the operation finishes
/// first the timer is dropped with it.
pub async fn with_deadline<F: Future>(
    future: F,
    timeout: Duration,
) -> Result<F::Output, DeadlineExceeded> {
    let (operation, handle) = CancellableOperation::new(future);
    let timer = async {
        tokio::time::sleep(timeout).await;
        handle.cancel();
    };

    match first_of(operation.run(), timer).await {
        Race::First(Ok(output)) => Ok(output),
        Race::First(Err(Cancelled)) | Race::Second(()) => Err(DeadlineExceeded),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    use super::*;

    struct DropFlag(Arc<AtomicBool>);

    impl Drop for DropFlag {
        fn drop(&mut self) {
            self.0.store(true, Ordering::SeqCst);
        }
    }

    #[tokio::test]
    async fn test_operation_completes_when_not_cancelled() {
        let (operation, handle) = CancellableOperation::new(async { 7 });
        assert_eq!(operation.run().await, Ok(7));
        assert!(!handle.is_cancelled());
    }

    #[tokio::test]
    async fn test_cancel_before_run_wins() {
        let (operation, handle) = CancellableOperation::new(async { 7 });
        handle.cancel();
        assert_eq!(operation.run().await, Err(Cancelled));
        assert!(handle.is_cancelled());
        handle.cancelled().await;
    }

    #[tokio::test]
    async fn test_first_of_prefers_first_when_both_ready() {
        let race = first_of(async { "a" }, async { "b" }).await;
        assert_eq!(race, Race::First("a"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_of_second_wins() {
        let race = first_of(std::future::pending::<()>(), async { 3 }).await;
        assert_eq!(race, Race::Second(3));
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_drops_slow_future() {
        let dropped = Arc::new(AtomicBool::new(false));
        let flag = DropFlag(Arc::clone(&dropped));
        let slow = async move {
            let _flag = flag;
            std::future::pending::<()>().await;
        };

        let outcome = with_deadline(slow, Duration::from_millis(50)).await;
        assert_eq!(outcome, Err(DeadlineExceeded));
        assert!(dropped.load(Ordering::SeqCst), "slow future must be dropped");
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_passes_fast_future() {
        let fast = async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            "done"
        };
        assert_eq!(with_deadline(fast, Duration::from_millis(50)).await, Ok("done"));
    }
}
