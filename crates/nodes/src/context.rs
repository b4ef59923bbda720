//! Per-invocation execution context.

use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// Context threaded through every handler and predicate call of one run.
///
/// Cloning is cheap and clones share the same cancellation token, so a clone
/// handed to a spawned task observes cancellation of the original.
#[derive(Debug, Clone)]
pub struct ExecutionContext {
    run_id: Uuid,
    cancel: CancellationToken,
    deadline: Option<Instant>,
}

impl Default for ExecutionContext {
    fn default() -> Self {
        Self::new()
    }
}

impl ExecutionContext {
    /// A fresh context: new run id, not cancelled, no deadline.
    pub fn new() -> Self {
        Self {
            run_id: Uuid::new_v4(),
            cancel: CancellationToken::new(),
            deadline: None,
        }
    }

    /// Build a context around an existing token, e.g. one owned by a server's
    /// shutdown path.
    pub fn with_token(cancel: CancellationToken) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            cancel,
            deadline: None,
        }
    }

    /// Overrides the run id used for log correlation.
    pub fn with_run_id(mut self, run_id: Uuid) -> Self {
        self.run_id = run_id;
        self
    }

    /// Sets a deadline. An earlier existing deadline wins.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(match self.deadline {
            Some(existing) => existing.min(deadline),
            None => deadline,
        });
        self
    }

    /// Sets a deadline `timeout` from now. An earlier existing deadline wins.
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// A handle that can cancel this context from elsewhere.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Requests cancellation. Takes effect at the next step boundary.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// True once the deadline, if any, has been reached.
    pub fn is_past_deadline(&self) -> bool {
        self.deadline.is_some_and(|d| Instant::now() >= d)
    }

    /// Resolves when cancellation is requested or the deadline passes.
    /// Long-running handlers can `select!` on this to stop early.
    pub async fn cancelled(&self) {
        match self.deadline {
            Some(deadline) => {
                tokio::select! {
                    _ = self.cancel.cancelled() => {}
                    _ = tokio::time::sleep_until(deadline) => {}
                }
            }
            None => self.cancel.cancelled().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_cancellation() {
        let ctx = ExecutionContext::new();
        let clone = ctx.clone();
        assert!(!clone.is_cancelled());

        ctx.cancel();
        assert!(clone.is_cancelled());
        assert_eq!(ctx.run_id(), clone.run_id());
    }

    #[test]
    fn external_token_cancels_context() {
        let token = CancellationToken::new();
        let ctx = ExecutionContext::with_token(token.clone());
        token.cancel();
        assert!(ctx.is_cancelled());
    }

    #[tokio::test(start_paused = true)]
    async fn earlier_deadline_wins() {
        let ctx = ExecutionContext::new()
            .with_timeout(Duration::from_secs(5))
            .with_timeout(Duration::from_secs(60));

        let deadline = ctx.deadline().expect("deadline set");
        assert!(deadline <= Instant::now() + Duration::from_secs(5));

        assert!(!ctx.is_past_deadline());
        tokio::time::advance(Duration::from_secs(6)).await;
        assert!(ctx.is_past_deadline());
    }

    #[tokio::test(start_paused = true)]
    async fn deadline_wakes_cancelled_waiters() {
        let ctx = ExecutionContext::new().with_timeout(Duration::from_secs(1));
        let start = Instant::now();

        tokio::select! {
            _ = tokio::time::sleep(Duration::from_secs(60)) => panic!("slept through the deadline"),
            _ = ctx.cancelled() => {}
        }

        assert!(start.elapsed() < Duration::from_secs(2));
        assert!(ctx.is_past_deadline());
        assert!(!ctx.is_cancelled());
    }

    #[tokio::test]
    async fn cancel_wakes_waiters_without_deadline() {
        let ctx = ExecutionContext::new();
        let waiter = ctx.clone();
        let handle = tokio::spawn(async move { waiter.cancelled().await });

        ctx.cancel();
        handle.await.unwrap();
    }

    #[test]
    fn no_deadline_is_never_past() {
        assert!(!ExecutionContext::new().is_past_deadline());
    }
}
