//! Refresh coordination
//!
//! At most one refresh exchange may be in flight at a time. The first
//! request to observe a rejected credential becomes the leader and performs
//! the exchange; every request that observes the rejection while the
//! exchange is running is parked as a waiter and settled with the leader's
//! outcome. Flag check-and-set and queue push/drain happen under one lock.

use log::debug;
use tokio::sync::{oneshot, Mutex};

use super::error::SessionError;

/// Outcome of a refresh exchange, fanned out to every waiter
pub type RefreshOutcome = Result<String, SessionError>;

/// Role assigned to a request entering the refresh flow
pub enum RefreshRole {
    /// This request performs the exchange and must call
    /// [`RefreshCoordinator::finish`] on every exit path
    Leader,
    /// A refresh is already running; await its outcome
    Follower(oneshot::Receiver<RefreshOutcome>),
}

#[derive(Default)]
struct CoordinatorState {
    refreshing: bool,
    waiters: Vec<oneshot::Sender<RefreshOutcome>>,
}

/// Owns the refresh-in-progress flag and the pending-waiter queue
#[derive(Default)]
pub struct RefreshCoordinator {
    state: Mutex<CoordinatorState>,
}

impl RefreshCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter the refresh flow: lead the exchange, or queue behind the one
    /// already running
    pub async fn begin(&self) -> RefreshRole {
        let mut state = self.state.lock().await;
        if state.refreshing {
            let (tx, rx) = oneshot::channel();
            state.waiters.push(tx);
            debug!("Refresh already in flight, queueing waiter ({} queued)", state.waiters.len());
            RefreshRole::Follower(rx)
        } else {
            state.refreshing = true;
            RefreshRole::Leader
        }
    }

    /// Settle the exchange: drain every waiter with the outcome and clear
    /// the in-progress flag
    ///
    /// Leaders call this on success and on failure alike; the coordinator
    /// can never be left stuck in the refreshing state.
    pub async fn finish(&self, outcome: RefreshOutcome) {
        let waiters = {
            let mut state = self.state.lock().await;
            state.refreshing = false;
            std::mem::take(&mut state.waiters)
        };

        if !waiters.is_empty() {
            debug!("Settling {} queued waiters", waiters.len());
        }
        for waiter in waiters {
            // A waiter that gave up (dropped its receiver) is not an error
            let _ = waiter.send(outcome.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_first_caller_leads() {
        let coordinator = RefreshCoordinator::new();
        assert!(matches!(coordinator.begin().await, RefreshRole::Leader));
    }

    #[tokio::test]
    async fn test_concurrent_callers_queue_behind_leader() {
        let coordinator = RefreshCoordinator::new();

        let RefreshRole::Leader = coordinator.begin().await else {
            panic!("first caller must lead");
        };
        let RefreshRole::Follower(rx) = coordinator.begin().await else {
            panic!("second caller must queue");
        };

        coordinator.finish(Ok("renewed-access".to_string())).await;

        let outcome = rx.await.expect("leader settles every waiter");
        assert_eq!(outcome.unwrap(), "renewed-access");

        // Flag is cleared; the next caller leads again
        assert!(matches!(coordinator.begin().await, RefreshRole::Leader));
        coordinator.finish(Ok("unused".to_string())).await;
    }

    #[tokio::test]
    async fn test_failure_rejects_every_waiter() {
        let coordinator = RefreshCoordinator::new();

        let RefreshRole::Leader = coordinator.begin().await else {
            panic!("first caller must lead");
        };

        let mut receivers = Vec::new();
        for _ in 0..3 {
            match coordinator.begin().await {
                RefreshRole::Follower(rx) => receivers.push(rx),
                RefreshRole::Leader => panic!("refresh already in flight"),
            }
        }

        coordinator
            .finish(Err(SessionError::RefreshFailed {
                message: "revoked".to_string(),
            }))
            .await;

        for rx in receivers {
            let outcome = rx.await.expect("leader settles every waiter");
            assert!(matches!(outcome, Err(SessionError::RefreshFailed { .. })));
        }
    }
}
