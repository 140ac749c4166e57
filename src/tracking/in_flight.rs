//! Tracking of outstanding asynchronous store writes.
//!
//! Every capture that starts persisting registers itself here before the
//! write settles; the export path calls [`InFlightTracker::barrier`] to make
//! sure no capture that began earlier is missed. The tracker is an explicit
//! component owned by whoever wires the pipeline together and is injected
//! into both the capture path and the export path.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use log::trace;
use tokio::sync::watch;

/// Set of in-flight store writes with a snapshot barrier.
///
/// `barrier()` waits only for the operations that are members of the set at
/// call time. Writes registered while a barrier is waiting are not part of
/// its snapshot, which keeps the wait bounded to already-issued work even
/// when captures keep arriving.
#[derive(Default)]
pub struct InFlightTracker {
    ops: Mutex<HashMap<u64, watch::Receiver<bool>>>,
    next_id: AtomicU64,
}

/// Handle to one registered write.
///
/// Dropping the guard marks the operation as settled and removes it from
/// the tracked set. Removal happens on every exit path, success or failure,
/// so a failed write can never leave the set permanently inconsistent.
pub struct InFlightGuard {
    tracker: Arc<InFlightTracker>,
    id: u64,
    settled_tx: watch::Sender<bool>,
}

impl InFlightTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a new operation to the outstanding set.
    ///
    /// Call this before the write is issued; hold the returned guard across
    /// the await so settlement is observed regardless of outcome.
    pub fn register(self: &Arc<Self>) -> InFlightGuard {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (settled_tx, settled_rx) = watch::channel(false);
        self.ops.lock().unwrap().insert(id, settled_rx);
        trace!("registered in-flight write {}", id);
        InFlightGuard {
            tracker: Arc::clone(self),
            id,
            settled_tx,
        }
    }

    /// Number of writes currently outstanding.
    pub fn in_flight(&self) -> usize {
        self.ops.lock().unwrap().len()
    }

    /// Waits until every operation registered before this call has settled.
    ///
    /// Returns immediately when the set is empty. Settlement order does not
    /// matter, and failed writes count as settled.
    pub async fn barrier(&self) {
        let snapshot: Vec<watch::Receiver<bool>> =
            self.ops.lock().unwrap().values().cloned().collect();
        trace!("barrier waiting on {} in-flight writes", snapshot.len());
        for mut settled_rx in snapshot {
            loop {
                if *settled_rx.borrow_and_update() {
                    break;
                }
                // Err means the guard was dropped, which also settles.
                if settled_rx.changed().await.is_err() {
                    break;
                }
            }
        }
        trace!("barrier released");
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        let _ = self.settled_tx.send(true);
        self.tracker.ops.lock().unwrap().remove(&self.id);
        trace!("in-flight write {} settled", self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicBool;
    use std::time::Duration;
    use tokio::time::timeout;

    #[tokio::test]
    async fn barrier_on_empty_set_returns_immediately() {
        let tracker = Arc::new(InFlightTracker::new());
        timeout(Duration::from_millis(100), tracker.barrier())
            .await
            .expect("empty barrier must not wait");
    }

    #[tokio::test]
    async fn barrier_waits_for_every_snapshot_member() {
        let tracker = Arc::new(InFlightTracker::new());
        let g1 = tracker.register();
        let g2 = tracker.register();
        let g3 = tracker.register();

        let done = Arc::new(AtomicBool::new(false));
        let waiter = {
            let tracker = Arc::clone(&tracker);
            let done = Arc::clone(&done);
            tokio::spawn(async move {
                tracker.barrier().await;
                done.store(true, Ordering::SeqCst);
            })
        };

        tokio::task::yield_now().await;
        assert!(!done.load(Ordering::SeqCst));

        // Settle out of registration order.
        drop(g2);
        tokio::task::yield_now().await;
        assert!(!done.load(Ordering::SeqCst));

        drop(g3);
        drop(g1);
        timeout(Duration::from_secs(1), waiter)
            .await
            .expect("barrier should release once all settle")
            .unwrap();
        assert!(done.load(Ordering::SeqCst));
        assert_eq!(tracker.in_flight(), 0);
    }

    #[tokio::test]
    async fn barrier_ignores_registrations_made_while_waiting() {
        let tracker = Arc::new(InFlightTracker::new());
        let g1 = tracker.register();

        let waiter = {
            let tracker = Arc::clone(&tracker);
            tokio::spawn(async move { tracker.barrier().await })
        };
        // Let the barrier take its snapshot before the late registration.
        tokio::task::yield_now().await;

        let _late = tracker.register();
        drop(g1);

        timeout(Duration::from_secs(1), waiter)
            .await
            .expect("barrier must not wait for later registrations")
            .unwrap();
        assert_eq!(tracker.in_flight(), 1);
    }

    #[tokio::test]
    async fn guard_is_removed_on_failure_paths() {
        let tracker = Arc::new(InFlightTracker::new());

        async fn failing_write(tracker: &Arc<InFlightTracker>) -> Result<(), ()> {
            let _guard = tracker.register();
            Err(())
        }

        assert!(failing_write(&tracker).await.is_err());
        assert_eq!(tracker.in_flight(), 0);
        timeout(Duration::from_millis(100), tracker.barrier())
            .await
            .expect("failed write must still settle");
    }
}
