//! At-most-one in-flight operation, shared by every concurrent caller.

use std::fmt;
use std::future::Future;

use futures_util::FutureExt;
use futures_util::future::{BoxFuture, Shared};
use tokio::sync::Mutex;
use tracing::trace;

/// Collapses concurrent calls into a single execution.
///
/// The first caller of [`run`](Self::run) starts the operation and parks
/// its pending result in a shared slot. Callers arriving while it is
/// pending attach to that same result instead of starting new work. The
/// slot is emptied once the operation settles, so the next call after
/// that starts a fresh execution.
pub struct SingleFlight<T> {
    slot: Mutex<Slot<T>>,
}

struct Slot<T> {
    generation: u64,
    in_flight: Option<InFlight<T>>,
}

struct InFlight<T> {
    generation: u64,
    pending: Shared<BoxFuture<'static, T>>,
}

impl<T> SingleFlight<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self {
            slot: Mutex::new(Slot {
                generation: 0,
                in_flight: None,
            }),
        }
    }

    /// Run `start` unless an execution is already pending, then await the
    /// shared outcome.
    ///
    /// `start` is only invoked by the caller that finds the slot empty.
    pub async fn run<F, Fut>(&self, start: F) -> T
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T> + Send + 'static,
    {
        let (generation, pending) = {
            let mut slot = self.slot.lock().await;
            match &slot.in_flight {
                Some(in_flight) => {
                    trace!(generation = in_flight.generation, "joining in-flight operation");
                    (in_flight.generation, in_flight.pending.clone())
                }
                None => {
                    slot.generation += 1;
                    let generation = slot.generation;
                    let pending = start().boxed().shared();
                    slot.in_flight = Some(InFlight {
                        generation,
                        pending: pending.clone(),
                    });
                    trace!(generation, "started operation");
                    (generation, pending)
                }
            }
        };

        let outcome = pending.await;

        // Only the execution we awaited may be cleared; a newer one may
        // already occupy the slot.
        let mut slot = self.slot.lock().await;
        if slot
            .in_flight
            .as_ref()
            .is_some_and(|in_flight| in_flight.generation == generation)
        {
            slot.in_flight = None;
        }

        outcome
    }

    /// Returns true while an execution is pending or not yet cleared.
    pub async fn is_in_flight(&self) -> bool {
        self.slot.lock().await.in_flight.is_some()
    }

    /// How many executions have been started so far.
    pub async fn started(&self) -> u64 {
        self.slot.lock().await.generation
    }
}

impl<T> Default for SingleFlight<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for SingleFlight<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("SingleFlight");
        match self.slot.try_lock() {
            Ok(slot) => s
                .field("started", &slot.generation)
                .field("in_flight", &slot.in_flight.is_some()),
            Err(_) => s.field("in_flight", &"<locked>"),
        };
        s.finish()
    }
}
