use std::collections::HashSet;
use std::sync::{Mutex, OnceLock, PoisonError};
use thiserror::Error;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Caller,
    Pool,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TeidPoolError {
    #[error("lifecycle is not initialized")]
    UninitializedLifecycle,

    #[error("TEID pool is already bound to a lifecycle")]
    AlreadyInitialized,

    #[error("{0:?} lifecycle ended before a TEID could be allocated")]
    LifecycleEnded(Lifecycle),
}

/// Allocator of unique, non-zero GTP-U TEIDs.
///
/// TEIDs are drawn at random and rejected if zero or already outstanding.
/// Every draw checks both the pool lifecycle and the caller lifecycle, so a
/// pathological run of collisions can always be escaped by cancellation.
#[derive(Debug, Default)]
pub struct TeidPool {
    teids: Mutex<HashSet<u32>>,
    lifecycle: OnceLock<CancellationToken>,
}

impl TeidPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn init(&self, lifecycle: Option<CancellationToken>) -> Result<(), TeidPoolError> {
        let lifecycle = lifecycle.ok_or(TeidPoolError::UninitializedLifecycle)?;
        self.lifecycle
            .set(lifecycle)
            .map_err(|_| TeidPoolError::AlreadyInitialized)
    }

    /// Returns a TEID that is not currently outstanding.
    /// The pool must first be bound with `init`.
    pub fn next(&self, caller: Option<&CancellationToken>) -> Result<u32, TeidPoolError> {
        self.next_with(caller, rand::random::<u32>)
    }

    fn next_with<F>(&self, caller: Option<&CancellationToken>, mut draw: F) -> Result<u32, TeidPoolError>
    where
        F: FnMut() -> u32,
    {
        let (pool, caller) = match (self.lifecycle.get(), caller) {
            (Some(pool), Some(caller)) => (pool, caller),
            _ => return Err(TeidPoolError::UninitializedLifecycle),
        };

        let mut teids = self.teids.lock().unwrap_or_else(PoisonError::into_inner);
        loop {
            if caller.is_cancelled() {
                return Err(TeidPoolError::LifecycleEnded(Lifecycle::Caller));
            }
            if pool.is_cancelled() {
                return Err(TeidPoolError::LifecycleEnded(Lifecycle::Pool));
            }

            let teid = draw();
            if teid == 0 {
                continue;
            }
            if teids.insert(teid) {
                tracing::trace!("Allocated TEID {:08x} ({} outstanding)", teid, teids.len());
                return Ok(teid);
            }
        }
    }

    /// Returns a TEID to the pool. Releasing an unknown TEID is a no-op.
    pub fn release(&self, teid: u32) {
        let mut teids = self.teids.lock().unwrap_or_else(PoisonError::into_inner);
        if teids.remove(&teid) {
            tracing::trace!("Released TEID {:08x}", teid);
        }
    }

    pub fn outstanding(&self) -> usize {
        self.teids.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    #[cfg(test)]
    pub fn is_outstanding(&self, teid: u32) -> bool {
        self.teids
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&teid)
    }
}
