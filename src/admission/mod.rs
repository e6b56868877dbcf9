//! Admission control for in-flight requests.
//!
//! # Responsibilities
//! - Bound concurrently-accepted requests to `threads + max_pending_requests`
//! - Fail fast when saturated: the caller responds 429 without touching the
//!   request body
//! - Release each slot exactly once, on every exit path
//!
//! This is tier 1 of the gateway's overload protection. Tier 2 is the
//! blocking push into the downstream queue (see `sink`): workers stalled on
//! a full queue keep holding their admission slots, which is what drives
//! tier 1 into rejecting.

use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore, TryAcquireError};

/// Bounds the number of requests being processed at once.
///
/// The accept check and the slot reservation are a single atomic operation,
/// so two requests racing at `capacity - 1` cannot both be admitted.
pub struct AdmissionController {
    slots: Arc<Semaphore>,
    capacity: usize,
}

impl AdmissionController {
    /// Create a controller with the given slot capacity.
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: Arc::new(Semaphore::new(capacity)),
            capacity,
        }
    }

    /// Try to reserve a slot for one request. Never waits.
    ///
    /// Returns `None` when all slots are taken; the caller must reject the
    /// request immediately. The returned permit releases its slot when
    /// dropped, which covers success and failure paths alike.
    pub fn try_accept(&self) -> Option<AdmissionPermit> {
        match Arc::clone(&self.slots).try_acquire_owned() {
            Ok(permit) => Some(AdmissionPermit { _permit: permit }),
            Err(TryAcquireError::NoPermits) | Err(TryAcquireError::Closed) => None,
        }
    }

    /// Configured slot capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Slots currently free.
    pub fn available(&self) -> usize {
        self.slots.available_permits()
    }
}

/// A reserved unit of concurrent processing capacity.
///
/// Dropping the permit returns the slot, so holding it for the request's
/// whole lifetime gives release-on-every-exit without explicit bookkeeping.
#[derive(Debug)]
pub struct AdmissionPermit {
    _permit: OwnedSemaphorePermit,
}
