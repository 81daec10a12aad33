//! Chart instance registry
//!
//! Owns the live chart-engine handles keyed by slot id and guarantees at most
//! one live instance per slot: the old handle is always released before the
//! new one is created.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, warn};

use super::ChartError;

/// A live instance owned by an external chart engine
pub trait ChartHandle {
    /// Tear the instance down. May fail; callers in this module never
    /// propagate the failure.
    fn destroy(&mut self) -> Result<(), ChartError>;
}

/// Release a handle, ignoring any failure.
///
/// A broken prior instance must never block creating the next one, so the
/// destroy error is only logged.
pub fn release_best_effort<H: ChartHandle>(slot: &str, mut handle: H) {
    if let Err(err) = handle.destroy() {
        warn!(slot, error = %err, "ignoring chart destroy failure");
    }
}

/// Registry of live chart instances, at most one per slot.
#[derive(Debug)]
pub struct ChartRegistry<H: ChartHandle> {
    slots: HashMap<String, H>,
}

impl<H: ChartHandle> Default for ChartRegistry<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: ChartHandle> ChartRegistry<H> {
    pub fn new() -> Self {
        Self {
            slots: HashMap::new(),
        }
    }

    /// Replace the instance in `slot` with the one built by `factory`.
    ///
    /// Any existing instance is released first (failures swallowed) and its
    /// entry removed unconditionally. A blank slot id is a no-op: `factory`
    /// is not called and `None` is returned.
    pub fn replace<F>(&mut self, slot: &str, factory: F) -> Option<&H>
    where
        F: FnOnce() -> H,
    {
        if !is_valid_slot(slot) {
            debug!(slot, "ignoring replace on invalid slot id");
            return None;
        }
        self.release(slot);
        let handle = factory();
        Some(self.slots.entry(slot.to_string()).or_insert(handle))
    }

    /// Like [`replace`](Self::replace) with a fallible factory.
    ///
    /// The old instance is released even when the factory fails; the slot is
    /// then left empty and the error returned. A blank slot id yields
    /// `Ok(None)` without calling the factory.
    pub fn try_replace<F, E>(&mut self, slot: &str, factory: F) -> Result<Option<&H>, E>
    where
        F: FnOnce() -> Result<H, E>,
    {
        if !is_valid_slot(slot) {
            debug!(slot, "ignoring replace on invalid slot id");
            return Ok(None);
        }
        self.release(slot);
        let handle = factory()?;
        Ok(Some(self.slots.entry(slot.to_string()).or_insert(handle)))
    }

    /// Release and remove the instance in `slot`. Returns true if one existed.
    pub fn release(&mut self, slot: &str) -> bool {
        match self.slots.remove(slot) {
            Some(old) => {
                release_best_effort(slot, old);
                true
            }
            None => false,
        }
    }

    /// Release every instance
    pub fn release_all(&mut self) {
        for (slot, handle) in self.slots.drain() {
            release_best_effort(&slot, handle);
        }
    }

    pub fn get(&self, slot: &str) -> Option<&H> {
        self.slots.get(slot)
    }

    pub fn contains(&self, slot: &str) -> bool {
        self.slots.contains_key(slot)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Occupied slot ids, sorted
    pub fn slots(&self) -> Vec<&str> {
        let mut slots: Vec<&str> = self.slots.keys().map(String::as_str).collect();
        slots.sort_unstable();
        slots
    }
}

fn is_valid_slot(slot: &str) -> bool {
    !slot.trim().is_empty()
}

// ─────────────────────────────────────────────────────────────────────────────
// Shared Registry
// ─────────────────────────────────────────────────────────────────────────────

/// Registry shared across tasks.
///
/// All mutation goes through one async lock, so overlapping `replace` calls
/// on a slot apply one after the other and never leave two live instances.
#[derive(Debug)]
pub struct SharedChartRegistry<H: ChartHandle> {
    inner: Arc<Mutex<ChartRegistry<H>>>,
}

impl<H: ChartHandle> Clone for SharedChartRegistry<H> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<H: ChartHandle> Default for SharedChartRegistry<H> {
    fn default() -> Self {
        Self {
            inner: Arc::new(Mutex::new(ChartRegistry::new())),
        }
    }
}

impl<H: ChartHandle> SharedChartRegistry<H> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace under the lock. Returns true if a new instance was stored.
    pub async fn replace<F>(&self, slot: &str, factory: F) -> bool
    where
        F: FnOnce() -> H,
    {
        self.inner.lock().await.replace(slot, factory).is_some()
    }

    pub async fn release(&self, slot: &str) -> bool {
        self.inner.lock().await.release(slot)
    }

    pub async fn release_all(&self) {
        self.inner.lock().await.release_all();
    }

    pub async fn len(&self) -> usize {
        self.inner.lock().await.len()
    }

    /// Run `f` with exclusive access to the registry
    pub async fn with<R>(&self, f: impl FnOnce(&mut ChartRegistry<H>) -> R) -> R {
        let mut guard = self.inner.lock().await;
        f(&mut guard)
    }
}
