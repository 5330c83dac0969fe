//! # Display Handle Module
//!
//! Revocable preview handles for byte blobs, the local stand-in for browser
//! object URLs.
//!
//! ## Responsibilities:
//! - `DisplayHandles` capability: create, resolve and release handles
//! - `HandleRegistry` default implementation backed by an in-process map
//! - `ScopedHandle` RAII guard for probe-internal handles
//!
//! ## Ownership rules:
//! - A handle stays valid until it is explicitly released
//! - The holder of the current result set owns every preview handle in it and
//!   must release all of them before replacing or discarding the collection
//! - Releasing an unknown or already-released handle is a no-op

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

/// Opaque, revocable reference to a displayable blob.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DisplayHandle(u64);

/// Capability for allocating and revoking display handles.
pub trait DisplayHandles: Send + Sync {
    /// Allocate a handle for a blob. Valid until explicitly released.
    fn create(&self, blob: Arc<[u8]>) -> DisplayHandle;

    /// Resolve a handle back to its blob, if it is still live.
    fn resolve(&self, handle: DisplayHandle) -> Option<Arc<[u8]>>;

    /// Release a handle. Releasing a dead handle is a no-op.
    fn release(&self, handle: DisplayHandle);
}

/// In-process handle registry.
#[derive(Default)]
pub struct HandleRegistry {
    entries: Mutex<HashMap<u64, Arc<[u8]>>>,
    next_id: AtomicU64,
}

impl HandleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of handles currently live, used to detect leaks.
    pub fn live_count(&self) -> usize {
        self.entries.lock().expect("handle registry poisoned").len()
    }
}

impl DisplayHandles for HandleRegistry {
    fn create(&self, blob: Arc<[u8]>) -> DisplayHandle {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.entries
            .lock()
            .expect("handle registry poisoned")
            .insert(id, blob);
        DisplayHandle(id)
    }

    fn resolve(&self, handle: DisplayHandle) -> Option<Arc<[u8]>> {
        self.entries
            .lock()
            .expect("handle registry poisoned")
            .get(&handle.0)
            .cloned()
    }

    fn release(&self, handle: DisplayHandle) {
        self.entries
            .lock()
            .expect("handle registry poisoned")
            .remove(&handle.0);
    }
}

/// Guard that releases its handle when dropped, on every exit path.
pub struct ScopedHandle<'a> {
    handles: &'a dyn DisplayHandles,
    handle: DisplayHandle,
}

impl<'a> ScopedHandle<'a> {
    pub fn new(handles: &'a dyn DisplayHandles, blob: Arc<[u8]>) -> Self {
        let handle = handles.create(blob);
        Self { handles, handle }
    }

    pub fn handle(&self) -> DisplayHandle {
        self.handle
    }
}

impl Drop for ScopedHandle<'_> {
    fn drop(&mut self) {
        self.handles.release(self.handle);
    }
}
