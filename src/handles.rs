//! Ephemeral display handles over in-memory image bytes
//!
//! A [`HandleRegistry`] models the platform's object-URL table: it hands out
//! unique, revocable URL-like handles over owned bytes so the presentation
//! layer can display an image without owning it. Entries accumulate until
//! explicitly revoked; the controller releases every handle it creates
//! deterministically, on supersession or reset, never relying on garbage
//! collection.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// A revocable reference to registered image bytes
///
/// Cloning a handle does not duplicate the underlying entry; all clones refer
/// to the same registry slot and a single revoke releases it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayHandle {
    id: u64,
    url: String,
}

impl DisplayHandle {
    /// The URL-like identifier usable as an image source by the view
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

/// Resolved content of a live handle
#[derive(Debug, Clone)]
pub struct HandleData {
    /// The registered bytes
    pub bytes: Arc<Vec<u8>>,
    /// Media type declared at registration
    pub media_type: String,
}

/// Registry statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandleStats {
    /// Entries currently live
    pub active: usize,
    /// Entries created over the registry's lifetime
    pub total_created: u64,
}

struct RegistryInner {
    entries: HashMap<u64, HandleData>,
    next_id: u64,
    total_created: u64,
}

/// Table of live display handles
pub struct HandleRegistry {
    inner: Mutex<RegistryInner>,
}

impl HandleRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(RegistryInner {
                entries: HashMap::new(),
                next_id: 0,
                total_created: 0,
            }),
        }
    }

    /// Register bytes and return a fresh handle
    #[must_use]
    pub fn create(&self, bytes: Vec<u8>, media_type: &str) -> DisplayHandle {
        let mut inner = self.lock();
        inner.next_id += 1;
        inner.total_created += 1;
        let id = inner.next_id;
        let size = bytes.len();
        inner.entries.insert(
            id,
            HandleData {
                bytes: Arc::new(bytes),
                media_type: media_type.to_owned(),
            },
        );
        tracing::trace!(id, size, media_type, "created display handle");
        DisplayHandle {
            id,
            url: format!("blob:clearframe/{id:08x}"),
        }
    }

    /// Release the entry behind a handle
    ///
    /// Returns `true` if the entry was live and is now released; `false` if
    /// it was already revoked. A second revoke of the same handle is a no-op.
    pub fn revoke(&self, handle: &DisplayHandle) -> bool {
        let released = self.lock().entries.remove(&handle.id).is_some();
        tracing::trace!(id = handle.id, released, "revoked display handle");
        released
    }

    /// Resolve a live handle to its bytes and media type
    #[must_use]
    pub fn resolve(&self, handle: &DisplayHandle) -> Option<HandleData> {
        self.lock().entries.get(&handle.id).cloned()
    }

    /// Number of currently live entries
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.lock().entries.len()
    }

    /// Snapshot of registry statistics
    #[must_use]
    pub fn stats(&self) -> HandleStats {
        let inner = self.lock();
        HandleStats {
            active: inner.entries.len(),
            total_created: inner.total_created,
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, RegistryInner> {
        self.inner.lock().expect("handle registry lock poisoned")
    }
}

impl Default for HandleRegistry {
    fn default() -> Self {
        Self::new()
    }
}
