//! Keyed store of detached page instances

use super::key::RouteKey;
use super::{CacheInvalidation, RouteReuseStrategy};
use crate::events::{ShellEvent, SharedEventBus};
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::debug;

/// Observable state of one route key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryState {
    Fresh,
    Cached,
    PendingEviction,
}

struct CacheState<H> {
    entries: HashMap<RouteKey, Arc<H>>,
    pending: HashSet<RouteKey>,
}

/// Route instance cache
///
/// Releasing an instance means dropping the cache's handle to it. An instance
/// that is currently attached is also held by the navigation host, so it is
/// destroyed once the host detaches it without capturing.
pub struct RouteInstanceCache<H> {
    state: Mutex<CacheState<H>>,
    events: SharedEventBus,
}

impl<H> RouteInstanceCache<H> {
    pub fn new(events: SharedEventBus) -> Self {
        Self {
            state: Mutex::new(CacheState {
                entries: HashMap::new(),
                pending: HashSet::new(),
            }),
            events,
        }
    }

    /// Current lifecycle state of a key
    pub fn state(&self, key: &RouteKey) -> EntryState {
        let state = self.state.lock();
        if state.pending.contains(key) {
            EntryState::PendingEviction
        } else if state.entries.contains_key(key) {
            EntryState::Cached
        } else {
            EntryState::Fresh
        }
    }

    /// Keys with a stored instance, sorted
    pub fn cached_keys(&self) -> Vec<RouteKey> {
        let mut keys: Vec<_> = self.state.lock().entries.keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Number of stored instances
    pub fn len(&self) -> usize {
        self.state.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().entries.is_empty()
    }

    /// Number of outstanding eviction marks
    pub fn pending_len(&self) -> usize {
        self.state.lock().pending.len()
    }
}

impl<H: Send + Sync> RouteReuseStrategy<H> for RouteInstanceCache<H> {
    fn should_capture(&self, key: &RouteKey, cacheable: bool) -> bool {
        if self.state.lock().pending.remove(key) {
            debug!("[RouteReuse] {} marked for eviction, not capturing", key);
            self.events.publish(ShellEvent::CaptureSuppressed {
                key: key.to_string(),
            });
            return false;
        }
        cacheable
    }

    fn capture(&self, key: &RouteKey, instance: Arc<H>) {
        let mut state = self.state.lock();

        // A close may have landed between the decision and the store
        if state.pending.remove(key) {
            drop(state);
            drop(instance);
            debug!("[RouteReuse] {} closed before store, instance released", key);
            self.events.publish(ShellEvent::CaptureSuppressed {
                key: key.to_string(),
            });
            return;
        }

        let replaced = state.entries.insert(key.clone(), instance);
        drop(state);
        drop(replaced);

        debug!("[RouteReuse] captured {}", key);
        self.events.publish(ShellEvent::RouteCaptured {
            key: key.to_string(),
        });
    }

    fn should_restore(&self, key: &RouteKey) -> bool {
        self.state.lock().entries.contains_key(key)
    }

    fn restore(&self, key: &RouteKey) -> Option<Arc<H>> {
        let instance = self.state.lock().entries.get(key).cloned();
        if instance.is_some() {
            debug!("[RouteReuse] restoring {}", key);
            self.events.publish(ShellEvent::RouteRestored {
                key: key.to_string(),
            });
        }
        instance
    }
}

impl<H: Send + Sync> CacheInvalidation for RouteInstanceCache<H> {
    fn request_close(&self, key: &RouteKey) {
        let evicted = {
            let mut state = self.state.lock();
            let evicted = state.entries.remove(key);
            state.pending.insert(key.clone());
            evicted
        };

        if let Some(instance) = evicted {
            drop(instance);
            debug!("[RouteReuse] evicted {}", key);
            self.events.publish(ShellEvent::RouteEvicted {
                key: key.to_string(),
            });
        }
        debug!("[RouteReuse] {} marked for eviction", key);
    }

    fn clear_all(&self) {
        let released: Vec<_> = {
            let mut state = self.state.lock();
            state.pending.clear();
            state.entries.drain().collect()
        };

        for (key, instance) in released {
            drop(instance);
            self.events.publish(ShellEvent::RouteEvicted {
                key: key.to_string(),
            });
        }
        debug!("[RouteReuse] cleared all stored routes");
    }
}
