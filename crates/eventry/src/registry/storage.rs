//! In-memory handler registry implementation

use std::{
    collections::{HashMap, HashSet},
    sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use tracing::debug;

use crate::{
    error::{EventryError, Result},
    types::{Handler, HandlerEntry, HandlerId},
};

/// Shared registry state guarded by a single lock
///
/// `handlers` maps event names to ordered handler sequences; insertion
/// order defines invocation order. `fired` records which names have fired
/// at least once since the last reset; occurrence, not a count.
#[derive(Debug, Default)]
struct RegistryState {
    handlers: HashMap<String, Vec<HandlerEntry>>,
    fired: HashSet<String>,
}

/// In-memory handler registry implementation
///
/// Clones share the same underlying state, so a registry can be handed to
/// a dispatcher and to handler closures at the same time.
#[derive(Debug, Clone)]
pub struct InMemoryHandlerRegistry {
    state: Arc<RwLock<RegistryState>>,
}

impl InMemoryHandlerRegistry {
    /// Create a new in-memory handler registry
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(RegistryState::default())),
        }
    }

    fn read_state(&self) -> Result<RwLockReadGuard<'_, RegistryState>> {
        self.state
            .read()
            .map_err(|e| EventryError::Storage(format!("Failed to acquire read lock: {}", e)))
    }

    fn write_state(&self) -> Result<RwLockWriteGuard<'_, RegistryState>> {
        self.state
            .write()
            .map_err(|e| EventryError::Storage(format!("Failed to acquire write lock: {}", e)))
    }

    fn validate_name(name: &str) -> Result<()> {
        if name.is_empty() {
            return Err(EventryError::InvalidName(name.to_string()));
        }
        Ok(())
    }
}

impl Default for InMemoryHandlerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl super::HandlerRegistry for InMemoryHandlerRegistry {
    fn bind(&self, name: &str, callback: Handler, once: bool) -> Result<HandlerId> {
        Self::validate_name(name)?;

        let entry = HandlerEntry {
            id: HandlerId::new(),
            callback,
            once,
        };
        let id = entry.id;

        let mut state = self.write_state()?;
        state.handlers.entry(name.to_string()).or_default().push(entry);

        debug!(event = %name, handler_id = %id, once, "Bound handler");
        Ok(id)
    }

    fn insert(&self, name: &str, callback: Handler, once: bool) -> Result<HandlerId> {
        Self::validate_name(name)?;

        let entry = HandlerEntry {
            id: HandlerId::new(),
            callback,
            once,
        };
        let id = entry.id;

        let mut state = self.write_state()?;
        // Prepending into an absent sequence degenerates to an append.
        state
            .handlers
            .entry(name.to_string())
            .or_default()
            .insert(0, entry);

        debug!(event = %name, handler_id = %id, once, "Inserted handler at front");
        Ok(id)
    }

    fn rebind(&self, name: &str, callback: Handler, once: bool) -> Result<HandlerId> {
        Self::validate_name(name)?;

        let entry = HandlerEntry {
            id: HandlerId::new(),
            callback,
            once,
        };
        let id = entry.id;

        let mut state = self.write_state()?;
        state.handlers.insert(name.to_string(), vec![entry]);

        debug!(event = %name, handler_id = %id, once, "Rebound handler, replacing all");
        Ok(id)
    }

    fn unbind(&self, name: &str) -> Result<()> {
        let mut state = self.write_state()?;
        if state.handlers.remove(name).is_some() {
            debug!(event = %name, "Unbound event");
        }
        Ok(())
    }

    fn unbind_all(&self) -> Result<()> {
        let mut state = self.write_state()?;
        let count = state.handlers.len();
        state.handlers.clear();

        debug!(event_count = count, "Unbound all events");
        Ok(())
    }

    fn unbind_handler(&self, name: &str, id: HandlerId) -> Result<bool> {
        let mut state = self.write_state()?;
        let Some(sequence) = state.handlers.get_mut(name) else {
            return Ok(false);
        };

        // The key stays present even when the sequence becomes empty;
        // boundedness is keyed on presence, not non-emptiness.
        let before = sequence.len();
        sequence.retain(|entry| entry.id != id);
        let removed = sequence.len() != before;

        if removed {
            debug!(event = %name, handler_id = %id, "Removed handler");
        }
        Ok(removed)
    }

    fn bound(&self, name: &str) -> Result<bool> {
        let state = self.read_state()?;
        Ok(state.handlers.contains_key(name))
    }

    fn names(&self) -> Result<Vec<String>> {
        let state = self.read_state()?;
        Ok(state.handlers.keys().cloned().collect())
    }

    fn handler_count(&self, name: &str) -> Result<usize> {
        let state = self.read_state()?;
        Ok(state.handlers.get(name).map_or(0, Vec::len))
    }

    fn begin_fire(&self, name: &str) -> Result<Option<Vec<HandlerEntry>>> {
        let mut state = self.write_state()?;
        let Some(sequence) = state.handlers.get(name) else {
            return Ok(None);
        };

        // Marked under the same lock as the snapshot, so a handler that
        // queries `fired` for its own event mid-pass sees true.
        let snapshot = sequence.clone();
        state.fired.insert(name.to_string());
        Ok(Some(snapshot))
    }

    fn fired(&self, name: &str) -> Result<bool> {
        let state = self.read_state()?;
        Ok(state.fired.contains(name))
    }

    fn reset(&self, name: &str) -> Result<()> {
        let mut state = self.write_state()?;
        if state.fired.remove(name) {
            debug!(event = %name, "Reset fired flag");
        }
        Ok(())
    }

    fn reset_all(&self) -> Result<()> {
        let mut state = self.write_state()?;
        state.fired.clear();
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let mut state = self.write_state()?;
        state.handlers.clear();
        state.fired.clear();

        debug!("Cleared registry");
        Ok(())
    }
}
