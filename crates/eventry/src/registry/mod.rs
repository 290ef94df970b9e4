//! Handler registry for storing and managing event bindings
//!
//! The registry is the shared mutable state of the system: per event name,
//! an ordered sequence of handler entries plus a "fired at least once"
//! flag. Registration entry points append, prepend, or replace entries;
//! the dispatcher consumes snapshots of the sequences when firing.
//!
//! # Examples
//!
//! ```ignore
//! use eventry::registry::{HandlerRegistry, InMemoryHandlerRegistry};
//! use eventry::types::handler;
//! use serde_json::json;
//!
//! let registry = InMemoryHandlerRegistry::new();
//!
//! // Bind a handler
//! let id = registry.bind("file_saved", handler(|_| json!("ok")), false)?;
//! assert!(registry.bound("file_saved")?);
//!
//! // Remove just that handler; the event name stays bound
//! registry.unbind_handler("file_saved", id)?;
//! assert!(registry.bound("file_saved")?);
//! assert_eq!(registry.handler_count("file_saved")?, 0);
//!
//! // Remove the whole binding
//! registry.unbind("file_saved")?;
//! assert!(!registry.bound("file_saved")?);
//! # Ok::<(), eventry::EventryError>(())
//! ```

pub mod storage;

pub use storage::InMemoryHandlerRegistry;

use crate::{
    error::Result,
    types::{Handler, HandlerEntry, HandlerId},
};

/// Trait for managing event handler bindings
///
/// Defines the storage interface the dispatcher fires against. An event
/// name is *bound* when its key is present in the registry, regardless of
/// whether its handler sequence is currently empty; the distinction between
/// an absent key and an empty sequence is observable and must be preserved
/// by implementations.
///
/// # Thread Safety
///
/// All implementations must be thread-safe (`Send + Sync`) to support
/// concurrent access.
pub trait HandlerRegistry: Send + Sync {
    /// Append a handler to the end of an event's sequence
    ///
    /// Creates the sequence if the name was unbound. Invocation order
    /// follows registration order.
    ///
    /// # Arguments
    ///
    /// * `name` - Event name to bind against
    /// * `callback` - The handler to invoke when the event fires
    /// * `once` - Whether the entry is removed after its first invocation
    ///
    /// # Returns
    ///
    /// The unique id of the new entry
    ///
    /// # Errors
    ///
    /// Returns `InvalidName` if `name` is empty
    fn bind(&self, name: &str, callback: Handler, once: bool) -> Result<HandlerId>;

    /// Prepend a handler to the front of an event's sequence
    ///
    /// If the name is unbound this behaves exactly like [`bind`]: prepending
    /// into an absent sequence degenerates to creating a single-entry one.
    ///
    /// # Errors
    ///
    /// Returns `InvalidName` if `name` is empty
    ///
    /// [`bind`]: HandlerRegistry::bind
    fn insert(&self, name: &str, callback: Handler, once: bool) -> Result<HandlerId>;

    /// Replace all handlers for an event with a single new entry
    ///
    /// Equivalent to `unbind(name)` followed by `bind(name, ...)`, performed
    /// under one lock acquisition.
    ///
    /// # Errors
    ///
    /// Returns `InvalidName` if `name` is empty
    fn rebind(&self, name: &str, callback: Handler, once: bool) -> Result<HandlerId>;

    /// Remove an event name and its whole handler sequence
    ///
    /// Removing an unknown name is a no-op, not an error. The fired flag
    /// for the name is left untouched; only [`reset`] clears it.
    ///
    /// [`reset`]: HandlerRegistry::reset
    fn unbind(&self, name: &str) -> Result<()>;

    /// Remove every event name and handler sequence
    fn unbind_all(&self) -> Result<()>;

    /// Remove a single handler entry from an event's sequence
    ///
    /// Returns whether an entry was removed. The event key stays present
    /// even when the removal empties the sequence.
    fn unbind_handler(&self, name: &str, id: HandlerId) -> Result<bool>;

    /// Whether an event name is bound
    ///
    /// True iff the name's key is present, even when its sequence is empty
    /// (e.g. after all `once` handlers fired and were removed).
    fn bound(&self, name: &str) -> Result<bool>;

    /// All currently bound event names, in no particular order
    fn names(&self) -> Result<Vec<String>>;

    /// Number of handlers currently in an event's sequence
    ///
    /// Zero for unbound names and bound-but-empty names alike; use
    /// [`bound`] to tell them apart.
    ///
    /// [`bound`]: HandlerRegistry::bound
    fn handler_count(&self, name: &str) -> Result<usize>;

    /// Start a fire pass: mark the name fired and snapshot its sequence
    ///
    /// Returns `None` when the name is unbound; in that case nothing is
    /// marked. Otherwise the fired flag is set *before* the snapshot is
    /// returned, so a handler that queries [`fired`] for its own event
    /// during the pass sees `true`. Marking and snapshotting happen under
    /// a single lock acquisition.
    ///
    /// [`fired`]: HandlerRegistry::fired
    fn begin_fire(&self, name: &str) -> Result<Option<Vec<HandlerEntry>>>;

    /// Whether an event has fired at least once since the last reset
    fn fired(&self, name: &str) -> Result<bool>;

    /// Clear the fired flag for one event name
    ///
    /// Clearing an unknown name is a no-op.
    fn reset(&self, name: &str) -> Result<()>;

    /// Clear the fired flags for every event name
    fn reset_all(&self) -> Result<()>;

    /// Remove all bindings and all fired flags in one lock acquisition
    ///
    /// Leaves the registry indistinguishable from a freshly constructed
    /// one; intended for test isolation of shared instances.
    fn clear(&self) -> Result<()>;
}
