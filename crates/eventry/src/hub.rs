//! Event hub facade
//!
//! [`EventHub`] wires an [`InMemoryHandlerRegistry`] and a
//! [`DefaultEventDispatcher`] behind a single object exposing the whole
//! operation surface: registration, firing, queries, and removal. Use
//! [`EventHub::new`] for an owned instance (the shape tests and
//! dependency injection should use), or [`EventHub::global`] for
//! the process-wide instance when a crate wants to expose extension points
//! without threading a hub through its API.

use std::sync::Arc;

use once_cell::sync::Lazy;
use serde_json::Value;

use crate::{
    dispatcher::{DefaultEventDispatcher, EventDispatcher},
    error::Result,
    registry::{HandlerRegistry, InMemoryHandlerRegistry},
    types::{FireMode, Handler, HandlerId},
};

static GLOBAL_HUB: Lazy<EventHub> = Lazy::new(EventHub::new);

/// One-object API over a handler registry and its dispatcher
///
/// Clones share the same underlying registry, so a hub can be handed to
/// producers and consumers of events alike. All methods are safe to call
/// from handler callbacks running inside a fire pass.
///
/// # Examples
///
/// ```ignore
/// use eventry::EventHub;
/// use serde_json::{json, Value};
///
/// let hub = EventHub::new();
///
/// hub.bind("file_saved", |args: &[Value]| {
///     json!(format!("formatted {}", args[0]))
/// })?;
///
/// let results = hub.fire("file_saved", &[json!("main.rs")])?;
/// assert_eq!(results, Some(vec![json!("formatted \"main.rs\"")]));
/// # Ok::<(), eventry::EventryError>(())
/// ```
#[derive(Clone)]
pub struct EventHub {
    registry: Arc<dyn HandlerRegistry>,
    dispatcher: DefaultEventDispatcher,
}

impl EventHub {
    /// Create a hub with a fresh in-memory registry
    pub fn new() -> Self {
        let registry: Arc<dyn HandlerRegistry> = Arc::new(InMemoryHandlerRegistry::new());
        let dispatcher = DefaultEventDispatcher::new(registry.clone());
        Self {
            registry,
            dispatcher,
        }
    }

    /// The process-wide hub
    ///
    /// Lazily initialized to an empty registry on first access; lives for
    /// the rest of the process. Tests sharing this instance should isolate
    /// themselves with [`clear`] and run serially.
    ///
    /// [`clear`]: EventHub::clear
    pub fn global() -> &'static EventHub {
        &GLOBAL_HUB
    }

    /// Append a handler to the end of an event's sequence
    ///
    /// Creates the sequence if the name was unbound; handlers fire in
    /// registration order. Returns the new entry's id, usable with
    /// [`unbind_handler`].
    ///
    /// # Errors
    ///
    /// Returns `InvalidName` if `name` is empty
    ///
    /// [`unbind_handler`]: EventHub::unbind_handler
    pub fn bind<F>(&self, name: &str, callback: F) -> Result<HandlerId>
    where
        F: Fn(&[Value]) -> Value + Send + Sync + 'static,
    {
        self.registry.bind(name, Arc::new(callback), false)
    }

    /// Synonym for [`bind`]
    ///
    /// [`bind`]: EventHub::bind
    pub fn append<F>(&self, name: &str, callback: F) -> Result<HandlerId>
    where
        F: Fn(&[Value]) -> Value + Send + Sync + 'static,
    {
        self.bind(name, callback)
    }

    /// Append a handler that is removed after its first invocation
    pub fn bind_once<F>(&self, name: &str, callback: F) -> Result<HandlerId>
    where
        F: Fn(&[Value]) -> Value + Send + Sync + 'static,
    {
        self.registry.bind(name, Arc::new(callback), true)
    }

    /// Prepend a handler to the front of an event's sequence
    ///
    /// Degenerates to [`bind`] when the name is unbound.
    ///
    /// [`bind`]: EventHub::bind
    pub fn insert<F>(&self, name: &str, callback: F) -> Result<HandlerId>
    where
        F: Fn(&[Value]) -> Value + Send + Sync + 'static,
    {
        self.registry.insert(name, Arc::new(callback), false)
    }

    /// Prepend a handler that is removed after its first invocation
    pub fn insert_once<F>(&self, name: &str, callback: F) -> Result<HandlerId>
    where
        F: Fn(&[Value]) -> Value + Send + Sync + 'static,
    {
        self.registry.insert(name, Arc::new(callback), true)
    }

    /// Replace all handlers for an event with a single new one
    pub fn rebind<F>(&self, name: &str, callback: F) -> Result<HandlerId>
    where
        F: Fn(&[Value]) -> Value + Send + Sync + 'static,
    {
        self.registry.rebind(name, Arc::new(callback), false)
    }

    /// Replace all handlers for an event with a single once handler
    pub fn rebind_once<F>(&self, name: &str, callback: F) -> Result<HandlerId>
    where
        F: Fn(&[Value]) -> Value + Send + Sync + 'static,
    {
        self.registry.rebind(name, Arc::new(callback), true)
    }

    /// Register an already-wrapped [`Handler`]
    ///
    /// Useful when the same callback is shared between several bindings.
    pub fn bind_handler(&self, name: &str, callback: Handler, once: bool) -> Result<HandlerId> {
        self.registry.bind(name, callback, once)
    }

    /// Fire an event, invoking every handler in the sequence
    ///
    /// Returns `Ok(None)` when the name is unbound, otherwise the results
    /// of every invoked handler in call order (possibly an empty `Vec` for
    /// a bound name whose sequence is empty).
    pub fn fire(&self, name: &str, args: &[Value]) -> Result<Option<Vec<Value>>> {
        self.dispatcher.fire(name, args)
    }

    /// Fire an event, walking the sequence according to `mode`
    pub fn fire_with(
        &self,
        name: &str,
        args: &[Value],
        mode: FireMode,
    ) -> Result<Option<Vec<Value>>> {
        self.dispatcher.fire_with(name, args, mode)
    }

    /// Fire an event and return the first collected result
    ///
    /// Runs the whole sequence; `Value::Null` when nothing ran.
    pub fn first(&self, name: &str, args: &[Value]) -> Result<Value> {
        self.dispatcher.first(name, args)
    }

    /// Fire an event until a handler returns a non-empty result
    ///
    /// Returns that result, the last result when nothing was non-empty, or
    /// `Value::Null` when nothing ran. Emptiness is defined by
    /// [`is_empty_value`].
    ///
    /// [`is_empty_value`]: crate::types::is_empty_value
    pub fn until(&self, name: &str, args: &[Value]) -> Result<Value> {
        self.dispatcher.until(name, args)
    }

    /// Whether an event name is bound
    ///
    /// Stays true after all `once` handlers of a name fired and were
    /// removed; only [`unbind`] and [`unbind_all`] make a name unbound.
    ///
    /// [`unbind`]: EventHub::unbind
    /// [`unbind_all`]: EventHub::unbind_all
    pub fn bound(&self, name: &str) -> Result<bool> {
        self.registry.bound(name)
    }

    /// Whether an event fired at least once since the last reset
    pub fn fired(&self, name: &str) -> Result<bool> {
        self.registry.fired(name)
    }

    /// Remove an event name and its handler sequence
    pub fn unbind(&self, name: &str) -> Result<()> {
        self.registry.unbind(name)
    }

    /// Remove every event name and handler sequence
    pub fn unbind_all(&self) -> Result<()> {
        self.registry.unbind_all()
    }

    /// Remove one handler entry; returns whether an entry was removed
    pub fn unbind_handler(&self, name: &str, id: HandlerId) -> Result<bool> {
        self.registry.unbind_handler(name, id)
    }

    /// Clear the fired flag for one event name
    pub fn reset(&self, name: &str) -> Result<()> {
        self.registry.reset(name)
    }

    /// Clear the fired flags for every event name
    pub fn reset_all(&self) -> Result<()> {
        self.registry.reset_all()
    }

    /// All currently bound event names, in no particular order
    pub fn names(&self) -> Result<Vec<String>> {
        self.registry.names()
    }

    /// Number of handlers currently bound to an event
    pub fn handler_count(&self, name: &str) -> Result<usize> {
        self.registry.handler_count(name)
    }

    /// Remove all bindings and fired flags
    pub fn clear(&self) -> Result<()> {
        self.registry.clear()
    }
}

impl Default for EventHub {
    fn default() -> Self {
        Self::new()
    }
}
