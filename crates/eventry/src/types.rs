//! Core data types for the event registry
//!
//! This module defines the handler representation, handler identity, fire
//! modes, and the emptiness predicate that drives stop-on-result firing.
//!
//! # Examples
//!
//! Wrapping a closure as a [`Handler`]:
//!
//! ```ignore
//! use eventry::types::{handler, Handler};
//! use serde_json::{json, Value};
//!
//! let h: Handler = handler(|args: &[Value]| json!(args.len()));
//! assert_eq!(h(&[json!(1), json!(2)]), json!(2));
//! ```

use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use uuid::Uuid;

/// A registered callback
///
/// Handlers take a positional list of [`Value`] arguments and return a
/// single [`Value`] result, the crate's rendering of a dynamically-typed
/// callback. Handlers must be `Send + Sync` so the registry can be shared
/// across threads; they are held behind an `Arc` so a fire pass can
/// snapshot the sequence cheaply and invoke callbacks with no lock held.
pub type Handler = Arc<dyn Fn(&[Value]) -> Value + Send + Sync>;

/// Wrap a closure as a [`Handler`]
pub fn handler<F>(f: F) -> Handler
where
    F: Fn(&[Value]) -> Value + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Unique identity of a registered handler entry
///
/// Assigned at registration time and returned by all registration entry
/// points. The id supports targeted removal of a single handler via
/// `unbind_handler` without disturbing the rest of the sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerId(Uuid);

impl HandlerId {
    pub(crate) fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for HandlerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// One entry in an event's handler sequence
///
/// Couples a callback with its removal policy. Entries with `once` set are
/// removed from the sequence immediately after their invocation during a
/// fire pass.
#[derive(Clone)]
pub struct HandlerEntry {
    /// Unique identity of this entry
    pub id: HandlerId,

    /// The callback to invoke
    pub callback: Handler,

    /// Whether the entry is removed after its first invocation
    pub once: bool,
}

impl fmt::Debug for HandlerEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerEntry")
            .field("id", &self.id)
            .field("once", &self.once)
            .finish_non_exhaustive()
    }
}

/// How a fire pass walks the handler sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FireMode {
    /// Invoke every handler in the sequence
    All,

    /// Halt as soon as a handler returns a non-empty result
    ///
    /// The halting handler's result is included in the collected results.
    /// Handlers after the halting one are neither invoked nor removed,
    /// even when registered as `once`. Emptiness is defined by
    /// [`is_empty_value`].
    UntilNonEmpty,
}

/// Emptiness predicate for [`FireMode::UntilNonEmpty`]
///
/// A value is empty when it is `null`, `false`, numeric zero (integer or
/// float), the empty string, the empty array, or the empty object.
/// Everything else is non-empty, including `true` and negative numbers.
/// This mirrors the general "empty" test of
/// dynamically-typed event systems and is the documented stop condition
/// for `until`-style firing.
pub fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(fields) => fields.is_empty(),
    }
}
