//! Event dispatcher for firing bound handlers
//!
//! The dispatcher walks an event's handler sequence in order, collecting
//! each handler's return value and honoring `once` removal and the
//! stop-on-first-non-empty-result mode.
//!
//! # Examples
//!
//! ```ignore
//! use eventry::dispatcher::{DefaultEventDispatcher, EventDispatcher};
//!
//! let dispatcher = DefaultEventDispatcher::new(registry);
//! match dispatcher.fire("file_saved", &[])? {
//!     Some(results) => println!("{} handlers ran", results.len()),
//!     None => println!("event was unbound"),
//! }
//! ```

pub mod fire;

pub use fire::DefaultEventDispatcher;

use serde_json::Value;

use crate::error::Result;
use crate::types::FireMode;

/// Trait for firing events against a handler registry
///
/// The dispatcher is responsible for:
/// 1. Distinguishing unbound names (absent result) from bound ones
/// 2. Marking the fired flag before any handler runs
/// 3. Invoking the handler sequence in order with the given arguments
/// 4. Removing `once` entries immediately after their invocation
/// 5. Halting early in [`FireMode::UntilNonEmpty`]
pub trait EventDispatcher: Send + Sync {
    /// Fire an event, walking the sequence according to `mode`
    ///
    /// Returns `Ok(None)` (the absent marker) when the name is unbound;
    /// in that case no handler runs and no fired flag is set. For a bound
    /// name, returns `Ok(Some(results))` with every invoked handler's
    /// return value in call order, empty values included. A bound name
    /// whose sequence is empty yields `Ok(Some(vec![]))`, which is distinct
    /// from the absent marker.
    fn fire_with(&self, name: &str, args: &[Value], mode: FireMode) -> Result<Option<Vec<Value>>>;

    /// Fire an event, invoking every handler in the sequence
    fn fire(&self, name: &str, args: &[Value]) -> Result<Option<Vec<Value>>> {
        self.fire_with(name, args, FireMode::All)
    }

    /// Fire an event and return the first collected result
    ///
    /// Runs the *whole* sequence (every handler is invoked and `once`
    /// entries are consumed) and returns the first result, or `Value::Null`
    /// when the name was unbound or no handler ran. Unbound and
    /// bound-but-empty are indistinguishable here.
    fn first(&self, name: &str, args: &[Value]) -> Result<Value> {
        Ok(self
            .fire_with(name, args, FireMode::All)?
            .and_then(|results| results.into_iter().next())
            .unwrap_or(Value::Null))
    }

    /// Fire an event until a handler returns a non-empty result
    ///
    /// Returns the result that satisfied the stop condition, or, when no
    /// handler's result was non-empty, the last handler's result after
    /// exhausting the sequence. Returns `Value::Null` when the name was
    /// unbound or no handler ran.
    fn until(&self, name: &str, args: &[Value]) -> Result<Value> {
        Ok(self
            .fire_with(name, args, FireMode::UntilNonEmpty)?
            .and_then(|results| results.into_iter().next_back())
            .unwrap_or(Value::Null))
    }
}
