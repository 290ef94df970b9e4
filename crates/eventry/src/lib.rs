//! Eventry: in-process named-event dispatch registry
//!
//! Callers register callback handlers against string-named events, then
//! fire those events to invoke all registered handlers in order, optionally
//! collecting their return values. The crate exists to decouple producers
//! of a signal from its consumers and to let code expose hooks that other
//! code can extend without modifying it.
//!
//! # Architecture
//!
//! The system consists of three components:
//!
//! 1. **Handler Registry** (`registry`): stores, per event name, an ordered
//!    handler sequence and a "fired at least once" flag
//! 2. **Event Dispatcher** (`dispatcher`): walks a sequence snapshot,
//!    collecting results and consuming `once` entries
//! 3. **Event Hub** (`hub`): one-object facade over both, plus the
//!    process-wide global instance
//!
//! # Quick Start
//!
//! ```ignore
//! use eventry::EventHub;
//! use serde_json::{json, Value};
//!
//! let hub = EventHub::new();
//!
//! // Expose a hook point
//! hub.bind("file_saved", |args: &[Value]| {
//!     println!("saved: {}", args[0]);
//!     json!(true)
//! })?;
//!
//! // Run it once, then never again
//! hub.bind_once("file_saved", |_args: &[Value]| json!("first save only"))?;
//!
//! // Fire: every handler runs in registration order
//! let results = hub.fire("file_saved", &[json!("main.rs")])?;
//! assert_eq!(results.map(|r| r.len()), Some(2));
//!
//! // Queries
//! assert!(hub.bound("file_saved")?);
//! assert!(hub.fired("file_saved")?);
//! # Ok::<(), eventry::EventryError>(())
//! ```
//!
//! # Firing semantics
//!
//! - Firing an *unbound* name returns `Ok(None)`, the absent marker: no
//!   handlers ran, nothing to report. Firing a *bound* name whose sequence
//!   is empty returns `Ok(Some(vec![]))`; the two cases are distinct, and
//!   `bound` stays true for a name whose `once` handlers have all been
//!   consumed.
//! - `first` runs the whole sequence and returns the first result.
//! - `until` halts at the first non-empty result and returns it; see
//!   [`is_empty_value`] for the documented emptiness rules (`null`,
//!   `false`, numeric zero, `""`, `[]`, and `{}` are empty).
//! - A handler that panics propagates to the caller of `fire` and aborts
//!   the remaining handlers of that pass; the registry does not catch it.
//!
//! # Thread Safety
//!
//! All components are thread-safe (`Send + Sync`). One lock guards the
//! registry state; it is never held while a handler runs, so handlers may
//! re-entrantly fire, bind, and unbind events on the same hub.

pub mod dispatcher;
pub mod error;
pub mod hub;
pub mod registry;
pub mod types;

// Re-export public types
pub use dispatcher::{DefaultEventDispatcher, EventDispatcher};
pub use error::{EventryError, Result};
pub use hub::EventHub;
pub use registry::{HandlerRegistry, InMemoryHandlerRegistry};
pub use types::{handler, is_empty_value, FireMode, Handler, HandlerEntry, HandlerId};
