//! Fire-pass implementation

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info};

use crate::{
    error::Result,
    registry::HandlerRegistry,
    types::{is_empty_value, FireMode},
};

/// Default implementation of [`EventDispatcher`]
///
/// Fires events against an [`HandlerRegistry`] using snapshot-then-iterate:
/// the handler sequence is copied out of the registry under its lock, and
/// callbacks are invoked with no lock held. Handlers may therefore
/// re-entrantly fire, bind, or unbind on the same registry without
/// deadlocking; mutations made mid-pass affect the next fire, not the
/// snapshot being walked.
///
/// [`EventDispatcher`]: super::EventDispatcher
#[derive(Clone)]
pub struct DefaultEventDispatcher {
    registry: Arc<dyn HandlerRegistry>,
}

impl DefaultEventDispatcher {
    /// Create a new dispatcher over a registry
    pub fn new(registry: Arc<dyn HandlerRegistry>) -> Self {
        Self { registry }
    }
}

impl super::EventDispatcher for DefaultEventDispatcher {
    fn fire_with(&self, name: &str, args: &[Value], mode: FireMode) -> Result<Option<Vec<Value>>> {
        let Some(snapshot) = self.registry.begin_fire(name)? else {
            debug!(event = %name, "Fired unbound event");
            return Ok(None);
        };

        info!(
            event = %name,
            handler_count = snapshot.len(),
            mode = ?mode,
            "Firing event"
        );

        let mut results = Vec::with_capacity(snapshot.len());

        for entry in snapshot {
            debug!(event = %name, handler_id = %entry.id, "Invoking handler");

            // A panicking handler propagates to the caller; the entry is
            // only removed after its callback returns, so a `once` handler
            // that re-entrantly fires its own event is invoked again by
            // the inner pass.
            let result = (entry.callback)(args);

            if entry.once {
                self.registry.unbind_handler(name, entry.id)?;
            }

            let stop = mode == FireMode::UntilNonEmpty && !is_empty_value(&result);
            results.push(result);

            if stop {
                debug!(
                    event = %name,
                    handler_id = %entry.id,
                    "Non-empty result, halting fire pass"
                );
                break;
            }
        }

        Ok(Some(results))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use serde_json::json;

    use super::*;
    use crate::{
        dispatcher::EventDispatcher,
        registry::InMemoryHandlerRegistry,
        types::{handler, Handler},
    };

    fn constant(value: Value) -> Handler {
        handler(move |_args: &[Value]| value.clone())
    }

    fn dispatcher_over(registry: &InMemoryHandlerRegistry) -> DefaultEventDispatcher {
        DefaultEventDispatcher::new(Arc::new(registry.clone()))
    }

    #[test]
    fn test_fire_unbound_returns_absent_marker() {
        let registry = InMemoryHandlerRegistry::new();
        let dispatcher = dispatcher_over(&registry);

        let outcome = dispatcher.fire("file_saved", &[]).unwrap();

        assert!(outcome.is_none());
        assert!(!registry.fired("file_saved").unwrap());
    }

    #[test]
    fn test_fire_collects_results_in_registration_order() {
        let registry = InMemoryHandlerRegistry::new();
        registry.bind("file_saved", constant(json!(1)), false).unwrap();
        registry.bind("file_saved", constant(json!(2)), false).unwrap();
        registry.bind("file_saved", constant(json!(3)), false).unwrap();

        let dispatcher = dispatcher_over(&registry);
        let results = dispatcher.fire("file_saved", &[]).unwrap().unwrap();

        assert_eq!(results, vec![json!(1), json!(2), json!(3)]);
    }

    #[test]
    fn test_fire_passes_args_positionally() {
        let registry = InMemoryHandlerRegistry::new();
        registry
            .bind(
                "file_saved",
                handler(|args: &[Value]| args.first().cloned().unwrap_or(Value::Null)),
                false,
            )
            .unwrap();

        let dispatcher = dispatcher_over(&registry);
        let results = dispatcher
            .fire("file_saved", &[json!("/tmp/a.rs"), json!(42)])
            .unwrap()
            .unwrap();

        assert_eq!(results, vec![json!("/tmp/a.rs")]);
    }

    #[test]
    fn test_fire_includes_empty_results() {
        let registry = InMemoryHandlerRegistry::new();
        registry.bind("file_saved", constant(Value::Null), false).unwrap();
        registry.bind("file_saved", constant(json!("")), false).unwrap();

        let dispatcher = dispatcher_over(&registry);
        let results = dispatcher.fire("file_saved", &[]).unwrap().unwrap();

        assert_eq!(results, vec![Value::Null, json!("")]);
    }

    #[test]
    fn test_once_handler_consumed_after_one_pass() {
        let registry = InMemoryHandlerRegistry::new();
        registry.bind("file_saved", constant(json!("keep")), false).unwrap();
        registry.bind("file_saved", constant(json!("drop")), true).unwrap();

        let dispatcher = dispatcher_over(&registry);

        let pass1 = dispatcher.fire("file_saved", &[]).unwrap().unwrap();
        assert_eq!(pass1, vec![json!("keep"), json!("drop")]);

        let pass2 = dispatcher.fire("file_saved", &[]).unwrap().unwrap();
        assert_eq!(pass2, vec![json!("keep")]);
    }

    #[test]
    fn test_all_once_handlers_run_even_when_earlier_ones_are_removed() {
        let registry = InMemoryHandlerRegistry::new();
        registry.bind("file_saved", constant(json!(1)), true).unwrap();
        registry.bind("file_saved", constant(json!(2)), true).unwrap();
        registry.bind("file_saved", constant(json!(3)), true).unwrap();

        let dispatcher = dispatcher_over(&registry);
        let results = dispatcher.fire("file_saved", &[]).unwrap().unwrap();

        // Snapshot iteration: removals mid-pass must not skip entries.
        assert_eq!(results, vec![json!(1), json!(2), json!(3)]);
        assert_eq!(registry.handler_count("file_saved").unwrap(), 0);
        assert!(registry.bound("file_saved").unwrap());
    }

    #[test]
    fn test_fire_bound_but_empty_returns_empty_results() {
        let registry = InMemoryHandlerRegistry::new();
        registry.bind("file_saved", constant(json!("gone")), true).unwrap();

        let dispatcher = dispatcher_over(&registry);
        dispatcher.fire("file_saved", &[]).unwrap();

        let outcome = dispatcher.fire("file_saved", &[]).unwrap();
        assert_eq!(outcome, Some(vec![]));
    }

    #[test]
    fn test_until_mode_halts_on_first_non_empty_result() {
        let registry = InMemoryHandlerRegistry::new();
        let invoked = Arc::new(Mutex::new(Vec::new()));

        for (label, result) in [("h1", json!("")), ("h2", json!("A")), ("h3", json!("B"))] {
            let invoked = invoked.clone();
            registry
                .bind(
                    "file_saved",
                    handler(move |_args: &[Value]| {
                        invoked.lock().unwrap().push(label);
                        result.clone()
                    }),
                    false,
                )
                .unwrap();
        }

        let dispatcher = dispatcher_over(&registry);
        let results = dispatcher
            .fire_with("file_saved", &[], FireMode::UntilNonEmpty)
            .unwrap()
            .unwrap();

        assert_eq!(results, vec![json!(""), json!("A")]);
        assert_eq!(*invoked.lock().unwrap(), vec!["h1", "h2"]);
    }

    #[test]
    fn test_until_mode_leaves_later_once_handlers_in_place() {
        let registry = InMemoryHandlerRegistry::new();
        registry.bind("file_saved", constant(json!("hit")), true).unwrap();
        registry.bind("file_saved", constant(json!("spared")), true).unwrap();

        let dispatcher = dispatcher_over(&registry);
        let results = dispatcher
            .fire_with("file_saved", &[], FireMode::UntilNonEmpty)
            .unwrap()
            .unwrap();

        // The halting handler was invoked, so its once entry is consumed;
        // the one after it was never invoked and must survive.
        assert_eq!(results, vec![json!("hit")]);
        assert_eq!(registry.handler_count("file_saved").unwrap(), 1);
    }

    #[test]
    fn test_fired_flag_set_before_handlers_run() {
        let registry = InMemoryHandlerRegistry::new();
        let observer = registry.clone();
        registry
            .bind(
                "file_saved",
                handler(move |_args: &[Value]| json!(observer.fired("file_saved").unwrap())),
                false,
            )
            .unwrap();

        let dispatcher = dispatcher_over(&registry);
        let results = dispatcher.fire("file_saved", &[]).unwrap().unwrap();

        assert_eq!(results, vec![json!(true)]);
    }

    #[test]
    fn test_reentrant_bind_does_not_affect_current_pass() {
        let registry = InMemoryHandlerRegistry::new();
        let inner = registry.clone();
        registry
            .bind(
                "file_saved",
                handler(move |_args: &[Value]| {
                    inner
                        .bind("file_saved", constant(json!("late")), false)
                        .unwrap();
                    json!("early")
                }),
                false,
            )
            .unwrap();

        let dispatcher = dispatcher_over(&registry);

        let pass1 = dispatcher.fire("file_saved", &[]).unwrap().unwrap();
        assert_eq!(pass1, vec![json!("early")]);

        // The mid-pass binding is visible from the next fire on.
        let pass2 = dispatcher.fire("file_saved", &[]).unwrap().unwrap();
        assert_eq!(pass2, vec![json!("early"), json!("late")]);
    }

    #[test]
    fn test_first_returns_first_result_after_running_all_handlers() {
        let registry = InMemoryHandlerRegistry::new();
        registry.bind("file_saved", constant(json!("")), false).unwrap();
        registry.bind("file_saved", constant(json!("A")), true).unwrap();

        let dispatcher = dispatcher_over(&registry);
        let result = dispatcher.first("file_saved", &[]).unwrap();

        // First result wins even when empty, and the whole sequence ran:
        // the once handler is consumed.
        assert_eq!(result, json!(""));
        assert_eq!(registry.handler_count("file_saved").unwrap(), 1);
    }

    #[test]
    fn test_first_unifies_unbound_and_empty_to_null() {
        let registry = InMemoryHandlerRegistry::new();
        let dispatcher = dispatcher_over(&registry);

        assert_eq!(dispatcher.first("file_saved", &[]).unwrap(), Value::Null);

        let id = registry.bind("file_saved", constant(json!("x")), false).unwrap();
        registry.unbind_handler("file_saved", id).unwrap();
        assert_eq!(dispatcher.first("file_saved", &[]).unwrap(), Value::Null);
    }

    #[test]
    fn test_until_returns_halting_result() {
        let registry = InMemoryHandlerRegistry::new();
        registry.bind("file_saved", constant(json!("")), false).unwrap();
        registry.bind("file_saved", constant(json!("A")), false).unwrap();
        registry.bind("file_saved", constant(json!("B")), false).unwrap();

        let dispatcher = dispatcher_over(&registry);
        assert_eq!(dispatcher.until("file_saved", &[]).unwrap(), json!("A"));
    }

    #[test]
    fn test_until_returns_last_result_when_nothing_non_empty() {
        let registry = InMemoryHandlerRegistry::new();
        registry.bind("file_saved", constant(json!("")), false).unwrap();
        registry.bind("file_saved", constant(json!(0)), false).unwrap();

        let dispatcher = dispatcher_over(&registry);
        assert_eq!(dispatcher.until("file_saved", &[]).unwrap(), json!(0));
    }

    #[test]
    fn test_until_unbound_returns_null() {
        let registry = InMemoryHandlerRegistry::new();
        let dispatcher = dispatcher_over(&registry);

        assert_eq!(dispatcher.until("file_saved", &[]).unwrap(), Value::Null);
    }
}
