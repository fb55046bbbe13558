//! Named-event emitter for test synchronization.
//!
//! Test suites synchronize on page activity by counting named events
//! (requests, frame attachments, console messages). [`EventEmitter`] is the
//! subscription surface; [`wait_for_events`] blocks until the N-th
//! occurrence of an event and hands back its payload.

use crate::result::AndamioResult;
use crate::wait::{wait_for, WaitOptions};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use uuid::Uuid;

/// Payload carried by an emitted event
pub type EventPayload = Value;

type Callback = Arc<dyn Fn(&EventPayload) + Send + Sync + 'static>;

/// Handle identifying one registered listener
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(Uuid);

struct Listener {
    id: ListenerId,
    callback: Callback,
}

/// Named-event subscription/notification hub.
///
/// Cloning is cheap and clones observe the same listener table, so an
/// emitter can be handed to the thread that produces events while the test
/// thread waits on it.
#[derive(Clone, Default)]
pub struct EventEmitter {
    inner: Arc<Mutex<HashMap<String, Vec<Listener>>>>,
}

impl std::fmt::Debug for EventEmitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventEmitter").finish_non_exhaustive()
    }
}

impl EventEmitter {
    /// Create a new emitter with no listeners
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn table(&self) -> std::sync::MutexGuard<'_, HashMap<String, Vec<Listener>>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a listener for the named event, returning its id
    pub fn on<F>(&self, name: impl Into<String>, callback: F) -> ListenerId
    where
        F: Fn(&EventPayload) + Send + Sync + 'static,
    {
        let id = ListenerId(Uuid::new_v4());
        self.table().entry(name.into()).or_default().push(Listener {
            id,
            callback: Arc::new(callback),
        });
        id
    }

    /// Remove one listener; returns whether it was registered
    pub fn off(&self, name: &str, id: ListenerId) -> bool {
        let mut table = self.table();
        let Some(listeners) = table.get_mut(name) else {
            return false;
        };
        let before = listeners.len();
        listeners.retain(|l| l.id != id);
        before != listeners.len()
    }

    /// Notify listeners of the named event, in registration order.
    ///
    /// Listeners registered or removed by a callback take effect from the
    /// next emit; the current notification uses the table as it was when
    /// the emit started.
    pub fn emit(&self, name: &str, payload: EventPayload) {
        let callbacks: Vec<Callback> = self
            .table()
            .get(name)
            .map(|listeners| listeners.iter().map(|l| Arc::clone(&l.callback)).collect())
            .unwrap_or_default();
        for callback in callbacks {
            callback(&payload);
        }
    }

    /// Number of listeners currently registered for the named event
    #[must_use]
    pub fn listener_count(&self, name: &str) -> usize {
        self.table().get(name).map_or(0, Vec::len)
    }
}

struct EventCapture {
    remaining: usize,
    payload: Option<EventPayload>,
}

/// Block until the named event has fired `count` times, returning the
/// payload of the final occurrence.
///
/// The internal listener is detached before returning, on timeout as well
/// as on success. `count == 0` resolves immediately with `Value::Null`.
///
/// # Errors
///
/// Returns [`crate::AndamioError::Timeout`] if the count is not reached
/// within the options' timeout
pub fn wait_for_events(
    emitter: &EventEmitter,
    name: &str,
    count: usize,
    options: &WaitOptions,
) -> AndamioResult<EventPayload> {
    if count == 0 {
        return Ok(Value::Null);
    }

    let capture = Arc::new(Mutex::new(EventCapture {
        remaining: count,
        payload: None,
    }));

    let observed = Arc::clone(&capture);
    let id = emitter.on(name, move |payload| {
        let mut state = observed.lock().unwrap_or_else(PoisonError::into_inner);
        if state.remaining == 0 {
            return;
        }
        state.remaining -= 1;
        if state.remaining == 0 {
            state.payload = Some(payload.clone());
        }
    });

    let result = wait_for(
        || {
            capture
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .remaining
                == 0
        },
        options,
    );
    emitter.off(name, id);
    result?;

    let payload = capture
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .payload
        .take();
    Ok(payload.unwrap_or(Value::Null))
}

/// Block until the named event fires once, returning its payload
///
/// # Errors
///
/// Returns [`crate::AndamioError::Timeout`] if the event does not fire
/// within the options' timeout
pub fn wait_for_event(
    emitter: &EventEmitter,
    name: &str,
    options: &WaitOptions,
) -> AndamioResult<EventPayload> {
    wait_for_events(emitter, name, 1, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::AndamioError;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn fast_options() -> WaitOptions {
        WaitOptions::new().with_timeout(5000).with_poll_interval(1)
    }

    mod emitter_tests {
        use super::*;

        #[test]
        fn test_on_emit_invokes_listener() {
            let emitter = EventEmitter::new();
            let hits = Arc::new(AtomicUsize::new(0));
            let observed = Arc::clone(&hits);
            emitter.on("request", move |_| {
                observed.fetch_add(1, Ordering::SeqCst);
            });

            emitter.emit("request", Value::Null);
            emitter.emit("request", Value::Null);
            assert_eq!(hits.load(Ordering::SeqCst), 2);
        }

        #[test]
        fn test_emit_unrelated_event_does_not_invoke() {
            let emitter = EventEmitter::new();
            let hits = Arc::new(AtomicUsize::new(0));
            let observed = Arc::clone(&hits);
            emitter.on("request", move |_| {
                observed.fetch_add(1, Ordering::SeqCst);
            });

            emitter.emit("response", Value::Null);
            assert_eq!(hits.load(Ordering::SeqCst), 0);
        }

        #[test]
        fn test_off_removes_listener() {
            let emitter = EventEmitter::new();
            let id = emitter.on("request", |_| {});
            assert_eq!(emitter.listener_count("request"), 1);
            assert!(emitter.off("request", id));
            assert_eq!(emitter.listener_count("request"), 0);
        }

        #[test]
        fn test_off_unknown_listener_is_false() {
            let emitter = EventEmitter::new();
            let id = emitter.on("request", |_| {});
            assert!(!emitter.off("other", id));
            assert!(emitter.off("request", id));
            assert!(!emitter.off("request", id));
        }

        #[test]
        fn test_emit_with_no_listeners_is_noop() {
            let emitter = EventEmitter::new();
            emitter.emit("request", json!({"ok": true}));
        }

        #[test]
        fn test_listeners_invoked_in_registration_order() {
            let emitter = EventEmitter::new();
            let order = Arc::new(Mutex::new(Vec::new()));

            let first = Arc::clone(&order);
            emitter.on("request", move |_| first.lock().expect("lock").push(1));
            let second = Arc::clone(&order);
            emitter.on("request", move |_| second.lock().expect("lock").push(2));

            emitter.emit("request", Value::Null);
            assert_eq!(*order.lock().expect("lock"), vec![1, 2]);
        }
    }

    mod wait_for_events_tests {
        use super::*;

        #[test]
        fn test_resolves_with_final_payload() {
            let emitter = EventEmitter::new();
            let background = emitter.clone();
            let producer = std::thread::spawn(move || {
                for seq in 1..=3 {
                    std::thread::sleep(Duration::from_millis(5));
                    background.emit("request", json!({ "seq": seq }));
                }
            });

            let payload =
                wait_for_events(&emitter, "request", 3, &fast_options()).expect("resolved");
            assert_eq!(payload["seq"], 3);
            producer.join().expect("producer");
        }

        #[test]
        fn test_does_not_resolve_early() {
            let emitter = EventEmitter::new();
            emitter.emit("request", json!(1));
            emitter.emit("request", json!(2));

            let options = WaitOptions::new().with_timeout(30).with_poll_interval(1);
            let result = wait_for_events(&emitter, "request", 3, &options);
            assert!(matches!(result, Err(AndamioError::Timeout { .. })));
        }

        #[test]
        fn test_counts_only_after_registration() {
            let emitter = EventEmitter::new();
            // Fired before the wait starts, so it must not count.
            emitter.emit("request", json!("early"));

            let background = emitter.clone();
            let producer = std::thread::spawn(move || {
                std::thread::sleep(Duration::from_millis(5));
                background.emit("request", json!("late"));
            });

            let payload =
                wait_for_events(&emitter, "request", 1, &fast_options()).expect("resolved");
            assert_eq!(payload, json!("late"));
            producer.join().expect("producer");
        }

        #[test]
        fn test_detaches_listener_on_success() {
            let emitter = EventEmitter::new();
            let background = emitter.clone();
            let producer = std::thread::spawn(move || {
                std::thread::sleep(Duration::from_millis(5));
                background.emit("request", Value::Null);
            });

            wait_for_events(&emitter, "request", 1, &fast_options()).expect("resolved");
            producer.join().expect("producer");
            assert_eq!(emitter.listener_count("request"), 0);
        }

        #[test]
        fn test_detaches_listener_on_timeout() {
            let emitter = EventEmitter::new();
            let options = WaitOptions::new().with_timeout(10).with_poll_interval(1);
            let _ = wait_for_events(&emitter, "request", 1, &options);
            assert_eq!(emitter.listener_count("request"), 0);
        }

        #[test]
        fn test_zero_count_resolves_immediately() {
            let emitter = EventEmitter::new();
            let payload =
                wait_for_events(&emitter, "request", 0, &fast_options()).expect("resolved");
            assert_eq!(payload, Value::Null);
            assert_eq!(emitter.listener_count("request"), 0);
        }
    }
}
