//! `EventBus`: synchronous, typed publish/subscribe dispatcher.
//!
//! # How delivery works (for beginners)
//!
//! Listeners are closures registered for one concrete event type.  When an
//! event is posted, every listener registered for **exactly** that type is
//! called, in registration order, on the calling thread.  `post` only returns
//! after the last listener has run: there is no queue, no priority, and no
//! way to cancel an event half way through.
//!
//! ```text
//! host hook ──post(&TickEvent)──►  EventBus
//!                                   ├─ listener #1 (TickEvent)
//!                                   └─ listener #4 (TickEvent)
//!                                  (KeypressEvent listeners are not called)
//! ```
//!
//! # Snapshot semantics
//!
//! The set of listeners for a type is copied at the start of `post`.  A
//! listener registered or unregistered while a delivery is in progress takes
//! effect from the next `post` of that type.
//!
//! # Failure isolation
//!
//! A listener that returns `Err` or panics is logged and recorded in the
//! returned [`DeliveryReport`]; the remaining listeners still run.
//!
//! # Threading
//!
//! The bus is deliberately `!Send`: the host drives a single thread and all
//! delivery happens on it, so listeners may freely capture `Rc`/`RefCell`
//! state.

use std::any::{Any, TypeId};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;

use thiserror::Error;
use tracing::{trace, warn};

use super::Event;

/// Handle returned by [`EventBus::register`], used to unregister later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

/// Why a single listener invocation did not complete.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ListenerError {
    /// The listener reported a failure.
    #[error("listener failed: {0}")]
    Failed(String),
    /// The listener panicked; the payload message is kept.
    #[error("listener panicked: {0}")]
    Panicked(String),
    /// The listener was already running further up the call stack (an event
    /// of the same type was posted from inside its own delivery).
    #[error("listener is already handling an event")]
    Busy,
}

impl ListenerError {
    pub fn failed(message: impl Into<String>) -> Self {
        ListenerError::Failed(message.into())
    }
}

/// Return type of every listener.
pub type ListenerResult = Result<(), ListenerError>;

/// One listener that did not complete during a [`EventBus::post`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListenerFailure {
    pub listener: ListenerId,
    pub error: ListenerError,
}

/// Outcome of a single [`EventBus::post`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    /// Listeners that returned `Ok(())`.
    pub delivered: usize,
    /// Listeners that failed, panicked, or were busy, in call order.
    pub failures: Vec<ListenerFailure>,
}

impl DeliveryReport {
    /// `true` when every listener called completed successfully.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    /// Number of listeners the event was offered to.
    pub fn attempted(&self) -> usize {
        self.delivered + self.failures.len()
    }
}

type ErasedListener = Rc<RefCell<dyn FnMut(&dyn Any) -> ListenerResult>>;

struct Registration {
    id: ListenerId,
    listener: ErasedListener,
}

/// Synchronous event dispatcher.
///
/// Construct one per overlay and share it with `Rc<EventBus>`; all methods
/// take `&self` so listeners can register, unregister, and post from inside a
/// delivery.
#[derive(Default)]
pub struct EventBus {
    listeners: RefCell<HashMap<TypeId, Vec<Registration>>>,
    next_id: Cell<u64>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `listener` for events of type `E`.
    ///
    /// Listeners for the same type are called in the order they were
    /// registered.
    pub fn register<E, F>(&self, mut listener: F) -> ListenerId
    where
        E: Event,
        F: FnMut(&E) -> ListenerResult + 'static,
    {
        let id = ListenerId(self.next_id.get());
        self.next_id.set(id.0 + 1);

        let erased: ErasedListener = Rc::new(RefCell::new(move |event: &dyn Any| {
            match event.downcast_ref::<E>() {
                Some(event) => listener(event),
                None => Ok(()),
            }
        }));

        self.listeners
            .borrow_mut()
            .entry(TypeId::of::<E>())
            .or_default()
            .push(Registration {
                id,
                listener: erased,
            });
        trace!("registered listener {id:?} for {}", std::any::type_name::<E>());
        id
    }

    /// Removes a listener.  Returns `false` if `id` was not registered.
    pub fn unregister(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        let mut removed = false;
        for registrations in listeners.values_mut() {
            let before = registrations.len();
            registrations.retain(|r| r.id != id);
            removed |= registrations.len() != before;
        }
        listeners.retain(|_, registrations| !registrations.is_empty());
        removed
    }

    /// Delivers `event` to every listener registered for `E`.
    ///
    /// Posting with no listeners registered is a no-op that returns an empty
    /// report.
    pub fn post<E: Event>(&self, event: &E) -> DeliveryReport {
        let snapshot: Vec<(ListenerId, ErasedListener)> = self
            .listeners
            .borrow()
            .get(&TypeId::of::<E>())
            .map(|registrations| {
                registrations
                    .iter()
                    .map(|r| (r.id, Rc::clone(&r.listener)))
                    .collect()
            })
            .unwrap_or_default();

        let mut report = DeliveryReport::default();
        let any_event: &dyn Any = event;

        for (id, listener) in snapshot {
            let outcome = match listener.try_borrow_mut() {
                Ok(mut callback) => {
                    panic::catch_unwind(AssertUnwindSafe(|| (&mut *callback)(any_event)))
                        .unwrap_or_else(|payload| {
                            Err(ListenerError::Panicked(panic_message(&*payload)))
                        })
                }
                Err(_) => Err(ListenerError::Busy),
            };

            match outcome {
                Ok(()) => report.delivered += 1,
                Err(error) => {
                    warn!("{} listener {id:?} did not complete: {error}", event.name());
                    report.failures.push(ListenerFailure {
                        listener: id,
                        error,
                    });
                }
            }
        }

        trace!(
            "posted {}: delivered={}, failed={}",
            event.name(),
            report.delivered,
            report.failures.len()
        );
        report
    }

    /// Number of listeners currently registered for `E`.
    pub fn listener_count<E: Event>(&self) -> usize {
        self.listeners
            .borrow()
            .get(&TypeId::of::<E>())
            .map_or(0, Vec::len)
    }

    /// `true` when no listener is registered for any event type.
    pub fn is_empty(&self) -> bool {
        self.listeners.borrow().is_empty()
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total: usize = self.listeners.borrow().values().map(Vec::len).sum();
        f.debug_struct("EventBus")
            .field("listeners", &total)
            .field("next_id", &self.next_id.get())
            .finish()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
