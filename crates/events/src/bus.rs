use std::any::{Any, TypeId};
use std::cell::RefCell;
use std::cmp::Reverse;
use std::collections::BTreeMap;
use std::rc::Rc;

/// Priority and cancellation state carried by every event.
///
/// The priority is fixed at construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventState {
    priority: i32,
    cancelled: bool,
}

impl EventState {
    pub fn new(priority: i32) -> Self {
        Self {
            priority,
            cancelled: false,
        }
    }

    pub fn priority(&self) -> i32 {
        self.priority
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    pub fn cancel(&mut self) {
        self.cancelled = true;
    }
}

/// A typed notification. Implementors embed an [`EventState`].
pub trait Event: Any {
    fn state(&self) -> &EventState;

    fn state_mut(&mut self) -> &mut EventState;

    fn priority(&self) -> i32 {
        self.state().priority()
    }

    fn is_cancelled(&self) -> bool {
        self.state().is_cancelled()
    }

    /// Stop delivery to every handler after the current one.
    fn cancel(&mut self) {
        self.state_mut().cancel();
    }
}

/// Returned by [`EventBus::register`]; identifies one registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandlerId(u64);

type Handler<E> = Rc<dyn Fn(&mut E)>;

struct Entry<E> {
    id: HandlerId,
    priority: i32,
    handler: Handler<E>,
}

/// Handlers for one event type, kept sorted by descending priority.
struct HandlerList<E> {
    entries: Vec<Entry<E>>,
}

/// Type-erased view of a [`HandlerList`].
trait ErasedList {
    fn len(&self) -> usize;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<E: Event> ErasedList for HandlerList<E> {
    fn len(&self) -> usize {
        self.entries.len()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[derive(Default)]
struct Registrations {
    next_id: u64,
    lists: BTreeMap<TypeId, Box<dyn ErasedList>>,
}

impl Registrations {
    fn list<E: Event>(&self) -> Option<&HandlerList<E>> {
        self.lists
            .get(&TypeId::of::<E>())?
            .as_any()
            .downcast_ref::<HandlerList<E>>()
    }

    fn list_mut<E: Event>(&mut self) -> Option<&mut HandlerList<E>> {
        self.lists
            .get_mut(&TypeId::of::<E>())?
            .as_any_mut()
            .downcast_mut::<HandlerList<E>>()
    }
}

/// Handle to a set of event registrations.
///
/// Clones share the same registrations, so a handler can hold a clone to
/// register, unregister or broadcast from inside a broadcast. Single-threaded.
#[derive(Clone, Default)]
pub struct EventBus {
    inner: Rc<RefCell<Registrations>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for events of type `E`.
    ///
    /// Higher priorities run first; equal priorities run in registration
    /// order.
    pub fn register<E, F>(&self, handler: F, priority: i32) -> HandlerId
    where
        E: Event,
        F: Fn(&mut E) + 'static,
    {
        let mut inner = self.inner.borrow_mut();
        let id = HandlerId(inner.next_id);
        inner.next_id += 1;

        let entry = Entry {
            id,
            priority,
            handler: Rc::new(handler),
        };
        match inner.list_mut::<E>() {
            Some(list) => {
                list.entries.push(entry);
                // Stable, so ties keep registration order.
                list.entries.sort_by_key(|e| Reverse(e.priority));
            }
            None => {
                inner.lists.insert(
                    TypeId::of::<E>(),
                    Box::new(HandlerList {
                        entries: vec![entry],
                    }),
                );
            }
        }
        tracing::debug!(
            event = std::any::type_name::<E>(),
            priority,
            handler = id.0,
            "registered event handler"
        );
        id
    }

    /// Remove the registration `id` for `E`. Returns whether it existed.
    pub fn unregister<E: Event>(&self, id: HandlerId) -> bool {
        let mut inner = self.inner.borrow_mut();
        let Some(list) = inner.list_mut::<E>() else {
            return false;
        };
        match list.entries.iter().position(|e| e.id == id) {
            Some(index) => {
                list.entries.remove(index);
                true
            }
            None => false,
        }
    }

    /// Deliver `event` to every handler of its type until one cancels it.
    ///
    /// Cancellation is checked after each handler, so the first handler runs
    /// even for an event cancelled before the broadcast. Handlers run against
    /// the registrations as they stood when the broadcast began. Returns how
    /// many handlers ran.
    pub fn broadcast<E: Event>(&self, event: &mut E) -> usize {
        let handlers: Vec<Handler<E>> = match self.inner.borrow().list::<E>() {
            Some(list) => list.entries.iter().map(|e| e.handler.clone()).collect(),
            None => return 0,
        };

        let mut invoked = 0;
        for handler in handlers {
            handler(event);
            invoked += 1;
            if event.is_cancelled() {
                break;
            }
        }
        if event.is_cancelled() {
            tracing::debug!(
                event = std::any::type_name::<E>(),
                invoked,
                "event cancelled"
            );
        }
        invoked
    }

    /// Number of handlers registered for `E`.
    pub fn handler_count<E: Event>(&self) -> usize {
        self.inner.borrow().list::<E>().map_or(0, |l| l.entries.len())
    }

    /// Number of handlers across every event type.
    pub fn total_handlers(&self) -> usize {
        self.inner.borrow().lists.values().map(|l| l.len()).sum()
    }

    /// Drop every registration.
    pub fn clear(&self) {
        self.inner.borrow_mut().lists.clear();
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("event_types", &self.inner.borrow().lists.len())
            .field("handlers", &self.total_handlers())
            .finish()
    }
}
