#![forbid(unsafe_code)]

//! Event targets: the emission/subscription primitive listeners hang off.
//!
//! An [`EventTarget`] is a shared, single-threaded handle (`Rc<RefCell<..>>`,
//! in the same mold as the reactive observables elsewhere in the stack).
//! Cloning a target clones the *handle*; both clones share one listener set.
//!
//! A [`TargetRef`] is the weak counterpart. It is the identity the
//! [`ListenerRegistry`](crate::registry::ListenerRegistry) keys on, and it is
//! how "this target no longer exists" is represented: a `TargetRef` whose
//! target has been dropped upgrades to `None` and every operation on it is a
//! silent no-op.
//!
//! # Invariants
//!
//! 1. Dispatch never invokes a callback whose cancellation token was canceled
//!    before the invocation, even when cancellation happened earlier in the
//!    same dispatch.
//! 2. Listeners registered during a dispatch are not invoked by that
//!    dispatch.
//! 3. Canceled listeners are pruned lazily (during dispatch and
//!    registration); they never accumulate without bound.
//!
//! # Failure Modes
//!
//! - A callback that recursively dispatches back into *itself* panics on the
//!   inner borrow. Recursive dispatch to other listeners on the same target
//!   is fine (dispatch snapshots the listener list first).

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::event::Event;
use crate::registry::CancelToken;

type Callback = Rc<RefCell<dyn FnMut(&Event)>>;

struct ListenerSlot {
    event_type: String,
    token: CancelToken,
    callback: Callback,
}

/// A shared event-emitting object.
#[derive(Clone, Default)]
pub struct EventTarget {
    inner: Rc<RefCell<Vec<ListenerSlot>>>,
}

impl EventTarget {
    /// Create a target with no listeners.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A weak reference usable as a registry identity.
    #[must_use]
    pub fn handle(&self) -> TargetRef {
        TargetRef {
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// Register `callback` for events dispatched under `event_type`.
    ///
    /// The callback stays registered until `token` is canceled. Callers that
    /// want keyed, replaceable subscriptions should go through
    /// [`ListenerRegistry::attach`](crate::registry::ListenerRegistry::attach)
    /// instead of calling this directly.
    pub fn register(
        &self,
        event_type: impl Into<String>,
        callback: impl FnMut(&Event) + 'static,
        token: CancelToken,
    ) {
        let mut inner = self.inner.borrow_mut();
        inner.retain(|slot| !slot.token.is_canceled());
        inner.push(ListenerSlot {
            event_type: event_type.into(),
            token,
            callback: Rc::new(RefCell::new(callback)),
        });
    }

    /// Dispatch `event` to every live listener registered under
    /// `event_type`, in registration order.
    ///
    /// Returns the number of callbacks invoked.
    pub fn emit(&self, event_type: &str, event: &Event) -> usize {
        // Snapshot before invoking so callbacks may register or cancel
        // listeners on this target without holding the borrow.
        let snapshot: Vec<(CancelToken, Callback)> = {
            let mut inner = self.inner.borrow_mut();
            inner.retain(|slot| !slot.token.is_canceled());
            inner
                .iter()
                .filter(|slot| slot.event_type == event_type)
                .map(|slot| (slot.token.clone(), Rc::clone(&slot.callback)))
                .collect()
        };

        let mut delivered = 0;
        for (token, callback) in snapshot {
            if token.is_canceled() {
                continue;
            }
            (&mut *callback.borrow_mut())(event);
            delivered += 1;
        }
        delivered
    }

    /// Number of live (non-canceled) listeners across all event types.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.inner
            .borrow()
            .iter()
            .filter(|slot| !slot.token.is_canceled())
            .count()
    }
}

impl fmt::Debug for EventTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventTarget")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

/// Weak reference to an [`EventTarget`].
///
/// Holding a `TargetRef` never keeps the target alive. Two refs compare
/// equal iff they point at the same target allocation.
#[derive(Clone)]
pub struct TargetRef {
    inner: Weak<RefCell<Vec<ListenerSlot>>>,
}

impl TargetRef {
    /// The target, if it is still alive.
    #[must_use]
    pub fn upgrade(&self) -> Option<EventTarget> {
        self.inner.upgrade().map(|inner| EventTarget { inner })
    }

    /// Whether the target is still alive.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.inner.strong_count() > 0
    }

    /// Stable identity for registry bookkeeping. Valid for the lifetime of
    /// the `TargetRef` itself, even after the target dies.
    pub(crate) fn id(&self) -> usize {
        Weak::as_ptr(&self.inner) as usize
    }
}

impl PartialEq for TargetRef {
    fn eq(&self, other: &Self) -> bool {
        Weak::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for TargetRef {}

impl fmt::Debug for TargetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TargetRef")
            .field("alive", &self.is_alive())
            .finish()
    }
}
