#![forbid(unsafe_code)]

//! Listener-lifecycle registry.
//!
//! [`ListenerRegistry`] lets callers attach and detach event subscriptions
//! without retaining the original callback for later removal. Subscriptions
//! are keyed by a [`SubscriptionKey`] (`"type"` or `"type.name"`); the type
//! token drives dispatch, the full key is the bookkeeping identity. Each
//! subscription owns a single-use [`CancelToken`] instead of a callback
//! reference.
//!
//! # Invariants
//!
//! 1. At most one active subscription exists per (target, key) pair.
//!    Attaching under an existing key cancels the previous subscription
//!    before the new one is recorded.
//! 2. A target has a registry entry iff it has at least one active
//!    subscription. Entries are removed the moment their last subscription
//!    is detached.
//! 3. Cancellation is synchronous and final: once `detach`/`detach_all`
//!    returns, the affected callbacks can never be invoked again.
//! 4. The registry holds only weak target references. It never extends a
//!    target's lifetime; entries for dead targets are pruned on the next
//!    `attach`. Address reuse cannot alias entries: an entry's `TargetRef`
//!    keeps the target's allocation reserved until the entry is gone.
//!
//! # Failure Modes
//!
//! | Input | Behavior |
//! |-------|----------|
//! | Dead target | Silent no-op, registry state untouched |
//! | Unknown target in `detach`/`detach_all` | Silently skipped |
//! | Key never attached | Silently skipped |
//! | Repeated cancellation | No-op (tokens are idempotent) |
//!
//! No registry operation panics or returns an error; this mirrors the
//! permissive contract of the UI layer it serves. Queries
//! ([`has_listeners`](ListenerRegistry::has_listeners), [`len`](ListenerRegistry::len))
//! exist so callers and tests can still observe state.

use std::cell::Cell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::event::Event;
use crate::target::TargetRef;

/// Composite subscription identity: an event-type token plus an optional
/// name token, separated by the first `.`.
///
/// ```
/// # use scrim_core::registry::SubscriptionKey;
/// let key = SubscriptionKey::new("click.cancel");
/// assert_eq!(key.event_type(), "click");
/// assert_eq!(key.name(), Some("cancel"));
///
/// let bare = SubscriptionKey::new("click");
/// assert_eq!(bare.event_type(), "click");
/// assert_eq!(bare.name(), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SubscriptionKey {
    raw: String,
}

impl SubscriptionKey {
    /// Create a key from its string form.
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self { raw: raw.into() }
    }

    /// The event-type token: everything before the first `.`.
    ///
    /// This is the only part of the key that participates in dispatch.
    #[must_use]
    pub fn event_type(&self) -> &str {
        match self.raw.split_once('.') {
            Some((event_type, _)) => event_type,
            None => &self.raw,
        }
    }

    /// The name token: everything after the first `.`, if present.
    ///
    /// Further delimiters belong to the name (`"a.b.c"` names `"b.c"`).
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.raw.split_once('.').map(|(_, name)| name)
    }

    /// The full key string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl From<&str> for SubscriptionKey {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for SubscriptionKey {
    fn from(raw: String) -> Self {
        Self::new(raw)
    }
}

impl fmt::Display for SubscriptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Single-use cancellation handle for one subscription.
///
/// Canceling is idempotent. After the first `cancel()` returns, the
/// associated callback is guaranteed not to fire again; the dispatch path
/// checks the token immediately before every invocation.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    canceled: Rc<Cell<bool>>,
}

impl CancelToken {
    /// Create a live token.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel the subscription. Safe to call more than once.
    pub fn cancel(&self) {
        self.canceled.set(true);
    }

    /// Whether the token has been canceled.
    #[must_use]
    pub fn is_canceled(&self) -> bool {
        self.canceled.get()
    }
}

type SubMap = HashMap<SubscriptionKey, CancelToken, ahash::RandomState>;

struct TargetEntry {
    target: TargetRef,
    subs: SubMap,
}

/// Table of active subscriptions, keyed by target identity.
///
/// The registry is a plain value: own one per component, widget tree, or
/// application shell. It is single-threaded by construction (`Rc`-based
/// targets), matching the cooperative execution model of the widget layer.
#[derive(Default)]
pub struct ListenerRegistry {
    entries: HashMap<usize, TargetEntry, ahash::RandomState>,
}

impl ListenerRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach `callback` to `target` under `key`, replacing any existing
    /// subscription with the same key.
    ///
    /// If the target is dead this is a silent no-op and registry state is
    /// untouched.
    pub fn attach(
        &mut self,
        key: impl Into<SubscriptionKey>,
        target: &TargetRef,
        callback: impl FnMut(&Event) + 'static,
    ) {
        self.entries.retain(|_, entry| entry.target.is_alive());

        let Some(live) = target.upgrade() else {
            return;
        };
        let key = key.into();

        let entry = self.entries.entry(target.id()).or_insert_with(|| TargetEntry {
            target: target.clone(),
            subs: SubMap::default(),
        });

        if let Some(previous) = entry.subs.remove(&key) {
            previous.cancel();
        }

        let token = CancelToken::new();
        live.register(key.event_type(), callback, token.clone());
        #[cfg(feature = "tracing")]
        tracing::debug!(key = key.as_str(), "listener attached");
        entry.subs.insert(key, token);
    }

    /// Detach the subscription under `key` from each of `targets`.
    ///
    /// Targets that are dead, have no entry, or have no subscription under
    /// the key are silently skipped.
    pub fn detach(&mut self, key: impl Into<SubscriptionKey>, targets: &[&TargetRef]) {
        let key = key.into();
        for target in targets {
            if !target.is_alive() {
                continue;
            }
            let id = target.id();
            let mut now_empty = false;
            if let Some(entry) = self.entries.get_mut(&id)
                && let Some(token) = entry.subs.remove(&key)
            {
                token.cancel();
                #[cfg(feature = "tracing")]
                tracing::debug!(key = key.as_str(), "listener detached");
                now_empty = entry.subs.is_empty();
            }
            if now_empty {
                self.entries.remove(&id);
            }
        }
    }

    /// Detach every subscription from each of `targets` and drop their
    /// entries. Dead or entry-less targets are silently skipped.
    pub fn detach_all(&mut self, targets: &[&TargetRef]) {
        for target in targets {
            if !target.is_alive() {
                continue;
            }
            if let Some(entry) = self.entries.remove(&target.id()) {
                #[cfg(feature = "tracing")]
                tracing::debug!(count = entry.subs.len(), "all listeners detached");
                for token in entry.subs.into_values() {
                    token.cancel();
                }
            }
        }
    }

    /// Whether `target` has at least one active subscription.
    #[must_use]
    pub fn has_listeners(&self, target: &TargetRef) -> bool {
        target.is_alive() && self.entries.contains_key(&target.id())
    }

    /// Number of live targets with at least one active subscription.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries
            .values()
            .filter(|entry| entry.target.is_alive())
            .count()
    }

    /// Whether no live target has any subscription.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerRegistry")
            .field("targets", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::KeyCode;
    use crate::target::EventTarget;

    fn counter() -> (Rc<Cell<u32>>, impl FnMut(&Event) + 'static) {
        let count = Rc::new(Cell::new(0));
        let inner = Rc::clone(&count);
        (count, move |_: &Event| inner.set(inner.get() + 1))
    }

    // --- SubscriptionKey ---

    #[test]
    fn key_without_name() {
        let key = SubscriptionKey::new("open");
        assert_eq!(key.event_type(), "open");
        assert_eq!(key.name(), None);
        assert_eq!(key.as_str(), "open");
    }

    #[test]
    fn key_with_name() {
        let key = SubscriptionKey::new("click.cancel");
        assert_eq!(key.event_type(), "click");
        assert_eq!(key.name(), Some("cancel"));
    }

    #[test]
    fn name_keeps_further_delimiters() {
        let key = SubscriptionKey::new("key.modal.esc");
        assert_eq!(key.event_type(), "key");
        assert_eq!(key.name(), Some("modal.esc"));
    }

    #[test]
    fn empty_name_is_distinct_from_no_name() {
        let trailing = SubscriptionKey::new("click.");
        assert_eq!(trailing.event_type(), "click");
        assert_eq!(trailing.name(), Some(""));
        assert_ne!(trailing, SubscriptionKey::new("click"));
    }

    // --- CancelToken ---

    #[test]
    fn cancel_is_idempotent() {
        let token = CancelToken::new();
        assert!(!token.is_canceled());
        token.cancel();
        token.cancel();
        assert!(token.is_canceled());
    }

    // --- Registry ---

    #[test]
    fn attach_twice_replaces_first_subscription() {
        let mut registry = ListenerRegistry::new();
        let bus = EventTarget::new();
        let (first, cb1) = counter();
        let (second, cb2) = counter();

        registry.attach("open.x", &bus.handle(), cb1);
        registry.attach("open.x", &bus.handle(), cb2);

        bus.emit("open", &Event::Custom("o".into()));
        assert_eq!(first.get(), 0, "replaced callback must not fire");
        assert_eq!(second.get(), 1);
        assert_eq!(bus.listener_count(), 1);
    }

    #[test]
    fn detach_by_key_leaves_other_keys() {
        let mut registry = ListenerRegistry::new();
        let btn = EventTarget::new();
        let (f1, cb1) = counter();
        let (f2, cb2) = counter();

        registry.attach("click.a", &btn.handle(), cb1);
        registry.attach("click.b", &btn.handle(), cb2);
        registry.detach("click.a", &[&btn.handle()]);

        btn.emit("click", &Event::key(KeyCode::Enter));
        assert_eq!(f1.get(), 0);
        assert_eq!(f2.get(), 1);
        assert!(registry.has_listeners(&btn.handle()));
    }

    #[test]
    fn entry_removed_with_last_key() {
        let mut registry = ListenerRegistry::new();
        let btn = EventTarget::new();
        let (_, cb) = counter();

        registry.attach("click.a", &btn.handle(), cb);
        assert!(registry.has_listeners(&btn.handle()));

        registry.detach("click.a", &[&btn.handle()]);
        assert!(!registry.has_listeners(&btn.handle()));
        assert!(registry.is_empty());
    }

    #[test]
    fn detach_all_clears_target() {
        let mut registry = ListenerRegistry::new();
        let bus = EventTarget::new();
        let (hits, cb1) = counter();
        let (_, cb2) = counter();

        registry.attach("open.x", &bus.handle(), cb1);
        registry.attach("close.x", &bus.handle(), cb2);
        registry.detach_all(&[&bus.handle()]);

        assert!(!registry.has_listeners(&bus.handle()));
        bus.emit("open", &Event::Custom("o".into()));
        assert_eq!(hits.get(), 0);

        // Detaching anything afterwards is a quiet no-op.
        registry.detach("open.x", &[&bus.handle()]);
        registry.detach("never", &[&bus.handle()]);
    }

    #[test]
    fn detach_unknown_key_is_noop() {
        let mut registry = ListenerRegistry::new();
        let btn = EventTarget::new();
        let (_, cb) = counter();

        registry.attach("click.a", &btn.handle(), cb);
        registry.detach("hover.a", &[&btn.handle()]);
        assert!(registry.has_listeners(&btn.handle()));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn dead_target_attach_is_noop() {
        let mut registry = ListenerRegistry::new();
        let handle = EventTarget::new().handle();
        assert!(!handle.is_alive());

        let (_, cb) = counter();
        registry.attach("click.a", &handle, cb);
        assert!(registry.is_empty());
        assert!(!registry.has_listeners(&handle));
    }

    #[test]
    fn dead_target_detach_is_noop() {
        let mut registry = ListenerRegistry::new();
        let live = EventTarget::new();
        let (_, cb) = counter();
        registry.attach("click.a", &live.handle(), cb);

        let dead = EventTarget::new().handle();
        registry.detach("click.a", &[&dead]);
        registry.detach_all(&[&dead]);
        assert_eq!(registry.len(), 1, "live entry untouched");
    }

    #[test]
    fn variadic_detach_mixes_valid_and_invalid() {
        let mut registry = ListenerRegistry::new();
        let a = EventTarget::new();
        let b = EventTarget::new();
        let dead = EventTarget::new().handle();
        let (fa, cba) = counter();
        let (fb, cbb) = counter();

        registry.attach("click.x", &a.handle(), cba);
        registry.attach("click.x", &b.handle(), cbb);
        registry.detach("click.x", &[&a.handle(), &dead, &b.handle()]);

        a.emit("click", &Event::key(KeyCode::Enter));
        b.emit("click", &Event::key(KeyCode::Enter));
        assert_eq!(fa.get(), 0);
        assert_eq!(fb.get(), 0);
        assert!(registry.is_empty());
    }

    #[test]
    fn registry_does_not_keep_target_alive() {
        let mut registry = ListenerRegistry::new();
        let target = EventTarget::new();
        let handle = target.handle();
        let (_, cb) = counter();

        registry.attach("click.a", &handle, cb);
        drop(target);
        assert!(!handle.is_alive(), "registry must not extend target lifetime");
        assert!(!registry.has_listeners(&handle));
    }

    #[test]
    fn dead_entries_pruned_on_next_attach() {
        let mut registry = ListenerRegistry::new();
        let doomed = EventTarget::new();
        let (_, cb) = counter();
        registry.attach("click.a", &doomed.handle(), cb);
        drop(doomed);

        let survivor = EventTarget::new();
        let (_, cb) = counter();
        registry.attach("click.a", &survivor.handle(), cb);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn detach_returns_before_any_future_delivery() {
        let mut registry = ListenerRegistry::new();
        let bus = EventTarget::new();
        let (hits, cb) = counter();

        registry.attach("tick.x", &bus.handle(), cb);
        bus.emit("tick", &Event::Custom("t".into()));
        assert_eq!(hits.get(), 1);

        registry.detach("tick.x", &[&bus.handle()]);
        bus.emit("tick", &Event::Custom("t".into()));
        bus.emit("tick", &Event::Custom("t".into()));
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn same_key_different_targets_are_independent() {
        let mut registry = ListenerRegistry::new();
        let a = EventTarget::new();
        let b = EventTarget::new();
        let (fa, cba) = counter();
        let (fb, cbb) = counter();

        registry.attach("click.x", &a.handle(), cba);
        registry.attach("click.x", &b.handle(), cbb);
        registry.detach("click.x", &[&a.handle()]);

        a.emit("click", &Event::key(KeyCode::Enter));
        b.emit("click", &Event::key(KeyCode::Enter));
        assert_eq!(fa.get(), 0);
        assert_eq!(fb.get(), 1);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn key_splits_at_first_delimiter(
                event_type in "[a-z][a-z0-9]{0,11}",
                name in "[a-z0-9.]{0,16}",
            ) {
                let key = SubscriptionKey::new(format!("{event_type}.{name}"));
                prop_assert_eq!(key.event_type(), event_type.as_str());
                prop_assert_eq!(key.name(), Some(name.as_str()));
            }

            #[test]
            fn bare_key_has_no_name(event_type in "[a-z][a-z0-9]{0,11}") {
                let key = SubscriptionKey::new(event_type.clone());
                prop_assert_eq!(key.event_type(), event_type.as_str());
                prop_assert_eq!(key.name(), None);
            }
        }
    }
}
