#![forbid(unsafe_code)]

//! Connects a modal to an input target through the listener registry.
//!
//! This is the lifecycle half of the modal: a host dispatches raw events on
//! an [`EventTarget`], and [`ModalWiring`] owns the subscriptions that turn
//! those events into open/close transitions. `connect()` attaches keyed
//! listeners; `disconnect()` tears every one of them down with a single
//! `detach_all`, no callback references needed. Reconnecting is safe: the
//! registry replaces subscriptions attached under the same key.
//!
//! Subscriptions use the `<type>.modal` key namespace:
//!
//! - `"key.modal"` — Escape press closes the modal when the config allows.
//! - `"backdrop.modal"` — left-button press on the backdrop (routed by the
//!   host's hit test) closes the modal when the config allows.

use std::cell::RefCell;
use std::rc::Rc;

use scrim_core::event::{Event, KeyCode, MouseButton, MouseEventKind};
use scrim_core::registry::ListenerRegistry;
use scrim_core::target::{EventTarget, TargetRef};

use crate::modal::{ModalConfig, ModalState};

/// Subscription key for keyboard handling.
const KEY_SUBSCRIPTION: &str = "key.modal";
/// Subscription key for routed backdrop presses.
const BACKDROP_SUBSCRIPTION: &str = "backdrop.modal";

/// Listener lifecycle for one modal attached to one input target.
#[derive(Debug)]
pub struct ModalWiring {
    registry: ListenerRegistry,
    input: TargetRef,
    state: Rc<RefCell<ModalState>>,
    config: ModalConfig,
}

impl ModalWiring {
    /// Create wiring for `input`, starting disconnected with a closed modal.
    #[must_use]
    pub fn new(input: &EventTarget, config: ModalConfig) -> Self {
        Self {
            registry: ListenerRegistry::new(),
            input: input.handle(),
            state: Rc::new(RefCell::new(ModalState::closed())),
            config,
        }
    }

    /// Shared handle to the modal state.
    #[must_use]
    pub fn state(&self) -> Rc<RefCell<ModalState>> {
        Rc::clone(&self.state)
    }

    /// Whether the modal is currently open.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.state.borrow().is_open()
    }

    /// Open the modal and attach its listeners.
    pub fn open(&mut self) {
        self.state.borrow_mut().open();
        self.connect();
    }

    /// Close the modal and detach its listeners.
    pub fn close(&mut self) {
        self.state.borrow_mut().close();
        self.disconnect();
    }

    /// Attach the modal's subscriptions to the input target.
    ///
    /// Calling this more than once replaces the previous subscriptions
    /// instead of stacking them.
    pub fn connect(&mut self) {
        if self.config.close_on_escape {
            let state = Rc::clone(&self.state);
            self.registry.attach(KEY_SUBSCRIPTION, &self.input, move |event: &Event| {
                if let Event::Key(key) = event
                    && key.code == KeyCode::Escape
                    && key.is_press()
                {
                    state.borrow_mut().close();
                }
            });
        }
        if self.config.close_on_backdrop {
            let state = Rc::clone(&self.state);
            self.registry
                .attach(BACKDROP_SUBSCRIPTION, &self.input, move |event: &Event| {
                    if let Event::Mouse(mouse) = event
                        && mouse.kind == MouseEventKind::Down(MouseButton::Left)
                    {
                        state.borrow_mut().close();
                    }
                });
        }
    }

    /// Detach every subscription this wiring attached.
    pub fn disconnect(&mut self) {
        self.registry.detach_all(&[&self.input]);
    }

    /// Whether any subscription is currently attached.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.registry.has_listeners(&self.input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scrim_core::event::MouseEvent;

    fn escape() -> Event {
        Event::key(KeyCode::Escape)
    }

    fn backdrop_press() -> Event {
        Event::Mouse(MouseEvent::new(
            MouseEventKind::Down(MouseButton::Left),
            0,
            0,
        ))
    }

    #[test]
    fn escape_closes_connected_modal() {
        let input = EventTarget::new();
        let mut wiring = ModalWiring::new(&input, ModalConfig::default());
        wiring.open();
        assert!(wiring.is_open());
        assert!(wiring.is_connected());

        input.emit("key", &escape());
        assert!(!wiring.is_open());
    }

    #[test]
    fn routed_backdrop_press_closes() {
        let input = EventTarget::new();
        let mut wiring = ModalWiring::new(&input, ModalConfig::default());
        wiring.open();

        input.emit("backdrop", &backdrop_press());
        assert!(!wiring.is_open());
    }

    #[test]
    fn non_escape_key_is_ignored() {
        let input = EventTarget::new();
        let mut wiring = ModalWiring::new(&input, ModalConfig::default());
        wiring.open();

        input.emit("key", &Event::key(KeyCode::Enter));
        assert!(wiring.is_open());
    }

    #[test]
    fn disconnected_wiring_hears_nothing() {
        let input = EventTarget::new();
        let mut wiring = ModalWiring::new(&input, ModalConfig::default());
        wiring.open();
        wiring.disconnect();
        assert!(!wiring.is_connected());

        wiring.state().borrow_mut().open();
        input.emit("key", &escape());
        assert!(wiring.is_open(), "detached listener must not fire");
    }

    #[test]
    fn reconnect_does_not_stack_listeners() {
        let input = EventTarget::new();
        let mut wiring = ModalWiring::new(&input, ModalConfig::default());
        wiring.connect();
        wiring.connect();
        wiring.connect();

        // One listener per subscription key, regardless of reconnects.
        assert_eq!(input.listener_count(), 2);
    }

    #[test]
    fn config_disables_subscriptions() {
        let input = EventTarget::new();
        let config = ModalConfig::default()
            .close_on_escape(false)
            .close_on_backdrop(false);
        let mut wiring = ModalWiring::new(&input, config);
        wiring.open();

        assert!(!wiring.is_connected());
        input.emit("key", &escape());
        input.emit("backdrop", &backdrop_press());
        assert!(wiring.is_open());
    }

    #[test]
    fn close_detaches_everything() {
        let input = EventTarget::new();
        let mut wiring = ModalWiring::new(&input, ModalConfig::default());
        wiring.open();
        wiring.close();
        assert!(!wiring.is_connected());
        assert_eq!(input.listener_count(), 0);
    }

    #[test]
    fn wiring_survives_dropped_input() {
        let input = EventTarget::new();
        let mut wiring = ModalWiring::new(&input, ModalConfig::default());
        wiring.open();
        drop(input);

        // Dead target: every registry operation is a silent no-op.
        wiring.disconnect();
        wiring.connect();
        assert!(!wiring.is_connected());
    }
}
