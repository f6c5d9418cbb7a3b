#![forbid(unsafe_code)]

//! Modal container widget (overlay layer), dialog presets, and wiring to
//! the listener registry.
//!
//! The pieces compose outward-in:
//!
//! - [`Modal`] renders the backdrop and positions content; [`ModalState`]
//!   tracks open/close and turns Escape/backdrop-click into
//!   [`ModalAction`]s.
//! - [`Dialog`] is a preset content widget (title, message, button row)
//!   with its own [`DialogState`].
//! - [`ModalWiring`] subscribes a shared `ModalState` to an input
//!   [`EventTarget`](scrim_core::EventTarget) through a
//!   [`ListenerRegistry`](scrim_core::ListenerRegistry), attaching on
//!   connect and detaching everything on disconnect.

mod container;
mod dialog;
mod wiring;

pub use container::{
    BackdropConfig, MODAL_HIT_BACKDROP, MODAL_HIT_CONTENT, Modal, ModalAction, ModalConfig,
    ModalPosition, ModalSizeConstraints, ModalState,
};
pub use dialog::{
    DIALOG_HIT_BUTTON, Dialog, DialogButton, DialogConfig, DialogResult, DialogState,
};
pub use wiring::ModalWiring;
