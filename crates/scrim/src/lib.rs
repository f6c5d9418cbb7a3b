#![forbid(unsafe_code)]

//! Scrim: a modal overlay widget kit for terminal UIs.
//!
//! The workspace splits into three layers, re-exported here:
//!
//! - [`core`]: events, event targets, and the listener-lifecycle registry
//! - [`style`]: colors, styles, and one-shot stylesheet loading
//! - [`widgets`]: the modal container, dialog presets, and focus management
//!
//! # Quick start
//!
//! ```
//! use scrim::prelude::*;
//!
//! // Keyed subscriptions with token-based cancellation.
//! let input = EventTarget::new();
//! let mut registry = ListenerRegistry::new();
//! registry.attach("key.modal", &input.handle(), |event| {
//!     let _ = event;
//! });
//! assert!(registry.has_listeners(&input.handle()));
//! registry.detach_all(&[&input.handle()]);
//! assert!(!registry.has_listeners(&input.handle()));
//! ```

pub use scrim_core as core;
pub use scrim_style as style;
pub use scrim_widgets as widgets;

/// Commonly used items in one import.
pub mod prelude {
    pub use scrim_core::{
        CancelToken, Event, EventTarget, KeyCode, KeyEvent, ListenerRegistry, Modifiers,
        MouseButton, MouseEvent, MouseEventKind, Rect, Size, SubscriptionKey, TargetRef,
    };
    pub use scrim_style::{Rgba, SheetError, Style, StyleFlags, StyleSheet};
    pub use scrim_widgets::modal::{
        BackdropConfig, Dialog, DialogButton, DialogConfig, DialogResult, DialogState, Modal,
        ModalAction, ModalConfig, ModalPosition, ModalSizeConstraints, ModalState, ModalWiring,
    };
    pub use scrim_widgets::{
        Buffer, Cell, FocusId, FocusManager, Frame, HitId, HitRegion, StatefulWidget, Widget,
    };
}
