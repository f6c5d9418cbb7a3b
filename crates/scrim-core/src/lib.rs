#![forbid(unsafe_code)]

//! Core primitives for Scrim: the event model, event targets, and the
//! listener-lifecycle registry.
//!
//! The interesting piece lives in [`registry`]: keyed, replaceable event
//! subscriptions with token-based cancellation, so callers never have to
//! hold on to a callback just to remove it later. [`target`] provides the
//! single-threaded emission primitive the registry plugs into; [`event`]
//! and [`geometry`] are shared plumbing for the widget layer.

pub mod event;
pub mod geometry;
pub mod registry;
pub mod target;

pub use event::{Event, KeyCode, KeyEvent, KeyEventKind, Modifiers, MouseButton, MouseEvent, MouseEventKind};
pub use geometry::{Rect, Size};
pub use registry::{CancelToken, ListenerRegistry, SubscriptionKey};
pub use target::{EventTarget, TargetRef};
