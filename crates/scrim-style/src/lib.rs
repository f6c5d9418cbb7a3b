#![forbid(unsafe_code)]

//! Style primitives for Scrim.
//!
//! This crate provides:
//! - [`Rgba`] packed colors and [`Style`] with cascading merge semantics
//! - [`StyleSheet`] for one-shot load-and-parse of named style rules

pub mod color;
pub mod sheet;
pub mod style;

pub use color::Rgba;
pub use sheet::{SheetError, StyleSheet};
pub use style::{Style, StyleFlags};
