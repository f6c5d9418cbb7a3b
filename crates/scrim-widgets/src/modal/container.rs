#![forbid(unsafe_code)]

//! Modal container widget with backdrop, positioning, and size constraints.
//!
//! This widget renders:
//! 1) a full-screen backdrop (tinted overlay), then
//! 2) the content widget in a positioned rectangle.
//!
//! Optionally registers hit regions for backdrop vs content so callers can
//! implement close-on-backdrop-click behavior using the hit grid.

use crate::frame::{Frame, HitId, HitRegion};
use crate::{StatefulWidget, Widget, set_style_area};
use scrim_core::event::{Event, KeyCode, MouseButton, MouseEventKind};
use scrim_core::geometry::{Rect, Size};
use scrim_style::{Rgba, Style};

/// Hit region tag for the modal backdrop.
pub const MODAL_HIT_BACKDROP: HitRegion = HitRegion::Custom(1);
/// Hit region tag for the modal content.
pub const MODAL_HIT_CONTENT: HitRegion = HitRegion::Custom(2);

/// Modal action emitted by `ModalState::handle_event`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalAction {
    /// The modal should close.
    Close,
    /// Backdrop was clicked.
    BackdropClicked,
    /// Escape was pressed.
    EscapePressed,
}

/// Backdrop configuration (color + opacity).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackdropConfig {
    /// Backdrop color (alpha will be scaled by `opacity`).
    pub color: Rgba,
    /// Opacity in `[0.0, 1.0]`.
    pub opacity: f32,
}

impl BackdropConfig {
    /// Create a new backdrop config.
    #[must_use]
    pub fn new(color: Rgba, opacity: f32) -> Self {
        Self { color, opacity }
    }

    /// Set backdrop color.
    #[must_use]
    pub fn color(mut self, color: Rgba) -> Self {
        self.color = color;
        self
    }

    /// Set backdrop opacity.
    #[must_use]
    pub fn opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }
}

impl Default for BackdropConfig {
    fn default() -> Self {
        Self {
            color: Rgba::BLACK,
            opacity: 0.6,
        }
    }
}

/// Modal size constraints (min/max width/height).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ModalSizeConstraints {
    pub min_width: Option<u16>,
    pub max_width: Option<u16>,
    pub min_height: Option<u16>,
    pub max_height: Option<u16>,
}

impl ModalSizeConstraints {
    /// Create an unconstrained size spec.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            min_width: None,
            max_width: None,
            min_height: None,
            max_height: None,
        }
    }

    /// Set minimum width.
    #[must_use]
    pub fn min_width(mut self, value: u16) -> Self {
        self.min_width = Some(value);
        self
    }

    /// Set maximum width.
    #[must_use]
    pub fn max_width(mut self, value: u16) -> Self {
        self.max_width = Some(value);
        self
    }

    /// Set minimum height.
    #[must_use]
    pub fn min_height(mut self, value: u16) -> Self {
        self.min_height = Some(value);
        self
    }

    /// Set maximum height.
    #[must_use]
    pub fn max_height(mut self, value: u16) -> Self {
        self.max_height = Some(value);
        self
    }

    /// Clamp the given size to these constraints (but never exceed available).
    #[must_use]
    pub fn clamp(self, available: Size) -> Size {
        let mut width = available.width;
        let mut height = available.height;

        if let Some(max_width) = self.max_width {
            width = width.min(max_width);
        }
        if let Some(max_height) = self.max_height {
            height = height.min(max_height);
        }
        if let Some(min_width) = self.min_width {
            width = width.max(min_width).min(available.width);
        }
        if let Some(min_height) = self.min_height {
            height = height.max(min_height).min(available.height);
        }

        Size::new(width, height)
    }
}

/// Modal positioning options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModalPosition {
    #[default]
    Center,
    CenterOffset {
        x: i16,
        y: i16,
    },
    TopCenter {
        margin: u16,
    },
    Custom {
        x: u16,
        y: u16,
    },
}

impl ModalPosition {
    fn resolve(self, area: Rect, size: Size) -> Rect {
        let base_x = i32::from(area.x);
        let base_y = i32::from(area.y);
        let max_x = base_x + (i32::from(area.width) - i32::from(size.width));
        let max_y = base_y + (i32::from(area.height) - i32::from(size.height));

        let (mut x, mut y) = match self {
            Self::Center => (
                base_x + (i32::from(area.width) - i32::from(size.width)) / 2,
                base_y + (i32::from(area.height) - i32::from(size.height)) / 2,
            ),
            Self::CenterOffset { x, y } => (
                base_x + (i32::from(area.width) - i32::from(size.width)) / 2 + i32::from(x),
                base_y + (i32::from(area.height) - i32::from(size.height)) / 2 + i32::from(y),
            ),
            Self::TopCenter { margin } => (
                base_x + (i32::from(area.width) - i32::from(size.width)) / 2,
                base_y + i32::from(margin),
            ),
            Self::Custom { x, y } => (i32::from(x), i32::from(y)),
        };

        x = x.clamp(base_x, max_x);
        y = y.clamp(base_y, max_y);

        Rect::new(x as u16, y as u16, size.width, size.height)
    }
}

/// Modal configuration.
#[derive(Debug, Clone)]
pub struct ModalConfig {
    pub position: ModalPosition,
    pub backdrop: BackdropConfig,
    pub size: ModalSizeConstraints,
    pub close_on_backdrop: bool,
    pub close_on_escape: bool,
    pub hit_id: Option<HitId>,
}

impl Default for ModalConfig {
    fn default() -> Self {
        Self {
            position: ModalPosition::Center,
            backdrop: BackdropConfig::default(),
            size: ModalSizeConstraints::default(),
            close_on_backdrop: true,
            close_on_escape: true,
            hit_id: None,
        }
    }
}

impl ModalConfig {
    #[must_use]
    pub fn position(mut self, position: ModalPosition) -> Self {
        self.position = position;
        self
    }

    #[must_use]
    pub fn backdrop(mut self, backdrop: BackdropConfig) -> Self {
        self.backdrop = backdrop;
        self
    }

    #[must_use]
    pub fn size(mut self, size: ModalSizeConstraints) -> Self {
        self.size = size;
        self
    }

    #[must_use]
    pub fn close_on_backdrop(mut self, close: bool) -> Self {
        self.close_on_backdrop = close;
        self
    }

    #[must_use]
    pub fn close_on_escape(mut self, close: bool) -> Self {
        self.close_on_escape = close;
        self
    }

    #[must_use]
    pub fn hit_id(mut self, id: HitId) -> Self {
        self.hit_id = Some(id);
        self
    }
}

/// Stateful helper for modal open/close behavior.
///
/// The open flag is the widget analog of an `open` attribute: hosts flip it
/// with [`set_open`](Self::set_open) and re-render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModalState {
    open: bool,
}

impl Default for ModalState {
    fn default() -> Self {
        Self { open: true }
    }
}

impl ModalState {
    /// State that starts closed.
    #[must_use]
    pub const fn closed() -> Self {
        Self { open: false }
    }

    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.open
    }

    pub fn open(&mut self) {
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    /// Reflect an externally driven open flag.
    pub fn set_open(&mut self, open: bool) {
        self.open = open;
    }

    /// Handle events and return a modal action if triggered.
    ///
    /// The caller should pass the hit-test result for the mouse event
    /// (usually from the last rendered frame).
    pub fn handle_event(
        &mut self,
        event: &Event,
        hit: Option<(HitId, HitRegion, u64)>,
        config: &ModalConfig,
    ) -> Option<ModalAction> {
        if !self.open {
            return None;
        }

        match event {
            Event::Key(key)
                if key.code == KeyCode::Escape && key.is_press() && config.close_on_escape =>
            {
                self.open = false;
                return Some(ModalAction::EscapePressed);
            }
            Event::Mouse(mouse)
                if mouse.kind == MouseEventKind::Down(MouseButton::Left)
                    && config.close_on_backdrop =>
            {
                if let (Some((id, region, _)), Some(expected)) = (hit, config.hit_id)
                    && id == expected
                    && region == MODAL_HIT_BACKDROP
                {
                    self.open = false;
                    return Some(ModalAction::BackdropClicked);
                }
            }
            _ => {}
        }

        None
    }
}

/// Modal container widget.
///
/// Invariants:
/// - `content_rect()` is always clamped within the given `area`.
/// - Size constraints are applied before positioning and never exceed `area`.
///
/// Failure modes:
/// - If the available `area` is empty or constraints clamp to zero size,
///   the content is not rendered.
/// - `close_on_backdrop` requires `hit_id` to be set; otherwise backdrop
///   clicks cannot be distinguished from content clicks.
#[derive(Debug, Clone)]
pub struct Modal<C> {
    content: C,
    config: ModalConfig,
}

impl<C> Modal<C> {
    /// Create a new modal with content.
    pub fn new(content: C) -> Self {
        Self {
            content,
            config: ModalConfig::default(),
        }
    }

    /// Set modal configuration.
    #[must_use]
    pub fn config(mut self, config: ModalConfig) -> Self {
        self.config = config;
        self
    }

    /// Set modal position.
    #[must_use]
    pub fn position(mut self, position: ModalPosition) -> Self {
        self.config.position = position;
        self
    }

    /// Set backdrop configuration.
    #[must_use]
    pub fn backdrop(mut self, backdrop: BackdropConfig) -> Self {
        self.config.backdrop = backdrop;
        self
    }

    /// Set size constraints.
    #[must_use]
    pub fn size(mut self, size: ModalSizeConstraints) -> Self {
        self.config.size = size;
        self
    }

    /// Set close-on-backdrop behavior.
    #[must_use]
    pub fn close_on_backdrop(mut self, close: bool) -> Self {
        self.config.close_on_backdrop = close;
        self
    }

    /// Set close-on-escape behavior.
    #[must_use]
    pub fn close_on_escape(mut self, close: bool) -> Self {
        self.config.close_on_escape = close;
        self
    }

    /// Set the hit id used for backdrop/content hit regions.
    #[must_use]
    pub fn hit_id(mut self, id: HitId) -> Self {
        self.config.hit_id = Some(id);
        self
    }

    /// Compute the content rectangle for the given area.
    #[must_use]
    pub fn content_rect(&self, area: Rect) -> Rect {
        let size = self.config.size.clamp(area.size());
        if size.is_empty() {
            return Rect::new(area.x, area.y, 0, 0);
        }
        self.config.position.resolve(area, size)
    }

    fn render_chrome(
        &self,
        area: Rect,
        frame: &mut Frame,
        render_content: impl FnOnce(Rect, &mut Frame),
    ) {
        if area.is_empty() {
            return;
        }

        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!(
            "widget_render",
            widget = "Modal",
            x = area.x,
            y = area.y,
            w = area.width,
            h = area.height
        )
        .entered();

        // Backdrop (full area), preserving existing glyphs.
        let opacity = self.config.backdrop.opacity.clamp(0.0, 1.0);
        if opacity > 0.0 {
            let bg = self.config.backdrop.color.with_opacity(opacity);
            set_style_area(&mut frame.buffer, area, Style::new().bg(bg));
        }

        let content_area = self.content_rect(area);

        // Register hit regions before the content draws so per-button hits
        // land on top of the content region.
        if let Some(hit_id) = self.config.hit_id {
            frame.register_hit(area, hit_id, MODAL_HIT_BACKDROP, 0);
            if !content_area.is_empty() {
                frame.register_hit(content_area, hit_id, MODAL_HIT_CONTENT, 0);
            }
        }

        if !content_area.is_empty() {
            render_content(content_area, frame);
        }
    }
}

impl<C: Widget> Widget for Modal<C> {
    fn render(&self, area: Rect, frame: &mut Frame) {
        self.render_chrome(area, frame, |content_area, frame| {
            self.content.render(content_area, frame);
        });
    }
}

impl<C: StatefulWidget> Modal<C> {
    /// Render a stateful content widget inside the modal chrome.
    pub fn render_stateful(&self, area: Rect, frame: &mut Frame, state: &mut C::State) {
        self.render_chrome(area, frame, |content_area, frame| {
            self.content.render(content_area, frame, state);
        });
    }
}
