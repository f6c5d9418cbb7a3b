#![forbid(unsafe_code)]

//! Dialog presets built on the Modal container.
//!
//! Provides the common dialog patterns:
//! - Alert: message with an OK button
//! - Confirm: message with OK/Cancel
//! - Custom button rows via [`Dialog::with_buttons`]
//!
//! A dialog is a [`StatefulWidget`]; wrap it in a
//! [`Modal`](crate::modal::Modal) and render with
//! [`Modal::render_stateful`](crate::modal::Modal::render_stateful) to get
//! the backdrop and positioning for free.
//!
//! # Example
//!
//! ```ignore
//! let dialog = Dialog::confirm("Delete file?", "This action cannot be undone.");
//! let modal = Modal::new(dialog).size(ModalSizeConstraints::new().max_width(40));
//! modal.render_stateful(screen, &mut frame, &mut state);
//! ```

use crate::frame::{Frame, HitId, HitRegion};
use crate::{StatefulWidget, draw_text, set_style_area, truncate_to_width};
use scrim_core::event::{Event, KeyCode, Modifiers, MouseButton, MouseEventKind};
use scrim_core::geometry::Rect;
use scrim_style::{Style, StyleSheet};

/// Hit region for dialog buttons. The hit data payload is the button index.
pub const DIALOG_HIT_BUTTON: HitRegion = HitRegion::Custom(10);

/// Result from a dialog interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogResult {
    /// Dialog was dismissed without action.
    Dismissed,
    /// OK / primary button pressed.
    Ok,
    /// Cancel / secondary button pressed.
    Cancel,
    /// Custom button pressed with its ID.
    Custom(String),
}

/// A button in a dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogButton {
    /// Display label.
    pub label: String,
    /// Unique identifier.
    pub id: String,
    /// Whether this is the primary/default button.
    pub primary: bool,
}

impl DialogButton {
    /// Create a new dialog button.
    pub fn new(label: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            id: id.into(),
            primary: false,
        }
    }

    /// Mark as primary button.
    #[must_use]
    pub fn primary(mut self) -> Self {
        self.primary = true;
        self
    }

    /// Display width including brackets: `[ label ]`.
    #[must_use]
    pub fn display_width(&self) -> usize {
        use unicode_width::UnicodeWidthStr;
        UnicodeWidthStr::width(self.label.as_str()) + 4
    }

    fn text(&self) -> String {
        format!("[ {} ]", self.label)
    }
}

/// Dialog state for button focus and outcome.
#[derive(Debug, Clone, Default)]
pub struct DialogState {
    /// Currently focused button index.
    pub focused_button: Option<usize>,
    /// Whether the dialog is open.
    pub open: bool,
    /// Result after interaction.
    pub result: Option<DialogResult>,
}

impl DialogState {
    /// Create a new open dialog state.
    #[must_use]
    pub fn new() -> Self {
        Self {
            open: true,
            ..Default::default()
        }
    }

    /// Check if dialog is open.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.open
    }

    /// Close the dialog with a result.
    pub fn close(&mut self, result: DialogResult) {
        self.open = false;
        self.result = Some(result);
    }

    /// Reset the dialog state to open with no result.
    pub fn reset(&mut self) {
        self.open = true;
        self.result = None;
        self.focused_button = None;
    }

    /// Get the result if closed.
    pub fn take_result(&mut self) -> Option<DialogResult> {
        self.result.take()
    }
}

/// Dialog styling.
#[derive(Debug, Clone)]
pub struct DialogConfig {
    /// Style of the dialog surface (backgrounds the whole content rect).
    pub dialog_style: Style,
    /// Border style.
    pub border_style: Style,
    /// Title style.
    pub title_style: Style,
    /// Message style.
    pub message_style: Style,
    /// Button style.
    pub button_style: Style,
    /// Primary button style.
    pub primary_button_style: Style,
    /// Focused button style.
    pub focused_button_style: Style,
}

impl Default for DialogConfig {
    fn default() -> Self {
        Self {
            dialog_style: Style::new(),
            border_style: Style::new(),
            title_style: Style::new().bold(),
            message_style: Style::new(),
            button_style: Style::new(),
            primary_button_style: Style::new().bold(),
            focused_button_style: Style::new().reverse(),
        }
    }
}

impl DialogConfig {
    /// Build a config by cascading stylesheet rules over the defaults.
    ///
    /// Selectors: `dialog`, `dialog.border`, `dialog.title`,
    /// `dialog.message`, `button`, `button.primary`, `button.focused`.
    #[must_use]
    pub fn from_sheet(sheet: &StyleSheet) -> Self {
        let defaults = Self::default();
        Self {
            dialog_style: defaults.dialog_style.merge(sheet.style("dialog")),
            border_style: defaults.border_style.merge(sheet.style("dialog.border")),
            title_style: defaults.title_style.merge(sheet.style("dialog.title")),
            message_style: defaults.message_style.merge(sheet.style("dialog.message")),
            button_style: defaults.button_style.merge(sheet.style("button")),
            primary_button_style: defaults
                .primary_button_style
                .merge(sheet.style("button.primary")),
            focused_button_style: defaults
                .focused_button_style
                .merge(sheet.style("button.focused")),
        }
    }
}

/// A preset dialog: title, message, and a button row.
///
/// Invariants:
/// - At least one button is always present.
/// - Button focus wraps around (modular arithmetic).
///
/// Failure modes:
/// - If the area is too small, content is truncated but rendering never
///   panics.
/// - Empty title/message is allowed (renders nothing for that row).
#[derive(Debug, Clone)]
pub struct Dialog {
    title: String,
    message: String,
    buttons: Vec<DialogButton>,
    config: DialogConfig,
    hit_id: Option<HitId>,
}

impl Dialog {
    /// Create an alert dialog (message + OK).
    pub fn alert(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::with_buttons(
            title,
            message,
            vec![DialogButton::new("OK", "ok").primary()],
        )
    }

    /// Create a confirm dialog (message + OK/Cancel).
    pub fn confirm(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::with_buttons(
            title,
            message,
            vec![
                DialogButton::new("OK", "ok").primary(),
                DialogButton::new("Cancel", "cancel"),
            ],
        )
    }

    /// Create a dialog with a custom button row.
    ///
    /// An empty button list gets a default OK button.
    pub fn with_buttons(
        title: impl Into<String>,
        message: impl Into<String>,
        mut buttons: Vec<DialogButton>,
    ) -> Self {
        if buttons.is_empty() {
            buttons.push(DialogButton::new("OK", "ok").primary());
        }
        Self {
            title: title.into(),
            message: message.into(),
            buttons,
            config: DialogConfig::default(),
            hit_id: None,
        }
    }

    /// Set the dialog styling.
    #[must_use]
    pub fn config(mut self, config: DialogConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the hit id used for button hit regions.
    #[must_use]
    pub fn hit_id(mut self, id: HitId) -> Self {
        self.hit_id = Some(id);
        self
    }

    /// The button row.
    #[must_use]
    pub fn buttons(&self) -> &[DialogButton] {
        &self.buttons
    }

    fn primary_index(&self) -> usize {
        self.buttons.iter().position(|b| b.primary).unwrap_or(0)
    }

    fn activate(&self, index: usize, state: &mut DialogState) -> Option<DialogResult> {
        let button = self.buttons.get(index)?;
        let result = match button.id.as_str() {
            "ok" => DialogResult::Ok,
            "cancel" => DialogResult::Cancel,
            other => DialogResult::Custom(other.to_owned()),
        };
        state.close(result.clone());
        Some(result)
    }

    fn cycle(&self, state: &mut DialogState, forward: bool) {
        let len = self.buttons.len();
        state.focused_button = Some(match state.focused_button {
            Some(i) if forward => (i + 1) % len,
            Some(i) => (i + len - 1) % len,
            None => self.primary_index(),
        });
    }

    /// Handle an event against the dialog state.
    ///
    /// `hit` is the hit-test result for mouse events (from the last rendered
    /// frame). Returns the dialog result when the interaction finishes the
    /// dialog; the state is closed with the same result.
    pub fn handle_event(
        &self,
        event: &Event,
        hit: Option<(HitId, HitRegion, u64)>,
        state: &mut DialogState,
    ) -> Option<DialogResult> {
        if !state.open {
            return None;
        }

        match event {
            Event::Key(key) if key.is_press() => match key.code {
                KeyCode::Escape => {
                    state.close(DialogResult::Dismissed);
                    Some(DialogResult::Dismissed)
                }
                KeyCode::Tab => {
                    self.cycle(state, !key.modifiers.contains(Modifiers::SHIFT));
                    None
                }
                KeyCode::Right => {
                    self.cycle(state, true);
                    None
                }
                KeyCode::Left => {
                    self.cycle(state, false);
                    None
                }
                KeyCode::Enter => {
                    let index = state.focused_button.unwrap_or_else(|| self.primary_index());
                    self.activate(index, state)
                }
                _ => None,
            },
            Event::Mouse(mouse) if mouse.kind == MouseEventKind::Down(MouseButton::Left) => {
                if let (Some((id, region, data)), Some(expected)) = (hit, self.hit_id)
                    && id == expected
                    && region == DIALOG_HIT_BUTTON
                {
                    return self.activate(data as usize, state);
                }
                None
            }
            _ => None,
        }
    }

    fn render_border(&self, area: Rect, frame: &mut Frame) {
        let (right, bottom) = (area.right() - 1, area.bottom() - 1);
        for x in area.x..=right {
            let (top_ch, bottom_ch) = if x == area.x {
                ('┌', '└')
            } else if x == right {
                ('┐', '┘')
            } else {
                ('─', '─')
            };
            self.put(frame, x, area.y, top_ch);
            self.put(frame, x, bottom, bottom_ch);
        }
        for y in (area.y + 1)..bottom {
            self.put(frame, area.x, y, '│');
            self.put(frame, right, y, '│');
        }
    }

    fn put(&self, frame: &mut Frame, x: u16, y: u16, ch: char) {
        if let Some(cell) = frame.buffer.get_mut(x, y) {
            cell.ch = ch;
            crate::apply_style(cell, self.config.border_style);
        }
    }
}

impl StatefulWidget for Dialog {
    type State = DialogState;

    fn render(&self, area: Rect, frame: &mut Frame, state: &mut DialogState) {
        if !state.open || area.is_empty() {
            return;
        }

        set_style_area(&mut frame.buffer, area, self.config.dialog_style);

        let inner = if area.width >= 3 && area.height >= 3 {
            self.render_border(area, frame);
            Rect::new(area.x + 1, area.y + 1, area.width - 2, area.height - 2)
        } else {
            area
        };
        if inner.is_empty() {
            return;
        }

        // Title, centered.
        if !self.title.is_empty() {
            let title = truncate_to_width(&self.title, usize::from(inner.width));
            let width = unicode_width::UnicodeWidthStr::width(title.as_str()) as u16;
            let x = inner.x + (inner.width.saturating_sub(width)) / 2;
            draw_text(frame, x, inner.y, &title, self.config.title_style, inner.right());
        }

        // Message lines below a blank spacer row, stopping above the
        // button row.
        let button_row = inner.bottom() - 1;
        let mut y = inner.y + 2;
        for line in self.message.lines() {
            if y >= button_row {
                break;
            }
            let line = truncate_to_width(line, usize::from(inner.width));
            draw_text(frame, inner.x, y, &line, self.config.message_style, inner.right());
            y += 1;
        }

        // Button row, centered.
        let total: usize = self
            .buttons
            .iter()
            .map(DialogButton::display_width)
            .sum::<usize>()
            + 2 * (self.buttons.len() - 1);
        let mut x = if total as u16 >= inner.width {
            inner.x
        } else {
            inner.x + (inner.width - total as u16) / 2
        };

        for (index, button) in self.buttons.iter().enumerate() {
            let style = if state.focused_button == Some(index) {
                self.config.focused_button_style
            } else if button.primary {
                self.config.primary_button_style
            } else {
                self.config.button_style
            };
            let end = draw_text(frame, x, button_row, &button.text(), style, inner.right());
            if let Some(hit_id) = self.hit_id
                && end > x
            {
                frame.register_hit(
                    Rect::new(x, button_row, end - x, 1),
                    hit_id,
                    DIALOG_HIT_BUTTON,
                    index as u64,
                );
            }
            x = end + 2;
            if x >= inner.right() {
                break;
            }
        }
    }
}
