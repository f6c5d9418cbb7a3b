#![forbid(unsafe_code)]

//! Modal overlay widgets for Scrim.

pub mod focus;
pub mod frame;
pub mod modal;

pub use focus::{FocusId, FocusManager};
pub use frame::{Buffer, Cell, Frame, HitId, HitRegion};

use scrim_core::geometry::Rect;
use scrim_style::Style;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// A `Widget` is a renderable component.
pub trait Widget {
    /// Render the widget into the frame at the given area.
    fn render(&self, area: Rect, frame: &mut Frame);
}

/// A `StatefulWidget` is a widget that renders based on mutable state.
pub trait StatefulWidget {
    type State;

    /// Render the widget into the frame with mutable state.
    fn render(&self, area: Rect, frame: &mut Frame, state: &mut Self::State);
}

/// Apply a style to a cell, merging attribute flags.
pub(crate) fn apply_style(cell: &mut Cell, style: Style) {
    if let Some(fg) = style.fg {
        cell.fg = fg;
    }
    if let Some(bg) = style.bg {
        cell.bg = bg;
    }
    if let Some(attrs) = style.attrs {
        cell.attrs |= attrs;
    }
}

/// Apply a style to all cells in a rectangular area.
///
/// This modifies existing cells, preserving their content.
pub(crate) fn set_style_area(buffer: &mut Buffer, area: Rect, style: Style) {
    if style.is_empty() {
        return;
    }
    let right = area.right().min(buffer.width());
    let bottom = area.bottom().min(buffer.height());
    for y in area.y..bottom {
        for x in area.x..right {
            if let Some(cell) = buffer.get_mut(x, y) {
                apply_style(cell, style);
            }
        }
    }
}

/// Draw a text span into a frame at the given position.
///
/// Returns the x position after the last drawn column. Stops at `max_x`
/// (exclusive). Double-width graphemes occupy two columns; the second is a
/// styled continuation blank.
pub(crate) fn draw_text(
    frame: &mut Frame,
    mut x: u16,
    y: u16,
    content: &str,
    style: Style,
    max_x: u16,
) -> u16 {
    for grapheme in content.graphemes(true) {
        let w = UnicodeWidthStr::width(grapheme);
        if w == 0 {
            continue;
        }
        if x >= max_x || x + w as u16 > max_x {
            break;
        }
        let Some(ch) = grapheme.chars().next() else {
            continue;
        };

        let mut cell = Cell::from_char(ch);
        apply_style(&mut cell, style);
        frame.buffer.set(x, y, cell);

        if w == 2 {
            let mut pad = Cell::default();
            apply_style(&mut pad, style);
            frame.buffer.set(x + 1, y, pad);
        }
        x = x.saturating_add(w as u16);
    }
    x
}

/// Truncate `text` to at most `max` display columns, on grapheme
/// boundaries, appending `…` when anything was cut.
pub(crate) fn truncate_to_width(text: &str, max: usize) -> String {
    if UnicodeWidthStr::width(text) <= max {
        return text.to_owned();
    }
    if max == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for grapheme in text.graphemes(true) {
        let w = UnicodeWidthStr::width(grapheme);
        if used + w > max - 1 {
            break;
        }
        out.push_str(grapheme);
        used += w;
    }
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use scrim_style::Rgba;

    #[test]
    fn apply_style_sets_colors() {
        let mut cell = Cell::default();
        apply_style(
            &mut cell,
            Style::new().fg(Rgba::rgb(255, 0, 0)).bg(Rgba::rgb(0, 0, 255)),
        );
        assert_eq!(cell.fg, Rgba::rgb(255, 0, 0));
        assert_eq!(cell.bg, Rgba::rgb(0, 0, 255));
    }

    #[test]
    fn apply_style_preserves_content() {
        let mut cell = Cell::from_char('Z');
        apply_style(&mut cell, Style::new().fg(Rgba::rgb(1, 2, 3)));
        assert_eq!(cell.ch, 'Z');
    }

    #[test]
    fn apply_style_merges_flags() {
        use scrim_style::StyleFlags;
        let mut cell = Cell::default();
        cell.attrs = StyleFlags::BOLD;
        apply_style(&mut cell, Style::new().dim());
        assert_eq!(cell.attrs, StyleFlags::BOLD | StyleFlags::DIM);
    }

    #[test]
    fn set_style_area_applies_to_all_cells() {
        let mut buf = Buffer::new(3, 2);
        set_style_area(
            &mut buf,
            Rect::new(0, 0, 3, 2),
            Style::new().bg(Rgba::rgb(10, 20, 30)),
        );
        for y in 0..2 {
            for x in 0..3 {
                assert_eq!(buf.get(x, y).unwrap().bg, Rgba::rgb(10, 20, 30));
            }
        }
    }

    #[test]
    fn set_style_area_empty_style_is_noop() {
        let mut buf = Buffer::new(3, 3);
        buf.set(0, 0, Cell::from_char('A'));
        set_style_area(&mut buf, Rect::new(0, 0, 3, 3), Style::default());
        assert_eq!(buf.get(0, 0).unwrap().ch, 'A');
        assert_eq!(buf.get(0, 0).unwrap().fg, Cell::default().fg);
    }

    #[test]
    fn draw_text_basic() {
        let mut frame = Frame::new(10, 1);
        let end_x = draw_text(&mut frame, 0, 0, "ABC", Style::default(), 10);
        assert_eq!(end_x, 3);
        assert_eq!(frame.buffer.get(0, 0).unwrap().ch, 'A');
        assert_eq!(frame.buffer.get(2, 0).unwrap().ch, 'C');
    }

    #[test]
    fn draw_text_clipped_at_max_x() {
        let mut frame = Frame::new(10, 1);
        let end_x = draw_text(&mut frame, 0, 0, "ABCDEF", Style::default(), 3);
        assert_eq!(end_x, 3);
        assert!(frame.buffer.get(3, 0).unwrap().is_empty());
    }

    #[test]
    fn draw_text_wide_grapheme_pads() {
        let mut frame = Frame::new(10, 1);
        let end_x = draw_text(&mut frame, 0, 0, "漢x", Style::default(), 10);
        assert_eq!(end_x, 3);
        assert_eq!(frame.buffer.get(0, 0).unwrap().ch, '漢');
        assert_eq!(frame.buffer.get(2, 0).unwrap().ch, 'x');
    }

    #[test]
    fn truncate_short_text_unchanged() {
        assert_eq!(truncate_to_width("hello", 10), "hello");
    }

    #[test]
    fn truncate_adds_ellipsis() {
        let out = truncate_to_width("hello world", 6);
        assert!(out.ends_with('…'));
        assert!(UnicodeWidthStr::width(out.as_str()) <= 6);
    }

    #[test]
    fn truncate_zero_width() {
        assert_eq!(truncate_to_width("hello", 0), "");
    }
}
