#![forbid(unsafe_code)]

//! Cell buffer and frame the widgets render into.
//!
//! A [`Frame`] owns a [`Buffer`] of styled cells plus an optional hit grid.
//! The hit grid records which logical region occupies each cell so callers
//! can route mouse events (backdrop vs content vs a specific button)
//! without re-deriving layout.

use scrim_core::geometry::Rect;
use scrim_style::{Rgba, StyleFlags};

/// A single styled cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub fg: Rgba,
    pub bg: Rgba,
    pub attrs: StyleFlags,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            fg: Rgba::WHITE,
            bg: Rgba::TRANSPARENT,
            attrs: StyleFlags::empty(),
        }
    }
}

impl Cell {
    /// A default-styled cell holding `ch`.
    #[must_use]
    pub fn from_char(ch: char) -> Self {
        Self {
            ch,
            ..Self::default()
        }
    }

    /// Whether the cell is indistinguishable from a freshly cleared one.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Row-major grid of cells.
#[derive(Debug, Clone)]
pub struct Buffer {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl Buffer {
    /// Create a cleared buffer.
    #[must_use]
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::default(); usize::from(width) * usize::from(height)],
        }
    }

    #[must_use]
    pub const fn width(&self) -> u16 {
        self.width
    }

    #[must_use]
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// The full buffer area as a rectangle at the origin.
    #[must_use]
    pub const fn area(&self) -> Rect {
        Rect::new(0, 0, self.width, self.height)
    }

    fn index(&self, x: u16, y: u16) -> Option<usize> {
        if x < self.width && y < self.height {
            Some(usize::from(y) * usize::from(self.width) + usize::from(x))
        } else {
            None
        }
    }

    /// The cell at `(x, y)`, if in bounds.
    #[must_use]
    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        self.index(x, y).map(|i| &self.cells[i])
    }

    /// Mutable access to the cell at `(x, y)`, if in bounds.
    pub fn get_mut(&mut self, x: u16, y: u16) -> Option<&mut Cell> {
        self.index(x, y).map(|i| &mut self.cells[i])
    }

    /// Write a cell, ignoring out-of-bounds coordinates.
    pub fn set(&mut self, x: u16, y: u16, cell: Cell) {
        if let Some(i) = self.index(x, y) {
            self.cells[i] = cell;
        }
    }

    /// Fill the intersection of `area` with the buffer.
    pub fn fill(&mut self, area: Rect, cell: Cell) {
        let right = area.right().min(self.width);
        let bottom = area.bottom().min(self.height);
        for y in area.y..bottom {
            for x in area.x..right {
                self.set(x, y, cell);
            }
        }
    }
}

/// Identifier tying hit regions back to the widget that registered them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HitId(u32);

impl HitId {
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }
}

/// Logical region tag within a widget's hit area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HitRegion {
    Content,
    Custom(u16),
}

#[derive(Debug, Clone, Copy)]
struct HitCell {
    id: HitId,
    region: HitRegion,
    data: u64,
}

/// Render destination: a buffer plus an optional hit grid.
#[derive(Debug)]
pub struct Frame {
    pub buffer: Buffer,
    hits: Option<Vec<Option<HitCell>>>,
}

impl Frame {
    /// Frame without hit testing.
    #[must_use]
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            buffer: Buffer::new(width, height),
            hits: None,
        }
    }

    /// Frame with an empty hit grid.
    #[must_use]
    pub fn with_hit_grid(width: u16, height: u16) -> Self {
        Self {
            buffer: Buffer::new(width, height),
            hits: Some(vec![None; usize::from(width) * usize::from(height)]),
        }
    }

    #[must_use]
    pub const fn width(&self) -> u16 {
        self.buffer.width()
    }

    #[must_use]
    pub const fn height(&self) -> u16 {
        self.buffer.height()
    }

    /// Tag every cell of `area` with `(id, region, data)`.
    ///
    /// Later registrations win; widgets register back-to-front (backdrop
    /// first, then content on top). A frame without a hit grid ignores this.
    pub fn register_hit(&mut self, area: Rect, id: HitId, region: HitRegion, data: u64) {
        let (width, height) = (self.buffer.width(), self.buffer.height());
        let Some(hits) = self.hits.as_mut() else {
            return;
        };
        let right = area.right().min(width);
        let bottom = area.bottom().min(height);
        for y in area.y..bottom {
            for x in area.x..right {
                hits[usize::from(y) * usize::from(width) + usize::from(x)] =
                    Some(HitCell { id, region, data });
            }
        }
    }

    /// The topmost hit registration at `(x, y)`.
    #[must_use]
    pub fn hit_test(&self, x: u16, y: u16) -> Option<(HitId, HitRegion, u64)> {
        let hits = self.hits.as_ref()?;
        if x >= self.buffer.width() || y >= self.buffer.height() {
            return None;
        }
        hits[usize::from(y) * usize::from(self.buffer.width()) + usize::from(x)]
            .map(|cell| (cell.id, cell.region, cell.data))
    }
}
