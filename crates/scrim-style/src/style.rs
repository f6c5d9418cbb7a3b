#![forbid(unsafe_code)]

//! Text style with cascading merge semantics.

use bitflags::bitflags;

use crate::color::Rgba;

bitflags! {
    /// Text attribute flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct StyleFlags: u8 {
        const BOLD = 1 << 0;
        const ITALIC = 1 << 1;
        const UNDERLINE = 1 << 2;
        const REVERSE = 1 << 3;
        const DIM = 1 << 4;
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for StyleFlags {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.bits())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for StyleFlags {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let bits = u8::deserialize(deserializer)?;
        Ok(Self::from_bits_truncate(bits))
    }
}

/// A partial style: unset fields inherit from whatever is underneath.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Style {
    pub fg: Option<Rgba>,
    pub bg: Option<Rgba>,
    pub attrs: Option<StyleFlags>,
}

impl Style {
    /// An empty style (inherits everything).
    #[must_use]
    pub const fn new() -> Self {
        Self {
            fg: None,
            bg: None,
            attrs: None,
        }
    }

    /// Set the foreground color.
    #[must_use]
    pub const fn fg(mut self, color: Rgba) -> Self {
        self.fg = Some(color);
        self
    }

    /// Set the background color.
    #[must_use]
    pub const fn bg(mut self, color: Rgba) -> Self {
        self.bg = Some(color);
        self
    }

    /// Set the attribute flags wholesale.
    #[must_use]
    pub const fn attrs(mut self, attrs: StyleFlags) -> Self {
        self.attrs = Some(attrs);
        self
    }

    #[must_use]
    pub fn bold(self) -> Self {
        self.with_flag(StyleFlags::BOLD)
    }

    #[must_use]
    pub fn italic(self) -> Self {
        self.with_flag(StyleFlags::ITALIC)
    }

    #[must_use]
    pub fn underline(self) -> Self {
        self.with_flag(StyleFlags::UNDERLINE)
    }

    #[must_use]
    pub fn reverse(self) -> Self {
        self.with_flag(StyleFlags::REVERSE)
    }

    #[must_use]
    pub fn dim(self) -> Self {
        self.with_flag(StyleFlags::DIM)
    }

    fn with_flag(mut self, flag: StyleFlags) -> Self {
        self.attrs = Some(self.attrs.unwrap_or_default() | flag);
        self
    }

    /// Whether every field is unset.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.fg.is_none() && self.bg.is_none() && self.attrs.is_none()
    }

    /// Cascade `over` on top of `self`: set colors in `over` win, attribute
    /// flags are unioned.
    #[must_use]
    pub fn merge(self, over: Self) -> Self {
        Self {
            fg: over.fg.or(self.fg),
            bg: over.bg.or(self.bg),
            attrs: match (self.attrs, over.attrs) {
                (Some(base), Some(top)) => Some(base | top),
                (base, top) => top.or(base),
            },
        }
    }
}
