#![forbid(unsafe_code)]

//! One-shot stylesheet loading.
//!
//! A [`StyleSheet`] maps selector strings to [`Style`]s, parsed from a
//! minimal text form:
//!
//! ```text
//! dialog { fg: white; bg: #1e1e2e; }
//! backdrop {
//!     bg: #00000099;
//! }
//! button.primary { bold: true; }
//! ```
//!
//! Recognized properties: `fg`, `bg` (hex `#rrggbb`/`#rrggbbaa` or a named
//! color) and the boolean flags `bold`, `italic`, `underline`, `reverse`,
//! `dim`. Unknown properties are logged and skipped; malformed syntax and
//! unparsable values are errors. Later rules for the same selector override
//! earlier ones (last write wins, logged).

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::color::Rgba;
use crate::style::{Style, StyleFlags};

/// Errors from stylesheet loading.
#[derive(Debug)]
pub enum SheetError {
    /// The file could not be read.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The text does not follow the `selector { property: value; }` shape.
    Syntax { line: usize, message: String },
    /// A property value could not be parsed.
    InvalidValue {
        line: usize,
        property: String,
        value: String,
    },
}

impl fmt::Display for SheetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "cannot read stylesheet {}: {source}", path.display())
            }
            Self::Syntax { line, message } => write!(f, "syntax error on line {line}: {message}"),
            Self::InvalidValue {
                line,
                property,
                value,
            } => write!(f, "invalid value '{value}' for '{property}' on line {line}"),
        }
    }
}

impl std::error::Error for SheetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Named style rules.
#[derive(Debug, Clone, Default)]
pub struct StyleSheet {
    rules: HashMap<String, Style, ahash::RandomState>,
}

impl StyleSheet {
    /// Create an empty sheet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Read `path` and parse its contents.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SheetError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| SheetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
    }

    /// Parse stylesheet text.
    pub fn parse(text: &str) -> Result<Self, SheetError> {
        let mut sheet = Self::new();
        let mut open_rule: Option<(String, Style)> = None;
        let mut last_line = 0;

        for (index, raw_line) in text.lines().enumerate() {
            let line = index + 1;
            last_line = line;
            let trimmed = raw_line.trim();
            if trimmed.is_empty() {
                continue;
            }

            match open_rule.take() {
                None => {
                    let Some((selector, rest)) = trimmed.split_once('{') else {
                        return Err(SheetError::Syntax {
                            line,
                            message: "expected `selector {`".into(),
                        });
                    };
                    let selector = selector.trim();
                    if selector.is_empty() {
                        return Err(SheetError::Syntax {
                            line,
                            message: "empty selector".into(),
                        });
                    }
                    let mut style = Style::new();
                    if let Some((body, tail)) = rest.split_once('}') {
                        reject_trailing(tail, line)?;
                        parse_declarations(body, line, &mut style)?;
                        sheet.insert(selector, style);
                    } else {
                        parse_declarations(rest, line, &mut style)?;
                        open_rule = Some((selector.to_owned(), style));
                    }
                }
                Some((selector, mut style)) => {
                    if let Some((body, tail)) = trimmed.split_once('}') {
                        reject_trailing(tail, line)?;
                        parse_declarations(body, line, &mut style)?;
                        sheet.insert(selector, style);
                    } else {
                        parse_declarations(trimmed, line, &mut style)?;
                        open_rule = Some((selector, style));
                    }
                }
            }
        }

        if open_rule.is_some() {
            return Err(SheetError::Syntax {
                line: last_line,
                message: "unterminated rule (missing `}`)".into(),
            });
        }
        Ok(sheet)
    }

    /// Insert a rule, overriding any previous rule for the selector.
    pub fn insert(&mut self, selector: impl Into<String>, style: Style) {
        let selector = selector.into();
        if self.rules.insert(selector.clone(), style).is_some() {
            tracing::debug!(selector = %selector, "stylesheet rule overridden");
        }
    }

    /// The style for `selector`, if a rule exists.
    #[must_use]
    pub fn get(&self, selector: &str) -> Option<&Style> {
        self.rules.get(selector)
    }

    /// The style for `selector`, or the empty style.
    #[must_use]
    pub fn style(&self, selector: &str) -> Style {
        self.rules.get(selector).copied().unwrap_or_default()
    }

    /// Number of rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the sheet has no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Iterate over the selectors with rules.
    pub fn selectors(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(String::as_str)
    }
}

fn reject_trailing(tail: &str, line: usize) -> Result<(), SheetError> {
    if tail.trim().is_empty() {
        Ok(())
    } else {
        Err(SheetError::Syntax {
            line,
            message: "unexpected input after `}`".into(),
        })
    }
}

fn parse_declarations(body: &str, line: usize, style: &mut Style) -> Result<(), SheetError> {
    for declaration in body.split(';') {
        let declaration = declaration.trim();
        if declaration.is_empty() {
            continue;
        }
        let Some((property, value)) = declaration.split_once(':') else {
            return Err(SheetError::Syntax {
                line,
                message: format!("expected `property: value` in '{declaration}'"),
            });
        };
        let property = property.trim();
        let value = value.trim();
        match property {
            "fg" => style.fg = Some(parse_color(value, line, property)?),
            "bg" => style.bg = Some(parse_color(value, line, property)?),
            "bold" => set_flag(style, StyleFlags::BOLD, value, line, property)?,
            "italic" => set_flag(style, StyleFlags::ITALIC, value, line, property)?,
            "underline" => set_flag(style, StyleFlags::UNDERLINE, value, line, property)?,
            "reverse" => set_flag(style, StyleFlags::REVERSE, value, line, property)?,
            "dim" => set_flag(style, StyleFlags::DIM, value, line, property)?,
            unknown => {
                tracing::warn!(property = unknown, line, "unknown stylesheet property");
            }
        }
    }
    Ok(())
}

fn parse_color(value: &str, line: usize, property: &str) -> Result<Rgba, SheetError> {
    Rgba::from_hex(value)
        .or_else(|| Rgba::named(value))
        .ok_or_else(|| SheetError::InvalidValue {
            line,
            property: property.to_owned(),
            value: value.to_owned(),
        })
}

fn set_flag(
    style: &mut Style,
    flag: StyleFlags,
    value: &str,
    line: usize,
    property: &str,
) -> Result<(), SheetError> {
    let on = match value {
        "true" => true,
        "false" => false,
        _ => {
            return Err(SheetError::InvalidValue {
                line,
                property: property.to_owned(),
                value: value.to_owned(),
            });
        }
    };
    let mut attrs = style.attrs.unwrap_or_default();
    attrs.set(flag, on);
    style.attrs = Some(attrs);
    Ok(())
}
