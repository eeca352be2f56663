//! Document State (the command receiver)
//!
//! [`DocumentState`] holds the editable content and its formatting attributes. It knows nothing
//! about commands, undo, or history: it only exposes primitive mutations and whole-state
//! snapshot/restore.
//!
//! # Coordinates
//!
//! All positions and lengths are counted in **characters** (Unicode scalar values), not bytes.
//!
//! # Bounds policy
//!
//! - Inserting or deleting at a `position` past the end of the content is rejected with
//!   [`CommandError::PositionOutOfRange`] and leaves the document untouched.
//! - Deleting more characters than are available truncates to the available length.
//! - A zero font size is rejected with [`CommandError::InvalidFontSize`].
//!
//! # Example
//!
//! ```rust
//! use command_core::{DocumentState, FontWeight};
//!
//! let mut doc = DocumentState::new();
//! doc.insert_text("hello", 0).unwrap();
//! doc.change_font_weight(FontWeight::Bold);
//!
//! let snapshot = doc.get_state();
//! assert_eq!(snapshot.content, "hello");
//! assert_eq!(snapshot.font_weight, FontWeight::Bold);
//! ```

use crate::commands::CommandError;
use ropey::Rope;
use serde::{Deserialize, Serialize};
use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;
use thiserror::Error;

/// Default font size in pixels.
pub const DEFAULT_FONT_SIZE: u32 = 16;

/// Font weight attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    /// Regular weight.
    #[default]
    Normal,
    /// Bold weight.
    Bold,
}

impl FontWeight {
    /// Lowercase name used in descriptions and serialized snapshots.
    pub fn as_str(self) -> &'static str {
        match self {
            FontWeight::Normal => "normal",
            FontWeight::Bold => "bold",
        }
    }
}

impl fmt::Display for FontWeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing a [`FontWeight`] from text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown font weight '{0}' (expected 'normal' or 'bold')")]
pub struct FontWeightParseError(pub String);

impl FromStr for FontWeight {
    type Err = FontWeightParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "normal" => Ok(FontWeight::Normal),
            "bold" => Ok(FontWeight::Bold),
            _ => Err(FontWeightParseError(s.to_string())),
        }
    }
}

/// A 24-bit RGB text color.
///
/// Renders as `#rrggbb` (lowercase) and parses from `#rrggbb`, `rrggbb` or the short `#rgb` form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TextColor {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl TextColor {
    /// Black, the default text color.
    pub const BLACK: TextColor = TextColor::new(0, 0, 0);

    /// Create a color from its channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Create a color from a packed `0xRRGGBB` value (upper byte ignored).
    pub const fn from_rgb(rgb: u32) -> Self {
        Self {
            r: ((rgb >> 16) & 0xff) as u8,
            g: ((rgb >> 8) & 0xff) as u8,
            b: (rgb & 0xff) as u8,
        }
    }

    /// Packed `0xRRGGBB` value.
    pub const fn to_rgb(self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }
}

impl Default for TextColor {
    fn default() -> Self {
        Self::BLACK
    }
}

impl fmt::Display for TextColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Error returned when parsing a [`TextColor`] from text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid color '{0}' (expected #rrggbb or #rgb)")]
pub struct ColorParseError(pub String);

impl FromStr for TextColor {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let hex = trimmed.strip_prefix('#').unwrap_or(trimmed);
        if !hex.chars().all(|ch| ch.is_ascii_hexdigit()) {
            return Err(ColorParseError(s.to_string()));
        }

        let rgb = match hex.len() {
            6 => u32::from_str_radix(hex, 16).map_err(|_| ColorParseError(s.to_string()))?,
            3 => {
                // #abc expands to #aabbcc
                let mut packed = 0u32;
                for ch in hex.chars() {
                    let nibble = ch.to_digit(16).ok_or_else(|| ColorParseError(s.to_string()))?;
                    packed = (packed << 8) | (nibble << 4 | nibble);
                }
                packed
            }
            _ => return Err(ColorParseError(s.to_string())),
        };

        Ok(TextColor::from_rgb(rgb))
    }
}

impl TryFrom<String> for TextColor {
    type Error = ColorParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TextColor> for String {
    fn from(color: TextColor) -> Self {
        color.to_string()
    }
}

/// Immutable copy of every [`DocumentState`] field.
///
/// Serialized with camelCase keys (`content`, `fontSize`, `fontWeight`, `textColor`).
/// A missing `textColor` deserializes to [`TextColor::BLACK`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentSnapshot {
    /// Document text.
    #[serde(default)]
    pub content: String,
    /// Font size in pixels.
    #[serde(default = "default_font_size")]
    pub font_size: u32,
    /// Font weight.
    #[serde(default)]
    pub font_weight: FontWeight,
    /// Text color.
    #[serde(default)]
    pub text_color: TextColor,
}

fn default_font_size() -> u32 {
    DEFAULT_FONT_SIZE
}

impl Default for DocumentSnapshot {
    fn default() -> Self {
        Self {
            content: String::new(),
            font_size: DEFAULT_FONT_SIZE,
            font_weight: FontWeight::Normal,
            text_color: TextColor::BLACK,
        }
    }
}

/// Editable document: content plus formatting attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentState {
    content: Rope,
    font_size: u32,
    font_weight: FontWeight,
    text_color: TextColor,
}

impl DocumentState {
    /// Create an empty document with default formatting.
    pub fn new() -> Self {
        Self {
            content: Rope::new(),
            font_size: DEFAULT_FONT_SIZE,
            font_weight: FontWeight::Normal,
            text_color: TextColor::BLACK,
        }
    }

    /// Create a document from a snapshot.
    pub fn from_snapshot(snapshot: &DocumentSnapshot) -> Result<Self, CommandError> {
        let mut doc = Self::new();
        doc.set_state(snapshot)?;
        Ok(doc)
    }

    /// Document text.
    pub fn content(&self) -> String {
        self.content.to_string()
    }

    /// Length of the content in characters.
    pub fn char_len(&self) -> usize {
        self.content.len_chars()
    }

    /// Font size in pixels.
    pub fn font_size(&self) -> u32 {
        self.font_size
    }

    /// Font weight.
    pub fn font_weight(&self) -> FontWeight {
        self.font_weight
    }

    /// Text color.
    pub fn text_color(&self) -> TextColor {
        self.text_color
    }

    /// Splice `text` into the content at character `position`.
    pub fn insert_text(&mut self, text: &str, position: usize) -> Result<(), CommandError> {
        self.check_position(position)?;
        self.content.insert(position, text);
        Ok(())
    }

    /// Remove up to `length` characters starting at `position` and return the removed text.
    ///
    /// A range running past the end is truncated to the available characters.
    pub fn delete_text(&mut self, position: usize, length: usize) -> Result<String, CommandError> {
        self.check_position(position)?;
        let end = position.saturating_add(length).min(self.char_len());
        let removed = self.content.slice(position..end).to_string();
        self.content.remove(position..end);
        Ok(removed)
    }

    /// Set the font size. Zero is rejected.
    pub fn change_font_size(&mut self, size: u32) -> Result<(), CommandError> {
        if size == 0 {
            return Err(CommandError::InvalidFontSize(size));
        }
        self.font_size = size;
        Ok(())
    }

    /// Set the font weight.
    pub fn change_font_weight(&mut self, weight: FontWeight) {
        self.font_weight = weight;
    }

    /// Set the text color.
    pub fn change_text_color(&mut self, color: TextColor) {
        self.text_color = color;
    }

    /// Take a snapshot of every field.
    pub fn get_state(&self) -> DocumentSnapshot {
        DocumentSnapshot {
            content: self.content(),
            font_size: self.font_size,
            font_weight: self.font_weight,
            text_color: self.text_color,
        }
    }

    /// Overwrite every field from `snapshot`.
    ///
    /// A snapshot with a zero font size is rejected and the document is left untouched.
    pub fn set_state(&mut self, snapshot: &DocumentSnapshot) -> Result<(), CommandError> {
        if snapshot.font_size == 0 {
            return Err(CommandError::InvalidFontSize(snapshot.font_size));
        }
        self.content = Rope::from_str(&snapshot.content);
        self.font_size = snapshot.font_size;
        self.font_weight = snapshot.font_weight;
        self.text_color = snapshot.text_color;
        Ok(())
    }

    fn check_position(&self, position: usize) -> Result<(), CommandError> {
        let len = self.char_len();
        if position > len {
            return Err(CommandError::PositionOutOfRange { position, len });
        }
        Ok(())
    }
}

impl Default for DocumentState {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared, non-owning access to a [`DocumentState`].
///
/// The session owns the document; commands hold clones of the handle for as long as they live
/// in the history. Single-threaded by construction (`!Send`).
#[derive(Debug, Clone, Default)]
pub struct DocumentHandle(Rc<RefCell<DocumentState>>);

impl DocumentHandle {
    /// Wrap a document in a new handle.
    pub fn new(document: DocumentState) -> Self {
        Self(Rc::new(RefCell::new(document)))
    }

    /// Borrow the document for reading.
    ///
    /// Panics if the document is currently borrowed mutably (a command re-entering itself).
    pub fn borrow(&self) -> Ref<'_, DocumentState> {
        self.0.borrow()
    }

    /// Borrow the document for mutation.
    ///
    /// Panics if the document is currently borrowed.
    pub fn borrow_mut(&self) -> RefMut<'_, DocumentState> {
        self.0.borrow_mut()
    }

    /// Snapshot of the current document.
    pub fn snapshot(&self) -> DocumentSnapshot {
        self.borrow().get_state()
    }

    /// Whether two handles point at the same document.
    pub fn ptr_eq(&self, other: &DocumentHandle) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}
