//! ANSI color handling and per-level styles.

use crate::level::Level;
use std::fmt;

/// RGB color for 24-bit true color terminal output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    /// ANSI reset sequence.
    pub const RESET: &'static str = "\x1b[0m";

    /// Creates a new color from RGB values.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Creates a color from a hex string, 3 or 6 digits, `#` optional.
    ///
    /// Returns white for invalid input.
    #[must_use]
    pub const fn from_hex(hex: &str) -> Self {
        let bytes = hex.as_bytes();
        let start = if !bytes.is_empty() && bytes[0] == b'#' {
            1
        } else {
            0
        };
        match bytes.len() - start {
            3 => {
                let r = hex_digit(bytes[start]);
                let g = hex_digit(bytes[start + 1]);
                let b = hex_digit(bytes[start + 2]);
                match (r, g, b) {
                    (Some(r), Some(g), Some(b)) => Self::new(r * 17, g * 17, b * 17),
                    _ => Self::white(),
                }
            }
            6 => {
                let r = hex_pair(bytes[start], bytes[start + 1]);
                let g = hex_pair(bytes[start + 2], bytes[start + 3]);
                let b = hex_pair(bytes[start + 4], bytes[start + 5]);
                match (r, g, b) {
                    (Some(r), Some(g), Some(b)) => Self::new(r, g, b),
                    _ => Self::white(),
                }
            }
            _ => Self::white(),
        }
    }

    /// Returns the ANSI escape sequence for foreground color.
    #[must_use]
    pub fn fg_ansi(self) -> String {
        format!("\x1b[38;2;{};{};{}m", self.r, self.g, self.b)
    }

    /// Returns the ANSI escape sequence for background color.
    #[must_use]
    pub fn bg_ansi(self) -> String {
        format!("\x1b[48;2;{};{};{}m", self.r, self.g, self.b)
    }

    #[must_use]
    pub const fn white() -> Self {
        Self::new(255, 255, 255)
    }
}

const fn hex_digit(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

const fn hex_pair(hi: u8, lo: u8) -> Option<u8> {
    match (hex_digit(hi), hex_digit(lo)) {
        (Some(hi), Some(lo)) => Some(hi * 16 + lo),
        _ => None,
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// A terminal text style: colors plus bold/blink attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Style {
    pub fg: Option<Color>,
    pub bg: Option<Color>,
    pub bold: bool,
    pub blink: bool,
}

impl Style {
    /// Builds a style from hex color strings; an empty string means unset.
    #[must_use]
    pub const fn from_hex(bg: &str, fg: &str, bold: bool, blink: bool) -> Self {
        Self {
            fg: if fg.is_empty() {
                None
            } else {
                Some(Color::from_hex(fg))
            },
            bg: if bg.is_empty() {
                None
            } else {
                Some(Color::from_hex(bg))
            },
            bold,
            blink,
        }
    }

    /// Wraps `text` in the style's ANSI escape sequences.
    #[must_use]
    pub fn paint(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len() + 24);
        if let Some(bg) = self.bg {
            out.push_str(&bg.bg_ansi());
        }
        if let Some(fg) = self.fg {
            out.push_str(&fg.fg_ansi());
        }
        if self.bold {
            out.push_str("\x1b[1m");
        }
        if self.blink {
            out.push_str("\x1b[5m");
        }
        if out.is_empty() {
            return text.to_string();
        }
        out.push_str(text);
        out.push_str(Color::RESET);
        out
    }
}

// Header styles decorate the prefix, body styles the message; a level may
// look different in its tag than in its payload.
const fn styles(level: Level) -> (Style, Style) {
    match level {
        Level::Info => (
            Style::from_hex("", "#008000", true, false),
            Style::from_hex("", "#008000", false, false),
        ),
        Level::Warn => (
            Style::from_hex("", "#dbb400", true, false),
            Style::from_hex("", "#dbb400", false, false),
        ),
        Level::Error => (
            Style::from_hex("#f9ff83", "#f00", true, false),
            Style::from_hex("", "#f00", false, false),
        ),
        Level::Stack => (
            Style::from_hex("", "#008fb7", true, false),
            Style::from_hex("", "#008fb7", false, false),
        ),
        Level::Debug => (
            Style::from_hex("", "#7800b9", true, false),
            Style::from_hex("", "#7800b9", false, false),
        ),
        Level::Fatal => (
            Style::from_hex("#f00", "#fff", true, false),
            Style::from_hex("", "#f00", false, false),
        ),
        Level::Panic => (
            Style::from_hex("#f00", "#f00", true, false),
            Style::from_hex("", "#f00", false, false),
        ),
        Level::Print => (
            Style::from_hex("", "#0046ff", true, false),
            Style::from_hex("", "#0046ff", false, false),
        ),
    }
}

/// Style applied to a level's prefix.
#[must_use]
pub const fn header_style(level: Level) -> Style {
    styles(level).0
}

/// Style applied to a level's message body.
#[must_use]
pub const fn body_style(level: Level) -> Style {
    styles(level).1
}
