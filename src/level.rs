//! Log levels and the enabled-level bitmask.

use std::fmt;
use std::ops::{BitOr, BitOrAssign, Sub};
use std::str::FromStr;

/// Log severity levels.
///
/// Each level occupies a distinct bit so that arbitrary combinations can be
/// enabled at once; membership testing is a single AND.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Level {
    /// Unrecoverable error; logging it terminates the process.
    Fatal = 1 << 0,
    /// Unrecoverable error; logging it unwinds with the message as payload.
    Panic = 1 << 1,
    /// Plain output, no severity connotation.
    Print = 1 << 2,
    /// Informational messages.
    Info = 1 << 3,
    /// Warning messages.
    Warn = 1 << 4,
    /// Error messages.
    Error = 1 << 5,
    /// Debugging information.
    Debug = 1 << 6,
    /// Message accompanied by a caller chain.
    Stack = 1 << 7,
}

impl Level {
    /// Returns the level's bit.
    #[must_use]
    pub const fn mask(self) -> u8 {
        self as u8
    }

    /// Returns the bit position, usable as a dense array index.
    #[must_use]
    pub const fn index(self) -> usize {
        (self as u8).trailing_zeros() as usize
    }

    /// Returns the canonical lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fatal => "fatal",
            Self::Panic => "panic",
            Self::Print => "print",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
            Self::Debug => "debug",
            Self::Stack => "stack",
        }
    }

    /// Returns the default one-letter tag.
    #[must_use]
    pub const fn default_tag(self) -> &'static str {
        match self {
            Self::Fatal => "F",
            Self::Panic => "P",
            Self::Print => "R",
            Self::Info => "I",
            Self::Warn => "W",
            Self::Error => "E",
            Self::Debug => "D",
            Self::Stack => "S",
        }
    }

    /// Returns all levels.
    #[must_use]
    pub const fn all() -> [Self; 8] {
        [
            Self::Fatal,
            Self::Panic,
            Self::Print,
            Self::Info,
            Self::Warn,
            Self::Error,
            Self::Debug,
            Self::Stack,
        ]
    }

    /// True for the levels that carry a caller chain in their prefix.
    #[must_use]
    pub const fn wants_caller(self) -> bool {
        matches!(self, Self::Stack | Self::Fatal | Self::Panic)
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an invalid level string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseLevelError(String);

impl fmt::Display for ParseLevelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown log level: '{}'", self.0)
    }
}

impl std::error::Error for ParseLevelError {}

impl FromStr for Level {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fatal" => Ok(Self::Fatal),
            "panic" => Ok(Self::Panic),
            "print" => Ok(Self::Print),
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warn),
            "error" | "err" => Ok(Self::Error),
            "debug" => Ok(Self::Debug),
            "stack" => Ok(Self::Stack),
            _ => Err(ParseLevelError(s.to_string())),
        }
    }
}

/// A set of enabled levels, stored as a bitmask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct LevelSet(u8);

impl LevelSet {
    /// The empty set; every log call is a no-op.
    pub const EMPTY: Self = Self(0);
    /// All levels enabled.
    pub const ALL: Self = Self(u8::MAX);
    /// The levels whose records carry a caller chain.
    pub const CALLER: Self = Self(
        Level::Stack.mask() | Level::Fatal.mask() | Level::Panic.mask(),
    );

    /// Builds a set from raw bits.
    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    /// Returns the raw bits.
    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Membership test.
    #[must_use]
    pub const fn contains(self, level: Level) -> bool {
        self.0 & level.mask() != 0
    }

    /// True if any level of `other` is in this set.
    #[must_use]
    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    /// True if no level is enabled.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl From<Level> for LevelSet {
    fn from(level: Level) -> Self {
        Self(level.mask())
    }
}

impl BitOr for LevelSet {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOr<Level> for LevelSet {
    type Output = Self;
    fn bitor(self, rhs: Level) -> Self {
        Self(self.0 | rhs.mask())
    }
}

impl BitOr for Level {
    type Output = LevelSet;
    fn bitor(self, rhs: Self) -> LevelSet {
        LevelSet(self.mask() | rhs.mask())
    }
}

impl BitOr<LevelSet> for Level {
    type Output = LevelSet;
    fn bitor(self, rhs: LevelSet) -> LevelSet {
        LevelSet(self.mask() | rhs.0)
    }
}

impl BitOrAssign<Level> for LevelSet {
    fn bitor_assign(&mut self, rhs: Level) {
        self.0 |= rhs.mask();
    }
}

/// Removal, the `ALL - Level::Debug` idiom.
impl Sub<Level> for LevelSet {
    type Output = Self;
    fn sub(self, rhs: Level) -> Self {
        Self(self.0 & !rhs.mask())
    }
}

impl Sub for LevelSet {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self(self.0 & !rhs.0)
    }
}

impl FromIterator<Level> for LevelSet {
    fn from_iter<I: IntoIterator<Item = Level>>(iter: I) -> Self {
        iter.into_iter().fold(Self::EMPTY, |set, lv| set | lv)
    }
}
