//! Output decoration flags and the active-flag bitmask.

use std::ops::{BitOr, BitOrAssign, Sub};

/// Output decorations a logger can enable independently of levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Flag {
    /// Wall-clock timestamp, millisecond precision.
    ShowTime = 1 << 0,
    /// Integer milliseconds since the Unix epoch.
    ShowTimestampMillis = 1 << 1,
    /// Bracketed one-letter level tag, e.g. `[E]`.
    ShowLevelTag = 1 << 2,
    /// Caller chain with basename-only file names.
    ShowShortCallerFile = 1 << 3,
    /// Caller chain with paths relative to the working directory.
    ShowLongCallerFile = 1 << 4,
    /// Blank line between the prefix and the message body.
    TrailingBlankLine = 1 << 5,
    /// ANSI color for prefix and message body.
    Colorize = 1 << 6,
}

impl Flag {
    /// Returns the flag's bit.
    #[must_use]
    pub const fn mask(self) -> u8 {
        self as u8
    }

    /// Returns all flags.
    #[must_use]
    pub const fn all() -> [Self; 7] {
        [
            Self::ShowTime,
            Self::ShowTimestampMillis,
            Self::ShowLevelTag,
            Self::ShowShortCallerFile,
            Self::ShowLongCallerFile,
            Self::TrailingBlankLine,
            Self::Colorize,
        ]
    }
}

/// A set of active decoration flags, stored as a bitmask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FlagSet(u8);

impl FlagSet {
    /// No decorations; records are the bare message plus newline.
    pub const EMPTY: Self = Self(0);
    /// All decorations.
    pub const ALL: Self = Self(0x7f);
    /// The two caller-file flags.
    pub const CALLER_FILE: Self =
        Self(Flag::ShowShortCallerFile.mask() | Flag::ShowLongCallerFile.mask());

    /// Builds a set from raw bits.
    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits & Self::ALL.0)
    }

    /// Returns the raw bits.
    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Membership test.
    #[must_use]
    pub const fn contains(self, flag: Flag) -> bool {
        self.0 & flag.mask() != 0
    }

    /// True if any flag of `other` is in this set.
    #[must_use]
    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }
}

impl From<Flag> for FlagSet {
    fn from(flag: Flag) -> Self {
        Self(flag.mask())
    }
}

impl BitOr for FlagSet {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOr<Flag> for FlagSet {
    type Output = Self;
    fn bitor(self, rhs: Flag) -> Self {
        Self(self.0 | rhs.mask())
    }
}

impl BitOr for Flag {
    type Output = FlagSet;
    fn bitor(self, rhs: Self) -> FlagSet {
        FlagSet(self.mask() | rhs.mask())
    }
}

impl BitOr<FlagSet> for Flag {
    type Output = FlagSet;
    fn bitor(self, rhs: FlagSet) -> FlagSet {
        FlagSet(self.mask() | rhs.0)
    }
}

impl BitOrAssign<Flag> for FlagSet {
    fn bitor_assign(&mut self, rhs: Flag) {
        self.0 |= rhs.mask();
    }
}

/// Removal, the `ALL - Flag::Colorize` idiom.
impl Sub<Flag> for FlagSet {
    type Output = Self;
    fn sub(self, rhs: Flag) -> Self {
        Self(self.0 & !rhs.mask())
    }
}

impl Sub for FlagSet {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self(self.0 & !rhs.0)
    }
}

impl FromIterator<Flag> for FlagSet {
    fn from_iter<I: IntoIterator<Item = Flag>>(iter: I) -> Self {
        iter.into_iter().fold(Self::EMPTY, |set, f| set | f)
    }
}
