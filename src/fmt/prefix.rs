//! Line prefix builder.
//!
//! Sections appear in a fixed order, each gated by its flag: wall-clock
//! timestamp, epoch milliseconds, bracketed level tag, bracketed caller
//! chain. With [`Flag::Colorize`] the sections before the caller chain are
//! wrapped in the level's header style; the caller chain stays plain.

use super::color::header_style;
use crate::flag::{Flag, FlagSet};
use crate::level::Level;
use crate::tag::TagRegistry;
use chrono::{DateTime, Local};
use std::fmt::Write;

const TIME_LAYOUT: &str = "%Y/%m/%d %H:%M:%S%.3f";

/// Builds the prefix for a record at the current wall-clock time.
#[must_use]
pub fn prefix(flags: FlagSet, level: Level, tags: &TagRegistry, caller: Option<&str>) -> String {
    prefix_at(Local::now(), flags, level, tags, caller)
}

/// Builds the prefix for a record at a given instant.
///
/// Deterministic for a fixed `now`; there is no hidden formatting state
/// besides the shared tag registry.
#[must_use]
pub fn prefix_at(
    now: DateTime<Local>,
    flags: FlagSet,
    level: Level,
    tags: &TagRegistry,
    caller: Option<&str>,
) -> String {
    let mut head = String::new();
    if flags.contains(Flag::ShowTime) {
        let _ = write!(head, "{} ", now.format(TIME_LAYOUT));
    }
    if flags.contains(Flag::ShowTimestampMillis) {
        let _ = write!(head, "{} ", now.timestamp_millis());
    }
    if flags.contains(Flag::ShowLevelTag) {
        let _ = write!(head, "[{}] ", tags.get(level));
    }

    let mut out = if flags.contains(Flag::Colorize) && !head.is_empty() {
        let mut painted = header_style(level).paint(head.trim_end());
        painted.push(' ');
        painted
    } else {
        head
    };

    if let Some(chain) = caller {
        let _ = write!(out, "[{chain}] ");
    }

    if flags.contains(Flag::TrailingBlankLine) {
        out.push('\n');
    }
    out
}
