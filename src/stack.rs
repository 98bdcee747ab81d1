//! Caller-stack capture.
//!
//! Walks the symbolized call stack and renders an ordered `file:line` chain
//! for the record prefix. The walk is anchored past this crate's own frames,
//! so a caller only ever sees its side of the call; the `skip` parameter
//! drops additional caller frames on top of that baseline.

use std::env;
use std::path::Path;

/// Separator between frames in a rendered chain.
pub const CHAIN_SEPARATOR: &str = " <- ";

/// A single `file:line` caller location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameLoc {
    /// Source file path as reported by debug info, separators normalized.
    pub file: String,
    /// Line number.
    pub line: u32,
}

/// How file names are rendered in a chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStyle {
    /// Basename only.
    Short,
    /// Path relative to the process working directory.
    Long,
}

/// Captures caller frames, skipping `skip` frames past the baseline.
///
/// The walk stops at runtime-internal frames (std/core/test harness) or when
/// no more frames resolve to a source location.
#[must_use]
pub fn capture(skip: usize) -> Vec<FrameLoc> {
    let mut frames = Vec::new();
    let mut in_preamble = true;
    let mut stop = false;
    backtrace::trace(|frame| {
        backtrace::resolve_frame(frame, |symbol| {
            if stop {
                return;
            }
            let name = symbol.name().map(|n| n.to_string()).unwrap_or_default();
            if in_preamble && preamble_frame(&name) {
                return;
            }
            in_preamble = false;
            let (Some(file), Some(line)) = (symbol.filename(), symbol.lineno()) else {
                return;
            };
            if runtime_frame(&name, file) {
                stop = true;
                return;
            }
            frames.push(FrameLoc {
                file: file.to_string_lossy().replace('\\', "/"),
                line,
            });
        });
        !stop
    });
    if skip > 0 {
        frames.drain(..skip.min(frames.len()));
    }
    frames
}

/// Captures the closed frame range `[start, end]` past the baseline.
///
/// Truncates early when two consecutive frames report the identical
/// `file:line`, which guards against degenerate ranges.
#[must_use]
pub fn capture_range(start: usize, end: usize) -> Vec<FrameLoc> {
    clip_range(&capture(0), start, end)
}

/// Pure range/truncation logic behind [`capture_range`].
#[must_use]
pub fn clip_range(frames: &[FrameLoc], start: usize, end: usize) -> Vec<FrameLoc> {
    if start > end || start >= frames.len() {
        return Vec::new();
    }
    let stop = (end + 1).min(frames.len());
    let mut out: Vec<FrameLoc> = Vec::with_capacity(stop - start);
    for frame in &frames[start..stop] {
        if out.last() == Some(frame) {
            break;
        }
        out.push(frame.clone());
    }
    out
}

/// Renders frames as a `file:line` chain joined with [`CHAIN_SEPARATOR`].
#[must_use]
pub fn render_chain(frames: &[FrameLoc], style: FileStyle) -> String {
    frames
        .iter()
        .map(|frame| match style {
            FileStyle::Short => format!("{}:{}", short_file(&frame.file), frame.line),
            FileStyle::Long => format!("{}:{}", long_file(&frame.file), frame.line),
        })
        .collect::<Vec<_>>()
        .join(CHAIN_SEPARATOR)
}

/// Frames emitted before the caller's code: the backtrace machinery and this
/// crate's own logging pipeline.
fn preamble_frame(name: &str) -> bool {
    name.starts_with("backtrace::")
        || (name.starts_with("bitlog::") && !name.contains("tests"))
}

fn runtime_frame(name: &str, file: &Path) -> bool {
    let file = file.to_string_lossy();
    name.starts_with("std::")
        || name.starts_with("core::")
        || name.starts_with("alloc::")
        || name.starts_with("test::")
        || name.starts_with("__")
        || file.starts_with("/rustc/")
        || file.contains("/library/std/")
        || file.contains("/library/core/")
}

fn short_file(file: &str) -> &str {
    file.rsplit('/').next().unwrap_or(file)
}

fn long_file(file: &str) -> String {
    match env::current_dir() {
        Ok(dir) => {
            let dir = dir.to_string_lossy().replace('\\', "/");
            file.strip_prefix(dir.as_str()).map_or_else(
                || file.to_string(),
                |rest| rest.trim_start_matches('/').to_string(),
            )
        }
        Err(_) => file.to_string(),
    }
}
