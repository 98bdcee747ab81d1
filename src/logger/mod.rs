//! Logger core: level gating, pooled buffers, and the write pipeline.

mod builder;
mod pool;

pub use builder::{FileSinkBuilder, LoggerBuilder};

use crate::flag::{Flag, FlagSet};
use crate::fmt::{body_style, prefix};
use crate::level::{Level, LevelSet};
use crate::sink::Sink;
use crate::stack::{self, FileStyle};
use crate::tag::TagRegistry;
use crate::value::{self, Value};
use pool::BufferPool;
use serde::Serialize;
use std::fmt::Arguments;
use std::io;
use std::process;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

struct SinkSlot {
    sink: Box<dyn Sink>,
    closed: bool,
}

/// A leveled logger over a single [`Sink`].
///
/// Levels and output decorations are independent bitmasks that can be
/// replaced at any time without rebuilding the logger. Concurrent callers
/// format in parallel; only the sink write itself is serialized, so records
/// never interleave.
///
/// ```
/// use bitlog::{Flag, Level, LevelSet, Logger, args};
///
/// let logger = Logger::builder()
///     .levels(LevelSet::ALL - Level::Debug)
///     .flags(Flag::ShowTime | Flag::ShowLevelTag)
///     .build();
/// logger.info(&args!["listening on ", 8080_u32]);
/// ```
pub struct Logger {
    sink: Mutex<SinkSlot>,
    flags: AtomicU8,
    levels: AtomicU8,
    pool: BufferPool,
    tags: Arc<TagRegistry>,
    // Serializes mask mutation and tag renames; reads stay lock-free.
    config: Mutex<()>,
}

/// Re-establishes the caller-file invariant after a mask change: levels that
/// carry a caller chain are meaningless without a caller-file flag, so the
/// short variant is auto-enabled when neither is set.
fn auto_caller_flags(flags: FlagSet, levels: LevelSet) -> FlagSet {
    if levels.intersects(LevelSet::CALLER) && !flags.intersects(FlagSet::CALLER_FILE) {
        flags | Flag::ShowShortCallerFile
    } else {
        flags
    }
}

impl Logger {
    /// Creates a logger over `sink` with no levels or flags enabled.
    ///
    /// Every log call is a no-op until [`set_levels`](Self::set_levels) is
    /// called; use [`builder`](Self::builder) for a ready-to-use default.
    pub fn new(sink: impl Sink + 'static) -> Self {
        Self::assemble(
            Box::new(sink),
            FlagSet::EMPTY,
            LevelSet::EMPTY,
            Arc::clone(TagRegistry::global()),
        )
    }

    /// Creates a new logger builder.
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    fn assemble(
        sink: Box<dyn Sink>,
        flags: FlagSet,
        levels: LevelSet,
        tags: Arc<TagRegistry>,
    ) -> Self {
        let flags = auto_caller_flags(flags, levels);
        Self {
            sink: Mutex::new(SinkSlot {
                sink,
                closed: false,
            }),
            flags: AtomicU8::new(flags.bits()),
            levels: AtomicU8::new(levels.bits()),
            pool: BufferPool::new(),
            tags,
            config: Mutex::new(()),
        }
    }

    /// Replaces the active flag set and re-establishes the caller-file
    /// invariant against the current levels.
    pub fn set_flags(&self, flags: FlagSet) {
        let _guard = self.config.lock().unwrap_or_else(PoisonError::into_inner);
        let levels = LevelSet::from_bits(self.levels.load(Ordering::Relaxed));
        self.flags
            .store(auto_caller_flags(flags, levels).bits(), Ordering::Relaxed);
    }

    /// Replaces the enabled-level set and re-establishes the caller-file
    /// invariant against the current flags.
    pub fn set_levels(&self, levels: LevelSet) {
        let _guard = self.config.lock().unwrap_or_else(PoisonError::into_inner);
        self.levels.store(levels.bits(), Ordering::Relaxed);
        let flags = FlagSet::from_bits(self.flags.load(Ordering::Relaxed));
        self.flags
            .store(auto_caller_flags(flags, levels).bits(), Ordering::Relaxed);
    }

    /// Snapshot of the active flags.
    #[must_use]
    pub fn flags(&self) -> FlagSet {
        FlagSet::from_bits(self.flags.load(Ordering::Relaxed))
    }

    /// Snapshot of the enabled levels.
    #[must_use]
    pub fn levels(&self) -> LevelSet {
        LevelSet::from_bits(self.levels.load(Ordering::Relaxed))
    }

    /// True if records at `level` currently reach the sink.
    #[must_use]
    pub fn enabled(&self, level: Level) -> bool {
        self.levels().contains(level)
    }

    /// Renames a level's tag in the shared registry.
    ///
    /// Visible to every logger sharing the registry; by default that is all
    /// loggers in the process.
    pub fn level_rename(&self, level: Level, name: &str) {
        let _guard = self.config.lock().unwrap_or_else(PoisonError::into_inner);
        self.tags.rename(level, name);
    }

    /// Closes the sink. Later calls are no-ops, and records logged after
    /// closing are dropped.
    ///
    /// # Errors
    /// Returns an error if the sink's close fails.
    pub fn close(&self) -> io::Result<()> {
        let mut slot = self.sink.lock().unwrap_or_else(PoisonError::into_inner);
        if slot.closed {
            return Ok(());
        }
        slot.closed = true;
        slot.sink.close()
    }

    fn caller_chain(&self, flags: FlagSet, level: Level, skip: usize) -> Option<String> {
        if !level.wants_caller() {
            return None;
        }
        // Long wins when both caller-file flags are set.
        let style = if flags.contains(Flag::ShowLongCallerFile) {
            FileStyle::Long
        } else if flags.contains(Flag::ShowShortCallerFile) {
            FileStyle::Short
        } else {
            return None;
        };
        Some(stack::render_chain(&stack::capture(skip), style))
    }

    fn write_record(&self, level: Level, skip: usize, msg: &str) {
        let levels = LevelSet::from_bits(self.levels.load(Ordering::Relaxed));
        if !levels.contains(level) {
            return;
        }
        let flags = FlagSet::from_bits(self.flags.load(Ordering::Relaxed));

        // Formatting, including the stack walk, happens before taking the
        // write lock.
        let caller = self.caller_chain(flags, level, skip);
        let mut buf = self.pool.get();
        buf.extend_from_slice(prefix(flags, level, &self.tags, caller.as_deref()).as_bytes());
        if flags.contains(Flag::Colorize) {
            buf.extend_from_slice(body_style(level).paint(msg).as_bytes());
        } else {
            buf.extend_from_slice(msg.as_bytes());
        }
        if buf.last().is_some_and(|&b| b != b'\n') {
            buf.push(b'\n');
        }

        {
            let mut slot = self.sink.lock().unwrap_or_else(PoisonError::into_inner);
            if !slot.closed {
                // Fire and forget: a failed write never fails the log call.
                let _ = slot.sink.write(&buf);
            }
        }
        self.pool.put(buf);
    }

    /// Logs at Fatal and terminates the process with exit code 1.
    ///
    /// The record is written (subject to level gating) before exiting; the
    /// exit happens regardless of whether Fatal is enabled.
    pub fn fatal(&self, args: &[Value]) -> ! {
        self.write_record(Level::Fatal, 0, &value::concat(args));
        process::exit(1);
    }

    /// Printf-shaped [`fatal`](Self::fatal).
    pub fn fatalf(&self, args: Arguments<'_>) -> ! {
        self.write_record(Level::Fatal, 0, &args.to_string());
        process::exit(1);
    }

    /// Line-shaped [`fatal`](Self::fatal); arguments joined with spaces.
    pub fn fatalln(&self, args: &[Value]) -> ! {
        self.write_record(Level::Fatal, 0, &value::join(args));
        process::exit(1);
    }

    /// Logs at Panic and unwinds with the rendered message as payload.
    ///
    /// The panic is raised regardless of whether Panic is enabled.
    pub fn panic(&self, args: &[Value]) -> ! {
        let msg = value::concat(args);
        self.write_record(Level::Panic, 0, &msg);
        panic!("{msg}");
    }

    /// Printf-shaped [`panic`](Self::panic).
    pub fn panicf(&self, args: Arguments<'_>) -> ! {
        let msg = args.to_string();
        self.write_record(Level::Panic, 0, &msg);
        panic!("{msg}");
    }

    /// Line-shaped [`panic`](Self::panic); arguments joined with spaces.
    pub fn panicln(&self, args: &[Value]) -> ! {
        let msg = value::join(args);
        self.write_record(Level::Panic, 0, &msg);
        panic!("{msg}");
    }

    /// Logs at Print; arguments concatenated with no separator.
    pub fn print(&self, args: &[Value]) {
        self.write_record(Level::Print, 0, &value::concat(args));
    }

    /// Printf-shaped [`print`](Self::print).
    pub fn printf(&self, args: Arguments<'_>) {
        self.write_record(Level::Print, 0, &args.to_string());
    }

    /// Line-shaped [`print`](Self::print); arguments joined with spaces.
    pub fn println(&self, args: &[Value]) {
        self.write_record(Level::Print, 0, &value::join(args));
    }

    /// Logs at Info; arguments concatenated with no separator.
    pub fn info(&self, args: &[Value]) {
        self.write_record(Level::Info, 0, &value::concat(args));
    }

    /// Printf-shaped [`info`](Self::info).
    pub fn infof(&self, args: Arguments<'_>) {
        self.write_record(Level::Info, 0, &args.to_string());
    }

    /// Line-shaped [`info`](Self::info); arguments joined with spaces.
    pub fn infoln(&self, args: &[Value]) {
        self.write_record(Level::Info, 0, &value::join(args));
    }

    /// Logs at Warn; arguments concatenated with no separator.
    pub fn warn(&self, args: &[Value]) {
        self.write_record(Level::Warn, 0, &value::concat(args));
    }

    /// Printf-shaped [`warn`](Self::warn).
    pub fn warnf(&self, args: Arguments<'_>) {
        self.write_record(Level::Warn, 0, &args.to_string());
    }

    /// Line-shaped [`warn`](Self::warn); arguments joined with spaces.
    pub fn warnln(&self, args: &[Value]) {
        self.write_record(Level::Warn, 0, &value::join(args));
    }

    /// Logs at Error; arguments concatenated with no separator.
    pub fn error(&self, args: &[Value]) {
        self.write_record(Level::Error, 0, &value::concat(args));
    }

    /// Printf-shaped [`error`](Self::error).
    pub fn errorf(&self, args: Arguments<'_>) {
        self.write_record(Level::Error, 0, &args.to_string());
    }

    /// Line-shaped [`error`](Self::error); arguments joined with spaces.
    pub fn errorln(&self, args: &[Value]) {
        self.write_record(Level::Error, 0, &value::join(args));
    }

    /// Logs at Debug; arguments concatenated with no separator.
    pub fn debug(&self, args: &[Value]) {
        self.write_record(Level::Debug, 0, &value::concat(args));
    }

    /// Printf-shaped [`debug`](Self::debug).
    pub fn debugf(&self, args: Arguments<'_>) {
        self.write_record(Level::Debug, 0, &args.to_string());
    }

    /// Line-shaped [`debug`](Self::debug); arguments joined with spaces.
    pub fn debugln(&self, args: &[Value]) {
        self.write_record(Level::Debug, 0, &value::join(args));
    }

    /// Logs at Stack with the default caller baseline.
    pub fn stack(&self, args: &[Value]) {
        self.write_record(Level::Stack, 0, &value::concat(args));
    }

    /// Printf-shaped [`stack`](Self::stack).
    pub fn stackf(&self, args: Arguments<'_>) {
        self.write_record(Level::Stack, 0, &args.to_string());
    }

    /// Line-shaped [`stack`](Self::stack); arguments joined with spaces.
    pub fn stackln(&self, args: &[Value]) {
        self.write_record(Level::Stack, 0, &value::join(args));
    }

    /// Logs at Stack, skipping `depth` extra caller frames past the
    /// baseline. Useful for logging helpers that wrap this logger.
    pub fn stack_at(&self, depth: usize, args: &[Value]) {
        self.write_record(Level::Stack, depth, &value::concat(args));
    }

    /// Serializes `payload` to JSON, appends it to the concatenated prefix
    /// arguments, and dispatches at `level`.
    ///
    /// A payload that fails to encode is replaced by an empty string; the
    /// record is still written. Fatal and Panic keep their terminating
    /// semantics.
    pub fn json<T: Serialize + ?Sized>(&self, level: Level, payload: &T, args: &[Value]) {
        let encoded = serde_json::to_string(payload).unwrap_or_default();
        let msg = format!("{}{encoded}", value::concat(args));
        match level {
            Level::Fatal => {
                self.write_record(Level::Fatal, 0, &msg);
                process::exit(1);
            }
            Level::Panic => {
                self.write_record(Level::Panic, 0, &msg);
                panic!("{msg}");
            }
            // The capture baseline already hides this crate's frames, so the
            // indirection through `json` needs no extra skip.
            Level::Stack => self.write_record(Level::Stack, 0, &msg),
            other => self.write_record(other, 0, &msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args;
    use std::collections::HashMap;
    use std::panic::{AssertUnwindSafe, catch_unwind};
    use std::sync::atomic::AtomicUsize;

    #[derive(Clone, Default)]
    struct CaptureSink {
        data: Arc<Mutex<Vec<u8>>>,
        closes: Arc<AtomicUsize>,
    }

    impl CaptureSink {
        fn contents(&self) -> String {
            String::from_utf8(self.data.lock().unwrap().clone()).unwrap()
        }
    }

    impl Sink for CaptureSink {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.data.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn close(&mut self) -> io::Result<()> {
            self.closes.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn capture_logger(levels: LevelSet, flags: FlagSet) -> (Logger, CaptureSink) {
        let sink = CaptureSink::default();
        let logger = Logger::builder()
            .levels(levels)
            .flags(flags)
            .tag_registry(Arc::new(TagRegistry::new()))
            .sink(sink.clone())
            .build();
        (logger, sink)
    }

    fn first_frame(record: &str) -> &str {
        let chain = record.strip_prefix('[').unwrap();
        let end = chain.find(']').unwrap();
        chain[..end].split(" <- ").next().unwrap()
    }

    #[test]
    fn disabled_level_writes_nothing() {
        let (logger, sink) = capture_logger(Level::Error.into(), FlagSet::EMPTY);
        logger.info(&args!["dropped"]);
        logger.debug(&args!["dropped"]);
        assert_eq!(sink.contents(), "");
    }

    #[test]
    fn enabled_level_writes_one_line() {
        let (logger, sink) = capture_logger(Level::Error.into(), Flag::ShowLevelTag.into());
        logger.error(&args!["boom"]);
        assert_eq!(sink.contents(), "[E] boom\n");
    }

    #[test]
    fn each_level_gates_independently() {
        let cases: [(Level, fn(&Logger)); 6] = [
            (Level::Print, |l| l.print(&args!["x"])),
            (Level::Info, |l| l.info(&args!["x"])),
            (Level::Warn, |l| l.warn(&args!["x"])),
            (Level::Error, |l| l.error(&args!["x"])),
            (Level::Debug, |l| l.debug(&args!["x"])),
            (Level::Stack, |l| l.stack(&args!["x"])),
        ];
        for (enabled, _) in &cases {
            let (logger, sink) = capture_logger((*enabled).into(), FlagSet::EMPTY);
            for (level, op) in &cases {
                op(&logger);
                let wrote = !sink.contents().is_empty();
                assert_eq!(wrote, level == enabled, "level {level} vs enabled {enabled}");
                sink.data.lock().unwrap().clear();
            }
        }
    }

    #[test]
    fn concat_and_join_shapes() {
        let (logger, sink) = capture_logger(Level::Info.into(), FlagSet::EMPTY);
        logger.info(&args!["a", 1, "b"]);
        logger.infoln(&args!["a", 1, "b"]);
        logger.infof(format_args!("{}={}", "n", 2));
        assert_eq!(sink.contents(), "a1b\na 1 b\nn=2\n");
    }

    #[test]
    fn trailing_newline_not_duplicated() {
        let (logger, sink) = capture_logger(Level::Info.into(), FlagSet::EMPTY);
        logger.info(&args!["line\n"]);
        assert_eq!(sink.contents(), "line\n");
    }

    #[test]
    fn auto_caller_flag_levels_then_flags() {
        let (logger, _sink) = capture_logger(LevelSet::EMPTY, FlagSet::EMPTY);
        logger.set_levels(Level::Stack.into());
        assert!(logger.flags().contains(Flag::ShowShortCallerFile));
        // replacing flags re-establishes the invariant
        logger.set_flags(FlagSet::EMPTY);
        assert!(logger.flags().contains(Flag::ShowShortCallerFile));
    }

    #[test]
    fn auto_caller_flag_flags_then_levels() {
        let (logger, _sink) = capture_logger(LevelSet::EMPTY, FlagSet::EMPTY);
        logger.set_flags(Flag::ShowTime.into());
        assert!(!logger.flags().contains(Flag::ShowShortCallerFile));
        logger.set_levels(Level::Fatal | Level::Info);
        assert!(logger.flags().contains(Flag::ShowShortCallerFile));
    }

    #[test]
    fn explicit_long_flag_suppresses_auto_short() {
        let (logger, _sink) = capture_logger(LevelSet::EMPTY, FlagSet::EMPTY);
        logger.set_levels(Level::Panic.into());
        logger.set_flags(Flag::ShowLongCallerFile.into());
        assert!(logger.flags().contains(Flag::ShowLongCallerFile));
        assert!(!logger.flags().contains(Flag::ShowShortCallerFile));
    }

    #[test]
    fn set_flags_replaces_previous_mask() {
        let (logger, _sink) = capture_logger(Level::Info.into(), FlagSet::EMPTY);
        logger.set_flags(Flag::ShowTime | Flag::ShowLevelTag);
        logger.set_flags(Flag::ShowTime.into());
        assert!(!logger.flags().contains(Flag::ShowLevelTag));
    }

    #[test]
    fn level_rename_is_visible() {
        let (logger, sink) = capture_logger(Level::Warn.into(), Flag::ShowLevelTag.into());
        logger.level_rename(Level::Warn, "WRN");
        logger.warn(&args!["careful"]);
        assert_eq!(sink.contents(), "[WRN] careful\n");
    }

    #[test]
    fn json_appends_encoded_payload() {
        let (logger, sink) = capture_logger(Level::Info.into(), FlagSet::EMPTY);
        let payload = serde_json::json!({"a": 1});
        logger.json(Level::Info, &payload, &args!["payload: "]);
        assert_eq!(sink.contents(), "payload: {\"a\":1}\n");
    }

    #[test]
    fn json_swallows_serialization_failure() {
        let (logger, sink) = capture_logger(Level::Info.into(), FlagSet::EMPTY);
        // non-string map keys cannot be encoded as JSON
        let mut payload: HashMap<Vec<u8>, u8> = HashMap::new();
        payload.insert(vec![1], 1);
        logger.json(Level::Info, &payload, &args!["payload: "]);
        assert_eq!(sink.contents(), "payload: \n");
    }

    #[test]
    fn json_respects_level_gate() {
        let (logger, sink) = capture_logger(Level::Error.into(), FlagSet::EMPTY);
        logger.json(Level::Debug, &1, &args![]);
        assert_eq!(sink.contents(), "");
    }

    #[test]
    fn panic_writes_then_unwinds() {
        let (logger, sink) = capture_logger(Level::Panic.into(), FlagSet::EMPTY);
        logger.set_flags(FlagSet::EMPTY);
        let result = catch_unwind(AssertUnwindSafe(|| logger.panic(&args!["blew up"])));
        let payload = result.unwrap_err();
        let msg = payload.downcast_ref::<String>().unwrap();
        assert_eq!(msg, "blew up");
        assert!(sink.contents().contains("blew up"));
    }

    #[test]
    fn panic_unwinds_even_when_level_disabled() {
        let (logger, sink) = capture_logger(LevelSet::EMPTY, FlagSet::EMPTY);
        let result = catch_unwind(AssertUnwindSafe(|| logger.panic(&args!["silent"])));
        assert!(result.is_err());
        assert_eq!(sink.contents(), "");
    }

    #[test]
    fn close_drops_later_records() {
        let (logger, sink) = capture_logger(Level::Info.into(), FlagSet::EMPTY);
        logger.info(&args!["kept"]);
        logger.close().unwrap();
        logger.close().unwrap();
        logger.info(&args!["dropped"]);
        assert_eq!(sink.contents(), "kept\n");
        assert_eq!(sink.closes.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn new_logger_starts_silent() {
        let sink = CaptureSink::default();
        let logger = Logger::new(sink.clone());
        logger.info(&args!["nothing"]);
        assert_eq!(sink.contents(), "");
        assert!(logger.levels().is_empty());
    }

    #[test]
    fn stack_record_includes_caller_chain() {
        let (logger, sink) = capture_logger(Level::Stack.into(), FlagSet::EMPTY);
        // level set includes Stack, so the short-file flag was auto-added
        assert!(logger.flags().contains(Flag::ShowShortCallerFile));
        logger.stack(&args!["trace me"]);
        let line = sink.contents();
        assert!(line.starts_with('['), "missing caller chain: {line}");
        assert!(line.contains(".rs:"), "no file:line in: {line}");
        assert!(line.ends_with("trace me\n"));
    }

    #[test]
    fn json_stack_chain_starts_at_the_call_site() {
        let (logger, sink) = capture_logger(Level::Stack.into(), FlagSet::EMPTY);
        let direct_line = line!() + 1;
        logger.stack(&args!["direct "]);
        let json_line = line!() + 1;
        logger.json(Level::Stack, &7, &args!["wrapped "]);

        let text = sink.contents();
        let mut records = text.lines();
        let direct = first_frame(records.next().unwrap());
        let wrapped = first_frame(records.next().unwrap());
        assert_eq!(direct, format!("mod.rs:{direct_line}"), "in: {text}");
        assert_eq!(wrapped, format!("mod.rs:{json_line}"), "in: {text}");
    }

    #[test]
    fn stack_at_skips_wrapping_helper_frame() {
        let (logger, sink) = capture_logger(Level::Stack.into(), FlagSet::EMPTY);

        #[inline(never)]
        fn traced_helper(logger: &Logger) -> u32 {
            let own_line = line!() + 1;
            logger.stack_at(1, &args!["via helper"]);
            own_line
        }

        let call_line = line!() + 1;
        let helper_line = traced_helper(&logger);

        let text = sink.contents();
        let frame = first_frame(text.lines().next().unwrap());
        assert_eq!(frame, format!("mod.rs:{call_line}"), "in: {text}");
        assert!(
            !text.contains(&format!("mod.rs:{helper_line}")),
            "helper frame survived the skip: {text}"
        );
    }
}
