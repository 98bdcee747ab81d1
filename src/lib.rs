#![forbid(unsafe_code)]

//! `bitlog` - Embeddable leveled logging core.
//!
//! Levels and output decorations are independent bitmasks: a caller can
//! enable or disable severities and per-record decorations (timestamp,
//! level tag, caller location, color) at runtime without rebuilding the
//! logger. Records are routed to a pluggable [`Sink`]; built-in sinks cover
//! plain streams, size-rotated files, and schedule-rotated files.
//!
//! # Example
//!
//! ```
//! use bitlog::{Flag, Level, LevelSet, Logger, args};
//!
//! let logger = Logger::builder()
//!     .levels(LevelSet::ALL - Level::Debug)
//!     .flags(Flag::ShowTime | Flag::ShowLevelTag)
//!     .build();
//!
//! logger.info(&args!["service started on port ", 8080_u32]);
//! logger.warnf(format_args!("queue depth {} over soft limit", 120));
//! ```

pub mod flag;
pub mod fmt;
pub mod level;
pub mod logger;
pub mod sink;
pub mod stack;
pub mod tag;
pub mod value;

// Re-exports for convenience
pub use flag::{Flag, FlagSet};
pub use fmt::{Color, Style};
pub use level::{Level, LevelSet};
pub use logger::{FileSinkBuilder, Logger, LoggerBuilder};
pub use sink::{CronFileSink, Scheduler, Sink, SinkError, SizeFileSink, StreamSink};
pub use tag::TagRegistry;
pub use value::Value;
