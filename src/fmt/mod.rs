//! Record formatting: colors, styles, and the line prefix builder.

mod color;
mod prefix;

pub use color::{Color, Style, body_style, header_style};
pub use prefix::{prefix, prefix_at};
