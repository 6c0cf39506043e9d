//! Display-width helpers for result lines.

pub mod width;

pub use width::{display_rows, grapheme_width, visible_width};
