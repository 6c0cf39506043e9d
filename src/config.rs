//! View configuration with environment overrides.

use std::env;

use crate::geometry::{HorizontalMode, SizeValue};

/// Configuration for one controller instance.
///
/// Defaults mirror an unconfigured installation; `from_env` layers `SIFT_*`
/// overrides on top for embeddings that configure through the environment.
#[derive(Debug, Clone)]
pub struct ViewConfig {
    /// Split height: absolute rows, or a fraction of the viewport. `None`
    /// keeps the host's default split size.
    pub split_height: Option<SizeValue>,
    /// Explicit overlay width in columns; `None` computes two thirds of the
    /// viewport.
    pub overlay_width: Option<usize>,
    /// Explicit overlay height in rows; `None` computes 0.4 of the viewport.
    pub overlay_height: Option<usize>,
    /// Explicit overlay position (row, col); `None` centers.
    pub overlay_position: Option<(usize, usize)>,
    /// Horizontal placement for cursor-anchored floats.
    pub horizontal: HorizontalMode,
    /// Render newest results at the bottom, growing upward.
    pub reverse_order: bool,
    /// Keep previous results in the buffer across invocations.
    pub remember_last_search: bool,
    /// Hide the line naming the originating buffer from the visible results.
    pub ignore_current_buffer_name: bool,
    /// Populate the overlay's secondary status surface.
    pub overlay_status_line: bool,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            split_height: None,
            overlay_width: None,
            overlay_height: None,
            overlay_position: None,
            horizontal: HorizontalMode::AtCursor,
            reverse_order: false,
            remember_last_search: false,
            ignore_current_buffer_name: false,
            overlay_status_line: false,
        }
    }
}

impl ViewConfig {
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(height) = env_size_value("SIFT_SPLIT_HEIGHT") {
            config.split_height = Some(height);
        }
        config.overlay_width = env_usize_opt("SIFT_OVERLAY_WIDTH");
        config.overlay_height = env_usize_opt("SIFT_OVERLAY_HEIGHT");
        config.overlay_position = env_position_opt("SIFT_OVERLAY_POSITION");
        if let Some(mode) = env_string_opt("SIFT_OVERLAY_HPOS") {
            config.horizontal = match mode.as_str() {
                "center" => HorizontalMode::Center,
                "left" => HorizontalMode::Left,
                "right" => HorizontalMode::Right,
                _ => HorizontalMode::AtCursor,
            };
        }
        config.reverse_order = env_flag("SIFT_REVERSE_ORDER");
        config.remember_last_search = env_flag("SIFT_REMEMBER_LAST_SEARCH");
        config.ignore_current_buffer_name = env_flag("SIFT_IGNORE_CURRENT_BUFFER_NAME");
        config.overlay_status_line = env_flag("SIFT_OVERLAY_STATUS_LINE");
        config
    }
}

fn env_flag(key: &str) -> bool {
    env::var(key).map(|value| value == "1").unwrap_or(false)
}

fn env_string_opt(key: &str) -> Option<String> {
    env::var(key).ok().and_then(|value| {
        if value.trim().is_empty() {
            None
        } else {
            Some(value)
        }
    })
}

fn env_usize_opt(key: &str) -> Option<usize> {
    env_string_opt(key).and_then(|value| value.parse().ok())
}

// Values below 1 are read as a fraction of the viewport, whole numbers as
// absolute rows.
fn env_size_value(key: &str) -> Option<SizeValue> {
    let value = env_string_opt(key)?;
    if let Ok(cells) = value.parse::<usize>() {
        return Some(SizeValue::Cells(cells));
    }
    let fraction = value.parse::<f32>().ok()?;
    if fraction > 0.0 && fraction < 1.0 {
        Some(SizeValue::Fraction(fraction))
    } else {
        None
    }
}

fn env_position_opt(key: &str) -> Option<(usize, usize)> {
    let value = env_string_opt(key)?;
    let (row, col) = value.split_once(',')?;
    Some((row.trim().parse().ok()?, col.trim().parse().ok()?))
}
