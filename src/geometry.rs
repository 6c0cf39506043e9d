//! Floating-surface placement.
//!
//! Two placement strategies exist: viewport-anchored (centered or explicitly
//! positioned, used for the overlay pair) and cursor-anchored (used when the
//! host supports cursor-relative floats and no horizontal position was
//! configured). Both clamp to the viewport; overflow never escapes as an
//! error.

use log::debug;

use crate::error::SurfaceError;
use crate::host::CursorPos;

/// A size expressed either in absolute cells or as a fraction of a reference
/// dimension.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SizeValue {
    Cells(usize),
    Fraction(f32),
}

impl SizeValue {
    pub fn resolve(self, reference: usize) -> usize {
        match self {
            SizeValue::Cells(value) => value,
            SizeValue::Fraction(fraction) => {
                let fraction = fraction.max(0.0);
                ((reference as f32) * fraction).floor() as usize
            }
        }
    }
}

/// Which corner of the rect `row`/`col` names.
///
/// `NorthWest` rects occupy `row .. row + height`; `SouthWest` rects grow
/// upward and occupy `row - height .. row`. A surface placed below its
/// invocation point uses `NorthWest`, one placed above uses `SouthWest`, so
/// the surface never renders partially off-screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    NorthWest,
    SouthWest,
}

/// Horizontal placement mode for cursor-anchored floats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HorizontalMode {
    Center,
    Left,
    Right,
    AtCursor,
}

/// Resolved float geometry in viewport cells, rows and columns 0-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FloatRect {
    pub row: usize,
    pub col: usize,
    pub width: usize,
    pub height: usize,
    pub anchor: Anchor,
}

/// Geometry for one overlay presentation: an input line stacked directly
/// above the content surface, plus an optional secondary status line below.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlayPlan {
    pub content: FloatRect,
    pub input: FloatRect,
    pub status: Option<FloatRect>,
}

impl OverlayPlan {
    pub fn total_height(&self) -> usize {
        1 + self.content.height + usize::from(self.status.is_some())
    }
}

/// Viewport-anchored overlay placement.
///
/// Defaults when unconfigured: width is two thirds of the viewport columns,
/// height is 0.4 of the viewport rows, position is centered. Explicit values
/// are clamped so the overlay never exceeds the viewport.
pub fn resolve_centered(
    width: Option<usize>,
    height: Option<usize>,
    position: Option<(usize, usize)>,
    with_status: bool,
    columns: usize,
    rows: usize,
) -> OverlayPlan {
    let columns = columns.max(1);
    let rows = rows.max(2);

    let max_width = match width {
        Some(w) => {
            note_overflow(w > columns);
            w.min(columns)
        }
        None => (columns * 2 / 3).max(1),
    };
    let max_height = match height {
        Some(h) => {
            note_overflow(h > rows);
            h.min(rows)
        }
        None => SizeValue::Fraction(0.4).resolve(rows).max(2),
    };

    let (mut line, mut col) = match position {
        Some((line, col)) => {
            note_overflow(line > rows - max_height || col > columns.saturating_sub(max_width));
            (
                line.min(rows - max_height),
                col.min(columns.saturating_sub(max_width)),
            )
        }
        None => (
            (rows - max_height) / 2,
            columns.saturating_sub(max_width) / 2,
        ),
    };
    line = line.max(1);
    col = col.max(1);

    // Re-clamp after the floor so a tiny viewport still yields a rect that
    // fits; the input line sits at `line`, content directly beneath it.
    line = line.min(rows.saturating_sub(max_height).max(1));
    col = col.min(columns.saturating_sub(1));

    let input = FloatRect {
        row: line,
        col,
        width: max_width,
        height: 1,
        anchor: Anchor::NorthWest,
    };
    let content_height = max_height
        .saturating_sub(1)
        .min(rows.saturating_sub(line + 1))
        .max(1);
    let content = FloatRect {
        row: line + 1,
        col,
        width: max_width,
        height: content_height,
        anchor: Anchor::NorthWest,
    };
    let status = with_status.then(|| FloatRect {
        row: (line + 1 + content_height).min(rows - 1),
        col,
        width: max_width,
        height: 1,
        anchor: Anchor::NorthWest,
    });

    OverlayPlan {
        content,
        input,
        status,
    }
}

/// Cursor-anchored float placement.
///
/// Chooses whichever side of the invocation point has more room, growing
/// upward (`SouthWest`) above the cursor or downward (`NorthWest`) below it,
/// then clamps width and height to the chosen side and the viewport.
pub fn resolve_anchored(
    width: Option<usize>,
    content_len: usize,
    horizontal: HorizontalMode,
    cursor: CursorPos,
    columns: usize,
    rows: usize,
) -> FloatRect {
    let columns = columns.max(1);
    let rows = rows.max(1);
    let cursor_row = cursor.row.min(rows - 1);

    let width = match width {
        Some(w) => {
            note_overflow(w > columns);
            w.clamp(1, columns)
        }
        None => (columns / 2).max(1),
    };

    let available_above = cursor_row;
    let available_below = rows - cursor_row - 1;

    let (anchor, row, side_room) = if available_above >= available_below {
        (Anchor::SouthWest, cursor_row, available_above)
    } else {
        (Anchor::NorthWest, cursor_row + 1, available_below)
    };
    let height = content_len.clamp(1, side_room.max(1));

    let col = match horizontal {
        HorizontalMode::Center => columns.saturating_sub(width) / 2,
        HorizontalMode::Left => 0,
        HorizontalMode::Right => columns.saturating_sub(width),
        HorizontalMode::AtCursor => cursor.col.min(columns.saturating_sub(width)),
    };

    FloatRect {
        row,
        col,
        width,
        height,
        anchor,
    }
}

/// Cursor-anchored placement of the full overlay pair.
///
/// Reserves one row for the input line on the far side of the content so the
/// pair stays adjacent, then converts the result to top-left rects.
pub fn anchored_overlay_plan(
    width: Option<usize>,
    content_len: usize,
    horizontal: HorizontalMode,
    cursor: CursorPos,
    columns: usize,
    rows: usize,
    with_status: bool,
) -> OverlayPlan {
    let rect = resolve_anchored(
        width,
        content_len.saturating_add(1),
        horizontal,
        cursor,
        columns,
        rows.max(2),
    );
    let content_height = rect.height.saturating_sub(1).max(1);

    let (input_row, content_row) = match rect.anchor {
        Anchor::NorthWest => (rect.row, rect.row + 1),
        Anchor::SouthWest => {
            let top = rect.row.saturating_sub(content_height + 1);
            (top, top + 1)
        }
    };

    let input = FloatRect {
        row: input_row,
        col: rect.col,
        width: rect.width,
        height: 1,
        anchor: Anchor::NorthWest,
    };
    let content = FloatRect {
        row: content_row,
        col: rect.col,
        width: rect.width,
        height: content_height.min(rows.max(2).saturating_sub(content_row).max(1)),
        anchor: Anchor::NorthWest,
    };
    let status = with_status.then(|| FloatRect {
        row: (content.row + content.height).min(rows.max(2) - 1),
        col: rect.col,
        width: rect.width,
        height: 1,
        anchor: Anchor::NorthWest,
    });

    OverlayPlan {
        content,
        input,
        status,
    }
}

fn note_overflow(overflowed: bool) {
    if overflowed {
        debug!("{}: clamping to viewport", SurfaceError::GeometryOverflow);
    }
}

#[cfg(test)]
mod tests {
    use super::{
        anchored_overlay_plan, resolve_anchored, resolve_centered, Anchor, HorizontalMode,
        OverlayPlan, SizeValue,
    };
    use crate::host::CursorPos;

    fn assert_within(plan: &OverlayPlan, columns: usize, rows: usize) {
        for rect in [Some(plan.content), Some(plan.input), plan.status]
            .into_iter()
            .flatten()
        {
            assert!(rect.col + rect.width <= columns, "{rect:?}");
            assert!(rect.row + rect.height <= rows, "{rect:?}");
        }
    }

    #[test]
    fn centered_defaults_take_two_thirds_width() {
        let plan = resolve_centered(None, None, None, false, 120, 40);
        assert_eq!(plan.input.width, 80);
        assert_eq!(plan.content.height, 16 - 1);
        assert_eq!(plan.input.row + 1, plan.content.row);
        assert_within(&plan, 120, 40);
    }

    #[test]
    fn explicit_size_is_clamped_to_viewport() {
        let plan = resolve_centered(Some(500), Some(500), None, false, 80, 24);
        assert_eq!(plan.input.width, 80);
        assert_within(&plan, 80, 24);
    }

    #[test]
    fn explicit_position_is_clamped_and_floored() {
        let plan = resolve_centered(Some(10), Some(5), Some((0, 0)), false, 80, 24);
        assert_eq!(plan.input.row, 1);
        assert_eq!(plan.input.col, 1);

        let plan = resolve_centered(Some(10), Some(5), Some((100, 100)), false, 80, 24);
        assert_within(&plan, 80, 24);
    }

    #[test]
    fn status_slot_sits_below_content() {
        let plan = resolve_centered(None, None, None, true, 90, 30);
        let status = plan.status.expect("status rect");
        assert_eq!(status.row, plan.content.row + plan.content.height);
    }

    #[test]
    fn anchored_prefers_side_with_more_room() {
        let above = resolve_anchored(
            None,
            50,
            HorizontalMode::Center,
            CursorPos { row: 20, col: 0 },
            80,
            24,
        );
        assert_eq!(above.anchor, Anchor::SouthWest);
        assert_eq!(above.row, 20);
        assert_eq!(above.height, 20);

        let below = resolve_anchored(
            None,
            50,
            HorizontalMode::Center,
            CursorPos { row: 3, col: 0 },
            80,
            24,
        );
        assert_eq!(below.anchor, Anchor::NorthWest);
        assert_eq!(below.row, 4);
        assert_eq!(below.height, 20);
    }

    #[test]
    fn anchored_height_stops_at_content_length() {
        let rect = resolve_anchored(
            None,
            3,
            HorizontalMode::Left,
            CursorPos { row: 20, col: 0 },
            80,
            24,
        );
        assert_eq!(rect.height, 3);
        assert_eq!(rect.col, 0);
    }

    #[test]
    fn at_cursor_column_is_clamped() {
        let rect = resolve_anchored(
            Some(40),
            5,
            HorizontalMode::AtCursor,
            CursorPos { row: 10, col: 70 },
            80,
            24,
        );
        assert_eq!(rect.col, 40);
    }

    #[test]
    fn anchored_plan_keeps_input_adjacent_above_content() {
        // Plenty of room above the cursor: the pair grows upward, input on top.
        let plan = anchored_overlay_plan(
            Some(50),
            5,
            HorizontalMode::Left,
            CursorPos { row: 20, col: 0 },
            80,
            24,
            false,
        );
        assert_eq!(plan.content.height, 5);
        assert_eq!(plan.input.row + 1, plan.content.row);
        assert_eq!(plan.content.row + plan.content.height, 20);
        assert_within(&plan, 80, 24);
    }

    #[test]
    fn anchored_plan_places_below_a_top_of_screen_cursor() {
        let plan = anchored_overlay_plan(
            Some(50),
            5,
            HorizontalMode::Left,
            CursorPos { row: 2, col: 0 },
            80,
            24,
            false,
        );
        assert_eq!(plan.input.row, 3);
        assert_eq!(plan.content.row, 4);
        assert_within(&plan, 80, 24);
    }

    #[test]
    fn fraction_resolves_against_reference() {
        assert_eq!(SizeValue::Fraction(0.4).resolve(40), 16);
        assert_eq!(SizeValue::Cells(7).resolve(40), 7);
        assert_eq!(SizeValue::Fraction(-1.0).resolve(40), 0);
    }
}
