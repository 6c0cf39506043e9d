//! Host-editor boundary.
//!
//! Everything the controller needs from the embedding editor is reached
//! through the [`Host`] trait: viewport geometry, window enumeration and
//! focus, per-window view state, tabgroups, split and float creation, and
//! redraw-event suppression. The controller never assumes a window it created
//! is still alive; liveness is always re-checked through this boundary.

use std::cell::RefCell;
use std::rc::Rc;

use crate::geometry::FloatRect;

/// Stable identifier for a host window region.
#[repr(transparent)]
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct WindowId(u64);

impl WindowId {
    pub fn raw(self) -> u64 {
        self.0
    }

    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }
}

/// Stable identifier for a host tabgroup.
#[repr(transparent)]
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct TabId(u64);

impl TabId {
    pub fn raw(self) -> u64 {
        self.0
    }

    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }
}

/// Cursor position inside a window: row and column, both 0-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorPos {
    pub row: usize,
    pub col: usize,
}

/// Scroll/cursor state of one window, captured before the controller touches
/// the layout and replayed afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewState {
    pub cursor: CursorPos,
    pub top_line: usize,
}

/// Opaque whole-layout geometry token produced by [`Host::save_layout`].
///
/// The controller never inspects the payload; it only hands the token back
/// for a single idempotent [`Host::apply_layout`] on exit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutCommand(String);

impl LayoutCommand {
    pub fn new(payload: impl Into<String>) -> Self {
        Self(payload.into())
    }

    pub fn raw(&self) -> &str {
        &self.0
    }
}

/// Where a split surface is opened relative to the existing layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitPlacement {
    /// Full-width split at the top of the tabgroup.
    Top,
    /// Full-width split at the bottom of the tabgroup.
    Bottom,
    /// Split above the current window.
    Above,
    /// Split below the current window.
    Below,
    /// Full-height split at the left edge.
    Left,
    /// Full-height split at the right edge.
    Right,
}

/// Presentation attributes applied to a results window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceAttrs {
    /// Excluded from the host's buffer list.
    pub unlisted: bool,
    /// Never persisted to disk; discarded when the host drops it.
    pub transient: bool,
    pub wrap: bool,
    pub foldable: bool,
    pub line_numbers: bool,
    pub cursor_line: bool,
    /// Height pinned against automatic equalization.
    pub fixed_height: bool,
}

impl SurfaceAttrs {
    /// Standard scratch attributes for a results surface. Reverse-order mode
    /// drops line numbers (the status line reports the reverse line number
    /// instead) and pins the height so incremental growth stays controlled.
    pub fn scratch(reverse_order: bool) -> Self {
        Self {
            unlisted: true,
            transient: true,
            wrap: true,
            foldable: false,
            line_numbers: !reverse_order,
            cursor_line: true,
            fixed_height: reverse_order,
        }
    }

    /// Attributes for the overlay input line: a bare single-line prompt.
    pub fn prompt_line() -> Self {
        Self {
            unlisted: true,
            transient: true,
            wrap: false,
            foldable: false,
            line_numbers: false,
            cursor_line: false,
            fixed_height: true,
        }
    }
}

/// The embedding editor.
///
/// Mutating calls return `false` when the target is gone or the operation was
/// refused; the controller treats that as degraded-but-recoverable and never
/// aborts an unwind over it.
pub trait Host {
    fn columns(&self) -> usize;
    fn rows(&self) -> usize;

    fn windows(&self) -> Vec<WindowId>;
    fn current_window(&self) -> WindowId;
    fn focus_window(&mut self, window: WindowId) -> bool;
    /// 1-based position of the window in its tabgroup, used as a best-effort
    /// focus fallback when ids do not survive in the host.
    fn window_number(&self, window: WindowId) -> Option<usize>;
    fn focus_window_number(&mut self, number: usize) -> bool;
    fn window_valid(&self, window: WindowId) -> bool;
    fn window_width(&self, window: WindowId) -> Option<usize>;
    fn window_height(&self, window: WindowId) -> Option<usize>;
    fn set_window_height(&mut self, window: WindowId, height: usize) -> bool;
    fn cursor(&self, window: WindowId) -> Option<CursorPos>;
    fn set_cursor(&mut self, window: WindowId, cursor: CursorPos) -> bool;
    /// Name of the buffer shown in the focused window, if it has one.
    fn current_buffer_name(&self) -> Option<String>;
    /// Screen position of the cursor within the viewport.
    fn cursor_screen_pos(&self) -> CursorPos;

    fn save_view(&self, window: WindowId) -> Option<ViewState>;
    fn restore_view(&mut self, window: WindowId, view: &ViewState) -> bool;
    fn save_layout(&self) -> LayoutCommand;
    fn apply_layout(&mut self, layout: &LayoutCommand) -> bool;
    /// Monotonic counter bumped on every externally-driven viewport resize.
    fn resize_generation(&self) -> u64;

    fn current_tab(&self) -> TabId;
    fn tab_count(&self) -> usize;
    fn focus_tab(&mut self, tab: TabId) -> bool;
    /// Opens a dedicated tabgroup holding a single window bound to `name`.
    fn open_tab(&mut self, name: &str) -> WindowId;
    fn close_tab(&mut self, tab: TabId) -> bool;
    fn window_tab(&self, window: WindowId) -> Option<TabId>;
    fn tabline_visible(&self) -> bool;
    fn set_tabline_visible(&mut self, visible: bool);

    /// Opens a split bound to a scratch region named `name` and focuses it.
    fn open_split(&mut self, placement: SplitPlacement, name: &str) -> WindowId;
    /// Removes the window from the layout without destroying its content.
    fn hide_window(&mut self, window: WindowId) -> bool;
    /// Forces a blank single-window state. Last-resort recovery so the host
    /// is never left with zero windows.
    fn force_blank_window(&mut self) -> WindowId;

    /// Whether floats can be positioned relative to the cursor. Hosts that
    /// only support viewport-relative floats leave the default.
    fn supports_cursor_floats(&self) -> bool {
        false
    }

    fn open_float(&mut self, rect: &FloatRect) -> WindowId;
    fn show_float(&mut self, window: WindowId) -> bool;
    fn hide_float(&mut self, window: WindowId) -> bool;
    fn close_float(&mut self, window: WindowId) -> bool;
    /// Declares a set of floats that dismiss together; the host reports an
    /// external dismissal of any of them back through the embedder, which
    /// forwards it to `DisplaySurfaceController::handle_external_close`.
    fn register_close_group(&mut self, windows: Vec<WindowId>);

    fn apply_surface_attrs(&mut self, window: WindowId, attrs: &SurfaceAttrs) -> bool;
    /// While suppressed, the host must not fire redraw-triggering events for
    /// layout mutations.
    fn set_events_suppressed(&mut self, suppressed: bool);
    fn request_redraw(&mut self);
}

/// Shared handle to the host, single-threaded by construction.
pub type SharedHost = Rc<RefCell<dyn Host>>;

/// Scoped redraw-event suppression.
///
/// Suppression is released on drop, so a failing snapshot/restore body still
/// leaves the host observing events again.
pub struct EventSuppressionGuard {
    host: SharedHost,
}

impl EventSuppressionGuard {
    pub fn new(host: SharedHost) -> Self {
        host.borrow_mut().set_events_suppressed(true);
        Self { host }
    }
}

impl Drop for EventSuppressionGuard {
    fn drop(&mut self) {
        self.host.borrow_mut().set_events_suppressed(false);
    }
}
