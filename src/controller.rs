//! Display-surface controller: owns the results surface lifecycle, streams
//! content into it, and keeps the status fields in sync.
//!
//! Every side effect performed on entry — splits, buffer creation, saved
//! view state, tab-line changes — is undone on the matching exit, including
//! after a user interrupt. Exit never aborts halfway: a host refusal is
//! logged and the remaining restoration steps continue, because a half-torn
//! layout is worse than an imperfect restore.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use log::{debug, warn};
use once_cell::sync::Lazy;

use crate::buffer::ContentBuffer;
use crate::config::ViewConfig;
use crate::error::SurfaceError;
use crate::geometry::{anchored_overlay_plan, resolve_centered, HorizontalMode};
use crate::host::{
    CursorPos, EventSuppressionGuard, LayoutCommand, SharedHost, SplitPlacement, SurfaceAttrs,
    TabId, ViewState, WindowId,
};
use crate::overlay::OverlayGroup;
use crate::platform::InterruptToken;
use crate::status::{StatusRegistry, IDLE_GLYPH, RUNNING_GLYPHS};
use crate::surface::{SurfaceBackend, SurfaceHandle, SurfaceId};
use crate::text::display_rows;

/// Pending lines are committed to the buffer at most this often while a
/// source is being consumed.
const FLUSH_INTERVAL: Duration = Duration::from_millis(100);
/// The running pulse toggles at most this often.
const PULSE_INTERVAL: Duration = Duration::from_millis(450);
/// Growth span reported for forward-order surfaces, which never collapse.
const FORWARD_HEIGHT_SPAN: usize = 200;

// Last-used reverse mode per category, surviving controller re-construction
// for the lifetime of the process. Never persisted to disk.
static LAST_REVERSE_ORDER: Lazy<Mutex<HashMap<String, bool>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

fn remember_reverse(category: &str, reverse: bool) {
    let mut map = match LAST_REVERSE_ORDER.lock() {
        Ok(map) => map,
        Err(poisoned) => poisoned.into_inner(),
    };
    map.insert(category.to_string(), reverse);
}

fn recall_reverse(category: &str) -> Option<bool> {
    let map = match LAST_REVERSE_ORDER.lock() {
        Ok(map) => map,
        Err(poisoned) => poisoned.into_inner(),
    };
    map.get(category).copied()
}

/// Where the results surface is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Split(SplitPlacement),
    /// A dedicated tabgroup holding only the results window.
    FullScreen,
    /// The floating overlay pair.
    Overlay,
}

/// Lifecycle phase of the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    Closed,
    Entering,
    Open,
    Exiting,
}

/// Zero-argument callbacks invoked around enter/exit. Failures inside hooks
/// are the embedder's to handle; the controller does not guard them.
#[derive(Default)]
pub struct LifecycleHooks {
    pub before_enter: Option<Box<dyn FnMut()>>,
    pub after_enter: Option<Box<dyn FnMut()>>,
    pub before_exit: Option<Box<dyn FnMut()>>,
    pub after_exit: Option<Box<dyn FnMut()>>,
}

/// Per-invocation flags handed over by the command layer.
#[derive(Debug, Clone, Copy, Default)]
pub struct InvocationFlags {
    /// Reverse order requested for this invocation.
    pub reverse: bool,
    /// Height growth counts raw lines instead of wrapped display rows.
    pub no_wrap: bool,
    /// Re-open the previous results without clearing or collapsing.
    pub recall: bool,
    /// New results extend the previous ones.
    pub append: bool,
}

#[derive(Debug, Clone)]
struct OriginState {
    tab: TabId,
    window: WindowId,
    window_number: Option<usize>,
    /// Normalized name of the buffer the search was invoked from, used for
    /// same-file suppression in the displayed results.
    buffer_name: Option<String>,
    cursor: CursorPos,
}

/// Orchestrates surface creation and teardown, backend selection, reverse
/// order, incremental content delivery, and status synchronization for one
/// result category.
pub struct DisplaySurfaceController {
    category: String,
    config: ViewConfig,
    host: SharedHost,
    status: Rc<RefCell<StatusRegistry>>,
    hooks: LifecycleHooks,
    buffer: Rc<RefCell<ContentBuffer>>,
    buffer_name: String,
    overlay: OverlayGroup,
    surface: Option<SurfaceHandle>,
    placement: Option<Placement>,
    state: ControllerState,
    flags: InvocationFlags,
    reverse_order: bool,
    origin: Option<OriginState>,
    saved_views: HashMap<WindowId, ViewState>,
    saved_layout: Option<LayoutCommand>,
    origin_window_count: usize,
    enter_resize_generation: u64,
    saved_tabline_visible: Option<bool>,
    initial_height: usize,
    running_status: usize,
    cursor_row: Option<usize>,
    working_dir: Option<String>,
    origin_name_suppressed: bool,
}

impl DisplaySurfaceController {
    pub fn new(
        category: impl Into<String>,
        host: SharedHost,
        status: Rc<RefCell<StatusRegistry>>,
        config: ViewConfig,
        hooks: LifecycleHooks,
    ) -> Self {
        let category = category.into();
        let buffer_name = format!("sift://{category}");
        status.borrow_mut().ensure(&category);
        let reverse_order = config.reverse_order;
        Self {
            category,
            config,
            host,
            status,
            hooks,
            buffer: Rc::new(RefCell::new(ContentBuffer::new(buffer_name.clone()))),
            buffer_name,
            overlay: OverlayGroup::default(),
            surface: None,
            placement: None,
            state: ControllerState::Closed,
            flags: InvocationFlags::default(),
            reverse_order,
            origin: None,
            saved_views: HashMap::new(),
            saved_layout: None,
            origin_window_count: 0,
            enter_resize_generation: 0,
            saved_tabline_visible: None,
            initial_height: 0,
            running_status: 0,
            cursor_row: None,
            working_dir: None,
            origin_name_suppressed: false,
        }
    }

    // ------------------------------------------------------------------
    // Invocation flags and reverse-order bookkeeping

    pub fn set_invocation(&mut self, flags: InvocationFlags) {
        remember_reverse(&self.category, self.reverse_order);
        self.reverse_order = flags.reverse || self.config.reverse_order;
        self.flags = flags;
    }

    pub fn ignore_reverse(&mut self) {
        self.reverse_order = false;
    }

    pub fn use_last_reverse_order(&mut self) {
        if let Some(last) = recall_reverse(&self.category) {
            self.reverse_order = last;
        }
    }

    pub fn is_reverse_order(&self) -> bool {
        self.reverse_order
    }

    /// Reverse mode of the previous invocation for `category`, if any ran
    /// during this process.
    pub fn last_reverse_order(category: &str) -> Option<bool> {
        recall_reverse(category)
    }

    // ------------------------------------------------------------------
    // Enter / exit

    /// Opens the results surface at `placement`.
    ///
    /// When the current tabgroup already holds a live surface from this
    /// controller, entry short-circuits to re-activating it; no windows or
    /// buffers are created.
    pub fn enter(&mut self, placement: Placement) {
        debug_assert!(
            !matches!(
                self.state,
                ControllerState::Entering | ControllerState::Exiting
            ),
            "enter/exit must not overlap"
        );
        self.state = ControllerState::Entering;
        run_hook(&mut self.hooks.before_enter);

        if self.try_reuse(placement) {
            run_hook(&mut self.hooks.after_enter);
            self.state = ControllerState::Open;
            return;
        }

        self.status.borrow_mut().set_line_number(&self.category, 1);
        self.snapshot_views();
        self.capture_origin();

        match placement {
            Placement::Overlay => self.create_overlay(),
            Placement::FullScreen => self.create_full_screen(),
            Placement::Split(split) => self.create_split(split),
        }
        self.placement = Some(placement);

        self.restore_views();
        self.sync_status_line();
        run_hook(&mut self.hooks.after_enter);
        self.state = ControllerState::Open;
    }

    /// Tears the presentation down and restores the origin.
    ///
    /// Overlays are hidden rather than destroyed so the next entry is
    /// instant. Host refusals on the way out are logged and skipped over.
    pub fn exit(&mut self) {
        debug_assert!(
            matches!(self.state, ControllerState::Open),
            "exit without matching enter"
        );
        self.state = ControllerState::Exiting;
        run_hook(&mut self.hooks.before_exit);

        match self.placement {
            Some(Placement::Overlay) => {
                self.overlay.hide();
                run_hook(&mut self.hooks.after_exit);
                self.state = ControllerState::Closed;
                return;
            }
            Some(Placement::FullScreen) => self.exit_full_screen(),
            Some(Placement::Split(_)) => self.exit_split(),
            None => {}
        }

        self.restore_views();
        self.host.borrow_mut().request_redraw();
        run_hook(&mut self.hooks.after_exit);
        self.state = ControllerState::Closed;
    }

    /// Permanent teardown: closes the overlay group as well. The controller
    /// can be re-entered afterwards, but nothing is kept warm.
    pub fn dispose(&mut self) {
        self.overlay.close();
        self.surface = None;
        self.placement = None;
        self.state = ControllerState::Closed;
    }

    /// Reconciles controller state after the host dismissed overlay surfaces
    /// by some means other than [`DisplaySurfaceController::exit`].
    pub fn handle_external_close(&mut self, closed: &[SurfaceId]) {
        if !closed.iter().any(|id| self.overlay.contains(*id)) {
            return;
        }
        self.overlay.close();
        if matches!(self.placement, Some(Placement::Overlay)) {
            self.surface = None;
            if matches!(self.state, ControllerState::Open) {
                self.state = ControllerState::Closed;
            }
        }
    }

    fn try_reuse(&mut self, placement: Placement) -> bool {
        match placement {
            Placement::Overlay => {
                let current_tab = self.host.borrow().current_tab();
                let reusable = match self.overlay.content() {
                    Some(content) => content.valid() && content.tab() == current_tab,
                    None => return false,
                };
                if !reusable {
                    // stale group from another tabgroup or a cleared host
                    self.overlay.close();
                    return false;
                }
                self.overlay.show();
                self.surface = self.overlay.content().cloned();
                self.placement = Some(Placement::Overlay);
                true
            }
            Placement::Split(_) | Placement::FullScreen => {
                let Some(surface) = self.surface.as_ref() else {
                    return false;
                };
                if surface.backend() != SurfaceBackend::Split
                    || !surface.valid()
                    || surface.number().is_none()
                    || !Rc::ptr_eq(&surface.buffer(), &self.buffer)
                {
                    return false;
                }
                let window = surface.window();
                let tab = surface.tab();
                let mut host = self.host.borrow_mut();
                host.focus_tab(tab);
                host.focus_window(window)
            }
        }
    }

    fn capture_origin(&mut self) {
        let host = self.host.borrow();
        let window = host.current_window();
        self.origin = Some(OriginState {
            tab: host.current_tab(),
            window,
            window_number: host.window_number(window),
            buffer_name: host.current_buffer_name().map(|n| normalize_name(&n)),
            cursor: host.cursor(window).unwrap_or(CursorPos { row: 0, col: 0 }),
        });
        self.origin_window_count = host.windows().len();
        self.enter_resize_generation = host.resize_generation();
    }

    fn prepare_buffer(&mut self) {
        if !self.buffer.borrow().valid() {
            self.buffer = Rc::new(RefCell::new(ContentBuffer::new(self.buffer_name.clone())));
        }
        let keep =
            self.config.remember_last_search || self.flags.recall || self.flags.append;
        if !keep {
            let _ = self.buffer.borrow_mut().clear();
        }
    }

    fn create_split(&mut self, split: SplitPlacement) {
        self.prepare_buffer();
        self.saved_layout = Some(self.host.borrow().save_layout());

        let window = self
            .host
            .borrow_mut()
            .open_split(split, &self.buffer_name);
        let (tab, rows) = {
            let host = self.host.borrow();
            (host.window_tab(window), host.rows())
        };
        let tab = tab.unwrap_or_else(|| self.host.borrow().current_tab());

        let surface = SurfaceHandle::new(
            SurfaceBackend::Split,
            window,
            tab,
            Rc::clone(&self.host),
            Rc::clone(&self.buffer),
        );
        if let Some(height) = self.config.split_height {
            let _ = surface.set_height(height.resolve(rows).max(1));
        }
        let _ = self
            .host
            .borrow_mut()
            .apply_surface_attrs(window, &SurfaceAttrs::scratch(self.reverse_order));

        self.initial_height = surface.height().unwrap_or(0);
        if self.reverse_order && !self.flags.recall {
            let _ = surface.set_height(1);
        }
        self.surface = Some(surface);
    }

    fn create_full_screen(&mut self) {
        self.prepare_buffer();
        self.saved_layout = None;
        {
            let mut host = self.host.borrow_mut();
            if host.tab_count() < 2 {
                self.saved_tabline_visible = Some(host.tabline_visible());
                host.set_tabline_visible(false);
            }
        }

        let window = self.host.borrow_mut().open_tab(&self.buffer_name);
        let tab = {
            let host = self.host.borrow();
            host.window_tab(window).unwrap_or_else(|| host.current_tab())
        };

        let surface = SurfaceHandle::new(
            SurfaceBackend::Split,
            window,
            tab,
            Rc::clone(&self.host),
            Rc::clone(&self.buffer),
        );
        let _ = self
            .host
            .borrow_mut()
            .apply_surface_attrs(window, &SurfaceAttrs::scratch(self.reverse_order));
        self.initial_height = surface.height().unwrap_or(0);
        self.surface = Some(surface);
    }

    fn create_overlay(&mut self) {
        if !self.buffer.borrow().valid() {
            self.buffer = Rc::new(RefCell::new(ContentBuffer::new(self.buffer_name.clone())));
        }

        let (columns, rows, tab, cursor_anchored, cursor) = {
            let host = self.host.borrow();
            (
                host.columns(),
                host.rows(),
                host.current_tab(),
                host.supports_cursor_floats(),
                host.cursor_screen_pos(),
            )
        };
        // Cursor anchoring applies only when no explicit position pins the
        // overlay to the viewport.
        let plan = if cursor_anchored
            && self.config.horizontal == HorizontalMode::AtCursor
            && self.config.overlay_position.is_none()
        {
            anchored_overlay_plan(
                self.config.overlay_width,
                self.buffer.borrow().len().max(1),
                HorizontalMode::AtCursor,
                cursor,
                columns,
                rows,
                self.config.overlay_status_line,
            )
        } else {
            resolve_centered(
                self.config.overlay_width,
                self.config.overlay_height,
                self.config.overlay_position,
                self.config.overlay_status_line,
                columns,
                rows,
            )
        };

        let (content_win, input_win, status_win) = {
            let mut host = self.host.borrow_mut();
            let content_win = host.open_float(&plan.content);
            host.apply_surface_attrs(content_win, &SurfaceAttrs::scratch(false));
            let input_win = host.open_float(&plan.input);
            host.apply_surface_attrs(input_win, &SurfaceAttrs::prompt_line());
            let status_win = plan.status.map(|rect| {
                let window = host.open_float(&rect);
                host.apply_surface_attrs(window, &SurfaceAttrs::prompt_line());
                window
            });
            (content_win, input_win, status_win)
        };

        let content = SurfaceHandle::new(
            SurfaceBackend::Overlay,
            content_win,
            tab,
            Rc::clone(&self.host),
            Rc::clone(&self.buffer),
        );
        let input = SurfaceHandle::new(
            SurfaceBackend::Overlay,
            input_win,
            tab,
            Rc::clone(&self.host),
            Rc::new(RefCell::new(ContentBuffer::new(format!(
                "{}/prompt",
                self.buffer_name
            )))),
        );
        self.surface = Some(content.clone());
        self.overlay.set_content(content);
        self.overlay.set_input(input);
        if let Some(window) = status_win {
            self.overlay.set_status(SurfaceHandle::new(
                SurfaceBackend::Overlay,
                window,
                tab,
                Rc::clone(&self.host),
                Rc::new(RefCell::new(ContentBuffer::new(format!(
                    "{}/status",
                    self.buffer_name
                )))),
            ));
        }

        let mut group: Vec<WindowId> = vec![content_win, input_win];
        group.extend(status_win);
        self.host.borrow_mut().register_close_group(group);
        self.initial_height = plan.content.height;
    }

    fn exit_full_screen(&mut self) {
        let origin_tab = self.origin.as_ref().map(|origin| origin.tab);
        let surface_tab = self.surface.as_ref().map(SurfaceHandle::tab);
        let mut host = self.host.borrow_mut();
        if let Some(tab) = surface_tab {
            if !host.close_tab(tab) {
                warn!("results tab refused to close; forcing a blank window");
                host.force_blank_window();
            }
        }
        if let Some(tab) = origin_tab {
            if !host.focus_tab(tab) {
                debug!("origin tabgroup is gone");
            }
        }
        if let Some(visible) = self.saved_tabline_visible.take() {
            host.set_tabline_visible(visible);
        }
        drop(host);
        self.surface = None;
    }

    fn exit_split(&mut self) {
        self.snapshot_views();

        let remaining = self.host.borrow().windows().len();
        if remaining > 1 {
            if let Some(surface) = self.surface.take() {
                if surface.hide().is_err() {
                    debug!("results window already gone at exit");
                }
            }
            if let Some(origin) = self.origin.clone() {
                let mut host = self.host.borrow_mut();
                if !host.focus_window(origin.window) {
                    // ids are not stable across every host version
                    let refocused = origin
                        .window_number
                        .map(|number| host.focus_window_number(number))
                        .unwrap_or(false);
                    if !refocused {
                        debug!("origin window unreachable at exit");
                    }
                }
            }

            let (generation, count) = {
                let host = self.host.borrow();
                (host.resize_generation(), host.windows().len())
            };
            if generation == self.enter_resize_generation && count == self.origin_window_count {
                if let Some(layout) = self.saved_layout.take() {
                    if !self.host.borrow_mut().apply_layout(&layout) {
                        warn!("saved layout refused by host");
                    }
                }
            } else {
                self.saved_layout = None;
                debug!("{}", SurfaceError::RestoreSkipped);
            }
        } else {
            // last visible window: drop the scratch buffer outright
            self.buffer.borrow_mut().invalidate();
            self.surface = None;
        }
    }

    fn snapshot_views(&mut self) {
        let _guard = EventSuppressionGuard::new(Rc::clone(&self.host));
        let host = self.host.borrow();
        self.saved_views.clear();
        for window in host.windows() {
            if let Some(view) = host.save_view(window) {
                self.saved_views.insert(window, view);
            }
        }
    }

    fn restore_views(&self) {
        let _guard = EventSuppressionGuard::new(Rc::clone(&self.host));
        let mut host = self.host.borrow_mut();
        for (window, view) in &self.saved_views {
            if !host.restore_view(*window, view) {
                debug!("view restore skipped for window {}", window.raw());
            }
        }
    }

    // ------------------------------------------------------------------
    // Content delivery

    /// Consumes a finite, non-restartable line source, flushing pending
    /// lines into the buffer on a soft cadence so the host stays responsive.
    ///
    /// The final buffer content always equals the full accumulated sequence
    /// regardless of flush timing. An interrupt observed on the token stops
    /// consumption at the next iteration boundary; content already flushed
    /// stays displayed and no error reaches the caller.
    pub fn populate<I>(
        &mut self,
        source: I,
        unit: usize,
        interrupt: &InterruptToken,
        on_complete: impl FnOnce(&[String]),
    ) -> Vec<String>
    where
        I: IntoIterator<Item = String>,
    {
        let unit = unit.max(1);
        let _ = self.buffer.borrow_mut().clear();

        let mut accumulated: Vec<String> = Vec::new();
        let mut last_flush = Instant::now();
        let mut last_pulse = last_flush;
        let mut interrupted = false;

        for line in source {
            if interrupt.interrupted() {
                debug!("{}", SurfaceError::Interrupted);
                interrupted = true;
                break;
            }
            accumulated.push(line);

            if last_flush.elapsed() >= FLUSH_INTERVAL {
                last_flush = Instant::now();
                let visible = self
                    .surface
                    .as_ref()
                    .and_then(|surface| surface.height().ok())
                    .unwrap_or(0);
                // A buffer taller than the window repaints at the end
                // instead; intermediate flushes would not be visible anyway.
                let fits = self.buffer.borrow().len() <= visible;
                if fits {
                    if self.set_content(&accumulated).is_err() {
                        break;
                    }
                    if self.reverse_order {
                        self.scroll_to_newest();
                    }
                }
                if last_pulse.elapsed() >= PULSE_INTERVAL {
                    last_pulse = Instant::now();
                    self.set_running(true);
                }
                let count = accumulated.len() / unit;
                self.set_total(count);
                self.set_results_count(count, false);
            }
        }

        if interrupted {
            // Content already flushed stays displayed; the caller sees no
            // error and no completion callback for an aborted run.
            self.set_running(false);
            return accumulated;
        }

        let _ = self.set_content(&accumulated);
        let count = accumulated.len() / unit;
        self.set_total(count);
        self.set_running(false);
        self.set_results_count(count, true);
        on_complete(&accumulated);
        accumulated
    }

    /// Replaces the displayed content, applying same-file suppression and
    /// reverse-order layout.
    ///
    /// The suppressed entry is removed from the displayed copy only; the
    /// caller's sequence is never mutated.
    pub fn set_content(&mut self, content: &[String]) -> Result<(), SurfaceError> {
        self.origin_name_suppressed = false;
        let mut display = sanitize(content);

        if self.config.ignore_current_buffer_name {
            if let Some(origin_name) = self
                .origin
                .as_ref()
                .and_then(|origin| origin.buffer_name.clone())
            {
                let visible = self
                    .surface
                    .as_ref()
                    .and_then(|surface| surface.height().ok())
                    .unwrap_or(display.len());
                let range = visible.min(display.len());
                if let Some(found) = display[..range]
                    .iter()
                    .position(|line| normalize_name(line) == origin_name)
                {
                    display.remove(found);
                    self.origin_name_suppressed = true;
                }
            }
        }

        if self.reverse_order {
            self.write_reversed(display, false)
        } else {
            self.buffer.borrow_mut().set_lines(display)
        }
    }

    /// Extends the displayed content without re-sending earlier lines.
    pub fn append_content(&mut self, content: &[String]) -> Result<(), SurfaceError> {
        let display = sanitize(content);
        if self.reverse_order {
            self.write_reversed(display, true)
        } else if self.buffer.borrow().is_empty() {
            self.buffer.borrow_mut().set_lines(display)
        } else {
            self.buffer.borrow_mut().append_lines(display)
        }
    }

    pub fn clear_content(&mut self) {
        let _ = self.buffer.borrow_mut().clear();
    }

    // Reverse-order write: newest first, growing the surface back toward its
    // initial height and keeping the cursor at the same offset from the
    // newest line.
    fn write_reversed(
        &mut self,
        mut display: Vec<String>,
        append: bool,
    ) -> Result<(), SurfaceError> {
        let old_row = self
            .surface
            .as_ref()
            .and_then(|surface| surface.cursor().ok())
            .map(|cursor| cursor.row);
        let old_len = self.buffer.borrow().len();

        display.reverse();
        if append && !self.buffer.borrow().is_empty() {
            self.buffer.borrow_mut().insert_top(display)?;
        } else {
            self.buffer.borrow_mut().set_lines(display)?;
        }

        let new_len = self.buffer.borrow().len();
        self.grow_reverse_surface(new_len);

        if let Some(surface) = self.surface.as_ref() {
            if new_len > 0 {
                let delta = new_len as isize - old_len as isize;
                let target = old_row.map(|row| row as isize + delta);
                let row = match target {
                    Some(row) if row >= 0 && (row as usize) < new_len => row as usize,
                    _ => new_len - 1,
                };
                let _ = surface.set_cursor(CursorPos { row, col: 0 });
            }
        }
        self.update_line_number();
        Ok(())
    }

    fn grow_reverse_surface(&self, len: usize) {
        let Some(surface) = self.surface.as_ref() else {
            return;
        };
        let initial = self.initial_height;
        if initial == 0 {
            return;
        }
        if len < initial {
            let height = if self.flags.no_wrap {
                len.max(1)
            } else {
                let columns = self.host.borrow().columns();
                initial
                    .min(display_rows(self.buffer.borrow().lines(), columns))
                    .max(1)
            };
            let _ = surface.set_height(height);
        } else if surface.height().map(|height| height < initial).unwrap_or(false) {
            let _ = surface.set_height(initial);
        }
    }

    fn scroll_to_newest(&mut self) {
        if let Some(surface) = self.surface.as_ref() {
            let len = self.buffer.borrow().len();
            if len > 0 {
                let _ = surface.set_cursor(CursorPos {
                    row: len - 1,
                    col: 0,
                });
            }
        }
        self.update_line_number();
    }

    // ------------------------------------------------------------------
    // Status fields

    pub fn set_category_label(&mut self, label: &str) {
        self.status
            .borrow_mut()
            .set_category_label(&self.category, label);
        self.status_changed();
    }

    pub fn set_mode(&mut self, mode: &str) {
        self.status.borrow_mut().set_mode(&self.category, mode);
        self.status_changed();
    }

    pub fn set_cwd(&mut self, cwd: &str) {
        self.status.borrow_mut().set_cwd(&self.category, cwd);
        self.status_changed();
    }

    pub fn set_total(&mut self, total: usize) {
        self.status.borrow_mut().set_total(&self.category, total);
        self.status_changed();
    }

    /// Reports the results count, optionally excluding the suppressed
    /// same-file entry from the figure.
    pub fn set_results_count(&mut self, count: usize, check_suppressed: bool) {
        let count = if check_suppressed && self.origin_name_suppressed {
            count.saturating_sub(1)
        } else {
            count
        };
        self.status
            .borrow_mut()
            .set_results_count(&self.category, count);
        self.status_changed();
    }

    /// Advances the running pulse, or resets it to the idle glyph.
    ///
    /// While a search is in flight the glyph alternates on successive calls,
    /// which reads as activity without needing a timer.
    pub fn set_running(&mut self, running: bool) {
        let glyph = if running {
            let glyph = RUNNING_GLYPHS[self.running_status];
            self.running_status = (self.running_status + 1) & 1;
            glyph
        } else {
            self.running_status = 0;
            IDLE_GLYPH
        };
        self.status
            .borrow_mut()
            .set_running_glyph(&self.category, glyph);
        self.status_changed();
    }

    fn update_line_number(&mut self) {
        if !self.reverse_order {
            return;
        }
        let Some(surface) = self.surface.as_ref() else {
            return;
        };
        let len = self.buffer.borrow().len();
        let row = surface
            .cursor()
            .map(|cursor| cursor.row)
            .unwrap_or_else(|_| len.saturating_sub(1));
        self.status
            .borrow_mut()
            .set_line_number(&self.category, len.saturating_sub(row).max(1));
    }

    fn sync_status_line(&mut self) {
        self.status.borrow_mut().ensure(&self.category);
        self.status_changed();
    }

    fn status_changed(&self) {
        self.refresh_prompt();
        self.host.borrow_mut().request_redraw();
    }

    // Floats do not participate in the host's status-line layout, so overlay
    // mode re-composes the prompt line instead.
    fn refresh_prompt(&self) {
        if !matches!(self.placement, Some(Placement::Overlay)) {
            return;
        }
        let Some(input) = self.overlay.input() else {
            return;
        };
        let line = self
            .status
            .borrow()
            .fields(&self.category)
            .map(|fields| fields.compose_prompt_line())
            .unwrap_or_default();
        let _ = input.buffer().borrow_mut().set_lines(vec![line]);
    }

    // ------------------------------------------------------------------
    // Accessors

    pub fn state(&self) -> ControllerState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, ControllerState::Open)
    }

    pub fn placement(&self) -> Option<Placement> {
        self.placement
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn buffer(&self) -> Rc<RefCell<ContentBuffer>> {
        Rc::clone(&self.buffer)
    }

    pub fn surface(&self) -> Option<&SurfaceHandle> {
        self.surface.as_ref()
    }

    pub fn overlay(&self) -> &OverlayGroup {
        &self.overlay
    }

    /// The line under the surface cursor, if the surface is live.
    pub fn current_line(&self) -> Option<String> {
        let surface = self.surface.as_ref()?;
        let cursor = surface.cursor().ok()?;
        self.buffer.borrow().line(cursor.row).map(str::to_string)
    }

    pub fn cursor_position(&self) -> Option<CursorPos> {
        self.surface.as_ref().and_then(|s| s.cursor().ok())
    }

    pub fn original_window(&self) -> Option<WindowId> {
        self.origin.as_ref().map(|origin| origin.window)
    }

    pub fn original_cursor(&self) -> Option<CursorPos> {
        self.origin.as_ref().map(|origin| origin.cursor)
    }

    pub fn original_buffer_name(&self) -> Option<&str> {
        self.origin
            .as_ref()
            .and_then(|origin| origin.buffer_name.as_deref())
    }

    /// Height the surface may grow back to while reverse-order content
    /// streams in; forward-order surfaces report a fixed page span.
    pub fn initial_window_height(&self) -> usize {
        if self.reverse_order {
            self.initial_height
        } else {
            FORWARD_HEIGHT_SPAN
        }
    }

    pub fn goto_original_window(&mut self) {
        let Some(origin) = self.origin.clone() else {
            return;
        };
        let mut host = self.host.borrow_mut();
        if !host.focus_window(origin.window) {
            if let Some(number) = origin.window_number {
                let _ = host.focus_window_number(number);
            }
        }
    }

    pub fn set_working_dir(&mut self, dir: impl Into<String>) {
        self.working_dir = Some(dir.into());
    }

    pub fn working_dir(&self) -> Option<&str> {
        self.working_dir.as_deref()
    }

    pub fn set_cursor_row(&mut self, row: Option<usize>) {
        self.cursor_row = row;
    }

    pub fn cursor_row(&self) -> Option<usize> {
        self.cursor_row
    }
}

fn run_hook(hook: &mut Option<Box<dyn FnMut()>>) {
    if let Some(hook) = hook.as_mut() {
        hook();
    }
}

fn normalize_name(name: &str) -> String {
    name.replace('\\', "/")
}

// Line sources promise terminator-free lines; stray trailing terminators are
// stripped rather than trusted.
fn sanitize(content: &[String]) -> Vec<String> {
    content
        .iter()
        .map(|line| line.trim_end_matches(['\r', '\n']).to_string())
        .collect()
}
