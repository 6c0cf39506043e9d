//! Uniform handle over the two presentation backends.

use std::cell::RefCell;
use std::rc::Rc;

use crate::buffer::ContentBuffer;
use crate::error::SurfaceError;
use crate::host::{CursorPos, SharedHost, TabId, WindowId};

/// Stable identifier for a surface, derived from its host window.
#[repr(transparent)]
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct SurfaceId(u64);

impl SurfaceId {
    pub fn raw(self) -> u64 {
        self.0
    }

    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }
}

impl From<WindowId> for SurfaceId {
    fn from(window: WindowId) -> Self {
        Self(window.raw())
    }
}

/// Which presentation model backs a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceBackend {
    /// Conventional split region participating in the host layout.
    Split,
    /// Floating overlay surface outside the split layout.
    Overlay,
}

/// One visible rectangular region, independent of backend.
///
/// A handle does not keep its window alive: the host may invalidate the
/// backing buffer out-of-band (an external clear, a dismissed float), and
/// every geometry or cursor mutation re-checks [`SurfaceHandle::valid`]
/// first, failing with [`SurfaceError::SurfaceGone`] rather than assuming
/// liveness.
#[derive(Clone)]
pub struct SurfaceHandle {
    id: SurfaceId,
    backend: SurfaceBackend,
    window: WindowId,
    tab: TabId,
    host: SharedHost,
    buffer: Rc<RefCell<ContentBuffer>>,
}

impl SurfaceHandle {
    pub fn new(
        backend: SurfaceBackend,
        window: WindowId,
        tab: TabId,
        host: SharedHost,
        buffer: Rc<RefCell<ContentBuffer>>,
    ) -> Self {
        Self {
            id: SurfaceId::from(window),
            backend,
            window,
            tab,
            host,
            buffer,
        }
    }

    pub fn id(&self) -> SurfaceId {
        self.id
    }

    pub fn backend(&self) -> SurfaceBackend {
        self.backend
    }

    pub fn window(&self) -> WindowId {
        self.window
    }

    pub fn tab(&self) -> TabId {
        self.tab
    }

    pub fn buffer(&self) -> Rc<RefCell<ContentBuffer>> {
        Rc::clone(&self.buffer)
    }

    /// Rebinds the handle to a different content buffer.
    pub fn set_buffer(&mut self, buffer: Rc<RefCell<ContentBuffer>>) {
        self.buffer = buffer;
    }

    pub fn valid(&self) -> bool {
        self.buffer.borrow().valid() && self.host.borrow().window_valid(self.window)
    }

    pub fn cursor(&self) -> Result<CursorPos, SurfaceError> {
        self.ensure_valid()?;
        self.host
            .borrow()
            .cursor(self.window)
            .ok_or(SurfaceError::SurfaceGone)
    }

    pub fn set_cursor(&self, cursor: CursorPos) -> Result<(), SurfaceError> {
        self.ensure_valid()?;
        if self.host.borrow_mut().set_cursor(self.window, cursor) {
            Ok(())
        } else {
            Err(SurfaceError::SurfaceGone)
        }
    }

    pub fn height(&self) -> Result<usize, SurfaceError> {
        self.ensure_valid()?;
        self.host
            .borrow()
            .window_height(self.window)
            .ok_or(SurfaceError::SurfaceGone)
    }

    pub fn set_height(&self, height: usize) -> Result<(), SurfaceError> {
        self.ensure_valid()?;
        if self.host.borrow_mut().set_window_height(self.window, height) {
            Ok(())
        } else {
            Err(SurfaceError::SurfaceGone)
        }
    }

    pub fn width(&self) -> Result<usize, SurfaceError> {
        self.ensure_valid()?;
        self.host
            .borrow()
            .window_width(self.window)
            .ok_or(SurfaceError::SurfaceGone)
    }

    /// 1-based window number within the owning tabgroup. `None` when the
    /// window is hidden or gone.
    pub fn number(&self) -> Option<usize> {
        self.host.borrow().window_number(self.window)
    }

    pub fn show(&self) -> Result<(), SurfaceError> {
        match self.backend {
            SurfaceBackend::Split => Ok(()),
            SurfaceBackend::Overlay => {
                self.ensure_valid()?;
                if self.host.borrow_mut().show_float(self.window) {
                    Ok(())
                } else {
                    Err(SurfaceError::SurfaceGone)
                }
            }
        }
    }

    pub fn hide(&self) -> Result<(), SurfaceError> {
        self.ensure_valid()?;
        let done = match self.backend {
            SurfaceBackend::Split => self.host.borrow_mut().hide_window(self.window),
            SurfaceBackend::Overlay => self.host.borrow_mut().hide_float(self.window),
        };
        if done {
            Ok(())
        } else {
            Err(SurfaceError::SurfaceGone)
        }
    }

    pub fn close(&self) -> Result<(), SurfaceError> {
        self.ensure_valid()?;
        let done = match self.backend {
            SurfaceBackend::Split => self.host.borrow_mut().hide_window(self.window),
            SurfaceBackend::Overlay => self.host.borrow_mut().close_float(self.window),
        };
        if done {
            Ok(())
        } else {
            Err(SurfaceError::SurfaceGone)
        }
    }

    fn ensure_valid(&self) -> Result<(), SurfaceError> {
        if self.valid() {
            Ok(())
        } else {
            Err(SurfaceError::SurfaceGone)
        }
    }
}
