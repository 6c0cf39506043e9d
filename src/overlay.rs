//! Overlay presentation: the float pair (plus optional status line) that
//! together form one floating results view.

use crate::surface::{SurfaceHandle, SurfaceId};

/// Owns the related floating surfaces of one overlay presentation.
///
/// Slots are populated lazily on first overlay entry and survive `hide` so
/// the overlay can be re-shown instantly; `close` is reserved for permanent
/// teardown. All group operations apply to every non-empty slot and are
/// idempotent — a slot whose window is already gone is skipped.
#[derive(Default)]
pub struct OverlayGroup {
    content: Option<SurfaceHandle>,
    input: Option<SurfaceHandle>,
    status: Option<SurfaceHandle>,
}

impl OverlayGroup {
    pub fn content(&self) -> Option<&SurfaceHandle> {
        self.content.as_ref()
    }

    pub fn input(&self) -> Option<&SurfaceHandle> {
        self.input.as_ref()
    }

    pub fn status(&self) -> Option<&SurfaceHandle> {
        self.status.as_ref()
    }

    pub fn set_content(&mut self, surface: SurfaceHandle) {
        self.content = Some(surface);
    }

    pub fn set_input(&mut self, surface: SurfaceHandle) {
        self.input = Some(surface);
    }

    pub fn set_status(&mut self, surface: SurfaceHandle) {
        self.status = Some(surface);
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_none() && self.input.is_none() && self.status.is_none()
    }

    pub fn slots(&self) -> impl Iterator<Item = &SurfaceHandle> {
        self.content
            .iter()
            .chain(self.input.iter())
            .chain(self.status.iter())
    }

    /// Ids of every live slot, used to correlate an external close event
    /// back to this group.
    pub fn surface_ids(&self) -> Vec<SurfaceId> {
        self.slots().map(SurfaceHandle::id).collect()
    }

    pub fn contains(&self, id: SurfaceId) -> bool {
        self.slots().any(|surface| surface.id() == id)
    }

    pub fn show(&self) {
        for surface in self.slots() {
            let _ = surface.show();
        }
    }

    pub fn hide(&self) {
        for surface in self.slots() {
            let _ = surface.hide();
        }
    }

    /// Closes every slot and empties the group. Safe to call repeatedly.
    pub fn close(&mut self) {
        for surface in self.slots() {
            let _ = surface.close();
        }
        self.content = None;
        self.input = None;
        self.status = None;
    }
}
