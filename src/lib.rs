//! Display-surface controller for an editor-embedded, incrementally
//! populated results view.
//!
//! Invariant: enter/exit symmetry — every side effect performed while
//! opening a surface (splits, buffers, saved views, tab-line changes) is
//! undone by the matching exit, including after a user interrupt.
//!
//! # Public API Overview
//! - Implement [`Host`] to plug the controller into an editor.
//! - Drive a results view per category via [`DisplaySurfaceController`]:
//!   `enter`, `populate`, status setters, `exit`.
//! - Inspect surfaces through [`SurfaceHandle`] and [`OverlayGroup`].
//! - Use [`text`] width helpers for wrap-aware height math.

pub mod buffer;
pub mod config;
pub mod controller;
pub mod error;
pub mod geometry;
pub mod host;
pub mod overlay;
pub mod platform;
pub mod status;
pub mod surface;
pub mod text;

/// Controller types and lifecycle plumbing.
pub use crate::controller::{
    ControllerState, DisplaySurfaceController, InvocationFlags, LifecycleHooks, Placement,
};

/// Host-editor boundary.
pub use crate::host::{
    CursorPos, EventSuppressionGuard, Host, LayoutCommand, SharedHost, SplitPlacement,
    SurfaceAttrs, TabId, ViewState, WindowId,
};

/// Surface primitives.
pub use crate::buffer::ContentBuffer;
pub use crate::overlay::OverlayGroup;
pub use crate::surface::{SurfaceBackend, SurfaceHandle, SurfaceId};

/// Float placement.
pub use crate::geometry::{
    anchored_overlay_plan, resolve_anchored, resolve_centered, Anchor, FloatRect, HorizontalMode,
    OverlayPlan, SizeValue,
};

/// Status-line state.
pub use crate::status::{StatusFields, StatusRegistry};

/// Configuration and errors.
pub use crate::config::ViewConfig;
pub use crate::error::SurfaceError;

/// Cooperative cancellation.
pub use crate::platform::InterruptToken;

/// Display-width helpers for wrapped-line height accounting.
pub use crate::text::{display_rows, visible_width};
