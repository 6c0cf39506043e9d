//! Error taxonomy for surface and lifecycle operations.

use std::error::Error;
use std::fmt;

/// Failures that can surface from display-surface operations.
///
/// None of these are fatal to the host: geometry overflow is recovered by
/// clamping, a skipped restore is logged, and an interrupt terminates the
/// populate loop early without reaching the caller as an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceError {
    /// The handle's backing window or buffer was destroyed out-of-band.
    SurfaceGone,
    /// A computed width/height exceeded the viewport before clamping.
    GeometryOverflow,
    /// Saved window geometry was discarded because the viewport was resized
    /// externally while the surface was open.
    RestoreSkipped,
    /// Cooperative cancellation observed while consuming a line source.
    Interrupted,
}

impl fmt::Display for SurfaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SurfaceError::SurfaceGone => {
                write!(f, "surface is no longer backed by a live window")
            }
            SurfaceError::GeometryOverflow => {
                write!(f, "requested geometry exceeds the viewport")
            }
            SurfaceError::RestoreSkipped => {
                write!(f, "saved window geometry discarded after an external resize")
            }
            SurfaceError::Interrupted => {
                write!(f, "interrupted while consuming the line source")
            }
        }
    }
}

impl Error for SurfaceError {}
