//! Window surface and redraw-request bookkeeping
//!
//! The surface owns the scene renderer and its repaint flag. Only the loop
//! task touches the renderer; the flag is an atomic so the UI framework can
//! request a repaint from any context while the loop clears it.

use portable_atomic::{AtomicBool, Ordering};

use vitrine_display::{PhysicalSize, SceneRenderer};

/// Errors from window-surface construction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SurfaceError {
    /// A surface already exists; the loop drives exactly one window
    AlreadyCreated,
}

/// Repaint-request flag, settable from any context
///
/// Const-constructible so it can live in a `static` shared between the loop
/// and the UI framework's callbacks:
///
/// ```ignore
/// static REDRAW: RedrawFlag = RedrawFlag::new();
/// ```
///
/// Starts raised so the first loop iteration paints the full scene without
/// an explicit request.
pub struct RedrawFlag(AtomicBool);

impl RedrawFlag {
    pub const fn new() -> Self {
        Self(AtomicBool::new(true))
    }

    /// Raise the flag; idempotent
    pub fn request(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// True while a repaint is pending
    pub fn pending(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    /// Lower the flag, returning whether it was raised. Loop task only.
    pub(crate) fn take(&self) -> bool {
        self.0.swap(false, Ordering::AcqRel)
    }
}

impl Default for RedrawFlag {
    fn default() -> Self {
        Self::new()
    }
}

/// The renderable surface: scene renderer, fixed physical size, redraw flag
pub struct WindowSurface<R> {
    renderer: R,
    size: PhysicalSize,
    redraw: &'static RedrawFlag,
}

impl<R: SceneRenderer> WindowSurface<R> {
    pub(crate) fn new(renderer: R, size: PhysicalSize, redraw: &'static RedrawFlag) -> Self {
        Self {
            renderer,
            size,
            redraw,
        }
    }

    /// Physical size, fixed at creation
    pub fn size(&self) -> PhysicalSize {
        self.size
    }

    /// Request a repaint on the next loop iteration; idempotent
    pub fn request_redraw(&self) {
        self.redraw.request();
    }

    /// Clear the pending-repaint flag, returning whether it was set
    pub(crate) fn take_redraw(&self) -> bool {
        self.redraw.take()
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }
}
