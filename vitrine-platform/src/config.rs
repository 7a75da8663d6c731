//! Platform configuration
//!
//! Everything the application decides once at bring-up: panel geometry, the
//! transport and touch collaborators, which frame buffers exist, rotation
//! and transport byte order. Buffers are `'static` slices, typically
//! `StaticCell`-allocated alongside the peripherals.

use vitrine_display::{PanelPixel, PhysicalSize, Rotation};

/// Construction-time configuration for an [`EventLoop`](crate::EventLoop)
///
/// The buffer options select the delivery strategy: `buffer1` alone renders
/// in place, `buffer1` + `buffer2` double-buffers, neither streams rows
/// through a scratch line. Both buffers must hold one full frame
/// (`size.area()` pixels).
pub struct PlatformConfig<P, T, C>
where
    P: PanelPixel + 'static,
{
    /// Physical pixel dimensions of the surface
    pub size: PhysicalSize,
    /// Panel/bus transport; `None` runs headless (pixels are dropped)
    pub panel: Option<T>,
    /// Touch controller; `None` disables pointer synthesis
    pub touch: Option<C>,
    /// Primary frame buffer
    pub buffer1: Option<&'static mut [P]>,
    /// Secondary frame buffer for double-buffering
    pub buffer2: Option<&'static mut [P]>,
    /// Rendering rotation
    pub rotation: Rotation,
    /// Rewrite pixels to transport byte order before pushing
    pub byte_swap: bool,
}

impl<P, T, C> PlatformConfig<P, T, C>
where
    P: PanelPixel + 'static,
{
    /// Configuration with no collaborators, no buffers, no rotation and no
    /// byte swap; fill in what the board provides
    pub fn new(size: PhysicalSize) -> Self {
        Self {
            size,
            panel: None,
            touch: None,
            buffer1: None,
            buffer2: None,
            rotation: Rotation::default(),
            byte_swap: false,
        }
    }
}
