//! Panel transport trait
//!
//! Defines the interface the presentation loop uses to move pixels to the
//! display hardware. Implementations own the bus specifics (SPI transactions,
//! parallel bursts, DMA) and are expected to complete each push before
//! returning or to manage their own transfer queue.

use crate::geometry::PhysicalRect;
use crate::pixel::PanelPixel;

/// Pixel sink for one physical panel
///
/// A repaint pass is bracketed by exactly one `begin_write`/`end_write` pair
/// regardless of how many rectangles it pushes; implementations can map the
/// bracket onto a bus transaction or chip-select window to avoid per-rect
/// setup cost.
pub trait PanelTransport<P: PanelPixel> {
    /// Open the write bracket for a repaint pass
    fn begin_write(&mut self);

    /// Close the write bracket
    fn end_write(&mut self);

    /// Push one rectangle of pixels
    ///
    /// - `rect`: destination region in panel coordinates
    /// - `pixels`: source pixels, starting at the rectangle's origin
    /// - `stride`: pixels per source row; consecutive rectangle rows are
    ///   `stride` pixels apart in `pixels` (equal to `rect.size.width` for a
    ///   tightly packed source such as a single streamed line)
    fn push_rect(&mut self, rect: PhysicalRect, pixels: &[P], stride: usize);
}
