//! Scene renderer contract
//!
//! The GUI toolkit is a black box to the presentation loop: it composites a
//! widget tree with its own software renderer and reports which rectangles
//! changed. These traits are the full extent of what the loop asks of it.

use core::ops::Range;

use heapless::Vec;

use crate::geometry::{PhysicalRect, PhysicalSize, Rotation};
use crate::input::PointerEvent;
use crate::pixel::PanelPixel;

/// Upper bound on tracked damage rectangles per repaint pass
pub const MAX_DAMAGE_RECTS: usize = 8;

/// How the renderer may reuse previously rendered frame content
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RepaintBuffer {
    /// One buffer, redrawn in place; the renderer composites against what it
    /// drew last pass
    Reused,
    /// Two buffers whose roles alternate; the renderer composites against the
    /// buffer from the pass before last
    Swapped,
}

/// The set of rectangles changed by one repaint pass
///
/// Bounded storage: pushing beyond [`MAX_DAMAGE_RECTS`] collapses the set to
/// a single bounding rectangle, so every reported pixel is still
/// retransmitted. Only valid for the pass that produced it.
#[derive(Debug, Clone, Default)]
pub struct DamageRegion {
    rects: Vec<PhysicalRect, MAX_DAMAGE_RECTS>,
}

impl DamageRegion {
    pub const fn new() -> Self {
        Self { rects: Vec::new() }
    }

    /// A region covering the whole surface
    pub fn full(size: PhysicalSize) -> Self {
        let mut region = Self::new();
        region.push(PhysicalRect::new(0, 0, size.width, size.height));
        region
    }

    /// Record a changed rectangle; empty rectangles are ignored
    pub fn push(&mut self, rect: PhysicalRect) {
        if rect.is_empty() {
            return;
        }
        if let Err(rect) = self.rects.push(rect) {
            let mut bounds = rect;
            for r in &self.rects {
                bounds = bounds.union(r);
            }
            self.rects.clear();
            // Capacity is nonzero, the push cannot fail
            let _ = self.rects.push(bounds);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &PhysicalRect> {
        self.rects.iter()
    }

    pub fn len(&self) -> usize {
        self.rects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }
}

/// Row-by-row rendering sink for buffer-less operation
///
/// The renderer calls `process_line` once per dirty row segment, top to
/// bottom; the implementation hands `render` a span of at least
/// `range.len()` pixels to fill, then disposes of the rendered row before
/// the next call.
pub trait LineProcessor<P: PanelPixel> {
    fn process_line(
        &mut self,
        y: usize,
        range: Range<usize>,
        render: &mut dyn FnMut(&mut [P]),
    );
}

/// The GUI toolkit's software renderer and window surface, seen from the loop
pub trait SceneRenderer {
    /// Pixel encoding this renderer produces
    type Pixel: PanelPixel;

    /// Tell the renderer which buffer-reuse contract the platform provides.
    /// Called once, at window creation.
    fn set_repaint_buffer(&mut self, kind: RepaintBuffer);

    /// Set the rendering rotation. Called once, at window creation.
    fn set_rotation(&mut self, rotation: Rotation);

    /// Ratio of physical to logical coordinates
    fn scale_factor(&self) -> f32;

    /// Deliver a synthesized pointer gesture to the scene
    fn dispatch_pointer(&mut self, event: PointerEvent);

    /// True while an animation is running and frames must not be throttled
    fn has_active_animations(&self) -> bool;

    /// Repaint into `buffer` (rows `stride` pixels apart) and report the
    /// changed rectangles
    fn render(&mut self, buffer: &mut [Self::Pixel], stride: usize) -> DamageRegion;

    /// Repaint dirty rows one at a time through `processor`, for platforms
    /// without a frame buffer
    fn render_by_line(&mut self, processor: &mut dyn LineProcessor<Self::Pixel>);
}

/// The GUI toolkit's timer and animation oracle
///
/// Advanced once per loop iteration, unconditionally: expiring timers are
/// what schedule future redraws, so starving the oracle stalls the UI.
pub trait TimerHost {
    /// Run due timers and step animations
    fn advance(&mut self);

    /// Time until the next timer is due, or `None` when none is pending
    fn duration_until_next(&self) -> Option<embassy_time::Duration>;
}
