//! The render/output event loop
//!
//! One dedicated loop task interleaves four duties, bounded per iteration:
//! advancing the toolkit's timers, draining one deferred task, folding a
//! touch sample into pointer gestures, and repainting whatever the renderer
//! reports as damaged. Between iterations the task parks on the queue's wake
//! signal for at most a small idle budget, so producers and timers are never
//! far from being served.
//!
//! Deferred tasks outrank repaint: an iteration that ran a task restarts
//! immediately, which bounds task latency and lets bursts of cross-thread
//! work drain ahead of pixel pushing.

use alloc::vec::Vec;
use core::ops::Range;

use embassy_futures::yield_now;
use embassy_time::{Duration, Instant};

use vitrine_display::{
    DamageRegion, LineProcessor, PanelPixel, PanelTransport, PhysicalRect, PhysicalSize,
    Rgb565Pixel, Rgb888Pixel, Rotation, SceneRenderer, TimerHost, TouchSource,
};

use crate::config::PlatformConfig;
use crate::frame::{swap_rect_bytes, FrameStrategy};
use crate::pointer::TouchTracker;
use crate::queue::{Drained, EventQueue};
use crate::window::{RedrawFlag, SurfaceError, WindowSurface};

/// Longest the loop parks between iterations when nothing is pending
pub const MAX_IDLE_WAIT: Duration = Duration::from_millis(10);

/// Orchestrator over an RGB565 panel
pub type Rgb565EventLoop<T, R, C> = EventLoop<Rgb565Pixel, T, R, C>;
/// Orchestrator over a 3-byte RGB panel
pub type Rgb888EventLoop<T, R, C> = EventLoop<Rgb888Pixel, T, R, C>;

/// What one loop iteration decided to do next
#[derive(Debug, PartialEq, Eq)]
enum LoopStep {
    /// Restart immediately (a task ran, or animations are active)
    Continue,
    /// Park on the wake signal for at most this long
    Wait(Duration),
    /// Terminate the loop
    Quit,
}

/// The render/output orchestrator
///
/// Constructed from a [`PlatformConfig`] and an injected `'static` queue;
/// runs as one dedicated task until [`EventQueue::request_quit`] is observed
/// with the queue drained. Without a window surface the loop still drains
/// tasks and advances timers; repaint and touch become no-ops.
pub struct EventLoop<P, T, R, C>
where
    P: PanelPixel + 'static,
    T: PanelTransport<P>,
    R: SceneRenderer<Pixel = P>,
    C: TouchSource,
{
    size: PhysicalSize,
    panel: Option<T>,
    touch: Option<C>,
    frame: FrameStrategy<P>,
    rotation: Rotation,
    byte_swap: bool,
    queue: &'static EventQueue,
    window: Option<WindowSurface<R>>,
    tracker: TouchTracker,
    started: Instant,
}

impl<P, T, R, C> EventLoop<P, T, R, C>
where
    P: PanelPixel + 'static,
    T: PanelTransport<P>,
    R: SceneRenderer<Pixel = P>,
    C: TouchSource,
{
    /// Wire a configuration into an orchestrator
    ///
    /// The buffering strategy is fixed here from the supplied buffers and
    /// never changes for the orchestrator's lifetime.
    pub fn new(config: PlatformConfig<P, T, C>, queue: &'static EventQueue) -> Self {
        Self {
            size: config.size,
            panel: config.panel,
            touch: config.touch,
            frame: FrameStrategy::from_buffers(config.buffer1, config.buffer2),
            rotation: config.rotation,
            byte_swap: config.byte_swap,
            queue,
            window: None,
            tracker: TouchTracker::new(),
            started: Instant::now(),
        }
    }

    /// Create the single window surface this loop drives
    ///
    /// The renderer is told the buffer-reuse contract and rotation here,
    /// once. A second call is a programming error: it logs, leaves the
    /// existing surface untouched and reports [`SurfaceError::AlreadyCreated`].
    pub fn create_window(
        &mut self,
        renderer: R,
        redraw: &'static RedrawFlag,
    ) -> Result<(), SurfaceError> {
        if self.window.is_some() {
            error!("fatal: create_window called more than once");
            return Err(SurfaceError::AlreadyCreated);
        }

        let mut window = WindowSurface::new(renderer, self.size, redraw);
        window
            .renderer_mut()
            .set_repaint_buffer(self.frame.repaint_buffer());
        window.renderer_mut().set_rotation(self.rotation);
        self.window = Some(window);
        Ok(())
    }

    pub fn window(&self) -> Option<&WindowSurface<R>> {
        self.window.as_ref()
    }

    pub fn window_mut(&mut self) -> Option<&mut WindowSurface<R>> {
        self.window.as_mut()
    }

    /// Monotonic time since this orchestrator was constructed; the platform
    /// time source for the toolkit
    pub fn duration_since_start(&self) -> Duration {
        self.started.elapsed()
    }

    /// Run until quit. Intended to be the body of one dedicated task.
    pub async fn run(&mut self, timers: &mut impl TimerHost) {
        info!("event loop running");
        loop {
            match self.step(timers) {
                LoopStep::Continue => yield_now().await,
                LoopStep::Wait(budget) => self.queue.wait(budget).await,
                LoopStep::Quit => break,
            }
        }
        info!("event loop quit");
    }

    /// One loop iteration, minus the parking
    fn step(&mut self, timers: &mut impl TimerHost) -> LoopStep {
        // Timers drive future redraws; they advance on every iteration no
        // matter what else happens
        timers.advance();

        match self.queue.drain_one() {
            Drained::Task(task) => {
                // Outside the queue lock; the task may re-enqueue
                task();
                return LoopStep::Continue;
            }
            Drained::Quit => return LoopStep::Quit,
            Drained::Idle => {}
        }

        self.sample_touch();
        self.repaint_if_needed();

        if self
            .window
            .as_ref()
            .map_or(false, |window| window.renderer().has_active_animations())
        {
            return LoopStep::Continue;
        }

        let mut budget = MAX_IDLE_WAIT;
        if let Some(until_next) = timers.duration_until_next() {
            budget = budget.min(until_next);
        }
        LoopStep::Wait(budget)
    }

    /// Poll the touch source once and dispatch the resulting gestures
    fn sample_touch(&mut self) {
        let EventLoop {
            window,
            touch,
            tracker,
            ..
        } = self;
        let window = match window {
            Some(window) => window,
            None => return,
        };

        let sample = touch.as_mut().and_then(TouchSource::poll);
        let scale_factor = window.renderer().scale_factor();
        for event in tracker.advance(sample, scale_factor) {
            window.renderer_mut().dispatch_pointer(event);
        }
    }

    /// Execute one repaint pass if a redraw is pending
    fn repaint_if_needed(&mut self) {
        let EventLoop {
            window,
            panel,
            frame,
            rotation,
            byte_swap,
            size,
            ..
        } = self;
        let window = match window {
            Some(window) => window,
            None => return,
        };
        // Cleared before painting: requests arriving mid-pass schedule the
        // next pass instead of being lost
        if !window.take_redraw() {
            return;
        }

        // Rotation swaps the fast-scan axis
        let stride = if rotation.swaps_axes() {
            size.height as usize
        } else {
            size.width as usize
        };

        // One write bracket around the whole pass, not per rectangle
        if let Some(panel) = panel.as_mut() {
            panel.begin_write();
        }

        match frame {
            FrameStrategy::Single { active } => {
                let region = window.renderer_mut().render(active, stride);
                push_frame(panel.as_mut(), active, &region, stride, *byte_swap);
            }
            FrameStrategy::Double { active, .. } => {
                let region = window.renderer_mut().render(active, stride);
                push_frame(panel.as_mut(), active, &region, stride, *byte_swap);
            }
            FrameStrategy::LineStreamed { scratch } => {
                let line = acquire_scratch(scratch, stride);
                let mut sink = LineSink {
                    line,
                    panel: panel.as_mut(),
                    byte_swap: *byte_swap,
                };
                window.renderer_mut().render_by_line(&mut sink);
            }
        }

        // Double-buffer roles alternate once the push is done, so the next
        // frame renders into what is now displayed; no-op otherwise
        frame.swap();

        if let Some(panel) = panel.as_mut() {
            panel.end_write();
        }
    }
}

/// Byte-swap damaged rectangles in place if requested, then push them
fn push_frame<P: PanelPixel, T: PanelTransport<P>>(
    panel: Option<&mut T>,
    buffer: &mut [P],
    region: &DamageRegion,
    stride: usize,
    byte_swap: bool,
) {
    if byte_swap {
        for rect in region.iter() {
            swap_rect_bytes(buffer, rect, stride);
        }
    }

    let panel = match panel {
        Some(panel) => panel,
        None => return,
    };
    for rect in region.iter() {
        let x0 = rect.origin.x.max(0) as usize;
        let y0 = rect.origin.y.max(0) as usize;
        let width = rect.size.width as usize;
        let height = rect.size.height as usize;
        let start = y0 * stride + x0;
        let end = start + (height - 1) * stride + width;
        if end > buffer.len() {
            warn!("damage rectangle outside the surface, skipped");
            continue;
        }
        panel.push_rect(*rect, &buffer[start..end], stride);
    }
}

/// Allocate the streaming scratch line on first use; it lives as long as the
/// orchestrator. Failure is fatal: there is no degraded mode without an
/// output buffer.
fn acquire_scratch<P: PanelPixel>(scratch: &mut Option<Vec<P>>, stride: usize) -> &mut [P] {
    let line = scratch.get_or_insert_with(|| {
        let mut line = Vec::new();
        if line.try_reserve_exact(stride).is_err() {
            error!("failed to allocate {} pixel line buffer", stride);
            panic!("line buffer allocation failed");
        }
        line.resize(stride, P::default());
        line
    });
    &mut line[..]
}

/// Row sink for line-streamed repaint: renderer fills the scratch span, the
/// sink reorders bytes if needed and pushes the row immediately
struct LineSink<'a, P: PanelPixel, T: PanelTransport<P>> {
    line: &'a mut [P],
    panel: Option<&'a mut T>,
    byte_swap: bool,
}

impl<P: PanelPixel, T: PanelTransport<P>> LineProcessor<P> for LineSink<'_, P, T> {
    fn process_line(&mut self, y: usize, range: Range<usize>, render: &mut dyn FnMut(&mut [P])) {
        let len = range.len().min(self.line.len());
        let span = &mut self.line[..len];
        render(span);
        if self.byte_swap {
            for pixel in span.iter_mut() {
                pixel.swap_bytes();
            }
        }
        if let Some(panel) = self.panel.as_mut() {
            let rect = PhysicalRect::new(range.start as i32, y as i32, len as u32, 1);
            panel.push_rect(rect, span, len);
        }
    }
}
