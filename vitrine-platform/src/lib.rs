//! Render/output event loop for embedded pixel panels
//!
//! This crate contains the Vitrine presentation core:
//!
//! - `EventQueue` - ordered cross-thread deferred work with a wake signal
//! - `RedrawFlag` / `WindowSurface` - the renderable surface and its
//!   repaint-request bookkeeping
//! - `FrameStrategy` - single, double or line-streamed pixel delivery
//! - `EventLoop` - the orchestrator that interleaves timers, tasks, touch
//!   sampling and incremental repaint inside one bounded-polling task
//!
//! # Usage sketch
//!
//! ```ignore
//! static QUEUE: EventQueue = EventQueue::new();
//! static REDRAW: RedrawFlag = RedrawFlag::new();
//!
//! let mut config = PlatformConfig::new(PhysicalSize::new(320, 240));
//! config.panel = Some(panel);
//! config.touch = Some(touch);
//! config.buffer1 = Some(FRAME_A.init([Rgb565Pixel(0); 320 * 240]));
//! config.byte_swap = true;
//!
//! let mut event_loop = EventLoop::new(config, &QUEUE);
//! event_loop.create_window(renderer, &REDRAW)?;
//! event_loop.run(&mut timers).await;
//! ```
//!
//! Producers on other tasks or interrupt handlers call `QUEUE.enqueue(...)`,
//! `QUEUE.request_quit()` and `REDRAW.request()`; the loop wakes early on any
//! of them.

#![no_std]
#![deny(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

// Logging shim; must come first for macro visibility
#[macro_use]
mod fmt;

pub mod config;
pub mod event_loop;
pub mod frame;
pub mod pointer;
pub mod queue;
pub mod window;

// Re-export key types
pub use config::PlatformConfig;
pub use event_loop::{EventLoop, Rgb565EventLoop, Rgb888EventLoop, MAX_IDLE_WAIT};
pub use frame::FrameStrategy;
pub use pointer::TouchTracker;
pub use queue::{Drained, EventQueue, Task};
pub use window::{RedrawFlag, SurfaceError, WindowSurface};
