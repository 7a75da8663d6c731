//! Touch input trait and pointer events
//!
//! Touch controllers report a level-triggered sample (a finger is on the
//! panel right now, at these coordinates). The presentation loop turns those
//! samples into the edge-triggered pointer gestures GUI toolkits expect.

use crate::geometry::LogicalPosition;

/// One polled touch sample in raw panel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TouchSample {
    pub x: i32,
    pub y: i32,
}

/// A polled touch controller
///
/// `poll` must not block; returning `None` means no finger is currently
/// down. Multi-touch controllers report their primary contact.
pub trait TouchSource {
    /// Sample the controller once
    fn poll(&mut self) -> Option<TouchSample>;
}

/// A pointer gesture synthesized from touch samples
///
/// Positions are logical (raw coordinates divided by the window's scale
/// factor). While a finger is held, `Moved` is emitted on every loop
/// iteration; `Pressed` and `Released` fire exactly once per contact, and a
/// `Released` is always followed by `Exited`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PointerEvent {
    /// Contact started
    Pressed { position: LogicalPosition },
    /// Contact is held at this position
    Moved { position: LogicalPosition },
    /// Contact ended; position is the last one sampled
    Released { position: LogicalPosition },
    /// The pointer left the surface (always after `Released`)
    Exited,
}
