//! Touch-to-pointer gesture synthesis
//!
//! Touch controllers are level-triggered: every poll answers "is a finger
//! down right now, and where". GUI toolkits want edges. The tracker keeps
//! the last position and pressed state across iterations and emits each edge
//! exactly once.

use heapless::Vec;

use vitrine_display::{LogicalPosition, PointerEvent, TouchSample};

/// Gesture state retained across loop iterations
#[derive(Debug, Default)]
pub struct TouchTracker {
    last: LogicalPosition,
    down: bool,
}

impl TouchTracker {
    pub const fn new() -> Self {
        Self {
            last: LogicalPosition::new(0.0, 0.0),
            down: false,
        }
    }

    /// Fold one poll result into the gesture state
    ///
    /// Raw coordinates are converted to logical ones by dividing by
    /// `scale_factor`. While held, a `Moved` is emitted every call, plus a
    /// `Pressed` (after the `Moved`) on the transition into contact. Losing
    /// contact emits `Released` at the last known position, then `Exited`.
    pub fn advance(
        &mut self,
        sample: Option<TouchSample>,
        scale_factor: f32,
    ) -> Vec<PointerEvent, 2> {
        let mut events = Vec::new();
        match sample {
            Some(sample) => {
                let position = LogicalPosition::new(
                    sample.x as f32 / scale_factor,
                    sample.y as f32 / scale_factor,
                );
                self.last = position;
                let _ = events.push(PointerEvent::Moved { position });
                if !self.down {
                    let _ = events.push(PointerEvent::Pressed { position });
                    self.down = true;
                }
            }
            None if self.down => {
                let _ = events.push(PointerEvent::Released {
                    position: self.last,
                });
                let _ = events.push(PointerEvent::Exited);
                self.down = false;
            }
            None => {}
        }
        events
    }

    /// True while a contact is being tracked
    pub fn is_down(&self) -> bool {
        self.down
    }
}
