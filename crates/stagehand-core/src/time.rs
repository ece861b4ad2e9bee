//! Elapsed-time primitives for tick-driven logic
//!
//! Nothing here blocks; "waiting" is accumulated delta time compared against
//! a computed duration inside the host's frame loop.

/// A countdown armed for a fixed duration and ticked with elapsed seconds.
#[derive(Debug, Clone, Default)]
pub struct Cooldown {
    remaining: f32,
}

impl Cooldown {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm (or re-arm) the countdown for `duration` seconds.
    pub fn arm(&mut self, duration: f32) {
        self.remaining = duration.max(0.0);
    }

    /// Tick the countdown with the frame's elapsed seconds.
    pub fn advance(&mut self, delta: f32) {
        self.remaining = (self.remaining - delta.max(0.0)).max(0.0);
    }

    /// Whether the countdown is still running.
    pub fn is_active(&self) -> bool {
        self.remaining > 0.0
    }

    /// Seconds left until the countdown elapses.
    pub fn remaining(&self) -> f32 {
        self.remaining
    }

    /// Drop the countdown immediately.
    pub fn clear(&mut self) {
        self.remaining = 0.0;
    }
}
