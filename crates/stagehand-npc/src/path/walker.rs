//! Traversal state over an immutable path plan

use glam::Vec3;

use super::PathPlan;

/// Events crossed while advancing along a plan, in path order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathEvent {
    /// Passed an original waypoint (never an intermediate curve sample).
    /// Carries the authored waypoint index.
    WaypointReached(usize),
    /// A looping plan wrapped back to its starting point.
    LoopCompleted,
    /// A finite plan reached its last point. Fired exactly once.
    Finished,
}

/// Walks a [`PathPlan`] by accumulated elapsed time.
///
/// One large advance may cross several segments; every event skipped over is
/// still reported, in order. After a finite plan finishes, further advances
/// are no-ops.
#[derive(Debug, Clone)]
pub struct PathWalker {
    plan: PathPlan,
    /// Plan index of the segment currently being traversed.
    cursor: usize,
    /// Seconds spent inside the current segment.
    segment_elapsed: f32,
    finished: bool,
}

impl PathWalker {
    pub fn new(plan: PathPlan) -> Self {
        let cursor = plan.starting_point();
        Self {
            plan,
            cursor,
            segment_elapsed: 0.0,
            finished: false,
        }
    }

    pub fn plan(&self) -> &PathPlan {
        &self.plan
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Advance by `delta` seconds, returning the events crossed.
    pub fn advance(&mut self, delta: f32) -> Vec<PathEvent> {
        let mut events = Vec::new();
        if self.finished {
            return events;
        }
        // A looping plan whose recurring cycle (starting point onward, plus
        // the wrap) has ~zero duration would spin forever; hold position and
        // report nothing instead.
        if self.plan.looping() {
            let lap: f32 = (self.plan.starting_point()..self.plan.point_count())
                .map(|index| self.plan.segment_duration(index))
                .sum();
            if lap <= f32::EPSILON {
                return events;
            }
        }

        let mut remaining = delta.max(0.0);
        let last = self.plan.point_count() - 1;

        loop {
            if !self.plan.looping() && self.cursor >= last {
                events.push(PathEvent::Finished);
                self.finished = true;
                break;
            }

            let duration = self.plan.segment_duration(self.cursor);
            let left = duration - self.segment_elapsed;
            if remaining < left {
                self.segment_elapsed += remaining;
                break;
            }

            remaining -= left;
            self.segment_elapsed = 0.0;

            let wrapped = self.plan.looping() && self.cursor == last;
            self.cursor = if wrapped {
                self.plan.starting_point()
            } else {
                self.cursor + 1
            };

            if let Some(waypoint) = self.plan.waypoint_at(self.cursor) {
                events.push(PathEvent::WaypointReached(waypoint));
            }
            if wrapped {
                events.push(PathEvent::LoopCompleted);
            }
        }

        events
    }

    /// Current interpolated position along the plan.
    pub fn position(&self) -> Vec3 {
        let current = self.plan.point(self.cursor);
        let Some(next_index) = self.plan.next_index(self.cursor) else {
            return current;
        };
        if self.finished {
            return current;
        }
        let duration = self.plan.segment_duration(self.cursor);
        if duration <= f32::EPSILON {
            return current;
        }
        let t = (self.segment_elapsed / duration).clamp(0.0, 1.0);
        current.lerp(self.plan.point(next_index), t)
    }

    /// Direction of travel through the current segment. Zero once finished
    /// or when the segment has no length.
    pub fn direction(&self) -> Vec3 {
        if self.finished {
            return Vec3::ZERO;
        }
        let Some(next_index) = self.plan.next_index(self.cursor) else {
            return Vec3::ZERO;
        };
        (self.plan.point(next_index) - self.plan.point(self.cursor)).normalize_or_zero()
    }
}
