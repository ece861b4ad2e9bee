//! Scripted path following — waypoint plans and smooth-curve resampling
//!
//! A [`PathRequest`] describes an authored walk; [`PathPlan::build`] turns it
//! into a deterministic, timed point sequence. Curved requests are resampled
//! through a uniform Catmull-Rom spline into exactly four output points per
//! original waypoint. [`PathWalker`] owns the traversal state over a plan.

mod walker;

pub use walker::{PathEvent, PathWalker};

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Errors from building a path plan. All of them leave the NPC in its prior
/// mode; a rejected request applies nothing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    #[error("path needs at least one waypoint")]
    Empty,

    #[error("curved path needs at least two waypoints, got {0}")]
    CurveTooShort(usize),

    #[error("starting point {start} out of range for a {points}-point plan")]
    StartOutOfRange { start: usize, points: usize },
}

/// An authored walk request: waypoints plus pacing and shaping options.
///
/// Every option is optional in authored data; pacing falls back to the NPC's
/// configured walking speed when neither `speed` nor `total_duration` is set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PathRequest {
    /// Waypoints as originally authored.
    pub path: Vec<Vec3>,
    /// Meters per second. Overridden by `total_duration` when both are set.
    #[serde(default)]
    pub speed: Option<f32>,
    /// Seconds for the whole walk, split across segments by length.
    #[serde(default)]
    pub total_duration: Option<f32>,
    /// Resample through a smooth curve instead of straight segments.
    #[serde(default)]
    pub curve: bool,
    /// Wrap back to `starting_point` after the last point and keep going.
    #[serde(default, rename = "loop")]
    pub looping: bool,
    /// Index into the (possibly curved) point sequence to start from.
    #[serde(default)]
    pub starting_point: usize,
}

impl PathRequest {
    /// A plain straight-segment walk over `path` at the NPC's default speed.
    pub fn new(path: Vec<Vec3>) -> Self {
        Self {
            path,
            ..Default::default()
        }
    }
}

/// A deterministic, timed point sequence derived from a [`PathRequest`].
///
/// Immutable once built; traversal state lives in [`PathWalker`]. A new
/// follow-path call builds a new plan rather than mutating this one.
#[derive(Debug, Clone)]
pub struct PathPlan {
    points: Vec<Vec3>,
    /// `durations[i]` is the travel time from `points[i]` to its successor.
    /// Looping plans carry one duration per point (the last wraps back to
    /// the starting point); finite plans carry `points.len() - 1`.
    durations: Vec<f32>,
    /// `(plan_index, waypoint_index)` for every original waypoint, ascending
    /// by plan index. Intermediate curve points are not listed.
    waypoints: Vec<(usize, usize)>,
    looping: bool,
    starting_point: usize,
}

impl PathPlan {
    /// Build a plan from a request. `fallback_speed` applies when the request
    /// names neither a speed nor a total duration.
    pub fn build(request: &PathRequest, fallback_speed: f32) -> Result<Self, PathError> {
        if request.path.is_empty() {
            return Err(PathError::Empty);
        }
        if request.curve && request.path.len() < 2 {
            return Err(PathError::CurveTooShort(request.path.len()));
        }

        let (points, waypoints) = if request.curve {
            resample_curve(&request.path, request.looping)
        } else {
            let markers = (0..request.path.len()).map(|i| (i, i)).collect();
            (request.path.clone(), markers)
        };

        if request.starting_point >= points.len() {
            return Err(PathError::StartOutOfRange {
                start: request.starting_point,
                points: points.len(),
            });
        }

        let durations = segment_durations(&points, request, fallback_speed);

        Ok(Self {
            points,
            durations,
            waypoints,
            looping: request.looping,
            starting_point: request.starting_point,
        })
    }

    /// All plan points, originals and curve samples alike.
    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    pub fn point(&self, index: usize) -> Vec3 {
        self.points[index]
    }

    /// Travel time of the segment starting at `index`. For looping plans the
    /// last index is the wrap segment back to the starting point.
    pub fn segment_duration(&self, index: usize) -> f32 {
        self.durations[index]
    }

    /// Sum of all segment durations (one full lap for looping plans).
    pub fn total_duration(&self) -> f32 {
        self.durations.iter().sum()
    }

    /// The authored waypoint index at `plan_index`, if that plan point is an
    /// original waypoint rather than an intermediate curve sample.
    pub fn waypoint_at(&self, plan_index: usize) -> Option<usize> {
        self.waypoints
            .binary_search_by_key(&plan_index, |&(plan, _)| plan)
            .ok()
            .map(|found| self.waypoints[found].1)
    }

    /// `(plan_index, waypoint_index)` markers, ascending by plan index.
    pub fn waypoint_markers(&self) -> &[(usize, usize)] {
        &self.waypoints
    }

    pub fn looping(&self) -> bool {
        self.looping
    }

    pub fn starting_point(&self) -> usize {
        self.starting_point
    }

    /// Index of the plan point that follows `index`, honoring the loop wrap.
    /// `None` past the end of a finite plan.
    pub(crate) fn next_index(&self, index: usize) -> Option<usize> {
        if index + 1 < self.points.len() {
            Some(index + 1)
        } else if self.looping {
            Some(self.starting_point)
        } else {
            None
        }
    }
}

/// Per-segment travel times. `total_duration` splits proportionally to
/// segment length (evenly for zero-length paths); otherwise length / speed.
fn segment_durations(points: &[Vec3], request: &PathRequest, fallback_speed: f32) -> Vec<f32> {
    let mut lengths: Vec<f32> = points
        .windows(2)
        .map(|pair| (pair[1] - pair[0]).length())
        .collect();
    if request.looping && !points.is_empty() {
        let last = points[points.len() - 1];
        let wrap_target = points[request.starting_point];
        lengths.push((wrap_target - last).length());
    }

    if let Some(total) = request.total_duration {
        let total = total.max(0.0);
        let total_length: f32 = lengths.iter().sum();
        if total_length <= f32::EPSILON {
            let count = lengths.len().max(1) as f32;
            return lengths.iter().map(|_| total / count).collect();
        }
        return lengths
            .iter()
            .map(|length| total * length / total_length)
            .collect();
    }

    let speed = request
        .speed
        .filter(|speed| *speed > 0.0)
        .unwrap_or(fallback_speed)
        .max(f32::EPSILON);
    lengths.iter().map(|length| length / speed).collect()
}

/// Resample `path` into a smooth curve with exactly `4 * path.len()` points.
///
/// Piecewise uniform Catmull-Rom: each segment's tangents come from its
/// neighboring waypoints (clamped at open ends, wrapped for loops). The 4N
/// output points are spread across the segments as evenly as integer
/// division allows, so the spacing is uniform in spline parameter, not arc
/// length. Every original waypoint lands on an output point; the returned
/// markers record where.
fn resample_curve(path: &[Vec3], looping: bool) -> (Vec<Vec3>, Vec<(usize, usize)>) {
    let n = path.len();
    let total_points = n * 4;
    let mut points = Vec::with_capacity(total_points);
    let mut markers = Vec::with_capacity(n);

    let neighbor = |index: isize| -> Vec3 {
        if looping {
            path[index.rem_euclid(n as isize) as usize]
        } else {
            path[index.clamp(0, n as isize - 1) as usize]
        }
    };

    let segments = if looping { n } else { n - 1 };
    // Intervals between consecutive output points. The open case reserves the
    // final slot for the last waypoint itself.
    let intervals = if looping { total_points } else { total_points - 1 };
    let base = intervals / segments;
    let extra = intervals % segments;

    for segment in 0..segments {
        let steps = base + usize::from(segment < extra);
        let p0 = neighbor(segment as isize - 1);
        let p1 = neighbor(segment as isize);
        let p2 = neighbor(segment as isize + 1);
        let p3 = neighbor(segment as isize + 2);
        for step in 0..steps {
            if step == 0 {
                markers.push((points.len(), segment));
            }
            let t = step as f32 / steps as f32;
            points.push(catmull_rom(p0, p1, p2, p3, t));
        }
    }

    if !looping {
        markers.push((points.len(), n - 1));
        points.push(path[n - 1]);
    }

    (points, markers)
}

/// Uniform Catmull-Rom interpolation between `p1` and `p2` at parameter `t`.
fn catmull_rom(p0: Vec3, p1: Vec3, p2: Vec3, p3: Vec3, t: f32) -> Vec3 {
    let t2 = t * t;
    let t3 = t2 * t;
    0.5 * ((2.0 * p1)
        + (p2 - p0) * t
        + (2.0 * p0 - 5.0 * p1 + 4.0 * p2 - p3) * t2
        + (3.0 * p1 - p0 - 3.0 * p2 + p3) * t3)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(count: usize) -> Vec<Vec3> {
        (0..count).map(|i| Vec3::new(i as f32, 0.0, 0.0)).collect()
    }

    #[test]
    fn test_straight_plan_keeps_waypoints() {
        let request = PathRequest::new(line(4));
        let plan = PathPlan::build(&request, 2.0).unwrap();
        assert_eq!(plan.point_count(), 4);
        for (index, point) in plan.points().iter().enumerate() {
            assert_eq!(*point, Vec3::new(index as f32, 0.0, 0.0));
            assert_eq!(plan.waypoint_at(index), Some(index));
        }
    }

    #[test]
    fn test_speed_sets_segment_durations() {
        let request = PathRequest {
            speed: Some(2.0),
            ..PathRequest::new(line(3))
        };
        let plan = PathPlan::build(&request, 1.0).unwrap();
        // 1m segments at 2 m/s
        assert!((plan.segment_duration(0) - 0.5).abs() < 1e-5);
        assert!((plan.segment_duration(1) - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_total_duration_overrides_speed() {
        let request = PathRequest {
            speed: Some(100.0),
            total_duration: Some(6.0),
            ..PathRequest::new(vec![
                Vec3::ZERO,
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(3.0, 0.0, 0.0),
            ])
        };
        let plan = PathPlan::build(&request, 1.0).unwrap();
        assert!((plan.total_duration() - 6.0).abs() < 1e-4);
        // Split proportionally to segment length: 1m and 2m.
        assert!((plan.segment_duration(0) - 2.0).abs() < 1e-4);
        assert!((plan.segment_duration(1) - 4.0).abs() < 1e-4);
    }

    #[test]
    fn test_fallback_speed_applies() {
        let request = PathRequest::new(line(2));
        let plan = PathPlan::build(&request, 4.0).unwrap();
        assert!((plan.segment_duration(0) - 0.25).abs() < 1e-5);
    }

    #[test]
    fn test_curve_produces_four_points_per_waypoint() {
        for count in 2..6 {
            let request = PathRequest {
                curve: true,
                ..PathRequest::new(line(count))
            };
            let plan = PathPlan::build(&request, 1.0).unwrap();
            assert_eq!(plan.point_count(), count * 4, "{count} waypoints");
            assert_eq!(plan.waypoint_markers().len(), count);
        }
    }

    #[test]
    fn test_curve_passes_through_originals() {
        let path = vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(2.0, 1.0, 0.0),
            Vec3::new(4.0, 0.0, 3.0),
        ];
        let request = PathRequest {
            curve: true,
            ..PathRequest::new(path.clone())
        };
        let plan = PathPlan::build(&request, 1.0).unwrap();
        for (plan_index, waypoint_index) in plan.waypoint_markers() {
            let original = path[*waypoint_index];
            let sampled = plan.point(*plan_index);
            assert!(
                (sampled - original).length() < 1e-5,
                "waypoint {waypoint_index} at plan index {plan_index}"
            );
        }
        // Last output point is the final waypoint on open curves.
        assert_eq!(plan.waypoint_markers().last(), Some(&(11, 2)));
    }

    #[test]
    fn test_looping_curve_puts_waypoints_every_fourth_point() {
        let request = PathRequest {
            curve: true,
            looping: true,
            ..PathRequest::new(vec![
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(4.0, 0.0, 0.0),
                Vec3::new(4.0, 0.0, 4.0),
                Vec3::new(0.0, 0.0, 4.0),
            ])
        };
        let plan = PathPlan::build(&request, 1.0).unwrap();
        assert_eq!(plan.point_count(), 16);
        for (waypoint, marker) in plan.waypoint_markers().iter().enumerate() {
            assert_eq!(*marker, (waypoint * 4, waypoint));
        }
        // One duration per point, including the wrap segment.
        assert_eq!(plan.points().len(), 16);
        assert!(plan.segment_duration(15) >= 0.0);
    }

    #[test]
    fn test_single_point_path_is_legal() {
        let plan = PathPlan::build(&PathRequest::new(vec![Vec3::ONE]), 1.0).unwrap();
        assert_eq!(plan.point_count(), 1);
        assert_eq!(plan.total_duration(), 0.0);
    }

    #[test]
    fn test_empty_path_rejected() {
        let result = PathPlan::build(&PathRequest::new(vec![]), 1.0);
        assert_eq!(result.unwrap_err(), PathError::Empty);
    }

    #[test]
    fn test_curve_needs_two_points() {
        let request = PathRequest {
            curve: true,
            ..PathRequest::new(vec![Vec3::ZERO])
        };
        let result = PathPlan::build(&request, 1.0);
        assert_eq!(result.unwrap_err(), PathError::CurveTooShort(1));
    }

    #[test]
    fn test_starting_point_checked_against_resampled_length() {
        let base = PathRequest {
            curve: true,
            ..PathRequest::new(line(3))
        };

        let inside = PathRequest {
            starting_point: 11,
            ..base.clone()
        };
        assert!(PathPlan::build(&inside, 1.0).is_ok());

        let outside = PathRequest {
            starting_point: 12,
            ..base
        };
        assert_eq!(
            PathPlan::build(&outside, 1.0).unwrap_err(),
            PathError::StartOutOfRange {
                start: 12,
                points: 12
            }
        );
    }

    #[test]
    fn test_request_round_trips_through_json() {
        let json = r#"{
            "path": [[0.0, 0.0, 0.0], [1.0, 0.0, 2.0]],
            "total_duration": 3.5,
            "curve": true,
            "loop": true
        }"#;
        let request: PathRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.path.len(), 2);
        assert_eq!(request.total_duration, Some(3.5));
        assert!(request.curve);
        assert!(request.looping);
        assert_eq!(request.starting_point, 0);

        let back = serde_json::to_string(&request).unwrap();
        let again: PathRequest = serde_json::from_str(&back).unwrap();
        assert!(again.looping);
    }
}
