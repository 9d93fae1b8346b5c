//! Curved climbing paths.

use serde::{Deserialize, Serialize};

use super::easing::lerp;

/// A coordinate on the rendering surface. `y` grows downward.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn lerp(self, other: Point, t: f32) -> Point {
        Point::new(lerp(self.x, other.x, t), lerp(self.y, other.y, t))
    }
}

/// Precomputed sequence of points the actor follows while moving.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ClimbPath {
    points: Vec<Point>,
}

impl ClimbPath {
    /// Quadratic curve from `from` to `to` bowing `arc_height` above the
    /// higher endpoint, as `segments + 1` points.
    pub fn arc(from: Point, to: Point, segments: usize, arc_height: f32) -> Self {
        let segments = segments.max(1);
        let control = Point::new((from.x + to.x) / 2.0, from.y.min(to.y) - arc_height);

        let points = (0..=segments)
            .map(|i| {
                let t = i as f32 / segments as f32;
                let u = 1.0 - t;
                Point::new(
                    u * u * from.x + 2.0 * u * t * control.x + t * t * to.x,
                    u * u * from.y + 2.0 * u * t * control.y + t * t * to.y,
                )
            })
            .collect();
        Self { points }
    }

    /// Degenerate path holding a single point.
    pub fn stationary(at: Point) -> Self {
        Self { points: vec![at] }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn start(&self) -> Point {
        self.points.first().copied().unwrap_or_default()
    }

    pub fn end(&self) -> Point {
        self.points.last().copied().unwrap_or_default()
    }

    /// Position at fraction `t` of the path.
    ///
    /// Interpolates linearly between the two points straddling `t`.
    pub fn sample(&self, t: f32) -> Point {
        let last = self.points.len().saturating_sub(1);
        if last == 0 {
            return self.start();
        }
        let f = t.clamp(0.0, 1.0) * last as f32;
        let i = f.floor() as usize;
        if i >= last {
            return self.end();
        }
        self.points[i].lerp(self.points[i + 1], f - i as f32)
    }
}
