//! Stair positions on the rendering surface.

use serde::Serialize;

use super::path::Point;
use crate::schema::LayoutConfig;

const LEFT_MARGIN: f32 = 0.2;
const SPAN: f32 = 0.6;
const BASELINE: f32 = 0.85;
const WOBBLE: f32 = 15.0;

/// Upper bound on drawn stairs; larger problems never build a walkthrough.
const MAX_DRAWN: usize = 128;

/// Positions of stairs `0..count`, rising left to right.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StairLayout {
    stairs: Vec<Point>,
    stand_offset: f32,
}

impl StairLayout {
    /// Lay out `count` stairs (at least one).
    pub fn new(count: usize, config: &LayoutConfig) -> Self {
        let count = count.clamp(1, MAX_DRAWN);
        let (w, h) = (config.width, config.height);
        let denom = (count - 1).max(1) as f32;

        let stairs = (0..count)
            .map(|i| {
                let frac = i as f32 / denom;
                let wobble = (i as f32 * 0.5).sin() * WOBBLE;
                Point::new(
                    w * LEFT_MARGIN + w * SPAN * frac + wobble,
                    h * BASELINE - h * SPAN * frac,
                )
            })
            .collect();

        Self {
            stairs,
            stand_offset: config.stand_offset,
        }
    }

    /// Layout for an `n`-stair problem: positions `0..=n`.
    pub fn for_problem(n: i64, config: &LayoutConfig) -> Self {
        let count = usize::try_from(n).map_or(1, |n| n.saturating_add(1));
        Self::new(count, config)
    }

    pub fn len(&self) -> usize {
        self.stairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stairs.is_empty()
    }

    pub fn stairs(&self) -> &[Point] {
        &self.stairs
    }

    /// Stair `index`, clamped to the top stair.
    pub fn stair(&self, index: usize) -> Point {
        let last = self.stairs.len() - 1;
        self.stairs[index.min(last)]
    }

    /// Where the actor stands when resting on stair `index`.
    pub fn rest_point(&self, index: usize) -> Point {
        let stair = self.stair(index);
        Point::new(stair.x, stair.y - self.stand_offset)
    }
}
