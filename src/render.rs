//! Rendering surface boundary.
//!
//! The engine hands a [`RenderFrame`] to a [`RenderSurface`] once per display
//! frame. Surfaces only consume frames; user input goes back through the
//! engine's transport methods.

use std::io::{self, Write};

use serde::Serialize;

use crate::animation::{MotionState, Phase, Point};
use crate::schema::{AlgorithmKind, Explanation, FormulaChange, Step, StepStatus};

/// One staircase node as it should currently be drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct NodeView {
    pub value: Option<u64>,
    pub status: StepStatus,
}

/// Everything the visual deltas of steps `0..=step` have set.
///
/// Deltas are patches, so the scene at a step is their fold from the start
/// of the timeline. Scrubbing backward recomputes it exactly.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Scene {
    /// Indexed by stair position.
    pub nodes: Vec<NodeView>,
    /// Row-major matrix cells.
    pub matrix: Vec<Vec<u64>>,
    pub formula: Option<String>,
}

impl Scene {
    /// Scene after applying steps `0..=step` of `timeline`.
    pub fn at(timeline: &[Step], step: usize) -> Self {
        let mut scene = Scene::default();
        for s in timeline.iter().take(step.saturating_add(1)) {
            scene.apply(s);
        }
        scene
    }

    fn apply(&mut self, step: &Step) {
        for update in &step.delta.nodes {
            if self.nodes.len() <= update.index {
                self.nodes.resize(update.index + 1, NodeView::default());
            }
            let node = &mut self.nodes[update.index];
            if let Some(value) = update.value {
                node.value = Some(value);
            }
            if let Some(status) = update.status {
                node.status = status;
            }
        }
        for cell in &step.delta.matrix {
            if self.matrix.len() <= cell.row {
                self.matrix.resize(cell.row + 1, Vec::new());
            }
            let row = &mut self.matrix[cell.row];
            if row.len() <= cell.col {
                row.resize(cell.col + 1, 0);
            }
            row[cell.col] = cell.value;
        }
        if let FormulaChange::Replace(text) = &step.delta.formula {
            self.formula = Some(text.clone());
        }
    }
}

/// Per-frame view of the engine.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderFrame {
    pub algorithm: AlgorithmKind,
    pub current_step: usize,
    pub total_steps: usize,
    pub is_playing: bool,
    pub playback_speed: f64,
    /// Scrub-bar position of the current step, in percent.
    pub progress_percent: f64,
    pub description: String,
    pub explanation: Option<Explanation>,
    pub code: Option<String>,
    pub scene: Scene,
    pub stairs: Vec<Point>,
    pub motion: MotionState,
}

/// A consumer of render frames.
pub trait RenderSurface {
    type Error;

    fn render(&mut self, frame: &RenderFrame) -> Result<(), Self::Error>;
}

/// Writes one line per step change and per actor phase change.
#[derive(Debug)]
pub struct TextSurface<W: Write> {
    out: W,
    last: Option<(usize, Phase)>,
}

impl<W: Write> TextSurface<W> {
    pub fn new(out: W) -> Self {
        Self { out, last: None }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> RenderSurface for TextSurface<W> {
    type Error = io::Error;

    fn render(&mut self, frame: &RenderFrame) -> io::Result<()> {
        let key = (frame.current_step, frame.motion.phase);
        let Some((last_step, last_phase)) = self.last.replace(key) else {
            return self.write_step(frame);
        };
        if last_step != frame.current_step {
            self.write_step(frame)?;
        }
        if last_phase != frame.motion.phase {
            let m = &frame.motion;
            writeln!(
                self.out,
                "    actor {:?} ({:?}) stair {} -> {}",
                m.phase, m.pose, m.from_stair, m.to_stair
            )?;
            if let Some(speech) = &m.speech {
                writeln!(self.out, "    actor says: {speech}")?;
            }
        }
        Ok(())
    }
}

impl<W: Write> TextSurface<W> {
    fn write_step(&mut self, frame: &RenderFrame) -> io::Result<()> {
        writeln!(
            self.out,
            "[{:>3}/{}] {:5.1}% {}",
            frame.current_step + 1,
            frame.total_steps,
            frame.progress_percent,
            frame.description
        )?;
        if let Some(formula) = &frame.scene.formula {
            writeln!(self.out, "          {formula}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::{self, dp};

    #[test]
    fn test_scene_folds_deltas_up_to_step() {
        let solution = algorithms::build(AlgorithmKind::Dp, 6);
        let end = solution.timeline.len() - 1;

        let scene = Scene::at(&solution.timeline, end);
        let values: Vec<u64> = scene.nodes.iter().map(|n| n.value.unwrap_or(0)).collect();
        assert_eq!(values, solution.values);
        assert!(scene.nodes.iter().all(|n| n.status == StepStatus::Calculated));

        let mid = Scene::at(&solution.timeline, dp::prepare_step(4));
        assert_eq!(mid.nodes[4].status, StepStatus::Calculating);
        assert_eq!(mid.nodes[4].value, None);
        assert_eq!(mid.nodes.len(), 5);
    }

    #[test]
    fn test_scene_backward_scrub_is_exact() {
        let solution = algorithms::build(AlgorithmKind::Dp, 5);
        let forward = Scene::at(&solution.timeline, 6);
        let end = Scene::at(&solution.timeline, solution.timeline.len() - 1);
        assert_ne!(end, forward);
        assert_eq!(Scene::at(&solution.timeline, 6), forward);
    }

    #[test]
    fn test_scene_matrix_and_formula_channels() {
        let solution = algorithms::build(AlgorithmKind::Matrix, 6);
        let scene = Scene::at(&solution.timeline, solution.timeline.len() - 1);
        assert_eq!(scene.matrix, vec![vec![13, 8], vec![8, 5]]);
        assert_eq!(scene.formula.as_deref(), Some("f(6) = M^6[0][0] = 13"));
        assert!(scene.nodes.is_empty());
    }

    #[test]
    fn test_scene_before_any_formula() {
        let timeline = vec![Step::new("intro")];
        let scene = Scene::at(&timeline, 0);
        assert_eq!(scene, Scene::default());
        assert_eq!(Scene::at(&[], 3), Scene::default());
    }
}
