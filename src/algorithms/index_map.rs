//! Mapping between timeline steps and algorithm positions.
//!
//! A timeline is indexed by narrative step, while per-position values and
//! statuses are indexed by stair. The two index spaces only meet through the
//! node updates each step carries.

use crate::schema::Step;

/// Bidirectional lookup between timeline steps and stair positions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexMap {
    /// Stair each step is about, if any.
    focus: Vec<Option<usize>>,
    /// Stair the actor should stand on at each step.
    targets: Vec<usize>,
}

impl IndexMap {
    pub fn new(timeline: &[Step]) -> Self {
        let focus: Vec<Option<usize>> = timeline.iter().map(Step::focus).collect();

        let mut current = 0;
        let targets = focus
            .iter()
            .map(|f| {
                if let Some(stair) = f {
                    current = *stair;
                }
                current
            })
            .collect();

        Self { focus, targets }
    }

    /// Number of timeline steps covered.
    pub fn len(&self) -> usize {
        self.focus.len()
    }

    pub fn is_empty(&self) -> bool {
        self.focus.is_empty()
    }

    /// Stair position a step updates first, if it touches any.
    pub fn focus_of(&self, step: usize) -> Option<usize> {
        self.focus.get(step).copied().flatten()
    }

    /// Stair the actor stands on at `step`.
    ///
    /// Steps without node updates inherit the nearest earlier focus; steps
    /// before any focus, and out-of-range steps, map to stair 0.
    pub fn target_of(&self, step: usize) -> usize {
        self.targets.get(step).copied().unwrap_or(0)
    }

    /// Every step whose focus is `position`, in timeline order.
    pub fn steps_for(&self, position: usize) -> Vec<usize> {
        self.focus
            .iter()
            .enumerate()
            .filter(|(_, f)| **f == Some(position))
            .map(|(step, _)| step)
            .collect()
    }
}
