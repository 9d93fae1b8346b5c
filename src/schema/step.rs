//! Timeline step types shared by the builders, the playback container and the renderer.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Algorithm whose walkthrough is being played back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlgorithmKind {
    /// Bottom-up dynamic programming over the stair positions.
    #[default]
    Dp,
    /// Fast exponentiation of the 2x2 step matrix.
    Matrix,
    /// Closed-form (Binet) formula.
    Formula,
}

impl AlgorithmKind {
    /// Every supported kind, in display order.
    pub const ALL: [AlgorithmKind; 3] = [Self::Dp, Self::Matrix, Self::Formula];

    /// Short lowercase name used in configs and on the command line.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dp => "dp",
            Self::Matrix => "matrix",
            Self::Formula => "formula",
        }
    }
}

impl fmt::Display for AlgorithmKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AlgorithmKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dp" => Ok(Self::Dp),
            "matrix" => Ok(Self::Matrix),
            "formula" => Ok(Self::Formula),
            other => Err(ConfigError::UnknownAlgorithm(other.to_string())),
        }
    }
}

/// Calculation status of one algorithm position (one stair).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    #[default]
    Uncalculated,
    Calculating,
    Calculated,
}

/// Property update for one staircase node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeUpdate {
    /// Algorithm position (stair index) being updated.
    pub index: usize,
    /// New value, if it changed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<u64>,
    /// New status, if it changed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<StepStatus>,
}

impl NodeUpdate {
    pub fn value(index: usize, value: u64) -> Self {
        Self {
            index,
            value: Some(value),
            status: None,
        }
    }

    pub fn status(index: usize, status: StepStatus) -> Self {
        Self {
            index,
            value: None,
            status: Some(status),
        }
    }

    pub fn calculated(index: usize, value: u64) -> Self {
        Self {
            index,
            value: Some(value),
            status: Some(StepStatus::Calculated),
        }
    }
}

/// Update of one matrix cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatrixUpdate {
    pub row: usize,
    pub col: usize,
    pub value: u64,
}

impl MatrixUpdate {
    /// Updates covering every cell of a 2x2 matrix.
    pub fn full(m: [[u64; 2]; 2]) -> Vec<MatrixUpdate> {
        let mut out = Vec::with_capacity(4);
        for (row, cells) in m.iter().enumerate() {
            for (col, &value) in cells.iter().enumerate() {
                out.push(MatrixUpdate { row, col, value });
            }
        }
        out
    }
}

/// Formula channel of a visual delta.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", content = "text", rename_all = "lowercase")]
pub enum FormulaChange {
    /// Keep whatever formula is currently shown.
    #[default]
    Unchanged,
    /// Replace the shown formula.
    Replace(String),
}

/// Structured patch describing what a step changes on screen.
///
/// The three channels are independent: an empty node or matrix list and
/// [`FormulaChange::Unchanged`] each mean "nothing changes in this channel".
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct VisualDelta {
    #[serde(default)]
    pub nodes: Vec<NodeUpdate>,
    #[serde(default)]
    pub matrix: Vec<MatrixUpdate>,
    #[serde(default)]
    pub formula: FormulaChange,
}

impl VisualDelta {
    pub fn nodes_changed(&self) -> bool {
        !self.nodes.is_empty()
    }

    pub fn matrix_changed(&self) -> bool {
        !self.matrix.is_empty()
    }

    pub fn formula_changed(&self) -> bool {
        matches!(self.formula, FormulaChange::Replace(_))
    }

    /// True when no channel changes.
    pub fn is_empty(&self) -> bool {
        !self.nodes_changed() && !self.matrix_changed() && !self.formula_changed()
    }
}

/// Prose explanation of a step at three levels of depth.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Explanation {
    pub simple: String,
    pub detailed: String,
    pub expert: String,
}

impl Explanation {
    pub fn new(
        simple: impl Into<String>,
        detailed: impl Into<String>,
        expert: impl Into<String>,
    ) -> Self {
        Self {
            simple: simple.into(),
            detailed: detailed.into(),
            expert: expert.into(),
        }
    }
}

/// One immutable, narrated instant of an algorithm walkthrough.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    /// Human-readable summary of this instant.
    pub description: String,
    /// What changed on screen.
    #[serde(default)]
    pub delta: VisualDelta,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<Explanation>,
    /// Source snippet shown beside the animation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl Step {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            delta: VisualDelta::default(),
            explanation: None,
            code: None,
        }
    }

    /// One-step timeline entry reporting a failed build.
    pub fn failure(kind: AlgorithmKind, reason: impl fmt::Display) -> Self {
        Self::new(format!(
            "Could not build the {kind} walkthrough ({reason}); showing result 0"
        ))
        .with_formula("f(n) = 0")
    }

    pub fn with_nodes(mut self, nodes: Vec<NodeUpdate>) -> Self {
        self.delta.nodes = nodes;
        self
    }

    pub fn with_matrix(mut self, matrix: Vec<MatrixUpdate>) -> Self {
        self.delta.matrix = matrix;
        self
    }

    pub fn with_formula(mut self, formula: impl Into<String>) -> Self {
        self.delta.formula = FormulaChange::Replace(formula.into());
        self
    }

    pub fn with_explanation(mut self, explanation: Explanation) -> Self {
        self.explanation = Some(explanation);
        self
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Algorithm position this step is about: its first node update.
    pub fn focus(&self) -> Option<usize> {
        self.delta.nodes.first().map(|n| n.index)
    }

    /// True when the step shows the algorithm combining two earlier values.
    pub fn is_combining(&self) -> bool {
        self.delta
            .nodes
            .first()
            .is_some_and(|n| n.status == Some(StepStatus::Calculating))
    }

    /// Short explanation, if any.
    pub fn simple_explanation(&self) -> Option<&str> {
        self.explanation.as_ref().map(|e| e.simple.as_str())
    }
}

/// Output of a step sequence builder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Solution {
    /// Number of distinct ways to climb the staircase.
    pub result: u64,
    /// Ordered walkthrough; never empty.
    pub timeline: Vec<Step>,
    /// Per-position values, indexed by stair (`0..=n`). Empty when unused.
    #[serde(default)]
    pub values: Vec<u64>,
    /// Per-position statuses, indexed by stair (`0..=n`). Empty when unused.
    #[serde(default)]
    pub statuses: Vec<StepStatus>,
}

impl Solution {
    /// Solution holding a single step and no per-position data.
    pub fn single(result: u64, step: Step) -> Self {
        Self {
            result,
            timeline: vec![step],
            values: Vec::new(),
            statuses: Vec::new(),
        }
    }
}
