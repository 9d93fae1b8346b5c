//! Algorithms module - Step sequence builders for each supported algorithm.
//!
//! [`build`] is the only entry point the engine uses. It never fails: an
//! internal [`BuildError`] degrades to a one-step timeline with result 0.

pub mod dp;
pub mod formula;
pub mod matrix;

mod index_map;

pub use dp::climb_stairs_dp;
pub use formula::{FORMULA_EXACT_LIMIT, climb_stairs_formula};
pub use index_map::IndexMap;
pub use matrix::climb_stairs_matrix;

use crate::schema::{AlgorithmKind, Solution, Step};

/// Internal builder failures.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("the number of ways to reach stair {position} overflows u64")]
    Overflow { position: usize },
    #[error("M^{power} overflows u64")]
    MatrixOverflow { power: u64 },
    #[error("the closed form is inexact for n = {n} (limit {limit})")]
    Precision { n: i64, limit: i64 },
    #[error("stair count {0} does not fit in memory")]
    TooLarge(i64),
    #[error("builder produced an empty timeline")]
    EmptyTimeline,
}

/// Run the builder for `kind` on `n` stairs.
///
/// Always returns a non-empty timeline.
pub fn build(kind: AlgorithmKind, n: i64) -> Solution {
    let built = match kind {
        AlgorithmKind::Dp => dp::generate(n),
        AlgorithmKind::Matrix => matrix::generate(n),
        AlgorithmKind::Formula => formula::generate(n),
    }
    .and_then(|solution| {
        if solution.timeline.is_empty() {
            Err(BuildError::EmptyTimeline)
        } else {
            Ok(solution)
        }
    });

    match built {
        Ok(solution) => {
            log::info!(
                "Built {kind} timeline for n={n}: {} steps, result {}",
                solution.timeline.len(),
                solution.result
            );
            solution
        }
        Err(e) => {
            log::warn!("Building {kind} timeline for n={n} failed: {e}");
            Solution::single(0, Step::failure(kind, &e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_build_failure_degrades_to_single_step() {
        for (kind, n) in [
            (AlgorithmKind::Dp, 200),
            (AlgorithmKind::Matrix, 200),
            (AlgorithmKind::Formula, FORMULA_EXACT_LIMIT + 1),
        ] {
            let solution = build(kind, n);
            assert_eq!(solution.result, 0);
            assert_eq!(solution.timeline.len(), 1);
            assert!(solution.timeline[0].description.contains("Could not build"));
            assert!(solution.values.is_empty());
        }
    }

    #[test]
    fn test_build_is_referentially_stable() {
        for kind in AlgorithmKind::ALL {
            assert_eq!(build(kind, 7), build(kind, 7));
        }
    }

    #[test]
    fn test_all_kinds_agree() {
        for n in 0..=30 {
            let dp = build(AlgorithmKind::Dp, n).result;
            assert_eq!(build(AlgorithmKind::Matrix, n).result, dp);
            assert_eq!(build(AlgorithmKind::Formula, n).result, dp);
        }
    }

    proptest! {
        #[test]
        fn prop_timeline_never_empty(n in any::<i64>(), k in 0usize..3) {
            let solution = build(AlgorithmKind::ALL[k], n);
            prop_assert!(!solution.timeline.is_empty());
        }
    }
}
