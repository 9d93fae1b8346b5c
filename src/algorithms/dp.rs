//! Bottom-up dynamic programming walkthrough.
//!
//! Timeline layout for `n >= 2`:
//!
//! ```text
//! 0        problem statement
//! 1..=2    recurrence f(n) = f(n-1) + f(n-2)
//! 3        base cases f(0) = f(1) = 1
//! 4..      one (prepare, combined) pair per stair i in 2..=n
//! 2n+2     result
//! 2n+3..   space optimisation and complexity notes
//! ```

use crate::schema::{Explanation, NodeUpdate, Solution, Step, StepStatus};

use super::BuildError;

/// Steps emitted before the first combine pair.
pub const INTRO_STEPS: usize = 4;

/// Steps emitted after the result step.
pub const CLOSING_STEPS: usize = 3;

/// Timeline index of the "prepare" step for stair `i` (`i >= 2`).
#[inline]
pub fn prepare_step(i: usize) -> usize {
    INTRO_STEPS + 2 * (i - 2)
}

/// Timeline index of the "combined" step for stair `i` (`i >= 2`).
#[inline]
pub fn combined_step(i: usize) -> usize {
    prepare_step(i) + 1
}

/// Build the DP walkthrough for `n` stairs.
pub fn generate(n: i64) -> Result<Solution, BuildError> {
    if n <= 0 {
        let step = Step::new("With zero or fewer stairs there is nothing to climb: 0 ways")
            .with_nodes(vec![NodeUpdate::calculated(0, 0)])
            .with_formula("n <= 0, return 0")
            .with_code("if (n <= 0) return 0;");
        return Ok(Solution::single(0, step));
    }

    if n == 1 {
        let step = Step::new("A single stair can only be climbed one way: one 1-stair move")
            .with_nodes(vec![NodeUpdate::calculated(0, 1), NodeUpdate::calculated(1, 1)])
            .with_formula("f(1) = 1")
            .with_code("if (n == 1) return 1;");
        return Ok(Solution {
            result: 1,
            timeline: vec![step],
            values: vec![1, 1],
            statuses: vec![StepStatus::Calculated; 2],
        });
    }

    let n = usize::try_from(n).map_err(|_| BuildError::TooLarge(n))?;
    let values = table(n)?;

    let mut timeline = Vec::with_capacity(2 * n + 6);

    timeline.push(
        Step::new(format!(
            "Climbing stairs: each move climbs 1 or 2 stairs. How many distinct ways reach stair {n}?"
        ))
        .with_formula("Dynamic programming"),
    );
    timeline.push(
        Step::new("The key to dynamic programming is a recurrence: think about the last move onto stair n")
            .with_formula("f(n) = f(n-1) + f(n-2)"),
    );
    timeline.push(
        Step::new(
            "Stair n is reached from stair n-1 with a 1-stair move or from stair n-2 with a 2-stair move, \
             so f(n) = f(n-1) + f(n-2)",
        )
        .with_formula("f(n) = f(n-1) + f(n-2)")
        .with_explanation(Explanation::new(
            "Every path ends with a small or a big step.",
            "The last move is either 1 stair (from n-1) or 2 stairs (from n-2); the two groups never overlap, \
             so their counts add up.",
            "f satisfies the Fibonacci recurrence shifted by one: f(n) = F(n+1).",
        )),
    );
    timeline.push(
        Step::new("Base cases: stair 0 is the start (1 way, stay put) and stair 1 has 1 way (one 1-stair move)")
            .with_nodes(vec![NodeUpdate::calculated(0, 1), NodeUpdate::calculated(1, 1)])
            .with_formula("f(0)=1, f(1)=1")
            .with_code("dp[0] = 1;\ndp[1] = 1;"),
    );

    for i in 2..=n {
        let (a, b, c) = (values[i - 1], values[i - 2], values[i]);

        timeline.push(
            Step::new(format!(
                "Preparing stair {i}: combine the results of stair {} and stair {}",
                i - 1,
                i - 2
            ))
            .with_nodes(vec![
                NodeUpdate::status(i, StepStatus::Calculating),
                NodeUpdate::value(i - 1, a),
                NodeUpdate::value(i - 2, b),
            ])
            .with_formula(format!("f({i}) = f({}) + f({})", i - 1, i - 2))
            .with_explanation(Explanation::new(
                format!("To reach stair {i} I come from stair {} or stair {}.", i - 1, i - 2),
                format!(
                    "There are {a} ways to stair {} and {b} ways to stair {}; each extends to stair {i} \
                     with exactly one more move.",
                    i - 1,
                    i - 2
                ),
                format!("dp[{i}] depends only on dp[{}] and dp[{}], both already final.", i - 1, i - 2),
            ))
            .with_code("for (int i = 2; i <= n; i++) {"),
        );

        timeline.push(
            Step::new(format!(
                "Combined stair {i}: {a} ways from stair {} plus {b} ways from stair {} gives {c}",
                i - 1,
                i - 2
            ))
            .with_nodes(vec![NodeUpdate::calculated(i, c)])
            .with_formula(format!("f({i})=f({})+f({})={a}+{b}={c}", i - 1, i - 2))
            .with_code("    dp[i] = dp[i - 1] + dp[i - 2];"),
        );
    }

    let result = values[n];
    timeline.push(
        Step::new(format!("Result: there are {result} distinct ways to reach stair {n}"))
            .with_nodes(vec![NodeUpdate::calculated(n, result)])
            .with_formula(format!("f({n})={result}"))
            .with_code("return dp[n];"),
    );
    timeline.push(
        Step::new("Optimisation: only the previous two values are ever read, so O(n) space can become O(1)")
            .with_formula("rolling variables: p=f(n-2), q=f(n-1), r=p+q"),
    );
    timeline.push(
        Step::new("Keep three variables p, q, r for f(n-2), f(n-1), f(n) and roll them forward after each stair")
            .with_formula("p <- q, q <- r, r = p + q")
            .with_code("int p = 1, q = 1, r = 1;\nfor (int i = 2; i <= n; i++) {\n    r = p + q;\n    p = q;\n    q = r;\n}"),
    );
    timeline.push(
        Step::new("Analysis: O(n) time and O(1) space, the optimal bottom-up solution")
            .with_formula("time O(n), space O(1)"),
    );

    Ok(Solution {
        result,
        timeline,
        statuses: vec![StepStatus::Calculated; values.len()],
        values,
    })
}

/// Filled DP table `dp[0..=n]`.
fn table(n: usize) -> Result<Vec<u64>, BuildError> {
    // Grown incrementally so huge `n` fails on overflow before allocating.
    let mut dp = Vec::with_capacity((n + 1).min(128));
    dp.extend([1u64, 1]);
    for i in 2..=n {
        let next = dp[i - 1]
            .checked_add(dp[i - 2])
            .ok_or(BuildError::Overflow { position: i })?;
        dp.push(next);
    }
    Ok(dp)
}

/// Number of ways to climb `n` stairs using rolling variables.
///
/// Returns `None` when the count does not fit in a `u64`.
pub fn climb_stairs_dp(n: i64) -> Option<u64> {
    if n <= 0 {
        return Some(0);
    }
    let (mut p, mut q) = (1u64, 1u64);
    for _ in 2..=n {
        let r = p.checked_add(q)?;
        p = q;
        q = r;
    }
    Some(q)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_boundary_cases() {
        let zero = generate(0).unwrap();
        assert_eq!(zero.result, 0);
        assert_eq!(zero.timeline.len(), 1);

        let negative = generate(-7).unwrap();
        assert_eq!(negative.result, 0);
        assert_eq!(negative.timeline.len(), 1);

        let one = generate(1).unwrap();
        assert_eq!(one.result, 1);
        assert_eq!(one.timeline.len(), 1);
        assert_eq!(one.values, vec![1, 1]);
    }

    #[test]
    fn test_six_stairs_values() {
        let solution = generate(6).unwrap();
        assert_eq!(solution.values, vec![1, 1, 2, 3, 5, 8, 13]);
        assert_eq!(solution.result, 13);
        assert!(solution
            .statuses
            .iter()
            .all(|s| *s == StepStatus::Calculated));
    }

    #[test]
    fn test_timeline_layout() {
        let n = 5;
        let solution = generate(n as i64).unwrap();
        assert_eq!(
            solution.timeline.len(),
            INTRO_STEPS + 2 * (n - 1) + 1 + CLOSING_STEPS
        );

        for i in 2..=n {
            let prepare = &solution.timeline[prepare_step(i)];
            let combined = &solution.timeline[combined_step(i)];
            assert_eq!(prepare.focus(), Some(i));
            assert!(prepare.is_combining());
            assert_eq!(combined.focus(), Some(i));
            assert_eq!(
                combined.delta.nodes[0].status,
                Some(StepStatus::Calculated)
            );
            assert_eq!(combined.delta.nodes[0].value, Some(solution.values[i]));
        }

        let result_step = &solution.timeline[combined_step(n) + 1];
        assert!(result_step.description.starts_with("Result"));
    }

    #[test]
    fn test_prepare_steps_carry_explanations() {
        let solution = generate(4).unwrap();
        for step in solution.timeline.iter().filter(|s| s.is_combining()) {
            assert!(step.simple_explanation().is_some());
        }
    }

    #[test]
    fn test_known_values() {
        assert_eq!(climb_stairs_dp(1), Some(1));
        assert_eq!(climb_stairs_dp(2), Some(2));
        assert_eq!(climb_stairs_dp(3), Some(3));
        assert_eq!(climb_stairs_dp(6), Some(13));
        assert_eq!(climb_stairs_dp(10), Some(89));
        assert_eq!(climb_stairs_dp(0), Some(0));
    }

    #[test]
    fn test_overflow_is_reported() {
        assert!(generate(92).is_ok());
        assert!(matches!(
            generate(93),
            Err(BuildError::Overflow { position: 93 })
        ));
        assert_eq!(climb_stairs_dp(93), None);
    }

    proptest! {
        #[test]
        fn prop_pair_count(n in 2i64..60) {
            let solution = generate(n).unwrap();
            let pairs = solution
                .timeline
                .windows(2)
                .filter(|w| w[0].is_combining() && w[1].focus() == w[0].focus())
                .count();
            prop_assert_eq!(pairs as i64, n - 1);
        }

        #[test]
        fn prop_recurrence(n in 2i64..90) {
            let solution = generate(n).unwrap();
            let len = n as usize + 1;
            prop_assert_eq!(solution.values.len(), len);
            prop_assert_eq!(solution.statuses.len(), len);
            prop_assert_eq!(solution.values[0], 1);
            prop_assert_eq!(solution.values[1], 1);
            for i in 2..len {
                if solution.statuses[i] == StepStatus::Calculated {
                    prop_assert_eq!(
                        solution.values[i],
                        solution.values[i - 1] + solution.values[i - 2]
                    );
                }
            }
            prop_assert_eq!(Some(solution.result), climb_stairs_dp(n));
        }
    }
}
