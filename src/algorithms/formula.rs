//! Closed-form (Binet) walkthrough.

use crate::schema::{Explanation, Solution, Step};

use super::BuildError;

/// Largest `n` for which the `f64` closed form still rounds to the exact count.
pub const FORMULA_EXACT_LIMIT: i64 = 60;

/// Build the closed-form walkthrough for `n` stairs.
pub fn generate(n: i64) -> Result<Solution, BuildError> {
    if n <= 0 {
        let step = Step::new("With zero or fewer stairs there is nothing to climb: 0 ways")
            .with_formula("n <= 0, return 0");
        return Ok(Solution::single(0, step));
    }

    if n == 1 {
        let step =
            Step::new("A single stair can only be climbed one way").with_formula("n = 1, return 1");
        return Ok(Solution::single(1, step));
    }

    let result = closed_form(n)?;
    let sqrt5 = 5f64.sqrt();
    let phi = (1.0 + sqrt5) / 2.0;
    let psi = (1.0 - sqrt5) / 2.0;

    let timeline = vec![
        Step::new("Derive the characteristic equation of the recurrence")
            .with_formula("f(n) = f(n-1) + f(n-2)  =>  x^2 - x - 1 = 0")
            .with_explanation(Explanation::new(
                "Guess that f(n) grows like x^n.",
                "Substituting f(n) = x^n into the recurrence and dividing by x^(n-2) gives x^2 = x + 1.",
                "Linear homogeneous recurrences with constant coefficients are solved by the roots of \
                 their characteristic polynomial.",
            )),
        Step::new("Solve the characteristic equation").with_formula(format!(
            "roots: phi = (1+sqrt5)/2 ~ {phi:.3}, psi = (1-sqrt5)/2 ~ {psi:.3}"
        )),
        Step::new("Write the general solution as a combination of both roots")
            .with_formula("f(n) = c1*phi^n + c2*psi^n"),
        Step::new("Fix the coefficients from f(0) = 1 and f(1) = 1")
            .with_formula("c1 = phi/sqrt5, c2 = -psi/sqrt5"),
        Step::new("Final closed form")
            .with_formula("f(n) = (phi^(n+1) - psi^(n+1)) / sqrt5")
            .with_code("return Math.round((Math.pow(phi, n + 1) - Math.pow(psi, n + 1)) / Math.sqrt(5));"),
        Step::new(format!("Substitute n = {n}"))
            .with_formula(format!("f({n}) = {result}")),
    ];

    Ok(Solution {
        result,
        timeline,
        values: Vec::new(),
        statuses: Vec::new(),
    })
}

fn closed_form(n: i64) -> Result<u64, BuildError> {
    if n > FORMULA_EXACT_LIMIT {
        return Err(BuildError::Precision {
            n,
            limit: FORMULA_EXACT_LIMIT,
        });
    }
    let sqrt5 = 5f64.sqrt();
    let phi = (1.0 + sqrt5) / 2.0;
    let psi = (1.0 - sqrt5) / 2.0;
    let k = (n + 1) as i32;
    Ok(((phi.powi(k) - psi.powi(k)) / sqrt5).round() as u64)
}

/// Number of ways to climb `n` stairs via Binet's formula.
///
/// Returns `None` beyond [`FORMULA_EXACT_LIMIT`].
pub fn climb_stairs_formula(n: i64) -> Option<u64> {
    if n <= 0 {
        return Some(0);
    }
    closed_form(n).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::climb_stairs_dp;

    #[test]
    fn test_boundary_cases() {
        let zero = generate(0).unwrap();
        assert_eq!((zero.result, zero.timeline.len()), (0, 1));
        let one = generate(1).unwrap();
        assert_eq!((one.result, one.timeline.len()), (1, 1));
    }

    #[test]
    fn test_matches_dp_within_limit() {
        for n in 0..=FORMULA_EXACT_LIMIT {
            assert_eq!(climb_stairs_formula(n), climb_stairs_dp(n), "n = {n}");
        }
    }

    #[test]
    fn test_walkthrough_shape() {
        let solution = generate(6).unwrap();
        assert_eq!(solution.result, 13);
        assert_eq!(solution.timeline.len(), 6);
        assert!(solution.timeline.iter().all(|s| s.delta.formula_changed()));
        assert!(solution.values.is_empty());
    }

    #[test]
    fn test_precision_limit() {
        assert!(generate(FORMULA_EXACT_LIMIT).is_ok());
        assert!(matches!(
            generate(FORMULA_EXACT_LIMIT + 1),
            Err(BuildError::Precision { .. })
        ));
    }
}
