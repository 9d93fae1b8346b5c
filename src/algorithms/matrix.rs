//! Matrix fast-exponentiation walkthrough.
//!
//! `M = [[1,1],[1,0]]` satisfies `M^k = [[F(k+1), F(k)], [F(k), F(k-1)]]`, so the
//! number of ways to climb `n` stairs is `M^n[0][0]`.

use crate::schema::{MatrixUpdate, Solution, Step};

use super::BuildError;

type Mat2 = [[u64; 2]; 2];

const BASE: Mat2 = [[1, 1], [1, 0]];
const IDENTITY: Mat2 = [[1, 0], [0, 1]];

/// Build the matrix walkthrough for `n` stairs.
pub fn generate(n: i64) -> Result<Solution, BuildError> {
    if n <= 0 {
        let step = Step::new("With zero or fewer stairs there is nothing to climb: 0 ways")
            .with_matrix(vec![MatrixUpdate {
                row: 0,
                col: 0,
                value: 0,
            }])
            .with_formula("n <= 0, return 0");
        return Ok(Solution::single(0, step));
    }

    if n == 1 {
        let step = Step::new("A single stair can only be climbed one way")
            .with_matrix(vec![MatrixUpdate {
                row: 0,
                col: 0,
                value: 1,
            }])
            .with_formula("n = 1, return 1");
        return Ok(Solution::single(1, step));
    }

    let power = n as u64;
    let mut timeline = vec![
        Step::new("Build the base matrix M = [[1,1],[1,0]]")
            .with_matrix(MatrixUpdate::full(BASE))
            .with_formula("M = [[1,1],[1,0]]")
            .with_code("long[][] m = {{1, 1}, {1, 0}};"),
    ];

    let result = pow(power, &mut timeline)?;

    timeline.push(
        Step::new(format!("Read the answer from the top-left cell of M^{power}"))
            .with_matrix(MatrixUpdate::full(result))
            .with_formula(format!("f({n}) = M^{power}[0][0] = {}", result[0][0]))
            .with_code("return pow(m, n)[0][0];"),
    );

    Ok(Solution {
        result: result[0][0],
        timeline,
        values: Vec::new(),
        statuses: Vec::new(),
    })
}

/// `BASE^k`, recording one step per squaring (and multiply) in `timeline`.
fn pow(k: u64, timeline: &mut Vec<Step>) -> Result<Mat2, BuildError> {
    match k {
        0 => {
            timeline.push(
                Step::new("Any matrix to the power 0 is the identity")
                    .with_matrix(MatrixUpdate::full(IDENTITY))
                    .with_formula("M^0 = I"),
            );
            Ok(IDENTITY)
        }
        1 => {
            timeline.push(
                Step::new("M^1 is the base matrix itself")
                    .with_matrix(MatrixUpdate::full(BASE))
                    .with_formula("M^1 = M"),
            );
            Ok(BASE)
        }
        _ => {
            let half = pow(k / 2, timeline)?;
            let squared = mul(&half, &half).ok_or(BuildError::MatrixOverflow { power: k })?;
            let (result, description, formula) = if k % 2 == 0 {
                (
                    squared,
                    format!("Square: M^{k} = (M^{})^2", k / 2),
                    format!("M^{k} = (M^{})^2", k / 2),
                )
            } else {
                (
                    mul(&squared, &BASE).ok_or(BuildError::MatrixOverflow { power: k })?,
                    format!("Square and multiply: M^{k} = (M^{})^2 * M", k / 2),
                    format!("M^{k} = (M^{})^2 * M", k / 2),
                )
            };
            timeline.push(
                Step::new(description)
                    .with_matrix(MatrixUpdate::full(result))
                    .with_formula(formula),
            );
            Ok(result)
        }
    }
}

fn mul(a: &Mat2, b: &Mat2) -> Option<Mat2> {
    let mut out = [[0u64; 2]; 2];
    for i in 0..2 {
        for j in 0..2 {
            let mut acc = 0u64;
            for k in 0..2 {
                acc = acc.checked_add(a[i][k].checked_mul(b[k][j])?)?;
            }
            out[i][j] = acc;
        }
    }
    Some(out)
}

/// Number of ways to climb `n` stairs via `M^n[0][0]`.
///
/// Returns `None` when the count does not fit in a `u64`.
pub fn climb_stairs_matrix(n: i64) -> Option<u64> {
    if n <= 0 {
        return Some(0);
    }
    let mut result = IDENTITY;
    let mut base = BASE;
    let mut k = n as u64;
    while k > 0 {
        if k & 1 == 1 {
            result = mul(&result, &base)?;
        }
        k >>= 1;
        if k > 0 {
            base = mul(&base, &base)?;
        }
    }
    Some(result[0][0])
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
        assert!(one.values.is_empty());
    }

    #[test]
    fn test_matches_dp() {
        for n in 0..=92 {
            assert_eq!(climb_stairs_matrix(n), climb_stairs_dp(n), "n = {n}");
        }
        for n in 2..=40 {
            assert_eq!(Some(generate(n).unwrap().result), climb_stairs_dp(n));
        }
    }

    #[test]
    fn test_timeline_steps_cover_the_recursion() {
        // 6 -> 3 -> 1: base, M^1, M^3, M^6, answer
        let solution = generate(6).unwrap();
        assert_eq!(solution.result, 13);
        assert_eq!(solution.timeline.len(), 5);
        assert!(solution.timeline.iter().all(|s| s.delta.matrix_changed()));

        let last = solution.timeline.last().unwrap();
        assert_eq!(last.delta.matrix[0].value, 13);
    }

    #[test]
    fn test_overflow_is_reported() {
        assert!(generate(92).is_ok());
        assert!(generate(93).is_err());
        assert_eq!(climb_stairs_matrix(93), None);
    }
}
