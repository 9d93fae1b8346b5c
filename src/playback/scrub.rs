//! Mapping between a scrub-bar position (percent) and a step index.

/// Step selected by a scrub bar at `percent` (0..=100).
pub fn progress_to_step(percent: f64, total_steps: usize) -> usize {
    if total_steps <= 1 || percent.is_nan() {
        return 0;
    }
    let percent = percent.clamp(0.0, 100.0);
    let step = (percent / 100.0 * total_steps as f64).floor() as usize;
    step.min(total_steps - 1)
}

/// Scrub-bar position (percent) of `step`.
pub fn step_to_progress(step: usize, total_steps: usize) -> f64 {
    if total_steps <= 1 {
        return 0.0;
    }
    let last = total_steps - 1;
    step.min(last) as f64 / last as f64 * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_endpoints() {
        assert_eq!(progress_to_step(0.0, 10), 0);
        assert_eq!(progress_to_step(100.0, 10), 9);
        assert_eq!(progress_to_step(55.0, 10), 5);
        assert_eq!(step_to_progress(0, 10), 0.0);
        assert_eq!(step_to_progress(9, 10), 100.0);
    }

    #[test]
    fn test_out_of_range_inputs_clamp() {
        assert_eq!(progress_to_step(-20.0, 10), 0);
        assert_eq!(progress_to_step(250.0, 10), 9);
        assert_eq!(progress_to_step(f64::INFINITY, 10), 9);
        assert_eq!(progress_to_step(f64::NAN, 10), 0);
        assert_eq!(step_to_progress(42, 10), 100.0);
    }

    #[test]
    fn test_degenerate_timelines() {
        for total in [0, 1] {
            assert_eq!(progress_to_step(73.0, total), 0);
            assert_eq!(step_to_progress(3, total), 0.0);
        }
    }

    proptest! {
        #[test]
        fn prop_scrub_round_trip(total in 2usize..5000, frac in 0.0f64..1.0) {
            let step = ((total - 1) as f64 * frac) as usize;
            prop_assert_eq!(progress_to_step(step_to_progress(step, total), total), step);
        }

        #[test]
        fn prop_progress_to_step_in_range(total in 0usize..5000, percent in -500.0f64..500.0) {
            prop_assert!(progress_to_step(percent, total) < total.max(1));
        }
    }
}
