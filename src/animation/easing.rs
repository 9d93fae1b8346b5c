//! Easing and interpolation helpers.

/// Quadratic ease-in/ease-out. Input is clamped to `[0, 1]`.
#[inline]
pub fn ease_in_out_quad(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        2.0 * t * t
    } else {
        -1.0 + (4.0 - 2.0 * t) * t
    }
}

#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ease_endpoints_and_symmetry() {
        assert_eq!(ease_in_out_quad(0.0), 0.0);
        assert_eq!(ease_in_out_quad(1.0), 1.0);
        assert!((ease_in_out_quad(0.5) - 0.5).abs() < 1e-6);
        for i in 0..=10 {
            let t = i as f32 / 10.0;
            let sum = ease_in_out_quad(t) + ease_in_out_quad(1.0 - t);
            assert!((sum - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_ease_clamps_and_is_monotonic() {
        assert_eq!(ease_in_out_quad(-1.0), 0.0);
        assert_eq!(ease_in_out_quad(2.0), 1.0);
        let mut prev = 0.0;
        for i in 1..=100 {
            let v = ease_in_out_quad(i as f32 / 100.0);
            assert!(v >= prev);
            prev = v;
        }
    }

    #[test]
    fn test_lerp() {
        assert_eq!(lerp(2.0, 4.0, 0.5), 3.0);
        assert_eq!(lerp(2.0, 4.0, 0.0), 2.0);
        assert_eq!(lerp(2.0, 4.0, 1.0), 4.0);
    }
}
