//! Fade curves for the two text layers.
//!
//! The incoming slot follows `fade_opacity(t)` / `blur_px(t)` directly; the
//! outgoing slot follows the same curves over `1 - t`.

pub const FADE_EXPONENT: f32 = 0.4;
pub const BLUR_SCALE: f32 = 8.0;
pub const BLUR_CAP: f32 = 100.0;

/// Floor for the blur denominator. The raw curve divides by `t`, which is
/// zero at the progress boundaries.
const MIN_DENOMINATOR: f32 = 1e-4;

/// Opacity percentage at progress `t`. `fade_opacity(0) = 0`,
/// `fade_opacity(1) = 100`.
pub fn fade_opacity(t: f32) -> f32 {
    t.clamp(0.0, 1.0).powf(FADE_EXPONENT) * 100.0
}

/// Blur radius in pixels at progress `t`. Zero at `t = 1`, capped at
/// [`BLUR_CAP`] as `t` approaches 0.
pub fn blur_px(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0).max(MIN_DENOMINATOR);
    (BLUR_SCALE / t - BLUR_SCALE).min(BLUR_CAP)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_monotonic(f: impl Fn(f32) -> f32, increasing: bool) {
        let mut prev = f(0.0);

        for i in 1..=100 {
            let t = i as f32 / 100.0;
            let val = f(t);

            if increasing {
                assert!(val >= prev - 1e-4, "non-increasing at t={t}: {prev} > {val}");
            } else {
                assert!(val <= prev + 1e-4, "non-decreasing at t={t}: {prev} < {val}");
            }

            prev = val;
        }
    }

    #[test]
    fn opacity_boundaries() {
        assert!(fade_opacity(0.0).abs() < 1e-6);
        assert!((fade_opacity(1.0) - 100.0).abs() < 1e-3);
    }

    #[test]
    fn opacity_monotonic_nondecreasing() {
        assert_monotonic(fade_opacity, true);
    }

    #[test]
    fn outgoing_opacity_monotonic_nonincreasing() {
        assert_monotonic(|t| fade_opacity(1.0 - t), false);
    }

    #[test]
    fn opacity_eases_fast_early() {
        // t^0.4 rises above linear: at t = 0.25 the word is already
        // well past quarter opacity.
        assert!(fade_opacity(0.25) > 25.0);
    }

    #[test]
    fn blur_boundaries() {
        assert!(blur_px(1.0).abs() < 1e-4);
        assert!((blur_px(0.0) - BLUR_CAP).abs() < 1e-3);
    }

    #[test]
    fn blur_monotonic_nonincreasing() {
        assert_monotonic(blur_px, false);
    }

    #[test]
    fn blur_finite_everywhere() {
        for i in 0..=1000 {
            let t = i as f32 / 1000.0;
            let b = blur_px(t);
            assert!(b.is_finite(), "blur at t={t} is {b}");
            assert!((0.0..=BLUR_CAP).contains(&b), "blur at t={t} is {b}");
        }
    }

    #[test]
    fn blur_midpoint_matches_raw_curve() {
        // Away from the boundaries the clamp must not perturb the curve.
        assert!((blur_px(0.5) - 8.0).abs() < 1e-4);
        assert!((blur_px(0.25) - 24.0).abs() < 1e-3);
    }
}
