#![forbid(unsafe_code)]

//! Easing curves.
//!
//! Every curve maps progress `t` in [0, 1] to eased progress in [0, 1].
//! Inputs outside the unit interval are clamped first, so callers may pass
//! raw `elapsed / duration` ratios straight through.
//!
//! # Invariants
//!
//! 1. `f(0) == 0` and `f(1) == 1` for every curve.
//! 2. Every curve is monotonically non-decreasing on [0, 1].
//! 3. Curves are pure: same input, same output, no state.

/// Easing function signature: maps `t` in [0, 1] to output in [0, 1].
pub type EasingFn = fn(f32) -> f32;

/// Identity easing (constant velocity).
#[inline]
pub fn linear(t: f32) -> f32 {
    t.clamp(0.0, 1.0)
}

/// Cubic ease-in (slow start).
#[inline]
pub fn ease_in_cubic(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t * t
}

/// Cubic ease-out (slow end).
#[inline]
pub fn ease_out_cubic(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(3)
}

/// Cubic ease-in-out: accelerates up to the midpoint, then decelerates.
#[inline]
pub fn ease_in_out_cubic(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CURVES: [(&str, EasingFn); 4] = [
        ("linear", linear),
        ("ease_in_cubic", ease_in_cubic),
        ("ease_out_cubic", ease_out_cubic),
        ("ease_in_out_cubic", ease_in_out_cubic),
    ];

    #[test]
    fn endpoints_are_exact() {
        for (name, f) in CURVES {
            assert_eq!(f(0.0), 0.0, "{name}(0)");
            assert_eq!(f(1.0), 1.0, "{name}(1)");
        }
    }

    #[test]
    fn out_of_range_input_is_clamped() {
        for (name, f) in CURVES {
            assert_eq!(f(-3.0), 0.0, "{name}(-3)");
            assert_eq!(f(7.5), 1.0, "{name}(7.5)");
        }
    }

    #[test]
    fn in_out_cubic_is_half_at_midpoint() {
        assert!((ease_in_out_cubic(0.5) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn ease_out_leads_ease_in() {
        assert!((ease_out_cubic(0.5) - 0.875).abs() < 1e-6);
        assert!((ease_in_cubic(0.5) - 0.125).abs() < 1e-6);
    }

    #[test]
    fn ease_in_and_out_are_mirror_images() {
        for i in 0..=20 {
            let t = i as f32 / 20.0;
            let mirrored = 1.0 - ease_in_cubic(1.0 - t);
            assert!((ease_out_cubic(t) - mirrored).abs() < 1e-5, "t={t}");
        }
    }

    #[test]
    fn curves_are_monotonic() {
        for (name, f) in CURVES {
            let mut prev = 0.0f32;
            for i in 0..=1000 {
                let t = i as f32 / 1000.0;
                let v = f(t);
                assert!(v >= prev - 1e-6, "{name} not monotonic at t={t}");
                prev = v;
            }
        }
    }
}
