//! Numeric helpers shared by every progress computation.

/// Clamp `x` into `[lo, hi]`.
///
/// Unlike `f64::clamp` this never panics; NaN collapses to `lo`.
pub fn clamp(x: f64, lo: f64, hi: f64) -> f64 {
    if x.is_nan() || x < lo {
        lo
    } else if x > hi {
        hi
    } else {
        x
    }
}

/// Progress from `baseline` toward `target`, as a percentage in `[0, 100]`.
///
/// A degenerate range (`target == baseline`) yields 0 rather than an error.
pub fn percent(current: f64, baseline: f64, target: f64) -> f64 {
    if target == baseline {
        return 0.0;
    }
    clamp((current - baseline) / (target - baseline) * 100.0, 0.0, 100.0)
}

/// Weighted arithmetic mean of `(value, weight)` pairs; 0 when total weight is 0.
pub fn weighted_mean(values: &[(f64, u32)]) -> f64 {
    let total_weight: u64 = values.iter().map(|(_, w)| u64::from(*w)).sum();
    if total_weight == 0 {
        return 0.0;
    }
    let weighted: f64 = values.iter().map(|(v, w)| v * f64::from(*w)).sum();
    weighted / total_weight as f64
}

/// `part / whole` as a whole percentage, rounding halves up.
///
/// Integer arithmetic so that exact halves (1 of 200) round consistently.
pub fn ratio_percent(part: usize, whole: usize) -> u8 {
    if whole == 0 {
        return 0;
    }
    let part = part.min(whole) as u128;
    let whole = whole as u128;
    ((part * 200 + whole) / (whole * 2)) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_endpoints() {
        assert_eq!(percent(10.0, 10.0, 50.0), 0.0);
        assert_eq!(percent(50.0, 10.0, 50.0), 100.0);
        assert_eq!(percent(30.0, 10.0, 50.0), 50.0);
    }

    #[test]
    fn test_percent_degenerate_range_is_zero() {
        assert_eq!(percent(5.0, 7.0, 7.0), 0.0);
        assert_eq!(percent(7.0, 7.0, 7.0), 0.0);
    }

    #[test]
    fn test_percent_is_clamped() {
        assert_eq!(percent(150.0, 0.0, 100.0), 100.0);
        assert_eq!(percent(-20.0, 0.0, 100.0), 0.0);
        // A target below the baseline measures distance travelled toward it.
        assert_eq!(percent(40.0, 50.0, 10.0), 25.0);
        assert_eq!(percent(60.0, 50.0, 10.0), 0.0);
    }

    #[test]
    fn test_clamp() {
        assert_eq!(clamp(5.0, 0.0, 1.0), 1.0);
        assert_eq!(clamp(-5.0, 0.0, 1.0), 0.0);
        assert_eq!(clamp(0.25, 0.0, 1.0), 0.25);
        assert_eq!(clamp(f64::NAN, 0.0, 1.0), 0.0);
    }

    #[test]
    fn test_weighted_mean() {
        assert_eq!(weighted_mean(&[]), 0.0);
        assert_eq!(weighted_mean(&[(50.0, 1), (100.0, 1)]), 75.0);
        assert_eq!(weighted_mean(&[(100.0, 3), (50.0, 1)]), 87.5);
        assert_eq!(weighted_mean(&[(80.0, 0)]), 0.0);
    }

    #[test]
    fn test_ratio_percent_rounds_half_up() {
        assert_eq!(ratio_percent(0, 0), 0);
        assert_eq!(ratio_percent(1, 4), 25);
        assert_eq!(ratio_percent(1, 3), 33);
        assert_eq!(ratio_percent(2, 3), 67);
        assert_eq!(ratio_percent(1, 200), 1);
        assert_eq!(ratio_percent(1, 8), 13);
        assert_eq!(ratio_percent(5, 5), 100);
    }
}
