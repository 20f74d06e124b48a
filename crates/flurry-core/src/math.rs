//! Small numeric helpers.

/// Clamp `value` into `[min, max]`.
///
/// Unlike [`f64::clamp`] this never panics: when the bounds cross (an area
/// narrower than a flake) the upper bound wins.
pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    value.max(min).min(max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_inside_and_outside() {
        assert_eq!(clamp(5.0, 0.0, 10.0), 5.0);
        assert_eq!(clamp(-1.0, 0.0, 10.0), 0.0);
        assert_eq!(clamp(11.0, 0.0, 10.0), 10.0);
    }

    #[test]
    fn test_clamp_crossed_bounds_prefers_max() {
        assert_eq!(clamp(50.0, 40.0, 30.0), 30.0);
        assert_eq!(clamp(10.0, 40.0, 30.0), 30.0);
    }
}
