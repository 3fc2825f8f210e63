//! Exponential damping of behavior values over distance or time

use crate::interpolation::lerp;

/// Move `previous_offset` toward `target_offset` as the input advances by
/// `input_delta`, with `damping_gap` as the decay constant.
///
/// After an advance of one `damping_gap` the value has covered about 63% of
/// the way to the target. Non-positive deltas leave `previous_offset`
/// unchanged; an infinite gap never moves it.
pub fn damp_offset_transition(
    target_offset: f32,
    previous_offset: f32,
    input_delta: f32,
    damping_gap: f32,
) -> f32 {
    if input_delta <= 0.0 {
        return previous_offset;
    }
    let decay_ratio = (-input_delta / damping_gap).exp();
    lerp(target_offset, previous_offset, decay_ratio)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_positive_delta_is_noop() {
        assert_eq!(damp_offset_transition(10.0, 2.0, 0.0, 1.0), 2.0);
        assert_eq!(damp_offset_transition(10.0, 2.0, -5.0, 1.0), 2.0);
        assert_eq!(damp_offset_transition(10.0, -0.0, -1.0, 0.5), -0.0);
    }

    #[test]
    fn test_one_gap_covers_most_of_the_way() {
        let value = damp_offset_transition(1.0, 0.0, 2.0, 2.0);
        let expected = 1.0 - (-1.0f32).exp();
        assert!((value - expected).abs() < 1e-6);
        assert!(value > 0.63 && value < 0.64);
    }

    #[test]
    fn test_large_delta_reaches_target() {
        let value = damp_offset_transition(5.0, -3.0, 1000.0, 1.0);
        assert_eq!(value, 5.0);
    }

    #[test]
    fn test_infinite_gap_holds_previous() {
        assert_eq!(damp_offset_transition(5.0, -3.0, 10.0, f32::INFINITY), -3.0);
    }

    #[test]
    fn test_steps_compose() {
        // Two half steps land where one full step does
        let one = damp_offset_transition(1.0, 0.0, 1.0, 0.5);
        let half = damp_offset_transition(1.0, 0.0, 0.5, 0.5);
        let two = damp_offset_transition(1.0, half, 0.5, 0.5);
        assert!((one - two).abs() < 1e-6);
    }

    #[test]
    fn test_nan_delta_is_not_finite() {
        assert!(damp_offset_transition(1.0, 0.0, f32::NAN, 1.0).is_nan());
    }
}
