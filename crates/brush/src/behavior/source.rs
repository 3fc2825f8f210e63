//! Resolves behavior sources against the current stroke input

use std::f32::consts::FRAC_PI_2;

use glam::Vec2;

use crate::constants::MILLIS_PER_SECOND;
use crate::interpolation::{normalize_angle, normalize_angle_about_zero};
use crate::types::{InputModelerState, ModeledStrokeInput};

use super::Source;

/// Value of `source` for `input`, or `None` when it does not apply.
///
/// Sources are indeterminate when the device did not report the property
/// they read, when they need a physical stroke unit length that is unknown,
/// or when they need a travel direction before one has been established.
pub fn get_source_value(
    source: Source,
    input: &ModeledStrokeInput,
    travel_direction: Option<f32>,
    brush_size: f32,
    input_modeler_state: &InputModelerState,
) -> Option<f32> {
    let state = input_modeler_state;
    let seconds_to_millis = |seconds: f32| seconds * MILLIS_PER_SECOND;

    let value = match source {
        Source::NormalizedPressure => input.pressure?,
        Source::TiltInRadians => input.tilt?,
        Source::TiltXInRadians => {
            let (tilt, orientation) = tilt_and_orientation(input)?;
            (orientation.cos() * tilt.tan()).atan()
        }
        Source::TiltYInRadians => {
            let (tilt, orientation) = tilt_and_orientation(input)?;
            (orientation.sin() * tilt.tan()).atan()
        }
        Source::OrientationInRadians => input.orientation?,
        Source::OrientationAboutZeroInRadians => normalize_angle_about_zero(input.orientation?),
        Source::SpeedInMultiplesOfBrushSize => input.velocity.length() / brush_size,
        Source::VelocityXInMultiplesOfBrushSize => input.velocity.x / brush_size,
        Source::VelocityYInMultiplesOfBrushSize => input.velocity.y / brush_size,
        Source::DirectionInRadians => normalize_angle(travel_direction?),
        Source::DirectionAboutZeroInRadians => normalize_angle_about_zero(travel_direction?),
        Source::NormalizedDirectionX => travel_direction?.cos(),
        Source::NormalizedDirectionY => travel_direction?.sin(),
        Source::DistanceTraveledInMultiplesOfBrushSize => input.traveled_distance / brush_size,
        Source::TimeOfInputInSeconds => input.elapsed_time,
        Source::TimeOfInputInMillis => seconds_to_millis(input.elapsed_time),
        Source::PredictedDistanceTraveledInMultiplesOfBrushSize => {
            predicted_distance(input, state) / brush_size
        }
        Source::PredictedTimeElapsedInSeconds => predicted_time(input, state),
        Source::PredictedTimeElapsedInMillis => seconds_to_millis(predicted_time(input, state)),
        Source::DistanceRemainingInMultiplesOfBrushSize => {
            remaining_distance(input, state) / brush_size
        }
        Source::TimeSinceInputInSeconds => remaining_time(input, state),
        Source::TimeSinceInputInMillis => seconds_to_millis(remaining_time(input, state)),
        Source::AccelerationInMultiplesOfBrushSize => input.acceleration.length() / brush_size,
        Source::AccelerationXInMultiplesOfBrushSize => input.acceleration.x / brush_size,
        Source::AccelerationYInMultiplesOfBrushSize => input.acceleration.y / brush_size,
        Source::AccelerationForwardInMultiplesOfBrushSize => {
            forward_component(input.acceleration, travel_direction?) / brush_size
        }
        Source::AccelerationLateralInMultiplesOfBrushSize => {
            lateral_component(input.acceleration, travel_direction?) / brush_size
        }
        Source::InputSpeedInCentimetersPerSecond => {
            input.velocity.length() * state.stroke_unit_length?
        }
        Source::InputVelocityXInCentimetersPerSecond => {
            input.velocity.x * state.stroke_unit_length?
        }
        Source::InputVelocityYInCentimetersPerSecond => {
            input.velocity.y * state.stroke_unit_length?
        }
        Source::InputDistanceTraveledInCentimeters => {
            input.traveled_distance * state.stroke_unit_length?
        }
        Source::PredictedInputDistanceTraveledInCentimeters => {
            predicted_distance(input, state) * state.stroke_unit_length?
        }
        Source::InputAccelerationInCentimetersPerSecondSquared => {
            input.acceleration.length() * state.stroke_unit_length?
        }
        Source::InputAccelerationXInCentimetersPerSecondSquared => {
            input.acceleration.x * state.stroke_unit_length?
        }
        Source::InputAccelerationYInCentimetersPerSecondSquared => {
            input.acceleration.y * state.stroke_unit_length?
        }
        Source::InputAccelerationForwardInCentimetersPerSecondSquared => {
            let unit_length = state.stroke_unit_length?;
            forward_component(input.acceleration, travel_direction?) * unit_length
        }
        Source::InputAccelerationLateralInCentimetersPerSecondSquared => {
            let unit_length = state.stroke_unit_length?;
            lateral_component(input.acceleration, travel_direction?) * unit_length
        }
        Source::DistanceRemainingAsFractionOfStrokeLength => {
            if state.complete_traveled_distance <= 0.0 {
                return None;
            }
            remaining_distance(input, state) / state.complete_traveled_distance
        }
    };
    Some(value)
}

/// Tilt and orientation when both are reported and tilt-x/y are defined
fn tilt_and_orientation(input: &ModeledStrokeInput) -> Option<(f32, f32)> {
    let tilt = input.tilt?;
    let orientation = input.orientation?;
    // tan(90 degrees) is unbounded
    if tilt == FRAC_PI_2 {
        return None;
    }
    Some((tilt, orientation))
}

fn predicted_distance(input: &ModeledStrokeInput, state: &InputModelerState) -> f32 {
    (input.traveled_distance - state.total_real_distance).max(0.0)
}

fn predicted_time(input: &ModeledStrokeInput, state: &InputModelerState) -> f32 {
    (input.elapsed_time - state.total_real_elapsed_time).max(0.0)
}

fn remaining_distance(input: &ModeledStrokeInput, state: &InputModelerState) -> f32 {
    (state.complete_traveled_distance - input.traveled_distance).max(0.0)
}

fn remaining_time(input: &ModeledStrokeInput, state: &InputModelerState) -> f32 {
    (state.complete_elapsed_time - input.elapsed_time).max(0.0)
}

/// Component of `vector` along `direction`
fn forward_component(vector: Vec2, direction: f32) -> f32 {
    vector.dot(Vec2::from_angle(direction))
}

/// Component of `vector` along `direction` rotated a quarter turn counterclockwise
fn lateral_component(vector: Vec2, direction: f32) -> f32 {
    Vec2::from_angle(direction).perp_dot(vector)
}

#[cfg(test)]
mod tests {
    use std::f32::consts::{FRAC_PI_4, PI};

    use super::*;

    fn input() -> ModeledStrokeInput {
        ModeledStrokeInput {
            position: Vec2::new(5.0, 5.0),
            velocity: Vec2::new(3.0, 4.0),
            acceleration: Vec2::new(0.0, -2.0),
            traveled_distance: 20.0,
            elapsed_time: 0.5,
            pressure: Some(0.7),
            tilt: Some(FRAC_PI_4),
            orientation: Some(0.0),
        }
    }

    fn state() -> InputModelerState {
        InputModelerState {
            stroke_unit_length: Some(0.1),
            total_real_distance: 15.0,
            total_real_elapsed_time: 0.4,
            complete_traveled_distance: 40.0,
            complete_elapsed_time: 1.25,
            ..Default::default()
        }
    }

    fn value(source: Source) -> Option<f32> {
        get_source_value(source, &input(), Some(0.0), 2.0, &state())
    }

    fn approx(actual: Option<f32>, expected: f32) {
        let actual = actual.expect("source should be defined");
        assert!((actual - expected).abs() < 1e-4, "got {actual}, want {expected}");
    }

    #[test]
    fn test_pressure_and_missing_pressure() {
        approx(value(Source::NormalizedPressure), 0.7);
        let no_pressure = ModeledStrokeInput {
            pressure: None,
            ..input()
        };
        let result = get_source_value(Source::NormalizedPressure, &no_pressure, None, 2.0, &state());
        assert_eq!(result, None);
    }

    #[test]
    fn test_tilt_projections() {
        // Orientation 0 puts all of the tilt on the x axis
        approx(value(Source::TiltXInRadians), FRAC_PI_4);
        approx(value(Source::TiltYInRadians), 0.0);
        approx(value(Source::TiltInRadians), FRAC_PI_4);
    }

    #[test]
    fn test_tilt_projections_undefined() {
        let vertical = ModeledStrokeInput {
            tilt: Some(FRAC_PI_2),
            ..input()
        };
        for source in [Source::TiltXInRadians, Source::TiltYInRadians] {
            assert_eq!(get_source_value(source, &vertical, None, 1.0, &state()), None);
        }
        approx(
            get_source_value(Source::TiltInRadians, &vertical, None, 1.0, &state()),
            FRAC_PI_2,
        );

        let no_orientation = ModeledStrokeInput {
            orientation: None,
            ..input()
        };
        assert_eq!(
            get_source_value(Source::TiltXInRadians, &no_orientation, None, 1.0, &state()),
            None
        );
    }

    #[test]
    fn test_orientation_about_zero() {
        let turned = ModeledStrokeInput {
            orientation: Some(1.5 * PI),
            ..input()
        };
        approx(
            get_source_value(Source::OrientationAboutZeroInRadians, &turned, None, 1.0, &state()),
            -0.5 * PI,
        );
    }

    #[test]
    fn test_speed_and_velocity() {
        approx(value(Source::SpeedInMultiplesOfBrushSize), 2.5);
        approx(value(Source::VelocityXInMultiplesOfBrushSize), 1.5);
        approx(value(Source::VelocityYInMultiplesOfBrushSize), 2.0);
        approx(value(Source::InputSpeedInCentimetersPerSecond), 0.5);
        approx(value(Source::InputVelocityYInCentimetersPerSecond), 0.4);
    }

    #[test]
    fn test_direction_sources() {
        let direction = -0.5 * PI;
        let at = |source| get_source_value(source, &input(), Some(direction), 1.0, &state());
        approx(at(Source::DirectionInRadians), 1.5 * PI);
        approx(at(Source::DirectionAboutZeroInRadians), -0.5 * PI);
        approx(at(Source::NormalizedDirectionX), 0.0);
        approx(at(Source::NormalizedDirectionY), -1.0);

        for source in [
            Source::DirectionInRadians,
            Source::NormalizedDirectionX,
            Source::AccelerationForwardInMultiplesOfBrushSize,
            Source::InputAccelerationLateralInCentimetersPerSecondSquared,
        ] {
            assert_eq!(get_source_value(source, &input(), None, 1.0, &state()), None);
        }
    }

    #[test]
    fn test_acceleration_sources() {
        approx(value(Source::AccelerationInMultiplesOfBrushSize), 1.0);
        approx(value(Source::AccelerationYInMultiplesOfBrushSize), -1.0);
        // Travelling along +x, acceleration along -y is to the right
        approx(value(Source::AccelerationForwardInMultiplesOfBrushSize), 0.0);
        approx(value(Source::AccelerationLateralInMultiplesOfBrushSize), -1.0);
        approx(value(Source::InputAccelerationInCentimetersPerSecondSquared), 0.2);
        approx(value(Source::InputAccelerationLateralInCentimetersPerSecondSquared), -0.2);
    }

    #[test]
    fn test_distance_and_time_sources() {
        approx(value(Source::DistanceTraveledInMultiplesOfBrushSize), 10.0);
        approx(value(Source::InputDistanceTraveledInCentimeters), 2.0);
        approx(value(Source::TimeOfInputInSeconds), 0.5);
        approx(value(Source::TimeOfInputInMillis), 500.0);
        approx(value(Source::PredictedDistanceTraveledInMultiplesOfBrushSize), 2.5);
        approx(value(Source::PredictedInputDistanceTraveledInCentimeters), 0.5);
        approx(value(Source::PredictedTimeElapsedInSeconds), 0.1);
        approx(value(Source::PredictedTimeElapsedInMillis), 100.0);
        approx(value(Source::DistanceRemainingInMultiplesOfBrushSize), 10.0);
        approx(value(Source::TimeSinceInputInSeconds), 0.75);
        approx(value(Source::TimeSinceInputInMillis), 750.0);
        approx(value(Source::DistanceRemainingAsFractionOfStrokeLength), 0.5);
    }

    #[test]
    fn test_remaining_and_predicted_clamp_to_zero() {
        let past_end = ModeledStrokeInput {
            traveled_distance: 50.0,
            elapsed_time: 2.0,
            ..input()
        };
        let real_only = InputModelerState {
            total_real_distance: 60.0,
            total_real_elapsed_time: 3.0,
            ..state()
        };
        let at = |source| get_source_value(source, &past_end, None, 1.0, &real_only);
        assert_eq!(at(Source::DistanceRemainingInMultiplesOfBrushSize), Some(0.0));
        assert_eq!(at(Source::TimeSinceInputInSeconds), Some(0.0));
        assert_eq!(at(Source::PredictedDistanceTraveledInMultiplesOfBrushSize), Some(0.0));
        assert_eq!(at(Source::PredictedTimeElapsedInMillis), Some(0.0));
    }

    #[test]
    fn test_physical_sources_need_unit_length() {
        let unknown_units = InputModelerState {
            stroke_unit_length: None,
            ..state()
        };
        for source in [
            Source::InputSpeedInCentimetersPerSecond,
            Source::InputDistanceTraveledInCentimeters,
            Source::PredictedInputDistanceTraveledInCentimeters,
            Source::InputAccelerationXInCentimetersPerSecondSquared,
            Source::InputAccelerationForwardInCentimetersPerSecondSquared,
        ] {
            assert_eq!(
                get_source_value(source, &input(), Some(0.0), 1.0, &unknown_units),
                None,
                "{source:?}"
            );
        }
    }

    #[test]
    fn test_fraction_of_empty_stroke() {
        let empty = InputModelerState {
            complete_traveled_distance: 0.0,
            ..state()
        };
        assert_eq!(
            get_source_value(
                Source::DistanceRemainingAsFractionOfStrokeLength,
                &input(),
                None,
                1.0,
                &empty
            ),
            None
        );
    }
}
