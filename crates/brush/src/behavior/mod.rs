//! Brush behaviors: small programs that turn stroke input into tip modifiers
//!
//! A [`Behavior`] is a flat, index-resolved list of [`BehaviorNode`]s run as
//! a stack machine once per modeled input:
//! - [`source`] resolves the scalar quantities Source nodes read
//! - [`node`] evaluates each node against a [`BehaviorNodeContext`]
//!
//! Persistent per-stroke state (noise generators, damped values) and the
//! target modifier accumulator live in flat arrays owned by the caller; nodes
//! refer to their slots by index. Node lists are expected to come from a
//! graph compiler that has already checked stack arity, index bounds and
//! ranges, so none of that is re-validated here.

mod node;
mod source;

pub use node::{BehaviorNodeContext, is_null_behavior_node_value, process_behavior_node};
pub use source::get_source_value;

use serde::{Deserialize, Serialize};

use crate::easing::EasingFunction;
use crate::types::{EnabledToolTypes, ModeledStrokeInput};

/// Scalar quantity a Source node reads from the stroke
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Source {
    /// Stylus pressure in [0, 1]
    NormalizedPressure,
    TiltInRadians,
    /// Tilt projected onto the x axis; undefined at 90 degrees of tilt
    TiltXInRadians,
    /// Tilt projected onto the y axis; undefined at 90 degrees of tilt
    TiltYInRadians,
    /// Orientation in [0, 2pi)
    OrientationInRadians,
    /// Orientation in (-pi, pi]
    OrientationAboutZeroInRadians,
    SpeedInMultiplesOfBrushSize,
    VelocityXInMultiplesOfBrushSize,
    VelocityYInMultiplesOfBrushSize,
    /// Travel direction in [0, 2pi)
    DirectionInRadians,
    /// Travel direction in (-pi, pi]
    DirectionAboutZeroInRadians,
    /// Cosine of the travel direction
    NormalizedDirectionX,
    /// Sine of the travel direction
    NormalizedDirectionY,
    DistanceTraveledInMultiplesOfBrushSize,
    TimeOfInputInSeconds,
    TimeOfInputInMillis,
    /// How far past the last real input a predicted input is
    PredictedDistanceTraveledInMultiplesOfBrushSize,
    PredictedTimeElapsedInSeconds,
    PredictedTimeElapsedInMillis,
    /// Distance from this input to the end of the stroke
    DistanceRemainingInMultiplesOfBrushSize,
    /// Time from this input to the end of the stroke
    TimeSinceInputInSeconds,
    TimeSinceInputInMillis,
    AccelerationInMultiplesOfBrushSize,
    AccelerationXInMultiplesOfBrushSize,
    AccelerationYInMultiplesOfBrushSize,
    /// Acceleration along the travel direction
    AccelerationForwardInMultiplesOfBrushSize,
    /// Acceleration perpendicular to the travel direction
    AccelerationLateralInMultiplesOfBrushSize,
    InputSpeedInCentimetersPerSecond,
    InputVelocityXInCentimetersPerSecond,
    InputVelocityYInCentimetersPerSecond,
    InputDistanceTraveledInCentimeters,
    PredictedInputDistanceTraveledInCentimeters,
    InputAccelerationInCentimetersPerSecondSquared,
    InputAccelerationXInCentimetersPerSecondSquared,
    InputAccelerationYInCentimetersPerSecondSquared,
    InputAccelerationForwardInCentimetersPerSecondSquared,
    InputAccelerationLateralInCentimetersPerSecondSquared,
    /// Remaining distance divided by the complete stroke length, in [0, 1]
    DistanceRemainingAsFractionOfStrokeLength,
}

/// What a Source node does with values outside its source range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OutOfRange {
    #[default]
    Clamp,
    /// Wrap around: 1.25 -> 0.25, -0.25 -> 0.75
    Repeat,
    /// Reflect back and forth: 1.25 -> 0.75, 2.25 -> 0.25
    Mirror,
}

impl OutOfRange {
    /// Fold a value already normalized against the source range into [0, 1]
    pub fn apply(self, value: f32) -> f32 {
        match self {
            Self::Clamp => value.clamp(0.0, 1.0),
            Self::Repeat => {
                // Tiny negative values round up to exactly 1
                let wrapped = value - value.floor();
                if wrapped >= 1.0 { 0.0 } else { wrapped }
            }
            Self::Mirror => (value - 2.0 * (0.5 * value).round()).abs(),
        }
    }
}

/// Input property a FallbackFilter node stands in for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OptionalInputProperty {
    Pressure,
    Tilt,
    Orientation,
    /// Both tilt and orientation, which tilt-x/y sources need
    TiltXAndY,
}

impl OptionalInputProperty {
    /// Whether `input` reports this property
    pub fn is_present(self, input: &ModeledStrokeInput) -> bool {
        match self {
            Self::Pressure => input.pressure.is_some(),
            Self::Tilt => input.tilt.is_some(),
            Self::Orientation => input.orientation.is_some(),
            Self::TiltXAndY => input.tilt.is_some() && input.orientation.is_some(),
        }
    }
}

/// Quantity Noise and Damping nodes progress over between inputs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DampingSource {
    /// Needs a known stroke unit length
    DistanceInCentimeters,
    DistanceInMultiplesOfBrushSize,
    TimeInSeconds,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryOp {
    Product,
    Sum,
    Min,
    Max,
    /// Null if the first operand is null, else the second operand
    AndThen,
    /// The first operand unless it is null, else the second operand
    OrElse,
    /// Whichever operand is non-null if exactly one is, else null
    XorElse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Interpolation {
    Lerp,
    InverseLerp,
}

/// Tip property a Target node modifies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Target {
    WidthMultiplier,
    HeightMultiplier,
    /// Multiplies width and height together
    SizeMultiplier,
    SlantOffsetInRadians,
    PinchOffset,
    RotationOffsetInRadians,
    CornerRoundingOffset,
    TextureAnimationProgressOffset,
    PositionOffsetXInMultiplesOfBrushSize,
    PositionOffsetYInMultiplesOfBrushSize,
    /// Along the travel direction
    PositionOffsetForwardInMultiplesOfBrushSize,
    /// Perpendicular to the travel direction
    PositionOffsetLateralInMultiplesOfBrushSize,
    HueOffsetInRadians,
    SaturationMultiplier,
    Luminosity,
    OpacityMultiplier,
}

impl Target {
    /// Multiplier targets combine by product, everything else by sum
    pub fn is_multiplier(self) -> bool {
        matches!(
            self,
            Self::WidthMultiplier
                | Self::HeightMultiplier
                | Self::SizeMultiplier
                | Self::SaturationMultiplier
                | Self::OpacityMultiplier
        )
    }

    /// Modifier value that leaves the tip unchanged
    pub fn identity(self) -> f32 {
        if self.is_multiplier() { 1.0 } else { 0.0 }
    }

    /// Combine `modifier` into an accumulated modifier for this target
    pub fn accumulate(self, accumulated: f32, modifier: f32) -> f32 {
        if self.is_multiplier() {
            accumulated * modifier
        } else {
            accumulated + modifier
        }
    }
}

/// Vector tip property a PolarTarget node modifies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PolarTarget {
    /// Angle measured from the x axis
    PositionOffsetAbsoluteInRadiansAndMultiplesOfBrushSize,
    /// Angle measured from the travel direction
    PositionOffsetRelativeInRadiansAndMultiplesOfBrushSize,
}

impl PolarTarget {
    /// Scalar targets fed by the x and y components of the vector
    pub fn component_targets(self) -> [Target; 2] {
        match self {
            Self::PositionOffsetAbsoluteInRadiansAndMultiplesOfBrushSize => [
                Target::PositionOffsetXInMultiplesOfBrushSize,
                Target::PositionOffsetYInMultiplesOfBrushSize,
            ],
            Self::PositionOffsetRelativeInRadiansAndMultiplesOfBrushSize => [
                Target::PositionOffsetForwardInMultiplesOfBrushSize,
                Target::PositionOffsetLateralInMultiplesOfBrushSize,
            ],
        }
    }
}

/// Pushes a source value normalized against `source_value_range`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SourceNode {
    pub source: Source,
    pub source_out_of_range: OutOfRange,
    pub source_value_range: [f32; 2],
}

/// Pushes a fixed finite value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConstantNode {
    pub value: f32,
}

/// Pushes the value of a persistent noise generator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NoiseNode {
    /// Seed for the generator at `generator_index` when a stroke starts
    pub seed: u64,
    pub vary_over: DampingSource,
    /// Input change that advances the generator by one lattice period
    pub base_period: f32,
    pub generator_index: usize,
}

/// Nulls the top of the stack when the property it stands in for is present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FallbackFilterNode {
    pub is_fallback_for: OptionalInputProperty,
}

/// Nulls the top of the stack for strokes drawn with a disabled tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolTypeFilterNode {
    pub enabled_tool_types: EnabledToolTypes,
}

/// Smooths the top of the stack over distance or time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DampingNode {
    pub damping_source: DampingSource,
    /// Decay constant in units of `damping_source`; 0 disables damping
    pub damping_gap: f32,
    pub damping_index: usize,
}

/// Maps the top of the stack through an easing curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EasingNode {
    pub easing_function: EasingFunction,
}

/// Combines the top two stack values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BinaryOpNode {
    pub operation: BinaryOp,
}

/// Pops `param`, `range_start`, `range_end` (pushed in that order).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterpolationNode {
    pub interpolation: Interpolation,
}

/// Pops a value and accumulates it into a target modifier slot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetNode {
    pub target: Target,
    pub target_modifier_range: [f32; 2],
    pub target_index: usize,
}

/// Pops a magnitude and an angle and accumulates the vector into two
/// consecutive modifier slots starting at `target_x_index`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PolarTargetNode {
    pub target: PolarTarget,
    pub angle_range: [f32; 2],
    pub magnitude_range: [f32; 2],
    pub target_x_index: usize,
}

/// One instruction of a compiled behavior
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BehaviorNode {
    Source(SourceNode),
    Constant(ConstantNode),
    Noise(NoiseNode),
    FallbackFilter(FallbackFilterNode),
    ToolTypeFilter(ToolTypeFilterNode),
    Damping(DampingNode),
    Easing(EasingNode),
    BinaryOp(BinaryOpNode),
    Interpolation(InterpolationNode),
    Target(TargetNode),
    PolarTarget(PolarTargetNode),
}

/// Ordered node list for one visual effect; leaves the stack empty.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Behavior {
    pub nodes: Vec<BehaviorNode>,
}

impl Behavior {
    pub fn new(nodes: Vec<BehaviorNode>) -> Self {
        Self { nodes }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_range_clamp() {
        assert_eq!(OutOfRange::Clamp.apply(-0.5), 0.0);
        assert_eq!(OutOfRange::Clamp.apply(0.4), 0.4);
        assert_eq!(OutOfRange::Clamp.apply(7.0), 1.0);
    }

    #[test]
    fn test_out_of_range_repeat() {
        assert!((OutOfRange::Repeat.apply(1.25) - 0.25).abs() < 1e-6);
        assert!((OutOfRange::Repeat.apply(-0.25) - 0.75).abs() < 1e-6);
        assert_eq!(OutOfRange::Repeat.apply(0.5), 0.5);
        assert_eq!(OutOfRange::Repeat.apply(-1e-9), 0.0);
        assert!(OutOfRange::Repeat.apply(-1e-7) < 1.0);
        assert!(OutOfRange::Repeat.apply(f32::INFINITY).is_nan());
    }

    #[test]
    fn test_out_of_range_mirror() {
        assert!((OutOfRange::Mirror.apply(1.25) - 0.75).abs() < 1e-6);
        assert!((OutOfRange::Mirror.apply(2.25) - 0.25).abs() < 1e-6);
        assert!((OutOfRange::Mirror.apply(-0.25) - 0.25).abs() < 1e-6);
        assert_eq!(OutOfRange::Mirror.apply(0.5), 0.5);
        assert_eq!(OutOfRange::Mirror.apply(1.0), 1.0);
    }

    #[test]
    fn test_target_identity_and_accumulation() {
        assert_eq!(Target::OpacityMultiplier.identity(), 1.0);
        assert_eq!(Target::PinchOffset.identity(), 0.0);
        assert_eq!(Target::WidthMultiplier.accumulate(1.5, 2.0), 3.0);
        assert_eq!(Target::Luminosity.accumulate(0.25, 0.5), 0.75);
    }

    #[test]
    fn test_polar_component_targets() {
        assert_eq!(
            PolarTarget::PositionOffsetRelativeInRadiansAndMultiplesOfBrushSize.component_targets(),
            [
                Target::PositionOffsetForwardInMultiplesOfBrushSize,
                Target::PositionOffsetLateralInMultiplesOfBrushSize,
            ]
        );
    }

    #[test]
    fn test_optional_input_property() {
        let input = ModeledStrokeInput {
            tilt: Some(0.3),
            ..Default::default()
        };
        assert!(!OptionalInputProperty::Pressure.is_present(&input));
        assert!(OptionalInputProperty::Tilt.is_present(&input));
        assert!(!OptionalInputProperty::TiltXAndY.is_present(&input));
    }

    #[test]
    fn test_behavior_json_round_trip() {
        let behavior = Behavior::new(vec![
            BehaviorNode::Source(SourceNode {
                source: Source::NormalizedPressure,
                source_out_of_range: OutOfRange::Clamp,
                source_value_range: [0.0, 1.0],
            }),
            BehaviorNode::Easing(EasingNode {
                easing_function: EasingFunction::default(),
            }),
            BehaviorNode::Target(TargetNode {
                target: Target::OpacityMultiplier,
                target_modifier_range: [0.2, 1.0],
                target_index: 0,
            }),
        ]);
        let json = serde_json::to_string(&behavior).unwrap();
        let parsed: Behavior = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, behavior);
    }
}
