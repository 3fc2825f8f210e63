/// Stack value meaning "not applicable for this input". Any NaN is treated
/// the same way; see [`is_null_behavior_node_value`](crate::is_null_behavior_node_value).
pub const NULL_BEHAVIOR_NODE_VALUE: f32 = f32::NAN;

/// Upper clamp for width, height, saturation and opacity multipliers.
pub const MAX_TIP_MULTIPLIER: f32 = 2.0;

/// Luminosity shift is clamped to +/- this value.
pub const MAX_LUMINOSITY_SHIFT: f32 = 1.0;

/// Seconds to milliseconds.
pub const MILLIS_PER_SECOND: f32 = 1000.0;
