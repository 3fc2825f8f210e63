//! Stack machine that evaluates behavior nodes
//!
//! Every node has a fixed stack effect and runs once per modeled input, in
//! behavior order. "Not applicable" travels through the stack as NaN
//! ([`NULL_BEHAVIOR_NODE_VALUE`]); arithmetic propagates it, filters create
//! it, and the nodes that write persistent state or targets skip it.
//! Non-finite results never reach persistent state: transient stack values
//! are downgraded to null and persistent slots keep their previous value.
//!
//! Stack underflow and out-of-bounds slot indices mean the node list was
//! compiled incorrectly, and panic.

use glam::Vec2;

use crate::constants::NULL_BEHAVIOR_NODE_VALUE;
use crate::damping::damp_offset_transition;
use crate::interpolation::{inverse_lerp, lerp};
use crate::noise::NoiseGenerator;
use crate::types::{InputModelerState, ModeledStrokeInput};

use super::source::get_source_value;
use super::{
    BehaviorNode, BinaryOp, BinaryOpNode, DampingNode, DampingSource, EasingNode,
    FallbackFilterNode, Interpolation, InterpolationNode, NoiseNode, PolarTargetNode, SourceNode,
    TargetNode, ToolTypeFilterNode,
};

/// Whether `value` is the null stack value. Tests the NaN bit pattern, since
/// NaN never compares equal to itself.
#[inline]
pub fn is_null_behavior_node_value(value: f32) -> bool {
    value.is_nan()
}

#[inline]
fn null_if_not_finite(value: f32) -> f32 {
    if value.is_finite() {
        value
    } else {
        NULL_BEHAVIOR_NODE_VALUE
    }
}

/// Everything one behavior needs while evaluating one modeled input.
///
/// Callers refresh the inputs and travel direction for each sample, and
/// must hand over an empty stack before the first node of a behavior.
pub struct BehaviorNodeContext<'a> {
    pub current_input: &'a ModeledStrokeInput,
    /// The input evaluated before this one in the stroke, if any
    pub previous_input: Option<&'a ModeledStrokeInput>,
    pub input_modeler_state: &'a InputModelerState,
    pub travel_direction: Option<f32>,
    pub brush_size: f32,
    pub stack: &'a mut Vec<f32>,
    pub noise_generators: &'a mut [NoiseGenerator],
    pub damped_values: &'a mut [f32],
    pub target_modifiers: &'a mut [f32],
}

impl BehaviorNodeContext<'_> {
    fn pop(&mut self) -> f32 {
        let Some(value) = self.stack.pop() else {
            panic!("behavior stack underflow");
        };
        value
    }

    fn top_mut(&mut self) -> &mut f32 {
        let Some(value) = self.stack.last_mut() else {
            panic!("behavior stack underflow");
        };
        value
    }

    /// How far the stroke progressed since the previous input, measured in
    /// `source` units. Zero for the first input; NaN for centimeters when the
    /// stroke unit length is unknown.
    fn input_delta(&self, source: DampingSource) -> f32 {
        let Some(previous) = self.previous_input else {
            return 0.0;
        };
        let current = self.current_input;
        match source {
            DampingSource::DistanceInCentimeters => {
                match self.input_modeler_state.stroke_unit_length {
                    Some(unit_length) => {
                        (current.traveled_distance - previous.traveled_distance) * unit_length
                    }
                    None => f32::NAN,
                }
            }
            DampingSource::DistanceInMultiplesOfBrushSize => {
                (current.traveled_distance - previous.traveled_distance) / self.brush_size
            }
            DampingSource::TimeInSeconds => current.elapsed_time - previous.elapsed_time,
        }
    }
}

/// Evaluate one node, updating the stack and persistent state in `context`.
pub fn process_behavior_node(node: &BehaviorNode, context: &mut BehaviorNodeContext<'_>) {
    match node {
        BehaviorNode::Source(node) => process_source(node, context),
        BehaviorNode::Constant(node) => context.stack.push(node.value),
        BehaviorNode::Noise(node) => process_noise(node, context),
        BehaviorNode::FallbackFilter(node) => process_fallback_filter(node, context),
        BehaviorNode::ToolTypeFilter(node) => process_tool_type_filter(node, context),
        BehaviorNode::Damping(node) => process_damping(node, context),
        BehaviorNode::Easing(node) => process_easing(node, context),
        BehaviorNode::BinaryOp(node) => process_binary_op(node, context),
        BehaviorNode::Interpolation(node) => process_interpolation(node, context),
        BehaviorNode::Target(node) => process_target(node, context),
        BehaviorNode::PolarTarget(node) => process_polar_target(node, context),
    }
}

fn process_source(node: &SourceNode, context: &mut BehaviorNodeContext<'_>) {
    let source_value = get_source_value(
        node.source,
        context.current_input,
        context.travel_direction,
        context.brush_size,
        context.input_modeler_state,
    );
    let value = match source_value {
        Some(value) => {
            let [start, end] = node.source_value_range;
            let normalized = inverse_lerp(start, end, value);
            null_if_not_finite(node.source_out_of_range.apply(normalized))
        }
        None => NULL_BEHAVIOR_NODE_VALUE,
    };
    context.stack.push(value);
}

fn process_noise(node: &NoiseNode, context: &mut BehaviorNodeContext<'_>) {
    let advance_by = context.input_delta(node.vary_over) / node.base_period;
    let generator = &mut context.noise_generators[node.generator_index];
    if advance_by.is_finite() {
        generator.advance_input_by(advance_by);
    }
    let value = generator.current_output_value();
    context.stack.push(value);
}

fn process_fallback_filter(node: &FallbackFilterNode, context: &mut BehaviorNodeContext<'_>) {
    let present = node.is_fallback_for.is_present(context.current_input);
    let top = context.top_mut();
    if present {
        *top = NULL_BEHAVIOR_NODE_VALUE;
    }
}

fn process_tool_type_filter(node: &ToolTypeFilterNode, context: &mut BehaviorNodeContext<'_>) {
    let enabled = node
        .enabled_tool_types
        .has_tool_type(context.input_modeler_state.tool_type);
    let top = context.top_mut();
    if !enabled {
        *top = NULL_BEHAVIOR_NODE_VALUE;
    }
}

fn process_damping(node: &DampingNode, context: &mut BehaviorNodeContext<'_>) {
    let input = *context.top_mut();
    let input_delta = context.input_delta(node.damping_source);
    let damped = &mut context.damped_values[node.damping_index];

    // A null input keeps the damped value; so does an infinite one, which
    // could never be undone by later inputs.
    if input.is_finite() {
        if is_null_behavior_node_value(*damped) || node.damping_gap == 0.0 {
            *damped = input;
        } else {
            let next = damp_offset_transition(input, *damped, input_delta, node.damping_gap);
            if next.is_finite() {
                *damped = next;
            }
        }
    }

    let value = *damped;
    *context.top_mut() = value;
}

fn process_easing(node: &EasingNode, context: &mut BehaviorNodeContext<'_>) {
    let top = context.top_mut();
    if is_null_behavior_node_value(*top) {
        return;
    }
    *top = null_if_not_finite(node.easing_function.evaluate(*top));
}

fn process_binary_op(node: &BinaryOpNode, context: &mut BehaviorNodeContext<'_>) {
    let second = context.pop();
    let first = context.pop();
    let first_null = is_null_behavior_node_value(first);
    let second_null = is_null_behavior_node_value(second);

    let result = match node.operation {
        BinaryOp::Product => first * second,
        BinaryOp::Sum => first + second,
        // f32::min and f32::max would swallow a null operand
        BinaryOp::Min if first_null || second_null => NULL_BEHAVIOR_NODE_VALUE,
        BinaryOp::Min => first.min(second),
        BinaryOp::Max if first_null || second_null => NULL_BEHAVIOR_NODE_VALUE,
        BinaryOp::Max => first.max(second),
        BinaryOp::AndThen if first_null => NULL_BEHAVIOR_NODE_VALUE,
        BinaryOp::AndThen => second,
        BinaryOp::OrElse if first_null => second,
        BinaryOp::OrElse => first,
        BinaryOp::XorElse => match (first_null, second_null) {
            (false, true) => first,
            (true, false) => second,
            _ => NULL_BEHAVIOR_NODE_VALUE,
        },
    };
    context.stack.push(null_if_not_finite(result));
}

fn process_interpolation(node: &InterpolationNode, context: &mut BehaviorNodeContext<'_>) {
    let range_end = context.pop();
    let range_start = context.pop();
    let param = context.pop();

    if [param, range_start, range_end]
        .into_iter()
        .any(is_null_behavior_node_value)
    {
        context.stack.push(NULL_BEHAVIOR_NODE_VALUE);
        return;
    }

    let result = match node.interpolation {
        Interpolation::Lerp => lerp(range_start, range_end, param),
        Interpolation::InverseLerp if range_start == range_end => NULL_BEHAVIOR_NODE_VALUE,
        Interpolation::InverseLerp => inverse_lerp(range_start, range_end, param),
    };
    context.stack.push(null_if_not_finite(result));
}

fn process_target(node: &TargetNode, context: &mut BehaviorNodeContext<'_>) {
    let input = context.pop();
    if is_null_behavior_node_value(input) {
        return;
    }
    let [start, end] = node.target_modifier_range;
    let modifier = lerp(start, end, input);
    let slot = &mut context.target_modifiers[node.target_index];
    let accumulated = node.target.accumulate(*slot, modifier);
    // Also catches finite modifiers whose sum or product overflows the slot
    if accumulated.is_finite() {
        *slot = accumulated;
    }
}

fn process_polar_target(node: &PolarTargetNode, context: &mut BehaviorNodeContext<'_>) {
    let magnitude_input = context.pop();
    let angle_input = context.pop();
    if is_null_behavior_node_value(magnitude_input) || is_null_behavior_node_value(angle_input) {
        return;
    }

    let angle = lerp(node.angle_range[0], node.angle_range[1], angle_input);
    let magnitude = lerp(node.magnitude_range[0], node.magnitude_range[1], magnitude_input);
    let offset = Vec2::from_angle(angle) * magnitude;

    let [x_target, y_target] = node.target.component_targets();
    let x_index = node.target_x_index;
    let accumulated = Vec2::new(
        x_target.accumulate(context.target_modifiers[x_index], offset.x),
        y_target.accumulate(context.target_modifiers[x_index + 1], offset.y),
    );
    // Both slots or neither
    if accumulated.is_finite() {
        context.target_modifiers[x_index] = accumulated.x;
        context.target_modifiers[x_index + 1] = accumulated.y;
    }
}
