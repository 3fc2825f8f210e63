//! Per-stroke tip modeler
//!
//! Owns one brush tip, its behaviors and all persistent evaluation state:
//! noise generators, damped values and target modifier slots, each a flat
//! array addressed by the indices stored in the nodes. Arrays are sized once
//! at construction, so evaluating an input never allocates.
//!
//! Strokes are modeled input by input. The tail of a stroke that may still
//! change (predicted inputs) is evaluated speculatively: take a
//! [`ModelerCheckpoint`] before the tail, and [`TipModeler::restore`] it
//! before the next authoritative pass.

use glam::Vec2;
use inkstroke_config::BrushTip;
use tracing::debug;

use crate::behavior::{
    Behavior, BehaviorNode, BehaviorNodeContext, Target, process_behavior_node,
};
use crate::constants::NULL_BEHAVIOR_NODE_VALUE;
use crate::noise::NoiseGenerator;
use crate::tip_state::{BrushTipState, create_tip_state};
use crate::types::{InputModelerState, ModeledStrokeInput};

/// Snapshot of the persistent state of a [`TipModeler`]
#[derive(Debug, Clone, PartialEq)]
pub struct ModelerCheckpoint {
    noise_generators: Vec<NoiseGenerator>,
    damped_values: Vec<f32>,
    previous_input: Option<ModeledStrokeInput>,
    travel_direction: Option<f32>,
}

/// Turns modeled inputs into tip states for one brush tip
pub struct TipModeler {
    tip: BrushTip,
    behaviors: Vec<Behavior>,
    /// Target of each modifier slot
    targets: Vec<Target>,
    target_modifiers: Vec<f32>,
    noise_generators: Vec<NoiseGenerator>,
    damped_values: Vec<f32>,
    stack: Vec<f32>,
    previous_input: Option<ModeledStrokeInput>,
    /// Last known direction of travel in radians
    travel_direction: Option<f32>,
}

impl TipModeler {
    /// Create a modeler for `tip` driven by `behaviors`.
    ///
    /// # Panics
    /// If a target slot index is unused, or two nodes assign different
    /// targets to the same slot.
    pub fn new(tip: BrushTip, behaviors: Vec<Behavior>) -> Self {
        let nodes = || behaviors.iter().flat_map(|behavior| behavior.nodes.iter());

        let mut noise_generators = Vec::new();
        let mut damped_count = 0;
        let mut slot_targets: Vec<Option<Target>> = Vec::new();
        for node in nodes() {
            match node {
                BehaviorNode::Noise(noise) => {
                    let index = noise.generator_index;
                    if noise_generators.len() <= index {
                        noise_generators.resize(index + 1, NoiseGenerator::new(0));
                    }
                    noise_generators[index] = NoiseGenerator::new(noise.seed);
                }
                BehaviorNode::Damping(damping) => {
                    damped_count = damped_count.max(damping.damping_index + 1);
                }
                BehaviorNode::Target(target) => {
                    assign_slot(&mut slot_targets, target.target_index, target.target);
                }
                BehaviorNode::PolarTarget(polar) => {
                    let [x_target, y_target] = polar.target.component_targets();
                    assign_slot(&mut slot_targets, polar.target_x_index, x_target);
                    assign_slot(&mut slot_targets, polar.target_x_index + 1, y_target);
                }
                _ => {}
            }
        }

        let targets: Vec<Target> = slot_targets
            .into_iter()
            .enumerate()
            .map(|(index, target)| match target {
                Some(target) => target,
                None => panic!("TipModeler::new: target slot {index} has no target node"),
            })
            .collect();
        let target_modifiers = targets.iter().map(|target| target.identity()).collect();
        let stack = Vec::with_capacity(nodes().count());

        debug!(
            "TipModeler::new: {} behaviors, {} noise generators, {} damped values, {} target slots",
            behaviors.len(),
            noise_generators.len(),
            damped_count,
            targets.len()
        );

        Self {
            tip,
            behaviors,
            targets,
            target_modifiers,
            noise_generators,
            damped_values: vec![NULL_BEHAVIOR_NODE_VALUE; damped_count],
            stack,
            previous_input: None,
            travel_direction: None,
        }
    }

    /// Brush tip without behaviors
    pub fn from_tip(tip: BrushTip) -> Self {
        Self::new(tip, Vec::new())
    }

    pub fn tip(&self) -> &BrushTip {
        &self.tip
    }

    pub fn behaviors(&self) -> &[Behavior] {
        &self.behaviors
    }

    /// Target of each modifier slot
    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    /// Modifiers accumulated for the most recent input
    pub fn target_modifiers(&self) -> &[f32] {
        &self.target_modifiers
    }

    pub fn travel_direction(&self) -> Option<f32> {
        self.travel_direction
    }

    /// Forget the previous stroke and reseed every generator
    pub fn start_stroke(&mut self) {
        debug!("TipModeler::start_stroke");
        for generator in &mut self.noise_generators {
            generator.reset();
        }
        self.damped_values.fill(NULL_BEHAVIOR_NODE_VALUE);
        self.target_modifiers
            .iter_mut()
            .zip(&self.targets)
            .for_each(|(modifier, target)| *modifier = target.identity());
        self.previous_input = None;
        self.travel_direction = None;
    }

    /// Run every behavior for `input` and fold the result into a tip state.
    pub fn process_input(
        &mut self,
        input: &ModeledStrokeInput,
        input_modeler_state: &InputModelerState,
        brush_size: f32,
    ) -> BrushTipState {
        if let Some(previous) = &self.previous_input {
            let delta = input.position - previous.position;
            // A stationary input keeps the last direction
            if delta != Vec2::ZERO {
                self.travel_direction = Some(delta.to_angle());
            }
        }

        for (modifier, target) in self.target_modifiers.iter_mut().zip(&self.targets) {
            *modifier = target.identity();
        }

        for behavior in &self.behaviors {
            let mut context = BehaviorNodeContext {
                current_input: input,
                previous_input: self.previous_input.as_ref(),
                input_modeler_state,
                travel_direction: self.travel_direction,
                brush_size,
                stack: &mut self.stack,
                noise_generators: &mut self.noise_generators,
                damped_values: &mut self.damped_values,
                target_modifiers: &mut self.target_modifiers,
            };
            for node in &behavior.nodes {
                process_behavior_node(node, &mut context);
            }
            assert!(
                self.stack.is_empty(),
                "TipModeler::process_input: behavior left {} values on the stack",
                self.stack.len()
            );
        }

        self.previous_input = Some(*input);
        create_tip_state(
            input.position,
            self.travel_direction,
            &self.tip,
            brush_size,
            &self.targets,
            &self.target_modifiers,
        )
    }

    /// Capture the persistent state before a speculative pass
    pub fn checkpoint(&self) -> ModelerCheckpoint {
        ModelerCheckpoint {
            noise_generators: self.noise_generators.clone(),
            damped_values: self.damped_values.clone(),
            previous_input: self.previous_input,
            travel_direction: self.travel_direction,
        }
    }

    /// Return to the state captured by `checkpoint`.
    ///
    /// # Panics
    /// If `checkpoint` was taken from a modeler with different behaviors.
    pub fn restore(&mut self, checkpoint: &ModelerCheckpoint) {
        debug!("TipModeler::restore");
        self.noise_generators
            .copy_from_slice(&checkpoint.noise_generators);
        self.damped_values.copy_from_slice(&checkpoint.damped_values);
        self.previous_input = checkpoint.previous_input;
        self.travel_direction = checkpoint.travel_direction;
    }
}

fn assign_slot(slots: &mut Vec<Option<Target>>, index: usize, target: Target) {
    if slots.len() <= index {
        slots.resize(index + 1, None);
    }
    match slots[index] {
        Some(existing) if existing != target => panic!(
            "TipModeler::new: target slot {index} used for both {existing:?} and {target:?}"
        ),
        _ => slots[index] = Some(target),
    }
}
