//! Brush behavior engine
//!
//! Turns modeled stroke inputs into per-sample brush tip states:
//! - [`behavior`] - Behavior nodes and the stack machine that evaluates them
//! - [`noise`] - Deterministic, copyable noise generator
//! - [`damping`] - Exponential smoothing over distance or time
//! - [`easing`] - CSS easing functions used by easing nodes
//! - [`tip_state`] - Folds target modifiers into a [`BrushTipState`]
//! - [`modeler`] - Per-stroke state arena with checkpoint and restore
//! - [`interpolation`] - Lerp and barycentric helpers shared with mesh extrusion
//! - [`vertex`] - GPU-compatible extruded vertices (bytemuck)

pub mod behavior;
pub mod constants;
pub mod damping;
pub mod easing;
pub mod interpolation;
pub mod modeler;
pub mod noise;
pub mod tip_state;
pub mod types;
pub mod vertex;

pub use behavior::*;
pub use constants::*;
pub use damping::damp_offset_transition;
pub use easing::EasingFunction;
pub use interpolation::{Lerp, inverse_lerp, lerp};
pub use modeler::{ModelerCheckpoint, TipModeler};
pub use noise::NoiseGenerator;
pub use tip_state::{BrushTipState, create_tip_state};
pub use types::*;
pub use vertex::{ExtrudedVertex, NonPositionAttributes};

pub use inkstroke_config::BrushTip;
