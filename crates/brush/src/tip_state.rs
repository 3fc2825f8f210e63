//! Folds accumulated target modifiers into a concrete tip state
//!
//! Modifiers are combined per target first (product for multipliers, sum for
//! offsets), then applied to the base tip with each field's clamp or wrap.
//! A field whose combined modifier is still the identity keeps the base value
//! as is, so unmodified fields stay bit-identical to the brush tip.

use std::f32::consts::{FRAC_PI_2, TAU};

use glam::Vec2;
use inkstroke_config::BrushTip;
use serde::{Deserialize, Serialize};

use crate::behavior::Target;
use crate::constants::{MAX_LUMINOSITY_SHIFT, MAX_TIP_MULTIPLIER};
use crate::interpolation::{normalize_angle, normalize_angle_about_zero};

/// Geometry and color parameters of the tip at one modeled input
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BrushTipState {
    pub position: Vec2,
    pub width: f32,
    pub height: f32,
    /// Corner rounding in [0, 1]; 1 is an ellipse
    pub percent_radius: f32,
    /// Radians in (-π, π]
    pub rotation: f32,
    /// Radians in [-π/2, π/2]
    pub slant: f32,
    pub pinch: f32,
    /// Fraction of an animation cycle in [0, 1)
    pub texture_animation_progress_offset: f32,
    /// Fraction of a full hue turn in [0, 1)
    pub hue_offset_in_full_turns: f32,
    pub saturation_multiplier: f32,
    pub luminosity_shift: f32,
    pub opacity_multiplier: f32,
}

impl Default for BrushTipState {
    fn default() -> Self {
        Self::from_tip(Vec2::ZERO, &BrushTip::default(), 1.0)
    }
}

impl BrushTipState {
    /// Tip state with no modifiers applied
    pub fn from_tip(position: Vec2, tip: &BrushTip, brush_size: f32) -> Self {
        Self {
            position,
            width: brush_size * tip.scale[0],
            height: brush_size * tip.scale[1],
            percent_radius: tip.corner_rounding,
            rotation: tip.rotation,
            slant: tip.slant,
            pinch: tip.pinch,
            texture_animation_progress_offset: 0.0,
            hue_offset_in_full_turns: 0.0,
            saturation_multiplier: 1.0,
            luminosity_shift: 0.0,
            opacity_multiplier: 1.0,
        }
    }
}

/// Per-target modifiers combined across every slot that names the target
struct CombinedModifiers {
    width: f32,
    height: f32,
    slant: f32,
    pinch: f32,
    rotation: f32,
    corner_rounding: f32,
    texture_animation_progress: f32,
    offset: Vec2,
    forward: f32,
    lateral: f32,
    hue: f32,
    saturation: f32,
    luminosity: f32,
    opacity: f32,
}

impl CombinedModifiers {
    fn combine(targets: &[Target], modifiers: &[f32]) -> Self {
        let mut combined = Self {
            width: 1.0,
            height: 1.0,
            slant: 0.0,
            pinch: 0.0,
            rotation: 0.0,
            corner_rounding: 0.0,
            texture_animation_progress: 0.0,
            offset: Vec2::ZERO,
            forward: 0.0,
            lateral: 0.0,
            hue: 0.0,
            saturation: 1.0,
            luminosity: 0.0,
            opacity: 1.0,
        };
        for (&target, &modifier) in targets.iter().zip(modifiers) {
            match target {
                Target::WidthMultiplier => combined.width *= modifier,
                Target::HeightMultiplier => combined.height *= modifier,
                Target::SizeMultiplier => {
                    combined.width *= modifier;
                    combined.height *= modifier;
                }
                Target::SlantOffsetInRadians => combined.slant += modifier,
                Target::PinchOffset => combined.pinch += modifier,
                Target::RotationOffsetInRadians => combined.rotation += modifier,
                Target::CornerRoundingOffset => combined.corner_rounding += modifier,
                Target::TextureAnimationProgressOffset => {
                    combined.texture_animation_progress += modifier
                }
                Target::PositionOffsetXInMultiplesOfBrushSize => combined.offset.x += modifier,
                Target::PositionOffsetYInMultiplesOfBrushSize => combined.offset.y += modifier,
                Target::PositionOffsetForwardInMultiplesOfBrushSize => combined.forward += modifier,
                Target::PositionOffsetLateralInMultiplesOfBrushSize => combined.lateral += modifier,
                Target::HueOffsetInRadians => combined.hue += modifier,
                Target::SaturationMultiplier => combined.saturation *= modifier,
                Target::Luminosity => combined.luminosity += modifier,
                Target::OpacityMultiplier => combined.opacity *= modifier,
            }
        }
        combined
    }
}

/// Build the tip state at `position` from the base `tip` and the modifier
/// slots accumulated by behaviors for this input.
///
/// `targets[i]` names the target that `modifiers[i]` applies to; several
/// slots may share a target. `direction` is the travel direction in radians,
/// needed for forward and lateral offsets.
///
/// # Panics
/// If `targets` and `modifiers` differ in length.
pub fn create_tip_state(
    position: Vec2,
    direction: Option<f32>,
    tip: &BrushTip,
    brush_size: f32,
    targets: &[Target],
    modifiers: &[f32],
) -> BrushTipState {
    assert_eq!(
        targets.len(),
        modifiers.len(),
        "create_tip_state: {} targets but {} modifiers",
        targets.len(),
        modifiers.len()
    );

    let combined = CombinedModifiers::combine(targets, modifiers);
    let mut state = BrushTipState::from_tip(position, tip, brush_size);

    if combined.offset != Vec2::ZERO {
        state.position += combined.offset * brush_size;
    }
    if let Some(direction) = direction
        && (combined.forward != 0.0 || combined.lateral != 0.0)
    {
        let forward = Vec2::from_angle(direction);
        state.position +=
            (forward * combined.forward + forward.perp() * combined.lateral) * brush_size;
    }

    if combined.width != 1.0 {
        state.width *= combined.width.clamp(0.0, MAX_TIP_MULTIPLIER);
    }
    if combined.height != 1.0 {
        state.height *= combined.height.clamp(0.0, MAX_TIP_MULTIPLIER);
    }
    if combined.slant != 0.0 {
        state.slant = (tip.slant + combined.slant).clamp(-FRAC_PI_2, FRAC_PI_2);
    }
    if combined.pinch != 0.0 {
        state.pinch = (tip.pinch + combined.pinch).clamp(0.0, 1.0);
    }
    if combined.rotation != 0.0 {
        state.rotation = normalize_angle_about_zero(tip.rotation + combined.rotation);
    }
    if combined.corner_rounding != 0.0 {
        state.percent_radius = (tip.corner_rounding + combined.corner_rounding).clamp(0.0, 1.0);
    }
    if combined.texture_animation_progress != 0.0 {
        state.texture_animation_progress_offset =
            wrap_unit(combined.texture_animation_progress.rem_euclid(1.0));
    }
    if combined.hue != 0.0 {
        state.hue_offset_in_full_turns = wrap_unit(normalize_angle(combined.hue) / TAU);
    }
    if combined.saturation != 1.0 {
        state.saturation_multiplier = combined.saturation.clamp(0.0, MAX_TIP_MULTIPLIER);
    }
    if combined.luminosity != 0.0 {
        state.luminosity_shift = combined
            .luminosity
            .clamp(-MAX_LUMINOSITY_SHIFT, MAX_LUMINOSITY_SHIFT);
    }
    if combined.opacity != 1.0 {
        state.opacity_multiplier = combined.opacity.clamp(0.0, MAX_TIP_MULTIPLIER);
    }

    state
}

/// `rem_euclid` and the turn division can round up to exactly 1
fn wrap_unit(fraction: f32) -> f32 {
    if fraction >= 1.0 { 0.0 } else { fraction }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::PI;

    use super::*;

    fn tip() -> BrushTip {
        BrushTip {
            scale: [10.0, 10.0],
            corner_rounding: 0.5,
            slant: 0.25,
            pinch: 0.1,
            rotation: 0.3,
        }
    }

    fn single(target: Target, modifier: f32) -> BrushTipState {
        create_tip_state(Vec2::ZERO, None, &tip(), 1.0, &[target], &[modifier])
    }

    #[test]
    fn test_two_width_modifiers_clamp() {
        let state = create_tip_state(
            Vec2::ZERO,
            None,
            &tip(),
            1.0,
            &[Target::WidthMultiplier, Target::WidthMultiplier],
            &[1.5, 1.6],
        );
        assert_eq!(state.width, 20.0);
        assert_eq!(state.height, 10.0);
    }

    #[test]
    fn test_identity_modifiers_leave_tip_untouched() {
        let targets = [
            Target::WidthMultiplier,
            Target::SizeMultiplier,
            Target::SlantOffsetInRadians,
            Target::PinchOffset,
            Target::RotationOffsetInRadians,
            Target::CornerRoundingOffset,
            Target::TextureAnimationProgressOffset,
            Target::PositionOffsetXInMultiplesOfBrushSize,
            Target::PositionOffsetForwardInMultiplesOfBrushSize,
            Target::HueOffsetInRadians,
            Target::SaturationMultiplier,
            Target::Luminosity,
            Target::OpacityMultiplier,
        ];
        let modifiers: Vec<f32> = targets.iter().map(|target| target.identity()).collect();
        let position = Vec2::new(-0.0, 3.5);
        let state = create_tip_state(position, Some(1.0), &tip(), 2.0, &targets, &modifiers);
        let base = BrushTipState::from_tip(position, &tip(), 2.0);
        assert_eq!(state, base);
        assert_eq!(state.position.x.to_bits(), (-0.0f32).to_bits());
        assert_eq!(state.slant, 0.25);
    }

    #[test]
    fn test_size_multiplier_scales_both_axes() {
        let state = single(Target::SizeMultiplier, 0.5);
        assert_eq!(state.width, 5.0);
        assert_eq!(state.height, 5.0);

        let state = create_tip_state(
            Vec2::ZERO,
            None,
            &tip(),
            1.0,
            &[Target::SizeMultiplier, Target::HeightMultiplier],
            &[0.5, 8.0],
        );
        assert_eq!(state.width, 5.0);
        assert_eq!(state.height, 20.0);
    }

    #[test]
    fn test_offset_clamps() {
        assert_eq!(single(Target::SlantOffsetInRadians, 3.0).slant, FRAC_PI_2);
        assert_eq!(single(Target::SlantOffsetInRadians, -3.0).slant, -FRAC_PI_2);
        assert_eq!(single(Target::PinchOffset, 5.0).pinch, 1.0);
        assert_eq!(single(Target::PinchOffset, -5.0).pinch, 0.0);
        assert_eq!(single(Target::CornerRoundingOffset, -1.0).percent_radius, 0.0);
        assert!((single(Target::CornerRoundingOffset, 0.25).percent_radius - 0.75).abs() < 1e-6);
    }

    #[test]
    fn test_color_clamps() {
        assert_eq!(single(Target::OpacityMultiplier, 3.0).opacity_multiplier, 2.0);
        assert_eq!(single(Target::OpacityMultiplier, -1.0).opacity_multiplier, 0.0);
        assert_eq!(single(Target::SaturationMultiplier, 1.5).saturation_multiplier, 1.5);
        assert_eq!(single(Target::Luminosity, 4.0).luminosity_shift, 1.0);
        assert_eq!(single(Target::Luminosity, -4.0).luminosity_shift, -1.0);
    }

    #[test]
    fn test_rotation_normalizes() {
        let state = single(Target::RotationOffsetInRadians, 3.0);
        let expected = 3.3 - 2.0 * PI;
        assert!((state.rotation - expected).abs() < 1e-5);
        assert!(state.rotation > -PI && state.rotation <= PI);
    }

    #[test]
    fn test_texture_progress_wraps() {
        let state = single(Target::TextureAnimationProgressOffset, 1.25);
        assert!((state.texture_animation_progress_offset - 0.25).abs() < 1e-6);
        let state = single(Target::TextureAnimationProgressOffset, -0.25);
        assert!((state.texture_animation_progress_offset - 0.75).abs() < 1e-6);
    }

    #[test]
    fn test_hue_is_fraction_of_turn() {
        let state = single(Target::HueOffsetInRadians, -FRAC_PI_2);
        assert!((state.hue_offset_in_full_turns - 0.75).abs() < 1e-6);
        let state = single(Target::HueOffsetInRadians, 5.0 * PI);
        assert!((state.hue_offset_in_full_turns - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_absolute_position_offset() {
        let state = create_tip_state(
            Vec2::new(1.0, 1.0),
            None,
            &tip(),
            4.0,
            &[
                Target::PositionOffsetXInMultiplesOfBrushSize,
                Target::PositionOffsetYInMultiplesOfBrushSize,
            ],
            &[0.5, -0.25],
        );
        assert_eq!(state.position, Vec2::new(3.0, 0.0));
    }

    #[test]
    fn test_relative_position_offset_follows_direction() {
        let targets = [
            Target::PositionOffsetForwardInMultiplesOfBrushSize,
            Target::PositionOffsetLateralInMultiplesOfBrushSize,
        ];
        let state = create_tip_state(
            Vec2::ZERO,
            Some(FRAC_PI_2),
            &tip(),
            2.0,
            &targets,
            &[1.0, 0.5],
        );
        // Forward is +y, lateral is a quarter turn counterclockwise from it
        assert!((state.position - Vec2::new(-1.0, 2.0)).length() < 1e-5);

        let state = create_tip_state(Vec2::ZERO, None, &tip(), 2.0, &targets, &[1.0, 0.5]);
        assert_eq!(state.position, Vec2::ZERO);
    }

    #[test]
    #[should_panic(expected = "modifiers")]
    fn test_mismatched_lengths_panic() {
        create_tip_state(
            Vec2::ZERO,
            None,
            &tip(),
            1.0,
            &[Target::WidthMultiplier],
            &[],
        );
    }
}
