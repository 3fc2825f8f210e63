//! Shared brush tip configuration for inkstroke
//!
//! This crate provides the single source of truth for the authored base tip
//! of a brush: the shape every stroke sample starts from before behavior
//! modifiers are folded in. Tips are plain serde types so they can be stored
//! next to authored brushes and loaded with [`BrushTip::from_json`].

use std::f32::consts::FRAC_PI_2;

#[cfg(feature = "bevy")]
use bevy::prelude::Resource;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default tip scale (1.0 = tip is exactly one brush size across)
pub const DEFAULT_SCALE: [f32; 2] = [1.0, 1.0];

/// Default corner rounding (1.0 = fully round tip)
pub const DEFAULT_CORNER_ROUNDING: f32 = 1.0;

/// Largest slant magnitude in radians (a quarter turn)
pub const MAX_SLANT: f32 = FRAC_PI_2;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse brush tip: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid tip scale: [{0}, {1}] (must be finite, non-negative and not both zero)")]
    InvalidScale(f32, f32),
    #[error("Invalid corner rounding: {0} (must be in [0, 1])")]
    InvalidCornerRounding(f32),
    #[error("Invalid slant: {0} rad (must be in [-pi/2, pi/2])")]
    InvalidSlant(f32),
    #[error("Invalid pinch: {0} (must be in [0, 1])")]
    InvalidPinch(f32),
    #[error("Invalid rotation: {0} (must be finite)")]
    InvalidRotation(f32),
}

/// Authored base shape of a brush tip
///
/// Angles are in radians. Width and height of the tip are `scale` times the
/// brush size of the stroke.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "bevy", derive(Resource))]
#[serde(default)]
pub struct BrushTip {
    /// Width and height multipliers of the brush size
    pub scale: [f32; 2],
    /// 0.0 = sharp rectangle corners, 1.0 = fully rounded
    pub corner_rounding: f32,
    /// Shear of the tip shape in radians
    pub slant: f32,
    /// How much the sides of the tip are pulled toward its center (0..1)
    pub pinch: f32,
    /// Rotation of the tip in radians
    pub rotation: f32,
}

impl Default for BrushTip {
    fn default() -> Self {
        Self {
            scale: DEFAULT_SCALE,
            corner_rounding: DEFAULT_CORNER_ROUNDING,
            slant: 0.0,
            pinch: 0.0,
            rotation: 0.0,
        }
    }
}

impl BrushTip {
    /// Parse and validate a tip from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let tip: BrushTip = serde_json::from_str(json)?;
        tip.validate()?;
        Ok(tip)
    }

    /// Serialize the tip to pretty JSON
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check every field against its allowed range
    pub fn validate(&self) -> Result<(), ConfigError> {
        let [sx, sy] = self.scale;
        if !sx.is_finite() || !sy.is_finite() || sx < 0.0 || sy < 0.0 || (sx == 0.0 && sy == 0.0)
        {
            return Err(ConfigError::InvalidScale(sx, sy));
        }
        if !(0.0..=1.0).contains(&self.corner_rounding) {
            return Err(ConfigError::InvalidCornerRounding(self.corner_rounding));
        }
        if !(-MAX_SLANT..=MAX_SLANT).contains(&self.slant) {
            return Err(ConfigError::InvalidSlant(self.slant));
        }
        if !(0.0..=1.0).contains(&self.pinch) {
            return Err(ConfigError::InvalidPinch(self.pinch));
        }
        if !self.rotation.is_finite() {
            return Err(ConfigError::InvalidRotation(self.rotation));
        }
        Ok(())
    }
}
