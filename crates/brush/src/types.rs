use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Kind of device that produced a stroke
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[repr(u8)]
pub enum ToolType {
    #[default]
    Unknown = 0,
    Mouse = 1,
    Touch = 2,
    Stylus = 3,
}

/// Set of tool types a behavior applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnabledToolTypes {
    pub unknown: bool,
    pub mouse: bool,
    pub touch: bool,
    pub stylus: bool,
}

impl Default for EnabledToolTypes {
    fn default() -> Self {
        Self::all()
    }
}

impl EnabledToolTypes {
    /// Every tool type enabled
    pub const fn all() -> Self {
        Self {
            unknown: true,
            mouse: true,
            touch: true,
            stylus: true,
        }
    }

    /// No tool type enabled
    pub const fn none() -> Self {
        Self {
            unknown: false,
            mouse: false,
            touch: false,
            stylus: false,
        }
    }

    /// Whether `tool_type` is in the set
    pub fn has_tool_type(&self, tool_type: ToolType) -> bool {
        match tool_type {
            ToolType::Unknown => self.unknown,
            ToolType::Mouse => self.mouse,
            ToolType::Touch => self.touch,
            ToolType::Stylus => self.stylus,
        }
    }
}

/// One resampled point of a modeled stroke
///
/// Positions and distances are in stroke units, times in seconds and angles
/// in radians. Optional properties are `None` when the input device did not
/// report them.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ModeledStrokeInput {
    pub position: Vec2,
    /// Stroke units per second
    pub velocity: Vec2,
    /// Stroke units per second squared
    pub acceleration: Vec2,
    /// Distance along the stroke from its first input
    pub traveled_distance: f32,
    /// Time since the first input of the stroke
    pub elapsed_time: f32,
    /// Normalized pressure in [0, 1]
    pub pressure: Option<f32>,
    /// Angle from the surface normal in [0, pi/2]
    pub tilt: Option<f32>,
    /// Angle of the stylus projected onto the surface in [0, 2pi)
    pub orientation: Option<f32>,
}

/// Stroke-wide aggregates maintained by the input modeler
///
/// The `complete_*` totals include predicted inputs, the `total_real_*`
/// totals only the inputs that actually arrived.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct InputModelerState {
    pub tool_type: ToolType,
    /// Centimeters per stroke unit, if the mapping to physical space is known
    pub stroke_unit_length: Option<f32>,
    pub total_real_distance: f32,
    pub total_real_elapsed_time: f32,
    pub complete_traveled_distance: f32,
    pub complete_elapsed_time: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enabled_tool_types() {
        let stylus_only = EnabledToolTypes {
            stylus: true,
            ..EnabledToolTypes::none()
        };
        assert!(stylus_only.has_tool_type(ToolType::Stylus));
        assert!(!stylus_only.has_tool_type(ToolType::Mouse));
        assert!(!stylus_only.has_tool_type(ToolType::Unknown));

        let all = EnabledToolTypes::default();
        assert!(all.has_tool_type(ToolType::Touch));
    }
}
