//! Easing curves for the behavior Easing node
//!
//! The curve families and their parameters follow CSS easing functions:
//! cubic Béziers (with the named `ease` presets), piecewise-linear point
//! lists and step functions. Inputs outside [0, 1] are extrapolated rather
//! than clamped so behaviors can push values past their nominal range.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::interpolation::{inverse_lerp, lerp};

/// Newton iterations tried before falling back to bisection.
const NEWTON_ITERATIONS: usize = 8;
const BISECTION_ITERATIONS: usize = 32;
const SOLVE_EPSILON: f32 = 1e-6;

/// A curve mapping an input value to an output value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EasingFunction {
    Predefined(PredefinedEasing),
    CubicBezier(CubicBezier),
    Linear(LinearEasing),
    Steps(Steps),
}

impl Default for EasingFunction {
    fn default() -> Self {
        Self::Predefined(PredefinedEasing::Linear)
    }
}

impl EasingFunction {
    /// Value of the curve at `x`. NaN in, NaN out.
    pub fn evaluate(&self, x: f32) -> f32 {
        match self {
            Self::Predefined(predefined) => predefined.evaluate(x),
            Self::CubicBezier(bezier) => bezier.evaluate(x),
            Self::Linear(linear) => linear.evaluate(x),
            Self::Steps(steps) => steps.evaluate(x),
        }
    }
}

/// Named CSS easing curves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum PredefinedEasing {
    #[default]
    Linear,
    Ease,
    EaseIn,
    EaseOut,
    EaseInOut,
    StepStart,
    StepEnd,
}

impl PredefinedEasing {
    pub fn evaluate(self, x: f32) -> f32 {
        match self {
            Self::Linear => x,
            Self::Ease => CubicBezier::new(0.25, 0.1, 0.25, 1.0).evaluate(x),
            Self::EaseIn => CubicBezier::new(0.42, 0.0, 1.0, 1.0).evaluate(x),
            Self::EaseOut => CubicBezier::new(0.0, 0.0, 0.58, 1.0).evaluate(x),
            Self::EaseInOut => CubicBezier::new(0.42, 0.0, 0.58, 1.0).evaluate(x),
            Self::StepStart => Steps::new(1, StepPosition::JumpStart).evaluate(x),
            Self::StepEnd => Steps::new(1, StepPosition::JumpEnd).evaluate(x),
        }
    }
}

/// Cubic Bézier from (0, 0) to (1, 1) with control points (x1, y1), (x2, y2).
///
/// `x1` and `x2` must lie in [0, 1] so the curve is a function of x.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CubicBezier {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

impl CubicBezier {
    pub const fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    pub fn evaluate(&self, x: f32) -> f32 {
        if x.is_nan() {
            return f32::NAN;
        }
        if x <= 0.0 {
            return self.start_gradient() * x;
        }
        if x >= 1.0 {
            return 1.0 + self.end_gradient() * (x - 1.0);
        }
        let t = self.solve_for_x(x);
        sample_cubic(self.y1, self.y2, t)
    }

    /// Slope used for inputs below 0
    fn start_gradient(&self) -> f32 {
        if self.x1 > 0.0 {
            self.y1 / self.x1
        } else if self.y1 == 0.0 && self.x2 > 0.0 {
            self.y2 / self.x2
        } else if self.x1 == self.x2 && self.y1 == self.y2 {
            1.0
        } else {
            0.0
        }
    }

    /// Slope used for inputs above 1
    fn end_gradient(&self) -> f32 {
        if self.x2 < 1.0 {
            (self.y2 - 1.0) / (self.x2 - 1.0)
        } else if self.y2 == 1.0 && self.x1 < 1.0 {
            (self.y1 - 1.0) / (self.x1 - 1.0)
        } else if self.x1 == self.x2 && self.y1 == self.y2 {
            1.0
        } else {
            0.0
        }
    }

    /// Curve parameter `t` whose x coordinate is `x`, for `x` in (0, 1)
    fn solve_for_x(&self, x: f32) -> f32 {
        let mut t = x;
        for _ in 0..NEWTON_ITERATIONS {
            let error = sample_cubic(self.x1, self.x2, t) - x;
            if error.abs() < SOLVE_EPSILON {
                return t;
            }
            let derivative = sample_cubic_derivative(self.x1, self.x2, t);
            if derivative.abs() < SOLVE_EPSILON {
                break;
            }
            t -= error / derivative;
        }

        let (mut low, mut high) = (0.0f32, 1.0f32);
        t = x;
        for _ in 0..BISECTION_ITERATIONS {
            let sampled = sample_cubic(self.x1, self.x2, t);
            if (sampled - x).abs() < SOLVE_EPSILON {
                break;
            }
            if sampled < x {
                low = t;
            } else {
                high = t;
            }
            t = 0.5 * (low + high);
        }
        t
    }
}

/// One coordinate of the Bézier with endpoints 0 and 1 and controls `p1`, `p2`.
fn sample_cubic(p1: f32, p2: f32, t: f32) -> f32 {
    let c = 3.0 * p1;
    let b = 3.0 * (p2 - p1) - c;
    let a = 1.0 - c - b;
    ((a * t + b) * t + c) * t
}

fn sample_cubic_derivative(p1: f32, p2: f32, t: f32) -> f32 {
    let c = 3.0 * p1;
    let b = 3.0 * (p2 - p1) - c;
    let a = 1.0 - c - b;
    (3.0 * a * t + 2.0 * b) * t + c
}

/// Piecewise-linear curve through (0, 0), `points`, then (1, 1).
///
/// Points must be sorted by x with x in [0, 1]. Two points sharing an x make
/// a jump; at exactly that x the later point wins.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LinearEasing {
    pub points: Vec<Vec2>,
}

impl LinearEasing {
    pub fn new(points: Vec<Vec2>) -> Self {
        Self { points }
    }

    fn point_count(&self) -> usize {
        self.points.len() + 2
    }

    fn point(&self, index: usize) -> Vec2 {
        if index == 0 {
            Vec2::ZERO
        } else if index == self.point_count() - 1 {
            Vec2::ONE
        } else {
            self.points[index - 1]
        }
    }

    pub fn evaluate(&self, x: f32) -> f32 {
        if x.is_nan() {
            return f32::NAN;
        }
        // Last segment start at or before x; below 0 that is the first segment
        let last_segment = self.point_count() - 2;
        let mut start = 0;
        for index in 0..=last_segment {
            if self.point(index).x <= x {
                start = index;
            }
        }
        let a = self.point(start);
        let b = self.point(start + 1);
        if a.x == b.x {
            return if x < a.x { a.y } else { b.y };
        }
        lerp(a.y, b.y, inverse_lerp(a.x, b.x, x))
    }
}

/// Where the jumps of a step function happen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum StepPosition {
    /// First jump at the start of the input range
    JumpStart,
    /// Last jump at the end of the input range
    #[default]
    JumpEnd,
    /// No jump at either end
    JumpNone,
    /// Jumps at both ends
    JumpBoth,
}

/// CSS step function with `step_count` intervals.
///
/// `step_count` must be at least 1, and at least 2 for `JumpNone`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Steps {
    pub step_count: u32,
    pub step_position: StepPosition,
}

impl Steps {
    pub const fn new(step_count: u32, step_position: StepPosition) -> Self {
        Self {
            step_count,
            step_position,
        }
    }

    pub fn evaluate(&self, x: f32) -> f32 {
        if x.is_nan() {
            return f32::NAN;
        }
        let steps = self.step_count as f32;
        let mut current_step = (x * steps).floor();
        if matches!(
            self.step_position,
            StepPosition::JumpStart | StepPosition::JumpBoth
        ) {
            current_step += 1.0;
        }
        if x >= 0.0 && current_step < 0.0 {
            current_step = 0.0;
        }
        let jumps = match self.step_position {
            StepPosition::JumpStart | StepPosition::JumpEnd => steps,
            StepPosition::JumpNone => steps - 1.0,
            StepPosition::JumpBoth => steps + 1.0,
        };
        if x <= 1.0 && current_step > jumps {
            current_step = jumps;
        }
        current_step / jumps
    }
}
