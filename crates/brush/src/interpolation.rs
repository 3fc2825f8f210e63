//! Generic interpolation primitives
//!
//! Scalar [`lerp`] is the rule everything else builds on: vectors, colors and
//! durations interpolate component-wise through it, and the [`Lerp`] trait
//! lets whole records (see [`crate::vertex`]) be blended the same way.

use std::f32::consts::{PI, TAU};
use std::time::Duration;

use glam::{Vec2, Vec3};

/// Slack allowed on barycentric weights before a point counts as outside.
const BARYCENTRIC_TOLERANCE: f32 = 1e-3;

/// Linearly interpolates from `a` to `b` by `t`.
///
/// Exact at `t = 0` and `t = 1`, monotonic in `t`, and bounded by `a` and
/// `b` for `t` in [0, 1]. When `a == b` the result is `a` for every finite
/// `t` and NaN for infinite `t`. When `a != b` an infinite `t` gives an
/// infinity with the sign of the extrapolation rather than NaN.
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    if a.is_nan() || b.is_nan() || t.is_nan() {
        return f32::NAN;
    }
    if a == b {
        return if t.is_finite() { a } else { f32::NAN };
    }
    if t.is_infinite() {
        return if (b > a) == (t > 0.0) {
            f32::INFINITY
        } else {
            f32::NEG_INFINITY
        };
    }
    if (a <= 0.0 && b >= 0.0) || (a >= 0.0 && b <= 0.0) {
        return t * b + (1.0 - t) * a;
    }
    if t == 1.0 {
        return b;
    }
    let x = a + t * (b - a);
    if (t > 1.0) == (b > a) { b.max(x) } else { b.min(x) }
}

/// Inverse of [`lerp`]: where `value` sits between `a` and `b`.
///
/// Returns 0 for an empty range instead of dividing by zero.
pub fn inverse_lerp(a: f32, b: f32, value: f32) -> f32 {
    if a == b {
        return 0.0;
    }
    (value - a) / (b - a)
}

/// Maps `value` from the range `from` onto the range `to`.
pub fn linear_map(value: f32, from: [f32; 2], to: [f32; 2]) -> f32 {
    lerp(to[0], to[1], inverse_lerp(from[0], from[1], value))
}

/// Plain radian interpolation; large differences extrapolate through full turns.
pub fn lerp_angle(a: f32, b: f32, t: f32) -> f32 {
    lerp(a, b, t)
}

/// Interpolates along the shorter arc from `a` to `b`, wrapped into [0, 2pi).
pub fn normalized_angle_lerp(a: f32, b: f32, t: f32) -> f32 {
    let delta = normalize_angle_about_zero(b - a);
    normalize_angle(lerp(a, a + delta, t))
}

/// Wraps an angle into [0, 2pi).
pub fn normalize_angle(radians: f32) -> f32 {
    let mut wrapped = radians % TAU;
    if wrapped < 0.0 {
        wrapped += TAU;
    }
    // Adding TAU to a tiny negative remainder can round up to TAU itself
    if wrapped >= TAU { 0.0 } else { wrapped }
}

/// Wraps an angle into (-pi, pi].
pub fn normalize_angle_about_zero(radians: f32) -> f32 {
    let wrapped = normalize_angle(radians);
    if wrapped > PI { wrapped - TAU } else { wrapped }
}

/// Barycentric weights of `position` in the triangle `a`, `b`, `c`.
///
/// The weights sum to 1. Panics on a degenerate triangle; in debug builds
/// also panics when `position` lies outside the triangle.
pub fn barycentric_coordinates(a: Vec2, b: Vec2, c: Vec2, position: Vec2) -> Vec3 {
    let ab = b - a;
    let ac = c - a;
    let ap = position - a;
    let denominator = ab.perp_dot(ac);
    assert!(
        denominator != 0.0 && denominator.is_finite(),
        "barycentric_coordinates: degenerate triangle ({a}, {b}, {c})"
    );
    let v = ap.perp_dot(ac) / denominator;
    let w = ab.perp_dot(ap) / denominator;
    let u = 1.0 - v - w;
    debug_assert!(
        u >= -BARYCENTRIC_TOLERANCE && v >= -BARYCENTRIC_TOLERANCE && w >= -BARYCENTRIC_TOLERANCE,
        "barycentric_coordinates: {position} is outside triangle ({a}, {b}, {c})"
    );
    Vec3::new(u, v, w)
}

/// Types that blend component-wise with the scalar [`lerp`] rule.
pub trait Lerp: Copy {
    /// Interpolates from `self` to `other` by `t`.
    fn lerp_to(self, other: Self, t: f32) -> Self;

    /// Weighted blend of three values; `weights` normally sum to 1.
    fn barycentric_blend(a: Self, b: Self, c: Self, weights: Vec3) -> Self;
}

impl Lerp for f32 {
    #[inline]
    fn lerp_to(self, other: Self, t: f32) -> Self {
        lerp(self, other, t)
    }

    #[inline]
    fn barycentric_blend(a: Self, b: Self, c: Self, weights: Vec3) -> Self {
        a * weights.x + b * weights.y + c * weights.z
    }
}

impl Lerp for Vec2 {
    #[inline]
    fn lerp_to(self, other: Self, t: f32) -> Self {
        Vec2::new(lerp(self.x, other.x, t), lerp(self.y, other.y, t))
    }

    #[inline]
    fn barycentric_blend(a: Self, b: Self, c: Self, weights: Vec3) -> Self {
        a * weights.x + b * weights.y + c * weights.z
    }
}

/// Per-channel color blending
impl Lerp for [f32; 4] {
    fn lerp_to(self, other: Self, t: f32) -> Self {
        std::array::from_fn(|i| lerp(self[i], other[i], t))
    }

    fn barycentric_blend(a: Self, b: Self, c: Self, weights: Vec3) -> Self {
        std::array::from_fn(|i| f32::barycentric_blend(a[i], b[i], c[i], weights))
    }
}

impl Lerp for [f32; 3] {
    fn lerp_to(self, other: Self, t: f32) -> Self {
        std::array::from_fn(|i| lerp(self[i], other[i], t))
    }

    fn barycentric_blend(a: Self, b: Self, c: Self, weights: Vec3) -> Self {
        std::array::from_fn(|i| f32::barycentric_blend(a[i], b[i], c[i], weights))
    }
}

/// Durations interpolate in seconds. Results that `Duration` cannot hold
/// saturate: negative or NaN becomes zero, too large becomes `Duration::MAX`.
impl Lerp for Duration {
    fn lerp_to(self, other: Self, t: f32) -> Self {
        seconds_to_duration(lerp(self.as_secs_f32(), other.as_secs_f32(), t))
    }

    fn barycentric_blend(a: Self, b: Self, c: Self, weights: Vec3) -> Self {
        seconds_to_duration(f32::barycentric_blend(
            a.as_secs_f32(),
            b.as_secs_f32(),
            c.as_secs_f32(),
            weights,
        ))
    }
}

fn seconds_to_duration(seconds: f32) -> Duration {
    Duration::try_from_secs_f32(seconds.max(0.0)).unwrap_or(Duration::MAX)
}
