//! Extruded stroke mesh vertices and their interpolation
//!
//! Vertices are `#[repr(C)]` and `Pod` so vertex arrays can be handed to the
//! GPU with `bytemuck::cast_slice`. Field order keeps every field 4-byte
//! aligned with no padding.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::interpolation::{Lerp, barycentric_coordinates};

/// Per-vertex attributes that do not affect the vertex position
#[derive(
    Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, bytemuck::Pod, bytemuck::Zeroable,
)]
#[repr(C)]
pub struct NonPositionAttributes {
    pub opacity_shift: f32,
    /// Hue, saturation and luminosity shifts
    pub hsl_shift: [f32; 3],
    /// Coordinates on the surface the stroke is drawn onto
    pub surface_uv: Vec2,
    pub animation_offset: f32,
}

impl Lerp for NonPositionAttributes {
    fn lerp_to(self, other: Self, t: f32) -> Self {
        Self {
            opacity_shift: self.opacity_shift.lerp_to(other.opacity_shift, t),
            hsl_shift: self.hsl_shift.lerp_to(other.hsl_shift, t),
            surface_uv: self.surface_uv.lerp_to(other.surface_uv, t),
            animation_offset: self.animation_offset.lerp_to(other.animation_offset, t),
        }
    }

    fn barycentric_blend(a: Self, b: Self, c: Self, weights: Vec3) -> Self {
        Self {
            opacity_shift: f32::barycentric_blend(
                a.opacity_shift,
                b.opacity_shift,
                c.opacity_shift,
                weights,
            ),
            hsl_shift: <[f32; 3]>::barycentric_blend(a.hsl_shift, b.hsl_shift, c.hsl_shift, weights),
            surface_uv: Vec2::barycentric_blend(a.surface_uv, b.surface_uv, c.surface_uv, weights),
            animation_offset: f32::barycentric_blend(
                a.animation_offset,
                b.animation_offset,
                c.animation_offset,
                weights,
            ),
        }
    }
}

/// One vertex of an extruded stroke mesh
#[derive(
    Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, bytemuck::Pod, bytemuck::Zeroable,
)]
#[repr(C)]
pub struct ExtrudedVertex {
    pub position: Vec2,
    /// RGBA
    pub color: [f32; 4],
    pub texture_coords: Vec2,
    pub secondary_texture_coords: Vec2,
    pub non_position_attributes: NonPositionAttributes,
}

impl ExtrudedVertex {
    /// Interpolates every attribute, position included, from `a` to `b`.
    pub fn lerp(a: &Self, b: &Self, t: f32) -> Self {
        a.lerp_to(*b, t)
    }

    /// Vertex at `position` inside the triangle formed by `a`, `b` and `c`,
    /// with every other attribute blended by the barycentric weights of
    /// `position`.
    ///
    /// # Panics
    /// If the triangle is degenerate, or in debug builds if `position` lies
    /// outside it.
    pub fn barycentric_lerp(a: &Self, b: &Self, c: &Self, position: Vec2) -> Self {
        let weights = barycentric_coordinates(a.position, b.position, c.position, position);
        Self {
            position,
            ..Self::barycentric_blend(*a, *b, *c, weights)
        }
    }
}

impl Lerp for ExtrudedVertex {
    fn lerp_to(self, other: Self, t: f32) -> Self {
        Self {
            position: self.position.lerp_to(other.position, t),
            color: self.color.lerp_to(other.color, t),
            texture_coords: self.texture_coords.lerp_to(other.texture_coords, t),
            secondary_texture_coords: self
                .secondary_texture_coords
                .lerp_to(other.secondary_texture_coords, t),
            non_position_attributes: self
                .non_position_attributes
                .lerp_to(other.non_position_attributes, t),
        }
    }

    fn barycentric_blend(a: Self, b: Self, c: Self, weights: Vec3) -> Self {
        Self {
            position: Vec2::barycentric_blend(a.position, b.position, c.position, weights),
            color: <[f32; 4]>::barycentric_blend(a.color, b.color, c.color, weights),
            texture_coords: Vec2::barycentric_blend(
                a.texture_coords,
                b.texture_coords,
                c.texture_coords,
                weights,
            ),
            secondary_texture_coords: Vec2::barycentric_blend(
                a.secondary_texture_coords,
                b.secondary_texture_coords,
                c.secondary_texture_coords,
                weights,
            ),
            non_position_attributes: NonPositionAttributes::barycentric_blend(
                a.non_position_attributes,
                b.non_position_attributes,
                c.non_position_attributes,
                weights,
            ),
        }
    }
}
