//! Aspect-preserving orthographic projection for the image quad.
//!
//! [`compute_transform`] is called on every surface resize and returns a fresh
//! [`Transform`]; nothing here holds state between calls.

use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

use crate::EngineError;

pub const NEAR: f32 = 3.0;
pub const FAR: f32 = 7.0;
pub const EYE: Vec3 = Vec3::new(0.0, 0.0, 7.0);
pub const CENTER: Vec3 = Vec3::ZERO;
pub const UP: Vec3 = Vec3::Y;

/// How the orthographic half-extents are derived from the two aspect ratios.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AspectPolicy {
    /// The legacy branch table, including its asymmetric landscape case
    /// (`surface_aspect * image_aspect` when the image is wider than the surface).
    #[default]
    Observed,
    /// Symmetric letterbox: the whole image is always visible and undistorted.
    Contain,
}

/// Symmetric orthographic half-extents: the volume spans `[-half_width, half_width]`
/// horizontally and `[-half_height, half_height]` vertically.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrthoExtents {
    pub half_width: f32,
    pub half_height: f32,
}

impl OrthoExtents {
    pub fn left(&self) -> f32 {
        -self.half_width
    }
    pub fn right(&self) -> f32 {
        self.half_width
    }
    pub fn bottom(&self) -> f32 {
        -self.half_height
    }
    pub fn top(&self) -> f32 {
        self.half_height
    }

    /// Fraction of the viewport the unit quad covers on each axis.
    pub fn coverage(&self) -> (f32, f32) {
        (1.0 / self.half_width, 1.0 / self.half_height)
    }
}

/// View, projection and their product, as produced for one surface size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub extents: OrthoExtents,
    pub view: Mat4,
    pub projection: Mat4,
    pub mvp: Mat4,
}

impl Transform {
    /// Column-major floats, ready for `glUniformMatrix4fv` without transpose.
    pub fn mvp_cols(&self) -> [f32; 16] {
        self.mvp.to_cols_array()
    }
}

/// Builds the transform for the given surface and image sizes using [`AspectPolicy::Observed`].
pub fn compute_transform(
    surface_width: i32,
    surface_height: i32,
    image_width: u32,
    image_height: u32,
) -> Result<Transform, EngineError> {
    compute_transform_with(
        AspectPolicy::Observed,
        surface_width,
        surface_height,
        image_width,
        image_height,
    )
}

pub fn compute_transform_with(
    policy: AspectPolicy,
    surface_width: i32,
    surface_height: i32,
    image_width: u32,
    image_height: u32,
) -> Result<Transform, EngineError> {
    if surface_width <= 0 || surface_height <= 0 || image_width == 0 || image_height == 0 {
        return Err(EngineError::DegenerateProjection {
            surface_width: surface_width.into(),
            surface_height: surface_height.into(),
            image_width: image_width.into(),
            image_height: image_height.into(),
        });
    }

    let image_aspect = image_width as f32 / image_height as f32;
    let surface_aspect = surface_width as f32 / surface_height as f32;
    let landscape = surface_width > surface_height;

    let extents = match policy {
        AspectPolicy::Observed => observed_extents(landscape, image_aspect, surface_aspect),
        AspectPolicy::Contain => contain_extents(image_aspect, surface_aspect),
    };

    let projection = Mat4::orthographic_rh_gl(
        extents.left(),
        extents.right(),
        extents.bottom(),
        extents.top(),
        NEAR,
        FAR,
    );
    let view = Mat4::look_at_rh(EYE, CENTER, UP);

    Ok(Transform {
        extents,
        view,
        projection,
        mvp: projection * view,
    })
}

fn observed_extents(landscape: bool, image_aspect: f32, surface_aspect: f32) -> OrthoExtents {
    if landscape {
        let half_width = if image_aspect > surface_aspect {
            surface_aspect * image_aspect
        } else {
            surface_aspect / image_aspect
        };
        OrthoExtents {
            half_width,
            half_height: 1.0,
        }
    } else {
        // Both sub-cases share one formula.
        OrthoExtents {
            half_width: 1.0,
            half_height: image_aspect / surface_aspect,
        }
    }
}

fn contain_extents(image_aspect: f32, surface_aspect: f32) -> OrthoExtents {
    // The quad spans [-1, 1] on both axes and must end up with image_aspect on screen.
    if surface_aspect >= image_aspect {
        OrthoExtents {
            half_width: surface_aspect / image_aspect,
            half_height: 1.0,
        }
    } else {
        OrthoExtents {
            half_width: 1.0,
            half_height: image_aspect / surface_aspect,
        }
    }
}
