//! Perspective projection for the tilted road camera
//!
//! World space: x is lateral, y is vertical (negative is up), z is the
//! forward axis (larger is farther from the runner). The camera is rotated
//! about the x axis by a fixed angle, then a simple pinhole divide is applied.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

/// Fixed camera used for every projected object
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// Rotation about the lateral axis (radians)
    pub angle: f32,
    /// Perspective focal length (world units)
    pub focal_length: f32,
}

impl Camera {
    pub fn new(angle: f32, focal_length: f32) -> Self {
        Self {
            angle,
            focal_length,
        }
    }

    pub fn from_tuning(tuning: &Tuning) -> Self {
        Self::new(tuning.camera_angle_deg.to_radians(), tuning.focal_length)
    }

    /// Project with the default rescale of 1
    #[inline]
    pub fn project(&self, point: Vec3) -> Projected {
        self.project_scaled(point, 1.0)
    }

    /// Project a world point; `rescale` multiplies the reported size only
    pub fn project_scaled(&self, point: Vec3, rescale: f32) -> Projected {
        let (sin, cos) = self.angle.sin_cos();
        let rotated_y = point.y * sin - point.z * cos;
        let rotated_z = point.y * cos + point.z * sin;
        let scale = self.focal_length / (self.focal_length + rotated_z);

        Projected {
            screen: Vec2::new(point.x * scale, rotated_y * scale),
            scale: scale * rescale,
            depth: rotated_z,
        }
    }
}

/// Screen-space result of a projection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projected {
    /// Offset from the vanishing origin (screen units)
    pub screen: Vec2,
    /// Depth-scaled size multiplier
    pub scale: f32,
    /// Rotated depth; larger is farther, used for draw ordering
    pub depth: f32,
}

impl Projected {
    /// Whether the point lies in front of the camera
    pub fn is_visible(&self) -> bool {
        self.scale.is_finite() && self.scale > 0.0
    }
}
