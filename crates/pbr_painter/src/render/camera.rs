//! # Camera, Projection and Viewport
//!
//! Look-at camera and perspective projection producing the combined
//! `projection * view` transform pushed to the material programs, plus a
//! viewport holder that remembers whether it changed since the last frame.

use crate::config::{CameraConfig, ProjectionConfig};
use crate::foundation::math::{utils, Mat4, Point3, Vec3};

/// Look-at camera
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// Eye position in world space
    pub eye: Vec3,
    /// Point the camera is looking at
    pub center: Vec3,
    /// Up vector (typically [0, 1, 0])
    pub up: Vec3,
}

impl Camera {
    /// Create a camera at `eye` looking at `center`
    #[must_use]
    pub fn look_at(eye: Vec3, center: Vec3) -> Self {
        Self {
            eye,
            center,
            up: Vec3::y(),
        }
    }

    /// Right-handed view matrix
    #[must_use]
    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(&Point3::from(self.eye), &Point3::from(self.center), &self.up)
    }
}

impl From<&CameraConfig> for Camera {
    fn from(config: &CameraConfig) -> Self {
        Self {
            eye: utils::vec3_from_array(config.eye),
            center: utils::vec3_from_array(config.center),
            up: utils::vec3_from_array(config.up),
        }
    }
}

/// Perspective projection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerspectiveProjection {
    /// Near clipping plane
    pub z_near: f32,
    /// Far clipping plane
    pub z_far: f32,
    /// Vertical field of view in radians
    pub fovy: f32,
}

impl PerspectiveProjection {
    /// Projection matrix for a viewport with the given aspect ratio
    #[must_use]
    pub fn matrix(&self, aspect: f32) -> Mat4 {
        Mat4::new_perspective(aspect, self.fovy, self.z_near, self.z_far)
    }
}

impl From<&ProjectionConfig> for PerspectiveProjection {
    fn from(config: &ProjectionConfig) -> Self {
        Self {
            z_near: config.z_near,
            z_far: config.z_far,
            fovy: utils::deg_to_rad(config.fovy_degrees),
        }
    }
}

/// Viewport rectangle in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    /// Left edge
    pub x: i32,
    /// Bottom edge
    pub y: i32,
    /// Width
    pub width: u32,
    /// Height
    pub height: u32,
}

impl Viewport {
    /// Width over height, 1.0 when either side is zero
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn aspect(&self) -> f32 {
        if self.width == 0 || self.height == 0 {
            1.0
        } else {
            self.width as f32 / self.height as f32
        }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            x: 0,
            y: 0,
            width: 800,
            height: 600,
        }
    }
}

/// Viewport plus a changed flag consumed by the next frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewportState {
    viewport: Viewport,
    changed: bool,
}

impl ViewportState {
    /// Start with `viewport`, flagged as changed so the first frame applies it
    #[must_use]
    pub const fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            changed: true,
        }
    }

    /// Current viewport
    #[must_use]
    pub const fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Replace the viewport; only a different rectangle raises the flag
    pub fn set(&mut self, viewport: Viewport) {
        if viewport != self.viewport {
            self.viewport = viewport;
            self.changed = true;
        }
    }

    /// Return the viewport if it changed since the last call, clearing the flag
    pub fn take_changed(&mut self) -> Option<Viewport> {
        std::mem::take(&mut self.changed).then_some(self.viewport)
    }
}

impl Default for ViewportState {
    fn default() -> Self {
        Self::new(Viewport::default())
    }
}
