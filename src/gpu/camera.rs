//! Camera for viewing the galaxy.
//!
//! The camera sits on the +Z axis at the transform's distance and looks at
//! the origin. Gestures rotate the galaxy itself, not the camera: pitch about
//! X, then yaw about Y.

use glam::{Mat4, Vec3};

use crate::motion::FrameTransform;

/// Perspective camera whose projection depends only on the viewport.
#[derive(Clone, Debug)]
pub struct Camera {
    /// Vertical field of view in radians.
    pub fov_y: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    projection: Mat4,
}

impl Camera {
    pub fn new(fov_degrees: f32, width: u32, height: u32) -> Self {
        let mut camera = Self {
            fov_y: fov_degrees.to_radians(),
            aspect: 1.0,
            near: 0.1,
            far: 2000.0,
            projection: Mat4::IDENTITY,
        };
        camera.set_viewport(width, height);
        camera
    }

    /// Recompute the projection for a new viewport size.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.aspect = width.max(1) as f32 / height.max(1) as f32;
        self.projection = Mat4::perspective_rh(self.fov_y, self.aspect, self.near, self.far);
    }

    pub fn projection(&self) -> Mat4 {
        self.projection
    }

    /// Galaxy orientation for a transform.
    pub fn model_matrix(transform: &FrameTransform) -> Mat4 {
        Mat4::from_rotation_x(transform.pitch) * Mat4::from_rotation_y(transform.yaw)
    }

    /// Calculate the view matrix for a transform.
    pub fn view_matrix(transform: &FrameTransform) -> Mat4 {
        let eye = Vec3::new(0.0, 0.0, transform.camera_distance);
        Mat4::look_at_rh(eye, Vec3::ZERO, Vec3::Y)
    }

    /// View times model, used to billboard splats in view space.
    pub fn model_view(transform: &FrameTransform) -> Mat4 {
        Self::view_matrix(transform) * Self::model_matrix(transform)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    fn transform(distance: f32) -> FrameTransform {
        FrameTransform {
            camera_distance: distance,
            pitch: 0.0,
            yaw: 0.0,
        }
    }

    #[test]
    fn test_origin_at_camera_distance() {
        let mv = Camera::model_view(&transform(45.0));
        let p = mv * Vec4::new(0.0, 0.0, 0.0, 1.0);
        assert!((p.z + 45.0).abs() < 1e-4);
    }

    #[test]
    fn test_yaw_rotates_galaxy() {
        let t = FrameTransform {
            yaw: std::f32::consts::FRAC_PI_2,
            ..transform(10.0)
        };
        let p = Camera::model_matrix(&t) * Vec4::new(1.0, 0.0, 0.0, 1.0);
        // +X swings onto -Z under a right-handed rotation about Y
        assert!((p.z + 1.0).abs() < 1e-5);
        assert!(p.x.abs() < 1e-5);
    }

    #[test]
    fn test_viewport_changes_only_aspect() {
        let mut camera = Camera::new(60.0, 1280, 720);
        let before = camera.fov_y;
        camera.set_viewport(500, 500);
        assert_eq!(camera.aspect, 1.0);
        assert_eq!(camera.fov_y, before);
        camera.set_viewport(0, 0);
        assert_eq!(camera.aspect, 1.0);
    }
}
