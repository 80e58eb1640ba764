use bytemuck::{Pod, Zeroable};
use glam::{DVec3, Mat4};

use crate::focus::{CameraRig, FocusState};

/// Perspective camera orbiting a look-at target.
///
/// Retargeting moves the target and keeps the eye's offset from it, so the
/// focused body stays centered at the same viewing distance.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitCamera {
    pub target: DVec3,
    /// Eye position relative to the target.
    pub offset: DVec3,
    /// Vertical field of view in degrees.
    pub fov_y: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

/// GPU-side uniform data for the camera.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct CameraUniform {
    pub view_projection: [[f32; 4]; 4],
    pub eye: [f32; 4],
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self {
            target: DVec3::ZERO,
            offset: DVec3::new(0.0, 40.0, 220.0),
            fov_y: 55.0,
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 2000.0,
        }
    }
}

impl OrbitCamera {
    pub fn eye(&self) -> DVec3 {
        self.target + self.offset
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye().as_vec3(), self.target.as_vec3(), glam::Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y.to_radians(), self.aspect, self.near, self.far)
    }

    pub fn uniform(&self) -> CameraUniform {
        let eye = self.eye().as_vec3();
        CameraUniform {
            view_projection: (self.projection_matrix() * self.view_matrix()).to_cols_array_2d(),
            eye: [eye.x, eye.y, eye.z, 1.0],
        }
    }

    /// Resize the viewport (e.g. on window resize).
    pub fn resize(&mut self, viewport_width: f32, viewport_height: f32) {
        if viewport_height > 0.0 {
            self.aspect = viewport_width / viewport_height;
        }
    }

    /// Move closer to (factor < 1) or away from (factor > 1) the target.
    pub fn zoom(&mut self, factor: f64) {
        if factor.is_finite() && factor > 0.0 {
            self.offset *= factor;
        }
    }
}

impl CameraRig for OrbitCamera {
    fn retarget(&mut self, focus: &FocusState) {
        self.target = focus.world_position;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::focus::FocusTarget;

    #[test]
    fn retarget_keeps_viewing_offset() {
        let mut cam = OrbitCamera::default();
        let offset = cam.offset;
        cam.retarget(&FocusState {
            target: FocusTarget::Body("Jupiter".into()),
            world_position: DVec3::new(40.0, 0.0, 0.0),
            time: 0.0,
        });
        assert_eq!(cam.target, DVec3::new(40.0, 0.0, 0.0));
        assert_eq!(cam.eye(), DVec3::new(40.0, 0.0, 0.0) + offset);
    }

    #[test]
    fn target_projects_to_screen_center() {
        let cam = OrbitCamera::default();
        let vp = cam.projection_matrix() * cam.view_matrix();
        let clip = vp * cam.target.as_vec3().extend(1.0);
        let ndc = clip / clip.w;
        assert!(ndc.x.abs() < 1e-5 && ndc.y.abs() < 1e-5, "{ndc:?}");
    }

    #[test]
    fn resize_updates_aspect() {
        let mut cam = OrbitCamera::default();
        cam.resize(1920.0, 1080.0);
        assert!((cam.aspect - 1920.0 / 1080.0).abs() < 1e-6);
        cam.resize(100.0, 0.0);
        assert!((cam.aspect - 1920.0 / 1080.0).abs() < 1e-6);
    }

    #[test]
    fn zoom_scales_offset() {
        let mut cam = OrbitCamera::default();
        cam.zoom(0.5);
        assert_eq!(cam.offset, DVec3::new(0.0, 20.0, 110.0));
        cam.zoom(-1.0);
        assert_eq!(cam.offset, DVec3::new(0.0, 20.0, 110.0));
    }
}
