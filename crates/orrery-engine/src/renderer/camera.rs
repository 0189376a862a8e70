use std::f32::consts::FRAC_PI_2;
use glam::{Mat4, Vec2, Vec3};
use crate::api::config::CameraConfig;
use crate::systems::pick::Ray;

/// Keep the eye just short of the poles so `look_at` never degenerates.
const MAX_ELEVATION: f32 = FRAC_PI_2 - 1e-3;

/// Perspective camera orbiting a target point.
///
/// Position is stored in spherical form around `target` (azimuth about +Y measured
/// from +Z, elevation above the XZ plane, distance). Rotation input accumulates into a
/// pending delta that [`update`](Self::update) bleeds off by `damping` each frame, which
/// gives the glide-to-stop feel of the usual orbit controls.
#[derive(Debug, Clone)]
pub struct OrbitCamera {
    /// Vertical field of view in radians.
    pub fov_y: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub target: Vec3,
    azimuth: f32,
    elevation: f32,
    distance: f32,
    min_distance: f32,
    max_distance: f32,
    damping: f32,
    pending_azimuth: f32,
    pending_elevation: f32,
}

impl OrbitCamera {
    pub fn new(config: &CameraConfig, aspect: f32) -> Self {
        let eye = Vec3::from_array(config.position);
        let distance = eye.length().max(f32::EPSILON);
        let mut camera = Self {
            fov_y: config.fov_deg.to_radians(),
            aspect,
            near: config.near,
            far: config.far,
            target: Vec3::ZERO,
            azimuth: eye.x.atan2(eye.z),
            elevation: (eye.y / distance).clamp(-1.0, 1.0).asin(),
            distance,
            min_distance: config.min_distance,
            max_distance: config.max_distance,
            damping: config.damping.clamp(0.0, 1.0),
            pending_azimuth: 0.0,
            pending_elevation: 0.0,
        };
        camera.clamp();
        camera
    }

    /// Eye position in world space.
    pub fn position(&self) -> Vec3 {
        let (sin_az, cos_az) = self.azimuth.sin_cos();
        let (sin_el, cos_el) = self.elevation.sin_cos();
        self.target + self.distance * Vec3::new(cos_el * sin_az, sin_el, cos_el * cos_az)
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position(), self.target, Vec3::Y)
    }

    /// OpenGL-style projection: NDC z in [-1, 1].
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov_y, self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        if aspect.is_finite() && aspect > 0.0 {
            self.aspect = aspect;
        }
    }

    /// Queue an orbit rotation in radians. Applied over the next updates.
    pub fn rotate(&mut self, d_azimuth: f32, d_elevation: f32) {
        self.pending_azimuth += d_azimuth;
        self.pending_elevation += d_elevation;
    }

    /// Scale the orbit distance (< 1 moves in). Clamped to the configured range.
    pub fn zoom(&mut self, factor: f32) {
        if factor.is_finite() && factor > 0.0 {
            self.distance *= factor;
            self.clamp();
        }
    }

    /// Apply one frame of pending rotation. Returns `true` while still gliding.
    pub fn update(&mut self) -> bool {
        if self.damping <= 0.0 {
            self.azimuth += self.pending_azimuth;
            self.elevation += self.pending_elevation;
            self.pending_azimuth = 0.0;
            self.pending_elevation = 0.0;
        } else {
            self.azimuth += self.pending_azimuth * self.damping;
            self.elevation += self.pending_elevation * self.damping;
            self.pending_azimuth *= 1.0 - self.damping;
            self.pending_elevation *= 1.0 - self.damping;
        }
        self.clamp();
        self.pending_azimuth.abs() > 1e-6 || self.pending_elevation.abs() > 1e-6
    }

    fn clamp(&mut self) {
        self.elevation = self.elevation.clamp(-MAX_ELEVATION, MAX_ELEVATION);
        self.distance = self.distance.clamp(self.min_distance, self.max_distance);
    }

    /// World point to NDC. `z > 1` means behind the camera.
    pub fn project(&self, world: Vec3) -> Vec3 {
        self.view_projection().project_point3(world)
    }

    /// Ray from the eye through an NDC point.
    pub fn ray_from_ndc(&self, ndc: Vec2) -> Option<Ray> {
        let origin = self.position();
        let forward = (self.target - origin).normalize_or_zero();
        let right = forward.cross(Vec3::Y).normalize_or_zero();
        let up = right.cross(forward);
        let half_h = (self.fov_y * 0.5).tan();
        let half_w = half_h * self.aspect;
        Ray::new(origin, forward + right * (ndc.x * half_w) + up * (ndc.y * half_h))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> OrbitCamera {
        OrbitCamera::new(&CameraConfig::default(), 16.0 / 9.0)
    }

    #[test]
    fn starts_at_configured_position() {
        let cam = camera();
        let eye = cam.position();
        assert!((eye - Vec3::new(0.0, 40.0, 120.0)).length() < 1e-3, "{eye}");
    }

    #[test]
    fn target_projects_to_ndc_origin() {
        let ndc = camera().project(Vec3::ZERO);
        assert!(ndc.x.abs() < 1e-5 && ndc.y.abs() < 1e-5, "{ndc}");
        assert!(ndc.z > -1.0 && ndc.z < 1.0);
    }

    #[test]
    fn point_behind_camera_has_z_beyond_far() {
        let cam = camera();
        let behind = cam.position() + (cam.position() - cam.target).normalize() * 50.0;
        assert!(cam.project(behind).z > 1.0);
    }

    #[test]
    fn centre_ray_passes_through_target() {
        let cam = camera();
        let ray = cam.ray_from_ndc(Vec2::ZERO).unwrap();
        let (_, miss) = ray.closest_approach(Vec3::ZERO).unwrap();
        assert!(miss < 1e-2, "missed target by {miss}");
    }

    #[test]
    fn zoom_is_clamped() {
        let mut cam = camera();
        cam.zoom(1e-6);
        assert_eq!(cam.distance(), 10.0);
        cam.zoom(1e9);
        assert_eq!(cam.distance(), 10_000.0);
    }

    #[test]
    fn damped_rotation_glides_to_full_delta() {
        let mut cam = camera();
        let start = cam.position();
        cam.rotate(0.5, 0.0);
        assert!(cam.update());
        let first = cam.position();
        assert!(first.distance(start) > 0.0);
        for _ in 0..1000 {
            cam.update();
        }
        assert!(!cam.update());
        // Azimuth moved by the whole 0.5 rad; distance unchanged.
        assert!((cam.position().length() - start.length()).abs() < 1e-3);
        let turned = cam.position();
        let expected = start.x * 0.5f32.cos() + start.z * 0.5f32.sin();
        assert!((turned.x - expected).abs() < 1e-2, "{turned} vs x={expected}");
    }

    #[test]
    fn elevation_never_reaches_pole() {
        let mut cam = OrbitCamera::new(&CameraConfig { damping: 0.0, ..CameraConfig::default() }, 1.0);
        cam.rotate(0.0, 10.0);
        cam.update();
        let eye = cam.position();
        assert!(eye.y < cam.distance());
        assert!(cam.view_matrix().is_finite());
    }
}
