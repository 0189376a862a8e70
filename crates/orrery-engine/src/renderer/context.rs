use glam::{Vec2, Vec3};
use crate::api::config::CameraConfig;
use crate::renderer::camera::OrbitCamera;
use crate::systems::pick::Ray;

/// Drawing surface size in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: width.max(1.0),
            height: height.max(1.0),
        }
    }

    pub fn aspect(&self) -> f32 {
        self.width / self.height
    }

    /// NDC (x right, y up) to pixels (origin top-left, y down).
    pub fn ndc_to_screen(&self, ndc: Vec2) -> Vec2 {
        Vec2::new(
            (ndc.x + 1.0) / 2.0 * self.width,
            (1.0 - ndc.y) / 2.0 * self.height,
        )
    }

    pub fn screen_to_ndc(&self, screen: Vec2) -> Vec2 {
        Vec2::new(
            screen.x / self.width * 2.0 - 1.0,
            1.0 - screen.y / self.height * 2.0,
        )
    }
}

/// Camera plus viewport, created once by the orchestrator and passed explicitly to
/// whatever needs to project or build pick rays.
#[derive(Debug, Clone)]
pub struct RenderContext {
    pub camera: OrbitCamera,
    pub viewport: Viewport,
}

impl RenderContext {
    pub fn new(config: &CameraConfig, width: f32, height: f32) -> Self {
        let viewport = Viewport::new(width, height);
        Self {
            camera: OrbitCamera::new(config, viewport.aspect()),
            viewport,
        }
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.viewport = Viewport::new(width, height);
        self.camera.set_aspect(self.viewport.aspect());
    }

    /// Pixel coordinates and NDC depth of a world point.
    pub fn project_to_screen(&self, world: Vec3) -> (Vec2, f32) {
        let ndc = self.camera.project(world);
        (self.viewport.ndc_to_screen(ndc.truncate()), ndc.z)
    }

    /// Pick ray through a pixel.
    pub fn ray_from_screen(&self, x: f32, y: f32) -> Option<Ray> {
        self.camera.ray_from_ndc(self.viewport.screen_to_ndc(Vec2::new(x, y)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> RenderContext {
        RenderContext::new(&CameraConfig::default(), 800.0, 600.0)
    }

    #[test]
    fn origin_lands_on_screen_centre() {
        let (screen, depth) = context().project_to_screen(Vec3::ZERO);
        assert!((screen - Vec2::new(400.0, 300.0)).length() < 1e-2, "{screen}");
        assert!(depth < 1.0);
    }

    #[test]
    fn ndc_screen_round_trip_corners() {
        let vp = Viewport::new(800.0, 600.0);
        assert_eq!(vp.ndc_to_screen(Vec2::new(-1.0, 1.0)), Vec2::ZERO);
        assert_eq!(vp.ndc_to_screen(Vec2::new(1.0, -1.0)), Vec2::new(800.0, 600.0));
        assert_eq!(vp.screen_to_ndc(Vec2::new(400.0, 300.0)), Vec2::ZERO);
    }

    #[test]
    fn centre_ray_hits_sun_sized_sphere() {
        let ray = context().ray_from_screen(400.0, 300.0).unwrap();
        assert!(ray.intersect_sphere(Vec3::ZERO, 20.0).is_some());
        // Far corner misses it.
        let corner = context().ray_from_screen(0.0, 0.0).unwrap();
        assert!(corner.intersect_sphere(Vec3::ZERO, 20.0).is_none());
    }

    #[test]
    fn screen_ray_agrees_with_projection() {
        let ctx = context();
        let world = Vec3::new(30.0, 5.0, -10.0);
        let (screen, _) = ctx.project_to_screen(world);
        let ray = ctx.ray_from_screen(screen.x, screen.y).unwrap();
        let (_, miss) = ray.closest_approach(world).unwrap();
        assert!(miss < 0.05, "ray missed projected point by {miss}");
    }

    #[test]
    fn resize_updates_aspect_and_ignores_zero() {
        let mut ctx = context();
        ctx.resize(1920.0, 1080.0);
        assert!((ctx.camera.aspect - 1920.0 / 1080.0).abs() < 1e-6);
        ctx.resize(0.0, 0.0);
        assert_eq!(ctx.viewport.width, 1.0);
        assert!((ctx.camera.aspect - 1.0).abs() < 1e-6);
    }
}
