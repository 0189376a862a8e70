use glam::Vec3;
use crate::model::body::Rgb;

/// Sphere tessellation used for stars and planets.
pub const SPHERE_SEGMENTS: u32 = 32;

/// CPU-side description of a renderable shape. Owned by the resource pool.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    /// UV sphere (stars, planets).
    Sphere { radius: f32, segments: u32 },
    /// Low-poly irregular rock (comets, asteroids, belt rocks).
    Icosahedron { radius: f32 },
    /// Flat annulus lying in the parent's equatorial (XZ) plane.
    Ring { inner: f32, outer: f32 },
    /// Open poly-line in world space (orbit paths).
    Polyline { points: Vec<Vec3> },
    /// Particle field in parent-local space (belt dust).
    PointCloud { positions: Vec<Vec3> },
}

impl Geometry {
    pub fn sphere(radius: f32) -> Self {
        Geometry::Sphere { radius, segments: SPHERE_SEGMENTS }
    }

    pub fn icosahedron(radius: f32) -> Self {
        Geometry::Icosahedron { radius }
    }

    pub fn ring(inner: f32, outer: f32) -> Self {
        Geometry::Ring { inner, outer }
    }

    /// Radius of a sphere enclosing the whole shape in local space.
    pub fn bounding_radius(&self) -> f32 {
        match self {
            Geometry::Sphere { radius, .. } | Geometry::Icosahedron { radius } => *radius,
            Geometry::Ring { outer, .. } => *outer,
            Geometry::Polyline { points } => max_length(points),
            Geometry::PointCloud { positions } => max_length(positions),
        }
    }

    /// Number of vertices this geometry would upload.
    pub fn vertex_count(&self) -> usize {
        match self {
            Geometry::Sphere { segments, .. } => ((segments + 1) * (segments + 1)) as usize,
            Geometry::Icosahedron { .. } => 12,
            Geometry::Ring { .. } => 2 * (SPHERE_SEGMENTS as usize + 1),
            Geometry::Polyline { points } => points.len(),
            Geometry::PointCloud { positions } => positions.len(),
        }
    }
}

fn max_length(points: &[Vec3]) -> f32 {
    points.iter().map(|p| p.length()).fold(0.0, f32::max)
}

/// Surface appearance. The highlighter mutates these in place through the pool.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub color: Rgb,
    pub emissive: Rgb,
    /// Glow multiplier applied to `emissive` (0 = no glow).
    pub emissive_intensity: f32,
    pub opacity: f32,
    pub texture: Option<String>,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            color: Rgb::WHITE,
            emissive: Rgb::BLACK,
            emissive_intensity: 0.0,
            opacity: 1.0,
            texture: None,
        }
    }
}

impl Material {
    pub fn new(color: Rgb) -> Self {
        Self {
            color,
            ..Default::default()
        }
    }

    pub fn with_emissive(mut self, emissive: Rgb, intensity: f32) -> Self {
        self.emissive = emissive;
        self.emissive_intensity = intensity;
        self
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }

    pub fn with_texture(mut self, texture: Option<String>) -> Self {
        self.texture = texture;
        self
    }
}
