use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use crate::components::mesh::Material;

/// Shape codes carried in [`RenderInstance::shape`].
pub const SHAPE_SPHERE: f32 = 0.0;
pub const SHAPE_ICOSAHEDRON: f32 = 1.0;
pub const SHAPE_RING: f32 = 2.0;

/// Per-instance render data read by the host renderer straight out of wasm memory.
/// Must match the host protocol: 16 floats = 64 bytes stride.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct RenderInstance {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    /// Sphere/icosahedron radius, or ring outer radius.
    pub scale: f32,
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub opacity: f32,
    pub emissive_r: f32,
    pub emissive_g: f32,
    pub emissive_b: f32,
    pub emissive_intensity: f32,
    /// Spin about +Y in radians.
    pub rotation: f32,
    pub shape: f32,
    /// Ring inner radius; zero for solid shapes.
    pub inner: f32,
    /// Index of the owning body in registry order, so the host can map hits back.
    pub body_index: f32,
}

impl RenderInstance {
    pub const FLOATS: usize = 16;
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;

    pub fn new(position: Vec3, scale: f32, rotation: f32, shape: f32, material: &Material) -> Self {
        Self {
            x: position.x,
            y: position.y,
            z: position.z,
            scale,
            r: material.color.r,
            g: material.color.g,
            b: material.color.b,
            opacity: material.opacity,
            emissive_r: material.emissive.r,
            emissive_g: material.emissive.g,
            emissive_b: material.emissive.b,
            emissive_intensity: material.emissive_intensity,
            rotation,
            shape,
            inner: 0.0,
            body_index: 0.0,
        }
    }

    pub fn with_inner(mut self, inner: f32) -> Self {
        self.inner = inner;
        self
    }

    pub fn with_body_index(mut self, index: usize) -> Self {
        self.body_index = index as f32;
        self
    }
}

/// Colored vertex for orbit lines and belt particles.
/// 7 floats per vertex (x, y, z, r, g, b, a).
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct ColorVertex {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl ColorVertex {
    pub const FLOATS: usize = 7;
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;

    pub fn new(position: Vec3, material: &Material) -> Self {
        Self {
            x: position.x,
            y: position.y,
            z: position.z,
            r: material.color.r,
            g: material.color.g,
            b: material.color.b,
            a: material.opacity,
        }
    }
}

/// Everything the host draws in one frame.
pub struct RenderBuffer {
    /// Solid meshes and rings, in registry order.
    pub instances: Vec<RenderInstance>,
    /// Orbit paths as a line list (two vertices per segment).
    pub lines: Vec<ColorVertex>,
    /// Belt particles.
    pub points: Vec<ColorVertex>,
}

impl RenderBuffer {
    pub fn new() -> Self {
        Self {
            instances: Vec::with_capacity(64),
            lines: Vec::with_capacity(4096),
            points: Vec::new(),
        }
    }

    pub fn clear(&mut self) {
        self.instances.clear();
        self.lines.clear();
        self.points.clear();
    }

    pub fn instance_count(&self) -> u32 {
        self.instances.len() as u32
    }

    pub fn line_vertex_count(&self) -> u32 {
        self.lines.len() as u32
    }

    pub fn point_count(&self) -> u32 {
        self.points.len() as u32
    }

    /// Raw pointer to instance data for direct reads from wasm memory.
    pub fn instances_ptr(&self) -> *const f32 {
        self.instances.as_ptr() as *const f32
    }

    pub fn lines_ptr(&self) -> *const f32 {
        self.lines.as_ptr() as *const f32
    }

    pub fn points_ptr(&self) -> *const f32 {
        self.points.as_ptr() as *const f32
    }
}

impl Default for RenderBuffer {
    fn default() -> Self {
        Self::new()
    }
}
