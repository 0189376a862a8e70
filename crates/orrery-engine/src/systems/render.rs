use glam::Quat;
use crate::components::mesh::Geometry;
use crate::components::node::ChildRole;
use crate::core::registry::SceneObjectRegistry;
use crate::renderer::instance::{
    ColorVertex, RenderBuffer, RenderInstance, SHAPE_ICOSAHEDRON, SHAPE_RING, SHAPE_SPHERE,
};

/// Build the frame's render buffer from the registry.
/// Instances follow registry order; `body_index` records each body's position in it.
pub fn build_render_buffer(registry: &SceneObjectRegistry, buffer: &mut RenderBuffer) {
    buffer.clear();
    let graph = registry.graph();
    let resources = registry.resources();

    for (index, node) in registry.iter().enumerate() {
        if let Some(mesh) = node.mesh {
            if let (Some(geometry), Some(material)) = (resources.geometry(mesh), resources.material(mesh)) {
                let shape = match geometry {
                    Geometry::Icosahedron { .. } => SHAPE_ICOSAHEDRON,
                    _ => SHAPE_SPHERE,
                };
                buffer.instances.push(
                    RenderInstance::new(node.position, geometry.bounding_radius(), node.rotation, shape, material)
                        .with_body_index(index),
                );
            }
        }

        for child in &node.children {
            let (Some(world), Some(geometry), Some(material)) = (
                graph.world(child.node),
                resources.geometry(child.mesh),
                resources.material(child.mesh),
            ) else {
                continue;
            };
            match (child.role, geometry) {
                (ChildRole::Ring, Geometry::Ring { inner, outer }) => buffer.instances.push(
                    RenderInstance::new(world.position, *outer * world.scale, world.yaw, SHAPE_RING, material)
                        .with_inner(*inner * world.scale)
                        .with_body_index(index),
                ),
                (ChildRole::Rock | ChildRole::OuterRock, Geometry::Icosahedron { radius }) => buffer.instances.push(
                    RenderInstance::new(world.position, *radius * world.scale, world.yaw, SHAPE_ICOSAHEDRON, material)
                        .with_body_index(index),
                ),
                (ChildRole::Dust, Geometry::PointCloud { positions }) => {
                    let rotation = Quat::from_rotation_y(world.yaw);
                    buffer.points.extend(positions.iter().map(|p| {
                        ColorVertex::new(world.position + rotation * *p * world.scale, material)
                    }));
                }
                _ => {}
            }
        }

        if let Some(path) = &node.orbit_path {
            if let (Some(Geometry::Polyline { points }), Some(material)) =
                (resources.geometry(path.mesh), resources.material(path.mesh))
            {
                for segment in points.windows(2) {
                    buffer.lines.push(ColorVertex::new(segment[0], material));
                    buffer.lines.push(ColorVertex::new(segment[1], material));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::config::OrreryConfig;
    use crate::model::body::{BeltSpec, Body, BodyKind, OrbitalElements};

    fn registry() -> SceneObjectRegistry {
        let mut registry = SceneObjectRegistry::new(&OrreryConfig::default());
        registry.rebuild(&[
            Body::new("sun", BodyKind::Star, 20.0),
            Body::new("saturn", BodyKind::Planet, 9.0)
                .with_rings(12.0, 20.0)
                .with_orbit(OrbitalElements::circular(9.537, 29.45)),
            Body::new("asteroid_belt", BodyKind::Region, 1.0)
                .with_belt(BeltSpec::new(2.0, 4.7).with_particles(64).with_rocks(3)),
        ]);
        registry
    }

    #[test]
    fn buffer_holds_every_drawable() {
        let registry = registry();
        let mut buffer = RenderBuffer::new();
        build_render_buffer(&registry, &mut buffer);

        // sun + saturn + ring + 3 rocks
        assert_eq!(buffer.instance_count(), 6);
        assert_eq!(buffer.point_count(), 64);
        // 200 segments, two vertices each
        assert_eq!(buffer.line_vertex_count(), 400);
    }

    #[test]
    fn ring_follows_its_planet() {
        let registry = registry();
        let mut buffer = RenderBuffer::new();
        build_render_buffer(&registry, &mut buffer);

        let saturn = registry.get("saturn").unwrap().position;
        let ring = buffer.instances.iter().find(|i| i.shape == SHAPE_RING).unwrap();
        assert!((ring.x - saturn.x).abs() < 1e-4 && (ring.z - saturn.z).abs() < 1e-4);
        assert_eq!(ring.inner, 12.0);
        assert_eq!(ring.scale, 20.0);
    }

    #[test]
    fn rebuilding_the_buffer_replaces_it() {
        let registry = registry();
        let mut buffer = RenderBuffer::new();
        build_render_buffer(&registry, &mut buffer);
        build_render_buffer(&registry, &mut buffer);
        assert_eq!(buffer.instance_count(), 6);
    }
}
