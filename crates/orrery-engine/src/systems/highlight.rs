use crate::api::types::BodyId;
use crate::components::mesh::Material;
use crate::components::node::ChildRole;
use crate::core::registry::SceneObjectRegistry;
use crate::model::body::{Body, BodyKind, Rgb, Rings};

pub const STAR_COLOR: u32 = 0xFFD700;
/// Bright cerulean.
pub const BELT_COLOR: u32 = 0x007BA7;
pub const ROCK_COLOR: u32 = 0x888888;
pub const OUTER_ROCK_COLOR: u32 = 0xCCCCCC;
/// Faint self-glow of outer-belt rocks, so they read against the dark.
pub const OUTER_ROCK_GLOW: u32 = 0x333333;
pub const SMALL_BODY_PATH_COLOR: u32 = 0x888888;

pub const PLANET_GLOW: f32 = 0.6;
pub const SELECTED_GLOW: f32 = 1.0;
pub const SELECTED_ROCK_GLOW: f32 = 0.5;

pub const PLANET_PATH_OPACITY: f32 = 0.9;
pub const SMALL_BODY_PATH_OPACITY: f32 = 0.4;
pub const EMPHASIZED_PATH_OPACITY: f32 = 1.0;
pub const RING_OPACITY: f32 = 0.8;
pub const BELT_OPACITY: f32 = 0.45;
pub const SELECTED_BELT_OPACITY: f32 = 0.7;

/// Material of a body's own mesh.
pub fn body_material(body: &Body, selected: bool) -> Material {
    let mut material = Material::new(body.color);
    style_body(&mut material, body, selected);
    material
}

pub fn dust_material(selected: bool) -> Material {
    let mut material = Material::default();
    style_dust(&mut material, selected);
    material
}

pub fn rock_material(selected: bool) -> Material {
    let mut material = Material::new(Rgb::from_hex(ROCK_COLOR));
    style_rock(&mut material, selected);
    material
}

pub fn outer_rock_material(selected: bool) -> Material {
    let mut material = Material::new(Rgb::from_hex(OUTER_ROCK_COLOR));
    style_outer_rock(&mut material, selected);
    material
}

pub fn ring_material(rings: &Rings) -> Material {
    Material::new(Rgb::WHITE)
        .with_opacity(RING_OPACITY)
        .with_texture(rings.texture.clone())
}

pub fn path_material(body: &Body, emphasized: bool) -> Material {
    let color = if body.kind.is_small_body() {
        Rgb::from_hex(SMALL_BODY_PATH_COLOR)
    } else {
        body.color
    };
    Material::new(color).with_opacity(path_opacity(body.kind, emphasized))
}

pub fn path_opacity(kind: BodyKind, emphasized: bool) -> f32 {
    if emphasized {
        EMPHASIZED_PATH_OPACITY
    } else if kind.is_small_body() {
        SMALL_BODY_PATH_OPACITY
    } else {
        PLANET_PATH_OPACITY
    }
}

fn style_body(material: &mut Material, body: &Body, selected: bool) {
    match body.kind {
        // Stars are unlit: selection swaps the base color instead of adding glow.
        BodyKind::Star => {
            material.color = if selected { Rgb::WHITE } else { Rgb::from_hex(STAR_COLOR) };
            material.emissive = Rgb::BLACK;
            material.emissive_intensity = 0.0;
        }
        _ if selected => {
            material.emissive = Rgb::WHITE;
            material.emissive_intensity = SELECTED_GLOW;
        }
        kind if kind.is_small_body() => {
            material.emissive = Rgb::BLACK;
            material.emissive_intensity = 0.0;
        }
        _ => {
            material.emissive = body.color;
            material.emissive_intensity = PLANET_GLOW;
        }
    }
}

fn style_dust(material: &mut Material, selected: bool) {
    if selected {
        material.color = Rgb::WHITE;
        material.opacity = SELECTED_BELT_OPACITY;
    } else {
        material.color = Rgb::from_hex(BELT_COLOR);
        material.opacity = BELT_OPACITY;
    }
}

fn style_rock(material: &mut Material, selected: bool) {
    if selected {
        material.emissive = Rgb::WHITE;
        material.emissive_intensity = SELECTED_ROCK_GLOW;
    } else {
        material.emissive = Rgb::BLACK;
        material.emissive_intensity = 0.0;
    }
}

fn style_outer_rock(material: &mut Material, selected: bool) {
    if selected {
        style_rock(material, true);
    } else {
        material.emissive = Rgb::from_hex(OUTER_ROCK_GLOW);
        material.emissive_intensity = 1.0;
    }
}

/// Emphasis on the selected and hovered bodies.
///
/// Holds the current ids and rewrites every material from them on [`apply`](Self::apply),
/// so applying twice is the same as applying once.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionHighlighter {
    selected: Option<BodyId>,
    hovered: Option<BodyId>,
}

impl SelectionHighlighter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> Option<&BodyId> {
        self.selected.as_ref()
    }

    pub fn hovered(&self) -> Option<&BodyId> {
        self.hovered.as_ref()
    }

    /// Update both ids. Returns `true` if anything changed.
    pub fn set(&mut self, selected: Option<BodyId>, hovered: Option<BodyId>) -> bool {
        let changed = self.selected != selected || self.hovered != hovered;
        self.selected = selected;
        self.hovered = hovered;
        changed
    }

    pub fn set_hovered(&mut self, hovered: Option<BodyId>) -> bool {
        let changed = self.hovered != hovered;
        self.hovered = hovered;
        changed
    }

    /// Write selection state into every material the registry owns.
    pub fn apply(&self, registry: &mut SceneObjectRegistry) {
        let (nodes, resources) = registry.split_mut();
        for node in nodes.values() {
            let selected = self.selected.as_ref() == Some(node.id());
            let hovered = self.hovered.as_ref() == Some(node.id());

            if let Some(material) = node.mesh.and_then(|m| resources.material_mut(m)) {
                style_body(material, &node.body, selected);
            }

            for child in &node.children {
                let Some(material) = resources.material_mut(child.mesh) else { continue };
                match child.role {
                    ChildRole::Dust => style_dust(material, selected),
                    ChildRole::Rock => style_rock(material, selected),
                    ChildRole::OuterRock => style_outer_rock(material, selected),
                    ChildRole::Ring => {}
                }
            }

            if let Some(path) = &node.orbit_path {
                if let Some(material) = resources.material_mut(path.mesh) {
                    material.opacity = if selected || hovered {
                        EMPHASIZED_PATH_OPACITY
                    } else {
                        path.baseline_opacity
                    };
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::config::OrreryConfig;
    use crate::model::body::{BeltSpec, OrbitalElements, OuterBelt};

    fn bodies() -> Vec<Body> {
        vec![
            Body::new("sun", BodyKind::Star, 20.0),
            Body::new("earth", BodyKind::Planet, 5.0)
                .with_color(Rgb::from_hex(0x4682B4))
                .with_orbit(OrbitalElements::circular(1.0, 1.0)),
            Body::new("bennu", BodyKind::Asteroid, 0.5)
                .with_orbit(OrbitalElements::circular(1.126, 1.2).with_eccentricity(0.2)),
            Body::new("asteroid_belt", BodyKind::Region, 1.0)
                .with_belt(
                    BeltSpec::new(2.0, 4.7)
                        .with_particles(100)
                        .with_rocks(5)
                        .with_outer_belt(OuterBelt::new(6.2, 30.0).with_rocks(3)),
                ),
        ]
    }

    fn registry() -> SceneObjectRegistry {
        let mut registry = SceneObjectRegistry::new(&OrreryConfig::default());
        registry.rebuild(&bodies());
        registry
    }

    fn body_mat<'a>(r: &'a SceneObjectRegistry, id: &str) -> &'a Material {
        let node = r.get(id).unwrap();
        r.resources().material(node.mesh.unwrap()).unwrap()
    }

    fn path_opacity_of(r: &SceneObjectRegistry, id: &str) -> f32 {
        let path = r.get(id).unwrap().orbit_path.unwrap();
        r.resources().material(path.mesh).unwrap().opacity
    }

    #[test]
    fn baseline_after_rebuild() {
        let r = registry();
        let earth = body_mat(&r, "earth");
        assert_eq!(earth.emissive.to_hex(), 0x4682B4);
        assert_eq!(earth.emissive_intensity, PLANET_GLOW);
        assert_eq!(body_mat(&r, "bennu").emissive_intensity, 0.0);
        assert_eq!(body_mat(&r, "sun").color.to_hex(), STAR_COLOR);
        assert_eq!(path_opacity_of(&r, "earth"), PLANET_PATH_OPACITY);
        assert_eq!(path_opacity_of(&r, "bennu"), SMALL_BODY_PATH_OPACITY);
    }

    #[test]
    fn selection_glows_and_paths_brighten() {
        let mut r = registry();
        let mut hl = SelectionHighlighter::new();
        hl.set(Some(BodyId::new("earth")), Some(BodyId::new("bennu")));
        hl.apply(&mut r);

        let earth = body_mat(&r, "earth");
        assert_eq!(earth.emissive, Rgb::WHITE);
        assert_eq!(earth.emissive_intensity, SELECTED_GLOW);
        assert_eq!(path_opacity_of(&r, "earth"), 1.0);
        // Hovered: path emphasized, body untouched.
        assert_eq!(path_opacity_of(&r, "bennu"), 1.0);
        assert_eq!(body_mat(&r, "bennu").emissive_intensity, 0.0);
    }

    #[test]
    fn star_turns_white_when_selected() {
        let mut r = registry();
        let mut hl = SelectionHighlighter::new();
        hl.set(Some(BodyId::new("sun")), None);
        hl.apply(&mut r);
        assert_eq!(body_mat(&r, "sun").color, Rgb::WHITE);

        hl.set(None, None);
        hl.apply(&mut r);
        assert_eq!(body_mat(&r, "sun").color.to_hex(), STAR_COLOR);
    }

    #[test]
    fn belt_selection_styles_dust_and_rocks() {
        let mut r = registry();
        let mut hl = SelectionHighlighter::new();
        hl.set(Some(BodyId::new("asteroid_belt")), None);
        hl.apply(&mut r);

        let belt = r.get("asteroid_belt").unwrap();
        for child in &belt.children {
            let m = r.resources().material(child.mesh).unwrap();
            match child.role {
                ChildRole::Dust => {
                    assert_eq!(m.color, Rgb::WHITE);
                    assert_eq!(m.opacity, SELECTED_BELT_OPACITY);
                }
                ChildRole::Rock | ChildRole::OuterRock => {
                    assert_eq!(m.emissive, Rgb::WHITE);
                    assert_eq!(m.emissive_intensity, SELECTED_ROCK_GLOW);
                }
                ChildRole::Ring => unreachable!(),
            }
        }
    }

    #[test]
    fn outer_rocks_return_to_their_own_glow() {
        let mut r = registry();
        let mut hl = SelectionHighlighter::new();
        hl.set(Some(BodyId::new("asteroid_belt")), None);
        hl.apply(&mut r);
        hl.set(None, None);
        hl.apply(&mut r);

        let belt = r.get("asteroid_belt").unwrap();
        let outer: Vec<_> = belt.children.iter().filter(|c| c.role == ChildRole::OuterRock).collect();
        assert_eq!(outer.len(), 3);
        for child in outer {
            let m = r.resources().material(child.mesh).unwrap();
            assert_eq!(m.color.to_hex(), OUTER_ROCK_COLOR);
            assert_eq!(m.emissive.to_hex(), OUTER_ROCK_GLOW);
        }
    }

    #[test]
    fn apply_is_idempotent() {
        let mut once = registry();
        let mut twice = registry();
        let mut hl = SelectionHighlighter::new();
        hl.set(Some(BodyId::new("earth")), Some(BodyId::new("sun")));
        hl.apply(&mut once);
        hl.apply(&mut twice);
        hl.apply(&mut twice);

        for id in ["sun", "earth", "bennu"] {
            assert_eq!(body_mat(&once, id), body_mat(&twice, id));
        }
        assert_eq!(path_opacity_of(&once, "earth"), path_opacity_of(&twice, "earth"));
    }

    #[test]
    fn set_reports_changes() {
        let mut hl = SelectionHighlighter::new();
        assert!(hl.set(Some(BodyId::new("mars")), None));
        assert!(!hl.set(Some(BodyId::new("mars")), None));
        assert!(hl.set_hovered(Some(BodyId::new("venus"))));
        assert_eq!(hl.hovered().unwrap(), "venus");
    }
}
