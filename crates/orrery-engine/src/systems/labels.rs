use std::cmp::Ordering;
use glam::Vec3;
use serde::Serialize;
use crate::api::types::BodyId;
use crate::core::registry::SceneObjectRegistry;
use crate::model::body::{BodyKind, Rgb};
use crate::renderer::context::RenderContext;

/// One label for the host UI to place this frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelAnchor {
    pub id: BodyId,
    pub name: String,
    pub kind: BodyKind,
    pub color: Rgb,
    pub screen_x: f32,
    pub screen_y: f32,
    /// `true` for every anchor the projector returns.
    pub visible: bool,
}

/// World-space input to the projector.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelCandidate {
    pub id: BodyId,
    pub name: String,
    pub kind: BodyKind,
    pub color: Rgb,
    pub world: Vec3,
}

impl LabelCandidate {
    /// Candidates for every labelled body in the registry. Regions have no label.
    pub fn from_registry(registry: &SceneObjectRegistry) -> Vec<LabelCandidate> {
        registry
            .iter()
            .filter(|node| node.kind() != BodyKind::Region)
            .map(|node| LabelCandidate {
                id: node.id().clone(),
                name: node.body.display_name().to_owned(),
                kind: node.kind(),
                // Small bodies are too dark to read in their own color.
                color: if node.kind().is_small_body() { Rgb::WHITE } else { node.body.color },
                world: node.label_anchor(),
            })
            .collect()
    }
}

/// Projects label anchors to screen space and declutters them.
///
/// Declutter is greedy and quadratic in the number of on-screen labels, which is
/// fine for the few dozen bodies a scene holds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelProjector {
    /// Minimum pixel distance between two visible labels.
    pub spacing: f32,
}

impl LabelProjector {
    pub fn new(spacing: f32) -> Self {
        Self { spacing }
    }

    /// Accepted anchors in priority order. Anchors behind the camera, and anchors within
    /// `spacing` of a higher-priority one, are left out.
    pub fn project(&self, candidates: &[LabelCandidate], ctx: &RenderContext) -> Vec<LabelAnchor> {
        let eye = ctx.camera.position();

        let mut projected: Vec<(LabelAnchor, f32)> = candidates
            .iter()
            .filter_map(|c| {
                let (screen, depth) = ctx.project_to_screen(c.world);
                if depth > 1.0 || !depth.is_finite() || !screen.is_finite() {
                    return None;
                }
                let anchor = LabelAnchor {
                    id: c.id.clone(),
                    name: c.name.clone(),
                    kind: c.kind,
                    color: c.color,
                    screen_x: screen.x,
                    screen_y: screen.y,
                    visible: false,
                };
                Some((anchor, c.world.distance(eye)))
            })
            .collect();

        projected.sort_by(|(a, da), (b, db)| priority(a.kind, b.kind).then(da.total_cmp(db)));

        let mut accepted: Vec<(f32, f32)> = Vec::with_capacity(projected.len());
        projected
            .into_iter()
            .filter_map(|(mut anchor, _)| {
                let clear = accepted.iter().all(|&(x, y)| {
                    let dx = anchor.screen_x - x;
                    let dy = anchor.screen_y - y;
                    (dx * dx + dy * dy).sqrt() >= self.spacing
                });
                if !clear {
                    return None;
                }
                accepted.push((anchor.screen_x, anchor.screen_y));
                anchor.visible = true;
                Some(anchor)
            })
            .collect()
    }

    /// Convenience: candidates straight from the registry.
    pub fn project_registry(&self, registry: &SceneObjectRegistry, ctx: &RenderContext) -> Vec<LabelAnchor> {
        self.project(&LabelCandidate::from_registry(registry), ctx)
    }
}

impl Default for LabelProjector {
    fn default() -> Self {
        Self::new(20.0)
    }
}

/// Planets sort ahead of everything else.
fn priority(a: BodyKind, b: BodyKind) -> Ordering {
    let rank = |k: BodyKind| if k == BodyKind::Planet { 0 } else { 1 };
    rank(a).cmp(&rank(b))
}
