use std::f32::consts::TAU;
use glam::Vec2;

use crate::api::config::OrreryConfig;
use crate::api::types::{BodyId, OrreryEvent};
use crate::core::registry::{SceneObjectRegistry, SyncStats};
use crate::core::time::SimulationClock;
use crate::input::queue::{InputEvent, InputQueue};
use crate::model::body::AuxiliaryRecord;
use crate::model::snapshot::{Snapshot, SnapshotError};
use crate::renderer::context::RenderContext;
use crate::renderer::instance::RenderBuffer;
use crate::systems::highlight::SelectionHighlighter;
use crate::systems::labels::{LabelAnchor, LabelProjector};
use crate::systems::render::build_render_buffer;

/// Pointer travel (pixels) below which a press-release counts as a click.
pub const CLICK_SLOP_PX: f32 = 5.0;
/// Distance multiplier per wheel notch.
pub const WHEEL_ZOOM_STEP: f32 = 0.95;

const DEFAULT_VIEWPORT: (f32, f32) = (800.0, 600.0);

#[derive(Debug, Clone, Copy)]
struct Drag {
    start: Vec2,
    last: Vec2,
    moved: bool,
}

/// The engine: owns the clock, scene, camera and per-frame outputs.
///
/// One `tick` per host animation frame. Within a tick positions advance first, then
/// queued input is handled against those positions, then labels are projected, so
/// picks and labels always agree with what is drawn.
pub struct Orrery {
    config: OrreryConfig,
    clock: SimulationClock,
    registry: SceneObjectRegistry,
    context: RenderContext,
    projector: LabelProjector,
    highlighter: SelectionHighlighter,
    input: InputQueue,
    render_buffer: RenderBuffer,
    snapshot: Snapshot,
    labels: Vec<LabelAnchor>,
    events: Vec<OrreryEvent>,
    drag: Option<Drag>,
}

impl Orrery {
    pub fn new(config: OrreryConfig) -> Self {
        let (width, height) = DEFAULT_VIEWPORT;
        Self {
            clock: SimulationClock::new(config.time_acceleration),
            registry: SceneObjectRegistry::new(&config),
            context: RenderContext::new(&config.camera, width, height),
            projector: LabelProjector::new(config.label_spacing_px),
            highlighter: SelectionHighlighter::new(),
            input: InputQueue::new(),
            render_buffer: RenderBuffer::new(),
            snapshot: Snapshot::default(),
            labels: Vec::new(),
            events: Vec::new(),
            drag: None,
            config,
        }
    }

    pub fn config(&self) -> &OrreryConfig {
        &self.config
    }

    // -- Data --

    /// Replace the scene with a validated snapshot. Full teardown and rebuild.
    pub fn set_bodies(&mut self, snapshot: Snapshot) {
        self.registry.rebuild(snapshot.bodies());
        self.snapshot = snapshot;
        self.after_scene_change();
        self.events.push(OrreryEvent::Rebuilt { bodies: self.registry.len() });
    }

    /// Parse, validate and apply a JSON snapshot. On error the current scene is kept.
    pub fn set_bodies_json(&mut self, json: &str) -> Result<usize, SnapshotError> {
        match Snapshot::from_json(json) {
            Ok(snapshot) => {
                self.set_bodies(snapshot);
                Ok(self.registry.len())
            }
            Err(e) => {
                log::warn!("Rejected snapshot: {e}");
                Err(e)
            }
        }
    }

    /// Apply a snapshot incrementally, keeping nodes whose bodies did not change.
    pub fn update_bodies(&mut self, snapshot: Snapshot) -> SyncStats {
        let stats = self.registry.sync(snapshot.bodies());
        self.snapshot = snapshot;
        self.after_scene_change();
        stats
    }

    /// Attach generated records to a body. Returns how many were new.
    pub fn attach_auxiliary(
        &mut self,
        id: &str,
        records: impl IntoIterator<Item = AuxiliaryRecord>,
    ) -> Option<usize> {
        let added = self.snapshot.merge_auxiliary(id, records)?;
        if added > 0 {
            self.registry.sync(self.snapshot.bodies());
            self.after_scene_change();
        }
        Some(added)
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    fn after_scene_change(&mut self) {
        // Selection of a body that no longer exists is dropped.
        let keep = |id: Option<&BodyId>| id.filter(|id| self.snapshot.get(id.as_str()).is_some()).cloned();
        let selected = keep(self.highlighter.selected());
        let hovered = keep(self.highlighter.hovered());
        self.highlighter.set(selected, hovered);
        self.highlighter.apply(&mut self.registry);
        self.refresh_labels();
    }

    // -- Frame loop --

    /// Advance one host frame of `dt_seconds` wall-clock time.
    pub fn tick(&mut self, dt_seconds: f64) {
        let days = self.clock.advance(dt_seconds);
        self.registry.tick(days);
        for event in self.input.drain() {
            self.handle_input(event);
        }
        self.context.camera.update();
        self.refresh_labels();
    }

    fn refresh_labels(&mut self) {
        self.labels = self.projector.project_registry(&self.registry, &self.context);
    }

    /// Labels as of the last tick, in priority order.
    pub fn labels(&self) -> &[LabelAnchor] {
        &self.labels
    }

    /// Fill and return the render buffer for the current frame.
    pub fn build_render_buffer(&mut self) -> &RenderBuffer {
        build_render_buffer(&self.registry, &mut self.render_buffer);
        &self.render_buffer
    }

    pub fn render_buffer(&self) -> &RenderBuffer {
        &self.render_buffer
    }

    /// Take every event emitted since the last call.
    pub fn drain_events(&mut self) -> Vec<OrreryEvent> {
        std::mem::take(&mut self.events)
    }

    // -- Clock --

    pub fn days(&self) -> f64 {
        self.clock.days()
    }

    pub fn set_days(&mut self, days: f64) {
        self.clock.set_days(days);
        self.registry.tick(self.clock.days());
        self.refresh_labels();
    }

    pub fn set_time_acceleration(&mut self, acceleration: f64) {
        self.clock.set_acceleration(acceleration);
    }

    pub fn toggle_pause(&mut self) -> bool {
        self.clock.toggle_pause();
        self.clock.is_paused()
    }

    pub fn clock(&self) -> &SimulationClock {
        &self.clock
    }

    // -- View --

    pub fn resize(&mut self, width: f32, height: f32) {
        self.context.resize(width, height);
        self.refresh_labels();
    }

    pub fn context(&self) -> &RenderContext {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut RenderContext {
        &mut self.context
    }

    pub fn registry(&self) -> &SceneObjectRegistry {
        &self.registry
    }

    // -- Picking & selection --

    /// Body under a pixel, or `None` for empty space.
    pub fn body_at(&self, x: f32, y: f32) -> Option<BodyId> {
        let ray = self.context.ray_from_screen(x, y)?;
        self.registry.pick(&ray)
    }

    /// Resolve a click. Emits `Picked`; the host decides whether to select.
    pub fn pick_at(&mut self, x: f32, y: f32) -> Option<BodyId> {
        let id = self.body_at(x, y);
        self.events.push(OrreryEvent::Picked { id: id.clone() });
        id
    }

    /// Update hover from a pointer position. Emits `Hovered` only on change.
    pub fn hover_at(&mut self, x: f32, y: f32) -> Option<BodyId> {
        let id = self.body_at(x, y);
        self.set_hovered(id.clone());
        id
    }

    fn set_hovered(&mut self, id: Option<BodyId>) {
        if self.highlighter.set_hovered(id.clone()) {
            self.highlighter.apply(&mut self.registry);
            self.events.push(OrreryEvent::Hovered { id });
        }
    }

    /// Selection and hover as decided by the UI.
    pub fn set_selection(&mut self, selected: Option<&str>, hovered: Option<&str>) {
        if self.highlighter.set(selected.map(BodyId::from), hovered.map(BodyId::from)) {
            self.highlighter.apply(&mut self.registry);
        }
    }

    pub fn selected(&self) -> Option<&BodyId> {
        self.highlighter.selected()
    }

    pub fn hovered(&self) -> Option<&BodyId> {
        self.highlighter.hovered()
    }

    // -- Input --

    /// Queue pointer input; handled at the start of the next tick.
    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    fn handle_input(&mut self, event: InputEvent) {
        match event {
            InputEvent::PointerDown { x, y } => {
                let at = Vec2::new(x, y);
                self.drag = Some(Drag { start: at, last: at, moved: false });
            }
            InputEvent::PointerMove { x, y } => {
                let at = Vec2::new(x, y);
                match self.drag.as_mut() {
                    Some(drag) => {
                        let delta = at - drag.last;
                        drag.last = at;
                        if at.distance(drag.start) > CLICK_SLOP_PX {
                            drag.moved = true;
                        }
                        let height = self.context.viewport.height;
                        self.context
                            .camera
                            .rotate(-TAU * delta.x / height, TAU * delta.y / height);
                    }
                    None => {
                        self.hover_at(x, y);
                    }
                }
            }
            InputEvent::PointerUp { x, y } => {
                if let Some(drag) = self.drag.take() {
                    if !drag.moved {
                        self.pick_at(x, y);
                    }
                }
            }
            InputEvent::PointerLeave => {
                self.drag = None;
                self.set_hovered(None);
            }
            InputEvent::Wheel { delta } => {
                if delta > 0.0 {
                    self.context.camera.zoom(1.0 / WHEEL_ZOOM_STEP);
                } else if delta < 0.0 {
                    self.context.camera.zoom(WHEEL_ZOOM_STEP);
                }
            }
        }
    }
}

impl Default for Orrery {
    fn default() -> Self {
        Self::new(OrreryConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::body::{Body, BodyKind, OrbitalElements};

    fn earth_system() -> Snapshot {
        Snapshot::new(vec![
            Body::new("sun", BodyKind::Star, 10.0).with_name("Sun"),
            Body::new("earth", BodyKind::Planet, 5.0)
                .with_name("Earth")
                .with_orbit(OrbitalElements::circular(1.0, 1.0).with_eccentricity(0.017)),
        ])
        .unwrap()
    }

    fn orrery() -> Orrery {
        let mut orrery = Orrery::default();
        orrery.set_bodies(earth_system());
        orrery.tick(0.0);
        orrery
    }

    fn screen_of(orrery: &Orrery, id: &str) -> Vec2 {
        let node = orrery.registry().get(id).unwrap();
        orrery.context().project_to_screen(node.position).0
    }

    #[test]
    fn click_on_earth_emits_pick() {
        let mut orrery = orrery();
        orrery.drain_events();
        let at = screen_of(&orrery, "earth");

        orrery.push_input(InputEvent::PointerDown { x: at.x, y: at.y });
        orrery.push_input(InputEvent::PointerUp { x: at.x, y: at.y });
        orrery.tick(0.0);

        let events = orrery.drain_events();
        assert_eq!(events, [OrreryEvent::Picked { id: Some(BodyId::new("earth")) }]);
    }

    #[test]
    fn click_hits_where_the_body_is_after_this_tick() {
        let mut orrery = orrery();
        orrery.drain_events();
        orrery.set_time_acceleration(1.0);
        let half_year = 182.625;

        // Screen position of earth half a year on, computed on a scratch copy.
        let mut ahead = Orrery::default();
        ahead.set_bodies(earth_system());
        ahead.set_days(half_year);
        let at = screen_of(&ahead, "earth");
        assert!(at.distance(screen_of(&orrery, "earth")) > 50.0);

        orrery.push_input(InputEvent::PointerDown { x: at.x, y: at.y });
        orrery.push_input(InputEvent::PointerUp { x: at.x, y: at.y });
        orrery.tick(half_year * 86_400.0);

        assert_eq!(
            orrery.drain_events(),
            [OrreryEvent::Picked { id: Some(BodyId::new("earth")) }]
        );
    }

    #[test]
    fn click_on_empty_space_picks_nothing() {
        let mut orrery = orrery();
        assert_eq!(orrery.pick_at(5.0, 5.0), None);
        assert_eq!(orrery.drain_events().last(), Some(&OrreryEvent::Picked { id: None }));
    }

    #[test]
    fn drag_orbits_instead_of_picking() {
        let mut orrery = orrery();
        orrery.drain_events();
        let before = orrery.context().camera.position();

        orrery.push_input(InputEvent::PointerDown { x: 400.0, y: 300.0 });
        orrery.push_input(InputEvent::PointerMove { x: 460.0, y: 300.0 });
        orrery.push_input(InputEvent::PointerUp { x: 460.0, y: 300.0 });
        orrery.tick(0.0);

        assert!(orrery.drain_events().is_empty());
        assert!(orrery.context().camera.position().distance(before) > 0.0);
    }

    #[test]
    fn hover_emits_once_per_change() {
        let mut orrery = orrery();
        orrery.drain_events();
        let sun = screen_of(&orrery, "sun");

        orrery.push_input(InputEvent::PointerMove { x: sun.x, y: sun.y });
        orrery.push_input(InputEvent::PointerMove { x: sun.x + 1.0, y: sun.y });
        orrery.tick(0.0);
        assert_eq!(orrery.drain_events(), [OrreryEvent::Hovered { id: Some(BodyId::new("sun")) }]);
        assert_eq!(orrery.hovered().unwrap(), "sun");

        orrery.push_input(InputEvent::PointerLeave);
        orrery.tick(0.0);
        assert_eq!(orrery.drain_events(), [OrreryEvent::Hovered { id: None }]);
    }

    #[test]
    fn ticking_moves_earth_and_labels() {
        let mut orrery = orrery();
        let start = orrery.registry().get("earth").unwrap().position;
        orrery.set_time_acceleration(1.0);
        // Half a year of wall-clock time at unit acceleration.
        orrery.tick(182.625 * 86_400.0);

        let later = orrery.registry().get("earth").unwrap().position;
        assert!((orrery.days() - 182.625).abs() < 1e-9);
        assert!(start.distance(later) > 25.0);
        assert!(orrery.labels().iter().any(|l| l.id == "earth" && l.name == "Earth"));
    }

    #[test]
    fn paused_clock_freezes_scene() {
        let mut orrery = orrery();
        assert!(orrery.toggle_pause());
        let start = orrery.registry().get("earth").unwrap().position;
        orrery.tick(86_400.0 * 100.0);
        assert_eq!(orrery.registry().get("earth").unwrap().position, start);
    }

    #[test]
    fn selection_survives_tick_and_drops_on_removal() {
        let mut orrery = orrery();
        orrery.set_selection(Some("earth"), None);
        orrery.tick(1.0);
        assert_eq!(orrery.selected().unwrap(), "earth");

        let only_sun = Snapshot::new(vec![Body::new("sun", BodyKind::Star, 10.0)]).unwrap();
        orrery.update_bodies(only_sun);
        assert!(orrery.selected().is_none());
    }

    #[test]
    fn bad_json_keeps_current_scene() {
        let mut orrery = orrery();
        let err = orrery.set_bodies_json(r#"[{"id":"x","kind":"planet","radius":1}]"#);
        assert!(matches!(err, Err(SnapshotError::MissingOrbit(_))));
        assert_eq!(orrery.registry().len(), 2);
    }

    #[test]
    fn auxiliary_records_attach_to_body() {
        let mut orrery = orrery();
        let added = orrery.attach_auxiliary("earth", vec![AuxiliaryRecord::new("m1"), AuxiliaryRecord::new("m2")]);
        assert_eq!(added, Some(2));
        assert_eq!(orrery.registry().get("earth").unwrap().body.auxiliary.len(), 2);
        assert_eq!(orrery.attach_auxiliary("earth", vec![AuxiliaryRecord::new("m1")]), Some(0));
    }

    #[test]
    fn wheel_zooms_camera() {
        let mut orrery = orrery();
        let before = orrery.context().camera.distance();
        orrery.push_input(InputEvent::Wheel { delta: -100.0 });
        orrery.tick(0.0);
        assert!(orrery.context().camera.distance() < before);
    }
}
