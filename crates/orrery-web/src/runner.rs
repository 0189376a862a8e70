use orrery_engine::{
    default_snapshot, InputEvent, Orrery, OrreryConfig, RenderBuffer,
};

/// Runner that wires the orrery into a host animation loop.
///
/// The web crate keeps one of these in a `thread_local!` and exports free functions via
/// `#[wasm_bindgen]`. Everything here is plain Rust so it can be tested natively.
pub struct OrreryRunner {
    orrery: Orrery,
    /// Last frame's labels, serialized once per tick.
    labels_json: String,
}

impl OrreryRunner {
    /// Build from a JSON config and load the built-in solar system.
    /// An empty string means default config.
    pub fn from_config_json(config_json: &str) -> Result<Self, String> {
        let config = if config_json.trim().is_empty() {
            OrreryConfig::default()
        } else {
            OrreryConfig::from_json(config_json).map_err(|e| format!("Invalid config: {e}"))?
        };
        let mut runner = Self::new(config);
        let snapshot = default_snapshot().map_err(|e| e.to_string())?;
        runner.orrery.set_bodies(snapshot);
        runner.refresh();
        Ok(runner)
    }

    pub fn new(config: OrreryConfig) -> Self {
        Self {
            orrery: Orrery::new(config),
            labels_json: String::from("[]"),
        }
    }

    pub fn orrery(&self) -> &Orrery {
        &self.orrery
    }

    /// Replace the scene from a JSON body list. Returns the body count.
    pub fn set_bodies(&mut self, json: &str) -> Result<usize, String> {
        let count = self.orrery.set_bodies_json(json).map_err(|e| e.to_string())?;
        self.refresh();
        Ok(count)
    }

    /// One host frame of `dt` seconds.
    pub fn tick(&mut self, dt: f64) {
        self.orrery.tick(dt);
        self.refresh();
    }

    fn refresh(&mut self) {
        self.orrery.build_render_buffer();
        self.labels_json = match serde_json::to_string(self.orrery.labels()) {
            Ok(json) => json,
            Err(e) => {
                log::error!("Label serialization failed: {e}");
                String::from("[]")
            }
        };
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.orrery.resize(width, height);
        self.refresh();
    }

    pub fn push_input(&mut self, event: InputEvent) {
        self.orrery.push_input(event);
    }

    pub fn set_selection(&mut self, selected: Option<&str>, hovered: Option<&str>) {
        self.orrery.set_selection(selected, hovered);
        self.orrery.build_render_buffer();
    }

    pub fn set_speed(&mut self, acceleration: f64) {
        self.orrery.set_time_acceleration(acceleration);
    }

    pub fn toggle_pause(&mut self) -> bool {
        self.orrery.toggle_pause()
    }

    pub fn labels_json(&self) -> &str {
        &self.labels_json
    }

    /// Events since the last call, as a JSON array.
    pub fn take_events_json(&mut self) -> Result<String, String> {
        let events = self.orrery.drain_events();
        serde_json::to_string(&events).map_err(|e| e.to_string())
    }

    pub fn view_projection(&self) -> [f32; 16] {
        self.orrery.context().camera.view_projection().to_cols_array()
    }

    // ---- Pointer accessors for direct reads from wasm memory ----

    fn buffer(&self) -> &RenderBuffer {
        self.orrery.render_buffer()
    }

    pub fn instances_ptr(&self) -> *const f32 {
        self.buffer().instances_ptr()
    }

    pub fn instance_count(&self) -> u32 {
        self.buffer().instance_count()
    }

    pub fn lines_ptr(&self) -> *const f32 {
        self.buffer().lines_ptr()
    }

    pub fn line_vertex_count(&self) -> u32 {
        self.buffer().line_vertex_count()
    }

    pub fn points_ptr(&self) -> *const f32 {
        self.buffer().points_ptr()
    }

    pub fn point_count(&self) -> u32 {
        self.buffer().point_count()
    }
}
