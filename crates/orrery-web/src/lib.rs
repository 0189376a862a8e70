pub mod runner;

pub use runner::OrreryRunner;

use std::cell::RefCell;
use orrery_engine::InputEvent;
use wasm_bindgen::prelude::*;

thread_local! {
    static RUNNER: RefCell<Option<OrreryRunner>> = RefCell::new(None);
}

/// Run `f` against the live runner. Calls made before `orrery_init` are logged and
/// answered with `fallback`.
fn with_runner<R>(fallback: R, f: impl FnOnce(&mut OrreryRunner) -> R) -> R {
    RUNNER.with(|cell| match cell.borrow_mut().as_mut() {
        Some(runner) => f(runner),
        None => {
            log::error!("Orrery not initialized. Call orrery_init() first.");
            fallback
        }
    })
}

fn js_error(message: String) -> JsValue {
    log::error!("{message}");
    JsValue::from_str(&message)
}

#[wasm_bindgen]
pub fn orrery_init(config_json: &str) -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    let runner = OrreryRunner::from_config_json(config_json).map_err(js_error)?;
    let bodies = runner.orrery().registry().len();
    RUNNER.with(|cell| {
        *cell.borrow_mut() = Some(runner);
    });
    log::info!("orrery: initialized with {bodies} bodies");
    Ok(())
}

/// Replace the scene. Returns the new body count.
#[wasm_bindgen]
pub fn orrery_set_bodies(json: &str) -> Result<u32, JsValue> {
    with_runner(Err(JsValue::from_str("not initialized")), |r| {
        r.set_bodies(json).map(|n| n as u32).map_err(js_error)
    })
}

#[wasm_bindgen]
pub fn orrery_tick(dt: f64) {
    with_runner((), |r| r.tick(dt));
}

#[wasm_bindgen]
pub fn orrery_resize(width: f32, height: f32) {
    with_runner((), |r| r.resize(width, height));
}

#[wasm_bindgen]
pub fn orrery_pointer_down(x: f32, y: f32) {
    with_runner((), |r| r.push_input(InputEvent::PointerDown { x, y }));
}

#[wasm_bindgen]
pub fn orrery_pointer_move(x: f32, y: f32) {
    with_runner((), |r| r.push_input(InputEvent::PointerMove { x, y }));
}

#[wasm_bindgen]
pub fn orrery_pointer_up(x: f32, y: f32) {
    with_runner((), |r| r.push_input(InputEvent::PointerUp { x, y }));
}

#[wasm_bindgen]
pub fn orrery_pointer_leave() {
    with_runner((), |r| r.push_input(InputEvent::PointerLeave));
}

#[wasm_bindgen]
pub fn orrery_wheel(delta: f32) {
    with_runner((), |r| r.push_input(InputEvent::Wheel { delta }));
}

#[wasm_bindgen]
pub fn orrery_set_selection(selected: Option<String>, hovered: Option<String>) {
    with_runner((), |r| r.set_selection(selected.as_deref(), hovered.as_deref()));
}

#[wasm_bindgen]
pub fn orrery_set_speed(acceleration: f64) {
    with_runner((), |r| r.set_speed(acceleration));
}

/// Returns `true` when the clock is now paused.
#[wasm_bindgen]
pub fn orrery_toggle_pause() -> bool {
    with_runner(false, |r| r.toggle_pause())
}

#[wasm_bindgen]
pub fn orrery_labels_json() -> String {
    with_runner(String::from("[]"), |r| r.labels_json().to_owned())
}

#[wasm_bindgen]
pub fn orrery_events_json() -> Result<String, JsValue> {
    with_runner(Ok(String::from("[]")), |r| r.take_events_json().map_err(js_error))
}

#[wasm_bindgen]
pub fn orrery_view_projection() -> js_sys::Float32Array {
    let matrix = with_runner([0.0; 16], |r| r.view_projection());
    js_sys::Float32Array::from(&matrix[..])
}

// ---- Data accessors ----

#[wasm_bindgen]
pub fn get_instances_ptr() -> *const f32 {
    with_runner(std::ptr::null(), |r| r.instances_ptr())
}

#[wasm_bindgen]
pub fn get_instance_count() -> u32 {
    with_runner(0, |r| r.instance_count())
}

#[wasm_bindgen]
pub fn get_orbit_lines_ptr() -> *const f32 {
    with_runner(std::ptr::null(), |r| r.lines_ptr())
}

#[wasm_bindgen]
pub fn get_orbit_line_vertex_count() -> u32 {
    with_runner(0, |r| r.line_vertex_count())
}

#[wasm_bindgen]
pub fn get_points_ptr() -> *const f32 {
    with_runner(std::ptr::null(), |r| r.points_ptr())
}

#[wasm_bindgen]
pub fn get_point_count() -> u32 {
    with_runner(0, |r| r.point_count())
}
