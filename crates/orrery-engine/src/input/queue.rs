/// Pointer and wheel input, in viewport pixels (origin top-left).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// A touch/click began.
    PointerDown { x: f32, y: f32 },
    /// A touch/click ended. A release close to its press is a click.
    PointerUp { x: f32, y: f32 },
    /// The cursor moved: drags orbit the camera, plain moves update hover.
    PointerMove { x: f32, y: f32 },
    /// The cursor left the canvas.
    PointerLeave,
    /// Wheel scroll; positive zooms out.
    Wheel { delta: f32 },
}

/// A queue of input events.
/// JS writes events into the queue; Rust drains them at the start of each tick.
pub struct InputQueue {
    events: Vec<InputEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self {
            events: Vec::with_capacity(32),
        }
    }

    /// Push a new input event (called from JS via wasm-bindgen).
    pub fn push(&mut self, event: InputEvent) {
        self.events.push(event);
    }

    /// Drain all pending events. Returns a Vec and clears the queue.
    pub fn drain(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl Default for InputQueue {
    fn default() -> Self {
        Self::new()
    }
}
