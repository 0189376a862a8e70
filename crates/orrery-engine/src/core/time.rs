/// Seconds per day, for converting wall-clock frame time into days.
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Simulated-time accumulator.
/// Turns variable host frame deltas into simulated days, scaled by a time-acceleration factor.
#[derive(Debug, Clone)]
pub struct SimulationClock {
    /// Simulated days since the snapshot epoch.
    days: f64,
    /// Simulated days per wall-clock day.
    acceleration: f64,
    paused: bool,
}

impl SimulationClock {
    pub fn new(acceleration: f64) -> Self {
        Self {
            days: 0.0,
            acceleration,
            paused: false,
        }
    }

    /// Add one frame of wall-clock time. Returns the new simulated day count.
    /// Negative or non-finite deltas (tab restore glitches) are ignored.
    pub fn advance(&mut self, frame_dt_seconds: f64) -> f64 {
        if !self.paused && frame_dt_seconds.is_finite() && frame_dt_seconds > 0.0 {
            self.days += frame_dt_seconds / SECONDS_PER_DAY * self.acceleration;
        }
        self.days
    }

    /// Simulated days since epoch.
    pub fn days(&self) -> f64 {
        self.days
    }

    /// Jump to an absolute simulated time.
    pub fn set_days(&mut self, days: f64) {
        if days.is_finite() {
            self.days = days;
        }
    }

    pub fn acceleration(&self) -> f64 {
        self.acceleration
    }

    /// Change the time-acceleration factor (may be negative to run backwards).
    pub fn set_acceleration(&mut self, acceleration: f64) {
        if acceleration.is_finite() {
            self.acceleration = acceleration;
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }
}

impl Default for SimulationClock {
    fn default() -> Self {
        Self::new(1.0)
    }
}
