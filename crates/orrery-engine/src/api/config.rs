use serde::Deserialize;

/// Engine configuration, usually supplied by the host as JSON.
/// Every field has a default, so `{}` is a valid config.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OrreryConfig {
    /// World units per astronomical unit.
    pub au_scale: f64,
    /// Simulated days per wall-clock day.
    pub time_acceleration: f64,
    /// Points per full orbit when sampling orbit paths.
    pub orbit_samples: usize,
    /// Minimum pixel distance between two accepted labels.
    pub label_spacing_px: f32,
    /// Ray-to-point distance (world units) that counts as a hit on a particle field.
    pub point_pick_threshold: f32,
    /// Overrides the particle count of every belt region when set.
    pub belt_particles: Option<u32>,
    pub camera: CameraConfig,
}

impl Default for OrreryConfig {
    fn default() -> Self {
        Self {
            au_scale: 15.0,
            time_acceleration: 0.1,
            orbit_samples: 200,
            label_spacing_px: 20.0,
            point_pick_threshold: 5.0,
            belt_particles: None,
            camera: CameraConfig::default(),
        }
    }
}

impl OrreryConfig {
    /// Parse a config from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Perspective camera and orbit-control settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CameraConfig {
    /// Vertical field of view in degrees.
    pub fov_deg: f32,
    pub near: f32,
    pub far: f32,
    /// Initial eye position in world space.
    pub position: [f32; 3],
    pub min_distance: f32,
    pub max_distance: f32,
    /// Fraction of the remaining orbit velocity applied per frame (0 = no inertia).
    pub damping: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_deg: 75.0,
            near: 0.1,
            far: 100_000.0,
            position: [0.0, 40.0, 120.0],
            min_distance: 10.0,
            max_distance: 10_000.0,
            damping: 0.05,
        }
    }
}
