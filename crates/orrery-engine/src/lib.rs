pub mod api;
pub mod core;
pub mod components;
pub mod model;
pub mod orbit;
pub mod systems;
pub mod renderer;
pub mod input;

// Re-export key types at crate root for convenience
pub use api::config::{CameraConfig, OrreryConfig};
pub use api::orrery::{Orrery, CLICK_SLOP_PX, WHEEL_ZOOM_STEP};
pub use api::types::{BodyId, NodeId, OrreryEvent};
pub use components::mesh::{Geometry, Material};
pub use components::node::{ChildRole, SceneNode};
pub use core::graph::{LocalTransform, NodeGraph, WorldTransform};
pub use core::registry::{SceneObjectRegistry, SyncStats};
pub use core::resources::{Handle, MeshHandle, Pool, Resources};
pub use core::time::SimulationClock;
pub use input::queue::{InputEvent, InputQueue};
pub use model::body::{AuxiliaryRecord, BeltSpec, Body, BodyKind, OrbitalElements, OuterBelt, Rgb, Rings};
pub use model::catalog::{default_bodies, default_snapshot};
pub use model::snapshot::{Snapshot, SnapshotError};
pub use orbit::{position_at, sample_orbit_path, solve_kepler, state_at, OrbitState, PathExtent};
pub use renderer::camera::OrbitCamera;
pub use renderer::context::{RenderContext, Viewport};
pub use renderer::instance::{ColorVertex, RenderBuffer, RenderInstance};
pub use systems::highlight::SelectionHighlighter;
pub use systems::labels::{LabelAnchor, LabelCandidate, LabelProjector};
pub use systems::pick::{PickIndex, Ray};
