pub mod bitmask_flags;
pub mod collision;
pub mod constants;
pub mod input;
pub mod movement;
pub mod settings;
pub mod spawn;
pub mod world;

pub use collision::{
    ClassifyStats, CollisionDataset, MeshTransform, PlanarBox, TerrainMesh, Vec2, Vec3, classify,
};
pub use input::{FrameIntent, InputButton, InputFrame, InputSnapshot, TuningDeltas, frame_intent};
pub use movement::{
    Agent, AgentState, HorizontalStep, MoveIntent, StepReport, anchor_to_floor, step_movement,
};
pub use settings::{AgentKind, MotionSettings, SettingsError};
pub use spawn::{SpawnOutcome, SpawnResolution, resolve_spawn};
pub use world::{TerrainSession, TickReport};
