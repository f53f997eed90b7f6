/*!
Collision root module.

Turns a static triangle soup into the two representations the movement controller queries
every frame, and provides the exact predicates used against them. The code is split for
clarity:

- types:        shared data types (PlanarBox, FloorTriangle, WallVolume, TerrainMesh, ...)
- classify:     normal-band classification of mesh triangles into floors and walls
- broad:        BVH candidate pruning over floors and walls
- narrow_phase: ray/triangle, rectangle overlap, height gating, push-out
- dataset:      the immutable per-snapshot dataset (floor sampling, blocked queries)
*/

pub mod broad;
pub mod classify;
pub mod dataset;
pub mod narrow_phase;
pub mod types;

// Re-export commonly used types and functions.
pub use classify::{ClassifyParams, ClassifyStats, classify};
pub use dataset::CollisionDataset;
pub use narrow_phase::{HeightGate, overlaps, overlaps_at_height, push_out};
pub use types::{
    FloorTriangle, MeshTransform, PlanarBox, TerrainMesh, Vec2, Vec3, WallVolume,
};
