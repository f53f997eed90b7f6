use rapier3d::parry::{
    bounding_volume::Aabb,
    partitioning::{Bvh, BvhBuildStrategy},
};

use super::{
    narrow_phase::HeightGate,
    types::{FloorTriangle, PlanarBox, Point3, WallVolume},
};

/// Acceleration structure for broad-phase queries over one collision dataset.
///
/// Notes:
/// - Floors and walls get separate BVHs; leaf `i` of each tree is element `i` of the matching
///   slice in the dataset, so no extra index map is needed.
/// - Wall leaves carry the wall's own vertical span. Height gating is folded into the query box
///   (see [`wall_query_aabb`]), so the exact gate test afterwards only confirms.
/// - The BVH is a pure pruning step. Callers must re-run the exact predicate on every candidate.
pub struct TerrainAccel {
    /// BVH over world-space AABBs of floor triangles.
    pub floor_bvh: Bvh,
    /// BVH over wall volumes (footprint x vertical span).
    pub wall_bvh: Bvh,
}

/// Build the broad-phase accelerator over freshly classified geometry.
pub fn build_terrain_accel(floors: &[FloorTriangle], walls: &[WallVolume]) -> TerrainAccel {
    let floor_aabbs: Vec<Aabb> = floors.iter().map(floor_aabb).collect();
    let wall_aabbs: Vec<Aabb> = walls.iter().map(wall_aabb).collect();

    TerrainAccel {
        floor_bvh: Bvh::from_leaves(BvhBuildStrategy::Binned, &floor_aabbs),
        wall_bvh: Bvh::from_leaves(BvhBuildStrategy::Binned, &wall_aabbs),
    }
}

/// World AABB of a floor triangle.
fn floor_aabb(tri: &FloorTriangle) -> Aabb {
    let min = tri.a.inf(&tri.b).inf(&tri.c);
    let max = tri.a.sup(&tri.b).sup(&tri.c);
    Aabb::new(Point3::from(min), Point3::from(max))
}

/// World AABB of a wall volume.
fn wall_aabb(wall: &WallVolume) -> Aabb {
    let min = wall.footprint.min();
    let max = wall.footprint.max();
    Aabb::new(
        Point3::new(min.x, wall.min_y, min.y),
        Point3::new(max.x, wall.max_y, max.y),
    )
}

/// Query box for a vertical probe at column (x, z) starting at `top_y` and going down forever.
pub fn column_query_aabb(x: f32, z: f32, top_y: f32) -> Aabb {
    Aabb::new(Point3::new(x, f32::MIN, z), Point3::new(x, top_y, z))
}

/// Query box for walls that could block `footprint` at `foot_y`.
///
/// The gate admits a wall iff `min_y - pad_down <= foot_y <= max_y + pad_up`, which is the same
/// as the wall's span `[min_y, max_y]` touching `[foot_y - pad_up, foot_y + pad_down]`.
pub fn wall_query_aabb(footprint: &PlanarBox, foot_y: f32, gate: HeightGate) -> Aabb {
    let min = footprint.min();
    let max = footprint.max();
    Aabb::new(
        Point3::new(min.x, foot_y - gate.pad_up, min.y),
        Point3::new(max.x, foot_y + gate.pad_down, max.y),
    )
}

/// Floor triangle indices whose AABB contains the probe column.
pub fn column_candidates(accel: &TerrainAccel, x: f32, z: f32, top_y: f32) -> Vec<usize> {
    let query = column_query_aabb(x, z, top_y);
    let mut out: Vec<usize> = accel
        .floor_bvh
        .intersect_aabb(&query)
        .map(|leaf| leaf as usize)
        .collect();
    out.sort_unstable();
    out
}

/// Wall indices whose volume may gate and overlap `footprint` at `foot_y`, ascending.
///
/// Candidates are sorted so callers see walls in dataset order.
pub fn wall_candidates(
    accel: &TerrainAccel,
    footprint: &PlanarBox,
    foot_y: f32,
    gate: HeightGate,
) -> Vec<usize> {
    let query = wall_query_aabb(footprint, foot_y, gate);
    let mut out: Vec<usize> = accel
        .wall_bvh
        .intersect_aabb(&query)
        .map(|leaf| leaf as usize)
        .collect();
    out.sort_unstable();
    out
}
