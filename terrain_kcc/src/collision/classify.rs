use super::{
    dataset::CollisionDataset,
    types::{FloorTriangle, MeshTransform, PlanarBox, TerrainMesh, Vec2, Vec3, WallVolume},
};

/// Normal-band thresholds and wall footprint margin used by [`classify`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClassifyParams {
    /// `normal.y >= floor_min_ny` -> floor.
    pub floor_min_ny: f32,
    /// `|normal.y| <= wall_max_ny` -> wall.
    pub wall_max_ny: f32,
    /// Horizontal expansion of each wall footprint, per side.
    pub wall_margin: f32,
}

/// Per-build counters, logged after every rebuild.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ClassifyStats {
    pub floors: usize,
    pub walls: usize,
    /// Intermediate slopes and degenerate (zero-area) triangles.
    pub dropped: usize,
    /// Triangles referencing a vertex that does not exist.
    pub invalid: usize,
}

/// What a single triangle turned into.
#[derive(Clone, Copy, Debug)]
pub enum TriangleClass {
    Floor(FloorTriangle),
    Wall(WallVolume),
    Dropped,
}

/// Classify one world-space triangle.
///
/// Normal bands are checked floor first, so a triangle is never both floor and wall.
pub fn classify_triangle(a: Vec3, b: Vec3, c: Vec3, params: &ClassifyParams) -> TriangleClass {
    let Some(normal) = (b - a).cross(&(c - a)).try_normalize(f32::EPSILON) else {
        return TriangleClass::Dropped;
    };

    if normal.y >= params.floor_min_ny {
        return TriangleClass::Floor(FloorTriangle { a, b, c, normal });
    }

    if normal.y.abs() <= params.wall_max_ny {
        let lo = a.inf(&b).inf(&c);
        let hi = a.sup(&b).sup(&c);
        let margin = Vec2::repeat(params.wall_margin.max(0.0));
        let footprint =
            PlanarBox::from_corners(Vec2::new(lo.x, lo.z) - margin, Vec2::new(hi.x, hi.z) + margin);
        return TriangleClass::Wall(WallVolume {
            footprint,
            min_y: lo.y,
            max_y: hi.y,
        });
    }

    TriangleClass::Dropped
}

/// Build a fresh collision dataset from a terrain model.
///
/// - Every triangle of every mesh is transformed to world space and classified.
/// - Floors are stored verbatim, walls become one margin-expanded volume each (no merging).
/// - Intermediate slopes are dropped: they neither support nor block.
/// - Empty or degenerate input yields an empty dataset whose floor queries fall back to the
///   transform's baseline height.
pub fn classify(
    meshes: &[TerrainMesh],
    transform: &MeshTransform,
    params: &ClassifyParams,
) -> CollisionDataset {
    let mut floors = Vec::new();
    let mut walls = Vec::new();
    let mut stats = ClassifyStats::default();

    for (mesh_idx, mesh) in meshes.iter().enumerate() {
        let mut invalid = 0;
        for &tri in &mesh.triangles {
            let Some([a, b, c]) = mesh.triangle_positions(tri) else {
                invalid += 1;
                continue;
            };
            let [a, b, c] = [a, b, c].map(|p| transform.transform_point(&p));

            match classify_triangle(a, b, c, params) {
                TriangleClass::Floor(f) => floors.push(f),
                TriangleClass::Wall(w) => walls.push(w),
                TriangleClass::Dropped => stats.dropped += 1,
            }
        }

        if invalid > 0 {
            log::warn!(
                "terrain mesh {} references missing vertices, {} triangles skipped",
                mesh_idx,
                invalid
            );
            stats.invalid += invalid;
        }
    }

    stats.floors = floors.len();
    stats.walls = walls.len();
    log::info!(
        "terrain collision built: floors={} walls={} dropped={} invalid={}",
        stats.floors,
        stats.walls,
        stats.dropped,
        stats.invalid
    );

    CollisionDataset::from_parts(floors, walls, transform.baseline_y(), stats)
}
