/*!
The collision dataset: everything derived from one terrain snapshot.

A dataset is built in one go by [`super::classify::classify`] and never mutated afterwards.
When the terrain transform changes, the owner builds a new dataset and replaces the old value
wholesale, so a frame in progress sees either the old geometry or the new one, never a mix.

Queries
- [`CollisionDataset::sample_floor_y`]: topmost floor under a column, or the baseline.
- [`CollisionDataset::is_blocked`]: any height-gated wall overlapping a footprint.
- [`CollisionDataset::blocking_walls`]: the same walls, by index, for push-out resolution.
*/

use super::{
    broad::{self, TerrainAccel},
    classify::ClassifyStats,
    narrow_phase::{self, HeightGate},
    types::{FloorTriangle, PlanarBox, Vec3, WallVolume},
};

pub struct CollisionDataset {
    floors: Vec<FloorTriangle>,
    walls: Vec<WallVolume>,
    accel: TerrainAccel,
    baseline_y: f32,
    stats: ClassifyStats,
}

impl CollisionDataset {
    pub(crate) fn from_parts(
        floors: Vec<FloorTriangle>,
        walls: Vec<WallVolume>,
        baseline_y: f32,
        stats: ClassifyStats,
    ) -> Self {
        let accel = broad::build_terrain_accel(&floors, &walls);
        Self {
            floors,
            walls,
            accel,
            baseline_y,
            stats,
        }
    }

    #[inline]
    pub fn floors(&self) -> &[FloorTriangle] {
        &self.floors
    }

    #[inline]
    pub fn walls(&self) -> &[WallVolume] {
        &self.walls
    }

    /// Elevation reported when no floor is found under a column.
    #[inline]
    pub fn baseline_y(&self) -> f32 {
        self.baseline_y
    }

    #[inline]
    pub fn stats(&self) -> ClassifyStats {
        self.stats
    }

    /// Elevation of the topmost floor under (x, z).
    ///
    /// Casts a ray from `(x, ray_origin_y, z)` straight down and keeps the nearest positive hit.
    /// Floors above `ray_origin_y` are never seen. Returns the baseline when nothing is hit.
    pub fn sample_floor_y(&self, x: f32, z: f32, ray_origin_y: f32) -> f32 {
        let origin = Vec3::new(x, ray_origin_y, z);
        let dir = Vec3::new(0.0, -1.0, 0.0);

        let best = broad::column_candidates(&self.accel, x, z, ray_origin_y)
            .into_iter()
            .filter_map(|idx| narrow_phase::ray_triangle(origin, dir, &self.floors[idx]))
            .fold(None, |best: Option<f32>, t| match best {
                Some(b) if b <= t => Some(b),
                _ => Some(t),
            });

        match best {
            Some(t) => origin.y - t,
            None => self.baseline_y,
        }
    }

    /// Indices (ascending) of walls that gate at `foot_y` and overlap `footprint`.
    pub fn blocking_walls(
        &self,
        footprint: &PlanarBox,
        foot_y: f32,
        gate: HeightGate,
    ) -> Vec<usize> {
        broad::wall_candidates(&self.accel, footprint, foot_y, gate)
            .into_iter()
            .filter(|&idx| {
                narrow_phase::overlaps_at_height(footprint, foot_y, &self.walls[idx], gate)
            })
            .collect()
    }

    /// True iff any wall both gates at `foot_y` and overlaps `footprint`.
    pub fn is_blocked(&self, footprint: &PlanarBox, foot_y: f32, gate: HeightGate) -> bool {
        broad::wall_candidates(&self.accel, footprint, foot_y, gate)
            .into_iter()
            .any(|idx| narrow_phase::overlaps_at_height(footprint, foot_y, &self.walls[idx], gate))
    }
}
