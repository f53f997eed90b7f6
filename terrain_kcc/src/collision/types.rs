/*!
Core collision types and math aliases shared by the collision submodules.

This module intentionally contains no algorithms beyond trivial accessors. It defines the
data exchanged between:
- classify (mesh -> floor triangles + wall volumes)
- broad (BVH candidate pruning)
- narrow_phase (ray/triangle, rectangle overlap, push-out)
- dataset (floor sampling and blocked queries)
- the movement controller and spawn resolver

Conventions
- +Y is up. "Planar" values live in the XZ plane and are stored as `Vec2 { x, y }` where
  `y` holds the world Z coordinate.
- All collision geometry is in world space; the mesh transform is applied once at
  classification time.
*/

use nalgebra as na;

/// Common math aliases for clarity and consistency.
pub type Vec2 = na::Vector2<f32>;
pub type Vec3 = na::Vector3<f32>;
pub type Point3 = na::Point3<f32>;

/// Axis-aligned rectangle in the XZ plane.
///
/// Used both for agent footprints (the dynamic side) and for wall footprints (the static side).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlanarBox {
    /// Center in (x, z).
    pub center: Vec2,
    /// Half-extents along x and z. Never negative.
    pub half_extents: Vec2,
}

impl PlanarBox {
    #[inline]
    pub fn new(center: Vec2, half_extents: Vec2) -> Self {
        Self {
            center,
            half_extents: half_extents.map(|h| h.max(0.0)),
        }
    }

    /// Build from min/max corners. Corners may be given in any order.
    #[inline]
    pub fn from_corners(a: Vec2, b: Vec2) -> Self {
        let min = a.inf(&b);
        let max = a.sup(&b);
        Self {
            center: (min + max) * 0.5,
            half_extents: (max - min) * 0.5,
        }
    }

    /// Same extents, different center.
    #[inline]
    pub fn with_center(&self, center: Vec2) -> Self {
        Self {
            center,
            half_extents: self.half_extents,
        }
    }

    /// Shrink each half-extent by `skin`, never going below `min_half`.
    #[inline]
    pub fn shrunk(&self, skin: f32, min_half: f32) -> Self {
        Self {
            center: self.center,
            half_extents: self.half_extents.map(|h| (h - skin).max(min_half)),
        }
    }

    #[inline]
    pub fn min(&self) -> Vec2 {
        self.center - self.half_extents
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.center + self.half_extents
    }
}

/// A walkable triangle in world space.
#[derive(Clone, Copy, Debug)]
pub struct FloorTriangle {
    pub a: Vec3,
    pub b: Vec3,
    pub c: Vec3,
    /// Unit face normal; `normal.y` is at least the floor threshold used at build time.
    pub normal: Vec3,
}

/// Height-aware blocking volume derived from one near-vertical triangle.
#[derive(Clone, Copy, Debug)]
pub struct WallVolume {
    /// Margin-expanded XZ footprint.
    pub footprint: PlanarBox,
    /// Lowest vertex height of the source triangle.
    pub min_y: f32,
    /// Highest vertex height of the source triangle. Always `>= min_y`.
    pub max_y: f32,
}

/// Raw triangle soup as supplied by the asset loader.
///
/// Triangles index into `positions`. Out-of-range indices are tolerated and skipped at
/// classification time.
#[derive(Clone, Debug, Default)]
pub struct TerrainMesh {
    pub positions: Vec<Vec3>,
    pub triangles: Vec<[u32; 3]>,
}

impl TerrainMesh {
    #[inline]
    pub fn new(positions: Vec<Vec3>, triangles: Vec<[u32; 3]>) -> Self {
        Self {
            positions,
            triangles,
        }
    }

    /// Build from a flat index list (`[i0, i1, i2, i3, ...]`), ignoring a trailing partial triple.
    pub fn from_flat_indices(positions: Vec<Vec3>, indices: &[u32]) -> Self {
        let triangles = indices
            .chunks_exact(3)
            .map(|tri| [tri[0], tri[1], tri[2]])
            .collect();
        Self {
            positions,
            triangles,
        }
    }

    /// Fetch the three positions of triangle `i`, or `None` if any index is out of range.
    #[inline]
    pub fn triangle_positions(&self, tri: [u32; 3]) -> Option<[Vec3; 3]> {
        let get = |i: u32| self.positions.get(i as usize).copied();
        Some([get(tri[0])?, get(tri[1])?, get(tri[2])?])
    }
}

/// World placement of the terrain model: `translate * rotate_y(yaw) * scale`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MeshTransform {
    pub translation: Vec3,
    pub yaw_deg: f32,
    pub scale: f32,
}

impl Default for MeshTransform {
    fn default() -> Self {
        Self {
            translation: Vec3::zeros(),
            yaw_deg: 0.0,
            scale: 1.0,
        }
    }
}

impl MeshTransform {
    /// Convenience: only a vertical offset.
    #[inline]
    pub fn with_y_offset(y_offset: f32) -> Self {
        Self {
            translation: Vec3::new(0.0, y_offset, 0.0),
            ..Self::default()
        }
    }

    /// Yaw rotation about +Y.
    #[inline]
    pub fn rotation(&self) -> na::UnitQuaternion<f32> {
        na::UnitQuaternion::from_axis_angle(&Vec3::y_axis(), self.yaw_deg.to_radians())
    }

    /// Apply uniform scale, then yaw, then translation.
    ///
    /// A zero scale is allowed and collapses the mesh onto the translation point.
    #[inline]
    pub fn transform_point(&self, p: &Vec3) -> Vec3 {
        self.rotation() * (p * self.scale) + self.translation
    }

    /// Fallback floor elevation used when a floor probe misses every triangle.
    #[inline]
    pub fn baseline_y(&self) -> f32 {
        self.translation.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_indices_drop_trailing_partial_triple() {
        let positions = vec![Vec3::zeros(), Vec3::x(), Vec3::z(), Vec3::y()];
        let mesh = TerrainMesh::from_flat_indices(positions, &[0, 1, 2, 0, 2, 3, 1, 3]);
        assert_eq!(mesh.triangles, vec![[0, 1, 2], [0, 2, 3]]);
    }

    #[test]
    fn shrunk_clamps_each_axis_at_minimum() {
        let b = PlanarBox::new(Vec2::new(1.0, -1.0), Vec2::new(0.5, 0.03125));
        let s = b.shrunk(0.125, 0.0625);
        assert_eq!(s.center, b.center);
        assert_eq!(s.half_extents, Vec2::new(0.375, 0.0625));
    }

    #[test]
    fn negative_half_extents_are_clamped() {
        let b = PlanarBox::new(Vec2::zeros(), Vec2::new(-1.0, 2.0));
        assert_eq!(b.half_extents, Vec2::new(0.0, 2.0));
    }
}
