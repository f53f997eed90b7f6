//! Exact collision predicates shared by the movement controller and the spawn resolver.
//!
//! Everything here is pure and allocation-free. Candidates coming out of the broad phase are
//! always re-tested with these functions, so the BVH never changes a query's answer.

use super::types::{FloorTriangle, PlanarBox, Vec2, Vec3, WallVolume};

/// Determinant threshold below which a ray is considered parallel to a triangle.
const RAY_PARALLEL_EPS: f32 = 1.0e-6;

/// Möller–Trumbore ray/triangle intersection.
///
/// Returns the ray parameter `t` of the hit. A hit requires barycentrics `u >= 0`, `v >= 0`,
/// `u + v <= 1` and a strictly positive `t`. Near-parallel rays are reported as a miss rather
/// than dividing by a tiny determinant.
#[inline]
pub fn ray_triangle(origin: Vec3, dir: Vec3, tri: &FloorTriangle) -> Option<f32> {
    let e1 = tri.b - tri.a;
    let e2 = tri.c - tri.a;
    let p = dir.cross(&e2);
    let det = e1.dot(&p);
    if !det.is_finite() || det.abs() < RAY_PARALLEL_EPS {
        return None;
    }
    let inv_det = 1.0 / det;

    let s = origin - tri.a;
    let u = s.dot(&p) * inv_det;
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(&e1);
    let v = dir.dot(&q) * inv_det;
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = e2.dot(&q) * inv_det;
    (t > 0.0).then_some(t)
}

/// Separating-axis overlap test for two planar rectangles.
///
/// Touching edges do not count as overlap.
#[inline]
pub fn overlaps(a: &PlanarBox, b: &PlanarBox) -> bool {
    let d = (a.center - b.center).abs();
    let reach = a.half_extents + b.half_extents;
    d.x < reach.x && d.y < reach.y
}

/// Vertical window in which a wall participates in collision, relative to a foot elevation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeightGate {
    /// How far below a wall's bottom the foot may be and still collide.
    pub pad_down: f32,
    /// How far above a wall's top the foot may be and still collide.
    pub pad_up: f32,
}

impl HeightGate {
    /// True if a wall spanning `[min_y, max_y]` is relevant for an agent standing at `foot_y`.
    #[inline]
    pub fn admits(&self, wall: &WallVolume, foot_y: f32) -> bool {
        foot_y >= wall.min_y - self.pad_down && foot_y <= wall.max_y + self.pad_up
    }
}

/// Height-gated overlap between an agent footprint and a wall volume.
#[inline]
pub fn overlaps_at_height(
    footprint: &PlanarBox,
    foot_y: f32,
    wall: &WallVolume,
    gate: HeightGate,
) -> bool {
    gate.admits(wall, foot_y) && overlaps(footprint, &wall.footprint)
}

/// Minimum-translation push that separates `dynamic` from `fixed`.
///
/// Penetration is measured on both axes and the smaller one is resolved (ties go to the Z
/// axis), moving away from the fixed center. A zero offset on an axis pushes in the positive
/// direction. Returns zero when the rectangles do not actually overlap.
#[inline]
pub fn push_out(fixed: &PlanarBox, dynamic: &PlanarBox) -> Vec2 {
    let d = dynamic.center - fixed.center;
    let px = (dynamic.half_extents.x + fixed.half_extents.x) - d.x.abs();
    let pz = (dynamic.half_extents.y + fixed.half_extents.y) - d.y.abs();
    if px <= 0.0 || pz <= 0.0 {
        return Vec2::zeros();
    }

    let sign = |v: f32| if v < 0.0 { -1.0 } else { 1.0 };
    if px < pz {
        Vec2::new(sign(d.x) * px, 0.0)
    } else {
        Vec2::new(0.0, sign(d.y) * pz)
    }
}
