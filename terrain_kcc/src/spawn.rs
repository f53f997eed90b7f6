/*!
Spawn resolution.

A requested spawn point may land inside a wall volume. The resolver searches outward in square
rings around the request and returns the first clear spot.

Notes
- Each candidate is tested at the floor elevation sampled under it, not at the requested one.
- Only the perimeter of ring `r` is tested: its interior was already rejected by rings `< r`.
  Within a ring, cells are scanned with `dx` in the outer loop and `dz` in the inner loop.
- The search is bounded by `spawn_search_rings`; exhaustion returns the original request.
*/

use crate::{
    collision::{CollisionDataset, PlanarBox, Vec2},
    settings::MotionSettings,
};

/// How the spawn position was found.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpawnOutcome {
    /// The requested position was already clear.
    Clear,
    /// Moved to a clear cell on the given ring (1-based).
    Nudged { ring: u32 },
    /// No clear cell within the search radius; the original position is kept.
    Exhausted,
}

/// Result of [`resolve_spawn`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpawnResolution {
    pub position: Vec2,
    pub foot_y: f32,
    pub outcome: SpawnOutcome,
}

/// Find a clear position at or near `position` for a footprint of `half_extents`.
pub fn resolve_spawn(
    dataset: &CollisionDataset,
    settings: &MotionSettings,
    position: Vec2,
    half_extents: Vec2,
) -> SpawnResolution {
    let footprint = PlanarBox::new(position, half_extents);

    if let Some(foot_y) = clear_foot_y(dataset, settings, &footprint) {
        return SpawnResolution {
            position,
            foot_y,
            outcome: SpawnOutcome::Clear,
        };
    }

    let step = settings.spawn_search_step;
    for ring in 1..=settings.spawn_search_rings {
        let r = ring as i32;
        for dx in -r..=r {
            for dz in -r..=r {
                if dx.abs() != r && dz.abs() != r {
                    continue;
                }
                let candidate = position + Vec2::new(dx as f32, dz as f32) * step;
                let probe = footprint.with_center(candidate);
                if let Some(foot_y) = clear_foot_y(dataset, settings, &probe) {
                    log::info!(
                        "spawn nudged from ({:.2}, {:.2}) to ({:.2}, {:.2}) on ring {}",
                        position.x,
                        position.y,
                        candidate.x,
                        candidate.y,
                        ring
                    );
                    return SpawnResolution {
                        position: candidate,
                        foot_y,
                        outcome: SpawnOutcome::Nudged { ring },
                    };
                }
            }
        }
    }

    log::warn!(
        "no clear spawn within {} rings of ({:.2}, {:.2}), keeping requested position",
        settings.spawn_search_rings,
        position.x,
        position.y
    );
    SpawnResolution {
        position,
        foot_y: dataset.sample_floor_y(position.x, position.y, settings.ray_origin_y),
        outcome: SpawnOutcome::Exhausted,
    }
}

/// Floor elevation under `footprint` if the footprint is unblocked there.
fn clear_foot_y(
    dataset: &CollisionDataset,
    settings: &MotionSettings,
    footprint: &PlanarBox,
) -> Option<f32> {
    let center = footprint.center;
    let foot_y = dataset.sample_floor_y(center.x, center.y, settings.ray_origin_y);
    (!dataset.is_blocked(footprint, foot_y, settings.height_gate())).then_some(foot_y)
}
