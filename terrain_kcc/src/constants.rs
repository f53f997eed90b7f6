//! Default values for every tunable knob.
//!
//! These seed [`crate::settings::MotionSettings::default`]. Distances are in world units
//! (meters), time in seconds, angles in degrees.

/// Treat a triangle as floor when its unit normal's Y component is at least this.
pub const FLOOR_MIN_NY: f32 = 0.55;

/// Treat a triangle as wall when the absolute Y component of its normal is at most this.
pub const WALL_MAX_NY: f32 = 0.25;

/// Horizontal margin added around each wall footprint, per side.
pub const WALL_MARGIN: f32 = 0.06;

/// A wall still blocks when the foot is up to this far below its bottom edge.
pub const WALL_PAD_DOWN: f32 = 0.6;

/// A wall still blocks when the foot is up to this far above its top edge (roughly head height).
pub const WALL_PAD_UP: f32 = 1.8;

/// Maximum floor rise an agent can step onto while moving horizontally.
pub const STEP_MAX: f32 = 1.25;

/// Floor differences smaller than this are treated as "same height".
pub const STEP_SNAP_EPS: f32 = 0.03;

/// Maximum floor drop that is followed instantly while grounded.
pub const STEP_DOWN_MAX: f32 = 1.35;

/// Per-axis shrink applied to the footprint during the residual unstick pass.
pub const SKIN: f32 = 0.04;

/// Smallest half extent the skin-shrunk footprint may reach.
pub const MIN_SKIN_HALF_EXTENT: f32 = 0.01;

/// Push-out passes per frame when blocked or stuck.
pub const UNSTICK_ITERATIONS: u32 = 4;

/// Gravity magnitude (positive, applied downward).
pub const GRAVITY: f32 = 25.0;

/// Upward velocity set by a jump.
pub const JUMP_IMPULSE: f32 = 9.5;

/// Walking speed (units per second).
pub const WALK_SPEED: f32 = 10.5;

/// Speed multiplier while sprinting.
pub const SPRINT_MULTIPLIER: f32 = 1.6;

/// Height the downward floor probe starts from.
pub const RAY_ORIGIN_Y: f32 = 1000.0;

/// Grid spacing of spawn search candidates.
pub const SPAWN_SEARCH_STEP: f32 = 0.5;

/// Number of rings scanned by the spawn search.
pub const SPAWN_SEARCH_RINGS: u32 = 40;

/// Vertical offset between the floor and the player's visual origin.
pub const PLAYER_FOOT_BIAS: f32 = 1.15;

/// Vertical offset between the floor and an enemy's visual origin.
pub const ENEMY_FOOT_BIAS: f32 = 1.15;

/// Item triggers sit just above the floor.
pub const ITEM_FOOT_BIAS: f32 = 0.05;

/// Footprint half extent (both axes) of the player.
pub const PLAYER_HALF_EXTENT: f32 = 0.40;

/// Footprint half extent (both axes) of an enemy.
pub const ENEMY_HALF_EXTENT: f32 = 0.45;

/// Footprint half extent (both axes) of an item trigger.
pub const ITEM_HALF_EXTENT: f32 = 0.60;

/// Foot bias change per live-tuning press.
pub const FOOT_BIAS_TUNING_STEP: f32 = 0.05;

/// Terrain vertical offset change per live-tuning press.
pub const TERRAIN_OFFSET_TUNING_STEP: f32 = 0.10;

/// Default vertical offset of the terrain model.
pub const TERRAIN_Y_OFFSET: f32 = -20.0;

/// Squared planar displacement below which a frame is treated as "not moving".
pub const MIN_MOVE_SQ: f32 = 1.0e-8;

/// Input directions shorter than this are ignored (no movement this frame).
pub const MIN_INPUT_DIRECTION: f32 = 0.001;
