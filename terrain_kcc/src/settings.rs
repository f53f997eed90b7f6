/*!
Runtime-tunable motion and collision settings.

One `MotionSettings` value is owned by the session and handed to every operation by
reference; nothing in the crate reads a global. Every field can be changed between frames.
Changing a classification field (`floor_min_ny`, `wall_max_ny`, `wall_margin`) only takes
effect on the next dataset rebuild.

Settings can optionally be read from a TOML or RON file. Missing fields fall back to the
defaults in [`crate::constants`].

Notes
- Distances are in world units (meters), time in seconds.
- Per-agent-class values (foot bias, footprint) are looked up through [`AgentKind`].
*/

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{
    collision::{ClassifyParams, HeightGate, Vec2},
    constants::*,
};

/// Errors produced while loading settings from disk or text.
#[derive(thiserror::Error, Debug)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("RON parse error: {0}")]
    Ron(#[from] ron::error::SpannedError),

    #[error("Unsupported settings format: {0}")]
    UnsupportedFormat(String),
}

/// Agent classes with their own footprint and foot bias.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgentKind {
    Player,
    Enemy,
    Item,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionSettings {
    /// Floor band: `normal.y >= floor_min_ny`.
    pub floor_min_ny: f32,
    /// Wall band: `|normal.y| <= wall_max_ny`.
    pub wall_max_ny: f32,
    /// Per-side horizontal expansion of wall footprints.
    pub wall_margin: f32,
    pub wall_pad_down: f32,
    pub wall_pad_up: f32,

    /// Largest floor rise accepted by a step-up.
    pub step_max: f32,
    /// Floor differences below this count as level.
    pub step_snap_eps: f32,
    /// Largest floor drop followed by the step-down snap.
    pub step_down_max: f32,
    /// Footprint shrink used by the residual unstick pass.
    pub skin: f32,
    /// Push-out passes per resolution. Residual overlap after the last pass is kept.
    pub unstick_iterations: u32,

    pub gravity: f32,
    pub jump_impulse: f32,
    pub walk_speed: f32,
    pub sprint_multiplier: f32,

    /// Start height of the downward floor probe.
    pub ray_origin_y: f32,
    pub spawn_search_step: f32,
    pub spawn_search_rings: u32,

    pub player_foot_bias: f32,
    pub enemy_foot_bias: f32,
    pub item_foot_bias: f32,
    pub player_half_extent: f32,
    pub enemy_half_extent: f32,
    pub item_half_extent: f32,

    /// Live-tuning increments.
    pub foot_bias_tuning_step: f32,
    pub terrain_offset_tuning_step: f32,
}

impl Default for MotionSettings {
    fn default() -> Self {
        Self {
            floor_min_ny: FLOOR_MIN_NY,
            wall_max_ny: WALL_MAX_NY,
            wall_margin: WALL_MARGIN,
            wall_pad_down: WALL_PAD_DOWN,
            wall_pad_up: WALL_PAD_UP,
            step_max: STEP_MAX,
            step_snap_eps: STEP_SNAP_EPS,
            step_down_max: STEP_DOWN_MAX,
            skin: SKIN,
            unstick_iterations: UNSTICK_ITERATIONS,
            gravity: GRAVITY,
            jump_impulse: JUMP_IMPULSE,
            walk_speed: WALK_SPEED,
            sprint_multiplier: SPRINT_MULTIPLIER,
            ray_origin_y: RAY_ORIGIN_Y,
            spawn_search_step: SPAWN_SEARCH_STEP,
            spawn_search_rings: SPAWN_SEARCH_RINGS,
            player_foot_bias: PLAYER_FOOT_BIAS,
            enemy_foot_bias: ENEMY_FOOT_BIAS,
            item_foot_bias: ITEM_FOOT_BIAS,
            player_half_extent: PLAYER_HALF_EXTENT,
            enemy_half_extent: ENEMY_HALF_EXTENT,
            item_half_extent: ITEM_HALF_EXTENT,
            foot_bias_tuning_step: FOOT_BIAS_TUNING_STEP,
            terrain_offset_tuning_step: TERRAIN_OFFSET_TUNING_STEP,
        }
    }
}

impl MotionSettings {
    /// Parse from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, SettingsError> {
        Ok(toml::from_str(text)?)
    }

    /// Parse from RON text.
    pub fn from_ron_str(text: &str) -> Result<Self, SettingsError> {
        Ok(ron::from_str(text)?)
    }

    /// Load from a `.toml` or `.ron` file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::from_toml_str(&text),
            Some("ron") => Self::from_ron_str(&text),
            _ => Err(SettingsError::UnsupportedFormat(path.display().to_string())),
        }
    }

    #[inline]
    pub fn height_gate(&self) -> HeightGate {
        HeightGate {
            pad_down: self.wall_pad_down,
            pad_up: self.wall_pad_up,
        }
    }

    #[inline]
    pub fn classify_params(&self) -> ClassifyParams {
        ClassifyParams {
            floor_min_ny: self.floor_min_ny,
            wall_max_ny: self.wall_max_ny,
            wall_margin: self.wall_margin,
        }
    }

    /// Vertical offset between floor and visual origin for an agent class.
    #[inline]
    pub fn foot_bias(&self, kind: AgentKind) -> f32 {
        match kind {
            AgentKind::Player => self.player_foot_bias,
            AgentKind::Enemy => self.enemy_foot_bias,
            AgentKind::Item => self.item_foot_bias,
        }
    }

    /// Mutable access to a class's foot bias, for live tuning.
    #[inline]
    pub fn foot_bias_mut(&mut self, kind: AgentKind) -> &mut f32 {
        match kind {
            AgentKind::Player => &mut self.player_foot_bias,
            AgentKind::Enemy => &mut self.enemy_foot_bias,
            AgentKind::Item => &mut self.item_foot_bias,
        }
    }

    /// Footprint half extents for an agent class (square footprint).
    #[inline]
    pub fn half_extents(&self, kind: AgentKind) -> Vec2 {
        let h = match kind {
            AgentKind::Player => self.player_half_extent,
            AgentKind::Enemy => self.enemy_half_extent,
            AgentKind::Item => self.item_half_extent,
        };
        Vec2::repeat(h.max(0.0))
    }
}
