/*!
Input to intent mapping.

The host samples its input device once per frame into an [`InputSnapshot`] and hands the
current and previous snapshots plus the camera yaw to [`frame_intent`]. The result is a pure
value: movement intent for the player and live-tuning deltas for the session. Nothing here
touches the collision dataset or agent state.

Notes
- Movement is camera-relative: forward = (sin yaw, -cos yaw), right = (cos yaw, sin yaw) in XZ.
- Jump is level-triggered (held = requested every frame); it only takes effect while grounded.
- Tuning buttons fire once per press (rising edge).
*/

use crate::{
    bitmask_flags::BitmaskFlags,
    collision::Vec2,
    constants::MIN_INPUT_DIRECTION,
    define_bitmask_flags,
    movement::MoveIntent,
    settings::MotionSettings,
};

define_bitmask_flags!(InputButton, u16, {
    Forward,
    Back,
    Left,
    Right,
    Sprint,
    Jump,
    PlayerBiasUp,
    PlayerBiasDown,
    EnemyBiasUp,
    EnemyBiasDown,
    TerrainUp,
    TerrainDown,
});

/// Buttons held during one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InputSnapshot {
    pub buttons: BitmaskFlags<u16>,
}

impl InputSnapshot {
    pub fn from_buttons(buttons: &[InputButton]) -> Self {
        Self {
            buttons: BitmaskFlags::from_flags(buttons),
        }
    }

    #[inline]
    pub fn held(&self, button: InputButton) -> bool {
        self.buttons.has(button)
    }
}

/// Everything [`frame_intent`] needs for one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct InputFrame {
    pub current: InputSnapshot,
    pub previous: InputSnapshot,
    /// Camera yaw in degrees.
    pub camera_yaw_deg: f32,
}

/// Live-tuning requests for this frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TuningDeltas {
    pub player_foot_bias: f32,
    pub enemy_foot_bias: f32,
    /// Vertical terrain offset change; non-zero means the dataset must be rebuilt.
    pub terrain_offset: f32,
}

impl TuningDeltas {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.player_foot_bias == 0.0 && self.enemy_foot_bias == 0.0 && self.terrain_offset == 0.0
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameIntent {
    pub movement: MoveIntent,
    pub tuning: TuningDeltas,
}

/// Map one frame of input to player intent and tuning deltas.
pub fn frame_intent(frame: &InputFrame, settings: &MotionSettings) -> FrameIntent {
    let held = |b: InputButton| frame.current.held(b);
    let axis = |pos: InputButton, neg: InputButton| (held(pos) as i8 - held(neg) as i8) as f32;

    let yaw = frame.camera_yaw_deg.to_radians();
    let forward = Vec2::new(yaw.sin(), -yaw.cos());
    let right = Vec2::new(yaw.cos(), yaw.sin());

    let raw = forward * axis(InputButton::Forward, InputButton::Back)
        + right * axis(InputButton::Right, InputButton::Left);
    let direction = if raw.norm() > MIN_INPUT_DIRECTION {
        raw.normalize()
    } else {
        Vec2::zeros()
    };

    let mut speed = settings.walk_speed;
    if held(InputButton::Sprint) {
        speed *= settings.sprint_multiplier;
    }

    let pressed = frame.current.buttons.rising(&frame.previous.buttons);
    let edge = |pos: InputButton, neg: InputButton| {
        (pressed.has(pos) as i8 - pressed.has(neg) as i8) as f32
    };

    FrameIntent {
        movement: MoveIntent {
            direction,
            speed,
            jump: held(InputButton::Jump),
        },
        tuning: TuningDeltas {
            player_foot_bias: edge(InputButton::PlayerBiasUp, InputButton::PlayerBiasDown)
                * settings.foot_bias_tuning_step,
            enemy_foot_bias: edge(InputButton::EnemyBiasUp, InputButton::EnemyBiasDown)
                * settings.foot_bias_tuning_step,
            terrain_offset: edge(InputButton::TerrainUp, InputButton::TerrainDown)
                * settings.terrain_offset_tuning_step,
        },
    }
}
