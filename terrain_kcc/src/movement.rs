use crate::{
    collision::{CollisionDataset, PlanarBox, Vec2, Vec3, overlaps_at_height, push_out},
    constants::{MIN_MOVE_SQ, MIN_SKIN_HALF_EXTENT},
    settings::{AgentKind, MotionSettings},
};

/// Mutable per-agent simulation state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AgentState {
    /// Horizontal position (x, z).
    pub position: Vec2,
    /// Height of the visual origin (foot elevation + class bias while grounded).
    pub height: f32,
    /// Vertical velocity (positive = up).
    pub vertical_velocity: f32,
    /// True while clamped to the floor with no downward velocity.
    pub grounded: bool,
    /// Floor elevation the agent is standing on (last resolved).
    pub foot_y: f32,
}

/// An agent: class, state and horizontal footprint.
///
/// The footprint center is kept equal to `state.position` by every operation in this module.
#[derive(Clone, Copy, Debug)]
pub struct Agent {
    pub kind: AgentKind,
    pub state: AgentState,
    pub footprint: PlanarBox,
}

impl Agent {
    /// Place an agent standing on `foot_y` at `position`.
    pub fn standing(
        kind: AgentKind,
        position: Vec2,
        foot_y: f32,
        settings: &MotionSettings,
    ) -> Self {
        Self {
            kind,
            state: AgentState {
                position,
                height: foot_y + settings.foot_bias(kind),
                vertical_velocity: 0.0,
                grounded: true,
                foot_y,
            },
            footprint: PlanarBox::new(position, settings.half_extents(kind)),
        }
    }

    /// World position of the visual origin.
    #[inline]
    pub fn world_position(&self) -> Vec3 {
        Vec3::new(self.state.position.x, self.state.height, self.state.position.y)
    }

    /// Move horizontally and keep the footprint in sync.
    #[inline]
    fn translate(&mut self, delta: Vec2) {
        self.state.position += delta;
        self.footprint.center = self.state.position;
    }
}

/// Outcome of the horizontal part of a frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HorizontalStep {
    /// Nothing blocked the move at the current foot elevation.
    Free,
    /// A wall blocked the move but the floor beyond is a walkable step.
    StepUp,
    /// Move rejected; overlaps were pushed out instead.
    Blocked,
}

/// Per-frame movement intent for one agent.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MoveIntent {
    /// Planar direction (x, z). Normalized or zero.
    pub direction: Vec2,
    /// Speed in units per second.
    pub speed: f32,
    /// Jump requested this frame.
    pub jump: bool,
}

impl MoveIntent {
    /// Planar displacement for a frame of length `dt`.
    #[inline]
    pub fn displacement(&self, dt: f32) -> Vec2 {
        self.direction * (self.speed.max(0.0) * dt.max(0.0))
    }
}

/// Output of a single [`step_movement`] tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StepReport {
    /// Horizontal outcome, or `None` if there was no horizontal intent this frame.
    pub horizontal: Option<HorizontalStep>,
    /// Jump impulse applied this frame.
    pub jumped: bool,
    /// Step-down snap applied this frame.
    pub snapped_down: bool,
    /// Push-out passes used by the residual unstick pass.
    pub unstick_passes: u32,
}

/// Perform one frame of agent movement against the terrain.
///
/// Order (each stage reads the state left by the previous one):
/// 1. Horizontal step at the pre-update foot elevation (free / step-up / blocked + push-out).
/// 2. Jump if requested and grounded.
/// 3. Vertical integration with floor clamping (sets `grounded`).
/// 4. Residual unstick pass with a skin-shrunk footprint.
/// 5. Step-down snap, only if grounded after 3.
///
/// Never fails. Negative `dt` is treated as zero.
pub fn step_movement(
    dataset: &CollisionDataset,
    settings: &MotionSettings,
    agent: &mut Agent,
    intent: MoveIntent,
    dt: f32,
) -> StepReport {
    let dt = dt.max(0.0);

    // 1) Horizontal.
    let displacement = intent.displacement(dt);
    let horizontal = (displacement.norm_squared() > MIN_MOVE_SQ)
        .then(|| move_horizontal(dataset, settings, agent, displacement));

    // 2) Jump.
    let jumped = intent.jump && jump(settings, agent);

    // 3) Vertical.
    integrate_vertical(dataset, settings, agent, dt);

    // 4) Unstick.
    let unstick_passes = unstick(dataset, settings, agent);

    // 5) Step-down.
    let snapped_down = snap_down(dataset, settings, agent);

    if let Some(step) = horizontal {
        log::debug!(
            "{:?} step={:?} foot_y={:.3} grounded={}",
            agent.kind,
            step,
            agent.state.foot_y,
            agent.state.grounded
        );
    }

    StepReport {
        horizontal,
        jumped,
        snapped_down,
        unstick_passes,
    }
}

/// Try a horizontal displacement, falling back to push-out when blocked.
pub fn move_horizontal(
    dataset: &CollisionDataset,
    settings: &MotionSettings,
    agent: &mut Agent,
    displacement: Vec2,
) -> HorizontalStep {
    let step = try_step(dataset, settings, agent, displacement);
    if step == HorizontalStep::Blocked {
        let footprint = agent.footprint;
        push_out_walls(dataset, settings, agent, footprint);
    }
    step
}

/// Classify and apply a horizontal displacement without push-out.
///
/// - Free: the candidate footprint is clear at the current foot elevation.
/// - StepUp: blocked, but the floor at the candidate column is in
///   `(foot_y - step_snap_eps, foot_y + step_max]` and the footprint is clear at that height.
/// - Blocked: anything else; the agent is left where it was.
pub fn try_step(
    dataset: &CollisionDataset,
    settings: &MotionSettings,
    agent: &mut Agent,
    displacement: Vec2,
) -> HorizontalStep {
    let gate = settings.height_gate();
    let foot_y = agent.state.foot_y;
    let candidate = agent.state.position + displacement;
    let candidate_box = agent.footprint.with_center(candidate);

    if !dataset.is_blocked(&candidate_box, foot_y, gate) {
        agent.translate(displacement);
        return HorizontalStep::Free;
    }

    let floor_y = dataset.sample_floor_y(candidate.x, candidate.y, settings.ray_origin_y);
    let rise = floor_y - foot_y;
    if rise > -settings.step_snap_eps
        && rise <= settings.step_max
        && !dataset.is_blocked(&candidate_box, floor_y, gate)
    {
        agent.translate(displacement);
        agent.state.foot_y = floor_y;
        return HorizontalStep::StepUp;
    }

    HorizontalStep::Blocked
}

/// Push `probe` (centered on the agent) out of every gating wall, at most
/// `unstick_iterations` passes, applying each correction to the agent.
///
/// Each pass walks all walls in index order and re-tests every one against the probe as
/// moved by the pushes before it, so a wall entered mid-pass is resolved in the same pass.
/// Returns the number of passes that found at least one overlap. Residual overlap after the
/// last pass is accepted.
fn push_out_walls(
    dataset: &CollisionDataset,
    settings: &MotionSettings,
    agent: &mut Agent,
    mut probe: PlanarBox,
) -> u32 {
    let gate = settings.height_gate();
    let foot_y = agent.state.foot_y;
    let mut passes = 0;

    for _ in 0..settings.unstick_iterations {
        let mut any = false;
        for wall in dataset.walls() {
            if !overlaps_at_height(&probe, foot_y, wall, gate) {
                continue;
            }
            let delta = push_out(&wall.footprint, &probe);
            probe.center += delta;
            agent.translate(delta);
            any = true;
        }
        if !any {
            break;
        }
        passes += 1;
    }

    passes
}

/// Start a jump if grounded. Returns true if the impulse was applied.
pub fn jump(settings: &MotionSettings, agent: &mut Agent) -> bool {
    if !agent.state.grounded {
        return false;
    }
    agent.state.vertical_velocity = settings.jump_impulse;
    agent.state.grounded = false;
    true
}

/// Gravity, proposal and floor clamp.
///
/// Lands (grounded, zero velocity, foot = floor) when the proposed height reaches the floor
/// plus the class bias; otherwise the agent is airborne.
pub fn integrate_vertical(
    dataset: &CollisionDataset,
    settings: &MotionSettings,
    agent: &mut Agent,
    dt: f32,
) {
    let dt = dt.max(0.0);
    let state = &mut agent.state;

    state.vertical_velocity -= settings.gravity * dt;
    let proposed = state.height + state.vertical_velocity * dt;

    let floor_y = dataset.sample_floor_y(state.position.x, state.position.y, settings.ray_origin_y);
    let min_height = floor_y + settings.foot_bias(agent.kind);

    if proposed <= min_height {
        state.height = min_height;
        state.vertical_velocity = 0.0;
        state.grounded = true;
        state.foot_y = floor_y;
    } else {
        state.height = proposed;
        state.grounded = false;
    }
}

/// Residual unstick pass with a skin-shrunk footprint at the current foot elevation.
///
/// Returns the number of passes that moved the agent.
pub fn unstick(dataset: &CollisionDataset, settings: &MotionSettings, agent: &mut Agent) -> u32 {
    let probe = agent
        .footprint
        .shrunk(settings.skin.max(0.0), MIN_SKIN_HALF_EXTENT);
    push_out_walls(dataset, settings, agent, probe)
}

/// Follow a small floor drop while grounded.
///
/// If the floor under the agent is lower than `foot_y` by more than `step_snap_eps` and at
/// most `step_down_max`, foot and visual height snap down immediately.
pub fn snap_down(dataset: &CollisionDataset, settings: &MotionSettings, agent: &mut Agent) -> bool {
    if !agent.state.grounded {
        return false;
    }

    let state = &mut agent.state;
    let floor_y = dataset.sample_floor_y(state.position.x, state.position.y, settings.ray_origin_y);
    let drop = state.foot_y - floor_y;
    if drop > settings.step_snap_eps && drop <= settings.step_down_max {
        state.foot_y = floor_y;
        state.height = floor_y + settings.foot_bias(agent.kind);
        return true;
    }
    false
}

/// Pin a secondary agent (enemy, item trigger) to the floor under it.
pub fn anchor_to_floor(dataset: &CollisionDataset, settings: &MotionSettings, agent: &mut Agent) {
    let state = &mut agent.state;
    let floor_y = dataset.sample_floor_y(state.position.x, state.position.y, settings.ray_origin_y);
    state.foot_y = floor_y;
    state.height = floor_y + settings.foot_bias(agent.kind);
    state.vertical_velocity = 0.0;
    state.grounded = true;
    agent.footprint.center = state.position;
}
