use approx::assert_relative_eq;
use terrain_kcc::{
    Agent, AgentKind, CollisionDataset, HorizontalStep, MeshTransform, MotionSettings, MoveIntent,
    PlanarBox, SpawnOutcome, TerrainMesh, Vec2, Vec3, classify,
    collision::{overlaps, push_out},
    movement::{integrate_vertical, try_step},
    resolve_spawn, step_movement,
};

const DT: f32 = 1.0 / 60.0;

/// Incrementally built triangle soup.
#[derive(Default)]
struct MeshBuilder {
    mesh: TerrainMesh,
}

impl MeshBuilder {
    fn quad(mut self, corners: [Vec3; 4]) -> Self {
        let base = self.mesh.positions.len() as u32;
        self.mesh.positions.extend(corners);
        self.mesh.triangles.push([base, base + 1, base + 2]);
        self.mesh.triangles.push([base, base + 2, base + 3]);
        self
    }

    /// Upward-facing horizontal quad.
    fn floor(self, x0: f32, x1: f32, z0: f32, z1: f32, y: f32) -> Self {
        self.quad([
            Vec3::new(x0, y, z0),
            Vec3::new(x0, y, z1),
            Vec3::new(x1, y, z1),
            Vec3::new(x1, y, z0),
        ])
    }

    /// Vertical quad in the plane x = `x`.
    fn wall_x(self, x: f32, z0: f32, z1: f32, y0: f32, y1: f32) -> Self {
        self.quad([
            Vec3::new(x, y0, z0),
            Vec3::new(x, y0, z1),
            Vec3::new(x, y1, z1),
            Vec3::new(x, y1, z0),
        ])
    }

    /// Vertical quad in the plane z = `z`.
    fn wall_z(self, z: f32, x0: f32, x1: f32, y0: f32, y1: f32) -> Self {
        self.quad([
            Vec3::new(x0, y0, z),
            Vec3::new(x1, y0, z),
            Vec3::new(x1, y1, z),
            Vec3::new(x0, y1, z),
        ])
    }

    fn build(self, settings: &MotionSettings) -> CollisionDataset {
        classify(&[self.mesh], &MeshTransform::default(), &settings.classify_params())
    }
}

/// Penetration along at least one axis is within `tol`.
fn separated(a: &PlanarBox, b: &PlanarBox, tol: f32) -> bool {
    let d = (a.center - b.center).abs();
    let reach = a.half_extents + b.half_extents;
    d.x >= reach.x - tol || d.y >= reach.y - tol
}

/// Near floor at y = 0 for x in [-7, 1], a lip wall at x = 1 spanning y in [0, 1], and a far
/// floor at `far_y` for x in [1, 9]. Power-of-two extents keep floor samples exact.
fn step_course(far_y: f32, settings: &MotionSettings) -> CollisionDataset {
    MeshBuilder::default()
        .floor(-7.0, 1.0, -4.0, 4.0, 0.0)
        .wall_x(1.0, -4.0, 4.0, 0.0, 1.0)
        .floor(1.0, 9.0, -4.0, 4.0, far_y)
        .build(settings)
}

/// The lip stops gating once the foot is above 0.75.
fn low_lip_settings() -> MotionSettings {
    MotionSettings {
        wall_pad_up: -0.25,
        ..MotionSettings::default()
    }
}

fn approach(data: &CollisionDataset, settings: &MotionSettings) -> (HorizontalStep, Agent) {
    let mut agent = Agent::standing(AgentKind::Player, Vec2::new(0.5, 0.3), 0.0, settings);
    let step = try_step(data, settings, &mut agent, Vec2::new(0.7, 0.0));
    (step, agent)
}

#[test]
fn single_step_obstacle_is_climbed() {
    let settings = low_lip_settings();
    let data = step_course(0.8, &settings);
    assert_eq!(data.walls().len(), 2);

    let (step, agent) = approach(&data, &settings);
    assert_eq!(step, HorizontalStep::StepUp);
    assert_relative_eq!(agent.state.foot_y, 0.8, epsilon = 1.0e-4);
    assert_relative_eq!(agent.state.position.x, 1.2, epsilon = 1.0e-6);
}

#[test]
fn single_step_obstacle_too_high_stays_blocked() {
    let settings = low_lip_settings();
    let data = step_course(1.4, &settings);

    let (step, agent) = approach(&data, &settings);
    assert_eq!(step, HorizontalStep::Blocked);
    assert_eq!(agent.state.position, Vec2::new(0.5, 0.3));
    assert_eq!(agent.state.foot_y, 0.0);
}

#[test]
fn step_up_boundary_is_inclusive_at_step_max() {
    let settings = low_lip_settings();

    let at_max = step_course(settings.step_max, &settings);
    let (step, agent) = approach(&at_max, &settings);
    assert_eq!(step, HorizontalStep::StepUp);
    assert_eq!(agent.state.foot_y, settings.step_max);

    let above_max = step_course(settings.step_max + 0.01, &settings);
    let (step, _) = approach(&above_max, &settings);
    assert_eq!(step, HorizontalStep::Blocked);
}

#[test]
fn riser_within_head_pad_blocks_step_up() {
    // Default pads: the lip still gates at the new foot elevation.
    let settings = MotionSettings::default();
    let data = step_course(0.8, &settings);
    let (step, _) = approach(&data, &settings);
    assert_eq!(step, HorizontalStep::Blocked);
}

#[test]
fn flat_floor_drop_lands_on_floor() {
    let settings = MotionSettings::default();
    let data = MeshBuilder::default()
        .floor(-16.0, 16.0, -8.0, 24.0, 0.0)
        .build(&settings);
    assert_relative_eq!(data.sample_floor_y(5.0, 5.0, settings.ray_origin_y), 0.0);

    let mut agent = Agent::standing(AgentKind::Player, Vec2::new(5.0, 5.0), 0.0, &settings);
    agent.state.height = 10.0;
    agent.state.grounded = false;

    let mut frames = 0;
    while !agent.state.grounded && frames < 600 {
        step_movement(&data, &settings, &mut agent, MoveIntent::default(), DT);
        frames += 1;
    }

    assert!(agent.state.grounded);
    assert!(frames > 1);
    assert_relative_eq!(agent.state.foot_y, 0.0);
    assert_relative_eq!(agent.state.height, settings.player_foot_bias, epsilon = 1.0e-5);
    assert_eq!(agent.state.vertical_velocity, 0.0);
}

#[test]
fn corner_stick_resolves_outside_both_walls() {
    let settings = MotionSettings::default();
    let data = MeshBuilder::default()
        .floor(-8.0, 8.0, -8.0, 8.0, 0.0)
        .wall_x(2.0, 0.0, 4.0, 0.0, 2.0)
        .wall_z(0.0, -2.0, 2.0, 0.0, 2.0)
        .build(&settings);
    assert_eq!(data.walls().len(), 4);

    // Already wedged into the corner and pushing further in.
    let mut agent = Agent::standing(AgentKind::Player, Vec2::new(1.7, 0.3), 0.0, &settings);
    let intent = MoveIntent {
        direction: Vec2::new(1.0, -1.0).normalize(),
        speed: settings.walk_speed,
        jump: false,
    };
    let report = step_movement(&data, &settings, &mut agent, intent, DT);

    assert_eq!(report.horizontal, Some(HorizontalStep::Blocked));
    for wall in data.walls() {
        assert!(separated(&agent.footprint, &wall.footprint, 1.0e-4));
    }
    assert!(agent.state.position.x < 1.7);
    assert!(agent.state.position.y > 0.3);
}

#[test]
fn push_out_leaves_no_penetration() {
    let settings = MotionSettings::default();
    let data = MeshBuilder::default()
        .wall_x(0.0, -1.0, 1.0, 0.0, 2.0)
        .build(&settings);

    let fixed = data.walls()[0].footprint;
    let mut dynamic = PlanarBox::new(Vec2::new(0.25, 0.5), Vec2::repeat(0.4));
    assert!(overlaps(&fixed, &dynamic));

    dynamic.center += push_out(&fixed, &dynamic);
    assert!(separated(&fixed, &dynamic, 1.0e-5));
}

#[test]
fn spawn_next_to_small_obstacle_is_verified_clear() {
    let settings = MotionSettings::default();
    let data = MeshBuilder::default()
        .floor(-8.0, 8.0, -8.0, 8.0, 0.0)
        .wall_x(0.0, -0.25, 0.25, 0.0, 1.0)
        .build(&settings);

    let half = settings.half_extents(AgentKind::Player);
    let res = resolve_spawn(&data, &settings, Vec2::new(0.1, 0.0), half);

    let SpawnOutcome::Nudged { ring } = res.outcome else {
        panic!("expected a nudge, got {:?}", res.outcome);
    };
    assert!(ring <= 3);
    let foot_y = data.sample_floor_y(res.position.x, res.position.y, settings.ray_origin_y);
    assert_eq!(foot_y, res.foot_y);
    let probe = PlanarBox::new(res.position, half);
    assert!(!data.is_blocked(&probe, foot_y, settings.height_gate()));
}

#[test]
fn fallback_baseline_lets_agent_free_fall_to_it() {
    let settings = MotionSettings::default();
    let data = classify(&[], &MeshTransform::with_y_offset(-20.0), &settings.classify_params());

    let mut agent = Agent::standing(AgentKind::Enemy, Vec2::new(3.0, 3.0), 0.0, &settings);
    agent.state.grounded = false;
    for _ in 0..600 {
        integrate_vertical(&data, &settings, &mut agent, DT);
    }
    assert!(agent.state.grounded);
    assert_relative_eq!(agent.state.foot_y, -20.0);
    assert_relative_eq!(agent.state.height, -20.0 + settings.enemy_foot_bias);
}
