/*!
Terrain session: the single owner of everything the per-frame simulation touches.

Frame order inside [`TerrainSession::tick`]
1. Map input to intent and tuning deltas.
2. Apply tuning; if the terrain offset changed, rebuild the collision dataset.
3. Anchor secondary agents (enemies, item triggers) to the floor.
4. Step the player.

Notes
- The dataset is replaced as a whole value on rebuild. Nothing holds references into the old
  one across frames, so a frame sees either the old geometry or the new one.
- Single-threaded by construction: every mutation goes through `&mut self`.
*/

use crate::{
    collision::{CollisionDataset, MeshTransform, TerrainMesh, Vec2, classify},
    input::{InputFrame, TuningDeltas, frame_intent},
    movement::{Agent, StepReport, anchor_to_floor, step_movement},
    settings::{AgentKind, MotionSettings},
    spawn::{SpawnResolution, resolve_spawn},
};

/// Summary of one [`TerrainSession::tick`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TickReport {
    /// Tuning applied this frame.
    pub tuning: TuningDeltas,
    /// The collision dataset was rebuilt before movement.
    pub rebuilt: bool,
    pub player: StepReport,
}

pub struct TerrainSession {
    meshes: Vec<TerrainMesh>,
    transform: MeshTransform,
    settings: MotionSettings,
    dataset: CollisionDataset,
    dirty: bool,
    player: Agent,
    player_spawn: SpawnResolution,
    agents: Vec<Agent>,
}

impl TerrainSession {
    /// Classify the terrain and place the player at a resolved spawn point.
    pub fn new(
        meshes: Vec<TerrainMesh>,
        transform: MeshTransform,
        settings: MotionSettings,
        player_spawn: Vec2,
    ) -> Self {
        let dataset = classify(&meshes, &transform, &settings.classify_params());
        let spawn = resolve_spawn(
            &dataset,
            &settings,
            player_spawn,
            settings.half_extents(AgentKind::Player),
        );
        let player = Agent::standing(AgentKind::Player, spawn.position, spawn.foot_y, &settings);

        Self {
            meshes,
            transform,
            settings,
            dataset,
            dirty: false,
            player,
            player_spawn: spawn,
            agents: Vec::new(),
        }
    }

    /// Add a floor-anchored secondary agent. Returns its index in [`Self::agents`].
    pub fn add_agent(&mut self, kind: AgentKind, position: Vec2) -> usize {
        let mut agent = Agent::standing(kind, position, 0.0, &self.settings);
        anchor_to_floor(&self.dataset, &self.settings, &mut agent);
        self.agents.push(agent);
        self.agents.len() - 1
    }

    /// Replace the terrain transform and rebuild immediately.
    pub fn set_transform(&mut self, transform: MeshTransform) {
        self.transform = transform;
        self.rebuild();
    }

    /// Build a fresh dataset from the current meshes, transform and classification settings.
    pub fn rebuild(&mut self) {
        self.dataset = classify(&self.meshes, &self.transform, &self.settings.classify_params());
        self.dirty = false;
    }

    /// Apply live-tuning deltas. A terrain offset change defers a rebuild to the next tick.
    pub fn apply_tuning(&mut self, deltas: TuningDeltas) {
        if deltas.is_empty() {
            return;
        }

        *self.settings.foot_bias_mut(AgentKind::Player) += deltas.player_foot_bias;
        *self.settings.foot_bias_mut(AgentKind::Enemy) += deltas.enemy_foot_bias;
        if deltas.terrain_offset != 0.0 {
            self.transform.translation.y += deltas.terrain_offset;
            self.dirty = true;
        }

        log::info!(
            "tuning: player_foot_bias={:.2} enemy_foot_bias={:.2} terrain_y={:.2}",
            self.settings.player_foot_bias,
            self.settings.enemy_foot_bias,
            self.transform.translation.y
        );
    }

    /// Advance the session by one frame.
    pub fn tick(&mut self, frame: &InputFrame, dt: f32) -> TickReport {
        let intent = frame_intent(frame, &self.settings);

        self.apply_tuning(intent.tuning);
        let rebuilt = self.dirty;
        if rebuilt {
            self.rebuild();
        }

        for agent in &mut self.agents {
            anchor_to_floor(&self.dataset, &self.settings, agent);
        }

        let player = step_movement(
            &self.dataset,
            &self.settings,
            &mut self.player,
            intent.movement,
            dt,
        );

        TickReport {
            tuning: intent.tuning,
            rebuilt,
            player,
        }
    }

    #[inline]
    pub fn player(&self) -> &Agent {
        &self.player
    }

    /// How the player's spawn point was resolved at construction.
    #[inline]
    pub fn player_spawn(&self) -> SpawnResolution {
        self.player_spawn
    }

    #[inline]
    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    #[inline]
    pub fn dataset(&self) -> &CollisionDataset {
        &self.dataset
    }

    #[inline]
    pub fn transform(&self) -> MeshTransform {
        self.transform
    }

    #[inline]
    pub fn settings(&self) -> &MotionSettings {
        &self.settings
    }

    /// Classification fields only take effect after [`Self::rebuild`].
    #[inline]
    pub fn settings_mut(&mut self) -> &mut MotionSettings {
        &mut self.settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        collision::Vec3,
        constants::TERRAIN_Y_OFFSET,
        input::{InputButton, InputSnapshot},
        spawn::SpawnOutcome,
    };
    use approx::assert_relative_eq;

    const DT: f32 = 1.0 / 60.0;

    fn flat_floor(y: f32) -> TerrainMesh {
        TerrainMesh::new(
            vec![
                Vec3::new(-50.0, y, -50.0),
                Vec3::new(-50.0, y, 50.0),
                Vec3::new(50.0, y, 50.0),
                Vec3::new(50.0, y, -50.0),
            ],
            vec![[0, 1, 2], [0, 2, 3]],
        )
    }

    fn session() -> TerrainSession {
        TerrainSession::new(
            vec![flat_floor(0.0)],
            MeshTransform::with_y_offset(TERRAIN_Y_OFFSET),
            MotionSettings::default(),
            Vec2::new(1.0, 2.0),
        )
    }

    fn press(buttons: &[InputButton], previous: &[InputButton]) -> InputFrame {
        InputFrame {
            current: InputSnapshot::from_buttons(buttons),
            previous: InputSnapshot::from_buttons(previous),
            camera_yaw_deg: 0.0,
        }
    }

    #[test]
    fn player_spawns_on_floor() {
        let s = session();
        assert_eq!(s.player_spawn().outcome, SpawnOutcome::Clear);
        assert!(s.player().state.grounded);
        assert_relative_eq!(s.player().state.foot_y, -20.0, epsilon = 1.0e-3);
        assert_relative_eq!(
            s.player().world_position().y,
            -20.0 + s.settings().player_foot_bias,
            epsilon = 1.0e-3
        );
    }

    #[test]
    fn terrain_offset_tuning_rebuilds_and_player_follows() {
        let mut s = session();
        let report = s.tick(&press(&[InputButton::TerrainUp], &[]), DT);
        assert!(report.rebuilt);
        assert_relative_eq!(s.transform().translation.y, -19.9, epsilon = 1.0e-4);
        // Floor moved up under the player: the clamp lifts them onto it this frame.
        assert_relative_eq!(s.player().state.foot_y, -19.9, epsilon = 1.0e-3);

        // Held button does not repeat.
        let report = s.tick(&press(&[InputButton::TerrainUp], &[InputButton::TerrainUp]), DT);
        assert!(!report.rebuilt);
        assert_relative_eq!(s.transform().translation.y, -19.9, epsilon = 1.0e-4);
    }

    #[test]
    fn secondary_agents_follow_enemy_bias() {
        let mut s = session();
        let idx = s.add_agent(AgentKind::Enemy, Vec2::new(-3.0, 4.0));
        let before = s.agents()[idx].state.height;

        s.tick(&press(&[InputButton::EnemyBiasUp], &[]), DT);
        let after = s.agents()[idx].state.height;
        assert_relative_eq!(after - before, s.settings().foot_bias_tuning_step, epsilon = 1.0e-4);
    }

    #[test]
    fn walking_moves_player_camera_relative() {
        let mut s = session();
        let start = s.player().state.position;
        let report = s.tick(&press(&[InputButton::Forward], &[]), DT);
        assert!(report.player.horizontal.is_some());
        let moved = s.player().state.position - start;
        assert_relative_eq!(moved.x, 0.0, epsilon = 1.0e-6);
        assert_relative_eq!(moved.y, -s.settings().walk_speed * DT, epsilon = 1.0e-4);
        assert!(s.player().state.grounded);
    }

    #[test]
    fn set_transform_swaps_dataset() {
        let mut s = session();
        s.set_transform(MeshTransform::with_y_offset(5.0));
        assert_relative_eq!(s.dataset().sample_floor_y(0.5, 0.25, 1000.0), 5.0, epsilon = 1.0e-3);
        assert_relative_eq!(s.dataset().baseline_y(), 5.0);
    }
}
