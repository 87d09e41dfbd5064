//! Game controller
//!
//! Owns the game state and reacts to the three things the host reports:
//! frame ticks, physics contacts and taps. Every scene read or write goes
//! through the host's `SceneEngine`; the controller never owns a node.

use glam::Vec3;

use super::category::ContactResponse;
use super::motion::{MotionSampler, MotionSource};
use super::scene::{Contact, NodeId, SceneEngine, SceneNodes, SetupError, Transform};
use super::scheduler::{ScheduledAction, Scheduler};
use super::state::{GameEvent, GamePhase, GameState};
use crate::audio::{AudioCuePlayer, SoundCue};
use crate::highscores::{HighScores, now_millis};
use crate::lerp_toward;
use crate::settings::Settings;
use crate::tuning::Tuning;

pub struct GameController<S, M, A> {
    scene: S,
    motion: M,
    audio: A,
    nodes: SceneNodes,
    state: GameState,
    scheduler: Scheduler,
    sampler: MotionSampler,
    settings: Settings,
    tuning: Tuning,
    high_scores: HighScores,
    high_scores_dirty: bool,
    events: Vec<GameEvent>,
}

impl<S, M, A> GameController<S, M, A>
where
    S: SceneEngine,
    M: MotionSource,
    A: AudioCuePlayer,
{
    /// Bind to the scene, register sounds and put the ball on the spawn point
    pub fn new(
        scene: S,
        motion: M,
        mut audio: A,
        settings: Settings,
        tuning: Tuning,
    ) -> Result<Self, SetupError> {
        let nodes = SceneNodes::bind(&scene)?;

        for cue in SoundCue::ALL {
            audio.load_sound(cue, cue.file_name());
        }

        let mut controller = Self {
            scene,
            motion,
            audio,
            nodes,
            state: GameState::new(),
            scheduler: Scheduler::new(),
            sampler: MotionSampler::new(settings.effective_motion_interval()),
            settings,
            tuning,
            high_scores: HighScores::new(),
            high_scores_dirty: false,
            events: Vec::new(),
        };
        controller.reset();
        controller.events.clear();

        log::info!("Game controller ready (ball {:?})", controller.nodes.ball);
        Ok(controller)
    }

    /// Install a previously saved leaderboard
    pub fn load_high_scores(&mut self, scores: HighScores) {
        self.state.best_score = self.state.best_score.max(scores.top_score().unwrap_or(0));
        self.high_scores = scores;
        self.high_scores_dirty = false;
    }

    // === Host hooks ===

    /// Tap anywhere: starts a run from TapToPlay, ignored otherwise
    pub fn on_tap(&mut self) {
        if self.state.phase != GamePhase::TapToPlay {
            return;
        }

        self.set_phase(GamePhase::Playing);
        self.state.run_time = 0.0;
        self.sampler.reset();

        let follow = self.nodes.camera_follow;
        let mut transform = self.scene.transform(follow);
        transform.euler.y = 0.0;
        transform.position = Vec3::ZERO;
        self.scene.set_transform(follow, transform);
    }

    /// Called once per rendered frame with the simulated seconds elapsed
    pub fn on_frame_tick(&mut self, dt: f32) {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };

        for action in self.scheduler.advance(dt) {
            self.run_action(action);
        }

        if self.state.phase == GamePhase::Playing {
            self.state.run_time += dt;

            let force = self
                .sampler
                .update(dt, &mut self.motion, &self.tuning, &self.settings);
            let ball = self.nodes.ball;
            let velocity = self.scene.velocity(ball);
            self.scene.set_velocity(ball, velocity + force);

            self.check_game_over();
        }

        self.update_follow_anchors();
    }

    /// Physics reported two bodies starting to touch
    pub fn on_contact(&mut self, contact: Contact) {
        let Some(other) = self.nodes.other_than_ball(&self.scene, &contact) else {
            return;
        };
        let Some(category) = self.scene.category(other) else {
            return;
        };

        match category.contact_response() {
            ContactResponse::Collect => self.collect_pearl(other),
            ContactResponse::Bump => {
                log::trace!("Bumped {:?} ({:?})", other, category);
                self.events.push(GameEvent::Bumped {
                    node: other,
                    category,
                });
            }
            ContactResponse::Ignore => {}
        }
    }

    /// Back to TapToPlay with the ball resting at the spawn point
    pub fn reset(&mut self) {
        self.set_phase(GamePhase::TapToPlay);
        self.state.run = self.state.run.wrapping_add(1);
        self.state.score = 0;
        self.state.run_time = 0.0;
        self.sampler.reset();

        let ball = self.nodes.ball;
        self.audio.play(ball, SoundCue::Reset);

        let spawn = self.tuning.spawn_point;
        self.scene.set_velocity(ball, Vec3::ZERO);
        self.scene.set_position(ball, spawn);
        self.scene.set_position(self.nodes.camera_follow, spawn);
        self.scene.set_position(self.nodes.light_follow, spawn);
    }

    // === Internals ===

    fn set_phase(&mut self, to: GamePhase) {
        let from = self.state.phase;
        if from == to {
            return;
        }
        self.state.phase = to;
        log::info!("Phase {:?} -> {:?}", from, to);
        self.events.push(GameEvent::PhaseChanged { from, to });
    }

    fn check_game_over(&mut self) {
        let ball = self.nodes.ball;
        if self.scene.position(ball).y >= self.tuning.fall_threshold {
            return;
        }

        self.set_phase(GamePhase::GameOver);
        self.audio.play(ball, SoundCue::GameOver);
        self.scheduler.schedule(
            self.tuning.reset_delay,
            ScheduledAction::ResetGame {
                run: self.state.run,
            },
        );
        self.record_score();
    }

    fn record_score(&mut self) {
        let score = self.state.score;
        self.state.last_score = score;
        self.state.best_score = self.state.best_score.max(score);

        if let Some(rank) = self
            .high_scores
            .add_score(score, self.state.run_time, now_millis())
        {
            log::info!("New high score {} (rank {})", score, rank);
            self.high_scores_dirty = true;
            self.events.push(GameEvent::NewHighScore { score, rank });
        }
    }

    fn collect_pearl(&mut self, pearl: NodeId) {
        // Contacts can repeat within a frame; a hidden pearl is already taken
        if self.scene.is_hidden(pearl) {
            return;
        }

        self.scene.set_hidden(pearl, true);
        self.scheduler.schedule(
            self.tuning.pearl_respawn_delay,
            ScheduledAction::ShowNode(pearl),
        );

        if self.state.phase == GamePhase::Playing {
            self.state.score += self.tuning.pearl_score;
            self.audio.play(self.nodes.ball, SoundCue::Powerup);
            self.events.push(GameEvent::PearlCollected {
                node: pearl,
                score: self.state.score,
            });
        }
    }

    fn run_action(&mut self, action: ScheduledAction) {
        match action {
            ScheduledAction::ResetGame { run } => {
                if run == self.state.run && self.state.phase == GamePhase::GameOver {
                    self.reset();
                } else {
                    log::debug!("Stale reset for run {} ignored", run);
                }
            }
            ScheduledAction::ShowNode(node) => {
                self.scene.set_hidden(node, false);
                self.events.push(GameEvent::PearlRespawned { node });
            }
        }
    }

    fn update_follow_anchors(&mut self) {
        let ball_pos = self.scene.position(self.nodes.ball);
        let camera_follow = self.nodes.camera_follow;

        let current = self.scene.position(camera_follow);
        let next = lerp_toward(current, ball_pos, self.tuning.follow_lerp);
        self.scene.set_position(camera_follow, next);
        self.scene.set_position(self.nodes.light_follow, next);
    }

    // === Accessors ===

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn nodes(&self) -> &SceneNodes {
        &self.nodes
    }

    pub fn scene(&self) -> &S {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut S {
        &mut self.scene
    }

    pub fn motion_mut(&mut self) -> &mut M {
        &mut self.motion
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    /// Current force the tilt adds to the ball each frame
    pub fn motion_force(&self) -> Vec3 {
        self.sampler.force()
    }

    pub fn high_scores(&self) -> &HighScores {
        &self.high_scores
    }

    /// True once after the leaderboard changed, so the host saves it
    pub fn take_high_scores_dirty(&mut self) -> bool {
        std::mem::take(&mut self.high_scores_dirty)
    }

    /// Events since the last drain, oldest first
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn hud_text(&self) -> String {
        self.state.hud_text(self.settings.show_best_score)
    }

    /// Camera and light follow anchors, in that order
    pub fn follow_anchors(&self) -> (Transform, Transform) {
        (
            self.scene.transform(self.nodes.camera_follow),
            self.scene.transform(self.nodes.light_follow),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::AudioManager;
    use crate::consts::SPAWN_POINT;
    use crate::platform::{FixedTilt, MemoryScene};
    use crate::sim::category::CollisionCategory;
    use proptest::prelude::*;

    type TestController = GameController<MemoryScene, FixedTilt, AudioManager>;

    struct Level {
        controller: TestController,
        pearl: NodeId,
        pillar: NodeId,
    }

    fn level_with_tilt(tilt: FixedTilt) -> Level {
        let mut scene = MemoryScene::with_required_nodes();
        let pearl = scene.add_static_body("pearl_1", Vec3::new(0.0, 1.0, -10.0), CollisionCategory::Pearl, 0.5);
        let pillar = scene.add_static_body("pillar_1", Vec3::new(3.0, 1.0, -20.0), CollisionCategory::Pillar, 1.0);
        let controller = GameController::new(
            scene,
            tilt,
            AudioManager::new(),
            Settings::default(),
            Tuning::default(),
        )
        .unwrap();
        Level {
            controller,
            pearl,
            pillar,
        }
    }

    fn level() -> Level {
        level_with_tilt(FixedTilt::level())
    }

    fn ball_contact(c: &TestController, other: NodeId) -> Contact {
        Contact {
            node_a: c.nodes().ball,
            node_b: other,
        }
    }

    fn tick_for(c: &mut TestController, secs: f32) {
        // 0.25 is exact in binary, so whole seconds land exactly
        let steps = (secs / 0.25).round() as u32;
        for _ in 0..steps {
            c.on_frame_tick(0.25);
        }
    }

    fn force_phase(c: &mut TestController, phase: GamePhase) {
        c.state.phase = phase;
    }

    #[test]
    fn test_starts_reset() {
        let Level { controller: c, .. } = level();
        assert_eq!(c.phase(), GamePhase::TapToPlay);
        assert_eq!(c.scene().position(c.nodes().ball), SPAWN_POINT);
        assert_eq!(c.audio().play_count(SoundCue::Reset), 1);
        for cue in SoundCue::ALL {
            assert!(c.audio().is_loaded(cue));
        }
    }

    #[test]
    fn test_missing_node_is_setup_error() {
        let scene = MemoryScene::new();
        let result = GameController::new(
            scene,
            FixedTilt::level(),
            AudioManager::new(),
            Settings::default(),
            Tuning::default(),
        );
        assert_eq!(result.err(), Some(SetupError::MissingNode("ball")));
    }

    #[test]
    fn test_ball_without_body_is_setup_error() {
        let mut scene = MemoryScene::new();
        scene.add_node("ball", Transform::default());
        scene.add_node("camera", Transform::default());
        let result = GameController::new(
            scene,
            FixedTilt::level(),
            AudioManager::new(),
            Settings::default(),
            Tuning::default(),
        );
        assert_eq!(result.err(), Some(SetupError::MissingBody("ball")));
    }

    #[test]
    fn test_tap_starts_play_and_zeroes_camera_follow() {
        let Level { controller: mut c, .. } = level();
        let follow = c.nodes().camera_follow;
        c.scene_mut().set_transform(
            follow,
            Transform {
                position: Vec3::new(1.0, 2.0, 3.0),
                euler: Vec3::new(0.3, 1.2, 0.0),
            },
        );

        c.on_tap();
        assert_eq!(c.phase(), GamePhase::Playing);
        let transform = c.scene().transform(follow);
        assert_eq!(transform.position, Vec3::ZERO);
        assert_eq!(transform.euler, Vec3::new(0.3, 0.0, 0.0));
        assert_eq!(
            c.drain_events(),
            vec![GameEvent::PhaseChanged {
                from: GamePhase::TapToPlay,
                to: GamePhase::Playing
            }]
        );
    }

    #[test]
    fn test_reset_restores_spawn() {
        let Level { controller: mut c, .. } = level();
        c.on_tap();
        let ball = c.nodes().ball;
        c.scene_mut().set_velocity(ball, Vec3::new(4.0, -1.0, 2.0));
        c.scene_mut().set_position(ball, Vec3::new(7.0, -2.0, -30.0));

        c.reset();

        assert_eq!(c.phase(), GamePhase::TapToPlay);
        assert_eq!(c.scene().velocity(ball), Vec3::ZERO);
        assert_eq!(c.scene().position(ball), SPAWN_POINT);
        let (camera, light) = c.follow_anchors();
        assert_eq!(camera.position, SPAWN_POINT);
        assert_eq!(light.position, SPAWN_POINT);
        assert_eq!(c.audio().play_count(SoundCue::Reset), 2);
    }

    #[test]
    fn test_tilt_accelerates_ball_while_playing() {
        let Level { controller: mut c, .. } = level_with_tilt(FixedTilt::new(1.0, -0.8));
        c.on_tap();

        // First poll after one 0.1 s interval
        c.on_frame_tick(0.05);
        c.on_frame_tick(0.05);
        let v = c.scene().velocity(c.nodes().ball);
        assert!((v.x - 0.05).abs() < 1e-6);
        assert!(v.z.abs() < 1e-6);

        // Held force keeps applying every frame
        c.on_frame_tick(0.05);
        let v = c.scene().velocity(c.nodes().ball);
        assert!((v.x - 0.10).abs() < 1e-6);
    }

    #[test]
    fn test_fall_ends_run_once_then_resets() {
        let Level { controller: mut c, .. } = level();
        c.on_tap();
        let ball = c.nodes().ball;
        c.scene_mut().set_position(ball, Vec3::new(0.0, -6.0, 0.0));

        c.on_frame_tick(0.25);
        assert_eq!(c.phase(), GamePhase::GameOver);
        assert_eq!(c.audio().play_count(SoundCue::GameOver), 1);
        assert_eq!(c.scheduler().len(), 1);

        // Still below the floor: no second cue, no second reset queued
        c.scene_mut().set_position(ball, Vec3::new(0.0, -9.0, 0.0));
        tick_for(&mut c, 4.75);
        assert_eq!(c.phase(), GamePhase::GameOver);
        assert_eq!(c.audio().play_count(SoundCue::GameOver), 1);
        assert_eq!(c.scheduler().len(), 1);

        // 5 s after the fall
        c.on_frame_tick(0.25);
        assert_eq!(c.phase(), GamePhase::TapToPlay);
        assert_eq!(c.scene().position(ball), SPAWN_POINT);
        assert!(c.scheduler().is_empty());
    }

    #[test]
    fn test_stale_reset_is_noop() {
        let Level { controller: mut c, .. } = level();
        c.on_tap();
        let ball = c.nodes().ball;
        c.scene_mut().set_position(ball, Vec3::new(0.0, -6.0, 0.0));
        c.on_frame_tick(0.25);
        assert_eq!(c.phase(), GamePhase::GameOver);

        // Host resets early and the player starts a new run
        c.reset();
        c.on_tap();
        tick_for(&mut c, 5.0);

        assert_eq!(c.phase(), GamePhase::Playing);
        assert_eq!(c.audio().play_count(SoundCue::Reset), 2);
    }

    #[test]
    fn test_pearl_hidden_then_respawned_after_30s() {
        let Level {
            controller: mut c,
            pearl,
            ..
        } = level();
        c.on_tap();

        let contact = ball_contact(&c, pearl);
        c.on_contact(contact);
        assert!(c.scene().is_hidden(pearl));
        assert_eq!(c.state().score, 1);
        assert_eq!(c.audio().play_count(SoundCue::Powerup), 1);

        // Phase changes in between don't matter
        let ball = c.nodes().ball;
        c.scene_mut().set_position(ball, Vec3::new(0.0, -6.0, 0.0));
        tick_for(&mut c, 29.75);
        assert_ne!(c.phase(), GamePhase::Playing);
        assert!(c.scene().is_hidden(pearl));

        c.on_frame_tick(0.25);
        assert!(!c.scene().is_hidden(pearl));
        assert!(
            c.drain_events()
                .contains(&GameEvent::PearlRespawned { node: pearl })
        );
    }

    #[test]
    fn test_repeat_pearl_contact_counts_once() {
        let Level {
            controller: mut c,
            pearl,
            ..
        } = level();
        c.on_tap();
        let contact = ball_contact(&c, pearl);
        c.on_contact(contact);
        c.on_contact(contact);
        assert_eq!(c.state().score, 1);
        assert_eq!(c.scheduler().len(), 1);
    }

    #[test]
    fn test_contact_order_does_not_matter() {
        let Level {
            controller: mut c,
            pearl,
            ..
        } = level();
        c.on_tap();
        let ball = c.nodes().ball;
        c.on_contact(Contact {
            node_a: pearl,
            node_b: ball,
        });
        assert!(c.scene().is_hidden(pearl));
    }

    #[test]
    fn test_pillar_contact_changes_nothing() {
        let Level {
            controller: mut c,
            pillar,
            ..
        } = level();
        c.on_tap();
        c.drain_events();

        let contact = ball_contact(&c, pillar);
        c.on_contact(contact);
        assert!(!c.scene().is_hidden(pillar));
        assert_eq!(c.state().score, 0);
        assert!(c.scheduler().is_empty());
        assert_eq!(
            c.drain_events(),
            vec![GameEvent::Bumped {
                node: pillar,
                category: CollisionCategory::Pillar
            }]
        );
    }

    #[test]
    fn test_game_over_records_high_score() {
        let Level {
            controller: mut c,
            pearl,
            ..
        } = level();
        c.on_tap();
        let contact = ball_contact(&c, pearl);
        c.on_contact(contact);

        let ball = c.nodes().ball;
        c.scene_mut().set_position(ball, Vec3::new(0.0, -6.0, 0.0));
        c.on_frame_tick(0.25);

        assert_eq!(c.state().last_score, 1);
        assert_eq!(c.state().best_score, 1);
        assert_eq!(c.high_scores().top_score(), Some(1));
        assert!(c.take_high_scores_dirty());
        assert!(!c.take_high_scores_dirty());

        tick_for(&mut c, 5.0);
        assert_eq!(c.state().score, 0);
        assert_eq!(c.state().last_score, 1);
    }

    #[test]
    fn test_loaded_high_scores_set_best() {
        let Level { controller: mut c, .. } = level();
        let mut scores = HighScores::new();
        scores.add_score(42, 60.0, 0.0);
        c.load_high_scores(scores);
        assert_eq!(c.state().best_score, 42);
    }

    #[test]
    fn test_follow_anchor_trails_ball() {
        let Level { controller: mut c, .. } = level();
        c.on_tap();
        let ball = c.nodes().ball;
        c.scene_mut().set_position(ball, Vec3::new(100.0, 0.0, 0.0));
        c.on_frame_tick(0.0);

        let (camera, light) = c.follow_anchors();
        assert!((camera.position.x - 1.0).abs() < 1e-5);
        assert_eq!(camera.position, light.position);
    }

    fn phase_strategy() -> impl Strategy<Value = GamePhase> {
        prop_oneof![
            Just(GamePhase::TapToPlay),
            Just(GamePhase::Playing),
            Just(GamePhase::GameOver),
        ]
    }

    proptest! {
        #[test]
        fn prop_tap_only_leaves_tap_to_play(phase in phase_strategy()) {
            let Level { controller: mut c, .. } = level();
            force_phase(&mut c, phase);
            c.on_tap();
            let expected = if phase == GamePhase::TapToPlay {
                GamePhase::Playing
            } else {
                phase
            };
            prop_assert_eq!(c.phase(), expected);
        }

        #[test]
        fn prop_idle_ticks_leave_velocity_alone(
            idle_phase in prop_oneof![Just(GamePhase::TapToPlay), Just(GamePhase::GameOver)],
            tilt_x in -1.0f32..1.0,
            tilt_y in -1.0f32..1.0,
            vx in -5.0f32..5.0,
            vz in -5.0f32..5.0,
            ticks in 1usize..60,
        ) {
            let Level { controller: mut c, .. } = level_with_tilt(FixedTilt::new(tilt_x, tilt_y));
            force_phase(&mut c, idle_phase);
            let ball = c.nodes().ball;
            let velocity = Vec3::new(vx, 0.0, vz);
            c.scene_mut().set_velocity(ball, velocity);

            for _ in 0..ticks {
                c.on_frame_tick(1.0 / 60.0);
            }
            prop_assert_eq!(c.scene().velocity(ball), velocity);
        }
    }
}
