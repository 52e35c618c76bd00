//! Run controller
//!
//! Owns the committed [`GameState`] and everything a run needs around it:
//! the seeded RNG, the command queue, and the audio and score collaborators.
//! The platform calls [`Game::frame`] once per display frame and renders the
//! snapshot it gets back.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::audio::{AudioSink, Cue};
use crate::config::GameConfig;
use crate::consts::NOMINAL_FRAME_MS;
use crate::error::ConfigError;
use crate::input::{Command, CommandQueue};
use crate::leaderboard::{LeaderboardEntry, ScoreService};
use crate::sim::{GameEvent, GamePhase, GameState, Snapshot, TickInput, autopilot, tick};

/// What a frame produced
#[derive(Debug, Clone, PartialEq)]
pub enum FrameOutcome {
    /// Not running; nothing was simulated and no frame should be scheduled
    Idle,
    /// One tick committed; keep scheduling frames
    Continue(Snapshot),
    /// The run ended on this frame
    GameOver { final_score: u64, snapshot: Snapshot },
}

/// A single player's session: one run at a time, restartable
pub struct Game<A: AudioSink, S: ScoreService> {
    config: GameConfig,
    state: GameState,
    rng: Pcg32,
    seed: u64,
    commands: CommandQueue,
    audio: A,
    scores: S,
    /// Timestamp of the previous frame; None right after start/resume
    last_frame_ms: Option<f64>,
    autopilot: bool,
}

impl<A: AudioSink, S: ScoreService> Game<A, S> {
    pub fn new(config: GameConfig, seed: u64, audio: A, scores: S) -> Result<Self, ConfigError> {
        config.validate()?;
        let state = GameState::new(&config);
        Ok(Self {
            config,
            state,
            rng: Pcg32::seed_from_u64(seed),
            seed,
            commands: CommandQueue::new(),
            audio,
            scores,
            last_frame_ms: None,
            autopilot: false,
        })
    }

    /// Begin a run with the current seed
    pub fn start(&mut self) {
        self.restart(self.seed);
    }

    /// Discard the current run and begin a new one
    pub fn restart(&mut self, seed: u64) {
        self.seed = seed;
        self.rng = Pcg32::seed_from_u64(seed);
        self.state = GameState::running(&self.config);
        self.commands.clear();
        self.last_frame_ms = None;
        log::info!("Run started with seed: {}", seed);
    }

    /// Freeze the run; returns false if it wasn't running
    pub fn pause(&mut self) -> bool {
        if self.state.phase != GamePhase::Running {
            return false;
        }
        self.state.phase = GamePhase::Paused;
        self.last_frame_ms = None;
        log::info!("Paused at score {}", self.state.score);
        true
    }

    /// Continue a paused run; returns false if it wasn't paused
    pub fn resume(&mut self) -> bool {
        if self.state.phase != GamePhase::Paused {
            return false;
        }
        self.state.phase = GamePhase::Running;
        self.last_frame_ms = None;
        log::info!("Resumed");
        true
    }

    /// Pause if running, resume if paused
    pub fn toggle_pause(&mut self) -> GamePhase {
        if !self.pause() {
            self.resume();
        }
        self.state.phase
    }

    /// Queue a command for the next frame; ignored unless running
    pub fn submit(&mut self, command: Command) -> bool {
        if self.state.phase != GamePhase::Running {
            return false;
        }
        self.commands.push(command)
    }

    /// Run one tick if the run is live
    pub fn frame(&mut self, now_ms: f64) -> FrameOutcome {
        if self.state.phase != GamePhase::Running {
            return FrameOutcome::Idle;
        }

        let dt_ms = match self.last_frame_ms {
            Some(prev) => now_ms - prev,
            None => NOMINAL_FRAME_MS,
        };
        self.last_frame_ms = Some(now_ms);

        let mut commands = self.commands.drain();
        if self.autopilot {
            commands.extend(autopilot::suggest(&self.state, &self.config));
        }
        let input = TickInput { commands, dt_ms };

        match tick(&self.state, &input, &self.config, &mut self.rng) {
            Ok(out) => {
                self.state = out.state;
                for event in &out.events {
                    self.on_event(event);
                }
            }
            Err(err) => {
                // Keep the last committed state, just end the run
                log::error!("Simulation fault at score {}: {}", self.state.score, err);
                self.state.phase = GamePhase::GameOver;
                self.audio.play(Cue::Die);
            }
        }

        let snapshot = self.state.snapshot();
        if self.state.phase == GamePhase::GameOver {
            let final_score = self.state.score;
            self.commands.clear();
            self.report(final_score);
            FrameOutcome::GameOver {
                final_score,
                snapshot,
            }
        } else {
            FrameOutcome::Continue(snapshot)
        }
    }

    fn on_event(&self, event: &GameEvent) {
        match *event {
            GameEvent::LaneChanged { .. } => self.audio.play(Cue::Score),
            GameEvent::Jumped => self.audio.play(Cue::Jump),
            GameEvent::PowerUpCollected { kind, replaced } => {
                match replaced {
                    Some(old) => log::debug!("Picked up {} (replacing {})", kind.as_str(), old.as_str()),
                    None => log::debug!("Picked up {}", kind.as_str()),
                }
                self.audio.play(Cue::PowerUp);
            }
            GameEvent::ObstacleAbsorbed => {
                log::debug!("Shield absorbed an obstacle");
                self.audio.play(Cue::PowerUp);
            }
            GameEvent::EffectExpired(kind) => log::debug!("{} expired", kind.as_str()),
            GameEvent::SpeedUp { speed } => log::debug!("Speed up: {:.2}", speed),
            GameEvent::Died { score } => {
                log::info!("Game over! Final score: {}", score);
                self.audio.play(Cue::Die);
            }
        }
    }

    /// Hand the final score to the score service; a failure never affects the run
    fn report(&mut self, score: u64) {
        if let Err(err) = self.scores.report_score(score) {
            log::warn!("Failed to record score {}: {}", score, err);
        }
    }

    pub fn is_running(&self) -> bool {
        self.state.phase == GamePhase::Running
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn snapshot(&self) -> Snapshot {
        self.state.snapshot()
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn leaderboard(&self) -> Vec<LeaderboardEntry> {
        self.scores.fetch_leaderboard()
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.audio.set_muted(muted);
    }

    pub fn set_autopilot(&mut self, on: bool) {
        self.autopilot = on;
        log::info!("Autopilot: {}", on);
    }

    pub fn autopilot(&self) -> bool {
        self.autopilot
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    pub fn scores(&self) -> &S {
        &self.scores
    }

    pub fn scores_mut(&mut self) -> &mut S {
        &mut self.scores
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::CueLog;
    use crate::error::ScoreError;
    use crate::leaderboard::LocalScores;
    use crate::sim::Obstacle;

    #[derive(Default)]
    struct Recorder {
        reported: Vec<u64>,
        fail: bool,
    }

    impl ScoreService for Recorder {
        fn report_score(&mut self, score: u64) -> Result<(), ScoreError> {
            self.reported.push(score);
            if self.fail {
                Err(ScoreError::Storage("quota exceeded".to_string()))
            } else {
                Ok(())
            }
        }

        fn fetch_leaderboard(&self) -> Vec<LeaderboardEntry> {
            Vec::new()
        }
    }

    fn quiet_config() -> GameConfig {
        GameConfig {
            power_up_chance: 0.0,
            ..GameConfig::default()
        }
    }

    fn game() -> Game<CueLog, Recorder> {
        Game::new(quiet_config(), 7, CueLog::new(), Recorder::default()).unwrap()
    }

    fn block_player(game: &mut Game<CueLog, Recorder>) {
        block_player_in(&mut game.state, &game.config);
    }

    fn block_player_in(state: &mut GameState, config: &GameConfig) {
        state.obstacles.push(Obstacle {
            x: 75.0,
            y: config.obstacle_y(),
            lane: 1,
            width: config.obstacle_width(),
            height: config.obstacle_height,
            speed: config.initial_speed,
        });
    }

    #[test]
    fn test_new_rejects_bad_config() {
        let config = GameConfig {
            lanes: 0,
            ..GameConfig::default()
        };
        assert!(Game::new(config, 1, CueLog::new(), Recorder::default()).is_err());
    }

    #[test]
    fn test_frames_idle_until_started() {
        let mut game = game();
        assert_eq!(game.phase(), GamePhase::Ready);
        assert_eq!(game.frame(0.0), FrameOutcome::Idle);
        assert!(!game.submit(Command::Jump));

        game.start();
        assert!(game.is_running());
        assert!(matches!(game.frame(16.0), FrameOutcome::Continue(_)));
        assert_eq!(game.state().score, 1);
    }

    #[test]
    fn test_commands_play_cues() {
        let mut game = game();
        game.start();
        assert!(game.submit(Command::MoveLeft));
        assert!(game.submit(Command::Jump));
        game.frame(0.0);

        assert_eq!(game.audio().played(), vec![Cue::Score, Cue::Jump]);
        assert_eq!(game.state().player.lane, 0);
    }

    #[test]
    fn test_game_over_reports_once() {
        let mut game = game();
        game.start();
        block_player(&mut game);

        match game.frame(0.0) {
            FrameOutcome::GameOver { final_score, .. } => assert_eq!(final_score, 1),
            other => panic!("expected game over, got {:?}", other),
        }
        assert_eq!(game.frame(16.0), FrameOutcome::Idle);
        assert_eq!(game.frame(32.0), FrameOutcome::Idle);

        assert_eq!(game.scores().reported, vec![1]);
        assert_eq!(game.audio().count(Cue::Die), 1);
        assert!(!game.submit(Command::Jump));
    }

    #[test]
    fn test_finished_run_uses_player_name() {
        let mut game = Game::new(quiet_config(), 7, CueLog::new(), LocalScores::default()).unwrap();
        game.scores_mut().set_player_name(" ada ");
        game.start();
        block_player_in(&mut game.state, &game.config);
        assert!(matches!(game.frame(0.0), FrameOutcome::GameOver { .. }));

        let entries = game.leaderboard();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "ada");
        assert_eq!(entries[0].score, 1);
    }

    #[test]
    fn test_score_failure_is_swallowed() {
        let recorder = Recorder {
            fail: true,
            ..Recorder::default()
        };
        let mut game = Game::new(quiet_config(), 7, CueLog::new(), recorder).unwrap();
        game.start();
        block_player(&mut game);

        assert!(matches!(game.frame(0.0), FrameOutcome::GameOver { .. }));
        assert_eq!(game.phase(), GamePhase::GameOver);
        assert_eq!(game.scores().reported.len(), 1);
    }

    #[test]
    fn test_fault_ends_run_at_last_committed_state() {
        let mut game = game();
        game.start();
        game.frame(0.0);
        game.state.game_speed = f32::NAN;
        let before = game.state.clone();

        match game.frame(16.0) {
            FrameOutcome::GameOver { final_score, .. } => assert_eq!(final_score, before.score),
            other => panic!("expected game over, got {:?}", other),
        }
        assert_eq!(game.state().obstacles, before.obstacles);
        assert_eq!(game.scores().reported, vec![before.score]);
        assert_eq!(game.frame(32.0), FrameOutcome::Idle);
    }

    #[test]
    fn test_pause_keeps_state_and_skips_paused_time() {
        let mut game = game();
        game.start();
        game.frame(0.0);
        game.frame(16.0);
        assert!(game.pause());
        let frozen = game.state().clone();

        assert_eq!(game.frame(5000.0), FrameOutcome::Idle);
        assert!(!game.submit(Command::Jump));
        assert_eq!(game.state().score, frozen.score);
        assert_eq!(game.state().obstacles, frozen.obstacles);

        assert!(game.resume());
        game.frame(60_000.0);
        assert_eq!(game.state().score, frozen.score + 1);
        assert_eq!(game.state().clock_ms, frozen.clock_ms + NOMINAL_FRAME_MS);
    }

    #[test]
    fn test_toggle_pause() {
        let mut game = game();
        game.start();
        assert_eq!(game.toggle_pause(), GamePhase::Paused);
        assert_eq!(game.toggle_pause(), GamePhase::Running);
    }

    #[test]
    fn test_restart_clears_queue_and_state() {
        let mut game = game();
        game.start();
        game.frame(0.0);
        game.submit(Command::MoveRight);
        game.restart(99);

        assert_eq!(game.seed(), 99);
        assert_eq!(game.state().score, 0);
        game.frame(0.0);
        assert_eq!(game.state().player.lane, game.config().start_lane());
    }

    #[test]
    fn test_autopilot_clears_obstacle() {
        let mut game = game();
        game.set_autopilot(true);
        game.start();
        let config = game.config.clone();
        game.state.obstacles.push(Obstacle {
            x: 160.0,
            y: config.obstacle_y(),
            lane: 0,
            width: config.obstacle_width(),
            height: config.obstacle_height,
            speed: config.initial_speed,
        });

        let mut now = 0.0;
        for _ in 0..40 {
            assert!(game.is_running());
            game.frame(now);
            now += NOMINAL_FRAME_MS;
        }
        assert!(game.audio().count(Cue::Jump) >= 1);
        assert!(game.is_running());
    }
}
