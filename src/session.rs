//! Fixed-step game session
//!
//! Owns the current `GameState` together with the store it was configured
//! from. Wall-clock time goes in through `advance`; the simulation always
//! steps at `SIM_DT`. Level start reads settings from the store, and the best
//! score is written back on every tick that beats it and when a level ends.

use crate::consts::{MAX_SUBSTEPS, SIM_DT};
use crate::highscores::HighScoreStore;
use crate::input::{Action, InputState};
use crate::persistence::SettingsStore;
use crate::settings::LAST_LEVEL;
use crate::sim::{GameEvent, GamePhase, GameState, TickInput, tick};

/// Longest frame time accepted before clamping (seconds)
const MAX_FRAME_DT: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Running,
    /// The last level was completed
    Finished,
}

#[derive(Debug)]
pub struct Session<S> {
    store: S,
    state: GameState,
    seed: u64,
    /// Attempts started this session, mixed into each attempt's seed
    attempts: u64,
    accumulator: f64,
    status: SessionStatus,
}

impl<S: SettingsStore + HighScoreStore> Session<S> {
    pub fn new(store: S, seed: u64, level: u32) -> Self {
        let level = level.clamp(1, LAST_LEVEL);
        let state = Self::build_state(&store, seed, level);
        Self {
            store,
            state,
            seed,
            attempts: 1,
            accumulator: 0.0,
            status: SessionStatus::Running,
        }
    }

    fn build_state(store: &S, seed: u64, level: u32) -> GameState {
        GameState::new(
            seed,
            level,
            store.level_settings(level),
            store.battle_settings(),
            store.high_score(),
        )
    }

    fn attempt_seed(&self) -> u64 {
        self.seed.wrapping_add(self.attempts)
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn level(&self) -> u32 {
        self.state.level
    }

    /// Record the current score if it beats the stored best
    fn persist_high_score(&mut self) {
        let score = self.state.score_points();
        if self.store.set_high_score_if_higher(score) {
            log::debug!("Stored high score {}", score);
        }
    }

    /// Rebuild the current level from fresh settings
    pub fn restart(&mut self) {
        self.persist_high_score();
        let seed = self.attempt_seed();
        self.attempts += 1;
        self.state = Self::build_state(&self.store, seed, self.state.level);
        self.accumulator = 0.0;
        self.status = SessionStatus::Running;
        log::info!("Restarted level {}", self.state.level);
    }

    /// Move on from a completed level.
    ///
    /// Returns true if a new level started. Completing the last level
    /// finishes the session instead.
    pub fn advance_level(&mut self) -> bool {
        if self.state.phase != GamePhase::LevelComplete {
            return false;
        }
        self.persist_high_score();
        if self.state.level >= LAST_LEVEL {
            log::info!("All levels complete");
            self.status = SessionStatus::Finished;
            return false;
        }
        let level = self.state.level + 1;
        let seed = self.attempt_seed();
        self.attempts += 1;
        self.state = Self::build_state(&self.store, seed, level);
        self.accumulator = 0.0;
        true
    }

    /// Run exactly one simulation tick
    pub fn tick(&mut self, input: &TickInput) {
        if self.status == SessionStatus::Finished {
            return;
        }
        tick(&mut self.state, input);

        let level_ended = self
            .state
            .events
            .iter()
            .any(|e| matches!(e, GameEvent::GameOver | GameEvent::LevelComplete));
        if level_ended || self.state.score_points() > self.store.high_score() {
            self.persist_high_score();
        }
    }

    /// Advance by `dt` seconds of wall time. Returns the number of ticks run.
    pub fn advance(&mut self, dt: f64, input: &mut InputState) -> u32 {
        if input.take_press(Action::Restart) {
            self.restart();
            input.clear();
        }
        if input.take_press(Action::Confirm) && self.advance_level() {
            input.clear();
        }

        self.accumulator += dt.clamp(0.0, MAX_FRAME_DT);
        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            let tick_input = input.take_tick_input();
            self.tick(&tick_input);
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        substeps
    }
}
