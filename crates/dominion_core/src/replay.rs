//! Replay system for recording and playing back games.
//!
//! Replays store the serialized initial game state and the stream of
//! executions submitted during the game. Because the tick loop is
//! deterministic, re-submitting the same executions at the same ticks
//! recreates the game exactly; the recorded final hash verifies it.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{GameError, Result};
use crate::execution::Execution;
use crate::game::Game;

/// A single submission record for replay.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplaySubmission {
    /// Tick at which the execution was submitted.
    pub tick: u64,
    /// The execution as originally constructed, pre-initialization.
    pub execution: Execution,
}

impl ReplaySubmission {
    /// Create a new submission record.
    #[must_use]
    pub const fn new(tick: u64, execution: Execution) -> Self {
        Self { tick, execution }
    }
}

/// Replay file format version for compatibility.
pub const REPLAY_VERSION: u32 = 1;

/// Complete replay data structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Replay {
    /// Replay format version.
    pub version: u32,
    /// Session identifier or name.
    pub session_id: String,
    /// Random seed used for the game.
    pub seed: u64,
    /// Serialized initial game state.
    pub initial_state: Vec<u8>,
    /// Stream of submissions in tick order.
    pub submissions: Vec<ReplaySubmission>,
    /// Final tick when the game ended.
    pub final_tick: u64,
    /// Final state hash for verification.
    pub final_hash: u64,
}

impl Replay {
    /// Create a new replay from a game's initial state.
    ///
    /// # Errors
    ///
    /// Returns an error if the initial state cannot be serialized.
    pub fn new(session_id: impl Into<String>, seed: u64, initial_state: &Game) -> Result<Self> {
        let state_bytes = initial_state.serialize()?;
        Ok(Self {
            version: REPLAY_VERSION,
            session_id: session_id.into(),
            seed,
            initial_state: state_bytes,
            submissions: Vec::new(),
            final_tick: 0,
            final_hash: 0,
        })
    }

    /// Record an execution submission for replay.
    pub fn record_submission(&mut self, tick: u64, execution: Execution) {
        self.submissions.push(ReplaySubmission::new(tick, execution));
    }

    /// Finalize the replay with end-game state.
    pub fn finalize(&mut self, final_tick: u64, final_hash: u64) {
        self.final_tick = final_tick;
        self.final_hash = final_hash;
    }

    /// Save the replay to a file.
    ///
    /// # Errors
    /// Returns an error if serialization or file writing fails.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let bytes = bincode::serialize(self)
            .map_err(|e| GameError::InvalidState(format!("Failed to serialize replay: {}", e)))?;
        std::fs::write(path.as_ref(), bytes)
            .map_err(|e| GameError::InvalidState(format!("Failed to write replay file: {}", e)))?;
        Ok(())
    }

    /// Load a replay from a file.
    ///
    /// # Errors
    /// Returns an error if file reading or deserialization fails.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let bytes = std::fs::read(path.as_ref())
            .map_err(|e| GameError::InvalidState(format!("Failed to read replay file: {}", e)))?;
        let replay: Self = bincode::deserialize(&bytes)
            .map_err(|e| GameError::InvalidState(format!("Failed to deserialize replay: {}", e)))?;

        // Version check
        if replay.version != REPLAY_VERSION {
            return Err(GameError::InvalidState(format!(
                "Replay version mismatch: expected {}, got {}",
                REPLAY_VERSION, replay.version
            )));
        }

        Ok(replay)
    }

    /// Get the initial game state for playback.
    ///
    /// # Errors
    /// Returns an error if state deserialization fails.
    pub fn restore_initial_state(&self) -> Result<Game> {
        Game::deserialize(&self.initial_state)
    }

    /// Get submissions for a specific tick.
    #[must_use]
    pub fn submissions_at_tick(&self, tick: u64) -> Vec<&ReplaySubmission> {
        self.submissions
            .iter()
            .filter(|sub| sub.tick == tick)
            .collect()
    }

    /// Get the total duration of the replay in ticks.
    #[must_use]
    pub const fn duration(&self) -> u64 {
        self.final_tick
    }

    /// Get the total number of submissions in the replay.
    #[must_use]
    pub fn submission_count(&self) -> usize {
        self.submissions.len()
    }
}

/// Replay playback controller.
#[derive(Debug)]
pub struct ReplayPlayer {
    /// The replay being played.
    replay: Replay,
    /// Current game state.
    game: Game,
    /// Index into the submission stream.
    submission_index: usize,
    /// Whether playback is paused.
    pub paused: bool,
}

impl ReplayPlayer {
    /// Create a new replay player from a replay.
    ///
    /// # Errors
    /// Returns an error if the initial state cannot be restored.
    pub fn new(replay: Replay) -> Result<Self> {
        let game = replay.restore_initial_state()?;
        Ok(Self {
            replay,
            game,
            submission_index: 0,
            paused: false,
        })
    }

    /// Advance the replay by one tick.
    ///
    /// Returns true if there are more ticks to play.
    pub fn advance(&mut self) -> bool {
        if self.paused || self.game.ticks() >= self.replay.final_tick {
            return self.game.ticks() < self.replay.final_tick;
        }

        self.step();
        self.game.ticks() < self.replay.final_tick
    }

    /// Seek to a specific tick, replaying from the start.
    ///
    /// # Errors
    /// Returns an error if state restoration fails.
    pub fn seek(&mut self, target_tick: u64) -> Result<()> {
        self.game = self.replay.restore_initial_state()?;
        self.submission_index = 0;

        while self.game.ticks() < target_tick && self.game.ticks() < self.replay.final_tick {
            self.step();
        }

        Ok(())
    }

    /// Submit this tick's recorded executions, then run the tick.
    fn step(&mut self) {
        let tick = self.game.ticks();
        while self.submission_index < self.replay.submissions.len() {
            let sub = &self.replay.submissions[self.submission_index];
            if sub.tick > tick {
                break;
            }
            self.game.add_execution([sub.execution.clone()]);
            self.submission_index += 1;
        }
        self.game.execute_next_tick();
    }

    /// Get the current tick.
    #[must_use]
    pub const fn current_tick(&self) -> u64 {
        self.game.ticks()
    }

    /// Get a reference to the current game state.
    #[must_use]
    pub const fn game(&self) -> &Game {
        &self.game
    }

    /// Get the replay being played.
    #[must_use]
    pub const fn replay(&self) -> &Replay {
        &self.replay
    }

    /// Check if the replay has finished.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.game.ticks() >= self.replay.final_tick
    }

    /// Verify the replay produces the expected final hash.
    ///
    /// # Errors
    /// Returns an error if state restoration fails.
    pub fn verify(&mut self) -> Result<bool> {
        self.seek(self.replay.final_tick)?;
        let actual_hash = self.game.state_hash();
        Ok(actual_hash == self.replay.final_hash)
    }

    /// Toggle pause state.
    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }
}
