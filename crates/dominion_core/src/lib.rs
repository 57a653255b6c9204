//! # Dominion Core
//!
//! Deterministic tick-based simulation core for Dominion, a real-time
//! multiplayer strategy game.
//!
//! This crate contains **only** deterministic logic:
//! - No rendering
//! - No IO
//! - No system randomness (executions seed [`random::PseudoRandom`]
//!   from the tick counter)
//! - No floating-point math (uses fixed-point)
//!
//! This separation enables:
//! - Lockstep multiplayer (identical simulation across clients)
//! - Headless server builds
//! - Replay systems
//! - Determinism testing
//!
//! ## Crate Structure
//!
//! - [`game`] - Tick scheduler, world state and update records
//! - [`execution`] - Deferred state mutations (spawns, grants, drivers)
//! - [`player`] - Player identity, roles and per-player state
//! - [`config`] - Session parameters and economy rate formulas
//! - [`random`] - Seeded deterministic PRNG
//! - [`replay`] - Recording and verified playback
//! - [`math`] - Fixed-point math utilities

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod config;
pub mod error;
pub mod execution;
pub mod game;
pub mod math;
pub mod player;
pub mod random;
pub mod replay;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::GameConfig;
    pub use crate::error::{GameError, Result};
    pub use crate::execution::{
        Execution, GrantExecution, ResourceGrowthExecution, SetMultipliersExecution,
        SpawnExecution,
    };
    pub use crate::game::{Game, TickUpdates};
    pub use crate::math::Fixed;
    pub use crate::player::{PlayerId, PlayerInfo, Role};
    pub use crate::random::PseudoRandom;
    pub use crate::replay::Replay;
}
