//! Test fixtures and helpers.
//!
//! Pre-built game states and player configurations for consistent
//! testing.

use fixed::types::I32F32;

use dominion_core::config::GameConfig;
use dominion_core::execution::{Execution, SpawnExecution};
use dominion_core::game::Game;
use dominion_core::player::{PlayerId, PlayerInfo, Role};

/// Create a fixed-point number from an integer.
#[must_use]
pub fn fixed(n: i32) -> I32F32 {
    I32F32::from_num(n)
}

/// Create a fixed-point number from a float (for tests only).
///
/// Note: In real simulation code, never use floats.
/// This is only for convenient test setup.
#[must_use]
pub fn fixed_f(n: f64) -> I32F32 {
    I32F32::from_num(n)
}

/// Identity of the admin player in fixture games.
#[must_use]
pub fn operator_id() -> PlayerId {
    PlayerId::from("operator_id")
}

/// Identity of the nth standard player in fixture games.
#[must_use]
pub fn player_id(n: usize) -> PlayerId {
    PlayerId::new(format!("player_{n}"))
}

/// A game with one admin ("operator") and `players` standard players,
/// all registered but not spawned, at tick 0.
#[must_use]
pub fn fresh_game(players: usize) -> Game {
    let mut game = Game::new(GameConfig::default());
    game.add_player(PlayerInfo::new(operator_id(), "operator", Role::Admin))
        .expect("fixture ids are unique");
    for n in 0..players {
        game.add_player(PlayerInfo::new(player_id(n), format!("player_{n}"), Role::Standard))
            .expect("fixture ids are unique");
    }
    game
}

/// Like [`fresh_game`] but every standard player is spawned. The game
/// has run exactly one tick.
#[must_use]
pub fn spawned_game(players: usize) -> Game {
    let mut game = fresh_game(players);
    game.add_execution(
        (0..players).map(|n| Execution::Spawn(SpawnExecution::new(player_id(n), Some(n as u64)))),
    );
    game.execute_next_tick();
    game
}
