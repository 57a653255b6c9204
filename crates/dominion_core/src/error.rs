//! Error types for the game simulation.

use thiserror::Error;

use crate::player::PlayerId;

/// Result type alias using [`GameError`].
pub type Result<T> = std::result::Result<T, GameError>;

/// Top-level error type for all game simulation errors.
#[derive(Debug, Error)]
pub enum GameError {
    /// A player with this identity is already registered.
    #[error("Player already registered: {0}")]
    DuplicatePlayer(PlayerId),

    /// Lookup of an unregistered player.
    #[error("Player not found: {0}")]
    PlayerNotFound(PlayerId),

    /// Sender lacks the capability required for the requested action.
    #[error("Unauthorized sender: {sender}")]
    Unauthorized {
        /// The sender that failed the capability check.
        sender: PlayerId,
    },

    /// A multiplier value that is not strictly positive.
    #[error("Invalid multiplier: must be > 0")]
    InvalidMultiplier,

    /// Invalid game state.
    #[error("Invalid game state: {0}")]
    InvalidState(String),
}
