//! Player identity and per-player mutable state.
//!
//! All state changes go through the mutators defined here; nothing
//! outside this module assigns to a player field directly. Mutators
//! mark the player dirty so the tick loop can report a player update
//! for that tick.

use serde::{Deserialize, Serialize};

use crate::error::{GameError, Result};
use crate::math::{fixed_serde, Fixed};

/// Stable player identity, distinct from the display name.
///
/// Assigned by the session layer at connection time and never changes
/// for the lifetime of a game.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(String);

impl PlayerId {
    /// Create a player ID from a stable identity string.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The underlying identity string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PlayerId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

/// Compact per-game player index, assigned in join order.
///
/// Used by update records and wire formats where the full string ID
/// would be wasteful.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct SmallId(pub u32);

/// Capability level of a player, fixed at registration.
///
/// Authorization decisions check this attribute, never the mutable
/// display name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Ordinary participant.
    Standard,
    /// Elevated principal allowed to issue silent resource grants.
    Admin,
}

impl Default for Role {
    fn default() -> Self {
        Self::Standard
    }
}

/// Registration record for a new player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerInfo {
    /// Stable identity.
    pub id: PlayerId,
    /// Human-readable display name (player-chosen, not unique).
    pub name: String,
    /// Capability level.
    pub role: Role,
}

impl PlayerInfo {
    /// Create a registration record.
    #[must_use]
    pub fn new(id: impl Into<PlayerId>, name: impl Into<String>, role: Role) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            role,
        }
    }
}

/// One participant's authoritative state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    info: PlayerInfo,
    small_id: SmallId,
    alive: bool,
    gold: u128,
    troops: u64,
    #[serde(with = "fixed_serde")]
    gold_multiplier: Fixed,
    #[serde(with = "fixed_serde")]
    troop_multiplier: Fixed,
    /// True when state changed during the current tick.
    dirty: bool,
}

impl Player {
    /// Create a pre-spawn player from its registration record.
    ///
    /// The player is not alive until a spawn execution marks it so.
    #[must_use]
    pub fn new(info: PlayerInfo, small_id: SmallId) -> Self {
        Self {
            info,
            small_id,
            alive: false,
            gold: 0,
            troops: 0,
            gold_multiplier: Fixed::ONE,
            troop_multiplier: Fixed::ONE,
            dirty: false,
        }
    }

    /// Stable identity.
    #[must_use]
    pub fn id(&self) -> &PlayerId {
        &self.info.id
    }

    /// Compact per-game index.
    #[must_use]
    pub const fn small_id(&self) -> SmallId {
        self.small_id
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.info.name
    }

    /// Capability level.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.info.role
    }

    /// Whether the player has spawned and is still in play.
    #[must_use]
    pub const fn is_alive(&self) -> bool {
        self.alive
    }

    /// Current gold balance.
    #[must_use]
    pub const fn gold(&self) -> u128 {
        self.gold
    }

    /// Current troop count.
    #[must_use]
    pub const fn troops(&self) -> u64 {
        self.troops
    }

    /// Multiplier applied to future gold generation.
    #[must_use]
    pub const fn gold_multiplier(&self) -> Fixed {
        self.gold_multiplier
    }

    /// Multiplier applied to future troop generation.
    #[must_use]
    pub const fn troop_multiplier(&self) -> Fixed {
        self.troop_multiplier
    }

    /// Add gold, saturating at the type's maximum.
    pub fn add_gold(&mut self, amount: u128) {
        self.gold = self.gold.saturating_add(amount);
        self.dirty = true;
    }

    /// Remove up to `amount` gold. Returns the amount actually removed.
    pub fn remove_gold(&mut self, amount: u128) -> u128 {
        let removed = amount.min(self.gold);
        self.gold -= removed;
        self.dirty = true;
        removed
    }

    /// Add troops, clamped to `cap`.
    pub fn add_troops(&mut self, amount: u64, cap: u64) {
        self.troops = self.troops.saturating_add(amount).min(cap);
        self.dirty = true;
    }

    /// Set the troop count directly, clamped to `cap`.
    pub fn set_troops(&mut self, amount: u64, cap: u64) {
        self.troops = amount.min(cap);
        self.dirty = true;
    }

    /// Remove up to `amount` troops. Returns the amount actually removed.
    pub fn remove_troops(&mut self, amount: u64) -> u64 {
        let removed = amount.min(self.troops);
        self.troops -= removed;
        self.dirty = true;
        removed
    }

    /// Overwrite the gold multiplier.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::InvalidMultiplier`] if the value is not
    /// strictly positive; the current multiplier is left unchanged.
    pub fn set_gold_multiplier(&mut self, multiplier: Fixed) -> Result<()> {
        if multiplier <= Fixed::ZERO {
            return Err(GameError::InvalidMultiplier);
        }
        self.gold_multiplier = multiplier;
        self.dirty = true;
        Ok(())
    }

    /// Overwrite the troop multiplier.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::InvalidMultiplier`] if the value is not
    /// strictly positive; the current multiplier is left unchanged.
    pub fn set_troop_multiplier(&mut self, multiplier: Fixed) -> Result<()> {
        if multiplier <= Fixed::ZERO {
            return Err(GameError::InvalidMultiplier);
        }
        self.troop_multiplier = multiplier;
        self.dirty = true;
        Ok(())
    }

    /// Mark the player alive with its initial troop allotment.
    pub fn mark_spawned(&mut self, starting_troops: u64, cap: u64) {
        self.alive = true;
        self.troops = starting_troops.min(cap);
        self.dirty = true;
    }

    /// Remove the player from active play. The registry entry remains.
    pub fn mark_dead(&mut self) {
        self.alive = false;
        self.dirty = true;
    }

    /// Clear and return the dirty flag. Called once per tick by the
    /// scheduler when building the player-update category.
    pub(crate) fn take_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.dirty, false)
    }
}
