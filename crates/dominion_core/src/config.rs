//! Game configuration and economy rate formulas.
//!
//! The rate functions here are the contract shared by the simulation
//! and the UI layer: army panels display the same
//! [`troop_increase_rate`](GameConfig::troop_increase_rate) the
//! growth execution applies. All arithmetic is integer/fixed-point.

use serde::{Deserialize, Serialize};

use crate::math::scale_u64;
use crate::player::Player;

/// Shipped balance quirk: a player whose display name exactly matches
/// this string generates troops at twice the computed rate,
/// independent of any multiplier the player holds.
pub const DOUBLED_TROOP_RATE_NAME: &str = "Baba_Iaco";

/// Tunable parameters for one game session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Number of ticks in the pre-game setup window. Spawn executions
    /// are only accepted while the tick counter is below this.
    pub spawn_phase_ticks: u64,
    /// Troops a player starts with on spawn.
    pub starting_troops: u64,
    /// Troop ceiling before multiplier scaling.
    pub base_max_troops: u64,
    /// Flat troop regeneration per resource interval.
    pub base_troop_regen: u64,
    /// Divisor for the proportional part of troop regeneration:
    /// each interval also regenerates `troops / divisor`.
    pub troop_regen_divisor: u64,
    /// Gold income per resource interval before multiplier scaling.
    pub gold_per_interval: u64,
    /// Growth executions apply resources every this many ticks.
    pub resource_interval_ticks: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            spawn_phase_ticks: 10,
            starting_troops: 5_000,
            base_max_troops: 1_000_000,
            base_troop_regen: 10,
            troop_regen_divisor: 100,
            gold_per_interval: 25,
            resource_interval_ticks: 10,
        }
    }
}

impl GameConfig {
    /// Maximum troops the player may hold: the base ceiling scaled by
    /// the player's troop multiplier.
    #[must_use]
    pub fn max_troops(&self, player: &Player) -> u64 {
        scale_u64(self.base_max_troops, player.troop_multiplier())
    }

    /// Troops gained per resource interval.
    ///
    /// A flat floor plus a share of the current troop count, scaled by
    /// the player's troop multiplier and tapered so the count never
    /// exceeds [`max_troops`](Self::max_troops). See
    /// [`DOUBLED_TROOP_RATE_NAME`] for the name-keyed special case.
    #[must_use]
    pub fn troop_increase_rate(&self, player: &Player) -> u64 {
        let max = self.max_troops(player);
        let headroom = max.saturating_sub(player.troops());
        if headroom == 0 {
            return 0;
        }

        let base = self.base_troop_regen + player.troops() / self.troop_regen_divisor;
        let mut rate = scale_u64(base, player.troop_multiplier());
        if player.name() == DOUBLED_TROOP_RATE_NAME {
            rate = rate.saturating_mul(2);
        }
        rate.min(headroom)
    }

    /// Gold gained per resource interval, scaled by the player's gold
    /// multiplier.
    #[must_use]
    pub fn gold_increase_rate(&self, player: &Player) -> u128 {
        u128::from(scale_u64(self.gold_per_interval, player.gold_multiplier()))
    }
}
