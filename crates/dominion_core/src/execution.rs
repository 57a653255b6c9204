//! Deferred state mutation units and their scheduler contract.
//!
//! An execution is constructed inert, submitted to the game's pending
//! queue, initialized once against current game state (authorization
//! and precondition checks happen exactly here), then ticked until it
//! reports inactive. Failures are local and terminal to the failing
//! execution: they are logged (or deliberately silent, per variant)
//! and never abort the surrounding tick.
//!
//! Variants form a closed sum type so the scheduler can store and
//! serialize heterogeneous mutations uniformly; dispatch is a match in
//! [`Execution::init`]/[`Execution::tick`].

use serde::{Deserialize, Serialize};

use crate::error::GameError;
use crate::game::{DisplayEvent, GameEvent, TileRef, TileUpdate, World};
use crate::math::{coerce_amount, fixed_serde, option_fixed_serde, Fixed};
use crate::player::{PlayerId, Role};
use crate::random::PseudoRandom;

/// Number of candidate spawn tiles the deterministic picker draws
/// from. The terrain collaborator maps the candidate index to a real
/// location.
const SPAWN_TILE_CANDIDATES: u64 = 65_536;

/// Lifecycle of an execution.
///
/// Authorization and precondition validation run exactly once, during
/// initialization; `Applied` and `Rejected` are terminal. Tick-time
/// validation failures move an authorized execution straight to
/// `Rejected`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExecStatus {
    /// Constructed, not yet initialized.
    Pending,
    /// Initialization succeeded; ticks may mutate state.
    Authorized,
    /// Completed its mutation. Terminal.
    Applied,
    /// Failed validation or application. Terminal, no further effect.
    Rejected,
}

impl ExecStatus {
    /// Whether the execution should remain in the scheduler.
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Pending | Self::Authorized)
    }
}

/// Which resource a grant mutates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResourceKind {
    /// Gold balance.
    Gold,
    /// Troop count (clamped by the configured maximum).
    Troops,
}

/// A deferred, possibly multi-tick, state change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Execution {
    /// Bring a registered player into active play.
    Spawn(SpawnExecution),
    /// Silently add gold or troops to a player.
    Grant(GrantExecution),
    /// Silently overwrite a player's generation multipliers.
    SetMultipliers(SetMultipliersExecution),
    /// Long-running per-player economy driver.
    ResourceGrowth(ResourceGrowthExecution),
}

impl Execution {
    /// Initialize against current game state. Called exactly once by
    /// the scheduler before the execution's first tick.
    pub(crate) fn init(&mut self, world: &World, tick: u64) {
        match self {
            Self::Spawn(e) => e.init(world, tick),
            Self::Grant(e) => e.init(world, tick),
            Self::SetMultipliers(e) => e.init(world, tick),
            Self::ResourceGrowth(e) => e.init(world, tick),
        }
    }

    /// Apply one tick of this execution. A no-op once the execution is
    /// no longer active.
    pub(crate) fn tick(&mut self, world: &mut World) {
        match self {
            Self::Spawn(e) => e.tick(world),
            Self::Grant(e) => e.tick(world),
            Self::SetMultipliers(e) => e.tick(world),
            Self::ResourceGrowth(e) => e.tick(world),
        }
    }

    /// Whether the execution should remain in the scheduler.
    #[must_use]
    pub fn is_active(&self) -> bool {
        match self {
            Self::Spawn(e) => e.status.is_active(),
            Self::Grant(e) => e.status.is_active(),
            Self::SetMultipliers(e) => e.status.is_active(),
            Self::ResourceGrowth(e) => e.status.is_active(),
        }
    }
}

/// Brings a player into active play during the spawn phase.
///
/// Emits a tile update, a game event and a display event on the tick
/// it applies; spawning is an observable action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnExecution {
    player: PlayerId,
    /// Spawn location chosen by the player, if any. Otherwise one is
    /// drawn deterministically from the tick-seeded generator.
    preferred_tile: Option<TileRef>,
    status: ExecStatus,
}

impl SpawnExecution {
    /// Create a spawn request for a registered player.
    #[must_use]
    pub fn new(player: PlayerId, preferred_tile: Option<TileRef>) -> Self {
        Self {
            player,
            preferred_tile,
            status: ExecStatus::Pending,
        }
    }

    fn init(&mut self, world: &World, _tick: u64) {
        if !world.has_player(&self.player) {
            tracing::warn!(player = %self.player, "spawn: player not registered");
            self.status = ExecStatus::Rejected;
            return;
        }
        if !world.in_spawn_phase() {
            tracing::warn!(player = %self.player, "spawn: spawn phase has ended");
            self.status = ExecStatus::Rejected;
            return;
        }
        self.status = ExecStatus::Authorized;
    }

    fn tick(&mut self, world: &mut World) {
        if self.status != ExecStatus::Authorized {
            return;
        }

        let (starting, cap, small_id, name) = match world.player(&self.player) {
            Ok(player) => (
                world.config().starting_troops,
                world.config().max_troops(player),
                player.small_id(),
                player.name().to_owned(),
            ),
            Err(e) => {
                tracing::warn!(player = %self.player, error = %e, "spawn failed");
                self.status = ExecStatus::Rejected;
                return;
            }
        };

        let tile = self.preferred_tile.unwrap_or_else(|| {
            let mut random = PseudoRandom::new(world.ticks());
            random.gen_range_u64(0..SPAWN_TILE_CANDIDATES)
        });

        match world.player_mut(&self.player) {
            Ok(player) => player.mark_spawned(starting, cap),
            Err(e) => {
                tracing::warn!(player = %self.player, error = %e, "spawn failed");
                self.status = ExecStatus::Rejected;
                return;
            }
        }

        world.push_tile_update(TileUpdate {
            tile,
            owner: small_id,
        });
        world.push_event(GameEvent::PlayerSpawned {
            player: small_id,
            tile,
        });
        world.push_display_event(DisplayEvent {
            player: Some(small_id),
            message: format!("{name} has spawned"),
        });

        self.status = ExecStatus::Applied;
    }
}

/// Silently adds gold or troops to a player's balance.
///
/// Restricted to senders holding the `Admin` role. The mutation is
/// deliberately invisible in the event stream: it contributes nothing
/// to the event or display-event categories, and is indistinguishable
/// from ordinary accrual except for the balance delta itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrantExecution {
    resource: ResourceKind,
    sender: PlayerId,
    recipient: PlayerId,
    #[serde(with = "fixed_serde")]
    amount: Fixed,
    status: ExecStatus,
}

impl GrantExecution {
    /// Create a gold grant.
    #[must_use]
    pub fn gold(sender: PlayerId, recipient: PlayerId, amount: Fixed) -> Self {
        Self {
            resource: ResourceKind::Gold,
            sender,
            recipient,
            amount,
            status: ExecStatus::Pending,
        }
    }

    /// Create a troop grant.
    #[must_use]
    pub fn troops(sender: PlayerId, recipient: PlayerId, amount: Fixed) -> Self {
        Self {
            resource: ResourceKind::Troops,
            sender,
            recipient,
            amount,
            status: ExecStatus::Pending,
        }
    }

    fn init(&mut self, world: &World, _tick: u64) {
        if !world.has_player(&self.recipient) {
            tracing::warn!(recipient = %self.recipient, "grant: recipient not found");
            self.status = ExecStatus::Rejected;
            return;
        }

        let authorized = world
            .player(&self.sender)
            .is_ok_and(|sender| sender.role() == Role::Admin);
        if !authorized {
            let err = GameError::Unauthorized {
                sender: self.sender.clone(),
            };
            tracing::warn!(error = %err, "grant rejected");
            self.status = ExecStatus::Rejected;
            return;
        }

        self.status = ExecStatus::Authorized;
    }

    fn tick(&mut self, world: &mut World) {
        if self.status != ExecStatus::Authorized {
            return;
        }

        // Zero or negative amounts deactivate silently: no mutation,
        // no warning.
        let Some(amount) = coerce_amount(self.amount) else {
            self.status = ExecStatus::Rejected;
            return;
        };

        let cap = match self.resource {
            ResourceKind::Troops => world
                .player(&self.recipient)
                .map(|r| world.config().max_troops(r)),
            ResourceKind::Gold => Ok(0),
        };

        let applied = cap.and_then(|cap| {
            let recipient = world.player_mut(&self.recipient)?;
            match self.resource {
                ResourceKind::Gold => recipient.add_gold(u128::from(amount)),
                ResourceKind::Troops => recipient.add_troops(amount, cap),
            }
            Ok(())
        });

        match applied {
            Ok(()) => self.status = ExecStatus::Applied,
            Err(e) => {
                tracing::warn!(recipient = %self.recipient, error = %e, "grant failed");
                self.status = ExecStatus::Rejected;
            }
        }
    }
}

/// Silently overwrites a player's generation multipliers.
///
/// Each field that is present replaces the recipient's corresponding
/// multiplier; absent fields are left untouched. Multipliers affect
/// only future rate computations, never banked resources.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetMultipliersExecution {
    sender: PlayerId,
    recipient: PlayerId,
    #[serde(with = "option_fixed_serde")]
    gold_multiplier: Option<Fixed>,
    #[serde(with = "option_fixed_serde")]
    troop_multiplier: Option<Fixed>,
    status: ExecStatus,
}

impl SetMultipliersExecution {
    /// Create a multiplier override request.
    #[must_use]
    pub fn new(
        sender: PlayerId,
        recipient: PlayerId,
        gold_multiplier: Option<Fixed>,
        troop_multiplier: Option<Fixed>,
    ) -> Self {
        Self {
            sender,
            recipient,
            gold_multiplier,
            troop_multiplier,
            status: ExecStatus::Pending,
        }
    }

    fn init(&mut self, world: &World, _tick: u64) {
        if !world.has_player(&self.recipient) {
            tracing::warn!(recipient = %self.recipient, "set multipliers: recipient not found");
            self.status = ExecStatus::Rejected;
            return;
        }

        let authorized = world
            .player(&self.sender)
            .is_ok_and(|sender| sender.role() == Role::Admin);
        if !authorized {
            let err = GameError::Unauthorized {
                sender: self.sender.clone(),
            };
            tracing::warn!(error = %err, "set multipliers rejected");
            self.status = ExecStatus::Rejected;
            return;
        }

        self.status = ExecStatus::Authorized;
    }

    fn tick(&mut self, world: &mut World) {
        if self.status != ExecStatus::Authorized {
            return;
        }

        let result = world.player_mut(&self.recipient).and_then(|recipient| {
            if let Some(multiplier) = self.gold_multiplier {
                recipient.set_gold_multiplier(multiplier)?;
            }
            if let Some(multiplier) = self.troop_multiplier {
                recipient.set_troop_multiplier(multiplier)?;
            }
            Ok(())
        });

        match result {
            Ok(()) => self.status = ExecStatus::Applied,
            Err(e) => {
                tracing::warn!(recipient = %self.recipient, error = %e, "set multipliers failed");
                self.status = ExecStatus::Rejected;
            }
        }
    }
}

/// Long-running economy driver for one player.
///
/// Stays active across an unbounded number of ticks. Every
/// `resource_interval_ticks` it adds the configured troop and gold
/// increase rates to its player; it deactivates once the player is no
/// longer alive. Hosts enqueue one per spawned player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceGrowthExecution {
    player: PlayerId,
    status: ExecStatus,
}

impl ResourceGrowthExecution {
    /// Create a growth driver for a spawned player.
    #[must_use]
    pub fn new(player: PlayerId) -> Self {
        Self {
            player,
            status: ExecStatus::Pending,
        }
    }

    fn init(&mut self, world: &World, _tick: u64) {
        if !world.has_player(&self.player) {
            tracing::warn!(player = %self.player, "resource growth: player not registered");
            self.status = ExecStatus::Rejected;
            return;
        }
        self.status = ExecStatus::Authorized;
    }

    fn tick(&mut self, world: &mut World) {
        if self.status != ExecStatus::Authorized {
            return;
        }

        let interval = world.config().resource_interval_ticks;
        if interval == 0 || world.ticks() % interval != 0 {
            return;
        }

        let (alive, troop_gain, gold_gain, cap) = match world.player(&self.player) {
            Ok(player) => (
                player.is_alive(),
                world.config().troop_increase_rate(player),
                world.config().gold_increase_rate(player),
                world.config().max_troops(player),
            ),
            Err(_) => {
                // Registry entries are never removed; a miss means the
                // game was rebuilt without this player.
                self.status = ExecStatus::Applied;
                return;
            }
        };

        if !alive {
            self.status = ExecStatus::Applied;
            return;
        }

        if let Ok(player) = world.player_mut(&self.player) {
            player.add_troops(troop_gain, cap);
            player.add_gold(gold_gain);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::game::Game;
    use crate::player::PlayerInfo;

    fn admin_info(id: &str, name: &str) -> PlayerInfo {
        PlayerInfo::new(id, name, Role::Admin)
    }

    fn standard_info(id: &str, name: &str) -> PlayerInfo {
        PlayerInfo::new(id, name, Role::Standard)
    }

    fn two_player_game() -> Game {
        let mut game = Game::new(GameConfig::default());
        game.add_player(admin_info("admin_id", "operator")).unwrap();
        game.add_player(standard_info("target_id", "target"))
            .unwrap();
        game
    }

    #[test]
    fn test_spawn_marks_player_alive() {
        let mut game = two_player_game();
        game.add_execution([Execution::Spawn(SpawnExecution::new(
            PlayerId::from("target_id"),
            Some(42),
        ))]);

        let updates = game.execute_next_tick();

        let target = game.player(&PlayerId::from("target_id")).unwrap();
        assert!(target.is_alive());
        assert_eq!(target.troops(), game.config().starting_troops);
        assert_eq!(updates.tile_updates.len(), 1);
        assert_eq!(updates.tile_updates[0].tile, 42);
        assert_eq!(updates.events.len(), 1);
        assert_eq!(updates.display_events.len(), 1);
        assert_eq!(updates.player_updates.len(), 1);
    }

    #[test]
    fn test_spawn_without_preferred_tile_is_deterministic() {
        let run = || {
            let mut game = two_player_game();
            game.add_execution([Execution::Spawn(SpawnExecution::new(
                PlayerId::from("target_id"),
                None,
            ))]);
            game.execute_next_tick().tile_updates[0].tile
        };

        assert_eq!(run(), run());
    }

    #[test]
    fn test_spawn_rejected_after_spawn_phase() {
        let mut game = two_player_game();
        while game.in_spawn_phase() {
            game.execute_next_tick();
        }

        game.add_execution([Execution::Spawn(SpawnExecution::new(
            PlayerId::from("target_id"),
            None,
        ))]);
        let updates = game.execute_next_tick();

        assert!(!game.player(&PlayerId::from("target_id")).unwrap().is_alive());
        assert!(updates.is_empty());
        assert_eq!(game.active_executions(), 0);
    }

    #[test]
    fn test_spawn_rejected_for_unregistered_player() {
        let mut game = two_player_game();
        game.add_execution([Execution::Spawn(SpawnExecution::new(
            PlayerId::from("ghost"),
            None,
        ))]);
        let updates = game.execute_next_tick();

        assert!(updates.is_empty());
        assert_eq!(game.active_executions(), 0);
    }

    #[test]
    fn test_grant_requires_admin_role() {
        let mut game = two_player_game();
        game.add_execution([Execution::Grant(GrantExecution::gold(
            PlayerId::from("target_id"),
            PlayerId::from("admin_id"),
            Fixed::from_num(5000),
        ))]);

        game.execute_next_tick();

        assert_eq!(game.player(&PlayerId::from("admin_id")).unwrap().gold(), 0);
        assert_eq!(game.active_executions(), 0);
    }

    #[test]
    fn test_grant_rejects_unknown_recipient() {
        let mut game = two_player_game();
        game.add_execution([Execution::Grant(GrantExecution::gold(
            PlayerId::from("admin_id"),
            PlayerId::from("ghost"),
            Fixed::from_num(5000),
        ))]);

        game.execute_next_tick();
        assert_eq!(game.active_executions(), 0);
        for player in game.players() {
            assert_eq!(player.gold(), 0);
        }
    }

    #[test]
    fn test_grant_rejects_unregistered_sender() {
        let mut game = two_player_game();
        game.add_execution([Execution::Grant(GrantExecution::gold(
            PlayerId::from("ghost"),
            PlayerId::from("target_id"),
            Fixed::from_num(5000),
        ))]);

        game.execute_next_tick();
        assert_eq!(game.player(&PlayerId::from("target_id")).unwrap().gold(), 0);
    }

    #[test]
    fn test_authorized_gold_grant_applies_in_one_tick() {
        let mut game = two_player_game();
        game.add_execution([Execution::Grant(GrantExecution::gold(
            PlayerId::from("admin_id"),
            PlayerId::from("target_id"),
            Fixed::from_num(5000),
        ))]);

        let updates = game.execute_next_tick();

        assert_eq!(
            game.player(&PlayerId::from("target_id")).unwrap().gold(),
            5000
        );
        // Silent policy: balance change visible only as a player update.
        assert!(updates.events.is_empty());
        assert!(updates.display_events.is_empty());
        assert_eq!(updates.player_updates.len(), 1);
        assert_eq!(game.active_executions(), 0);
    }

    #[test]
    fn test_grant_amount_is_floored() {
        let mut game = two_player_game();
        game.add_execution([Execution::Grant(GrantExecution::gold(
            PlayerId::from("admin_id"),
            PlayerId::from("target_id"),
            Fixed::from_num(99.9),
        ))]);

        game.execute_next_tick();
        assert_eq!(game.player(&PlayerId::from("target_id")).unwrap().gold(), 99);
    }

    #[test]
    fn test_grant_zero_or_negative_amount_is_silent_noop() {
        for amount in [Fixed::ZERO, Fixed::from_num(-500), Fixed::from_num(0.4)] {
            let mut game = two_player_game();
            game.add_execution([Execution::Grant(GrantExecution::troops(
                PlayerId::from("admin_id"),
                PlayerId::from("target_id"),
                amount,
            ))]);

            let updates = game.execute_next_tick();

            assert_eq!(game.player(&PlayerId::from("target_id")).unwrap().troops(), 0);
            assert!(updates.is_empty());
            assert_eq!(game.active_executions(), 0);
        }
    }

    #[test]
    fn test_troop_grant_clamps_at_max() {
        let mut game = two_player_game();
        let huge = Fixed::from_num(2_000_000_000i64);
        game.add_execution([Execution::Grant(GrantExecution::troops(
            PlayerId::from("admin_id"),
            PlayerId::from("target_id"),
            huge,
        ))]);

        game.execute_next_tick();

        let target = game.player(&PlayerId::from("target_id")).unwrap();
        assert_eq!(target.troops(), game.config().max_troops(target));
    }

    #[test]
    fn test_tick_on_inactive_execution_is_noop() {
        // Drive an execution by hand through its full lifecycle.
        let game = two_player_game();
        let mut world = game.world().clone();
        let mut grant = Execution::Grant(GrantExecution::gold(
            PlayerId::from("admin_id"),
            PlayerId::from("target_id"),
            Fixed::from_num(100),
        ));

        grant.init(&world, 0);
        assert!(grant.is_active());

        grant.tick(&mut world);
        assert!(!grant.is_active());
        assert_eq!(world.player(&PlayerId::from("target_id")).unwrap().gold(), 100);

        // Further ticks on the terminal execution change nothing.
        let hash_before = world.state_hash();
        grant.tick(&mut world);
        grant.tick(&mut world);
        assert_eq!(world.state_hash(), hash_before);
        assert_eq!(world.player(&PlayerId::from("target_id")).unwrap().gold(), 100);
    }

    #[test]
    fn test_set_multipliers_partial_fields() {
        let mut game = two_player_game();
        game.add_execution([Execution::SetMultipliers(SetMultipliersExecution::new(
            PlayerId::from("admin_id"),
            PlayerId::from("target_id"),
            Some(Fixed::from_num(2.5)),
            None,
        ))]);

        let updates = game.execute_next_tick();

        let target = game.player(&PlayerId::from("target_id")).unwrap();
        assert_eq!(target.gold_multiplier(), Fixed::from_num(2.5));
        assert_eq!(target.troop_multiplier(), Fixed::ONE);
        assert!(updates.display_events.is_empty());
    }

    #[test]
    fn test_set_multipliers_both_fields() {
        let mut game = two_player_game();
        game.add_execution([Execution::SetMultipliers(SetMultipliersExecution::new(
            PlayerId::from("admin_id"),
            PlayerId::from("target_id"),
            Some(Fixed::from_num(2)),
            Some(Fixed::from_num(3)),
        ))]);

        game.execute_next_tick();

        let target = game.player(&PlayerId::from("target_id")).unwrap();
        assert_eq!(target.gold_multiplier(), Fixed::from_num(2));
        assert_eq!(target.troop_multiplier(), Fixed::from_num(3));
    }

    #[test]
    fn test_set_multipliers_invalid_value_terminates() {
        let mut game = two_player_game();
        game.add_execution([Execution::SetMultipliers(SetMultipliersExecution::new(
            PlayerId::from("admin_id"),
            PlayerId::from("target_id"),
            Some(Fixed::from_num(-1)),
            Some(Fixed::from_num(3)),
        ))]);

        game.execute_next_tick();

        // First failure aborts the remaining field as well.
        let target = game.player(&PlayerId::from("target_id")).unwrap();
        assert_eq!(target.gold_multiplier(), Fixed::ONE);
        assert_eq!(target.troop_multiplier(), Fixed::ONE);
        assert_eq!(game.active_executions(), 0);
    }

    #[test]
    fn test_set_multipliers_unauthorized() {
        let mut game = two_player_game();
        game.add_execution([Execution::SetMultipliers(SetMultipliersExecution::new(
            PlayerId::from("target_id"),
            PlayerId::from("admin_id"),
            Some(Fixed::from_num(9)),
            Some(Fixed::from_num(9)),
        ))]);

        game.execute_next_tick();

        let admin = game.player(&PlayerId::from("admin_id")).unwrap();
        assert_eq!(admin.gold_multiplier(), Fixed::ONE);
        assert_eq!(admin.troop_multiplier(), Fixed::ONE);
    }

    #[test]
    fn test_resource_growth_applies_on_interval() {
        let mut game = two_player_game();
        game.add_execution([Execution::Spawn(SpawnExecution::new(
            PlayerId::from("target_id"),
            Some(1),
        ))]);
        game.execute_next_tick();

        game.add_execution([Execution::ResourceGrowth(ResourceGrowthExecution::new(
            PlayerId::from("target_id"),
        ))]);

        let interval = game.config().resource_interval_ticks;
        let troops_before = game.player(&PlayerId::from("target_id")).unwrap().troops();
        let gold_before = game.player(&PlayerId::from("target_id")).unwrap().gold();

        // Run through one full interval; growth applies exactly once.
        let start = game.ticks();
        let mut growth_ticks = 0;
        while game.ticks() < start + interval {
            let updates = game.execute_next_tick();
            if !updates.player_updates.is_empty() {
                growth_ticks += 1;
            }
        }

        assert_eq!(growth_ticks, 1);
        let target = game.player(&PlayerId::from("target_id")).unwrap();
        assert!(target.troops() > troops_before);
        assert!(target.gold() > gold_before);
        // Still active: long-running executions survive eviction.
        assert_eq!(game.active_executions(), 1);
    }

    #[test]
    fn test_resource_growth_deactivates_on_death() {
        let mut game = two_player_game();
        game.add_execution([Execution::Spawn(SpawnExecution::new(
            PlayerId::from("target_id"),
            Some(1),
        ))]);
        game.execute_next_tick();

        game.add_execution([Execution::ResourceGrowth(ResourceGrowthExecution::new(
            PlayerId::from("target_id"),
        ))]);
        game.execute_next_tick();
        assert_eq!(game.active_executions(), 1);

        // Eliminate the player; the driver must self-deactivate on the
        // next interval boundary.
        let interval = game.config().resource_interval_ticks;
        game.world_mut()
            .player_mut(&PlayerId::from("target_id"))
            .unwrap()
            .mark_dead();
        for _ in 0..=interval {
            game.execute_next_tick();
        }
        assert_eq!(game.active_executions(), 0);
    }

    #[test]
    fn test_fifo_order_later_sees_earlier_effects() {
        let mut game = two_player_game();
        // Two grants in one tick: the second observes the first's
        // deposit because executions run in submission order.
        game.add_execution([
            Execution::Grant(GrantExecution::gold(
                PlayerId::from("admin_id"),
                PlayerId::from("target_id"),
                Fixed::from_num(100),
            )),
            Execution::Grant(GrantExecution::gold(
                PlayerId::from("admin_id"),
                PlayerId::from("target_id"),
                Fixed::from_num(50),
            )),
        ]);

        game.execute_next_tick();
        assert_eq!(
            game.player(&PlayerId::from("target_id")).unwrap().gold(),
            150
        );
    }

    #[test]
    fn test_failed_execution_does_not_disturb_others() {
        let mut game = two_player_game();
        game.add_execution([
            Execution::Grant(GrantExecution::gold(
                PlayerId::from("ghost"),
                PlayerId::from("target_id"),
                Fixed::from_num(100),
            )),
            Execution::Grant(GrantExecution::gold(
                PlayerId::from("admin_id"),
                PlayerId::from("target_id"),
                Fixed::from_num(75),
            )),
        ]);

        game.execute_next_tick();
        assert_eq!(game.player(&PlayerId::from("target_id")).unwrap().gold(), 75);
    }
}
