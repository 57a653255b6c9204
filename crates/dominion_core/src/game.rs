//! Core tick scheduler.
//!
//! The [`Game`] advances at a fixed tick rate and processes all queued
//! executions deterministically. This module is the heart of the
//! engine: it owns the authoritative tick counter, the player
//! registry, and the active execution set.
//!
//! # Determinism
//!
//! All operations in this module are fully deterministic:
//! - No floating-point math (multipliers use [`Fixed`])
//! - No system randomness (executions seed [`crate::random::PseudoRandom`]
//!   from the tick counter)
//! - Consistent iteration order (players in join order, executions in
//!   FIFO submission order)
//! - Same ordered inputs always produce the same state and the same
//!   update stream
//!
//! # Example
//!
//! ```
//! use dominion_core::config::GameConfig;
//! use dominion_core::execution::{Execution, SpawnExecution};
//! use dominion_core::game::Game;
//! use dominion_core::player::{PlayerId, PlayerInfo, Role};
//!
//! let mut game = Game::new(GameConfig::default());
//! let info = PlayerInfo::new("p1", "alice", Role::Standard);
//! game.add_player(info.clone()).unwrap();
//!
//! game.add_execution([Execution::Spawn(SpawnExecution::new(info.id.clone(), None))]);
//! let updates = game.execute_next_tick();
//! assert!(game.player(&PlayerId::from("p1")).unwrap().is_alive());
//! assert_eq!(updates.display_events.len(), 1);
//! ```

use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::error::{GameError, Result};
use crate::execution::Execution;
use crate::player::{Player, PlayerId, PlayerInfo, SmallId};

/// Ticks per second for the simulation.
pub const TICK_RATE: u32 = 10;

/// Duration of one tick in milliseconds.
pub const TICK_DURATION_MS: u32 = 1000 / TICK_RATE;

/// Opaque reference to a map tile owned by the external terrain
/// collaborator. The core never interprets it.
pub type TileRef = u64;

/// A change of tile ownership observable this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileUpdate {
    /// The tile that changed hands.
    pub tile: TileRef,
    /// Its new owner.
    pub owner: SmallId,
}

/// Snapshot of one player's state after a tick in which it changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerUpdate {
    /// Compact player index.
    pub small_id: SmallId,
    /// Whether the player is in active play.
    pub alive: bool,
    /// Gold balance after the tick.
    pub gold: u128,
    /// Troop count after the tick.
    pub troops: u64,
}

/// A structural game event for logs and collaborating systems.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A player entered active play.
    PlayerSpawned {
        /// The spawning player.
        player: SmallId,
        /// The tile it spawned on.
        tile: TileRef,
    },
    /// A player was removed from active play.
    PlayerEliminated {
        /// The eliminated player.
        player: SmallId,
    },
}

/// A player-visible notification, distinct from raw state deltas.
///
/// The UI renders these directly (toasts, chat lines, floating
/// indicators). Executions with a silent side-effect policy must not
/// contribute entries here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayEvent {
    /// The player the notification concerns, if any.
    pub player: Option<SmallId>,
    /// Rendered message text.
    pub message: String,
}

/// Ordered per-category update record returned by each tick.
///
/// Categories are fixed and ordered; two identical runs produce
/// identical records tick for tick.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickUpdates {
    /// Tile ownership changes.
    pub tile_updates: Vec<TileUpdate>,
    /// Players whose state changed this tick, in join order.
    pub player_updates: Vec<PlayerUpdate>,
    /// Structural game events.
    pub events: Vec<GameEvent>,
    /// Player-visible display events.
    pub display_events: Vec<DisplayEvent>,
}

impl TickUpdates {
    /// True when no category has entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tile_updates.is_empty()
            && self.player_updates.is_empty()
            && self.events.is_empty()
            && self.display_events.is_empty()
    }
}

/// Authoritative world state: tick counter, configuration and the
/// player registry.
///
/// Executions receive `&World` during initialization and `&mut World`
/// during their tick; the scheduler itself lives in [`Game`] so the
/// execution list and the world can be borrowed independently.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct World {
    tick: u64,
    config: GameConfig,
    players: HashMap<PlayerId, Player>,
    /// Join order; also the reporting order for player updates.
    join_order: Vec<PlayerId>,
    /// Updates accumulated for the in-progress tick.
    #[serde(skip)]
    updates: TickUpdates,
}

impl World {
    fn new(config: GameConfig) -> Self {
        Self {
            tick: 0,
            config,
            players: HashMap::new(),
            join_order: Vec::new(),
            updates: TickUpdates::default(),
        }
    }

    /// Current tick count. The counter starts at 0 and increments once
    /// per completed tick; it never decreases.
    #[must_use]
    pub const fn ticks(&self) -> u64 {
        self.tick
    }

    /// True while the game is in its pre-game setup window.
    #[must_use]
    pub const fn in_spawn_phase(&self) -> bool {
        self.tick < self.config.spawn_phase_ticks
    }

    /// Session configuration.
    #[must_use]
    pub const fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Whether a player with this identity is registered.
    #[must_use]
    pub fn has_player(&self, id: &PlayerId) -> bool {
        self.players.contains_key(id)
    }

    /// Look up a registered player.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::PlayerNotFound`] when the identity is not
    /// registered; call [`has_player`](Self::has_player) first when
    /// absence is expected.
    pub fn player(&self, id: &PlayerId) -> Result<&Player> {
        self.players
            .get(id)
            .ok_or_else(|| GameError::PlayerNotFound(id.clone()))
    }

    /// Mutable lookup of a registered player.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::PlayerNotFound`] when absent.
    pub fn player_mut(&mut self, id: &PlayerId) -> Result<&mut Player> {
        self.players
            .get_mut(id)
            .ok_or_else(|| GameError::PlayerNotFound(id.clone()))
    }

    /// All players in join order.
    pub fn players(&self) -> impl Iterator<Item = &Player> {
        self.join_order.iter().filter_map(|id| self.players.get(id))
    }

    fn add_player(&mut self, info: PlayerInfo) -> Result<()> {
        if self.players.contains_key(&info.id) {
            return Err(GameError::DuplicatePlayer(info.id));
        }
        let small_id = SmallId(self.join_order.len() as u32);
        self.join_order.push(info.id.clone());
        self.players
            .insert(info.id.clone(), Player::new(info, small_id));
        Ok(())
    }

    /// Record a tile ownership change for the current tick.
    pub(crate) fn push_tile_update(&mut self, update: TileUpdate) {
        self.updates.tile_updates.push(update);
    }

    /// Record a structural game event for the current tick.
    pub(crate) fn push_event(&mut self, event: GameEvent) {
        self.updates.events.push(event);
    }

    /// Record a player-visible display event for the current tick.
    pub(crate) fn push_display_event(&mut self, event: DisplayEvent) {
        self.updates.display_events.push(event);
    }

    /// Take the accumulated updates, appending a player update for
    /// every player whose state changed this tick.
    fn drain_updates(&mut self) -> TickUpdates {
        let mut updates = std::mem::take(&mut self.updates);
        for id in &self.join_order {
            if let Some(player) = self.players.get_mut(id) {
                if player.take_dirty() {
                    updates.player_updates.push(PlayerUpdate {
                        small_id: player.small_id(),
                        alive: player.is_alive(),
                        gold: player.gold(),
                        troops: player.troops(),
                    });
                }
            }
        }
        updates
    }

    /// Calculate a hash of the world state.
    ///
    /// Used for desync detection and replay verification. Two worlds
    /// with identical state produce identical hashes.
    #[must_use]
    pub fn state_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.tick.hash(&mut hasher);
        self.join_order.len().hash(&mut hasher);

        for id in &self.join_order {
            if let Some(player) = self.players.get(id) {
                id.as_str().hash(&mut hasher);
                player.small_id().hash(&mut hasher);
                player.is_alive().hash(&mut hasher);
                player.gold().hash(&mut hasher);
                player.troops().hash(&mut hasher);
                player.gold_multiplier().to_bits().hash(&mut hasher);
                player.troop_multiplier().to_bits().hash(&mut hasher);
            }
        }

        hasher.finish()
    }
}

/// The core game simulation.
///
/// Owns the [`World`], the pending queue and the active execution
/// list, and advances everything deterministically one tick at a
/// time. Single-threaded and cooperative: a tick runs to completion
/// synchronously, and player records are only mutated while the tick
/// loop holds control, which replaces any need for locks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Game {
    world: World,
    /// Executions submitted since the last tick, not yet initialized.
    pending: Vec<Execution>,
    /// Initialized executions still reporting active.
    active: Vec<Execution>,
    /// The local participant, when this instance backs a client view.
    my_player: Option<PlayerId>,
}

impl Game {
    /// Create a game at tick 0 with no players.
    #[must_use]
    pub fn new(config: GameConfig) -> Self {
        Self {
            world: World::new(config),
            pending: Vec::new(),
            active: Vec::new(),
            my_player: None,
        }
    }

    /// Read access to the world state.
    #[must_use]
    pub const fn world(&self) -> &World {
        &self.world
    }

    /// Mutable world access for in-crate collaborators. Executions get
    /// the world through the tick loop instead.
    pub(crate) fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Current tick count.
    #[must_use]
    pub const fn ticks(&self) -> u64 {
        self.world.ticks()
    }

    /// True while the game is in its pre-game setup window.
    #[must_use]
    pub const fn in_spawn_phase(&self) -> bool {
        self.world.in_spawn_phase()
    }

    /// Session configuration.
    #[must_use]
    pub const fn config(&self) -> &GameConfig {
        self.world.config()
    }

    /// Register a new player. The player starts pre-spawn.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::DuplicatePlayer`] if the identity is
    /// already registered.
    pub fn add_player(&mut self, info: PlayerInfo) -> Result<()> {
        self.world.add_player(info)
    }

    /// Whether a player with this identity is registered.
    #[must_use]
    pub fn has_player(&self, id: &PlayerId) -> bool {
        self.world.has_player(id)
    }

    /// Look up a registered player.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::PlayerNotFound`] when absent.
    pub fn player(&self, id: &PlayerId) -> Result<&Player> {
        self.world.player(id)
    }

    /// All players in join order.
    pub fn players(&self) -> impl Iterator<Item = &Player> {
        self.world.players()
    }

    /// Bind the local participant for [`my_player`](Self::my_player).
    pub fn set_my_player(&mut self, id: PlayerId) {
        self.my_player = Some(id);
    }

    /// The local participant, if bound and registered.
    #[must_use]
    pub fn my_player(&self) -> Option<&Player> {
        self.my_player
            .as_ref()
            .and_then(|id| self.world.player(id).ok())
    }

    /// Append newly constructed executions to the pending queue.
    ///
    /// No effect until the next tick, when they are initialized and
    /// run in submission order.
    pub fn add_execution(&mut self, executions: impl IntoIterator<Item = Execution>) {
        self.pending.extend(executions);
    }

    /// Number of executions currently active (initialized and not yet
    /// terminal).
    #[must_use]
    pub fn active_executions(&self) -> usize {
        self.active.len()
    }

    /// Advance the simulation by one tick.
    ///
    /// Initializes every execution submitted since the last tick,
    /// ticks all active executions (including just-initialized ones)
    /// in FIFO submission order, evicts executions that are no longer
    /// active, then increments the tick counter. Later executions in
    /// the same tick observe the effects of earlier ones. Returns the
    /// per-category update record describing the observable changes of
    /// this tick.
    pub fn execute_next_tick(&mut self) -> TickUpdates {
        let tick = self.world.tick;

        // 1. Initialize newly submitted executions against current state.
        let mut submitted = std::mem::take(&mut self.pending);
        for execution in &mut submitted {
            execution.init(&self.world, tick);
        }
        self.active.append(&mut submitted);

        // 2. Tick every active execution in submission order. The list
        //    is detached so executions can borrow the world mutably.
        let mut active = std::mem::take(&mut self.active);
        for execution in &mut active {
            execution.tick(&mut self.world);
        }

        // 3. Evict terminal executions.
        active.retain(Execution::is_active);
        self.active = active;

        // 4. Collect observable changes, then advance the counter.
        let updates = self.world.drain_updates();
        self.world.tick += 1;

        #[cfg(debug_assertions)]
        {
            let hash = self.state_hash();
            tracing::debug!(tick = self.world.tick, state_hash = hash, "Game state hash");
        }

        updates
    }

    /// Calculate a hash of the current game state.
    ///
    /// Two games with identical state produce identical hashes.
    #[must_use]
    pub fn state_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.world.state_hash().hash(&mut hasher);
        self.pending.len().hash(&mut hasher);
        self.active.len().hash(&mut hasher);
        hasher.finish()
    }

    /// Serialize the game state for snapshots or replay.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn serialize(&self) -> Result<Vec<u8>> {
        bincode::serialize(self)
            .map_err(|e| GameError::InvalidState(format!("Failed to serialize game: {}", e)))
    }

    /// Deserialize game state from bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if deserialization fails.
    pub fn deserialize(data: &[u8]) -> Result<Self> {
        bincode::deserialize(data)
            .map_err(|e| GameError::InvalidState(format!("Failed to deserialize game: {}", e)))
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new(GameConfig::default())
    }
}
