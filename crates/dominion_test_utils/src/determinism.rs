//! Determinism testing utilities.
//!
//! Provides a harness for verifying that the game simulation produces
//! identical results given identical inputs.
//!
//! # Testing Strategy
//!
//! Lockstep multiplayer requires the simulation to be 100%
//! deterministic. Sources of non-determinism include:
//!
//! - **Floating-point math**: Different CPUs can produce different
//!   results. We use fixed-point arithmetic via
//!   [`dominion_core::math::Fixed`] throughout.
//!
//! - **HashMap iteration order**: Rust's default hasher is randomized.
//!   Players are always iterated in join order.
//!
//! - **System randomness**: No calls to `rand()` without explicit
//!   seeds. All "random" behavior uses seeded PRNGs.
//!
//! # Test Levels
//!
//! 1. **Unit tests**: Individual execution determinism
//! 2. **Property tests**: Random inputs must still produce
//!    deterministic outputs
//! 3. **Integration tests**: Full game scenarios are reproducible
//! 4. **Parallel tests**: Running N games in parallel all match

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::thread;

use dominion_core::game::Game;

/// Result of a determinism test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeterminismResult {
    /// Whether all runs produced identical results.
    pub is_deterministic: bool,
    /// Hashes from each run.
    pub hashes: Vec<u64>,
    /// Number of ticks simulated.
    pub ticks: u64,
}

impl DeterminismResult {
    /// Get all unique hashes (should be 1 for a deterministic game).
    #[must_use]
    pub fn unique_hashes(&self) -> Vec<u64> {
        let mut unique: Vec<u64> = self.hashes.clone();
        unique.sort_unstable();
        unique.dedup();
        unique
    }

    /// Assert that the game was deterministic, with a detailed error
    /// message.
    ///
    /// # Panics
    ///
    /// Panics if the runs produced different hashes.
    pub fn assert_deterministic(&self) {
        if !self.is_deterministic {
            let unique = self.unique_hashes();
            panic!(
                "Game is non-deterministic!\n\
                 Runs: {}\n\
                 Ticks: {}\n\
                 Unique hashes: {} (expected 1)\n\
                 All hashes: {:?}",
                self.hashes.len(),
                self.ticks,
                unique.len(),
                self.hashes
            );
        }
    }
}

/// Result of parallel game runs.
#[derive(Debug, Clone)]
pub struct ParallelGameResult {
    /// Final state hash from each game.
    pub hashes: Vec<u64>,
    /// Number of ticks each game ran.
    pub ticks: u64,
    /// Number of games run.
    pub num_games: usize,
}

impl ParallelGameResult {
    /// Check if all games produced identical results.
    #[must_use]
    pub fn is_deterministic(&self) -> bool {
        self.hashes.windows(2).all(|w| w[0] == w[1])
    }

    /// Assert all games matched.
    ///
    /// # Panics
    ///
    /// Panics if games produced different hashes.
    pub fn assert_deterministic(&self) {
        if !self.is_deterministic() {
            let mut unique: Vec<u64> = self.hashes.clone();
            unique.sort_unstable();
            unique.dedup();
            panic!(
                "Parallel games diverged!\n\
                 Games: {}\n\
                 Ticks: {}\n\
                 Unique hashes: {}\n\
                 All hashes: {:?}",
                self.num_games,
                self.ticks,
                unique.len(),
                self.hashes
            );
        }
    }
}

/// Run a scenario multiple times and verify determinism.
///
/// # Arguments
///
/// * `runs` - Number of times to run the scenario
/// * `ticks` - Number of ticks to simulate per run
/// * `setup` - Function to create initial state
/// * `step` - Function to advance the state by one tick
/// * `hash` - Function to compute a state hash
///
/// # Example
///
/// ```
/// use dominion_test_utils::determinism::verify_determinism;
/// use dominion_test_utils::fixtures::spawned_game;
///
/// let result = verify_determinism(
///     5,   // Run 5 times
///     100, // 100 ticks each
///     || spawned_game(4),
///     |game| { game.execute_next_tick(); },
///     |game| game.state_hash(),
/// );
/// result.assert_deterministic();
/// ```
pub fn verify_determinism<S, Setup, Step, HashFn>(
    runs: usize,
    ticks: u64,
    setup: Setup,
    step: Step,
    hash: HashFn,
) -> DeterminismResult
where
    Setup: Fn() -> S,
    Step: Fn(&mut S),
    HashFn: Fn(&S) -> u64,
{
    let mut hashes = Vec::with_capacity(runs);

    for _ in 0..runs {
        let mut state = setup();

        for _ in 0..ticks {
            step(&mut state);
        }

        hashes.push(hash(&state));
    }

    let is_deterministic = hashes.windows(2).all(|w| w[0] == w[1]);

    DeterminismResult {
        is_deterministic,
        hashes,
        ticks,
    }
}

/// Simplified determinism verification for the [`Game`] type.
///
/// Runs the game twice with identical setup and verifies the final
/// state hashes match exactly.
pub fn verify_game_determinism<F>(setup_fn: F, num_ticks: u64) -> bool
where
    F: Fn() -> Game,
{
    let result = verify_determinism(
        2,
        num_ticks,
        &setup_fn,
        |game| {
            game.execute_next_tick();
        },
        Game::state_hash,
    );
    result.is_deterministic
}

/// Run N games in parallel and collect final hashes.
///
/// This is useful for catching non-determinism that only manifests
/// under thread scheduling variations, memory layout differences, etc.
pub fn run_parallel_games<F>(setup_fn: F, num_games: usize, num_ticks: u64) -> ParallelGameResult
where
    F: Fn() -> Game + Sync,
{
    let hashes = thread::scope(|s| {
        let handles: Vec<_> = (0..num_games)
            .map(|_| {
                s.spawn(|| {
                    let mut game = setup_fn();
                    for _ in 0..num_ticks {
                        game.execute_next_tick();
                    }
                    game.state_hash()
                })
            })
            .collect();

        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    ParallelGameResult {
        hashes,
        ticks: num_ticks,
        num_games,
    }
}

/// Compare two game runs tick-by-tick, finding the first divergence.
///
/// Useful for debugging non-determinism by finding exactly when the
/// runs start to differ.
///
/// # Returns
///
/// `None` if the runs match, `Some(tick)` if they diverge at that
/// tick.
pub fn find_first_divergence<F>(setup_fn: F, num_ticks: u64) -> Option<u64>
where
    F: Fn() -> Game,
{
    let mut game1 = setup_fn();
    let mut game2 = setup_fn();

    // Check initial state
    if game1.state_hash() != game2.state_hash() {
        return Some(0);
    }

    for tick in 1..=num_ticks {
        game1.execute_next_tick();
        game2.execute_next_tick();

        if game1.state_hash() != game2.state_hash() {
            return Some(tick);
        }
    }

    None
}

/// Verify that a serialization round-trip preserves game state exactly.
///
/// This is critical for snapshots and network synchronization.
pub fn verify_serialization_determinism<F>(setup_fn: F, num_ticks: u64) -> bool
where
    F: Fn() -> Game,
{
    let mut game = setup_fn();

    for _ in 0..num_ticks {
        game.execute_next_tick();
    }

    let hash_before = game.state_hash();

    let Ok(bytes) = game.serialize() else {
        return false;
    };
    let Ok(restored) = Game::deserialize(&bytes) else {
        return false;
    };

    hash_before == restored.state_hash()
}

/// Compute a simple hash for any hashable value.
pub fn compute_hash<T: Hash>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

/// Proptest strategies for determinism testing.
///
/// These strategies generate random but reproducible inputs for
/// property-based testing of game determinism.
pub mod strategies {
    use proptest::prelude::*;

    use dominion_core::execution::{Execution, GrantExecution, SetMultipliersExecution};
    use dominion_core::math::Fixed;
    use dominion_core::player::PlayerId;

    use crate::fixtures::{operator_id, player_id};

    /// Generate a grant amount, including zero, negative and
    /// fractional values.
    pub fn arb_amount() -> impl Strategy<Value = Fixed> {
        (-1_000_000i64..1_000_000i64).prop_map(|n| Fixed::from_num(n) / Fixed::from_num(100))
    }

    /// Generate a strictly positive whole grant amount.
    pub fn arb_positive_amount() -> impl Strategy<Value = Fixed> {
        (1i64..1_000_000i64).prop_map(Fixed::from_num)
    }

    /// Generate a strictly positive multiplier between 0.01 and 10.
    pub fn arb_multiplier() -> impl Strategy<Value = Fixed> {
        (1i64..1000i64).prop_map(|n| Fixed::from_num(n) / Fixed::from_num(100))
    }

    /// Generate a recipient from a fixture game with `players`
    /// standard players.
    pub fn arb_recipient(players: usize) -> impl Strategy<Value = PlayerId> {
        (0..players).prop_map(player_id)
    }

    /// Generate a grant execution targeting a fixture player.
    pub fn arb_grant(players: usize) -> impl Strategy<Value = Execution> {
        (arb_recipient(players), arb_amount(), proptest::bool::ANY).prop_map(
            |(recipient, amount, gold)| {
                if gold {
                    Execution::Grant(GrantExecution::gold(operator_id(), recipient, amount))
                } else {
                    Execution::Grant(GrantExecution::troops(operator_id(), recipient, amount))
                }
            },
        )
    }

    /// Generate a multiplier override targeting a fixture player.
    pub fn arb_set_multipliers(players: usize) -> impl Strategy<Value = Execution> {
        (
            arb_recipient(players),
            proptest::option::of(arb_multiplier()),
            proptest::option::of(arb_multiplier()),
        )
            .prop_map(|(recipient, gold_m, troop_m)| {
                Execution::SetMultipliers(SetMultipliersExecution::new(
                    operator_id(),
                    recipient,
                    gold_m,
                    troop_m,
                ))
            })
    }

    /// Generate any admin execution against a fixture game.
    pub fn arb_admin_execution(players: usize) -> impl Strategy<Value = Execution> {
        prop_oneof![arb_grant(players), arb_set_multipliers(players)]
    }

    /// Generate a sequence of admin executions.
    pub fn arb_execution_sequence(
        players: usize,
        max_len: usize,
    ) -> impl Strategy<Value = Vec<Execution>> {
        proptest::collection::vec(arb_admin_execution(players), 0..max_len)
    }
}
