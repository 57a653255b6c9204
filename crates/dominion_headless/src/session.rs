//! Scripted session construction and recording.
//!
//! A scripted session registers an operator plus a number of standard
//! players, spawns everyone during the setup window, attaches growth
//! drivers, and sprinkles deterministic admin grants through the run.
//! Every submission is recorded so the session can be replayed and
//! verified.

use dominion_core::config::GameConfig;
use dominion_core::error::Result;
use dominion_core::execution::{
    Execution, GrantExecution, ResourceGrowthExecution, SpawnExecution,
};
use dominion_core::game::Game;
use dominion_core::math::Fixed;
use dominion_core::player::{PlayerId, PlayerInfo, Role};
use dominion_core::random::PseudoRandom;
use dominion_core::replay::Replay;

/// Parameters for a scripted session.
#[derive(Debug, Clone)]
pub struct SessionParams {
    /// Number of standard players.
    pub players: u32,
    /// Ticks to run.
    pub ticks: u64,
    /// Seed for the grant script.
    pub seed: u64,
}

impl Default for SessionParams {
    fn default() -> Self {
        Self {
            players: 4,
            ticks: 600,
            seed: 0,
        }
    }
}

/// Outcome of a scripted session run.
#[derive(Debug)]
pub struct SessionOutcome {
    /// Final game state.
    pub game: Game,
    /// Finalized replay of the run.
    pub replay: Replay,
}

fn operator() -> PlayerId {
    PlayerId::from("operator")
}

fn standard(n: u32) -> PlayerId {
    PlayerId::new(format!("player_{n}"))
}

/// Run a scripted session and record it.
///
/// The same parameters always produce the same final state and hash.
///
/// # Errors
///
/// Returns an error if registration or replay serialization fails.
pub fn run_session(params: &SessionParams) -> Result<SessionOutcome> {
    let mut game = Game::new(GameConfig::default());
    game.add_player(PlayerInfo::new(operator(), "operator", Role::Admin))?;
    for n in 0..params.players {
        game.add_player(PlayerInfo::new(
            standard(n),
            format!("player_{n}"),
            Role::Standard,
        ))?;
    }

    let mut replay = Replay::new("scripted", params.seed, &game)?;
    let mut script = PseudoRandom::new(params.seed);

    // Spawn everyone and attach growth drivers on the first tick.
    let mut opening: Vec<Execution> = Vec::new();
    for n in 0..params.players {
        opening.push(Execution::Spawn(SpawnExecution::new(standard(n), None)));
        opening.push(Execution::ResourceGrowth(ResourceGrowthExecution::new(
            standard(n),
        )));
    }
    submit(&mut game, &mut replay, opening);

    while game.ticks() < params.ticks {
        // Roughly one grant per 50 ticks, to a random recipient.
        if params.players > 0 && script.chance(1, 50) {
            let recipient = standard(script.next_u32() % params.players);
            let amount = Fixed::from_num(script.gen_range_u64(1..10_000));
            let grant = if script.chance(1, 2) {
                GrantExecution::gold(operator(), recipient, amount)
            } else {
                GrantExecution::troops(operator(), recipient, amount)
            };
            submit(&mut game, &mut replay, [Execution::Grant(grant)]);
        }

        game.execute_next_tick();
    }

    replay.finalize(game.ticks(), game.state_hash());
    tracing::info!(
        ticks = game.ticks(),
        players = params.players,
        submissions = replay.submission_count(),
        final_hash = replay.final_hash,
        "session complete"
    );

    Ok(SessionOutcome { game, replay })
}

fn submit(
    game: &mut Game,
    replay: &mut Replay,
    executions: impl IntoIterator<Item = Execution>,
) {
    let tick = game.ticks();
    for execution in executions {
        replay.record_submission(tick, execution.clone());
        game.add_execution([execution]);
    }
}
