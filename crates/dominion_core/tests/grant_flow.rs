//! End-to-end tests for the admin grant flow.
//!
//! These drive a full game through registration, spawning, grants and
//! growth, asserting on the update stream a client would observe.

use dominion_core::config::{GameConfig, DOUBLED_TROOP_RATE_NAME};
use dominion_core::execution::{
    Execution, GrantExecution, ResourceGrowthExecution, SetMultipliersExecution, SpawnExecution,
};
use dominion_core::game::Game;
use dominion_core::math::Fixed;
use dominion_core::player::{PlayerId, PlayerInfo, Role};
use dominion_test_utils::determinism::verify_determinism;
use dominion_test_utils::fixtures::{fixed, operator_id, player_id, spawned_game};

#[test]
fn grants_apply_exact_amounts_in_one_tick() {
    let mut game = spawned_game(2);
    let gold_before = game.player(&player_id(0)).unwrap().gold();
    let troops_before = game.player(&player_id(0)).unwrap().troops();

    game.add_execution([
        Execution::Grant(GrantExecution::gold(
            operator_id(),
            player_id(0),
            fixed(5000),
        )),
        Execution::Grant(GrantExecution::troops(
            operator_id(),
            player_id(0),
            fixed(2500),
        )),
    ]);
    let updates = game.execute_next_tick();

    let target = game.player(&player_id(0)).unwrap();
    assert_eq!(target.gold() - gold_before, 5000);
    assert_eq!(target.troops() - troops_before, 2500);

    // The only observable trace is the recipient's player update.
    assert_eq!(updates.player_updates.len(), 1);
    assert_eq!(updates.player_updates[0].gold, target.gold());
    assert_eq!(updates.player_updates[0].troops, target.troops());
    assert!(updates.tile_updates.is_empty());
    assert!(updates.events.is_empty());
    assert!(updates.display_events.is_empty());

    // Both grants completed; nothing stays queued.
    assert_eq!(game.active_executions(), 0);
}

#[test]
fn grants_are_one_shot() {
    let mut game = spawned_game(1);
    game.add_execution([Execution::Grant(GrantExecution::gold(
        operator_id(),
        player_id(0),
        fixed(5000),
    ))]);
    game.execute_next_tick();

    // Many further ticks must not re-apply the grant.
    for _ in 0..50 {
        game.execute_next_tick();
    }
    assert_eq!(game.player(&player_id(0)).unwrap().gold(), 5000);
}

#[test]
fn standard_sender_cannot_grant() {
    let mut game = spawned_game(2);
    game.add_execution([
        Execution::Grant(GrantExecution::gold(player_id(1), player_id(0), fixed(5000))),
        Execution::Grant(GrantExecution::troops(
            player_id(0),
            player_id(0),
            fixed(2500),
        )),
    ]);
    let updates = game.execute_next_tick();

    let target = game.player(&player_id(0)).unwrap();
    assert_eq!(target.gold(), 0);
    assert!(updates.player_updates.is_empty());
    assert_eq!(game.active_executions(), 0);
}

#[test]
fn grant_to_unknown_recipient_changes_nothing() {
    let mut game = spawned_game(2);
    let hash_before = game.state_hash();

    game.add_execution([Execution::Grant(GrantExecution::gold(
        operator_id(),
        PlayerId::from("nobody"),
        fixed(5000),
    ))]);
    let updates = game.execute_next_tick();

    assert!(updates.is_empty());
    // Only the tick counter moved.
    assert_ne!(game.state_hash(), hash_before);
    for player in game.players() {
        assert_eq!(player.gold(), 0);
    }
}

#[test]
fn multiplier_override_shapes_future_growth_only() {
    let mut game = spawned_game(2);
    game.add_execution([
        Execution::Grant(GrantExecution::gold(
            operator_id(),
            player_id(0),
            fixed(1000),
        )),
        Execution::SetMultipliers(SetMultipliersExecution::new(
            operator_id(),
            player_id(0),
            Some(fixed(4)),
            None,
        )),
        Execution::ResourceGrowth(ResourceGrowthExecution::new(player_id(0))),
        Execution::ResourceGrowth(ResourceGrowthExecution::new(player_id(1))),
    ]);
    game.execute_next_tick();

    // Banked gold is untouched by the multiplier.
    assert_eq!(game.player(&player_id(0)).unwrap().gold(), 1000);

    // Run through one growth interval.
    let interval = game.config().resource_interval_ticks;
    for _ in 0..interval {
        game.execute_next_tick();
    }

    let boosted = game.player(&player_id(0)).unwrap().gold() - 1000;
    let ordinary = game.player(&player_id(1)).unwrap().gold();
    assert!(ordinary > 0);
    assert_eq!(boosted, ordinary * 4);
}

#[test]
fn designated_name_doubles_troop_generation() {
    let mut game = Game::new(GameConfig::default());
    game.add_player(PlayerInfo::new("op", "operator", Role::Admin))
        .unwrap();
    game.add_player(PlayerInfo::new("special", DOUBLED_TROOP_RATE_NAME, Role::Standard))
        .unwrap();
    game.add_player(PlayerInfo::new("plain", "SomebodyElse", Role::Standard))
        .unwrap();

    game.add_execution([
        Execution::Spawn(SpawnExecution::new(PlayerId::from("special"), Some(1))),
        Execution::Spawn(SpawnExecution::new(PlayerId::from("plain"), Some(2))),
    ]);
    game.execute_next_tick();

    game.add_execution([
        Execution::ResourceGrowth(ResourceGrowthExecution::new(PlayerId::from("special"))),
        Execution::ResourceGrowth(ResourceGrowthExecution::new(PlayerId::from("plain"))),
    ]);

    let base = game.config().starting_troops;
    let interval = game.config().resource_interval_ticks;
    for _ in 0..=interval {
        game.execute_next_tick();
    }

    let special_gain = game.player(&PlayerId::from("special")).unwrap().troops() - base;
    let plain_gain = game.player(&PlayerId::from("plain")).unwrap().troops() - base;
    assert!(plain_gain > 0);
    assert_eq!(special_gain, plain_gain * 2);
}

#[test]
fn name_match_confers_no_grant_authority() {
    // The designated name is a balance quirk, not a capability.
    let mut game = Game::new(GameConfig::default());
    game.add_player(PlayerInfo::new("op", "operator", Role::Admin))
        .unwrap();
    game.add_player(PlayerInfo::new("special", DOUBLED_TROOP_RATE_NAME, Role::Standard))
        .unwrap();

    game.add_execution([Execution::Grant(GrantExecution::gold(
        PlayerId::from("special"),
        PlayerId::from("special"),
        fixed(1_000_000),
    ))]);
    game.execute_next_tick();

    assert_eq!(game.player(&PlayerId::from("special")).unwrap().gold(), 0);
}

#[test]
fn full_session_is_reproducible() {
    let scenario = || {
        let mut game = spawned_game(3);
        game.add_execution([
            Execution::Grant(GrantExecution::gold(
                operator_id(),
                player_id(0),
                fixed(5000),
            )),
            Execution::Grant(GrantExecution::troops(
                operator_id(),
                player_id(1),
                fixed(2500),
            )),
            Execution::SetMultipliers(SetMultipliersExecution::new(
                operator_id(),
                player_id(2),
                Some(Fixed::from_num(1.5)),
                Some(Fixed::from_num(0.5)),
            )),
            Execution::ResourceGrowth(ResourceGrowthExecution::new(player_id(0))),
            Execution::ResourceGrowth(ResourceGrowthExecution::new(player_id(1))),
            Execution::ResourceGrowth(ResourceGrowthExecution::new(player_id(2))),
        ]);
        game
    };

    let result = verify_determinism(
        3,
        300,
        scenario,
        |game| {
            game.execute_next_tick();
        },
        Game::state_hash,
    );
    result.assert_deterministic();
}
