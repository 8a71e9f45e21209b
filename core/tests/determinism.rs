//! Integration tests: a run is fully pinned by its seed and input sequence.

use fuelrush_core::constants::{FIXED_DT_S, PLAYER_STEER_STEP};
use fuelrush_core::{DriveGame, SeededRng, SteerInput, PLAYER_ID};

/// Deterministic pseudo-random steering stream, independent of the engine's
/// own generator.
fn steering_stream(seed: u32, ticks: usize) -> Vec<SteerInput> {
    let mut rng = SeededRng::new(seed);
    (0..ticks)
        .map(|_| SteerInput::from_byte((rng.next() % 4) as u8))
        .collect()
}

fn drive(game: &mut DriveGame, inputs: &[SteerInput]) {
    let mut clock = 0.0;
    for input in inputs {
        if input.left {
            game.move_player(-PLAYER_STEER_STEP);
        }
        if input.right {
            game.move_player(PLAYER_STEER_STEP);
        }
        clock += FIXED_DT_S;
        game.tick(FIXED_DT_S, clock);
    }
}

#[test]
fn same_seed_same_inputs_same_world() {
    let inputs = steering_stream(0x5EED, 3_000);

    let mut a = DriveGame::new(0xA57E0001);
    let mut b = DriveGame::new(0xA57E0001);

    let mut clock = 0.0;
    for input in &inputs {
        for game in [&mut a, &mut b] {
            if input.left {
                game.move_player(-PLAYER_STEER_STEP);
            }
            if input.right {
                game.move_player(PLAYER_STEER_STEP);
            }
        }
        clock += FIXED_DT_S;
        let result_a = a.tick(FIXED_DT_S, clock);
        let result_b = b.tick(FIXED_DT_S, clock);
        assert_eq!(result_a, result_b);
    }
    assert_eq!(a.snapshot(), b.snapshot());
    assert_eq!(a.rng_state(), b.rng_state());
}

#[test]
fn different_seeds_diverge() {
    let inputs = steering_stream(0x5EED, 1_200);

    let mut a = DriveGame::new(1);
    let mut b = DriveGame::new(2);
    drive(&mut a, &inputs);
    drive(&mut b, &inputs);

    assert_ne!(a.rng_state(), b.rng_state());
    assert_ne!(a.snapshot(), b.snapshot());
}

#[test]
fn invariants_hold_across_long_random_run() {
    let inputs = steering_stream(0xF00D, 18_000); // five simulated minutes

    let mut game = DriveGame::new(0xC0FFEE);
    let mut clock = 0.0;
    for input in &inputs {
        if input.left {
            game.move_player(-PLAYER_STEER_STEP);
        }
        if input.right {
            game.move_player(PLAYER_STEER_STEP);
        }
        clock += FIXED_DT_S;
        let result = game.tick(FIXED_DT_S, clock);

        game.validate_invariants()
            .unwrap_or_else(|rule| panic!("invariant {rule} broken at t={clock:.2}"));
        assert!(result.state.speed >= 0.0 && result.state.speed <= result.state.max_speed);
        assert!(result.state.fuel >= 0.0 && result.state.fuel <= 100.0);
    }
}

#[test]
fn collision_reports_replay_identically() {
    // Two identical games fed the same scripted collision: both runs must
    // end on the same tick with the same terminal info.
    let mut a = DriveGame::new(0xDECADE);
    let mut b = DriveGame::new(0xDECADE);

    let mut clock = 0.0;
    let mut crashed_id = None;
    for _ in 0..6_000 {
        clock += FIXED_DT_S;
        let result_a = a.tick(FIXED_DT_S, clock);
        let result_b = b.tick(FIXED_DT_S, clock);
        assert_eq!(result_a, result_b);

        if crashed_id.is_none() {
            if let Some(spawned) = result_a.spawned.first() {
                crashed_id = Some(spawned.id);
                a.report_collision(PLAYER_ID, spawned.id);
                b.report_collision(PLAYER_ID, spawned.id);
            }
        }
    }
    assert!(a.snapshot().is_game_over || crashed_id.is_none());
    assert_eq!(a.game_over_info(), b.game_over_info());
    assert_eq!(a.snapshot(), b.snapshot());
}

#[test]
fn snapshot_serializes_for_the_shell() {
    let mut game = DriveGame::new(5);
    game.tick(FIXED_DT_S, FIXED_DT_S);
    let encoded = serde_json::to_string(&game.snapshot()).unwrap();
    assert!(encoded.contains("\"fuel\""));
    assert!(encoded.contains("\"player_x\""));
    assert!(encoded.contains("\"road\""));
}

#[test]
fn reset_produces_a_fresh_run_with_the_same_engine() {
    let inputs = steering_stream(0x5EED, 600);

    let mut game = DriveGame::new(0xAB);
    drive(&mut game, &inputs);
    let travelled = game.state().distance_travelled;
    assert!(travelled > 0.0);

    game.reset();
    assert_eq!(game.state().distance_travelled, 0.0);
    assert!(game.state().running);
    game.validate_invariants().unwrap();

    // The engine keeps ticking after reset; clock keeps increasing.
    let mut clock = 600.0 * FIXED_DT_S;
    for _ in 0..600 {
        clock += FIXED_DT_S;
        game.tick(FIXED_DT_S, clock);
        game.validate_invariants().unwrap();
    }
    assert!(game.state().distance_travelled > 0.0);
}
