//! Headless run and replay loops.
//!
//! A run couples the engine with a bot and the collision shim at a fixed
//! 60 Hz step; the recorded steering bytes plus the seed pin the whole run,
//! so every generated tape is verified by replay before it is handed out.

use anyhow::{anyhow, Context, Result};
use serde::Serialize;
use std::fs;
use std::path::Path;

use fuelrush_core::constants::{FIXED_DT_S, PLAYER_STEER_STEP, REASON_HIT_CAR, REASON_OUT_OF_FUEL};
use fuelrush_core::{deserialize_tape, serialize_tape, DriveGame, SteerInput};

use crate::bots::{create_bot, DriverBot};
use crate::collision;

#[derive(Clone, Debug, Serialize)]
pub struct RunMetrics {
    pub bot_id: String,
    pub seed: u32,
    pub max_ticks: u32,
    pub tick_count: u32,
    pub final_distance: f64,
    pub final_distance_units: u32,
    pub final_rng_state: u32,
    pub final_fuel: f64,
    pub refuels: u32,
    pub steer_ticks: u32,
    pub game_over: bool,
    pub game_over_reason: Option<String>,
}

#[derive(Clone, Debug)]
pub struct RunArtifact {
    pub metrics: RunMetrics,
    pub inputs: Vec<u8>,
    pub tape: Vec<u8>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReplayOutcome {
    pub tick_count: u32,
    pub final_distance_units: u32,
    pub final_rng_state: u32,
    pub game_over: bool,
}

pub fn run_bot(bot_id: &str, seed: u32, max_ticks: u32) -> Result<RunArtifact> {
    let mut bot = create_bot(bot_id).ok_or_else(|| anyhow!("unknown bot '{bot_id}'"))?;
    run_bot_instance(bot.as_mut(), seed, max_ticks)
}

pub fn run_bot_instance(
    bot: &mut dyn DriverBot,
    seed: u32,
    max_ticks: u32,
) -> Result<RunArtifact> {
    if max_ticks == 0 {
        return Err(anyhow!("max_ticks must be > 0"));
    }

    bot.reset(seed);

    let mut game = DriveGame::new(seed);
    game.validate_invariants()
        .map_err(|rule| anyhow!("initial invariant failure: {rule}"))?;

    let mut inputs = Vec::with_capacity(max_ticks as usize);
    let mut refuels = 0u32;
    let mut steer_ticks = 0u32;
    let mut clock = 0.0;

    for _ in 0..max_ticks {
        let snapshot = game.snapshot();
        if snapshot.is_game_over {
            break;
        }

        let steer = bot.steer(&snapshot);
        apply_steer(&mut game, steer);
        inputs.push(steer.to_byte());
        if steer.left || steer.right {
            steer_ticks += 1;
        }

        for (a, b) in collision::detect(&game.snapshot()) {
            game.report_collision(a, b);
        }

        let fuel_before = game.state().fuel;
        clock += FIXED_DT_S;
        game.tick(FIXED_DT_S, clock);
        game.validate_invariants()
            .map_err(|rule| anyhow!("invariant {rule} broken at t={clock:.2}"))?;
        if game.state().fuel > fuel_before {
            refuels += 1;
        }
    }

    let distance = game.state().distance_travelled;
    let distance_units = distance.floor() as u32;
    let tape = serialize_tape(seed, &inputs, distance_units, game.rng_state());

    // A tape that does not replay is worthless; catch it at the source.
    let replayed = replay_inputs(seed, &inputs);
    if replayed.final_rng_state != game.rng_state()
        || replayed.final_distance_units != distance_units
    {
        return Err(anyhow!(
            "generated tape failed replay verification (distance {} vs {}, rng 0x{:08x} vs 0x{:08x})",
            replayed.final_distance_units,
            distance_units,
            replayed.final_rng_state,
            game.rng_state(),
        ));
    }

    Ok(RunArtifact {
        metrics: RunMetrics {
            bot_id: bot.id().to_string(),
            seed,
            max_ticks,
            tick_count: inputs.len() as u32,
            final_distance: distance,
            final_distance_units: distance_units,
            final_rng_state: game.rng_state(),
            final_fuel: game.state().fuel,
            refuels,
            steer_ticks,
            game_over: game.game_over_info().is_some(),
            game_over_reason: game.game_over_info().map(|info| info.reason.clone()),
        },
        inputs,
        tape,
    })
}

/// Re-run a recorded steering sequence. Mirrors the run loop exactly, minus
/// the bot: steering comes from the bytes, collisions from the same shim.
pub fn replay_inputs(seed: u32, inputs: &[u8]) -> ReplayOutcome {
    let mut game = DriveGame::new(seed);
    let mut clock = 0.0;
    let mut ticks = 0u32;

    for &byte in inputs {
        if game.snapshot().is_game_over {
            break;
        }
        apply_steer(&mut game, SteerInput::from_byte(byte));
        for (a, b) in collision::detect(&game.snapshot()) {
            game.report_collision(a, b);
        }
        ticks += 1;
        clock += FIXED_DT_S;
        game.tick(FIXED_DT_S, clock);
    }

    ReplayOutcome {
        tick_count: ticks,
        final_distance_units: game.state().distance_travelled.floor() as u32,
        final_rng_state: game.rng_state(),
        game_over: game.game_over_info().is_some(),
    }
}

/// Deserialize a tape (including CRC), replay it, and check the footer.
pub fn replay_tape_bytes(bytes: &[u8]) -> Result<ReplayOutcome> {
    let tape = deserialize_tape(bytes)?;
    let outcome = replay_inputs(tape.header.seed, &tape.inputs);

    if outcome.final_distance_units != tape.footer.final_distance {
        return Err(anyhow!(
            "distance mismatch: tape={}, replay={}",
            tape.footer.final_distance,
            outcome.final_distance_units
        ));
    }
    if outcome.final_rng_state != tape.footer.final_rng_state {
        return Err(anyhow!(
            "rng mismatch: tape=0x{:08x}, replay=0x{:08x}",
            tape.footer.final_rng_state,
            outcome.final_rng_state
        ));
    }
    Ok(outcome)
}

pub fn write_tape(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed creating directory {}", parent.display()))?;
    }
    fs::write(path, bytes).with_context(|| format!("failed writing {}", path.display()))
}

fn apply_steer(game: &mut DriveGame, steer: SteerInput) {
    if steer.left {
        game.move_player(-PLAYER_STEER_STEP);
    }
    if steer.right {
        game.move_player(PLAYER_STEER_STEP);
    }
}

/// Classify a terminal reason for aggregation.
pub fn is_crash(reason: &str) -> bool {
    reason == REASON_HIT_CAR
}

pub fn is_fuel_out(reason: &str) -> bool {
    reason == REASON_OUT_OF_FUEL
}
