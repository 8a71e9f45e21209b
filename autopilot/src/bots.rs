//! Scripted drivers for headless runs.

use fuelrush_core::constants::{LANE_COUNT, LANE_OFFSETS_X, PLAYER_STEER_STEP};
use fuelrush_core::game::WorldSnapshot;
use fuelrush_core::{SeededRng, SteerInput};

/// A deterministic driver: same seed and same snapshots must yield the same
/// steering sequence, or tapes stop replaying.
pub trait DriverBot {
    fn id(&self) -> &'static str;
    fn reset(&mut self, seed: u32);
    fn steer(&mut self, snapshot: &WorldSnapshot) -> SteerInput;
}

pub fn bot_ids() -> Vec<&'static str> {
    vec!["cruiser", "weaver"]
}

pub fn describe_bots() -> Vec<(&'static str, &'static str)> {
    vec![
        ("cruiser", "holds one lane for the whole run"),
        ("weaver", "chases the nearest fuel pickup, dodges oncoming vehicles"),
    ]
}

pub fn create_bot(id: &str) -> Option<Box<dyn DriverBot>> {
    match id {
        "cruiser" => Some(Box::new(Cruiser::default())),
        "weaver" => Some(Box::new(Weaver::default())),
        _ => None,
    }
}

/// Steer one step toward `target_x`, with a dead zone so the car doesn't
/// oscillate around the goal.
fn steer_toward(player_x: f64, target_x: f64) -> SteerInput {
    let dead_zone = PLAYER_STEER_STEP / 2.0;
    SteerInput {
        left: target_x < player_x - dead_zone,
        right: target_x > player_x + dead_zone,
    }
}

/// Picks a lane from the seed and stays on it.
#[derive(Default)]
struct Cruiser {
    target_x: f64,
}

impl DriverBot for Cruiser {
    fn id(&self) -> &'static str {
        "cruiser"
    }

    fn reset(&mut self, seed: u32) {
        let lane = SeededRng::new(seed).next_range(0, LANE_COUNT as i32) as usize;
        self.target_x = LANE_OFFSETS_X[lane];
    }

    fn steer(&mut self, snapshot: &WorldSnapshot) -> SteerInput {
        steer_toward(snapshot.player_x, self.target_x)
    }
}

/// How far ahead of the car a vehicle counts as a threat.
const THREAT_WINDOW_Y: f64 = 520.0;
const THREAT_WINDOW_X: f64 = 150.0;

/// Chases fuel, dodges traffic closing in on its column.
#[derive(Default)]
struct Weaver {
    home_x: f64,
}

impl DriverBot for Weaver {
    fn id(&self) -> &'static str {
        "weaver"
    }

    fn reset(&mut self, seed: u32) {
        let lane = SeededRng::new(seed).next_range(0, LANE_COUNT as i32) as usize;
        self.home_x = LANE_OFFSETS_X[lane];
    }

    fn steer(&mut self, snapshot: &WorldSnapshot) -> SteerInput {
        let (px, py) = (snapshot.player_x, snapshot.player_y);

        // Dodging beats chasing: the closest vehicle bearing down on this
        // column decides the direction.
        let threat = snapshot
            .vehicles
            .iter()
            .filter(|vehicle| {
                vehicle.y > py
                    && vehicle.y - py < THREAT_WINDOW_Y
                    && (vehicle.x - px).abs() < THREAT_WINDOW_X
            })
            .min_by(|a, b| a.y.total_cmp(&b.y));
        if let Some(threat) = threat {
            // Swerve toward the side with more road.
            return if threat.x >= px {
                SteerInput {
                    left: true,
                    right: false,
                }
            } else {
                SteerInput {
                    left: false,
                    right: true,
                }
            };
        }

        let fuel = snapshot
            .pickups
            .iter()
            .filter(|pickup| pickup.active && pickup.y > py)
            .min_by(|a, b| a.y.total_cmp(&b.y));
        if let Some(fuel) = fuel {
            return steer_toward(px, fuel.x);
        }

        steer_toward(px, self.home_x)
    }
}
