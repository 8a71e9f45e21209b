//! Gameplay constants. All tuning lives here; nothing is read at runtime.
//!
//! World units are abstract pixels, time is in seconds. The shell is expected
//! to tick at 60 Hz but any non-negative `dt` is legal.

/// Canonical fixed time step for shells that drive the engine at 60 Hz.
pub const FIXED_DT_S: f64 = 1.0 / 60.0;

// Road geometry
pub const LANE_COUNT: usize = 4;
pub const LANE_OFFSETS_X: [f64; LANE_COUNT] = [-340.0, -140.0, 60.0, 280.0];
pub const LEVEL_BOTTOM_Y: f64 = -480.0;
pub const ENTITY_SPAWN_Y: f64 = 1_000.0;
pub const ENTITY_DESPAWN_Y: f64 = LEVEL_BOTTOM_Y - 1_200.0;
pub const ROAD_WRAP_Y: f64 = LEVEL_BOTTOM_Y - 2_000.0;
pub const ROAD_WRAP_TOP_Y: f64 = 2_000.0;
pub const ROAD_SEGMENT_SLOTS_Y: [f64; 3] = [-1_600.0, 0.0, 1_600.0];

// Player car
pub const PLAYER_MIN_X: f64 = -400.0;
pub const PLAYER_MAX_X: f64 = 340.0;
pub const PLAYER_START_X: f64 = 60.0;
pub const PLAYER_Y: f64 = -350.0;
/// Lateral displacement applied per held steering tick.
pub const PLAYER_STEER_STEP: f64 = 10.0;

// Spawn scheduling (seconds)
pub const CAR_SPAWNRATE_MIN_S: f64 = 1.0;
pub const CAR_SPAWNRATE_MAX_S: f64 = 3.0;
pub const CAR_ADJACENT_LANE_COOLDOWN_S: f64 = 2.0;
pub const INITIAL_LANE_COOLDOWN_S: f64 = 1.5;
pub const FUEL_SPAWNRATE_MIN_S: f64 = 4.0;
pub const FUEL_SPAWNRATE_MAX_S: f64 = 10.0;

// Speed and fuel economy
pub const DEFAULT_SPEED: f64 = 1.0;
pub const DEFAULT_MAX_SPEED: f64 = 950.0;
pub const ACCEL: f64 = 150.0; // units/s^2 while fuel remains
pub const DECEL: f64 = 220.0; // units/s^2 once the tank is dry
pub const MAX_SPEED_RAMP: f64 = 2.0; // max_speed climb per second
pub const CAR_NPC_SPEED: f64 = 250.0; // cruising speed of obstacle vehicles
pub const FUEL_CAPACITY: f64 = 100.0;
pub const FUEL_USE_PER_SECOND: f64 = 0.25;

// Game-over reasons surfaced to the shell
pub const REASON_OUT_OF_FUEL: &str = "ran out of fuel";
pub const REASON_HIT_CAR: &str = "hit a car";
