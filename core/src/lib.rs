//! fuelrush-core - deterministic simulation core of an endless-lane driving
//! game.
//!
//! The engine is headless: rendering, asset loading, HUD, camera, raw input
//! polling, and collision *detection* all live in the consuming shell. The
//! core consumes a fixed-step tick, steering commands, and collision-pair
//! reports, and emits a per-tick diff (spawns, despawns, road repositions)
//! the shell reconciles its own objects against.

pub mod collision;
pub mod constants;
pub mod entities;
pub mod error;
pub mod game;
pub mod lanes;
pub mod rng;
pub mod speed;
pub mod tape;
pub mod types;

pub use error::{RuleCode, TapeError};
pub use game::{DriveGame, GameMode, WorldSnapshot};
pub use rng::SeededRng;
pub use tape::{deserialize_tape, parse_tape, serialize_tape, Tape};
pub use types::{
    Effect, EntityId, EntityKind, GameOverInfo, SimulationState, SpawnCommand, SteerInput,
    TickResult, PLAYER_ID,
};
