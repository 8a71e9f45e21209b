//! Shared data model for the simulation core.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_MAX_SPEED, DEFAULT_SPEED, FUEL_CAPACITY, FUEL_SPAWNRATE_MAX_S};

/// Identifier for a simulation entity. Id 0 is the player's car; road
/// segments take the next three; everything spawned afterwards counts up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u32);

pub const PLAYER_ID: EntityId = EntityId(0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    Vehicle,
    FuelPickup,
    RoadSegment,
}

/// One scheduler decision: put `kind` on `lane` this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnCommand {
    pub lane: usize,
    pub kind: EntityKind,
}

/// A spawn as executed by the registry, carrying the assigned id and start
/// position so the shell can create its matching presentation object.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnedEntity {
    pub id: EntityId,
    pub lane: usize,
    pub kind: EntityKind,
    pub x: f64,
    pub y: f64,
}

/// Outcome of resolving one reported collision pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    None,
    Refuel,
    GameOver,
}

/// Mutable per-run state, advanced every tick and rebuilt by reset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationState {
    pub running: bool,
    pub speed: f64,
    pub max_speed: f64,
    pub fuel: f64,
    pub distance_travelled: f64,
    pub no_fuel: bool,
    pub next_fuel_drop_time: f64,
}

impl SimulationState {
    /// Defaults at session start or after a reset issued at absolute time
    /// `now`. The first fuel drop is pinned at the widest interval so two
    /// back-to-back resets produce identical state.
    pub fn initial(now: f64) -> Self {
        Self {
            running: true,
            speed: DEFAULT_SPEED,
            max_speed: DEFAULT_MAX_SPEED,
            fuel: FUEL_CAPACITY,
            distance_travelled: 0.0,
            no_fuel: false,
            next_fuel_drop_time: now + FUEL_SPAWNRATE_MAX_S,
        }
    }
}

/// Terminal outcome handed to the shell for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameOverInfo {
    pub reason: String,
    pub distance: f64,
}

/// Road segment reposition emitted on the tick diff.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoadUpdate {
    pub id: EntityId,
    pub x: f64,
    pub y: f64,
}

/// Per-tick diff the shell reconciles its own objects against.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TickResult {
    pub spawned: Vec<SpawnedEntity>,
    pub destroyed: Vec<EntityId>,
    pub road_updates: Vec<RoadUpdate>,
    pub state: SimulationState,
    pub game_over: Option<GameOverInfo>,
}

/// Steering held during one tick, packed as the low 2 bits of a tape byte.
/// Upper bits are reserved and must be zero on the wire.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SteerInput {
    pub left: bool,
    pub right: bool,
}

impl SteerInput {
    /// Decode from a tape byte (bit 0 = left, bit 1 = right).
    pub fn from_byte(byte: u8) -> Self {
        Self {
            left: byte & 0x01 != 0,
            right: byte & 0x02 != 0,
        }
    }

    /// Encode to a tape byte.
    pub fn to_byte(self) -> u8 {
        (if self.left { 0x01 } else { 0 }) | (if self.right { 0x02 } else { 0 })
    }
}
