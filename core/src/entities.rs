//! Entity lifecycle: spawn, relative motion, reaping, road recycling.

use serde::{Deserialize, Serialize};

use crate::constants::{
    CAR_NPC_SPEED, ENTITY_DESPAWN_Y, ENTITY_SPAWN_Y, LANE_OFFSETS_X, ROAD_SEGMENT_SLOTS_Y,
    ROAD_WRAP_TOP_Y, ROAD_WRAP_Y,
};
use crate::types::{EntityId, EntityKind, RoadUpdate};

/// A live simulation entity. `active == false` marks a fuel pickup that has
/// been consumed and is waiting out its one-tick removal grace, mirroring a
/// pending-destroy signal to the shell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub kind: EntityKind,
    pub lane: usize,
    pub x: f64,
    pub y: f64,
    pub active: bool,
}

/// Authoritative owner of every spawned entity plus the three infinitely
/// recycled road segments.
#[derive(Debug, Clone)]
pub struct EntityRegistry {
    next_id: u32,
    vehicles: Vec<Entity>,
    pickups: Vec<Entity>,
    road: [Entity; 3],
}

const ROAD_SEGMENT_COUNT: usize = ROAD_SEGMENT_SLOTS_Y.len();

fn road_segment(slot: usize) -> Entity {
    Entity {
        id: EntityId(1 + slot as u32),
        kind: EntityKind::RoadSegment,
        lane: 0,
        x: 0.0,
        y: ROAD_SEGMENT_SLOTS_Y[slot],
        active: true,
    }
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self {
            // Ids: 0 is the player, 1..=3 the road segments.
            next_id: 1 + ROAD_SEGMENT_COUNT as u32,
            vehicles: Vec::new(),
            pickups: Vec::new(),
            road: [road_segment(0), road_segment(1), road_segment(2)],
        }
    }

    /// Create a vehicle or fuel pickup at the top of the given lane.
    pub fn spawn(&mut self, kind: EntityKind, lane: usize) -> Entity {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        let entity = Entity {
            id,
            kind,
            lane,
            x: LANE_OFFSETS_X[lane],
            y: ENTITY_SPAWN_Y,
            active: true,
        };
        match kind {
            EntityKind::Vehicle => self.vehicles.push(entity),
            EntityKind::FuelPickup => self.pickups.push(entity),
            // Road segments are created once and recycled, never spawned.
            EntityKind::RoadSegment => {}
        }
        entity
    }

    /// Scroll vehicles and pickups relative to the current game speed.
    /// Vehicles cruise at their own fixed speed, so their apparent velocity
    /// is the difference; they drift upward when the player is slower.
    pub fn advance(&mut self, dt: f64, speed: f64) {
        let vehicle_fall = (speed - CAR_NPC_SPEED) * dt;
        for vehicle in &mut self.vehicles {
            vehicle.y -= vehicle_fall;
        }
        let pickup_fall = speed * dt;
        for pickup in &mut self.pickups {
            pickup.y -= pickup_fall;
        }
    }

    /// Scroll the road band and wrap segments that fell out the bottom back
    /// to the top. Returns every segment's position for the tick diff.
    pub fn recycle_road(&mut self, dt: f64, speed: f64) -> Vec<RoadUpdate> {
        for segment in &mut self.road {
            segment.y -= speed * dt;
            if segment.y < ROAD_WRAP_Y {
                segment.y = ROAD_WRAP_TOP_Y;
            }
        }
        self.road
            .iter()
            .map(|segment| RoadUpdate {
                id: segment.id,
                x: segment.x,
                y: segment.y,
            })
            .collect()
    }

    /// Remove everything that scrolled below the despawn line, plus pickups
    /// consumed on an earlier tick. Returns the removed ids.
    pub fn reap(&mut self) -> Vec<EntityId> {
        let mut removed = Vec::new();
        self.vehicles.retain(|vehicle| {
            if vehicle.y < ENTITY_DESPAWN_Y {
                removed.push(vehicle.id);
                false
            } else {
                true
            }
        });
        self.pickups.retain(|pickup| {
            if pickup.y < ENTITY_DESPAWN_Y || !pickup.active {
                removed.push(pickup.id);
                false
            } else {
                true
            }
        });
        removed
    }

    pub fn find(&self, id: EntityId) -> Option<&Entity> {
        self.vehicles
            .iter()
            .chain(self.pickups.iter())
            .chain(self.road.iter())
            .find(|entity| entity.id == id)
    }

    /// Flag a consumed pickup; it stays findable (inactive) until the next
    /// reap pass.
    pub fn deactivate_pickup(&mut self, id: EntityId) {
        if let Some(pickup) = self.pickups.iter_mut().find(|pickup| pickup.id == id) {
            pickup.active = false;
        }
    }

    /// Drop all vehicles and pickups (reset path). Road segments survive.
    pub fn clear_spawned(&mut self) {
        self.vehicles.clear();
        self.pickups.clear();
    }

    /// Put the road segments back on their canonical slots (reset path).
    pub fn reset_road(&mut self) {
        self.road = [road_segment(0), road_segment(1), road_segment(2)];
    }

    pub fn vehicles(&self) -> &[Entity] {
        &self.vehicles
    }

    pub fn pickups(&self) -> &[Entity] {
        &self.pickups
    }

    pub fn road(&self) -> &[Entity] {
        &self.road
    }

    pub(crate) fn id_high_water(&self) -> u32 {
        self.next_id
    }
}

impl Default for EntityRegistry {
    fn default() -> Self {
        Self::new()
    }
}
