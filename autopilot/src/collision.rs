//! Shape-overlap detection.
//!
//! The engine never detects collisions itself; the shell owns the hitboxes.
//! This shim checks the player's car against every live vehicle and pickup
//! and produces the id pairs the engine's resolver consumes.

use fuelrush_core::game::WorldSnapshot;
use fuelrush_core::{EntityId, PLAYER_ID};

// Hitbox half-extents, sized to the presentation sprites.
const PLAYER_HALF_W: f64 = 60.0;
const PLAYER_HALF_H: f64 = 110.0;
const VEHICLE_HALF_W: f64 = 60.0;
const VEHICLE_HALF_H: f64 = 110.0;
const PICKUP_HALF_W: f64 = 40.0;
const PICKUP_HALF_H: f64 = 40.0;

fn overlaps(ax: f64, ay: f64, aw: f64, ah: f64, bx: f64, by: f64, bw: f64, bh: f64) -> bool {
    (ax - bx).abs() <= aw + bw && (ay - by).abs() <= ah + bh
}

/// All player-involved overlap pairs in the given world state.
pub fn detect(snapshot: &WorldSnapshot) -> Vec<(EntityId, EntityId)> {
    let mut pairs = Vec::new();
    let (px, py) = (snapshot.player_x, snapshot.player_y);

    for vehicle in &snapshot.vehicles {
        if overlaps(
            px,
            py,
            PLAYER_HALF_W,
            PLAYER_HALF_H,
            vehicle.x,
            vehicle.y,
            VEHICLE_HALF_W,
            VEHICLE_HALF_H,
        ) {
            pairs.push((PLAYER_ID, vehicle.id));
        }
    }

    for pickup in snapshot.pickups.iter().filter(|pickup| pickup.active) {
        if overlaps(
            px,
            py,
            PLAYER_HALF_W,
            PLAYER_HALF_H,
            pickup.x,
            pickup.y,
            PICKUP_HALF_W,
            PICKUP_HALF_H,
        ) {
            pairs.push((PLAYER_ID, pickup.id));
        }
    }

    pairs
}
