//! Collision outcome resolution.
//!
//! Shape-overlap detection happens outside the core; the shell reports pairs
//! of entity ids and this module maps each pair to its state effect. The
//! resolver never mutates anything itself.

use crate::types::{Effect, EntityKind};

/// What a reported id resolved to inside the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collider {
    Player,
    Entity { kind: EntityKind, active: bool },
    /// Id not known to the registry (already reaped, or garbage from the
    /// shell). Contributes nothing to the outcome.
    Unknown,
}

/// Pure mapping from a collision pair to its effect. Obstacle vehicles end
/// the run no matter what they touched; only an *active* pickup touched by
/// the player refuels. Everything else is a no-op.
pub fn resolve(a: Collider, b: Collider) -> Effect {
    if is_vehicle(a) || is_vehicle(b) {
        return Effect::GameOver;
    }
    if (a == Collider::Player && is_active_pickup(b))
        || (b == Collider::Player && is_active_pickup(a))
    {
        return Effect::Refuel;
    }
    Effect::None
}

fn is_vehicle(collider: Collider) -> bool {
    matches!(
        collider,
        Collider::Entity {
            kind: EntityKind::Vehicle,
            ..
        }
    )
}

fn is_active_pickup(collider: Collider) -> bool {
    matches!(
        collider,
        Collider::Entity {
            kind: EntityKind::FuelPickup,
            active: true,
        }
    )
}
