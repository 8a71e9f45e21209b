//! Speed/fuel economy: drain, max-speed ramp, accel/decel selection,
//! distance integration.

use crate::constants::{
    ACCEL, DECEL, FUEL_CAPACITY, FUEL_USE_PER_SECOND, MAX_SPEED_RAMP,
};
use crate::types::SimulationState;

/// Advance the economy by one tick. Returns true when the empty-tank
/// game-over condition holds: the run was still going but speed had already
/// coasted to zero on an earlier tick. The caller owns the mode transition.
pub fn advance(state: &mut SimulationState, dt: f64) -> bool {
    if !state.running {
        return false;
    }
    if state.speed <= 0.0 {
        return true;
    }

    state.fuel -= FUEL_USE_PER_SECOND * dt;
    if state.fuel <= 0.0 {
        state.fuel = 0.0;
        state.no_fuel = true;
    } else if state.fuel > FUEL_CAPACITY {
        state.fuel = FUEL_CAPACITY;
    }

    // The ceiling creeps up forever; the single difficulty ramp.
    state.max_speed += MAX_SPEED_RAMP * dt;

    let delta = if state.no_fuel { -DECEL * dt } else { ACCEL * dt };
    state.speed = (state.speed + delta).clamp(0.0, state.max_speed);

    if state.speed > 0.0 {
        state.distance_travelled += state.speed * dt;
    }
    false
}

/// Consume a fuel pickup: tank back to full, empty flag cleared.
pub fn refuel(state: &mut SimulationState) {
    state.fuel = FUEL_CAPACITY;
    state.no_fuel = false;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::DEFAULT_MAX_SPEED;

    fn fresh() -> SimulationState {
        SimulationState::initial(0.0)
    }

    #[test]
    fn accelerates_toward_ramping_ceiling() {
        let mut state = fresh();
        advance(&mut state, 1.0);
        assert_eq!(state.speed, (1.0 + ACCEL).min(state.max_speed));

        let mut previous = state.speed;
        for _ in 0..10 {
            advance(&mut state, 1.0);
            assert!(state.speed >= previous);
            assert!(state.speed <= state.max_speed);
            previous = state.speed;
        }
        // Six ticks in, the clamp has kicked in and the ceiling keeps moving.
        assert!(state.max_speed > DEFAULT_MAX_SPEED);
        assert_eq!(state.speed, state.max_speed);
    }

    #[test]
    fn fuel_clamps_at_zero_and_raises_empty_flag() {
        let mut state = fresh();
        state.fuel = FUEL_USE_PER_SECOND * 0.8; // less than one second's worth
        advance(&mut state, 1.0);
        assert_eq!(state.fuel, 0.0);
        assert!(state.no_fuel);
    }

    #[test]
    fn empty_tank_switches_to_deceleration() {
        let mut state = fresh();
        state.fuel = 0.0;
        state.no_fuel = true;
        state.speed = 500.0;
        advance(&mut state, 1.0);
        assert_eq!(state.speed, 500.0 - DECEL);

        // Decelerating all the way clamps at zero, never below.
        for _ in 0..10 {
            advance(&mut state, 1.0);
        }
        assert_eq!(state.speed, 0.0);
    }

    #[test]
    fn stalled_run_reports_game_over_on_the_next_advance() {
        let mut state = fresh();
        state.speed = 0.0;
        let travelled = state.distance_travelled;
        assert!(advance(&mut state, 1.0));
        // Nothing else moves on the reporting tick.
        assert_eq!(state.distance_travelled, travelled);
    }

    #[test]
    fn distance_accumulates_while_moving() {
        let mut state = fresh();
        advance(&mut state, 1.0);
        let first = state.distance_travelled;
        assert!(first > 0.0);
        advance(&mut state, 1.0);
        assert!(state.distance_travelled > first);
    }

    #[test]
    fn stopped_engine_is_inert() {
        let mut state = fresh();
        state.running = false;
        let before = state.clone();
        assert!(!advance(&mut state, 1.0));
        assert_eq!(state, before);
    }

    #[test]
    fn zero_dt_is_a_no_op_on_fuel_and_distance() {
        let mut state = fresh();
        let before = state.clone();
        advance(&mut state, 0.0);
        assert_eq!(state, before);
    }

    #[test]
    fn refuel_restores_capacity_and_clears_flag() {
        let mut state = fresh();
        state.fuel = 0.0;
        state.no_fuel = true;
        refuel(&mut state);
        assert_eq!(state.fuel, FUEL_CAPACITY);
        assert!(!state.no_fuel);
    }
}
