//! Engine: tick orchestration and the Playing/GameOver state machine.

use serde::Serialize;

use crate::collision::{resolve, Collider};
use crate::constants::{
    CAR_SPAWNRATE_MAX_S, FUEL_CAPACITY, INITIAL_LANE_COOLDOWN_S, PLAYER_MAX_X, PLAYER_MIN_X,
    PLAYER_START_X, PLAYER_Y, REASON_HIT_CAR, REASON_OUT_OF_FUEL, ROAD_WRAP_TOP_Y, ROAD_WRAP_Y,
};
use crate::entities::{Entity, EntityRegistry};
use crate::error::RuleCode;
use crate::lanes::{LaneTrack, SpawnScheduler};
use crate::rng::SeededRng;
use crate::speed;
use crate::types::{
    Effect, EntityId, EntityKind, GameOverInfo, SimulationState, SpawnedEntity, TickResult,
    PLAYER_ID,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum GameMode {
    Playing,
    GameOver,
}

/// Full observable engine state, cloned out for the shell once per tick.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorldSnapshot {
    pub clock: f64,
    pub is_game_over: bool,
    pub player_x: f64,
    pub player_y: f64,
    pub state: SimulationState,
    pub lanes: Vec<LaneTrack>,
    pub vehicles: Vec<Entity>,
    pub pickups: Vec<Entity>,
    pub road: Vec<Entity>,
    pub rng_state: u32,
}

/// The simulation core. One instance owns all mutable game state; the shell
/// drives it synchronously (tick, steering, collision reports, reset) and
/// reconciles against the returned diffs.
pub struct DriveGame {
    rng: SeededRng,
    mode: GameMode,
    state: SimulationState,
    scheduler: SpawnScheduler,
    registry: EntityRegistry,
    player_x: f64,
    clock: f64,
    pending_collisions: Vec<(EntityId, EntityId)>,
    game_over: Option<GameOverInfo>,
}

impl DriveGame {
    pub fn new(seed: u32) -> Self {
        Self {
            rng: SeededRng::new(seed),
            mode: GameMode::Playing,
            state: SimulationState::initial(0.0),
            scheduler: SpawnScheduler::new(),
            registry: EntityRegistry::new(),
            player_x: PLAYER_START_X,
            clock: 0.0,
            pending_collisions: Vec::new(),
            game_over: None,
        }
    }

    /// Run one fixed step. Phase order is load-bearing: economy, spawn
    /// scheduling, entity motion and reaping, road recycling, collision
    /// resolution, then the state-machine transition check.
    pub fn tick(&mut self, dt: f64, total_elapsed: f64) -> TickResult {
        self.clock = total_elapsed;

        if self.mode == GameMode::GameOver {
            self.pending_collisions.clear();
            return TickResult {
                spawned: Vec::new(),
                destroyed: Vec::new(),
                road_updates: Vec::new(),
                state: self.state.clone(),
                game_over: self.game_over.clone(),
            };
        }

        let tank_dry = speed::advance(&mut self.state, dt);

        let mut spawned = Vec::new();
        for command in self
            .scheduler
            .advance(dt, total_elapsed, &mut self.state, &mut self.rng)
        {
            let entity = self.registry.spawn(command.kind, command.lane);
            spawned.push(SpawnedEntity {
                id: entity.id,
                lane: command.lane,
                kind: command.kind,
                x: entity.x,
                y: entity.y,
            });
        }

        self.registry.advance(dt, self.state.speed);
        let destroyed = self.registry.reap();
        let road_updates = self.registry.recycle_road(dt, self.state.speed);

        let mut hit_car = false;
        let reports: Vec<(EntityId, EntityId)> = self.pending_collisions.drain(..).collect();
        for (a, b) in reports {
            match resolve(self.classify(a), self.classify(b)) {
                Effect::GameOver => hit_car = true,
                Effect::Refuel => {
                    speed::refuel(&mut self.state);
                    let pickup = if a == PLAYER_ID { b } else { a };
                    self.registry.deactivate_pickup(pickup);
                }
                Effect::None => {}
            }
        }

        if tank_dry {
            self.enter_game_over(REASON_OUT_OF_FUEL);
        } else if hit_car {
            self.enter_game_over(REASON_HIT_CAR);
        }

        TickResult {
            spawned,
            destroyed,
            road_updates,
            state: self.state.clone(),
            game_over: self.game_over.clone(),
        }
    }

    /// Shift the player's car sideways, clamped to the road. Ignored outside
    /// of Playing.
    pub fn move_player(&mut self, delta_x: f64) {
        if self.mode != GameMode::Playing {
            return;
        }
        self.player_x = (self.player_x + delta_x).clamp(PLAYER_MIN_X, PLAYER_MAX_X);
    }

    /// Queue a shell-detected collision pair for the next tick's resolution
    /// phase. Ignored outside of Playing.
    pub fn report_collision(&mut self, a: EntityId, b: EntityId) {
        if self.mode != GameMode::Playing {
            return;
        }
        self.pending_collisions.push((a, b));
    }

    /// Back to Playing with default state: economy reinitialized, spawned
    /// entities cleared, road segments on their canonical slots, lane
    /// bookkeeping restored. Valid in any mode.
    pub fn reset(&mut self) {
        self.mode = GameMode::Playing;
        self.state = SimulationState::initial(self.clock);
        self.scheduler.reset();
        self.registry.clear_spawned();
        self.registry.reset_road();
        self.player_x = PLAYER_START_X;
        self.pending_collisions.clear();
        self.game_over = None;
    }

    fn enter_game_over(&mut self, reason: &str) {
        self.state.running = false;
        self.mode = GameMode::GameOver;
        self.game_over = Some(GameOverInfo {
            reason: reason.to_string(),
            distance: self.state.distance_travelled,
        });
    }

    fn classify(&self, id: EntityId) -> Collider {
        if id == PLAYER_ID {
            return Collider::Player;
        }
        match self.registry.find(id) {
            Some(entity) => Collider::Entity {
                kind: entity.kind,
                active: entity.active,
            },
            None => Collider::Unknown,
        }
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn game_over_info(&self) -> Option<&GameOverInfo> {
        self.game_over.as_ref()
    }

    pub fn player_x(&self) -> f64 {
        self.player_x
    }

    pub fn rng_state(&self) -> u32 {
        self.rng.state()
    }

    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot {
            clock: self.clock,
            is_game_over: self.mode == GameMode::GameOver,
            player_x: self.player_x,
            player_y: PLAYER_Y,
            state: self.state.clone(),
            lanes: self.scheduler.lanes().to_vec(),
            vehicles: self.registry.vehicles().to_vec(),
            pickups: self.registry.pickups().to_vec(),
            road: self.registry.road().to_vec(),
            rng_state: self.rng.state(),
        }
    }

    /// Check every structural invariant of the live state. The harness calls
    /// this after each tick; a violation is a bug in the engine, not in the
    /// inputs.
    pub fn validate_invariants(&self) -> Result<(), RuleCode> {
        if self.state.running != (self.mode == GameMode::Playing) {
            return Err(RuleCode::ModeRunningConsistency);
        }
        if !(self.state.speed >= 0.0 && self.state.speed <= self.state.max_speed) {
            return Err(RuleCode::SpeedClamp);
        }
        if !(0.0..=FUEL_CAPACITY).contains(&self.state.fuel) {
            return Err(RuleCode::FuelClamp);
        }
        if self.state.no_fuel != (self.state.fuel <= 0.0) {
            return Err(RuleCode::EmptyFlagCoherence);
        }
        if !(PLAYER_MIN_X..=PLAYER_MAX_X).contains(&self.player_x) {
            return Err(RuleCode::PlayerBounds);
        }

        let cooldown_cap = CAR_SPAWNRATE_MAX_S.max(INITIAL_LANE_COOLDOWN_S);
        for lane in self.scheduler.lanes() {
            if lane.cooldown > cooldown_cap || lane.last_spawn_time > self.clock {
                return Err(RuleCode::LaneBookkeeping);
            }
        }

        for entity in self.registry.vehicles() {
            if entity.kind != EntityKind::Vehicle || !entity.active {
                return Err(RuleCode::EntityState);
            }
        }
        for entity in self.registry.pickups() {
            if entity.kind != EntityKind::FuelPickup {
                return Err(RuleCode::EntityState);
            }
        }
        for entity in self
            .registry
            .vehicles()
            .iter()
            .chain(self.registry.pickups())
        {
            if entity.id.0 >= self.registry.id_high_water() {
                return Err(RuleCode::EntityState);
            }
        }

        if self.registry.road().len() != 3 {
            return Err(RuleCode::RoadSegmentBand);
        }
        for segment in self.registry.road() {
            if !(ROAD_WRAP_Y..=ROAD_WRAP_TOP_Y).contains(&segment.y) {
                return Err(RuleCode::RoadSegmentBand);
            }
        }

        Ok(())
    }
}
