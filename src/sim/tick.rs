//! Variable timestep simulation tick
//!
//! Advances the run by an elapsed-time delta. The caller clamps the delta;
//! the tick itself only guards against negative values.

use glam::Vec2;
use rand::{Rng, RngCore, SeedableRng};
use rand_pcg::Pcg32;

use super::collision;
use super::particles;
use super::spawner;
use super::state::{Entity, GameEvent, GameState, Particle, Snapshot};
use crate::consts::DASH_PERIOD;
use crate::input::Direction;
use crate::lane_x;
use crate::tuning::Tuning;

/// Probability of emitting an exhaust puff per painted frame
const EXHAUST_CHANCE: f64 = 0.5;

/// Live simulation: state, entities, particles and the timers driving them
pub struct Simulation {
    pub tuning: Tuning,
    pub state: GameState,
    pub entities: Vec<Entity>,
    pub particles: Vec<Particle>,
    surface_size: Vec2,
    /// Seconds until the next spawn
    spawn_timer: f32,
    /// Seconds accumulated toward the next speed step
    speed_timer: f32,
    /// Road distance travelled, wrapped to the dash period
    road_scroll: f32,
    rng: Box<dyn RngCore>,
}

impl Simulation {
    /// Create a simulation with an injected random source
    pub fn new(tuning: Tuning, surface_size: Vec2, high_score: f32, rng: Box<dyn RngCore>) -> Self {
        Self {
            state: GameState::new(&tuning, high_score),
            tuning,
            entities: Vec::new(),
            particles: Vec::new(),
            surface_size,
            spawn_timer: 0.0,
            speed_timer: 0.0,
            road_scroll: 0.0,
            rng,
        }
    }

    /// Create a reproducible simulation
    pub fn seeded(tuning: Tuning, surface_size: Vec2, high_score: f32, seed: u64) -> Self {
        Self::new(tuning, surface_size, high_score, Box::new(Pcg32::seed_from_u64(seed)))
    }

    /// Start a fresh run, keeping the best score
    pub fn reset(&mut self) {
        self.state = GameState::new(&self.tuning, self.state.high_score);
        self.entities.clear();
        self.particles.clear();
        self.spawn_timer = 0.0;
        self.speed_timer = 0.0;
        self.road_scroll = 0.0;
    }

    pub fn surface_size(&self) -> Vec2 {
        self.surface_size
    }

    /// Follow a resized drawing surface
    pub fn set_surface_size(&mut self, size: Vec2) {
        self.surface_size = size;
    }

    /// Player anchor on screen (interpolated lane, fixed height)
    pub fn player_pos(&self) -> Vec2 {
        Vec2::new(
            lane_x(self.state.current_lane, self.surface_size.x, self.state.lane_count),
            self.surface_size.y - self.tuning.player_offset,
        )
    }

    pub fn effective_speed(&self) -> f32 {
        self.state.effective_speed(self.tuning.slow_mo_factor)
    }

    pub fn road_scroll(&self) -> f32 {
        self.road_scroll
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            score: self.state.score,
            health: self.state.health,
            effective_speed: self.effective_speed(),
            high_score: self.state.high_score,
            game_over: self.state.is_game_over,
        }
    }

    /// Retarget one lane over. Returns `true` if the target lane changed.
    pub fn steer(&mut self, direction: Direction) -> bool {
        if self.state.is_game_over {
            return false;
        }
        let next = i16::from(self.state.target_lane) + i16::from(direction.offset());
        if next < 0 || next >= i16::from(self.state.lane_count) {
            return false;
        }
        self.state.target_lane = next as u8;
        true
    }

    /// Maybe emit one exhaust puff below the player (called per painted frame)
    pub fn emit_exhaust(&mut self) {
        if self.particles.len() >= self.tuning.max_particles {
            return;
        }
        let player = self.player_pos();
        if self.rng.random_bool(EXHAUST_CHANCE) {
            let puff = particles::exhaust(&mut *self.rng, player);
            self.particles.push(puff);
        }
    }

    /// Advance the run by `dt` seconds
    pub fn tick(&mut self, dt: f32) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if self.state.is_game_over {
            return events;
        }
        let dt = dt.max(0.0);

        // Lane interpolation (exponential smoothing, blend capped to avoid overshoot)
        let blend = (self.tuning.lane_responsiveness * dt).min(1.0);
        let target = f32::from(self.state.target_lane);
        self.state.current_lane += (target - self.state.current_lane) * blend;

        // Speed ramp (step function)
        self.speed_timer += dt;
        if self.speed_timer > self.tuning.speed_ramp_interval {
            self.state.speed += self.tuning.speed_ramp_step;
            self.speed_timer = 0.0;
            log::debug!("Speed up: {}", self.state.speed);
        }

        // Slow-motion affects motion only; scoring uses raw speed
        let effective_speed = self.effective_speed();

        let multiplier = if self.state.power_ups.double_score_active() {
            self.tuning.double_score_multiplier
        } else {
            1.0
        };
        self.state.score += self.state.speed * dt * self.tuning.score_rate * multiplier;

        self.state.power_ups.tick(dt);

        // Spawning
        self.spawn_timer -= dt;
        if self.spawn_timer <= 0.0 {
            let entity = spawner::spawn_one(&mut *self.rng, &self.tuning, self.surface_size.x);
            log::debug!("Spawned {:?} at x={}", entity.kind, entity.pos.x);
            self.entities.push(entity);
            self.spawn_timer = self.tuning.spawn_interval(self.state.speed);
        }

        // Entity motion, contact and despawn
        let fall = effective_speed * self.tuning.entity_speed_scale * dt;
        for entity in &mut self.entities {
            entity.pos.y += fall;
        }

        let player = self.player_pos();
        let screen_centre = self.surface_size / 2.0;
        let despawn_y = self.surface_size.y + self.tuning.despawn_margin;
        let mut i = 0;
        while i < self.entities.len() {
            if self.state.is_game_over {
                break;
            }
            let pos = self.entities[i].pos;
            if collision::in_contact(player, pos, self.tuning.collision_radius) {
                let entity = self.entities.remove(i);
                let before = self.entities.len();
                collision::resolve_contact(
                    &mut *self.rng,
                    &self.tuning,
                    &mut self.state,
                    &mut self.entities,
                    &mut self.particles,
                    &entity,
                    screen_centre,
                    &mut events,
                );
                // Area-clear shifted earlier indices; rescanning is harmless
                if self.entities.len() != before {
                    i = 0;
                }
                continue;
            }
            if pos.y > despawn_y {
                self.entities.remove(i);
                continue;
            }
            i += 1;
        }

        particles::advance(&mut self.particles, dt, self.tuning.particle_fade_rate);

        self.road_scroll =
            (self.road_scroll + effective_speed * self.tuning.entity_speed_scale * dt) % DASH_PERIOD;

        events
    }
}
