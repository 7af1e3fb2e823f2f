//! Data-driven game balance
//!
//! Every constant the simulation, renderer and input path read lives here.
//! Defaults come from [`crate::consts`]; a host may override any subset with
//! a JSON document.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::EngineError;

/// Tunable balance values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Road ===
    pub lane_count: u8,
    pub start_lane: u8,
    pub max_health: u8,

    // === Speed ===
    pub initial_speed: f32,
    pub speed_ramp_interval: f32,
    pub speed_ramp_step: f32,
    pub slow_mo_factor: f32,
    pub lane_responsiveness: f32,

    // === Scoring ===
    pub score_rate: f32,
    pub double_score_multiplier: f32,

    // === Spawning ===
    pub base_spawn_interval: f32,
    pub spawn_interval_per_speed: f32,
    pub min_spawn_interval: f32,
    pub hazard_chance: f64,

    // === Entities ===
    pub entity_speed_scale: f32,
    pub spawn_y: f32,
    pub collision_radius: f32,
    pub player_offset: f32,
    pub despawn_margin: f32,

    // === Power-ups ===
    pub shield_duration: f32,
    pub double_score_duration: f32,
    pub slow_mo_duration: f32,

    // === Effects ===
    pub particle_fade_rate: f32,
    pub max_particles: usize,
    pub motion_blur_speed: f32,

    // === Host ===
    pub max_frame_dt: f32,
    pub swipe_threshold: f32,
    pub melody_interval: f64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            lane_count: LANE_COUNT,
            start_lane: START_LANE,
            max_health: MAX_HEALTH,

            initial_speed: INITIAL_SPEED,
            speed_ramp_interval: SPEED_RAMP_INTERVAL,
            speed_ramp_step: SPEED_RAMP_STEP,
            slow_mo_factor: SLOW_MO_FACTOR,
            lane_responsiveness: LANE_RESPONSIVENESS,

            score_rate: SCORE_RATE,
            double_score_multiplier: DOUBLE_SCORE_MULTIPLIER,

            base_spawn_interval: BASE_SPAWN_INTERVAL,
            spawn_interval_per_speed: SPAWN_INTERVAL_PER_SPEED,
            min_spawn_interval: MIN_SPAWN_INTERVAL,
            hazard_chance: HAZARD_CHANCE,

            entity_speed_scale: ENTITY_SPEED_SCALE,
            spawn_y: SPAWN_Y,
            collision_radius: COLLISION_RADIUS,
            player_offset: PLAYER_OFFSET,
            despawn_margin: DESPAWN_MARGIN,

            shield_duration: SHIELD_DURATION,
            double_score_duration: DOUBLE_SCORE_DURATION,
            slow_mo_duration: SLOW_MO_DURATION,

            particle_fade_rate: PARTICLE_FADE_RATE,
            max_particles: MAX_PARTICLES,
            motion_blur_speed: MOTION_BLUR_SPEED,

            max_frame_dt: MAX_FRAME_DT,
            swipe_threshold: SWIPE_THRESHOLD,
            melody_interval: MELODY_INTERVAL,
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) JSON override on top of the defaults
    pub fn from_json(json: &str) -> Result<Self, EngineError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), EngineError> {
        let fail = |msg: &str| Err(EngineError::InvalidTuning(msg.to_string()));
        let positive = |v: f32| v.is_finite() && v > 0.0;

        if self.lane_count == 0 {
            return fail("lane_count must be at least 1");
        }
        if self.start_lane >= self.lane_count {
            return fail("start_lane must be below lane_count");
        }
        if !(1..=MAX_HEALTH).contains(&self.max_health) {
            return fail("max_health must be within [1, 3]");
        }
        if !(0.0..=1.0).contains(&self.hazard_chance) {
            return fail("hazard_chance must be within [0, 1]");
        }
        if !positive(self.min_spawn_interval) {
            return fail("min_spawn_interval must be positive");
        }
        if !positive(self.speed_ramp_interval) {
            return fail("speed_ramp_interval must be positive");
        }
        if !positive(self.max_frame_dt) {
            return fail("max_frame_dt must be positive");
        }
        if !(self.melody_interval.is_finite() && self.melody_interval > 0.0) {
            return fail("melody_interval must be positive");
        }
        if !positive(self.lane_responsiveness) {
            return fail("lane_responsiveness must be positive");
        }
        // Entities must always reach the despawn line
        if !positive(self.initial_speed) || !positive(self.entity_speed_scale) {
            return fail("initial_speed and entity_speed_scale must be positive");
        }
        if !(self.speed_ramp_step.is_finite() && self.speed_ramp_step >= 0.0) {
            return fail("speed_ramp_step must not be negative");
        }
        if !positive(self.slow_mo_factor) || self.slow_mo_factor > 1.0 {
            return fail("slow_mo_factor must be within (0, 1]");
        }
        if !positive(self.shield_duration)
            || !positive(self.double_score_duration)
            || !positive(self.slow_mo_duration)
        {
            return fail("power-up durations must be positive");
        }
        Ok(())
    }

    /// Seconds until the next spawn at the given raw speed
    pub fn spawn_interval(&self, speed: f32) -> f32 {
        (self.base_spawn_interval - speed * self.spawn_interval_per_speed)
            .max(self.min_spawn_interval)
    }
}
