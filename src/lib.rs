//! Tooth Racer - A lane-based arcade runner
//!
//! Core modules:
//! - `sim`: Simulation (lanes, spawning, collisions, power-ups, particles)
//! - `renderer`: Scene painting onto a canvas-like surface
//! - `audio`: Procedural sound effects, engine drone and melody
//! - `engine`: Facade owning the loop lifecycle, input and persistence
//! - `tuning`: Data-driven game balance
//! - `platform`: Browser glue (wasm32 only)

pub mod audio;
pub mod engine;
pub mod error;
pub mod highscore;
pub mod input;
pub mod platform;
pub mod renderer;
pub mod sim;
pub mod tuning;

pub use engine::{Engine, EnginePhase, LoopControl};
pub use error::{EngineError, StorageError};
pub use highscore::{MemoryStore, ScoreStore};
pub use input::Direction;
pub use sim::{Simulation, Snapshot};
pub use tuning::Tuning;

/// Game configuration constants (defaults for [`Tuning`])
pub mod consts {
    /// Number of lanes on the road
    pub const LANE_COUNT: u8 = 4;
    /// Lane the player starts in
    pub const START_LANE: u8 = 1;
    /// Starting (and maximum) health
    pub const MAX_HEALTH: u8 = 3;

    /// Initial road speed
    pub const INITIAL_SPEED: f32 = 5.0;
    /// Seconds between speed increases
    pub const SPEED_RAMP_INTERVAL: f32 = 20.0;
    /// Speed added at each ramp step
    pub const SPEED_RAMP_STEP: f32 = 0.5;
    /// Effective speed factor while slow-motion is active
    pub const SLOW_MO_FACTOR: f32 = 0.5;

    /// Lane interpolation responsiveness (exponential smoothing rate, 1/s)
    pub const LANE_RESPONSIVENESS: f32 = 10.0;

    /// Score per unit of speed per second
    pub const SCORE_RATE: f32 = 10.0;
    /// Score multiplier while double-score is active
    pub const DOUBLE_SCORE_MULTIPLIER: f32 = 2.0;

    /// Spawn interval at speed 0 (seconds)
    pub const BASE_SPAWN_INTERVAL: f32 = 1.5;
    /// Spawn interval reduction per unit of speed
    pub const SPAWN_INTERVAL_PER_SPEED: f32 = 0.05;
    /// Floor for the spawn interval
    pub const MIN_SPAWN_INTERVAL: f32 = 0.2;
    /// Probability that a spawned entity is a hazard
    pub const HAZARD_CHANCE: f64 = 0.8;

    /// Entity travel in pixels per second per unit of effective speed
    pub const ENTITY_SPEED_SCALE: f32 = 100.0;
    /// Spawn height (just above the visible area)
    pub const SPAWN_Y: f32 = -50.0;
    /// Player-to-entity distance that counts as contact
    pub const COLLISION_RADIUS: f32 = 40.0;
    /// Player anchor height above the bottom edge
    pub const PLAYER_OFFSET: f32 = 100.0;
    /// Entities this far below the bottom edge are discarded
    pub const DESPAWN_MARGIN: f32 = 100.0;

    /// Power-up durations (seconds)
    pub const SHIELD_DURATION: f32 = 5.0;
    pub const DOUBLE_SCORE_DURATION: f32 = 10.0;
    pub const SLOW_MO_DURATION: f32 = 5.0;

    /// Particle alpha lost per second
    pub const PARTICLE_FADE_RATE: f32 = 2.0;
    /// Upper bound on live particles
    pub const MAX_PARTICLES: usize = 512;

    /// Raw speed above which the motion-blur streak is drawn
    pub const MOTION_BLUR_SPEED: f32 = 6.0;
    /// Lane dash pattern period (dash + gap)
    pub const DASH_PERIOD: f32 = 100.0;

    /// Longest frame delta fed to the simulation (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;
    /// Minimum horizontal swipe distance
    pub const SWIPE_THRESHOLD: f32 = 30.0;

    /// Melody note spacing (seconds)
    pub const MELODY_INTERVAL: f64 = 0.25;
}

/// Horizontal centre of a (possibly fractional) lane
#[inline]
pub fn lane_x(lane: f32, surface_width: f32, lane_count: u8) -> f32 {
    let lane_width = surface_width / f32::from(lane_count.max(1));
    lane * lane_width + lane_width / 2.0
}
