//! Simulation module
//!
//! All gameplay logic lives here. No rendering, audio or platform
//! dependencies: the tick reports what happened as [`GameEvent`]s and the
//! engine turns those into sounds and persistence.

pub mod autopilot;
pub mod collision;
pub mod particles;
pub mod spawner;
pub mod state;
pub mod tick;

pub use collision::{clear_hazards, grant_power_up, in_contact, resolve_contact};
pub use state::{
    Entity, EntityKind, GameEvent, GameState, HazardVariant, Particle, ParticleTint, PowerUps,
    RewardVariant, Snapshot,
};
pub use tick::Simulation;
