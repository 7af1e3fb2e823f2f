//! Decorative particles
//!
//! Particles never affect gameplay; they only fade out and disappear.

use glam::Vec2;
use rand::Rng;

use super::state::{Particle, ParticleTint};

/// Default particle count of an explosion
pub const EXPLOSION_PARTICLES: usize = 10;
/// Particle count of the area-clear burst
pub const AREA_CLEAR_PARTICLES: usize = 50;
/// Half-range of explosion velocity on each axis
const EXPLOSION_SPREAD: f32 = 150.0;

/// Burst of particles flying out in random directions
pub fn explosion<R: Rng + ?Sized>(
    rng: &mut R,
    particles: &mut Vec<Particle>,
    pos: Vec2,
    tint: ParticleTint,
    count: usize,
    max_particles: usize,
) {
    for _ in 0..count {
        if particles.len() >= max_particles {
            break;
        }
        particles.push(Particle {
            pos,
            vel: Vec2::new(
                rng.random_range(-EXPLOSION_SPREAD..EXPLOSION_SPREAD),
                rng.random_range(-EXPLOSION_SPREAD..EXPLOSION_SPREAD),
            ),
            size: rng.random_range(2.0..7.0),
            tint,
            alpha: 1.0,
        });
    }
}

/// Single exhaust puff trailing below the player
pub fn exhaust<R: Rng + ?Sized>(rng: &mut R, player: Vec2) -> Particle {
    Particle {
        pos: Vec2::new(player.x + rng.random_range(-10.0..10.0), player.y + 30.0),
        vel: Vec2::new(rng.random_range(-25.0..25.0), rng.random_range(100.0..200.0)),
        size: rng.random_range(2.0..5.0),
        tint: ParticleTint::White,
        alpha: 0.5,
    }
}

/// Move, fade and cull particles
pub fn advance(particles: &mut Vec<Particle>, dt: f32, fade_rate: f32) {
    for particle in particles.iter_mut() {
        particle.pos += particle.vel * dt;
        particle.alpha -= dt * fade_rate;
    }
    particles.retain(|p| p.alpha > 0.0);
}
