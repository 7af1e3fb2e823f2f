//! Contact detection and power-up resolution
//!
//! Contact is a plain distance threshold sampled once per tick. Nothing is
//! swept, so at very high effective speed an entity can step over the player
//! without touching it.

use glam::Vec2;
use rand::Rng;

use super::particles::{self, AREA_CLEAR_PARTICLES, EXPLOSION_PARTICLES};
use super::state::{
    Entity, EntityKind, GameEvent, GameState, Particle, ParticleTint, PowerUps, RewardVariant,
};
use crate::tuning::Tuning;

/// Whether an entity touches the player
#[inline]
pub fn in_contact(player: Vec2, entity: Vec2, radius: f32) -> bool {
    player.distance(entity) < radius
}

/// Start (or restart) a timed power-up. Timers are overwritten, never extended.
///
/// Returns `false` for rewards without a timer (floss).
pub fn grant_power_up(power_ups: &mut PowerUps, variant: RewardVariant, tuning: &Tuning) -> bool {
    match variant {
        RewardVariant::Toothbrush => power_ups.shield = tuning.shield_duration,
        RewardVariant::Toothpaste => power_ups.double_score = tuning.double_score_duration,
        RewardVariant::Mouthwash => power_ups.slow_mo = tuning.slow_mo_duration,
        RewardVariant::Floss => return false,
    }
    true
}

/// Remove every hazard, keeping rewards. Returns how many were removed.
pub fn clear_hazards(entities: &mut Vec<Entity>) -> usize {
    let before = entities.len();
    entities.retain(|e| !e.kind.is_hazard());
    before - entities.len()
}

/// Apply the effect of touching `entity` (already removed from `entities`)
#[allow(clippy::too_many_arguments)]
pub fn resolve_contact<R: Rng + ?Sized>(
    rng: &mut R,
    tuning: &Tuning,
    state: &mut GameState,
    entities: &mut Vec<Entity>,
    particles: &mut Vec<Particle>,
    entity: &Entity,
    screen_centre: Vec2,
    events: &mut Vec<GameEvent>,
) {
    match entity.kind {
        EntityKind::Hazard(_) if state.power_ups.shield_active() => {
            particles::explosion(
                rng,
                particles,
                entity.pos,
                ParticleTint::White,
                EXPLOSION_PARTICLES,
                tuning.max_particles,
            );
            events.push(GameEvent::ShieldBlocked { pos: entity.pos });
        }
        EntityKind::Hazard(_) => {
            state.health = state.health.saturating_sub(1);
            particles::explosion(
                rng,
                particles,
                entity.pos,
                ParticleTint::Red,
                EXPLOSION_PARTICLES,
                tuning.max_particles,
            );
            events.push(GameEvent::HazardHit {
                pos: entity.pos,
                health: state.health,
            });

            if state.health == 0 {
                finish_run(state, events);
            }
        }
        EntityKind::Reward(variant) => {
            particles::explosion(
                rng,
                particles,
                entity.pos,
                ParticleTint::Cyan,
                EXPLOSION_PARTICLES,
                tuning.max_particles,
            );
            events.push(GameEvent::RewardCollected {
                variant,
                pos: entity.pos,
            });
            log::debug!("Picked up {:?}", variant);

            if !grant_power_up(&mut state.power_ups, variant, tuning) {
                let removed = clear_hazards(entities);
                particles::explosion(
                    rng,
                    particles,
                    screen_centre,
                    ParticleTint::White,
                    AREA_CLEAR_PARTICLES,
                    tuning.max_particles,
                );
                events.push(GameEvent::AreaCleared { removed });
            }
        }
    }
}

/// Enter the terminal state and settle the best score
fn finish_run(state: &mut GameState, events: &mut Vec<GameEvent>) {
    state.is_game_over = true;
    let new_record = state.score > state.high_score;
    if new_record {
        state.high_score = state.score;
    }
    log::info!(
        "Game over: score {:.0}, best {:.0}{}",
        state.score,
        state.high_score,
        if new_record { " (new record)" } else { "" }
    );
    events.push(GameEvent::GameOver {
        final_score: state.score,
        new_record,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::HazardVariant;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn hazard(x: f32, y: f32) -> Entity {
        Entity {
            pos: Vec2::new(x, y),
            kind: EntityKind::Hazard(HazardVariant::Burger),
        }
    }

    fn reward(variant: RewardVariant, x: f32, y: f32) -> Entity {
        Entity {
            pos: Vec2::new(x, y),
            kind: EntityKind::Reward(variant),
        }
    }

    struct Fixture {
        rng: Pcg32,
        tuning: Tuning,
        state: GameState,
        entities: Vec<Entity>,
        particles: Vec<Particle>,
        events: Vec<GameEvent>,
    }

    impl Fixture {
        fn new() -> Self {
            let tuning = Tuning::default();
            Self {
                rng: Pcg32::seed_from_u64(11),
                state: GameState::new(&tuning, 0.0),
                tuning,
                entities: Vec::new(),
                particles: Vec::new(),
                events: Vec::new(),
            }
        }

        fn touch(&mut self, entity: Entity) {
            resolve_contact(
                &mut self.rng,
                &self.tuning,
                &mut self.state,
                &mut self.entities,
                &mut self.particles,
                &entity,
                Vec2::new(400.0, 300.0),
                &mut self.events,
            );
        }
    }

    #[test]
    fn test_contact_threshold() {
        let player = Vec2::new(300.0, 500.0);
        assert!(in_contact(player, Vec2::new(300.0, 470.0), 40.0));
        assert!(!in_contact(player, Vec2::new(300.0, 460.0), 40.0));
        assert!(!in_contact(player, Vec2::new(100.0, 500.0), 40.0));
    }

    #[test]
    fn test_unshielded_hazard_costs_health() {
        let mut fx = Fixture::new();
        fx.touch(hazard(300.0, 500.0));

        assert_eq!(fx.state.health, 2);
        assert_eq!(fx.particles.len(), EXPLOSION_PARTICLES);
        assert!(fx.particles.iter().all(|p| p.tint == ParticleTint::Red));
        assert!(matches!(fx.events[0], GameEvent::HazardHit { health: 2, .. }));
        assert!(!fx.state.is_game_over);
    }

    #[test]
    fn test_shield_absorbs_hit_without_consuming_timer() {
        let mut fx = Fixture::new();
        fx.state.power_ups.shield = 3.0;
        fx.touch(hazard(300.0, 500.0));
        fx.touch(hazard(300.0, 500.0));

        assert_eq!(fx.state.health, 3);
        assert_eq!(fx.state.power_ups.shield, 3.0);
        assert!(fx.particles.iter().all(|p| p.tint == ParticleTint::White));
        assert!(matches!(fx.events[1], GameEvent::ShieldBlocked { .. }));
    }

    #[test]
    fn test_last_hit_ends_run_and_records_best() {
        let mut fx = Fixture::new();
        fx.state.health = 1;
        fx.state.score = 250.0;
        fx.state.high_score = 100.0;
        fx.touch(hazard(300.0, 500.0));

        assert_eq!(fx.state.health, 0);
        assert!(fx.state.is_game_over);
        assert_eq!(fx.state.high_score, 250.0);
        assert_eq!(
            fx.events.last(),
            Some(&GameEvent::GameOver {
                final_score: 250.0,
                new_record: true
            })
        );
    }

    #[test]
    fn test_game_over_keeps_better_record() {
        let mut fx = Fixture::new();
        fx.state.health = 1;
        fx.state.score = 50.0;
        fx.state.high_score = 100.0;
        fx.touch(hazard(300.0, 500.0));

        assert_eq!(fx.state.high_score, 100.0);
        assert!(matches!(
            fx.events.last(),
            Some(GameEvent::GameOver { new_record: false, .. })
        ));
    }

    #[test]
    fn test_shield_pickup_overwrites_timer() {
        let mut fx = Fixture::new();
        fx.state.power_ups.shield = 2.0;
        fx.touch(reward(RewardVariant::Toothbrush, 300.0, 500.0));
        assert_eq!(fx.state.power_ups.shield, 5.0);

        // Not additive either
        fx.state.power_ups.shield = 4.5;
        fx.touch(reward(RewardVariant::Toothbrush, 300.0, 500.0));
        assert_eq!(fx.state.power_ups.shield, 5.0);
    }

    #[test]
    fn test_timed_rewards() {
        let mut fx = Fixture::new();
        fx.touch(reward(RewardVariant::Toothpaste, 0.0, 0.0));
        fx.touch(reward(RewardVariant::Mouthwash, 0.0, 0.0));
        assert_eq!(fx.state.power_ups.double_score, 10.0);
        assert_eq!(fx.state.power_ups.slow_mo, 5.0);
        assert!(fx.particles.iter().all(|p| p.tint == ParticleTint::Cyan));
    }

    #[test]
    fn test_floss_clears_hazards_only() {
        let mut fx = Fixture::new();
        fx.entities = vec![
            hazard(100.0, 0.0),
            reward(RewardVariant::Toothpaste, 300.0, 10.0),
            hazard(500.0, 20.0),
            hazard(700.0, 30.0),
            reward(RewardVariant::Mouthwash, 100.0, 40.0),
        ];
        fx.touch(reward(RewardVariant::Floss, 300.0, 500.0));

        assert_eq!(fx.entities.len(), 2);
        assert!(fx.entities.iter().all(|e| !e.kind.is_hazard()));
        assert!(fx.events.contains(&GameEvent::AreaCleared { removed: 3 }));
        // Pickup burst plus the screen-wide burst
        assert_eq!(fx.particles.len(), EXPLOSION_PARTICLES + AREA_CLEAR_PARTICLES);
        assert_eq!(fx.particles.last().map(|p| p.pos), Some(Vec2::new(400.0, 300.0)));
    }
}
