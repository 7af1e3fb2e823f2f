//! Entity spawning

use glam::Vec2;
use rand::Rng;

use super::state::{Entity, EntityKind, HazardVariant, RewardVariant};
use crate::lane_x;
use crate::tuning::Tuning;

/// Materialize one entity above a random lane
pub fn spawn_one<R: Rng + ?Sized>(rng: &mut R, tuning: &Tuning, surface_width: f32) -> Entity {
    let lane = rng.random_range(0..tuning.lane_count);
    let kind = if rng.random_bool(tuning.hazard_chance) {
        let variant = HazardVariant::ALL[rng.random_range(0..HazardVariant::ALL.len())];
        EntityKind::Hazard(variant)
    } else {
        let variant = RewardVariant::ALL[rng.random_range(0..RewardVariant::ALL.len())];
        EntityKind::Reward(variant)
    };

    Entity {
        pos: Vec2::new(
            lane_x(f32::from(lane), surface_width, tuning.lane_count),
            tuning.spawn_y,
        ),
        kind,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_spawns_on_lane_centres_above_screen() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(42);
        let centres = [100.0, 300.0, 500.0, 700.0];

        for _ in 0..200 {
            let entity = spawn_one(&mut rng, &tuning, 800.0);
            assert_eq!(entity.pos.y, -50.0);
            assert!(centres.contains(&entity.pos.x), "x = {}", entity.pos.x);
        }
    }

    #[test]
    fn test_hazard_ratio_roughly_eighty_percent() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(1234);
        let hazards = (0..5000)
            .filter(|_| spawn_one(&mut rng, &tuning, 800.0).kind.is_hazard())
            .count();
        let ratio = hazards as f64 / 5000.0;
        assert!((0.76..0.84).contains(&ratio), "ratio = {ratio}");
    }

    #[test]
    fn test_hazard_chance_extremes() {
        let mut rng = Pcg32::seed_from_u64(9);
        let all_rewards = Tuning {
            hazard_chance: 0.0,
            ..Tuning::default()
        };
        assert!((0..100).all(|_| !spawn_one(&mut rng, &all_rewards, 800.0).kind.is_hazard()));

        let all_hazards = Tuning {
            hazard_chance: 1.0,
            ..Tuning::default()
        };
        assert!((0..100).all(|_| spawn_one(&mut rng, &all_hazards, 800.0).kind.is_hazard()));
    }

    #[test]
    fn test_every_reward_variant_appears() {
        let tuning = Tuning {
            hazard_chance: 0.0,
            ..Tuning::default()
        };
        let mut rng = Pcg32::seed_from_u64(5);
        let mut seen = Vec::new();
        for _ in 0..200 {
            if let EntityKind::Reward(variant) = spawn_one(&mut rng, &tuning, 800.0).kind {
                if !seen.contains(&variant) {
                    seen.push(variant);
                }
            }
        }
        assert_eq!(seen.len(), RewardVariant::ALL.len());
    }
}
