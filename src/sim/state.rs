//! Game state and core simulation types

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

/// Hazard glyphs (junk food)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HazardVariant {
    Burger,
    Lollipop,
    Soda,
    IceCream,
}

impl HazardVariant {
    pub const ALL: [HazardVariant; 4] = [
        HazardVariant::Burger,
        HazardVariant::Lollipop,
        HazardVariant::Soda,
        HazardVariant::IceCream,
    ];
}

/// Reward types, each selecting a power-up effect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RewardVariant {
    /// Grants the shield
    Toothbrush,
    /// Grants double score
    Toothpaste,
    /// Clears every hazard on the road
    Floss,
    /// Grants slow-motion
    Mouthwash,
}

impl RewardVariant {
    pub const ALL: [RewardVariant; 4] = [
        RewardVariant::Toothbrush,
        RewardVariant::Toothpaste,
        RewardVariant::Floss,
        RewardVariant::Mouthwash,
    ];
}

/// What an entity does on contact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    Hazard(HazardVariant),
    Reward(RewardVariant),
}

impl EntityKind {
    pub fn is_hazard(&self) -> bool {
        matches!(self, EntityKind::Hazard(_))
    }
}

/// A falling entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub pos: Vec2,
    pub kind: EntityKind,
}

/// Particle colour, resolved to RGB by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParticleTint {
    Red,
    White,
    Cyan,
}

/// A particle for visual effects
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: f32,
    pub tint: ParticleTint,
    /// Opacity, removed once it reaches 0
    pub alpha: f32,
}

/// Power-up countdowns in seconds (active while > 0)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PowerUps {
    pub shield: f32,
    pub double_score: f32,
    pub slow_mo: f32,
}

impl PowerUps {
    pub fn shield_active(&self) -> bool {
        self.shield > 0.0
    }

    pub fn double_score_active(&self) -> bool {
        self.double_score > 0.0
    }

    pub fn slow_mo_active(&self) -> bool {
        self.slow_mo > 0.0
    }

    /// Count every timer down, never below zero
    pub fn tick(&mut self, dt: f32) {
        for timer in [&mut self.shield, &mut self.double_score, &mut self.slow_mo] {
            if *timer > 0.0 {
                *timer = (*timer - dt).max(0.0);
            }
        }
    }
}

/// Complete state of one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub score: f32,
    pub health: u8,
    /// Raw speed; only the derived effective speed is reduced by slow-motion
    pub speed: f32,
    pub lane_count: u8,
    /// Interpolated lane position
    pub current_lane: f32,
    pub target_lane: u8,
    pub is_game_over: bool,
    pub power_ups: PowerUps,
    pub high_score: f32,
}

impl GameState {
    /// Fresh run state, carrying over the best score
    pub fn new(tuning: &Tuning, high_score: f32) -> Self {
        Self {
            score: 0.0,
            health: tuning.max_health,
            speed: tuning.initial_speed,
            lane_count: tuning.lane_count,
            current_lane: f32::from(tuning.start_lane),
            target_lane: tuning.start_lane,
            is_game_over: false,
            power_ups: PowerUps::default(),
            high_score: high_score.max(0.0),
        }
    }

    /// Speed used for motion, road scroll and engine pitch
    pub fn effective_speed(&self, slow_mo_factor: f32) -> f32 {
        if self.power_ups.slow_mo_active() {
            self.speed * slow_mo_factor
        } else {
            self.speed
        }
    }
}

/// Read-only view pushed to the presentation layer after every tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub score: f32,
    pub health: u8,
    pub effective_speed: f32,
    pub high_score: f32,
    pub game_over: bool,
}

/// Something that happened during a tick (consumed by audio/persistence)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    /// Unshielded hazard contact
    HazardHit { pos: Vec2, health: u8 },
    /// Hazard contact absorbed by the shield
    ShieldBlocked { pos: Vec2 },
    /// Any reward picked up
    RewardCollected { variant: RewardVariant, pos: Vec2 },
    /// Floss wiped the road
    AreaCleared { removed: usize },
    /// Health reached zero
    GameOver { final_score: f32, new_record: bool },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_power_up_timers_clamp_at_zero() {
        let mut power_ups = PowerUps {
            shield: 0.05,
            double_score: 3.0,
            slow_mo: 0.0,
        };
        power_ups.tick(0.1);
        assert_eq!(power_ups.shield, 0.0);
        assert!((power_ups.double_score - 2.9).abs() < 1e-6);
        assert_eq!(power_ups.slow_mo, 0.0);
        assert!(!power_ups.shield_active());
    }

    #[test]
    fn test_effective_speed_halved_by_slow_mo() {
        let mut state = GameState::new(&Tuning::default(), 0.0);
        assert_eq!(state.effective_speed(0.5), 5.0);
        state.power_ups.slow_mo = 1.0;
        assert_eq!(state.effective_speed(0.5), 2.5);
        // Raw speed untouched
        assert_eq!(state.speed, 5.0);
    }

    #[test]
    fn test_snapshot_uses_camel_case_keys() {
        let snapshot = Snapshot {
            score: 12.5,
            health: 2,
            effective_speed: 5.0,
            high_score: 100.0,
            game_over: false,
        };
        let json = serde_json::to_string(&snapshot).unwrap();
        assert!(json.contains("\"effectiveSpeed\":5.0"));
        assert!(json.contains("\"highScore\":100.0"));
        assert!(json.contains("\"gameOver\":false"));
    }
}
