//! Demo pilot
//!
//! Looks at what is falling toward the player and nudges toward the lane with
//! the most room, detouring for rewards when the way is clear. Used by the
//! headless native runner; the browser build only steers from player input.

use super::state::EntityKind;
use super::tick::Simulation;
use crate::input::Direction;

/// How far above the player the pilot looks (pixels)
const LOOKAHEAD: f32 = 320.0;
/// Preference for a reward lane with no hazard in view
const REWARD_BONUS: f32 = 120.0;
/// Cost per lane of moving away from the current target
const TRAVEL_COST: f32 = 15.0;

/// Pick a one-lane move, or `None` to hold the current target
pub fn choose_direction(sim: &Simulation) -> Option<Direction> {
    if sim.state.is_game_over {
        return None;
    }
    let lane_count = usize::from(sim.state.lane_count);
    let lane_width = sim.surface_size().x / lane_count as f32;
    let player = sim.player_pos();
    let radius = sim.tuning.collision_radius;

    // Gap to the nearest incoming hazard per lane, and reward presence
    let mut clearance = vec![LOOKAHEAD; lane_count];
    let mut reward = vec![false; lane_count];
    for entity in &sim.entities {
        let gap = player.y - entity.pos.y;
        if gap < -radius || gap > LOOKAHEAD {
            continue;
        }
        let lane = ((entity.pos.x / lane_width).max(0.0) as usize).min(lane_count - 1);
        match entity.kind {
            EntityKind::Hazard(_) => clearance[lane] = clearance[lane].min(gap.max(0.0)),
            EntityKind::Reward(_) => reward[lane] = true,
        }
    }

    let current = usize::from(sim.state.target_lane);
    let score = |lane: usize| {
        let mut value = clearance[lane];
        if reward[lane] && clearance[lane] >= LOOKAHEAD {
            value += REWARD_BONUS;
        }
        value - lane.abs_diff(current) as f32 * TRAVEL_COST
    };

    // Ties go to the lane closest to the current target
    let best = (0..lane_count).max_by(|&a, &b| {
        score(a)
            .total_cmp(&score(b))
            .then(b.abs_diff(current).cmp(&a.abs_diff(current)))
    })?;

    match best.cmp(&current) {
        std::cmp::Ordering::Less => Some(Direction::Left),
        std::cmp::Ordering::Greater => Some(Direction::Right),
        std::cmp::Ordering::Equal => None,
    }
}
