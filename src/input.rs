//! Input translation
//!
//! Keyboard presses and horizontal swipes both reduce to two commands.

/// Lane change command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    /// Lane index delta
    pub fn offset(self) -> i8 {
        match self {
            Direction::Left => -1,
            Direction::Right => 1,
        }
    }

    /// Map a DOM `KeyboardEvent.key` value
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowLeft" => Some(Direction::Left),
            "ArrowRight" => Some(Direction::Right),
            _ => None,
        }
    }
}

/// Turns a touch start/end pair into a direction
#[derive(Debug, Clone, Default)]
pub struct SwipeTracker {
    start_x: Option<f32>,
}

impl SwipeTracker {
    pub fn begin(&mut self, x: f32) {
        self.start_x = Some(x);
    }

    /// Finish the gesture; only a displacement beyond `threshold` counts
    pub fn end(&mut self, x: f32, threshold: f32) -> Option<Direction> {
        let start = self.start_x.take()?;
        let diff = x - start;
        if diff.abs() <= threshold {
            return None;
        }
        Some(if diff > 0.0 {
            Direction::Right
        } else {
            Direction::Left
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_mapping() {
        assert_eq!(Direction::from_key("ArrowLeft"), Some(Direction::Left));
        assert_eq!(Direction::from_key("ArrowRight"), Some(Direction::Right));
        assert_eq!(Direction::from_key("ArrowUp"), None);
        assert_eq!(Direction::from_key("a"), None);
    }

    #[test]
    fn test_swipe_threshold() {
        let mut swipe = SwipeTracker::default();
        swipe.begin(100.0);
        assert_eq!(swipe.end(131.0, 30.0), Some(Direction::Right));

        swipe.begin(100.0);
        assert_eq!(swipe.end(60.0, 30.0), Some(Direction::Left));

        // Exactly at the threshold is not a swipe
        swipe.begin(100.0);
        assert_eq!(swipe.end(130.0, 30.0), None);
    }

    #[test]
    fn test_swipe_needs_a_start() {
        let mut swipe = SwipeTracker::default();
        assert_eq!(swipe.end(500.0, 30.0), None);

        swipe.begin(0.0);
        assert!(swipe.end(100.0, 30.0).is_some());
        // Start is consumed by the first end
        assert_eq!(swipe.end(200.0, 30.0), None);
    }
}
