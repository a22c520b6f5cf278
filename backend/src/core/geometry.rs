//! Integer positions on the simulation plane

use serde::{Deserialize, Serialize};

/// Fixed location of a producer or a person
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub x: i64,
    pub y: i64,
}

impl Position {
    pub fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    /// Straight-line distance to `other`
    ///
    /// # Example
    /// ```
    /// use market_simulator_core_rs::Position;
    ///
    /// let home = Position::new(0, 0);
    /// let work = Position::new(3, 4);
    /// assert_eq!(home.distance_to(&work), 5.0);
    /// ```
    pub fn distance_to(&self, other: &Position) -> f64 {
        let dx = (other.x - self.x) as f64;
        let dy = (other.y - self.y) as f64;
        dx.hypot(dy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_is_symmetric() {
        let a = Position::new(10, -4);
        let b = Position::new(-2, 7);
        assert_eq!(a.distance_to(&b), b.distance_to(&a));
    }

    #[test]
    fn test_distance_to_self_is_zero() {
        let a = Position::new(120, 33);
        assert_eq!(a.distance_to(&a), 0.0);
    }
}
