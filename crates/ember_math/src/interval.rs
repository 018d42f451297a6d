/// A closed range of scalars, used to bound acceptable hit distances.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub min: f64,
    pub max: f64,
}

impl Interval {
    /// Create a new interval given min and max values.
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Returns the size of the interval (max - min).
    pub fn size(&self) -> f64 {
        self.max - self.min
    }

    /// Returns true if x is within the interval [min, max] (inclusive).
    pub fn contains(&self, x: f64) -> bool {
        self.min <= x && x <= self.max
    }

    /// Returns true if x is strictly within the interval (min, max) (exclusive).
    pub fn surrounds(&self, x: f64) -> bool {
        self.min < x && x < self.max
    }

    /// Clamps x to be within the interval [min, max].
    pub fn clamp(&self, x: f64) -> f64 {
        x.clamp(self.min, self.max)
    }

    /// Same lower bound, new upper bound.
    pub fn with_max(&self, max: f64) -> Interval {
        Interval::new(self.min, max)
    }

    /// An empty interval (min > max, contains nothing).
    pub const EMPTY: Interval = Interval {
        min: f64::INFINITY,
        max: f64::NEG_INFINITY,
    };

    /// A universe interval (contains everything).
    pub const UNIVERSE: Interval = Interval {
        min: f64::NEG_INFINITY,
        max: f64::INFINITY,
    };
}

impl Default for Interval {
    fn default() -> Self {
        Self::EMPTY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const T_MIN: f64 = 0.001;

    #[test]
    fn test_self_hit_below_epsilon_rejected() {
        let ray_t = Interval::new(T_MIN, f64::INFINITY);

        // A re-intersection at the origin surface lands at or just under the epsilon
        assert!(!ray_t.surrounds(0.0));
        assert!(!ray_t.surrounds(T_MIN));
        assert!(!ray_t.surrounds(T_MIN * 0.5));
        assert!(ray_t.surrounds(T_MIN * 1.5));
        // The closed test still counts the boundary
        assert!(ray_t.contains(T_MIN));
        assert!(ray_t.surrounds(1e300));
    }

    #[test]
    fn test_closest_hit_bound_shrinks() {
        // Candidate distances in the order a list would test them
        let candidates = [7.5, 3.25, 9.0, 3.25, 0.0005, 4.0];
        let mut ray_t = Interval::new(T_MIN, f64::INFINITY);
        let mut accepted = Vec::new();

        for t in candidates {
            if ray_t.surrounds(t) {
                accepted.push(t);
                ray_t = ray_t.with_max(t);
            }
        }

        // Only strictly closer hits pass; a tie at 3.25 keeps the first one
        assert_eq!(accepted, vec![7.5, 3.25]);
        assert_eq!(ray_t, Interval::new(T_MIN, 3.25));
        assert!((ray_t.size() - (3.25 - T_MIN)).abs() < 1e-12);
    }

    #[test]
    fn test_intensity_clamp() {
        let intensity = Interval::new(0.0, 0.999);

        assert_eq!(intensity.clamp(-0.25), 0.0);
        assert_eq!(intensity.clamp(0.5), 0.5);
        assert_eq!(intensity.clamp(4.0), 0.999);
        // Clamped values never reach 256 after scaling
        assert_eq!((256.0 * intensity.clamp(1.0)) as u32, 255);
    }

    #[test]
    fn test_empty_and_universe() {
        assert_eq!(Interval::default(), Interval::EMPTY);
        assert!(!Interval::EMPTY.contains(0.0));
        assert!(!Interval::EMPTY.surrounds(0.0));

        assert!(Interval::UNIVERSE.surrounds(-1e10));
        assert_eq!(Interval::UNIVERSE.with_max(2.0), Interval::new(f64::NEG_INFINITY, 2.0));
    }
}
