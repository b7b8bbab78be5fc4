/// A closed range of ray parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub min: f32,
    pub max: f32,
}

impl Interval {
    /// Create a new interval given min and max values.
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Everything in front of a ray origin, excluding the origin itself.
    pub const FORWARD: Interval = Interval {
        min: 0.0,
        max: f32::INFINITY,
    };

    /// An empty interval (min > max, contains nothing).
    pub const EMPTY: Interval = Interval {
        min: f32::INFINITY,
        max: f32::NEG_INFINITY,
    };

    /// Returns true if x is within the interval [min, max] (inclusive).
    pub fn contains(&self, x: f32) -> bool {
        self.min <= x && x <= self.max
    }

    /// Returns true if x is strictly within the interval (min, max) (exclusive).
    pub fn surrounds(&self, x: f32) -> bool {
        self.min < x && x < self.max
    }

    /// Same lower bound, upper bound pulled in to `max`.
    pub fn with_max(&self, max: f32) -> Interval {
        Interval::new(self.min, max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_contains() {
        let interval = Interval::new(0.0, 10.0);

        assert!(interval.contains(0.0));
        assert!(interval.contains(10.0));
        assert!(!interval.contains(-0.1));
        assert!(!interval.contains(10.1));
    }

    #[test]
    fn test_interval_surrounds() {
        let interval = Interval::new(0.0, 10.0);

        // Exclusive bounds - endpoints NOT included
        assert!(!interval.surrounds(0.0));
        assert!(!interval.surrounds(10.0));
        assert!(interval.surrounds(5.0));
    }

    #[test]
    fn test_forward_excludes_origin() {
        assert!(!Interval::FORWARD.surrounds(0.0));
        assert!(Interval::FORWARD.surrounds(1e-6));
        assert!(Interval::FORWARD.surrounds(1e30));
    }

    #[test]
    fn test_with_max() {
        let shrunk = Interval::FORWARD.with_max(3.0);
        assert_eq!(shrunk.min, 0.0);
        assert!(!shrunk.surrounds(3.5));
    }

    #[test]
    fn test_interval_empty() {
        assert!(!Interval::EMPTY.contains(0.0));
        assert!(!Interval::EMPTY.surrounds(0.0));
    }
}
