//! Interval arithmetic for ray parameter ranges.
//!
//! Closed intervals [min, max] of ray t-values, used to bound the volumetric
//! cloud march. An interval with `min >= max` is empty and integrates to
//! nothing.

/// Closed interval [min, max] of distances along a ray.
#[derive(Debug, Clone, Copy)]
pub struct Interval {
    /// Minimum value of the interval
    pub min: f32,
    /// Maximum value of the interval
    pub max: f32,
}

impl Interval {
    /// Create a new interval with given min and max values
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Width of the interval; non-positive means empty
    pub fn size(&self) -> f32 {
        self.max - self.min
    }

    /// True when the interval contains no points
    pub fn is_empty(&self) -> bool {
        self.size() <= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_and_emptiness() {
        assert_eq!(Interval::new(1.0, 80.0).size(), 79.0);
        assert!(!Interval::new(1.0, 80.0).is_empty());
        assert!(Interval::new(1.0, 0.5).is_empty());
        assert!(Interval::new(2.0, 2.0).is_empty());
    }
}
