//! Ray representation for per-pixel marching.
//!
//! A ray is r(t) = origin + t * direction. One ray is built per pixel from
//! the camera pose and stays immutable for that pixel's whole evaluation.

use glam::Vec3A;

/// Ray in 3D space defined by origin and unit direction.
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    /// Starting point of the ray in world coordinates (the camera position
    /// for primary rays, a cloud sample for shadow rays).
    pub origin: Vec3A,

    /// Unit-length direction of the ray.
    ///
    /// Normalized on construction so march distances along the ray are world
    /// distances; the sphere tracer and the fixed-step cloud march both rely
    /// on this.
    pub direction: Vec3A,
}

impl Ray {
    /// Create a new ray, normalizing the direction.
    pub fn new(origin: Vec3A, direction: Vec3A) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    /// Compute the point at parameter `t` along the ray.
    pub fn at(&self, t: f32) -> Vec3A {
        self.origin + t * self.direction
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_is_normalized() {
        let r = Ray::new(Vec3A::ZERO, Vec3A::new(3.0, 4.0, 0.0));
        assert!((r.direction.length() - 1.0).abs() < 1e-6);
        assert!((r.at(5.0) - Vec3A::new(3.0, 4.0, 0.0)).length() < 1e-5);
    }
}
