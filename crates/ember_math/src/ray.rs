use crate::Vec3;

/// A ray in 3D space with origin and direction.
///
/// Shadow rays are flagged so that objects which do not cast shadows can be
/// skipped during occlusion tests.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
    pub shadow: bool,
}

impl Ray {
    /// Create a new (non-shadow) ray.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction,
            shadow: false,
        }
    }

    /// Create a shadow-test ray.
    pub fn shadow(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction,
            shadow: true,
        }
    }

    /// Get the origin point of the ray.
    #[inline]
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    /// Get the direction vector of the ray.
    #[inline]
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    /// Whether this ray is an occlusion test toward a light.
    #[inline]
    pub fn is_shadow(&self) -> bool {
        self.shadow
    }

    /// Get the point along the ray at parameter t.
    ///
    /// Returns: origin + t * direction
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ray_creation() {
        let origin = Vec3::new(1.0, 2.0, 3.0);
        let direction = Vec3::new(0.0, 1.0, 0.0);
        let ray = Ray::new(origin, direction);

        assert_eq!(ray.origin, origin);
        assert_eq!(ray.direction, direction);
        assert!(!ray.is_shadow());
    }

    #[test]
    fn test_shadow_ray() {
        let ray = Ray::shadow(Vec3::ZERO, Vec3::Y);
        assert!(ray.is_shadow());
        assert_eq!(ray.direction(), Vec3::Y);
    }

    #[test]
    fn test_ray_at() {
        let ray = Ray::new(Vec3::ZERO, Vec3::X);

        assert_eq!(ray.at(0.0), Vec3::ZERO);
        assert_eq!(ray.at(2.0), Vec3::new(2.0, 0.0, 0.0));
        assert_eq!(ray.at(-1.0), Vec3::new(-1.0, 0.0, 0.0));
    }
}
