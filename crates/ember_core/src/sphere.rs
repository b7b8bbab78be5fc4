//! Sphere primitive.

use std::f32::consts::PI;
use std::sync::Arc;

use ember_math::{Interval, Ray, Vec2, Vec3};

use crate::{
    object::{HitRecord, SceneObject, Surface},
    Material,
};

/// A sphere primitive.
pub struct Sphere {
    center: Vec3,
    radius: f32,
    material: Arc<Material>,
    shadow: bool,
}

impl Sphere {
    /// Create a new shadow-casting sphere.
    pub fn new(center: Vec3, radius: f32, material: Arc<Material>) -> Self {
        Self {
            center,
            radius: radius.max(0.0),
            material,
            shadow: true,
        }
    }

    /// Exclude this sphere from shadow tests.
    pub fn without_shadow(mut self) -> Self {
        self.shadow = false;
        self
    }
}

impl Surface for Sphere {
    fn normal(&self, point: Vec3) -> Vec3 {
        (point - self.center).normalize_or_zero()
    }

    fn uv(&self, point: Vec3) -> Vec2 {
        // theta: angle down from +Y, phi: angle around Y from +X
        let p = self.normal(point);
        let theta = (-p.y).clamp(-1.0, 1.0).acos();
        let phi = (-p.z).atan2(p.x) + PI;
        Vec2::new(phi / (2.0 * PI), theta / PI)
    }

    fn tangent(&self, point: Vec3) -> Vec3 {
        // Direction of increasing longitude; undefined at the poles
        let t = Vec3::Y.cross(self.normal(point));
        if t.length_squared() < 1e-12 {
            Vec3::X
        } else {
            t.normalize()
        }
    }

    fn material(&self) -> &Material {
        &self.material
    }
}

impl SceneObject for Sphere {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'a>> {
        let oc = self.center - ray.origin();
        let a = ray.direction().length_squared();
        let h = ray.direction().dot(oc);
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = h * h - a * c;
        if discriminant < 0.0 || a == 0.0 {
            return None;
        }

        let sqrtd = discriminant.sqrt();

        // Find the nearest root in the acceptable range
        let mut root = (h - sqrtd) / a;
        if !ray_t.surrounds(root) {
            root = (h + sqrtd) / a;
            if !ray_t.surrounds(root) {
                return None;
            }
        }

        let p = ray.at(root);
        Some(HitRecord {
            t: root,
            p,
            normal: (p - self.center) / self.radius,
            surface: self,
            owner: self,
        })
    }

    fn casts_shadow(&self) -> bool {
        self.shadow
    }

    fn set_material(&mut self, material: Arc<Material>) {
        self.material = material;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_sphere() -> Sphere {
        Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.5, Arc::new(Material::default()))
    }

    #[test]
    fn test_sphere_hit() {
        let sphere = unit_sphere();
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));

        let rec = sphere.hit(&ray, Interval::FORWARD).expect("should hit");
        assert!((rec.t - 0.5).abs() < 0.001); // Should hit at t=0.5
        assert!((rec.normal - Vec3::Z).length() < 1e-5);
    }

    #[test]
    fn test_sphere_miss() {
        let sphere = unit_sphere();

        // Ray pointing away from sphere
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 1.0, 0.0));
        assert!(sphere.hit(&ray, Interval::FORWARD).is_none());
    }

    #[test]
    fn test_hit_from_inside_finds_far_wall() {
        let sphere = unit_sphere();
        let ray = Ray::new(Vec3::new(0.0, 0.0, -1.0), Vec3::new(0.0, 0.0, -1.0));

        let rec = sphere.hit(&ray, Interval::FORWARD).expect("should exit");
        assert!((rec.t - 0.5).abs() < 1e-5);
        // Normal stays outward even when hit from inside
        assert!((rec.normal - Vec3::NEG_Z).length() < 1e-5);
    }

    #[test]
    fn test_sphere_behind_ray() {
        let sphere = unit_sphere();
        let ray = Ray::new(Vec3::ZERO, Vec3::Z);
        assert!(sphere.hit(&ray, Interval::FORWARD).is_none());
    }

    #[test]
    fn test_uv_and_tangent() {
        let sphere = Sphere::new(Vec3::ZERO, 1.0, Arc::new(Material::default()));

        let uv = sphere.uv(Vec3::Y);
        assert!((uv.y - 1.0).abs() < 1e-5);
        let uv = sphere.uv(Vec3::NEG_Y);
        assert!(uv.y.abs() < 1e-5);

        let t = sphere.tangent(Vec3::X);
        assert!((t.length() - 1.0).abs() < 1e-5);
        assert!(t.dot(sphere.normal(Vec3::X)).abs() < 1e-5);

        // Poles fall back to a fixed axis
        assert_eq!(sphere.tangent(Vec3::Y), Vec3::X);
    }

    #[test]
    fn test_shadow_flag() {
        let sphere = unit_sphere();
        assert!(sphere.casts_shadow());
        assert!(!sphere.without_shadow().casts_shadow());
    }
}
