//! Plane primitive, optionally bounded to a rectangle.

use std::sync::Arc;

use ember_math::{Interval, Ray, Vec2, Vec3};

use crate::{
    object::{HitRecord, SceneObject, Surface},
    Material,
};

/// A plane through `point` with a fixed normal.
///
/// With an extent set, the plane is clipped to a rectangle centered on
/// `point`, spanning `±extent.x` along the tangent and `±extent.y` along the
/// bitangent.
pub struct Plane {
    point: Vec3,
    normal: Vec3,
    tangent: Vec3,
    bitangent: Vec3,
    extent: Option<Vec2>,
    uv_scale: f32,
    material: Arc<Material>,
    shadow: bool,
}

impl Plane {
    /// Create an unbounded plane.
    pub fn new(point: Vec3, normal: Vec3, material: Arc<Material>) -> Self {
        let normal = normal.normalize();
        let tangent = normal.any_orthonormal_vector();
        Self {
            point,
            normal,
            tangent,
            bitangent: normal.cross(tangent),
            extent: None,
            uv_scale: 1.0,
            material,
            shadow: true,
        }
    }

    /// Orient the plane's tangent frame. The tangent is projected onto the
    /// plane before use.
    pub fn with_tangent(mut self, tangent: Vec3) -> Self {
        let projected = tangent - self.normal * tangent.dot(self.normal);
        if projected.length_squared() > 1e-12 {
            self.tangent = projected.normalize();
            self.bitangent = self.normal.cross(self.tangent);
        }
        self
    }

    /// Clip the plane to a rectangle with the given half sizes.
    pub fn with_extent(mut self, half_tangent: f32, half_bitangent: f32) -> Self {
        self.extent = Some(Vec2::new(half_tangent.abs(), half_bitangent.abs()));
        self
    }

    /// Texture repeats per world unit.
    pub fn with_uv_scale(mut self, scale: f32) -> Self {
        self.uv_scale = scale;
        self
    }

    /// Exclude this plane from shadow tests.
    pub fn without_shadow(mut self) -> Self {
        self.shadow = false;
        self
    }

    /// Coordinates of `point` in the plane's tangent frame.
    fn local(&self, point: Vec3) -> Vec2 {
        let d = point - self.point;
        Vec2::new(d.dot(self.tangent), d.dot(self.bitangent))
    }
}

impl Surface for Plane {
    fn normal(&self, _point: Vec3) -> Vec3 {
        self.normal
    }

    fn uv(&self, point: Vec3) -> Vec2 {
        self.local(point) * self.uv_scale
    }

    fn tangent(&self, _point: Vec3) -> Vec3 {
        self.tangent
    }

    fn material(&self) -> &Material {
        &self.material
    }
}

impl SceneObject for Plane {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'a>> {
        let denom = self.normal.dot(ray.direction());
        if denom.abs() < 1e-8 {
            return None;
        }

        let t = (self.point - ray.origin()).dot(self.normal) / denom;
        if !ray_t.surrounds(t) {
            return None;
        }

        let p = ray.at(t);
        if let Some(extent) = self.extent {
            let local = self.local(p);
            if local.x.abs() > extent.x || local.y.abs() > extent.y {
                return None;
            }
        }

        Some(HitRecord {
            t,
            p,
            normal: self.normal,
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
