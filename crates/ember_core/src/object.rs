//! Scene object traits and the hit record they produce.

use std::sync::Arc;

use ember_math::{Interval, Ray, Vec2, Vec3};

use crate::material::Material;

/// Local surface queries for a primitive that a ray can land on.
pub trait Surface: Send + Sync {
    /// Outward unit normal at a point on the surface.
    fn normal(&self, point: Vec3) -> Vec3;

    /// Texture coordinates at a point on the surface.
    fn uv(&self, _point: Vec3) -> Vec2 {
        Vec2::ZERO
    }

    /// Unit tangent at a point, used to orient normal maps.
    fn tangent(&self, point: Vec3) -> Vec3;

    /// Material of the surface.
    fn material(&self) -> &Material;
}

/// Something a ray can be intersected with.
pub trait SceneObject: Send + Sync {
    /// Nearest intersection with parameter strictly inside `ray_t`.
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'a>>;

    /// Shadow rays skip objects that return false here.
    fn casts_shadow(&self) -> bool {
        true
    }

    /// Replace the material of this object (and any children).
    fn set_material(&mut self, material: Arc<Material>);
}

/// Record of a ray-object intersection.
#[derive(Clone, Copy)]
pub struct HitRecord<'a> {
    /// Parameter t where the intersection occurs
    pub t: f32,
    /// Point of intersection
    pub p: Vec3,
    /// Outward surface normal at the intersection
    pub normal: Vec3,
    /// Primitive that was hit
    pub surface: &'a dyn Surface,
    /// Outermost object the primitive belongs to; refraction exit tests
    /// intersect against this alone
    pub owner: &'a dyn SceneObject,
}

impl<'a> HitRecord<'a> {
    /// Material at the intersection point.
    pub fn material(&self) -> &'a Material {
        self.surface.material()
    }

    /// Texture coordinates at the intersection point.
    pub fn uv(&self) -> Vec2 {
        self.surface.uv(self.p)
    }

    /// Tangent at the intersection point.
    pub fn tangent(&self) -> Vec3 {
        self.surface.tangent(self.p)
    }
}

impl std::fmt::Debug for HitRecord<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HitRecord")
            .field("t", &self.t)
            .field("p", &self.p)
            .field("normal", &self.normal)
            .finish_non_exhaustive()
    }
}
