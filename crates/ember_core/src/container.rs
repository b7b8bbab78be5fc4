//! Composite object made of child objects.
//!
//! A container is treated as a single object: for example a cube built from
//! six bounded planes. Rays hitting any child report the container as owner,
//! so refracted rays look for their exit point on the whole solid.

use std::sync::Arc;

use ember_math::{Interval, Ray, Vec3};

use crate::{
    object::{HitRecord, SceneObject},
    Material, Plane,
};

/// A collection of scene objects that share one material.
pub struct Container {
    children: Vec<Box<dyn SceneObject>>,
    material: Arc<Material>,
    shadow: bool,
}

impl Container {
    /// Create an empty container.
    pub fn new(material: Arc<Material>) -> Self {
        Self {
            children: Vec::new(),
            material,
            shadow: true,
        }
    }

    /// Axis-aligned box between two corners, built from six outward-facing
    /// planes.
    pub fn cuboid(a: Vec3, b: Vec3, material: Arc<Material>) -> Self {
        let min = a.min(b);
        let max = a.max(b);
        let center = (min + max) * 0.5;
        let half = (max - min) * 0.5;

        // (normal, tangent, half size along tangent, half size along bitangent)
        let faces = [
            (Vec3::X, Vec3::Y, half.y, half.z),
            (Vec3::NEG_X, Vec3::Y, half.y, half.z),
            (Vec3::Y, Vec3::Z, half.z, half.x),
            (Vec3::NEG_Y, Vec3::Z, half.z, half.x),
            (Vec3::Z, Vec3::X, half.x, half.y),
            (Vec3::NEG_Z, Vec3::X, half.x, half.y),
        ];

        let mut cuboid = Self::new(material.clone());
        for (normal, tangent, ht, hb) in faces {
            let point = center + normal * half;
            let face = Plane::new(point, normal, material.clone())
                .with_tangent(tangent)
                .with_extent(ht, hb);
            cuboid.add(Box::new(face));
        }
        cuboid
    }

    /// Add an object to the container. It takes on the container's material.
    pub fn add(&mut self, mut object: Box<dyn SceneObject>) {
        object.set_material(self.material.clone());
        self.children.push(object);
    }

    /// Exclude this container from shadow tests.
    pub fn without_shadow(mut self) -> Self {
        self.shadow = false;
        self
    }

    /// Get the number of children.
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// Check if the container is empty.
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

impl SceneObject for Container {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'a>> {
        let mut closest: Option<HitRecord<'a>> = None;

        for child in &self.children {
            let interval = closest.map_or(ray_t, |rec| ray_t.with_max(rec.t));
            if let Some(rec) = child.hit(ray, interval) {
                closest = Some(rec);
            }
        }

        closest.map(|rec| HitRecord { owner: self, ..rec })
    }

    fn casts_shadow(&self) -> bool {
        self.shadow
    }

    fn set_material(&mut self, material: Arc<Material>) {
        for child in &mut self.children {
            child.set_material(material.clone());
        }
        self.material = material;
    }
}
