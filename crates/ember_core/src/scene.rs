//! Scene: the object list and ordered lights a render pass reads from.

use ember_math::{Interval, Ray};

use crate::{
    light::Light,
    object::{HitRecord, SceneObject},
};

/// An immutable-during-render collection of objects and lights.
pub struct Scene {
    objects: Vec<Box<dyn SceneObject>>,
    lights: Vec<Light>,
}

impl Scene {
    /// Create a new empty scene.
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
            lights: Vec::new(),
        }
    }

    /// Add an object to the scene.
    pub fn add(&mut self, object: Box<dyn SceneObject>) {
        self.objects.push(object);
    }

    /// Add a light. Lights are shaded in insertion order.
    pub fn add_light(&mut self, light: Light) {
        self.lights.push(light);
    }

    /// Lights in insertion order.
    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    /// Get the number of objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Check if the scene has no objects.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Nearest intersection in front of the ray origin.
    ///
    /// Shadow rays ignore objects that do not cast shadows.
    pub fn hit(&self, ray: &Ray) -> Option<HitRecord<'_>> {
        let mut closest: Option<HitRecord<'_>> = None;

        for object in &self.objects {
            if ray.is_shadow() && !object.casts_shadow() {
                continue;
            }
            let interval = closest.map_or(Interval::FORWARD, |rec| Interval::FORWARD.with_max(rec.t));
            if let Some(rec) = object.hit(ray, interval) {
                closest = Some(rec);
            }
        }

        closest
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}
