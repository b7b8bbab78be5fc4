//! Ember Core - scene collaborators for the Ember ray tracer.
//!
//! This crate provides:
//!
//! - **Surface description**: `Material`, `Texture`, `Light`
//! - **Geometry**: `Sphere`, `Plane`, `Container` behind the `SceneObject`
//!   and `Surface` traits
//! - **Scene**: an immutable object list plus ordered lights
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use ember_core::{Light, Material, Scene, Sphere};
//!
//! let mut scene = Scene::new();
//! scene.add(Box::new(Sphere::new(Vec3::new(0.0, 0.0, -5.0), 1.0, Arc::new(Material::default()))));
//! scene.add_light(Light::new(Vec3::new(5.0, 5.0, 0.0)));
//! ```

pub mod container;
pub mod light;
pub mod material;
pub mod object;
pub mod plane;
pub mod scene;
pub mod sphere;
pub mod texture;

// Re-export commonly used types
pub use container::Container;
pub use light::Light;
pub use material::{Color, Material};
pub use object::{HitRecord, SceneObject, Surface};
pub use plane::Plane;
pub use scene::Scene;
pub use sphere::Sphere;
pub use texture::{Texture, TextureError, TextureResult};
