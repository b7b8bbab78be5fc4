//! Per-light Phong shading with transparent shadows.
//!
//! Each light contributes ambient, diffuse and specular terms. Occluders
//! between the surface and the light tint the diffuse and specular terms by
//! their transmitted color, so colored glass casts colored shadows.

use ember_core::{Color, HitRecord, Light, Scene};
use ember_math::{reflect, Interval, Ray, Vec2, Vec3, EPSILON};

/// Maximum number of occluders a shadow ray passes through before giving up.
pub const SHADOW_WALK_LIMIT: usize = 9;

/// Offset applied to shadow ray origins to stop surfaces shadowing themselves.
const SHADOW_OFFSET: f32 = 0.01;

/// Running light totals for one shaded point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightSums {
    pub ambient: Color,
    pub diffuse: Color,
    pub specular: Color,
}

impl Default for LightSums {
    fn default() -> Self {
        Self {
            ambient: Color::ZERO,
            diffuse: Color::ZERO,
            specular: Color::ZERO,
        }
    }
}

/// Add one light's contribution at `hit`, seen from `eye`, to `sums`.
///
/// Accumulation is additive, so the light order does not change the result.
pub fn accumulate_light(scene: &Scene, eye: Vec3, hit: &HitRecord, light: &Light, sums: &mut LightSums) {
    let material = hit.material();

    let light_vector = (light.location - hit.p).normalize_or_zero();
    let diffuse_power = light_vector.dot(hit.normal).max(0.0);

    let reflected = reflect(-light_vector, hit.normal);
    let view_vector = (eye - hit.p).normalize_or_zero();
    let specular_dot = reflected.dot(view_vector);
    let specular_power = if specular_dot <= 0.0 {
        0.0
    } else {
        specular_dot.powf(material.shininess)
    };

    let mut diffuse = Color::splat(diffuse_power);
    let mut specular = Color::splat(specular_power);

    // Surfaces facing away from the light receive nothing to shadow
    let needs_shadow = light.shadow && (diffuse_power > EPSILON || specular_power > EPSILON);
    if needs_shadow {
        let transmission = shadow_transmission(scene, hit.p, light_vector, light.location);
        diffuse *= transmission;
        specular *= transmission;
    }

    sums.ambient += light.ambient * light.color;
    sums.diffuse += diffuse * light.color;
    sums.specular += specular * light.color;
}

/// Fraction of light (per channel) reaching `point` from a light at
/// `light_location` along the unit vector `light_vector`.
///
/// Occluders are composited in the order the walk meets them, nearest to the
/// surface first. After each partially transparent occluder the walk resumes
/// from where the shadow ray leaves that object.
pub fn shadow_transmission(scene: &Scene, point: Vec3, light_vector: Vec3, light_location: Vec3) -> Color {
    let mut transmission = Color::ONE;
    let mut test_point = point;

    for _ in 0..SHADOW_WALK_LIMIT {
        let shadow = Ray::shadow(test_point + light_vector * SHADOW_OFFSET, light_vector);
        let light_distance = (light_location - test_point).length();

        let occluder = match scene.hit(&shadow) {
            Some(rec) if rec.t < light_distance => rec,
            // Nothing further in the way
            _ => break,
        };

        // Sample the occluder's UV so textured transparency works
        let material = occluder.material();
        let uv = if material.needs_uv() { occluder.uv() } else { Vec2::ZERO };
        let occluder_color = material.diffuse_color(uv);
        let pass = 1.0 - occluder_color.w;

        transmission *= pass * occluder_color;
        if pass < EPSILON {
            break;
        }

        test_point = exit_point(&occluder, light_vector);
    }

    transmission
}

/// Where a shadow ray entering at `entry` leaves the occluding object.
/// Thin surfaces (planes) have no separate exit, so the entry point is used.
fn exit_point(entry: &HitRecord, light_vector: Vec3) -> Vec3 {
    let inside = Ray::shadow(entry.p + light_vector * SHADOW_OFFSET, light_vector);
    match entry.owner.hit(&inside, Interval::FORWARD) {
        Some(exit) => exit.p,
        None => entry.p,
    }
}
