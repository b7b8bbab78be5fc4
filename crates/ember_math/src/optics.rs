//! Reflection, refraction and Euler rotation helpers.

use glam::{EulerRot, Mat3, Vec3};

/// Reflect an incident vector about a normal.
#[inline]
pub fn reflect(incident: Vec3, normal: Vec3) -> Vec3 {
    incident - 2.0 * incident.dot(normal) * normal
}

/// Refract an incident vector through a surface with relative index `eta`.
///
/// `incident` and `normal` should be unit length, with the normal facing the
/// incoming side. Returns zero on total internal reflection.
#[inline]
pub fn refract(incident: Vec3, normal: Vec3, eta: f32) -> Vec3 {
    let cos_i = normal.dot(incident);
    let k = 1.0 - eta * eta * (1.0 - cos_i * cos_i);
    if k < 0.0 {
        Vec3::ZERO
    } else {
        eta * incident - (eta * cos_i + k.sqrt()) * normal
    }
}

/// Rotation matrix for Euler angles in radians.
///
/// `angles.y` is yaw (around Y), `angles.x` is pitch (around X) and
/// `angles.z` is roll (around Z), applied in that order.
pub fn euler_rotation(angles: Vec3) -> Mat3 {
    Mat3::from_euler(EulerRot::YXZ, angles.y, angles.x, angles.z)
}
