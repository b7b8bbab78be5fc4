//! Random sampling helpers for jitter and lens effects.

use ember_math::{Vec2, Vec3};
use rand::{Rng, RngCore};

/// Uniform f32 in [0, 1).
#[inline]
pub fn gen_f32(rng: &mut dyn RngCore) -> f32 {
    rng.gen::<f32>()
}

/// Sample a random point in the unit disk.
pub fn random_in_unit_disk(rng: &mut dyn RngCore) -> Vec2 {
    loop {
        let p = Vec2::new(gen_f32(rng) * 2.0 - 1.0, gen_f32(rng) * 2.0 - 1.0);
        if p.length_squared() < 1.0 {
            return p;
        }
    }
}

/// Sub-pixel offset for one sample: the pixel center when taking a single
/// sample, otherwise uniform inside the pixel.
pub fn pixel_jitter(oversample: u32, rng: &mut dyn RngCore) -> Vec2 {
    if oversample <= 1 {
        Vec2::splat(0.5)
    } else {
        Vec2::new(gen_f32(rng), gen_f32(rng))
    }
}

/// Tilt a direction by a random offset on the disk perpendicular to it.
///
/// `amount` is the disk radius relative to the unit direction, so 0.05 gives
/// a spread of roughly three degrees. Used for lens defocus and blurry
/// reflections.
pub fn defocus(direction: Vec3, amount: f32, rng: &mut dyn RngCore) -> Vec3 {
    let dir = direction.normalize_or_zero();
    if dir == Vec3::ZERO {
        return direction;
    }

    let u = dir.any_orthonormal_vector();
    let v = dir.cross(u);
    let p = random_in_unit_disk(rng) * amount;
    (dir + u * p.x + v * p.y).normalize()
}

/// Seed for one pixel's sample stream.
///
/// Mixing the pixel index in (splitmix64 finaliser) keeps every pixel
/// reproducible no matter which thread or call renders it.
pub fn pixel_seed(seed: u64, frame: u64, index: usize) -> u64 {
    let mut z = seed
        ^ frame.wrapping_mul(0x9E37_79B9_7F4A_7C15)
        ^ (index as u64).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
