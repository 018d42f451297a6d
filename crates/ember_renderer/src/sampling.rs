//! Random sampling helpers.
//!
//! All randomness flows through an explicitly passed generator so a seeded
//! `StdRng` reproduces a render exactly.

use ember_math::Vec3;
use rand::{Rng, RngCore};

/// Uniform sample in [0, 1).
#[inline]
pub(crate) fn gen_f64(rng: &mut dyn RngCore) -> f64 {
    rng.gen::<f64>()
}

/// Uniform sample in [-1, 1).
#[inline]
fn gen_signed(rng: &mut dyn RngCore) -> f64 {
    gen_f64(rng) * 2.0 - 1.0
}

/// Generate a random unit vector uniformly distributed on the unit sphere.
pub fn random_unit_vector(rng: &mut dyn RngCore) -> Vec3 {
    // Rejection sampling inside the unit ball, then project to the surface.
    // Tiny vectors are rejected so normalization never blows up.
    loop {
        let v = Vec3::new(gen_signed(rng), gen_signed(rng), gen_signed(rng));
        let len_sq = v.length_squared();
        if 1e-160 < len_sq && len_sq <= 1.0 {
            return v / len_sq.sqrt();
        }
    }
}

/// Sample a random point in the unit disk on the z = 0 plane.
pub fn random_in_unit_disk(rng: &mut dyn RngCore) -> Vec3 {
    loop {
        let p = Vec3::new(gen_signed(rng), gen_signed(rng), 0.0);
        if p.length_squared() < 1.0 {
            return p;
        }
    }
}

/// Sample a random offset in the square [-0.5, 0.5] x [-0.5, 0.5].
pub(crate) fn sample_square(rng: &mut dyn RngCore) -> Vec3 {
    Vec3::new(gen_f64(rng) - 0.5, gen_f64(rng) - 0.5, 0.0)
}
