//! Ember math - vectors, rays and intervals shared by the renderer.

pub use glam::DVec3;

mod interval;
mod ray;

pub use interval::Interval;
pub use ray::Ray;

/// Points, directions and colors all use the same double-precision triple.
pub type Vec3 = DVec3;

/// A position in world space.
pub type Point3 = DVec3;

/// Components below this magnitude are treated as zero by [`near_zero`].
pub const NEAR_ZERO_EPSILON: f64 = 1e-8;

/// Returns true if every component of `v` is close to zero.
#[inline]
pub fn near_zero(v: Vec3) -> bool {
    v.abs().max_element() < NEAR_ZERO_EPSILON
}

/// Reflect `v` about the unit normal `n`.
#[inline]
pub fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Refract the unit vector `uv` through a surface with unit normal `n`.
///
/// `etai_over_etat` is the ratio of refractive indices (incident over
/// transmitted). The caller is responsible for checking total internal
/// reflection first.
#[inline]
pub fn refract(uv: Vec3, n: Vec3, etai_over_etat: f64) -> Vec3 {
    let cos_theta = (-uv).dot(n).min(1.0);
    let r_out_perp = etai_over_etat * (uv + cos_theta * n);
    let r_out_parallel = -(1.0 - r_out_perp.length_squared()).abs().sqrt() * n;
    r_out_perp + r_out_parallel
}
