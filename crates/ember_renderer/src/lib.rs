//! Ember - CPU path tracing.
//!
//! A Monte Carlo path tracer: a camera casts jittered rays into a list of
//! hittable shapes, materials scatter them, and each pixel averages the
//! resulting color estimates.

mod camera;
mod error;
mod hittable;
mod material;
mod output;
mod renderer;
mod sampling;
mod sphere;

pub use camera::{Background, Camera, CameraSettings};
pub use error::{RenderError, RenderResult};
pub use hittable::{HitRecord, Hittable, HittableList};
pub use material::{Color, Dielectric, Lambertian, Material, Metal, ScatterResult};
pub use output::{color_to_rgb8, linear_to_gamma, ImageBuffer};
pub use renderer::{ray_color, render, render_pixel, render_to, sky_gradient, HIT_EPSILON};
pub use sampling::{random_in_unit_disk, random_unit_vector};
pub use sphere::Sphere;

/// Re-export the math types from ember_math
pub use ember_math::{Interval, Point3, Ray, Vec3};
