//! Core path tracing renderer.
//!
//! Implements Monte Carlo path tracing with:
//! - Bounded-depth ray bouncing with multiplicative attenuation
//! - Anti-aliasing via jittered multi-sampling
//! - Thin-lens depth of field (see [`Camera`])

use std::time::Instant;

use crate::{Background, Camera, Color, Hittable, ImageBuffer, RenderError, RenderResult};
use ember_math::{Interval, Ray};
use rand::RngCore;

/// Lower bound on hit distance. Keeps a scattered ray from re-hitting the
/// surface it just left because of floating-point error.
pub const HIT_EPSILON: f64 = 0.001;

/// Compute the color seen by a ray.
///
/// Follows the ray through at most `depth` surface interactions. Each scatter
/// multiplies the path throughput by the material's attenuation; absorption
/// or running out of depth yields black, escaping the scene yields the
/// background scaled by the throughput.
pub fn ray_color(
    ray: &Ray,
    depth: u32,
    world: &dyn Hittable,
    background: &Background,
    rng: &mut dyn RngCore,
) -> Color {
    let mut ray = *ray;
    let mut throughput = Color::ONE;

    for _ in 0..depth {
        let Some(rec) = world.hit(&ray, Interval::new(HIT_EPSILON, f64::INFINITY)) else {
            return throughput * background.color(&ray);
        };

        match rec.material.scatter(&ray, &rec, rng) {
            Some(result) => {
                throughput *= result.attenuation;
                ray = result.scattered;
            }
            None => return Color::ZERO,
        }
    }

    // Bounce budget exhausted
    Color::ZERO
}

/// Compute sky gradient background.
pub fn sky_gradient(ray: &Ray) -> Color {
    let unit_direction = ray.direction().normalize();
    let a = 0.5 * (unit_direction.y + 1.0);
    let white = Color::new(1.0, 1.0, 1.0);
    let blue = Color::new(0.5, 0.7, 1.0);
    (1.0 - a) * white + a * blue
}

/// Render a single pixel with multi-sampling.
///
/// Returns the linear color averaged over the camera's samples per pixel.
pub fn render_pixel(
    camera: &Camera,
    world: &dyn Hittable,
    x: u32,
    y: u32,
    rng: &mut dyn RngCore,
) -> Color {
    let background = camera.background();
    let mut pixel_color = Color::ZERO;

    for _ in 0..camera.samples_per_pixel() {
        let ray = camera.get_ray(x, y, rng);
        pixel_color += ray_color(&ray, camera.max_depth(), world, &background, rng);
    }

    pixel_color * camera.samples_scale()
}

/// Render every pixel, scanlines top to bottom and pixels left to right,
/// handing each finished pixel to `emit`.
///
/// Fails before emitting anything if the camera is not initialized, and stops
/// at the first pixel whose average is NaN or infinite.
pub fn render_to<F>(
    camera: &Camera,
    world: &dyn Hittable,
    rng: &mut dyn RngCore,
    mut emit: F,
) -> RenderResult<()>
where
    F: FnMut(u32, u32, Color),
{
    if !camera.is_initialized() {
        return Err(RenderError::CameraNotInitialized);
    }

    let (width, height) = (camera.image_width(), camera.image_height());
    log::info!(
        "Rendering {}x{} @ {} spp, max depth {}",
        width,
        height,
        camera.samples_per_pixel(),
        camera.max_depth()
    );
    let start = Instant::now();

    for y in 0..height {
        log::debug!("Scanlines remaining: {}", height - y);
        for x in 0..width {
            let color = render_pixel(camera, world, x, y, rng);
            if !color.is_finite() {
                return Err(RenderError::NonFinitePixel { x, y });
            }
            emit(x, y, color);
        }
    }

    log::info!("Rendered in {:?}", start.elapsed());
    Ok(())
}

/// Render the entire scene to an image buffer.
pub fn render(camera: &Camera, world: &dyn Hittable, rng: &mut dyn RngCore) -> RenderResult<ImageBuffer> {
    let mut image = ImageBuffer::new(camera.image_width(), camera.image_height());
    render_to(camera, world, rng, |x, y, color| image.set(x, y, color))?;
    Ok(image)
}
