//! Camera for ray generation.

use crate::sampling::{random_in_unit_disk, sample_square};
use crate::{renderer::sky_gradient, Color, RenderError, RenderResult};
use ember_math::{Point3, Ray, Vec3};
use rand::RngCore;
use serde::{Deserialize, Serialize};

/// What a ray sees when it escapes the scene.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Background {
    /// White-to-blue gradient on the ray's vertical component
    Sky,
    /// A constant color
    Solid(Color),
}

impl Background {
    /// Color for a ray that missed everything.
    #[inline]
    pub fn color(&self, ray: &Ray) -> Color {
        match self {
            Background::Sky => sky_gradient(ray),
            Background::Solid(color) => *color,
        }
    }
}

impl Default for Background {
    fn default() -> Self {
        Background::Sky
    }
}

/// User-facing camera parameters. Everything else is derived from these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    /// Ratio of image width over height
    pub aspect_ratio: f64,
    /// Rendered image width in pixels
    pub image_width: u32,
    /// Random samples averaged per pixel
    pub samples_per_pixel: u32,
    /// Maximum number of bounces per sample
    pub max_depth: u32,
    /// Vertical field of view in degrees
    pub vfov: f64,
    pub look_from: Point3,
    pub look_at: Point3,
    /// Camera-relative up direction
    pub vup: Vec3,
    /// Variation angle of rays through each pixel, in degrees
    pub defocus_angle: f64,
    /// Distance from camera to plane of perfect focus
    pub focus_dist: f64,
    pub background: Background,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            aspect_ratio: 1.0,
            image_width: 100,
            samples_per_pixel: 10,
            max_depth: 10,
            vfov: 90.0,
            look_from: Point3::new(0.0, 0.0, -1.0),
            look_at: Point3::ZERO,
            vup: Vec3::Y,
            defocus_angle: 0.0,
            focus_dist: 10.0,
            background: Background::Sky,
        }
    }
}

/// Largest image the renderer will allocate a buffer for.
const MAX_PIXELS: u64 = 1 << 28;

impl CameraSettings {
    /// Image height derived from width and aspect ratio, at least one row.
    pub fn image_height(&self) -> u32 {
        ((self.image_width as f64 / self.aspect_ratio) as u32).max(1)
    }

    /// Reject settings that would turn into NaN or infinite geometry.
    fn validate(&self) -> RenderResult<()> {
        let invalid = |msg: String| Err(RenderError::InvalidSettings(msg));

        if self.image_width == 0 {
            return invalid("image_width must be at least 1".into());
        }
        if self.samples_per_pixel == 0 {
            return invalid("samples_per_pixel must be at least 1".into());
        }
        if !(self.aspect_ratio.is_finite() && self.aspect_ratio > 0.0) {
            return invalid(format!("aspect_ratio must be positive, got {}", self.aspect_ratio));
        }
        let pixels = self.image_width as u64 * self.image_height() as u64;
        if pixels > MAX_PIXELS {
            return invalid(format!(
                "{}x{} image exceeds {} pixels",
                self.image_width,
                self.image_height(),
                MAX_PIXELS
            ));
        }
        if !(self.vfov > 0.0 && self.vfov < 180.0) {
            return invalid(format!("vfov must be in (0, 180) degrees, got {}", self.vfov));
        }
        if !(self.focus_dist.is_finite() && self.focus_dist > 0.0) {
            return invalid(format!("focus_dist must be positive, got {}", self.focus_dist));
        }
        if !(self.defocus_angle >= 0.0 && self.defocus_angle < 180.0) {
            return invalid(format!(
                "defocus_angle must be in [0, 180) degrees, got {}",
                self.defocus_angle
            ));
        }
        if !(self.look_from.is_finite() && self.look_at.is_finite() && self.vup.is_finite()) {
            return invalid("camera position vectors must be finite".into());
        }
        Ok(())
    }
}

/// Camera for generating rays into the scene.
#[derive(Debug, Clone)]
pub struct Camera {
    settings: CameraSettings,
    initialized: bool,

    // Cached computed values (set by initialize())
    image_height: u32,
    center: Point3,
    pixel00_loc: Point3,
    pixel_delta_u: Vec3,
    pixel_delta_v: Vec3,
    u: Vec3,
    v: Vec3,
    w: Vec3,
    defocus_disk_u: Vec3,
    defocus_disk_v: Vec3,
    samples_scale: f64,
}

impl Camera {
    /// Create a camera from settings. Call [`Camera::initialize`] before use.
    pub fn new(settings: CameraSettings) -> Self {
        Self {
            settings,
            initialized: false,
            image_height: 1,
            center: Point3::ZERO,
            pixel00_loc: Point3::ZERO,
            pixel_delta_u: Vec3::ZERO,
            pixel_delta_v: Vec3::ZERO,
            u: Vec3::X,
            v: Vec3::Y,
            w: Vec3::Z,
            defocus_disk_u: Vec3::ZERO,
            defocus_disk_v: Vec3::ZERO,
            samples_scale: 1.0,
        }
    }

    /// Set image width and aspect ratio; height is derived.
    pub fn with_image(mut self, image_width: u32, aspect_ratio: f64) -> Self {
        self.settings.image_width = image_width;
        self.settings.aspect_ratio = aspect_ratio;
        self.initialized = false;
        self
    }

    /// Set quality settings.
    pub fn with_quality(mut self, samples_per_pixel: u32, max_depth: u32) -> Self {
        self.settings.samples_per_pixel = samples_per_pixel;
        self.settings.max_depth = max_depth;
        self.initialized = false;
        self
    }

    /// Set camera position.
    pub fn with_position(mut self, look_from: Point3, look_at: Point3, vup: Vec3) -> Self {
        self.settings.look_from = look_from;
        self.settings.look_at = look_at;
        self.settings.vup = vup;
        self.initialized = false;
        self
    }

    /// Set lens settings.
    pub fn with_lens(mut self, vfov: f64, defocus_angle: f64, focus_dist: f64) -> Self {
        self.settings.vfov = vfov;
        self.settings.defocus_angle = defocus_angle;
        self.settings.focus_dist = focus_dist;
        self.initialized = false;
        self
    }

    /// Set background.
    pub fn with_background(mut self, background: Background) -> Self {
        self.settings.background = background;
        self
    }

    /// Compute the view basis and viewport. Must be called before generating
    /// rays; calling it again with unchanged settings is a no-op.
    pub fn initialize(&mut self) -> RenderResult<()> {
        if self.initialized {
            return Ok(());
        }

        let s = &self.settings;
        s.validate()?;
        if s.max_depth == 0 {
            log::warn!("max_depth is 0, every pixel will render black");
        }

        self.image_height = s.image_height();
        self.samples_scale = 1.0 / s.samples_per_pixel as f64;
        self.center = s.look_from;

        // Calculate viewport dimensions
        let theta = s.vfov.to_radians();
        let h = (theta / 2.0).tan();
        let viewport_height = 2.0 * h * s.focus_dist;
        let viewport_width = viewport_height * (s.image_width as f64 / self.image_height as f64);

        // Calculate camera basis vectors
        self.w = (s.look_from - s.look_at)
            .try_normalize()
            .ok_or(RenderError::DegenerateVector("look_from and look_at coincide"))?;
        self.u = s
            .vup
            .cross(self.w)
            .try_normalize()
            .ok_or(RenderError::DegenerateVector("vup is parallel to the view direction"))?;
        self.v = self.w.cross(self.u);

        // Vectors across the horizontal and down the vertical viewport edges
        let viewport_u = viewport_width * self.u;
        let viewport_v = -viewport_height * self.v;

        self.pixel_delta_u = viewport_u / s.image_width as f64;
        self.pixel_delta_v = viewport_v / self.image_height as f64;

        let viewport_upper_left =
            self.center - s.focus_dist * self.w - viewport_u / 2.0 - viewport_v / 2.0;
        self.pixel00_loc = viewport_upper_left + 0.5 * (self.pixel_delta_u + self.pixel_delta_v);

        let defocus_radius = s.focus_dist * (s.defocus_angle / 2.0).to_radians().tan();
        self.defocus_disk_u = self.u * defocus_radius;
        self.defocus_disk_v = self.v * defocus_radius;

        log::debug!(
            "Camera initialized: {}x{}, vfov {}, defocus radius {:.4}",
            s.image_width,
            self.image_height,
            s.vfov,
            defocus_radius
        );

        self.initialized = true;
        Ok(())
    }

    /// Generate a ray for pixel (i, j) with random sampling.
    pub fn get_ray(&self, i: u32, j: u32, rng: &mut dyn RngCore) -> Ray {
        debug_assert!(self.initialized, "Camera::get_ray called before initialize");

        let offset = sample_square(rng);
        let pixel_sample = self.pixel00_loc
            + (i as f64 + offset.x) * self.pixel_delta_u
            + (j as f64 + offset.y) * self.pixel_delta_v;

        let ray_origin = if self.settings.defocus_angle <= 0.0 {
            self.center
        } else {
            self.defocus_disk_sample(rng)
        };

        Ray::new(ray_origin, pixel_sample - ray_origin)
    }

    /// Sample a point on the defocus disk.
    fn defocus_disk_sample(&self, rng: &mut dyn RngCore) -> Point3 {
        let p = random_in_unit_disk(rng);
        self.center + p.x * self.defocus_disk_u + p.y * self.defocus_disk_v
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn settings(&self) -> &CameraSettings {
        &self.settings
    }

    pub fn image_width(&self) -> u32 {
        self.settings.image_width
    }

    /// Derived from width and aspect ratio; valid after initialize.
    pub fn image_height(&self) -> u32 {
        self.image_height
    }

    pub fn samples_per_pixel(&self) -> u32 {
        self.settings.samples_per_pixel
    }

    pub fn max_depth(&self) -> u32 {
        self.settings.max_depth
    }

    pub fn background(&self) -> Background {
        self.settings.background
    }

    pub fn center(&self) -> Point3 {
        self.center
    }

    /// Get the samples scale factor (1 / samples_per_pixel).
    pub fn samples_scale(&self) -> f64 {
        self.samples_scale
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(CameraSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn looking_down_z() -> Camera {
        Camera::default()
            .with_image(100, 1.0)
            .with_position(Point3::ZERO, Point3::new(0.0, 0.0, -1.0), Vec3::Y)
            .with_lens(90.0, 0.0, 1.0)
    }

    #[test]
    fn test_camera_initialize() {
        let mut camera = Camera::default()
            .with_image(400, 2.0)
            .with_position(Point3::ZERO, Point3::new(0.0, 0.0, -1.0), Vec3::Y)
            .with_lens(90.0, 0.0, 1.0);

        camera.initialize().unwrap();

        assert!(camera.is_initialized());
        assert_eq!(camera.image_height(), 200);
        assert_eq!(camera.settings().image_height(), 200);
        assert_eq!(camera.settings().look_at, Point3::new(0.0, 0.0, -1.0));
        assert_eq!(camera.center(), Point3::ZERO);
        assert!((camera.w - Vec3::Z).length() < 1e-12);
        assert!((camera.u - Vec3::X).length() < 1e-12);
        assert!((camera.v - Vec3::Y).length() < 1e-12);
    }

    #[test]
    fn test_image_height_at_least_one() {
        let mut camera = Camera::default().with_image(10, 100.0);
        camera.initialize().unwrap();
        assert_eq!(camera.image_height(), 1);
    }

    #[test]
    fn test_initialize_is_idempotent() {
        let mut camera = looking_down_z();
        camera.initialize().unwrap();
        let pixel00 = camera.pixel00_loc;
        camera.initialize().unwrap();
        assert_eq!(camera.pixel00_loc, pixel00);
    }

    #[test]
    fn test_builder_resets_initialization() {
        let mut camera = looking_down_z();
        camera.initialize().unwrap();
        let camera = camera.with_quality(4, 5);
        assert!(!camera.is_initialized());
    }

    #[test]
    fn test_pixel_grid_corners() {
        let mut camera = looking_down_z();
        camera.initialize().unwrap();

        // vfov 90 at focus distance 1 spans [-1, 1] on both axes
        let half = 1.0 / 100.0;
        assert!((camera.pixel00_loc - Point3::new(-1.0 + half, 1.0 - half, -1.0)).length() < 1e-12);
        assert!((camera.pixel_delta_u - Vec3::new(0.02, 0.0, 0.0)).length() < 1e-12);
        assert!((camera.pixel_delta_v - Vec3::new(0.0, -0.02, 0.0)).length() < 1e-12);
    }

    #[test]
    fn test_camera_ray_stays_within_pixel() {
        let mut camera = looking_down_z();
        camera.initialize().unwrap();
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..200 {
            let ray = camera.get_ray(50, 50, &mut rng);
            assert_eq!(ray.origin(), Point3::ZERO);

            // Direction hits the focus plane inside pixel (50, 50)
            let d = ray.direction();
            assert!((d.z + 1.0).abs() < 1e-12);
            assert!(d.x >= 0.0 - 1e-12 && d.x <= 0.02 + 1e-12);
            assert!(d.y <= 0.0 + 1e-12 && d.y >= -0.02 - 1e-12);
        }
    }

    #[test]
    fn test_defocus_origin_on_disk() {
        let mut camera = looking_down_z().with_lens(90.0, 10.0, 2.0);
        camera.initialize().unwrap();
        let radius = 2.0 * (5.0f64).to_radians().tan();
        let mut rng = StdRng::seed_from_u64(8);

        let mut moved = false;
        for _ in 0..200 {
            let ray = camera.get_ray(10, 20, &mut rng);
            let origin = ray.origin();
            // The lens lies in the camera's u-v plane
            assert!(origin.z.abs() < 1e-12);
            assert!(origin.length() <= radius + 1e-12);
            moved |= origin.length() > 0.0;
        }
        assert!(moved);
    }

    #[test]
    fn test_degenerate_basis_rejected() {
        let mut same_point = Camera::default().with_position(Point3::ONE, Point3::ONE, Vec3::Y);
        assert!(matches!(same_point.initialize(), Err(RenderError::DegenerateVector(_))));

        let mut straight_up = Camera::default().with_position(Point3::ZERO, Point3::new(0.0, 5.0, 0.0), Vec3::Y);
        assert!(matches!(straight_up.initialize(), Err(RenderError::DegenerateVector(_))));
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let mut no_width = Camera::default().with_image(0, 1.0);
        assert!(matches!(no_width.initialize(), Err(RenderError::InvalidSettings(_))));

        let mut no_samples = Camera::default().with_quality(0, 10);
        assert!(matches!(no_samples.initialize(), Err(RenderError::InvalidSettings(_))));

        let mut bad_focus = Camera::default().with_lens(20.0, 1.0, 0.0);
        assert!(matches!(bad_focus.initialize(), Err(RenderError::InvalidSettings(_))));
        assert!(!bad_focus.is_initialized());
    }

    #[test]
    fn test_oversized_image_rejected() {
        // A tiny aspect ratio saturates the derived height
        let settings = CameraSettings {
            aspect_ratio: 1e-9,
            image_width: 100,
            ..CameraSettings::default()
        };
        assert_eq!(settings.image_height(), u32::MAX);

        let mut camera = Camera::new(settings);
        assert!(matches!(camera.initialize(), Err(RenderError::InvalidSettings(_))));
        assert!(!camera.is_initialized());

        let mut wide = Camera::default().with_image(1 << 20, 1.0);
        assert!(matches!(wide.initialize(), Err(RenderError::InvalidSettings(_))));

        let mut largest = Camera::default().with_image(1 << 14, 1.0);
        largest.initialize().unwrap();
        assert_eq!(largest.image_height(), 1 << 14);
    }

    #[test]
    fn test_settings_from_partial_json() {
        let json = r#"{
            "image_width": 400,
            "aspect_ratio": 1.7777777777777777,
            "look_from": [13.0, 2.0, 3.0],
            "background": { "solid": [0.0, 0.0, 0.0] }
        }"#;
        let settings: CameraSettings = serde_json::from_str(json).unwrap();

        assert_eq!(settings.image_width, 400);
        assert_eq!(settings.look_from, Point3::new(13.0, 2.0, 3.0));
        assert_eq!(settings.background, Background::Solid(Color::ZERO));
        // Unspecified fields keep their defaults
        assert_eq!(settings.samples_per_pixel, 10);
        assert_eq!(settings.vup, Vec3::Y);
    }
}
