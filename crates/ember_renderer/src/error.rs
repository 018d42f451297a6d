//! Errors raised when a scene or camera cannot produce a valid image.

use thiserror::Error;

/// Errors that can occur while setting up or running a render.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Sphere radius must be positive and finite, got {0}")]
    InvalidRadius(f64),

    #[error("Index of refraction must be positive and finite, got {0}")]
    InvalidIor(f64),

    #[error("Cannot normalize zero-length vector: {0}")]
    DegenerateVector(&'static str),

    #[error("Invalid camera settings: {0}")]
    InvalidSettings(String),

    #[error("Camera must be initialized before rendering")]
    CameraNotInitialized,

    #[error("Pixel ({x}, {y}) accumulated a non-finite color")]
    NonFinitePixel { x: u32, y: u32 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),
}

/// Result type for rendering operations.
pub type RenderResult<T> = Result<T, RenderError>;
