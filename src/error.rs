//! Error types and result aliases.
//!
//! Defines the core `CaptchaError` enumeration and common `Result` type.

use thiserror::Error;

/// CAPTCHA generation errors.
#[derive(Debug, Error)]
pub enum CaptchaError {
    /// A required image codec is not compiled into this build.
    #[error("codec support for {0} is missing from this build")]
    MissingDependency(&'static str),

    /// A constructor or setter argument failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The background image is not PNG, JPEG, or GIF.
    #[error("unsupported background image format")]
    UnsupportedImageFormat,

    /// The font file exists but is not a parseable TrueType/OpenType font.
    #[error("invalid font file: {0}")]
    InvalidFont(String),

    /// Filesystem error while reading the font or background image.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// Decode or encode failure inside the image codec.
    #[error("image codec error: {0}")]
    Image(#[from] image::ImageError),
}

/// Result type alias for `CaptchaError`.
pub type Result<T> = std::result::Result<T, CaptchaError>;
