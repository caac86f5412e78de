//! Background image format detection and codec dispatch.
//!
//! The three supported formats share one decode/encode strategy so the
//! per-format differences live in exactly one place.

use image::{GenericImage, ImageFormat, RgbImage};
use std::io::Cursor;

use crate::error::{CaptchaError, Result};

/// A supported background image format, detected from file content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackgroundFormat {
    Png,
    Jpeg,
    Gif,
}

impl BackgroundFormat {
    /// All formats a background image may use.
    pub const ALL: [Self; 3] = [Self::Png, Self::Jpeg, Self::Gif];

    /// Detects the format by sniffing the leading bytes. The filename plays
    /// no part in the decision.
    ///
    /// # Errors
    ///
    /// Returns [`CaptchaError::UnsupportedImageFormat`] when the content is
    /// not PNG, JPEG, or GIF.
    pub fn detect(bytes: &[u8]) -> Result<Self> {
        match image::guess_format(bytes) {
            Ok(ImageFormat::Png) => Ok(Self::Png),
            Ok(ImageFormat::Jpeg) => Ok(Self::Jpeg),
            Ok(ImageFormat::Gif) => Ok(Self::Gif),
            _ => Err(CaptchaError::UnsupportedImageFormat),
        }
    }

    /// HTTP content type matching this format.
    #[must_use]
    pub const fn content_type(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Gif => "image/gif",
        }
    }

    const fn image_format(self) -> ImageFormat {
        match self {
            Self::Png => ImageFormat::Png,
            Self::Jpeg => ImageFormat::Jpeg,
            Self::Gif => ImageFormat::Gif,
        }
    }

    /// Whether the linked `image` build can both read and write this format.
    #[must_use]
    pub fn codec_available(self) -> bool {
        let format = self.image_format();
        format.reading_enabled() && format.writing_enabled()
    }

    /// Decodes `bytes` into a true-color canvas.
    ///
    /// GIF sources are paletted; their pixels are copied into a freshly
    /// allocated true-color buffer of identical dimensions so text can later
    /// be drawn in an arbitrary color without palette-size limits.
    ///
    /// # Errors
    ///
    /// Returns [`CaptchaError::Image`] when the codec rejects the bytes.
    pub fn decode(self, bytes: &[u8]) -> Result<RgbImage> {
        let decoded = image::load_from_memory_with_format(bytes, self.image_format())?;
        match self {
            Self::Gif => {
                let src = decoded.to_rgb8();
                let (width, height) = src.dimensions();
                let mut canvas = RgbImage::new(width, height);
                canvas.copy_from(&src, 0, 0)?;
                Ok(canvas)
            }
            Self::Png | Self::Jpeg => Ok(decoded.to_rgb8()),
        }
    }

    /// Encodes `canvas` back into this format.
    ///
    /// # Errors
    ///
    /// Returns [`CaptchaError::Image`] when encoding fails.
    pub fn encode(self, canvas: &RgbImage) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        canvas.write_to(&mut Cursor::new(&mut out), self.image_format())?;
        Ok(out)
    }
}
