//! CAPTCHA rendering.
//!
//! Validates the font/image/phrase configuration and renders the phrase onto
//! a copy of the background image.

use ab_glyph::{Font, FontVec, PxScale, ScaleFont};
use image::Rgb;
use imageproc::drawing::draw_text_mut;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

use crate::error::{CaptchaError, Result};
use crate::format::BackgroundFormat;
use crate::phrase::{self, MIN_PHRASE_LENGTH};

/// Default font size, in points as GD-style renderers interpret them.
pub const DEFAULT_FONT_SIZE: i32 = 17;
/// Default horizontal offset, measured leftward from the right edge.
pub const DEFAULT_FONT_X_MARGIN: i32 = 55;
/// Default vertical offset, measured upward from the bottom edge.
pub const DEFAULT_FONT_Y_MARGIN: i32 = 4;

/// Color the phrase is drawn in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FontColor {
    Black,
    White,
    #[default]
    Blue,
}

impl FromStr for FontColor {
    type Err = ();

    /// Unrecognized names resolve to [`FontColor::Blue`] rather than failing.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "black" => Ok(Self::Black),
            "white" => Ok(Self::White),
            _ => Ok(Self::Blue),
        }
    }
}

impl FontColor {
    const fn rgb(self) -> Rgb<u8> {
        match self {
            Self::Black => Rgb([0, 0, 0]),
            Self::White => Rgb([255, 255, 255]),
            Self::Blue => Rgb([0, 76, 134]),
        }
    }
}

/// A rendered CAPTCHA: encoded image bytes plus the HTTP content type the
/// caller should serve them under.
#[derive(Debug, Clone)]
pub struct CaptchaImage {
    pub bytes: Vec<u8>,
    pub content_type: &'static str,
}

/// Renders a random verification phrase onto a background image.
///
/// The phrase is generated once at construction; retrieve it with
/// [`phrase`](Self::phrase) and persist it server-side for later comparison.
///
/// ```no_run
/// use captcha_stamp::CaptchaRenderer;
///
/// # fn main() -> captcha_stamp::Result<()> {
/// let mut captcha = CaptchaRenderer::new("arial.ttf", "backdrop.png", 5)?;
/// let phrase = captcha.phrase().to_string(); // store in the session
/// let image = captcha.render()?;
/// // serve image.bytes with Content-Type: image.content_type
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct CaptchaRenderer {
    font: PathBuf,
    image: PathBuf,
    phrase_length: usize,
    phrase: String,
    font_size: i32,
    font_x_margin: i32,
    font_y_margin: i32,
    font_color: FontColor,
}

impl CaptchaRenderer {
    /// Creates a renderer and generates its initial phrase.
    ///
    /// # Errors
    ///
    /// Returns [`CaptchaError::MissingDependency`] when the linked image
    /// library cannot handle one of the supported formats, and
    /// [`CaptchaError::InvalidConfig`] when a path does not exist or
    /// `phrase_length` is below [`MIN_PHRASE_LENGTH`].
    pub fn new(
        font: impl AsRef<Path>,
        image: impl AsRef<Path>,
        phrase_length: usize,
    ) -> Result<Self> {
        for format in BackgroundFormat::ALL {
            if !format.codec_available() {
                return Err(CaptchaError::MissingDependency(format.content_type()));
            }
        }

        let mut renderer = Self {
            font: PathBuf::new(),
            image: PathBuf::new(),
            phrase_length: MIN_PHRASE_LENGTH,
            phrase: String::new(),
            font_size: DEFAULT_FONT_SIZE,
            font_x_margin: DEFAULT_FONT_X_MARGIN,
            font_y_margin: DEFAULT_FONT_Y_MARGIN,
            font_color: FontColor::default(),
        };
        renderer.set_font(font)?;
        renderer.set_image(image)?;
        renderer.set_phrase_length(phrase_length)?;
        renderer.phrase = phrase::random_phrase(renderer.phrase_length);
        Ok(renderer)
    }

    /// Sets the font file.
    ///
    /// # Errors
    ///
    /// Returns [`CaptchaError::InvalidConfig`] when the path does not exist.
    pub fn set_font(&mut self, font: impl AsRef<Path>) -> Result<&mut Self> {
        let font = font.as_ref();
        if !font.exists() {
            return Err(CaptchaError::InvalidConfig(format!(
                "the font file does not exist: {}",
                font.display()
            )));
        }
        self.font = font.to_path_buf();
        Ok(self)
    }

    /// Sets the background image file.
    ///
    /// # Errors
    ///
    /// Returns [`CaptchaError::InvalidConfig`] when the path does not exist.
    pub fn set_image(&mut self, image: impl AsRef<Path>) -> Result<&mut Self> {
        let image = image.as_ref();
        if !image.exists() {
            return Err(CaptchaError::InvalidConfig(format!(
                "the background image does not exist: {}",
                image.display()
            )));
        }
        self.image = image.to_path_buf();
        Ok(self)
    }

    /// Sets how many characters internally generated phrases have.
    ///
    /// Does not touch the current phrase; call
    /// [`regenerate_phrase`](Self::regenerate_phrase) afterwards if a fresh
    /// one is wanted.
    ///
    /// # Errors
    ///
    /// Returns [`CaptchaError::InvalidConfig`] when `phrase_length` is below
    /// [`MIN_PHRASE_LENGTH`].
    pub fn set_phrase_length(&mut self, phrase_length: usize) -> Result<&mut Self> {
        if phrase_length < MIN_PHRASE_LENGTH {
            return Err(CaptchaError::InvalidConfig(format!(
                "the phrase length must be at least {MIN_PHRASE_LENGTH}"
            )));
        }
        self.phrase_length = phrase_length;
        Ok(self)
    }

    /// Sets the font size in points.
    pub fn set_font_size(&mut self, font_size: i32) -> &mut Self {
        self.font_size = font_size;
        self
    }

    /// Sets the horizontal offset from the image's right edge, in pixels.
    pub fn set_font_x_margin(&mut self, font_x_margin: i32) -> &mut Self {
        self.font_x_margin = font_x_margin;
        self
    }

    /// Sets the vertical offset from the image's bottom edge, in pixels.
    pub fn set_font_y_margin(&mut self, font_y_margin: i32) -> &mut Self {
        self.font_y_margin = font_y_margin;
        self
    }

    /// Sets the text color.
    pub fn set_font_color(&mut self, font_color: FontColor) -> &mut Self {
        self.font_color = font_color;
        self
    }

    /// Overwrites the phrase without any validation.
    ///
    /// This is a trusted override: unlike internal generation it skips the
    /// minimum-length rule, so callers can normalize casing or inject a
    /// known phrase before persisting it.
    pub fn set_phrase(&mut self, phrase: impl Into<String>) -> &mut Self {
        self.phrase = phrase.into();
        self
    }

    /// Returns the current phrase.
    #[must_use]
    pub fn phrase(&self) -> &str {
        &self.phrase
    }

    /// Replaces the phrase with a freshly generated one of the configured
    /// length.
    pub fn regenerate_phrase(&mut self) -> &mut Self {
        self.phrase = phrase::random_phrase(self.phrase_length);
        self
    }

    /// Renders the phrase onto a copy of the background image and encodes
    /// the result in the background's own format.
    ///
    /// Repeated calls with unchanged configuration produce the same output.
    ///
    /// # Errors
    ///
    /// Returns [`CaptchaError::UnsupportedImageFormat`] when the background
    /// content is not PNG/JPEG/GIF, [`CaptchaError::InvalidFont`] when the
    /// font file cannot be parsed, and [`CaptchaError::Io`] /
    /// [`CaptchaError::Image`] for filesystem and codec failures.
    pub fn render(&self) -> Result<CaptchaImage> {
        let background = fs::read(&self.image)?;
        let format = BackgroundFormat::detect(&background)?;
        let mut canvas = format.decode(&background)?;

        let font_bytes = fs::read(&self.font)?;
        let font =
            FontVec::try_from_vec(font_bytes).map_err(|e| CaptchaError::InvalidFont(e.to_string()))?;

        // GD-style point sizes assume 96 dpi.
        let scale = PxScale::from(to_f32(self.font_size) * 96.0 / 72.0);
        let ascent = font.as_scaled(scale).ascent();

        let (width, height) = canvas.dimensions();
        let x = i32::try_from(width).unwrap_or(i32::MAX) - self.font_x_margin;
        let baseline = i32::try_from(height).unwrap_or(i32::MAX) - self.font_y_margin;
        // draw_text_mut anchors at the glyph top; shift up by the ascent so
        // (x, baseline) behaves as a baseline origin.
        let y = baseline - round_to_i32(ascent);

        debug!(
            format = ?format,
            width,
            height,
            x,
            y,
            phrase_len = self.phrase.len(),
            "rendering captcha phrase"
        );

        draw_text_mut(&mut canvas, self.font_color.rgb(), x, y, scale, &font, &self.phrase);

        let bytes = format.encode(&canvas)?;
        Ok(CaptchaImage {
            bytes,
            content_type: format.content_type(),
        })
    }
}

#[inline]
fn round_to_i32(val: f32) -> i32 {
    let clamped = val.round().clamp(f32::from(i16::MIN), f32::from(i16::MAX));
    format!("{clamped:.0}").parse().unwrap_or(0)
}

#[inline]
fn to_f32(val: i32) -> f32 {
    f32::from(i16::try_from(val).unwrap_or(i16::MAX))
}
