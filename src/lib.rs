//! Background-image CAPTCHA generation.
//!
//! Generates a random verification phrase and renders it onto a
//! caller-supplied background image (PNG, JPEG, or GIF), returning the
//! encoded bytes plus the matching content type. The surrounding
//! application owns the HTTP response and the server-side storage of the
//! phrase; this crate only produces the challenge.

pub mod error;
pub mod format;
pub mod phrase;
pub mod renderer;

pub use error::{CaptchaError, Result};
pub use format::BackgroundFormat;
pub use phrase::{MIN_PHRASE_LENGTH, random_phrase, random_phrase_with};
pub use renderer::{CaptchaImage, CaptchaRenderer, FontColor};
