//! PNG rendering for logos and quiz cards.
//!
//! Everything here is synchronous and CPU-bound; async callers should run it
//! on a blocking thread.

mod card;
mod fit;
mod font;
mod logo;
mod palette;

use std::io::Cursor;

use image::{DynamicImage, ImageFormat, RgbaImage};
use thiserror::Error;

pub use card::{render_quiz_card, CARD_SIZE};
pub use fit::{fit_font_size, fit_wrapped, wrap_text, FitBox, TextMeasure};
pub use font::{FontPool, LoadedFont};
pub use logo::{render_logo, Border, LogoStyle, LOGO_HEIGHT, LOGO_WIDTH};
pub use palette::{add_noise, hex_to_rgba, paint_background, Background, Palette, PALETTES};

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("No usable fonts in {0}")]
    NoFonts(String),

    #[error("Invalid font: {0}")]
    InvalidFont(String),

    #[error("Nothing to render")]
    EmptyText,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image encoding failed: {0}")]
    Encode(#[from] image::ImageError),
}

pub(crate) fn encode_png(img: RgbaImage) -> Result<Vec<u8>, RenderError> {
    let mut buf = Cursor::new(Vec::new());
    DynamicImage::ImageRgba8(img).write_to(&mut buf, ImageFormat::Png)?;
    Ok(buf.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_encode_png_signature() {
        let img = RgbaImage::from_pixel(8, 4, Rgba([10, 20, 30, 255]));
        let bytes = encode_png(img).unwrap();

        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (8, 4));
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            RenderError::NoFonts("/srv/fonts".into()).to_string(),
            "No usable fonts in /srv/fonts"
        );
    }
}
