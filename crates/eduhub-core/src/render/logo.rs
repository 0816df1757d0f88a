//! Text logos for `/gen`.

use image::{ImageBuffer, Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_filled_rect_mut};
use imageproc::rect::Rect;
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use super::fit::{fit_font_size, FitBox, TextMeasure};
use super::font::FontPool;
use super::palette::{add_noise, color, paint_background, Palette, PALETTES};
use super::{encode_png, RenderError};

pub const LOGO_WIDTH: u32 = 1024;
pub const LOGO_HEIGHT: u32 = 512;
const PADDING: u32 = 96;
const BORDER_INSET: i32 = 32;
const BORDER_THICKNESS: i32 = 10;
const CORNER_RADIUS: i32 = 48;

const LOGO_FIT: FitBox = FitBox {
    initial: 160.0,
    min: 28.0,
    step: 4.0,
    max_width: (LOGO_WIDTH - 2 * PADDING) as f32,
};

/// Decoration drawn around or under the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Border {
    None,
    Frame,
    RoundedFrame,
    Underline,
}

const BORDERS: &[Border] = &[Border::None, Border::Frame, Border::RoundedFrame, Border::Underline];

#[derive(Debug, Clone)]
pub struct LogoStyle {
    pub palette: Palette,
    pub border: Border,
    /// Noise amplitude per channel; 0 disables the texture.
    pub noise: u8,
    pub font_hint: Option<String>,
}

impl LogoStyle {
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let palette = PALETTES.choose(rng).copied().unwrap_or(PALETTES[0]);
        let border = BORDERS.choose(rng).copied().unwrap_or(Border::None);
        let noise = if rng.gen_bool(0.5) { rng.gen_range(4..=14) } else { 0 };
        Self {
            palette,
            border,
            noise,
            font_hint: None,
        }
    }
}

/// Render `text` as a PNG logo.
pub fn render_logo<R: Rng + ?Sized>(
    fonts: &FontPool,
    text: &str,
    style: &LogoStyle,
    rng: &mut R,
) -> Result<Vec<u8>, RenderError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(RenderError::EmptyText);
    }
    let font = fonts.pick(style.font_hint.as_deref(), rng)?;

    let mut img: RgbaImage = ImageBuffer::from_pixel(LOGO_WIDTH, LOGO_HEIGHT, Rgba([0, 0, 0, 255]));
    paint_background(&mut img, style.palette.background);
    add_noise(&mut img, style.noise, rng);

    let accent = color(style.palette.accent);
    draw_border(&mut img, style.border, accent);

    let size = fit_font_size(font, text, LOGO_FIT);
    let width = font.text_width(text, size);
    let x = ((LOGO_WIDTH as f32 - width) / 2.0).round() as i32;
    let y = ((LOGO_HEIGHT as f32 - size) / 2.0).round() as i32;

    let shadow = Rgba([0, 0, 0, 90]);
    let offset = (size / 24.0).round().max(2.0) as i32;
    font.draw(&mut img, text, x + offset, y + offset, size, shadow);
    font.draw(&mut img, text, x, y, size, color(style.palette.text));

    debug!(
        font = %font.name(),
        palette = style.palette.name,
        border = ?style.border,
        size,
        "Rendered logo"
    );
    encode_png(img)
}

fn draw_border(img: &mut RgbaImage, border: Border, accent: Rgba<u8>) {
    let (w, h) = (img.width() as i32, img.height() as i32);
    let inner_w = w - 2 * BORDER_INSET;
    let inner_h = h - 2 * BORDER_INSET;

    match border {
        Border::None => {}
        Border::Frame => {
            let t = BORDER_THICKNESS as u32;
            let edges = [
                Rect::at(BORDER_INSET, BORDER_INSET).of_size(inner_w as u32, t),
                Rect::at(BORDER_INSET, h - BORDER_INSET - BORDER_THICKNESS).of_size(inner_w as u32, t),
                Rect::at(BORDER_INSET, BORDER_INSET).of_size(t, inner_h as u32),
                Rect::at(w - BORDER_INSET - BORDER_THICKNESS, BORDER_INSET).of_size(t, inner_h as u32),
            ];
            for edge in edges {
                draw_filled_rect_mut(img, edge, accent);
            }
        }
        Border::RoundedFrame => {
            let outer = (BORDER_INSET, BORDER_INSET, inner_w, inner_h, CORNER_RADIUS);
            let inner = (
                BORDER_INSET + BORDER_THICKNESS,
                BORDER_INSET + BORDER_THICKNESS,
                inner_w - 2 * BORDER_THICKNESS,
                inner_h - 2 * BORDER_THICKNESS,
                CORNER_RADIUS - BORDER_THICKNESS,
            );
            for (x, y, pixel) in img.enumerate_pixels_mut() {
                let (x, y) = (x as i32, y as i32);
                if in_rounded_rect(x, y, outer) && !in_rounded_rect(x, y, inner) {
                    *pixel = accent;
                }
            }
        }
        Border::Underline => {
            // Pill-shaped bar under the text line.
            let radius = BORDER_THICKNESS / 2 + 2;
            let cy = h - BORDER_INSET * 3;
            let left = PADDING as i32 + radius;
            let right = w - PADDING as i32 - radius;
            draw_filled_circle_mut(img, (left, cy), radius, accent);
            draw_filled_circle_mut(img, (right, cy), radius, accent);
            draw_filled_rect_mut(
                img,
                Rect::at(left, cy - radius).of_size((right - left) as u32, (radius * 2 + 1) as u32),
                accent,
            );
        }
    }
}

/// Whether (`x`, `y`) lies inside the rectangle `(left, top, width, height, radius)`.
fn in_rounded_rect(x: i32, y: i32, (left, top, width, height, radius): (i32, i32, i32, i32, i32)) -> bool {
    let right = left + width - 1;
    let bottom = top + height - 1;
    if x < left || x > right || y < top || y > bottom {
        return false;
    }
    let radius = radius.max(0);
    let cx = x.clamp(left + radius, right - radius);
    let cy = y.clamp(top + radius, bottom - radius);
    let (dx, dy) = (x - cx, y - cy);
    dx * dx + dy * dy <= radius * radius
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::font::fixture_pool;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_empty_pool_is_an_error() {
        let mut rng = StdRng::seed_from_u64(3);
        let style = LogoStyle::random(&mut rng);

        let err = render_logo(&FontPool::default(), "EduHub", &style, &mut rng).unwrap_err();
        assert!(matches!(err, RenderError::NoFonts(_)));
    }

    #[test]
    fn test_blank_text_is_rejected_before_fonts() {
        let mut rng = StdRng::seed_from_u64(3);
        let style = LogoStyle::random(&mut rng);

        let err = render_logo(&FontPool::default(), "   ", &style, &mut rng).unwrap_err();
        assert!(matches!(err, RenderError::EmptyText));
    }

    #[test]
    fn test_logo_renders_with_real_font() {
        let pool = fixture_pool();
        let mut rng = StdRng::seed_from_u64(21);
        let names = ["EduHub", "NEET Toppers 2026 📚", &"W".repeat(300), "a"];

        for name in names {
            let style = LogoStyle::random(&mut rng);
            let png = render_logo(&pool, name, &style, &mut rng).unwrap();
            let img = image::load_from_memory(&png).unwrap().to_rgba8();

            assert_eq!(img.dimensions(), (LOGO_WIDTH, LOGO_HEIGHT));
            let text = color(style.palette.text);
            let inked = img
                .pixels()
                .filter(|p| (0..3).all(|c| p[c].abs_diff(text[c]) <= 8))
                .count();
            assert!(inked > 0, "no text pixels for {name:?} with {}", style.palette.name);
        }
    }

    #[test]
    fn test_random_style_uses_known_palette() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..50 {
            let style = LogoStyle::random(&mut rng);
            assert!(PALETTES.contains(&style.palette));
            assert!(style.noise == 0 || (4..=14).contains(&style.noise));
        }
    }

    #[test]
    fn test_borders_paint_accent() {
        let accent = Rgba([255, 0, 0, 255]);
        let blank = Rgba([0, 0, 0, 255]);

        for border in [Border::Frame, Border::RoundedFrame] {
            let mut img = ImageBuffer::from_pixel(LOGO_WIDTH, LOGO_HEIGHT, blank);
            draw_border(&mut img, border, accent);
            let mid_left = (BORDER_INSET + BORDER_THICKNESS / 2) as u32;
            assert_eq!(*img.get_pixel(mid_left, LOGO_HEIGHT / 2), accent, "{border:?}");
            assert_eq!(*img.get_pixel(LOGO_WIDTH / 2, LOGO_HEIGHT / 2), blank, "{border:?}");
            assert_eq!(*img.get_pixel(0, 0), blank, "{border:?}");
        }

        let mut img = ImageBuffer::from_pixel(LOGO_WIDTH, LOGO_HEIGHT, blank);
        draw_border(&mut img, Border::None, accent);
        assert!(img.pixels().all(|p| *p == blank));
    }

    #[test]
    fn test_rounded_rect_corners_are_cut() {
        let rect = (0, 0, 100, 100, 20);
        assert!(in_rounded_rect(50, 0, rect));
        assert!(in_rounded_rect(20, 20, rect));
        assert!(!in_rounded_rect(0, 0, rect));
        assert!(!in_rounded_rect(100, 50, rect));
    }
}
