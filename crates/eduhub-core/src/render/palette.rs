//! Background palettes and fills.

use image::{Rgba, RgbaImage};
use rand::Rng;

/// How a palette paints the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Background {
    Solid(&'static str),
    /// Top to bottom.
    Vertical(&'static str, &'static str),
    /// Top-left to bottom-right.
    Diagonal(&'static str, &'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub name: &'static str,
    pub background: Background,
    pub text: &'static str,
    pub accent: &'static str,
}

pub const PALETTES: &[Palette] = &[
    Palette {
        name: "midnight",
        background: Background::Vertical("#0f172a", "#1e3a8a"),
        text: "#f8fafc",
        accent: "#38bdf8",
    },
    Palette {
        name: "sunset",
        background: Background::Diagonal("#f97316", "#db2777"),
        text: "#ffffff",
        accent: "#fde68a",
    },
    Palette {
        name: "forest",
        background: Background::Vertical("#064e3b", "#10b981"),
        text: "#ecfdf5",
        accent: "#a7f3d0",
    },
    Palette {
        name: "paper",
        background: Background::Solid("#fdf6e3"),
        text: "#1f2937",
        accent: "#b45309",
    },
    Palette {
        name: "royal",
        background: Background::Diagonal("#4c1d95", "#7c3aed"),
        text: "#faf5ff",
        accent: "#f0abfc",
    },
    Palette {
        name: "slate",
        background: Background::Solid("#111827"),
        text: "#e5e7eb",
        accent: "#f59e0b",
    },
];

/// Parse `#rrggbb` or `#rrggbbaa` (leading `#` optional).
pub fn hex_to_rgba(hex: &str) -> Option<Rgba<u8>> {
    let hex = hex.trim().trim_start_matches('#');
    if !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();

    match hex.len() {
        6 => Some(Rgba([channel(0)?, channel(2)?, channel(4)?, 255])),
        8 => Some(Rgba([channel(0)?, channel(2)?, channel(4)?, channel(6)?])),
        _ => None,
    }
}

pub(crate) fn color(hex: &str) -> Rgba<u8> {
    hex_to_rgba(hex).unwrap_or(Rgba([0, 0, 0, 255]))
}

fn lerp(a: Rgba<u8>, b: Rgba<u8>, t: f32) -> Rgba<u8> {
    let t = t.clamp(0.0, 1.0);
    let mix = |x: u8, y: u8| (x as f32 + (y as f32 - x as f32) * t).round() as u8;
    Rgba([mix(a[0], b[0]), mix(a[1], b[1]), mix(a[2], b[2]), 255])
}

/// Fill the whole image with `background`.
pub fn paint_background(img: &mut RgbaImage, background: Background) {
    let (width, height) = img.dimensions();
    let span = |n: u32| (n.max(2) - 1) as f32;

    match background {
        Background::Solid(hex) => {
            let fill = color(hex);
            for pixel in img.pixels_mut() {
                *pixel = fill;
            }
        }
        Background::Vertical(top, bottom) => {
            let (top, bottom) = (color(top), color(bottom));
            for (_, y, pixel) in img.enumerate_pixels_mut() {
                *pixel = lerp(top, bottom, y as f32 / span(height));
            }
        }
        Background::Diagonal(start, end) => {
            let (start, end) = (color(start), color(end));
            let total = span(width) + span(height);
            for (x, y, pixel) in img.enumerate_pixels_mut() {
                *pixel = lerp(start, end, (x + y) as f32 / total);
            }
        }
    }
}

/// Speckle texture: nudge each channel by up to `amount` in either direction.
pub fn add_noise<R: Rng + ?Sized>(img: &mut RgbaImage, amount: u8, rng: &mut R) {
    if amount == 0 {
        return;
    }
    let amount = amount as i16;
    for pixel in img.pixels_mut() {
        let delta = rng.gen_range(-amount..=amount);
        for channel in 0..3 {
            pixel[channel] = (pixel[channel] as i16 + delta).clamp(0, 255) as u8;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_hex_to_rgba() {
        assert_eq!(hex_to_rgba("#ff8000"), Some(Rgba([255, 128, 0, 255])));
        assert_eq!(hex_to_rgba("00000080"), Some(Rgba([0, 0, 0, 128])));
        assert_eq!(hex_to_rgba("#fff"), None);
        assert_eq!(hex_to_rgba("#gg0000"), None);
        assert_eq!(hex_to_rgba("#ffé000"), None);
    }

    #[test]
    fn test_builtin_palettes_parse() {
        for palette in PALETTES {
            let stops = match palette.background {
                Background::Solid(c) => vec![c],
                Background::Vertical(a, b) | Background::Diagonal(a, b) => vec![a, b],
            };
            for hex in stops.into_iter().chain([palette.text, palette.accent]) {
                assert!(hex_to_rgba(hex).is_some(), "{} has bad color {hex}", palette.name);
            }
        }
    }

    #[test]
    fn test_vertical_gradient_endpoints() {
        let mut img = RgbaImage::new(4, 11);
        paint_background(&mut img, Background::Vertical("#000000", "#ffffff"));

        assert_eq!(*img.get_pixel(0, 0), Rgba([0, 0, 0, 255]));
        assert_eq!(*img.get_pixel(3, 10), Rgba([255, 255, 255, 255]));
        assert_eq!(img.get_pixel(0, 5), img.get_pixel(3, 5));
    }

    #[test]
    fn test_diagonal_gradient_endpoints() {
        let mut img = RgbaImage::new(8, 8);
        paint_background(&mut img, Background::Diagonal("#ff0000", "#0000ff"));

        assert_eq!(*img.get_pixel(0, 0), Rgba([255, 0, 0, 255]));
        assert_eq!(*img.get_pixel(7, 7), Rgba([0, 0, 255, 255]));
    }

    #[test]
    fn test_noise_stays_within_amount() {
        let mut img = RgbaImage::from_pixel(16, 16, Rgba([128, 128, 128, 255]));
        let mut rng = StdRng::seed_from_u64(7);
        add_noise(&mut img, 10, &mut rng);

        for pixel in img.pixels() {
            assert!((118..=138).contains(&pixel[0]));
            assert_eq!(pixel[3], 255);
        }
    }
}
