//! Font loading, measuring and glyph drawing on top of swash.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::{Rgba, RgbaImage};
use rand::seq::SliceRandom;
use rand::Rng;
use swash::scale::image::{Content, Image as GlyphImage};
use swash::scale::{Render, ScaleContext, Source, StrikeWith};
use swash::shape::ShapeContext;
use swash::zeno::{Format, Vector};
use swash::FontRef;
use tracing::{debug, warn};

use super::fit::TextMeasure;
use super::RenderError;

const FONT_EXTENSIONS: &[&str] = &["ttf", "otf", "ttc"];

/// A font file held in memory.
#[derive(Clone)]
pub struct LoadedFont {
    name: String,
    data: Arc<Vec<u8>>,
}

impl std::fmt::Debug for LoadedFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadedFont")
            .field("name", &self.name)
            .field("bytes", &self.data.len())
            .finish()
    }
}

impl LoadedFont {
    /// Parse font bytes; fails if swash cannot read the first face.
    pub fn from_bytes(name: impl Into<String>, data: Vec<u8>) -> Result<Self, RenderError> {
        let name = name.into();
        if FontRef::from_index(&data, 0).is_none() {
            return Err(RenderError::InvalidFont(name));
        }
        Ok(Self {
            name,
            data: Arc::new(data),
        })
    }

    pub fn from_path(path: &Path) -> Result<Self, RenderError> {
        let data = std::fs::read(path)?;
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self::from_bytes(name, data)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn font_ref(&self) -> Option<FontRef<'_>> {
        FontRef::from_index(&self.data, 0)
    }

    /// Draw `text` with its top-left corner near (`x`, `y`).
    ///
    /// Glyph coverage is alpha-blended with `color`, whose own alpha channel
    /// scales the coverage (used for shadows).
    pub fn draw(&self, img: &mut RgbaImage, text: &str, x: i32, y: i32, size: f32, color: Rgba<u8>) {
        let Some(font) = self.font_ref() else {
            return;
        };

        let mut shape_context = ShapeContext::new();
        let mut scale_context = ScaleContext::new();
        let mut shaper = shape_context.builder(font).size(size).build();
        shaper.add_str(text);
        let mut scaler = scale_context.builder(font).size(size).hint(true).build();

        let mut pen_x = x as f32;
        let baseline = y as f32 + size * 0.8;

        shaper.shape_with(|cluster| {
            for glyph in cluster.glyphs {
                let rendered = Render::new(&[
                    Source::ColorOutline(0),
                    Source::ColorBitmap(StrikeWith::BestFit),
                    Source::Outline,
                ])
                .format(Format::Alpha)
                .offset(Vector::new(pen_x.fract() + glyph.x, glyph.y))
                .render(&mut scaler, glyph.id);

                if let Some(glyph_image) = rendered {
                    let left = pen_x.floor() as i32 + glyph_image.placement.left;
                    let top = baseline as i32 - glyph_image.placement.top;
                    blit_glyph(img, &glyph_image, left, top, color);
                }

                pen_x += glyph.advance;
            }
        });
    }
}

/// Copy a rendered glyph onto `img` with its top-left at (`left`, `top`).
///
/// Masks are tinted with `color`; color glyphs (emoji) keep their own RGB.
/// `color`'s alpha scales both.
fn blit_glyph(img: &mut RgbaImage, glyph: &GlyphImage, left: i32, top: i32, color: Rgba<u8>) {
    let width = glyph.placement.width;
    if width == 0 {
        return;
    }
    let color_alpha = color[3] as f32 / 255.0;

    let mut put = |idx: usize, tint: Rgba<u8>, coverage: u8| {
        if coverage == 0 {
            return;
        }
        let px = left + (idx as u32 % width) as i32;
        let py = top + (idx as u32 / width) as i32;
        if px < 0 || py < 0 || px as u32 >= img.width() || py as u32 >= img.height() {
            return;
        }
        let alpha = coverage as f32 / 255.0 * color_alpha;
        blend(img.get_pixel_mut(px as u32, py as u32), tint, alpha);
    };

    match glyph.content {
        Content::Mask => {
            for (idx, coverage) in glyph.data.iter().enumerate() {
                put(idx, color, *coverage);
            }
        }
        Content::Color => {
            for (idx, px) in glyph.data.chunks_exact(4).enumerate() {
                put(idx, Rgba([px[0], px[1], px[2], 255]), px[3]);
            }
        }
        // Only produced for subpixel formats, which are never requested.
        Content::SubpixelMask => {}
    }
}

impl TextMeasure for LoadedFont {
    fn text_width(&self, text: &str, size: f32) -> f32 {
        let Some(font) = self.font_ref() else {
            return 0.0;
        };

        let mut shape_context = ShapeContext::new();
        let mut shaper = shape_context.builder(font).size(size).build();
        shaper.add_str(text);

        let mut width = 0.0;
        shaper.shape_with(|cluster| {
            for glyph in cluster.glyphs {
                width += glyph.advance;
            }
        });
        width
    }
}

/// Alpha-blend `color` over `dest` with coverage `alpha` in 0..=1.
pub(crate) fn blend(dest: &mut Rgba<u8>, color: Rgba<u8>, alpha: f32) {
    let alpha = alpha.clamp(0.0, 1.0);
    let inv = 1.0 - alpha;
    for channel in 0..3 {
        dest[channel] = (color[channel] as f32 * alpha + dest[channel] as f32 * inv).round() as u8;
    }
    dest[3] = 255;
}

/// The fonts available to the renderer.
#[derive(Debug, Clone, Default)]
pub struct FontPool {
    dir: Option<PathBuf>,
    fonts: Vec<LoadedFont>,
}

impl FontPool {
    /// Load every readable font file directly inside `dir`.
    ///
    /// A missing directory yields an empty pool; unreadable files are skipped.
    pub fn load_dir(dir: &Path) -> Self {
        let mut fonts = Vec::new();

        let entries = match std::fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(dir = %dir.display(), error = %e, "Font directory unavailable");
                return Self {
                    dir: Some(dir.to_path_buf()),
                    fonts,
                };
            }
        };

        let mut paths: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                path.extension()
                    .and_then(|ext| ext.to_str())
                    .is_some_and(|ext| FONT_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
            })
            .collect();
        paths.sort();

        for path in paths {
            match LoadedFont::from_path(&path) {
                Ok(font) => {
                    debug!(font = %font.name(), "Loaded font");
                    fonts.push(font);
                }
                Err(e) => warn!(path = %path.display(), error = %e, "Skipping font"),
            }
        }

        Self {
            dir: Some(dir.to_path_buf()),
            fonts,
        }
    }

    pub fn len(&self) -> usize {
        self.fonts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }

    /// A font whose name contains `hint` (case-insensitive), else a random one.
    pub fn pick<R: Rng + ?Sized>(&self, hint: Option<&str>, rng: &mut R) -> Result<&LoadedFont, RenderError> {
        if let Some(hint) = hint.map(str::to_lowercase) {
            if let Some(font) = self.fonts.iter().find(|f| f.name.to_lowercase().contains(&hint)) {
                return Ok(font);
            }
        }
        self.fonts.choose(rng).ok_or_else(|| self.no_fonts())
    }

    /// The first font, for renderers that want a stable face.
    pub fn primary(&self) -> Result<&LoadedFont, RenderError> {
        self.fonts.first().ok_or_else(|| self.no_fonts())
    }

    fn no_fonts(&self) -> RenderError {
        RenderError::NoFonts(
            self.dir
                .as_ref()
                .map(|d| d.display().to_string())
                .unwrap_or_else(|| "<none>".to_string()),
        )
    }
}

/// Pool loaded from the bundled DejaVu Sans Mono fixture.
#[cfg(test)]
pub(crate) fn fixture_pool() -> FontPool {
    let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures");
    let pool = FontPool::load_dir(&dir);
    assert_eq!(pool.len(), 1, "fixture font missing from {}", dir.display());
    pool
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::fit::{fit_font_size, FitBox};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use swash::zeno::Placement;
    use tempfile::tempdir;

    #[test]
    fn test_fixture_font_measures_text() {
        let pool = fixture_pool();
        let font = pool.primary().unwrap();
        assert_eq!(font.name(), "DejaVuSansMono");

        let one = font.text_width("W", 40.0);
        assert!(one > 10.0 && one < 40.0, "advance {one}");
        // Monospaced: width grows linearly with length and with size.
        assert!((font.text_width("WWWW", 40.0) - 4.0 * one).abs() < 1.0);
        assert!((font.text_width("W", 80.0) - 2.0 * one).abs() < 1.0);
        assert_eq!(font.text_width("", 40.0), 0.0);
    }

    #[test]
    fn test_fit_with_real_font_respects_box() {
        let pool = fixture_pool();
        let font = pool.primary().unwrap();
        let texts = ["Eduhub", "NEET 2026 Biology Marathon", &"W".repeat(200), "नीट तैयारी"];

        for text in texts {
            for max_width in [120.0, 400.0, 832.0] {
                let fit = FitBox {
                    initial: 160.0,
                    min: 28.0,
                    step: 4.0,
                    max_width,
                };
                let size = fit_font_size(font, text, fit);
                assert!(size <= 160.0);
                assert!(
                    font.text_width(text, size) <= max_width || size == 28.0,
                    "{text:?} at {size} overflows {max_width}"
                );
            }
        }
    }

    #[test]
    fn test_draw_paints_glyph_pixels() {
        let pool = fixture_pool();
        let font = pool.primary().unwrap();
        let mut img = RgbaImage::from_pixel(200, 100, Rgba([255, 255, 255, 255]));

        font.draw(&mut img, "EH", 10, 10, 60.0, Rgba([0, 0, 0, 255]));

        let dark = img.pixels().filter(|p| p[0] < 64).count();
        assert!(dark > 100, "only {dark} dark pixels");
        // Nothing lands left of the pen start.
        assert!((0..100).all(|y| img.get_pixel(0, y)[0] == 255));
    }

    #[test]
    fn test_draw_unknown_glyphs_stays_in_bounds() {
        let pool = fixture_pool();
        let font = pool.primary().unwrap();
        let mut img = RgbaImage::from_pixel(64, 64, Rgba([255, 255, 255, 255]));

        font.draw(&mut img, "📚✨ edge", 40, 40, 90.0, Rgba([0, 0, 0, 255]));
        assert_eq!(img.dimensions(), (64, 64));
    }

    #[test]
    fn test_color_glyph_keeps_own_pixels() {
        let mut img = RgbaImage::from_pixel(4, 2, Rgba([255, 255, 255, 255]));
        let glyph = GlyphImage {
            content: Content::Color,
            placement: Placement {
                left: 0,
                top: 0,
                width: 2,
                height: 1,
            },
            data: vec![255, 0, 0, 255, 0, 0, 255, 255],
            ..GlyphImage::default()
        };

        blit_glyph(&mut img, &glyph, 1, 1, Rgba([0, 0, 0, 255]));

        assert_eq!(*img.get_pixel(1, 1), Rgba([255, 0, 0, 255]));
        assert_eq!(*img.get_pixel(2, 1), Rgba([0, 0, 255, 255]));
        // Four bytes per pixel, so nothing spills past the glyph width.
        assert_eq!(*img.get_pixel(3, 1), Rgba([255, 255, 255, 255]));
        assert_eq!(*img.get_pixel(1, 0), Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn test_mask_glyph_is_tinted() {
        let mut img = RgbaImage::from_pixel(2, 1, Rgba([255, 255, 255, 255]));
        let glyph = GlyphImage {
            content: Content::Mask,
            placement: Placement {
                left: 0,
                top: 0,
                width: 2,
                height: 1,
            },
            data: vec![255, 0],
            ..GlyphImage::default()
        };

        blit_glyph(&mut img, &glyph, 0, 0, Rgba([10, 20, 30, 255]));

        assert_eq!(*img.get_pixel(0, 0), Rgba([10, 20, 30, 255]));
        assert_eq!(*img.get_pixel(1, 0), Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn test_invalid_font_bytes_rejected() {
        let err = LoadedFont::from_bytes("junk", b"not a font".to_vec()).unwrap_err();
        assert!(matches!(err, RenderError::InvalidFont(name) if name == "junk"));
    }

    #[test]
    fn test_load_dir_skips_non_fonts_and_junk() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("readme.txt"), "hello").unwrap();
        std::fs::write(dir.path().join("broken.ttf"), b"\0\0\0\0").unwrap();

        let pool = FontPool::load_dir(dir.path());
        assert!(pool.is_empty());
    }

    #[test]
    fn test_missing_dir_gives_empty_pool() {
        let dir = tempdir().unwrap();
        let pool = FontPool::load_dir(&dir.path().join("nope"));

        assert!(pool.is_empty());
        let mut rng = StdRng::seed_from_u64(1);
        assert!(matches!(pool.pick(None, &mut rng), Err(RenderError::NoFonts(_))));
        assert!(matches!(pool.primary(), Err(RenderError::NoFonts(_))));
    }

    #[test]
    fn test_blend() {
        let mut pixel = Rgba([0, 0, 0, 255]);
        blend(&mut pixel, Rgba([200, 100, 50, 255]), 0.5);
        assert_eq!(pixel, Rgba([100, 50, 25, 255]));

        let mut pixel = Rgba([10, 20, 30, 255]);
        blend(&mut pixel, Rgba([255, 255, 255, 255]), 0.0);
        assert_eq!(pixel, Rgba([10, 20, 30, 255]));
    }
}
