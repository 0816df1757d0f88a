//! Square quiz cards for `/quizimg`.

use image::{ImageBuffer, Rgba, RgbaImage};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;

use super::fit::{fit_font_size, fit_wrapped, FitBox, TextMeasure};
use super::font::FontPool;
use super::palette::color;
use super::{encode_png, RenderError};

pub const CARD_SIZE: u32 = 1080;
const MARGIN: u32 = 60;
const HEADER_HEIGHT: u32 = 140;
const FOOTER_HEIGHT: u32 = 90;
const LINE_HEIGHT: f32 = 1.3;
const OPTION_GAP: f32 = 40.0;

const HEADER_BG: &str = "#1e3a8a";
const HEADER_TEXT: &str = "#ffffff";
const BODY_TEXT: &str = "#111827";
const MUTED_TEXT: &str = "#6b7280";

/// Render a question with its options on a 1080x1080 card.
pub fn render_quiz_card(
    fonts: &FontPool,
    title: &str,
    question: &str,
    options: &[String],
    footer: &str,
) -> Result<Vec<u8>, RenderError> {
    if question.trim().is_empty() {
        return Err(RenderError::EmptyText);
    }
    let font = fonts.primary()?;

    let mut img: RgbaImage = ImageBuffer::from_pixel(CARD_SIZE, CARD_SIZE, Rgba([255, 255, 255, 255]));
    let max_width = (CARD_SIZE - 2 * MARGIN) as f32;

    draw_filled_rect_mut(
        &mut img,
        Rect::at(0, 0).of_size(CARD_SIZE, HEADER_HEIGHT),
        color(HEADER_BG),
    );
    let title_size = fit_font_size(
        font,
        title,
        FitBox {
            initial: 56.0,
            min: 24.0,
            step: 2.0,
            max_width,
        },
    );
    let title_y = ((HEADER_HEIGHT as f32 - title_size) / 2.0) as i32;
    font.draw(&mut img, title, MARGIN as i32, title_y, title_size, color(HEADER_TEXT));

    // Question takes up to 55% of the body, options get the rest.
    let body_top = (HEADER_HEIGHT + MARGIN) as f32;
    let body_height = (CARD_SIZE - HEADER_HEIGHT - FOOTER_HEIGHT - 2 * MARGIN) as f32;
    let question_fit = FitBox {
        initial: 44.0,
        min: 18.0,
        step: 2.0,
        max_width,
    };
    let (q_size, q_lines) = fit_wrapped(font, question, question_fit, body_height * 0.55, LINE_HEIGHT);

    let mut y = body_top;
    for line in &q_lines {
        font.draw(&mut img, line, MARGIN as i32, y as i32, q_size, color(BODY_TEXT));
        y += q_size * LINE_HEIGHT;
    }
    y += OPTION_GAP;

    let option_text = options.join("\n");
    let remaining = (body_top + body_height - y).max(0.0);
    let option_fit = FitBox {
        initial: q_size.min(38.0),
        min: 16.0,
        step: 2.0,
        max_width,
    };
    let (o_size, o_lines) = fit_wrapped(font, &option_text, option_fit, remaining, LINE_HEIGHT);
    for line in &o_lines {
        font.draw(&mut img, line, MARGIN as i32, y as i32, o_size, color(BODY_TEXT));
        y += o_size * LINE_HEIGHT;
    }

    if !footer.is_empty() {
        let footer_size = fit_font_size(
            font,
            footer,
            FitBox {
                initial: 28.0,
                min: 14.0,
                step: 2.0,
                max_width,
            },
        );
        let width = font.text_width(footer, footer_size);
        let x = ((CARD_SIZE as f32 - width) / 2.0) as i32;
        let footer_y = (CARD_SIZE - FOOTER_HEIGHT) as i32 + ((FOOTER_HEIGHT as f32 - footer_size) / 2.0) as i32;
        font.draw(&mut img, footer, x, footer_y, footer_size, color(MUTED_TEXT));
    }

    encode_png(img)
}
