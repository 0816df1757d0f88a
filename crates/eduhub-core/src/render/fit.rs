//! Font-size fitting and word wrapping.

/// Anything that can tell how wide a string is at a given pixel size.
pub trait TextMeasure {
    fn text_width(&self, text: &str, size: f32) -> f32;
}

/// Size limits for auto-fitting a single line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitBox {
    /// Size to start from.
    pub initial: f32,
    /// Floor; fitting stops here even if the text still overflows.
    pub min: f32,
    /// Amount removed per attempt.
    pub step: f32,
    pub max_width: f32,
}

/// Shrink from `fit.initial` until `text` fits `fit.max_width`.
///
/// The result never exceeds `fit.initial` and never drops below `fit.min`
/// (unless `initial` is already below it). Width fits unless the floor was hit.
pub fn fit_font_size<M: TextMeasure + ?Sized>(measure: &M, text: &str, fit: FitBox) -> f32 {
    let step = if fit.step > 0.0 { fit.step } else { 1.0 };
    let floor = fit.min.min(fit.initial);
    let mut size = fit.initial;

    while size > floor && measure.text_width(text, size) > fit.max_width {
        size = (size - step).max(floor);
    }
    size
}

/// Greedy word wrap. Existing newlines are kept; a word wider than the
/// line stays whole on its own line.
pub fn wrap_text<M: TextMeasure + ?Sized>(
    measure: &M,
    text: &str,
    size: f32,
    max_width: f32,
) -> Vec<String> {
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            if current.is_empty() {
                current.push_str(word);
                continue;
            }
            let candidate = format!("{current} {word}");
            if measure.text_width(&candidate, size) <= max_width {
                current = candidate;
            } else {
                lines.push(std::mem::take(&mut current));
                current.push_str(word);
            }
        }
        lines.push(current);
    }

    lines
}

/// Largest size (from `initial` down to `min` by `step`) at which `text`
/// wrapped to `max_width` fits in `max_height`, with its lines.
pub fn fit_wrapped<M: TextMeasure + ?Sized>(
    measure: &M,
    text: &str,
    fit: FitBox,
    max_height: f32,
    line_height: f32,
) -> (f32, Vec<String>) {
    let step = if fit.step > 0.0 { fit.step } else { 1.0 };
    let floor = fit.min.min(fit.initial);
    let mut size = fit.initial;

    loop {
        let lines = wrap_text(measure, text, size, fit.max_width);
        let height = lines.len() as f32 * size * line_height;
        if height <= max_height || size <= floor {
            return (size, lines);
        }
        size = (size - step).max(floor);
    }
}
