//! Quiz shortcuts, question selection and message formatting.

use std::sync::OnceLock;

use rand::seq::SliceRandom;
use rand::Rng;
use regex::Regex;

use crate::content::{PoolQuestion, PyqQuestion, Quote, Subject};
use crate::text::{clean_html, html_escape, truncate_chars};

/// Upper bound on polls sent for one request.
pub const MAX_POLLS_PER_REQUEST: usize = 10;

/// Telegram poll limits, in characters.
pub const POLL_QUESTION_LIMIT: usize = 300;
pub const POLL_OPTION_LIMIT: usize = 100;
pub const POLL_EXPLANATION_LIMIT: usize = 200;

const DEFAULT_EXPLANATION: &str = "No explanation provided.";

/// A quiz request typed as a bare slash word (`/b12`, `/pyqc 3`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizShortcut {
    /// `count` random questions, optionally of one subject.
    Random {
        subject: Option<Subject>,
        count: usize,
    },
    /// The `number`-th (1-based) question of a subject.
    Indexed { subject: Subject, number: usize },
}

fn random_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^/pyq([bcp])?\s*(\d+)?$").expect("valid regex"))
}

fn indexed_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^/([bcp])(\d+)$").expect("valid regex"))
}

/// Parse a quiz shortcut. Counts are clamped to `1..=MAX_POLLS_PER_REQUEST`.
pub fn parse_shortcut(text: &str) -> Option<QuizShortcut> {
    let text = text.trim().to_lowercase();

    if let Some(caps) = random_regex().captures(&text) {
        let subject = caps
            .get(1)
            .and_then(|m| m.as_str().chars().next())
            .and_then(Subject::from_letter);
        let count = caps
            .get(2)
            .and_then(|m| m.as_str().parse::<usize>().ok())
            .unwrap_or(1)
            .clamp(1, MAX_POLLS_PER_REQUEST);
        return Some(QuizShortcut::Random { subject, count });
    }

    let caps = indexed_regex().captures(&text)?;
    let subject = caps[1].chars().next().and_then(Subject::from_letter)?;
    let number = caps[2].parse().ok()?;
    Some(QuizShortcut::Indexed { subject, number })
}

/// Up to `count` distinct random questions, optionally limited to one subject.
pub fn pick_random<'a, R: Rng + ?Sized>(
    pool: &'a [PoolQuestion],
    subject: Option<Subject>,
    count: usize,
    rng: &mut R,
) -> Vec<&'a PoolQuestion> {
    let candidates: Vec<&PoolQuestion> = pool
        .iter()
        .filter(|q| subject.map_or(true, |s| q.is_subject(s)))
        .collect();
    candidates.choose_multiple(rng, count).copied().collect()
}

/// The `number`-th (1-based) question of `subject`.
pub fn pick_indexed(pool: &[PoolQuestion], subject: Subject, number: usize) -> Option<&PoolQuestion> {
    let index = number.checked_sub(1)?;
    pool.iter().filter(|q| q.is_subject(subject)).nth(index)
}

/// A Telegram quiz poll built from a pool question.
#[derive(Debug, Clone, PartialEq)]
pub struct QuizPoll {
    pub question: String,
    pub options: Vec<String>,
    pub correct_option_id: u8,
    pub explanation: String,
    pub image: Option<String>,
}

impl QuizPoll {
    /// `None` when the question's answer letter is not A-D.
    pub fn from_question(q: &PoolQuestion) -> Option<Self> {
        let correct_option_id = q.correct_index()?;
        let explanation = q
            .explanation
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .unwrap_or(DEFAULT_EXPLANATION);

        Some(Self {
            question: truncate_chars(q.question.trim(), POLL_QUESTION_LIMIT),
            options: q
                .option_texts()
                .iter()
                .map(|o| truncate_chars(o.trim(), POLL_OPTION_LIMIT))
                .collect(),
            correct_option_id,
            explanation: truncate_chars(explanation, POLL_EXPLANATION_LIMIT),
            image: q.image.clone().filter(|url| !url.trim().is_empty()),
        })
    }
}

/// Plain-text question and options of a PYQ, used for image cards.
pub fn pyq_plain_parts(q: &PyqQuestion) -> (String, Vec<String>) {
    let options = q
        .options
        .iter()
        .map(|o| format!("{}. {}", o.identifier, clean_html(&o.content)))
        .collect();
    (clean_html(&q.content), options)
}

/// HTML message for a PYQ with the answer behind a spoiler.
pub fn format_pyq(q: &PyqQuestion) -> String {
    let mut message = String::new();

    let subject = q.subject.trim().to_uppercase();
    let chapter = q.chapter.trim();
    match (subject.is_empty(), chapter.is_empty()) {
        (false, false) => message.push_str(&format!(
            "<b>PYQ ({} – {})</b>\n\n",
            html_escape(&subject),
            html_escape(chapter)
        )),
        (false, true) => message.push_str(&format!("<b>PYQ ({})</b>\n\n", html_escape(&subject))),
        _ => message.push_str("<b>PYQ</b>\n\n"),
    }

    message.push_str(&format!("<b>Q:</b> {}\n\n", html_escape(&clean_html(&q.content))));

    for option in &q.options {
        message.push_str(&format!(
            "<b>{}.</b> {}\n",
            html_escape(&option.identifier),
            html_escape(&clean_html(&option.content))
        ));
    }

    if !q.correct_options.is_empty() {
        let answer = q
            .options
            .iter()
            .filter(|o| q.correct_options.iter().any(|c| c == &o.identifier))
            .map(|o| o.identifier.as_str())
            .collect::<Vec<_>>();
        // Some papers list option ids that are not the display letters.
        let answer = if answer.is_empty() {
            q.correct_options.join(", ")
        } else {
            answer.join(", ")
        };
        message.push_str(&format!("\nAnswer: <tg-spoiler>{}</tg-spoiler>", html_escape(&answer)));
    }

    let explanation = clean_html(&q.explanation);
    if !explanation.is_empty() {
        message.push_str(&format!(
            "\n<tg-spoiler>{}</tg-spoiler>",
            html_escape(&truncate_chars(&explanation, 800))
        ));
    }

    message
}

/// HTML message for a quote.
pub fn format_quote(q: &Quote) -> String {
    format!(
        "<i>\"{}\"</i>\n\n— <b>{}</b>",
        html_escape(q.quote_text.trim()),
        html_escape(q.author())
    )
}
