//! Inline-button presses from the exam/paper menus.

use std::sync::Arc;

use eduhub_core::menu::{exams_page, papers_page, play_link, resolve_exam, MenuAction, MenuPage};
use eduhub_core::{find_paper, html_escape};
use teloxide::prelude::*;
use teloxide::types::{CallbackQuery, InlineKeyboardButton, InlineKeyboardMarkup, ParseMode};
use tracing::{debug, warn};

use crate::state::BotState;

pub const EXAM_NOT_FOUND: &str = "Exam not found.";
pub const PAPER_NOT_FOUND: &str = "Paper not found.";
pub const EXAMS_UNAVAILABLE: &str = "❌ Failed to load exams. Please try again later.";

/// What to do in response to a button press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackOutcome {
    /// Replace the pressed message with this menu.
    Menu(MenuPage),
    /// Send a link that starts the chosen paper.
    PlayLink { title: String, url: String },
    /// Answer the press with a short notice.
    Notice(&'static str),
    /// Acknowledge silently.
    Ignore,
}

/// Decide how to answer a callback payload.
pub async fn resolve_callback(state: &BotState, data: &str) -> CallbackOutcome {
    let Some(action) = MenuAction::parse(data) else {
        debug!(data = %data, "Ignoring unknown callback payload");
        return CallbackOutcome::Ignore;
    };

    // Buttons can outlive a restart, so load the list if it is not cached.
    let exams = match state.catalog().load().await {
        Ok(exams) => exams,
        Err(e) => {
            warn!(error = %e, "Failed to load exams for callback");
            return CallbackOutcome::Notice(EXAMS_UNAVAILABLE);
        }
    };

    match action {
        MenuAction::ExamsPage(page) => CallbackOutcome::Menu(exams_page(&exams, page)),
        MenuAction::PapersPage { exam, page } => resolve_exam(&exams, &exam)
            .and_then(|index| papers_page(&exams, index, page))
            .map(CallbackOutcome::Menu)
            .unwrap_or(CallbackOutcome::Notice(EXAM_NOT_FOUND)),
        MenuAction::Paper(meta_id) => match find_paper(&exams, &meta_id) {
            Some(paper) => CallbackOutcome::PlayLink {
                title: paper.title.clone(),
                url: play_link(&state.settings().play_base_url, &paper.meta_id),
            },
            None => CallbackOutcome::Notice(PAPER_NOT_FOUND),
        },
    }
}

/// Convert a menu into Telegram's inline keyboard.
pub fn menu_keyboard(page: &MenuPage) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(page.rows.iter().map(|row| {
        row.iter()
            .map(|b| InlineKeyboardButton::callback(b.label.clone(), b.action.encode()))
            .collect::<Vec<_>>()
    }))
}

/// HTML text for a paper's play link.
pub fn play_link_text(title: &str, url: &str) -> String {
    format!(
        "▶️ <a href=\"{}\">Start {}</a>",
        html_escape(url),
        html_escape(title)
    )
}

/// Handle a callback query from an inline keyboard.
pub async fn handle_callback(bot: Bot, q: CallbackQuery, state: Arc<BotState>) -> ResponseResult<()> {
    let Some(data) = q.data.as_deref() else {
        bot.answer_callback_query(q.id.clone()).await?;
        return Ok(());
    };
    let origin = q.message.as_ref().map(|m| (m.chat().id, m.id()));

    debug!(user_id = %q.from.id, data = %data, "Callback received");

    match resolve_callback(&state, data).await {
        CallbackOutcome::Menu(page) => {
            if let Some((chat_id, message_id)) = origin {
                // Pressing the current page again edits to identical content,
                // which Telegram rejects; the press still gets answered.
                if let Err(e) = bot
                    .edit_message_text(chat_id, message_id, page.text.clone())
                    .parse_mode(ParseMode::Html)
                    .reply_markup(menu_keyboard(&page))
                    .await
                {
                    warn!(chat_id = %chat_id, error = %e, "Failed to edit menu");
                }
            }
            bot.answer_callback_query(q.id.clone()).await?;
        }
        CallbackOutcome::PlayLink { title, url } => {
            if let Some((chat_id, _)) = origin {
                let mut request = bot
                    .send_message(chat_id, play_link_text(&title, &url))
                    .parse_mode(ParseMode::Html);
                match url::Url::parse(&url) {
                    Ok(link) => {
                        request = request.reply_markup(InlineKeyboardMarkup::new(vec![vec![
                            InlineKeyboardButton::url(format!("▶️ Start {title}"), link),
                        ]]));
                    }
                    Err(e) => warn!(url = %url, error = %e, "Play link is not a valid URL"),
                }
                request.await?;
            }
            bot.answer_callback_query(q.id.clone()).await?;
        }
        CallbackOutcome::Notice(text) => {
            bot.answer_callback_query(q.id.clone()).text(text).await?;
        }
        CallbackOutcome::Ignore => {
            bot.answer_callback_query(q.id.clone()).await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::tests::state_with;
    use eduhub_core::config::DEFAULT_EXAMS_URL;
    use serde_json::json;

    fn exams_doc() -> serde_json::Value {
        json!([
            {"title": "NEET", "papers": [
                {"exam": "NEET", "examGroup": "Medical", "metaId": "neet-2024", "title": "NEET 2024", "year": 2024}
            ]},
            {"title": "JEE_Main: 2024", "papers": [
                {"exam": "JEE", "examGroup": "Engineering", "metaId": "jee-s1", "title": "Shift 1"}
            ]}
        ])
    }

    #[tokio::test]
    async fn test_unknown_payload_is_ignored() {
        let state = state_with(vec![(DEFAULT_EXAMS_URL, exams_doc())]);
        assert_eq!(resolve_callback(&state, "connect:foo").await, CallbackOutcome::Ignore);
        assert_eq!(resolve_callback(&state, "exams:x").await, CallbackOutcome::Ignore);
    }

    #[tokio::test]
    async fn test_title_with_delimiters_round_trips() {
        let state = state_with(vec![(DEFAULT_EXAMS_URL, exams_doc())]);
        let exams = state.catalog().load().await.unwrap();
        let menu = exams_page(&exams, 0);
        let button = &menu.rows[1][0];

        let CallbackOutcome::Menu(papers) = resolve_callback(&state, &button.action.encode()).await else {
            panic!("expected papers menu");
        };
        assert!(papers.text.contains("JEE_Main: 2024"));
        assert!(papers.has_action(&MenuAction::Paper("jee-s1".into())));
    }

    #[tokio::test]
    async fn test_missing_exam_and_paper() {
        let state = state_with(vec![(DEFAULT_EXAMS_URL, exams_doc())]);

        assert_eq!(
            resolve_callback(&state, "papers:0:Gate").await,
            CallbackOutcome::Notice(EXAM_NOT_FOUND)
        );
        assert_eq!(
            resolve_callback(&state, "papers:0:#9").await,
            CallbackOutcome::Notice(EXAM_NOT_FOUND)
        );
        assert_eq!(
            resolve_callback(&state, "paper:nope").await,
            CallbackOutcome::Notice(PAPER_NOT_FOUND)
        );
    }

    #[tokio::test]
    async fn test_paper_resolves_to_play_link() {
        let state = state_with(vec![(DEFAULT_EXAMS_URL, exams_doc())]);

        assert_eq!(
            resolve_callback(&state, "paper:neet-2024").await,
            CallbackOutcome::PlayLink {
                title: "NEET 2024".into(),
                url: "https://quizes.pages.dev/play?metaId=neet-2024".into(),
            }
        );
    }

    #[tokio::test]
    async fn test_fetch_failure_gives_notice() {
        let state = state_with(vec![]);
        assert_eq!(
            resolve_callback(&state, "exams:0").await,
            CallbackOutcome::Notice(EXAMS_UNAVAILABLE)
        );
    }

    #[test]
    fn test_keyboard_mirrors_menu_rows() {
        let exams: Vec<eduhub_core::ExamCategory> = serde_json::from_value(exams_doc()).unwrap();
        let page = exams_page(&exams, 0);
        let keyboard = menu_keyboard(&page);

        assert_eq!(keyboard.inline_keyboard.len(), page.rows.len());
        assert_eq!(keyboard.inline_keyboard[0][0].text, "NEET");
    }

    #[test]
    fn test_play_link_text_escapes() {
        let text = play_link_text("A & B", "https://x/play?metaId=a&b");
        assert_eq!(
            text,
            "▶️ <a href=\"https://x/play?metaId=a&amp;b\">Start A &amp; B</a>"
        );
    }
}
