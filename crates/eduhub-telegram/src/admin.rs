//! Commands reserved for the bot admin.

use std::sync::Arc;

use eduhub_core::html_escape;
use eduhub_persistence::KnownChat;
use teloxide::prelude::*;
use teloxide::types::ParseMode;
use teloxide::{ApiError, RequestError};
use tracing::{info, warn};

use crate::state::BotState;

pub const NOT_BOT_ADMIN: &str = "❌ This command is only for the bot admin.";

/// Chats listed by `/users` before the list is cut off.
const USERS_LIST_LIMIT: usize = 50;

/// Split `/reply` arguments into a chat id and the message.
pub fn parse_reply_args(arg: &str) -> Option<(ChatId, &str)> {
    let (id, text) = arg.trim().split_once(char::is_whitespace)?;
    let id = id.parse::<i64>().ok()?;
    let text = text.trim();
    (!text.is_empty()).then_some((ChatId(id), text))
}

/// HTML listing of known chats.
pub fn format_users(chats: &[KnownChat]) -> String {
    if chats.is_empty() {
        return "No chats registered yet.".to_string();
    }

    let mut text = format!("<b>👥 Known chats:</b> {}\n\n", chats.len());
    for chat in chats.iter().take(USERS_LIST_LIMIT) {
        text.push_str(&format!(
            "• <code>{}</code> {}\n",
            chat.id,
            html_escape(&chat.label())
        ));
    }
    if chats.len() > USERS_LIST_LIMIT {
        text.push_str(&format!("…and {} more", chats.len() - USERS_LIST_LIMIT));
    }
    text
}

/// Whether a send failure means the chat is gone for good.
fn is_unreachable(error: &RequestError) -> bool {
    matches!(
        error,
        RequestError::Api(ApiError::BotBlocked | ApiError::ChatNotFound | ApiError::UserDeactivated)
    )
}

/// Reject callers other than the bot admin. Returns true when allowed.
async fn ensure_bot_admin(bot: &Bot, msg: &Message, state: &BotState) -> ResponseResult<bool> {
    let allowed = msg.from.as_ref().is_some_and(|u| state.is_bot_admin(u.id));
    if !allowed {
        info!(chat_id = %msg.chat.id, "Rejected admin command");
        bot.send_message(msg.chat.id, NOT_BOT_ADMIN).await?;
    }
    Ok(allowed)
}

/// Handle the /broadcast command - send text to every known chat.
pub async fn handle_broadcast(
    bot: Bot,
    msg: Message,
    state: Arc<BotState>,
    text: String,
) -> ResponseResult<()> {
    if !ensure_bot_admin(&bot, &msg, &state).await? {
        return Ok(());
    }

    let text = text.trim();
    if text.is_empty() {
        bot.send_message(msg.chat.id, "Usage: /broadcast <message>").await?;
        return Ok(());
    }

    let chats = state.known_chats().await;
    let (mut sent, mut failed) = (0usize, 0usize);

    for chat in &chats {
        match bot.send_message(ChatId(chat.id), text).await {
            Ok(_) => sent += 1,
            Err(e) => {
                failed += 1;
                warn!(chat_id = chat.id, error = %e, "Broadcast delivery failed");
                if is_unreachable(&e) {
                    state.forget_chat(chat.id).await;
                }
            }
        }
    }

    info!(sent, failed, "Broadcast finished");
    bot.send_message(
        msg.chat.id,
        format!("📣 Broadcast sent to {sent} chats ({failed} failed)."),
    )
    .await?;
    Ok(())
}

/// Handle the /reply command - message one chat as the bot.
pub async fn handle_reply(bot: Bot, msg: Message, state: Arc<BotState>, arg: String) -> ResponseResult<()> {
    if !ensure_bot_admin(&bot, &msg, &state).await? {
        return Ok(());
    }

    let Some((target, text)) = parse_reply_args(&arg) else {
        bot.send_message(msg.chat.id, "Usage: /reply <chat_id> <message>").await?;
        return Ok(());
    };

    match bot.send_message(target, text).await {
        Ok(_) => {
            info!(target = %target, "Admin reply sent");
            bot.send_message(msg.chat.id, "✅ Message sent.").await?;
        }
        Err(e) => {
            warn!(target = %target, error = %e, "Admin reply failed");
            bot.send_message(msg.chat.id, format!("❌ Failed to send: {e}")).await?;
        }
    }
    Ok(())
}

/// Handle the /users command - list known chats.
pub async fn handle_users(bot: Bot, msg: Message, state: Arc<BotState>) -> ResponseResult<()> {
    if !ensure_bot_admin(&bot, &msg, &state).await? {
        return Ok(());
    }

    let chats = state.known_chats().await;
    bot.send_message(msg.chat.id, format_users(&chats))
        .parse_mode(ParseMode::Html)
        .await?;
    Ok(())
}
