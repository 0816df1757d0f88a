//! Group moderation commands: ban, mute and a warning counter.

use std::future::IntoFuture;
use std::sync::Arc;

use teloxide::prelude::*;
use teloxide::types::{ChatPermissions, UserId};
use tracing::{info, warn};

use crate::state::{BotState, WARN_LIMIT};

pub const NOT_ADMIN: &str = "❌ Only group admins can use this command.";
pub const GROUPS_ONLY: &str = "⚠️ Moderation commands only work in groups.";
pub const TARGET_NOT_FOUND: &str =
    "User not found. Reply to one of their messages or pass their numeric user id.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModAction {
    Ban,
    Unban,
    Mute,
    Unmute,
    Warn,
    Warns,
    ResetWarns,
}

impl ModAction {
    fn verb(self) -> &'static str {
        match self {
            Self::Ban => "ban",
            Self::Unban => "unban",
            Self::Mute => "mute",
            Self::Unmute => "unmute",
            Self::Warn => "warn",
            Self::Warns => "check warnings for",
            Self::ResetWarns => "reset warnings for",
        }
    }
}

/// The member a moderation command acts on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub id: UserId,
    pub name: String,
}

/// Parse a numeric user id argument.
pub fn parse_target_arg(arg: &str) -> Option<UserId> {
    arg.split_whitespace()
        .next()
        .and_then(|s| s.parse::<u64>().ok())
        .filter(|id| *id > 0)
        .map(UserId)
}

/// The replied-to message's author, else the id argument.
fn resolve_target(msg: &Message, arg: &str) -> Option<Target> {
    if let Some(user) = msg.reply_to_message().and_then(|m| m.from.as_ref()) {
        return Some(Target {
            id: user.id,
            name: user.full_name(),
        });
    }
    parse_target_arg(arg).map(|id| Target {
        id,
        name: format!("user {id}"),
    })
}

/// Permissions restored by `/unmute`.
fn unmuted_permissions() -> ChatPermissions {
    ChatPermissions::SEND_MESSAGES
        | ChatPermissions::SEND_MEDIA_MESSAGES
        | ChatPermissions::SEND_POLLS
        | ChatPermissions::SEND_OTHER_MESSAGES
        | ChatPermissions::ADD_WEB_PAGE_PREVIEWS
}

/// Reply text after a warning brought the count to `count`.
pub fn warn_reply(name: &str, count: u32) -> String {
    if count >= WARN_LIMIT {
        format!("🔇 {name} reached {WARN_LIMIT} warnings and has been muted.")
    } else {
        format!("⚠️ {name} has been warned ({count}/{WARN_LIMIT}).")
    }
}

/// Record a warning and run `mute` once the limit is reached.
///
/// The counter is cleared only after `mute` succeeds, so a failed mute keeps
/// the warnings and the next `/warn` tries again. `mute` is never started
/// below the limit.
pub async fn escalate_warning<M, T, E>(
    state: &BotState,
    chat_id: ChatId,
    user_id: UserId,
    mute: M,
) -> Result<u32, E>
where
    M: IntoFuture<Output = Result<T, E>>,
{
    let count = state.add_warning(chat_id, user_id).await;
    if count >= WARN_LIMIT {
        mute.await?;
        state.reset_warnings(chat_id, user_id).await;
    }
    Ok(count)
}

async fn is_chat_admin(bot: &Bot, chat_id: ChatId, user_id: UserId) -> bool {
    match bot.get_chat_administrators(chat_id).await {
        Ok(admins) => admins.iter().any(|m| m.user.id == user_id),
        Err(e) => {
            warn!(chat_id = %chat_id, error = %e, "Failed to list chat administrators");
            false
        }
    }
}

/// Handle a moderation command.
pub async fn handle_moderation(
    bot: Bot,
    msg: Message,
    state: Arc<BotState>,
    action: ModAction,
    arg: String,
) -> ResponseResult<()> {
    let chat_id = msg.chat.id;

    if msg.chat.is_private() {
        bot.send_message(chat_id, GROUPS_ONLY).await?;
        return Ok(());
    }

    let Some(caller) = msg.from.as_ref().map(|u| u.id) else {
        return Ok(());
    };
    if !state.is_bot_admin(caller) && !is_chat_admin(&bot, chat_id, caller).await {
        info!(chat_id = %chat_id, user_id = %caller, action = ?action, "Rejected moderation command");
        bot.send_message(chat_id, NOT_ADMIN).await?;
        return Ok(());
    }

    let Some(target) = resolve_target(&msg, &arg) else {
        bot.send_message(chat_id, TARGET_NOT_FOUND).await?;
        return Ok(());
    };

    let result = match action {
        ModAction::Ban => bot
            .ban_chat_member(chat_id, target.id)
            .await
            .map(|_| "✅ User banned.".to_string()),
        ModAction::Unban => bot
            .unban_chat_member(chat_id, target.id)
            .only_if_banned(true)
            .await
            .map(|_| "✅ User unbanned.".to_string()),
        ModAction::Mute => bot
            .restrict_chat_member(chat_id, target.id, ChatPermissions::empty())
            .await
            .map(|_| "🔇 User muted.".to_string()),
        ModAction::Unmute => bot
            .restrict_chat_member(chat_id, target.id, unmuted_permissions())
            .await
            .map(|_| "🔊 User unmuted.".to_string()),
        ModAction::Warn => escalate_warning(
            &state,
            chat_id,
            target.id,
            bot.restrict_chat_member(chat_id, target.id, ChatPermissions::empty()),
        )
        .await
        .map(|count| warn_reply(&target.name, count)),
        ModAction::Warns => {
            let count = state.warning_count(chat_id, target.id).await;
            Ok(format!("{} has {count}/{WARN_LIMIT} warnings.", target.name))
        }
        ModAction::ResetWarns => {
            state.reset_warnings(chat_id, target.id).await;
            Ok(format!("✅ Warnings reset for {}.", target.name))
        }
    };

    match result {
        Ok(reply) => {
            info!(
                chat_id = %chat_id,
                user_id = %caller,
                target = %target.id,
                action = ?action,
                "Moderation action applied"
            );
            bot.send_message(chat_id, reply).await?;
        }
        Err(e) => {
            warn!(chat_id = %chat_id, target = %target.id, action = ?action, error = %e, "Moderation action failed");
            bot.send_message(chat_id, format!("❌ Failed to {} user.", action.verb()))
                .await?;
        }
    }

    Ok(())
}
