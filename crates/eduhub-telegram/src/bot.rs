//! Main Telegram bot implementation.

use std::sync::Arc;

use eduhub_core::{parse_shortcut, QuizShortcut, Settings};
use teloxide::dispatching::UpdateFilterExt;
use teloxide::prelude::*;
use tracing::{debug, info, warn};

use crate::callbacks::handle_callback;
use crate::error::{Result, TelegramError};
use crate::handlers::{
    handle_command, handle_message, handle_shortcut, handle_unknown_command, remember_chat,
    strip_bot_mention, Command,
};
use crate::state::{create_shared_state, BotState};

/// Environment variables checked for the bot token, in order.
const TOKEN_VARS: [&str; 2] = ["TELEGRAM_BOT_TOKEN", "BOT_TOKEN"];

/// The Eduhub Telegram bot.
pub struct TelegramBot {
    /// The teloxide bot instance.
    bot: Bot,
    /// Shared state across handlers.
    state: Arc<BotState>,
}

fn token_from_env() -> Result<String> {
    TOKEN_VARS
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .find(|token| !token.trim().is_empty())
        .ok_or(TelegramError::NoToken)
}

impl TelegramBot {
    /// Create a new TelegramBot instance.
    ///
    /// Requires `TELEGRAM_BOT_TOKEN` (or `BOT_TOKEN`) to be set.
    pub fn new(settings: Settings) -> Result<Self> {
        let token = token_from_env()?;
        let state = create_shared_state(settings)?;
        Ok(Self::with_state(Bot::new(token), state))
    }

    /// Create a TelegramBot with custom state.
    pub fn with_state(bot: Bot, state: Arc<BotState>) -> Self {
        Self { bot, state }
    }

    /// Get the bot's username.
    pub async fn get_me(&self) -> Result<String> {
        let me = self
            .bot
            .get_me()
            .await
            .map_err(|e| TelegramError::BotStartFailed(e.to_string()))?;
        Ok(me.username().to_string())
    }

    /// Start the bot in long-polling mode. Returns after Ctrl+C.
    pub async fn start_polling(&self) -> Result<()> {
        info!("Starting Telegram bot in polling mode...");

        let bot = self.bot.clone();
        let state_for_callbacks = Arc::clone(&self.state);
        let state_for_commands = Arc::clone(&self.state);
        let state_for_shortcuts = Arc::clone(&self.state);
        let state_for_unknown = Arc::clone(&self.state);
        let state_for_messages = Arc::clone(&self.state);
        let state_for_others = Arc::clone(&self.state);

        let handler = dptree::entry()
            .branch(
                Update::filter_callback_query()
                    .endpoint(move |bot: Bot, q: teloxide::types::CallbackQuery| {
                        let state = Arc::clone(&state_for_callbacks);
                        async move { handle_callback(bot, q, state).await }
                    }),
            )
            .branch(
                Update::filter_message()
                    .filter_command::<Command>()
                    .endpoint(move |bot: Bot, msg: Message, cmd: Command| {
                        let state = Arc::clone(&state_for_commands);
                        info!(chat_id = %msg.chat.id, "Command matched: {:?}", cmd);
                        async move { handle_command(bot, msg, cmd, state).await }
                    }),
            )
            .branch(
                Update::filter_message()
                    .filter_map(|msg: Message| {
                        msg.text().and_then(|t| parse_shortcut(&strip_bot_mention(t)))
                    })
                    .endpoint(move |bot: Bot, msg: Message, shortcut: QuizShortcut| {
                        let state = Arc::clone(&state_for_shortcuts);
                        async move {
                            remember_chat(&state, &msg).await;
                            handle_shortcut(bot, msg, state, shortcut).await
                        }
                    }),
            )
            .branch(
                Update::filter_message()
                    .filter(|msg: Message| {
                        // Handle unrecognized commands (start with / but didn't parse)
                        let is_cmd = msg.text().map(|t| t.starts_with('/')).unwrap_or(false);
                        if is_cmd {
                            debug!(text = ?msg.text(), "Command didn't parse, falling through to unknown handler");
                        }
                        is_cmd
                    })
                    .endpoint(move |bot: Bot, msg: Message| {
                        let state = Arc::clone(&state_for_unknown);
                        async move { handle_unknown_command(bot, msg, state).await }
                    }),
            )
            .branch(
                Update::filter_message()
                    .filter(|msg: Message| msg.text().is_some())
                    .endpoint(move |bot: Bot, msg: Message| {
                        let state = Arc::clone(&state_for_messages);
                        debug!(chat_id = %msg.chat.id, text = ?msg.text(), "Regular message received");
                        async move { handle_message(bot, msg, state).await }
                    }),
            )
            .branch(Update::filter_message().endpoint(move |msg: Message| {
                let state = Arc::clone(&state_for_others);
                async move {
                    remember_chat(&state, &msg).await;
                    respond(())
                }
            }));

        info!("Bot is running! Send /start to begin.");

        Dispatcher::builder(bot, handler)
            .default_handler(|upd| async move {
                warn!("Unhandled update: {:?}", upd);
            })
            .enable_ctrlc_handler()
            .build()
            .dispatch()
            .await;

        info!("Bot stopped");
        Ok(())
    }
}
