//! Telegram front end of the Eduhub exam-prep bot.
//!
//! # Features
//!
//! - Browse exams and papers with paged inline menus, then play a paper
//! - Quiz polls from a question pool (`/b3`, `/pyqc 5`)
//! - Previous-year questions as text or as a rendered image card
//! - Logo generation, quotes, greetings
//! - Group moderation and bot-admin tools
//!
//! # Environment Variables
//!
//! Required:
//! - `TELEGRAM_BOT_TOKEN` (or `BOT_TOKEN`): Bot token from @BotFather
//!
//! Optional:
//! - `EDUHUB_ADMIN_ID`: Telegram user id of the bot admin
//! - `EDUHUB_STATE_DIR`: where known chats are stored (default: ~/.eduhub)
//! - `EDUHUB_FONT_DIR`: fonts used for logos and quiz cards
//!
//! # Example
//!
//! ```no_run
//! use eduhub_core::Settings;
//! use eduhub_telegram::TelegramBot;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let bot = TelegramBot::new(Settings::from_env()?)?;
//!     bot.start_polling().await?;
//!     Ok(())
//! }
//! ```

pub mod admin;
pub mod bot;
pub mod callbacks;
pub mod error;
pub mod handlers;
pub mod moderation;
pub mod state;

pub use bot::TelegramBot;
pub use callbacks::{resolve_callback, CallbackOutcome};
pub use error::{Result, TelegramError};
pub use handlers::Command;
pub use state::{create_shared_state, BotState, WARN_LIMIT};
