//! Error types for the Telegram bot.

use thiserror::Error;

/// Errors that can occur while starting or running the bot.
///
/// Handler-level failures (fetch, render, transport) are turned into replies
/// and never surface here.
#[derive(Debug, Error)]
pub enum TelegramError {
    /// Bot token not provided.
    #[error("Telegram bot token not set. Set TELEGRAM_BOT_TOKEN (or BOT_TOKEN).")]
    NoToken,

    /// Failed to start the bot.
    #[error("Failed to start bot: {0}")]
    BotStartFailed(String),

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(#[from] eduhub_core::ConfigError),

    /// Remote content could not be loaded.
    #[error("Content error: {0}")]
    Fetch(#[from] eduhub_core::FetchError),

    /// IO error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type for Telegram operations.
pub type Result<T> = std::result::Result<T, TelegramError>;

impl From<teloxide::RequestError> for TelegramError {
    fn from(e: teloxide::RequestError) -> Self {
        TelegramError::BotStartFailed(e.to_string())
    }
}
