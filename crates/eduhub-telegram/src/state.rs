//! Shared state for the Telegram bot.

use std::collections::HashMap;
use std::sync::Arc;

use eduhub_core::content::{PoolQuestion, PyqDocument, PyqQuestion, Quote};
use eduhub_core::{fetch_as, ContentSource, ExamCatalog, FetchError, FontPool, HttpContentSource, Settings};
use eduhub_persistence::{ChatRegistry, KnownChat};
use teloxide::types::{ChatId, UserId};
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

use crate::error::Result;

/// Warnings after which a user is muted automatically.
pub const WARN_LIMIT: u32 = 3;

/// Shared state for the Telegram bot, accessible across all handlers.
pub struct BotState {
    settings: Settings,
    /// Where remote documents come from.
    source: Arc<dyn ContentSource>,
    /// Exam list, loaded on first `/quiz`.
    catalog: ExamCatalog,
    fonts: Arc<FontPool>,
    /// Every chat that has messaged the bot.
    chats: RwLock<ChatRegistry>,
    /// Moderation warnings per (chat, user).
    warnings: RwLock<HashMap<(ChatId, UserId), u32>>,
}

impl BotState {
    /// Build production state: HTTP content, fonts from disk, persisted chats.
    pub fn new(settings: Settings) -> Result<Self> {
        let source: Arc<dyn ContentSource> = Arc::new(HttpContentSource::new(settings.http_timeout)?);

        let fonts = FontPool::load_dir(&settings.font_dir);
        if fonts.is_empty() {
            warn!(
                dir = %settings.font_dir.display(),
                "No fonts found; /gen and /quizimg will fall back to text"
            );
        } else {
            info!(count = fonts.len(), "Fonts loaded");
        }

        let chats_path = settings.chats_file();
        let chats = match ChatRegistry::open(&chats_path) {
            Ok(chats) => {
                info!(count = chats.len(), "Loaded known chats from disk");
                chats
            }
            Err(e) => {
                error!(error = %e, path = %chats_path.display(), "Failed to load known chats");
                ChatRegistry::in_memory()
            }
        };

        Ok(Self::with_parts(settings, source, fonts, chats))
    }

    /// Assemble state from explicit parts (used by tests).
    pub fn with_parts(
        settings: Settings,
        source: Arc<dyn ContentSource>,
        fonts: FontPool,
        chats: ChatRegistry,
    ) -> Self {
        let catalog = ExamCatalog::new(Arc::clone(&source), settings.exams_url.clone());
        Self {
            settings,
            source,
            catalog,
            fonts: Arc::new(fonts),
            chats: RwLock::new(chats),
            warnings: RwLock::new(HashMap::new()),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn catalog(&self) -> &ExamCatalog {
        &self.catalog
    }

    pub fn fonts(&self) -> Arc<FontPool> {
        Arc::clone(&self.fonts)
    }

    /// Whether `user_id` is the configured bot admin.
    pub fn is_bot_admin(&self, user_id: UserId) -> bool {
        self.settings.is_admin(user_id.0)
    }

    /// The quiz pool used for polls and shortcuts.
    pub async fn quiz_pool(&self) -> std::result::Result<Vec<PoolQuestion>, FetchError> {
        fetch_as(self.source.as_ref(), &self.settings.quiz_pool_url).await
    }

    /// Questions of the configured PYQ paper.
    pub async fn pyq_questions(&self) -> std::result::Result<Vec<PyqQuestion>, FetchError> {
        let doc: PyqDocument = fetch_as(self.source.as_ref(), &self.settings.pyq_url).await?;
        Ok(doc.into_questions())
    }

    pub async fn quotes(&self) -> std::result::Result<Vec<Quote>, FetchError> {
        fetch_as(self.source.as_ref(), &self.settings.quotes_url).await
    }

    /// Remember a chat. Storage failures are logged, not returned.
    pub async fn register_chat(&self, chat: KnownChat) {
        let id = chat.id;
        let mut chats = self.chats.write().await;
        match chats.register(chat) {
            Ok(true) => info!(chat_id = id, total = chats.len(), "New chat registered"),
            Ok(false) => {}
            Err(e) => error!(chat_id = id, error = %e, "Failed to save known chats"),
        }
    }

    pub async fn known_chats(&self) -> Vec<KnownChat> {
        self.chats.read().await.iter().cloned().collect()
    }

    pub async fn forget_chat(&self, id: i64) {
        if let Err(e) = self.chats.write().await.forget(id) {
            error!(chat_id = id, error = %e, "Failed to save known chats");
        } else {
            debug!(chat_id = id, "Chat forgotten");
        }
    }

    /// Add a warning and return the new count.
    pub async fn add_warning(&self, chat_id: ChatId, user_id: UserId) -> u32 {
        let mut warnings = self.warnings.write().await;
        let count = warnings.entry((chat_id, user_id)).or_insert(0);
        *count += 1;
        *count
    }

    pub async fn warning_count(&self, chat_id: ChatId, user_id: UserId) -> u32 {
        self.warnings
            .read()
            .await
            .get(&(chat_id, user_id))
            .copied()
            .unwrap_or(0)
    }

    /// Clear a user's warnings, returning how many there were.
    pub async fn reset_warnings(&self, chat_id: ChatId, user_id: UserId) -> u32 {
        self.warnings
            .write()
            .await
            .remove(&(chat_id, user_id))
            .unwrap_or(0)
    }
}

/// Create shared state wrapped in Arc.
pub fn create_shared_state(settings: Settings) -> Result<Arc<BotState>> {
    Ok(Arc::new(BotState::new(settings)?))
}
