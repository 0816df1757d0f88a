//! Eduhub Core - transport-free logic behind the Eduhub bot.
//!
//! - **config**: state paths and environment-driven settings
//! - **content**: shapes of the remote JSON documents
//! - **fetch**: remote JSON retrieval behind the `ContentSource` trait
//! - **catalog**: the cached exam list
//! - **menu**: exam/paper pagination and callback payloads
//! - **quiz**: shortcut parsing, question selection and message formatting
//! - **render**: PNG logos and quiz cards
//! - **text**: HTML cleanup and escaping

pub mod catalog;
pub mod config;
pub mod content;
pub mod fetch;
pub mod menu;
pub mod quiz;
pub mod render;
pub mod text;

pub use catalog::{find_exam, find_paper, ExamCatalog};
pub use config::{ensure_all_dirs, env_file, runtime_state_dir, state_dir, ConfigError, Settings};
pub use content::{ExamCategory, Paper, PoolQuestion, PyqDocument, PyqQuestion, Quote, Subject};
pub use fetch::{fetch_as, ContentSource, FetchError, HttpContentSource};
pub use menu::{exams_page, papers_page, play_link, MenuAction, MenuButton, MenuPage, PAGE_SIZE};
pub use quiz::{parse_shortcut, QuizPoll, QuizShortcut};
pub use render::{render_logo, render_quiz_card, FontPool, LogoStyle, RenderError};
pub use text::{clean_html, html_escape};
