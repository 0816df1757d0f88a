//! Persistence layer for Eduhub.
//!
//! Crash-safe JSON files (write to a temp file, then rename) and the
//! registry of chats the bot has talked to.
//!
//! # Example
//!
//! ```no_run
//! use eduhub_persistence::{ChatRegistry, KnownChat};
//!
//! let mut chats = ChatRegistry::open("/home/user/.eduhub/state/chats.json").unwrap();
//! chats.register(KnownChat::new(42, Some("asha".into()), None)).unwrap();
//! println!("{} known chats", chats.len());
//! ```

pub mod atomic;
pub mod chat_store;
pub mod error;

pub use chat_store::{ChatRegistry, KnownChat};
pub use error::{PersistenceError, Result};
