//! Registry of chats the bot has seen, used for broadcasts.
//!
//! Stored as a single JSON document:
//! ```text
//! state_dir/
//! └── state/
//!     └── chats.json
//! ```

use std::collections::BTreeMap;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::atomic::{atomic_write_json, read_json_optional};
use crate::error::Result;

/// A chat that has messaged the bot at least once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnownChat {
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// First name for private chats, title for groups.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub first_seen: DateTime<Utc>,
}

impl KnownChat {
    pub fn new(id: i64, username: Option<String>, name: Option<String>) -> Self {
        Self {
            id,
            username,
            name,
            first_seen: Utc::now(),
        }
    }

    /// `@username`, else the name, else the id.
    pub fn label(&self) -> String {
        match (&self.username, &self.name) {
            (Some(username), _) => format!("@{username}"),
            (None, Some(name)) => name.clone(),
            (None, None) => self.id.to_string(),
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct ChatsFile {
    chats: Vec<KnownChat>,
}

/// Known chats keyed by id. Every change is written through to disk when
/// the registry has a backing file.
#[derive(Debug, Default)]
pub struct ChatRegistry {
    path: Option<PathBuf>,
    chats: BTreeMap<i64, KnownChat>,
}

impl ChatRegistry {
    /// Load from `path`; a missing file gives an empty registry.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let file: ChatsFile = read_json_optional(&path)?.unwrap_or_default();
        let chats = file.chats.into_iter().map(|c| (c.id, c)).collect();
        Ok(Self {
            path: Some(path),
            chats,
        })
    }

    /// A registry that never touches disk.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Record `chat`. Returns true if the chat was not known before.
    ///
    /// A known chat keeps its `first_seen` but picks up new names.
    pub fn register(&mut self, chat: KnownChat) -> Result<bool> {
        let is_new = match self.chats.get_mut(&chat.id) {
            Some(existing) => {
                if existing.username == chat.username && existing.name == chat.name {
                    return Ok(false);
                }
                existing.username = chat.username;
                existing.name = chat.name;
                false
            }
            None => {
                self.chats.insert(chat.id, chat);
                true
            }
        };
        self.save()?;
        Ok(is_new)
    }

    /// Drop a chat, e.g. after the bot was blocked there.
    pub fn forget(&mut self, id: i64) -> Result<bool> {
        if self.chats.remove(&id).is_none() {
            return Ok(false);
        }
        self.save()?;
        Ok(true)
    }

    pub fn ids(&self) -> Vec<i64> {
        self.chats.keys().copied().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &KnownChat> {
        self.chats.values()
    }

    pub fn len(&self) -> usize {
        self.chats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chats.is_empty()
    }

    fn save(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let file = ChatsFile {
            chats: self.chats.values().cloned().collect(),
        };
        atomic_write_json(path, &file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn chat(id: i64, username: Option<&str>) -> KnownChat {
        KnownChat::new(id, username.map(String::from), Some("Asha".to_string()))
    }

    #[test]
    fn test_open_missing_file_is_empty() {
        let dir = tempdir().unwrap();
        let registry = ChatRegistry::open(dir.path().join("state/chats.json")).unwrap();

        assert!(registry.is_empty());
        assert!(!dir.path().join("state/chats.json").exists());
    }

    #[test]
    fn test_register_persists_and_reloads() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state/chats.json");

        let mut registry = ChatRegistry::open(&path).unwrap();
        assert!(registry.register(chat(42, Some("asha"))).unwrap());
        assert!(registry.register(chat(-100500, None)).unwrap());

        let reloaded = ChatRegistry::open(&path).unwrap();
        assert_eq!(reloaded.ids(), vec![-100500, 42]);
        assert_eq!(reloaded.iter().find(|c| c.id == 42).unwrap().label(), "@asha");
    }

    #[test]
    fn test_register_is_idempotent() {
        let mut registry = ChatRegistry::in_memory();

        assert!(registry.register(chat(7, None)).unwrap());
        assert!(!registry.register(chat(7, None)).unwrap());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_register_updates_names_keeps_first_seen() {
        let mut registry = ChatRegistry::in_memory();
        let original = chat(7, None);
        let first_seen = original.first_seen;
        registry.register(original).unwrap();

        assert!(!registry.register(chat(7, Some("renamed"))).unwrap());
        let stored = registry.iter().next().unwrap();
        assert_eq!(stored.username.as_deref(), Some("renamed"));
        assert_eq!(stored.first_seen, first_seen);
    }

    #[test]
    fn test_forget() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("chats.json");
        let mut registry = ChatRegistry::open(&path).unwrap();
        registry.register(chat(1, None)).unwrap();

        assert!(registry.forget(1).unwrap());
        assert!(!registry.forget(1).unwrap());
        assert!(ChatRegistry::open(&path).unwrap().is_empty());
    }

    #[test]
    fn test_label_fallbacks() {
        assert_eq!(KnownChat::new(5, None, Some("Group".into())).label(), "Group");
        assert_eq!(KnownChat::new(5, None, None).label(), "5");
    }
}
