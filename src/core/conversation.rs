//! # Conversation Store
//!
//! Persists conversations to `~/.quill/conversations/`.
//!
//! Each conversation is a JSON file (`<uuid>.json`) plus a lightweight index
//! (`conversations.json`) that avoids loading all files just to render a
//! list. All writes use atomic rename (write `.tmp`, then `rename()`).
//!
//! Every operation here is best-effort from the chat flow's point of view:
//! callers log failures and continue in memory-only mode.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::Utc;
use log::info;
use serde::{Deserialize, Serialize};

use crate::gateway::ChatMessage;

/// Title length cap for titles derived from the first message.
const TITLE_MAX_CHARS: usize = 30;

/// Summary metadata for a conversation (stored in the index file).
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ConversationMeta {
    pub id: String,
    pub title: String,
    pub created_at: i64,
    pub updated_at: i64,
    pub message_count: usize,
}

/// Full conversation data: metadata + ordered messages.
#[derive(Serialize, Deserialize, Debug)]
pub struct ConversationData {
    pub meta: ConversationMeta,
    pub messages: Vec<ChatMessage>,
}

/// Index of all conversations, most recently updated first.
#[derive(Serialize, Deserialize, Default, Debug)]
pub struct ConversationIndex {
    pub conversations: Vec<ConversationMeta>,
}

/// Derives a conversation title from the first sent message: the first 30
/// characters, with an ellipsis marker when truncated.
pub fn derive_title(first_message: &str) -> String {
    let mut title: String = first_message.chars().take(TITLE_MAX_CHARS).collect();
    if first_message.chars().count() > TITLE_MAX_CHARS {
        title.push_str("...");
    }
    title
}

/// Atomically write `data` as JSON to `path` (via `.tmp` + rename).
fn atomic_write_json<T: Serialize>(path: &Path, data: &T) -> io::Result<()> {
    let tmp_path = path.with_extension("tmp");
    let json = serde_json::to_string_pretty(data)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    fs::write(&tmp_path, json)?;
    fs::rename(&tmp_path, path)?;
    Ok(())
}

/// File-backed conversation store rooted at a directory. Production uses
/// [`ConversationStore::open_default`]; tests point it at a temp dir.
#[derive(Debug)]
pub struct ConversationStore {
    root: PathBuf,
}

impl ConversationStore {
    /// Opens (creating if needed) `~/.quill/conversations/`.
    pub fn open_default() -> io::Result<Self> {
        let home = dirs::home_dir()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no home directory"))?;
        Self::open(home.join(".quill").join("conversations"))
    }

    /// Opens a store rooted at an explicit directory, creating it if needed.
    pub fn open(root: PathBuf) -> io::Result<Self> {
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    fn conversation_path(&self, id: &str) -> PathBuf {
        self.root.join(format!("{id}.json"))
    }

    fn index_path(&self) -> PathBuf {
        self.root.join("conversations.json")
    }

    /// Creates an empty conversation with the given title and returns its id.
    pub fn create(&self, title: &str) -> io::Result<String> {
        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now().timestamp();
        let data = ConversationData {
            meta: ConversationMeta {
                id: id.clone(),
                title: title.to_string(),
                created_at: now,
                updated_at: now,
                message_count: 0,
            },
            messages: Vec::new(),
        };

        atomic_write_json(&self.conversation_path(&id), &data)?;
        self.update_index(data.meta)?;
        info!("Created conversation {id}");
        Ok(id)
    }

    /// Appends a message to a conversation and refreshes its metadata.
    pub fn save_message(&self, id: &str, message: &ChatMessage) -> io::Result<()> {
        let mut data = self.fetch(id)?;
        data.messages.push(message.clone());
        data.meta.message_count = data.messages.len();
        data.meta.updated_at = Utc::now().timestamp();

        atomic_write_json(&self.conversation_path(id), &data)?;
        self.update_index(data.meta)
    }

    /// Loads the index. A missing index file is an empty store.
    pub fn fetch_all(&self) -> io::Result<ConversationIndex> {
        let path = self.index_path();
        if !path.exists() {
            return Ok(ConversationIndex::default());
        }
        let json = fs::read_to_string(path)?;
        serde_json::from_str(&json).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    /// Loads one conversation by id.
    pub fn fetch(&self, id: &str) -> io::Result<ConversationData> {
        let json = fs::read_to_string(self.conversation_path(id))?;
        serde_json::from_str(&json).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    /// Deletes one conversation and removes it from the index.
    pub fn delete(&self, id: &str) -> io::Result<()> {
        let path = self.conversation_path(id);
        if path.exists() {
            fs::remove_file(path)?;
        }

        let mut index = self.fetch_all().unwrap_or_default();
        index.conversations.retain(|c| c.id != id);
        atomic_write_json(&self.index_path(), &index)
    }

    /// Deletes every `.json` file in the store directory, index included.
    /// Sweeping the directory rather than the index also removes files a
    /// stale index no longer lists.
    pub fn delete_all(&self) -> io::Result<()> {
        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                fs::remove_file(path)?;
            }
        }
        Ok(())
    }

    /// Replaces (or inserts) an index entry, keeping most recently updated
    /// conversations first.
    fn update_index(&self, meta: ConversationMeta) -> io::Result<()> {
        let mut index = self.fetch_all().unwrap_or_default();
        index.conversations.retain(|c| c.id != meta.id);
        index.conversations.push(meta);
        index
            .conversations
            .sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        atomic_write_json(&self.index_path(), &index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::Role;

    /// Store rooted in a unique temp dir, removed when the test ends.
    struct TempStore(ConversationStore);

    impl std::ops::Deref for TempStore {
        type Target = ConversationStore;
        fn deref(&self) -> &ConversationStore {
            &self.0
        }
    }

    impl Drop for TempStore {
        fn drop(&mut self) {
            let _ = fs::remove_dir_all(&self.0.root);
        }
    }

    fn temp_store() -> TempStore {
        let root = std::env::temp_dir().join(format!("quill-store-{}", uuid::Uuid::new_v4()));
        TempStore(ConversationStore::open(root).unwrap())
    }

    #[test]
    fn test_derive_title_short_message() {
        assert_eq!(derive_title("Hello there"), "Hello there");
    }

    #[test]
    fn test_derive_title_truncates_at_30_chars() {
        let long = "a".repeat(31);
        let title = derive_title(&long);
        assert_eq!(title, format!("{}...", "a".repeat(30)));

        // Exactly 30 chars keeps no ellipsis
        let exact = "b".repeat(30);
        assert_eq!(derive_title(&exact), exact);
    }

    #[test]
    fn test_derive_title_counts_chars_not_bytes() {
        let emoji = "🦀".repeat(31);
        let title = derive_title(&emoji);
        assert_eq!(title, format!("{}...", "🦀".repeat(30)));
    }

    #[test]
    fn test_create_and_fetch_roundtrip() {
        let store = temp_store();
        let id = store.create("My conversation").unwrap();

        let data = store.fetch(&id).unwrap();
        assert_eq!(data.meta.title, "My conversation");
        assert_eq!(data.meta.message_count, 0);
        assert!(data.messages.is_empty());

        let index = store.fetch_all().unwrap();
        assert_eq!(index.conversations.len(), 1);
        assert_eq!(index.conversations[0].id, id);
    }

    #[test]
    fn test_save_message_updates_count_and_order() {
        let store = temp_store();
        let id = store.create("t").unwrap();

        store
            .save_message(&id, &ChatMessage::user("hello"))
            .unwrap();
        store
            .save_message(&id, &ChatMessage::assistant("hi"))
            .unwrap();

        let data = store.fetch(&id).unwrap();
        assert_eq!(data.meta.message_count, 2);
        assert_eq!(data.messages[0].role, Role::User);
        assert_eq!(data.messages[1].role, Role::Assistant);
        assert_eq!(data.messages[1].content, "hi");

        let index = store.fetch_all().unwrap();
        assert_eq!(index.conversations[0].message_count, 2);
    }

    #[test]
    fn test_save_message_unknown_id_fails() {
        let store = temp_store();
        assert!(store
            .save_message("missing", &ChatMessage::user("x"))
            .is_err());
    }

    #[test]
    fn test_delete_removes_file_and_index_entry() {
        let store = temp_store();
        let keep = store.create("keep").unwrap();
        let gone = store.create("gone").unwrap();

        store.delete(&gone).unwrap();
        assert!(store.fetch(&gone).is_err());
        assert!(store.fetch(&keep).is_ok());

        let index = store.fetch_all().unwrap();
        assert_eq!(index.conversations.len(), 1);
        assert_eq!(index.conversations[0].id, keep);
    }

    #[test]
    fn test_delete_all_empties_store() {
        let store = temp_store();
        store.create("a").unwrap();
        store.create("b").unwrap();

        store.delete_all().unwrap();
        assert!(store.fetch_all().unwrap().conversations.is_empty());
    }

    #[test]
    fn test_delete_all_removes_files_missing_from_index() {
        let store = temp_store();
        let id = store.create("listed").unwrap();

        // A conversation file the index does not know about.
        let orphan = store.root.join("orphan.json");
        fs::write(&orphan, r#"{"meta": {}, "messages": []}"#).unwrap();

        store.delete_all().unwrap();
        assert!(!orphan.exists());
        assert!(store.fetch(&id).is_err());
        assert!(store.fetch_all().unwrap().conversations.is_empty());
    }
}
