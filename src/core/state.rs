//! # Application State
//!
//! Core business state for Quill. This module contains domain state only -
//! no TUI-specific types. Presentation state lives in the `tui` module.
//!
//! ```text
//! App
//! ├── gateway: Arc<dyn CompletionGateway>      // completion endpoint
//! ├── store: Option<Arc<ConversationStore>>    // best-effort persistence
//! ├── transcript: Transcript                   // chat history
//! ├── deck: Deck                               // flashcards
//! ├── pomodoro: Pomodoro                       // countdown timer
//! ├── model_name / system_prompt               // from config
//! ├── status_message: String                   // status bar text
//! ├── is_loading: bool                         // completion in flight
//! └── current_conversation: Option<String>     // None = not yet persisted
//! ```
//!
//! State changes only happen through `update(app, action)` in action.rs.

use std::sync::Arc;

use crate::core::config::ResolvedConfig;
use crate::core::conversation::ConversationStore;
use crate::gateway::{CompletionGateway, Transcript};
use crate::study::{Deck, Pomodoro};

pub struct App {
    pub gateway: Arc<dyn CompletionGateway>,
    /// `None` when the store could not be opened; the chat then runs
    /// memory-only and persistence is silently skipped.
    pub store: Option<Arc<ConversationStore>>,
    pub transcript: Transcript,
    pub deck: Deck,
    pub pomodoro: Pomodoro,
    pub model_name: String,
    pub system_prompt: String,
    pub status_message: String,
    pub is_loading: bool,
    /// Identifier of the active conversation. Created lazily on the first
    /// sent message.
    pub current_conversation: Option<String>,
}

impl App {
    pub fn new(
        gateway: Arc<dyn CompletionGateway>,
        store: Option<Arc<ConversationStore>>,
        config: &ResolvedConfig,
    ) -> Self {
        Self {
            gateway,
            store,
            transcript: Transcript::new(),
            deck: Deck::starter(),
            pomodoro: Pomodoro::new(config.pomodoro_seconds),
            model_name: config.model_name.clone(),
            system_prompt: config.system_prompt.clone(),
            status_message: String::from("Welcome to Quill!"),
            is_loading: false,
            current_conversation: None,
        }
    }
}
