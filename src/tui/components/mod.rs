//! Reusable TUI components.
//!
//! Components follow a persistent state + transient wrapper pattern: the
//! `*State` structs live in `TuiState` across frames, while the render
//! wrappers are rebuilt each frame with borrowed state and props.

pub mod conversation_manager;
pub mod flashcard_pane;
pub mod input_box;
pub mod message;
pub mod message_list;
pub mod pomodoro_pane;
pub mod quiz_pane;
pub mod title_bar;

pub use conversation_manager::{ConversationEvent, ConversationManager, ConversationManagerState};
pub use flashcard_pane::{FlashcardEvent, FlashcardPane, FlashcardPaneState};
pub use input_box::{InputBox, InputEvent};
pub use message_list::{MessageList, MessageListState};
pub use pomodoro_pane::{PomodoroEvent, PomodoroKeys, PomodoroPane};
pub use quiz_pane::{QuizPane, QuizPaneState};
pub use title_bar::TitleBar;
