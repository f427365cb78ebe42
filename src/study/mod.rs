//! # Study Tools
//!
//! Subsystems independent of the chat flow:
//!
//! - [`flashcards`]: question/answer/status records and the balancing
//!   algorithm that interleaves the two status groups.
//! - [`quiz`]: multiple-choice quiz generation from the flashcard deck.
//! - [`pomodoro`]: countdown state machine, tick-driven by the TUI.

pub mod flashcards;
pub mod pomodoro;
pub mod quiz;

pub use flashcards::{balance, CardStatus, Deck, Flashcard};
pub use pomodoro::{Phase, Pomodoro, Tick};
pub use quiz::{generate_quiz, QuizQuestion};
