//! # Actions
//!
//! Everything that can happen in Quill becomes an `Action`. User presses
//! Enter? That's `Action::Submit`. The gateway answers (or fails)? That's
//! `Action::CompletionFinished`.
//!
//! `update()` takes the current state and an action, mutates the state, and
//! returns an `Effect` describing the I/O the caller must perform. No I/O
//! happens here, which is what makes the chat flow testable:
//!
//! ```text
//! State + Action  →  update()  →  New State + Effect
//! ```
//!
//! Every gateway failure resolves into a rendered assistant message; errors
//! never escape the reducer, so the transcript stays the single source of
//! user-visible truth.

use log::debug;

use crate::core::conversation::ConversationData;
use crate::core::state::App;
use crate::gateway::GatewayError;
use crate::study::{CardStatus, Tick};

#[derive(Debug)]
pub enum Action {
    /// User submitted chat input.
    Submit(String),
    /// The background turn created a conversation for this session.
    ConversationCreated(String),
    /// The gateway call finished (reply content or typed failure).
    CompletionFinished(Result<String, GatewayError>),
    /// User cancelled a pending generation.
    CancelGeneration,
    /// Empty the in-memory transcript (no persistence deletion implied).
    ClearTranscript,
    /// Start over: fresh transcript, no active conversation.
    NewConversation,
    /// Replace the session with a stored conversation.
    LoadConversation(ConversationData),
    /// Flashcard status toggle.
    SetCardStatus { index: usize, status: CardStatus },
    /// Reorder the deck with the balancing algorithm.
    BalanceDeck,
    StartTimer,
    PauseTimer,
    ResetTimer,
    TimerTick,
    Quit,
}

/// I/O the TUI layer must perform after an `update()`.
#[derive(Debug, PartialEq, Eq)]
pub enum Effect {
    None,
    /// Spawn the background turn: conversation setup, persistence of the
    /// user message, then the gateway request.
    DispatchCompletion,
    /// Persist this assistant reply under the active conversation.
    PersistReply(String),
    /// Spawn the once-per-second timer ticker.
    StartTicker,
    /// Abort the ticker so no stale tick races a fresh run.
    StopTicker,
    Quit,
}

/// Maps a gateway failure to the assistant message rendered for it.
pub fn error_reply(error: &GatewayError) -> String {
    match error {
        GatewayError::Http(status) => format!(
            "I'm sorry, but there was an error communicating with the AI ({status}). Please try again."
        ),
        GatewayError::InvalidBody(_) => {
            "Sorry, I received an invalid response from the server. Please try again.".to_string()
        }
        GatewayError::EmptyChoices => {
            "I received an unexpected response format. Please try again or contact support."
                .to_string()
        }
        GatewayError::Network(_) | GatewayError::Config(_) => {
            "Sorry, there was an error sending your message. Please try again.".to_string()
        }
    }
}

pub fn update(app: &mut App, action: Action) -> Effect {
    match action {
        Action::Submit(text) => {
            let trimmed = text.trim();
            // Whitespace-only input is a no-op, and the send control is
            // inert while a request is in flight.
            if trimmed.is_empty() || app.is_loading {
                return Effect::None;
            }
            app.transcript.push_user(trimmed);
            app.transcript.push_pending();
            app.is_loading = true;
            app.status_message = String::from("Waiting for reply...");
            Effect::DispatchCompletion
        }

        Action::ConversationCreated(id) => {
            debug!("Conversation created: {id}");
            app.current_conversation = Some(id);
            Effect::None
        }

        Action::CompletionFinished(outcome) => {
            // A result arriving after a cancel or session switch belongs to
            // a turn that no longer exists; drop it.
            if !app.is_loading {
                debug!("Dropping stale completion result");
                return Effect::None;
            }
            app.transcript.take_pending();
            app.is_loading = false;
            app.status_message.clear();
            match outcome {
                Ok(content) => {
                    app.transcript.push_assistant(content.clone());
                    if app.current_conversation.is_some() {
                        Effect::PersistReply(content)
                    } else {
                        Effect::None
                    }
                }
                Err(error) => {
                    debug!("Completion failed: {error}");
                    app.transcript.push_assistant(error_reply(&error));
                    Effect::None
                }
            }
        }

        Action::CancelGeneration => {
            if app.is_loading {
                app.transcript.take_pending();
                app.is_loading = false;
                app.status_message = String::from("Generation cancelled");
            }
            Effect::None
        }

        Action::ClearTranscript => {
            app.transcript.clear();
            app.is_loading = false;
            Effect::None
        }

        Action::NewConversation => {
            app.transcript.clear();
            app.is_loading = false;
            app.current_conversation = None;
            app.status_message = String::from("New conversation");
            Effect::None
        }

        Action::LoadConversation(data) => {
            app.transcript.clear();
            app.is_loading = false;
            app.transcript.messages = data.messages;
            app.current_conversation = Some(data.meta.id);
            app.status_message = format!("Opened \"{}\"", data.meta.title);
            Effect::None
        }

        Action::SetCardStatus { index, status } => {
            app.deck.set_status(index, status);
            Effect::None
        }

        Action::BalanceDeck => {
            app.deck.rebalance();
            app.status_message = String::from("Deck balanced");
            Effect::None
        }

        Action::StartTimer => {
            if app.pomodoro.start() {
                Effect::StartTicker
            } else {
                Effect::None
            }
        }

        Action::PauseTimer => {
            app.pomodoro.pause();
            Effect::StopTicker
        }

        Action::ResetTimer => {
            app.pomodoro.reset();
            Effect::StopTicker
        }

        Action::TimerTick => match app.pomodoro.tick() {
            Tick::Finished => {
                app.status_message = String::from("Time's up!");
                Effect::StopTicker
            }
            Tick::Continued | Tick::Ignored => Effect::None,
        },

        Action::Quit => Effect::Quit,
    }
}
