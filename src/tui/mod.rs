//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI,
//! and translates keyboard events into core::Action values. This is the
//! only module that knows about ratatui and crossterm.
//!
//! ## Redraw Strategy
//!
//! The event loop uses conditional redraw to avoid unnecessary work:
//!
//! - **Animating** (reply pending, timer running): draws every ~80ms.
//! - **Idle**: sleeps up to 500ms and only redraws on events or resize.
//!
//! A `SteadyBlock` cursor style is used instead of a blinking cursor because
//! ratatui's `set_cursor_position` resets the terminal's blink timer on every
//! `draw()` call, making blinking cursors appear erratic during continuous
//! redraws.

mod clipboard;
mod component;
mod components;
mod event;
mod ui;

use std::io::stdout;
use std::path::Path;
use std::sync::{mpsc, Arc};
use std::time::Duration;

use crossterm::cursor::{Hide, SetCursorStyle, Show};
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
};
use crossterm::execute;
use log::{debug, info, warn};
use tokio::task::AbortHandle;

use crate::core::action::{update, Action, Effect};
use crate::core::config::ResolvedConfig;
use crate::core::conversation::{derive_title, ConversationStore};
use crate::core::state::App;
use crate::extract::extract_content;
use crate::gateway::{
    ChatMessage, CompletionGateway, CompletionParams, GatewayError, OpenRouterGateway, Role,
    PENDING_REPLY,
};
use crate::tui::component::EventHandler;
use crate::tui::components::conversation_manager::ConversationEvent;
use crate::tui::components::{
    ConversationManagerState, FlashcardEvent, FlashcardPane, FlashcardPaneState, InputBox,
    InputEvent, MessageListState, PomodoroEvent, PomodoroKeys, QuizPaneState,
};
use crate::tui::event::{poll_event_immediate, poll_event_timeout, TuiEvent};

/// The four top-level views, cycled with Tab / Shift+Tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pane {
    Chat,
    Cards,
    Quiz,
    Timer,
}

impl Pane {
    pub const ALL: [Pane; 4] = [Pane::Chat, Pane::Cards, Pane::Quiz, Pane::Timer];

    pub fn label(self) -> &'static str {
        match self {
            Pane::Chat => "Chat",
            Pane::Cards => "Cards",
            Pane::Quiz => "Quiz",
            Pane::Timer => "Timer",
        }
    }

    pub fn next(self) -> Pane {
        match self {
            Pane::Chat => Pane::Cards,
            Pane::Cards => Pane::Quiz,
            Pane::Quiz => Pane::Timer,
            Pane::Timer => Pane::Chat,
        }
    }

    pub fn prev(self) -> Pane {
        match self {
            Pane::Chat => Pane::Timer,
            Pane::Cards => Pane::Chat,
            Pane::Quiz => Pane::Cards,
            Pane::Timer => Pane::Quiz,
        }
    }
}

/// TUI-specific presentation state (not part of core business logic).
pub struct TuiState {
    pub message_list: MessageListState,
    pub input_box: InputBox,
    pub flashcards: FlashcardPaneState,
    pub quiz: QuizPaneState,
    pub active_pane: Pane,
    /// Conversation manager overlay (None = hidden).
    pub conversation_manager: Option<ConversationManagerState>,
}

impl TuiState {
    pub fn new() -> Self {
        Self {
            message_list: MessageListState::new(),
            input_box: InputBox::new(),
            flashcards: FlashcardPaneState::new(),
            quiz: QuizPaneState::new(),
            active_pane: Pane::Chat,
            conversation_manager: None,
        }
    }
}

impl Default for TuiState {
    fn default() -> Self {
        Self::new()
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        execute!(
            stdout(),
            EnableMouseCapture,
            EnableBracketedPaste,
            Show,
            SetCursorStyle::SteadyBlock,
        )?;
        info!("Terminal modes enabled (mouse, bracketed paste, steady block cursor)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(
            stdout(),
            DisableMouseCapture,
            DisableBracketedPaste,
            Hide
        );
    }
}

/// Builds the completion gateway from resolved config credentials.
pub fn build_gateway(config: &ResolvedConfig) -> Result<Arc<dyn CompletionGateway>, GatewayError> {
    let api_key = config.api_key.clone().ok_or_else(|| {
        GatewayError::Config(
            "OpenRouter API key must be set (config file or OPENROUTER_API_KEY env var)"
                .to_string(),
        )
    })?;
    Ok(Arc::new(OpenRouterGateway::new(
        api_key,
        config.base_url.clone(),
    )?))
}

pub fn run(config: ResolvedConfig) -> std::io::Result<()> {
    let gateway = build_gateway(&config).map_err(std::io::Error::other)?;
    let store = match ConversationStore::open_default() {
        Ok(store) => Some(Arc::new(store)),
        Err(e) => {
            warn!("Conversation store unavailable, running memory-only: {e}");
            None
        }
    };
    let mut app = App::new(gateway, store, &config);
    let mut tui = TuiState::new();

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new();

    // Channel for actions from background tasks
    let (tx, rx) = mpsc::channel();

    // Abort handles for the in-flight completion (Esc-to-cancel) and the
    // once-per-second timer ticker.
    let mut completion_handles: Vec<AbortHandle> = Vec::new();
    let mut ticker_handle: Option<AbortHandle> = None;

    let mut needs_redraw = true; // Force first frame
    let mut should_quit = false;

    loop {
        tui.input_box.dimmed = app.is_loading;

        let animating = app.is_loading || app.pomodoro.is_running();
        if animating {
            tui.message_list.advance_tick();
            needs_redraw = true;
        }

        if needs_redraw {
            terminal.draw(|f| ui::draw_ui(f, &app, &mut tui))?;
            needs_redraw = false;
        }

        // Dynamic poll timeout: short when animating, long when idle
        let timeout = if animating {
            Duration::from_millis(80)
        } else {
            Duration::from_millis(500)
        };
        let first_event = poll_event_timeout(timeout);

        if first_event.is_some() {
            needs_redraw = true;
        }
        // Process the first event plus everything already queued
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            if matches!(event, TuiEvent::Resize) {
                continue;
            }

            if matches!(event, TuiEvent::ForceQuit) {
                should_quit |= apply_action(
                    &mut app,
                    Action::Quit,
                    &tx,
                    &mut completion_handles,
                    &mut ticker_handle,
                );
                continue;
            }

            if matches!(event, TuiEvent::OpenConversations) {
                match &app.store {
                    Some(store) => {
                        let index = store.fetch_all().unwrap_or_default();
                        tui.conversation_manager =
                            Some(ConversationManagerState::new(index.conversations));
                    }
                    None => {
                        app.status_message = String::from("Conversation store unavailable");
                    }
                }
                continue;
            }

            // When the conversation manager is open, it gets every event.
            if let Some(ref mut manager) = tui.conversation_manager {
                if let Some(conversation_event) = manager.handle_event(&event) {
                    match conversation_event {
                        ConversationEvent::Load(id) => {
                            match app.store.as_ref().map(|store| store.fetch(&id)) {
                                Some(Ok(data)) => {
                                    should_quit |= apply_action(
                                        &mut app,
                                        Action::LoadConversation(data),
                                        &tx,
                                        &mut completion_handles,
                                        &mut ticker_handle,
                                    );
                                    tui.message_list = MessageListState::new();
                                }
                                Some(Err(e)) => {
                                    warn!("Failed to load conversation {id}: {e}");
                                    app.status_message = format!("Load failed: {e}");
                                }
                                None => {}
                            }
                            tui.conversation_manager = None;
                        }
                        ConversationEvent::CreateNew => {
                            should_quit |= apply_action(
                                &mut app,
                                Action::NewConversation,
                                &tx,
                                &mut completion_handles,
                                &mut ticker_handle,
                            );
                            tui.message_list = MessageListState::new();
                            tui.conversation_manager = None;
                        }
                        ConversationEvent::Delete(id) => {
                            if let Some(store) = &app.store {
                                if let Err(e) = store.delete(&id) {
                                    warn!("Failed to delete conversation {id}: {e}");
                                }
                            }
                            manager.remove(&id);
                            if app.current_conversation.as_deref() == Some(&id) {
                                app.current_conversation = None;
                            }
                        }
                        ConversationEvent::DeleteAll => {
                            if let Some(store) = &app.store {
                                if let Err(e) = store.delete_all() {
                                    warn!("Failed to delete conversations: {e}");
                                }
                            }
                            manager.clear();
                            app.current_conversation = None;
                        }
                        ConversationEvent::Dismiss => {
                            tui.conversation_manager = None;
                        }
                    }
                }
                continue;
            }

            // Esc while a reply is pending cancels it, from any pane.
            if matches!(event, TuiEvent::Escape) && app.is_loading {
                for handle in completion_handles.drain(..) {
                    handle.abort();
                }
                should_quit |= apply_action(
                    &mut app,
                    Action::CancelGeneration,
                    &tx,
                    &mut completion_handles,
                    &mut ticker_handle,
                );
                continue;
            }

            match event {
                TuiEvent::NextPane => {
                    tui.active_pane = tui.active_pane.next();
                    continue;
                }
                TuiEvent::PrevPane => {
                    tui.active_pane = tui.active_pane.prev();
                    continue;
                }
                TuiEvent::ClearTranscript => {
                    should_quit |= apply_action(
                        &mut app,
                        Action::ClearTranscript,
                        &tx,
                        &mut completion_handles,
                        &mut ticker_handle,
                    );
                    continue;
                }
                TuiEvent::NewConversation => {
                    should_quit |= apply_action(
                        &mut app,
                        Action::NewConversation,
                        &tx,
                        &mut completion_handles,
                        &mut ticker_handle,
                    );
                    continue;
                }
                TuiEvent::CopyLastReply => {
                    copy_last_reply(&mut app);
                    continue;
                }
                TuiEvent::Escape => {
                    app.status_message.clear();
                    continue;
                }
                _ => {}
            }

            match tui.active_pane {
                Pane::Chat => {
                    if matches!(
                        event,
                        TuiEvent::ScrollUp
                            | TuiEvent::ScrollDown
                            | TuiEvent::ScrollPageUp
                            | TuiEvent::ScrollPageDown
                            | TuiEvent::CursorUp
                            | TuiEvent::CursorDown
                    ) {
                        tui.message_list.handle_event(&event);
                        continue;
                    }
                    if let Some(InputEvent::Submit(text)) = tui.input_box.handle_event(&event) {
                        if let Some(rest) = text.trim().strip_prefix("/attach") {
                            handle_attach(rest.trim(), &mut app, &mut tui.input_box);
                        } else {
                            should_quit |= apply_action(
                                &mut app,
                                Action::Submit(text),
                                &tx,
                                &mut completion_handles,
                                &mut ticker_handle,
                            );
                        }
                    }
                }
                Pane::Cards => {
                    let pane_event =
                        FlashcardPane::new(&app.deck, &mut tui.flashcards).handle_event(&event);
                    match pane_event {
                        Some(FlashcardEvent::ToggleStatus { index }) => {
                            if let Some(card) = app.deck.cards.get(index) {
                                let status = card.status.toggled();
                                should_quit |= apply_action(
                                    &mut app,
                                    Action::SetCardStatus { index, status },
                                    &tx,
                                    &mut completion_handles,
                                    &mut ticker_handle,
                                );
                            }
                        }
                        Some(FlashcardEvent::Balance) => {
                            should_quit |= apply_action(
                                &mut app,
                                Action::BalanceDeck,
                                &tx,
                                &mut completion_handles,
                                &mut ticker_handle,
                            );
                        }
                        None => {}
                    }
                }
                Pane::Quiz => {
                    if tui.quiz.handle_event(&event) {
                        tui.quiz.regenerate(&app.deck, &mut rand::thread_rng());
                        app.status_message = format!(
                            "Generated a {}-question quiz",
                            tui.quiz.questions.len()
                        );
                    }
                }
                Pane::Timer => {
                    let action = match PomodoroKeys.handle_event(&event) {
                        Some(PomodoroEvent::Start) => Some(Action::StartTimer),
                        Some(PomodoroEvent::Pause) => Some(Action::PauseTimer),
                        Some(PomodoroEvent::Reset) => Some(Action::ResetTimer),
                        None => None,
                    };
                    if let Some(action) = action {
                        should_quit |= apply_action(
                            &mut app,
                            action,
                            &tx,
                            &mut completion_handles,
                            &mut ticker_handle,
                        );
                    }
                }
            }
        }

        if should_quit {
            break;
        }

        // Actions from background tasks (completions, timer ticks)
        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            debug!("Event loop received: {action:?}");
            should_quit |= apply_action(
                &mut app,
                action,
                &tx,
                &mut completion_handles,
                &mut ticker_handle,
            );
        }
        if should_quit {
            break;
        }
    }

    for handle in completion_handles.drain(..) {
        handle.abort();
    }
    if let Some(handle) = ticker_handle.take() {
        handle.abort();
    }

    ratatui::restore();
    Ok(())
}

/// Runs the reducer and performs the I/O the returned effect requests.
/// Returns true when the app should quit.
fn apply_action(
    app: &mut App,
    action: Action,
    tx: &mpsc::Sender<Action>,
    completion_handles: &mut Vec<AbortHandle>,
    ticker_handle: &mut Option<AbortHandle>,
) -> bool {
    // A session switch obsoletes any in-flight turn; the reducer also drops
    // a result that was already queued before the abort landed.
    if matches!(
        action,
        Action::ClearTranscript | Action::NewConversation | Action::LoadConversation(_)
    ) {
        for handle in completion_handles.drain(..) {
            handle.abort();
        }
    }
    match update(app, action) {
        Effect::Quit => return true,
        Effect::DispatchCompletion => {
            for handle in completion_handles.drain(..) {
                handle.abort();
            }
            completion_handles.push(spawn_completion(app, tx.clone()));
        }
        Effect::PersistReply(content) => persist_reply(app, &content),
        Effect::StartTicker => {
            if let Some(handle) = ticker_handle.take() {
                handle.abort();
            }
            *ticker_handle = Some(spawn_ticker(tx.clone()));
        }
        Effect::StopTicker => {
            if let Some(handle) = ticker_handle.take() {
                handle.abort();
            }
        }
        Effect::None => {}
    }
    false
}

/// Spawns one chat turn: lazily create the conversation, persist the user
/// message, then ask the gateway and report back through the channel.
fn spawn_completion(app: &App, tx: mpsc::Sender<Action>) -> AbortHandle {
    info!("Spawning completion request");

    let gateway = app.gateway.clone();
    let store = app.store.clone();
    let messages = app.transcript.for_gateway(&app.system_prompt);
    let model = app.model_name.clone();
    let conversation = app.current_conversation.clone();
    let user_content = app
        .transcript
        .last_user_content()
        .unwrap_or_default()
        .to_string();

    tokio::spawn(async move {
        let mut conversation = conversation;
        if conversation.is_none() {
            if let Some(store) = &store {
                match store.create(&derive_title(&user_content)) {
                    Ok(id) => {
                        if tx.send(Action::ConversationCreated(id.clone())).is_err() {
                            return;
                        }
                        conversation = Some(id);
                    }
                    Err(e) => warn!("Failed to create conversation: {e}"),
                }
            }
        }
        if let (Some(store), Some(id)) = (&store, &conversation) {
            if let Err(e) = store.save_message(id, &ChatMessage::user(&user_content)) {
                warn!("Failed to persist user message to {id}: {e}");
            }
        }

        let outcome = gateway
            .complete(CompletionParams {
                messages: &messages,
                model: &model,
            })
            .await;
        if tx.send(Action::CompletionFinished(outcome)).is_err() {
            warn!("Failed to send completion result: receiver dropped");
        }
    })
    .abort_handle()
}

/// Spawns the once-per-second ticker driving the countdown.
fn spawn_ticker(tx: mpsc::Sender<Action>) -> AbortHandle {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(1));
        // The first tick fires immediately; skip it so ticks are 1s apart.
        interval.tick().await;
        loop {
            interval.tick().await;
            if tx.send(Action::TimerTick).is_err() {
                return;
            }
        }
    })
    .abort_handle()
}

/// Best-effort persistence of an assistant reply.
fn persist_reply(app: &App, content: &str) {
    if let (Some(store), Some(id)) = (&app.store, &app.current_conversation) {
        if let Err(e) = store.save_message(id, &ChatMessage::assistant(content)) {
            warn!("Failed to persist reply to {id}: {e}");
        }
    }
}

/// `/attach <path>`: extract the file's text into the input box so the user
/// can review and edit before sending.
fn handle_attach(path: &str, app: &mut App, input_box: &mut InputBox) {
    if path.is_empty() {
        app.status_message = String::from("Usage: /attach <path>");
        return;
    }
    match extract_content(Path::new(path)) {
        Ok(text) => {
            input_box.set_text(text);
            app.status_message = format!("Attached {path}");
        }
        Err(e) => {
            warn!("Attach failed for {path}: {e}");
            app.status_message = format!("Attach failed: {e}");
        }
    }
}

/// Copies the most recent finished assistant reply via OSC 52.
fn copy_last_reply(app: &mut App) {
    let reply = app
        .transcript
        .messages
        .iter()
        .rev()
        .find(|msg| msg.role == Role::Assistant && msg.content != PENDING_REPLY);
    match reply {
        Some(msg) => {
            app.status_message = match clipboard::copy_to_clipboard(&msg.content) {
                Ok(()) => String::from("Copied reply to clipboard"),
                Err(e) => format!("Copy failed: {e}"),
            };
        }
        None => {
            app.status_message = String::from("No reply to copy");
        }
    }
}
