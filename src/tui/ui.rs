//! Top-level frame layout.
//!
//! One line of title bar, then the active pane. The chat pane splits its
//! area between the message list and a grow-to-fit input box; the other
//! panes take the whole body. The conversation manager overlay draws last,
//! on top of everything.

use ratatui::layout::{Constraint, Layout};
use ratatui::Frame;

use crate::core::state::App;
use crate::tui::component::Component;
use crate::tui::components::{
    ConversationManager, FlashcardPane, MessageList, PomodoroPane, QuizPane, TitleBar,
};
use crate::tui::{Pane, TuiState};

pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState) {
    use Constraint::{Length, Min};

    let [title_area, body_area] = Layout::vertical([Length(1), Min(0)]).areas(frame.area());

    TitleBar::new(
        app.model_name.clone(),
        app.status_message.clone(),
        tui.active_pane,
    )
    .render(frame, title_area);

    match tui.active_pane {
        Pane::Chat => {
            let input_height = tui.input_box.calculate_height(body_area.width);
            let [list_area, input_area] =
                Layout::vertical([Min(1), Length(input_height)]).areas(body_area);
            MessageList::new(&app.transcript, &mut tui.message_list).render(frame, list_area);
            tui.input_box.render(frame, input_area);
        }
        Pane::Cards => {
            FlashcardPane::new(&app.deck, &mut tui.flashcards).render(frame, body_area);
        }
        Pane::Quiz => {
            QuizPane::new(&mut tui.quiz).render(frame, body_area);
        }
        Pane::Timer => {
            PomodoroPane::new(&app.pomodoro).render(frame, body_area);
        }
    }

    if let Some(ref mut manager) = tui.conversation_manager {
        ConversationManager::new(manager).render(frame, frame.area());
    }
}
