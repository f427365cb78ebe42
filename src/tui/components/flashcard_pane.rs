//! # Flashcard Pane
//!
//! Browse the deck, toggle a card between "need to learn" and
//! "already know", and interleave the deck with `b`. The selected card's
//! answer is shown in a detail box below the list.

use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Frame;

use crate::study::flashcards::{CardStatus, Deck};
use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

/// Events the pane emits for the reducer to act on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlashcardEvent {
    ToggleStatus { index: usize },
    Balance,
}

/// Persistent selection state; lives in `TuiState`.
pub struct FlashcardPaneState {
    pub selected: usize,
    list_state: ListState,
}

impl FlashcardPaneState {
    pub fn new() -> Self {
        Self {
            selected: 0,
            list_state: ListState::default(),
        }
    }

    /// Keeps the selection valid after the deck changes size.
    pub fn clamp_to(&mut self, deck_len: usize) {
        if deck_len == 0 {
            self.selected = 0;
        } else if self.selected >= deck_len {
            self.selected = deck_len - 1;
        }
    }
}

impl Default for FlashcardPaneState {
    fn default() -> Self {
        Self::new()
    }
}

pub struct FlashcardPane<'a> {
    deck: &'a Deck,
    state: &'a mut FlashcardPaneState,
}

impl<'a> FlashcardPane<'a> {
    pub fn new(deck: &'a Deck, state: &'a mut FlashcardPaneState) -> Self {
        state.clamp_to(deck.cards.len());
        Self { deck, state }
    }

    pub fn handle_event(&mut self, event: &TuiEvent) -> Option<FlashcardEvent> {
        match event {
            TuiEvent::CursorUp | TuiEvent::ScrollUp => {
                self.state.selected = self.state.selected.saturating_sub(1);
                None
            }
            TuiEvent::CursorDown | TuiEvent::ScrollDown => {
                if !self.deck.cards.is_empty() {
                    self.state.selected = (self.state.selected + 1).min(self.deck.cards.len() - 1);
                }
                None
            }
            TuiEvent::Submit | TuiEvent::InputChar(' ') => {
                if self.deck.cards.is_empty() {
                    None
                } else {
                    Some(FlashcardEvent::ToggleStatus {
                        index: self.state.selected,
                    })
                }
            }
            TuiEvent::InputChar('b') => Some(FlashcardEvent::Balance),
            _ => None,
        }
    }
}

fn status_style(status: CardStatus) -> Style {
    match status {
        CardStatus::NeedToLearn => Style::default().fg(Color::Yellow),
        CardStatus::AlreadyKnow => Style::default().fg(Color::Green),
    }
}

impl Component for FlashcardPane<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let [list_area, detail_area, help_area] = Layout::vertical([
            Constraint::Min(3),
            Constraint::Length(6),
            Constraint::Length(1),
        ])
        .areas(area);

        let items: Vec<ListItem> = self
            .deck
            .cards
            .iter()
            .map(|card| {
                ListItem::new(Line::from(vec![
                    Span::styled(
                        format!("[{}] ", card.status.label()),
                        status_style(card.status),
                    ),
                    Span::raw(card.question.clone()),
                ]))
            })
            .collect();

        let list = List::new(items)
            .block(
                Block::bordered()
                    .border_type(BorderType::Rounded)
                    .title("Flashcards"),
            )
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");

        self.state.list_state.select(if self.deck.cards.is_empty() {
            None
        } else {
            Some(self.state.selected)
        });
        frame.render_stateful_widget(list, list_area, &mut self.state.list_state);

        let answer = self
            .deck
            .cards
            .get(self.state.selected)
            .map(|card| card.answer.as_str())
            .unwrap_or("");
        let detail = Paragraph::new(answer).wrap(Wrap { trim: false }).block(
            Block::bordered()
                .border_type(BorderType::Rounded)
                .title("Answer"),
        );
        frame.render_widget(detail, detail_area);

        let help = Paragraph::new("↑/↓ select  Space toggle status  b balance deck")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(help, help_area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_navigation_clamps_at_edges() {
        let deck = Deck::starter();
        let mut state = FlashcardPaneState::new();
        let mut pane = FlashcardPane::new(&deck, &mut state);

        pane.handle_event(&TuiEvent::CursorUp);
        assert_eq!(pane.state.selected, 0);

        for _ in 0..100 {
            pane.handle_event(&TuiEvent::CursorDown);
        }
        assert_eq!(pane.state.selected, deck.cards.len() - 1);
    }

    #[test]
    fn test_space_emits_toggle_for_selected_card() {
        let deck = Deck::starter();
        let mut state = FlashcardPaneState::new();
        let mut pane = FlashcardPane::new(&deck, &mut state);

        pane.handle_event(&TuiEvent::CursorDown);
        let event = pane.handle_event(&TuiEvent::InputChar(' '));
        assert_eq!(event, Some(FlashcardEvent::ToggleStatus { index: 1 }));
    }

    #[test]
    fn test_b_emits_balance() {
        let deck = Deck::starter();
        let mut state = FlashcardPaneState::new();
        let mut pane = FlashcardPane::new(&deck, &mut state);
        assert_eq!(
            pane.handle_event(&TuiEvent::InputChar('b')),
            Some(FlashcardEvent::Balance)
        );
    }

    #[test]
    fn test_selection_clamped_after_deck_shrinks() {
        let deck = Deck::starter();
        let mut state = FlashcardPaneState::new();
        state.selected = 100;
        let pane = FlashcardPane::new(&deck, &mut state);
        assert_eq!(pane.state.selected, deck.cards.len() - 1);
    }
}
