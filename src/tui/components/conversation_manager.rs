//! # Conversation Manager Component
//!
//! Centered overlay for browsing, loading, and deleting saved conversations.
//! Opened with Ctrl+O, dismissed with Esc. Deleting asks for a second `d` to
//! confirm; `D` clears the whole history, also with confirmation.
//!
//! Follows the persistent state + transient wrapper pattern:
//! - `ConversationManagerState` lives in `TuiState`
//! - `ConversationManager` is created each frame with borrowed state

use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Padding, Paragraph};
use ratatui::Frame;

use crate::core::conversation::ConversationMeta;
use crate::tui::event::TuiEvent;

/// Events emitted by the conversation manager.
pub enum ConversationEvent {
    Load(String),
    CreateNew,
    Delete(String),
    DeleteAll,
    Dismiss,
}

/// What the next `d`/`D` press would destroy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PendingDelete {
    None,
    One,
    All,
}

/// Persistent state for the overlay.
pub struct ConversationManagerState {
    pub conversations: Vec<ConversationMeta>,
    pub selected: usize,
    pub list_state: ListState,
    pending_delete: PendingDelete,
}

impl ConversationManagerState {
    pub fn new(conversations: Vec<ConversationMeta>) -> Self {
        let mut list_state = ListState::default();
        if !conversations.is_empty() {
            list_state.select(Some(0));
        }
        Self {
            conversations,
            selected: 0,
            list_state,
            pending_delete: PendingDelete::None,
        }
    }

    pub fn handle_event(&mut self, event: &TuiEvent) -> Option<ConversationEvent> {
        // Any key other than a repeat of the same delete key cancels the
        // pending confirmation.
        let repeat = match event {
            TuiEvent::InputChar('d') => self.pending_delete == PendingDelete::One,
            TuiEvent::InputChar('D') => self.pending_delete == PendingDelete::All,
            _ => false,
        };
        if !repeat {
            self.pending_delete = PendingDelete::None;
        }

        match event {
            TuiEvent::Escape => Some(ConversationEvent::Dismiss),
            TuiEvent::CursorUp | TuiEvent::ScrollUp => {
                if !self.conversations.is_empty() {
                    self.selected = self.selected.saturating_sub(1);
                    self.list_state.select(Some(self.selected));
                }
                None
            }
            TuiEvent::CursorDown | TuiEvent::ScrollDown => {
                if !self.conversations.is_empty() {
                    self.selected = (self.selected + 1).min(self.conversations.len() - 1);
                    self.list_state.select(Some(self.selected));
                }
                None
            }
            TuiEvent::Submit => self
                .conversations
                .get(self.selected)
                .map(|meta| ConversationEvent::Load(meta.id.clone())),
            TuiEvent::InputChar('n') => Some(ConversationEvent::CreateNew),
            TuiEvent::InputChar('d') => {
                if self.conversations.is_empty() {
                    return None;
                }
                if repeat {
                    self.pending_delete = PendingDelete::None;
                    Some(ConversationEvent::Delete(
                        self.conversations[self.selected].id.clone(),
                    ))
                } else {
                    self.pending_delete = PendingDelete::One;
                    None
                }
            }
            TuiEvent::InputChar('D') => {
                if self.conversations.is_empty() {
                    return None;
                }
                if repeat {
                    self.pending_delete = PendingDelete::None;
                    Some(ConversationEvent::DeleteAll)
                } else {
                    self.pending_delete = PendingDelete::All;
                    None
                }
            }
            _ => None,
        }
    }

    /// Drops a conversation from the local list after deletion on disk.
    pub fn remove(&mut self, id: &str) {
        self.conversations.retain(|meta| meta.id != id);
        if self.conversations.is_empty() {
            self.selected = 0;
            self.list_state.select(None);
        } else {
            self.selected = self.selected.min(self.conversations.len() - 1);
            self.list_state.select(Some(self.selected));
        }
    }

    pub fn clear(&mut self) {
        self.conversations.clear();
        self.selected = 0;
        self.list_state.select(None);
    }
}

/// Transient render wrapper for the overlay.
pub struct ConversationManager<'a> {
    state: &'a mut ConversationManagerState,
}

impl<'a> ConversationManager<'a> {
    pub fn new(state: &'a mut ConversationManagerState) -> Self {
        Self { state }
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect) {
        let overlay = centered_rect(80, 70, area);
        frame.render_widget(Clear, overlay);

        let help_text = match self.state.pending_delete {
            PendingDelete::One => " Press d again to confirm delete | Esc Cancel ",
            PendingDelete::All => " Press D again to delete ALL | Esc Cancel ",
            PendingDelete::None => " n New  d Delete  D Delete all  Enter Open  Esc Back ",
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" Conversations ")
            .title_alignment(Alignment::Left)
            .title_bottom(Line::from(help_text).centered())
            .padding(Padding::horizontal(1));

        if self.state.conversations.is_empty() {
            let empty = Paragraph::new("No saved conversations.")
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center)
                .block(block);
            frame.render_widget(empty, overlay);
            return;
        }

        let items: Vec<ListItem> = self
            .state
            .conversations
            .iter()
            .enumerate()
            .map(|(i, meta)| {
                let date = format_timestamp(meta.updated_at);
                let count = format!("{} msgs", meta.message_count);

                // Layout: "  Jan 15  <title>   12 msgs  "
                let inner_width = overlay.width.saturating_sub(4) as usize;
                let fixed_width = date.len() + 2 + count.len() + 2;
                let title_width = inner_width.saturating_sub(fixed_width);
                let title = truncate_str(&meta.title, title_width);
                let padded_title = format!("{:<width$}", title, width = title_width);

                let style = if i == self.state.selected {
                    if self.state.pending_delete != PendingDelete::None {
                        Style::default()
                            .fg(Color::Red)
                            .add_modifier(Modifier::BOLD | Modifier::REVERSED)
                    } else {
                        Style::default()
                            .fg(Color::White)
                            .add_modifier(Modifier::BOLD | Modifier::REVERSED)
                    }
                } else {
                    Style::default().fg(Color::Gray)
                };

                ListItem::new(Line::from(vec![
                    Span::styled(date, style),
                    Span::styled("  ", style),
                    Span::styled(padded_title, style),
                    Span::styled("  ", style),
                    Span::styled(count, style),
                ]))
            })
            .collect();

        let list = List::new(items).block(block);
        frame.render_stateful_widget(list, overlay, &mut self.state.list_state);
    }
}

/// Formats a Unix timestamp as "Jan 15" style date.
fn format_timestamp(ts: i64) -> String {
    use chrono::{DateTime, Local, Utc};
    let dt: DateTime<Local> = DateTime::<Utc>::from_timestamp(ts, 0)
        .unwrap_or_default()
        .with_timezone(&Local);
    dt.format("%b %d").to_string()
}

/// Truncates to `max_width` chars with a "..." suffix when cut.
fn truncate_str(s: &str, max_width: usize) -> String {
    if s.chars().count() <= max_width {
        s.to_string()
    } else if max_width <= 3 {
        ".".repeat(max_width)
    } else {
        let cut: String = s.chars().take(max_width - 3).collect();
        format!("{cut}...")
    }
}

/// Computes a centered rect as a percentage of the outer rect.
fn centered_rect(percent_x: u16, percent_y: u16, outer: Rect) -> Rect {
    let [_, center_v, _] = Layout::vertical([
        Constraint::Percentage((100 - percent_y) / 2),
        Constraint::Percentage(percent_y),
        Constraint::Percentage((100 - percent_y) / 2),
    ])
    .areas(outer);
    let [_, center, _] = Layout::horizontal([
        Constraint::Percentage((100 - percent_x) / 2),
        Constraint::Percentage(percent_x),
        Constraint::Percentage((100 - percent_x) / 2),
    ])
    .areas(center_v);
    center
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(id: &str, title: &str) -> ConversationMeta {
        ConversationMeta {
            id: id.to_string(),
            title: title.to_string(),
            created_at: 0,
            updated_at: 0,
            message_count: 2,
        }
    }

    #[test]
    fn test_enter_loads_selected() {
        let mut state = ConversationManagerState::new(vec![meta("a", "first"), meta("b", "second")]);
        state.handle_event(&TuiEvent::CursorDown);
        let event = state.handle_event(&TuiEvent::Submit);
        assert!(matches!(event, Some(ConversationEvent::Load(id)) if id == "b"));
    }

    #[test]
    fn test_delete_requires_confirmation() {
        let mut state = ConversationManagerState::new(vec![meta("a", "first")]);
        assert!(state.handle_event(&TuiEvent::InputChar('d')).is_none());
        let event = state.handle_event(&TuiEvent::InputChar('d'));
        assert!(matches!(event, Some(ConversationEvent::Delete(id)) if id == "a"));
    }

    #[test]
    fn test_other_key_cancels_pending_delete() {
        let mut state = ConversationManagerState::new(vec![meta("a", "first")]);
        state.handle_event(&TuiEvent::InputChar('d'));
        state.handle_event(&TuiEvent::CursorUp);
        // Needs two presses again.
        assert!(state.handle_event(&TuiEvent::InputChar('d')).is_none());
    }

    #[test]
    fn test_delete_all_requires_its_own_confirmation() {
        let mut state = ConversationManagerState::new(vec![meta("a", "first")]);
        assert!(state.handle_event(&TuiEvent::InputChar('D')).is_none());
        // A lowercase d does not confirm the uppercase prompt.
        assert!(state.handle_event(&TuiEvent::InputChar('d')).is_none());
        assert!(state.handle_event(&TuiEvent::InputChar('D')).is_none());
        let event = state.handle_event(&TuiEvent::InputChar('D'));
        assert!(matches!(event, Some(ConversationEvent::DeleteAll)));
    }

    #[test]
    fn test_remove_clamps_selection() {
        let mut state = ConversationManagerState::new(vec![meta("a", "first"), meta("b", "second")]);
        state.handle_event(&TuiEvent::CursorDown);
        state.remove("b");
        assert_eq!(state.selected, 0);
        state.remove("a");
        assert_eq!(state.list_state.selected(), None);
    }

    #[test]
    fn test_escape_dismisses() {
        let mut state = ConversationManagerState::new(vec![]);
        assert!(matches!(
            state.handle_event(&TuiEvent::Escape),
            Some(ConversationEvent::Dismiss)
        ));
    }
}
