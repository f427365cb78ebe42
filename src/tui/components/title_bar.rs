//! # TitleBar Component
//!
//! Single-line header showing the pane tabs, the active model, and the
//! current status message. Purely presentational: all data arrives as
//! props and nothing is stored between frames.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::Frame;

use crate::tui::component::Component;
use crate::tui::Pane;

pub struct TitleBar {
    pub model_name: String,
    pub status_message: String,
    pub active_pane: Pane,
}

impl TitleBar {
    pub fn new(model_name: String, status_message: String, active_pane: Pane) -> Self {
        Self {
            model_name,
            status_message,
            active_pane,
        }
    }
}

impl Component for TitleBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let mut spans = Vec::new();
        for pane in Pane::ALL {
            let style = if pane == self.active_pane {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Green)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            spans.push(Span::styled(format!(" {} ", pane.label()), style));
            spans.push(Span::raw(" "));
        }

        spans.push(Span::styled(
            format!("({})", self.model_name),
            Style::default().fg(Color::DarkGray),
        ));
        if !self.status_message.is_empty() {
            spans.push(Span::raw(" | "));
            spans.push(Span::raw(self.status_message.clone()));
        }

        frame.render_widget(Line::from(spans), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn render_to_text(title_bar: &mut TitleBar) -> String {
        let backend = TestBackend::new(100, 1);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|f| {
                title_bar.render(f, f.area());
            })
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_shows_all_pane_labels_and_model() {
        let mut title_bar = TitleBar::new(
            "openai/gpt-4o-mini".to_string(),
            String::new(),
            Pane::Chat,
        );
        let text = render_to_text(&mut title_bar);
        assert!(text.contains("Chat"));
        assert!(text.contains("Cards"));
        assert!(text.contains("Quiz"));
        assert!(text.contains("Timer"));
        assert!(text.contains("openai/gpt-4o-mini"));
        assert!(!text.contains('|'));
    }

    #[test]
    fn test_status_message_appended_when_present() {
        let mut title_bar = TitleBar::new(
            "test-model".to_string(),
            "Generating reply...".to_string(),
            Pane::Chat,
        );
        let text = render_to_text(&mut title_bar);
        assert!(text.contains("Generating reply..."));
        assert!(text.contains('|'));
    }
}
