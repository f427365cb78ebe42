//! # Message Component
//!
//! Renders a single chat message as a bubble. User messages are
//! right-aligned, assistant messages left-aligned. While a reply is in
//! flight the assistant bubble shows an animated pending indicator in
//! place of text.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, BorderType, Padding, Paragraph, Widget, Wrap};
use ratatui::Frame;

use crate::gateway::{ChatMessage, Role, PENDING_REPLY};
use crate::tui::component::Component;

/// Bubble chrome: border plus one column of padding on each side.
const HORIZONTAL_OVERHEAD: u16 = 4;
/// Top and bottom border.
const VERTICAL_OVERHEAD: u16 = 2;
/// Bubbles take at most this fraction of the list width, like a phone chat.
const WIDTH_RATIO: u16 = 80;

/// Spinner frames for the pending indicator, advanced once per redraw tick.
const PENDING_FRAMES: [&str; 4] = ["Thinking", "Thinking.", "Thinking..", "Thinking..."];

/// Transient render wrapper: build one per message per frame.
#[derive(Clone, Copy)]
pub struct Message<'a> {
    message: &'a ChatMessage,
    /// Animation counter owned by the message list.
    tick: usize,
}

impl<'a> Message<'a> {
    pub fn new(message: &'a ChatMessage, tick: usize) -> Self {
        Self { message, tick }
    }

    fn is_pending(&self) -> bool {
        self.message.role == Role::Assistant && self.message.content == PENDING_REPLY
    }

    fn display_text(&self) -> &str {
        if self.is_pending() {
            PENDING_FRAMES[self.tick % PENDING_FRAMES.len()]
        } else {
            &self.message.content
        }
    }

    fn bubble_width(list_width: u16) -> u16 {
        // Widened multiply: u16 math overflows past 819 columns.
        let width = (u32::from(list_width) * u32::from(WIDTH_RATIO) / 100) as u16;
        width.max(HORIZONTAL_OVERHEAD + 1)
    }

    /// Height this message needs at the given list width, borders included.
    pub fn calculate_height(&self, list_width: u16) -> u16 {
        let inner = Self::bubble_width(list_width)
            .saturating_sub(HORIZONTAL_OVERHEAD)
            .max(1) as usize;
        let lines: usize = self
            .display_text()
            .split('\n')
            .map(|line| textwrap::wrap(line, inner).len().max(1))
            .sum();
        lines as u16 + VERTICAL_OVERHEAD
    }

    fn label(&self) -> &'static str {
        match self.message.role {
            Role::User => "you",
            Role::Assistant => "quill",
            Role::System => "system",
        }
    }

    fn accent(&self) -> Color {
        match self.message.role {
            Role::User => Color::Cyan,
            Role::Assistant => Color::Green,
            Role::System => Color::DarkGray,
        }
    }
}

impl Widget for Message<'_> {
    fn render(self, area: Rect, buf: &mut ratatui::buffer::Buffer) {
        let width = Self::bubble_width(area.width).min(area.width);
        let bubble = if self.message.role == Role::User {
            Rect {
                x: area.x + area.width.saturating_sub(width),
                width,
                ..area
            }
        } else {
            Rect { width, ..area }
        };

        let style = if self.is_pending() {
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC)
        } else {
            Style::default()
        };

        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(self.accent()))
            .title(self.label())
            .padding(Padding::horizontal(1));

        let inner = block.inner(bubble);
        block.render(bubble, buf);

        Paragraph::new(self.display_text())
            .style(style)
            .wrap(Wrap { trim: false })
            .render(inner, buf);
    }
}

impl Component for Message<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        frame.render_widget(*self, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_line_height() {
        let msg = ChatMessage::user("hi");
        let height = Message::new(&msg, 0).calculate_height(80);
        assert_eq!(height, 1 + VERTICAL_OVERHEAD);
    }

    #[test]
    fn test_long_text_wraps_to_multiple_lines() {
        let msg = ChatMessage::assistant("word ".repeat(50));
        let height = Message::new(&msg, 0).calculate_height(40);
        assert!(height > 1 + VERTICAL_OVERHEAD);
    }

    #[test]
    fn test_explicit_newlines_counted() {
        let msg = ChatMessage::user("a\nb\nc");
        let height = Message::new(&msg, 0).calculate_height(80);
        assert_eq!(height, 3 + VERTICAL_OVERHEAD);
    }

    #[test]
    fn test_bubble_width_on_very_wide_terminals() {
        assert_eq!(Message::bubble_width(1000), 800);
        assert_eq!(Message::bubble_width(u16::MAX), 52_428);

        let msg = ChatMessage::user("hi");
        assert_eq!(
            Message::new(&msg, 0).calculate_height(u16::MAX),
            1 + VERTICAL_OVERHEAD
        );
    }

    #[test]
    fn test_pending_indicator_cycles() {
        let msg = ChatMessage::assistant(PENDING_REPLY);
        let first = Message::new(&msg, 0).display_text().to_string();
        let second = Message::new(&msg, 1).display_text().to_string();
        assert_ne!(first, second);
        assert!(first.starts_with("Thinking"));
    }

    #[test]
    fn test_pending_only_applies_to_assistant() {
        let msg = ChatMessage::user(PENDING_REPLY);
        assert_eq!(Message::new(&msg, 0).display_text(), PENDING_REPLY);
    }
}
