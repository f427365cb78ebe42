//! # MessageList Component
//!
//! Scrollable view over the transcript, built on `tui-scrollview`. Persistent
//! state (`MessageListState`) lives in `TuiState`; a transient `MessageList`
//! wrapper borrows it plus the transcript each frame.

use ratatui::layout::{Position, Rect, Size};
use ratatui::style::{Color, Style};
use ratatui::text::Line;
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};

use crate::gateway::Transcript;
use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

use super::message::Message;

/// Vertical gap between bubbles.
const MESSAGE_SPACING: u16 = 1;

/// Scroll state for the message list. Must be persisted in the parent
/// `TuiState`; the `MessageList` wrapper is rebuilt each frame.
pub struct MessageListState {
    pub scroll: ScrollViewState,
    /// When true the view follows new content; any manual scroll up releases
    /// it and scrolling back to the end re-engages it.
    pub stick_to_bottom: bool,
    /// Animation counter for the pending indicator.
    pub tick: usize,
    /// Last known viewport height, for page scrolling and repinning.
    viewport_height: u16,
    /// Total content height from the last render.
    content_height: u16,
}

impl MessageListState {
    pub fn new() -> Self {
        Self {
            scroll: ScrollViewState::default(),
            stick_to_bottom: true,
            tick: 0,
            viewport_height: 0,
            content_height: 0,
        }
    }

    pub fn advance_tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);
    }

    /// Re-engage follow mode when a scroll-down lands at the end.
    fn repin_if_at_bottom(&mut self) {
        let max_y = self.content_height.saturating_sub(self.viewport_height);
        let current = self.scroll.offset();
        if current.y >= max_y {
            self.stick_to_bottom = true;
            self.scroll.set_offset(Position { x: current.x, y: max_y });
        }
    }
}

impl Default for MessageListState {
    fn default() -> Self {
        Self::new()
    }
}

/// Scroll events are handled on the state rather than the transient wrapper
/// so they work outside the render pass.
impl EventHandler for MessageListState {
    type Event = ();

    fn handle_event(&mut self, event: &TuiEvent) -> Option<()> {
        match event {
            TuiEvent::ScrollUp | TuiEvent::CursorUp => {
                self.scroll.scroll_up();
                self.stick_to_bottom = false;
            }
            TuiEvent::ScrollDown | TuiEvent::CursorDown => {
                self.scroll.scroll_down();
                self.repin_if_at_bottom();
            }
            TuiEvent::ScrollPageUp => {
                self.scroll.scroll_page_up();
                self.stick_to_bottom = false;
            }
            TuiEvent::ScrollPageDown => {
                self.scroll.scroll_page_down();
                self.repin_if_at_bottom();
            }
            _ => return None,
        }
        Some(())
    }
}

pub struct MessageList<'a> {
    transcript: &'a Transcript,
    state: &'a mut MessageListState,
}

impl<'a> MessageList<'a> {
    pub fn new(transcript: &'a Transcript, state: &'a mut MessageListState) -> Self {
        Self { transcript, state }
    }

    fn render_empty_hint(frame: &mut Frame, area: Rect) {
        let hint = Paragraph::new(vec![
            Line::from(""),
            Line::from("Start a conversation, or try:"),
            Line::from(""),
            Line::from("/attach <path>   pull a txt, pdf, or docx file into the input"),
            Line::from("Tab              switch panes (cards, quiz, timer)"),
            Line::from("Ctrl+O           browse saved conversations"),
        ])
        .style(Style::default().fg(Color::DarkGray))
        .alignment(ratatui::layout::Alignment::Center);
        frame.render_widget(hint, area);
    }
}

impl Component for MessageList<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        if self.transcript.is_empty() {
            Self::render_empty_hint(frame, area);
            return;
        }

        // Scrollbar takes a column off the content width.
        let content_width = area.width.saturating_sub(1);
        let heights: Vec<u16> = self
            .transcript
            .messages
            .iter()
            .map(|msg| Message::new(msg, self.state.tick).calculate_height(content_width))
            .collect();
        let total: u16 = heights
            .iter()
            .map(|h| h + MESSAGE_SPACING)
            .sum::<u16>()
            .saturating_sub(MESSAGE_SPACING);

        self.state.viewport_height = area.height;
        self.state.content_height = total;

        let mut scroll_view = ScrollView::new(Size::new(content_width, total))
            .vertical_scrollbar_visibility(ScrollbarVisibility::Automatic)
            .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);

        let mut y = 0;
        for (msg, height) in self.transcript.messages.iter().zip(&heights) {
            let slot = Rect::new(0, y, content_width, *height);
            scroll_view.render_widget(Message::new(msg, self.state.tick), slot);
            y += height + MESSAGE_SPACING;
        }

        if self.state.stick_to_bottom {
            self.state.scroll.scroll_to_bottom();
        }

        frame.render_stateful_widget(scroll_view, area, &mut self.state.scroll);
    }
}
