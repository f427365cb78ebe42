//! # InputBox Component
//!
//! Text input for the chat pane: editing, cursor movement, paste, and
//! submission. The buffer is internal state; the parent decides what to do
//! with submitted text (including the `/attach <path>` command).
//!
//! Wrapping is done here, by display width, rather than delegated to
//! `Paragraph`, so the cursor's screen position always matches the
//! rendered text exactly.

use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, Paragraph};
use ratatui::Frame;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

/// Rows shown before the input starts scrolling internally.
const MAX_VISIBLE_LINES: usize = 5;
/// Top + bottom border.
const VERTICAL_OVERHEAD: u16 = 2;
/// Left + right border.
const HORIZONTAL_OVERHEAD: u16 = 2;

/// High-level events emitted by the InputBox.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// User pressed Enter; carries the drained buffer.
    Submit(String),
}

pub struct InputBox {
    pub buffer: String,
    /// Byte offset into `buffer`, always on a char boundary.
    cursor: usize,
    /// True while a completion is in flight; dims the border as a visual
    /// "send disabled" cue.
    pub dimmed: bool,
}

/// One display row: a byte range into the buffer (newlines excluded).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Row {
    start: usize,
    end: usize,
}

impl InputBox {
    pub fn new() -> Self {
        Self {
            buffer: String::new(),
            cursor: 0,
            dimmed: false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Replaces the buffer (used by `/attach` to drop extracted file text
    /// into the input for review before sending).
    pub fn set_text(&mut self, text: String) {
        self.cursor = text.len();
        self.buffer = text;
    }

    fn insert(&mut self, s: &str) {
        self.buffer.insert_str(self.cursor, s);
        self.cursor += s.len();
    }

    fn prev_boundary(&self) -> usize {
        self.buffer[..self.cursor]
            .char_indices()
            .next_back()
            .map(|(i, _)| i)
            .unwrap_or(0)
    }

    fn next_boundary(&self) -> usize {
        self.buffer[self.cursor..]
            .chars()
            .next()
            .map(|c| self.cursor + c.len_utf8())
            .unwrap_or(self.cursor)
    }

    /// Wraps the buffer into display rows for the given inner width.
    fn rows(&self, inner_width: usize) -> Vec<Row> {
        let width = inner_width.max(1);
        let mut rows = Vec::new();
        let mut offset = 0;
        for line in self.buffer.split('\n') {
            let mut start = offset;
            let mut row_width = 0;
            for (i, ch) in line.char_indices() {
                let char_width = UnicodeWidthChar::width(ch).unwrap_or(0);
                if row_width + char_width > width && row_width > 0 {
                    rows.push(Row {
                        start,
                        end: offset + i,
                    });
                    start = offset + i;
                    row_width = 0;
                }
                row_width += char_width;
            }
            rows.push(Row {
                start,
                end: offset + line.len(),
            });
            offset += line.len() + 1; // skip the '\n'
        }
        rows
    }

    /// Row index and column (display width) of the cursor.
    fn cursor_position(&self, rows: &[Row]) -> (usize, u16) {
        for (idx, row) in rows.iter().enumerate() {
            let is_last = idx == rows.len() - 1;
            if self.cursor < row.end || (self.cursor == row.end && is_last)
                || (self.cursor == row.end && self.cursor < self.buffer.len()
                    && self.buffer.as_bytes()[self.cursor] == b'\n')
            {
                let col = self.buffer[row.start..self.cursor].width() as u16;
                return (idx, col);
            }
        }
        (rows.len().saturating_sub(1), 0)
    }

    /// Height needed for the current buffer, clamped to the visible window.
    pub fn calculate_height(&self, area_width: u16) -> u16 {
        let inner = area_width.saturating_sub(HORIZONTAL_OVERHEAD).max(1) as usize;
        let lines = self.rows(inner).len().clamp(1, MAX_VISIBLE_LINES);
        lines as u16 + VERTICAL_OVERHEAD
    }
}

impl Default for InputBox {
    fn default() -> Self {
        Self::new()
    }
}

impl EventHandler for InputBox {
    type Event = InputEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<InputEvent> {
        match event {
            TuiEvent::InputChar(c) => {
                let mut tmp = [0u8; 4];
                self.insert(c.encode_utf8(&mut tmp));
                None
            }
            TuiEvent::Paste(data) => {
                self.insert(data);
                None
            }
            TuiEvent::Backspace => {
                if self.cursor > 0 {
                    let prev = self.prev_boundary();
                    self.buffer.replace_range(prev..self.cursor, "");
                    self.cursor = prev;
                }
                None
            }
            TuiEvent::Delete => {
                if self.cursor < self.buffer.len() {
                    let next = self.next_boundary();
                    self.buffer.replace_range(self.cursor..next, "");
                }
                None
            }
            TuiEvent::CursorLeft => {
                self.cursor = self.prev_boundary();
                None
            }
            TuiEvent::CursorRight => {
                self.cursor = self.next_boundary();
                None
            }
            TuiEvent::Home => {
                self.cursor = 0;
                None
            }
            TuiEvent::End => {
                self.cursor = self.buffer.len();
                None
            }
            TuiEvent::Submit => {
                let text = std::mem::take(&mut self.buffer);
                self.cursor = 0;
                Some(InputEvent::Submit(text))
            }
            _ => None,
        }
    }
}

impl Component for InputBox {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let inner = area.width.saturating_sub(HORIZONTAL_OVERHEAD).max(1) as usize;
        let rows = self.rows(inner);
        let (cursor_row, cursor_col) = self.cursor_position(&rows);

        // Scroll so the cursor row is always visible.
        let visible = MAX_VISIBLE_LINES.min(area.height.saturating_sub(VERTICAL_OVERHEAD) as usize)
            .max(1);
        let scroll = cursor_row.saturating_sub(visible - 1);

        let text = rows
            .iter()
            .skip(scroll)
            .take(visible)
            .map(|row| &self.buffer[row.start..row.end])
            .collect::<Vec<_>>()
            .join("\n");

        let border_style = if self.dimmed {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default().fg(Color::Green)
        };
        let block = Block::bordered()
            .border_type(ratatui::widgets::BorderType::Rounded)
            .border_style(border_style)
            .title("Input");

        frame.render_widget(Paragraph::new(text).block(block), area);

        frame.set_cursor_position((
            area.x + 1 + cursor_col,
            area.y + 1 + (cursor_row - scroll) as u16,
        ));
    }
}
