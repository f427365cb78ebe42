//! # Pomodoro Pane
//!
//! Renders the countdown and maps `s`/`p`/`r` to timer actions. The state
//! machine itself lives in core; ticking is driven by a spawned task while
//! the timer runs.

use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Gauge, Paragraph};
use ratatui::Frame;

use crate::study::pomodoro::{format_clock, Phase, Pomodoro};
use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PomodoroEvent {
    Start,
    Pause,
    Reset,
}

/// Key handling is stateless; a unit struct keeps the EventHandler shape
/// consistent with the other panes.
pub struct PomodoroKeys;

impl EventHandler for PomodoroKeys {
    type Event = PomodoroEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<PomodoroEvent> {
        match event {
            TuiEvent::InputChar('s') | TuiEvent::Submit => Some(PomodoroEvent::Start),
            TuiEvent::InputChar('p') => Some(PomodoroEvent::Pause),
            TuiEvent::InputChar('r') => Some(PomodoroEvent::Reset),
            _ => None,
        }
    }
}

pub struct PomodoroPane<'a> {
    timer: &'a Pomodoro,
}

impl<'a> PomodoroPane<'a> {
    pub fn new(timer: &'a Pomodoro) -> Self {
        Self { timer }
    }

    fn phase_label(&self) -> (&'static str, Color) {
        match self.timer.phase {
            Phase::Idle => ("idle", Color::DarkGray),
            Phase::Running => ("focus", Color::Green),
            Phase::Paused if self.timer.remaining == 0 => ("done", Color::Yellow),
            Phase::Paused => ("paused", Color::Yellow),
        }
    }
}

impl Component for PomodoroPane<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .title("Pomodoro");
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let [_, clock_area, phase_area, gauge_area, _, help_area] = Layout::vertical([
            Constraint::Fill(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Fill(1),
            Constraint::Length(1),
        ])
        .areas(inner);

        let (label, color) = self.phase_label();

        let clock = Paragraph::new(Line::from(Span::styled(
            format_clock(self.timer.remaining),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center);
        frame.render_widget(clock, clock_area);

        let phase = Paragraph::new(Span::styled(label, Style::default().fg(color)))
            .alignment(Alignment::Center);
        frame.render_widget(phase, phase_area);

        let duration = self.timer.duration().max(1);
        let elapsed = duration - self.timer.remaining.min(duration);
        let gauge = Gauge::default()
            .gauge_style(Style::default().fg(color))
            .ratio(f64::from(elapsed) / f64::from(duration))
            .label("");
        let gauge_area = centered_horizontal(gauge_area, 30);
        frame.render_widget(gauge, gauge_area);

        let help = Paragraph::new("s start  p pause  r reset")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center);
        frame.render_widget(help, help_area);
    }
}

fn centered_horizontal(area: Rect, width: u16) -> Rect {
    let width = width.min(area.width);
    Rect {
        x: area.x + (area.width - width) / 2,
        width,
        ..area
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_mapping() {
        let mut keys = PomodoroKeys;
        assert_eq!(
            keys.handle_event(&TuiEvent::InputChar('s')),
            Some(PomodoroEvent::Start)
        );
        assert_eq!(
            keys.handle_event(&TuiEvent::InputChar('p')),
            Some(PomodoroEvent::Pause)
        );
        assert_eq!(
            keys.handle_event(&TuiEvent::InputChar('r')),
            Some(PomodoroEvent::Reset)
        );
        assert_eq!(keys.handle_event(&TuiEvent::InputChar('x')), None);
    }

    #[test]
    fn test_phase_labels() {
        let mut timer = Pomodoro::new(2);
        assert_eq!(PomodoroPane::new(&timer).phase_label().0, "idle");

        timer.start();
        assert_eq!(PomodoroPane::new(&timer).phase_label().0, "focus");

        timer.pause();
        assert_eq!(PomodoroPane::new(&timer).phase_label().0, "paused");

        timer.start();
        timer.tick();
        timer.tick();
        assert_eq!(PomodoroPane::new(&timer).phase_label().0, "done");
    }
}
