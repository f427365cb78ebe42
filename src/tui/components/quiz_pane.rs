//! # Quiz Pane
//!
//! Multiple-choice quiz generated from the flashcard deck. Quiz progress is
//! pane-local: regenerating with `g` draws fresh option sets from the deck,
//! answering with `1`-`4` locks in a choice and reveals the correct option,
//! `n` advances.

use rand::Rng;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Paragraph, Wrap};
use ratatui::Frame;

use crate::study::flashcards::Deck;
use crate::study::quiz::{generate_quiz, QuizQuestion};
use crate::tui::component::Component;
use crate::tui::event::TuiEvent;

/// Quiz progress; lives in `TuiState`.
pub struct QuizPaneState {
    pub questions: Vec<QuizQuestion>,
    pub current: usize,
    /// The option the user picked for the current question, once locked in.
    pub picked: Option<usize>,
    pub score: usize,
    pub answered: usize,
}

impl QuizPaneState {
    pub fn new() -> Self {
        Self {
            questions: Vec::new(),
            current: 0,
            picked: None,
            score: 0,
            answered: 0,
        }
    }

    pub fn regenerate<R: Rng>(&mut self, deck: &Deck, rng: &mut R) {
        self.questions = generate_quiz(&deck.cards, rng);
        self.current = 0;
        self.picked = None;
        self.score = 0;
        self.answered = 0;
    }

    fn pick(&mut self, option: usize) {
        if self.picked.is_some() {
            return;
        }
        let Some(question) = self.questions.get(self.current) else {
            return;
        };
        if option >= question.options.len() {
            return;
        }
        self.picked = Some(option);
        self.answered += 1;
        if question.is_correct(option) {
            self.score += 1;
        }
    }

    fn advance(&mut self) {
        if self.picked.is_some() && self.current + 1 < self.questions.len() {
            self.current += 1;
            self.picked = None;
        }
    }

    fn is_finished(&self) -> bool {
        !self.questions.is_empty()
            && self.current == self.questions.len() - 1
            && self.picked.is_some()
    }

    /// Keys are handled here directly; the quiz never touches core state.
    /// Returns true when the caller should regenerate via [`regenerate`].
    pub fn handle_event(&mut self, event: &TuiEvent) -> bool {
        match event {
            TuiEvent::InputChar('g') => return true,
            TuiEvent::InputChar(c @ '1'..='4') => {
                self.pick(*c as usize - '1' as usize);
            }
            TuiEvent::InputChar('n') | TuiEvent::Submit => self.advance(),
            _ => {}
        }
        false
    }
}

impl Default for QuizPaneState {
    fn default() -> Self {
        Self::new()
    }
}

pub struct QuizPane<'a> {
    state: &'a mut QuizPaneState,
}

impl<'a> QuizPane<'a> {
    pub fn new(state: &'a mut QuizPaneState) -> Self {
        Self { state }
    }

    fn option_line(question: &QuizQuestion, index: usize, picked: Option<usize>) -> Line<'_> {
        let key = format!("{}. ", index + 1);
        let text = question.options[index].as_str();
        let style = match picked {
            Some(_) if question.is_correct(index) => Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
            Some(p) if p == index => Style::default().fg(Color::Red),
            Some(_) => Style::default().fg(Color::DarkGray),
            None => Style::default(),
        };
        Line::from(vec![Span::raw(key), Span::styled(text, style)])
    }
}

impl Component for QuizPane<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let [body_area, help_area] =
            Layout::vertical([Constraint::Min(3), Constraint::Length(1)]).areas(area);

        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .title("Quiz");

        let Some(question) = self.state.questions.get(self.state.current) else {
            let empty = Paragraph::new("No quiz yet. Press g to generate one from your deck.")
                .style(Style::default().fg(Color::DarkGray))
                .wrap(Wrap { trim: false })
                .block(block);
            frame.render_widget(empty, body_area);
            frame.render_widget(
                Paragraph::new("g generate").style(Style::default().fg(Color::DarkGray)),
                help_area,
            );
            return;
        };

        let mut lines = vec![
            Line::from(Span::styled(
                format!(
                    "Question {}/{}   Score {}/{}",
                    self.state.current + 1,
                    self.state.questions.len(),
                    self.state.score,
                    self.state.answered
                ),
                Style::default().fg(Color::DarkGray),
            )),
            Line::from(""),
            Line::from(question.prompt.as_str()),
            Line::from(""),
        ];
        for i in 0..question.options.len() {
            lines.push(Self::option_line(question, i, self.state.picked));
        }
        if self.state.is_finished() {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                format!(
                    "Done! Final score: {}/{}",
                    self.state.score,
                    self.state.questions.len()
                ),
                Style::default().add_modifier(Modifier::BOLD),
            )));
        }

        frame.render_widget(
            Paragraph::new(lines).wrap(Wrap { trim: false }).block(block),
            body_area,
        );
        frame.render_widget(
            Paragraph::new("1-4 answer  n next  g regenerate")
                .style(Style::default().fg(Color::DarkGray)),
            help_area,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn quiz_state() -> QuizPaneState {
        let mut state = QuizPaneState::new();
        let mut rng = StdRng::seed_from_u64(7);
        state.regenerate(&Deck::starter(), &mut rng);
        state
    }

    fn correct_index(question: &QuizQuestion) -> usize {
        question
            .options
            .iter()
            .position(|o| *o == question.answer)
            .unwrap()
    }

    #[test]
    fn test_correct_pick_scores() {
        let mut state = quiz_state();
        let correct = correct_index(&state.questions[0]);
        state.handle_event(&TuiEvent::InputChar((b'1' + correct as u8) as char));
        assert_eq!(state.score, 1);
        assert_eq!(state.answered, 1);
    }

    #[test]
    fn test_wrong_pick_does_not_score() {
        let mut state = quiz_state();
        let correct = correct_index(&state.questions[0]);
        let wrong = (correct + 1) % state.questions[0].options.len();
        state.handle_event(&TuiEvent::InputChar((b'1' + wrong as u8) as char));
        assert_eq!(state.score, 0);
        assert_eq!(state.answered, 1);
    }

    #[test]
    fn test_pick_locks_in() {
        let mut state = quiz_state();
        let correct = correct_index(&state.questions[0]);
        let wrong = (correct + 1) % state.questions[0].options.len();
        state.handle_event(&TuiEvent::InputChar((b'1' + wrong as u8) as char));
        state.handle_event(&TuiEvent::InputChar((b'1' + correct as u8) as char));
        assert_eq!(state.score, 0);
        assert_eq!(state.answered, 1);
    }

    #[test]
    fn test_advance_requires_answer() {
        let mut state = quiz_state();
        state.handle_event(&TuiEvent::InputChar('n'));
        assert_eq!(state.current, 0);

        state.handle_event(&TuiEvent::InputChar('1'));
        state.handle_event(&TuiEvent::InputChar('n'));
        assert_eq!(state.current, 1);
        assert_eq!(state.picked, None);
    }

    #[test]
    fn test_g_requests_regeneration() {
        let mut state = quiz_state();
        assert!(state.handle_event(&TuiEvent::InputChar('g')));
    }

    #[test]
    fn test_finished_after_last_answer() {
        let mut state = quiz_state();
        let last = state.questions.len() - 1;
        for i in 0..=last {
            state.handle_event(&TuiEvent::InputChar('1'));
            if i < last {
                state.handle_event(&TuiEvent::InputChar('n'));
            }
        }
        assert!(state.is_finished());
        assert_eq!(state.answered, state.questions.len());
    }
}
