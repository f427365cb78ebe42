//! Multiple-choice quiz generation from the flashcard deck.
//!
//! Options are the correct answer plus distinct answers drawn from the full
//! answer pool, then shuffled (Fisher-Yates via `SliceRandom::shuffle`).
//! Small pools get a reduced option count and random draws are bounded with
//! a deterministic fill, so generation always terminates.

use rand::seq::SliceRandom;
use rand::Rng;

use super::flashcards::Flashcard;

/// Target option count when the answer pool is large enough.
pub const OPTION_COUNT: usize = 4;

/// Random draw budget before falling back to a deterministic fill.
const MAX_DRAW_ATTEMPTS: usize = 32;

#[derive(Debug, Clone, PartialEq)]
pub struct QuizQuestion {
    pub prompt: String,
    pub options: Vec<String>,
    pub answer: String,
}

impl QuizQuestion {
    pub fn is_correct(&self, option_index: usize) -> bool {
        self.options.get(option_index) == Some(&self.answer)
    }
}

/// Builds one question per flashcard, in deck order.
pub fn generate_quiz<R: Rng>(cards: &[Flashcard], rng: &mut R) -> Vec<QuizQuestion> {
    let pool = distinct_answers(cards);
    cards
        .iter()
        .map(|card| QuizQuestion {
            prompt: card.question.clone(),
            options: generate_options(&card.answer, &pool, rng),
            answer: card.answer.clone(),
        })
        .collect()
}

/// Distinct answers in first-seen order.
fn distinct_answers(cards: &[Flashcard]) -> Vec<&str> {
    let mut pool: Vec<&str> = Vec::with_capacity(cards.len());
    for card in cards {
        if !pool.contains(&card.answer.as_str()) {
            pool.push(&card.answer);
        }
    }
    pool
}

/// Builds a shuffled option set containing `correct` exactly once and no
/// duplicates. The set length is `OPTION_COUNT`, or the distinct pool size
/// when the pool is smaller.
fn generate_options<R: Rng>(correct: &str, pool: &[&str], rng: &mut R) -> Vec<String> {
    let target = OPTION_COUNT.min(pool.len().max(1));
    let mut options: Vec<String> = vec![correct.to_string()];

    let mut attempts = 0;
    while options.len() < target && attempts < MAX_DRAW_ATTEMPTS {
        attempts += 1;
        let drawn = pool[rng.gen_range(0..pool.len())];
        if !options.iter().any(|o| o == drawn) {
            options.push(drawn.to_string());
        }
    }

    // Deterministic fill in case the draw budget ran out.
    for answer in pool {
        if options.len() >= target {
            break;
        }
        if !options.iter().any(|o| o == answer) {
            options.push(answer.to_string());
        }
    }

    options.shuffle(rng);
    options
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::study::flashcards::CardStatus;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn card(question: &str, answer: &str) -> Flashcard {
        Flashcard::new(question, answer, CardStatus::NeedToLearn)
    }

    fn full_deck() -> Vec<Flashcard> {
        vec![
            card("q1", "a1"),
            card("q2", "a2"),
            card("q3", "a3"),
            card("q4", "a4"),
            card("q5", "a5"),
        ]
    }

    #[test]
    fn test_option_sets_have_four_distinct_options() {
        let mut rng = StdRng::seed_from_u64(7);
        let quiz = generate_quiz(&full_deck(), &mut rng);
        assert_eq!(quiz.len(), 5);

        for question in &quiz {
            assert_eq!(question.options.len(), OPTION_COUNT);
            let correct_count = question
                .options
                .iter()
                .filter(|o| **o == question.answer)
                .count();
            assert_eq!(correct_count, 1);

            let mut deduped = question.options.clone();
            deduped.sort();
            deduped.dedup();
            assert_eq!(deduped.len(), question.options.len());
        }
    }

    #[test]
    fn test_small_pool_reduces_option_count() {
        let mut rng = StdRng::seed_from_u64(7);
        let deck = vec![card("q1", "a1"), card("q2", "a2")];
        let quiz = generate_quiz(&deck, &mut rng);

        for question in &quiz {
            assert_eq!(question.options.len(), 2);
            assert!(question.options.contains(&question.answer));
        }
    }

    #[test]
    fn test_duplicate_answers_terminate() {
        // Three cards but only two distinct answers: the old unbounded retry
        // loop would spin here.
        let mut rng = StdRng::seed_from_u64(7);
        let deck = vec![card("q1", "same"), card("q2", "same"), card("q3", "other")];
        let quiz = generate_quiz(&deck, &mut rng);

        for question in &quiz {
            assert_eq!(question.options.len(), 2);
            assert_eq!(
                question
                    .options
                    .iter()
                    .filter(|o| **o == question.answer)
                    .count(),
                1
            );
        }
    }

    #[test]
    fn test_single_card_quiz() {
        let mut rng = StdRng::seed_from_u64(7);
        let deck = vec![card("q1", "only")];
        let quiz = generate_quiz(&deck, &mut rng);
        assert_eq!(quiz[0].options, vec!["only"]);
    }

    #[test]
    fn test_is_correct() {
        let question = QuizQuestion {
            prompt: "q".to_string(),
            options: vec!["x".to_string(), "y".to_string()],
            answer: "y".to_string(),
        };
        assert!(!question.is_correct(0));
        assert!(question.is_correct(1));
        assert!(!question.is_correct(5));
    }
}
