//! Flashcard records and the balancing algorithm.

use serde::{Deserialize, Serialize};

/// Review status of a flashcard. Exactly two values; toggling flips between
/// them.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum CardStatus {
    NeedToLearn,
    AlreadyKnow,
}

impl CardStatus {
    pub fn label(self) -> &'static str {
        match self {
            CardStatus::NeedToLearn => "need to learn",
            CardStatus::AlreadyKnow => "already know",
        }
    }

    pub fn toggled(self) -> CardStatus {
        match self {
            CardStatus::NeedToLearn => CardStatus::AlreadyKnow,
            CardStatus::AlreadyKnow => CardStatus::NeedToLearn,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Flashcard {
    pub question: String,
    pub answer: String,
    pub status: CardStatus,
}

impl Flashcard {
    pub fn new(
        question: impl Into<String>,
        answer: impl Into<String>,
        status: CardStatus,
    ) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
            status,
        }
    }
}

/// The in-memory flashcard list. Lives for the duration of the app; no
/// persistence.
#[derive(Debug, Clone, Default)]
pub struct Deck {
    pub cards: Vec<Flashcard>,
}

impl Deck {
    /// Replaces the status of the card at `index`. Out-of-range indices are
    /// ignored.
    pub fn set_status(&mut self, index: usize, status: CardStatus) {
        if let Some(card) = self.cards.get_mut(index) {
            card.status = status;
        }
    }

    /// Reorders the deck with [`balance`].
    pub fn rebalance(&mut self) {
        self.cards = balance(&self.cards);
    }

    /// A small starter deck so the study panes have something to show.
    pub fn starter() -> Self {
        use CardStatus::{AlreadyKnow, NeedToLearn};
        Self {
            cards: vec![
                Flashcard::new(
                    "What does ownership mean in Rust?",
                    "Each value has a single owner responsible for freeing it",
                    NeedToLearn,
                ),
                Flashcard::new(
                    "What is a borrow?",
                    "A reference to a value that does not take ownership",
                    AlreadyKnow,
                ),
                Flashcard::new(
                    "What does the ? operator do?",
                    "Propagates an error to the caller",
                    NeedToLearn,
                ),
                Flashcard::new(
                    "What is a trait?",
                    "A collection of methods a type can implement",
                    AlreadyKnow,
                ),
                Flashcard::new(
                    "What is a lifetime?",
                    "The scope for which a reference is valid",
                    NeedToLearn,
                ),
            ],
        }
    }
}

/// Interleaves the two status groups one-for-one: need-to-learn first, then
/// already-know, until the longer group is exhausted. Relative order within
/// each group is preserved; the input is not mutated. If one group is empty
/// the result is simply the other group in original order.
pub fn balance(cards: &[Flashcard]) -> Vec<Flashcard> {
    let need_to_learn: Vec<&Flashcard> = cards
        .iter()
        .filter(|card| card.status == CardStatus::NeedToLearn)
        .collect();
    let already_know: Vec<&Flashcard> = cards
        .iter()
        .filter(|card| card.status == CardStatus::AlreadyKnow)
        .collect();

    let mut balanced = Vec::with_capacity(cards.len());
    let longest = need_to_learn.len().max(already_know.len());
    for i in 0..longest {
        if let Some(card) = need_to_learn.get(i) {
            balanced.push((*card).clone());
        }
        if let Some(card) = already_know.get(i) {
            balanced.push((*card).clone());
        }
    }
    balanced
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(question: &str, status: CardStatus) -> Flashcard {
        Flashcard::new(question, format!("answer to {question}"), status)
    }

    fn questions(cards: &[Flashcard]) -> Vec<&str> {
        cards.iter().map(|c| c.question.as_str()).collect()
    }

    #[test]
    fn test_balance_is_a_permutation() {
        use CardStatus::{AlreadyKnow, NeedToLearn};
        let deck = vec![
            card("a", NeedToLearn),
            card("b", AlreadyKnow),
            card("c", NeedToLearn),
            card("d", NeedToLearn),
            card("e", AlreadyKnow),
        ];
        let balanced = balance(&deck);
        assert_eq!(balanced.len(), deck.len());

        let mut original = questions(&deck);
        let mut result = questions(&balanced);
        original.sort();
        result.sort();
        assert_eq!(original, result);
    }

    #[test]
    fn test_balance_preserves_order_within_groups() {
        use CardStatus::{AlreadyKnow, NeedToLearn};
        let deck = vec![
            card("n1", NeedToLearn),
            card("k1", AlreadyKnow),
            card("n2", NeedToLearn),
            card("k2", AlreadyKnow),
            card("n3", NeedToLearn),
        ];
        let balanced = balance(&deck);

        let need_order: Vec<&str> = balanced
            .iter()
            .filter(|c| c.status == NeedToLearn)
            .map(|c| c.question.as_str())
            .collect();
        let know_order: Vec<&str> = balanced
            .iter()
            .filter(|c| c.status == AlreadyKnow)
            .map(|c| c.question.as_str())
            .collect();
        assert_eq!(need_order, vec!["n1", "n2", "n3"]);
        assert_eq!(know_order, vec!["k1", "k2"]);
    }

    #[test]
    fn test_balance_interleaves_one_for_one() {
        use CardStatus::{AlreadyKnow, NeedToLearn};
        let deck = vec![
            card("n1", NeedToLearn),
            card("n2", NeedToLearn),
            card("k1", AlreadyKnow),
            card("k2", AlreadyKnow),
        ];
        let balanced = balance(&deck);
        assert_eq!(questions(&balanced), vec!["n1", "k1", "n2", "k2"]);
    }

    #[test]
    fn test_balance_single_group_is_identity() {
        use CardStatus::NeedToLearn;
        let deck = vec![
            card("a", NeedToLearn),
            card("b", NeedToLearn),
            card("c", NeedToLearn),
        ];
        assert_eq!(balance(&deck), deck);
        assert!(balance(&[]).is_empty());
    }

    #[test]
    fn test_set_status_in_place() {
        let mut deck = Deck::starter();
        deck.set_status(0, CardStatus::AlreadyKnow);
        assert_eq!(deck.cards[0].status, CardStatus::AlreadyKnow);

        // Out of range is a no-op
        let before = deck.cards.clone();
        deck.set_status(999, CardStatus::NeedToLearn);
        assert_eq!(deck.cards, before);
    }

    #[test]
    fn test_status_toggle() {
        assert_eq!(CardStatus::NeedToLearn.toggled(), CardStatus::AlreadyKnow);
        assert_eq!(CardStatus::AlreadyKnow.toggled(), CardStatus::NeedToLearn);
    }
}
