use crate::{Card, Color, GameError, Rank, RngState};

/// Number of cards in a fresh deck: per color one `0` and two each of
/// `1..=9` plus two each of Reverse/Skip/Draw Two, then 4 Wild and
/// 4 Wild Draw Four.
pub const DECK_SIZE: usize = 108;

/// The draw pile. The tail of `cards` is the top (next to draw); the
/// discard pile lives on the session, matching the persisted document.
#[derive(Debug, Default, Clone)]
pub struct Deck {
    pub cards: Vec<Card>,
}

impl Deck {
    /// Canonical 108-card deck in a fixed generation order, unshuffled.
    pub fn standard108() -> Self {
        let mut cards = Vec::with_capacity(DECK_SIZE);
        for color in Color::ALL {
            cards.push(Card::numbered(color, 0));
            for value in 1..=9 {
                cards.push(Card::numbered(color, value));
                cards.push(Card::numbered(color, value));
            }
        }
        for color in Color::ALL {
            for rank in [Rank::Reverse, Rank::Skip, Rank::DrawTwo] {
                cards.push(Card::action(color, rank));
                cards.push(Card::action(color, rank));
            }
        }
        for _ in 0..4 {
            cards.push(Card::wild());
            cards.push(Card::wild_draw_four());
        }
        Self { cards }
    }

    pub fn shuffle(&mut self, rng: &mut RngState) {
        rng.shuffle(&mut self.cards);
    }

    /// Removes `count` cards from the top into a hand. Fails without
    /// side effects when the pile is short.
    pub fn deal(&mut self, count: usize) -> Result<Vec<Card>, GameError> {
        if self.cards.len() < count {
            return Err(GameError::InsufficientCards {
                wanted: count,
                left: self.cards.len(),
            });
        }
        let mut hand = self.cards.split_off(self.cards.len() - count);
        // Draw order is successive pops from the tail.
        hand.reverse();
        Ok(hand)
    }

    pub fn draw(&mut self) -> Option<Card> {
        self.cards.pop()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}
