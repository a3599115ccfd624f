use rand::seq::SliceRandom;
use rand::Rng;

use crate::{Card, Error, Rank, Suit};

/// A single 52-card deck dealt from the front.
#[derive(Debug, Clone)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// All 52 cards, suit by suit, Ace through King.
    pub fn ordered() -> Self {
        let cards = Suit::ALL
            .iter()
            .flat_map(|&suit| Rank::ALL.iter().map(move |&rank| Card::new(rank, suit)))
            .collect();
        Self { cards }
    }

    /// A stacked deck dealt in the given order.
    pub fn from_cards(cards: Vec<Card>) -> Self {
        Self { cards }
    }

    pub fn shuffled<R: Rng>(rng: &mut R) -> Self {
        let mut deck = Self::ordered();
        deck.shuffle(rng);
        deck
    }

    /// A shuffled deck missing the given cards, for reshuffling with hands still on the table.
    pub fn shuffled_without<R: Rng>(rng: &mut R, in_play: &[Card]) -> Self {
        let mut deck = Self::ordered();
        deck.cards.retain(|card| !in_play.contains(card));
        deck.shuffle(rng);
        deck
    }

    pub fn shuffle<R: Rng>(&mut self, rng: &mut R) {
        self.cards.shuffle(rng);
    }

    pub fn deal(&mut self) -> Result<Card, Error> {
        if self.cards.is_empty() {
            return Err(Error::DeckExhausted);
        }
        Ok(self.cards.remove(0))
    }

    /// Undealt cards, in dealing order.
    pub fn remaining(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}
