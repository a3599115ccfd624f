use std::fmt;

use crate::Card;
use serde::{Deserialize, Serialize};

/// Sum of base values with aces demoted from 11 to 1 while the total is over 21.
/// Returns the total and how many aces still count as 11.
fn soft_total(cards: &[Card]) -> (u8, usize) {
    let mut total: u16 = 0;
    let mut aces = 0;

    for card in cards {
        if card.is_ace() {
            aces += 1;
        }
        total += card.value() as u16;
    }

    while total > 21 && aces > 0 {
        total -= 10;
        aces -= 1;
    }

    (u8::try_from(total).unwrap_or(u8::MAX), aces)
}

/// Best total not over 21 when the aces allow it.
pub fn calculate_hand_value(cards: &[Card]) -> u8 {
    soft_total(cards).0
}

/// At least one ace still counts as 11.
pub fn is_soft_hand(cards: &[Card]) -> bool {
    soft_total(cards).1 > 0
}

pub fn is_busted(cards: &[Card]) -> bool {
    calculate_hand_value(cards) > 21
}

/// Natural 21: exactly two cards.
pub fn is_blackjack(cards: &[Card]) -> bool {
    cards.len() == 2 && calculate_hand_value(cards) == 21
}

/// Pairs split on rank, so K/Q is not a pair.
pub fn can_split_cards(card1: &Card, card2: &Card) -> bool {
    card1.rank == card2.rank
}

/// An ordered run of cards. Cloning is a full copy, so simulations can mutate freely.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hand {
    pub cards: Vec<Card>,
}

impl Hand {
    pub fn new() -> Self {
        Self {
            cards: Vec::with_capacity(8),
        }
    }

    pub fn from_cards(cards: &[Card]) -> Self {
        Self {
            cards: cards.to_vec(),
        }
    }

    pub fn value(&self) -> u8 {
        calculate_hand_value(&self.cards)
    }

    pub fn is_soft(&self) -> bool {
        is_soft_hand(&self.cards)
    }

    pub fn is_busted(&self) -> bool {
        is_busted(&self.cards)
    }

    pub fn is_blackjack(&self) -> bool {
        is_blackjack(&self.cards)
    }

    pub fn add_card(&mut self, card: Card) {
        self.cards.push(card);
    }

    pub fn can_split(&self) -> bool {
        self.cards.len() == 2 && can_split_cards(&self.cards[0], &self.cards[1])
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// The first card, which for the dealer is the visible one.
    pub fn up_card(&self) -> Option<&Card> {
        self.cards.first()
    }
}

impl fmt::Display for Hand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cards: Vec<String> = self.cards.iter().map(Card::to_string).collect();
        write!(f, "{}", cards.join(" "))
    }
}
