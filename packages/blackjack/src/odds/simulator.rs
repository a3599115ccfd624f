use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::ProbabilityCalculator;
use crate::{basic_strategy, Action, Card, Hand, DEALER_STAND_VALUE};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Winner {
    Player,
    Dealer,
    Push,
}

/// Outcome of one simulated hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub winner: Winner,
    pub player_final_value: u8,
    pub dealer_final_value: u8,
    pub player_blackjack: bool,
    pub dealer_blackjack: bool,
    pub player_bust: bool,
    pub dealer_bust: bool,
}

impl SimulationResult {
    /// Settle two finished hands: busts first, then blackjacks, then totals.
    pub fn evaluate(player: &Hand, dealer: &Hand) -> Self {
        let player_final_value = player.value();
        let dealer_final_value = dealer.value();
        let player_blackjack = player.is_blackjack();
        let dealer_blackjack = dealer.is_blackjack();
        let player_bust = player.is_busted();
        let dealer_bust = dealer.is_busted();

        let winner = if player_bust {
            Winner::Dealer
        } else if dealer_bust {
            Winner::Player
        } else if player_blackjack && dealer_blackjack {
            Winner::Push
        } else if player_blackjack {
            Winner::Player
        } else if dealer_blackjack {
            Winner::Dealer
        } else if player_final_value > dealer_final_value {
            Winner::Player
        } else if player_final_value < dealer_final_value {
            Winner::Dealer
        } else {
            Winner::Push
        };

        Self {
            winner,
            player_final_value,
            dealer_final_value,
            player_blackjack,
            dealer_blackjack,
            player_bust,
            dealer_bust,
        }
    }
}

/// Running counts over a batch of trials.
#[derive(Debug, Default)]
pub(super) struct Tally {
    pub trials: usize,
    pub player_wins: usize,
    pub dealer_wins: usize,
    pub pushes: usize,
    pub player_blackjacks: usize,
    pub dealer_blackjacks: usize,
    pub dealer_busts: usize,
    pub dealer_21s: usize,
}

impl Tally {
    pub fn record(&mut self, outcome: &SimulationResult) {
        self.trials += 1;
        match outcome.winner {
            Winner::Player => self.player_wins += 1,
            Winner::Dealer => self.dealer_wins += 1,
            Winner::Push => self.pushes += 1,
        }
        self.player_blackjacks += outcome.player_blackjack as usize;
        self.dealer_blackjacks += outcome.dealer_blackjack as usize;
        self.dealer_busts += outcome.dealer_bust as usize;
        self.dealer_21s += (outcome.dealer_final_value == 21) as usize;
    }

    pub fn rate(&self, count: usize) -> f64 {
        if self.trials == 0 {
            0.0
        } else {
            count as f64 / self.trials as f64
        }
    }
}

impl<R: Rng> ProbabilityCalculator<R> {
    /// Play one random continuation: the simulated player follows basic strategy
    /// against the dealer's up card, then the dealer draws to 17.
    pub(super) fn simulate_game(
        &mut self,
        player: &Hand,
        dealer: &Hand,
        remaining: &[Card],
    ) -> SimulationResult {
        let mut sim_player = player.clone();
        let mut pool = self.shuffled_pool(remaining, dealer).into_iter();
        let mut sim_dealer = deal_dealer_start(dealer, &mut pool);
        let up = dealer.up_card().map(Card::value);

        while !sim_player.is_busted() && sim_player.value() < 21 {
            if basic_strategy(sim_player.is_soft(), sim_player.value(), up) == Action::Stand {
                break;
            }
            match pool.next() {
                Some(card) => sim_player.add_card(card),
                None => break,
            }
        }

        draw_to_stand(&mut sim_dealer, &mut pool);
        SimulationResult::evaluate(&sim_player, &sim_dealer)
    }

    /// The dealer's finished hand for one random continuation.
    pub(super) fn simulate_dealer_play(&mut self, dealer: &Hand, remaining: &[Card]) -> Hand {
        let mut pool = self.shuffled_pool(remaining, dealer).into_iter();
        let mut sim_dealer = deal_dealer_start(dealer, &mut pool);
        draw_to_stand(&mut sim_dealer, &mut pool);
        sim_dealer
    }

    /// A fresh shuffle of the unseen cards. The dealer's hole card is unseen from the
    /// player's side, so it goes back into the pool rather than being kept.
    fn shuffled_pool(&mut self, remaining: &[Card], dealer: &Hand) -> Vec<Card> {
        let mut pool = Vec::with_capacity(remaining.len() + 1);
        pool.extend_from_slice(remaining);
        if let Some(hole) = dealer.cards.get(1) {
            pool.push(*hole);
        }
        pool.shuffle(&mut self.rng);
        pool
    }
}

/// Up card only, plus a redrawn hole card when the real dealer has one.
fn deal_dealer_start(dealer: &Hand, pool: &mut impl Iterator<Item = Card>) -> Hand {
    let mut sim_dealer = Hand::new();
    if let Some(up) = dealer.up_card() {
        sim_dealer.add_card(*up);
    }
    if dealer.len() > 1 {
        if let Some(hole) = pool.next() {
            sim_dealer.add_card(hole);
        }
    }
    sim_dealer
}

/// An empty pool just stops the draw.
fn draw_to_stand(hand: &mut Hand, pool: &mut impl Iterator<Item = Card>) {
    while hand.value() < DEALER_STAND_VALUE {
        match pool.next() {
            Some(card) => hand.add_card(card),
            None => break,
        }
    }
}
