//! Single-player round state machine.
//!
//! A round runs WaitingToBet → PlayerTurn → DealerTurn → GameOver, and settling the
//! result returns the table to WaitingToBet. Odds queries go through
//! [`Game::win_probabilities`], which only hands the engine snapshots.


use log::{debug, info, warn};
use rand::Rng;
use rand_chacha::{rand_core::SeedableRng, ChaCha8Rng};
use serde::{Deserialize, Serialize};

use crate::odds::{basic_recommendation, BASELINE_LOSE_RATE, BASELINE_WIN_RATE};
use crate::{
    Action, Card, Deck, Error, Hand, KellyRecommendation, ProbabilityCalculator,
    ProbabilityResult, Result, TableRules, DEALER_STAND_VALUE,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    WaitingToBet,
    PlayerTurn,
    DealerTurn,
    GameOver,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub hand: Hand,
    pub chips: u64,
    /// Stake on the table for the current round, already taken out of `chips`
    pub bet: u64,
    pub doubled: bool,
}

impl Player {
    pub fn new(chips: u64) -> Self {
        Self {
            hand: Hand::new(),
            chips,
            bet: 0,
            doubled: false,
        }
    }

    pub fn can_bet(&self, amount: u64) -> bool {
        amount > 0 && amount <= self.chips
    }

    pub fn place_bet(&mut self, amount: u64) -> Result<()> {
        if !self.can_bet(amount) {
            return Err(Error::InvalidBet {
                amount,
                chips: self.chips,
            });
        }
        self.bet = amount;
        self.chips -= amount;
        Ok(())
    }

    pub fn can_double(&self) -> bool {
        self.hand.len() == 2 && !self.doubled && self.can_bet(self.bet)
    }

    pub fn double_bet(&mut self) -> Result<()> {
        if !self.can_double() {
            return Err(Error::CannotDouble);
        }
        self.chips -= self.bet;
        self.bet *= 2;
        self.doubled = true;
        Ok(())
    }

    /// Return the stake plus `winnings`.
    pub fn win_bet(&mut self, winnings: u64) {
        self.chips += self.bet + winnings;
        self.bet = 0;
    }

    pub fn lose_bet(&mut self) {
        self.bet = 0;
    }

    pub fn push_bet(&mut self) {
        self.chips += self.bet;
        self.bet = 0;
    }

    fn reset_round(&mut self) {
        self.hand = Hand::new();
        self.bet = 0;
        self.doubled = false;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundOutcome {
    PlayerBust,
    DealerBust,
    PlayerBlackjack,
    DealerBlackjack,
    PlayerWin,
    DealerWin,
    Push,
}

impl RoundOutcome {
    pub fn player_won(&self) -> bool {
        matches!(
            self,
            RoundOutcome::DealerBust | RoundOutcome::PlayerBlackjack | RoundOutcome::PlayerWin
        )
    }
}

/// Settlement of one round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundResult {
    pub outcome: RoundOutcome,
    /// Total stake, including the doubled part
    pub bet: u64,
    pub doubled: bool,
    /// Chip count after the payout
    pub chips: u64,
}

pub struct Game {
    pub rules: TableRules,
    pub player: Player,
    pub dealer: Hand,
    deck: Deck,
    phase: GamePhase,
    round: u32,
    rng: ChaCha8Rng,
}

impl Game {
    pub fn new(rules: TableRules) -> Self {
        Self::seeded(rules, crate::clock_seed())
    }

    pub fn seeded(rules: TableRules, seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let deck = Deck::shuffled(&mut rng);
        Self::build(rules, deck, rng)
    }

    /// Deal from a prepared deck. Reshuffles still draw from `seed`.
    pub fn with_deck(rules: TableRules, deck: Deck, seed: u64) -> Self {
        Self::build(rules, deck, ChaCha8Rng::seed_from_u64(seed))
    }

    fn build(rules: TableRules, deck: Deck, rng: ChaCha8Rng) -> Self {
        Self {
            player: Player::new(rules.starting_chips),
            dealer: Hand::new(),
            deck,
            phase: GamePhase::WaitingToBet,
            round: 0,
            rng,
            rules,
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn remaining_cards(&self) -> &[Card] {
        self.deck.remaining()
    }

    fn expect_phase(&self, expected: GamePhase) -> Result<()> {
        if self.phase != expected {
            return Err(Error::InvalidPhase {
                expected,
                actual: self.phase,
            });
        }
        Ok(())
    }

    pub fn start_round(&mut self) -> Result<()> {
        self.expect_phase(GamePhase::WaitingToBet)?;

        self.player.reset_round();
        self.dealer = Hand::new();

        if self.deck.len() < self.rules.reshuffle_below {
            info!(
                "{} cards left before round {}, shuffling a fresh deck",
                self.deck.len(),
                self.round + 1
            );
            self.deck = Deck::shuffled(&mut self.rng);
        }
        Ok(())
    }

    pub fn place_bet(&mut self, amount: u64) -> Result<()> {
        self.expect_phase(GamePhase::WaitingToBet)?;
        self.player.place_bet(amount)?;
        self.round += 1;
        self.phase = GamePhase::PlayerTurn;
        Ok(())
    }

    /// Two cards each, alternating player and dealer.
    pub fn deal_initial(&mut self) -> Result<()> {
        self.expect_phase(GamePhase::PlayerTurn)?;
        for _ in 0..2 {
            let card = self.draw()?;
            self.player.hand.add_card(card);
            let card = self.draw()?;
            self.dealer.add_card(card);
        }
        Ok(())
    }

    /// Draw one card for the player. The turn passes to the dealer once the hand
    /// reaches 21 or busts.
    pub fn hit(&mut self) -> Result<Card> {
        self.expect_phase(GamePhase::PlayerTurn)?;
        if self.player.hand.value() >= 21 {
            warn!("hit rejected on {}", self.player.hand.value());
            return Err(Error::IllegalAction(Action::Hit));
        }

        let card = self.draw()?;
        self.player.hand.add_card(card);
        if self.player.hand.value() >= 21 {
            self.phase = GamePhase::DealerTurn;
        }
        Ok(card)
    }

    pub fn stand(&mut self) -> Result<()> {
        self.expect_phase(GamePhase::PlayerTurn)?;
        self.phase = GamePhase::DealerTurn;
        Ok(())
    }

    /// Double the stake, take exactly one card, and end the turn.
    pub fn double_down(&mut self) -> Result<Card> {
        self.expect_phase(GamePhase::PlayerTurn)?;
        self.player.double_bet()?;

        let card = self.draw()?;
        self.player.hand.add_card(card);
        self.phase = GamePhase::DealerTurn;
        Ok(card)
    }

    /// Dealer draws below 17 unless the round is already decided by a bust or a blackjack.
    pub fn dealer_play(&mut self) -> Result<()> {
        self.expect_phase(GamePhase::DealerTurn)?;

        let decided = self.player.hand.is_busted()
            || self.player.hand.is_blackjack()
            || self.dealer.is_blackjack();
        if !decided {
            while self.dealer.value() < DEALER_STAND_VALUE {
                let card = self.draw()?;
                self.dealer.add_card(card);
            }
        }

        self.phase = GamePhase::GameOver;
        Ok(())
    }

    pub fn settle(&mut self) -> Result<RoundResult> {
        self.expect_phase(GamePhase::GameOver)?;

        let bet = self.player.bet;
        let doubled = self.player.doubled;
        let hand = &self.player.hand;
        let (player_value, dealer_value) = (hand.value(), self.dealer.value());
        let (player_blackjack, dealer_blackjack) = (hand.is_blackjack(), self.dealer.is_blackjack());

        let outcome = if hand.is_busted() {
            RoundOutcome::PlayerBust
        } else if self.dealer.is_busted() {
            RoundOutcome::DealerBust
        } else if player_blackjack && dealer_blackjack {
            RoundOutcome::Push
        } else if player_blackjack {
            RoundOutcome::PlayerBlackjack
        } else if dealer_blackjack {
            RoundOutcome::DealerBlackjack
        } else if player_value > dealer_value {
            RoundOutcome::PlayerWin
        } else if player_value < dealer_value {
            RoundOutcome::DealerWin
        } else {
            RoundOutcome::Push
        };

        match outcome {
            RoundOutcome::PlayerBlackjack if !doubled => {
                let winnings = self.rules.blackjack_payout.calculate_payout(bet);
                self.player.win_bet(winnings);
            }
            RoundOutcome::PlayerBlackjack | RoundOutcome::DealerBust | RoundOutcome::PlayerWin => {
                self.player.win_bet(bet)
            }
            RoundOutcome::Push => self.player.push_bet(),
            RoundOutcome::PlayerBust | RoundOutcome::DealerBlackjack | RoundOutcome::DealerWin => {
                self.player.lose_bet()
            }
        }

        self.phase = GamePhase::WaitingToBet;
        debug!(
            "round {} settled: {:?}, bet {}, chips {}",
            self.round, outcome, bet, self.player.chips
        );

        Ok(RoundResult {
            outcome,
            bet,
            doubled,
            chips: self.player.chips,
        })
    }

    /// No chips left to bet with.
    pub fn is_over(&self) -> bool {
        self.player.chips == 0 && self.player.bet == 0
    }

    /// Ladder bets the player can cover, or everything left when even the smallest is too much.
    pub fn bet_options(&self) -> Vec<u64> {
        let chips = self.player.chips;
        let mut options: Vec<u64> = self
            .rules
            .bet_ladder
            .iter()
            .copied()
            .filter(|&amount| amount <= chips)
            .collect();
        let smallest = self.rules.bet_ladder.iter().copied().min().unwrap_or(0);
        if chips > 0 && chips < smallest {
            options.push(chips);
        }
        options
    }

    pub fn can_double(&self) -> bool {
        self.phase == GamePhase::PlayerTurn && self.player.can_double()
    }

    /// Odds for the player's current decision; `None` outside the player's turn.
    pub fn win_probabilities<R: Rng>(
        &self,
        calculator: &mut ProbabilityCalculator<R>,
    ) -> Option<ProbabilityResult> {
        if self.phase != GamePhase::PlayerTurn {
            return None;
        }
        Some(calculator.calculate_win_probabilities(
            &self.player.hand,
            &self.dealer,
            self.deck.remaining(),
            self.player.chips,
        ))
    }

    pub fn betting_recommendation(&self) -> KellyRecommendation {
        basic_recommendation(BASELINE_WIN_RATE, BASELINE_LOSE_RATE, self.player.chips)
    }

    /// Next card, reshuffling everything not on the table if the deck runs dry mid-round.
    fn draw(&mut self) -> Result<Card> {
        match self.deck.deal() {
            Ok(card) => Ok(card),
            Err(Error::DeckExhausted) => {
                let in_play: Vec<Card> = self
                    .player
                    .hand
                    .cards
                    .iter()
                    .chain(&self.dealer.cards)
                    .copied()
                    .collect();
                self.deck = Deck::shuffled_without(&mut self.rng, &in_play);
                warn!("deck exhausted mid-round, reshuffled {} cards", self.deck.len());
                self.deck.deal()
            }
            Err(err) => Err(err),
        }
    }
}
