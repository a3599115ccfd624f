//! Monte Carlo odds engine.
//!
//! Estimates win/lose/push probabilities for a decision point by sampling random
//! continuations from the cards not yet seen, rates each available action, and turns
//! the estimates into Kelly-criterion bet sizing. The engine only reads the hands and
//! card pool it is given; every trial works on its own copies.
//!
//! Action rates are a shallow approximation: hitting and doubling look one card ahead
//! and then stand, splitting averages the best of stand/hit for each single-card hand.
//! Total work per query is bounded by `cards × per_card_trials` rather than growing
//! with tree depth.

mod actions;
mod kelly;
mod simulator;

#[cfg(test)]
mod tests;

use log::debug;
use rand::Rng;
use rand_chacha::{rand_core::SeedableRng, ChaCha8Rng};
use serde::{Deserialize, Serialize};

use crate::{Card, Hand};

pub use actions::ActionAnalysis;
pub use kelly::{
    basic_recommendation, in_hand_recommendation, kelly_fraction, KellyRecommendation, RiskLevel,
    BASELINE_LOSE_RATE, BASELINE_WIN_RATE, MAX_BET_FRACTION, MIN_BET,
};
pub use simulator::{SimulationResult, Winner};

use simulator::Tally;

/// Trial counts for the simulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Trials for full-hand estimates and stand rates
    pub trials: usize,
    /// Trials per candidate card when rating hit/double/split
    pub per_card_trials: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            trials: 10_000,
            per_card_trials: 100,
        }
    }
}

impl SimulationConfig {
    pub fn with_trials(trials: usize) -> Self {
        Self {
            trials,
            ..Self::default()
        }
    }

    fn trials(&self) -> usize {
        self.trials.max(1)
    }

    fn per_card_trials(&self) -> usize {
        self.per_card_trials.max(1)
    }
}

/// Aggregate outcome estimates for one decision point.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProbabilityResult {
    pub player_win_probability: f64,
    pub dealer_win_probability: f64,
    pub push_probability: f64,
    pub player_blackjack_probability: f64,
    pub dealer_blackjack_probability: f64,
    pub player_bust_probability: f64,
    pub dealer_bust_probability: f64,
    pub player_21_probability: f64,
    pub dealer_21_probability: f64,
    pub action_analysis: ActionAnalysis,
}

/// Single-card lookahead: what one more card does to the hand.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct HitAnalysis {
    pub bust_probability: f64,
    pub hit_21_probability: f64,
    pub safe_probability: f64,
}

/// Classify every card in the pool as busting, making exactly 21, or leaving the hand
/// live. All zero for an empty pool.
pub fn hit_analysis(player: &Hand, remaining: &[Card]) -> HitAnalysis {
    if remaining.is_empty() {
        return HitAnalysis::default();
    }

    let (mut bust, mut twenty_one, mut safe) = (0usize, 0usize, 0usize);
    for card in remaining {
        let mut next = player.clone();
        next.add_card(*card);
        match next.value() {
            v if v > 21 => bust += 1,
            21 => twenty_one += 1,
            _ => safe += 1,
        }
    }

    let total = remaining.len() as f64;
    HitAnalysis {
        bust_probability: bust as f64 / total,
        hit_21_probability: twenty_one as f64 / total,
        safe_probability: safe as f64 / total,
    }
}

/// Owns its random source; give concurrent calculators independent generators.
pub struct ProbabilityCalculator<R = ChaCha8Rng> {
    config: SimulationConfig,
    rng: R,
}

impl ProbabilityCalculator<ChaCha8Rng> {
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(ChaCha8Rng::seed_from_u64(seed))
    }

    pub fn from_clock() -> Self {
        Self::seeded(crate::clock_seed())
    }
}

impl<R: Rng> ProbabilityCalculator<R> {
    pub fn with_rng(rng: R) -> Self {
        Self::with_config(SimulationConfig::default(), rng)
    }

    pub fn with_config(config: SimulationConfig, rng: R) -> Self {
        Self { config, rng }
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Estimate outcome probabilities, per-action win rates and bet sizing for the
    /// player's current decision. `dealer` holds the up card and, optionally, the hole
    /// card; the hole card is treated as unknown and redrawn in every trial.
    pub fn calculate_win_probabilities(
        &mut self,
        player: &Hand,
        dealer: &Hand,
        remaining: &[Card],
        current_chips: u64,
    ) -> ProbabilityResult {
        if player.value() == 21 {
            return self.probabilities_for_21(player, dealer, remaining, current_chips);
        }

        let hit = hit_analysis(player, remaining);

        let mut tally = Tally::default();
        for _ in 0..self.config.trials() {
            let outcome = self.simulate_game(player, dealer, remaining);
            tally.record(&outcome);
        }

        let mut result = ProbabilityResult {
            player_win_probability: tally.rate(tally.player_wins),
            dealer_win_probability: tally.rate(tally.dealer_wins),
            push_probability: tally.rate(tally.pushes),
            player_blackjack_probability: tally.rate(tally.player_blackjacks),
            dealer_blackjack_probability: tally.rate(tally.dealer_blackjacks),
            player_bust_probability: hit.bust_probability,
            dealer_bust_probability: tally.rate(tally.dealer_busts),
            player_21_probability: hit.hit_21_probability,
            dealer_21_probability: tally.rate(tally.dealer_21s),
            action_analysis: self.analyze_actions(player, dealer, remaining),
        };
        result.action_analysis.kelly = in_hand_recommendation(&result, current_chips);

        debug!(
            "{} trials for {} vs {}: win {:.3} lose {:.3} push {:.3}, recommend {}",
            tally.trials,
            player,
            dealer.up_card().map(Card::to_string).unwrap_or_default(),
            result.player_win_probability,
            result.dealer_win_probability,
            result.push_probability,
            result.action_analysis.recommended_action,
        );

        result
    }

    /// The player already holds 21, so only the dealer's continuation is uncertain.
    fn probabilities_for_21(
        &mut self,
        player: &Hand,
        dealer: &Hand,
        remaining: &[Card],
        current_chips: u64,
    ) -> ProbabilityResult {
        let mut tally = Tally::default();
        for _ in 0..self.config.trials() {
            let dealer_final = self.simulate_dealer_play(dealer, remaining);
            tally.record(&SimulationResult::evaluate(player, &dealer_final));
        }

        let win_rate = tally.rate(tally.player_wins);
        let mut result = ProbabilityResult {
            player_win_probability: win_rate,
            dealer_win_probability: tally.rate(tally.dealer_wins),
            push_probability: tally.rate(tally.pushes),
            player_blackjack_probability: if player.is_blackjack() { 1.0 } else { 0.0 },
            dealer_blackjack_probability: tally.rate(tally.dealer_blackjacks),
            player_bust_probability: 0.0,
            dealer_bust_probability: tally.rate(tally.dealer_busts),
            player_21_probability: 1.0,
            dealer_21_probability: tally.rate(tally.dealer_21s),
            action_analysis: ActionAnalysis::stand_only(win_rate),
        };
        result.action_analysis.kelly = in_hand_recommendation(&result, current_chips);

        debug!(
            "{} dealer-only trials against 21: win {:.3} push {:.3}",
            tally.trials, result.player_win_probability, result.push_probability
        );

        result
    }

    /// Betting-phase sizing from estimated rates and chip count alone.
    pub fn calculate_basic_kelly_fraction(
        &self,
        estimated_win_rate: f64,
        estimated_lose_rate: f64,
        current_chips: u64,
    ) -> KellyRecommendation {
        basic_recommendation(estimated_win_rate, estimated_lose_rate, current_chips)
    }
}
